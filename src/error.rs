use thiserror::Error;

pub type Result<T> = std::result::Result<T, VennError>;

/// Rejections raised while reading region specifications.
///
/// The layout core itself never fails; these only come out of the input
/// layer that sits in front of it.
#[derive(Error, Debug)]
pub enum VennError {
    #[error("region {index} names no sets")]
    EmptySets { index: usize },

    #[error("region {index} has negative size {size}")]
    NegativeSize { index: usize, size: f64 },

    #[error("region {index} has non-finite size")]
    NonFiniteSize { index: usize },

    #[error("region {index} repeats set '{set}'")]
    DuplicateSet { index: usize, set: String },

    #[error("invalid region input: {0}")]
    Syntax(String),
}
