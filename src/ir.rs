use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Circle;

/// Desired size of one set (`sets.len() == 1`) or of the intersection of
/// several sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub sets: Vec<String>,
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Region {
    pub fn new<S: Into<String>>(sets: impl IntoIterator<Item = S>, size: f64) -> Self {
        Self {
            sets: sets.into_iter().map(Into::into).collect(),
            size,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Key used for per-region results such as label anchors.
    pub fn key(&self) -> String {
        self.sets.join(",")
    }

    pub fn is_single(&self) -> bool {
        self.sets.len() == 1
    }
}

/// One circle per set id.
pub type Solution = BTreeMap<String, Circle>;

/// Label anchor for a region. `disjoint` marks regions that have no area
/// in the layout; their anchor sits outside the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextCentre {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub disjoint: bool,
}

impl TextCentre {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            disjoint: false,
        }
    }
}
