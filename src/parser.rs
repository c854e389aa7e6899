use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{Result, VennError};
use crate::ir::Region;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

impl NumberOrString {
    fn into_id(self) -> String {
        match self {
            NumberOrString::Number(val) => val.to_string(),
            NumberOrString::String(val) => val,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(val) => val.as_f64(),
            NumberOrString::String(val) => val.trim().parse::<f64>().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegionInput {
    sets: Vec<NumberOrString>,
    size: NumberOrString,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    List(Vec<RegionInput>),
    Wrapped { regions: Vec<RegionInput> },
}

/// Parses region specifications from JSON, falling back to JSON5 for
/// hand-written input (comments, trailing commas, unquoted keys).
///
/// Accepts either a bare array of regions or an object with a `regions`
/// array. Set ids may be strings or numbers.
pub fn parse_regions(input: &str) -> Result<Vec<Region>> {
    let document = match serde_json::from_str::<Document>(input) {
        Ok(document) => document,
        Err(json_err) => json5::from_str::<Document>(input).map_err(|json5_err| {
            log::debug!("json5 fallback failed: {json5_err}");
            VennError::Syntax(json_err.to_string())
        })?,
    };
    let inputs = match document {
        Document::List(regions) | Document::Wrapped { regions } => regions,
    };

    let mut regions = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.into_iter().enumerate() {
        let size = input.size.as_f64().ok_or(VennError::NonFiniteSize { index })?;
        let region = Region {
            sets: input.sets.into_iter().map(NumberOrString::into_id).collect(),
            size,
            label: input.label,
        };
        regions.push(region);
    }
    validate_regions(&regions)?;
    Ok(regions)
}

/// Rejects regions the layout cannot interpret.
pub fn validate_regions(regions: &[Region]) -> Result<()> {
    for (index, region) in regions.iter().enumerate() {
        if region.sets.is_empty() {
            return Err(VennError::EmptySets { index });
        }
        if !region.size.is_finite() {
            return Err(VennError::NonFiniteSize { index });
        }
        if region.size < 0.0 {
            return Err(VennError::NegativeSize {
                index,
                size: region.size,
            });
        }
        let mut seen = HashSet::new();
        for set in &region.sets {
            if !seen.insert(set.as_str()) {
                return Err(VennError::DuplicateSet {
                    index,
                    set: set.clone(),
                });
            }
        }
    }
    Ok(())
}
