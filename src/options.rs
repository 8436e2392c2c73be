use crate::error::{GbGenesError, Result};
use crate::gene::UNKNOWN;
use serde::{Deserialize, Serialize};
use std::fs;

/// Knobs of the feature-table parser. The defaults give the plain behaviour:
/// "unknown" for missing names and functions, CDS blocks closed by any
/// following feature, and a `/product=` value without a closing quote read on
/// until one is found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub unknown_placeholder: String,
    pub close_on_foreign_feature: bool,
    /// Treat `/product=value` without a leading quote as complete on its line.
    pub unquoted_product_is_complete: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            unknown_placeholder: UNKNOWN.to_string(),
            close_on_foreign_feature: true,
            unquoted_product_is_complete: false,
        }
    }
}

impl ParseOptions {
    pub fn from_json_file(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| GbGenesError::Config {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| GbGenesError::Config {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}
