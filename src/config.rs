//! Fact-layer configuration.

use serde::{Deserialize, Serialize};

use crate::error::GroundingError;

/// Controls when [`run_fact_layers`](crate::fact_layer::run_fact_layers) stops.
///
/// Missing JSON fields take their default:
///
/// ```
/// use relground::FactLayerConfig;
///
/// let config = FactLayerConfig::from_json_str(r#"{ "max_passes": 8 }"#).unwrap();
/// assert!(config.stop_at_goal);
/// assert_eq!(config.max_passes, Some(8));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactLayerConfig {
    /// Stop as soon as every goal literal holds.
    pub stop_at_goal: bool,
    /// Give up after this many passes.
    pub max_passes: Option<usize>,
}

impl Default for FactLayerConfig {
    fn default() -> Self {
        Self {
            stop_at_goal: true,
            max_passes: None,
        }
    }
}

impl FactLayerConfig {
    /// Run to the full fixpoint regardless of the goal.
    pub fn saturate() -> Self {
        Self {
            stop_at_goal: false,
            max_passes: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, GroundingError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, GroundingError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
