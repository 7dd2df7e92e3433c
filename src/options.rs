//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What the normalizer does with a measure whose beats are all rests
/// (or that has no beats at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SilentMeasurePolicy {
    /// Discard the measure. Bar numbering in the output no longer matches
    /// the source.
    #[default]
    Drop,
    /// Keep the measure so it renders as a rest bar.
    KeepAsRest,
}

/// Options shared by every stage of the conversion pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub silent_measures: SilentMeasurePolicy,
}

impl PipelineOptions {
    /// Load options from a JSON object. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn keep_silent_measures() -> Self {
        Self {
            silent_measures: SilentMeasurePolicy::KeepAsRest,
        }
    }
}
