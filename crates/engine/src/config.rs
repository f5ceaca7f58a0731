use serde::Deserialize;

use crate::error::LinkError;
use crate::scorer::ScorerKind;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LinkConfig {
    pub name: String,
    pub datasets: DatasetsConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatasetsConfig {
    pub left: DatasetConfig,
    pub right: DatasetConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub file: String,
    pub columns: ColumnMapping,
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    pub scorer: ScorerKind,
    /// Acceptance threshold on the canonical [0,1] scale, compared with
    /// strict `>`.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.8
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl LinkConfig {
    pub fn from_toml(input: &str) -> Result<Self, LinkError> {
        let config: LinkConfig =
            toml::from_str(input).map_err(|e| LinkError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject bad configuration before any record is processed.
    pub fn validate(&self) -> Result<(), LinkError> {
        let threshold = self.matching.threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(LinkError::ConfigValidation(format!(
                "threshold must be a finite value in [0, 1], got {threshold}"
            )));
        }

        if self.datasets.left.file.is_empty() {
            return Err(LinkError::ConfigValidation(
                "datasets.left.file must not be empty".into(),
            ));
        }
        if self.datasets.right.file.is_empty() {
            return Err(LinkError::ConfigValidation(
                "datasets.right.file must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
