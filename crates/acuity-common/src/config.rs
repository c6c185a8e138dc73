//! Engine configuration.
//!
//! Deployments tune the merger cutoff and batch limits via YAML/JSON
//! config; everything defaults to the published clinical values.

use serde::{Deserialize, Serialize};

/// Complete engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scoring thresholds the merger consults
    #[serde(default)]
    pub scoring: ScoringThresholds,

    /// Batch orchestration limits
    #[serde(default)]
    pub batch: BatchLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringThresholds::default(),
            batch: BatchLimits::default(),
        }
    }
}

// ── Scoring thresholds ────────────────────────────────────────────────────────

/// Tunable cutoffs used by the combined risk merger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringThresholds {
    /// SOFA total at which the combined verdict floors at MODERATE.
    /// Published mortality banding puts 7-9 in the moderate band.
    #[serde(default = "default_sofa_moderate_total")]
    pub sofa_moderate_total: u8,
}

fn default_sofa_moderate_total() -> u8 {
    7
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            sofa_moderate_total: default_sofa_moderate_total(),
        }
    }
}

// ── Batch limits ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchLimits {
    /// Maximum number of patients accepted in one batch request.
    #[serde(default = "default_max_patients")]
    pub max_patients: usize,
}

fn default_max_patients() -> usize {
    50
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_patients: default_max_patients(),
        }
    }
}

// ── Helper methods ────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load from YAML file
    pub fn from_yaml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Check the configured values are usable.
    pub fn validate(&self) -> bool {
        self.scoring.sofa_moderate_total <= 24
            && self.batch.max_patients >= 1
            && self.batch.max_patients <= 50
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
