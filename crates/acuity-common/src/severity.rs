//! Ordinal risk levels and scoring-system identifiers.

use serde::{Deserialize, Serialize};

/// Overall risk verdict, ordered least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "MINIMAL",
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    /// Levels at or above HIGH demand immediate attention.
    pub fn requires_immediate_attention(&self) -> bool {
        *self >= RiskLevel::High
    }
}

/// The three scoring systems the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSystem {
    /// Sequential organ failure assessment, 0-24 over six organ systems.
    Sofa,
    /// Quick bedside screen, 0-3 over three binary criteria.
    Qsofa,
    /// National early warning score, 0-20 over seven criteria.
    News2,
}

impl ScoreSystem {
    pub const ALL: [ScoreSystem; 3] = [ScoreSystem::Sofa, ScoreSystem::Qsofa, ScoreSystem::News2];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreSystem::Sofa => "sofa",
            ScoreSystem::Qsofa => "qsofa",
            ScoreSystem::News2 => "news2",
        }
    }
}
