// src/domain/condition.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of repair as advertised in a listing description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "excellent")]
    Excellent,
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "habitable")]
    Habitable,
    #[serde(rename = "minor renovation", alias = "minor_renovation")]
    MinorRenovation,
    #[serde(rename = "major renovation", alias = "major_renovation")]
    MajorRenovation,
    #[serde(rename = "unknown")]
    Unknown,
}

/// Keyword table for classifying Italian descriptions. Order matters:
/// the first condition with a matching keyword wins.
const CONDITION_KEYWORDS: &[(Condition, &[&str])] = &[
    (
        Condition::Excellent,
        &["ottimo", "eccellente", "perfetto", "ristrutturato"],
    ),
    (Condition::Good, &["buono", "buone condizioni", "abitabile"]),
    (Condition::Habitable, &["abitabile", "vivibile"]),
    (
        Condition::MinorRenovation,
        &["piccoli lavori", "da ristrutturare parzialmente"],
    ),
    (
        Condition::MajorRenovation,
        &["da ristrutturare", "da rifare", "da sistemare"],
    ),
];

impl Condition {
    pub fn key(&self) -> &'static str {
        match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Habitable => "habitable",
            Condition::MinorRenovation => "minor renovation",
            Condition::MajorRenovation => "major renovation",
            Condition::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Condition::Excellent => "Excellent",
            Condition::Good => "Good",
            Condition::Habitable => "Habitable",
            Condition::MinorRenovation => "Minor Renovation",
            Condition::MajorRenovation => "Major Renovation",
            Condition::Unknown => "Unknown",
        }
    }

    /// Inverse of `key`, used when reading rows back from the database.
    pub fn from_key(key: &str) -> Self {
        match key {
            "excellent" => Condition::Excellent,
            "good" => Condition::Good,
            "habitable" => Condition::Habitable,
            "minor renovation" => Condition::MinorRenovation,
            "major renovation" => Condition::MajorRenovation,
            _ => Condition::Unknown,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

pub fn determine_condition(description: &str) -> Condition {
    let lower = description.to_lowercase();

    CONDITION_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(condition, _)| *condition)
        .unwrap_or(Condition::Unknown)
}
