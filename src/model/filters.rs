//! Ephemeral search filters.

use serde::Serialize;

/// Pain-point vocabulary sent with every search unless configured otherwise.
pub const DEFAULT_PAIN_POINTS: [&str; 5] = [
    "Poor phone service",
    "Calls go unanswered",
    "Rude treatment",
    "Cannot book appointments",
    "Long waiting times",
];

/// Owned copy of [`DEFAULT_PAIN_POINTS`].
pub fn default_pain_points() -> Vec<String> {
    DEFAULT_PAIN_POINTS.iter().map(|p| (*p).to_owned()).collect()
}

/// What the user asked discovery to look for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Sub-industry, e.g. "Dentists".
    pub industry: String,
    /// "City, Country" or a free-form location.
    pub location: String,
    /// Candidate pain points used to steer discovery.
    pub pain_points: Vec<String>,
}

impl SearchFilters {
    /// Filters with the default pain-point vocabulary.
    pub fn new(industry: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            industry: industry.into(),
            location: location.into(),
            pain_points: default_pain_points(),
        }
    }

    /// Replace the pain-point list.
    #[must_use]
    pub fn with_pain_points(mut self, pain_points: Vec<String>) -> Self {
        self.pain_points = pain_points;
        self
    }
}
