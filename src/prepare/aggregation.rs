//! Rules for combining several observations that fall into one period.

use serde::{Deserialize, Serialize};

/// How rows sharing a period are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Total of all values in the period.
    #[default]
    Sum,
    /// Arithmetic mean of all values in the period.
    Mean,
}

impl Aggregation {
    /// Combine `values`. An empty slice yields 0 (a period without demand).
    pub fn apply(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let total: f64 = values.iter().sum();
        match self {
            Aggregation::Sum => total,
            Aggregation::Mean => total / values.len() as f64,
        }
    }
}
