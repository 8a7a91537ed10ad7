//! Error types for the demand-planner library.

use thiserror::Error;

/// Result type alias for planning operations.
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Errors that can occur while preparing data, forecasting or sizing inventory.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    /// Input data is malformed or cannot be parsed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Too few observations for the chosen model.
    #[error("insufficient data for {model}: need at least {needed} observations, got {got}")]
    InsufficientData {
        model: String,
        needed: usize,
        got: usize,
    },

    /// Numerical fitting failed or did not converge.
    #[error("model fit error: {0}")]
    ModelFit(String),

    /// A user-supplied parameter is out of range or contradicts another.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PlannerError {
    pub(crate) fn insufficient(model: &str, needed: usize, got: usize) -> Self {
        Self::InsufficientData {
            model: model.to_string(),
            needed,
            got,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = PlannerError::Validation("column 'date' not found".to_string());
        assert_eq!(err.to_string(), "validation error: column 'date' not found");

        let err = PlannerError::insufficient("ARIMA(1,1,1)", 10, 3);
        assert_eq!(
            err.to_string(),
            "insufficient data for ARIMA(1,1,1): need at least 10 observations, got 3"
        );

        let err = PlannerError::ModelFit("optimizer did not converge".to_string());
        assert_eq!(err.to_string(), "model fit error: optimizer did not converge");

        let err = PlannerError::InvalidParameter("lead_time_periods must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "invalid parameter: lead_time_periods must be positive"
        );
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = PlannerError::ModelFit("diverged".to_string());
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
