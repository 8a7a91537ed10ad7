//! Periods-per-year table used to annualise average demand for EOQ.

use crate::core::Granularity;
use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};

/// How many periods of each granularity make up one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annualization {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
    pub quarterly: f64,
    pub yearly: f64,
}

impl Default for Annualization {
    fn default() -> Self {
        Self {
            daily: 365.0,
            weekly: 52.0,
            monthly: 12.0,
            quarterly: 4.0,
            yearly: 1.0,
        }
    }
}

impl Annualization {
    /// Every factor must be finite and positive.
    pub fn validate(&self) -> Result<()> {
        for (name, factor) in [
            ("daily", self.daily),
            ("weekly", self.weekly),
            ("monthly", self.monthly),
            ("quarterly", self.quarterly),
            ("yearly", self.yearly),
        ] {
            if !(factor.is_finite() && factor > 0.0) {
                return Err(PlannerError::InvalidParameter(format!(
                    "annualization.{} must be a positive number, got {}",
                    name, factor
                )));
            }
        }
        Ok(())
    }

    /// Periods per year for `granularity`.
    ///
    /// A custom spacing of `n` days is scaled from the daily factor.
    pub fn periods_per_year(&self, granularity: Granularity) -> f64 {
        match granularity {
            Granularity::Daily => self.daily,
            Granularity::Weekly => self.weekly,
            Granularity::Monthly => self.monthly,
            Granularity::Quarterly => self.quarterly,
            Granularity::Yearly => self.yearly,
            Granularity::Days(n) => self.daily / f64::from(n.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_factors() {
        let a = Annualization::default();
        assert_eq!(a.periods_per_year(Granularity::Daily), 365.0);
        assert_eq!(a.periods_per_year(Granularity::Weekly), 52.0);
        assert_eq!(a.periods_per_year(Granularity::Monthly), 12.0);
        assert_eq!(a.periods_per_year(Granularity::Quarterly), 4.0);
        assert_eq!(a.periods_per_year(Granularity::Yearly), 1.0);
        assert_relative_eq!(a.periods_per_year(Granularity::Days(5)), 73.0);
    }

    #[test]
    fn rejects_non_positive_or_non_finite_factors() {
        assert!(Annualization::default().validate().is_ok());
        for bad in [-365.0, 0.0, f64::NAN, f64::INFINITY] {
            let a = Annualization {
                daily: bad,
                ..Default::default()
            };
            assert!(matches!(a.validate(), Err(PlannerError::InvalidParameter(_))));
        }
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let a: Annualization = serde_json::from_str(r#"{"daily": 250.0}"#).unwrap();
        assert_eq!(a.periods_per_year(Granularity::Daily), 250.0);
        assert_eq!(a.periods_per_year(Granularity::Weekly), 52.0);
    }
}
