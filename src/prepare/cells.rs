//! Coercion of raw cells into dates and demand values.

use crate::core::CellValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Calendar date of a cell, if it holds one.
pub(crate) fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Text(s) => parse_date_text(s.trim()),
        CellValue::Number(_) | CellValue::Empty => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Outcome of coercing a demand cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DemandCell {
    Value(f64),
    Missing,
    /// Could not be coerced; carries a printable form of the cell.
    Invalid(String),
}

pub(crate) fn parse_demand(cell: &CellValue) -> DemandCell {
    match cell {
        CellValue::Empty => DemandCell::Missing,
        CellValue::Number(n) => check_demand(*n, || n.to_string()),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return DemandCell::Missing;
            }
            match trimmed.parse::<f64>() {
                Ok(n) => check_demand(n, || trimmed.to_string()),
                Err(_) => DemandCell::Invalid(format!("'{}'", trimmed)),
            }
        }
        CellValue::Date(d) => DemandCell::Invalid(d.to_string()),
        CellValue::DateTime(dt) => DemandCell::Invalid(dt.to_string()),
    }
}

fn check_demand(n: f64, show: impl FnOnce() -> String) -> DemandCell {
    if n.is_finite() && n >= 0.0 {
        DemandCell::Value(n)
    } else {
        DemandCell::Invalid(show())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_date_layouts() {
        let expected = date(2025, 3, 4);
        for text in [
            "2025-03-04",
            "2025/03/04",
            "04.03.2025",
            "03/04/2025",
            "2025-03-04T08:30:00",
            "2025-03-04 17:45:12",
            "2025-03-04T08:30:00+01:00",
        ] {
            assert_eq!(parse_date(&CellValue::from(text)), Some(expected), "{}", text);
        }
    }

    #[test]
    fn typed_cells_and_rejects() {
        let dt = date(2025, 3, 4).and_hms_opt(23, 59, 0).unwrap();
        assert_eq!(parse_date(&CellValue::DateTime(dt)), Some(date(2025, 3, 4)));
        assert_eq!(parse_date(&CellValue::Date(date(2025, 3, 4))), Some(date(2025, 3, 4)));
        assert_eq!(parse_date(&CellValue::from("not a date")), None);
        assert_eq!(parse_date(&CellValue::Number(45000.0)), None);
        assert_eq!(parse_date(&CellValue::Empty), None);
    }

    #[test]
    fn demand_coercion() {
        assert_eq!(parse_demand(&CellValue::Number(4.0)), DemandCell::Value(4.0));
        assert_eq!(parse_demand(&CellValue::from(" 7.5 ")), DemandCell::Value(7.5));
        assert_eq!(parse_demand(&CellValue::Empty), DemandCell::Missing);
        assert_eq!(parse_demand(&CellValue::from("  ")), DemandCell::Missing);
        assert!(matches!(parse_demand(&CellValue::from("ten")), DemandCell::Invalid(_)));
        assert!(matches!(parse_demand(&CellValue::Number(-1.0)), DemandCell::Invalid(_)));
        assert!(matches!(
            parse_demand(&CellValue::Number(f64::INFINITY)),
            DemandCell::Invalid(_)
        ));
    }
}
