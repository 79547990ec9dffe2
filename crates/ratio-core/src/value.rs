use crate::LineItem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a metric has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "reason", content = "item", rename_all = "snake_case")]
pub enum Undefined {
    /// A required raw field is absent from the record.
    MissingInput(LineItem),
    /// Zero or non-positive denominator, or a non-positive power argument.
    UndefinedRatio,
    /// The computation needs a prior fiscal year that is not available.
    InsufficientHistory,
}

impl fmt::Display for Undefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Undefined::MissingInput(item) => write!(f, "missing {}", item),
            Undefined::UndefinedRatio => f.write_str("undefined ratio"),
            Undefined::InsufficientHistory => f.write_str("insufficient history"),
        }
    }
}

/// A computed metric: a finite number or an explicit undefined marker.
///
/// Undefined is never coerced to zero or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricValue {
    Defined(f64),
    Undefined(Undefined),
}

impl MetricValue {
    /// Wraps a raw float; NaN and infinities become `UndefinedRatio`.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            MetricValue::Defined(value)
        } else {
            MetricValue::Undefined(Undefined::UndefinedRatio)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Defined(v) => Some(*v),
            MetricValue::Undefined(_) => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, MetricValue::Defined(_))
    }

    pub fn undefined_reason(&self) -> Option<Undefined> {
        match self {
            MetricValue::Defined(_) => None,
            MetricValue::Undefined(reason) => Some(*reason),
        }
    }

    /// Converts into a `Result` so callers can chain with `?`.
    pub fn into_result(self) -> Result<f64, Undefined> {
        match self {
            MetricValue::Defined(v) => Ok(v),
            MetricValue::Undefined(reason) => Err(reason),
        }
    }
}

impl From<Result<f64, Undefined>> for MetricValue {
    fn from(result: Result<f64, Undefined>) -> Self {
        match result {
            Ok(v) => MetricValue::from_f64(v),
            Err(reason) => MetricValue::Undefined(reason),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Defined(v) => write!(f, "{:.4}", v),
            MetricValue::Undefined(reason) => write!(f, "n/a ({})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_is_undefined() {
        assert_eq!(
            MetricValue::from_f64(f64::INFINITY),
            MetricValue::Undefined(Undefined::UndefinedRatio)
        );
        assert_eq!(
            MetricValue::from_f64(f64::NAN),
            MetricValue::Undefined(Undefined::UndefinedRatio)
        );
        assert_eq!(MetricValue::from_f64(0.0).value(), Some(0.0));
    }

    #[test]
    fn test_result_round_trip_keeps_reason() {
        let missing: Result<f64, Undefined> = Err(Undefined::MissingInput(LineItem::Revenue));
        let value = MetricValue::from(missing);
        assert_eq!(
            value.undefined_reason(),
            Some(Undefined::MissingInput(LineItem::Revenue))
        );
        assert_eq!(value.into_result(), missing);
    }

    #[test]
    fn test_serializes_tagged() {
        let json = serde_json::to_value(MetricValue::Undefined(Undefined::InsufficientHistory)).unwrap();
        assert_eq!(json["undefined"]["reason"], "insufficient_history");

        let json = serde_json::to_value(MetricValue::Defined(1.5)).unwrap();
        assert_eq!(json["defined"], 1.5);
    }
}
