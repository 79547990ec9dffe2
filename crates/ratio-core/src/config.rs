//! Score thresholds for the Altman and Beneish risk labels.
//!
//! Defaults are the published academic cutoffs. Every value can be overridden
//! from the environment so the dashboard can match a data vendor's bands.

use crate::{MetricsError, Result};
use serde::{Deserialize, Serialize};

pub const ALTMAN_DISTRESS_ENV: &str = "RATIO_ALTMAN_DISTRESS";
pub const ALTMAN_SAFE_ENV: &str = "RATIO_ALTMAN_SAFE";
pub const BENEISH_CUTOFF_ENV: &str = "RATIO_BENEISH_CUTOFF";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreThresholds {
    /// Z below this is the distress zone
    pub altman_distress: f64,
    /// Z above this is the safe zone
    pub altman_safe: f64,
    /// M above this flags likely earnings manipulation
    pub beneish_cutoff: f64,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            altman_distress: 1.8,
            altman_safe: 2.99,
            beneish_cutoff: -2.22,
        }
    }
}

impl ScoreThresholds {
    pub fn new(altman_distress: f64, altman_safe: f64, beneish_cutoff: f64) -> Result<Self> {
        let thresholds = Self {
            altman_distress,
            altman_safe,
            beneish_cutoff,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.altman_distress.is_finite()
            || !self.altman_safe.is_finite()
            || !self.beneish_cutoff.is_finite()
        {
            return Err(MetricsError::InvalidThreshold(
                "thresholds must be finite".to_string(),
            ));
        }
        if self.altman_distress >= self.altman_safe {
            return Err(MetricsError::InvalidThreshold(format!(
                "altman distress threshold {} must be below safe threshold {}",
                self.altman_distress, self.altman_safe
            )));
        }
        Ok(())
    }

    /// Defaults overridden by any of the `RATIO_*` environment variables that are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str, default: f64| -> Result<f64> {
            match lookup(key) {
                Some(raw) => {
                    let value = raw.trim().parse::<f64>().map_err(|_| {
                        MetricsError::InvalidThreshold(format!("{}={} is not a number", key, raw))
                    })?;
                    tracing::debug!(key, value, "Threshold override from environment");
                    Ok(value)
                }
                None => Ok(default),
            }
        };

        let defaults = Self::default();
        Self::new(
            parse(ALTMAN_DISTRESS_ENV, defaults.altman_distress)?,
            parse(ALTMAN_SAFE_ENV, defaults.altman_safe)?,
            parse(BENEISH_CUTOFF_ENV, defaults.beneish_cutoff)?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let t = ScoreThresholds::default();
        assert!(t.validate().is_ok());
        assert_eq!(t.altman_distress, 1.8);
        assert_eq!(t.beneish_cutoff, -2.22);
    }

    #[test]
    fn test_inverted_bands_rejected() {
        assert!(matches!(
            ScoreThresholds::new(3.0, 1.8, -2.22),
            Err(MetricsError::InvalidThreshold(_))
        ));
        assert!(ScoreThresholds::new(f64::NAN, 2.99, -2.22).is_err());
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> =
            [(ALTMAN_DISTRESS_ENV, "1.81"), (BENEISH_CUTOFF_ENV, " -1.78 ")].into();
        let t = ScoreThresholds::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(t.altman_distress, 1.81);
        assert_eq!(t.altman_safe, 2.99);
        assert_eq!(t.beneish_cutoff, -1.78);
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let result = ScoreThresholds::from_lookup(|k| {
            (k == ALTMAN_SAFE_ENV).then(|| "high".to_string())
        });
        assert!(matches!(result, Err(MetricsError::InvalidThreshold(_))));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let t: ScoreThresholds = serde_json::from_str(r#"{"beneish_cutoff": -1.78}"#).unwrap();
        assert_eq!(t.beneish_cutoff, -1.78);
        assert_eq!(t.altman_safe, 2.99);
    }
}
