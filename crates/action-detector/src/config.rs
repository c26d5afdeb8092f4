//! Tunable thresholds and hold durations.
//!
//! Distances are ratios of the per-frame shoulder-width scale so that the
//! same numbers work at any camera distance or resolution.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectorConfig {
    /// Keypoints scoring below this are ignored.
    pub min_confidence: f64,
    /// Scale used when the shoulders are unusable.
    pub fallback_scale: f64,
    pub smoothing_alpha: f64,
    pub near_ratio: f64,
    pub far_ratio: f64,
    pub stretch_height_ratio: f64,
    pub drink_hold_ms: i64,
    pub stretch_hold_ms: i64,
    pub absence_target_ms: i64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            fallback_scale: 200.0,
            smoothing_alpha: 0.4,
            near_ratio: 0.20,
            far_ratio: 0.35,
            stretch_height_ratio: 0.25,
            drink_hold_ms: 2000,
            stretch_hold_ms: 1500,
            absence_target_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Give up on the task after this long without completion.
    pub timeout_ms: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { timeout_ms: 60_000 }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn overlay<T, F>(lookup: &F, key: &str, target: &mut T)
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!(key, value = %raw, "ignoring unparsable config override"),
        }
    }
}

/// Like [`overlay`], but also refuses `NaN` and infinities.
fn overlay_finite<F>(lookup: &F, key: &str, target: &mut f64)
where
    F: Fn(&str) -> Option<String>,
{
    let mut value = *target;
    overlay(lookup, key, &mut value);
    if value.is_finite() {
        *target = value;
    } else {
        tracing::warn!(key, "ignoring non-finite config override");
    }
}

impl DetectorConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `ACTION_*` overrides from `lookup` on top of `self`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        overlay_finite(&lookup, "ACTION_MIN_CONFIDENCE", &mut self.min_confidence);
        overlay_finite(&lookup, "ACTION_FALLBACK_SCALE", &mut self.fallback_scale);
        overlay_finite(&lookup, "ACTION_SMOOTHING_ALPHA", &mut self.smoothing_alpha);
        overlay_finite(&lookup, "ACTION_NEAR_RATIO", &mut self.near_ratio);
        overlay_finite(&lookup, "ACTION_FAR_RATIO", &mut self.far_ratio);
        overlay_finite(&lookup, "ACTION_STRETCH_HEIGHT_RATIO", &mut self.stretch_height_ratio);
        overlay(&lookup, "ACTION_DRINK_HOLD_MS", &mut self.drink_hold_ms);
        overlay(&lookup, "ACTION_STRETCH_HOLD_MS", &mut self.stretch_hold_ms);
        overlay(&lookup, "ACTION_ABSENCE_TARGET_MS", &mut self.absence_target_ms);
        self
    }

    /// Reads a JSON config file; omitted fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(invalid("minConfidence", "must be within [0, 1]"));
        }
        if !self.fallback_scale.is_finite() || self.fallback_scale <= 0.0 {
            return Err(invalid("fallbackScale", "must be a positive number"));
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(invalid("smoothingAlpha", "must be within (0, 1]"));
        }
        for (field, ratio) in [
            ("nearRatio", self.near_ratio),
            ("farRatio", self.far_ratio),
            ("stretchHeightRatio", self.stretch_height_ratio),
        ] {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(invalid(field, "must be a positive number"));
            }
        }
        if self.far_ratio <= self.near_ratio {
            return Err(invalid("farRatio", "must be greater than nearRatio"));
        }
        for (field, ms) in [
            ("drinkHoldMs", self.drink_hold_ms),
            ("stretchHoldMs", self.stretch_hold_ms),
            ("absenceTargetMs", self.absence_target_ms),
        ] {
            if ms <= 0 {
                return Err(invalid(field, "must be greater than zero"));
            }
        }
        Ok(())
    }

    /// Whole seconds in the absence target, as shown to the user.
    pub fn absence_target_secs(&self) -> u64 {
        (self.absence_target_ms / 1000).max(0) as u64
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        overlay(&lookup, "ACTION_SESSION_TIMEOUT_MS", &mut self.timeout_ms);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms <= 0 {
            return Err(invalid("timeoutMs", "must be greater than zero"));
        }
        Ok(())
    }
}
