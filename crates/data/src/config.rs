//! Lab tuning config loaded from YAML, with environment overrides.

use crate::DataError;
use labspace_kernel::LabConfig;
use std::path::Path;

/// Load a [`LabConfig`].
///
/// `None` or a missing file yields the defaults. Environment overrides
/// (`LAB_MAX_PITCH_DEG`, `LAB_MOVE_SPEED`, `LAB_BOUNDARY`) are applied last,
/// then the result is checked with [`validate_config`].
pub fn load_config(path: Option<&Path>) -> Result<LabConfig, DataError> {
    let cfg = match path {
        Some(path) if path.is_file() => {
            let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let cfg: LabConfig = serde_yaml::from_str(&text)?;
            tracing::debug!(path = %path.display(), "loaded lab config");
            cfg
        }
        Some(path) => {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            LabConfig::default()
        }
        None => LabConfig::default(),
    };
    let cfg = apply_overrides(cfg, |key| std::env::var(key).ok());
    validate_config(&cfg)?;
    Ok(cfg)
}

/// Reject bounds the store cannot clamp against.
///
/// Pitch and boundary limits must be finite and non-negative; speeds and
/// steps must be finite.
pub fn validate_config(cfg: &LabConfig) -> Result<(), DataError> {
    let bounds = [
        ("max_pitch_deg", cfg.max_pitch_deg),
        ("boundary", cfg.boundary),
    ];
    for (field, value) in bounds {
        if !value.is_finite() || value < 0.0 {
            return Err(DataError::InvalidConfig { field, value });
        }
    }
    let steps = [
        ("move_speed", cfg.move_speed),
        ("turn_step_deg", cfg.turn_step_deg),
        ("look_step_deg", cfg.look_step_deg),
    ];
    for (field, value) in steps {
        if !value.is_finite() {
            return Err(DataError::InvalidConfig { field, value });
        }
    }
    Ok(())
}

/// Apply `LAB_*` overrides read through `lookup`. Unparsable values are ignored.
pub fn apply_overrides(mut cfg: LabConfig, lookup: impl Fn(&str) -> Option<String>) -> LabConfig {
    let read = |key: &str| -> Option<f32> {
        let raw = lookup(key)?;
        match raw.parse::<f32>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                tracing::warn!(key, value = %raw, "ignoring invalid override");
                None
            }
        }
    };
    if let Some(v) = read("LAB_MAX_PITCH_DEG") {
        cfg.max_pitch_deg = v.abs();
    }
    if let Some(v) = read("LAB_MOVE_SPEED") {
        cfg.move_speed = v;
    }
    if let Some(v) = read("LAB_BOUNDARY") {
        cfg.boundary = v.abs();
    }
    cfg
}
