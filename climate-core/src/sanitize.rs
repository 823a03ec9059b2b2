//! Normalization of untrusted scalars and free text.
//!
//! Everything here is total: bad input degrades to a fallback or an empty
//! string, never to an error. Values coming from the data source or the
//! geocoder go through these helpers before entering the model.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ValidationError;

/// Inclusive clamp range. A missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub const UNBOUNDED: Bounds = Bounds { min: None, max: None };
    pub const TEMPERATURE_C: Bounds = Bounds::new(-100.0, 60.0);
    pub const PRECIPITATION_MM: Bounds = Bounds::new(0.0, 500.0);
    pub const HUMIDITY_PCT: Bounds = Bounds::new(0.0, 100.0);
    pub const WIND_SPEED: Bounds = Bounds::new(0.0, 150.0);
    pub const PRESSURE_KPA: Bounds = Bounds::new(0.0, 200.0);
    pub const LATITUDE: Bounds = Bounds::new(-90.0, 90.0);
    pub const LONGITUDE: Bounds = Bounds::new(-180.0, 180.0);

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }
}

pub const DEFAULT_TEXT_MAX_LEN: usize = 120;
pub const LOCATION_NAME_MAX_LEN: usize = 80;

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s\-.'’,]").expect("static pattern"));

/// Returns `fallback` for non-finite input, otherwise `value` clamped into `bounds`.
pub fn clamp_number(value: f64, fallback: f64, bounds: Bounds) -> f64 {
    if !value.is_finite() {
        return fallback;
    }
    if let Some(min) = bounds.min {
        if value < min {
            return min;
        }
    }
    if let Some(max) = bounds.max {
        if value > max {
            return max;
        }
    }
    value
}

/// Numeric reading of a JSON scalar; `NaN` when there is none.
///
/// Numbers pass through, strings are parsed after trimming. Everything
/// else (null, booleans, arrays, objects) has no numeric reading.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

pub fn clamp_value(value: &Value, fallback: f64, bounds: Bounds) -> f64 {
    clamp_number(coerce_number(value), fallback, bounds)
}

/// Trims, collapses whitespace runs, truncates to `max_len` characters,
/// then drops anything outside letters, digits, whitespace and `-.,'’`.
pub fn sanitize_text(value: Option<&str>, max_len: usize) -> String {
    let Some(value) = value else {
        return String::new();
    };

    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    let limited: String = collapsed.chars().take(max_len).collect();

    DISALLOWED_CHARS.replace_all(&limited, "").into_owned()
}

/// Checks a user-typed location name and returns it whitespace-normalized.
pub fn validate_location_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if trimmed.chars().count() > LOCATION_NAME_MAX_LEN {
        return Err(ValidationError::TooLong { max: LOCATION_NAME_MAX_LEN });
    }

    let normalized = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    if DISALLOWED_CHARS.is_match(&normalized) {
        return Err(ValidationError::InvalidCharacters);
    }

    Ok(normalized)
}
