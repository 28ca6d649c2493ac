//! Lenient readers for a JSON params object.
//!
//! Each helper takes a JSON value, a key and the current value. A missing key
//! or a value of the wrong type yields the current value unchanged, so a
//! params object can override any subset of a configuration.

use serde_json::Value;

/// Reads `params[name]` as `f64`; integers are accepted.
pub fn param_f64(params: &Value, name: &str, current: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(current)
}

/// Reads `params[name]` as a non-negative integer.
pub fn param_usize(params: &Value, name: &str, current: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(current)
}

/// Reads `params[name]` as `u32`, rejecting values that do not fit.
pub fn param_u32(params: &Value, name: &str, current: u32) -> u32 {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(current)
}

/// Reads `params[name]` as `bool`.
pub fn param_bool(params: &Value, name: &str, current: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(current)
}

/// Reads `params[name]` as a string slice, if present.
pub fn param_str<'a>(params: &'a Value, name: &str) -> Option<&'a str> {
    params.get(name).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_reads_floats_and_integers() {
        let params = json!({"damping": 0.25, "wavelength": 30});
        assert_eq!(param_f64(&params, "damping", 0.8), 0.25);
        assert_eq!(param_f64(&params, "wavelength", 50.0), 30.0);
    }

    #[test]
    fn param_f64_keeps_current_when_missing_or_mistyped() {
        let params = json!({"damping": "high", "dt": null});
        assert_eq!(param_f64(&params, "damping", 0.8), 0.8);
        assert_eq!(param_f64(&params, "dt", 0.5), 0.5);
        assert_eq!(param_f64(&params, "absent", 3.0), 3.0);
        assert_eq!(param_f64(&json!("not an object"), "dt", 7.0), 7.0);
    }

    #[test]
    fn param_usize_rejects_negative_and_fractional() {
        let params = json!({"a": 42, "b": -1, "c": 2.5});
        assert_eq!(param_usize(&params, "a", 0), 42);
        assert_eq!(param_usize(&params, "b", 5), 5);
        assert_eq!(param_usize(&params, "c", 9), 9);
    }

    #[test]
    fn param_u32_rejects_values_that_do_not_fit() {
        let params = json!({"fps": 120, "huge": 5_000_000_000_u64});
        assert_eq!(param_u32(&params, "fps", 60), 120);
        assert_eq!(param_u32(&params, "huge", 60), 60);
    }

    #[test]
    fn param_bool_reads_only_booleans() {
        let params = json!({"on": true, "num": 1});
        assert!(param_bool(&params, "on", false));
        assert!(!param_bool(&params, "num", false));
    }

    #[test]
    fn param_str_returns_none_for_non_strings() {
        let params = json!({"policy": "sinusoidal", "count": 3});
        assert_eq!(param_str(&params, "policy"), Some("sinusoidal"));
        assert_eq!(param_str(&params, "count"), None);
        assert_eq!(param_str(&params, "missing"), None);
    }
}
