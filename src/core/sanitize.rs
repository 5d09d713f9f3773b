//! Boundary coercion for user-supplied amounts.
//!
//! The calculators assume non-negative finite inputs. Callers at the edge
//! (HTTP payloads, CLI flags) run raw numbers through these helpers first,
//! mirroring the `x || 0` coercion the web forms apply.

pub fn amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Like [`amount`] but accepts missing values.
pub fn optional_amount(value: Option<f64>, default: f64) -> f64 {
    amount(value.unwrap_or(default))
}
