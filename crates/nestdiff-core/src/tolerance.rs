//! Numeric-tolerance equality.

use crate::value::Value;

/// Default relative tolerance, the machine epsilon for `f64`.
pub const EPSILON: f64 = f64::EPSILON;

/// Decide whether two values differ, allowing numeric noise.
///
/// - structurally equal values never differ
/// - NaN only equals NaN
/// - two numbers (int or float) differ iff they are not within
///   `max(tolerance * max(|a|, |b|), absolute_tolerance)` of each other
/// - anything else that is not equal differs
pub fn are_different(
    first: &Value,
    second: &Value,
    tolerance: f64,
    absolute_tolerance: Option<f64>,
) -> bool {
    if first == second {
        return false;
    }

    let (first_nan, second_nan) = (first.is_nan(), second.is_nan());
    if first_nan || second_nan {
        return !(first_nan && second_nan);
    }

    match (first.as_f64(), second.as_f64()) {
        (Some(a), Some(b)) => !is_close(a, b, tolerance, absolute_tolerance.unwrap_or(0.0)),
        _ => true,
    }
}

fn is_close(a: f64, b: f64, rel_tol: f64, abs_tol: f64) -> bool {
    if a == b {
        return true;
    }
    // Infinities are only close to themselves, handled above
    if a.is_infinite() || b.is_infinite() {
        return false;
    }
    let diff = (a - b).abs();
    diff <= f64::max(rel_tol * f64::max(a.abs(), b.abs()), abs_tol)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn differ(a: impl Into<Value>, b: impl Into<Value>) -> bool {
        are_different(&a.into(), &b.into(), EPSILON, None)
    }

    #[test]
    fn test_within_epsilon_is_equal() {
        assert!(!differ(1.0, 1.0 + EPSILON / 2.0));
    }

    #[test]
    fn test_distinct_numbers_differ() {
        assert!(differ(1.0, 2.0));
    }

    #[test]
    fn test_nan_handling() {
        assert!(!differ(f64::NAN, f64::NAN));
        assert!(differ(f64::NAN, 1.0));
        assert!(differ(1.0, f64::NAN));
    }

    #[test]
    fn test_int_and_float_compare_numerically() {
        assert!(!differ(1i64, 1.0));
        assert!(differ(1i64, 1.5));
    }

    #[test]
    fn test_absolute_tolerance() {
        let a = Value::from(100.0);
        let b = Value::from(100.4);
        assert!(are_different(&a, &b, EPSILON, None));
        assert!(!are_different(&a, &b, EPSILON, Some(0.5)));
    }

    #[test]
    fn test_relative_tolerance() {
        let a = Value::from(1000.0);
        let b = Value::from(1001.0);
        assert!(!are_different(&a, &b, 0.01, None));
        assert!(are_different(&a, &b, 0.0001, None));
    }

    #[test]
    fn test_infinity_not_close_to_finite() {
        assert!(differ(f64::INFINITY, 1e308));
        assert!(!differ(f64::INFINITY, f64::INFINITY));
    }

    #[test]
    fn test_non_numeric_types() {
        assert!(differ("a", "b"));
        assert!(!differ("a", "a"));
        assert!(differ("1", 1i64));
        assert!(differ(true, 1i64));
    }
}
