//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Floor a f64 and clamp it to the u64 range, returning 0 for non-finite or negative values.
#[must_use]
pub fn floor_f64_to_u64(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    cast::<f64, u64>(value.min(max).floor()).unwrap_or(u64::MAX)
}

/// Ceil a f64 and clamp it to the u64 range, returning 0 for non-finite or negative values.
#[must_use]
pub fn ceil_f64_to_u64(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    cast::<f64, u64>(value.min(max).ceil()).unwrap_or(u64::MAX)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Convert a non-negative i64 (milliseconds, counters) to u64, saturating negatives to 0.
#[must_use]
pub fn i64_to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Round a weight to two decimal places.
#[must_use]
pub fn round_2dp(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Convert a `usize` index into f64 (location indices, pool positions).
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert elapsed seconds into whole milliseconds, rounding to nearest.
#[must_use]
pub fn secs_to_ms(secs: f64) -> i64 {
    if !secs.is_finite() {
        return 0;
    }
    cast::<f64, i64>((secs * 1000.0).round()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_handles_non_finite_and_negative() {
        assert_eq!(floor_f64_to_u64(f64::NAN), 0);
        assert_eq!(floor_f64_to_u64(-3.2), 0);
        assert_eq!(floor_f64_to_u64(9.99), 9);
        assert_eq!(floor_f64_to_u64(f64::MAX), u64::MAX);
    }

    #[test]
    fn ceil_rounds_up() {
        assert_eq!(ceil_f64_to_u64(1.01), 2);
        assert_eq!(ceil_f64_to_u64(f64::INFINITY), 0);
    }

    #[test]
    fn round_2dp_keeps_two_decimals() {
        assert!((round_2dp(3.14159) - 3.14).abs() < 1e-12);
        assert!((round_2dp(2.005_1) - 2.01).abs() < 1e-12);
        assert!(round_2dp(f64::NAN).abs() < f64::EPSILON);
    }

    #[test]
    fn signed_millis_saturate() {
        assert_eq!(i64_to_u64(-5), 0);
        assert_eq!(i64_to_u64(42), 42);
    }
}
