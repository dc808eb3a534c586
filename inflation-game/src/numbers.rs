//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

// 2^63, the first f64 past i64::MAX.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Round half-up (toward positive infinity on exact halves) and saturate at
/// the i64 bounds, returning 0 for non-finite values.
#[must_use]
pub fn round_half_up_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let rounded = (value + 0.5).floor();
    if rounded >= I64_LIMIT {
        return i64::MAX;
    }
    if rounded < -I64_LIMIT {
        return i64::MIN;
    }
    cast::<f64, i64>(rounded).unwrap_or(0)
}

/// Round half-up and clamp to the i32 range, returning 0 for non-finite values.
#[must_use]
pub fn round_half_up_to_i32(value: f64) -> i32 {
    let wide = round_half_up_to_i64(value);
    i32::try_from(wide).unwrap_or(if wide < 0 { i32::MIN } else { i32::MAX })
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Clamp an energy value into the closed meter range.
#[must_use]
pub fn clamp_energy(value: i64) -> i32 {
    let clamped = value.clamp(
        i64::from(crate::constants::MIN_ENERGY),
        i64::from(crate::constants::MAX_ENERGY),
    );
    i32::try_from(clamped).unwrap_or(crate::constants::MAX_ENERGY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_values_round_up() {
        assert_eq!(round_half_up_to_i64(2.5), 3);
        assert_eq!(round_half_up_to_i64(-2.5), -2);
        assert_eq!(round_half_up_to_i64(1725.6), 1726);
        assert_eq!(round_half_up_to_i64(1725.4), 1725);
    }

    #[test]
    fn float_noise_does_not_shift_results() {
        // (1.2 - 1) * 100 evaluates to 19.999999999999996
        assert_eq!(round_half_up_to_i32((1.2 - 1.0) * 100.0), 20);
        // 10 * 1.3 evaluates to 13.000000000000002
        assert_eq!(round_half_up_to_i64(10.0 * 1.3), 13);
        assert_eq!(round_half_up_to_i32((0.85 - 1.0) * 100.0), -15);
    }

    #[test]
    fn out_of_range_values_saturate() {
        assert_eq!(round_half_up_to_i64(1e19), i64::MAX);
        assert_eq!(round_half_up_to_i64(i64_to_f64(i64::MAX)), i64::MAX);
        assert_eq!(round_half_up_to_i64(-1e19), i64::MIN);
        assert_eq!(round_half_up_to_i64(i64_to_f64(i64::MIN)), i64::MIN);
    }

    #[test]
    fn non_finite_and_out_of_range_values_are_contained() {
        assert_eq!(round_half_up_to_i64(f64::NAN), 0);
        assert_eq!(round_half_up_to_i64(f64::INFINITY), 0);
        assert_eq!(round_half_up_to_i32(1e12), i32::MAX);
        assert_eq!(round_half_up_to_i32(-1e12), i32::MIN);
    }

    #[test]
    fn energy_clamps_to_meter() {
        assert_eq!(clamp_energy(1_250), 1_000);
        assert_eq!(clamp_energy(-5), 0);
        assert_eq!(clamp_energy(640), 640);
    }
}
