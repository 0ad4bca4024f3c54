mod angle;
mod fixed_point;
mod trig;

pub use angle::*;
pub use fixed_point::*;
pub use trig::*;

pub const FRACBITS: i32 = 16;
pub const FRACUNIT: i32 = 1 << FRACBITS;

/// Convert a Doom `fixed_t` fixed-point float to `f32`
#[inline]
pub const fn fixed_to_float(value: i32) -> f32 {
    value as f32 / FRACUNIT as f32
}

/// Convert a Doom `fixed_t` fixed-point float to `f64`. Used where the
/// slope maths needs the extra precision for cross products.
#[inline]
pub const fn fixed_to_double(value: i32) -> f64 {
    value as f64 / FRACUNIT as f64
}

/// Convert a float to Doom `fixed_t`. Out of range values saturate.
#[inline]
pub fn float_to_fixed(value: f32) -> i32 {
    (value * FRACUNIT as f32) as i32
}

#[inline]
pub fn double_to_fixed(value: f64) -> i32 {
    (value * FRACUNIT as f64) as i32
}

#[cfg(test)]
mod tests {
    use super::{double_to_fixed, fixed_to_double, fixed_to_float, float_to_fixed, FRACUNIT};

    #[test]
    #[allow(clippy::float_cmp)]
    fn convert_fixed() {
        assert_eq!(fixed_to_float(FRACUNIT), 1.0);
        assert_eq!(fixed_to_float(FRACUNIT / 2), 0.5);
        assert_eq!(fixed_to_double(-FRACUNIT * 3), -3.0);
        assert_eq!(float_to_fixed(0.25), FRACUNIT / 4);
        assert_eq!(double_to_fixed(-1.5), -(FRACUNIT + FRACUNIT / 2));
    }

    #[test]
    fn saturates_out_of_range() {
        assert_eq!(float_to_fixed(1.0e9), i32::MAX);
        assert_eq!(double_to_fixed(-1.0e9), i32::MIN);
    }
}
