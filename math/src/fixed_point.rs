use crate::{double_to_fixed, fixed_to_double, fixed_to_float, float_to_fixed, FRACBITS, FRACUNIT};

/// Doom style 16.16 fixed point number.
///
/// Arithmetic wraps the way the C engine did: multiplication keeps the middle
/// 32 bits of the 64 bit product and division clamps on overflow. Comparison
/// and equality are exact on the raw bits which is what lets plane
/// descriptors be compared without a tolerance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedPoint(i32);

impl FixedPoint {
    pub const ZERO: Self = Self(0);
    pub const UNIT: Self = Self(FRACUNIT);
    pub const MAX: Self = Self(i32::MAX);
    pub const MIN: Self = Self(i32::MIN);

    #[inline]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Whole number to fixed
    #[inline]
    pub const fn from_int(value: i32) -> Self {
        Self(value << FRACBITS)
    }

    /// The raw `fixed_t` bits
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer part, rounded towards negative infinity
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRACBITS
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        fixed_to_float(self.0)
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        fixed_to_double(self.0)
    }

    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Self(double_to_fixed(value))
    }

    /// FixedMul
    #[inline]
    pub const fn fixed_mul(self, rhs: Self) -> Self {
        Self(((self.0 as i64 * rhs.0 as i64) >> FRACBITS) as i32)
    }

    /// FixedDiv, including its overflow check which clamps
    /// to `MIN`/`MAX` instead of faulting.
    #[inline]
    pub const fn fixed_div(self, rhs: Self) -> Self {
        if (self.0.unsigned_abs() >> 14) >= rhs.0.unsigned_abs() {
            return if (self.0 ^ rhs.0) < 0 {
                Self::MIN
            } else {
                Self::MAX
            };
        }
        Self((((self.0 as i64) << FRACBITS) / rhs.0 as i64) as i32)
    }
}

impl From<f32> for FixedPoint {
    fn from(value: f32) -> Self {
        Self(float_to_fixed(value))
    }
}

impl From<i32> for FixedPoint {
    fn from(value: i32) -> Self {
        Self(value << FRACBITS)
    }
}

impl From<FixedPoint> for f32 {
    fn from(value: FixedPoint) -> Self {
        fixed_to_float(value.0)
    }
}

impl From<FixedPoint> for f64 {
    fn from(value: FixedPoint) -> Self {
        fixed_to_double(value.0)
    }
}

impl From<FixedPoint> for i32 {
    fn from(value: FixedPoint) -> Self {
        value.0 >> FRACBITS
    }
}

impl std::ops::Add for FixedPoint {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl std::ops::AddAssign for FixedPoint {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl std::ops::Sub for FixedPoint {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl std::ops::SubAssign for FixedPoint {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

impl std::ops::Mul for FixedPoint {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.fixed_mul(rhs)
    }
}

/// Scale by a plain integer, as in `(y - centery) * dc_iscale`
impl std::ops::Mul<i32> for FixedPoint {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self(self.0.wrapping_mul(rhs))
    }
}

impl std::ops::Div for FixedPoint {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.fixed_div(rhs)
    }
}

impl std::ops::Neg for FixedPoint {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl std::ops::Shl<u32> for FixedPoint {
    type Output = Self;

    #[inline]
    fn shl(self, rhs: u32) -> Self {
        Self(self.0.wrapping_shl(rhs))
    }
}

impl std::ops::Shr<u32> for FixedPoint {
    type Output = Self;

    #[inline]
    fn shr(self, rhs: u32) -> Self {
        Self(self.0 >> rhs)
    }
}
