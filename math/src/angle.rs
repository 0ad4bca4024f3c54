use std::f64::consts::TAU;
use std::ops::{Add, AddAssign, BitXor, Neg, Shr, Sub, SubAssign};

use crate::FINEANGLES;

pub const ANG45: u32 = 0x2000_0000;
pub const ANG90: u32 = 0x4000_0000;
pub const ANG180: u32 = 0x8000_0000;
pub const ANG270: u32 = 0xc000_0000;

/// Shift a binary angle right by this to get an index in to the fine tables
pub const ANGLETOFINESHIFT: u32 = 19;

/// Binary Angle Measure. The full circle is the full range of a `u32` so all
/// arithmetic wraps for free. Doom's `angle_t`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bam(pub u32);

impl Bam {
    pub const ZERO: Bam = Bam(0);
    pub const ANG90: Bam = Bam(ANG90);
    pub const ANG180: Bam = Bam(ANG180);

    #[inline]
    pub fn from_radians(radians: f64) -> Self {
        let turns = radians.rem_euclid(TAU) / TAU;
        Bam((turns * 4_294_967_296.0).round() as u64 as u32)
    }

    #[inline]
    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    #[inline]
    pub fn to_radians(self) -> f64 {
        self.0 as f64 / 4_294_967_296.0 * TAU
    }

    /// Index in to `finesine`/`finecosine`, `angle >> ANGLETOFINESHIFT`
    #[inline]
    pub const fn fine(self) -> usize {
        (self.0 >> ANGLETOFINESHIFT) as usize & (FINEANGLES - 1)
    }
}

impl Add for Bam {
    type Output = Bam;

    #[inline]
    fn add(self, other: Bam) -> Bam {
        Bam(self.0.wrapping_add(other.0))
    }
}

impl AddAssign for Bam {
    #[inline]
    fn add_assign(&mut self, other: Bam) {
        self.0 = self.0.wrapping_add(other.0);
    }
}

impl Sub for Bam {
    type Output = Bam;

    #[inline]
    fn sub(self, other: Bam) -> Bam {
        Bam(self.0.wrapping_sub(other.0))
    }
}

impl SubAssign for Bam {
    #[inline]
    fn sub_assign(&mut self, other: Bam) {
        self.0 = self.0.wrapping_sub(other.0);
    }
}

impl Neg for Bam {
    type Output = Bam;

    #[inline]
    fn neg(self) -> Bam {
        Bam(self.0.wrapping_neg())
    }
}

/// Used by the sky to mirror the picture
impl BitXor<u32> for Bam {
    type Output = Bam;

    #[inline]
    fn bitxor(self, rhs: u32) -> Bam {
        Bam(self.0 ^ rhs)
    }
}

impl Shr<u32> for Bam {
    type Output = u32;

    #[inline]
    fn shr(self, rhs: u32) -> u32 {
        self.0 >> rhs
    }
}

#[cfg(test)]
mod tests {
    use super::{ANG180, ANG45, ANG90, Bam};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn convert_bam_to_rad() {
        assert!((Bam(ANG45).to_radians() - FRAC_PI_4).abs() < 1e-9);
        assert!((Bam(ANG90).to_radians() - FRAC_PI_2).abs() < 1e-9);
        assert!((Bam(ANG180).to_radians() - PI).abs() < 1e-9);
        assert!((Bam(1 << 26).to_radians().to_degrees() - 5.625).abs() < 1e-9);
    }

    #[test]
    fn convert_rad_to_bam() {
        assert_eq!(Bam::from_radians(FRAC_PI_2), Bam(ANG90));
        assert_eq!(Bam::from_degrees(-90.0), Bam(ANG90 * 3));
        assert_eq!(Bam::from_degrees(360.0), Bam(0));
    }

    #[test]
    fn wrapping() {
        let a = Bam(ANG180) + Bam(ANG180);
        assert_eq!(a, Bam(0));
        assert_eq!(Bam(0) - Bam(ANG90), Bam(ANG90 * 3));
        assert_eq!(Bam(ANG90).fine(), 2048);
        assert_eq!((Bam(ANG90) ^ !0).0, !ANG90);
    }
}
