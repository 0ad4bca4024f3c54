//! The fine trig lookup tables. Built once on first use from the same
//! formula Doom's tables were generated with, sampling the middle of
//! each fine angle.

use std::f64::consts::TAU;

use lazy_static::lazy_static;

use crate::{FRACUNIT, FixedPoint};

/// Size of the fine angle tables
pub const FINEANGLES: usize = 8192;
pub const FINEMASK: usize = FINEANGLES - 1;

lazy_static! {
    /// Sine with a quarter turn of extra entries so cosine can share it
    static ref FINESINE: Vec<FixedPoint> = (0..5 * FINEANGLES / 4)
        .map(|i| {
            let a = (i as f64 + 0.5) * TAU / FINEANGLES as f64;
            FixedPoint::new((a.sin() * FRACUNIT as f64) as i32)
        })
        .collect();
    /// Tangent over -90..90 degrees
    static ref FINETANGENT: Vec<FixedPoint> = (0..FINEANGLES / 2)
        .map(|i| {
            let a = (i as f64 - (FINEANGLES / 4) as f64 + 0.5) * TAU / FINEANGLES as f64;
            let t = (a.tan() * FRACUNIT as f64).clamp(i32::MIN as f64, i32::MAX as f64);
            FixedPoint::new(t as i32)
        })
        .collect();
}

#[inline]
pub fn finesine(index: usize) -> FixedPoint {
    FINESINE[index & FINEMASK]
}

#[inline]
pub fn finecosine(index: usize) -> FixedPoint {
    FINESINE[(index & FINEMASK) + FINEANGLES / 4]
}

/// `index` is in the range `0..FINEANGLES / 2`, where `FINEANGLES / 4` is
/// zero degrees
#[inline]
pub fn finetangent(index: usize) -> FixedPoint {
    FINETANGENT[index.min(FINEANGLES / 2 - 1)]
}
