use std::fmt::Debug;

use math::{Bam, FixedPoint};
use render_trait::{ColourmapId, SecPlane};

/// Number of hash slots for visplanes. Not a limit on the number of planes,
/// only on how well the lookup performs. Must be a power of two.
pub const MAXVISPLANES: usize = 128;

/// A `top` entry holding this is a column the plane has not been given any
/// rows for. Larger than any valid column or row.
pub const UNMAPPED: u32 = u32::MAX;

/// Everything that has to match for two pieces of floor or ceiling to be
/// drawn as one plane. Compared bit for bit, there is no tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneDesc {
    pub plane: SecPlane,
    pub pic: u32,
    pub light_level: i32,
    pub xoffs: FixedPoint,
    pub yoffs: FixedPoint,
    pub xscale: FixedPoint,
    pub yscale: FixedPoint,
    pub angle: Bam,
    /// Lighting context, the set of colourmaps the plane is shaded with
    pub colourmap: ColourmapId,
}

impl PlaneDesc {
    /// Unscaled, unrotated, no offsets, default lighting context
    pub const fn new(plane: SecPlane, pic: u32, light_level: i32) -> Self {
        Self {
            plane,
            pic,
            light_level,
            xoffs: FixedPoint::ZERO,
            yoffs: FixedPoint::ZERO,
            xscale: FixedPoint::UNIT,
            yscale: FixedPoint::UNIT,
            angle: Bam::ZERO,
            colourmap: ColourmapId(0),
        }
    }

    /// killough's hash, empirically fairly uniform
    #[inline]
    pub(crate) fn hash(&self) -> usize {
        (self
            .pic
            .wrapping_mul(3)
            .wrapping_add(self.light_level as u32)
            .wrapping_add((self.plane.d.raw() as u32).wrapping_mul(7)) as usize)
            & (MAXVISPLANES - 1)
    }
}

/// Handle to a plane record owned by `VisPlanes`. Only valid until the next
/// `clear_planes` or `resize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneId(pub(crate) usize);

/// Now what is a visplane, anyway?
///
/// A plane description, the range of screen columns it covers, and for each
/// of those columns the rows it covers.
#[derive(Clone)]
pub struct Visplane {
    pub desc: PlaneDesc,
    pub minx: i32,
    pub maxx: i32,
    /// Indexed by `x + 1` so that the guard columns either side of the
    /// extent always exist
    top: Vec<u32>,
    /// See above.
    bottom: Vec<u32>,
    /// While the plane is live this links the hash chain of its bucket,
    /// while it is free it links the free list. Never both.
    pub(crate) next: Option<PlaneId>,
}

impl Debug for Visplane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visplane")
            .field("pic", &self.desc.pic)
            .field("light_level", &self.desc.light_level)
            .field("minx", &self.minx)
            .field("maxx", &self.maxx)
            .finish_non_exhaustive()
    }
}

impl Visplane {
    pub(crate) fn new(screen_width: usize, desc: PlaneDesc) -> Self {
        Visplane {
            desc,
            minx: screen_width as i32,
            maxx: -1,
            top: vec![UNMAPPED; screen_width + 2],
            bottom: vec![0; screen_width + 2],
            next: None,
        }
    }

    /// Set up for reuse with a new description and nothing mapped
    pub(crate) fn reset(&mut self, desc: PlaneDesc, minx: i32, maxx: i32) {
        self.desc = desc;
        self.minx = minx;
        self.maxx = maxx;
        self.top.fill(UNMAPPED);
    }

    /// Covers zero columns and is skipped when drawing
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.minx > self.maxx
    }

    #[inline]
    pub fn top(&self, x: i32) -> u32 {
        self.top[(x + 1) as usize]
    }

    #[inline]
    pub fn bottom(&self, x: i32) -> u32 {
        self.bottom[(x + 1) as usize]
    }

    #[inline]
    pub fn is_mapped(&self, x: i32) -> bool {
        self.top(x) != UNMAPPED
    }

    #[inline]
    pub(crate) fn set_top_bottom(&mut self, x: i32, top: u32, bottom: u32) {
        let i = (x + 1) as usize;
        self.top[i] = top;
        self.bottom[i] = bottom;
    }

    /// Mark the columns either side of the extent as unmapped so the span
    /// walk closes every open span without a bounds check
    pub(crate) fn set_guards(&mut self) {
        let left = self.minx - 1;
        let right = self.maxx + 1;
        self.set_top_bottom(left, UNMAPPED, 0);
        self.set_top_bottom(right, UNMAPPED, 0);
    }

    /// Number of screen columns the column arrays were made for
    pub fn screen_width(&self) -> usize {
        self.top.len() - 2
    }

    pub(crate) fn is_sky(&self, sky_flat: u32) -> bool {
        is_sky(self.desc.pic, sky_flat)
    }
}

#[inline]
pub fn is_sky(pic: u32, sky_flat: u32) -> bool {
    pic == sky_flat || pic & render_trait::SKY_FLAT_FLAG != 0
}

#[cfg(test)]
mod tests {
    use super::{PlaneDesc, Visplane, MAXVISPLANES, UNMAPPED};
    use math::FixedPoint;
    use render_trait::{SecPlane, SKY_FLAT_FLAG};

    #[test]
    fn new_plane_is_empty() {
        let vp = Visplane::new(320, PlaneDesc::new(SecPlane::floor(FixedPoint::ZERO), 1, 160));
        assert!(vp.is_empty());
        assert_eq!(vp.screen_width(), 320);
        assert_eq!(vp.top(-1), UNMAPPED);
        assert_eq!(vp.top(320), UNMAPPED);
    }

    #[test]
    fn guards_flank_extent() {
        let mut vp = Visplane::new(320, PlaneDesc::new(SecPlane::floor(FixedPoint::ZERO), 1, 160));
        vp.minx = 0;
        vp.maxx = 319;
        vp.set_top_bottom(0, 10, 20);
        vp.set_top_bottom(319, 10, 20);
        vp.set_guards();
        assert_eq!(vp.top(-1), UNMAPPED);
        assert_eq!(vp.top(320), UNMAPPED);
        assert_eq!(vp.top(0), 10);
        assert_eq!(vp.bottom(319), 20);
    }

    #[test]
    fn hash_in_range() {
        for pic in [0, 5, 99, SKY_FLAT_FLAG | 3] {
            for light in [0, 128, 255] {
                let desc = PlaneDesc::new(SecPlane::floor(FixedPoint::from(-37)), pic, light);
                assert!(desc.hash() < MAXVISPLANES);
            }
        }
    }

    #[test]
    fn sky_detection() {
        assert!(super::is_sky(7, 7));
        assert!(super::is_sky(SKY_FLAT_FLAG, 7));
        assert!(super::is_sky(SKY_FLAT_FLAG | 12, 7));
        assert!(!super::is_sky(6, 7));
    }
}
