use math::{finecosine, finesine, finetangent, Bam, FixedPoint, ANG180, ANG90, FINEANGLES, FRACUNIT};

/// The aspect of the original 320x200 mode. Pixels were displayed taller
/// than wide, this keeps that look at any resolution.
const OG_RATIO: f64 = 320. / 200.;

/// Screen space lookup tables for the current view size and field of view.
///
/// Doom function name `R_InitTextureMapping`, with the parts of
/// `R_ExecuteSetViewSize` that the planes need.
#[derive(Debug, Clone)]
pub struct Projection {
    pub width: i32,
    pub height: i32,
    pub centerx: i32,
    pub centery: i32,
    pub centerxfrac: FixedPoint,
    pub fov: Bam,
    /// Distance to the projection plane in pixels, horizontally
    pub focal_x: FixedPoint,
    /// Same, vertically, with the aspect correction applied
    pub focal_y: FixedPoint,
    /// The view relative angle of each screen column, `width + 1` entries
    pub xtoviewangle: Vec<Bam>,
    /// `1 / cos` of `xtoviewangle`, turns perpendicular distance in to
    /// distance along the ray of the column
    pub distscale: Vec<FixedPoint>,
    /// Perpendicular distance to a plane one unit from the eye, per row
    pub yslope: Vec<FixedPoint>,
}

impl Projection {
    /// `fov` is clamped to 1-179 degrees
    pub fn new(width: usize, height: usize, fov: Bam) -> Self {
        let fov = Bam(fov.0.clamp(Bam::from_degrees(1.0).0, Bam::from_degrees(179.0).0));
        let width_i = width as i32;
        let height_i = height as i32;
        let centerx = width_i / 2;
        let centery = height_i / 2;
        let centerxfrac = FixedPoint::from(centerx);

        // finetangent starts at -90 degrees
        let focal_x = centerxfrac.fixed_div(finetangent(FINEANGLES / 4 + fov.fine() / 2));
        let aspect = OG_RATIO * height as f64 / width.max(1) as f64;
        let focal_y = FixedPoint::from_f64(focal_x.to_f64() * aspect);

        let focal = focal_x.to_f64();
        let xtoviewangle: Vec<Bam> = (0..=width_i)
            .map(|x| screen_to_angle(x, centerx, focal))
            .collect();

        let distscale = xtoviewangle
            .iter()
            .map(|a| FixedPoint::UNIT.fixed_div(finecosine(a.fine()).abs()))
            .collect();

        let yslope = (0..height_i)
            .map(|y| {
                let dy = FixedPoint::new(((y - centery) << 16) + FRACUNIT / 2).abs();
                focal_y.fixed_div(dy)
            })
            .collect();

        Self {
            width: width_i,
            height: height_i,
            centerx,
            centery,
            centerxfrac,
            fov,
            focal_x,
            focal_y,
            xtoviewangle,
            distscale,
            yslope,
        }
    }
}

/// Used to build a table for drawing process. The table cuts out a huge amount
/// of math
pub fn screen_to_angle(x: i32, centerx: i32, focal: f64) -> Bam {
    Bam::from_radians(((centerx - x) as f64 / focal).atan())
}

/// R_PointToAngle2
pub fn point_to_angle(x1: FixedPoint, y1: FixedPoint, x2: FixedPoint, y2: FixedPoint) -> Bam {
    let dx = (x2 - x1).to_f64();
    let dy = (y2 - y1).to_f64();
    if dx == 0.0 && dy == 0.0 {
        return Bam::ZERO;
    }
    Bam::from_radians(dy.atan2(dx))
}

/// The rotation and offset that line a flat up with a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatAlignment {
    pub angle: Bam,
    pub yoffs: FixedPoint,
}

/// Align the flat of the sector on `back_side` of the line from `v1` to `v2`
/// so the texture runs along the line.
///
/// Doom function name `R_AlignFlat`
pub fn align_flat(v1: (FixedPoint, FixedPoint), v2: (FixedPoint, FixedPoint), back_side: bool) -> FlatAlignment {
    let (x, y) = v1;
    let mut angle = point_to_angle(x, y, v2.0, v2.1);
    let norm = (angle - Bam(ANG90)).fine();

    let mut dist = -(finecosine(norm) * x) - finesine(norm) * y;
    if back_side {
        angle += Bam(ANG180);
        dist = -dist;
    }

    FlatAlignment {
        angle: -angle,
        // Only the low 8 bits of the integer matter to a 64 unit flat
        yoffs: FixedPoint::new(dist.raw() & ((1 << (16 + 8)) - 1)),
    }
}
