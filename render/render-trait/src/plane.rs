use glam::DVec3;
use math::FixedPoint;

/// The equation of a sector floor or ceiling, `a*x + b*y + c*z + d = 0`,
/// with the normal `(a, b, c)` of unit length in fixed point. `c` is
/// positive for floors and negative for ceilings.
///
/// `invc` is kept alongside because it is what solving for `z` needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SecPlane {
    pub a: FixedPoint,
    pub b: FixedPoint,
    pub c: FixedPoint,
    pub d: FixedPoint,
    pub invc: FixedPoint,
}

impl SecPlane {
    /// A flat floor at `height`
    pub const fn floor(height: FixedPoint) -> Self {
        Self {
            a: FixedPoint::ZERO,
            b: FixedPoint::ZERO,
            c: FixedPoint::UNIT,
            d: FixedPoint::new(height.raw().wrapping_neg()),
            invc: FixedPoint::UNIT,
        }
    }

    /// A flat ceiling at `height`
    pub const fn ceiling(height: FixedPoint) -> Self {
        Self {
            a: FixedPoint::ZERO,
            b: FixedPoint::ZERO,
            c: FixedPoint::new(-FixedPoint::UNIT.raw()),
            d: height,
            invc: FixedPoint::new(-FixedPoint::UNIT.raw()),
        }
    }

    /// A plane through three map points. Floors face up and ceilings face
    /// down regardless of the winding of the points. Panics if the points
    /// are colinear or the plane is vertical.
    pub fn from_points(p1: DVec3, p2: DVec3, p3: DVec3, ceiling: bool) -> Self {
        let mut normal = (p2 - p1).cross(p3 - p1);
        if normal.length_squared() == 0.0 || normal.z == 0.0 {
            panic!("SecPlane::from_points: degenerate plane {p1} {p2} {p3}");
        }
        normal = normal.normalize();
        if (normal.z < 0.0) != ceiling {
            normal = -normal;
        }

        let c = FixedPoint::from_f64(normal.z);
        Self {
            a: FixedPoint::from_f64(normal.x),
            b: FixedPoint::from_f64(normal.y),
            c,
            d: FixedPoint::from_f64(-normal.dot(p1)),
            invc: FixedPoint::UNIT / c,
        }
    }

    /// P_IsPlaneLevel
    #[inline]
    pub fn is_level(&self) -> bool {
        self.a == FixedPoint::ZERO && self.b == FixedPoint::ZERO
    }

    /// P_PlaneZ, the height of the plane at map point `x`,`y`
    #[inline]
    pub fn z_at(&self, x: FixedPoint, y: FixedPoint) -> FixedPoint {
        if self.is_level() {
            return -self.d * self.invc;
        }
        (-self.d - self.a * x - self.b * y) * self.invc
    }
}
