//! Sloped floors and ceilings. Every pixel gets its own perspective divide,
//! set up from three points of the plane projected in to view space.

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use glam::DVec3;
use math::{double_to_fixed, finecosine, finesine, finetangent, Bam, FixedPoint, ANG90, FINEANGLES};
use render_trait::{ColourmapId, LightTable, PicSource, View, FLAT_SIZE};

use crate::defs::Visplane;
use crate::draw::{PlaneDrawer, SlopeSpan};
use crate::lighting::{fixed_table, NUMCOLORMAPS};
use crate::spans::make_spans;
use crate::utilities::Projection;

const FLAT_DIM: f64 = FLAT_SIZE as f64;

/// The texture mapping vectors and lighting terms of a sloped plane.
///
/// For a screen position `s` relative to the view centre, `s·a / s·c` and
/// `s·b / s·c` are the texture coordinates (in flats) of the point of the
/// plane behind it.
#[derive(Debug, Clone, Copy)]
pub struct SlopedPlane {
    pub a: DVec3,
    pub b: DVec3,
    pub c: DVec3,
    pub plight: f64,
    pub shade: f64,
    pub colourmap: ColourmapId,
    pub fixed: Option<LightTable>,
    /// Subtracted from every light index, zero in fog
    pub light_bias: i32,
}

/// Map point to view space: x to the right, y down the screen, z forward
fn to_view(point: DVec3, view: &View, sin: f64, cos: f64) -> DVec3 {
    let dx = point.x - view.x.to_f64();
    let dy = point.z - view.y.to_f64();
    DVec3::new(dx * sin - dy * cos, view.z.to_f64() - point.y, dx * cos + dy * sin)
}

impl SlopedPlane {
    /// Doom function name `R_DrawSlopedPlane`, the setup half
    pub fn new(plane: &Visplane, view: &View, proj: &Projection) -> Self {
        let desc = &plane.desc;
        let rot = (desc.angle + Bam(ANG90)).fine();
        let sinang = finesine(rot).to_f64();
        let cosang = finecosine(rot).to_f64();
        let xoffs = desc.xoffs.to_f64();
        let yoffs = desc.yoffs.to_f64();
        let width = FLAT_DIM * desc.xscale.to_f64();
        let height = FLAT_DIM * desc.yscale.to_f64();

        // Points are (map x, plane height, map y)
        let z_at = |x: f64, y: f64| {
            desc.plane
                .z_at(FixedPoint::from_f64(x), FixedPoint::from_f64(y))
                .to_f64()
        };
        // Anchor of the texture, offset and rotated from the map origin
        let px = -yoffs * cosang - xoffs * sinang;
        let pz = -yoffs * sinang + xoffs * cosang;
        let p = DVec3::new(px, z_at(px, pz), pz);
        // One flat width along the texture's u
        let tx = p.x - width * sinang;
        let tz = p.z + width * cosang;
        let t = DVec3::new(tx, z_at(tx, tz), tz);
        // One flat height along v
        let sx = p.x + height * cosang;
        let sz = p.z + height * sinang;
        let s = DVec3::new(sx, z_at(sx, sz), sz);

        let view_fine = view.angle.fine();
        let view_sin = finesine(view_fine).to_f64();
        let view_cos = finecosine(view_fine).to_f64();
        let p = to_view(p, view, view_sin, view_cos);
        let t = to_view(t, view, view_sin, view_cos);
        let s = to_view(s, view, view_sin, view_cos);

        let m = t - p;
        let n = s - p;
        let invfocratio = proj.focal_x.to_f64() / proj.focal_y.to_f64();
        let scale = |v: DVec3| {
            let v = v * 0.5;
            DVec3::new(v.x, v.y * invfocratio, v.z)
        };
        let a = scale(p.cross(n));
        let b = scale(m.cross(p));
        let c = scale(m.cross(n));

        // Distance lighting, from Eternity's slope lights
        let tan_half = finetangent(FINEANGLES / 4 + proj.fov.fine() / 2).to_f64();
        let ixscale = tan_half / FLAT_DIM;
        let iyscale = tan_half / FLAT_DIM;
        let zat = desc.plane.z_at(view.x, view.y).to_f64();
        let half_fov = proj.fov.to_radians().to_degrees() / 2.0;
        let slopet = (90.0 + half_fov).to_radians().tan();
        let slopevis = 8.0 * slopet * 16.0 * 320.0 / proj.width as f64;
        let plight = (slopevis * ixscale * iyscale) / (zat - view.z.to_f64());
        let shade = 256.0 * 2.0 - (desc.light_level as f64 + 16.0) * 256.0 / 128.0;

        Self {
            a,
            b,
            c,
            plight,
            shade,
            colourmap: desc.colourmap,
            fixed: fixed_table(view.fixed_light, desc.colourmap),
            light_bias: if view.foggy { 0 } else { view.extralight << 2 },
        }
    }

    /// Colourmap levels across a span of `len` pixels whose `id` runs from
    /// `id_start` to `id_end`. Worked out exactly at the ends and
    /// interpolated in fixed point between them.
    pub fn light_levels(&self, id_start: f64, id_end: f64, len: i32) -> impl Iterator<Item = usize> {
        let map1 = 256.0 - (self.shade - self.plight * id_start);
        let map2 = if len > 1 {
            256.0 - (self.shade - self.plight * id_end)
        } else {
            map1
        };
        let mapstart = double_to_fixed((256.0 - map1) / 256.0 * NUMCOLORMAPS as f64);
        let mapend = double_to_fixed((256.0 - map2) / 256.0 * NUMCOLORMAPS as f64);
        let step = if len > 1 {
            mapend.wrapping_sub(mapstart) / (len - 1)
        } else {
            0
        };
        let bias = self.light_bias;
        (0..len.max(0)).map(move |i| {
            let map = mapstart.wrapping_add(step.wrapping_mul(i));
            ((map >> 16) + 1 - bias).clamp(0, NUMCOLORMAPS - 1) as usize
        })
    }
}

/// Work out the mapping and lighting for one span of a sloped plane and draw
/// it. `lights` is scratch space for the per pixel colourmaps. Returns false
/// for an empty span.
///
/// Doom function name `R_MapSlopedPlane`
#[allow(clippy::too_many_arguments)]
pub fn map_sloped_plane<'a>(
    sp: &SlopedPlane,
    y: i32,
    x1: i32,
    x2: i32,
    proj: &Projection,
    source: &'a [u8],
    pics: &'a impl PicSource,
    lights: &mut Vec<&'a [u8]>,
    drawer: &mut impl PlaneDrawer,
) -> bool {
    let len = x2 - x1 + 1;
    if len <= 0 {
        return false;
    }

    let s = DVec3::new(
        (x1 - proj.centerx) as f64,
        (y - proj.centery) as f64 + 1.0,
        proj.focal_x.to_f64(),
    );
    let iu = s.dot(sp.a) * FLAT_DIM;
    let iv = s.dot(sp.b) * FLAT_DIM;
    let id = s.dot(sp.c);
    let iustep = sp.a.x * FLAT_DIM;
    let ivstep = sp.b.x * FLAT_DIM;
    let idstep = sp.c.x;

    lights.clear();
    match sp.fixed {
        Some(table) => {
            let map = pics.colourmap(table);
            lights.extend(std::iter::repeat_n(map, len as usize));
        }
        None => {
            let id_end = id + idstep * (x2 - x1) as f64;
            lights.extend(
                sp.light_levels(id, id_end, len)
                    .map(|level| pics.colourmap(LightTable::new(sp.colourmap, level))),
            );
        }
    }

    drawer.draw_slope_span(&SlopeSpan {
        source,
        lights: lights.as_slice(),
        ds_y: y,
        ds_x1: x1,
        ds_x2: x2,
        ds_iu: iu,
        ds_iv: iv,
        ds_id: id,
        ds_iustep: iustep,
        ds_ivstep: ivstep,
        ds_idstep: idstep,
    });
    true
}

/// Draw a sloped plane as spans. Returns the number of spans drawn.
#[allow(clippy::too_many_arguments)]
pub fn draw_sloped_plane(
    plane: &mut Visplane,
    view: &View,
    proj: &Projection,
    spanstart: &mut [i32],
    source: &[u8],
    pics: &impl PicSource,
    drawer: &mut impl PlaneDrawer,
) -> usize {
    #[cfg(feature = "hprof")]
    profile!("draw_sloped_plane");
    let sp = SlopedPlane::new(plane, view, proj);
    let mut lights = Vec::with_capacity(proj.width as usize);
    let mut count = 0;
    make_spans(plane, spanstart, |y, x1, x2| {
        if map_sloped_plane(&sp, y, x1, x2, proj, source, pics, &mut lights, drawer) {
            count += 1;
        }
    });
    count
}

#[cfg(test)]
mod tests {
    use super::{draw_sloped_plane, map_sloped_plane, SlopedPlane};
    use crate::defs::{PlaneDesc, Visplane};
    use crate::lighting::{ZLight, NUMCOLORMAPS};
    use crate::planes::{map_level_plane, LevelPlane};
    use crate::recorder::{addr, RecordingDrawer};
    use crate::utilities::Projection;
    use glam::DVec3;
    use math::{Bam, FixedPoint};
    use pic_data::PicData;
    use render_trait::{ColourmapId, FixedLight, LightTable, PicSource, SecPlane, View};

    /// Rises one unit for every four along x
    fn ramp() -> SecPlane {
        SecPlane::from_points(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(256.0, 0.0, 64.0),
            DVec3::new(0.0, 256.0, 0.0),
            false,
        )
    }

    fn sloped_plane(light: i32) -> Visplane {
        let mut vp = Visplane::new(320, PlaneDesc::new(ramp(), 0, light));
        vp.minx = 0;
        vp.maxx = 319;
        for x in 0..320 {
            vp.set_top_bottom(x, 120, 199);
        }
        vp
    }

    fn view() -> View {
        View {
            x: FixedPoint::from(-128),
            z: FixedPoint::from(41),
            ..View::default()
        }
    }

    #[test]
    fn lights_interpolate_between_ends() {
        let proj = Projection::new(320, 200, Bam::ANG90);
        let sp = SlopedPlane::new(&sloped_plane(160), &view(), &proj);

        let levels: Vec<usize> = sp.light_levels(0.5, 0.1, 16).collect();
        assert_eq!(levels.len(), 16);
        let first = *levels.first().unwrap();
        let last = *levels.last().unwrap();
        let exact = |id: f64| {
            let map = 256.0 - (sp.shade - sp.plight * id);
            let index = ((256.0 - map) / 256.0 * NUMCOLORMAPS as f64 * 65536.0) as i32 >> 16;
            (index + 1).clamp(0, NUMCOLORMAPS - 1) as usize
        };
        assert_eq!(first, exact(0.5));
        // Step rounding may leave the far end one short
        assert!(last.abs_diff(exact(0.1)) <= 1);
        // Steps one way only
        let rising = levels.windows(2).all(|w| w[0] <= w[1]);
        let falling = levels.windows(2).all(|w| w[0] >= w[1]);
        assert!(rising || falling);
    }

    #[test]
    fn single_pixel_lights() {
        let proj = Projection::new(320, 200, Bam::ANG90);
        let sp = SlopedPlane::new(&sloped_plane(160), &view(), &proj);
        assert_eq!(sp.light_levels(0.3, 99.0, 1).count(), 1);
        assert_eq!(sp.light_levels(0.3, 0.3, 0).count(), 0);
    }

    #[test]
    fn extralight_brightens_and_clamps() {
        let proj = Projection::new(320, 200, Bam::ANG90);
        let mut bright = view();
        bright.extralight = 2;
        let sp = SlopedPlane::new(&sloped_plane(160), &view(), &proj);
        let lit = SlopedPlane::new(&sloped_plane(160), &bright, &proj);
        assert_eq!(lit.light_bias, 8);

        let dark: Vec<usize> = sp.light_levels(0.01, 0.01, 4).collect();
        let lighter: Vec<usize> = lit.light_levels(0.01, 0.01, 4).collect();
        for (d, l) in dark.iter().zip(&lighter) {
            assert!(l <= d);
        }

        bright.foggy = true;
        assert_eq!(SlopedPlane::new(&sloped_plane(160), &bright, &proj).light_bias, 0);

        let all_levels = sp.light_levels(-1e9, 1e9, 32);
        assert!(all_levels.into_iter().all(|l| l < NUMCOLORMAPS as usize));
    }

    #[test]
    fn span_setup() {
        let mut pics = PicData::demo();
        assert!(pics.acquire_flat(0));
        let proj = Projection::new(320, 200, Bam::ANG90);
        let sp = SlopedPlane::new(&sloped_plane(160), &view(), &proj);

        let mut drawer = RecordingDrawer::default();
        let mut lights = Vec::new();
        assert!(map_sloped_plane(&sp, 150, 10, 40, &proj, pics.flat(0), &pics, &mut lights, &mut drawer));
        assert!(!map_sloped_plane(&sp, 150, 40, 39, &proj, pics.flat(0), &pics, &mut lights, &mut drawer));
        assert_eq!(drawer.slopes.len(), 1);

        let span = &drawer.slopes[0];
        assert_eq!((span.y, span.x1, span.x2), (150, 10, 40));
        assert_eq!(span.lights.len(), 31);
        assert_eq!(span.source, addr(pics.flat(0)));
        let s = DVec3::new(10.0 - 160.0, 150.0 - 100.0 + 1.0, proj.focal_x.to_f64());
        assert_eq!(span.iu, s.dot(sp.a) * 64.0);
        assert_eq!(span.id, s.dot(sp.c));
        assert_eq!(span.iustep, sp.a.x * 64.0);
        assert_eq!(span.idstep, sp.c.x);
    }

    #[test]
    fn fixed_light_fills_span() {
        let mut pics = PicData::demo();
        assert!(pics.acquire_flat(0));
        let proj = Projection::new(320, 200, Bam::ANG90);
        let mut v = view();
        v.fixed_light = FixedLight::Level(3);
        let sp = SlopedPlane::new(&sloped_plane(160), &v, &proj);

        let mut drawer = RecordingDrawer::default();
        let mut lights = Vec::new();
        map_sloped_plane(&sp, 150, 0, 9, &proj, pics.flat(0), &pics, &mut lights, &mut drawer);
        let expected = addr(pics.colourmap(LightTable::new(ColourmapId(0), 3)));
        assert!(drawer.slopes[0].lights.iter().all(|&l| l == expected));
    }

    #[test]
    fn level_plane_through_slope_path_is_perspective_correct() {
        // A level floor mapped the sloped way still hits the floor: along a
        // row, u/d and v/d change linearly with x
        let proj = Projection::new(320, 200, Bam::ANG90);
        let mut vp = Visplane::new(320, PlaneDesc::new(SecPlane::floor(FixedPoint::ZERO), 0, 160));
        vp.minx = 0;
        vp.maxx = 319;
        let sp = SlopedPlane::new(&vp, &view(), &proj);
        let s1 = DVec3::new(-100.0, 60.0, proj.focal_x.to_f64());
        let s2 = DVec3::new(0.0, 60.0, proj.focal_x.to_f64());
        let s3 = DVec3::new(100.0, 60.0, proj.focal_x.to_f64());
        let uv = |s: DVec3| (s.dot(sp.a) / s.dot(sp.c), s.dot(sp.b) / s.dot(sp.c));
        let (u1, v1) = uv(s1);
        let (u2, v2) = uv(s2);
        let (u3, v3) = uv(s3);
        assert!(((u2 - u1) - (u3 - u2)).abs() < 1e-6);
        assert!(((v2 - v1) - (v3 - v2)).abs() < 1e-6);
        // Looking east along a level floor, columns move along the world y
        assert!((u2 - u1).abs() > 1e-6 || (v2 - v1).abs() > 1e-6);
    }

    #[test]
    fn level_and_sloped_mappers_agree() {
        let mut pics = PicData::demo();
        assert!(pics.acquire_flat(0));
        let proj = Projection::new(320, 200, Bam::ANG90);
        let zlight = ZLight::new();
        let view = view();
        let desc = PlaneDesc::new(SecPlane::floor(FixedPoint::ZERO), 0, 160);
        let lp = LevelPlane::new(&desc, &view, &proj);
        let sp = SlopedPlane::new(&Visplane::new(320, desc), &view, &proj);

        // Level rows sample at +0.5 from the centre and sloped rows at +1,
        // which is under a texel this close to the view
        let mut drawer = RecordingDrawer::default();
        let mut lights = Vec::new();
        for y in 190..200 {
            let level = map_level_plane(&lp, y, 0, 319, &proj, &zlight, pics.flat(0), &pics);
            map_sloped_plane(&sp, y, 0, 319, &proj, pics.flat(0), &pics, &mut lights, &mut drawer);
            let sloped = drawer.slopes.last().unwrap();
            for i in 0..320u32 {
                let xfrac = level.ds_xfrac.wrapping_add(level.ds_xstep.wrapping_mul(i));
                let yfrac = level.ds_yfrac.wrapping_add(level.ds_ystep.wrapping_mul(i));
                let id = sloped.id + sloped.idstep * i as f64;
                let u = ((sloped.iu + sloped.iustep * i as f64) / id).floor() as i32;
                let v = ((sloped.iv + sloped.ivstep * i as f64) / id).floor() as i32;
                for (flat, slope) in [((xfrac >> 26) as i32, u), ((yfrac >> 26) as i32, v)] {
                    let diff = (flat - slope) & 63;
                    assert!(diff.min(64 - diff) <= 1, "row {y} pixel {i}: {flat} vs {slope}");
                }
            }
        }
    }

    #[test]
    fn draws_every_row() {
        let mut pics = PicData::demo();
        assert!(pics.acquire_flat(0));
        let proj = Projection::new(320, 200, Bam::ANG90);
        let mut vp = sloped_plane(160);
        let mut spanstart = vec![0; 200];
        let mut drawer = RecordingDrawer::default();
        let count = draw_sloped_plane(&mut vp, &view(), &proj, &mut spanstart, pics.flat(0), &pics, &mut drawer);
        assert_eq!(count, 80);
        assert!(drawer.slopes.iter().all(|s| s.x1 == 0 && s.x2 == 319 && s.lights.len() == 320));
    }
}
