//! A stand in for the BSP walk. The level is one round room cut in to
//! wedges like a pie, each with its own floor and ceiling. Walls are traced
//! per screen column and only used to work out which rows of the column
//! belong to the floor and the ceiling.

use std::f64::consts::TAU;

use glam::DVec3;
use log::warn;
use math::{Bam, FixedPoint};
use pic_data::{AnimationDef, PicAnimation, PicData};
use render_soft::{align_flat, PlaneDesc, Projection, SkyDef, VisPlaneRender};
use render_trait::{ColourmapId, FixedLight, PicSource, SecPlane, SkyTransfer, View, SKY_FLAT_FLAG};

const ROOM_RADIUS: f64 = 512.0;
const WEDGES: usize = 6;
const EYE_HEIGHT: f64 = 56.0;
/// Radius of the circle the viewer walks
const PATH_RADIUS: f64 = 160.0;
/// The fog set `PicData::demo` adds after the default one
const FOG: ColourmapId = ColourmapId(1);

const ANIMDEFS: [AnimationDef; 1] = [AnimationDef::new("NUKAGE3", "NUKAGE1", 8)];

struct Wedge {
    floor: PlaneDesc,
    ceiling: PlaneDesc,
    ceiling_height: f64,
}

/// Where a column's ray met the wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnHit {
    pub wedge: usize,
    /// First row of wall, may be off screen
    pub top: i32,
    /// Last row of wall, may be off screen
    pub bottom: i32,
}

/// Options that change how every plane is lit
#[derive(Debug, Default, Clone, Copy)]
pub struct Lighting {
    pub extralight: i32,
    pub fixed_light: Option<usize>,
    pub foggy: bool,
}

pub struct Scene {
    wedges: Vec<Wedge>,
    anims: Vec<PicAnimation>,
    pub sky: SkyDef,
}

fn flat(pics: &PicData, name: &str) -> u32 {
    match pics.flat_num_for_name(name) {
        Some(num) => num as u32,
        None => {
            warn!("Flat {name} missing from the texture set");
            0
        }
    }
}

fn corner(wedge: usize) -> (FixedPoint, FixedPoint) {
    let angle = wedge as f64 * TAU / WEDGES as f64;
    (
        FixedPoint::from_f64(ROOM_RADIUS * angle.cos()),
        FixedPoint::from_f64(ROOM_RADIUS * angle.sin()),
    )
}

impl Scene {
    pub fn new(pics: &PicData, screen_height: usize, stretch: u32, sky_palette: bool) -> Self {
        let level = |height: i32| SecPlane::floor(FixedPoint::from_int(height));
        let ceiling = |height: i32| SecPlane::ceiling(FixedPoint::from_int(height));
        let ceil = flat(pics, "CEIL3_5");
        let sky_flat = pics.sky_flat();

        // Rises towards the far wall of its wedge
        let ramp = SecPlane::from_points(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(256.0, 0.0, -16.0),
            DVec3::new(0.0, 256.0, 0.0),
            false,
        );

        let mut arrows = PlaneDesc::new(level(0), flat(pics, "FLAT5_4"), 208);
        let aligned = align_flat(corner(3), corner(4), false);
        arrows.angle = aligned.angle;
        arrows.yoffs = aligned.yoffs;

        let mut tiles = PlaneDesc::new(level(0), flat(pics, "FLOOR4_8"), 176);
        tiles.xscale = FixedPoint::from_int(2);
        tiles.yscale = FixedPoint::from_int(2);
        tiles.xoffs = FixedPoint::from_int(16);

        let wedges = vec![
            Wedge {
                floor: PlaneDesc::new(level(0), flat(pics, "FLOOR0_1"), 192),
                ceiling: PlaneDesc::new(ceiling(128), ceil, 192),
                ceiling_height: 128.0,
            },
            Wedge {
                floor: PlaneDesc::new(level(0), flat(pics, "NUKAGE1"), 160),
                ceiling: PlaneDesc::new(ceiling(192), sky_flat, 160),
                ceiling_height: 192.0,
            },
            Wedge {
                floor: PlaneDesc::new(ramp, flat(pics, "FLOOR0_1"), 144),
                ceiling: PlaneDesc::new(ceiling(160), ceil, 144),
                ceiling_height: 160.0,
            },
            Wedge {
                floor: arrows,
                ceiling: PlaneDesc::new(ceiling(192), SKY_FLAT_FLAG, 208),
                ceiling_height: 192.0,
            },
            Wedge {
                floor: PlaneDesc::new(level(0), flat(pics, "FWATER1"), 128),
                ceiling: PlaneDesc::new(ceiling(192), SKY_FLAT_FLAG | 1, 128),
                ceiling_height: 192.0,
            },
            Wedge {
                floor: tiles,
                ceiling: PlaneDesc::new(ceiling(128), ceil, 176),
                ceiling_height: 128.0,
            },
        ];

        let sky_texture = |name: &str| match pics.wallpic_num_for_name(name) {
            Some(num) => num,
            None => {
                warn!("Sky {name} missing from the texture set");
                0
            }
        };
        let mut sky = SkyDef::new(sky_texture("SKY1"), sky_texture("SKY2"), screen_height);
        sky.stretch = stretch;
        sky.sky_palette = sky_palette;
        sky.transfers.push(SkyTransfer {
            texture: sky_texture("SKY3"),
            texture_offset: FixedPoint::from_int(64),
            row_offset: FixedPoint::from_int(20),
            no_flip: false,
        });

        Self {
            wedges,
            anims: PicAnimation::init(pics, &ANIMDEFS),
            sky,
        }
    }

    /// The viewer walks a circle around the middle of the room, looking
    /// along it and swaying a little
    pub fn view_at(&self, time: i32, lighting: Lighting) -> View {
        let t = time as f64 / 70.0;
        let (x, y) = (PATH_RADIUS * t.cos(), PATH_RADIUS * t.sin());
        let look = t + TAU / 4.0 + 0.4 * (t * 3.0).sin();
        let floor = &self.wedges[wedge_at(x, y)].floor.plane;
        let (fx, fy) = (FixedPoint::from_f64(x), FixedPoint::from_f64(y));
        View {
            x: fx,
            y: fy,
            z: floor.z_at(fx, fy) + FixedPoint::from_f64(EYE_HEIGHT),
            angle: Bam::from_radians(look.rem_euclid(TAU)),
            extralight: lighting.extralight,
            fixed_light: match lighting.fixed_light {
                Some(level) => FixedLight::Level(level),
                None => FixedLight::None,
            },
            foggy: lighting.foggy,
            time,
        }
    }

    /// Step the animated flats and sky scroll to `time`
    pub fn animate(&mut self, pics: &mut PicData, time: i32) {
        for anim in self.anims.iter() {
            anim.update(pics, time.max(0) as usize);
        }
        self.sky.scroll = time << 12;
    }

    /// Find the wall in every column of the screen
    pub fn trace(&self, view: &View, proj: &Projection) -> Vec<ColumnHit> {
        let vx = view.x.to_f64();
        let vy = view.y.to_f64();
        let vz = view.z.to_f64();
        let focal = proj.focal_y.to_f64();
        let centery = proj.centery as f64;

        (0..proj.width as usize)
            .map(|x| {
                let relative = proj.xtoviewangle[x];
                let (dy, dx) = (view.angle + relative).to_radians().sin_cos();
                // Ray against the room's circle, from inside
                let b = vx * dx + vy * dy;
                let c = vx * vx + vy * vy - ROOM_RADIUS * ROOM_RADIUS;
                let t = -b + (b * b - c).max(0.0).sqrt();
                let (hx, hy) = (vx + dx * t, vy + dy * t);
                let wedge = wedge_at(hx, hy);
                let perp = (t * relative.to_radians().cos()).max(1.0);

                let w = &self.wedges[wedge];
                let floor_z = w
                    .floor
                    .plane
                    .z_at(FixedPoint::from_f64(hx), FixedPoint::from_f64(hy))
                    .to_f64();
                ColumnHit {
                    wedge,
                    top: (centery - (w.ceiling_height - vz) * focal / perp).ceil() as i32,
                    bottom: (centery + (vz - floor_z) * focal / perp).floor() as i32,
                }
            })
            .collect()
    }

    /// Mark the floor and ceiling rows of every column, the way the wall
    /// code does while walking segs. Returns the number of runs of columns
    /// that hit the same wedge.
    pub fn mark(&self, view: &View, render: &mut VisPlaneRender) -> usize {
        let hits = self.trace(view, render.projection());
        let mut runs = 0;
        let mut start = 0;
        while start < hits.len() {
            let wedge = hits[start].wedge;
            let mut stop = start;
            while stop + 1 < hits.len() && hits[stop + 1].wedge == wedge {
                stop += 1;
            }
            self.mark_run(render, &hits[start..=stop], start, view.foggy);
            runs += 1;
            start = stop + 1;
        }
        runs
    }

    fn mark_run(&self, render: &mut VisPlaneRender, hits: &[ColumnHit], start: usize, foggy: bool) {
        let wedge = &self.wedges[hits[0].wedge];
        let (mut floor, mut ceiling) = (wedge.floor, wedge.ceiling);
        if foggy {
            floor.colourmap = FOG;
            ceiling.colourmap = FOG;
        }
        let stop = start + hits.len() - 1;
        let planes = &mut render.visplanes;
        let floorplane = planes.find_or_create(floor, start as i32, stop as i32);
        let ceilingplane = planes.find_or_create(ceiling, start as i32, stop as i32);

        let clip = &mut render.portal_clip;
        for (x, hit) in (start..=stop).zip(hits) {
            let top = clip.ceilingclip[x] + 1;
            let bottom = clip.floorclip[x] - 1;

            let ceiling_end = (hit.top - 1).min(bottom);
            if top <= ceiling_end {
                planes.set_column(ceilingplane, x as i32, top as u32, ceiling_end as u32);
            }
            let floor_start = (hit.bottom + 1).max(top);
            if floor_start <= bottom {
                planes.set_column(floorplane, x as i32, floor_start as u32, bottom as u32);
            }

            // Solid wall, nothing further away shows through
            clip.ceilingclip[x] = ceiling_end.max(clip.ceilingclip[x]);
            clip.floorclip[x] = floor_start.min(clip.floorclip[x]);
        }

        // Keep the clip of the run for things drawn later
        let base = clip.alloc_openings(hits.len());
        clip.openings[base..base + hits.len()].copy_from_slice(&clip.floorclip[start..=stop]);
    }
}

fn wedge_at(x: f64, y: f64) -> usize {
    let angle = y.atan2(x).rem_euclid(TAU);
    ((angle / TAU * WEDGES as f64) as usize).min(WEDGES - 1)
}

#[cfg(test)]
mod tests {
    use super::{wedge_at, Lighting, Scene, WEDGES};
    use math::Bam;
    use pic_data::PicData;
    use render_soft::{PixelDrawer, VisPlaneRender};
    use render_target::DrawBuffer;
    use render_trait::{PicSource, PixelBuffer};

    const W: usize = 160;
    const H: usize = 100;

    fn setup() -> (PicData, Scene, VisPlaneRender) {
        let pics = PicData::demo();
        let scene = Scene::new(&pics, H, 0, false);
        let render = VisPlaneRender::new(W, H, Bam::from_degrees(90.0), pics.sky_flat());
        (pics, scene, render)
    }

    #[test]
    fn wedges_cover_the_circle() {
        assert_eq!(wedge_at(1.0, 0.01), 0);
        assert_eq!(wedge_at(-1.0, 0.01), 2);
        assert_eq!(wedge_at(-1.0, -0.01), 3);
        assert_eq!(wedge_at(1.0, -0.01), WEDGES - 1);
    }

    #[test]
    fn walls_sit_across_the_horizon() {
        let (_, scene, render) = setup();
        let view = scene.view_at(0, Lighting::default());
        let hits = scene.trace(&view, render.projection());
        assert_eq!(hits.len(), W);
        for hit in hits {
            assert!(hit.top < H as i32 / 2);
            assert!(hit.bottom >= H as i32 / 2);
            assert!(hit.wedge < WEDGES);
        }
    }

    #[test]
    fn every_row_is_floor_ceiling_or_wall() {
        let (_, scene, mut render) = setup();
        let view = scene.view_at(100, Lighting::default());
        render.begin_frame();
        assert!(scene.mark(&view, &mut render) >= 1);

        let hits = scene.trace(&view, render.projection());
        for (x, hit) in hits.iter().enumerate() {
            let mut rows = 0;
            for (_, plane) in render.visplanes.iter() {
                if plane.is_mapped(x as i32) && plane.top(x as i32) <= plane.bottom(x as i32) {
                    rows += plane.bottom(x as i32) - plane.top(x as i32) + 1;
                }
            }
            let wall = (hit.bottom.min(H as i32 - 1) - hit.top.max(0) + 1).max(0) as u32;
            assert_eq!(rows + wall, H as u32, "column {x}");
        }
        assert!(render.alloc_openings(0) >= W);
    }

    #[test]
    fn frames_draw() {
        let (mut pics, mut scene, mut render) = setup();
        let mut buffer = DrawBuffer::new(W, H);
        for time in [0, 90, 200] {
            let view = scene.view_at(time, Lighting::default());
            scene.animate(&mut pics, time);
            buffer.clear_with_colour(&[1, 2, 3, 255]);
            render.begin_frame();
            scene.mark(&view, &mut render);
            let mut drawer = PixelDrawer::new(&mut buffer, pics.palette());
            let stats = render.draw_planes(&view, &scene.sky, &mut pics, &mut drawer);
            assert!(stats.planes >= 2, "{stats:?}");
            assert_eq!(stats.skipped, 0);
            // Top and bottom rows are always ceiling and floor
            assert_ne!(buffer.read_pixel(W / 2, 0), [1, 2, 3, 255]);
            assert_ne!(buffer.read_pixel(W / 2, H - 1), [1, 2, 3, 255]);
            pics.evict_unused();
        }
    }

    #[test]
    fn fog_and_fixed_light_reach_the_view() {
        let (_, scene, _) = setup();
        let lighting = Lighting {
            extralight: 2,
            fixed_light: Some(5),
            foggy: true,
        };
        let view = scene.view_at(3, lighting);
        assert_eq!(view.extralight, 2);
        assert!(view.foggy);
        assert_eq!(view.fixed_light, render_trait::FixedLight::Level(5));
    }
}
