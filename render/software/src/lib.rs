//! Software rasterizer for floors, ceilings and skies.
//!
//! The scene walk (walls, BSP) marks which screen columns each floor or
//! ceiling covers through [`VisPlanes`]. At the end of the frame
//! [`VisPlaneRender::draw_planes`] turns every plane in to horizontal spans,
//! or columns for skies, and hands them to a [`PlaneDrawer`].

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use log::{trace, warn};
use math::Bam;
use render_trait::{PicSource, View};

mod defs;
mod draw;
mod lighting;
mod planes;
mod portals;
#[cfg(test)]
mod recorder;
mod sky;
mod slopes;
mod spans;
mod utilities;
mod warp;

pub use defs::{is_sky, PlaneDesc, PlaneId, Visplane, MAXVISPLANES, UNMAPPED};
pub use draw::{DrawColumn, DrawSpan, PixelDrawer, PlaneDrawer, SlopeSpan};
pub use lighting::{fixed_table, ZLight, LIGHTLEVELS, MAXLIGHTZ, NUMCOLORMAPS};
pub use planes::{draw_level_plane, map_level_plane, LevelPlane, VisPlanes};
pub use portals::PortalClip;
pub use sky::{draw_sky, SkyDef, SkyState, ANGLETOSKYSHIFT};
pub use slopes::{draw_sloped_plane, map_sloped_plane, SlopedPlane};
pub use spans::make_spans;
pub use utilities::{align_flat, point_to_angle, screen_to_angle, FlatAlignment, Projection};
pub use warp::{warp_flat, FlatWarp};

/// What one call of `draw_planes` did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlaneStats {
    /// Planes that put something on screen
    pub planes: usize,
    pub skies: usize,
    pub level: usize,
    pub sloped: usize,
    /// Empty planes, and planes with no texture to draw with
    pub skipped: usize,
    pub spans: usize,
    pub columns: usize,
}

/// Everything the plane renderer keeps between frames. Construct once per
/// screen size, call `begin_frame` before the scene walk and `draw_planes`
/// after it.
pub struct VisPlaneRender {
    pub visplanes: VisPlanes,
    pub portal_clip: PortalClip,
    projection: Projection,
    /// Left edge of the span open on each row
    spanstart: Vec<i32>,
    zlight: ZLight,
    warp: FlatWarp,
}

impl VisPlaneRender {
    pub fn new(screen_width: usize, screen_height: usize, fov: Bam, sky_flat: u32) -> Self {
        Self {
            visplanes: VisPlanes::new(screen_width, screen_height, sky_flat),
            portal_clip: PortalClip::new(screen_width, screen_height),
            projection: Projection::new(screen_width, screen_height, fov),
            spanstart: vec![0; screen_height],
            zlight: ZLight::new(),
            warp: FlatWarp::new(),
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Reset the clip buffers and return every plane to the pool.
    ///
    /// Doom function name `R_ClearPlanes`
    pub fn begin_frame(&mut self) {
        self.portal_clip.clear();
        self.visplanes.clear_planes();
    }

    /// Rebuild every per column and per row buffer for a new screen size.
    /// All planes are dropped.
    ///
    /// Doom function name `R_PlaneInitData`
    pub fn resize(&mut self, screen_width: usize, screen_height: usize) {
        self.visplanes.resize(screen_width, screen_height);
        self.portal_clip.resize(screen_width, screen_height);
        self.projection = Projection::new(screen_width, screen_height, self.projection.fov);
        self.spanstart = vec![0; screen_height];
    }

    /// Change the field of view without touching the planes
    pub fn set_fov(&mut self, fov: Bam) {
        let (w, h) = (self.projection.width as usize, self.projection.height as usize);
        self.projection = Projection::new(w, h, fov);
    }

    pub fn alloc_openings(&mut self, len: usize) -> usize {
        self.portal_clip.alloc_openings(len)
    }

    /// Draw every plane marked this frame.
    ///
    /// Doom function name `R_DrawPlanes`
    pub fn draw_planes(
        &mut self,
        view: &View,
        sky: &SkyDef,
        pics: &mut impl PicSource,
        drawer: &mut impl PlaneDrawer,
    ) -> PlaneStats {
        #[cfg(feature = "hprof")]
        profile!("draw_planes");
        let mut stats = PlaneStats::default();
        let sky_flat = self.visplanes.sky_flat();

        for bucket in 0..MAXVISPLANES {
            let mut next = self.visplanes.bucket_head(bucket);
            while let Some(id) = next {
                next = self.visplanes.plane(id).next;
                let plane = self.visplanes.plane_mut(id);
                if plane.is_empty() {
                    stats.skipped += 1;
                    continue;
                }

                if plane.is_sky(sky_flat) {
                    stats.columns += draw_sky(plane, sky_flat, view, &self.projection, sky, pics, drawer);
                    stats.skies += 1;
                    stats.planes += 1;
                    continue;
                }

                let pic = plane.desc.pic as usize;
                let pic = if pic < pics.num_flats() { pic } else { 0 };
                let mut flat = pics.flat_translation(pic);
                if !pics.acquire_flat(flat) {
                    warn!("Flat {flat} missing, using flat 0");
                    flat = 0;
                    if !pics.acquire_flat(0) {
                        warn!("No flat to draw plane {id:?} with");
                        stats.skipped += 1;
                        continue;
                    }
                }

                {
                    let pics = &*pics;
                    let source = if pics.flat_warps(flat) {
                        self.warp.warped(flat, pics.flat(flat), view.time)
                    } else {
                        pics.flat(flat)
                    };

                    if plane.desc.plane.is_level() {
                        stats.spans += draw_level_plane(
                            plane,
                            view,
                            &self.projection,
                            &self.zlight,
                            &mut self.spanstart,
                            source,
                            pics,
                            drawer,
                        );
                        stats.level += 1;
                    } else {
                        stats.spans += draw_sloped_plane(
                            plane,
                            view,
                            &self.projection,
                            &mut self.spanstart,
                            source,
                            pics,
                            drawer,
                        );
                        stats.sloped += 1;
                    }
                }
                stats.planes += 1;
                pics.release_flat(flat);
            }
        }

        trace!("Planes: {stats:?}");
        stats
    }
}

#[cfg(test)]
mod tests {
    use crate::defs::{PlaneDesc, MAXVISPLANES};
    use crate::recorder::{addr, RecordingDrawer};
    use crate::sky::SkyDef;
    use crate::VisPlaneRender;
    use glam::DVec3;
    use math::{Bam, FixedPoint, ANG90};
    use pic_data::PicData;
    use render_trait::{PicSource, SecPlane, View};

    const W: usize = 320;
    const H: usize = 200;

    fn setup() -> (VisPlaneRender, PicData, SkyDef) {
        let pics = PicData::demo();
        let render = VisPlaneRender::new(W, H, Bam(ANG90), pics.sky_flat());
        (render, pics, SkyDef::new(0, 1, H))
    }

    fn view() -> View {
        View {
            z: FixedPoint::from_int(41),
            ..View::default()
        }
    }

    fn d1(pic: u32) -> PlaneDesc {
        PlaneDesc::new(SecPlane::floor(FixedPoint::ZERO), pic, 128)
    }

    #[test]
    fn default_vis_plane_render() {
        let (mut rd, _, _) = setup();
        rd.begin_frame();
        assert_eq!(rd.visplanes.live_count(), 0);
        assert_eq!(rd.portal_clip.floorclip[0], H as i32);
    }

    #[test]
    fn extend_scenario() {
        let (mut rd, _, _) = setup();
        rd.begin_frame();
        let id = rd.visplanes.find_or_create(d1(5), 10, 50);
        let extended = rd.visplanes.check_plane(id, 51, 100);
        assert_eq!(id, extended);
        assert_eq!(rd.visplanes.live_count(), 1);
        let plane = rd.visplanes.plane(id);
        assert_eq!((plane.minx, plane.maxx), (10, 100));
    }

    #[test]
    fn separate_texture_scenario() {
        let (mut rd, _, _) = setup();
        rd.begin_frame();
        let a = rd.visplanes.find_or_create(d1(5), 10, 50);
        let b = rd.visplanes.find_or_create(d1(6), 10, 50);
        assert_ne!(a, b);
        assert_eq!(rd.visplanes.live_count(), 2);
        assert_eq!(rd.visplanes.plane(a).desc.pic, 5);
        assert_eq!(rd.visplanes.plane(b).desc.pic, 6);
    }

    #[test]
    fn empty_planes_are_skipped() {
        let (mut rd, mut pics, sky) = setup();
        rd.begin_frame();
        rd.visplanes.find_plane(d1(0));
        let mut drawer = RecordingDrawer::default();
        let stats = rd.draw_planes(&view(), &sky, &mut pics, &mut drawer);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.planes, 0);
        assert!(drawer.spans.is_empty());
        assert_eq!(pics.flat_refs(0), 0);
    }

    #[test]
    fn begin_frame_returns_everything() {
        let (mut rd, _, _) = setup();
        for frame in 0..3 {
            rd.begin_frame();
            assert_eq!(rd.visplanes.live_count(), 0);
            for pic in 0..(MAXVISPLANES as u32 * 2) {
                let id = rd.visplanes.find_or_create(d1(pic), 0, 10);
                rd.visplanes.set_column(id, 0, 150, 160);
            }
            assert_eq!(rd.visplanes.live_count(), MAXVISPLANES * 2);
            // Later frames reuse what the first one made
            assert_eq!(rd.visplanes.allocated(), MAXVISPLANES * 2, "frame {frame}");
        }
        rd.begin_frame();
        assert_eq!(rd.visplanes.free_count(), MAXVISPLANES * 2);
    }

    #[test]
    fn whole_frame() {
        let (mut rd, mut pics, sky) = setup();
        let sky_flat = pics.sky_flat();
        let nukage = pics.flat_num_for_name("NUKAGE1").unwrap();
        let mut view = view();
        view.time = 5;

        rd.begin_frame();
        let floor = rd.visplanes.find_or_create(d1(0), 0, W as i32 - 1);
        let liquid = rd.visplanes.find_or_create(d1(nukage as u32), 0, 99);
        let heaven = rd.visplanes.find_or_create(
            PlaneDesc::new(SecPlane::ceiling(FixedPoint::from_int(128)), sky_flat, 200),
            0,
            W as i32 - 1,
        );
        for x in 0..W as i32 {
            rd.visplanes.set_column(heaven, x, 0, 60);
            if x < 100 {
                rd.visplanes.set_column(liquid, x, 150, 199);
                rd.visplanes.set_column(floor, x, 120, 149);
            } else {
                rd.visplanes.set_column(floor, x, 120, 199);
            }
        }

        let mut drawer = RecordingDrawer::default();
        let stats = rd.draw_planes(&view, &sky, &mut pics, &mut drawer);
        assert_eq!(stats.planes, 3);
        assert_eq!(stats.skies, 1);
        assert_eq!(stats.level, 2);
        assert_eq!(stats.sloped, 0);
        assert_eq!(stats.columns, W);
        assert_eq!(drawer.columns.len(), W);
        assert_eq!(stats.spans, drawer.spans.len());

        // Every floor pixel drawn exactly once
        let mut expected: Vec<(i32, i32)> = (0..W as i32)
            .flat_map(|x| (120..200).map(move |y| (x, y)))
            .collect();
        expected.sort_unstable();
        assert_eq!(drawer.span_pixels(), expected);

        // Liquid comes from the warp cache, not the plain flat
        assert_eq!(rd.warp.built_for(nukage), Some(5));
        let plain = addr(pics.flat(nukage));
        assert!(drawer.spans.iter().filter(|s| s.y >= 150 && s.x1 == 0).all(|s| s.source != plain));

        // Everything acquired was given back
        assert_eq!(pics.flat_refs(0), 0);
        assert_eq!(pics.flat_refs(nukage), 0);
    }

    #[test]
    fn sloped_planes_use_slope_spans() {
        let (mut rd, mut pics, sky) = setup();
        let ramp = SecPlane::from_points(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(256.0, 0.0, 64.0),
            DVec3::new(0.0, 256.0, 0.0),
            false,
        );
        rd.begin_frame();
        let id = rd.visplanes.find_or_create(PlaneDesc::new(ramp, 1, 160), 40, 79);
        for x in 40..80 {
            rd.visplanes.set_column(id, x, 150, 159);
        }
        let mut drawer = RecordingDrawer::default();
        let stats = rd.draw_planes(&view(), &sky, &mut pics, &mut drawer);
        assert_eq!(stats.sloped, 1);
        assert_eq!(stats.spans, 10);
        assert!(drawer.spans.is_empty());
        assert_eq!(drawer.slopes.len(), 10);
        assert!(drawer.slopes.iter().all(|s| s.lights.len() == 40));
    }

    #[test]
    fn bad_pic_falls_back_to_flat_zero() {
        let (mut rd, mut pics, sky) = setup();
        rd.begin_frame();
        let id = rd.visplanes.find_or_create(d1(9999), 0, 0);
        rd.visplanes.set_column(id, 0, 190, 190);
        let mut drawer = RecordingDrawer::default();
        let stats = rd.draw_planes(&view(), &sky, &mut pics, &mut drawer);
        assert_eq!(stats.planes, 1);
        assert_eq!(drawer.spans[0].source, addr(pics.flat(0)));
    }

    #[test]
    fn resize_rebuilds() {
        let (mut rd, _, _) = setup();
        rd.begin_frame();
        rd.visplanes.find_or_create(d1(3), 0, 300);
        rd.resize(640, 400);
        assert_eq!(rd.visplanes.allocated(), 0);
        assert_eq!(rd.projection().width, 640);
        assert_eq!(rd.projection().centery, 200);
        assert_eq!(rd.portal_clip.floorclip.len(), 640);
        rd.begin_frame();
        let id = rd.visplanes.find_or_create(d1(3), 600, 639);
        rd.visplanes.set_column(id, 639, 399, 399);
    }

    #[test]
    fn set_fov_keeps_planes() {
        let (mut rd, _, _) = setup();
        rd.begin_frame();
        let id = rd.visplanes.find_or_create(d1(3), 0, 319);
        let wide = rd.projection().focal_x;
        rd.set_fov(Bam::from_degrees(60.0));
        assert!(rd.projection().focal_x > wide);
        assert_eq!(rd.projection().width, W as i32);
        assert_eq!(rd.projection().centery, H as i32 / 2);
        assert_eq!(rd.visplanes.live_count(), 1);
        rd.visplanes.set_column(id, 319, 199, 199);
    }
}
