//! Visplane bookkeeping and the level (flat) plane mapper.
//!
//! Records live in one arena and are linked by index. A record's `next` is
//! either the next record of its hash bucket or, once the frame is over, the
//! next record of the free list. Each bucket also tracks its tail so a whole
//! chain can be moved to the free list in one step.

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use log::debug;
use math::{finecosine, finesine, Bam, FixedPoint, ANG90};
use render_trait::{ColourmapId, LightTable, PicSource, View};

use crate::defs::{is_sky, PlaneDesc, PlaneId, Visplane, MAXVISPLANES, UNMAPPED};
use crate::draw::{DrawSpan, PlaneDrawer};
use crate::lighting::{fixed_table, ZLight};
use crate::spans::make_spans;
use crate::utilities::Projection;

pub struct VisPlanes {
    planes: Vec<Visplane>,
    buckets: [Option<PlaneId>; MAXVISPLANES],
    tails: [Option<PlaneId>; MAXVISPLANES],
    free_head: Option<PlaneId>,
    free_tail: Option<PlaneId>,
    screen_width: usize,
    screen_height: usize,
    sky_flat: u32,
}

impl VisPlanes {
    pub fn new(screen_width: usize, screen_height: usize, sky_flat: u32) -> Self {
        Self {
            planes: Vec::new(),
            buckets: [None; MAXVISPLANES],
            tails: [None; MAXVISPLANES],
            free_head: None,
            free_tail: None,
            screen_width,
            screen_height,
            sky_flat,
        }
    }

    #[inline]
    pub fn sky_flat(&self) -> u32 {
        self.sky_flat
    }

    #[inline]
    pub fn screen_width(&self) -> usize {
        self.screen_width
    }

    #[inline]
    pub fn plane(&self, id: PlaneId) -> &Visplane {
        &self.planes[id.0]
    }

    #[inline]
    pub(crate) fn plane_mut(&mut self, id: PlaneId) -> &mut Visplane {
        &mut self.planes[id.0]
    }

    #[inline]
    pub(crate) fn bucket_head(&self, bucket: usize) -> Option<PlaneId> {
        self.buckets[bucket]
    }

    /// Every live plane, bucket by bucket, newest first within a bucket
    pub fn iter(&self) -> impl Iterator<Item = (PlaneId, &Visplane)> {
        let mut bucket = 0;
        let mut next: Option<PlaneId> = None;
        std::iter::from_fn(move || {
            loop {
                if let Some(id) = next {
                    let plane = &self.planes[id.0];
                    next = plane.next;
                    return Some((id, plane));
                }
                if bucket >= MAXVISPLANES {
                    return None;
                }
                next = self.buckets[bucket];
                bucket += 1;
            }
        })
    }

    pub fn live_count(&self) -> usize {
        self.iter().count()
    }

    /// Number of records ever allocated since the last resize, live or free
    pub fn allocated(&self) -> usize {
        self.planes.len()
    }

    pub fn free_count(&self) -> usize {
        let mut count = 0;
        let mut next = self.free_head;
        while let Some(id) = next {
            count += 1;
            next = self.planes[id.0].next;
        }
        count
    }

    /// Take a record from the free list, or grow the arena, and put it at
    /// the head of `bucket`
    fn new_visplane(&mut self, bucket: usize, desc: PlaneDesc, minx: i32, maxx: i32) -> PlaneId {
        let id = match self.free_head {
            Some(id) => {
                self.free_head = self.planes[id.0].next;
                if self.free_head.is_none() {
                    self.free_tail = None;
                }
                self.planes[id.0].reset(desc, minx, maxx);
                id
            }
            None => {
                let id = PlaneId(self.planes.len());
                let mut plane = Visplane::new(self.screen_width, desc);
                plane.minx = minx;
                plane.maxx = maxx;
                self.planes.push(plane);
                debug!("Visplane arena grew to {}", self.planes.len());
                id
            }
        };

        self.planes[id.0].next = self.buckets[bucket];
        if self.buckets[bucket].is_none() {
            self.tails[bucket] = Some(id);
        }
        self.buckets[bucket] = Some(id);
        id
    }

    /// Find the plane matching `desc` exactly, or start a new one covering
    /// no columns. Sky planes ignore light level so all skies can merge.
    ///
    /// Doom function name `R_FindPlane`
    pub fn find_plane(&mut self, mut desc: PlaneDesc) -> PlaneId {
        if is_sky(desc.pic, self.sky_flat) {
            desc.light_level = 0;
        }
        let bucket = desc.hash();

        let mut next = self.buckets[bucket];
        while let Some(id) = next {
            let plane = &self.planes[id.0];
            if plane.desc == desc {
                return id;
            }
            next = plane.next;
        }

        self.new_visplane(bucket, desc, self.screen_width as i32, -1)
    }

    /// `find_plane` then `check_plane` over `start..=stop`
    pub fn find_or_create(&mut self, desc: PlaneDesc, start: i32, stop: i32) -> PlaneId {
        let id = self.find_plane(desc);
        self.check_plane(id, start, stop)
    }

    /// Make sure the plane can take rows for `start..=stop`. If none of the
    /// columns it already has in that range are mapped it grows to cover the
    /// range and is returned, otherwise a new plane with the same description
    /// is returned.
    ///
    /// Doom function name `R_CheckPlane`
    pub fn check_plane(&mut self, id: PlaneId, start: i32, stop: i32) -> PlaneId {
        self.check_range("check_plane", start, stop);

        let plane = &mut self.planes[id.0];
        let (intrl, unionl) = if start < plane.minx {
            (plane.minx, start)
        } else {
            (start, plane.minx)
        };
        let (intrh, unionh) = if stop > plane.maxx {
            (plane.maxx, stop)
        } else {
            (stop, plane.maxx)
        };

        let mut x = intrl;
        while x <= intrh && !plane.is_mapped(x) {
            x += 1;
        }
        if x > intrh {
            plane.minx = unionl;
            plane.maxx = unionh;
            return id;
        }

        let desc = plane.desc;
        self.new_visplane(desc.hash(), desc, start, stop)
    }

    /// Give the plane rows `top..=bottom` in column `x`. A `top` greater than
    /// `bottom` leaves the column with nothing to draw.
    pub fn set_column(&mut self, id: PlaneId, x: i32, top: u32, bottom: u32) {
        if x < 0 || x as usize >= self.screen_width {
            panic!("set_column: column {x} outside width {}", self.screen_width);
        }
        if top as usize >= self.screen_height || bottom as usize >= self.screen_height {
            panic!(
                "set_column: rows {top}..={bottom} outside height {}",
                self.screen_height
            );
        }
        self.planes[id.0].set_top_bottom(x, top, bottom);
    }

    /// Move every live plane to the free list. Each bucket chain is spliced
    /// on whole, so this doesn't depend on how many planes there were.
    ///
    /// Doom function name `R_ClearPlanes`
    pub fn clear_planes(&mut self) {
        for bucket in 0..MAXVISPLANES {
            let Some(head) = self.buckets[bucket].take() else {
                continue;
            };
            let tail = self.tails[bucket].take();
            match self.free_tail {
                Some(free_tail) => self.planes[free_tail.0].next = Some(head),
                None => self.free_head = Some(head),
            }
            self.free_tail = tail;
        }
    }

    /// Drop every record, live and free, and size new ones for the new
    /// screen.
    pub fn resize(&mut self, screen_width: usize, screen_height: usize) {
        debug!(
            "Dropping {} visplanes for resize to {screen_width}x{screen_height}",
            self.planes.len()
        );
        self.planes.clear();
        self.buckets = [None; MAXVISPLANES];
        self.tails = [None; MAXVISPLANES];
        self.free_head = None;
        self.free_tail = None;
        self.screen_width = screen_width;
        self.screen_height = screen_height;
    }

    fn check_range(&self, op: &str, start: i32, stop: i32) {
        if start < 0 || stop as i64 >= self.screen_width as i64 || start > stop {
            panic!(
                "{op}: bad column range {start}..={stop} for width {}",
                self.screen_width
            );
        }
    }
}

/// Everything about a level plane that doesn't change from span to span.
///
/// Doom function name `R_DrawLevelPlane`
#[derive(Debug, Clone, Copy)]
pub struct LevelPlane {
    pub xscale: FixedPoint,
    pub yscale: FixedPoint,
    /// View position in the plane's rotated texture space
    pub pviewx: FixedPoint,
    pub pviewy: FixedPoint,
    /// Texture step per screen column at unit distance
    pub xstepscale: FixedPoint,
    pub ystepscale: FixedPoint,
    pub baseangle: Bam,
    /// Height of the eye above or below the plane
    pub planeheight: FixedPoint,
    pub light_row: usize,
    pub colourmap: ColourmapId,
    pub fixed: Option<LightTable>,
}

impl LevelPlane {
    pub fn new(desc: &PlaneDesc, view: &View, proj: &Projection) -> Self {
        let fine = desc.angle.fine();
        let cosine = finecosine(fine);
        let sine = finesine(fine);
        let pviewx = view.x * cosine - view.y * sine + desc.xoffs;
        let pviewy = -(view.x * sine + view.y * cosine) + desc.yoffs;

        // left to right mapping
        let angle = (view.angle - Bam(ANG90) + desc.angle).fine();
        let xstepscale = desc.xscale * finecosine(angle).fixed_div(proj.focal_x);
        let ystepscale = desc.yscale * -finesine(angle).fixed_div(proj.focal_x);

        Self {
            xscale: desc.xscale,
            yscale: desc.yscale,
            pviewx,
            pviewy,
            xstepscale,
            ystepscale,
            baseangle: view.angle + desc.angle,
            planeheight: (desc.plane.z_at(FixedPoint::ZERO, FixedPoint::ZERO) - view.z).abs(),
            light_row: ZLight::row(desc.light_level, view.extralight, view.foggy),
            colourmap: desc.colourmap,
            fixed: fixed_table(view.fixed_light, desc.colourmap),
        }
    }
}

/// Work out the texture position, steps and lighting for one span of a level
/// plane.
///
/// Doom function name `R_MapLevelPlane`
#[allow(clippy::too_many_arguments)]
pub fn map_level_plane<'a>(
    lp: &LevelPlane,
    y: i32,
    x1: i32,
    x2: i32,
    proj: &Projection,
    zlight: &ZLight,
    source: &'a [u8],
    pics: &'a impl PicSource,
) -> DrawSpan<'a> {
    #[cfg(any(test, feature = "safety_check"))]
    {
        if x2 < x1 || x1 < 0 || x2 >= proj.width || y < 0 || y >= proj.height {
            panic!("map_level_plane: {x1}, {x2} at {y}");
        }
    }

    // Triangle scaling: height of the eye over the plane times the focal
    // length, over the row's distance from the screen centre
    let distance = lp.planeheight * proj.yslope[y as usize];
    let xstep = (lp.xstepscale * distance) << 10;
    let ystep = (lp.ystepscale * distance) << 10;

    let length = distance * proj.distscale[x1 as usize];
    let angle = (lp.baseangle + proj.xtoviewangle[x1 as usize]).fine();
    let xfrac = (lp.xscale * (lp.pviewx + finecosine(angle) * length)) << 10;
    let yfrac = (lp.yscale * (lp.pviewy - finesine(angle) * length)) << 10;

    let table = lp
        .fixed
        .unwrap_or_else(|| LightTable::new(lp.colourmap, zlight.level(lp.light_row, distance.raw())));

    DrawSpan {
        source,
        colourmap: pics.colourmap(table),
        ds_y: y,
        ds_x1: x1,
        ds_x2: x2,
        ds_xfrac: xfrac.raw() as u32,
        ds_yfrac: yfrac.raw() as u32,
        ds_xstep: xstep.raw() as u32,
        ds_ystep: ystep.raw() as u32,
    }
}

/// Draw a level plane as spans. Returns the number of spans drawn.
#[allow(clippy::too_many_arguments)]
pub fn draw_level_plane(
    plane: &mut Visplane,
    view: &View,
    proj: &Projection,
    zlight: &ZLight,
    spanstart: &mut [i32],
    source: &[u8],
    pics: &impl PicSource,
    drawer: &mut impl PlaneDrawer,
) -> usize {
    #[cfg(feature = "hprof")]
    profile!("draw_level_plane");
    let lp = LevelPlane::new(&plane.desc, view, proj);
    let mut count = 0;
    make_spans(plane, spanstart, |y, x1, x2| {
        drawer.draw_span(&map_level_plane(&lp, y, x1, x2, proj, zlight, source, pics));
        count += 1;
    });
    count
}
