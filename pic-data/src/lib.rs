//! All data and functions related to pictures the plane renderer draws with.
//! These are:
//! - Flat/span textures, built in to the cache on demand and evictable
//! - Wall pictures, used here for skies
//! - The palette
//! - Colourmap sets, one per lighting context

mod animations;
mod palette;
mod patterns;

pub use animations::*;
pub use palette::*;
pub use patterns::*;

use log::{debug, warn};
use render_trait::{ColourmapId, LightTable, PicSource};

#[derive(Debug)]
pub struct FlatPic {
    pub name: String,
    pub def: FlatDef,
    /// Drawn with the swirling liquid effect
    pub warp: bool,
    /// `None` while evicted
    data: Option<Vec<u8>>,
    refs: u32,
}

#[derive(Debug)]
pub struct WallPic {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Column major
    pub data: Vec<Vec<u8>>,
    refs: u32,
}

#[derive(Debug)]
pub struct PicData {
    /// Colours for pixels
    palette: Vec<[u8; 4]>,
    /// Each set is `COLOURMAP_LEN` maps of 256 palette indexes
    colourmaps: Vec<Vec<Colourmap>>,
    flats: Vec<FlatPic>,
    /// Used in animations
    pub(crate) flat_translation: Vec<usize>,
    walls: Vec<WallPic>,
    /// The number flats use to signify a sky should be drawn
    sky_num: u32,
}

impl PicData {
    /// An empty cache with the given palette and its default colourmaps
    pub fn new(palette: Vec<[u8; 4]>) -> Self {
        let colourmaps = vec![build_colourmaps(&palette, [0, 0, 0])];
        Self {
            palette,
            colourmaps,
            flats: Vec::new(),
            flat_translation: Vec::new(),
            walls: Vec::new(),
            sky_num: u32::MAX,
        }
    }

    /// Build the set of flats, skies and lighting used by the viewer and the
    /// tests.
    pub fn demo() -> Self {
        let mut pics = Self::new(build_palette());
        pics.add_flat("FLOOR0_1", FlatDef::Checker { a: 12 * 16 + 12, b: 13 * 16 + 9, size: 16 }, false);
        pics.add_flat("FLOOR4_8", FlatDef::Grid { base: 15 * 16 + 10, line: 15 * 16 + 5, spacing: 16 }, false);
        pics.add_flat("CEIL3_5", FlatDef::Grid { base: 16 + 9, line: 16 + 14, spacing: 32 }, false);
        pics.add_flat("FLAT5_4", FlatDef::Arrow { base: 14 * 16 + 8, arrow: 4 * 16 + 15 }, false);
        pics.add_flat("NUKAGE1", FlatDef::Rings { ramp: 5 }, true);
        pics.add_flat("NUKAGE2", FlatDef::Rings { ramp: 6 }, true);
        pics.add_flat("NUKAGE3", FlatDef::Rings { ramp: 5 }, true);
        pics.add_flat("FWATER1", FlatDef::Rings { ramp: 8 }, true);
        let sky = pics.add_flat("F_SKY1", FlatDef::Solid(0), false);
        pics.sky_num = sky as u32;

        pics.add_wall("SKY1", build_sky(256, 128, 8, 6, 0.0));
        pics.add_wall("SKY2", build_sky(256, 128, 3, 13, 1.3));
        pics.add_wall("SKY3", build_sky(256, 128, 10, 9, 2.1));

        pics.add_colourmap_set([96, 96, 112]);
        pics
    }

    /// Returns the flat number
    pub fn add_flat(&mut self, name: &str, def: FlatDef, warp: bool) -> usize {
        let num = self.flats.len();
        self.flats.push(FlatPic {
            name: name.to_string(),
            def,
            warp,
            data: None,
            refs: 0,
        });
        self.flat_translation.push(num);
        num
    }

    /// Returns the texture number. Columns must all be the same height.
    pub fn add_wall(&mut self, name: &str, data: Vec<Vec<u8>>) -> usize {
        let num = self.walls.len();
        let width = data.len();
        let height = data.first().map(|c| c.len()).unwrap_or(0);
        if width == 0 || height == 0 || data.iter().any(|c| c.len() != height) {
            panic!("add_wall: {name} has inconsistent columns");
        }
        self.walls.push(WallPic {
            name: name.to_string(),
            width,
            height,
            data,
            refs: 0,
        });
        num
    }

    /// Add a lighting context that fades towards `tint`, such as fog
    pub fn add_colourmap_set(&mut self, tint: [u8; 3]) -> ColourmapId {
        let id = ColourmapId(self.colourmaps.len() as u16);
        self.colourmaps.push(build_colourmaps(&self.palette, tint));
        id
    }

    pub fn set_sky_num(&mut self, num: u32) {
        self.sky_num = num;
    }

    pub fn flat_num_for_name(&self, name: &str) -> Option<usize> {
        self.flats.iter().position(|f| f.name == name)
    }

    pub fn wallpic_num_for_name(&self, name: &str) -> Option<usize> {
        self.walls.iter().position(|w| w.name == name)
    }

    pub fn flat_refs(&self, flat: usize) -> u32 {
        self.flats.get(flat).map(|f| f.refs).unwrap_or(0)
    }

    pub fn flat_resident(&self, flat: usize) -> bool {
        self.flats.get(flat).is_some_and(|f| f.data.is_some())
    }

    /// Drop the pixel data of every flat nobody holds. Call between frames.
    /// Returns how many were dropped.
    pub fn evict_unused(&mut self) -> usize {
        let mut count = 0;
        for flat in self.flats.iter_mut().filter(|f| f.refs == 0) {
            if flat.data.take().is_some() {
                count += 1;
            }
        }
        if count > 0 {
            debug!("Evicted {count} unused flats");
        }
        count
    }
}

impl PicSource for PicData {
    fn sky_flat(&self) -> u32 {
        self.sky_num
    }

    fn num_flats(&self) -> usize {
        self.flats.len()
    }

    fn flat_translation(&self, pic: usize) -> usize {
        self.flat_translation.get(pic).copied().unwrap_or(0)
    }

    fn flat_warps(&self, flat: usize) -> bool {
        self.flats.get(flat).is_some_and(|f| f.warp)
    }

    fn acquire_flat(&mut self, flat: usize) -> bool {
        let Some(pic) = self.flats.get_mut(flat) else {
            warn!("Tried to acquire missing flat {flat}");
            return false;
        };
        if pic.data.is_none() {
            pic.data = Some(pic.def.build());
            debug!("Built flat {}", pic.name);
        }
        pic.refs += 1;
        true
    }

    fn release_flat(&mut self, flat: usize) {
        if let Some(pic) = self.flats.get_mut(flat) {
            pic.refs = pic.refs.saturating_sub(1);
        }
    }

    fn flat(&self, flat: usize) -> &[u8] {
        match self.flats.get(flat).and_then(|f| f.data.as_deref()) {
            Some(data) => data,
            None => panic!("flat {flat} read without being acquired"),
        }
    }

    fn acquire_wall(&mut self, texture: usize) -> bool {
        match self.walls.get_mut(texture) {
            Some(pic) => {
                pic.refs += 1;
                true
            }
            None => {
                warn!("Tried to acquire missing wall texture {texture}");
                false
            }
        }
    }

    fn release_wall(&mut self, texture: usize) {
        if let Some(pic) = self.walls.get_mut(texture) {
            pic.refs = pic.refs.saturating_sub(1);
        }
    }

    fn wall_column(&self, texture: usize, column: i32) -> &[u8] {
        let pic = &self.walls[texture];
        &pic.data[column.rem_euclid(pic.width as i32) as usize]
    }

    fn colourmap(&self, table: LightTable) -> &[u8] {
        let set = self
            .colourmaps
            .get(table.base.0 as usize)
            .unwrap_or(&self.colourmaps[0]);
        &set[table.level.min(COLOURMAP_LEN - 1)]
    }

    fn palette(&self) -> &[[u8; 4]] {
        &self.palette
    }
}
