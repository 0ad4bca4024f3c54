use log::warn;
use math::{FixedPoint, FRACBITS, FRACUNIT};
use render_trait::{ColourmapId, FixedLight, LightTable, PicSource, SkyTransfer, View, SKY_FLAT_FLAG};

use crate::defs::{Visplane, UNMAPPED};
use crate::draw::{DrawColumn, PlaneDrawer};
use crate::utilities::Projection;

/// A binary angle shifted down by this is a column of a 256 wide sky, four
/// repeats to the full circle
pub const ANGLETOSKYSHIFT: u32 = 22;

/// The level's skies and how they are projected
#[derive(Debug, Clone)]
pub struct SkyDef {
    /// Drawn for the sky flat
    pub sky1: usize,
    /// Drawn for planes marked with `SKY_FLAT_FLAG` alone
    pub sky2: usize,
    /// Horizontal scroll, 16.16 texture columns
    pub scroll: i32,
    /// Texture row at the centre of the screen
    pub texturemid: FixedPoint,
    /// Texture rows per screen row
    pub iscale: FixedPoint,
    /// Each step doubles the width and height the sky is drawn at
    pub stretch: u32,
    /// Skies taken from control lines, indexed by the low bits of the pic
    pub transfers: Vec<SkyTransfer>,
    /// Let a fixed colourmap (invulnerability) recolour the sky. Off is how
    /// vanilla looked.
    pub sky_palette: bool,
}

impl SkyDef {
    /// Doom function name `R_InitSkyMap`
    pub fn new(sky1: usize, sky2: usize, screen_height: usize) -> Self {
        Self {
            sky1,
            sky2,
            scroll: 0,
            texturemid: FixedPoint::from(100),
            iscale: FixedPoint::new(200 * FRACUNIT / screen_height.max(1) as i32),
            stretch: 0,
            transfers: Vec::new(),
            sky_palette: false,
        }
    }

    /// Shift from a view angle to 16.16 texture columns
    #[inline]
    pub const fn shift(&self) -> u32 {
        ANGLETOSKYSHIFT - FRACBITS as u32 + self.stretch
    }

    /// Which texture a sky plane shows and where
    pub fn select(&self, pic: u32, sky_flat: u32) -> SkyState {
        let default = SkyState {
            texture: self.sky1,
            frontpos: self.scroll,
            texturemid: self.texturemid,
            flip: 0,
        };
        if pic == sky_flat {
            return default;
        }
        if pic == SKY_FLAT_FLAG {
            return SkyState {
                texture: self.sky2,
                ..default
            };
        }

        let index = (pic & !SKY_FLAT_FLAG).wrapping_sub(1) as usize;
        let transfer = match self.transfers.get(index).or(self.transfers.first()) {
            Some(t) => t,
            None => {
                warn!("Sky transfer {index} requested but the level has none");
                return default;
            }
        };
        SkyState {
            texture: transfer.texture,
            frontpos: transfer.texture_offset.raw().wrapping_neg() >> 6,
            texturemid: transfer.row_offset - FixedPoint::from(28),
            flip: if transfer.no_flip { 0 } else { !0 },
        }
    }

    /// The table the sky is shaded with. Skies are full bright unless a
    /// powerup overrides it.
    pub fn colourmap(&self, fixed: FixedLight) -> LightTable {
        let default = LightTable::new(ColourmapId(0), 0);
        match fixed {
            FixedLight::Level(level) => LightTable::new(ColourmapId(0), level),
            FixedLight::Colourmap(table) if self.sky_palette => table,
            _ => default,
        }
    }
}

/// Sky parameters for one plane. Worked out fresh for each plane so a
/// transferred sky never leaks in to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyState {
    pub texture: usize,
    pub frontpos: i32,
    pub texturemid: FixedPoint,
    /// XORed with the column angle, all ones mirrors the sky
    pub flip: u32,
}

/// Draw a sky plane as columns. Returns the number of columns drawn.
///
/// Doom function name `R_DrawSky`
pub fn draw_sky(
    plane: &Visplane,
    sky_flat: u32,
    view: &View,
    proj: &Projection,
    sky: &SkyDef,
    pics: &mut impl PicSource,
    drawer: &mut impl PlaneDrawer,
) -> usize {
    if plane.is_empty() {
        return 0;
    }

    let mut state = sky.select(plane.desc.pic, sky_flat);
    if !pics.acquire_wall(state.texture) {
        warn!("Sky texture {} missing, using texture 0", state.texture);
        state.texture = 0;
        if !pics.acquire_wall(0) {
            warn!("No sky texture to draw with");
            return 0;
        }
    }

    let pics_ref = &*pics;
    let colourmap = pics_ref.colourmap(sky.colourmap(view.fixed_light));
    let iscale = sky.iscale >> sky.stretch;
    let shift = sky.shift();
    let mut count = 0;

    for x in plane.minx..=plane.maxx {
        let yl = plane.top(x);
        let yh = plane.bottom(x);
        if yl == UNMAPPED || yl > yh {
            continue;
        }
        let angle = ((view.angle + proj.xtoviewangle[x as usize]) ^ state.flip) >> shift;
        let column = (angle as i32).wrapping_add(state.frontpos) >> FRACBITS;

        drawer.draw_column(&DrawColumn {
            source: pics_ref.wall_column(state.texture, column),
            colourmap,
            dc_x: x,
            dc_yl: yl as i32,
            dc_yh: yh as i32,
            dc_texturefrac: state.texturemid + iscale * (yl as i32 - proj.centery + 1),
            dc_iscale: iscale,
        });
        count += 1;
    }

    pics.release_wall(state.texture);
    count
}
