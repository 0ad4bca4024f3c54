//! Distance lighting tables and the light constants shared by the plane
//! mappers.

use render_trait::{ColourmapId, FixedLight, LightTable};

/// Sector light levels are 0-255, shifted down to 16 light rows
pub const LIGHTLEVELS: i32 = 16;
pub const LIGHTSEGSHIFT: i32 = 4;
/// Number of distance steps in each row of `zlight`
pub const MAXLIGHTZ: usize = 128;
/// A 16.16 distance shifted down by this gives the `zlight` column
pub const LIGHTZSHIFT: i32 = 20;
/// Colourmaps in one lighting context, not counting the inverse and black
/// maps
pub const NUMCOLORMAPS: i32 = 32;

/// The colourmap level for a light row and a distance. Row 15 is the
/// brightest.
pub struct ZLight {
    scales: [[usize; MAXLIGHTZ]; LIGHTLEVELS as usize],
}

impl ZLight {
    /// Doom function name `R_InitLightTables`
    pub fn new() -> Self {
        let mut scales = [[0usize; MAXLIGHTZ]; LIGHTLEVELS as usize];
        for i in 0..LIGHTLEVELS {
            let startmap = ((LIGHTLEVELS - 1 - i) * 2) * NUMCOLORMAPS / LIGHTLEVELS;
            for j in 0..MAXLIGHTZ {
                let scale = 160 / (j as i32 + 1);
                let level = (startmap - scale / 2).clamp(0, NUMCOLORMAPS - 1);
                scales[i as usize][j] = level as usize;
            }
        }
        Self { scales }
    }

    /// The light row a plane of `light_level` is drawn with
    pub fn row(light_level: i32, extralight: i32, foggy: bool) -> usize {
        let extra = if foggy { 0 } else { extralight };
        ((light_level >> LIGHTSEGSHIFT) + extra).clamp(0, LIGHTLEVELS - 1) as usize
    }

    /// The colourmap level at a 16.16 `distance` from the view
    #[inline]
    pub fn level(&self, row: usize, distance: i32) -> usize {
        let index = ((distance.max(0) >> LIGHTZSHIFT) as usize).min(MAXLIGHTZ - 1);
        self.scales[row][index]
    }
}

impl Default for ZLight {
    fn default() -> Self {
        Self::new()
    }
}

/// A powerup override, if one is active, for a surface lit with `base`
#[inline]
pub fn fixed_table(fixed: FixedLight, base: ColourmapId) -> Option<LightTable> {
    match fixed {
        FixedLight::None => None,
        FixedLight::Level(level) => Some(LightTable::new(base, level)),
        FixedLight::Colourmap(table) => Some(table),
    }
}
