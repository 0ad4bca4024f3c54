use math::FixedPoint;

/// Flats are always 64x64 palette indices, row major
pub const FLAT_SIZE: usize = 64;
pub const FLAT_LEN: usize = FLAT_SIZE * FLAT_SIZE;

/// Set on a plane's texture number to mark a sky. `SKY_FLAT_FLAG` alone
/// means the alternate sky, `SKY_FLAT_FLAG | (n + 1)` means the sky is
/// transferred from sky transfer entry `n`.
pub const SKY_FLAT_FLAG: u32 = 0x8000_0000;

/// Identifies one set of colourmaps (a lighting context, such as a coloured
/// or fogged sector). Zero is the default set from the palette lump.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColourmapId(pub u16);

/// A single 256 entry colourmap, addressed as a set plus a light level in
/// that set rather than as a raw pointer offset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightTable {
    pub base: ColourmapId,
    pub level: usize,
}

impl LightTable {
    pub const fn new(base: ColourmapId, level: usize) -> Self {
        Self { base, level }
    }
}

/// A sky picture redirected by a level's control line. The upper texture of
/// the line's first side is drawn as the sky.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SkyTransfer {
    pub texture: usize,
    /// Horizontal offset of the side, turned in to a scroll
    pub texture_offset: FixedPoint,
    /// Vertical offset of the side
    pub row_offset: FixedPoint,
    /// Doom always drew skies mirrored, a transfer can opt out
    pub no_flip: bool,
}

/// The texture cache. Textures are acquired before being read during a frame
/// and released afterwards so that unreferenced ones may be evicted between
/// frames.
pub trait PicSource {
    /// The flat number that means "draw the sky here"
    fn sky_flat(&self) -> u32;

    fn num_flats(&self) -> usize;

    /// Animated flats translate to the current frame of the animation
    fn flat_translation(&self, pic: usize) -> usize;

    /// Should this flat be drawn with the warp effect
    fn flat_warps(&self, flat: usize) -> bool;

    /// Mark the flat as in use. Returns false if the flat can't be loaded.
    fn acquire_flat(&mut self, flat: usize) -> bool;

    /// Mark the flat as evictable again
    fn release_flat(&mut self, flat: usize);

    /// `FLAT_LEN` palette indices. Only valid for acquired flats.
    fn flat(&self, flat: usize) -> &[u8];

    fn acquire_wall(&mut self, texture: usize) -> bool;

    fn release_wall(&mut self, texture: usize);

    /// A column of a wall texture, wrapping `column` to the texture width
    fn wall_column(&self, texture: usize, column: i32) -> &[u8];

    /// A 256 entry palette index remapping
    fn colourmap(&self, table: LightTable) -> &[u8];

    /// RGBA for each palette index
    fn palette(&self) -> &[[u8; 4]];
}
