//! The output side of the plane renderer. The mappers describe each run of
//! pixels and hand it to a `PlaneDrawer`, which decides what pixels are.

use math::FixedPoint;
use render_trait::{PixelBuffer, FLAT_SIZE, SOFT_PIXEL_CHANNELS};

/// One horizontal run of a level plane. Texture coordinates are 6.26 fixed
/// point so the top six bits are the texel, and wrapping is free.
#[derive(Debug, Clone, Copy)]
pub struct DrawSpan<'a> {
    /// 64x64 flat, row major
    pub source: &'a [u8],
    pub colourmap: &'a [u8],
    pub ds_y: i32,
    pub ds_x1: i32,
    pub ds_x2: i32,
    pub ds_xfrac: u32,
    pub ds_yfrac: u32,
    pub ds_xstep: u32,
    pub ds_ystep: u32,
}

impl DrawSpan<'_> {
    /// Index in to the flat for a 6.26 texture position
    #[inline]
    pub const fn spot(xfrac: u32, yfrac: u32) -> usize {
        (((yfrac >> 26) << 6) | (xfrac >> 26)) as usize
    }
}

/// One horizontal run of a sloped plane. `iu/id` and `iv/id` are the texel
/// coordinates, all three step linearly across the screen.
#[derive(Debug, Clone, Copy)]
pub struct SlopeSpan<'a> {
    pub source: &'a [u8],
    /// A colourmap per pixel of the span
    pub lights: &'a [&'a [u8]],
    pub ds_y: i32,
    pub ds_x1: i32,
    pub ds_x2: i32,
    pub ds_iu: f64,
    pub ds_iv: f64,
    pub ds_id: f64,
    pub ds_iustep: f64,
    pub ds_ivstep: f64,
    pub ds_idstep: f64,
}

impl SlopeSpan<'_> {
    /// Index in to the flat for the perspective divided coordinates
    #[inline]
    pub fn spot(iu: f64, iv: f64, id: f64) -> usize {
        let mul = 1.0 / id;
        let u = (iu * mul).floor() as i32 & (FLAT_SIZE as i32 - 1);
        let v = (iv * mul).floor() as i32 & (FLAT_SIZE as i32 - 1);
        (v as usize) * FLAT_SIZE + u as usize
    }
}

/// One vertical run of sky
#[derive(Debug, Clone, Copy)]
pub struct DrawColumn<'a> {
    /// A single column of a wall texture
    pub source: &'a [u8],
    pub colourmap: &'a [u8],
    pub dc_x: i32,
    pub dc_yl: i32,
    pub dc_yh: i32,
    pub dc_texturefrac: FixedPoint,
    pub dc_iscale: FixedPoint,
}

/// Receives everything the plane renderer wants drawn. All coordinates are
/// already clipped to the screen.
pub trait PlaneDrawer {
    fn draw_span(&mut self, span: &DrawSpan);
    fn draw_slope_span(&mut self, span: &SlopeSpan);
    fn draw_column(&mut self, column: &DrawColumn);
}

/// Draws in to a `PixelBuffer` through a palette
pub struct PixelDrawer<'b, B: PixelBuffer> {
    buffer: &'b mut B,
    palette: Vec<[u8; SOFT_PIXEL_CHANNELS]>,
}

impl<'b, B: PixelBuffer> PixelDrawer<'b, B> {
    pub fn new(buffer: &'b mut B, palette: &[[u8; SOFT_PIXEL_CHANNELS]]) -> Self {
        Self {
            buffer,
            palette: palette.to_vec(),
        }
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, index: u8) {
        #[cfg(feature = "safety_check")]
        {
            let size = self.buffer.size();
            if x < 0 || y < 0 || x >= size.width() || y >= size.height() {
                panic!("PixelDrawer: {x},{y} is outside the buffer");
            }
        }
        let colour = self.palette[index as usize];
        self.buffer.set_pixel(x as usize, y as usize, &colour);
    }
}

impl<B: PixelBuffer> PlaneDrawer for PixelDrawer<'_, B> {
    /// R_DrawSpan
    fn draw_span(&mut self, ds: &DrawSpan) {
        let mut xfrac = ds.ds_xfrac;
        let mut yfrac = ds.ds_yfrac;
        for x in ds.ds_x1..=ds.ds_x2 {
            let px = ds.colourmap[ds.source[DrawSpan::spot(xfrac, yfrac)] as usize];
            self.put(x, ds.ds_y, px);
            xfrac = xfrac.wrapping_add(ds.ds_xstep);
            yfrac = yfrac.wrapping_add(ds.ds_ystep);
        }
    }

    /// R_DrawSlopeSpan, dividing at every pixel
    fn draw_slope_span(&mut self, ds: &SlopeSpan) {
        let mut iu = ds.ds_iu;
        let mut iv = ds.ds_iv;
        let mut id = ds.ds_id;
        for (i, x) in (ds.ds_x1..=ds.ds_x2).enumerate() {
            let colourmap = ds.lights[i];
            let px = colourmap[ds.source[SlopeSpan::spot(iu, iv, id)] as usize];
            self.put(x, ds.ds_y, px);
            iu += ds.ds_iustep;
            iv += ds.ds_ivstep;
            id += ds.ds_idstep;
        }
    }

    /// R_DrawColumn
    fn draw_column(&mut self, dc: &DrawColumn) {
        if dc.dc_yh < dc.dc_yl {
            return;
        }
        let len = dc.source.len() as i32;
        let mut frac = dc.dc_texturefrac;
        for y in dc.dc_yl..=dc.dc_yh {
            let texel = dc.source[frac.to_int().rem_euclid(len) as usize];
            self.put(dc.dc_x, y, dc.colourmap[texel as usize]);
            frac += dc.dc_iscale;
        }
    }
}
