//! The contracts between the plane renderer and the rest of an engine: the
//! buffer it draws in to, the texture cache it pulls pixels from, and the
//! world/view state it projects with.

mod pics;
mod plane;

pub use pics::*;
pub use plane::*;

use math::{Bam, FixedPoint};

/// channels should match pixel format
pub const SOFT_PIXEL_CHANNELS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferSize {
    width_usize: usize,
    height_usize: usize,
    width: i32,
    height: i32,
}

impl BufferSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width_usize: width,
            height_usize: height,
            width: width as i32,
            height: height as i32,
        }
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    pub const fn width_usize(&self) -> usize {
        self.width_usize
    }

    pub const fn height_usize(&self) -> usize {
        self.height_usize
    }
}

pub trait PixelBuffer {
    fn size(&self) -> &BufferSize;
    fn clear(&mut self);
    fn clear_with_colour(&mut self, colour: &[u8; SOFT_PIXEL_CHANNELS]);
    fn set_pixel(&mut self, x: usize, y: usize, colour: &[u8; SOFT_PIXEL_CHANNELS]);
    fn read_pixel(&self, x: usize, y: usize) -> [u8; SOFT_PIXEL_CHANNELS];
    /// The pitch that should be added/subtracted to go up or down the Y while
    /// keeping X position
    fn pitch(&self) -> usize;
    /// Get an index point for this coord to copy a colour array too
    fn get_buf_index(&self, x: usize, y: usize) -> usize;
}

/// Overrides for the distance lighting, as set by powerups
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FixedLight {
    #[default]
    None,
    /// Every surface uses this colourmap level of its own lighting context
    /// (light amplification visor)
    Level(usize),
    /// Every surface uses this exact table (invulnerability)
    Colourmap(LightTable),
}

/// Where the player is looking from, and the global lighting state for the
/// frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct View {
    pub x: FixedPoint,
    pub y: FixedPoint,
    /// Eye height
    pub z: FixedPoint,
    pub angle: Bam,
    /// Ambient light bias, e.g. from weapon flashes
    pub extralight: i32,
    pub fixed_light: FixedLight,
    /// Fog disables `extralight`
    pub foggy: bool,
    /// Level time in tics, drives animated effects
    pub time: i32,
}
