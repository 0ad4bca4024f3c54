//! Procedural texture sources. Loading real assets is somebody else's job,
//! these give the renderer something with enough structure to see
//! orientation, scale and scrolling.

use render_trait::{FLAT_LEN, FLAT_SIZE};

/// How to build a flat's pixels when it is brought in to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatDef {
    Solid(u8),
    /// Alternating squares of `size` pixels
    Checker { a: u8, b: u8, size: usize },
    /// Bright lines every `spacing` pixels over a base colour
    Grid { base: u8, line: u8, spacing: usize },
    /// Concentric rings of a ramp, good for showing warps
    Rings { ramp: u8 },
    /// An arrow pointing along +v, useful to check rotation
    Arrow { base: u8, arrow: u8 },
}

impl FlatDef {
    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![0u8; FLAT_LEN];
        for y in 0..FLAT_SIZE {
            for x in 0..FLAT_SIZE {
                data[y * FLAT_SIZE + x] = self.texel(x, y);
            }
        }
        data
    }

    fn texel(&self, x: usize, y: usize) -> u8 {
        match *self {
            FlatDef::Solid(c) => c,
            FlatDef::Checker { a, b, size } => {
                let size = size.max(1);
                if ((x / size) + (y / size)) % 2 == 0 { a } else { b }
            }
            FlatDef::Grid {
                base,
                line,
                spacing,
            } => {
                let spacing = spacing.max(1);
                if x % spacing == 0 || y % spacing == 0 {
                    line
                } else {
                    base
                }
            }
            FlatDef::Rings { ramp } => {
                let dx = x as i32 - 32;
                let dy = y as i32 - 32;
                let d = ((dx * dx + dy * dy) as f32).sqrt() as i32;
                ramp * 16 + 8 + ((d / 3) % 8) as u8
            }
            FlatDef::Arrow { base, arrow } => {
                let dx = (x as i32 - 32).abs();
                let head = y < 24 && dx <= (24 - y as i32) / 2 + 1 && y >= 8;
                let shaft = (24..56).contains(&y) && dx <= 3;
                if head || shaft { arrow } else { base }
            }
        }
    }
}

/// A sky picture, 256 wide so it wraps four times around the view, with a
/// ramp gradient and a row of hills across the bottom.
pub fn build_sky(width: usize, height: usize, sky_ramp: u8, hill_ramp: u8, phase: f32) -> Vec<Vec<u8>> {
    let mut columns = Vec::with_capacity(width);
    for x in 0..width {
        let t = x as f32 / width as f32 * std::f32::consts::TAU;
        let hill = (height as f32 * 0.7
            + (t * 3.0 + phase).sin() * height as f32 * 0.08
            + (t * 7.0 + phase * 2.0).sin() * height as f32 * 0.04) as usize;
        let mut col = Vec::with_capacity(height);
        for y in 0..height {
            if y >= hill {
                col.push(hill_ramp * 16 + 4 + ((x / 4 + y) % 3) as u8);
            } else {
                let shade = 15 - (y * 10 / height.max(1)) as u8;
                col.push(sky_ramp * 16 + shade);
            }
        }
        columns.push(col);
    }
    columns
}
