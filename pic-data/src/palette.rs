//! Palette and colourmap generation. The colourmaps are built the way the
//! original lump was: every palette colour darkened a step at a time and
//! matched back to the closest palette entry.

pub const NUMCOLORMAPS: usize = 32;
/// Index of the inverted greyscale map used for invulnerability
pub const INVERSECOLORMAP: usize = 32;
/// 32 light levels, the inverse map, and an all black map
pub const COLOURMAP_LEN: usize = 34;

pub type Colourmap = [u8; 256];

/// Sixteen ramps of sixteen shades each
const RAMPS: [[u8; 3]; 16] = [
    [255, 255, 255],
    [160, 160, 160],
    [255, 64, 64],
    [255, 160, 64],
    [255, 255, 96],
    [96, 255, 96],
    [32, 160, 32],
    [64, 255, 255],
    [64, 128, 255],
    [32, 32, 192],
    [192, 96, 255],
    [255, 96, 192],
    [160, 112, 64],
    [112, 80, 48],
    [96, 128, 96],
    [176, 160, 128],
];

/// Build a 256 colour RGBA palette, index `ramp * 16 + shade` with shade 15
/// the brightest.
pub fn build_palette() -> Vec<[u8; 4]> {
    let mut pal = Vec::with_capacity(256);
    for ramp in RAMPS.iter() {
        for shade in 0..16u32 {
            let scale = |c: u8| ((c as u32 * (shade + 1)) / 16) as u8;
            pal.push([scale(ramp[0]), scale(ramp[1]), scale(ramp[2]), 255]);
        }
    }
    pal
}

fn closest(palette: &[[u8; 4]], rgb: [i32; 3]) -> u8 {
    let mut best = 0;
    let mut best_dist = i32::MAX;
    for (i, c) in palette.iter().enumerate() {
        let dr = c[0] as i32 - rgb[0];
        let dg = c[1] as i32 - rgb[1];
        let db = c[2] as i32 - rgb[2];
        let dist = dr * dr + dg * dg + db * db;
        if dist < best_dist {
            best_dist = dist;
            best = i;
            if dist == 0 {
                break;
            }
        }
    }
    best as u8
}

/// Build a full set of colourmaps. `tint` is the colour surfaces fade
/// towards with distance, black for normal lighting.
pub fn build_colourmaps(palette: &[[u8; 4]], tint: [u8; 3]) -> Vec<Colourmap> {
    let mut maps = Vec::with_capacity(COLOURMAP_LEN);
    for level in 0..NUMCOLORMAPS as i32 {
        let mut map = [0u8; 256];
        for (i, c) in palette.iter().enumerate() {
            let fade = |c: u8, t: u8| {
                let c = c as i32;
                let t = t as i32;
                c + (t - c) * level / NUMCOLORMAPS as i32
            };
            map[i] = closest(
                palette,
                [fade(c[0], tint[0]), fade(c[1], tint[1]), fade(c[2], tint[2])],
            );
        }
        maps.push(map);
    }

    let mut inverse = [0u8; 256];
    for (i, c) in palette.iter().enumerate() {
        let lum = (c[0] as i32 * 3 + c[1] as i32 * 6 + c[2] as i32) / 10;
        let grey = 255 - lum;
        inverse[i] = closest(palette, [grey, grey, grey]);
    }
    maps.push(inverse);
    maps.push([closest(palette, [0, 0, 0]); 256]);
    maps
}
