use log::debug;
use math::finesine;
use render_trait::{FLAT_LEN, FLAT_SIZE};

const MASK: usize = FLAT_SIZE - 1;

struct WarpedFlat {
    /// The level time the pixels were built for
    when: i32,
    data: Vec<u8>,
}

/// Swirling liquid flats. Each warped flat is kept with the tic it was built
/// for and only rebuilt when the tic changes, so every plane using it in a
/// frame shares one copy.
#[derive(Default)]
pub struct FlatWarp {
    flats: Vec<Option<WarpedFlat>>,
}

impl FlatWarp {
    pub fn new() -> Self {
        Self::default()
    }

    /// The warped pixels of `flat` at level time `time`. `source` is the
    /// unwarped flat and is only read when the cached copy is stale.
    pub fn warped(&mut self, flat: usize, source: &[u8], time: i32) -> &[u8] {
        if flat >= self.flats.len() {
            self.flats.resize_with(flat + 1, || None);
        }
        let slot = &mut self.flats[flat];
        let stale = slot.as_ref().is_none_or(|w| w.when != time);
        let warped = slot.get_or_insert_with(|| {
            debug!("Allocated warp buffer for flat {flat}");
            WarpedFlat {
                when: time,
                data: vec![0; FLAT_LEN],
            }
        });
        if stale {
            warped.when = time;
            warp_flat(source, &mut warped.data, time);
        }
        &warped.data
    }

    /// The tic the cached copy of `flat` was built for, if there is one
    pub fn built_for(&self, flat: usize) -> Option<i32> {
        self.flats.get(flat).and_then(|w| w.as_ref().map(|w| w.when))
    }
}

/// Shift every column vertically then every row horizontally, each by a
/// sine wave that moves with time.
pub fn warp_flat(source: &[u8], warped: &mut [u8], time: i32) {
    let timebase = time.wrapping_mul(23);
    for x in (0..FLAT_SIZE).rev() {
        let index = timebase.wrapping_add(((x as i32) + 17) << 7) as usize;
        let mut yf = (finesine(index).raw() >> 13) as usize & MASK;
        for yt in 0..FLAT_SIZE {
            warped[yt * FLAT_SIZE + x] = source[yf * FLAT_SIZE + x];
            yf = (yf + 1) & MASK;
        }
    }

    let timebase = time.wrapping_mul(32);
    let mut buffer = [0u8; FLAT_SIZE];
    for y in (0..FLAT_SIZE).rev() {
        let index = timebase.wrapping_add((y as i32) << 7) as usize;
        let mut xf = (finesine(index).raw() >> 13) as usize & MASK;
        let row = &mut warped[y * FLAT_SIZE..(y + 1) * FLAT_SIZE];
        for b in buffer.iter_mut() {
            *b = row[xf];
            xf = (xf + 1) & MASK;
        }
        row.copy_from_slice(&buffer);
    }
}
