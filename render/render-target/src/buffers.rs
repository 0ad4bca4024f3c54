use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::debug;
use render_trait::{BufferSize, PixelBuffer, SOFT_PIXEL_CHANNELS};

/// RGBA framebuffer, row major
pub struct DrawBuffer {
    size: BufferSize,
    /// Total length is width * height * CHANNELS
    buffer: Vec<u8>,
    stride: usize,
}

impl DrawBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            size: BufferSize::new(width, height),
            buffer: vec![0; width * height * SOFT_PIXEL_CHANNELS],
            stride: width * SOFT_PIXEL_CHANNELS,
        }
    }

    pub fn buf(&self) -> &[u8] {
        &self.buffer
    }

    /// Write the frame as a binary PPM, alpha dropped
    pub fn write_ppm(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.size.width(), self.size.height())?;
        for pixel in self.buffer.chunks_exact(SOFT_PIXEL_CHANNELS) {
            out.write_all(&pixel[..3])?;
        }
        out.flush()
    }

    pub fn save_ppm(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl PixelBuffer for DrawBuffer {
    #[inline(always)]
    fn size(&self) -> &BufferSize {
        &self.size
    }

    #[inline]
    fn clear(&mut self) {
        self.buffer.fill(0);
    }

    #[inline]
    fn clear_with_colour(&mut self, colour: &[u8; SOFT_PIXEL_CHANNELS]) {
        self.buffer
            .chunks_exact_mut(SOFT_PIXEL_CHANNELS)
            .for_each(|n| n.copy_from_slice(colour));
    }

    #[inline(always)]
    fn set_pixel(&mut self, x: usize, y: usize, colour: &[u8; SOFT_PIXEL_CHANNELS]) {
        #[cfg(feature = "safety_check")]
        if x >= self.size.width_usize() || y >= self.size.height_usize() {
            panic!(
                "set_pixel: {x},{y} outside {}x{}",
                self.size.width_usize(),
                self.size.height_usize()
            );
        }
        let pos = y * self.stride + x * SOFT_PIXEL_CHANNELS;
        self.buffer[pos..pos + SOFT_PIXEL_CHANNELS].copy_from_slice(colour);
    }

    /// Read the colour of a single pixel at X|Y
    #[inline]
    fn read_pixel(&self, x: usize, y: usize) -> [u8; SOFT_PIXEL_CHANNELS] {
        let pos = y * self.stride + x * SOFT_PIXEL_CHANNELS;
        let mut slice = [0u8; SOFT_PIXEL_CHANNELS];
        slice.copy_from_slice(&self.buffer[pos..pos + SOFT_PIXEL_CHANNELS]);
        slice
    }

    #[inline(always)]
    fn pitch(&self) -> usize {
        self.stride
    }

    #[inline(always)]
    fn get_buf_index(&self, x: usize, y: usize) -> usize {
        y * self.stride + x * SOFT_PIXEL_CHANNELS
    }
}
