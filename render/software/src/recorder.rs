//! A `PlaneDrawer` that remembers what it was asked to draw instead of
//! drawing it. Slices are kept as addresses so tests can check which
//! texture and colourmap were picked.

use math::FixedPoint;

use crate::draw::{DrawColumn, DrawSpan, PlaneDrawer, SlopeSpan};

#[derive(Debug, Clone, PartialEq)]
pub struct SpanRecord {
    pub y: i32,
    pub x1: i32,
    pub x2: i32,
    pub xfrac: u32,
    pub yfrac: u32,
    pub xstep: u32,
    pub ystep: u32,
    pub source: usize,
    pub colourmap: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlopeRecord {
    pub y: i32,
    pub x1: i32,
    pub x2: i32,
    pub iu: f64,
    pub iv: f64,
    pub id: f64,
    pub iustep: f64,
    pub ivstep: f64,
    pub idstep: f64,
    pub source: usize,
    pub lights: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRecord {
    pub x: i32,
    pub yl: i32,
    pub yh: i32,
    pub texturefrac: FixedPoint,
    pub iscale: FixedPoint,
    pub source: usize,
    pub colourmap: usize,
}

#[derive(Debug, Default)]
pub struct RecordingDrawer {
    pub spans: Vec<SpanRecord>,
    pub slopes: Vec<SlopeRecord>,
    pub columns: Vec<ColumnRecord>,
}

pub fn addr(slice: &[u8]) -> usize {
    slice.as_ptr() as usize
}

impl RecordingDrawer {
    /// Every pixel drawn by spans of either kind, as `(x, y)`
    pub fn span_pixels(&self) -> Vec<(i32, i32)> {
        let flat = self.spans.iter().map(|s| (s.y, s.x1, s.x2));
        let slope = self.slopes.iter().map(|s| (s.y, s.x1, s.x2));
        let mut pixels: Vec<(i32, i32)> = flat
            .chain(slope)
            .flat_map(|(y, x1, x2)| (x1..=x2).map(move |x| (x, y)))
            .collect();
        pixels.sort_unstable();
        pixels
    }
}

impl PlaneDrawer for RecordingDrawer {
    fn draw_span(&mut self, span: &DrawSpan) {
        self.spans.push(SpanRecord {
            y: span.ds_y,
            x1: span.ds_x1,
            x2: span.ds_x2,
            xfrac: span.ds_xfrac,
            yfrac: span.ds_yfrac,
            xstep: span.ds_xstep,
            ystep: span.ds_ystep,
            source: addr(span.source),
            colourmap: addr(span.colourmap),
        });
    }

    fn draw_slope_span(&mut self, span: &SlopeSpan) {
        self.slopes.push(SlopeRecord {
            y: span.ds_y,
            x1: span.ds_x1,
            x2: span.ds_x2,
            iu: span.ds_iu,
            iv: span.ds_iv,
            id: span.ds_id,
            iustep: span.ds_iustep,
            ivstep: span.ds_ivstep,
            idstep: span.ds_idstep,
            source: addr(span.source),
            lights: span.lights.iter().map(|l| addr(l)).collect(),
        });
    }

    fn draw_column(&mut self, column: &DrawColumn) {
        self.columns.push(ColumnRecord {
            x: column.dc_x,
            yl: column.dc_yl,
            yh: column.dc_yh,
            texturefrac: column.dc_texturefrac,
            iscale: column.dc_iscale,
            source: addr(column.source),
            colourmap: addr(column.colourmap),
        });
    }
}
