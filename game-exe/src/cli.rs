use argh::FromArgs;
use log::LevelFilter;

/// Render a flyby of a synthetic room's floors, ceilings and skies to PPM
/// frames
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug, trace
    #[argh(option)]
    pub verbose: Option<LevelFilter>,
    /// resolution width in pixels
    #[argh(option, default = "0")]
    pub width: u32,
    /// resolution height in pixels
    #[argh(option, default = "0")]
    pub height: u32,
    /// horizontal field of view in degrees
    #[argh(option)]
    pub fov: Option<f32>,
    /// number of frames to render
    #[argh(option)]
    pub frames: Option<u32>,
    /// game tics between frames
    #[argh(option)]
    pub tics: Option<u32>,
    /// directory the frames are written to
    #[argh(option)]
    pub output: Option<String>,
    /// draw the sky at double size, 0-2
    #[argh(option)]
    pub sky_stretch: Option<u32>,
    /// let a fixed colourmap recolour the sky
    #[argh(option)]
    pub sky_palette: Option<bool>,
    /// ambient light added to everything, as from a weapon flash
    #[argh(option)]
    pub extralight: Option<i32>,
    /// light every surface with this colourmap level (0 brightest, 31 darkest)
    #[argh(option)]
    pub fixed_light: Option<usize>,
    /// draw the frames with the fog colourmaps
    #[argh(switch)]
    pub foggy: bool,
}
