#![doc = include_str!("../../README.md")]

mod cli;
mod config;
mod scene;

use cli::*;
use log::{info, warn};
use math::Bam;
use mimalloc::MiMalloc;
use pic_data::PicData;
use render_soft::{PixelDrawer, PlaneStats, VisPlaneRender};
use render_target::DrawBuffer;
use render_trait::{PicSource, PixelBuffer};
use scene::{Lighting, Scene};
use simplelog::TermLogger;
use std::error::Error;
use std::fs::create_dir_all;
use std::path::PathBuf;

use crate::config::UserConfig;

const BASE_DIR: &str = "plane-view/";
/// Whatever isn't floor, ceiling or sky is wall
const WALL_COLOUR: [u8; 4] = [40, 32, 24, 255];

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// The main `plane-view` crate should take care of initialising a few things
fn main() -> Result<(), Box<dyn Error>> {
    let mut options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Info),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut user_config = UserConfig::load();
    user_config.sync_cli(&mut options);
    if let Err(e) = user_config.write() {
        warn!("Could not save user config: {e}");
    }

    run(&user_config, options.foggy)?;

    #[cfg(feature = "hprof")]
    coarse_prof::write(&mut std::io::stdout())?;
    Ok(())
}

/// Level time of a frame in tics, saturating at the largest time a `View`
/// can hold
fn frame_time(frame: u32, tics: u32) -> i32 {
    frame.saturating_mul(tics).min(i32::MAX as u32) as i32
}

fn run(config: &UserConfig, foggy: bool) -> Result<(), Box<dyn Error>> {
    let width = config.width.max(1) as usize;
    let height = config.height.max(1) as usize;
    let output: PathBuf = config.output.clone().into();
    create_dir_all(&output)?;

    let mut pics = PicData::demo();
    let mut scene = Scene::new(&pics, height, config.sky_stretch, config.sky_palette);
    let mut render = VisPlaneRender::new(width, height, Bam::from_degrees(config.fov as f64), pics.sky_flat());
    let mut buffer = DrawBuffer::new(width, height);
    let lighting = Lighting {
        extralight: config.extralight,
        fixed_light: (config.fixed_light >= 0).then_some(config.fixed_light as usize),
        foggy,
    };
    info!("Rendering {} frames at {width}x{height} to {output:?}", config.frames);

    let mut total = PlaneStats::default();
    for frame in 0..config.frames {
        let time = frame_time(frame, config.tics);
        let view = scene.view_at(time, lighting);
        scene.animate(&mut pics, time);

        buffer.clear_with_colour(&WALL_COLOUR);
        render.begin_frame();
        scene.mark(&view, &mut render);
        let mut drawer = PixelDrawer::new(&mut buffer, pics.palette());
        let stats = render.draw_planes(&view, &scene.sky, &mut pics, &mut drawer);

        total.planes += stats.planes;
        total.spans += stats.spans;
        total.columns += stats.columns;
        total.skipped += stats.skipped;

        buffer.save_ppm(&output.join(format!("frame{frame:04}.ppm")))?;
        pics.evict_unused();
    }

    info!(
        "Drew {} planes, {} spans and {} sky columns, skipped {}",
        total.planes, total.spans, total.columns, total.skipped
    );
    Ok(())
}
