//! User configuration options.

use crate::{CLIOptions, BASE_DIR};
use dirs::config_dir;
use log::{info, warn};
use nanoserde::{DeRon, SerRon};
use std::{
    error::Error,
    fs::{create_dir_all, read_to_string, File},
    io::Write,
    path::PathBuf,
};

const LOG_TAG: &str = "UserConfig";

fn get_cfg_file() -> Option<PathBuf> {
    let mut dir = config_dir()?;
    dir.push(BASE_DIR);
    dir.push("user.ron");
    Some(dir)
}

#[derive(Debug, Clone, PartialEq, DeRon, SerRon)]
pub struct UserConfig {
    pub width: u32,
    pub height: u32,
    /// Degrees
    pub fov: f32,
    pub frames: u32,
    pub tics: u32,
    pub output: String,
    pub sky_stretch: u32,
    pub sky_palette: bool,
    pub extralight: i32,
    /// Colourmap level, negative for none
    pub fixed_light: i32,
}

impl Default for UserConfig {
    fn default() -> Self {
        UserConfig {
            width: 640,
            height: 400,
            fov: 90.0,
            frames: 35,
            tics: 2,
            output: "frames".to_string(),
            sky_stretch: 0,
            sky_palette: false,
            extralight: 0,
            fixed_light: -1,
        }
    }
}

impl UserConfig {
    /// Read the config, falling back to the defaults if it is missing or
    /// can't be parsed
    pub fn load() -> Self {
        let Some(path) = get_cfg_file() else {
            warn!(target: LOG_TAG, "No user config dir, using defaults");
            return UserConfig::default();
        };
        match read_to_string(&path) {
            Ok(buf) => match UserConfig::deserialize_ron(&buf) {
                Ok(data) => {
                    info!(target: LOG_TAG, "Loaded user config file");
                    data
                }
                Err(e) => {
                    warn!(target: LOG_TAG, "Could not deserialise {path:?} ({e:?}), using defaults");
                    UserConfig::default()
                }
            },
            Err(_) => {
                info!(target: LOG_TAG, "No config at {path:?}, using defaults");
                UserConfig::default()
            }
        }
    }

    pub fn write(&self) -> Result<(), Box<dyn Error>> {
        let path = get_cfg_file().ok_or("no user config dir")?;
        if let Some(dir) = path.parent() {
            create_dir_all(dir)?;
        }
        let mut file = File::create(&path)?;
        file.write_all(self.serialize_ron().as_bytes())?;
        info!(target: LOG_TAG, "Saved user config to {path:?}");
        Ok(())
    }

    /// Sync the CLI options and UserOptions with each other. Options given
    /// on the command line win and are remembered.
    pub fn sync_cli(&mut self, cli: &mut CLIOptions) {
        info!("Checking CLI options");

        if cli.width != 0 && cli.width != self.width {
            self.width = cli.width;
        } else {
            cli.width = self.width;
        }

        if cli.height != 0 && cli.height != self.height {
            self.height = cli.height;
        } else {
            cli.height = self.height;
        }

        sync(&mut self.fov, &mut cli.fov);
        sync(&mut self.frames, &mut cli.frames);
        sync(&mut self.tics, &mut cli.tics);
        sync(&mut self.output, &mut cli.output);
        sync(&mut self.sky_stretch, &mut cli.sky_stretch);
        sync(&mut self.sky_palette, &mut cli.sky_palette);
        sync(&mut self.extralight, &mut cli.extralight);

        if let Some(level) = cli.fixed_light {
            self.fixed_light = level as i32;
        } else if self.fixed_light >= 0 {
            cli.fixed_light = Some(self.fixed_light as usize);
        }
    }
}

fn sync<T: Clone + PartialEq>(saved: &mut T, cli: &mut Option<T>) {
    match cli {
        Some(value) => {
            if *value != *saved {
                saved.clone_from(value);
            }
        }
        None => *cli = Some(saved.clone()),
    }
}
