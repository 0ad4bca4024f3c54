use log::info;

use crate::PicData;

/// A cycle of flats, e.g. `NUKAGE1` to `NUKAGE3`
#[derive(Debug, Default, Clone)]
pub struct PicAnimation {
    basepic: usize,
    numpics: usize,
    speed: usize,
}

impl PicAnimation {
    /// Point every flat of the cycle at the frame for `level_time`
    pub fn update(&self, textures: &mut PicData, level_time: usize) {
        for i in self.basepic..self.basepic + self.numpics {
            let pic = self.basepic + ((level_time / self.speed + i) % self.numpics);
            textures.flat_translation[i] = pic;
        }
    }

    /// Doom function name `P_InitPicAnims`
    pub fn init(pic_data: &PicData, defs: &[AnimationDef]) -> Vec<PicAnimation> {
        let mut anims = Vec::with_capacity(defs.len());

        for def in defs {
            let Some(start_num) = pic_data.flat_num_for_name(def.start_name) else {
                continue;
            };
            let Some(end_num) = pic_data.flat_num_for_name(def.end_name) else {
                continue;
            };

            let numpics = (end_num + 1).saturating_sub(start_num);
            if numpics < 2 {
                panic!(
                    "init_animations: bad cycle from {} to {}",
                    def.start_name, def.end_name
                );
            }

            anims.push(PicAnimation {
                basepic: start_num,
                numpics,
                speed: def.speed.max(1),
            });
        }
        info!("Initialised {} animated flats", anims.len());

        anims
    }
}

pub struct AnimationDef {
    pub end_name: &'static str,
    pub start_name: &'static str,
    pub speed: usize,
}

impl AnimationDef {
    pub const fn new(end_name: &'static str, start_name: &'static str, speed: usize) -> Self {
        Self {
            end_name,
            start_name,
            speed,
        }
    }
}
