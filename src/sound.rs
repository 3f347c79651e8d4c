//! Audio collaborator.
//!
//! The terminal has no mixer, so cues become log lines, a background-music
//! level the HUD can show, and optionally a bell on explosions.

use std::io::Write;

use crossterm::{style::Print, QueueableCommand};
use log::debug;

use bullet_hell::entities::Cue;

const MUSIC_LOUD: f32 = 0.3;
const MUSIC_QUIET: f32 = 0.1;

pub struct SoundBoard {
    bell: bool,
    music_volume: f32,
}

impl SoundBoard {
    pub fn new(bell: bool) -> Self {
        Self {
            bell,
            music_volume: MUSIC_QUIET,
        }
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    pub fn play<W: Write>(&mut self, out: &mut W, cues: &[Cue]) -> std::io::Result<()> {
        for cue in cues {
            match cue {
                Cue::MusicUp => self.music_volume = MUSIC_LOUD,
                Cue::MusicDown => self.music_volume = MUSIC_QUIET,
                Cue::Explosion => {
                    if self.bell {
                        out.queue(Print('\u{7}'))?;
                    }
                }
                Cue::GunShot | Cue::SniperShot | Cue::RocketShot => {}
            }
            debug!(target: "sound", "{:?} (music {:.1})", cue, self.music_volume);
        }
        Ok(())
    }
}
