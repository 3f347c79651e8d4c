//! Game session: the lifecycle around the pure simulation.
//!
//! A [`Session`] owns the current [`GameState`], the RNG used to lay out
//! rounds, the live [`KeyTable`], and the pause and debug flags. Front ends
//! call the lifecycle entry points ([`Session::init`], [`Session::pause`],
//! [`Session::resume`], [`Session::toggle_debug`], [`Session::click`]) from
//! their event handlers and [`Session::frame`] once per frame.

use log::{debug, info};
use rand::Rng;

use crate::compute;
use crate::config::Config;
use crate::entities::{Cue, GameState, Phase};
use crate::input::KeyTable;

pub struct Session<R: Rng> {
    state: GameState,
    keys: KeyTable,
    rng: R,
    paused: bool,
    debug: bool,
    last_dt: f32,
}

impl<R: Rng> Session<R> {
    /// Lay out the first round and park on the title screen.
    pub fn init(config: &Config, mut rng: R) -> Self {
        let state = compute::init_state(config.arena, config.tuning.clone(), &mut rng);
        info!(
            "Session ready: arena {}x{}, first round has {} bullets",
            state.arena.width, state.arena.height, state.bullet_count
        );
        Self {
            state,
            keys: KeyTable::new(),
            rng,
            paused: false,
            debug: false,
            last_dt: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn keys_mut(&mut self) -> &mut KeyTable {
        &mut self.keys
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Step used by the most recent simulated frame.
    pub fn last_dt(&self) -> f32 {
        self.last_dt
    }

    /// Bullet currently drawing a telegraph line, if any.
    pub fn telegraph(&self) -> Option<usize> {
        compute::telegraph(&self.state)
    }

    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.keys.release_all();
        self.state.cues.push(Cue::MusicDown);
        info!("Paused");
    }

    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.state.cues.push(Cue::MusicUp);
        info!("Resumed");
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
        debug!("Debug overlay {}", if self.debug { "on" } else { "off" });
    }

    /// A click anywhere advances the phase: start, continue, replay or restart.
    /// While paused it only resumes.
    pub fn click(&mut self, x: f32, y: f32) {
        debug!("Click at ({:.0}, {:.0}) in {:?}", x, y, self.state.phase);
        self.state.cues.push(Cue::MusicUp);

        if self.paused {
            self.paused = false;
            info!("Resumed");
            return;
        }

        self.state = match self.state.phase {
            Phase::Begin | Phase::RepeatLevel => compute::with_phase(&self.state, Phase::Playing),
            Phase::RoundOver => {
                let next = compute::reset_round(&self.state, &mut self.rng);
                compute::with_phase(&next, Phase::Playing)
            }
            Phase::End => {
                let next = compute::restart(&self.state, &mut self.rng);
                compute::with_phase(&next, Phase::Playing)
            }
            Phase::Playing => return,
        };
    }

    /// Rebuild the round just played at the same size. Only valid between
    /// rounds; the next click starts it.
    pub fn repeat_level(&mut self) {
        if matches!(self.state.phase, Phase::RoundOver | Phase::End) {
            self.state = compute::repeat_round(&self.state, &mut self.rng);
        }
    }

    /// Advance one frame. Nothing moves while paused or outside `Playing`.
    pub fn frame(&mut self, dt: f32) {
        if self.paused || self.state.phase != Phase::Playing {
            return;
        }
        self.last_dt = dt;
        self.state = compute::tick(&self.state, &self.keys, dt);
    }

    /// Hand pending sound cues to the audio collaborator.
    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.state.cues)
    }
}
