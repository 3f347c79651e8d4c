//! Entity and round-state types. Data only; behaviour lives in `compute`.

use crate::config::{Arena, Tuning};

// ── Tags ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletKind {
    Normal,
    /// Fast round with a telegraph line.
    Sniper,
    /// Slow, large round that explodes when another bullet hits it.
    Rocket,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletState {
    Aiming,
    Waiting,
    /// Fired and in flight.
    Normal,
    Exploded,
    Done,
}

impl BulletState {
    /// Position along the lifecycle. A bullet's stage never decreases.
    pub fn stage(self) -> u8 {
        match self {
            BulletState::Aiming => 0,
            BulletState::Waiting => 1,
            BulletState::Normal => 2,
            BulletState::Exploded => 3,
            BulletState::Done => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Title screen; waiting for the first click.
    Begin,
    Playing,
    RoundOver,
    /// Replay the current round without rebuilding it.
    RepeatLevel,
    /// The player was hit.
    End,
}

/// Sound cues raised by the simulation, drained by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    GunShot,
    SniperShot,
    RocketShot,
    Explosion,
    MusicUp,
    MusicDown,
}

// ── Entities ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    /// Aim vector scaled by the kind multiplier. Zero until fired.
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub speed: f32,
    pub kind: BulletKind,
    pub state: BulletState,
    /// Round time at which the bullet exploded.
    pub timer: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// One round of play. Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    /// Ordered by launch order.
    pub bullets: Vec<Bullet>,
    /// Index of the next bullet to fire; also the number already fired.
    pub current: usize,
    /// Seconds since the round started.
    pub total_time: f32,
    pub phase: Phase,
    /// 1-based round number since the last restart.
    pub round: u32,
    /// Bullets per round; grows on every reset.
    pub bullet_count: usize,
    /// Cues raised since the last drain.
    pub cues: Vec<Cue>,
    pub arena: Arena,
    pub tuning: Tuning,
}
