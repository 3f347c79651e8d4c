//! Game configuration.
//!
//! Tuning values live in an INI file. Every key is optional; anything missing
//! keeps the defaults below, which reproduce the classic arcade feel.
//!
//! ```ini
//! [arena]
//! width = 800
//! height = 600
//!
//! [bullets]
//! start_count = 10
//! per_round = 5
//! interval = 0.6
//!
//! [display]
//! target_fps = 60
//! ```

use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use log::{info, warn};

use crate::error::GameError;

pub const DEFAULT_CONFIG_PATH: &str = "./bullet_hell.ini";

/// Upper bound for every bullet count setting.
pub const MAX_BULLETS: usize = 1000;

const KNOWN_KEYS: &[(&str, &[&str])] = &[
    ("arena", &["width", "height"]),
    (
        "bullets",
        &[
            "start_count",
            "per_round",
            "max_count",
            "radius",
            "speed",
            "interval",
            "line_time",
            "sniper_hold",
            "start_delay",
            "sniper_chance",
            "rocket_gate",
            "rocket_chance",
        ],
    ),
    ("rockets", &["explosion_radius", "explosion_hold", "shrink_per_frame"]),
    ("player", &["radius", "step", "margin"]),
    ("display", &["target_fps", "bell"]),
];

/// Simulation bounds in arena units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Gameplay constants. Times are in seconds, distances in arena units.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    /// Bullet count after a restart, before the per-round increment.
    pub start_count: usize,
    pub per_round: usize,
    pub max_count: usize,
    pub bullet_radius: f32,
    pub bullet_speed: f32,
    /// Gap between consecutive launches.
    pub bullet_interval: f32,
    /// How long a sniper's telegraph line is shown.
    pub line_time: f32,
    /// Extra hold after the telegraph before a sniper arms.
    pub sniper_hold: f32,
    pub start_delay: f32,
    pub sniper_chance: f64,
    /// A rocket needs two further draws to pass: the gate, then the chance.
    pub rocket_gate: f64,
    pub rocket_chance: f64,
    pub explosion_radius: f32,
    pub explosion_hold: f32,
    pub shrink_per_frame: f32,
    pub player_radius: f32,
    pub player_step: f32,
    pub player_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            start_count: 10,
            per_round: 5,
            max_count: 40,
            bullet_radius: 10.0,
            bullet_speed: 140.0,
            bullet_interval: 0.6,
            line_time: 0.4,
            sniper_hold: 0.2,
            start_delay: 3.0,
            sniper_chance: 0.25,
            rocket_gate: 0.75,
            rocket_chance: 0.30,
            explosion_radius: 60.0,
            explosion_hold: 3.0,
            shrink_per_frame: 2.0,
            player_radius: 25.0,
            player_step: 2.5,
            player_margin: 10.0,
        }
    }
}

/// Presentation settings; the simulation never reads these.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    pub target_fps: u32,
    /// Ring the terminal bell on explosions.
    pub bell: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            bell: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Config {
    pub arena: Arena,
    pub tuning: Tuning,
    pub display: DisplayConfig,
}

impl Config {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let mut config = Self::default();
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(config);
        }
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| GameError::Config {
            path: PathBuf::from(path),
            reason,
        })?;
        config.apply(&ini)?;
        info!(
            "Loaded config from {:?}: arena {}x{}, {} bullets (+{} per round, max {})",
            path,
            config.arena.width,
            config.arena.height,
            config.tuning.start_count,
            config.tuning.per_round,
            config.tuning.max_count
        );
        Ok(config)
    }

    /// Parse INI text on top of the defaults.
    pub fn from_ini_str(text: &str) -> Result<Self, GameError> {
        let mut ini = Ini::new();
        ini.read(text.to_string())
            .map_err(|reason| GameError::Config {
                path: PathBuf::from("<string>"),
                reason,
            })?;
        let mut config = Self::default();
        config.apply(&ini)?;
        Ok(config)
    }

    fn apply(&mut self, ini: &Ini) -> Result<(), GameError> {
        warn_unknown_keys(ini);

        // [arena]
        set_f32(ini, "arena", "width", &mut self.arena.width)?;
        set_f32(ini, "arena", "height", &mut self.arena.height)?;

        // [bullets]
        let t = &mut self.tuning;
        set_usize(ini, "bullets", "start_count", &mut t.start_count)?;
        set_usize(ini, "bullets", "per_round", &mut t.per_round)?;
        set_usize(ini, "bullets", "max_count", &mut t.max_count)?;
        set_f32(ini, "bullets", "radius", &mut t.bullet_radius)?;
        set_f32(ini, "bullets", "speed", &mut t.bullet_speed)?;
        set_f32(ini, "bullets", "interval", &mut t.bullet_interval)?;
        set_f32(ini, "bullets", "line_time", &mut t.line_time)?;
        set_f32(ini, "bullets", "sniper_hold", &mut t.sniper_hold)?;
        set_f32(ini, "bullets", "start_delay", &mut t.start_delay)?;
        set_probability(ini, "bullets", "sniper_chance", &mut t.sniper_chance)?;
        set_probability(ini, "bullets", "rocket_gate", &mut t.rocket_gate)?;
        set_probability(ini, "bullets", "rocket_chance", &mut t.rocket_chance)?;

        // [rockets]
        set_f32(ini, "rockets", "explosion_radius", &mut t.explosion_radius)?;
        set_f32(ini, "rockets", "explosion_hold", &mut t.explosion_hold)?;
        set_f32(ini, "rockets", "shrink_per_frame", &mut t.shrink_per_frame)?;

        // [player]
        set_f32(ini, "player", "radius", &mut t.player_radius)?;
        set_f32(ini, "player", "step", &mut t.player_step)?;
        set_f32(ini, "player", "margin", &mut t.player_margin)?;

        // [display]
        if let Some(fps) = ini
            .getuint("display", "target_fps")
            .map_err(|reason| invalid("display", "target_fps", reason))?
        {
            self.display.target_fps = fps.clamp(1, 240) as u32;
        }
        if let Some(bell) = ini
            .getbool("display", "bell")
            .map_err(|reason| invalid("display", "bell", reason))?
        {
            self.display.bell = bell;
        }

        self.validate()
    }

    fn validate(&self) -> Result<(), GameError> {
        if self.arena.width <= 0.0 {
            return Err(invalid("arena", "width", "must be positive".into()));
        }
        if self.arena.height <= 0.0 {
            return Err(invalid("arena", "height", "must be positive".into()));
        }
        if self.tuning.shrink_per_frame <= 0.0 {
            return Err(invalid("rockets", "shrink_per_frame", "must be positive".into()));
        }
        let counts = [
            ("start_count", self.tuning.start_count),
            ("per_round", self.tuning.per_round),
            ("max_count", self.tuning.max_count),
        ];
        for (key, value) in counts {
            if value > MAX_BULLETS {
                return Err(invalid(
                    "bullets",
                    key,
                    format!("{value} is above the limit of {MAX_BULLETS}"),
                ));
            }
        }
        if self.tuning.max_count < self.tuning.start_count {
            warn!(
                "max_count {} is below start_count {}; rounds will be capped at {}",
                self.tuning.max_count, self.tuning.start_count, self.tuning.max_count
            );
        }
        Ok(())
    }
}

fn invalid(section: &'static str, key: &'static str, reason: String) -> GameError {
    GameError::InvalidConfig {
        section,
        key,
        reason,
    }
}

fn set_f32(
    ini: &Ini,
    section: &'static str,
    key: &'static str,
    slot: &mut f32,
) -> Result<(), GameError> {
    if let Some(v) = ini
        .getfloat(section, key)
        .map_err(|reason| invalid(section, key, reason))?
    {
        let narrowed = v as f32;
        if !narrowed.is_finite() {
            return Err(invalid(section, key, format!("{v} is not a finite f32")));
        }
        *slot = narrowed;
    }
    Ok(())
}

fn set_usize(
    ini: &Ini,
    section: &'static str,
    key: &'static str,
    slot: &mut usize,
) -> Result<(), GameError> {
    if let Some(v) = ini
        .getuint(section, key)
        .map_err(|reason| invalid(section, key, reason))?
    {
        *slot = usize::try_from(v)
            .map_err(|_| invalid(section, key, format!("{v} does not fit in usize")))?;
    }
    Ok(())
}

fn set_probability(
    ini: &Ini,
    section: &'static str,
    key: &'static str,
    slot: &mut f64,
) -> Result<(), GameError> {
    if let Some(v) = ini
        .getfloat(section, key)
        .map_err(|reason| invalid(section, key, reason))?
    {
        if !(0.0..=1.0).contains(&v) {
            return Err(invalid(section, key, format!("{v} is outside [0, 1]")));
        }
        *slot = v;
    }
    Ok(())
}

fn warn_unknown_keys(ini: &Ini) {
    for (section, keys) in ini.get_map_ref() {
        let known = KNOWN_KEYS.iter().find(|(name, _)| *name == section.as_str());
        match known {
            None => warn!("Unknown config section [{}]", section),
            Some((_, names)) => {
                for key in keys.keys() {
                    if !names.contains(&key.as_str()) {
                        warn!("Unknown config key [{}] {}", section, key);
                    }
                }
            }
        }
    }
}
