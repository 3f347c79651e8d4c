use std::path::PathBuf;

use bullet_hell::config::{Arena, Config, Tuning, MAX_BULLETS};
use bullet_hell::error::GameError;
use bullet_hell::session::Session;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn temp_ini(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "bullet_hell_{}_{}.ini",
        name,
        std::process::id()
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn defaults_match_classic_tuning() {
    let c = Config::default();
    assert_eq!(c.arena, Arena { width: 800.0, height: 600.0 });
    assert_eq!(c.tuning.start_count, 10);
    assert_eq!(c.tuning.per_round, 5);
    assert_eq!(c.tuning.max_count, 40);
    assert_eq!(c.tuning.bullet_interval, 0.6);
    assert_eq!(c.tuning.start_delay, 3.0);
    assert_eq!(c.tuning.explosion_radius, 60.0);
    assert_eq!(c.display.target_fps, 60);
    assert!(!c.display.bell);
}

#[test]
fn missing_file_uses_defaults() {
    let path = std::env::temp_dir().join("bullet_hell_definitely_missing.ini");
    let c = Config::load(&path).unwrap();
    assert_eq!(c, Config::default());
}

#[test]
fn file_overrides_only_given_keys() {
    let path = temp_ini(
        "overrides",
        "[arena]\nwidth = 1024\n\n[bullets]\nper_round = 3\ninterval = 0.5\n\n[display]\nbell = true\n",
    );
    let c = Config::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(c.arena.width, 1024.0);
    assert_eq!(c.arena.height, 600.0);
    assert_eq!(c.tuning.per_round, 3);
    assert_eq!(c.tuning.bullet_interval, 0.5);
    assert_eq!(c.tuning.start_count, Tuning::default().start_count);
    assert!(c.display.bell);
}

#[test]
fn parses_from_string() {
    let c = Config::from_ini_str(
        "[player]\nradius = 12\nstep = 4\n\n[rockets]\nexplosion_hold = 1.5\n",
    )
    .unwrap();
    assert_eq!(c.tuning.player_radius, 12.0);
    assert_eq!(c.tuning.player_step, 4.0);
    assert_eq!(c.tuning.explosion_hold, 1.5);
}

#[test]
fn probability_outside_unit_range_is_rejected() {
    let err = Config::from_ini_str("[bullets]\nsniper_chance = 1.5\n").unwrap_err();
    match err {
        GameError::InvalidConfig { section, key, .. } => {
            assert_eq!(section, "bullets");
            assert_eq!(key, "sniper_chance");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_numeric_value_is_rejected() {
    let err = Config::from_ini_str("[arena]\nheight = tall\n").unwrap_err();
    assert!(matches!(
        err,
        GameError::InvalidConfig { section: "arena", key: "height", .. }
    ));
}

#[test]
fn non_positive_arena_is_rejected() {
    let err = Config::from_ini_str("[arena]\nwidth = 0\n").unwrap_err();
    assert!(matches!(
        err,
        GameError::InvalidConfig { section: "arena", key: "width", .. }
    ));
}

#[test]
fn unknown_keys_are_tolerated() {
    let c = Config::from_ini_str("[bullets]\ncolour = red\n\n[extras]\nfoo = 1\n").unwrap();
    assert_eq!(c, Config::default());
}

#[test]
fn error_messages_name_the_key() {
    let err = Config::from_ini_str("[bullets]\nrocket_gate = -1\n").unwrap_err();
    assert!(err.to_string().contains("[bullets] rocket_gate"));
}

#[test]
fn huge_bullet_counts_are_rejected() {
    for key in ["start_count", "per_round", "max_count"] {
        let text = format!("[bullets]\n{key} = 18446744073709551615\n");
        let err = Config::from_ini_str(&text).unwrap_err();
        match err {
            GameError::InvalidConfig { section, key: k, .. } => {
                assert_eq!(section, "bullets");
                assert_eq!(k, key);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn bullet_counts_at_the_limit_are_accepted() {
    let text = format!("[bullets]\nper_round = {MAX_BULLETS}\nmax_count = {MAX_BULLETS}\n");
    let c = Config::from_ini_str(&text).unwrap();
    assert_eq!(c.tuning.per_round, MAX_BULLETS);
    assert_eq!(c.tuning.max_count, MAX_BULLETS);
}

#[test]
fn floats_that_overflow_f32_are_rejected() {
    let err = Config::from_ini_str("[arena]\nwidth = 1e300\n").unwrap_err();
    assert!(matches!(
        err,
        GameError::InvalidConfig { section: "arena", key: "width", .. }
    ));

    let err = Config::from_ini_str("[bullets]\nspeed = -1e39\n").unwrap_err();
    assert!(matches!(
        err,
        GameError::InvalidConfig { section: "bullets", key: "speed", .. }
    ));
}

#[test]
fn largest_accepted_config_starts_a_session() {
    let text = format!(
        "[arena]\nwidth = 3e38\n\n[bullets]\nstart_count = {MAX_BULLETS}\nper_round = {MAX_BULLETS}\nmax_count = {MAX_BULLETS}\n"
    );
    let c = Config::from_ini_str(&text).unwrap();
    let s = Session::init(&c, StdRng::seed_from_u64(5));
    assert_eq!(s.state().bullets.len(), MAX_BULLETS);
}
