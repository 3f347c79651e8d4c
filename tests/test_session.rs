use bullet_hell::config::Config;
use bullet_hell::entities::{BulletState, Cue, Phase};
use bullet_hell::input::Key;
use bullet_hell::session::Session;

use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f32 = 1.0 / 60.0;

fn new_session() -> Session<StdRng> {
    Session::init(&Config::default(), StdRng::seed_from_u64(7))
}

/// Click through the title screen.
fn started() -> Session<StdRng> {
    let mut s = new_session();
    s.click(400.0, 300.0);
    s.take_cues();
    s
}

#[test]
fn init_waits_on_title_screen() {
    let mut s = new_session();
    assert_eq!(s.state().phase, Phase::Begin);
    assert_eq!(s.state().bullets.len(), 15);
    assert!(!s.is_paused());
    assert!(!s.is_debug());

    s.frame(DT);
    assert_eq!(s.state().total_time, 0.0);
}

#[test]
fn click_starts_play_and_raises_music() {
    let mut s = new_session();
    s.click(10.0, 10.0);
    assert_eq!(s.state().phase, Phase::Playing);
    assert_eq!(s.take_cues(), vec![Cue::MusicUp]);
    assert!(s.take_cues().is_empty());
}

#[test]
fn frames_advance_only_while_playing() {
    let mut s = started();
    s.frame(DT);
    s.frame(DT);
    assert!((s.state().total_time - 2.0 * DT).abs() < 1e-6);
    assert_eq!(s.last_dt(), DT);
}

#[test]
fn pause_freezes_and_resume_continues() {
    let mut s = started();
    s.frame(DT);
    s.pause();
    assert!(s.is_paused());
    let frozen = s.state().total_time;
    s.frame(DT);
    s.frame(DT);
    assert_eq!(s.state().total_time, frozen);
    assert_eq!(s.take_cues(), vec![Cue::MusicDown]);

    s.resume();
    assert!(!s.is_paused());
    s.frame(DT);
    assert!(s.state().total_time > frozen);
    assert_eq!(s.take_cues(), vec![Cue::MusicUp]);
}

#[test]
fn pause_and_resume_are_idempotent() {
    let mut s = started();
    s.pause();
    s.pause();
    assert_eq!(s.take_cues(), vec![Cue::MusicDown]);
    s.resume();
    s.resume();
    assert_eq!(s.take_cues(), vec![Cue::MusicUp]);
}

#[test]
fn pause_releases_held_keys() {
    let mut s = started();
    s.keys_mut().set(Key::Right, true);
    s.pause();
    s.resume();
    let x = s.state().player.x;
    s.frame(DT);
    assert_eq!(s.state().player.x, x);
}

#[test]
fn click_while_paused_only_resumes() {
    let mut s = new_session();
    s.pause();
    s.click(0.0, 0.0);
    assert!(!s.is_paused());
    assert_eq!(s.state().phase, Phase::Begin);
}

#[test]
fn toggle_pause_flips() {
    let mut s = started();
    s.toggle_pause();
    assert!(s.is_paused());
    s.toggle_pause();
    assert!(!s.is_paused());
}

#[test]
fn toggle_debug_flips() {
    let mut s = new_session();
    s.toggle_debug();
    assert!(s.is_debug());
    s.toggle_debug();
    assert!(!s.is_debug());
}

#[test]
fn held_key_moves_player_each_frame() {
    let mut s = started();
    s.keys_mut().set(Key::Left, true);
    s.frame(DT);
    s.frame(DT);
    assert_eq!(s.state().player.x, 395.0);
}

/// Play until the phase leaves `Playing`, dodging nothing.
fn play_out(s: &mut Session<StdRng>) {
    let mut frames = 0;
    while s.state().phase == Phase::Playing && frames < 60 * 60 {
        s.frame(DT);
        frames += 1;
    }
}

#[test]
fn standing_still_gets_you_hit() {
    let mut s = started();
    play_out(&mut s);
    // Every bullet is aimed at the player's fixed position.
    assert_eq!(s.state().phase, Phase::End);
    assert!(s.state().current > 0);
}

#[test]
fn click_after_loss_restarts_from_first_round() {
    let mut s = started();
    play_out(&mut s);
    assert_eq!(s.state().phase, Phase::End);

    s.click(400.0, 300.0);
    assert_eq!(s.state().phase, Phase::Playing);
    assert_eq!(s.state().round, 1);
    assert_eq!(s.state().bullets.len(), 15);
    assert_eq!(s.state().current, 0);
    assert_eq!(s.state().total_time, 0.0);
    assert!(s
        .state()
        .bullets
        .iter()
        .all(|b| b.state == BulletState::Aiming));
}

#[test]
fn empty_round_ends_at_once_and_click_starts_next() {
    let mut config = Config::default();
    config.tuning.start_count = 0;
    config.tuning.per_round = 0;
    let mut s = Session::init(&config, StdRng::seed_from_u64(1));
    s.click(0.0, 0.0);
    s.frame(DT);
    assert_eq!(s.state().phase, Phase::RoundOver);
    assert_eq!(s.state().round, 1);

    s.click(0.0, 0.0);
    assert_eq!(s.state().phase, Phase::Playing);
    assert_eq!(s.state().round, 2);
    assert_eq!(s.state().total_time, 0.0);
}

#[test]
fn repeat_level_replays_same_size_after_click() {
    let mut s = started();
    play_out(&mut s);
    let round = s.state().round;
    let size = s.state().bullet_count;

    s.repeat_level();
    assert_eq!(s.state().phase, Phase::RepeatLevel);
    assert_eq!(s.state().bullets.len(), size);

    s.click(0.0, 0.0);
    assert_eq!(s.state().phase, Phase::Playing);
    assert_eq!(s.state().round, round);
    assert_eq!(s.state().current, 0);
}

#[test]
fn repeat_level_ignored_mid_round() {
    let mut s = started();
    s.frame(DT);
    s.repeat_level();
    assert_eq!(s.state().phase, Phase::Playing);
    assert!(s.state().total_time > 0.0);
}

#[test]
fn telegraph_slot_is_unique_through_a_session() {
    let mut config = Config::default();
    config.tuning.sniper_chance = 1.0;
    let mut s = Session::init(&config, StdRng::seed_from_u64(3));
    s.click(0.0, 0.0);
    let mut seen = false;
    let mut frames = 0;
    while s.state().phase == Phase::Playing && frames < 60 * 20 {
        if let Some(i) = s.telegraph() {
            assert_eq!(i, s.state().current);
            seen = true;
        }
        s.frame(DT);
        frames += 1;
    }
    assert!(seen);
}
