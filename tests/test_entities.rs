use bullet_hell::config::{Arena, Tuning};
use bullet_hell::entities::*;

#[test]
fn entity_clone_and_eq() {
    assert_eq!(BulletKind::Sniper, BulletKind::Sniper);
    assert_ne!(BulletKind::Sniper, BulletKind::Rocket);
    assert_eq!(Phase::Begin, Phase::Begin);
    assert_ne!(Phase::RoundOver, Phase::End);
    assert_ne!(Cue::GunShot, Cue::SniperShot);

    let state = BulletState::Exploded;
    assert_eq!(state.clone(), BulletState::Exploded);
}

#[test]
fn bullet_stages_are_ordered_along_the_lifecycle() {
    let order = [
        BulletState::Aiming,
        BulletState::Waiting,
        BulletState::Normal,
        BulletState::Exploded,
        BulletState::Done,
    ];
    for pair in order.windows(2) {
        assert!(pair[0].stage() < pair[1].stage(), "{:?} !< {:?}", pair[0], pair[1]);
    }
}

#[test]
fn game_state_clone_is_independent() {
    let original = GameState {
        player: Player { x: 400.0, y: 300.0, radius: 25.0 },
        bullets: Vec::new(),
        current: 0,
        total_time: 0.0,
        phase: Phase::Playing,
        round: 1,
        bullet_count: 15,
        cues: Vec::new(),
        arena: Arena::default(),
        tuning: Tuning::default(),
    };
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.x = 99.0;
    cloned.current = 4;
    cloned.cues.push(Cue::Explosion);
    cloned.bullets.push(Bullet {
        x: 20.0,
        y: 20.0,
        vx: 0.0,
        vy: 0.0,
        radius: 10.0,
        speed: 140.0,
        kind: BulletKind::Normal,
        state: BulletState::Aiming,
        timer: 0.0,
    });

    assert_eq!(original.player.x, 400.0);
    assert_eq!(original.current, 0);
    assert!(original.cues.is_empty());
    assert!(original.bullets.is_empty());
}
