//! Round simulation: the bullet state machine, collisions and round progress.
//!
//! Functions take the current `GameState` by reference and hand back the next
//! one. The RNG is passed in so rounds are reproducible under a fixed seed.

use log::{debug, info};
use rand::Rng;

use crate::config::{Arena, Tuning};
use crate::entities::{Bullet, BulletKind, BulletState, Cue, GameState, Phase, Player};
use crate::input::{Key, KeyTable};

// ── Category tables ──────────────────────────────────────────────────────────

/// Launch velocity scale per category.
pub fn kind_multiplier(kind: BulletKind) -> f32 {
    match kind {
        BulletKind::Sniper => 3.0,
        BulletKind::Normal => 1.0,
        BulletKind::Rocket => 0.5,
    }
}

fn fire_cue(kind: BulletKind) -> Cue {
    match kind {
        BulletKind::Sniper => Cue::SniperShot,
        BulletKind::Normal => Cue::GunShot,
        BulletKind::Rocket => Cue::RocketShot,
    }
}

fn spawn_radius(kind: BulletKind, tuning: &Tuning) -> f32 {
    match kind {
        BulletKind::Rocket => tuning.bullet_radius + 10.0,
        BulletKind::Normal | BulletKind::Sniper => tuning.bullet_radius,
    }
}

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Strict overlap of two circles; touching edges do not count.
pub fn circles_intersect(ax: f32, ay: f32, ar: f32, bx: f32, by: f32, br: f32) -> bool {
    let dx = bx - ax;
    let dy = by - ay;
    let reach = ar + br;
    dx * dx + dy * dy < reach * reach
}

/// Unit vector from `(fx, fy)` toward `(tx, ty)`, or zero if they coincide.
pub fn aim_vector(fx: f32, fy: f32, tx: f32, ty: f32) -> (f32, f32) {
    let dx = tx - fx;
    let dy = ty - fy;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        (0.0, 0.0)
    } else {
        (dx / len, dy / len)
    }
}

/// True once the bullet's whole circle has left the arena on any side.
pub fn out_of_bounds(bullet: &Bullet, arena: &Arena) -> bool {
    bullet.x <= -bullet.radius
        || bullet.x >= arena.width + bullet.radius
        || bullet.y <= -bullet.radius
        || bullet.y >= arena.height + bullet.radius
}

pub fn bullet_hits_player(bullet: &Bullet, player: &Player) -> bool {
    circles_intersect(
        bullet.x,
        bullet.y,
        bullet.radius,
        player.x,
        player.y,
        player.radius,
    )
}

pub fn all_done(bullets: &[Bullet]) -> bool {
    bullets.iter().all(|b| b.state == BulletState::Done)
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Player centred in the arena.
pub fn make_player(arena: &Arena, tuning: &Tuning) -> Player {
    Player {
        x: arena.width / 2.0,
        y: arena.height / 2.0,
        radius: tuning.player_radius,
    }
}

/// Independent draws: sniper first, then a gated rocket roll.
pub fn roll_kind(tuning: &Tuning, rng: &mut impl Rng) -> BulletKind {
    if rng.gen_bool(tuning.sniper_chance) {
        BulletKind::Sniper
    } else if rng.gen_bool(tuning.rocket_gate) && rng.gen_bool(tuning.rocket_chance) {
        BulletKind::Rocket
    } else {
        BulletKind::Normal
    }
}

fn along_edge(extent: f32, inset: f32, rng: &mut impl Rng) -> f32 {
    if extent - inset > inset {
        rng.gen_range(inset..extent - inset)
    } else {
        extent / 2.0
    }
}

/// One bullet placed just inside a random arena edge.
pub fn make_bullet(arena: &Arena, tuning: &Tuning, rng: &mut impl Rng) -> Bullet {
    let inset = tuning.bullet_radius * 2.0;
    let (x, y) = match rng.gen_range(0..4) {
        0 => (along_edge(arena.width, inset, rng), inset),
        1 => (along_edge(arena.width, inset, rng), arena.height - inset),
        2 => (inset, along_edge(arena.height, inset, rng)),
        _ => (arena.width - inset, along_edge(arena.height, inset, rng)),
    };

    let kind = roll_kind(tuning, rng);
    Bullet {
        x,
        y,
        vx: 0.0,
        vy: 0.0,
        radius: spawn_radius(kind, tuning),
        speed: tuning.bullet_speed,
        kind,
        state: BulletState::Aiming,
        timer: 0.0,
    }
}

pub fn make_bullets(count: usize, arena: &Arena, tuning: &Tuning, rng: &mut impl Rng) -> Vec<Bullet> {
    (0..count).map(|_| make_bullet(arena, tuning, rng)).collect()
}

/// Build the title-screen state with the first round already laid out.
pub fn init_state(arena: Arena, tuning: Tuning, rng: &mut impl Rng) -> GameState {
    let state = GameState {
        player: make_player(&arena, &tuning),
        bullets: Vec::new(),
        current: 0,
        total_time: 0.0,
        phase: Phase::Begin,
        round: 0,
        bullet_count: tuning.start_count,
        cues: Vec::new(),
        arena,
        tuning,
    };
    reset_round(&state, rng)
}

/// Lay out the next round: more bullets, fresh player, clock back to zero.
pub fn reset_round(state: &GameState, rng: &mut impl Rng) -> GameState {
    let bullet_count = state
        .bullet_count
        .saturating_add(state.tuning.per_round)
        .min(state.tuning.max_count);
    let round = state.round + 1;
    debug!("Round {} laid out with {} bullets", round, bullet_count);
    GameState {
        player: make_player(&state.arena, &state.tuning),
        bullets: make_bullets(bullet_count, &state.arena, &state.tuning, rng),
        current: 0,
        total_time: 0.0,
        round,
        bullet_count,
        ..state.clone()
    }
}

/// Start over from the first round after a loss.
pub fn restart(state: &GameState, rng: &mut impl Rng) -> GameState {
    let fresh = GameState {
        round: 0,
        bullet_count: state.tuning.start_count,
        ..state.clone()
    };
    reset_round(&fresh, rng)
}

/// Rebuild the current round with the same bullet count, parked in `RepeatLevel`.
pub fn repeat_round(state: &GameState, rng: &mut impl Rng) -> GameState {
    let next = GameState {
        player: make_player(&state.arena, &state.tuning),
        bullets: make_bullets(state.bullet_count, &state.arena, &state.tuning, rng),
        current: 0,
        total_time: 0.0,
        ..state.clone()
    };
    with_phase(&next, Phase::RepeatLevel)
}

pub fn with_phase(state: &GameState, phase: Phase) -> GameState {
    if state.phase != phase {
        info!("Phase {:?} -> {:?} (round {})", state.phase, phase, state.round);
    }
    GameState {
        phase,
        ..state.clone()
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Apply one frame of held direction keys, then keep the player's circle
/// `player_margin` inside the arena.
pub fn move_player(state: &GameState, keys: &KeyTable) -> GameState {
    let step = state.tuning.player_step;
    let margin = state.tuning.player_margin;
    let p = &state.player;

    let mut x = p.x;
    let mut y = p.y;
    if keys.is_down(Key::Up) {
        y -= step;
    }
    if keys.is_down(Key::Left) {
        x -= step;
    }
    if keys.is_down(Key::Down) {
        y += step;
    }
    if keys.is_down(Key::Right) {
        x += step;
    }

    if x - p.radius < margin {
        x = margin + p.radius;
    } else if x + p.radius > state.arena.width - margin {
        x = state.arena.width - margin - p.radius;
    }
    if y - p.radius < margin {
        y = margin + p.radius;
    } else if y + p.radius > state.arena.height - margin {
        y = state.arena.height - margin - p.radius;
    }

    GameState {
        player: Player { x, y, ..p.clone() },
        ..state.clone()
    }
}

// ── Launch schedule ─────────────────────────────────────────────────────────

/// Round time at which the current bullet may fire.
pub fn fire_time(state: &GameState) -> f32 {
    state.current as f32 * state.tuning.bullet_interval + state.tuning.start_delay
}

/// Round time at which a current sniper stops telegraphing and arms.
pub fn sniper_arm_time(state: &GameState) -> f32 {
    fire_time(state) + state.tuning.line_time + state.tuning.sniper_hold
}

/// Index of the bullet whose telegraph line is showing, if any.
///
/// Only the current bullet can telegraph, and only when it is a sniper still
/// aiming inside its lead-in window.
pub fn telegraph(state: &GameState) -> Option<usize> {
    let b = state.bullets.get(state.current)?;
    let opens = (state.current as f32 - 1.0) * state.tuning.bullet_interval
        + state.tuning.start_delay;
    let showing = b.kind == BulletKind::Sniper
        && b.state == BulletState::Aiming
        && state.total_time > opens
        && state.total_time < sniper_arm_time(state);
    showing.then_some(state.current)
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Move everything in flight; anything fully off-screen is done.
pub fn move_bullets(state: &GameState, dt: f32) -> GameState {
    let bullets = state
        .bullets
        .iter()
        .map(|b| {
            if !matches!(b.state, BulletState::Normal | BulletState::Exploded) {
                return b.clone();
            }
            let mut moved = Bullet {
                x: b.x + b.vx * b.speed * dt,
                y: b.y + b.vy * b.speed * dt,
                ..b.clone()
            };
            if out_of_bounds(&moved, &state.arena) {
                moved.state = BulletState::Done;
            }
            moved
        })
        .collect();
    GameState {
        bullets,
        ..state.clone()
    }
}

/// Player hits, rocket detonations and the round-over check.
pub fn check_for_collisions(state: &GameState) -> GameState {
    if state.phase != Phase::Playing {
        return state.clone();
    }

    let mut next = state.clone();
    let fired = next.current.min(next.bullets.len());

    for i in 0..fired {
        if next.bullets[i].state == BulletState::Done {
            continue;
        }
        if bullet_hits_player(&next.bullets[i], &next.player) {
            next = with_phase(&next, Phase::End);
        }
        if next.bullets[i].kind == BulletKind::Rocket {
            continue;
        }

        // Non-rocket vs live rocket only; an exploded rocket never re-triggers.
        let hit = (0..fired).find(|&j| {
            let (b, r) = (&next.bullets[i], &next.bullets[j]);
            j != i
                && r.kind == BulletKind::Rocket
                && r.state == BulletState::Normal
                && circles_intersect(b.x, b.y, b.radius, r.x, r.y, r.radius)
        });
        if let Some(j) = hit {
            let total_time = next.total_time;
            let rocket = &mut next.bullets[j];
            rocket.radius = next.tuning.explosion_radius;
            rocket.vx = 0.0;
            rocket.vy = 0.0;
            rocket.timer = total_time;
            rocket.state = BulletState::Exploded;
            next.bullets[i].state = BulletState::Done;
            next.cues.push(Cue::Explosion);
            debug!("Bullet {} detonated rocket {} at t={:.2}", i, j, total_time);
        }
    }

    if next.phase == Phase::Playing && all_done(&next.bullets) {
        next.cues.push(Cue::MusicDown);
        next = with_phase(&next, Phase::RoundOver);
    }
    next
}

/// Walk the launch schedule: arm, shrink explosions, fire the current bullet.
pub fn advance_bullets(state: &GameState) -> GameState {
    let mut next = state.clone();

    for i in 0..next.bullets.len() {
        let is_current = i == next.current;

        if is_current && next.bullets[i].state == BulletState::Aiming {
            let armed = match next.bullets[i].kind {
                BulletKind::Sniper => next.total_time >= sniper_arm_time(&next),
                BulletKind::Normal | BulletKind::Rocket => true,
            };
            if armed {
                next.bullets[i].state = BulletState::Waiting;
            }
        }

        let hold = next.tuning.explosion_hold;
        let shrink = next.tuning.shrink_per_frame;
        let total_time = next.total_time;
        let b = &mut next.bullets[i];
        if b.state == BulletState::Exploded && total_time - b.timer > hold {
            b.radius -= shrink;
            if b.radius <= 0.0 {
                b.radius = 0.0;
                b.state = BulletState::Done;
            }
        }

        if is_current
            && next.bullets[i].state == BulletState::Waiting
            && next.total_time >= fire_time(&next)
        {
            let player = next.player.clone();
            let b = &mut next.bullets[i];
            let (ax, ay) = aim_vector(b.x, b.y, player.x, player.y);
            let m = kind_multiplier(b.kind);
            b.vx = ax * m;
            b.vy = ay * m;
            b.state = BulletState::Normal;
            let cue = fire_cue(b.kind);
            debug!("Fired bullet {} ({:?}) at t={:.2}", i, b.kind, next.total_time);
            next.cues.push(cue);
            next.current += 1;
        }
    }
    next
}

/// Advance the simulation by one frame of `dt` seconds.  Outside `Playing`
/// the state is returned unchanged.
pub fn tick(state: &GameState, keys: &KeyTable, dt: f32) -> GameState {
    if state.phase != Phase::Playing {
        return state.clone();
    }

    let next = move_bullets(state, dt);
    let next = move_player(&next, keys);
    let next = check_for_collisions(&next);
    let next = advance_bullets(&next);

    GameState {
        total_time: next.total_time + dt,
        ..next
    }
}
