//! Terminal rendering. All drawing I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session.  No game logic is performed; this module only translates
//! arena coordinates into terminal cells and state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use rand::Rng;

use bullet_hell::config::Arena;
use bullet_hell::entities::{Bullet, BulletKind, BulletState, GameState, Phase};
use bullet_hell::session::Session;

use crate::sound::SoundBoard;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::Grey;
const C_HUD: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::White;
const C_BULLET_NORMAL: Color = Color::Yellow;
const C_BULLET_SNIPER: Color = Color::Cyan;
const C_BULLET_ROCKET: Color = Color::Red;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_TELEGRAPH: Color = Color::Blue;
const C_DIMMED: Color = Color::DarkGrey;
const C_WARNING: Color = Color::Red;

/// Points sampled along a telegraph line.
const TELEGRAPH_SAMPLES: usize = 32;

// ── Arena ↔ terminal mapping ──────────────────────────────────────────────────

/// Maps the arena onto the play area: row 0 is the HUD, rows 1 and
/// `rows - 2` are the border, the last row holds the controls hint.
pub struct Viewport {
    cols: u16,
    rows: u16,
    arena: Arena,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, arena: Arena) -> Self {
        Self { cols, rows, arena }
    }

    fn inner_width(&self) -> u16 {
        self.cols.saturating_sub(2).max(1)
    }

    fn inner_height(&self) -> u16 {
        self.rows.saturating_sub(4).max(1)
    }

    /// Terminal cell holding arena point `(x, y)`, if it is on screen.
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= self.arena.width || y >= self.arena.height {
            return None;
        }
        let col = (x / self.arena.width * f32::from(self.inner_width())) as u16;
        let row = (y / self.arena.height * f32::from(self.inner_height())) as u16;
        Some((1 + col, 2 + row))
    }

    /// Arena point at the centre of a terminal cell; off-arena cells clamp to the edge.
    pub fn to_arena(&self, col: u16, row: u16) -> (f32, f32) {
        let cx = (f32::from(col) - 1.0 + 0.5) / f32::from(self.inner_width());
        let cy = (f32::from(row) - 2.0 + 0.5) / f32::from(self.inner_height());
        (
            (cx * self.arena.width).clamp(0.0, self.arena.width),
            (cy * self.arena.height).clamp(0.0, self.arena.height),
        )
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write, R: Rng>(
    out: &mut W,
    session: &Session<R>,
    view: &Viewport,
    sound: &SoundBoard,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    if session.is_paused() {
        draw_pause_screen(out, view)?;
    } else {
        let state = session.state();
        draw_border(out, view)?;
        draw_hud(out, state, view)?;

        if let Some(i) = session.telegraph() {
            draw_telegraph(out, state, &state.bullets[i], view)?;
        }
        let dimmed = state.phase != Phase::Playing;
        for bullet in &state.bullets {
            draw_bullet(out, bullet, view, dimmed)?;
        }
        draw_player(out, state, view)?;
        draw_phase_overlay(out, state, view)?;

        if session.is_debug() {
            draw_debug(out, session, view, sound)?;
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) and controls hint (last row) ──────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Round {:<3} Fired {:>2}/{:<2}",
        state.round,
        state.current,
        state.bullets.len()
    )))?;

    let time_str = format!("Time {:>6.1}s", state.total_time);
    let tx = view
        .cols
        .saturating_sub(time_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(Print(&time_str))?;

    let hint = if state.phase == Phase::Playing {
        "Move with WASD   P : Pause   F3 : Debug   Q : Quit"
    } else {
        "Click / Enter : Continue   Q : Quit"
    };
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    // Sprite (2 rows, 3 cols):
    //   ▲       ← row y - 1  (tip)
    //  /█\      ← row y      (fuselage + wings)
    let p = &state.player;
    let Some((col, row)) = view.to_cell(p.x, p.y) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_PLAYER))?;

    if row > 2 {
        out.queue(cursor::MoveTo(col, row - 1))?;
        out.queue(Print("▲"))?;
    }
    out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
    out.queue(Print("/█\\"))?;
    Ok(())
}

fn draw_bullet<W: Write>(
    out: &mut W,
    bullet: &Bullet,
    view: &Viewport,
    dimmed: bool,
) -> std::io::Result<()> {
    match bullet.state {
        BulletState::Aiming | BulletState::Waiting | BulletState::Done => Ok(()),
        BulletState::Exploded => draw_explosion(out, bullet, view, dimmed),
        BulletState::Normal => {
            let Some((col, row)) = view.to_cell(bullet.x, bullet.y) else {
                return Ok(());
            };
            let (glyph, color) = match bullet.kind {
                BulletKind::Normal => ("●", C_BULLET_NORMAL),
                BulletKind::Sniper => ("•", C_BULLET_SNIPER),
                BulletKind::Rocket => ("◆", C_BULLET_ROCKET),
            };
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(if dimmed { C_DIMMED } else { color }))?;
            out.queue(Print(glyph))?;
            Ok(())
        }
    }
}

/// Fill every cell whose centre lies inside the blast circle.
fn draw_explosion<W: Write>(
    out: &mut W,
    bullet: &Bullet,
    view: &Viewport,
    dimmed: bool,
) -> std::io::Result<()> {
    let r = bullet.radius;
    let (Some((c0, r0)), Some((c1, r1))) = (
        view.to_cell((bullet.x - r).max(0.0), (bullet.y - r).max(0.0)),
        view.to_cell(
            (bullet.x + r).min(view.arena.width - 1.0),
            (bullet.y + r).min(view.arena.height - 1.0),
        ),
    ) else {
        return Ok(());
    };

    out.queue(style::SetForegroundColor(if dimmed { C_DIMMED } else { C_EXPLOSION }))?;
    for row in r0..=r1 {
        for col in c0..=c1 {
            let (x, y) = view.to_arena(col, row);
            let (dx, dy) = (x - bullet.x, y - bullet.y);
            if dx * dx + dy * dy <= r * r {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(Print("░"))?;
            }
        }
    }
    Ok(())
}

/// Dotted line from an aiming sniper to the player.
fn draw_telegraph<W: Write>(
    out: &mut W,
    state: &GameState,
    bullet: &Bullet,
    view: &Viewport,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_TELEGRAPH))?;
    for step in 0..=TELEGRAPH_SAMPLES {
        let t = step as f32 / TELEGRAPH_SAMPLES as f32;
        let x = bullet.x + (state.player.x - bullet.x) * t;
        let y = bullet.y + (state.player.y - bullet.y) * t;
        if let Some((col, row)) = view.to_cell(x, y) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print(if step == 0 { "◎" } else { "·" }))?;
        }
    }
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn print_centered<W: Write>(
    out: &mut W,
    view: &Viewport,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (view.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_phase_overlay<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
) -> std::io::Result<()> {
    let cy = view.rows / 2;
    let lines: &[(&str, Color)] = match state.phase {
        Phase::Playing => return Ok(()),
        Phase::Begin => &[
            ("B U L L E T   H E L L", Color::White),
            ("", Color::White),
            ("Dodge Bullets!", Color::White),
            ("Survive!", C_WARNING),
            ("", Color::White),
            ("Move using WASD. Press P to pause.", Color::White),
            ("Hint: there are some bullets that behave differently.", C_HINT),
            ("", Color::White),
            ("Click to begin", Color::White),
        ],
        Phase::RoundOver => &[
            ("Round Over", Color::White),
            ("Click to continue", Color::White),
            ("R : replay this round", C_HINT),
        ],
        Phase::RepeatLevel => &[
            ("Same round again", Color::White),
            ("Click to start", Color::White),
        ],
        Phase::End => &[
            ("Game Over", Color::White),
            ("You Suck!", C_WARNING),
            ("Click to Restart", Color::Grey),
            ("R : retry this round", C_HINT),
        ],
    };

    let start = cy.saturating_sub(lines.len() as u16 / 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        if !text.is_empty() {
            print_centered(out, view, start + i as u16, text, *color)?;
        }
    }
    Ok(())
}

fn draw_pause_screen<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    print_centered(out, view, view.rows / 2, "...PAUSED...", Color::White)?;
    print_centered(
        out,
        view,
        view.rows / 2 + 2,
        "P : Resume",
        C_HINT,
    )
}

fn draw_debug<W: Write, R: Rng>(
    out: &mut W,
    session: &Session<R>,
    view: &Viewport,
    sound: &SoundBoard,
) -> std::io::Result<()> {
    let state = session.state();
    let live = state
        .bullets
        .iter()
        .filter(|b| b.state != BulletState::Done)
        .count();
    let text = format!(
        "dt: {:.3}  live: {}  current: {}  music: {:.1}",
        session.last_dt(),
        live,
        state.current,
        sound.music_volume()
    );
    let col = view
        .cols
        .saturating_sub(text.chars().count() as u16 + 2);
    out.queue(cursor::MoveTo(col, view.rows.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(text))?;
    Ok(())
}
