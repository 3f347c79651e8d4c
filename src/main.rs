mod display;
mod sound;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        MouseButton, MouseEvent, MouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use bullet_hell::config::{Config, DEFAULT_CONFIG_PATH};
use bullet_hell::error::GameError;
use bullet_hell::input::Key;
use bullet_hell::session::Session;
use bullet_hell::timing::FrameClock;

use crate::display::Viewport;
use crate::sound::SoundBoard;

#[derive(Parser)]
#[command(version, about = "Dodge the bullets. Survive.")]
struct Cli {
    /// INI file with arena, bullet and player tuning.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Seed the bullet layout for a repeatable game.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Start with the debug overlay on.
    #[arg(long)]
    debug: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// Frames a direction stays down after its last press or repeat event.
/// Terminals without release events only send auto-repeat, which arrives
/// well inside this window.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Terminal keys for each simulation direction.
fn bindings(key: Key) -> [KeyCode; 3] {
    match key {
        Key::Up => [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
        Key::Left => [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
        Key::Down => [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
        Key::Right => [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Direction keys are tracked by the frame they were last seen; each frame the
/// fresh ones are copied into the session's key table for the simulation.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session<StdRng>,
    sound: &mut SoundBoard,
    rx: &mpsc::Receiver<Event>,
    target_fps: u32,
) -> Result<(), GameError> {
    let frame_budget = Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1)));
    let (cols, rows) = terminal::size()?;
    let mut view = Viewport::new(cols, rows, session.state().arena);
    let mut clock = FrameClock::new();

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    // Press: record key + handle one-shot actions
                    KeyEventKind::Press => {
                        key_frame.insert(code.clone(), frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Char('p') | KeyCode::Char('P') => {
                                session.toggle_pause();
                                clock.reset();
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') => session.repeat_level(),
                            KeyCode::F(3) => session.toggle_debug(),
                            KeyCode::Enter | KeyCode::Char(' ') => {
                                let p = &session.state().player;
                                let (x, y) = (p.x, p.y);
                                session.click(x, y);
                            }
                            _ => {}
                        }
                    }
                    // Repeat: refresh timestamp so key stays "held"
                    KeyEventKind::Repeat => {
                        key_frame.insert(code.clone(), frame);
                    }
                    // Release: remove key immediately (keyboard-enhancement path)
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => {
                    let (x, y) = view.to_arena(column, row);
                    session.click(x, y);
                }
                Event::FocusLost => session.pause(),
                Event::FocusGained => {
                    session.resume();
                    clock.reset();
                }
                Event::Resize(cols, rows) => {
                    view = Viewport::new(cols, rows, session.state().arena);
                }
                _ => {}
            }
        }

        // ── Publish held directions to the simulation ─────────────────────────
        for key in [Key::Up, Key::Left, Key::Down, Key::Right] {
            let held = any_held(&key_frame, &bindings(key), frame);
            session.keys_mut().set(key, held);
        }

        let dt = clock.tick(Instant::now());
        session.frame(dt);

        sound.play(out, &session.take_cues())?;
        display::render(out, session, &view, sound)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Terminal mode ─────────────────────────────────────────────────────────────

/// Switch the terminal into game mode. `keyboard_enhanced` is set once the
/// enhancement flags have been pushed, so teardown knows to pop them.
fn enter_terminal<W: Write>(out: &mut W, keyboard_enhanced: &mut bool) -> Result<(), GameError> {
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;
    if out.execute(EnableFocusChange).is_err() {
        warn!("Terminal does not report focus changes; auto-pause disabled");
    }

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold window.
    *keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    Ok(())
}

fn leave_terminal<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableFocusChange);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Run `body` in game mode. The terminal is restored afterwards, including
/// when setup fails partway through.
fn with_terminal<W: Write, T>(
    out: &mut W,
    body: impl FnOnce(&mut W) -> Result<T, GameError>,
) -> Result<T, GameError> {
    let mut keyboard_enhanced = false;
    let result = enter_terminal(out, &mut keyboard_enhanced).and_then(|()| body(out));
    leave_terminal(out, keyboard_enhanced);
    result
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(log_file: Option<&PathBuf>) -> Result<(), GameError> {
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        // Anything chattier than warn would scribble over the game screen.
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<(), GameError> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let config = Config::load(&cli.config)?;
    let rng = match cli.seed {
        Some(seed) => {
            info!("Seeding bullet layout with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let mut session = Session::init(&config, rng);
    if cli.debug {
        session.toggle_debug();
    }
    let mut sound = SoundBoard::new(config.display.bell);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    let result = with_terminal(&mut out, |out| {
        // Dedicate a thread exclusively to blocking event reads, sending them
        // through a channel so the game loop never has to block on I/O.
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || {
            while let Ok(ev) = event::read() {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
        });
        game_loop(out, &mut session, &mut sound, &rx, config.display.target_fps)
    });

    info!(
        "Quit in round {} after {:.1}s",
        session.state().round,
        session.state().total_time
    );
    result
}
