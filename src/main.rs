use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, ModifierKeyCode, MouseButton, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use side_scroller::display;
use side_scroller::prelude::*;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// OS key repeat is ≥ 15 Hz, so 8 frames (≈133 ms) is refreshed before it
/// expires.
const HOLD_WINDOW: u64 = 8;

/// Browser-style identifier for a key event, the names [`Bindings`] knows.
fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char('*') => "NumpadMultiply".to_string(),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            format!("Key{}", c.to_ascii_uppercase())
        }
        KeyCode::Modifier(ModifierKeyCode::LeftShift) => "ShiftLeft".to_string(),
        KeyCode::Modifier(ModifierKeyCode::RightShift) => "ShiftRight".to_string(),
        _ => return None,
    };
    Some(name)
}

/// Held identifiers → frame they were last seen.
#[derive(Default)]
struct HeldKeys {
    last_seen: HashMap<String, u64>,
    /// Mouse buttons report a real release, so they never expire.
    sticky: Vec<String>,
}

impl HeldKeys {
    fn press(&mut self, name: String, frame: u64) {
        self.last_seen.insert(name, frame);
    }

    fn release(&mut self, name: &str) {
        self.last_seen.remove(name);
    }

    fn controls(&self, bindings: &Bindings, frame: u64) -> ControlSet {
        let fresh = self
            .last_seen
            .iter()
            .filter(|(_, &last)| frame.saturating_sub(last) <= HOLD_WINDOW)
            .map(|(name, _)| name.as_str());
        bindings.resolve(fresh.chain(self.sticky.iter().map(String::as_str)))
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "☾  NIGHT  RUNNER  ☽";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(4),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let lines: &[(&str, Color)] = &[
        ("[Enter] Start   [Esc] Quit", Color::White),
        ("Fight (Enter / click) to score, dash (Q) to slip through.", Color::DarkGrey),
        ("Every other touch costs a heart.", Color::DarkGrey),
    ];
    for (i, (text, color)) in lines.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(
            cx.saturating_sub(text.chars().count() as u16 / 2),
            row,
        ))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() {
            if kind == KeyEventKind::Release {
                continue;
            }
            match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                KeyCode::Esc => return Ok(MenuResult::Quit),
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program, `false` → back to menu.
///
/// Every press or repeat refreshes a key's timestamp; each frame the keys
/// seen within `HOLD_WINDOW` frames form the held set handed to the world.
/// Terminals with keyboard enhancement also report releases, which drop
/// the key at once.
fn game_loop<W: Write>(
    out: &mut W,
    world: &mut World,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> std::io::Result<bool> {
    let bindings = Bindings::default();
    let mut held = HeldKeys::default();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => {
                    match (kind, code) {
                        (KeyEventKind::Release, code) => {
                            if let Some(name) = key_name(code) {
                                held.release(&name);
                            }
                            continue;
                        }
                        (_, KeyCode::Esc) => return Ok(true),
                        (_, KeyCode::Char('c')) if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        (_, KeyCode::Char('r') | KeyCode::Char('R')) if world.is_game_over() => {
                            return Ok(false);
                        }
                        (KeyEventKind::Press, KeyCode::Char('`')) => {
                            world.debug = !world.debug;
                            tracing::debug!(debug = world.debug, "debug overlay toggled");
                        }
                        _ => {}
                    }
                    if let Some(name) = key_name(code) {
                        held.press(name, frame);
                    }
                    // Classic terminals only report Shift as a modifier.
                    if modifiers.contains(KeyModifiers::SHIFT) {
                        held.press("ShiftLeft".to_string(), frame);
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        held.sticky.push("MouseClick".to_string());
                    }
                    MouseEventKind::Up(MouseButton::Left) => held.sticky.clear(),
                    _ => {}
                },
                _ => {}
            }
        }

        let now = Instant::now();
        let elapsed_ms = now.duration_since(last).as_secs_f32() * 1000.0;
        last = now;

        let controls = held.controls(&bindings, frame);
        world.tick(elapsed_ms, controls, rng);

        let (cols, rows) = terminal::size()?;
        display::render(out, &world.snapshot(), cols, rows)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(config: &GameConfig) -> anyhow::Result<()> {
    let file = std::fs::File::create(&config.log_file)
        .with_context(|| format!("creating log file '{}'", config.log_file))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("side_scroller=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(&path)?,
        None => GameConfig::default(),
    };
    init_tracing(&config)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Ask for key-release events; terminals without the kitty protocol
    // fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

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

    let result = run(&mut out, &rx, &config, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal session failed")
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    loop {
        match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let mut world = World::new(config.clone());
                tracing::info!("new game");
                let quit = game_loop(out, &mut world, rx, rng)?;
                tracing::info!(score = world.score, frames = world.frame, "game ended");
                world.teardown();

                if quit {
                    break;
                }
            }
        }
    }
    Ok(())
}
