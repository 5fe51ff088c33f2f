//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable
//! [`FrameSnapshot`]. No game logic is performed; this module only
//! translates world coordinates into terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::entities::{EnemyKind, GameStatus, ParticleKind, Rect};
use crate::snapshot::FrameSnapshot;
use crate::states::PlayerState;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_STATE: Color = Color::DarkCyan;
const C_PLAYER: Color = Color::White;
const C_PLAYER_HURT: Color = Color::Red;
const C_ENEMY_FLYING: Color = Color::Magenta;
const C_ENEMY_CRAWLING: Color = Color::Green;
const C_DUST: Color = Color::DarkGrey;
const C_SPLASH: Color = Color::DarkYellow;
const C_BURST: Color = Color::Yellow;
const C_MESSAGE: Color = Color::White;
const C_GROUND: Color = Color::DarkGreen;
const C_LAYER: Color = Color::DarkGrey;
const C_DEBUG: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Maps world pixels onto the play area (rows 1 ..= rows-2).
#[derive(Clone, Copy, Debug)]
struct Viewport {
    cols: u16,
    rows: u16,
    scale_x: f32,
    scale_y: f32,
}

impl Viewport {
    fn new(snapshot: &FrameSnapshot, cols: u16, rows: u16) -> Self {
        let play_cols = cols.saturating_sub(2).max(1) as f32;
        let play_rows = rows.saturating_sub(3).max(1) as f32;
        Self {
            cols,
            rows,
            scale_x: play_cols / snapshot.width,
            scale_y: play_rows / snapshot.height,
        }
    }

    /// Terminal cell for a world point, if it lands inside the play area.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let col = (x * self.scale_x).floor() + 1.0;
        let row = (y * self.scale_y).floor() + 1.0;
        let in_cols = col >= 1.0 && col < f32::from(self.cols.saturating_sub(1));
        let in_rows = row >= 1.0 && row < f32::from(self.rows.saturating_sub(1));
        (in_cols && in_rows).then_some((col as u16, row as u16))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame into a `cols`×`rows` terminal.
pub fn render<W: Write>(
    out: &mut W,
    snapshot: &FrameSnapshot,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let view = Viewport::new(snapshot, cols, rows);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_background(out, snapshot, &view)?;
    draw_hud(out, snapshot, &view)?;

    for particle in &snapshot.particles {
        let glyph = match particle.kind {
            ParticleKind::Dust => (".", C_DUST),
            ParticleKind::Splash { .. } => ("✶", C_SPLASH),
        };
        let size = particle.size;
        put(out, &view, particle.x + size * 0.5, particle.y + size * 0.5, glyph.0, glyph.1)?;
    }

    for enemy in &snapshot.enemies {
        let (glyph, color) = match enemy.kind {
            EnemyKind::Flying if enemy.animation.frame % 2 == 0 => ("^v^", C_ENEMY_FLYING),
            EnemyKind::Flying => ("vˇv", C_ENEMY_FLYING),
            EnemyKind::Crawling => ("(~~)", C_ENEMY_CRAWLING),
        };
        let (cx, cy) = enemy.bounds().center();
        put(out, &view, cx, cy, glyph, color)?;
        if snapshot.debug {
            draw_box(out, &view, &enemy.bounds())?;
        }
    }

    draw_player(out, snapshot, &view)?;

    for burst in &snapshot.collisions {
        let glyph = if burst.animation.frame < 2 { "✺" } else { "*" };
        let (cx, cy) = (burst.x + burst.width * 0.5, burst.y + burst.height * 0.5);
        put(out, &view, cx, cy, glyph, C_BURST)?;
    }

    for message in &snapshot.messages {
        put(out, &view, message.x, message.y, &message.text, C_MESSAGE)?;
    }

    draw_controls_hint(out, &view)?;

    if snapshot.status == GameStatus::GameOver {
        draw_game_over(out, snapshot, &view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn put<W: Write>(
    out: &mut W,
    view: &Viewport,
    x: f32,
    y: f32,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(x, y) {
        // Trim so the text never overwrites the right wall.
        let room = view.cols.saturating_sub(1).saturating_sub(col) as usize;
        let clipped: String = text.chars().take(room).collect();
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(clipped))?;
    }
    Ok(())
}

// ── Border & background ───────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

/// Parallax: each layer is a sparse row of marks shifted by its scroll
/// offset; nearer layers sit lower and move faster.
fn draw_background<W: Write>(
    out: &mut W,
    snapshot: &FrameSnapshot,
    view: &Viewport,
) -> std::io::Result<()> {
    const MARKS: [&str; 5] = ["·", "˙", "^", "♣", "▲"];
    const SPACING: f32 = 240.0;

    let layer_count = snapshot.layers.len().max(1) as f32;
    for (i, layer) in snapshot.layers.iter().enumerate() {
        let band = snapshot.ground_y * (0.2 + 0.7 * (i as f32 + 1.0) / layer_count);
        let offset = layer.x.rem_euclid(SPACING);
        let mut x = offset;
        while x < snapshot.width {
            put(out, view, x, band, MARKS[i % MARKS.len()], C_LAYER)?;
            x += SPACING;
        }
    }

    if let Some((_, row)) = view.cell(0.0, snapshot.ground_y) {
        out.queue(cursor::MoveTo(1, row))?;
        out.queue(style::SetForegroundColor(C_GROUND))?;
        out.queue(Print("▀".repeat(view.cols.saturating_sub(2) as usize)))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, snapshot: &FrameSnapshot, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Kills:{:>4}", snapshot.score)))?;

    let state_str = format!("[ {} ]", snapshot.player.state.name());
    let sx = (view.cols / 2).saturating_sub(state_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(sx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_STATE))?;
    out.queue(Print(&state_str))?;

    let hearts: String = (0..snapshot.max_hit_points)
        .map(|i| if i < snapshot.hit_points { '♥' } else { '♡' })
        .collect();
    let lives_str = format!("HP:{}", hearts);
    let rx = view
        .cols
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Three-row stick figure per state, bottom row on the box's feet.
fn player_sprite(state: PlayerState, frame: u32) -> [&'static str; 3] {
    let stride = frame % 2 == 0;
    match state {
        PlayerState::Idle => [" o ", "/|\\", "/ \\"],
        PlayerState::Walking | PlayerState::Running if stride => [" o ", "/|\\", "/ >"],
        PlayerState::Walking | PlayerState::Running => [" o ", "/|\\", "< \\"],
        PlayerState::Sitting | PlayerState::Standing => ["   ", " o ", "/|_"],
        PlayerState::Jumping => ["\\o/", " | ", "/ \\"],
        PlayerState::Falling => [" o ", "\\|/", "/ \\"],
        PlayerState::Fighting => [" o ", "/|=", "/ \\"],
        PlayerState::Dashing => ["»o ", "»|\\", "»/ "],
        PlayerState::Dying => ["   ", "   ", "x_x"],
    }
}

fn draw_player<W: Write>(out: &mut W, snapshot: &FrameSnapshot, view: &Viewport) -> std::io::Result<()> {
    let p = &snapshot.player;
    let color = if snapshot.hit_points <= 1 { C_PLAYER_HURT } else { C_PLAYER };
    let sprite = player_sprite(p.state, p.frame);

    let cx = p.bounds.x + p.bounds.width * 0.5;
    let feet = p.bounds.y + p.bounds.height;
    let row_height = 1.0 / view.scale_y;
    for (i, line) in sprite.iter().enumerate() {
        let y = feet - row_height * (3 - i) as f32;
        // Centre the three-column sprite on the box.
        let x = cx - 1.0 / view.scale_x;
        put(out, view, x, y, line, color)?;
    }

    if snapshot.debug {
        draw_box(out, view, &p.bounds)?;
    }
    Ok(())
}

/// Debug outline of a bounding box.
fn draw_box<W: Write>(out: &mut W, view: &Viewport, rect: &Rect) -> std::io::Result<()> {
    let corners = [
        (rect.x, rect.y),
        (rect.x + rect.width, rect.y),
        (rect.x, rect.y + rect.height),
        (rect.x + rect.width, rect.y + rect.height),
    ];
    for (x, y) in corners {
        put(out, view, x, y, "+", C_DEBUG)?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "←→/AD Move  ↑/W/Space Jump  ↓/S Sit  Shift Run  Enter/Click Fight  Q Dash  ` Debug  Esc Quit",
    ))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, snapshot: &FrameSnapshot, view: &Viewport) -> std::io::Result<()> {
    let score_line = format!("Kills: {:>4}", snapshot.score);

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];

    let cx = view.cols / 2;
    let total_rows = lines.len() + 2;
    let start_row = (view.rows / 2).saturating_sub(total_rows as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let score_row = start_row + lines.len() as u16;
    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    let hint = "R - Play Again  Esc - Quit";
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row + 1))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}
