/// Rendering layer. All terminal I/O lives here.
///
/// `TerminalRenderer` implements the simulation's `Renderer` trait by
/// buffering draw calls for one frame, then `flush` maps the 420x720 world
/// onto the terminal grid and writes everything with crossterm.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use mini_galaga::entities::{PowerupKind, SpriteKind, VIEW_H, VIEW_W};
use mini_galaga::services::{Renderer, TINT_FLASH, TINT_SHIELD};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_PLAYER: Color = Color::Cyan;
const C_ENEMY: Color = Color::Red;
const C_ENEMY_DIVING: Color = Color::Magenta;
const C_BULLET_PLAYER: Color = Color::Yellow;
const C_BULLET_ENEMY: Color = Color::Green;
const C_BONUS_SHOT: Color = Color::Yellow;
const C_BONUS_SHIELD: Color = Color::Blue;
const C_BONUS_BOMB: Color = Color::Red;
const C_BANNER: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

/// Frames a particle burst stays on screen (≈260 ms at 30 FPS).
const BURST_FRAMES: u32 = 8;

struct Glyph {
    col: u16,
    row: u16,
    text: &'static str,
    color: Color,
}

struct Burst {
    col: u16,
    row: u16,
    color: Color,
    frames: u32,
}

struct Text {
    x: f32,
    y: f32,
    text: String,
}

pub struct TerminalRenderer {
    width: u16,
    height: u16,
    glyphs: Vec<Glyph>,
    texts: Vec<Text>,
    bursts: Vec<Burst>,
}

impl TerminalRenderer {
    pub fn new(width: u16, height: u16) -> Self {
        TerminalRenderer {
            width,
            height,
            glyphs: Vec::new(),
            texts: Vec::new(),
            bursts: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// World -> terminal cell inside the border (rows 2 .. height-3).
    fn cell(&self, x: f32, y: f32) -> (u16, u16) {
        let inner_w = self.width.saturating_sub(2).max(1) as f32;
        let inner_h = self.height.saturating_sub(4).max(1) as f32;
        let col = 1.0 + (x / VIEW_W).clamp(0.0, 0.999) * inner_w;
        let row = 2.0 + (y / VIEW_H).clamp(0.0, 0.999) * inner_h;
        (col as u16, row as u16)
    }

    /// Write the buffered frame and clear the buffers.
    pub fn flush<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.draw_border(out)?;

        for g in &self.glyphs {
            // Centre multi-column sprites on their cell.
            let half = g.text.chars().count() as u16 / 2;
            out.queue(cursor::MoveTo(g.col.saturating_sub(half).max(1), g.row))?;
            out.queue(style::SetForegroundColor(g.color))?;
            out.queue(Print(g.text))?;
        }

        for b in &self.bursts {
            out.queue(style::SetForegroundColor(b.color))?;
            let spread = (BURST_FRAMES - b.frames) as u16 / 3 + 1;
            for (col, row) in [
                (b.col.saturating_sub(spread), b.row),
                (b.col + spread, b.row),
                (b.col, b.row.saturating_sub(1)),
                (b.col, b.row + 1),
            ] {
                if row >= 2 && row < self.height.saturating_sub(2) && col >= 1 {
                    out.queue(cursor::MoveTo(col, row))?;
                    out.queue(Print("*"))?;
                }
            }
        }

        self.draw_texts(out)?;
        self.draw_controls_hint(out)?;

        // Park cursor in a harmless spot and flush
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.height.saturating_sub(1)))?;
        out.flush()?;

        self.glyphs.clear();
        self.texts.clear();
        for b in self.bursts.iter_mut() {
            b.frames = b.frames.saturating_sub(1);
        }
        self.bursts.retain(|b| b.frames > 0);
        Ok(())
    }

    // ── Border ────────────────────────────────────────────────────────────────

    fn draw_border<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let w = self.width as usize;
        let h = self.height;

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
            out.queue(cursor::MoveTo(self.width.saturating_sub(1), row))?;
            out.queue(Print("│"))?;
        }

        Ok(())
    }

    // ── Text: HUD (row 0) and centred banners ─────────────────────────────────

    fn draw_texts<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut hud_col: u16 = 1;
        for t in &self.texts {
            if t.y < 60.0 {
                // HUD lines share row 0, left to right.
                out.queue(cursor::MoveTo(hud_col, 0))?;
                out.queue(style::SetForegroundColor(C_HUD))?;
                out.queue(Print(&t.text))?;
                hud_col += t.text.chars().count() as u16 + 3;
                continue;
            }

            let (cx, cy) = self.cell(t.x, t.y);
            let lines: Vec<&str> = t.text.lines().collect();
            let start_row = cy.saturating_sub(lines.len() as u16 / 2);
            out.queue(style::SetForegroundColor(C_BANNER))?;
            for (i, line) in lines.iter().enumerate() {
                let col = cx.saturating_sub(line.chars().count() as u16 / 2);
                out.queue(cursor::MoveTo(col, start_row + i as u16))?;
                out.queue(Print(*line))?;
            }
        }
        Ok(())
    }

    // ── Controls hint (last row) ──────────────────────────────────────────────

    fn draw_controls_hint<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.queue(cursor::MoveTo(1, self.height.saturating_sub(1)))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print("← → / A D : Move   SPACE : Shoot   B : Bomb   Q : Quit"))?;
        Ok(())
    }
}

fn rgb(color: u32) -> Color {
    Color::Rgb {
        r: (color >> 16) as u8,
        g: (color >> 8) as u8,
        b: color as u8,
    }
}

impl Renderer for TerminalRenderer {
    fn draw_sprite(&mut self, kind: SpriteKind, x: f32, y: f32, rotation: f32, tint: Option<u32>) {
        let (col, row) = self.cell(x, y);
        let (text, base) = match kind {
            SpriteKind::Player => ("/▲\\", C_PLAYER),
            // Divers are drawn flipped.
            SpriteKind::Enemy if rotation.abs() > 1.0 => ("»▼«", C_ENEMY_DIVING),
            SpriteKind::Enemy => ("«◆»", C_ENEMY),
            SpriteKind::PlayerBullet if rotation < -0.05 => ("\\", C_BULLET_PLAYER),
            SpriteKind::PlayerBullet if rotation > 0.05 => ("/", C_BULLET_PLAYER),
            SpriteKind::PlayerBullet => ("║", C_BULLET_PLAYER),
            SpriteKind::EnemyBullet => ("↓", C_BULLET_ENEMY),
            SpriteKind::Powerup(PowerupKind::Shot) => ("★", C_BONUS_SHOT),
            SpriteKind::Powerup(PowerupKind::Shield) => ("◎", C_BONUS_SHIELD),
            SpriteKind::Powerup(PowerupKind::Bomb) => ("●", C_BONUS_BOMB),
        };
        let color = match tint {
            Some(TINT_FLASH) => Color::White,
            Some(TINT_SHIELD) => Color::Blue,
            Some(other) => rgb(other),
            None => base,
        };
        self.glyphs.push(Glyph { col, row, text, color });
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str) {
        self.texts.push(Text {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn emit_particle_burst(&mut self, x: f32, y: f32, color: u32) {
        let (col, row) = self.cell(x, y);
        self.bursts.push(Burst {
            col,
            row,
            color: rgb(color),
            frames: BURST_FRAMES,
        });
    }
}
