//! Software-rendered HUD using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────┬──────────────────────────────┬──────────┐
//! │ PLAYER 1 │        timer / 3·2·1·GO!     │ PLAYER 2 │
//! │   score  │                              │   score  │
//! ├──────────┘   wrist markers, face box    └──────────┤
//! │                (menu / result overlay)             │
//! │  status bar                                        │
//! │  key legend                                        │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! The HUD is read-only with respect to game state: it renders an
//! [`AppState`] snapshot each frame and translates key presses into
//! [`UiCommand`]s (and clap keys into [`SimInput`] for the simulated
//! detector).

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use clap_stream::{side_for, GameMode, PlayerSide};
use round_engine::{RoundPhase, Winner};

use crate::app::{AppState, UiCommand};
use crate::detector::SimInput;

use std::sync::mpsc::Sender;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 960;
pub const WIN_H: usize = 540;

const PANEL_W:   usize = 200;
const PANEL_H:   usize = 120;
const MARGIN:    usize = 20;
const STATUS_Y:  usize = WIN_H - 40;

const BG_COLOR:  u32 = 0xFF0F172A;
const PANEL_BG:  u32 = 0xFF1E293B;
const TEXT_BG:   u32 = 0xFF16213E;
const P1_COLOR:  u32 = 0xFF22D3EE; // cyan
const P2_COLOR:  u32 = 0xFFA78BFA; // violet
const URGENT:    u32 = 0xFFEF4444; // red — last five seconds
const GO_COLOR:  u32 = 0xFFFFD700; // gold
const TEXT:      u32 = 0xFFE2E8F0;
const MUTED:     u32 = 0xFF64748B;
const FACE:      u32 = 0xFF00FFFF;

/// Last-seconds warning boundary for the play clock.
const URGENT_SECS: u32 = 5;

// ════════════════════════════════════════════════════════════════════════════
// Hud
// ════════════════════════════════════════════════════════════════════════════

pub struct Hud {
    window: Window,
    buf:    Vec<u32>,
    sim_tx: Sender<SimInput>,
}

impl Hud {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, String> {
        let mut window = Window::new(
            "Clap Arena",
            WIN_W,
            WIN_H,
            WindowOptions { resize: false, ..WindowOptions::default() },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Hud { window, buf: vec![BG_COLOR; WIN_W * WIN_H], sim_tx })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll keyboard input.  Clap keys feed the simulated detector; every
    /// other key becomes a [`UiCommand`] for the app to filter by phase.
    pub fn poll_input(&mut self) -> Vec<UiCommand> {
        let mut cmds = Vec::new();
        if !self.window.is_open() {
            return cmds;
        }

        let pressed = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if pressed(&self.window, Key::Q) {
            cmds.push(UiCommand::Quit);
            return cmds;
        }
        if pressed(&self.window, Key::Key1) {
            cmds.push(UiCommand::SelectMode(GameMode::Single));
        }
        if pressed(&self.window, Key::Key2) {
            cmds.push(UiCommand::SelectMode(GameMode::Double));
        }
        if pressed(&self.window, Key::Key3) {
            cmds.push(UiCommand::SelectDuration(10));
        }
        if pressed(&self.window, Key::Key4) {
            cmds.push(UiCommand::SelectDuration(30));
        }
        if pressed(&self.window, Key::Key5) {
            cmds.push(UiCommand::SelectDuration(60));
        }
        if pressed(&self.window, Key::Space) || pressed(&self.window, Key::Enter) {
            cmds.push(UiCommand::Start);
        }
        if pressed(&self.window, Key::R) {
            cmds.push(UiCommand::Rematch);
        }

        // One press = one simulated clap gesture.
        if pressed(&self.window, Key::Z) {
            let _ = self.sim_tx.send(SimInput::Clap(PlayerSide::P1));
        }
        if pressed(&self.window, Key::M) {
            let _ = self.sim_tx.send(SimInput::Clap(PlayerSide::P2));
        }
        if pressed(&self.window, Key::C) {
            let _ = self.sim_tx.send(SimInput::ClapBoth);
        }

        cmds
    }

    /// Render one frame from the current app state.
    pub fn render(&mut self, app: &AppState) {
        self.buf.fill(BG_COLOR);

        let phase = app.engine().phase();
        // HUD chrome drops to low intensity behind the menu and result
        // overlays; the previous round's scores stay visible through it.
        let dimmed = matches!(phase, RoundPhase::Menu | RoundPhase::GameOver);

        let mode = if phase == RoundPhase::Menu {
            app.selected_mode()
        } else {
            app.engine().mode()
        };

        // ── tracking layer (wrists + faces, display only) ────────────────
        if mode == GameMode::Double {
            self.draw_midline(dim_if(MUTED, dimmed));
        }
        for face in app.faces() {
            self.draw_face_box(face, dim_if(FACE, dimmed));
        }
        for hand in app.hands() {
            if let Some(w) = hand.wrist() {
                let color = match (mode, side_for(w.x)) {
                    (GameMode::Single, _) => P1_COLOR,
                    (GameMode::Double, PlayerSide::P1) => P1_COLOR,
                    (GameMode::Double, PlayerSide::P2) => P2_COLOR,
                };
                self.draw_wrist_marker(w.x, w.y, dim_if(color, dimmed));
            }
        }

        // ── score panels ─────────────────────────────────────────────────
        let (p1, p2) = app.board().pair();
        self.draw_score_panel(MARGIN, "PLAYER 1 (LEFT)", p1, dim_if(P1_COLOR, dimmed), dimmed);
        if mode == GameMode::Double {
            self.draw_score_panel(
                WIN_W - MARGIN - PANEL_W,
                "PLAYER 2 (RIGHT)",
                p2,
                dim_if(P2_COLOR, dimmed),
                dimmed,
            );
        }

        // ── center: countdown / clock / GO ───────────────────────────────
        match phase {
            RoundPhase::Countdown => {
                let text = format!("{}", app.engine().countdown());
                self.draw_text_centered(&text, WIN_H / 2 - 40, 12, TEXT);
            }
            RoundPhase::Playing => {
                let t = app.engine().time_left();
                if app.engine().countdown() == 0 && t == app.engine().duration() {
                    // The terminal countdown tick: visible zero-state.
                    self.draw_text_centered("GO!", WIN_H / 2 - 40, 12, GO_COLOR);
                }
                let color = if t <= URGENT_SECS { URGENT } else { TEXT };
                self.draw_text_centered(&format!("{}", t), MARGIN + 24, 6, color);
            }
            RoundPhase::Menu => self.draw_menu(app),
            RoundPhase::GameOver => self.draw_result(app),
        }

        // ── status bar + key legend ──────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_text(&app.status, 10, STATUS_Y + 6, 2, TEXT);
        self.draw_text(
            "1/2=MODE  3/4/5=TIME  SPACE=START  Z/M/C=CLAP  R=REMATCH  Q=QUIT",
            10,
            STATUS_Y + 26,
            2,
            MUTED,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── screens ──────────────────────────────────────────────────────────

    fn draw_menu(&mut self, app: &AppState) {
        self.draw_text_centered("CLAP ARENA", 110, 8, TEXT);
        self.draw_text_centered("CLAP FASTER THAN YOUR OPPONENT", 170, 2, MUTED);

        let mode_line = match app.selected_mode() {
            GameMode::Single => "MODE:  [1] SINGLE   2  DOUBLE",
            GameMode::Double => "MODE:   1  SINGLE  [2] DOUBLE",
        };
        self.draw_text_centered(mode_line, 230, 3, TEXT);

        let dur_line = match app.selected_duration() {
            10 => "TIME:  [3] 10S   4  30S   5  60S",
            30 => "TIME:   3  10S  [4] 30S   5  60S",
            60 => "TIME:   3  10S   4  30S  [5] 60S",
            _ => "TIME:   3  10S   4  30S   5  60S",
        };
        self.draw_text_centered(dur_line, 270, 3, TEXT);

        if app.detector_ready() {
            self.draw_text_centered("PRESS SPACE TO START", 340, 4, GO_COLOR);
        } else {
            self.draw_text_centered("LOADING DETECTOR...", 340, 4, MUTED);
        }
    }

    fn draw_result(&mut self, app: &AppState) {
        let (p1, p2) = app.board().pair();
        let (line, color) = match app.engine().winner() {
            Some(Winner::P1) => ("PLAYER 1 WINS!", P1_COLOR),
            Some(Winner::P2) => ("PLAYER 2 WINS!", P2_COLOR),
            Some(Winner::Draw) => ("DRAW!", TEXT),
            None => ("GAME OVER", TEXT),
        };
        self.draw_text_centered(line, 170, 8, color);

        let tally = match app.engine().mode() {
            GameMode::Single => format!("{} CLAPS", p1),
            GameMode::Double => format!("{} - {}", p1, p2),
        };
        self.draw_text_centered(&tally, 260, 6, TEXT);
        self.draw_text_centered("R = REMATCH", 330, 3, MUTED);
    }

    // ── HUD widgets ──────────────────────────────────────────────────────

    fn draw_score_panel(&mut self, x: usize, label: &str, score: u32, accent: u32, dimmed: bool) {
        self.fill_rect(x, MARGIN, PANEL_W, PANEL_H, dim_if(PANEL_BG, dimmed));
        self.draw_text(label, x + 12, MARGIN + 10, 2, dim_if(MUTED, dimmed));
        self.draw_text(&format!("{}", score), x + 12, MARGIN + 32, 8, accent);
    }

    fn draw_wrist_marker(&mut self, nx: f32, ny: f32, color: u32) {
        let cx = norm_to_px(nx, WIN_W);
        let cy = norm_to_px(ny, WIN_H);
        let r = 6usize;
        self.fill_rect(cx.saturating_sub(r), cy.saturating_sub(r), 2 * r, 2 * r, color);
    }

    fn draw_face_box(&mut self, face: &clap_stream::FaceBox, color: u32) {
        let x = norm_to_px(face.x, WIN_W);
        let y = norm_to_px(face.y, WIN_H);
        let w = norm_to_px(face.w, WIN_W);
        let h = norm_to_px(face.h, WIN_H);
        self.draw_border(x, y, w.max(2), h.max(2), color);
        self.draw_text("PLAYER FACE", x, y.saturating_sub(12), 2, color);
    }

    fn draw_midline(&mut self, color: u32) {
        let x = WIN_W / 2;
        let mut y = PANEL_H + 2 * MARGIN;
        while y < STATUS_Y {
            for dy in 0..6 {
                self.set_pixel(x, y + dy, color);
            }
            y += 14; // dashed
        }
    }

    // ── primitive drawing helpers ────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for col in x..(x + w).min(WIN_W) {
            if y < WIN_H {
                self.buf[y * WIN_W + col] = color;
            }
            if y + h - 1 < WIN_H {
                self.buf[(y + h - 1) * WIN_W + col] = color;
            }
        }
        for row in y..(y + h).min(WIN_H) {
            if x < WIN_W {
                self.buf[row * WIN_W + x] = color;
            }
            if x + w - 1 < WIN_W {
                self.buf[row * WIN_W + x + w - 1] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    /// Scaled 3×5 bitmap text.  Unknown characters render as a dot.
    fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > WIN_W {
                break;
            }
        }
    }

    fn draw_text_centered(&mut self, text: &str, y: usize, scale: usize, color: u32) {
        let w = text_width(text, scale);
        let x = WIN_W.saturating_sub(w) / 2;
        self.draw_text(text, x, y, scale, color);
    }
}

/// Pixel width of `text` at `scale` (trailing gap excluded).
fn text_width(text: &str, scale: usize) -> usize {
    let n = text.chars().count();
    if n == 0 { 0 } else { n * 4 * scale - scale }
}

/// Normalized `[0, 1]` coordinate → pixel along an axis of `extent`.
fn norm_to_px(v: f32, extent: usize) -> usize {
    let clamped = v.clamp(0.0, 1.0);
    ((clamped * extent as f32) as usize).min(extent - 1)
}

/// HUD chrome at reduced intensity behind menu/result overlays.
fn dim_if(color: u32, dimmed: bool) -> u32 {
    if dimmed { blend(color, BG_COLOR, 0.7) } else { color }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF;
    let br = (b >> 16) & 0xFF;
    let ag = (a >> 8) & 0xFF;
    let bg = (b >> 8) & 0xFF;
    let ab = a & 0xFF;
    let bb = b & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '[' => [0b110, 0b100, 0b100, 0b100, 0b110],
        ']' => [0b011, 0b001, 0b001, 0b001, 0b011],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_to_px_clamps_both_ends() {
        assert_eq!(norm_to_px(-1.0, 100), 0);
        assert_eq!(norm_to_px(0.0, 100), 0);
        assert_eq!(norm_to_px(1.0, 100), 99);
        assert_eq!(norm_to_px(2.0, 100), 99);
        assert_eq!(norm_to_px(0.5, 100), 50);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(P1_COLOR, BG_COLOR, 0.0), P1_COLOR | 0xFF000000);
        assert_eq!(blend(P1_COLOR, BG_COLOR, 1.0), BG_COLOR | 0xFF000000);
    }

    #[test]
    fn text_width_counts_gaps() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("A", 2), 6);
        assert_eq!(text_width("GO", 2), 14);
    }

    #[test]
    fn glyphs_fit_three_columns() {
        for c in "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 !-=:.[]()/".chars() {
            for row in char_glyph(c) {
                assert!(row <= 0b111, "glyph {:?} row overflows 3 bits", c);
            }
        }
    }
}
