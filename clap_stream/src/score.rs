//! Per-side score counters.
//!
//! The scoreboard counts what it is told to count, nothing more.
//! Whether a clap event is allowed to score (round phase gating) is decided
//! by the caller before `award` is reached.

use crate::classify::PlayerSide;

/// Non-negative clap counters, one per player side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    p1: u32,
    p2: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Scoreboard::default()
    }

    /// Count one clap for `side`.
    pub fn award(&mut self, side: PlayerSide) {
        match side {
            PlayerSide::P1 => self.p1 += 1,
            PlayerSide::P2 => self.p2 += 1,
        }
    }

    pub fn get(&self, side: PlayerSide) -> u32 {
        match side {
            PlayerSide::P1 => self.p1,
            PlayerSide::P2 => self.p2,
        }
    }

    /// `(p1, p2)` — handy for winner resolution and the HUD.
    pub fn pair(&self) -> (u32, u32) {
        (self.p1, self.p2)
    }

    /// Back to zero for a new round.
    pub fn reset(&mut self) {
        *self = Scoreboard::default();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
