//! # round_engine
//!
//! The round controller for the clap game: a small finite state machine
//! driven by one-second wall-clock ticks.
//!
//! ```text
//! Menu ──start_game──► Countdown ──3 ticks──► Playing ──time_left=0──► GameOver
//!   ▲                                                                     │
//!   └────────────────────────── reset_game ──────────────────────────────┘
//! ```
//!
//! The engine never inspects frame content and never touches the classifier
//! or the scoreboard; it only answers *whether scoring is currently
//! permitted* and owns the phase, the timers and the frozen winner.
//!
//! End-of-round is a two-step affair: [`RoundEngine::tick_second`] only
//! decrements, and a separate [`RoundEngine::resolve_timeout`] call
//! evaluates the "reached zero" predicate on the result.  Deciding the
//! transition inside the decrement is the state-update ordering hazard this
//! split exists to avoid.

pub mod ticker;

pub use ticker::SecondTicker;

use clap_stream::GameMode;

// ════════════════════════════════════════════════════════════════════════════
// Constants
// ════════════════════════════════════════════════════════════════════════════

/// Selectable round lengths, in seconds.
pub const DURATION_OPTIONS: [u32; 3] = [10, 30, 60];

/// Countdown starting value shown when a round begins.
pub const COUNTDOWN_START: u8 = 3;

// ════════════════════════════════════════════════════════════════════════════
// Phases and outcomes
// ════════════════════════════════════════════════════════════════════════════

/// Exactly one phase is live at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase { Menu, Countdown, Playing, GameOver }

/// Resolved at the Playing→GameOver transition and frozen until the next
/// `start_game`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winner { P1, P2, Draw }

/// What one second of wall clock did to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No ticker is active in the current phase.
    Idle,
    /// Countdown decremented to this value (still counting).
    Countdown(u8),
    /// Countdown expired — the round just went live ("GO!" instant).
    Go,
    /// Play clock decremented to this value.
    TimeLeft(u32),
}

/// Single-player rounds always resolve to P1; otherwise higher score wins.
pub fn determine_winner(mode: GameMode, p1: u32, p2: u32) -> Winner {
    match mode {
        GameMode::Single => Winner::P1,
        GameMode::Double => {
            if p1 > p2 {
                Winner::P1
            } else if p2 > p1 {
                Winner::P2
            } else {
                Winner::Draw
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RoundEngine
// ════════════════════════════════════════════════════════════════════════════

/// The round state machine.
///
/// Owns `RoundPhase`, the countdown value, the play clock and the winner.
/// All transitions are linearizable: each call produces at most one.
#[derive(Debug)]
pub struct RoundEngine {
    phase:     RoundPhase,
    mode:      GameMode,
    duration:  u32,
    countdown: u8,
    time_left: u32,
    winner:    Option<Winner>,
}

impl RoundEngine {
    pub fn new() -> Self {
        RoundEngine {
            phase:     RoundPhase::Menu,
            mode:      GameMode::Single,
            duration:  DURATION_OPTIONS[0],
            countdown: COUNTDOWN_START,
            time_left: 0,
            winner:    None,
        }
    }

    // ── accessors (read-only to presentation) ────────────────────────────

    pub fn phase(&self) -> RoundPhase { self.phase }
    pub fn mode(&self) -> GameMode { self.mode }
    pub fn duration(&self) -> u32 { self.duration }
    pub fn countdown(&self) -> u8 { self.countdown }
    pub fn time_left(&self) -> u32 { self.time_left }
    pub fn winner(&self) -> Option<Winner> { self.winner }

    /// True exactly while clap events may mutate the score.
    pub fn scoring_active(&self) -> bool {
        self.phase == RoundPhase::Playing
    }

    /// True for phases that are driven by a one-second ticker.
    pub fn ticker_active(&self) -> bool {
        matches!(self.phase, RoundPhase::Countdown | RoundPhase::Playing)
    }

    // ── transitions ──────────────────────────────────────────────────────

    /// Menu → Countdown.  Returns false (and does nothing) from any other
    /// phase.  The caller resets scores and clap latches at the same time;
    /// the engine only clears its own leftover winner and arms the count.
    pub fn start_game(&mut self, mode: GameMode, duration: u32) -> bool {
        if self.phase != RoundPhase::Menu || duration == 0 {
            return false;
        }
        self.mode = mode;
        self.duration = duration;
        self.countdown = COUNTDOWN_START;
        self.time_left = 0;
        self.winner = None;
        self.phase = RoundPhase::Countdown;
        true
    }

    /// GameOver → Menu (rematch setup).  Scores are *not* cleared here — the
    /// menu may keep showing the old round's totals behind the dimmed HUD
    /// until the next `start_game`.
    pub fn reset_game(&mut self) -> bool {
        if self.phase != RoundPhase::GameOver {
            return false;
        }
        self.phase = RoundPhase::Menu;
        true
    }

    /// Advance the active ticker by one second.
    ///
    /// Countdown reaching its end switches to Playing in the same call (the
    /// terminal tick is the visible "GO!" zero-state).  The play clock only
    /// decrements here; reaching zero is observed by [`resolve_timeout`],
    /// never by this method.
    ///
    /// [`resolve_timeout`]: RoundEngine::resolve_timeout
    pub fn tick_second(&mut self) -> TickOutcome {
        match self.phase {
            RoundPhase::Countdown => {
                if self.countdown <= 1 {
                    self.countdown = 0;
                    self.time_left = self.duration;
                    self.phase = RoundPhase::Playing;
                    TickOutcome::Go
                } else {
                    self.countdown -= 1;
                    TickOutcome::Countdown(self.countdown)
                }
            }
            RoundPhase::Playing => {
                self.time_left = self.time_left.saturating_sub(1);
                TickOutcome::TimeLeft(self.time_left)
            }
            RoundPhase::Menu | RoundPhase::GameOver => TickOutcome::Idle,
        }
    }

    /// Evaluate the end-of-round predicate on the current clock value.
    ///
    /// Playing with `time_left == 0` enters GameOver, computes the winner
    /// from the final scores and freezes it.  Any other state is a no-op.
    pub fn resolve_timeout(&mut self, p1_score: u32, p2_score: u32) -> Option<Winner> {
        if self.phase != RoundPhase::Playing || self.time_left != 0 {
            return None;
        }
        let w = determine_winner(self.mode, p1_score, p2_score);
        self.winner = Some(w);
        self.phase = RoundPhase::GameOver;
        Some(w)
    }
}

impl Default for RoundEngine {
    fn default() -> Self {
        RoundEngine::new()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
