//! # clap_stream
//!
//! The scoring core of the clap game: turns a stream of per-frame hand
//! landmark observations into discrete, debounced clap events attributed to
//! the correct player side, and keeps the per-side score counters.
//!
//! ## Pipeline
//!
//! ```text
//! FrameObservation ──► ClapDetector ──► [ClapEvent] ──► Scoreboard
//!                      (partition +      (one per        (caller applies,
//!                       hysteresis)       new clap)       gated by phase)
//! ```
//!
//! The detector carries no hand identity: hands are
//! re-assigned to a side every frame by wrist x-coordinate, and a side is
//! only evaluated when at least two hands are visible on it.  The only
//! state carried across frames is the per-side hysteresis latch and the
//! last processed timestamp (duplicate frame deliveries are skipped).
//!
//! This crate knows nothing about round phases or timers — whether a clap
//! event is allowed to score is the caller's decision.

pub mod observe;
pub mod classify;
pub mod score;

pub use observe::{FaceBox, FrameObservation, HandObservation, Landmark, WRIST};
pub use classify::{
    side_for, ClapDetector, ClapEvent, ClapState, ClapThresholds, GameMode, PlayerSide,
};
pub use score::Scoreboard;
