//! Clap classification — side partitioning plus the hysteresis latch.
//!
//! Each processed frame is reduced, per player side, to at most one clap
//! event.  Two thresholds are used so that a single physical clap cannot
//! fire twice from jitter near one boundary value: the latch closes below
//! `clap` and only re-opens above `open`, with a dead zone in between.

use crate::observe::FrameObservation;

// ════════════════════════════════════════════════════════════════════════════
// Core enums
// ════════════════════════════════════════════════════════════════════════════

/// Which player a hand (or event) belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerSide { P1, P2 }

/// The per-side hysteresis latch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClapState { Open, Clapped }

/// Single-player (everything scores for P1) or two-player split-screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode { Single, Double }

/// A detected Open→Clapped transition for one side in one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClapEvent {
    pub side: PlayerSide,
}

// ════════════════════════════════════════════════════════════════════════════
// Thresholds
// ════════════════════════════════════════════════════════════════════════════

/// Default latch-close distance (normalized 0–1 space).
pub const CLAP_THRESHOLD: f32 = 0.15;
/// Default latch-reopen distance.
pub const OPEN_THRESHOLD: f32 = 0.30;

/// Tunable detection sensitivity.
///
/// `open` must exceed `clap`; the gap between them is the debounce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClapThresholds {
    pub clap: f32,
    pub open: f32,
}

impl ClapThresholds {
    pub fn new(clap: f32, open: f32) -> Result<Self, String> {
        if !(clap > 0.0 && open > clap) {
            return Err(format!(
                "invalid thresholds: need 0 < clap < open, got clap={} open={}",
                clap, open
            ));
        }
        Ok(ClapThresholds { clap, open })
    }
}

impl Default for ClapThresholds {
    fn default() -> Self {
        ClapThresholds { clap: CLAP_THRESHOLD, open: OPEN_THRESHOLD }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Side partition
// ════════════════════════════════════════════════════════════════════════════

/// Double-mode side assignment from a wrist x-coordinate.
///
/// The screen midpoint splits the players; the boundary itself belongs to
/// P2 (`x < 0.5` → P1, `x >= 0.5` → P2).  Assignment is per-frame and
/// memoryless — no hand identity is tracked across frames.
pub fn side_for(x: f32) -> PlayerSide {
    if x < 0.5 { PlayerSide::P1 } else { PlayerSide::P2 }
}

// ════════════════════════════════════════════════════════════════════════════
// ClapDetector
// ════════════════════════════════════════════════════════════════════════════

/// Stateful per-frame clap classifier.
///
/// Owns the two hysteresis latches and the last processed frame timestamp.
/// Everything else is recomputed fresh from each [`FrameObservation`].
#[derive(Debug)]
pub struct ClapDetector {
    thresholds: ClapThresholds,
    mode:       GameMode,
    state:      [ClapState; 2],
    last_ts:    Option<f64>,
}

impl ClapDetector {
    pub fn new(thresholds: ClapThresholds, mode: GameMode) -> Self {
        ClapDetector {
            thresholds,
            mode,
            state:   [ClapState::Open; 2],
            last_ts: None,
        }
    }

    /// Reset both latches to Open.
    ///
    /// Called at round start together with the score reset.  The last
    /// processed timestamp is kept — the frame stream keeps running between
    /// rounds and an old frame must still be recognised as stale.
    pub fn reset(&mut self) {
        self.state = [ClapState::Open; 2];
    }

    /// Select the partitioning mode for subsequent frames.
    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn state(&self, side: PlayerSide) -> ClapState {
        self.state[side as usize]
    }

    /// Process one frame, returning every new clap event it contains.
    ///
    /// A frame whose timestamp does not advance past the previously
    /// processed one is a duplicate delivery and is skipped wholesale.
    /// A side with fewer than two visible hands yields no event — that is
    /// the normal case, not an error.
    pub fn process(&mut self, frame: &FrameObservation) -> Vec<ClapEvent> {
        if let Some(last) = self.last_ts {
            if frame.timestamp_ms <= last {
                return Vec::new();
            }
        }
        self.last_ts = Some(frame.timestamp_ms);

        // Partition wrists by side.  In single mode every hand is P1's and
        // the P2 latch is never evaluated at all.
        let mut p1: Vec<(f32, f32)> = Vec::new();
        let mut p2: Vec<(f32, f32)> = Vec::new();
        for hand in &frame.hands {
            let Some(w) = hand.wrist() else { continue };
            match self.mode {
                GameMode::Single => p1.push((w.x, w.y)),
                GameMode::Double => match side_for(w.x) {
                    PlayerSide::P1 => p1.push((w.x, w.y)),
                    PlayerSide::P2 => p2.push((w.x, w.y)),
                },
            }
        }

        let mut events = Vec::new();
        if let Some(ev) = self.evaluate_side(PlayerSide::P1, &p1) {
            events.push(ev);
        }
        if self.mode == GameMode::Double {
            if let Some(ev) = self.evaluate_side(PlayerSide::P2, &p2) {
                events.push(ev);
            }
        }
        events
    }

    /// Apply the hysteresis test to one side's wrists.
    ///
    /// Uses the first two wrists in detector order; when a bystander third
    /// hand is on the same side there is no disambiguation of which pair is
    /// clapping.  Known limitation.
    fn evaluate_side(&mut self, side: PlayerSide, wrists: &[(f32, f32)]) -> Option<ClapEvent> {
        if wrists.len() < 2 {
            return None;
        }
        let (x1, y1) = wrists[0];
        let (x2, y2) = wrists[1];
        let dist = ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt();

        let slot = side as usize;
        match self.state[slot] {
            ClapState::Open if dist < self.thresholds.clap => {
                self.state[slot] = ClapState::Clapped;
                Some(ClapEvent { side })
            }
            ClapState::Clapped if dist > self.thresholds.open => {
                self.state[slot] = ClapState::Open;
                None
            }
            // Dead zone or no crossing: latch unchanged, no event.
            _ => None,
        }
    }
}

impl Default for ClapDetector {
    fn default() -> Self {
        ClapDetector::new(ClapThresholds::default(), GameMode::Single)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::HandObservation;

    /// Frame with one hand pair at the given wrist positions.
    fn frame(ts: f64, wrists: &[(f32, f32)]) -> FrameObservation {
        FrameObservation::new(
            ts,
            wrists.iter().map(|&(x, y)| HandObservation::from_wrist(x, y)).collect(),
        )
    }

    fn double_detector() -> ClapDetector {
        ClapDetector::new(ClapThresholds::default(), GameMode::Double)
    }

    #[test]
    fn close_hands_fire_one_event() {
        let mut d = ClapDetector::default();
        let evs = d.process(&frame(1.0, &[(0.40, 0.5), (0.50, 0.5)])); // dist 0.10
        assert_eq!(evs, vec![ClapEvent { side: PlayerSide::P1 }]);
        assert_eq!(d.state(PlayerSide::P1), ClapState::Clapped);
    }

    #[test]
    fn open_hands_no_event() {
        let mut d = ClapDetector::default();
        let evs = d.process(&frame(1.0, &[(0.20, 0.5), (0.60, 0.5)])); // dist 0.40
        assert!(evs.is_empty());
        assert_eq!(d.state(PlayerSide::P1), ClapState::Open);
    }

    #[test]
    fn latch_blocks_repeat_while_close() {
        let mut d = ClapDetector::default();
        assert_eq!(d.process(&frame(1.0, &[(0.40, 0.5), (0.50, 0.5)])).len(), 1);
        // Still close on later frames — latched, no further events.
        assert!(d.process(&frame(2.0, &[(0.41, 0.5), (0.50, 0.5)])).is_empty());
        assert!(d.process(&frame(3.0, &[(0.40, 0.5), (0.51, 0.5)])).is_empty());
    }

    #[test]
    fn dead_zone_leaves_latch_closed() {
        let mut d = ClapDetector::default();
        d.process(&frame(1.0, &[(0.40, 0.5), (0.50, 0.5)]));
        // dist 0.20 is between the thresholds: no reopen, no event.
        assert!(d.process(&frame(2.0, &[(0.40, 0.5), (0.60, 0.5)])).is_empty());
        assert_eq!(d.state(PlayerSide::P1), ClapState::Clapped);
    }

    #[test]
    fn dead_zone_leaves_latch_open() {
        let mut d = ClapDetector::default();
        // dist 0.20 from the Open state: no clap either.
        assert!(d.process(&frame(1.0, &[(0.40, 0.5), (0.60, 0.5)])).is_empty());
        assert_eq!(d.state(PlayerSide::P1), ClapState::Open);
    }

    #[test]
    fn reopen_then_clap_again() {
        let mut d = ClapDetector::default();
        assert_eq!(d.process(&frame(1.0, &[(0.40, 0.5), (0.50, 0.5)])).len(), 1);
        // Separate past the open threshold (dist 0.40) — reopens silently.
        assert!(d.process(&frame(2.0, &[(0.20, 0.5), (0.60, 0.5)])).is_empty());
        assert_eq!(d.state(PlayerSide::P1), ClapState::Open);
        // Second clap fires again.
        assert_eq!(d.process(&frame(3.0, &[(0.40, 0.5), (0.50, 0.5)])).len(), 1);
    }

    #[test]
    fn single_hand_is_not_an_error() {
        let mut d = ClapDetector::default();
        assert!(d.process(&frame(1.0, &[(0.40, 0.5)])).is_empty());
        assert!(d.process(&frame(2.0, &[])).is_empty());
    }

    #[test]
    fn duplicate_timestamp_skipped() {
        let mut d = ClapDetector::default();
        let f = frame(5.0, &[(0.40, 0.5), (0.50, 0.5)]);
        let first = d.process(&f);
        let second = d.process(&f);
        assert_eq!(first.len() + second.len(), 1);
    }

    #[test]
    fn stale_timestamp_skipped() {
        let mut d = ClapDetector::default();
        d.process(&frame(5.0, &[(0.20, 0.5), (0.60, 0.5)]));
        // An older frame with a clap in it must not register.
        assert!(d.process(&frame(4.0, &[(0.40, 0.5), (0.50, 0.5)])).is_empty());
        assert_eq!(d.state(PlayerSide::P1), ClapState::Open);
    }

    #[test]
    fn side_partition_boundaries() {
        assert_eq!(side_for(0.2), PlayerSide::P1);
        assert_eq!(side_for(0.8), PlayerSide::P2);
        // Midpoint is inclusive on the P2 side.
        assert_eq!(side_for(0.5), PlayerSide::P2);
        assert_eq!(side_for(0.49999), PlayerSide::P1);
    }

    #[test]
    fn double_mode_attributes_per_side() {
        let mut d = double_detector();
        // P1 pair close on the left, P2 pair apart on the right.
        let evs = d.process(&frame(1.0, &[
            (0.10, 0.5), (0.20, 0.5),
            (0.60, 0.5), (0.95, 0.5),
        ]));
        assert_eq!(evs, vec![ClapEvent { side: PlayerSide::P1 }]);
        assert_eq!(d.state(PlayerSide::P2), ClapState::Open);
    }

    #[test]
    fn double_mode_both_sides_same_frame() {
        let mut d = double_detector();
        let evs = d.process(&frame(1.0, &[
            (0.10, 0.5), (0.20, 0.5),
            (0.70, 0.5), (0.80, 0.5),
        ]));
        assert_eq!(evs.len(), 2);
        assert!(evs.contains(&ClapEvent { side: PlayerSide::P1 }));
        assert!(evs.contains(&ClapEvent { side: PlayerSide::P2 }));
    }

    #[test]
    fn single_mode_claims_right_half_hands() {
        let mut d = ClapDetector::default();
        // Both wrists on the right half — still P1's clap in single mode.
        let evs = d.process(&frame(1.0, &[(0.70, 0.5), (0.80, 0.5)]));
        assert_eq!(evs, vec![ClapEvent { side: PlayerSide::P1 }]);
    }

    #[test]
    fn single_mode_never_evaluates_p2() {
        let mut d = ClapDetector::default();
        // Four hands, a close pair on each half: one event, P1 only.
        let evs = d.process(&frame(1.0, &[
            (0.10, 0.5), (0.60, 0.5),
            (0.70, 0.5), (0.80, 0.5),
        ]));
        // Single mode: first two hands overall are (0.10) and (0.60), dist 0.50.
        assert!(evs.is_empty());
        assert_eq!(d.state(PlayerSide::P2), ClapState::Open);
    }

    #[test]
    fn third_hand_on_side_is_ignored() {
        let mut d = double_detector();
        // First two left-side wrists are apart; the bystander third hand
        // close to the first does not create a clap.
        let evs = d.process(&frame(1.0, &[(0.10, 0.5), (0.45, 0.5), (0.12, 0.5)]));
        assert!(evs.is_empty());
    }

    #[test]
    fn reset_reopens_latches_but_keeps_clock() {
        let mut d = ClapDetector::default();
        d.process(&frame(5.0, &[(0.40, 0.5), (0.50, 0.5)]));
        d.reset();
        assert_eq!(d.state(PlayerSide::P1), ClapState::Open);
        // Clock survives the reset: an old frame is still stale.
        assert!(d.process(&frame(3.0, &[(0.40, 0.5), (0.50, 0.5)])).is_empty());
        // A fresh frame claps immediately from the reopened latch.
        assert_eq!(d.process(&frame(6.0, &[(0.40, 0.5), (0.50, 0.5)])).len(), 1);
    }

    #[test]
    fn thresholds_require_hysteresis_gap() {
        assert!(ClapThresholds::new(0.30, 0.15).is_err());
        assert!(ClapThresholds::new(0.15, 0.15).is_err());
        assert!(ClapThresholds::new(0.0, 0.30).is_err());
        assert!(ClapThresholds::new(0.15, 0.30).is_ok());
    }
}
