//! Per-frame observation types.
//!
//! Everything here is ephemeral: an upstream hand detector produces a fresh
//! [`FrameObservation`] for every video frame, the classifier consumes it,
//! and nothing is retained beyond that frame's processing step.

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// Landmark index of the wrist within a hand's landmark sequence.
pub const WRIST: usize = 0;

/// A single normalized landmark point.
///
/// Components are in frame-relative space, conceptually `[0, 1]` on each
/// axis (`x` left→right, `y` top→bottom).  `z` is depth as reported by the
/// detector; it is carried through for display but never used for scoring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    /// Euclidean distance to `other` in the 2D image plane.
    pub fn dist_2d(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandObservation
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand in one frame: an ordered sequence of landmarks with
/// index [`WRIST`] defined as the wrist.
#[derive(Clone, Debug, Default)]
pub struct HandObservation {
    pub landmarks: Vec<Landmark>,
}

impl HandObservation {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        HandObservation { landmarks }
    }

    /// A minimal observation carrying only the wrist point — enough for the
    /// clap classifier, and what the simulated detector produces.
    pub fn from_wrist(x: f32, y: f32) -> Self {
        HandObservation { landmarks: vec![Landmark::new(x, y)] }
    }

    /// The wrist landmark, or `None` for a degenerate empty observation.
    pub fn wrist(&self) -> Option<&Landmark> {
        self.landmarks.get(WRIST)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameObservation
// ════════════════════════════════════════════════════════════════════════════

/// The set of hands detected in one frame plus the frame's capture time.
///
/// Timestamps must strictly increase across consecutive processed frames;
/// the classifier treats a non-advancing timestamp as a duplicate delivery
/// and skips the frame.
#[derive(Clone, Debug)]
pub struct FrameObservation {
    /// Monotonic capture time in milliseconds.
    pub timestamp_ms: f64,
    pub hands: Vec<HandObservation>,
}

impl FrameObservation {
    pub fn new(timestamp_ms: f64, hands: Vec<HandObservation>) -> Self {
        FrameObservation { timestamp_ms, hands }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FaceBox — display-only output of the optional face capability
// ════════════════════════════════════════════════════════════════════════════

/// A face bounding box in normalized frame coordinates.
///
/// Faces are decoration: the secondary detector may be missing or failing
/// and nothing in the scoring path ever looks at these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dist_2d_ignores_z() {
        let mut a = Landmark::new(0.0, 0.0);
        let b = Landmark::new(0.3, 0.4);
        a.z = 5.0;
        let d = a.dist_2d(&b);
        assert!((d - 0.5).abs() < 1e-6);
    }

    #[test]
    fn wrist_is_landmark_zero() {
        let hand = HandObservation::new(vec![
            Landmark::new(0.1, 0.2),
            Landmark::new(0.9, 0.9),
        ]);
        let w = hand.wrist().unwrap();
        assert_eq!(w.x, 0.1);
        assert_eq!(w.y, 0.2);
    }

    #[test]
    fn empty_hand_has_no_wrist() {
        let hand = HandObservation::default();
        assert!(hand.wrist().is_none());
    }
}
