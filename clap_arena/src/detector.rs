//! Hand-detector sources — real LeapMotion hardware and keyboard simulation.
//!
//! The public interface is [`DetectorEvent`] delivered over a `mpsc`
//! channel.  Consumers don't need to know whether observations came from
//! real hardware or the simulator; both speak normalized frame coordinates
//! with strictly increasing timestamps.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Instant;

use clap_stream::{FaceBox, FrameObservation, HandObservation, PlayerSide};

// ════════════════════════════════════════════════════════════════════════════
// DetectorEvent
// ════════════════════════════════════════════════════════════════════════════

/// What a detector source can report to the app.
#[derive(Clone, Debug)]
pub enum DetectorEvent {
    /// The primary hand capability finished initializing.  The round
    /// controller must never leave the menu before this arrives.
    Ready,

    /// One frame's worth of hand observations.
    Frame(FrameObservation),

    /// Face bounding boxes for display only.  The face capability is
    /// optional; sources that cannot produce faces simply never send this.
    Faces(Vec<FaceBox>),

    /// The primary capability failed.  Surfaced to the user as a blocked
    /// state — the worst case is "round cannot start", never a crash.
    Error(String),
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`DetectorEvent`]s over a channel.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<DetectorEvent>);
}

/// Spawn a detector source on its own thread and return the receiving end.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> Receiver<DetectorEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// LeapFrameSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Detector source backed by a real LeapMotion controller.
///
/// Palm positions in device millimetres are mapped into the normalized
/// `[0, 1]` frame space the classifier expects: the interaction box spans
/// roughly ±250 mm horizontally and 80–500 mm above the device, with image
/// `y` growing downward.  Each tracked hand becomes a one-landmark
/// [`HandObservation`] (the wrist is all the clap test needs).
#[cfg(feature = "leap")]
pub struct LeapFrameSource;

#[cfg(feature = "leap")]
impl FrameSource for LeapFrameSource {
    fn run(self: Box<Self>, tx: Sender<DetectorEvent>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                let _ = tx.send(DetectorEvent::Error(format!("LeapC connection: {:?}", e)));
                return;
            }
        };
        if let Err(e) = connection.open() {
            let _ = tx.send(DetectorEvent::Error(format!("LeapMotion device: {:?}", e)));
            return;
        }

        let _ = tx.send(DetectorEvent::Ready);
        eprintln!("[detector] LeapMotion connected");

        let epoch = Instant::now();
        loop {
            let msg = match connection.poll(100) {
                Ok(m) => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let hands: Vec<HandObservation> = frame
                    .hands()
                    .map(|h| {
                        let p = h.palm().position();
                        HandObservation::from_wrist(norm_x(p.x), norm_y(p.y))
                    })
                    .collect();

                let ts = epoch.elapsed().as_secs_f64() * 1000.0;
                if tx.send(DetectorEvent::Frame(FrameObservation::new(ts, hands))).is_err() {
                    return;
                }
            }
        }
    }
}

/// Device x (±250 mm) → normalized `[0, 1]`.
#[cfg(feature = "leap")]
fn norm_x(mm: f32) -> f32 {
    ((mm + 250.0) / 500.0).clamp(0.0, 1.0)
}

/// Device height (80–500 mm above sensor) → normalized `[0, 1]`, top-down.
#[cfg(feature = "leap")]
fn norm_y(mm: f32) -> f32 {
    (1.0 - (mm - 80.0) / 420.0).clamp(0.0, 1.0)
}

// ════════════════════════════════════════════════════════════════════════════
// SimFrameSource — keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw clap request from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    /// One clap gesture on the given side of the screen.
    Clap(PlayerSide),
    /// Both sides clap in the same frame.
    ClapBoth,
}

/// Detector source driven by [`SimInput`] events from the HUD window.
///
/// Each request becomes two frames: a close-hands frame (crosses the clap
/// threshold) followed by an apart frame (crosses the reopen threshold), so
/// one key press is exactly one debounced clap.
pub struct SimFrameSource {
    pub rx: Receiver<SimInput>,
}

impl FrameSource for SimFrameSource {
    fn run(self: Box<Self>, tx: Sender<DetectorEvent>) {
        let _ = tx.send(DetectorEvent::Ready);
        // A fixed fake face so the display path is exercised without a
        // camera.
        let _ = tx.send(DetectorEvent::Faces(vec![FaceBox {
            x: 0.42,
            y: 0.08,
            w: 0.16,
            h: 0.22,
        }]));

        let mut clock = SimClock::start();
        for input in self.rx {
            let (closed, apart) = match input {
                SimInput::Clap(side) => (close_pair(side), apart_pair(side)),
                SimInput::ClapBoth => (
                    [close_pair(PlayerSide::P1), close_pair(PlayerSide::P2)].concat(),
                    [apart_pair(PlayerSide::P1), apart_pair(PlayerSide::P2)].concat(),
                ),
            };
            for hands in [closed, apart] {
                let frame = FrameObservation::new(clock.next_ms(), hands);
                if tx.send(DetectorEvent::Frame(frame)).is_err() {
                    return;
                }
            }
        }
    }
}

/// Strictly increasing millisecond timestamps for synthesized frames.
struct SimClock {
    epoch:   Instant,
    last_ms: f64,
}

impl SimClock {
    fn start() -> Self {
        SimClock { epoch: Instant::now(), last_ms: 0.0 }
    }

    fn next_ms(&mut self) -> f64 {
        let now = self.epoch.elapsed().as_secs_f64() * 1000.0;
        // Two frames synthesized in the same instant still need distinct
        // timestamps or the second would be skipped as a duplicate.
        self.last_ms = if now > self.last_ms { now } else { self.last_ms + 1.0 };
        self.last_ms
    }
}

/// A wrist pair well inside the clap threshold, on the given half.
fn close_pair(side: PlayerSide) -> Vec<HandObservation> {
    let base = side_base(side);
    vec![
        HandObservation::from_wrist(base + 0.20, 0.55),
        HandObservation::from_wrist(base + 0.30, 0.55),
    ]
}

/// The same pair separated past the reopen threshold, still on one half.
fn apart_pair(side: PlayerSide) -> Vec<HandObservation> {
    let base = side_base(side);
    vec![
        HandObservation::from_wrist(base + 0.05, 0.55),
        HandObservation::from_wrist(base + 0.42, 0.55),
    ]
}

fn side_base(side: PlayerSide) -> f32 {
    match side {
        PlayerSide::P1 => 0.0,
        PlayerSide::P2 => 0.5,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use clap_stream::{ClapDetector, ClapEvent, ClapThresholds, GameMode};

    fn dist(hands: &[HandObservation]) -> f32 {
        let a = hands[0].wrist().unwrap();
        let b = hands[1].wrist().unwrap();
        a.dist_2d(b)
    }

    #[test]
    fn close_pair_crosses_clap_threshold() {
        for side in [PlayerSide::P1, PlayerSide::P2] {
            assert!(dist(&close_pair(side)) < 0.15);
        }
    }

    #[test]
    fn apart_pair_crosses_reopen_threshold() {
        for side in [PlayerSide::P1, PlayerSide::P2] {
            assert!(dist(&apart_pair(side)) > 0.30);
        }
    }

    #[test]
    fn pairs_stay_on_their_half() {
        for hand in close_pair(PlayerSide::P1).iter().chain(apart_pair(PlayerSide::P1).iter()) {
            assert!(hand.wrist().unwrap().x < 0.5);
        }
        for hand in close_pair(PlayerSide::P2).iter().chain(apart_pair(PlayerSide::P2).iter()) {
            assert!(hand.wrist().unwrap().x >= 0.5);
        }
    }

    #[test]
    fn one_sim_clap_is_one_event() {
        let mut d = ClapDetector::new(ClapThresholds::default(), GameMode::Double);
        let mut clock = SimClock::start();
        let mut events = Vec::new();
        for hands in [close_pair(PlayerSide::P2), apart_pair(PlayerSide::P2)] {
            events.extend(d.process(&FrameObservation::new(clock.next_ms(), hands)));
        }
        assert_eq!(events, vec![ClapEvent { side: PlayerSide::P2 }]);
    }

    #[test]
    fn sim_clock_strictly_increases() {
        let mut clock = SimClock::start();
        let mut prev = clock.next_ms();
        for _ in 0..100 {
            let ts = clock.next_ms();
            assert!(ts > prev);
            prev = ts;
        }
    }
}
