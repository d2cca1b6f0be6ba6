//! Top-level application state machine.
//!
//! `AppState` owns the `ClapDetector`, the `Scoreboard`, the `RoundEngine`
//! and the wall-clock ticker, and wires them together: detector events flow
//! through the classifier into the score (when the round phase permits),
//! and UI commands drive round transitions.  The HUD only ever reads.

use std::sync::mpsc::{self, TryRecvError};

use clap_stream::{ClapDetector, ClapThresholds, FaceBox, GameMode, HandObservation, Scoreboard};
use round_engine::{RoundEngine, RoundPhase, SecondTicker, TickOutcome, Winner, DURATION_OPTIONS};

use crate::detector::{spawn_frame_source, DetectorEvent, SimFrameSource};
use crate::hud::Hud;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Copy, Debug)]
pub struct AppConfig {
    /// Clap / reopen distances for the hysteresis latch.
    pub thresholds: ClapThresholds,
    /// Mode preselected in the menu.
    pub mode: GameMode,
    /// Round length preselected in the menu, seconds.
    pub duration: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            thresholds: ClapThresholds::default(),
            mode:       GameMode::Single,
            duration:   DURATION_OPTIONS[0],
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// UiCommand — actions from the HUD window
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    SelectMode(GameMode),
    SelectDuration(u32),
    /// Start the round (menu only; refused while the detector loads).
    Start,
    /// Back to the menu after a finished round.
    Rematch,
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── game state ───────────────────────────────────────────────────────
    engine:   RoundEngine,
    detector: ClapDetector,
    board:    Scoreboard,
    ticker:   SecondTicker,

    // ── menu selection ───────────────────────────────────────────────────
    sel_mode:     GameMode,
    sel_duration: u32,

    // ── detector readiness ───────────────────────────────────────────────
    detector_ready: bool,

    // ── display-only leftovers from the last frame ───────────────────────
    hands: Vec<HandObservation>,
    faces: Vec<FaceBox>,

    // ── status message ───────────────────────────────────────────────────
    pub status: String,
}

impl AppState {
    pub fn new(cfg: AppConfig) -> Self {
        AppState {
            engine:         RoundEngine::new(),
            detector:       ClapDetector::new(cfg.thresholds, cfg.mode),
            board:          Scoreboard::new(),
            ticker:         SecondTicker::start(),
            sel_mode:       cfg.mode,
            sel_duration:   cfg.duration,
            detector_ready: false,
            hands:          Vec::new(),
            faces:          Vec::new(),
            status:         "Loading hand detector…".to_string(),
        }
    }

    // ── process one DetectorEvent ────────────────────────────────────────

    pub fn handle_event(&mut self, event: DetectorEvent) {
        match event {
            DetectorEvent::Ready => {
                self.detector_ready = true;
                self.status = "Detector ready — pick a mode and start".to_string();
            }

            DetectorEvent::Frame(frame) => {
                // Classification and scoring complete within this step; no
                // event is ever attributed to a later frame.
                let events = self.detector.process(&frame);
                if self.engine.scoring_active() {
                    for ev in events {
                        self.board.award(ev.side);
                    }
                }
                self.hands = frame.hands;
            }

            DetectorEvent::Faces(faces) => {
                self.faces = faces;
            }

            DetectorEvent::Error(msg) => {
                eprintln!("[detector] {}", msg);
                self.status = format!("Detector unavailable: {}", msg);
            }
        }
    }

    // ── process one UiCommand; false means quit ──────────────────────────

    pub fn handle_command(&mut self, cmd: UiCommand) -> bool {
        match cmd {
            UiCommand::SelectMode(mode) => {
                if self.engine.phase() == RoundPhase::Menu {
                    self.sel_mode = mode;
                }
            }

            UiCommand::SelectDuration(secs) => {
                if self.engine.phase() == RoundPhase::Menu && secs > 0 {
                    self.sel_duration = secs;
                }
            }

            UiCommand::Start => {
                if self.engine.phase() != RoundPhase::Menu {
                    return true;
                }
                if !self.detector_ready {
                    self.status = "Hand detector still loading — hang on".to_string();
                    return true;
                }
                // Fresh round: scores, latches and cadence all reset before
                // the first tick can land.
                self.board.reset();
                self.detector.set_mode(self.sel_mode);
                self.detector.reset();
                self.ticker.restart();
                self.engine.start_game(self.sel_mode, self.sel_duration);
                self.status = "Get ready…".to_string();
            }

            UiCommand::Rematch => {
                if self.engine.reset_game() {
                    // Scores stay on the board until the next start.
                    self.status = "Rematch — pick a mode and go again".to_string();
                }
            }

            UiCommand::Quit => return false,
        }
        true
    }

    // ── wall-clock tick ──────────────────────────────────────────────────

    /// Poll the real-time ticker and apply every due second.
    pub fn tick(&mut self) {
        if !self.engine.ticker_active() {
            // No ticker outlives its phase: while the menu or the result
            // screen is up the cadence is continuously discarded.
            self.ticker.restart();
            return;
        }
        for _ in 0..self.ticker.poll() {
            if self.apply_second() {
                // Phase changed; the remaining due ticks belonged to the
                // old cadence.
                self.ticker.restart();
                break;
            }
        }
    }

    /// Advance the round by one logical second.  Returns true when the
    /// phase changed.  Public so headless drivers and tests can step the
    /// round without a wall clock.
    pub fn apply_second(&mut self) -> bool {
        match self.engine.tick_second() {
            TickOutcome::Go => {
                self.status = "GO!".to_string();
                true
            }
            TickOutcome::TimeLeft(_) => {
                // Step two of the timer redesign: the transition predicate
                // runs on the decremented value, outside the decrement.
                let (p1, p2) = self.board.pair();
                match self.engine.resolve_timeout(p1, p2) {
                    Some(w) => {
                        self.status = match w {
                            Winner::P1 => "Player 1 wins!".to_string(),
                            Winner::P2 => "Player 2 wins!".to_string(),
                            Winner::Draw => "It's a draw!".to_string(),
                        };
                        true
                    }
                    None => false,
                }
            }
            TickOutcome::Countdown(_) | TickOutcome::Idle => false,
        }
    }

    // ── accessors for the render loop ────────────────────────────────────

    pub fn engine(&self) -> &RoundEngine { &self.engine }
    pub fn board(&self) -> &Scoreboard { &self.board }
    pub fn hands(&self) -> &[HandObservation] { &self.hands }
    pub fn faces(&self) -> &[FaceBox] { &self.faces }
    pub fn detector_ready(&self) -> bool { self.detector_ready }
    pub fn selected_mode(&self) -> GameMode { self.sel_mode }
    pub fn selected_duration(&self) -> u32 { self.sel_duration }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It creates the HUD
/// window, spawns the detector source (simulation by default, hardware with
/// `--features leap`), and drives the event/render loop at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<(), String> {
    // ── Sim input channel (HUD → simulated detector) ─────────────────────
    let (sim_tx, sim_rx) = mpsc::channel();

    #[cfg(not(feature = "leap"))]
    let detector_rx = spawn_frame_source(SimFrameSource { rx: sim_rx });

    #[cfg(feature = "leap")]
    let detector_rx = {
        drop(sim_rx); // clap keys are inert when real hands drive the game
        spawn_frame_source(crate::detector::LeapFrameSource)
    };

    // ── HUD (owns the window and the sim input sender) ───────────────────
    let mut hud = Hud::new(sim_tx)?;

    // ── App state ────────────────────────────────────────────────────────
    let mut app = AppState::new(cfg);

    // ── Main loop ────────────────────────────────────────────────────────
    while hud.is_open() {
        // 1. Window input → UI commands (clap keys go to the sim source)
        for cmd in hud.poll_input() {
            if !app.handle_command(cmd) {
                return Ok(());
            }
        }

        // 2. Drain detector events
        loop {
            match detector_rx.try_recv() {
                Ok(ev) => app.handle_event(ev),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    eprintln!("[arena] detector source ended");
                    return Ok(());
                }
            }
        }

        // 3. Wall-clock second ticks
        app.tick();

        // 4. Render
        hud.render(&app);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use clap_stream::{FrameObservation, PlayerSide};

    fn make_app() -> AppState {
        AppState::new(AppConfig::default())
    }

    fn ready_app() -> AppState {
        let mut app = make_app();
        app.handle_event(DetectorEvent::Ready);
        app
    }

    /// One clap gesture for `side`, at fresh timestamps.
    fn feed_clap(app: &mut AppState, side: PlayerSide, ts: f64) {
        let base = match side {
            PlayerSide::P1 => 0.0,
            PlayerSide::P2 => 0.5,
        };
        let closed = vec![
            HandObservation::from_wrist(base + 0.20, 0.5),
            HandObservation::from_wrist(base + 0.30, 0.5),
        ];
        let apart = vec![
            HandObservation::from_wrist(base + 0.05, 0.5),
            HandObservation::from_wrist(base + 0.42, 0.5),
        ];
        app.handle_event(DetectorEvent::Frame(FrameObservation::new(ts, closed)));
        app.handle_event(DetectorEvent::Frame(FrameObservation::new(ts + 1.0, apart)));
    }

    /// Start a double round and step through the countdown into Playing.
    fn playing_app(duration: u32) -> AppState {
        let mut app = ready_app();
        assert!(app.handle_command(UiCommand::SelectMode(GameMode::Double)));
        assert!(app.handle_command(UiCommand::SelectDuration(duration)));
        assert!(app.handle_command(UiCommand::Start));
        while app.engine().phase() == RoundPhase::Countdown {
            app.apply_second();
        }
        assert_eq!(app.engine().phase(), RoundPhase::Playing);
        app
    }

    #[test]
    fn start_blocked_until_detector_ready() {
        let mut app = make_app();
        assert!(app.handle_command(UiCommand::Start));
        assert_eq!(app.engine().phase(), RoundPhase::Menu);
        app.handle_event(DetectorEvent::Ready);
        assert!(app.handle_command(UiCommand::Start));
        assert_eq!(app.engine().phase(), RoundPhase::Countdown);
    }

    #[test]
    fn countdown_claps_do_not_score() {
        let mut app = ready_app();
        app.handle_command(UiCommand::SelectMode(GameMode::Double));
        app.handle_command(UiCommand::Start);
        assert_eq!(app.engine().phase(), RoundPhase::Countdown);
        feed_clap(&mut app, PlayerSide::P1, 100.0);
        assert_eq!(app.board().pair(), (0, 0));
    }

    #[test]
    fn playing_claps_score_per_side() {
        let mut app = playing_app(10);
        feed_clap(&mut app, PlayerSide::P1, 100.0);
        feed_clap(&mut app, PlayerSide::P1, 200.0);
        feed_clap(&mut app, PlayerSide::P2, 300.0);
        assert_eq!(app.board().pair(), (2, 1));
    }

    #[test]
    fn round_ends_and_freezes_scores() {
        let mut app = playing_app(10);
        feed_clap(&mut app, PlayerSide::P1, 100.0);
        for _ in 0..10 {
            app.apply_second();
        }
        assert_eq!(app.engine().phase(), RoundPhase::GameOver);
        assert_eq!(app.engine().winner(), Some(Winner::P1));
        // Claps after the buzzer change nothing.
        feed_clap(&mut app, PlayerSide::P2, 500.0);
        assert_eq!(app.board().pair(), (1, 0));
    }

    #[test]
    fn rematch_keeps_scores_until_next_start() {
        let mut app = playing_app(10);
        feed_clap(&mut app, PlayerSide::P2, 100.0);
        for _ in 0..10 {
            app.apply_second();
        }
        assert!(app.handle_command(UiCommand::Rematch));
        assert_eq!(app.engine().phase(), RoundPhase::Menu);
        // Stale scores stay visible in the menu…
        assert_eq!(app.board().pair(), (0, 1));
        // …and cleared the moment the next round starts.
        assert!(app.handle_command(UiCommand::Start));
        assert_eq!(app.board().pair(), (0, 0));
        assert_eq!(app.engine().phase(), RoundPhase::Countdown);
    }

    #[test]
    fn single_mode_round_always_p1() {
        let mut app = ready_app();
        app.handle_command(UiCommand::SelectMode(GameMode::Single));
        app.handle_command(UiCommand::SelectDuration(10));
        app.handle_command(UiCommand::Start);
        while app.engine().phase() == RoundPhase::Countdown {
            app.apply_second();
        }
        // No claps at all — single player still "wins" their own round.
        for _ in 0..10 {
            app.apply_second();
        }
        assert_eq!(app.engine().winner(), Some(Winner::P1));
    }

    #[test]
    fn menu_selection_ignored_mid_round() {
        let mut app = playing_app(30);
        app.handle_command(UiCommand::SelectMode(GameMode::Single));
        app.handle_command(UiCommand::SelectDuration(60));
        assert_eq!(app.selected_mode(), GameMode::Double);
        assert_eq!(app.selected_duration(), 30);
    }

    #[test]
    fn detector_error_keeps_menu_blocked() {
        let mut app = make_app();
        app.handle_event(DetectorEvent::Error("no device".to_string()));
        assert!(!app.detector_ready());
        assert!(app.handle_command(UiCommand::Start));
        assert_eq!(app.engine().phase(), RoundPhase::Menu);
    }

    #[test]
    fn faces_are_display_only() {
        let mut app = playing_app(10);
        app.handle_event(DetectorEvent::Faces(vec![FaceBox { x: 0.4, y: 0.1, w: 0.2, h: 0.2 }]));
        assert_eq!(app.faces().len(), 1);
        assert_eq!(app.board().pair(), (0, 0));
    }

    #[test]
    fn quit_command_stops_the_loop() {
        let mut app = make_app();
        assert!(!app.handle_command(UiCommand::Quit));
    }
}
