//! clap_menu — interactive console probe for the clap classifier.
//!
//! Type wrist positions, watch the latch and the scoreboard react.  Useful
//! for tuning thresholds without a camera or a window.

use std::io::{self, Write};

use clap_stream::{
    ClapDetector, ClapThresholds, FrameObservation, GameMode, HandObservation, PlayerSide,
    Scoreboard,
};

fn main() {
    println!();
    println!("  Clap Stream — classifier probe");
    println!("  ------------------------------");
    println!("  Commands:");
    println!("    f x1 y1 x2 y2 [x3 y3 ...]   feed a frame with these wrists");
    println!("    m single|double             switch mode");
    println!("    t clap open                 set thresholds");
    println!("    r                           reset latches and scores");
    println!("    q                           quit");
    println!();

    let mut thresholds = ClapThresholds::default();
    let mut detector = ClapDetector::new(thresholds, GameMode::Double);
    let mut board = Scoreboard::new();
    let mut ts = 0.0_f64;

    loop {
        print!("clap> ");
        io::stdout().flush().ok();
        let mut line = String::new();
        if io::stdin().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("q") => break,
            Some("r") => {
                detector.reset();
                board.reset();
                println!("  latches reopened, scores cleared");
            }
            Some("m") => match parts.next() {
                Some("single") => {
                    detector.set_mode(GameMode::Single);
                    println!("  mode: single");
                }
                Some("double") => {
                    detector.set_mode(GameMode::Double);
                    println!("  mode: double");
                }
                _ => println!("  usage: m single|double"),
            },
            Some("t") => {
                let clap: Option<f32> = parts.next().and_then(|s| s.parse().ok());
                let open: Option<f32> = parts.next().and_then(|s| s.parse().ok());
                match (clap, open) {
                    (Some(c), Some(o)) => match ClapThresholds::new(c, o) {
                        Ok(t) => {
                            thresholds = t;
                            detector = ClapDetector::new(thresholds, detector.mode());
                            board.reset();
                            println!("  thresholds: clap<{} open>{}", t.clap, t.open);
                        }
                        Err(e) => println!("  {}", e),
                    },
                    _ => println!("  usage: t 0.15 0.30"),
                }
            }
            Some("f") => {
                let coords: Vec<f32> = parts.filter_map(|s| s.parse().ok()).collect();
                if coords.len() < 2 || coords.len() % 2 != 0 {
                    println!("  usage: f x1 y1 x2 y2 ...");
                    continue;
                }
                ts += 33.0; // pretend ~30 fps
                let hands = coords
                    .chunks(2)
                    .map(|c| HandObservation::from_wrist(c[0], c[1]))
                    .collect();
                let events = detector.process(&FrameObservation::new(ts, hands));
                for ev in &events {
                    board.award(ev.side);
                }
                println!(
                    "  t={:.0}ms  events={:?}  P1={:?}/{}  P2={:?}/{}",
                    ts,
                    events,
                    detector.state(PlayerSide::P1),
                    board.get(PlayerSide::P1),
                    detector.state(PlayerSide::P2),
                    board.get(PlayerSide::P2),
                );
            }
            Some(other) => println!("  unknown command: {}", other),
            None => {}
        }
    }
}
