//! round_demo — drives one scripted round on the console.
//!
//! No camera, no window: synthetic clap events are injected at fixed ticks
//! so the whole phase lifecycle can be watched in a terminal.  Pass
//! `--realtime` to tick at true one-second cadence instead of fast-forward.

use std::thread;
use std::time::Duration;

use clap_stream::{GameMode, PlayerSide, Scoreboard};
use round_engine::{RoundEngine, RoundPhase, TickOutcome, Winner};

fn main() {
    let realtime = std::env::args().any(|a| a == "--realtime");
    let pace = if realtime {
        Duration::from_secs(1)
    } else {
        Duration::from_millis(120)
    };

    println!();
    println!("  Round Engine — scripted two-player round (10 s)");
    println!();

    let mut engine = RoundEngine::new();
    let mut board = Scoreboard::new();

    assert!(engine.start_game(GameMode::Double, 10));
    println!("  [menu]      start_game(double, 10)");

    let mut second = 0u32;
    while engine.phase() != RoundPhase::GameOver {
        thread::sleep(pace);
        second += 1;

        match engine.tick_second() {
            TickOutcome::Countdown(n) => println!("  [countdown] {}", n),
            TickOutcome::Go => println!("  [countdown] GO!  (clock armed at {})", engine.time_left()),
            TickOutcome::TimeLeft(t) => {
                // Scripted claps: P1 every 2 s, P2 every 3 s.
                if engine.scoring_active() {
                    if second % 2 == 0 {
                        board.award(PlayerSide::P1);
                    }
                    if second % 3 == 0 {
                        board.award(PlayerSide::P2);
                    }
                }
                let (p1, p2) = board.pair();
                println!("  [playing]   {:>2}s left   P1={}  P2={}", t, p1, p2);
            }
            TickOutcome::Idle => {}
        }

        let (p1, p2) = board.pair();
        if let Some(w) = engine.resolve_timeout(p1, p2) {
            let label = match w {
                Winner::P1 => "Player 1 wins",
                Winner::P2 => "Player 2 wins",
                Winner::Draw => "Draw",
            };
            println!("  [game over] {}  (P1={}  P2={})", label, p1, p2);
        }
    }

    assert!(engine.reset_game());
    println!("  [menu]      back to menu — scores still on the board: {:?}", board.pair());
}
