//! clap_arena — interactive entry point.

use std::io::{self, Write};

use clap_arena::app::{run, AppConfig};
use clap_stream::{ClapThresholds, GameMode};
use round_engine::DURATION_OPTIONS;

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║            Clap Arena — Hand-Tracked Clap Battle             ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hand tracking");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Keyboard simulation  (use --features leap for hardware)");
    println!();

    let cfg = if std::env::args().any(|a| a == "--quick") {
        println!("  Quick-start: single player, 10 s, default sensitivity\n");
        AppConfig::default()
    } else {
        configure_interactively()
    };

    println!();
    println!("  Opening arena window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    let mode = match read_line("  Players — 1 single, 2 double (default 1): ").trim() {
        "2" => GameMode::Double,
        _ => GameMode::Single,
    };

    let duration: u32 = {
        let d = read_line("  Round length seconds 10/30/60 (default 10): ")
            .trim()
            .parse()
            .unwrap_or(DURATION_OPTIONS[0]);
        if DURATION_OPTIONS.contains(&d) { d } else { DURATION_OPTIONS[0] }
    };

    let thresholds = loop {
        let clap: f32 = read_line("  Clap distance (default 0.15): ")
            .trim()
            .parse()
            .unwrap_or(0.15);
        let open: f32 = read_line("  Reopen distance (default 0.30): ")
            .trim()
            .parse()
            .unwrap_or(0.30);
        match ClapThresholds::new(clap, open) {
            Ok(t) => break t,
            Err(e) => println!("  ⚠  {}", e),
        }
    };

    AppConfig { thresholds, mode, duration }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
