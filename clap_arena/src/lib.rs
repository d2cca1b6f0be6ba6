//! # clap_arena
//!
//! Two-player clap battle: a hand-tracking stream is classified into clap
//! events per player side, scores accumulate during a timed round, and a
//! winner is declared.
//!
//! ## Round flow
//!
//! | Phase | What happens |
//! |---|---|
//! | Menu | Pick mode and duration; start is blocked until the detector is ready |
//! | Countdown | 3 · 2 · 1 · GO! — claps are detected but do not score |
//! | Playing | Every debounced clap scores for its side; clock counts down |
//! | Game over | Winner frozen from the final tally; `R` returns to the menu |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: keyboard claps, no hardware needed.
//! * `leap` — **Hardware mode**: a real LeapMotion controller supplies hand
//!   observations via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Action |
//! |---|---|
//! | `1` / `2` | Menu: single / two-player mode |
//! | `3` / `4` / `5` | Menu: round length 10 / 30 / 60 s |
//! | `Space` | Menu: start the round |
//! | `Z` | Clap on the left side (P1) |
//! | `M` | Clap on the right side (P2) |
//! | `C` | Both sides clap at once |
//! | `R` | Game over: rematch (back to the menu) |
//! | `Q` | Quit |

pub mod detector;
pub mod app;
pub mod hud;
