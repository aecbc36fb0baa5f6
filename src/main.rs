//! Swipe Bricks entry point
//!
//! Native builds run a headless autopilot session and log the outcome; the
//! browser build is driven from JavaScript through `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use swipe_bricks::Tuning;
    use swipe_bricks::platform::FrameView;
    use swipe_bricks::sim::{GameEvent, GameState, TickInput, tick};

    /// Upper bound on simulated ticks (about 14 hours of play at 60 Hz)
    const MAX_TICKS: u64 = 3_000_000;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading tuning file {path}"))?;
            Tuning::from_json(&json).with_context(|| format!("loading tuning file {path}"))?
        }
        None => Tuning::default(),
    };

    let seed = match args.next() {
        Some(s) => s.parse::<u64>().with_context(|| format!("invalid seed {s:?}"))?,
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
    };

    log::info!("Swipe Bricks (native) starting, seed {seed}");
    let mut state = GameState::new(tuning, seed);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    while !state.game_over && state.time_ticks < MAX_TICKS {
        tick(&mut state, &input);
        for event in state.drain_events() {
            if let GameEvent::RoundAdvanced { round } = event {
                log::debug!(
                    "round {round}: {} bricks, {} balls",
                    state.bricks.len(),
                    state.balls_to_shoot
                );
            }
        }
    }

    let summary = state.summary();
    if !state.game_over {
        log::warn!("Stopped after {MAX_TICKS} ticks without a game over");
    }
    println!(
        "Game Over! Survived {} rounds, score {}",
        summary.rounds_survived, summary.score
    );
    log::debug!(
        "final frame: {}",
        serde_json::to_string(&FrameView::new(&state)).context("serializing frame")?
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
