//! Headless chase demo: a follower pursues a hopping target across a small
//! platform level and logs what it does.
//!
//! Run: RUST_LOG=info cargo run --bin chase [-- config.json]

use std::error::Error;

use platnav_demos::{Chase, DemoConfig, LEVEL};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading config from {path}");
            DemoConfig::load(path)?
        }
        None => DemoConfig::default(),
    };

    let mut chase = Chase::new(LEVEL, cfg)?;
    let summary = chase.run();
    log::info!(
        "{} ticks: {} catches, {} searches, following for {} ticks",
        summary.ticks,
        summary.catches,
        summary.searches,
        summary.following_ticks
    );
    Ok(())
}
