extern crate engine;

use std::io;

use anyhow::Context;
use engine::engine::TourEngine;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // 日志写到 stderr，stdout 只留给协议
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    TourEngine::new()
        .start(io::stdin().lock(), io::stdout().lock())
        .context("engine session failed")?;
    Ok(())
}
