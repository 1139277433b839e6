use std::io::{self, BufRead, Write};
use std::{thread, time::Duration};

use anyhow::Context;
use clap::Parser;
use engine::board::Position;
use engine::constant::BOARD_SIZE;
use engine::engine::random_square;
use engine::search::{survey, SearchLimits};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod game;
mod ui;

use game::{Status, TourSession};

/// Knight's tour search on a small board
#[derive(Parser, Debug)]
#[command(name = "knight-tour", version)]
struct Args {
    /// Start square, `a5` or `row,col`
    square: Option<String>,

    /// Start from a random square
    #[arg(long, conflicts_with = "square")]
    random: bool,

    /// Search from every square and print which ones have a tour
    #[arg(long, conflicts_with_all = ["square", "random"])]
    survey: bool,

    /// Replay the tour one move per frame
    #[arg(long)]
    animate: bool,

    /// Delay between frames
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Board dimension
    #[arg(long, default_value_t = BOARD_SIZE)]
    size: i32,

    /// Give up after this many search steps
    #[arg(long)]
    max_steps: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let limits = SearchLimits {
        max_steps: args.max_steps,
    };

    if args.survey {
        let entries = survey(args.size, limits).context("survey failed")?;
        print!("{}", ui::render_survey(&entries, args.size));
        return Ok(());
    }

    let start = match (&args.square, args.random) {
        (Some(square), _) => Some(Position::parse(square, args.size)?),
        (None, true) => Some(random_square(args.size)?),
        (None, false) => None,
    };

    let mut session = TourSession::new(args.size, limits);
    let frames = Frames {
        animate: args.animate,
        delay: Duration::from_millis(args.delay_ms),
    };
    let mut out = io::stdout().lock();
    match start {
        Some(start) => {
            play(&mut session, start, frames, &mut out)?;
        }
        // 没给起点就从标准输入读格子，和点击棋盘一样
        None => interact(&mut session, io::stdin().lock(), &mut out, frames)?,
    }
    Ok(())
}

#[derive(Clone, Copy)]
struct Frames {
    animate: bool,
    delay: Duration,
}

// 搜索并展示结果，起点被忽略时返回 false
fn play(
    session: &mut TourSession,
    start: Position,
    frames: Frames,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    writeln!(out, "Getting tour...")?;
    info!(start = %start.notation(session.size()), "searching");
    let accepted = session
        .click(start)
        .with_context(|| format!("search from {} failed", start.notation(session.size())))?;
    if !accepted {
        return Ok(false);
    }

    writeln!(out, "{}", session.status().message())?;
    if session.status() == Status::NoTour {
        return Ok(true);
    }
    if frames.animate {
        while session.advance().is_some() {
            write!(out, "\x1b[2J\x1b[H{}", ui::render(session))?;
            out.flush()?;
            thread::sleep(frames.delay);
        }
    } else {
        session.finish();
        write!(out, "{}", ui::render(session))?;
    }
    if let Some(tour) = session.tour() {
        writeln!(out, "{}", tour)?;
    }
    writeln!(out, "{}", session.status().message())?;
    Ok(true)
}

// 交互模式：输入格子开始搜索，reset 之后才能换起点，quit 退出
fn interact(
    session: &mut TourSession,
    input: impl BufRead,
    out: &mut impl Write,
    frames: Frames,
) -> anyhow::Result<()> {
    writeln!(out, "{}", session.status().message())?;
    for line in input.lines() {
        let line = line.context("failed to read stdin")?;
        match line.trim() {
            "" => continue,
            "quit" => break,
            "reset" => {
                session.reset();
                writeln!(out, "{}", session.status().message())?;
            }
            square => {
                let start = match Position::parse(square, session.size()) {
                    Ok(start) => start,
                    Err(err) => {
                        warn!(%err, "bad square");
                        writeln!(out, "error {}", err)?;
                        continue;
                    }
                };
                if !play(session, start, frames, out)? {
                    writeln!(out, "Type reset to pick another start")?;
                }
            }
        }
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTANT: Frames = Frames {
        animate: false,
        delay: Duration::ZERO,
    };

    fn run(script: &str) -> Vec<String> {
        let mut session = TourSession::new(5, SearchLimits::default());
        let mut out = Vec::new();
        interact(&mut session, script.as_bytes(), &mut out, INSTANT).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_second_start_needs_reset() {
        let lines = run("a5\nb5\nreset\nb5\nquit\na5\n");
        assert_eq!(lines[..3], ["Click a cell to start...", "Getting tour...", "Running tour..."]);
        // 第二次点击被忽略，reset 之后 b5 才真正搜索，quit 之后的输入不再处理
        assert_eq!(
            lines[lines.len() - 6..],
            [
                "The tour is done...",
                "Getting tour...",
                "Type reset to pick another start",
                "Click a cell to start...",
                "Getting tour...",
                "No tour exist",
            ]
        );
    }

    #[test]
    fn test_bad_square_keeps_session_open() {
        let lines = run("z9\na5\n");
        assert!(lines[1].starts_with("error cannot read square"));
        let tour = "a5 c4 e5 d3 b4 d5 e3 d1 b2 a4 c5 e4 c3 a2 c1 e2 d4 b5 a3 b1 d2 b3 a1 c2 e1";
        assert!(lines.iter().any(|l| l == tour));
    }
}
