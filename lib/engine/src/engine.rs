/* 引擎协议：从标准输入逐行读命令，把搜索结果写到标准输出 */
use std::io::{self, BufRead, Write};

use tracing::{info, warn};

use crate::board::{check_size, Position};
use crate::constant::BOARD_SIZE;
use crate::error::{TourError, TourResult};
use crate::search::{survey, try_find_tour_with, SearchLimits, SurveyOutcome};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Quit,
}

/// Picks a start square uniformly from the board using OS randomness.
pub fn random_square(size: i32) -> TourResult<Position> {
    check_size(size)?;
    let mut buf = [0; 4];
    getrandom::getrandom(&mut buf).map_err(TourError::Random)?;
    let index = u32::from_be_bytes(buf) % (size * size) as u32;
    Ok(Position::new(index as i32 / size, index as i32 % size))
}

// 周游引擎
pub struct TourEngine {
    pub size: i32,
    pub limits: SearchLimits,
}

impl Default for TourEngine {
    fn default() -> Self {
        TourEngine::new()
    }
}

impl TourEngine {
    pub fn new() -> Self {
        TourEngine {
            size: BOARD_SIZE,
            limits: SearchLimits::default(),
        }
    }

    pub fn with_limits(limits: SearchLimits) -> Self {
        TourEngine {
            size: BOARD_SIZE,
            limits,
        }
    }

    /// Reads commands line by line until `quit` or end of input.
    pub fn start(&mut self, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
        info!(size = self.size, "session started");
        for line in input.lines() {
            let line = line?;
            let flow = self.execute(&line, &mut output)?;
            output.flush()?;
            if flow == Flow::Quit {
                break;
            }
        }
        info!("session finished");
        Ok(())
    }

    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        let mut token = line.splitn(2, ' ');
        let cmd = token.next().unwrap_or_default();
        let param = token.next().map(str::trim).unwrap_or_default();
        match cmd {
            "tour" => self.info(out)?,
            "isready" => writeln!(out, "readyok")?,
            "size" => self.set_size(param, out)?,
            "limit" => self.set_limit(param, out)?,
            "go" => self.go(param, out)?,
            "survey" => self.survey(out)?,
            "quit" => {
                writeln!(out, "bye")?;
                return Ok(Flow::Quit);
            }
            _ => {
                warn!(command = cmd, "unsupported command");
                writeln!(out, "not support")?;
            }
        }
        Ok(Flow::Continue)
    }

    pub fn info(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "id name knight-tour {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "option size type spin default {} min 3 max 8", BOARD_SIZE)?;
        writeln!(out, "option limit type string default none")?;
        writeln!(out, "tourok")
    }

    fn set_size(&mut self, param: &str, out: &mut impl Write) -> io::Result<()> {
        let Ok(size) = param.parse::<i32>() else {
            warn!(param, "size is not a number");
            return writeln!(out, "error cannot read size {:?}", param);
        };
        match check_size(size) {
            Ok(()) => {
                self.size = size;
                writeln!(out, "sizeok {}", size)
            }
            Err(err) => self.reject(&err, out),
        }
    }

    // 步数上限，none 表示不限
    fn set_limit(&mut self, param: &str, out: &mut impl Write) -> io::Result<()> {
        if param == "none" {
            self.limits = SearchLimits::default();
            return writeln!(out, "limitok none");
        }
        let Ok(steps) = param.parse::<u64>() else {
            warn!(param, "limit is not a number");
            return writeln!(out, "error cannot read limit {:?}", param);
        };
        self.limits = SearchLimits::with_max_steps(steps);
        writeln!(out, "limitok {}", steps)
    }

    // 执行搜索并输出整条路径
    // 参数: 起点，a5 / 0,0 / random
    pub fn go(&mut self, param: &str, out: &mut impl Write) -> io::Result<()> {
        let start = if param == "random" {
            random_square(self.size)
        } else {
            Position::parse(param, self.size)
        };
        let result = start.and_then(|start| {
            info!(start = %start.notation(self.size), "searching");
            try_find_tour_with(self.size, start, self.limits)
        });
        match result {
            Ok(Some(tour)) => writeln!(out, "tour {}", tour),
            Ok(None) => writeln!(out, "notour"),
            Err(err) => self.reject(&err, out),
        }
    }

    pub fn survey(&mut self, out: &mut impl Write) -> io::Result<()> {
        match survey(self.size, self.limits) {
            Ok(entries) => {
                for entry in entries {
                    let verdict = match entry.outcome {
                        SurveyOutcome::Tour(_) => "tour".to_owned(),
                        SurveyOutcome::NoTour => "notour".to_owned(),
                        SurveyOutcome::GaveUp { steps } => format!("gaveup {}", steps),
                    };
                    writeln!(out, "square {} {}", entry.start.notation(self.size), verdict)?;
                }
                writeln!(out, "surveyok")
            }
            Err(err) => self.reject(&err, out),
        }
    }

    fn reject(&self, err: &TourError, out: &mut impl Write) -> io::Result<()> {
        warn!(%err, "command rejected");
        writeln!(out, "error {}", err)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::*;

    fn run(engine: &mut TourEngine, script: &str) -> Vec<String> {
        let mut out = Vec::new();
        engine.start(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_handshake() {
        let lines = run(&mut TourEngine::new(), "tour\nisready\nquit\n");
        assert_eq!(lines.first().map(String::as_str), Some("id name knight-tour 0.1.0"));
        assert!(lines.contains(&"tourok".to_owned()));
        assert!(lines.contains(&"readyok".to_owned()));
        assert_eq!(lines.last().map(String::as_str), Some("bye"));
    }

    #[test]
    fn test_go() {
        let lines = run(&mut TourEngine::new(), "go a5\ngo 0 1\ngo 0,0\n");
        assert_eq!(
            lines,
            vec![
                "tour a5 c4 e5 d3 b4 d5 e3 d1 b2 a4 c5 e4 c3 a2 c1 e2 d4 b5 a3 b1 d2 b3 a1 c2 e1",
                "notour",
                "tour a5 c4 e5 d3 b4 d5 e3 d1 b2 a4 c5 e4 c3 a2 c1 e2 d4 b5 a3 b1 d2 b3 a1 c2 e1",
            ]
        );
    }

    #[test]
    fn test_go_rejects_bad_squares() {
        let lines = run(&mut TourEngine::new(), "go z9\ngo 7,7\ngo\n");
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.starts_with("error ")));
        assert!(lines[1].contains("outside the 5x5 board"));
    }

    #[test]
    fn test_go_random() {
        let lines = run(&mut TourEngine::new(), "go random\n");
        assert_eq!(lines.len(), 1);
        assert!(lines[0] == "notour" || lines[0].split(' ').count() == 26);
    }

    #[test]
    fn test_size() {
        let mut engine = TourEngine::new();
        let lines = run(&mut engine, "size 3\nsize 12\nsize x\ngo b2\n");
        assert_eq!(lines[0], "sizeok 3");
        assert!(lines[1].starts_with("error board size 12"));
        assert!(lines[2].starts_with("error "));
        assert_eq!(lines[3], "notour");
        assert_eq!(engine.size, 3);
    }

    #[test]
    fn test_survey_with_budget() {
        let mut engine = TourEngine::with_limits(SearchLimits::with_max_steps(5));
        let lines = run(&mut engine, "survey\n");
        assert_eq!(lines.len(), 26);
        assert_eq!(lines[0], "square a5 gaveup 5");
        assert_eq!(lines[25], "surveyok");
    }

    #[test]
    fn test_limit_stops_large_board() {
        let mut engine = TourEngine::new();
        let lines = run(&mut engine, "size 8\nlimit 1000\ngo a8\nlimit x\n");
        assert_eq!(
            lines,
            vec![
                "sizeok 8",
                "limitok 1000",
                "error search gave up after 1000 steps",
                "error cannot read limit \"x\"",
            ]
        );
        assert_eq!(engine.limits, SearchLimits::with_max_steps(1000));

        let lines = run(&mut engine, "limit none\nsize 5\ngo a5\n");
        assert_eq!(lines[0], "limitok none");
        assert_eq!(engine.limits, SearchLimits::default());
        assert!(lines[2].starts_with("tour a5 c4"));
    }

    #[test]
    fn test_unknown_command_and_quit() {
        let lines = run(&mut TourEngine::new(), "position startpos\nquit\ngo a5\n");
        assert_eq!(lines, vec!["not support", "bye"]);
    }

    #[test]
    fn test_random_square_in_board() {
        for _ in 0..50 {
            let pos = random_square(5).unwrap();
            assert!(crate::board::in_board(pos, 5));
        }
        assert!(random_square(1).is_err());
    }
}
