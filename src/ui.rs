use engine::board::Position;
use engine::search::{SurveyEntry, SurveyOutcome};

use crate::game::TourSession;

const CELL_WIDTH: usize = 4;

fn file_header(size: i32) -> String {
    let mut line = String::from("  ");
    for col in 0..size {
        let file = char::from(b'a' + col as u8);
        line.push_str(&format!("{:^width$}", file, width = CELL_WIDTH));
    }
    line
}

/// 画棋盘：走过的格子标上第几步，当前的马用方括号框起来
pub fn render(session: &TourSession) -> String {
    let size = session.size();
    let visited = session.visited();
    let current = session.current();

    let mut out = String::new();
    for row in 0..size {
        out.push_str(&format!("{} ", size - row));
        for col in 0..size {
            let pos = Position::new(row, col);
            let cell = match visited.iter().position(|p| *p == pos) {
                Some(i) if current == Some(pos) => format!("[{:>2}]", i + 1),
                Some(i) => format!(" {:>2} ", i + 1),
                None => " .. ".to_owned(),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out.push_str(&file_header(size));
    out.push('\n');
    out
}

/// 每个起点一格：T 有解，. 无解，? 搜索步数用完
pub fn render_survey(entries: &[SurveyEntry], size: i32) -> String {
    let mut out = String::new();
    for row in 0..size {
        out.push_str(&format!("{} ", size - row));
        for entry in entries.iter().filter(|e| e.start.row == row) {
            let mark = match entry.outcome {
                SurveyOutcome::Tour(_) => 'T',
                SurveyOutcome::NoTour => '.',
                SurveyOutcome::GaveUp { .. } => '?',
            };
            out.push_str(&format!("{:^width$}", mark, width = CELL_WIDTH));
        }
        out.push('\n');
    }
    out.push_str(&file_header(size));
    out.push('\n');
    out
}
