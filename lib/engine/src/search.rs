/*
 * Search Module - 马的周游路径搜索
 *
 * 深度优先搜索，显式栈 + 原地回溯：
 * - 栈顶的马按固定顺序找下一个没试过的格子，找到就前进一步
 * - 找不到就把栈顶的马拿掉并清空它的格子（回溯）
 * - 棋盘放满即成功，栈空即无解
 *
 * 每次调用都有自己的棋盘和路径，调用之间互不影响，可以在多个线程里同时搜索不同的起点
 */

use std::fmt;
use std::thread;

use tracing::{debug, warn};

use crate::board::{check_size, in_board, Board, Knight, Position};
use crate::constant::{BOARD_SIZE, KNIGHT_OFFSETS};
use crate::error::{TourError, TourResult};

/// Budget for one search. The default is unbounded, which always terminates on small boards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of steps (advances plus backtracks)
    pub max_steps: Option<u64>,
}

impl SearchLimits {
    pub fn with_max_steps(max_steps: u64) -> Self {
        SearchLimits {
            max_steps: Some(max_steps),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// 放上棋盘的马，包括起点
    pub placed: u64,
    /// 回溯次数
    pub backtracked: u64,
    /// 前进加回溯
    pub steps: u64,
}

/// A complete tour: every square of the board exactly once, in visiting order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tour {
    size: i32,
    positions: Vec<Position>,
}

impl Tour {
    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn into_positions(self) -> Vec<Position> {
        self.positions
    }

    pub fn start(&self) -> Position {
        self.positions[0]
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }

    /// 1-based visiting order of a square, as the board labels show it.
    pub fn order_of(&self, pos: Position) -> Option<usize> {
        self.positions.iter().position(|p| *p == pos).map(|i| i + 1)
    }

    pub fn notation(&self) -> Vec<String> {
        self.positions.iter().map(|p| p.notation(self.size)).collect()
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation().join(" "))
    }
}

/// Search state: the private board, the path of knights, and counters.
pub struct TourSearch {
    board: Board,
    path: Vec<Knight>,
    stats: SearchStats,
    limits: SearchLimits,
}

impl TourSearch {
    pub fn new(size: i32, limits: SearchLimits) -> TourResult<Self> {
        check_size(size)?;
        Ok(TourSearch {
            board: Board::empty(size),
            path: Vec::with_capacity((size * size) as usize),
            stats: SearchStats::default(),
            limits,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn path(&self) -> &[Knight] {
        &self.path
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    fn reset(&mut self) {
        self.board = Board::empty(self.board.size());
        self.path.clear();
        self.stats = SearchStats::default();
    }

    fn push_knight(&mut self, knight: Knight) {
        self.board.place(&knight);
        self.path.push(knight);
        self.stats.placed += 1;
    }

    fn pop_knight(&mut self) -> Option<Knight> {
        let knight = self.path.pop()?;
        self.board.clear(knight.position);
        self.stats.backtracked += 1;
        Some(knight)
    }

    // 栈顶的马按固定顺序找下一个可走的格子，找到后记在这匹马身上，以后不再从这里试
    fn next_move(&mut self) -> Option<Position> {
        let current = self.path.last()?;
        let target = KNIGHT_OFFSETS
            .iter()
            .map(|&offset| current.position.offset(offset))
            .find(|&to| self.board.is_available(to, current))?;
        self.path.last_mut()?.mark_tried(target);
        Some(target)
    }

    /// Runs the search from `start`.
    ///
    /// Returns `Ok(None)` when the search is exhausted; the board is then empty again.
    pub fn run(&mut self, start: Position) -> TourResult<Option<Tour>> {
        let size = self.board.size();
        if !in_board(start, size) {
            return Err(TourError::OutOfBoard {
                row: start.row,
                col: start.col,
                size,
            });
        }
        self.reset();
        self.push_knight(Knight::new(start));

        loop {
            if self.board.is_full() {
                let positions: Vec<Position> = self.path.drain(..).map(|k| k.position).collect();
                for pos in &positions {
                    self.board.clear(*pos);
                }
                debug!(
                    start = %start.notation(size),
                    placed = self.stats.placed,
                    backtracked = self.stats.backtracked,
                    "tour found"
                );
                return Ok(Some(Tour { size, positions }));
            }

            if let Some(max_steps) = self.limits.max_steps {
                if self.stats.steps >= max_steps {
                    warn!(start = %start.notation(size), max_steps, "step budget spent");
                    debug!("board when giving up:\n{}", self.board);
                    let steps = self.stats.steps;
                    self.reset();
                    return Err(TourError::StepLimit { steps });
                }
            }
            self.stats.steps += 1;

            match self.next_move() {
                Some(to) => self.push_knight(Knight::new(to)),
                None => {
                    self.pop_knight();
                    if self.path.is_empty() {
                        debug!(
                            start = %start.notation(size),
                            placed = self.stats.placed,
                            backtracked = self.stats.backtracked,
                            "no tour"
                        );
                        return Ok(None);
                    }
                }
            }
        }
    }
}

/// Finds a tour of the 5×5 board from `start`, or `None` when no tour starts there.
///
/// # Panics
///
/// Panics if `start` is outside the board. Use [`try_find_tour`] to get an error instead.
pub fn find_tour(start: Position) -> Option<Tour> {
    assert!(
        in_board(start, BOARD_SIZE),
        "start square {:?} is outside the {}x{} board",
        start,
        BOARD_SIZE,
        BOARD_SIZE
    );
    try_find_tour(start).ok().flatten()
}

pub fn try_find_tour(start: Position) -> TourResult<Option<Tour>> {
    try_find_tour_with(BOARD_SIZE, start, SearchLimits::default())
}

pub fn try_find_tour_with(size: i32, start: Position, limits: SearchLimits) -> TourResult<Option<Tour>> {
    TourSearch::new(size, limits)?.run(start)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurveyOutcome {
    Tour(Tour),
    NoTour,
    GaveUp { steps: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurveyEntry {
    pub start: Position,
    pub outcome: SurveyOutcome,
}

/// One independent search per square, each on its own thread, results in row-major order.
pub fn survey(size: i32, limits: SearchLimits) -> TourResult<Vec<SurveyEntry>> {
    check_size(size)?;
    let starts: Vec<Position> = (0..size)
        .flat_map(|row| (0..size).map(move |col| Position::new(row, col)))
        .collect();

    thread::scope(|scope| {
        let handles: Vec<_> = starts
            .iter()
            .map(|&start| {
                scope.spawn(move || {
                    let outcome = match try_find_tour_with(size, start, limits) {
                        Ok(Some(tour)) => SurveyOutcome::Tour(tour),
                        Ok(None) => SurveyOutcome::NoTour,
                        Err(TourError::StepLimit { steps }) => SurveyOutcome::GaveUp { steps },
                        Err(err) => return Err(err),
                    };
                    Ok(SurveyEntry { start, outcome })
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}
