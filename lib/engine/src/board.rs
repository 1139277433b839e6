/*
 * 棋盘模块（Board 与马的表示）
 *
 * 设计要点
 * - 棋盘为 N×N，默认 5×5，行列从 0 开始，第 0 行在最上方
 * - Position 表示格子坐标，创建后不再修改
 * - Knight 是搜索路径上的一匹马：所在格子 + 从这里已经试过的目标格子（位图）
 *   每匹马只记得自己试过哪些格子，回溯时连同记录一起丢掉
 * - Board 只记录哪些格子被占用以及占用计数，马本身归搜索路径所有
 *
 * 记法
 * - 列用字母 a.. 表示，行用数字表示，从最下面一行数起
 *   5×5 棋盘上 (0, 0) 是 a5，(4, 4) 是 e1
 */

use std::fmt;

use crate::constant::{BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE, SQUARE_RE};
use crate::error::{TourError, TourResult};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Position { row, col }
    }
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    pub fn offset(&self, (d_row, d_col): (i32, i32)) -> Self {
        Position::new(self.row + d_row, self.col + d_col)
    }

    // 日字：行差和列差一个是 1 一个是 2
    pub fn is_knight_move(&self, to: Position) -> bool {
        (self.row - to.row).abs() * (self.col - to.col).abs() == 2
    }

    /// Algebraic name of the square on a board of the given size, e.g. `a5` for `(0, 0)` on 5×5.
    pub fn notation(&self, size: i32) -> String {
        let file = char::from(b'a' + self.col as u8);
        format!("{}{}", file, size - self.row)
    }

    /// Reads `a5`, `0,0` or `0 0` and checks the square lies on the board.
    pub fn parse(input: &str, size: i32) -> TourResult<Position> {
        let text = input.trim().to_ascii_lowercase();
        let bad_square = || TourError::BadSquare {
            input: input.to_owned(),
        };
        let captures = SQUARE_RE.captures(&text).ok_or_else(bad_square)?;

        let pos = if let (Some(file), Some(rank)) = (captures.name("file"), captures.name("rank")) {
            let col = (file.as_str().as_bytes()[0] - b'a') as i32;
            let rank: i32 = rank.as_str().parse().map_err(|_| bad_square())?;
            Position::new(size - rank, col)
        } else {
            let row = captures.name("row").ok_or_else(bad_square)?;
            let col = captures.name("col").ok_or_else(bad_square)?;
            Position::new(
                row.as_str().parse().map_err(|_| bad_square())?,
                col.as_str().parse().map_err(|_| bad_square())?,
            )
        };

        if in_board(pos, size) {
            Ok(pos)
        } else {
            Err(TourError::OutOfBoard {
                row: pos.row,
                col: pos.col,
                size,
            })
        }
    }

    // 位图下标，行跨度固定为 MAX_BOARD_SIZE，与棋盘尺寸无关
    fn bit(&self) -> u64 {
        1u64 << (self.row * MAX_BOARD_SIZE + self.col)
    }
}

// 格子是否在棋盘内
pub fn in_board(pos: Position, size: i32) -> bool {
    pos.row >= 0 && pos.row < size && pos.col >= 0 && pos.col < size
}

pub fn check_size(size: i32) -> TourResult<()> {
    if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(TourError::BadSize {
            size,
            min: MIN_BOARD_SIZE,
            max: MAX_BOARD_SIZE,
        })
    }
}

/// One knight on the search path.
///
/// `tried` remembers which destinations were already attempted from this square. A destination
/// is marked as soon as the search advances into it, so it is never retried from here even after
/// the search backtracks through this knight.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Knight {
    pub position: Position,
    tried: u64,
}

impl Knight {
    pub fn new(position: Position) -> Self {
        Knight { position, tried: 0 }
    }

    pub fn mark_tried(&mut self, to: Position) {
        self.tried |= to.bit();
    }

    pub fn has_tried(&self, to: Position) -> bool {
        self.tried & to.bit() != 0
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    size: i32,
    // 行优先存放，true 表示该格有马
    cells: Vec<bool>,
    count: usize,
}

impl Default for Board {
    fn default() -> Self {
        Board::empty(BOARD_SIZE)
    }
}

impl Board {
    /// Empty board of `size`×`size`. The size must already have passed [`check_size`].
    pub fn empty(size: i32) -> Self {
        debug_assert!(check_size(size).is_ok(), "unsupported board size {size}");
        Board {
            size,
            cells: vec![false; (size * size) as usize],
            count: 0,
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.count
    }

    // 调用方保证格子在棋盘内
    fn index(&self, pos: Position) -> usize {
        debug_assert!(in_board(pos, self.size), "{:?} is outside the board", pos);
        (pos.row * self.size + pos.col) as usize
    }

    // 放马，格子必须是空的
    pub fn place(&mut self, knight: &Knight) {
        let index = self.index(knight.position);
        debug_assert!(!self.cells[index], "{:?} is already occupied", knight.position);
        self.cells[index] = true;
        self.count += 1;
    }

    pub fn clear(&mut self, pos: Position) {
        let index = self.index(pos);
        debug_assert!(self.cells[index], "{:?} is not occupied", pos);
        self.cells[index] = false;
        self.count -= 1;
    }

    /// `pos` must lie on the board; check with [`in_board`] first.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.cells[self.index(pos)]
    }

    pub fn is_full(&self) -> bool {
        self.count == self.cells.len()
    }

    // 候选格可走：在棋盘内、没有马、当前这匹马没从这里试过
    pub fn is_available(&self, to: Position, from: &Knight) -> bool {
        in_board(to, self.size) && !self.is_occupied(to) && !from.has_tried(to)
    }
}

// 调试用：K 表示有马，* 表示空格
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            let line = (0..self.size)
                .map(|col| {
                    if self.is_occupied(Position::new(row, col)) {
                        "K"
                    } else {
                        "*"
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
