use regex::Regex;
use std::sync::LazyLock;

// 默认棋盘 5×5
pub const BOARD_SIZE: i32 = 5;
pub const MIN_BOARD_SIZE: i32 = 3;
// 每匹马的已试格子用 u64 位图记录，行跨度固定为 8
pub const MAX_BOARD_SIZE: i32 = 8;

// 马的八个走法 (行偏移, 列偏移)，按优先级排列
// 顺序决定了有多条路径时先找到哪一条，不能随意调整
pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-1, 2),
    (1, 2),
    (-1, -2),
    (1, -2),
    (-2, -1),
    (-2, 1),
    (2, -1),
    (2, 1),
];

// 格子写法：a5 这样的代数记法，或者 "0,0" / "0 0" 这样的行列
pub static SQUARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<file>[a-h])(?P<rank>[1-8])|(?P<row>\d+)\s*[,\s]\s*(?P<col>\d+))$")
        .expect("square pattern is valid")
});
