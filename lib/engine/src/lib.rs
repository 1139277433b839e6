/**
 * 引擎核心库入口
 *
 * 说明
 * - board: 棋盘、格子坐标、路径上的马
 * - constant: 棋盘尺寸、马的走法顺序、格子记法
 * - search: 深度优先的周游路径搜索
 * - engine: 文本协议，对外提供搜索
 * - error: 错误类型
 */
pub mod board;
pub mod constant;
pub mod engine;
pub mod error;
pub mod search;

pub use board::Position;
pub use error::{TourError, TourResult};
pub use search::{find_tour, try_find_tour, try_find_tour_with, SearchLimits, Tour};
