//! 回合制棋类共享协议库
//!
//! 包含:
//! - 棋盘、玩家、位置等核心数据结构
//! - 搜索所需的对局模拟接口 (`Game`)
//! - 井字棋与黑白棋规则
//! - 服务端走法记号与结果字符
//! - 对局记录格式 (JSON)

mod board;
mod constants;
mod error;
mod game;
mod message;
mod othello;
mod player;
mod record;
mod tictactoe;

pub use board::{Board, BoardState, Position};
pub use constants::*;
pub use error::{GameError, Result};
pub use game::{Game, Score};
pub use message::{Difficulty, GameResult};
pub use othello::{Othello, Placement};
pub use player::{Mark, Player};
pub use record::{GameMetadata, GameRecord, MoveRecord, RECORD_VERSION};
pub use tictactoe::{Square, TicTacToe};
