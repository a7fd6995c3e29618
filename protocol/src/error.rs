//! 错误类型定义

use thiserror::Error;

/// 棋局规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// 无法解析的走法记号
    #[error("Invalid move token: {token:?}")]
    InvalidMove { token: String },

    /// 不合法的走法
    #[error("Illegal move {token} for {player}")]
    IllegalMove { token: String, player: String },

    /// 无效的棋盘文本图
    #[error("Invalid board diagram: {reason}")]
    InvalidBoard { reason: String },

    /// 无效的结果字符
    #[error("Invalid result character: {0:?}")]
    InvalidResult(char),

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, GameError>;
