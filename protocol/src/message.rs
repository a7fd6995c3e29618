//! 与服务端交互的结果与难度定义

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::Score;
use crate::player::Player;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    /// 简单：depth=2
    Easy,
    /// 中等：depth=4
    #[default]
    Medium,
    /// 困难：depth=7
    Hard,
}

impl Difficulty {
    /// 该难度对应的搜索深度
    pub fn max_depth(&self) -> u32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 7,
        }
    }
}

/// 游戏结果
///
/// 服务端用单个字符通知：`H` 主场胜，`A` 客场胜，`T` 和棋。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// 主场胜
    HomeWin,
    /// 客场胜
    AwayWin,
    /// 和棋
    Tie,
}

impl GameResult {
    /// 由主场视角的终局分值得出结果
    pub fn from_utility(utility: Score) -> Self {
        match utility.signum() {
            1 => GameResult::HomeWin,
            -1 => GameResult::AwayWin,
            _ => GameResult::Tie,
        }
    }

    /// 获胜方（和棋返回 None）
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameResult::HomeWin => Some(Player::Home),
            GameResult::AwayWin => Some(Player::Away),
            GameResult::Tie => None,
        }
    }

    /// 服务端字符
    pub fn to_char(&self) -> char {
        match self {
            GameResult::HomeWin => 'H',
            GameResult::AwayWin => 'A',
            GameResult::Tie => 'T',
        }
    }
}

impl TryFrom<char> for GameResult {
    type Error = GameError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'H' => Ok(GameResult::HomeWin),
            'A' => Ok(GameResult::AwayWin),
            'T' => Ok(GameResult::Tie),
            _ => Err(GameError::InvalidResult(c)),
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::HomeWin => write!(f, "Home win"),
            GameResult::AwayWin => write!(f, "Away win"),
            GameResult::Tie => write!(f, "Tie"),
        }
    }
}
