//! 玩家与棋子标记

use serde::{Deserialize, Serialize};

use crate::constants::{AWAY_MARK_CHAR, EMPTY_CHAR, HOME_MARK_CHAR};
use crate::game::Score;

/// 对局双方
///
/// 主场方（`Home = 0`）先手，落子为 `X`；客场方（`Away = 1`）后手，落子为 `O`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// 主场方（最大化一方）
    Home,
    /// 客场方（最小化一方）
    Away,
}

impl Player {
    /// 获取对方
    pub fn opponent(&self) -> Player {
        match self {
            Player::Home => Player::Away,
            Player::Away => Player::Home,
        }
    }

    /// 该玩家的棋子
    pub fn mark(&self) -> Mark {
        match self {
            Player::Home => Mark::Home,
            Player::Away => Mark::Away,
        }
    }

    /// 将主场视角的分值换算为本方视角
    pub fn orient(&self, home_minus_away: Score) -> Score {
        match self {
            Player::Home => home_minus_away,
            Player::Away => -home_minus_away,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Home => write!(f, "Home"),
            Player::Away => write!(f, "Away"),
        }
    }
}

/// 格子里的棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    Home,
    Away,
}

impl Mark {
    /// 棋子所属玩家
    pub fn owner(&self) -> Player {
        match self {
            Mark::Home => Player::Home,
            Mark::Away => Player::Away,
        }
    }

    /// 翻面后的棋子
    pub fn flipped(&self) -> Mark {
        self.owner().opponent().mark()
    }

    /// 文本图字符
    pub fn to_char(&self) -> char {
        match self {
            Mark::Home => HOME_MARK_CHAR,
            Mark::Away => AWAY_MARK_CHAR,
        }
    }

    /// 解析格子字符：`Some(None)` 表示空格，`None` 表示非法字符
    pub fn parse_cell(c: char) -> Option<Option<Mark>> {
        match c {
            HOME_MARK_CHAR | 'x' => Some(Some(Mark::Home)),
            AWAY_MARK_CHAR | 'o' | '0' => Some(Some(Mark::Away)),
            EMPTY_CHAR | '_' | ' ' => Some(None),
            _ => None,
        }
    }
}
