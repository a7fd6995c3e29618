//! 对局模拟接口
//!
//! 搜索引擎只通过 [`Game`] 与具体棋类交互：取快照、恢复、生成走法、落子、终局判定和估值。

use crate::board::BoardState;
use crate::error::{GameError, Result};
use crate::message::GameResult;
use crate::player::Player;

/// 分值（始终为主场减客场）
pub type Score = i32;

/// 可被搜索的回合制棋类
///
/// 所有方法都作用于同一个可变实例。搜索时使用的是独立的模拟副本，从不修改真实对局。
pub trait Game {
    /// 走法
    type Action: Copy + Eq + std::fmt::Debug + std::fmt::Display;

    /// 当前棋盘的值拷贝
    fn snapshot(&self) -> BoardState;

    /// 将本实例重置为给定局面，并设定逻辑上的走子方
    fn restore(&mut self, player: Player, state: &BoardState);

    /// 当前走子方
    fn to_move(&self) -> Player;

    /// 生成指定玩家的所有合法走法（行优先顺序）
    ///
    /// 返回空列表表示该玩家只能停一手。
    fn legal_actions(&self, player: Player) -> Vec<Self::Action>;

    /// 执行走法；被拒绝时返回 false 且不修改棋盘
    fn apply_move(&mut self, player: Player, action: Self::Action) -> bool;

    /// 是否终局
    fn is_terminal(&self) -> bool;

    /// 主场视角的分值
    fn utility(&self) -> Score;

    /// 解析服务端走法记号
    fn parse_action(token: &str) -> Result<Self::Action>;

    /// 未接入对局时返回的默认走法记号
    fn unattached_token() -> &'static str;

    /// 终局结果（未终局返回 None）
    fn outcome(&self) -> Option<GameResult> {
        if !self.is_terminal() {
            return None;
        }
        Some(GameResult::from_utility(self.utility()))
    }

    /// 按记号为当前走子方落子
    fn play_token(&mut self, token: &str) -> Result<Self::Action> {
        if self.is_terminal() {
            return Err(GameError::GameOver);
        }
        let action = Self::parse_action(token)?;
        let player = self.to_move();
        if !self.legal_actions(player).contains(&action) || !self.apply_move(player, action) {
            tracing::warn!("{} 的走法 {} 不合法", player, token);
            return Err(GameError::IllegalMove {
                token: token.to_string(),
                player: player.to_string(),
            });
        }
        Ok(action)
    }

    /// 当前走子方停一手
    fn pass_turn(&mut self) {
        let mut state = self.snapshot();
        tracing::debug!("{} 无处可下，停一手", state.to_move);
        state.switch_turn();
        self.restore(state.to_move, &state);
    }
}
