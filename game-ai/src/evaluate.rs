//! 局面评估函数
//!
//! 搜索到达深度上限但未终局时，用评估器给出主场视角的静态分值。
//! 默认评估器直接返回终局估值函数，因此深度截断与真正终局使用同一套分值。

use protocol::{Board, Game, Mark, Othello, Score};

/// 评估器
pub trait Evaluator<G: Game> {
    /// 评估当前局面（主场视角，正值对主场有利）
    fn evaluate(&self, game: &G) -> Score;
}

/// 以终局估值函数作为静态评估
#[derive(Debug, Clone, Copy, Default)]
pub struct UtilityEvaluator;

impl<G: Game> Evaluator<G> for UtilityEvaluator {
    fn evaluate(&self, game: &G) -> Score {
        game.utility()
    }
}

/// 黑白棋位置分值表（行优先，索引为 row * 8 + col）
///
/// 角最值钱，紧邻角的 X 格与 C 格为负。
const OTHELLO_WEIGHTS: [Score; 64] = [
    100, -20,  10,   5,   5,  10, -20, 100,
    -20, -50,  -2,  -2,  -2,  -2, -50, -20,
     10,  -2,   1,   1,   1,   1,  -2,  10,
      5,  -2,   1,   0,   0,   1,  -2,   5,
      5,  -2,   1,   0,   0,   1,  -2,   5,
     10,  -2,   1,   1,   1,   1,  -2,  10,
    -20, -50,  -2,  -2,  -2,  -2, -50, -20,
    100, -20,  10,   5,   5,  10, -20, 100,
];

/// 黑白棋位置评估器
#[derive(Debug, Clone, Copy, Default)]
pub struct OthelloPositionEvaluator;

impl OthelloPositionEvaluator {
    /// 按位置表累加双方棋子分值
    pub fn evaluate_board(board: &Board) -> Score {
        board
            .cells()
            .iter()
            .zip(OTHELLO_WEIGHTS.iter())
            .map(|(cell, weight)| match cell {
                Some(Mark::Home) => *weight,
                Some(Mark::Away) => -*weight,
                None => 0,
            })
            .sum()
    }
}

impl Evaluator<Othello> for OthelloPositionEvaluator {
    fn evaluate(&self, game: &Othello) -> Score {
        Self::evaluate_board(game.board())
    }
}
