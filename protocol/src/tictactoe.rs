//! 井字棋规则
//!
//! 3×3 棋盘，主场 `X` 先手。走法记号为格子编号 `0..=8`（行优先）。

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardState};
use crate::constants::{TICTACTOE_SIZE, TICTACTOE_UNATTACHED_TOKEN};
use crate::error::{GameError, Result};
use crate::game::{Game, Score};
use crate::player::{Mark, Player};

/// 八条连线
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// 井字棋走法：落子格编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square(pub u8);

impl Square {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Square {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        match token.parse::<u8>() {
            Ok(index) if (index as usize) < TICTACTOE_SIZE * TICTACTOE_SIZE => Ok(Square(index)),
            _ => Err(GameError::InvalidMove {
                token: s.to_string(),
            }),
        }
    }
}

/// 井字棋对局
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicTacToe {
    state: BoardState,
}

impl TicTacToe {
    /// 创建空棋盘，主场先手
    pub fn new() -> Self {
        Self {
            state: BoardState::new(
                Board::empty(TICTACTOE_SIZE, TICTACTOE_SIZE),
                Player::Home,
            ),
        }
    }

    /// 从棋盘文本图创建
    pub fn from_diagram(diagram: &str, to_move: Player) -> Result<Self> {
        let board = Board::parse(diagram, TICTACTOE_SIZE, TICTACTOE_SIZE)?;
        Ok(Self {
            state: BoardState::new(board, to_move),
        })
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    /// 连成一线的一方
    pub fn winner(&self) -> Option<Mark> {
        let board = &self.state.board;
        LINES.iter().find_map(|line| {
            let first = board.cell(line[0])?;
            if line[1..].iter().all(|&i| board.cell(i) == Some(first)) {
                Some(first)
            } else {
                None
            }
        })
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for TicTacToe {
    type Action = Square;

    fn snapshot(&self) -> BoardState {
        self.state.clone()
    }

    fn restore(&mut self, player: Player, state: &BoardState) {
        self.state.board.clone_from(&state.board);
        self.state.to_move = player;
    }

    fn to_move(&self) -> Player {
        self.state.to_move
    }

    fn legal_actions(&self, _player: Player) -> Vec<Square> {
        if self.winner().is_some() {
            return Vec::new();
        }
        self.state
            .board
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| Square(i as u8))
            .collect()
    }

    fn apply_move(&mut self, player: Player, action: Square) -> bool {
        let Some(pos) = self.state.board.position_of(action.index()) else {
            return false;
        };
        if self.state.board.get(pos).is_some() || self.winner().is_some() {
            return false;
        }
        self.state.board.set(pos, Some(player.mark()));
        self.state.to_move = player.opponent();
        true
    }

    fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.state.board.is_full()
    }

    fn utility(&self) -> Score {
        match self.winner() {
            Some(Mark::Home) => 1,
            Some(Mark::Away) => -1,
            None => 0,
        }
    }

    fn parse_action(token: &str) -> Result<Square> {
        token.parse()
    }

    fn unattached_token() -> &'static str {
        TICTACTOE_UNATTACHED_TOKEN
    }
}
