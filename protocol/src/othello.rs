//! 黑白棋规则
//!
//! 8×8 棋盘，主场 `X` 先手。落子必须在至少一个方向上夹住对方棋子，被夹住的棋子翻面。
//! 一方无处可下时停一手，双方都无处可下时终局。
//!
//! 走法记号为 `<行><列>`：行用数字 `0..=7`，列用字母 `a..=h`，例如 `2b`。

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardState, Position};
use crate::constants::{OTHELLO_SIZE, OTHELLO_UNATTACHED_TOKEN};
use crate::error::{GameError, Result};
use crate::game::{Game, Score};
use crate::player::{Mark, Player};

/// 八个方向 (dr, dc)
const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// 黑白棋走法：落子位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement(pub Position);

impl Placement {
    pub const fn new(row: u8, col: u8) -> Self {
        Self(Position::new(row, col))
    }

    pub fn row(&self) -> u8 {
        self.0.row
    }

    pub fn col(&self) -> u8 {
        self.0.col
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.0.row, (b'a' + self.0.col) as char)
    }
}

impl FromStr for Placement {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || GameError::InvalidMove {
            token: s.to_string(),
        };

        let mut chars = s.trim().chars();
        let (Some(row), Some(col), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };

        let row = row.to_digit(10).ok_or_else(invalid)? as usize;
        let col = col.to_ascii_lowercase();
        if !col.is_ascii_lowercase() {
            return Err(invalid());
        }
        let col = (col as u8 - b'a') as usize;

        if row < OTHELLO_SIZE && col < OTHELLO_SIZE {
            Ok(Placement::new(row as u8, col as u8))
        } else {
            Err(invalid())
        }
    }
}

/// 黑白棋对局
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Othello {
    state: BoardState,
}

impl Othello {
    /// 标准开局：中央四子交叉摆放，主场先手
    pub fn new() -> Self {
        let mut board = Board::empty(OTHELLO_SIZE, OTHELLO_SIZE);
        board.set(Position::new(3, 3), Some(Mark::Away));
        board.set(Position::new(4, 4), Some(Mark::Away));
        board.set(Position::new(3, 4), Some(Mark::Home));
        board.set(Position::new(4, 3), Some(Mark::Home));
        Self {
            state: BoardState::new(board, Player::Home),
        }
    }

    /// 从棋盘文本图创建
    pub fn from_diagram(diagram: &str, to_move: Player) -> Result<Self> {
        let board = Board::parse(diagram, OTHELLO_SIZE, OTHELLO_SIZE)?;
        Ok(Self {
            state: BoardState::new(board, to_move),
        })
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    /// 某方棋子数
    pub fn disc_count(&self, player: Player) -> usize {
        self.state.board.count(player.mark())
    }

    /// 在 pos 落子后会被翻面的棋子
    fn flips(&self, player: Player, pos: Position) -> Vec<Position> {
        let board = &self.state.board;
        let own = player.mark();
        let mut flipped = Vec::new();

        if !board.contains(pos) || board.get(pos).is_some() {
            return flipped;
        }

        for (dr, dc) in DIRECTIONS {
            let mut line = Vec::new();
            let mut cursor = pos.offset(dr, dc, board.width(), board.height());

            while let Some(next) = cursor {
                match board.get(next) {
                    Some(mark) if mark == own => {
                        flipped.extend_from_slice(&line);
                        break;
                    }
                    Some(_) => line.push(next),
                    None => break,
                }
                cursor = next.offset(dr, dc, board.width(), board.height());
            }
        }

        flipped
    }

    /// 是否至少有一步可下
    fn has_legal_action(&self, player: Player) -> bool {
        let board = &self.state.board;
        (0..board.len())
            .filter_map(|i| board.position_of(i))
            .any(|pos| !self.flips(player, pos).is_empty())
    }
}

impl Default for Othello {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Othello {
    type Action = Placement;

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

    fn legal_actions(&self, player: Player) -> Vec<Placement> {
        let board = &self.state.board;
        (0..board.len())
            .filter_map(|i| board.position_of(i))
            .filter(|pos| !self.flips(player, *pos).is_empty())
            .map(Placement)
            .collect()
    }

    fn apply_move(&mut self, player: Player, action: Placement) -> bool {
        let flipped = self.flips(player, action.0);
        if flipped.is_empty() {
            return false;
        }

        let mark = player.mark();
        self.state.board.set(action.0, Some(mark));
        for pos in flipped {
            self.state.board.set(pos, Some(mark));
        }
        self.state.to_move = player.opponent();
        true
    }

    fn is_terminal(&self) -> bool {
        !self.has_legal_action(Player::Home) && !self.has_legal_action(Player::Away)
    }

    fn utility(&self) -> Score {
        self.disc_count(Player::Home) as Score - self.disc_count(Player::Away) as Score
    }

    fn parse_action(token: &str) -> Result<Placement> {
        token.parse()
    }

    fn unattached_token() -> &'static str {
        OTHELLO_UNATTACHED_TOKEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::GameResult;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_initial_position() {
        let game = Othello::new();
        assert_eq!(game.disc_count(Player::Home), 2);
        assert_eq!(game.disc_count(Player::Away), 2);
        assert_eq!(game.to_move(), Player::Home);
        assert_eq!(game.utility(), 0);
        assert!(!game.is_terminal());
    }

    #[test]
    fn test_initial_moves() {
        let game = Othello::new();
        let moves = game.legal_actions(Player::Home);
        assert_eq!(
            moves,
            vec![
                Placement::new(2, 3),
                Placement::new(3, 2),
                Placement::new(4, 5),
                Placement::new(5, 4),
            ]
        );

        let away_moves = game.legal_actions(Player::Away);
        assert_eq!(away_moves.len(), 4);
    }

    #[test]
    fn test_apply_flips() {
        let mut game = Othello::new();
        assert!(game.apply_move(Player::Home, Placement::new(2, 3)));

        // (3,3) 被夹住翻面
        assert_eq!(game.board().get(Position::new(3, 3)), Some(Mark::Home));
        assert_eq!(game.disc_count(Player::Home), 4);
        assert_eq!(game.disc_count(Player::Away), 1);
        assert_eq!(game.to_move(), Player::Away);
        assert_eq!(game.utility(), 3);
    }

    #[test]
    fn test_multi_direction_flip() {
        let mut game = Othello::from_diagram(
            "X.X...../
             .OO...../
             XO.OX.../
             ...X..../
             ......../
             ......../
             ......../
             ........",
            Player::Home,
        )
        .unwrap();

        // (2,2) 同时夹住左 (2,1)、上 (1,2)、右 (2,3)、左上 (1,1)
        assert!(game.apply_move(Player::Home, Placement::new(2, 2)));
        assert_eq!(game.disc_count(Player::Away), 0);
        assert_eq!(game.disc_count(Player::Home), 10);
    }

    #[test]
    fn test_rejects_non_flipping_move() {
        let mut game = Othello::new();
        let before = game.snapshot();
        assert!(!game.apply_move(Player::Home, Placement::new(0, 0)));
        // 已占用
        assert!(!game.apply_move(Player::Home, Placement::new(3, 3)));
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_pass_position() {
        // 主场唯一的棋子在角落旁，无法夹住任何客场棋子；客场可以走 (0,2)
        let game = Othello::from_diagram(
            "OX....../
             ......../
             ......../
             ......../
             ......../
             ......../
             ......../
             ........",
            Player::Home,
        )
        .unwrap();

        assert!(game.legal_actions(Player::Home).is_empty());
        assert_eq!(game.legal_actions(Player::Away), vec![Placement::new(0, 2)]);
        assert!(!game.is_terminal());
    }

    #[test]
    fn test_terminal_when_nobody_can_move() {
        let game = Othello::from_diagram(
            "XXX...../
             ......../
             ......../
             ......../
             ......../
             ......../
             ......../
             .......O",
            Player::Away,
        )
        .unwrap();

        assert!(game.is_terminal());
        assert_eq!(game.utility(), 2);
        assert_eq!(game.outcome(), Some(GameResult::HomeWin));
    }

    #[test]
    fn test_placement_tokens() {
        assert_eq!("2b".parse::<Placement>(), Ok(Placement::new(2, 1)));
        assert_eq!("7H".parse::<Placement>(), Ok(Placement::new(7, 7)));
        assert_eq!(Placement::new(0, 0).to_string(), "0a");
        assert_eq!(Placement::new(5, 4).to_string(), "5e");
        assert!("8a".parse::<Placement>().is_err());
        assert!("2i".parse::<Placement>().is_err());
        assert!("2".parse::<Placement>().is_err());
        assert!("2bb".parse::<Placement>().is_err());
        assert!("b2".parse::<Placement>().is_err());
    }

    #[test]
    fn test_pass_turn() {
        let mut game = Othello::new();
        game.pass_turn();
        assert_eq!(game.to_move(), Player::Away);
        assert_eq!(game.utility(), 0);

        game.pass_turn();
        assert_eq!(game.to_move(), Player::Home);
        assert_eq!(game.board(), Othello::new().board());
    }

    #[test]
    fn test_random_playouts_terminate() {
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut game = Othello::new();
            let mut plies = 0;

            while !game.is_terminal() {
                let player = game.to_move();
                let moves = game.legal_actions(player);
                match moves.choose(&mut rng) {
                    Some(mv) => {
                        let discs = game.board().len() - game.board().empty_count();
                        assert!(game.apply_move(player, *mv));
                        assert_eq!(game.board().len() - game.board().empty_count(), discs + 1);
                    }
                    None => game.pass_turn(),
                }
                plies += 1;
                assert!(plies < 200, "playout did not terminate");
            }

            let total = game.disc_count(Player::Home) + game.disc_count(Player::Away);
            assert!(total <= 64);
            assert!(game.outcome().is_some());
        }
    }
}
