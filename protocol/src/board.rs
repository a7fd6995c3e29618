//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::EMPTY_CHAR;
use crate::error::GameError;
use crate::player::{Mark, Player};

/// 棋盘位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 行（从 0 开始，自上而下）
    pub row: u8,
    /// 列（从 0 开始，自左而右）
    pub col: u8,
}

impl Position {
    /// 创建新位置
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 获取偏移后的位置（越界返回 None）
    pub fn offset(&self, dr: i8, dc: i8, width: usize, height: usize) -> Option<Position> {
        let row = self.row as i16 + dr as i16;
        let col = self.col as i16 + dc as i16;
        if row >= 0 && (row as usize) < height && col >= 0 && (col as usize) < width {
            Some(Position::new(row as u8, col as u8))
        } else {
            None
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 定长方格棋盘
///
/// 格子按行优先存储，索引为 `row * width + col`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<Mark>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// 格子总数
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 检查位置是否在棋盘内
    pub fn contains(&self, pos: Position) -> bool {
        (pos.row as usize) < self.height && (pos.col as usize) < self.width
    }

    /// 转换为数组索引
    pub fn index_of(&self, pos: Position) -> usize {
        pos.row as usize * self.width + pos.col as usize
    }

    /// 从数组索引转换
    pub fn position_of(&self, index: usize) -> Option<Position> {
        if index < self.cells.len() {
            Some(Position::new(
                (index / self.width) as u8,
                (index % self.width) as u8,
            ))
        } else {
            None
        }
    }

    /// 获取指定位置的棋子
    pub fn get(&self, pos: Position) -> Option<Mark> {
        if self.contains(pos) {
            self.cells[self.index_of(pos)]
        } else {
            None
        }
    }

    /// 设置指定位置的棋子
    pub fn set(&mut self, pos: Position, mark: Option<Mark>) {
        if self.contains(pos) {
            let index = self.index_of(pos);
            self.cells[index] = mark;
        }
    }

    /// 按索引读取格子
    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    /// 所有格子（行优先）
    pub fn cells(&self) -> &[Option<Mark>] {
        &self.cells
    }

    /// 统计某方棋子数
    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|c| **c == Some(mark)).count()
    }

    /// 空格数
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// 棋盘是否已下满
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// 解析棋盘文本图
    ///
    /// 每行一个字符串，行之间用 `/` 或换行分隔；`X` 为主场，`O` 为客场，`.` 为空。
    pub fn parse(diagram: &str, width: usize, height: usize) -> Result<Board, GameError> {
        let rows: Vec<&str> = diagram
            .split(|c| c == '/' || c == '\n')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect();

        if rows.len() != height {
            return Err(GameError::InvalidBoard {
                reason: format!("Expected {} rows, got {}", height, rows.len()),
            });
        }

        let mut board = Board::empty(width, height);
        for (row_idx, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != width {
                return Err(GameError::InvalidBoard {
                    reason: format!(
                        "Row {} has {} columns, expected {}",
                        row_idx,
                        chars.len(),
                        width
                    ),
                });
            }
            for (col_idx, c) in chars.into_iter().enumerate() {
                let mark = Mark::parse_cell(c).ok_or_else(|| GameError::InvalidBoard {
                    reason: format!("Invalid cell character: {}", c),
                })?;
                board.set(Position::new(row_idx as u8, col_idx as u8), mark);
            }
        }

        Ok(board)
    }

    /// 生成棋盘文本图（行之间用 `/` 分隔）
    pub fn to_diagram(&self) -> String {
        self.cells
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|c| c.map(|m| m.to_char()).unwrap_or(EMPTY_CHAR))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line: String = row
                .iter()
                .map(|c| c.map(|m| m.to_char()).unwrap_or(EMPTY_CHAR))
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// 完整的棋局快照（棋盘 + 走子方）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    /// 棋盘
    pub board: Board,
    /// 当前走子方
    pub to_move: Player,
}

impl BoardState {
    /// 从棋盘创建状态
    pub fn new(board: Board, to_move: Player) -> Self {
        Self { board, to_move }
    }

    /// 切换走子方
    pub fn switch_turn(&mut self) {
        self.to_move = self.to_move.opponent();
    }
}
