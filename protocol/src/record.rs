//! 对局记录格式
//!
//! 以 JSON 保存一局的双方、初始局面、逐手走法和结果

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::GameResult;
use crate::player::Player;

/// 记录版本
pub const RECORD_VERSION: &str = "1.0";

/// 对局元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    /// 棋类名称（如 "tictactoe"、"othello"）
    pub game: String,
    /// 主场玩家名
    pub home_player: String,
    /// 客场玩家名
    pub away_player: String,
    /// 开始时间
    pub started_at: DateTime<Utc>,
    /// 游戏结果
    pub result: Option<GameResult>,
}

/// 走法记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 走子方
    pub player: Player,
    /// 走法记号；停一手时为 None
    pub token: Option<String>,
}

impl MoveRecord {
    /// 创建落子记录
    pub fn new(player: Player, token: impl Into<String>) -> Self {
        Self {
            player,
            token: Some(token.into()),
        }
    }

    /// 创建停一手记录
    pub fn pass(player: Player) -> Self {
        Self {
            player,
            token: None,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.token.is_none()
    }
}

/// 完整的对局记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// 版本号
    pub version: String,
    /// 元数据
    pub metadata: GameMetadata,
    /// 初始局面文本图
    pub initial_board: String,
    /// 走法列表
    pub moves: Vec<MoveRecord>,
    /// 终局文本图
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_board: Option<String>,
}

impl GameRecord {
    /// 创建新的对局记录
    pub fn new(game: &str, home_player: String, away_player: String, initial_board: String) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            metadata: GameMetadata {
                game: game.to_string(),
                home_player,
                away_player,
                started_at: Utc::now(),
                result: None,
            },
            initial_board,
            moves: Vec::new(),
            final_board: None,
        }
    }

    /// 添加走法
    pub fn add_move(&mut self, mv: MoveRecord) {
        self.moves.push(mv);
    }

    /// 设置游戏结果
    pub fn set_result(&mut self, result: GameResult, final_board: String) {
        self.metadata.result = Some(result);
        self.final_board = Some(final_board);
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 停手次数
    pub fn pass_count(&self) -> usize {
        self.moves.iter().filter(|mv| mv.is_pass()).count()
    }

    /// 生成便于阅读的走法文本
    pub fn to_transcript(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}: {} (Home) vs {} (Away)\n",
            self.metadata.game, self.metadata.home_player, self.metadata.away_player
        ));

        for (i, mv) in self.moves.iter().enumerate() {
            let token = mv.token.as_deref().unwrap_or("pass");
            output.push_str(&format!("{:>3}. {} {}\n", i + 1, mv.player, token));
        }

        if let Some(result) = self.metadata.result {
            output.push_str(&format!("Result: {}\n", result));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> GameRecord {
        let mut record = GameRecord::new(
            "tictactoe",
            "minimax-hard".to_string(),
            "random".to_string(),
            ".../.../...".to_string(),
        );
        record.add_move(MoveRecord::new(Player::Home, "4"));
        record.add_move(MoveRecord::new(Player::Away, "0"));
        record.add_move(MoveRecord::pass(Player::Home));
        record
    }

    #[test]
    fn test_game_record_json() {
        let mut record = sample_record();
        record.set_result(GameResult::HomeWin, "OX./.X./.X.".to_string());

        let json = record.to_json().unwrap();
        let parsed = GameRecord::from_json(&json).unwrap();

        assert_eq!(parsed.version, RECORD_VERSION);
        assert_eq!(parsed.metadata.home_player, "minimax-hard");
        assert_eq!(parsed.metadata.result, Some(GameResult::HomeWin));
        assert_eq!(parsed.moves, record.moves);
        assert_eq!(parsed.final_board.as_deref(), Some("OX./.X./.X."));
    }

    #[test]
    fn test_unfinished_record_omits_final_board() {
        let json = sample_record().to_json().unwrap();
        assert!(!json.contains("final_board"));
    }

    #[test]
    fn test_transcript() {
        let mut record = sample_record();
        record.set_result(GameResult::Tie, "XOX/XOO/OXX".to_string());

        let transcript = record.to_transcript();
        assert!(transcript.contains("1. Home 4"));
        assert!(transcript.contains("2. Away 0"));
        assert!(transcript.contains("3. Home pass"));
        assert!(transcript.contains("Result: Tie"));
    }

    #[test]
    fn test_pass_count() {
        let mut record = sample_record();
        assert_eq!(record.pass_count(), 1);
        assert!(record.moves[2].is_pass());
        assert!(!record.moves[0].is_pass());

        record.add_move(MoveRecord::new(Player::Away, "8"));
        record.add_move(MoveRecord::pass(Player::Home));
        assert_eq!(record.pass_count(), 2);
    }
}
