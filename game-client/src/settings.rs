//! 客户端设置
//!
//! 对局类型、局数、双方 AI 配置和棋谱保存选项，以 JSON 持久化

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use game_ai::AiConfig;
use protocol::Difficulty;
use serde::{Deserialize, Serialize};

/// 棋类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    #[default]
    TicTacToe,
    Othello,
}

impl GameKind {
    /// 记录中使用的名称
    pub fn name(&self) -> &'static str {
        match self {
            GameKind::TicTacToe => "tictactoe",
            GameKind::Othello => "othello",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GameKind::TicTacToe => "井字棋",
            GameKind::Othello => "黑白棋",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    // === 对局设置 ===
    pub game: GameKind,
    pub games: u32,
    /// 黑白棋在深度截断时改用位置表评估
    pub positional_eval: bool,

    // === AI 设置 ===
    pub home: AiConfig,
    pub away: AiConfig,

    // === 棋谱 ===
    pub save_records: bool,
    /// 为 None 时使用系统数据目录
    pub records_dir: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            game: GameKind::default(),
            games: 1,
            positional_eval: false,

            home: AiConfig::default(),
            away: AiConfig::from_difficulty(Difficulty::Medium),

            save_records: false,
            records_dir: None,
        }
    }
}

impl ClientSettings {
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("board-game-ai");
            path.push("settings.json");
            path
        })
    }

    /// 从默认位置加载，失败时使用默认设置
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            tracing::warn!("无法获取配置目录，使用默认设置");
            return Self::default();
        };

        if !path.exists() {
            tracing::info!("设置文件不存在，使用默认设置");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("{:#}，使用默认设置", e);
                Self::default()
            }
        }
    }

    /// 从指定文件加载
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取设置文件: {:?}", path))?;
        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("设置文件格式无效: {:?}", path))?;
        tracing::info!("已加载设置: {:?}", path);
        Ok(settings)
    }

    /// 保存到默认位置
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path().context("无法获取配置目录")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("序列化设置失败")?;
        std::fs::write(path, content)
            .with_context(|| format!("写入设置文件失败: {:?}", path))?;

        tracing::info!("设置已保存: {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ClientSettings::default();
        assert_eq!(settings.game, GameKind::TicTacToe);
        assert_eq!(settings.games, 1);
        assert_eq!(settings.home.max_depth(), 7);
        assert_eq!(settings.away.max_depth(), 4);
        assert!(!settings.save_records);
    }

    #[test]
    fn test_partial_json() {
        let settings: ClientSettings = serde_json::from_str(
            r#"{ "game": "othello", "games": 3, "home": { "max_depth": 5 }, "away": { "difficulty": "Easy" } }"#,
        )
        .unwrap();
        assert_eq!(settings.game, GameKind::Othello);
        assert_eq!(settings.games, 3);
        assert_eq!(settings.away.difficulty, Difficulty::Easy);
        assert_eq!(settings.away.max_depth(), 2);
        assert_eq!(settings.away.opening_moves, 2);
        assert_eq!(settings.home.difficulty, Difficulty::Hard);
        assert_eq!(settings.home.max_depth(), 5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = ClientSettings {
            game: GameKind::Othello,
            games: 5,
            records_dir: Some(dir.path().join("records")),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();

        let loaded = ClientSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(ClientSettings::load_from(&path).is_err());
        assert!(ClientSettings::load_from(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_game_kind_names() {
        assert_eq!(GameKind::TicTacToe.name(), "tictactoe");
        assert_eq!(
            serde_json::to_string(&GameKind::Othello).unwrap(),
            "\"othello\""
        );
    }
}
