//! AI 配置

use protocol::{Difficulty, DEFAULT_OPENING_MOVES};
use serde::{Deserialize, Serialize};

/// AI 配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// 显式指定的搜索深度；未指定时取难度对应的深度
    #[serde(skip_serializing_if = "Option::is_none")]
    max_depth: Option<u32>,
    /// 开局阶段随机走棋的步数
    pub opening_moves: u32,
    /// 是否启用 Alpha-Beta 剪枝
    pub pruning: bool,
    /// 随机数种子（None 时使用系统熵）
    pub seed: Option<u64>,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            max_depth: None,
            opening_moves: DEFAULT_OPENING_MOVES,
            pruning: true,
            seed: None,
        }
    }

    /// 搜索深度上限
    pub fn max_depth(&self) -> u32 {
        self.max_depth.unwrap_or_else(|| self.difficulty.max_depth())
    }

    /// 指定随机数种子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 指定开局随机步数
    pub fn with_opening_moves(mut self, opening_moves: u32) -> Self {
        self.opening_moves = opening_moves;
        self
    }

    /// 指定搜索深度
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// 修正非法取值：深度为 0 时无法给出走法，提升为 1
    pub fn validated(mut self) -> Self {
        if self.max_depth == Some(0) {
            tracing::warn!("max_depth 不能为 0，已调整为 1");
            self.max_depth = Some(1);
        }
        self
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Hard)
    }
}
