//! 回合制棋类 AI 引擎
//!
//! 包含:
//! - 局面评估函数
//! - 带深度限制的 Minimax + Alpha-Beta 搜索
//! - 开局随机 + 搜索的走法选择器

mod config;
mod error;
mod evaluate;
mod policy;
mod search;

pub use config::AiConfig;
pub use error::{AiError, SearchError};
pub use evaluate::{Evaluator, OthelloPositionEvaluator, UtilityEvaluator};
pub use policy::{GameHandle, MoveSelector, Phase, SessionSummary};
pub use search::{SearchEngine, SearchLimits, SearchOutcome};
