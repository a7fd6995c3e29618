//! 错误类型定义

use thiserror::Error;

pub use crate::search::SearchError;

/// 走法选择器错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    /// 尚未接入对局
    #[error("No game attached")]
    NotAttached,

    /// 对局锁已中毒，无法读取
    #[error("Attached game is unavailable (lock poisoned)")]
    GameUnavailable,

    /// 搜索失败
    #[error("Search failed: {0}")]
    Search(#[from] SearchError),
}
