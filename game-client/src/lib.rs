//! 棋类 AI 对局客户端
//!
//! 两个走法选择器在本地权威对局上对弈，并可保存棋谱

pub mod runner;
pub mod settings;
pub mod storage;

pub use runner::{play_match, run_session, MatchOutcome, SessionReport};
pub use settings::{ClientSettings, GameKind};
pub use storage::{RecordStore, SavedRecordInfo};
