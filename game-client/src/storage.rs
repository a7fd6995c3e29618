//! 棋谱存储
//!
//! 每局一个 JSON 文件，默认放在系统数据目录下

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use protocol::{GameRecord, GameResult};

/// 棋谱存储
pub struct RecordStore {
    records_dir: PathBuf,
}

impl RecordStore {
    /// 使用系统数据目录
    pub fn new() -> Result<Self> {
        Self::with_dir(get_records_directory()?)
    }

    /// 使用指定目录（不存在时创建）
    pub fn with_dir(records_dir: impl Into<PathBuf>) -> Result<Self> {
        let records_dir = records_dir.into();

        if !records_dir.exists() {
            fs::create_dir_all(&records_dir)
                .with_context(|| format!("无法创建存储目录: {:?}", records_dir))?;
        }

        Ok(Self { records_dir })
    }

    /// 保存棋谱，返回文件名
    pub fn save(&self, record: &GameRecord) -> Result<String> {
        let base = generate_filename(
            &record.metadata.started_at,
            &record.metadata.game,
            &record.metadata.home_player,
            &record.metadata.away_player,
        );

        // 同一秒内的多局依次加序号
        let mut filename = format!("{}.json", base);
        let mut n = 1;
        while self.records_dir.join(&filename).exists() {
            n += 1;
            filename = format!("{}_{}.json", base, n);
        }
        let filepath = self.records_dir.join(&filename);

        let json_content = record.to_json().context("序列化棋谱失败")?;
        fs::write(&filepath, json_content)
            .with_context(|| format!("写入文件失败: {:?}", filepath))?;

        tracing::info!("棋谱已保存: {}", filename);
        Ok(filename)
    }

    /// 加载棋谱
    pub fn load(&self, record_id: &str) -> Result<GameRecord> {
        let filepath = self.record_path(record_id)?;

        if !filepath.exists() {
            anyhow::bail!("棋谱文件不存在: {}", record_id);
        }

        let content = fs::read_to_string(&filepath)
            .with_context(|| format!("读取文件失败: {:?}", filepath))?;

        GameRecord::from_json(&content).context("解析棋谱文件失败")
    }

    /// 列出所有棋谱，按开始时间倒序
    pub fn list(&self) -> Result<Vec<SavedRecordInfo>> {
        let mut records = Vec::new();

        let entries = fs::read_dir(&self.records_dir)
            .with_context(|| format!("读取存储目录失败: {:?}", self.records_dir))?;

        for entry in entries {
            let entry = entry.context("读取目录项失败")?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            match self.load(filename) {
                Ok(record) => {
                    let passes = record.pass_count();
                    records.push(SavedRecordInfo {
                        record_id: filename.to_string(),
                        game: record.metadata.game,
                        home_player: record.metadata.home_player,
                        away_player: record.metadata.away_player,
                        started_at: record.metadata.started_at,
                        move_count: record.moves.len(),
                        passes,
                        result: record.metadata.result,
                    })
                }
                Err(e) => {
                    tracing::warn!("跳过损坏的棋谱文件 {}: {}", filename, e);
                }
            }
        }

        records.sort_by(|a, b| {
            b.started_at
                .cmp(&a.started_at)
                .then_with(|| b.record_id.cmp(&a.record_id))
        });
        Ok(records)
    }

    /// 删除棋谱
    pub fn delete(&self, record_id: &str) -> Result<()> {
        let filepath = self.record_path(record_id)?;

        if filepath.exists() {
            fs::remove_file(&filepath).with_context(|| format!("删除文件失败: {:?}", filepath))?;
            tracing::info!("棋谱已删除: {}", record_id);
        }

        Ok(())
    }

    pub fn records_directory(&self) -> &Path {
        &self.records_dir
    }

    /// 棋谱 ID 只能是存储目录下的文件名
    fn record_path(&self, record_id: &str) -> Result<PathBuf> {
        let plain = !record_id.is_empty()
            && !record_id.contains(['/', '\\'])
            && !record_id.contains("..")
            && Path::new(record_id).file_name() == Some(OsStr::new(record_id));
        if !plain {
            anyhow::bail!("无效的棋谱 ID: {:?}", record_id);
        }
        Ok(self.records_dir.join(record_id))
    }
}

/// 已保存棋谱的摘要
#[derive(Debug, Clone)]
pub struct SavedRecordInfo {
    /// 文件名
    pub record_id: String,
    pub game: String,
    pub home_player: String,
    pub away_player: String,
    pub started_at: DateTime<Utc>,
    pub move_count: usize,
    /// 其中停手的次数
    pub passes: usize,
    pub result: Option<GameResult>,
}

impl SavedRecordInfo {
    pub fn formatted_time(&self) -> String {
        self.started_at.format("%Y-%m-%d %H:%M").to_string()
    }

    pub fn display_name(&self) -> String {
        format!(
            "{}: {} vs {}",
            self.game, self.home_player, self.away_player
        )
    }
}

/// 获取跨平台存储目录
fn get_records_directory() -> Result<PathBuf> {
    let app_data_dir = dirs::data_dir().context("无法获取应用数据目录")?;

    Ok(app_data_dir.join("board-game-ai").join("records"))
}

fn generate_filename(timestamp: &DateTime<Utc>, game: &str, home: &str, away: &str) -> String {
    let timestamp_str = timestamp.format("%Y%m%d_%H%M%S").to_string();

    format!(
        "{}_{}_{}vs{}",
        timestamp_str,
        sanitize_filename(game),
        sanitize_filename(home),
        sanitize_filename(away)
    )
}

/// 清理文件名中的特殊字符
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}
