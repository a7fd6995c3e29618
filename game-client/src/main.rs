use std::path::Path;

use anyhow::Result;
use game_client::{run_session, ClientSettings, RecordStore};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("game_client=info".parse()?))
        .init();

    let settings = match std::env::args().nth(1) {
        Some(path) => ClientSettings::load_from(Path::new(&path))?,
        None => ClientSettings::load(),
    };

    info!(
        "{} 对局开始: {} 局",
        settings.game.display_name(),
        settings.games
    );

    let store = if settings.save_records {
        Some(match &settings.records_dir {
            Some(dir) => RecordStore::with_dir(dir)?,
            None => RecordStore::new()?,
        })
    } else {
        None
    };

    let report = run_session(&settings, store.as_ref())?;

    info!("主场 {}", report.home);
    info!("客场 {}", report.away);
    if let Some(store) = &store {
        info!(
            "已保存 {} 份棋谱到 {:?}",
            report.saved_records.len(),
            store.records_directory()
        );
    }

    Ok(())
}
