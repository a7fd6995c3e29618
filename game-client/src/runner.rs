//! 对局驱动
//!
//! 持有权威对局实例，轮流向双方选择器要走法，校验后落子，终局后公布结果。

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use game_ai::{AiConfig, Evaluator, MoveSelector, OthelloPositionEvaluator, SessionSummary};
use protocol::{Game, GameError, GameRecord, GameResult, MoveRecord, Othello, Player, TicTacToe};

use crate::settings::{ClientSettings, GameKind};
use crate::storage::RecordStore;

/// 单局结果
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub result: GameResult,
    /// 因走法被拒而判负的一方
    pub forfeited_by: Option<Player>,
    pub record: GameRecord,
}

/// 整个会话的结果
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub home: SessionSummary,
    pub away: SessionSummary,
    /// 已保存的棋谱文件名
    pub saved_records: Vec<String>,
}

fn lock<G>(game: &Mutex<G>) -> Result<MutexGuard<'_, G>> {
    game.lock()
        .map_err(|_| anyhow::anyhow!("对局锁已中毒"))
}

fn player_label(config: &AiConfig) -> String {
    format!("AI {:?} d{}", config.difficulty, config.max_depth())
}

/// 校验并执行一方交来的走法记号
fn submit<G: Game>(live: &mut G, player: Player, token: &str) -> Result<MoveRecord, GameError> {
    if live.to_move() != player {
        return Err(GameError::IllegalMove {
            token: token.to_string(),
            player: player.to_string(),
        });
    }
    live.play_token(token)?;
    Ok(MoveRecord::new(player, token))
}

/// 判负方的对手获胜
fn forfeit_result(player: Player) -> GameResult {
    match player {
        Player::Home => GameResult::AwayWin,
        Player::Away => GameResult::HomeWin,
    }
}

/// 进行一局
pub fn play_match<G, EH, EA>(
    game: G,
    game_name: &str,
    home: &mut MoveSelector<G, EH>,
    away: &mut MoveSelector<G, EA>,
) -> Result<MatchOutcome>
where
    G: Game + Clone,
    EH: Evaluator<G>,
    EA: Evaluator<G>,
{
    let mut record = GameRecord::new(
        game_name,
        player_label(home.config()),
        player_label(away.config()),
        game.snapshot().board.to_diagram(),
    );
    let handle = Arc::new(Mutex::new(game));

    home.attach_game(handle.clone(), Player::Home)
        .context("主场接入对局失败")?;
    away.attach_game(handle.clone(), Player::Away)
        .context("客场接入对局失败")?;

    let mut forfeited_by = None;
    loop {
        let to_move = {
            let mut live = lock(&handle)?;
            if live.is_terminal() {
                break;
            }
            let to_move = live.to_move();
            if live.legal_actions(to_move).is_empty() {
                live.pass_turn();
                record.add_move(MoveRecord::pass(to_move));
                continue;
            }
            to_move
        };

        // 选择器会自己加锁取快照，这里不能持锁
        let token = match to_move {
            Player::Home => home.compute_move(),
            Player::Away => away.compute_move(),
        };

        let submitted = submit(&mut *lock(&handle)?, to_move, &token);
        match submitted {
            Ok(mv) => record.add_move(mv),
            Err(e) => {
                tracing::warn!("{} 的走法被拒绝，判负: {}", to_move, e);
                forfeited_by = Some(to_move);
                break;
            }
        }
    }

    let (result, final_board) = {
        let live = lock(&handle)?;
        let result = match forfeited_by {
            Some(player) => forfeit_result(player),
            None => live.outcome().context("对局未终局")?,
        };
        (result, live.snapshot().board.to_diagram())
    };

    record.set_result(result, final_board);
    home.post_winner(result);
    away.post_winner(result);

    tracing::info!(
        "{} 对局结束: {}, 共 {} 手（停手 {} 次）",
        game_name,
        result,
        record.moves.len(),
        record.pass_count()
    );

    Ok(MatchOutcome {
        result,
        forfeited_by,
        record,
    })
}

/// 按设置进行整个会话
pub fn run_session(settings: &ClientSettings, store: Option<&RecordStore>) -> Result<SessionReport> {
    let home = settings.home.clone();
    let away = settings.away.clone();

    match settings.game {
        GameKind::TicTacToe => run_games(
            settings,
            store,
            TicTacToe::new,
            MoveSelector::new(home),
            MoveSelector::new(away),
        ),
        GameKind::Othello if settings.positional_eval => run_games(
            settings,
            store,
            Othello::new,
            MoveSelector::with_evaluator(home, OthelloPositionEvaluator),
            MoveSelector::with_evaluator(away, OthelloPositionEvaluator),
        ),
        GameKind::Othello => run_games(
            settings,
            store,
            Othello::new,
            MoveSelector::new(home),
            MoveSelector::new(away),
        ),
    }
}

fn run_games<G, EH, EA>(
    settings: &ClientSettings,
    store: Option<&RecordStore>,
    new_game: fn() -> G,
    mut home: MoveSelector<G, EH>,
    mut away: MoveSelector<G, EA>,
) -> Result<SessionReport>
where
    G: Game + Clone,
    EH: Evaluator<G>,
    EA: Evaluator<G>,
{
    let mut saved_records = Vec::new();

    for round in 1..=settings.games {
        tracing::info!(
            "第 {}/{} 局 {}",
            round,
            settings.games,
            settings.game.display_name()
        );
        let outcome = play_match(new_game(), settings.game.name(), &mut home, &mut away)?;
        tracing::debug!("\n{}", outcome.record.to_transcript());

        if let Some(store) = store {
            saved_records.push(store.save(&outcome.record)?);
        }
    }

    Ok(SessionReport {
        home: home.end(),
        away: away.end(),
        saved_records,
    })
}
