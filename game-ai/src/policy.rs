//! 走法选择器
//!
//! 包装搜索引擎，对外提供「接入对局 / 计算走法 / 公布结果 / 结束」四个操作。
//! 每局开头若干步随机落子，之后交给 Alpha-Beta 搜索。

use std::sync::{Arc, Mutex};

use protocol::{Game, GameResult, Player};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::error::AiError;
use crate::evaluate::{Evaluator, UtilityEvaluator};
use crate::search::{SearchEngine, SearchError};

/// 真实对局的共享句柄
pub type GameHandle<G> = Arc<Mutex<G>>;

/// 选择器所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 未接入对局
    Detached,
    /// 开局随机阶段，还剩 remaining 步
    Opening { remaining: u32 },
    /// 搜索阶段
    Search,
}

/// 会话统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub nodes_searched: u64,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} 局: {} 胜 {} 负 {} 和, 搜索节点 {}",
            self.games, self.wins, self.losses, self.ties, self.nodes_searched
        )
    }
}

/// 当前接入的对局
struct Attachment<G> {
    game: GameHandle<G>,
    player: Player,
    /// 模拟副本，只供搜索使用
    sim: G,
    opening_remaining: u32,
}

/// 走法选择器
pub struct MoveSelector<G, E = UtilityEvaluator> {
    config: AiConfig,
    engine: SearchEngine<E>,
    rng: ChaCha8Rng,
    attachment: Option<Attachment<G>>,
    summary: SessionSummary,
}

impl<G> MoveSelector<G, UtilityEvaluator>
where
    G: Game + Clone,
{
    pub fn new(config: AiConfig) -> Self {
        Self::with_evaluator(config, UtilityEvaluator)
    }
}

impl<G, E> MoveSelector<G, E>
where
    G: Game + Clone,
    E: Evaluator<G>,
{
    /// 使用自定义评估器
    pub fn with_evaluator(config: AiConfig, evaluator: E) -> Self {
        let config = config.validated();
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut engine = SearchEngine::with_evaluator(evaluator);
        engine.set_pruning(config.pruning);

        Self {
            config,
            engine,
            rng,
            attachment: None,
            summary: SessionSummary::default(),
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 接入一局对局，重置开局计数
    pub fn attach_game(&mut self, game: GameHandle<G>, player: Player) -> Result<(), AiError> {
        let sim = {
            let live = game.lock().map_err(|_| AiError::GameUnavailable)?;
            live.clone()
        };

        if let Some(previous) = &self.attachment {
            tracing::warn!("{} 尚未公布结果就接入了新对局", previous.player);
        }

        tracing::info!(
            "接入对局: 执 {}, 开局随机 {} 步, 搜索深度 {}",
            player,
            self.config.opening_moves,
            self.config.max_depth()
        );

        self.attachment = Some(Attachment {
            game,
            player,
            sim,
            opening_remaining: self.config.opening_moves,
        });
        Ok(())
    }

    /// 当前阶段
    pub fn phase(&self) -> Phase {
        match &self.attachment {
            None => Phase::Detached,
            Some(a) if a.opening_remaining > 0 => Phase::Opening {
                remaining: a.opening_remaining,
            },
            Some(_) => Phase::Search,
        }
    }

    /// 本方执哪一方
    pub fn player(&self) -> Option<Player> {
        self.attachment.as_ref().map(|a| a.player)
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// 为本方计算下一步走法
    pub fn try_compute_move(&mut self) -> Result<G::Action, AiError> {
        let attachment = self.attachment.as_mut().ok_or(AiError::NotAttached)?;
        let player = attachment.player;

        // 只在取快照时持锁
        let root = {
            let live = attachment
                .game
                .lock()
                .map_err(|_| AiError::GameUnavailable)?;
            live.snapshot()
        };
        if root.to_move != player {
            tracing::warn!("当前轮到 {}，却为 {} 计算走法", root.to_move, player);
        }

        attachment.sim.restore(player, &root);
        let actions = attachment.sim.legal_actions(player);

        if attachment.opening_remaining > 0 {
            let action = *actions
                .choose(&mut self.rng)
                .ok_or(SearchError::NoLegalActions { player })?;
            attachment.opening_remaining -= 1;
            tracing::info!(
                "{} 开局随机走法: {} (剩余 {} 步)",
                player,
                action,
                attachment.opening_remaining
            );
            return Ok(action);
        }

        let outcome = self.engine.select_best_action(
            &mut attachment.sim,
            &root,
            player,
            self.config.max_depth(),
        )?;
        self.summary.nodes_searched += outcome.nodes;

        let action = outcome
            .action
            .ok_or(SearchError::NoLegalActions { player })?;
        tracing::info!(
            "{} 搜索走法: {}, 分值 {}, 节点 {}, 耗时 {:?}",
            player,
            action,
            outcome.score,
            outcome.nodes,
            outcome.elapsed
        );
        Ok(action)
    }

    /// 计算走法并返回记号
    ///
    /// 出错时返回无害的默认记号，交给服务端处理。
    pub fn compute_move(&mut self) -> String {
        match self.try_compute_move() {
            Ok(action) => action.to_string(),
            Err(AiError::NotAttached) => {
                tracing::error!("未接入对局就请求走法");
                G::unattached_token().to_string()
            }
            Err(e) => {
                tracing::warn!("无法计算走法: {}", e);
                G::unattached_token().to_string()
            }
        }
    }

    /// 公布本局结果并断开
    pub fn post_winner(&mut self, result: GameResult) {
        let Some(attachment) = self.attachment.take() else {
            tracing::warn!("未接入对局时收到结果 {}", result);
            return;
        };

        self.summary.games += 1;
        match result.winner() {
            Some(winner) if winner == attachment.player => self.summary.wins += 1,
            Some(_) => self.summary.losses += 1,
            None => self.summary.ties += 1,
        }

        tracing::info!("对局结束: {} (本方 {})", result, attachment.player);
    }

    /// 结束会话，返回统计
    pub fn end(&mut self) -> SessionSummary {
        if let Some(attachment) = self.attachment.take() {
            tracing::warn!("{} 的对局未公布结果就结束了会话", attachment.player);
        }
        tracing::info!("会话结束: {}", self.summary);
        self.summary.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::{Othello, TicTacToe};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn config(opening_moves: u32, max_depth: u32) -> AiConfig {
        AiConfig::default()
            .with_opening_moves(opening_moves)
            .with_max_depth(max_depth)
            .with_seed(7)
    }

    fn handle<G>(game: G) -> GameHandle<G> {
        Arc::new(Mutex::new(game))
    }

    #[test]
    fn test_unattached_returns_sentinel() {
        init_tracing();
        let mut ttt: MoveSelector<TicTacToe> = MoveSelector::new(AiConfig::default());
        assert_eq!(ttt.phase(), Phase::Detached);
        assert_eq!(ttt.compute_move(), "0");
        assert_eq!(ttt.try_compute_move(), Err(AiError::NotAttached));

        let mut othello: MoveSelector<Othello> = MoveSelector::new(AiConfig::default());
        assert_eq!(othello.compute_move(), "0a");
    }

    /// 客场随便应一步（无处可下则停一手）
    fn away_reply(game: &GameHandle<Othello>) {
        let mut live = game.lock().unwrap();
        match live.legal_actions(Player::Away).first().copied() {
            Some(reply) => assert!(live.apply_move(Player::Away, reply)),
            None => live.pass_turn(),
        }
    }

    #[test]
    fn test_opening_then_search() {
        init_tracing();
        let game = handle(Othello::new());
        let mut selector = MoveSelector::new(config(2, 2));
        selector.attach_game(game.clone(), Player::Home).unwrap();
        assert_eq!(selector.phase(), Phase::Opening { remaining: 2 });
        assert_eq!(selector.player(), Some(Player::Home));

        let token = selector.compute_move();
        game.lock().unwrap().play_token(&token).unwrap();
        assert_eq!(selector.phase(), Phase::Opening { remaining: 1 });
        away_reply(&game);

        let token = selector.compute_move();
        game.lock().unwrap().play_token(&token).unwrap();
        assert_eq!(selector.phase(), Phase::Search);
        assert_eq!(selector.summary().nodes_searched, 0);
        away_reply(&game);

        // 搜索阶段不会再回到开局阶段
        let token = selector.compute_move();
        assert_eq!(selector.phase(), Phase::Search);
        assert!(selector.summary().nodes_searched > 0);
        assert!(game.lock().unwrap().play_token(&token).is_ok());
    }

    #[test]
    fn test_opening_move_is_legal_and_seeded() {
        let play = |seed: u64| {
            let game = handle(Othello::new());
            let mut selector =
                MoveSelector::new(AiConfig::default().with_opening_moves(1).with_seed(seed));
            selector.attach_game(game.clone(), Player::Home).unwrap();
            selector.try_compute_move().unwrap()
        };

        let legal = Othello::new().legal_actions(Player::Home);
        for seed in 0..10 {
            let first = play(seed);
            assert!(legal.contains(&first));
            assert_eq!(play(seed), first);
        }
    }

    #[test]
    fn test_search_finds_win() {
        let game = handle(TicTacToe::from_diagram("X.X/OXO/...", Player::Home).unwrap());
        let mut selector = MoveSelector::new(config(0, 4));
        selector.attach_game(game, Player::Home).unwrap();
        assert_eq!(selector.phase(), Phase::Search);
        assert_eq!(selector.compute_move(), "1");
    }

    #[test]
    fn test_search_from_away_seat() {
        let game = handle(TicTacToe::from_diagram("OO./XX./X..", Player::Away).unwrap());
        let mut selector = MoveSelector::new(config(0, 3));
        selector.attach_game(game, Player::Away).unwrap();
        assert_eq!(selector.compute_move(), "2");
    }

    #[test]
    fn test_no_legal_action_returns_sentinel() {
        init_tracing();
        let othello = Othello::from_diagram(
            "OX....../
             ......../
             ......../
             ......../
             ......../
             ......../
             ......../
             ........",
            Player::Home,
        )
        .unwrap();

        for opening in [0, 2] {
            let mut selector = MoveSelector::new(config(opening, 3));
            selector.attach_game(handle(othello.clone()), Player::Home).unwrap();
            assert_eq!(
                selector.try_compute_move(),
                Err(AiError::Search(SearchError::NoLegalActions {
                    player: Player::Home
                }))
            );
            assert_eq!(selector.compute_move(), "0a");
        }
    }

    #[test]
    fn test_poisoned_game_is_unavailable() {
        init_tracing();
        let game = handle(TicTacToe::new());
        let mut selector = MoveSelector::new(config(0, 2));
        selector.attach_game(game.clone(), Player::Home).unwrap();

        let poisoner = game.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(game.is_poisoned());

        assert_eq!(selector.try_compute_move(), Err(AiError::GameUnavailable));
        assert_eq!(selector.compute_move(), "0");

        let mut other: MoveSelector<TicTacToe> = MoveSelector::new(config(0, 2));
        assert_eq!(
            other.attach_game(game, Player::Away),
            Err(AiError::GameUnavailable)
        );
        assert_eq!(other.phase(), Phase::Detached);
    }

    #[test]
    fn test_post_winner_tallies_and_detaches() {
        let mut selector: MoveSelector<TicTacToe> = MoveSelector::new(config(0, 2));

        let results = [
            (Player::Home, GameResult::HomeWin),
            (Player::Away, GameResult::HomeWin),
            (Player::Away, GameResult::AwayWin),
            (Player::Home, GameResult::Tie),
        ];
        for (player, result) in results {
            selector.attach_game(handle(TicTacToe::new()), player).unwrap();
            selector.post_winner(result);
            assert_eq!(selector.phase(), Phase::Detached);
        }

        // 未接入时的结果不计入
        selector.post_winner(GameResult::AwayWin);

        let summary = selector.end();
        assert_eq!(summary.games, 4);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.ties, 1);
    }

    #[test]
    fn test_end_detaches() {
        let mut selector: MoveSelector<TicTacToe> = MoveSelector::new(config(2, 2));
        selector.attach_game(handle(TicTacToe::new()), Player::Home).unwrap();
        let summary = selector.end();
        assert_eq!(summary, SessionSummary::default());
        assert_eq!(selector.phase(), Phase::Detached);
        assert_eq!(selector.compute_move(), "0");
    }

    #[test]
    fn test_self_play_tictactoe_ties() {
        let game = handle(TicTacToe::new());
        let mut home = MoveSelector::new(config(0, 9));
        let mut away = MoveSelector::new(config(0, 9));
        home.attach_game(game.clone(), Player::Home).unwrap();
        away.attach_game(game.clone(), Player::Away).unwrap();

        loop {
            let (to_move, terminal) = {
                let live = game.lock().unwrap();
                (live.to_move(), live.is_terminal())
            };
            if terminal {
                break;
            }
            let token = match to_move {
                Player::Home => home.compute_move(),
                Player::Away => away.compute_move(),
            };
            game.lock().unwrap().play_token(&token).unwrap();
        }

        let result = game.lock().unwrap().outcome().unwrap();
        assert_eq!(result, GameResult::Tie);
        home.post_winner(result);
        away.post_winner(result);
        assert_eq!(home.end().ties, 1);
        assert_eq!(away.end().ties, 1);
    }
}
