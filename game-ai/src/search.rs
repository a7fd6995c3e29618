//! 搜索引擎
//!
//! 实现带深度限制的 Minimax + Alpha-Beta 剪枝
//!
//! 树内所有分值都是主场视角（主场减客场）：主场节点取最大，客场节点取最小。
//! 只有根节点在比较候选走法时才按根走子方换算一次方向。
//!
//! 搜索在调用方提供的模拟副本上进行。每个节点持有自己局面的快照，
//! 展开每个子节点之前都先把模拟副本恢复到该快照，兄弟分支之间互不可见。

use std::time::{Duration, Instant};

use protocol::{BoardState, Game, Player, Score};
use thiserror::Error;

use crate::evaluate::{Evaluator, UtilityEvaluator};

/// 搜索错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// 根节点走子方无合法走法
    #[error("{player} has no legal action at the root")]
    NoLegalActions { player: Player },
}

/// 搜索限制
///
/// 「无剪枝 / 仅剪枝 / 仅限深 / 剪枝 + 限深」四种搜索都是它的特例：
/// `max_depth = None` 表示不限深度，`pruning = false` 表示窗口恒为 (-∞, +∞)。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: Option<u32>,
    pub pruning: bool,
}

impl SearchLimits {
    /// 剪枝 + 限深
    pub fn depth(max_depth: u32) -> Self {
        Self {
            max_depth: Some(max_depth),
            pruning: true,
        }
    }

    /// 不剪枝、不限深的完整 Minimax
    pub fn exhaustive() -> Self {
        Self {
            max_depth: None,
            pruning: false,
        }
    }

    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn unlimited_depth(mut self) -> Self {
        self.max_depth = None;
        self
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(protocol::DEFAULT_MAX_DEPTH)
    }
}

/// Alpha-Beta 窗口（主场视角）
#[derive(Debug, Clone, Copy)]
struct Window {
    alpha: Score,
    beta: Score,
}

impl Window {
    const FULL: Window = Window {
        alpha: Score::MIN,
        beta: Score::MAX,
    };
}

/// 剩余深度；None 表示不限
type Depth = Option<u32>;

fn exhausted(depth: Depth) -> bool {
    depth == Some(0)
}

fn deeper(depth: Depth) -> Depth {
    depth.map(|d| d.saturating_sub(1))
}

/// 搜索结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<A> {
    /// 最佳走法；深度为 0 时不展开任何走法，为 None
    pub action: Option<A>,
    /// 根走子方视角的分值（正值对请求方有利）
    pub score: Score,
    /// 主场视角的分值
    pub value: Score,
    /// 访问的节点数
    pub nodes: u64,
    /// 剪枝次数
    pub cutoffs: u64,
    /// 耗时
    pub elapsed: Duration,
}

/// 搜索引擎
pub struct SearchEngine<E = UtilityEvaluator> {
    evaluator: E,
    pruning: bool,
    nodes_searched: u64,
    cutoffs: u64,
}

impl SearchEngine<UtilityEvaluator> {
    /// 创建启用剪枝、以终局估值截断的搜索引擎
    pub fn new() -> Self {
        Self::with_evaluator(UtilityEvaluator)
    }
}

impl Default for SearchEngine<UtilityEvaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SearchEngine<E> {
    /// 使用自定义评估器
    pub fn with_evaluator(evaluator: E) -> Self {
        Self {
            evaluator,
            pruning: true,
            nodes_searched: 0,
            cutoffs: 0,
        }
    }

    /// 开关 Alpha-Beta 剪枝
    pub fn set_pruning(&mut self, pruning: bool) {
        self.pruning = pruning;
    }

    /// 获取上一次搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 获取上一次搜索的剪枝次数
    pub fn cutoffs(&self) -> u64 {
        self.cutoffs
    }

    /// 搜索最佳走法
    ///
    /// `sim` 是模拟副本，搜索过程中会被反复改写；`root` 是真实对局的快照。
    pub fn select_best_action<G>(
        &mut self,
        sim: &mut G,
        root: &BoardState,
        player: Player,
        max_depth: u32,
    ) -> Result<SearchOutcome<G::Action>, SearchError>
    where
        G: Game,
        E: Evaluator<G>,
    {
        self.search(sim, root, player, Some(max_depth))
    }

    /// 按给定限制搜索（只影响本次搜索）
    pub fn search_with_limits<G>(
        &mut self,
        sim: &mut G,
        root: &BoardState,
        player: Player,
        limits: SearchLimits,
    ) -> Result<SearchOutcome<G::Action>, SearchError>
    where
        G: Game,
        E: Evaluator<G>,
    {
        let previous = std::mem::replace(&mut self.pruning, limits.pruning);
        let outcome = self.search(sim, root, player, limits.max_depth);
        self.pruning = previous;
        outcome
    }

    /// 计算局面的主场视角分值，不挑选走法
    pub fn evaluate_position<G>(
        &mut self,
        sim: &mut G,
        state: &BoardState,
        to_move: Player,
        depth: Option<u32>,
    ) -> Score
    where
        G: Game,
        E: Evaluator<G>,
    {
        self.nodes_searched = 0;
        self.cutoffs = 0;
        self.value(sim, state, to_move, depth, Window::FULL, false)
    }

    fn search<G>(
        &mut self,
        sim: &mut G,
        root: &BoardState,
        player: Player,
        depth: Depth,
    ) -> Result<SearchOutcome<G::Action>, SearchError>
    where
        G: Game,
        E: Evaluator<G>,
    {
        self.nodes_searched = 1;
        self.cutoffs = 0;
        let started = Instant::now();

        sim.restore(player, root);

        // 深度为 0：直接评估根局面，不展开
        if exhausted(depth) || sim.is_terminal() {
            let value = self.leaf_value(sim);
            return Ok(SearchOutcome {
                action: None,
                score: player.orient(value),
                value,
                nodes: self.nodes_searched,
                cutoffs: 0,
                elapsed: started.elapsed(),
            });
        }

        let actions = sim.legal_actions(player);
        if actions.is_empty() {
            return Err(SearchError::NoLegalActions { player });
        }

        let mut window = Window::FULL;
        let mut best: Option<(G::Action, Score, Score)> = None;

        for action in actions {
            sim.restore(player, root);
            apply_checked(sim, player, action);
            let child = sim.snapshot();

            let value = self.value(sim, &child, player.opponent(), deeper(depth), window, false);
            let score = player.orient(value);

            // 严格大于才替换：同分时保留先出现的走法
            if best.map_or(true, |(_, best_score, _)| score > best_score) {
                best = Some((action, score, value));
            }

            // 根节点只收紧本方一侧的界，从不在兄弟之间截断
            if self.pruning {
                match player {
                    Player::Home => window.alpha = window.alpha.max(value),
                    Player::Away => window.beta = window.beta.min(value),
                }
            }
        }

        let (action, score, value) = best.ok_or(SearchError::NoLegalActions { player })?;
        let outcome = SearchOutcome {
            action: Some(action),
            score,
            value,
            nodes: self.nodes_searched,
            cutoffs: self.cutoffs,
            elapsed: started.elapsed(),
        };

        tracing::debug!(
            "搜索完成: player={}, depth={:?}, best={}, score={}, nodes={}, cutoffs={}, 耗时 {:?}",
            player,
            depth,
            action,
            score,
            outcome.nodes,
            outcome.cutoffs,
            outcome.elapsed
        );

        Ok(outcome)
    }

    /// 递归求值：主场节点取最大，客场节点取最小
    ///
    /// `passed` 表示上一层是停一手。
    fn value<G>(
        &mut self,
        sim: &mut G,
        state: &BoardState,
        to_move: Player,
        depth: Depth,
        mut window: Window,
        passed: bool,
    ) -> Score
    where
        G: Game,
        E: Evaluator<G>,
    {
        self.nodes_searched += 1;
        sim.restore(to_move, state);

        if sim.is_terminal() || exhausted(depth) {
            return self.leaf_value(sim);
        }

        let actions = sim.legal_actions(to_move);
        if actions.is_empty() {
            // 双方都无处可下却不是终局，说明终局判定与走法生成不一致
            assert!(
                !passed,
                "neither side can move in a non-terminal position:\n{}",
                state.board
            );
            return self.value(sim, state, to_move.opponent(), deeper(depth), window, true);
        }

        let maximizing = to_move == Player::Home;
        let mut best = if maximizing { Score::MIN } else { Score::MAX };

        for action in actions {
            sim.restore(to_move, state);
            apply_checked(sim, to_move, action);
            let child = sim.snapshot();

            let value = self.value(sim, &child, to_move.opponent(), deeper(depth), window, false);

            if maximizing {
                if value > best {
                    best = value;
                    if self.pruning {
                        if best >= window.beta {
                            self.cutoffs += 1;
                            return best; // Beta 剪枝
                        }
                        if best > window.alpha {
                            window.alpha = best;
                        }
                    }
                }
            } else if value < best {
                best = value;
                if self.pruning {
                    if best <= window.alpha {
                        self.cutoffs += 1;
                        return best; // Alpha 剪枝
                    }
                    if best < window.beta {
                        window.beta = best;
                    }
                }
            }
        }

        best
    }

    /// 叶子估值：终局用终局估值，深度截断用评估器
    fn leaf_value<G>(&self, sim: &G) -> Score
    where
        G: Game,
        E: Evaluator<G>,
    {
        if sim.is_terminal() {
            sim.utility()
        } else {
            self.evaluator.evaluate(sim)
        }
    }
}

/// 在模拟副本上执行由走法生成器给出的走法；被拒绝说明规则实现自相矛盾
fn apply_checked<G: Game>(sim: &mut G, player: Player, action: G::Action) {
    let applied = sim.apply_move(player, action);
    assert!(
        applied,
        "simulation rejected {} for {} although it was generated as legal",
        action, player
    );
}
