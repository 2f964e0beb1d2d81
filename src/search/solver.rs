// 幅優先探索制御

use std::sync::Arc;

use crossbeam_channel::Sender;
use log::{debug, info};
use rayon::prelude::*;

use crate::error::SearchError;
use crate::model::Particle;
use crate::search::board::{board_set, Board, BoardSet};
use crate::search::moves::move_all;

/// 探索パラメータ
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// 探索する最大手数
    pub max_depth: u32,
    /// ワーカースレッド数
    pub workers: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_depth: 10,
            workers: num_cpus::get(),
        }
    }
}

impl SolverConfig {
    pub fn new(max_depth: u32) -> Self {
        SolverConfig {
            max_depth,
            ..SolverConfig::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
}

/// 深さ1段ごとの統計
#[derive(Clone, Copy, Debug)]
pub struct DepthStats {
    pub depth: u32,
    /// 次フロンティアの盤面数（重複排除後）
    pub frontier: usize,
    /// 既訪問集合の大きさ
    pub visited: usize,
    /// 重複排除前の後続盤面総数
    pub expanded: usize,
}

/// 進捗チャネルへ流すメッセージ
#[derive(Clone, Debug)]
pub enum Message {
    Log(String),
    Progress(DepthStats),
    Finished,
}

/// 1手分の差分（経路表示用）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveDelta {
    /// この手で現れた粒子
    pub appeared: Vec<Particle>,
    /// この手で消えた粒子
    pub vanished: Vec<Particle>,
}

/// 解（勝利盤面と初期盤面からの手順）
#[derive(Clone, Debug)]
pub struct Solution {
    pub board: Arc<Board>,
    /// 初期盤面から勝利盤面までの差分列（時系列順）
    pub moves: Vec<MoveDelta>,
}

impl Solution {
    pub fn depth(&self) -> usize {
        self.moves.len()
    }
}

/// 探索結果
#[derive(Clone, Debug)]
pub enum Outcome {
    Solved(Solution),
    /// 深さ上限内に解なし（上限を超えれば存在する可能性はある）
    NoSolutionWithinBound,
    /// 状態空間を出し尽くした（解は存在しない）
    Exhausted,
}

/// 幅優先で勝利盤面を探索する
///
/// 深さ1段を1バリアとし、フロンティアの展開のみを rayon で並列化する。
/// 集合の更新は制御スレッドが単独で行うため、共有可変状態は持たない。
/// ワーカーのエラーはその段の結果ごと破棄して呼び出し元へ返す。
pub fn solve(
    initial: Board,
    config: &SolverConfig,
    progress: Option<&Sender<Message>>,
) -> Result<Outcome, SearchError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers.max(1))
        .build()?;

    let initial = Arc::new(initial);
    info!(
        "探索開始: {}x{} 盤面 / 粒子 {} / 最大 {} 手 / ワーカー {}",
        initial.width(),
        initial.height(),
        initial.particles().len(),
        config.max_depth,
        config.workers
    );

    send(
        progress,
        Message::Log(format!(
            "探索開始: 粒子 {} / 最大 {} 手",
            initial.particles().len(),
            config.max_depth
        )),
    );

    // 初期盤面が既に勝利していれば空手順
    if initial.win() {
        send(progress, Message::Finished);
        return Ok(Outcome::Solved(reconstruct(&initial)));
    }

    let mut visited = board_set();
    visited.insert(initial.clone());
    let mut frontier: Vec<Arc<Board>> = vec![initial];

    for depth in 1..=config.max_depth {
        // ===== 展開（並列） =====
        let expansions: Vec<BoardSet> = pool.install(|| {
            frontier
                .par_iter()
                .map(move_all)
                .collect::<Result<_, SearchError>>()
        })?;

        // ===== 集約（制御スレッド） =====
        let mut expanded = 0usize;
        let mut next = board_set();
        for set in expansions {
            expanded += set.len();
            for board in set {
                if !visited.contains(&board) {
                    // 同一盤面は最初に到達した経路が勝つ
                    next.insert(board);
                }
            }
        }

        debug!(
            "深さ {}: 展開 {} / 新規 {} / 既訪問 {}",
            depth,
            expanded,
            next.len(),
            visited.len()
        );
        send(
            progress,
            Message::Progress(DepthStats {
                depth,
                frontier: next.len(),
                visited: visited.len(),
                expanded,
            }),
        );

        if let Some(win) = next.iter().find(|b| b.win()) {
            info!("解を発見: {} 手", depth);
            let solution = reconstruct(win);
            send(progress, Message::Finished);
            return Ok(Outcome::Solved(solution));
        }

        if next.is_empty() {
            info!("深さ {} で状態空間を出し尽くした", depth);
            send(progress, Message::Finished);
            return Ok(Outcome::Exhausted);
        }

        visited.extend(next.iter().cloned());
        frontier = next.into_iter().collect();
    }

    info!("{} 手以内に解なし", config.max_depth);
    send(progress, Message::Finished);
    Ok(Outcome::NoSolutionWithinBound)
}

fn send(progress: Option<&Sender<Message>>, msg: Message) {
    if let Some(tx) = progress {
        // 受信側が先に閉じても探索は続行する
        let _ = tx.send(msg);
    }
}

/// 勝利盤面から derive 連鎖を遡り、時系列順の手順を組み立てる
fn reconstruct(win: &Arc<Board>) -> Solution {
    let mut moves = Vec::new();
    let mut cur = win.clone();
    while let Some(parent) = cur.prev().cloned() {
        moves.push(delta(&parent, &cur));
        cur = parent;
    }
    moves.reverse();
    Solution {
        board: win.clone(),
        moves,
    }
}

fn delta(parent: &Board, child: &Board) -> MoveDelta {
    let appeared = child
        .particles()
        .difference(parent.particles())
        .copied()
        .collect();
    let vanished = parent
        .particles()
        .difference(child.particles())
        .copied()
        .collect();
    MoveDelta { appeared, vanished }
}
