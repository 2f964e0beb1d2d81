// 同梱レベルを解く CLI ランナー

use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::unbounded;

use higgs_solver::{levels, solve, Message, Outcome, Particle, Solution, SolverConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = parse_args()?;
    let board = levels::electron_ring().context("同梱レベルの構築に失敗")?;
    let width = board.width();

    let (tx, rx) = unbounded::<Message>();
    let solver_config = config.clone();
    let handle = thread::spawn(move || solve(board, &solver_config, Some(&tx)));

    // 探索スレッドからの進捗を逐次表示する
    for msg in rx.iter() {
        match msg {
            Message::Log(line) => println!("{line}"),
            Message::Progress(stats) => println!(
                "深さ {:>2}: フロンティア {:>8} / 既訪問 {:>8} / 展開 {:>8}",
                stats.depth, stats.frontier, stats.visited, stats.expanded
            ),
            Message::Finished => break,
        }
    }

    let outcome = handle
        .join()
        .map_err(|_| anyhow::anyhow!("探索スレッドが異常終了しました"))?
        .context("探索に失敗")?;

    match outcome {
        Outcome::Solved(solution) => print_solution(&solution, width),
        Outcome::NoSolutionWithinBound => {
            println!("{} 手以内に解は見つかりませんでした", config.max_depth)
        }
        Outcome::Exhausted => println!("全状態を調べましたが解は存在しません"),
    }
    Ok(())
}

/// 引数: [最大手数] [ワーカー数]
fn parse_args() -> Result<SolverConfig> {
    let mut config = SolverConfig::default();
    let mut args = std::env::args().skip(1);
    if let Some(depth) = args.next() {
        config.max_depth = depth
            .parse()
            .with_context(|| format!("最大手数が不正です: {depth}"))?;
    }
    if let Some(workers) = args.next() {
        config.workers = workers
            .parse()
            .with_context(|| format!("ワーカー数が不正です: {workers}"))?;
    }
    Ok(config)
}

fn print_solution(solution: &Solution, width: usize) {
    println!("解: {} 手", solution.depth());
    for (i, delta) in solution.moves.iter().enumerate() {
        println!(
            "手 {:>2}: {} <- {}",
            i + 1,
            cells(&delta.appeared, width),
            cells(&delta.vanished, width)
        );
    }
}

fn cells(particles: &[Particle], width: usize) -> String {
    if particles.is_empty() {
        return "(なし)".into();
    }
    particles
        .iter()
        .map(|p| format!("({}, {})", p.position % width, p.position / width))
        .collect::<Vec<_>>()
        .join(" ")
}
