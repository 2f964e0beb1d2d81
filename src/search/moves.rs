// 移動エンジン：電気プレフィルタとレイ歩進

use std::sync::Arc;

use log::trace;

use crate::error::SearchError;
use crate::model::{Charge, Particle, ParticleKind};
use crate::search::board::{board_set, Board, BoardSet};
use crate::search::rays::Direction;

/// レイ走査で見つかった最寄り電荷の極性
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Polarity {
    Clear,
    Attract,
    Repel,
}

/// 軸プレフィルタの結果（方向ごとの通過可否と電気的係合）
#[derive(Clone, Copy)]
struct AxisGate {
    allowed: [bool; 4],
    engaged: [bool; 4],
}

/// 歩進ループの後退規則用の小さな不変レコード
#[derive(Clone, Copy)]
struct PathState {
    last_good: usize,
    steps: u32,
}

/// レイに沿って最寄りの荷電粒子を探し、極性を返す
///
/// 中性の占有マスは素通しで走査を続ける。符号が逆なら引力、同符号なら
/// 斥力。
fn scan_charge(board: &Board, ray: &[usize], charge: Charge) -> Polarity {
    for &cell in ray {
        let Some(other) = board.occupant(cell) else {
            continue;
        };
        match other.charge.value() * charge.value() {
            -1 => return Polarity::Attract,
            1 => return Polarity::Repel,
            _ => {}
        }
    }
    Polarity::Clear
}

/// 電気プレフィルタ
///
/// 軸ごとに両側のレイを走査して正味の力の向きを求める。両側が同じ結果
/// なら無拘束。正味の力がある側へ向かう経路は、実際の引力による場合に
/// 限り「電気的係合」として印を付け、反対側への移動は今手では打ち消す。
fn electric_gate(board: &Board, particle: &Particle) -> AxisGate {
    let mut gate = AxisGate {
        allowed: [true; 4],
        engaged: [false; 4],
    };
    if particle.charge == Charge::Neutral {
        return gate;
    }

    let rays = board.rays();
    for (pos_dir, neg_dir) in [
        (Direction::Right, Direction::Left),
        (Direction::Down, Direction::Up),
    ] {
        let pos = scan_charge(
            board,
            rays.ray(particle.position, pos_dir),
            particle.charge,
        );
        let neg = scan_charge(
            board,
            rays.ray(particle.position, neg_dir),
            particle.charge,
        );

        let toward_pos = pos == Polarity::Attract || neg == Polarity::Repel;
        let toward_neg = neg == Polarity::Attract || pos == Polarity::Repel;
        if toward_pos == toward_neg {
            // 両側同等（引力同士・斥力同士・どちらも無し）は無拘束
            continue;
        }
        if toward_pos {
            gate.allowed[neg_dir.index()] = false;
            gate.engaged[pos_dir.index()] = pos == Polarity::Attract;
        } else {
            gate.allowed[pos_dir.index()] = false;
            gate.engaged[neg_dir.index()] = neg == Polarity::Attract;
        }
    }
    gate
}

/// 1方向のレイ歩進
///
/// 進めた歩数が零で対消滅も起きなければ、この方向は何も生まない
/// （その場に留まる盤面は返さない）。
fn step_ray(
    board: &Arc<Board>,
    particle: &Particle,
    dir: Direction,
    engaged: bool,
) -> Option<Arc<Board>> {
    let ray = board.rays().ray(particle.position, dir);
    let mut path = PathState {
        last_good: particle.position,
        steps: 0,
    };
    let mut destroyed: Vec<usize> = Vec::new();

    for &cell in ray {
        if let Some(other) = board.occupant(cell) {
            if particle.is_annihilation(other) {
                // 対消滅：両粒子を除去し、行き先には何も置かずに即確定
                return Some(Board::derive(board, &[*particle, *other], None, &destroyed));
            }
            // 阻止 → 後退規則
            break;
        }

        if let Some(obstacle) = board.obstacle(cell) {
            if engaged && obstacle.is_explodable() {
                // 係合経路上の破壊可能な障害物は除去して通過を続ける
                destroyed.push(cell);
                path = PathState {
                    last_good: cell,
                    steps: path.steps + 1,
                };
                continue;
            }
            break;
        }

        if let Some(hole) = board.hole(cell) {
            if particle.falls_into(hole) {
                // 吸込：粒子は盤面から完全に除去される
                return Some(Board::derive(board, &[*particle], None, &destroyed));
            }
            // 閾値未満の穴は通過
        }

        path = PathState {
            last_good: cell,
            steps: path.steps + 1,
        };
    }

    if path.steps == 0 {
        return None;
    }
    Some(Board::derive(
        board,
        &[*particle],
        Some(particle.at(path.last_good)),
        &destroyed,
    ))
}

/// 1粒子の全方向移動
///
/// 4方向それぞれについて高々1つの後続盤面を返す。移動規則が未実装の
/// 粒子種は、後続集合が黙って欠けることのないよう、ここで拒否する。
pub fn move_particle(
    board: &Arc<Board>,
    particle: &Particle,
) -> Result<Vec<Arc<Board>>, SearchError> {
    if particle.kind != ParticleKind::Electron {
        return Err(SearchError::UnsupportedKind(particle.kind));
    }

    let gate = electric_gate(board, particle);
    let mut out = Vec::with_capacity(4);
    for dir in Direction::ALL {
        if !gate.allowed[dir.index()] {
            continue;
        }
        if let Some(next) = step_ray(board, particle, dir, gate.engaged[dir.index()]) {
            out.push(next);
        }
    }
    trace!(
        "粒子 {} の候補方向: {}/4",
        particle.position,
        out.len()
    );
    Ok(out)
}

/// 盤上の全粒子について移動を集約し、後続盤面の集合を返す
///
/// 構造的に同一の結果は集合として1つに潰れる。
pub fn move_all(board: &Arc<Board>) -> Result<BoardSet, SearchError> {
    let mut out = board_set();
    for particle in board.particles() {
        for next in move_particle(board, particle)? {
            out.insert(next);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Anti, Hole, Obstacle};

    fn row_board(width: usize, particles: Vec<Particle>) -> Arc<Board> {
        Arc::new(
            Board::builder(width, 1)
                .particles(particles)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn lone_particle_slides_to_the_edge() {
        let board = row_board(5, vec![Particle::electron(1)]);
        let results = move_all(&board).unwrap();
        // 右へ4、左へ0（後退で1歩先の0）：左右2通り、上下はレイが空
        assert_eq!(results.len(), 2);
        let positions: Vec<usize> = results
            .iter()
            .map(|b| b.particles().iter().next().unwrap().position)
            .collect();
        assert!(positions.contains(&0));
        assert!(positions.contains(&4));
    }

    #[test]
    fn blocked_at_zero_steps_contributes_nothing() {
        // 同種同フラグの電子3つ：全員が零歩で阻止される
        let board = row_board(
            3,
            vec![
                Particle::electron(0),
                Particle::electron(1),
                Particle::electron(2),
            ],
        );
        let results = move_all(&board).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn attraction_cancels_retreat_direction() {
        // 電子(0) と陽電子(4)：相互に引力、互いへ向かう方向のみ許可
        let board = row_board(5, vec![Particle::electron(0), Particle::positron(4)]);
        let gate = electric_gate(&board, &Particle::electron(0));
        assert!(gate.allowed[Direction::Right.index()]);
        assert!(!gate.allowed[Direction::Left.index()]);
        assert!(gate.engaged[Direction::Right.index()]);
        assert!(!gate.engaged[Direction::Down.index()]);
    }

    #[test]
    fn repulsion_cancels_approach_without_engagement() {
        // 同符号の電子2つ：接近方向が打ち消され、係合は付かない
        let board = row_board(5, vec![Particle::electron(0), Particle::electron(4)]);
        let gate = electric_gate(&board, &Particle::electron(0));
        assert!(!gate.allowed[Direction::Right.index()]);
        assert!(gate.allowed[Direction::Left.index()]);
        assert!(!gate.engaged[Direction::Left.index()]);
    }

    #[test]
    fn neutral_occupant_is_scanned_past() {
        // 中性ニュートリノ越しの陽電子も引力源になる
        let board = row_board(
            6,
            vec![
                Particle::electron(0),
                Particle::electrino(2, Anti::Ordinary),
                Particle::positron(5),
            ],
        );
        let gate = electric_gate(&board, &Particle::electron(0));
        assert!(gate.engaged[Direction::Right.index()]);
        assert!(!gate.allowed[Direction::Left.index()]);
    }

    #[test]
    fn annihilation_removes_both_even_at_zero_steps() {
        let board = row_board(2, vec![Particle::electron(0), Particle::positron(1)]);
        let results = move_all(&board).unwrap();
        // どちらの粒子から見ても同じ空盤面に潰れる
        assert_eq!(results.len(), 1);
        let after = results.iter().next().unwrap();
        assert!(after.particles().is_empty());
    }

    #[test]
    fn sink_swallows_light_particle() {
        let board = Arc::new(
            Board::builder(4, 1)
                .holes(vec![None, None, Some(Hole::Light), None])
                .particles([Particle::electron(0)])
                .build()
                .unwrap(),
        );
        let results = move_all(&board).unwrap();
        assert_eq!(results.len(), 1);
        let after = results.iter().next().unwrap();
        assert!(after.particles().is_empty());
        // 穴レイヤは変化しない
        assert_eq!(after.hole_at(2).unwrap(), Some(Hole::Light));
    }

    #[test]
    fn strong_obstacle_blocks_even_when_engaged() {
        let board = Arc::new(
            Board::builder(5, 1)
                .obstacles(vec![None, None, Some(Obstacle::Strong), None, None])
                .particles([Particle::electron(0), Particle::positron(4)])
                .build()
                .unwrap(),
        );
        let results = move_particle(&board, &Particle::electron(0)).unwrap();
        assert_eq!(results.len(), 1);
        let after = &results[0];
        // 障害物の手前で後退停止、レイヤは無傷
        assert!(after
            .particles()
            .iter()
            .any(|p| p.position == 1 && p.anti == Anti::Ordinary));
        assert_eq!(after.obstacle_at(2).unwrap(), Some(Obstacle::Strong));
    }

    #[test]
    fn weak_obstacle_destroyed_only_when_engaged() {
        // 係合あり：破壊して通過し、奥の陽電子と対消滅
        let engaged = Arc::new(
            Board::builder(5, 1)
                .obstacles(vec![None, None, Some(Obstacle::Weak), None, None])
                .particles([Particle::electron(0), Particle::positron(4)])
                .build()
                .unwrap(),
        );
        let results = move_particle(&engaged, &Particle::electron(0)).unwrap();
        assert_eq!(results.len(), 1);
        let after = &results[0];
        assert!(after.particles().is_empty());
        assert_eq!(after.obstacle_at(2).unwrap(), None);

        // 係合なし：単独の電子は同じ障害物に阻止される
        let alone = Arc::new(
            Board::builder(5, 1)
                .obstacles(vec![None, None, Some(Obstacle::Weak), None, None])
                .particles([Particle::electron(0)])
                .build()
                .unwrap(),
        );
        let results = move_particle(&alone, &Particle::electron(0)).unwrap();
        assert_eq!(results.len(), 1);
        let after = &results[0];
        assert!(after.particles().iter().any(|p| p.position == 1));
        assert_eq!(after.obstacle_at(2).unwrap(), Some(Obstacle::Weak));
    }

    #[test]
    fn unsupported_kind_is_rejected() {
        let board = row_board(3, vec![Particle::muon(0, Anti::Ordinary)]);
        let err = move_all(&board).unwrap_err();
        assert!(matches!(
            err,
            SearchError::UnsupportedKind(ParticleKind::Muon)
        ));
    }

    #[test]
    fn move_all_is_deterministic() {
        let board = row_board(
            7,
            vec![
                Particle::electron(0),
                Particle::positron(3),
                Particle::electron(6),
            ],
        );
        let a = move_all(&board).unwrap();
        let b = move_all(&board).unwrap();
        assert_eq!(a.len(), b.len());
        for board in &a {
            assert!(b.contains(board));
        }
    }
}
