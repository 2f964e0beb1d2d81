// 統合テスト

use std::sync::Arc;

use higgs_solver::{
    levels, move_all, solve, Board, Message, Obstacle, Outcome, Particle, SearchError,
    SolverConfig,
};

fn config() -> SolverConfig {
    SolverConfig::new(5).with_workers(2)
}

/// 移動エンジンの統合テスト
mod movement {
    use super::*;

    #[test]
    fn flanked_electron_has_exactly_four_moves() {
        // 7×8 盤面、電子(3,3) の左右を鋼鉄障害物で挟む
        let mut obstacles = vec![None; 56];
        obstacles[22] = Some(Obstacle::Strong);
        obstacles[26] = Some(Obstacle::Strong);
        let board = Arc::new(
            Board::builder(7, 8)
                .obstacles(obstacles)
                .particles([Particle::electron(24)])
                .build()
                .unwrap(),
        );

        let results = move_all(&board).unwrap();
        assert_eq!(results.len(), 4);

        let mut positions: Vec<usize> = results
            .iter()
            .map(|b| b.particles().iter().next().unwrap().position)
            .collect();
        positions.sort_unstable();
        // 右は26の手前、左は22の手前、上下は盤端まで
        assert_eq!(positions, vec![3, 23, 25, 52]);
        for after in &results {
            assert_eq!(after.obstacle_at(22).unwrap(), Some(Obstacle::Strong));
            assert_eq!(after.obstacle_at(26).unwrap(), Some(Obstacle::Strong));
        }
    }

    #[test]
    fn engaged_path_clears_wooden_obstacle() {
        // 引力で係合した経路上の木製障害物は破壊され、奥で対消滅する
        let board = Arc::new(
            Board::builder(5, 1)
                .obstacles(vec![None, None, Some(Obstacle::Normal), None, None])
                .particles([Particle::electron(0), Particle::positron(4)])
                .build()
                .unwrap(),
        );
        let results = move_all(&board).unwrap();
        assert_eq!(results.len(), 1);
        let after = results.iter().next().unwrap();
        assert!(after.particles().is_empty());
        assert_eq!(after.obstacle_at(2).unwrap(), None);
    }

    #[test]
    fn bundled_level_expands_deterministically() {
        let board = Arc::new(levels::electron_ring().unwrap());
        let a = move_all(&board).unwrap();
        let b = move_all(&board).unwrap();
        assert!(!a.is_empty());
        assert_eq!(a.len(), b.len());
        for next in &a {
            assert!(b.contains(next));
            // 対消滅は起きないので粒子数は保存される
            assert_eq!(next.particles().len(), 28);
        }
    }
}

/// 探索制御の統合テスト
mod solver {
    use super::*;

    #[test]
    fn finds_single_move_solution() {
        let board = Board::builder(5, 5)
            .goals([24])
            .particles([Particle::electron(20)])
            .build()
            .unwrap();
        let outcome = solve(board, &config(), None).unwrap();
        match outcome {
            Outcome::Solved(solution) => {
                assert_eq!(solution.depth(), 1);
                assert!(solution.board.win());
            }
            other => panic!("期待外の結果: {:?}", other),
        }
    }

    #[test]
    fn dedup_exhausts_cyclic_space() {
        // 電子1つは四隅を巡るだけで中央には止まれない。
        // 既訪問排除が効けば有限手で枯渇する。
        let board = Board::builder(3, 3)
            .goals([4])
            .particles([Particle::electron(0)])
            .build()
            .unwrap();
        let outcome = solve(board, &config(), None).unwrap();
        assert!(matches!(outcome, Outcome::Exhausted));
    }

    #[test]
    fn unsupported_kind_aborts_search() {
        let board = Board::builder(3, 1)
            .goals([2])
            .particles([Particle::muon(0, higgs_solver::Anti::Ordinary)])
            .build()
            .unwrap();
        let err = solve(board, &config(), None).unwrap_err();
        assert!(matches!(err, SearchError::UnsupportedKind(_)));
    }

    #[test]
    fn progress_messages_arrive_in_order() {
        let board = Board::builder(5, 5)
            .goals([24])
            .particles([Particle::electron(20)])
            .build()
            .unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        let outcome = solve(board, &config(), Some(&tx)).unwrap();
        drop(tx);
        assert!(matches!(outcome, Outcome::Solved(_)));

        let messages: Vec<Message> = rx.iter().collect();
        assert!(matches!(messages.last(), Some(Message::Finished)));
        let depths: Vec<u32> = messages
            .iter()
            .filter_map(|m| match m {
                Message::Progress(stats) => Some(stats.depth),
                _ => None,
            })
            .collect();
        assert_eq!(depths, vec![1]);
    }
}
