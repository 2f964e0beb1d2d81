// 同梱レベル

use crate::error::BoardError;
use crate::model::Particle;
use crate::search::Board;

/// 電子リング（7×8、中央付近にゴール1つ）
///
/// 28個の電子が環状に並び、相互の電気拘束を解きほぐしながら
/// 1つをゴールマスへ導く。
pub fn electron_ring() -> Result<Board, BoardError> {
    const WIDTH: usize = 7;
    const HEIGHT: usize = 8;

    #[rustfmt::skip]
    const GRID: [u8; WIDTH * HEIGHT] = [
        0, 0, 1, 1, 1, 0, 0,
        0, 1, 1, 0, 1, 1, 0,
        1, 1, 0, 0, 0, 1, 1,
        1, 0, 0, 0, 0, 0, 1,
        1, 0, 0, 0, 0, 0, 1,
        1, 1, 0, 0, 0, 1, 1,
        0, 1, 1, 0, 1, 1, 0,
        0, 0, 1, 1, 1, 0, 0,
    ];

    let electrons = GRID
        .iter()
        .enumerate()
        .filter(|&(_, &x)| x == 1)
        .map(|(i, _)| Particle::electron(i));

    Board::builder(WIDTH, HEIGHT)
        .goals([3 * WIDTH + 3])
        .particles(electrons)
        .build()
}
