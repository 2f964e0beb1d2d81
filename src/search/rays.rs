// 直線レイテーブル

/// 移動方向（右・下・左・上）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// 全マスからの4方向レイ列
///
/// グリッドサイズごとに一度だけ構築し、同サイズの全盤面が読み取り専用で
/// 共有する。各レイは進行順のマス番号列で、起点マスを含まず盤端で終わる。
#[derive(Debug)]
pub struct RayTable {
    width: usize,
    height: usize,
    rays: Vec<[Vec<usize>; 4]>,
}

impl RayTable {
    pub fn new(width: usize, height: usize) -> Self {
        let cells = width * height;
        let mut rays = Vec::with_capacity(cells);
        for y in 0..height {
            let base = y * width;
            for x in 0..width {
                let idx = base + x;
                let right: Vec<usize> = (idx + 1..base + width).collect();
                let down: Vec<usize> = (1..height - y).map(|k| idx + k * width).collect();
                let left: Vec<usize> = (base..idx).rev().collect();
                let up: Vec<usize> = (1..=y).map(|k| idx - k * width).collect();
                rays.push([right, down, left, up]);
            }
        }
        Self {
            width,
            height,
            rays,
        }
    }

    #[inline(always)]
    pub fn ray(&self, cell: usize, dir: Direction) -> &[usize] {
        &self.rays[cell][dir.index()]
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn cells(&self) -> usize {
        self.width * self.height
    }
}
