// 盤面状態と同一性

use std::collections::{BTreeSet, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use nohash_hasher::BuildNoHashHasher;

use crate::error::BoardError;
use crate::model::{Decay, Hole, Obstacle, Particle};
use crate::search::rays::RayTable;

/// 盤面集合（事前計算済み64bit同一性ダイジェストをそのままキーにする）
pub type BoardSet = HashSet<Arc<Board>, BuildNoHashHasher<u64>>;

pub fn board_set() -> BoardSet {
    HashSet::with_hasher(BuildNoHashHasher::default())
}

/// 1つのゲーム構成を表す不変スナップショット
///
/// 同一性（Eq / Hash）は (width, height, goals, obstacles, holes, decay,
/// higgs, particles) のみで定義される。占有キャッシュ・レイテーブル参照・
/// derive 元への後方参照は同一性に含めない。探索祖先が異なっていても
/// 物理構成が同じ盤面は同じ値である。
pub struct Board {
    width: usize,
    height: usize,
    goals: BTreeSet<usize>,
    obstacles: Vec<Option<Obstacle>>,
    holes: Vec<Option<Hole>>,
    decay: Vec<Option<Decay>>,
    higgs: Vec<bool>,
    particles: BTreeSet<Particle>,

    // 派生キャッシュ：particles の正確な逆写像
    occupancy: Vec<Option<Particle>>,
    rays: Arc<RayTable>,
    // 経路復元専用。所有辺ではない。
    prev: Option<Arc<Board>>,
    id_hash: u64,
}

impl Board {
    pub fn builder(width: usize, height: usize) -> BoardBuilder {
        BoardBuilder {
            width,
            height,
            goals: Vec::new(),
            obstacles: None,
            holes: None,
            decay: None,
            higgs: None,
            particles: Vec::new(),
        }
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

    pub fn goals(&self) -> &BTreeSet<usize> {
        &self.goals
    }

    /// 粒子集合（読み取り専用ビュー）
    pub fn particles(&self) -> &BTreeSet<Particle> {
        &self.particles
    }

    pub fn rays(&self) -> &Arc<RayTable> {
        &self.rays
    }

    /// derive 元の盤面（経路復元用）
    pub fn prev(&self) -> Option<&Arc<Board>> {
        self.prev.as_ref()
    }

    /// 勝利判定：全ゴールマスが粒子で占有されている
    pub fn win(&self) -> bool {
        self.goals.iter().all(|&g| self.occupancy[g].is_some())
    }

    pub fn obstacle_at(&self, cell: usize) -> Result<Option<Obstacle>, BoardError> {
        self.check_cell(cell)?;
        Ok(self.obstacles[cell])
    }

    pub fn hole_at(&self, cell: usize) -> Result<Option<Hole>, BoardError> {
        self.check_cell(cell)?;
        Ok(self.holes[cell])
    }

    pub fn particle_at(&self, cell: usize) -> Result<Option<Particle>, BoardError> {
        self.check_cell(cell)?;
        Ok(self.occupancy[cell])
    }

    fn check_cell(&self, cell: usize) -> Result<(), BoardError> {
        if cell >= self.cells() {
            return Err(BoardError::CellOutOfRange {
                index: cell,
                cells: self.cells(),
            });
        }
        Ok(())
    }

    // ===== 移動エンジン用の内部アクセサ（レイ由来の添字は常に範囲内） =====

    #[inline(always)]
    pub(crate) fn occupant(&self, cell: usize) -> Option<&Particle> {
        debug_assert!(cell < self.cells());
        self.occupancy[cell].as_ref()
    }

    #[inline(always)]
    pub(crate) fn obstacle(&self, cell: usize) -> Option<Obstacle> {
        debug_assert!(cell < self.cells());
        self.obstacles[cell]
    }

    #[inline(always)]
    pub(crate) fn hole(&self, cell: usize) -> Option<Hole> {
        debug_assert!(cell < self.cells());
        self.holes[cell]
    }

    /// 移動結果の派生盤面を構築する（純粋関数、親は不変のまま）
    ///
    /// remove の粒子を除き、place があれば置き、destroy の障害物を
    /// 取り除いた新しい盤面を、親への後方参照付きで返す。
    pub(crate) fn derive(
        parent: &Arc<Board>,
        remove: &[Particle],
        place: Option<Particle>,
        destroy: &[usize],
    ) -> Arc<Board> {
        let mut particles = parent.particles.clone();
        for p in remove {
            particles.remove(p);
        }
        if let Some(p) = place {
            particles.insert(p);
        }

        let obstacles = if destroy.is_empty() {
            parent.obstacles.clone()
        } else {
            let mut o = parent.obstacles.clone();
            for &cell in destroy {
                o[cell] = None;
            }
            o
        };

        let occupancy = rebuild_occupancy(parent.cells(), &particles);
        let id_hash = identity_hash(
            parent.width,
            parent.height,
            &parent.goals,
            &obstacles,
            &parent.holes,
            &parent.decay,
            &parent.higgs,
            &particles,
        );

        Arc::new(Board {
            width: parent.width,
            height: parent.height,
            goals: parent.goals.clone(),
            obstacles,
            holes: parent.holes.clone(),
            decay: parent.decay.clone(),
            higgs: parent.higgs.clone(),
            particles,
            occupancy,
            rays: parent.rays.clone(),
            prev: Some(parent.clone()),
            id_hash,
        })
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        // ダイジェスト不一致なら即不一致。一致時のみ全項目を比較する。
        self.id_hash == other.id_hash
            && self.width == other.width
            && self.height == other.height
            && self.goals == other.goals
            && self.obstacles == other.obstacles
            && self.holes == other.holes
            && self.decay == other.decay
            && self.higgs == other.higgs
            && self.particles == other.particles
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.id_hash);
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("particles", &self.particles.len())
            .field("id_hash", &self.id_hash)
            .finish()
    }
}

/// 盤面構築ビルダー
///
/// 省略されたレイヤは空（障害物・穴・崩壊なし、higgs 全 false）になる。
/// 提供されたレイヤの長さが width*height と一致しない場合は構築エラー。
pub struct BoardBuilder {
    width: usize,
    height: usize,
    goals: Vec<usize>,
    obstacles: Option<Vec<Option<Obstacle>>>,
    holes: Option<Vec<Option<Hole>>>,
    decay: Option<Vec<Option<Decay>>>,
    higgs: Option<Vec<bool>>,
    particles: Vec<Particle>,
}

impl BoardBuilder {
    pub fn goals(mut self, goals: impl IntoIterator<Item = usize>) -> Self {
        self.goals = goals.into_iter().collect();
        self
    }

    pub fn obstacles(mut self, obstacles: Vec<Option<Obstacle>>) -> Self {
        self.obstacles = Some(obstacles);
        self
    }

    pub fn holes(mut self, holes: Vec<Option<Hole>>) -> Self {
        self.holes = Some(holes);
        self
    }

    pub fn decay(mut self, decay: Vec<Option<Decay>>) -> Self {
        self.decay = Some(decay);
        self
    }

    pub fn higgs(mut self, higgs: Vec<bool>) -> Self {
        self.higgs = Some(higgs);
        self
    }

    pub fn particles(mut self, particles: impl IntoIterator<Item = Particle>) -> Self {
        self.particles = particles.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<Board, BoardError> {
        let cells = self.width * self.height;

        fn take_layer<T: Clone>(
            layer: Option<Vec<T>>,
            name: &'static str,
            cells: usize,
            default: T,
        ) -> Result<Vec<T>, BoardError> {
            match layer {
                None => Ok(vec![default; cells]),
                Some(v) if v.len() == cells => Ok(v),
                Some(v) => Err(BoardError::LayerLength {
                    layer: name,
                    expected: cells,
                    actual: v.len(),
                }),
            }
        }

        let obstacles = take_layer(self.obstacles, "obstacles", cells, None)?;
        let holes = take_layer(self.holes, "holes", cells, None)?;
        let decay = take_layer(self.decay, "decay", cells, None)?;
        let higgs = take_layer(self.higgs, "higgs", cells, false)?;

        for &g in &self.goals {
            if g >= cells {
                return Err(BoardError::CellOutOfRange { index: g, cells });
            }
        }
        let goals: BTreeSet<usize> = self.goals.into_iter().collect();

        let mut particles = BTreeSet::new();
        let mut occupancy: Vec<Option<Particle>> = vec![None; cells];
        for p in self.particles {
            if p.position >= cells {
                return Err(BoardError::CellOutOfRange {
                    index: p.position,
                    cells,
                });
            }
            if occupancy[p.position].is_some() {
                return Err(BoardError::DuplicateParticle { cell: p.position });
            }
            occupancy[p.position] = Some(p);
            particles.insert(p);
        }

        let id_hash = identity_hash(
            self.width,
            self.height,
            &goals,
            &obstacles,
            &holes,
            &decay,
            &higgs,
            &particles,
        );

        Ok(Board {
            width: self.width,
            height: self.height,
            goals,
            obstacles,
            holes,
            decay,
            higgs,
            particles,
            occupancy,
            rays: Arc::new(RayTable::new(self.width, self.height)),
            prev: None,
            id_hash,
        })
    }
}

fn rebuild_occupancy(cells: usize, particles: &BTreeSet<Particle>) -> Vec<Option<Particle>> {
    let mut occupancy = vec![None; cells];
    for p in particles {
        occupancy[p.position] = Some(*p);
    }
    occupancy
}

// ===== 同一性ダイジェスト（FNV-1a 64bit） =====

const FNV_PRIME: u64 = 1099511628211;
const FNV_OFFSET: u64 = 14695981039346656037;

struct Fnv64(u64);

impl Fnv64 {
    fn new() -> Self {
        Fnv64(FNV_OFFSET)
    }

    #[inline(always)]
    fn byte(&mut self, b: u8) {
        self.0 ^= b as u64;
        self.0 = self.0.wrapping_mul(FNV_PRIME);
    }

    #[inline(always)]
    fn word(&mut self, v: u64) {
        for b in v.to_le_bytes() {
            self.byte(b);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn identity_hash(
    width: usize,
    height: usize,
    goals: &BTreeSet<usize>,
    obstacles: &[Option<Obstacle>],
    holes: &[Option<Hole>],
    decay: &[Option<Decay>],
    higgs: &[bool],
    particles: &BTreeSet<Particle>,
) -> u64 {
    let mut h = Fnv64::new();
    h.word(width as u64);
    h.word(height as u64);

    h.word(goals.len() as u64);
    for &g in goals {
        h.word(g as u64);
    }

    for cell in 0..width * height {
        let ob = match obstacles[cell] {
            None => 0u8,
            Some(Obstacle::Weak) => 1,
            Some(Obstacle::Normal) => 2,
            Some(Obstacle::Strong) => 3,
        };
        let hl = match holes[cell] {
            None => 0u8,
            Some(hole) => hole.rank() + 1,
        };
        let dc = decay[cell].map(Decay::bits).unwrap_or(0);
        // 1マス分を1語に詰める
        h.word(u64::from_le_bytes([
            ob,
            hl,
            dc,
            higgs[cell] as u8,
            0,
            0,
            0,
            0,
        ]));
    }

    h.word(particles.len() as u64);
    for p in particles {
        h.word(p.position as u64);
        h.byte(p.kind as u8);
        h.byte(p.mass.rank());
        h.byte(p.charge.value() as u8);
        h.byte(p.colour.bits());
        h.byte(p.anti as u8);
    }

    h.0
}
