// 盤面静的レイヤの値型

/// 障害物の強度
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Obstacle {
    Weak,   // もろい
    Normal, // 木製
    Strong, // 鋼鉄（破壊不可）
}

impl Obstacle {
    #[inline(always)]
    pub const fn is_weak(self) -> bool {
        matches!(self, Obstacle::Weak)
    }

    /// 電気的係合で破壊可能か
    #[inline(always)]
    pub const fn is_explodable(self) -> bool {
        matches!(self, Obstacle::Weak | Obstacle::Normal)
    }
}

/// 穴（シンク）の捕捉閾値
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hole {
    Light,
    Medium,
    Heavy,
    All,
}

impl Hole {
    /// 閾値ランク。All は最上位で全質量を捕捉する。
    #[inline(always)]
    pub const fn rank(self) -> u8 {
        match self {
            Hole::Light => 0,
            Hole::Medium => 1,
            Hole::Heavy => 2,
            Hole::All => 3,
        }
    }
}

/// 崩壊マーク（方向フラグ集合）
///
/// 現状は移動規則を持たない前方互換レイヤ。構築・同一性・ハッシュにのみ
/// 関与する。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decay(u8);

impl Decay {
    pub const RIGHT: Decay = Decay(1 << 0);
    pub const DOWN: Decay = Decay(1 << 1);
    pub const LEFT: Decay = Decay(1 << 2);
    pub const UP: Decay = Decay(1 << 3);
    pub const TILE: Decay = Decay(1 << 4);

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn union(self, other: Decay) -> Decay {
        Decay(self.0 | other.0)
    }

    #[inline(always)]
    pub const fn contains(self, other: Decay) -> bool {
        self.0 & other.0 == other.0
    }
}
