// 粒子の値型定義

use crate::model::tile::Hole;

/// 電荷
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Charge {
    Negative,
    Neutral,
    Positive,
}

impl Charge {
    /// 符号値（-1 / 0 / +1）
    #[inline(always)]
    pub const fn value(self) -> i8 {
        match self {
            Charge::Negative => -1,
            Charge::Neutral => 0,
            Charge::Positive => 1,
        }
    }

    pub const fn flipped(self) -> Charge {
        match self {
            Charge::Negative => Charge::Positive,
            Charge::Neutral => Charge::Neutral,
            Charge::Positive => Charge::Negative,
        }
    }
}

/// 質量階級
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mass {
    Light,
    Medium,
    Heavy,
    Massive,
}

impl Mass {
    /// 質量ランク（穴の捕捉判定に使用）
    #[inline(always)]
    pub const fn rank(self) -> u8 {
        match self {
            Mass::Light => 0,
            Mass::Medium => 1,
            Mass::Heavy => 2,
            Mass::Massive => 3,
        }
    }
}

/// 色荷（RGBビット）
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Colour(u8);

impl Colour {
    pub const RED: Colour = Colour(0b001);
    pub const GREEN: Colour = Colour(0b010);
    pub const BLUE: Colour = Colour(0b100);
    pub const ANTIRED: Colour = Colour(0b110);
    pub const ANTIGREEN: Colour = Colour(0b101);
    pub const ANTIBLUE: Colour = Colour(0b011);
    pub const WHITE: Colour = Colour(0b111);

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// 反粒子フラグ
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Anti {
    Ordinary,
    Anti,
}

/// 粒子種別（閉じた族）
///
/// 移動規則が実装済みなのは Electron のみ。残りは生成は可能だが、
/// 移動を求められた時点で UnsupportedKind として拒否される。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParticleKind {
    Electron,
    Muon,
    Tau,
    Electrino,
}

/// 粒子（不変値）
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Particle {
    pub position: usize,
    pub kind: ParticleKind,
    pub mass: Mass,
    pub charge: Charge,
    pub colour: Colour,
    pub anti: Anti,
}

impl Particle {
    /// 荷電レプトン共通のコンストラクタ
    const fn charged_lepton(position: usize, kind: ParticleKind, mass: Mass, anti: Anti) -> Self {
        // 反粒子は電荷が反転する
        let charge = match anti {
            Anti::Ordinary => Charge::Negative,
            Anti::Anti => Charge::Positive,
        };
        Particle {
            position,
            kind,
            mass,
            charge,
            colour: Colour::WHITE,
            anti,
        }
    }

    pub const fn electron(position: usize) -> Self {
        Self::charged_lepton(position, ParticleKind::Electron, Mass::Light, Anti::Ordinary)
    }

    pub const fn positron(position: usize) -> Self {
        Self::charged_lepton(position, ParticleKind::Electron, Mass::Light, Anti::Anti)
    }

    pub const fn muon(position: usize, anti: Anti) -> Self {
        Self::charged_lepton(position, ParticleKind::Muon, Mass::Medium, anti)
    }

    pub const fn tau(position: usize, anti: Anti) -> Self {
        Self::charged_lepton(position, ParticleKind::Tau, Mass::Heavy, anti)
    }

    /// ニュートリノ（第1世代）
    pub const fn electrino(position: usize, anti: Anti) -> Self {
        Particle {
            position,
            kind: ParticleKind::Electrino,
            mass: Mass::Light,
            charge: Charge::Neutral,
            colour: Colour::WHITE,
            anti,
        }
    }

    /// 位置だけ差し替えたコピー
    #[inline(always)]
    pub const fn at(self, position: usize) -> Self {
        Particle { position, ..self }
    }

    /// 対消滅判定：同種・同色で反フラグが逆
    #[inline(always)]
    pub fn is_annihilation(&self, other: &Particle) -> bool {
        self.kind == other.kind && self.colour == other.colour && self.anti != other.anti
    }

    /// 穴への落下判定：質量ランク ≤ 穴の閾値ランク
    #[inline(always)]
    pub fn falls_into(&self, hole: Hole) -> bool {
        self.mass.rank() <= hole.rank()
    }
}
