// エラー型定義

use thiserror::Error;

use crate::model::ParticleKind;

/// 盤面構築・照会の設定エラー（呼び出し側で訂正可能）
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("レイヤ {layer} の長さが不正です: 期待 {expected} / 実際 {actual}")]
    LayerLength {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("マス番号 {index} が範囲外です（総マス数 {cells}）")]
    CellOutOfRange { index: usize, cells: usize },
    #[error("マス {cell} に複数の粒子が配置されています")]
    DuplicateParticle { cell: usize },
}

/// 探索実行時のエラー（当該 solve 呼び出しに対して致命的）
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("移動規則が未実装の粒子種です: {0:?}")]
    UnsupportedKind(ParticleKind),
    #[error("ワーカープールの構築に失敗しました")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
