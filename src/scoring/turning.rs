use serde::Serialize;

use super::joints::Category;
use super::snapshot::AngleMeasurement;

/// そのティックで最も目標角度に近かった関節
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurningPoint {
    pub index: usize,
    pub title: String,
    pub category: Category,
    pub score: f32,
}

/// 最高スコアの関節を選ぶ
///
/// 同点の場合は設定順で最初のものを採る。
/// カテゴリは関節の設定値をそのまま使い、位置からは求めない。
pub fn select(measurements: &[AngleMeasurement]) -> Option<TurningPoint> {
    let mut best: Option<(usize, &AngleMeasurement)> = None;
    for (index, m) in measurements.iter().enumerate() {
        match best {
            Some((_, current)) if m.score <= current.score => {}
            _ => best = Some((index, m)),
        }
    }

    best.map(|(index, m)| TurningPoint {
        index,
        title: m.title.clone(),
        category: m.category,
        score: m.score,
    })
}
