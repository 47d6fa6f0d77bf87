/// 満点
pub const MAX_SCORE: f32 = 100.0;

/// 目標角度からのずれ1度につき1点減点。0点で下げ止まる。
///
/// angle は 0〜180 の範囲であること (範囲外の補正は呼び出し側の責任)。
pub fn score(angle: f32, target: f32) -> f32 {
    let deviation = (target - angle).abs();
    (MAX_SCORE - deviation).max(0.0)
}

/// 関節スコアの算術平均。空なら 0。
pub fn aggregate(scores: &[f32]) -> f32 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: f32 = scores.iter().sum();
    sum / scores.len() as f32
}
