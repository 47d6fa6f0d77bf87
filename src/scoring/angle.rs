use serde::Serialize;

use crate::pose::Position;

/// 3点から求めた関節角度
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JointAngle {
    /// 符号なし角度 (度, 0〜180)
    pub degrees: f32,
    /// BA から BC への符号付き回転 (ラジアン, (-π, π])
    ///
    /// 描画時の円弧の向きにのみ使う。スコアには関係しない。
    pub orientation: f32,
}

impl JointAngle {
    /// 円弧を反時計回りに描くか (orientation が負のとき)
    pub fn is_counterclockwise(&self) -> bool {
        self.orientation < 0.0
    }
}

/// vertex を頂点とする A-vertex-C の角度
///
/// A または C が vertex と一致する場合は atan2(0, 0) = 0 となり 0° を返す。
/// 遮蔽時に推定器が同じ座標を返すことがあるのでエラーにはしない。
///
/// 積は f64 で計算する。f32 では大きな座標で inf - inf = NaN になる。
pub fn measure(a: Position, vertex: Position, c: Position) -> JointAngle {
    let (bax, bay) = a.delta_from(vertex);
    let (bcx, bcy) = c.delta_from(vertex);

    let dot = bax * bcx + bay * bcy;
    let cross = bax * bcy - bay * bcx;
    let orientation = f64::atan2(cross, dot);

    JointAngle {
        degrees: (orientation.abs().to_degrees() as f32).min(180.0),
        orientation: orientation as f32,
    }
}

/// vertex から A への方向 (ラジアン)。円弧の開始角。
pub fn heading(vertex: Position, a: Position) -> f32 {
    let (dx, dy) = a.delta_from(vertex);
    f64::atan2(dy, dx) as f32
}
