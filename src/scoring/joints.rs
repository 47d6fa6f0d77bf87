use serde::{Deserialize, Serialize};

use crate::pose::KeypointIndex;

/// 関節ごとに固定された表示カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Yellow,
    Green,
    Blue,
    Red,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Red => "red",
        }
    }

    /// 描画色 (RGB)
    pub fn rgb(self) -> u32 {
        match self {
            Self::Yellow => 0xFFFF00,
            Self::Green => 0x008000,
            Self::Blue => 0x0000FF,
            Self::Red => 0xFF0000,
        }
    }
}

/// 採点対象の関節: A-vertex-C の角度を target と比べる
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointAngleSpec {
    pub title: String,
    pub joint_a: KeypointIndex,
    pub vertex: KeypointIndex,
    pub joint_c: KeypointIndex,
    pub target_degrees: f32,
    pub category: Category,
}

impl JointAngleSpec {
    pub fn new(
        title: &str,
        joint_a: KeypointIndex,
        vertex: KeypointIndex,
        joint_c: KeypointIndex,
        target_degrees: f32,
        category: Category,
    ) -> Self {
        Self {
            title: title.to_string(),
            joint_a,
            vertex,
            joint_c,
            target_degrees,
            category,
        }
    }
}

/// 既定の8関節
///
/// 三つ組はミラー表示前提のため "Left" に画像上の右側の関節を使う。
/// 肩=黄, 肘=緑, 腰=青, 膝=赤 は左右で共通。
pub fn default_joint_specs() -> Vec<JointAngleSpec> {
    use Category::*;
    use KeypointIndex::*;

    vec![
        JointAngleSpec::new("Left Shoulder", RightElbow, RightShoulder, RightHip, 120.0, Yellow),
        JointAngleSpec::new("Left Elbow", RightWrist, RightElbow, RightShoulder, 60.0, Green),
        JointAngleSpec::new("Left Hip", RightShoulder, RightHip, RightKnee, 110.0, Blue),
        JointAngleSpec::new("Left Knee", RightHip, RightKnee, RightAnkle, 90.0, Red),
        JointAngleSpec::new("Right Shoulder", LeftElbow, LeftShoulder, LeftHip, 120.0, Yellow),
        JointAngleSpec::new("Right Elbow", LeftWrist, LeftElbow, LeftShoulder, 60.0, Green),
        JointAngleSpec::new("Right Hip", LeftShoulder, LeftHip, LeftKnee, 110.0, Blue),
        JointAngleSpec::new("Right Knee", LeftHip, LeftKnee, LeftAnkle, 90.0, Red),
    ]
}
