use crate::pose::KeypointIndex;

/// 骨格の接続定義 (PoseNet の隣接ペア)
pub const SKELETON_CONNECTIONS: [(KeypointIndex, KeypointIndex); 12] = [
    // 胴体
    (KeypointIndex::LeftShoulder, KeypointIndex::RightShoulder),
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftHip),
    (KeypointIndex::RightShoulder, KeypointIndex::RightHip),
    (KeypointIndex::LeftHip, KeypointIndex::RightHip),
    // 腕
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftElbow),
    (KeypointIndex::LeftElbow, KeypointIndex::LeftWrist),
    (KeypointIndex::RightShoulder, KeypointIndex::RightElbow),
    (KeypointIndex::RightElbow, KeypointIndex::RightWrist),
    // 脚
    (KeypointIndex::LeftHip, KeypointIndex::LeftKnee),
    (KeypointIndex::LeftKnee, KeypointIndex::LeftAnkle),
    (KeypointIndex::RightHip, KeypointIndex::RightKnee),
    (KeypointIndex::RightKnee, KeypointIndex::RightAnkle),
];

/// キーポイントの色 (RGB)
pub const KEYPOINT_COLOR: u32 = 0x00FFFF; // 水色

/// 骨格線の色 (RGB)
pub const SKELETON_COLOR: u32 = 0x00FFFF;

/// 文字・枠の色 (RGB)
pub const TEXT_COLOR: u32 = 0xFFFFFF;

/// 診断メッセージの色 (RGB)
pub const DIAGNOSTIC_COLOR: u32 = 0xFF0000;

pub const KEYPOINT_RADIUS: f32 = 3.0;
pub const SKELETON_LINE_WIDTH: f32 = 2.0;
