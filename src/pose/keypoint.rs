use serde::{Deserialize, Serialize};

use crate::error::PoseError;

/// PoseNet の 17 キーポイントインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;

    pub const ALL: [KeypointIndex; KeypointIndex::COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// PoseNet の part 名 (例: "leftShoulder")
    pub fn part_name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "leftEye",
            Self::RightEye => "rightEye",
            Self::LeftEar => "leftEar",
            Self::RightEar => "rightEar",
            Self::LeftShoulder => "leftShoulder",
            Self::RightShoulder => "rightShoulder",
            Self::LeftElbow => "leftElbow",
            Self::RightElbow => "rightElbow",
            Self::LeftWrist => "leftWrist",
            Self::RightWrist => "rightWrist",
            Self::LeftHip => "leftHip",
            Self::RightHip => "rightHip",
            Self::LeftKnee => "leftKnee",
            Self::RightKnee => "rightKnee",
            Self::LeftAnkle => "leftAnkle",
            Self::RightAnkle => "rightAnkle",
        }
    }
}

/// フレーム座標系 (ピクセル) 上の位置
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// self - origin (f64 で計算するので有限な座標同士なら溢れない)
    pub fn delta_from(self, origin: Position) -> (f64, f64) {
        (self.x as f64 - origin.x as f64, self.y as f64 - origin.y as f64)
    }
}

/// 単一キーポイント
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub part: KeypointIndex,
    pub position: Position,
    /// 信頼度スコア (0.0〜1.0)
    #[serde(rename = "score")]
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(part: KeypointIndex, x: f32, y: f32, confidence: f32) -> Self {
        Self {
            part,
            position: Position::new(x, y),
            confidence,
        }
    }

    /// 信頼度が閾値以上か
    pub fn is_valid(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }
}

/// 17キーポイントからなる姿勢
///
/// 各キーポイントは `KeypointIndex` の位置に格納される。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pose {
    keypoints: [Keypoint; KeypointIndex::COUNT],
}

impl Pose {
    /// 推定器が返したキーポイント列から姿勢を組み立てる
    ///
    /// 全17関節がちょうど1回ずつ含まれていなければ `PoseError`。
    /// 並び順は問わない。
    pub fn from_keypoints(keypoints: &[Keypoint]) -> Result<Self, PoseError> {
        if keypoints.len() != KeypointIndex::COUNT {
            return Err(PoseError::JointCount {
                expected: KeypointIndex::COUNT,
                actual: keypoints.len(),
            });
        }

        let mut slots: [Option<Keypoint>; KeypointIndex::COUNT] = [None; KeypointIndex::COUNT];
        for kp in keypoints {
            let slot = &mut slots[kp.part as usize];
            if slot.is_some() {
                return Err(PoseError::DuplicateJoint(kp.part));
            }
            *slot = Some(*kp);
        }

        let mut ordered = [Keypoint::new(KeypointIndex::Nose, 0.0, 0.0, 0.0); KeypointIndex::COUNT];
        for (index, slot) in slots.iter().enumerate() {
            match slot {
                Some(kp) => ordered[index] = *kp,
                None => return Err(PoseError::MissingJoint(KeypointIndex::ALL[index])),
            }
        }

        Ok(Self { keypoints: ordered })
    }

    /// インデックスでキーポイントを取得
    pub fn get(&self, index: KeypointIndex) -> &Keypoint {
        &self.keypoints[index as usize]
    }

    pub fn position(&self, index: KeypointIndex) -> Position {
        self.get(index).position
    }

    pub fn keypoints(&self) -> &[Keypoint; KeypointIndex::COUNT] {
        &self.keypoints
    }
}

#[cfg(test)]
pub(crate) fn full_keypoints(confidence: f32) -> Vec<Keypoint> {
    KeypointIndex::ALL
        .iter()
        .enumerate()
        .map(|(i, part)| Keypoint::new(*part, i as f32 * 10.0, i as f32 * 20.0, confidence))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypoint_index_count() {
        assert_eq!(KeypointIndex::COUNT, 17);
        assert_eq!(KeypointIndex::ALL.len(), 17);
    }

    #[test]
    fn test_all_matches_discriminants() {
        for (i, part) in KeypointIndex::ALL.iter().enumerate() {
            assert_eq!(*part as usize, i);
        }
    }

    #[test]
    fn test_keypoint_is_valid() {
        let kp = Keypoint::new(KeypointIndex::Nose, 0.5, 0.5, 0.7);
        assert!(kp.is_valid(0.5));
        assert!(!kp.is_valid(0.8));
    }

    #[test]
    fn test_keypoint_deserialize_posenet_format() {
        let json = r#"{"score":0.93,"part":"leftShoulder","position":{"x":412.5,"y":380.25}}"#;
        let kp: Keypoint = serde_json::from_str(json).unwrap();
        assert_eq!(kp.part, KeypointIndex::LeftShoulder);
        assert_eq!(kp.position, Position::new(412.5, 380.25));
        assert_eq!(kp.confidence, 0.93);
        assert_eq!(kp.part.part_name(), "leftShoulder");
    }

    #[test]
    fn test_pose_from_keypoints_any_order() {
        let mut keypoints = full_keypoints(0.9);
        keypoints.reverse();
        let pose = Pose::from_keypoints(&keypoints).unwrap();
        let elbow = pose.get(KeypointIndex::RightElbow);
        assert_eq!(elbow.part, KeypointIndex::RightElbow);
        assert_eq!(elbow.position, Position::new(80.0, 160.0));
    }

    #[test]
    fn test_pose_rejects_wrong_count() {
        let keypoints = full_keypoints(0.9);
        let err = Pose::from_keypoints(&keypoints[..16]).unwrap_err();
        assert_eq!(err, PoseError::JointCount { expected: 17, actual: 16 });

        let mut extra = full_keypoints(0.9);
        extra.push(extra[0]);
        let err = Pose::from_keypoints(&extra).unwrap_err();
        assert_eq!(err, PoseError::JointCount { expected: 17, actual: 18 });
    }

    #[test]
    fn test_pose_rejects_duplicate_joint() {
        let mut keypoints = full_keypoints(0.9);
        keypoints[3].part = KeypointIndex::Nose;
        let err = Pose::from_keypoints(&keypoints).unwrap_err();
        assert_eq!(err, PoseError::DuplicateJoint(KeypointIndex::Nose));
    }

    #[test]
    fn test_delta_from_does_not_overflow() {
        let far = Position::new(3e38, -3e38);
        let (dx, dy) = far.delta_from(Position::new(-3e38, 3e38));
        assert!(dx.is_finite() && dy.is_finite());
        assert!((dx - 6e38).abs() < 1e32);
    }
}
