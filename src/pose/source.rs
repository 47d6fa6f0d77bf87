use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::keypoint::Keypoint;

/// 推定器が1回の推論で返す生の結果 (PoseNet の single pose 形式)
///
/// キーポイント数はまだ検証されていない。`Pose::from_keypoints` で検証する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseEstimate {
    #[serde(default)]
    pub score: f32,
    pub keypoints: Vec<Keypoint>,
}

/// 姿勢推定の入力元
///
/// `is_ready` はビデオの readyState 相当。false の間はティックごとスキップされる。
/// `estimate` は非同期で、ティック間隔より長くかかってもよい。
#[async_trait]
pub trait PoseSource: Send + Sync + 'static {
    fn is_ready(&self) -> bool;

    /// これ以上推定結果を返さない。true になるとセッションは終了する。
    fn is_exhausted(&self) -> bool {
        false
    }

    async fn estimate(&self) -> Result<PoseEstimate>;
}
