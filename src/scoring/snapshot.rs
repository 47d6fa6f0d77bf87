use serde::Serialize;

use super::angle;
use super::joints::{Category, JointAngleSpec};
use super::score;
use super::turning;
use crate::error::{Error, Result};
use crate::pose::{Pose, Position};

/// 1関節分の計測結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleMeasurement {
    pub title: String,
    pub angle_degrees: f32,
    pub score: f32,
    pub category: Category,
    /// 以下は円弧の描画用
    pub vertex: Position,
    pub orientation: f32,
    pub heading: f32,
}

/// 1ティック分の採点結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSnapshot {
    /// 設定順
    pub measurements: Vec<AngleMeasurement>,
    pub total_score: f32,
    pub main_turning_point: String,
    pub main_category: Category,
}

impl ScoreSnapshot {
    /// インジケーター画像の回転角 (度)。100点で1周。
    pub fn indicator_rotation_degrees(&self) -> f32 {
        3.6 * self.total_score
    }
}

/// 関節テーブルに従って姿勢を採点する
#[derive(Debug, Clone)]
pub struct Scorer {
    joints: Vec<JointAngleSpec>,
}

impl Scorer {
    pub fn new(joints: Vec<JointAngleSpec>) -> Result<Self> {
        if joints.is_empty() {
            return Err(Error::EmptyJointTable);
        }
        Ok(Self { joints })
    }

    pub fn joints(&self) -> &[JointAngleSpec] {
        &self.joints
    }

    pub fn measure(&self, pose: &Pose) -> Vec<AngleMeasurement> {
        self.joints
            .iter()
            .map(|spec| {
                let a = pose.position(spec.joint_a);
                let vertex = pose.position(spec.vertex);
                let c = pose.position(spec.joint_c);
                let joint = angle::measure(a, vertex, c);
                AngleMeasurement {
                    title: spec.title.clone(),
                    angle_degrees: joint.degrees,
                    score: score::score(joint.degrees, spec.target_degrees),
                    category: spec.category,
                    vertex,
                    orientation: joint.orientation,
                    heading: angle::heading(vertex, a),
                }
            })
            .collect()
    }

    pub fn evaluate(&self, pose: &Pose) -> Result<ScoreSnapshot> {
        let measurements = self.measure(pose);
        let scores: Vec<f32> = measurements.iter().map(|m| m.score).collect();
        let total_score = score::aggregate(&scores);
        let winner = turning::select(&measurements).ok_or(Error::EmptyJointTable)?;

        Ok(ScoreSnapshot {
            measurements,
            total_score,
            main_turning_point: winner.title,
            main_category: winner.category,
        })
    }
}
