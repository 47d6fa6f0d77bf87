use thiserror::Error;

use crate::pose::KeypointIndex;

/// ポーズソースから届いた姿勢の形式違反
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoseError {
    #[error("Malformed pose: expected {expected} keypoints, got {actual}")]
    JointCount { expected: usize, actual: usize },

    #[error("Malformed pose: joint '{}' reported more than once", .0.part_name())]
    DuplicateJoint(KeypointIndex),

    #[error("Malformed pose: joint '{}' is missing", .0.part_name())]
    MissingJoint(KeypointIndex),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Pose(#[from] PoseError),

    #[error("Joint table is empty")]
    EmptyJointTable,

    #[error("Pose source failed: {message}")]
    Source {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Estimation task aborted: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn source_failure(err: anyhow::Error) -> Self {
        Self::Source {
            message: format!("{:#}", err),
            source: Some(err.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
