pub mod keypoint;
pub mod replay;
pub mod source;

pub use keypoint::{Keypoint, KeypointIndex, Pose, Position};
pub use replay::ReplaySource;
pub use source::{PoseEstimate, PoseSource};
