pub mod angle;
pub mod joints;
pub mod score;
pub mod snapshot;
pub mod turning;

pub use angle::{measure, JointAngle};
pub use joints::{default_joint_specs, Category, JointAngleSpec};
pub use snapshot::{AngleMeasurement, ScoreSnapshot, Scorer};
pub use turning::{select, TurningPoint};
