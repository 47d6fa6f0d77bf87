use anyhow::{bail, Context, Result};

use turning_point::config::Config;
use turning_point::pose::{Pose, PoseEstimate};
use turning_point::scoring::Scorer;

const CONFIG_PATH: &str = "config.toml";

/// 単一の推定結果 (PoseNet JSON) を採点して表示する
///
/// usage: score_pose <pose.json> [config.toml]
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(pose_path) = args.next() else {
        bail!("usage: score_pose <pose.json> [config.toml]");
    };
    let config_path = args.next().unwrap_or_else(|| CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path)?;

    let content = std::fs::read_to_string(&pose_path)
        .with_context(|| format!("Failed to read {}", pose_path))?;
    let estimate: PoseEstimate = serde_json::from_str(&content)
        .with_context(|| format!("Invalid pose JSON in {}", pose_path))?;
    let pose = Pose::from_keypoints(&estimate.keypoints)?;

    let scorer = Scorer::new(config.joints.clone())?;
    let snapshot = scorer.evaluate(&pose)?;

    println!("{:<16} {:>9} {:>8} {:>9} {:>7}", "joint", "angle", "target", "score", "color");
    for (m, spec) in snapshot.measurements.iter().zip(scorer.joints()) {
        println!(
            "{:<16} {:>8.2}° {:>7.1}° {:>9.2} {:>7}",
            m.title,
            m.angle_degrees,
            spec.target_degrees,
            m.score,
            m.category.name()
        );
    }
    println!();
    println!("Total score:        {:.2} %", snapshot.total_score);
    println!("Main turning point: {} ({})", snapshot.main_turning_point, snapshot.main_category.name());
    println!("Indicator rotation: {:.1}°", snapshot.indicator_rotation_degrees());

    Ok(())
}
