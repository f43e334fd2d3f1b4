use anyhow::Result;
use clap::Args;
use toggle_clamp::{
    config::Config,
    render::{PoseRecord, pose_report},
};
use toggle_clamp_core::compute_joint_positions;

#[derive(Args)]
pub struct PointsArgs {
    /// Handle angle in degrees from vertical.
    #[arg(allow_negative_numbers = true)]
    pub theta: f64,

    /// Print the pose and its outline as JSON.
    #[arg(long)]
    pub json: bool,
}

impl PointsArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        config.validate_linkage()?;
        let params = &config.linkage;

        let joints = compute_joint_positions(self.theta, params)?;
        tracing::debug!(theta = self.theta, piston_x = joints.piston_x, "solved pose");

        if self.json {
            let record = PoseRecord::new(self.theta, joints, params);
            println!("{}", serde_json::to_string_pretty(&record)?);
        } else {
            print!("{}", pose_report(self.theta, &joints, params));
        }

        Ok(())
    }
}
