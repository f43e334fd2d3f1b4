use anyhow::Result;
use clap::Args;
use toggle_clamp::{config::Config, render::advantage_table};
use toggle_clamp_core::{LinkageParameters, SweepRange, sweep_mechanical_advantage};

#[derive(Args)]
pub struct SweepArgs {
    /// First angle in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub start: Option<i32>,

    /// End angle in degrees, exclusive.
    #[arg(long, allow_negative_numbers = true)]
    pub end: Option<i32>,

    /// Degrees between samples.
    #[arg(long)]
    pub step: Option<u32>,

    /// Print every n-th sample in the table.
    #[arg(long)]
    pub every: Option<usize>,

    /// Print the full sweep as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl SweepArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        let mut config = config.clone();
        if let Some(start) = self.start {
            config.sweep.start = start;
        }
        if let Some(end) = self.end {
            config.sweep.end = end;
        }
        if let Some(step) = self.step {
            config.sweep.step = step;
        }
        if let Some(every) = self.every {
            config.sweep.report_every = every;
        }
        config.validate_linkage()?;
        config.validate_sweep()?;

        let params = &config.linkage;
        let requested = config.sweep_range();
        let range = reachable_range(requested, params)?;

        let result = sweep_mechanical_advantage(params, range)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", advantage_table(&result, config.sweep.report_every));
        }

        Ok(())
    }
}

/// Skip leading angles where the bar cannot reach the base line.
fn reachable_range(requested: SweepRange, params: &LinkageParameters) -> Result<SweepRange> {
    let Some(range) = requested.clamp_to_reachable(params) else {
        anyhow::bail!(
            "bar cannot reach the base line at any angle in {}..{}",
            requested.start,
            requested.end
        );
    };
    if range.start != requested.start {
        tracing::warn!(
            requested = requested.start,
            start = range.start,
            "skipping unreachable angles at the start of the sweep"
        );
    }
    Ok(range)
}
