use anyhow::Result;
use clap::Args;
use std::io::{self, Write};
use toggle_clamp::{config::Config, render::JsonLinesSink};
use toggle_clamp_core::play;

#[derive(Args)]
pub struct AnimateArgs {
    /// Frames in one round trip. Must be even.
    #[arg(long)]
    pub frames: Option<usize>,

    /// Open handle angle in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,

    /// Locked handle angle in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f64>,

    /// Number of round trips to play.
    #[arg(long, default_value_t = 1)]
    pub repeat: usize,
}

impl AnimateArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        let mut config = config.clone();
        if let Some(frames) = self.frames {
            config.animation.frames = frames;
        }
        if let Some(min) = self.min {
            config.animation.angle_min = min;
        }
        if let Some(max) = self.max {
            config.animation.angle_max = max;
        }
        config.validate_linkage()?;
        config.validate_animation()?;

        let params = config.linkage;
        let mut state = config.animation_state();
        let mut sink = JsonLinesSink::new(io::BufWriter::new(io::stdout().lock()));

        for round in 0..self.repeat {
            if round > 0 {
                state.reset();
            }
            let played = play(&mut state, &params, &mut sink)?;
            tracing::debug!(round, played, "round trip complete");
        }

        sink.into_inner().flush()?;
        Ok(())
    }
}
