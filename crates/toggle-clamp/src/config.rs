use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use toggle_clamp_core::{AnimationState, LinkageParameters, SweepRange};

/// Configuration for a toggle clamp analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Link lengths of the clamp
    #[serde(default)]
    pub linkage: LinkageParameters,

    /// Mechanical advantage sweep
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Open/lock/open playback
    #[serde(default)]
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// First angle in degrees
    #[serde(default = "default_sweep_start")]
    pub start: i32,

    /// End angle in degrees, exclusive
    #[serde(default = "default_sweep_end")]
    pub end: i32,

    #[serde(default = "default_sweep_step")]
    pub step: u32,

    /// Print every n-th sample in the text table
    #[serde(default = "default_report_every")]
    pub report_every: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: default_sweep_start(),
            end: default_sweep_end(),
            step: default_sweep_step(),
            report_every: default_report_every(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Frames in one round trip; half closing, half opening
    #[serde(default = "default_frames")]
    pub frames: usize,

    #[serde(default = "default_angle_min")]
    pub angle_min: f64,

    #[serde(default = "default_angle_max")]
    pub angle_max: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            angle_min: default_angle_min(),
            angle_max: default_angle_max(),
        }
    }
}

fn default_sweep_start() -> i32 {
    0
}

fn default_sweep_end() -> i32 {
    90
}

fn default_sweep_step() -> u32 {
    1
}

fn default_report_every() -> usize {
    5
}

fn default_frames() -> usize {
    60
}

fn default_angle_min() -> f64 {
    30.0
}

fn default_angle_max() -> f64 {
    90.0
}

impl Config {
    /// Load configuration from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            // TOML is preferred, JSON is the fallback
            _ => Self::from_toml(&content).or_else(|_| Self::from_json(&content)),
        }
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config as TOML")
    }

    /// Parse configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse config as JSON")
    }

    pub fn sweep_range(&self) -> SweepRange {
        SweepRange::new(self.sweep.start, self.sweep.end, self.sweep.step)
    }

    pub fn animation_state(&self) -> AnimationState {
        AnimationState::new(
            self.animation.frames,
            self.animation.angle_min,
            self.animation.angle_max,
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_linkage()?;
        self.validate_sweep()?;
        self.validate_animation()
    }

    pub fn validate_linkage(&self) -> Result<()> {
        self.linkage.validate().context("invalid linkage")
    }

    pub fn validate_sweep(&self) -> Result<()> {
        self.sweep_range().validate().context("invalid sweep")?;
        if self.sweep.report_every == 0 {
            anyhow::bail!("sweep.report_every must be at least 1");
        }
        Ok(())
    }

    /// Check the playback section against the linkage. Call after
    /// [`Config::validate_linkage`].
    pub fn validate_animation(&self) -> Result<()> {
        let animation = &self.animation;
        if animation.frames < 2 || animation.frames % 2 != 0 {
            anyhow::bail!(
                "animation.frames must be an even number of at least 2, got {}",
                animation.frames
            );
        }
        if !(animation.angle_min.is_finite() && animation.angle_max.is_finite()) {
            anyhow::bail!("animation angles must be finite");
        }
        self.linkage
            .check_range(animation.angle_min, animation.angle_max)
            .context("linkage cannot follow the animation range")?;

        Ok(())
    }
}
