//! Piston travel and mechanical advantage over a range of handle angles.

use crate::linkage::{GeometryError, LinkageParameters, compute_joint_positions};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("piston does not move between {angle} and the next sample")]
    DegenerateConfiguration { angle: i32 },
    #[error("sweep step must be at least one degree")]
    InvalidStep,
    #[error("sweep range {start}..{end} is empty")]
    EmptyRange { start: i32, end: i32 },
}

pub type Result<T, E = SweepError> = std::result::Result<T, E>;

/// Half-open range of integer angles, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepRange {
    pub start: i32,
    pub end: i32,
    pub step: u32,
}

impl Default for SweepRange {
    fn default() -> Self {
        Self {
            start: 0,
            end: 90,
            step: 1,
        }
    }
}

impl SweepRange {
    pub fn new(start: i32, end: i32, step: u32) -> Self {
        Self { start, end, step }
    }

    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(SweepError::InvalidStep);
        }
        if self.start >= self.end {
            return Err(SweepError::EmptyRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn angles(&self) -> impl Iterator<Item = i32> + use<> {
        let step = self.step.max(1) as usize;
        (self.start..self.end).step_by(step)
    }

    /// Move the start forward to the first angle the linkage can reach.
    ///
    /// Returns `None` when no angle in the range has a solution.
    pub fn clamp_to_reachable(&self, params: &LinkageParameters) -> Option<Self> {
        let start = self
            .angles()
            .find(|angle| compute_joint_positions(*angle as f64, params).is_ok())?;
        Some(Self { start, ..*self })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub angles: Vec<i32>,
    /// Piston x for each entry of `angles`.
    pub positions: Vec<f64>,
    /// Forward difference leverage; one entry shorter than `angles`.
    pub mechanical_advantages: Vec<f64>,
}

impl SweepResult {
    /// Pairs of angle and mechanical advantage at that angle.
    pub fn samples(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.angles
            .iter()
            .copied()
            .zip(self.mechanical_advantages.iter().copied())
    }
}

/// Sample the piston position over `range` and derive the leverage at each
/// angle from the next sample.
///
/// The leverage is the handle's arc length per step divided by the piston
/// displacement over the same step. With a one degree step the numerator is
/// `handle_length * PI / 180`.
pub fn sweep_mechanical_advantage(
    params: &LinkageParameters,
    range: SweepRange,
) -> Result<SweepResult> {
    range.validate()?;

    let mut angles = Vec::new();
    let mut positions = Vec::new();
    for angle in range.angles() {
        let joints = compute_joint_positions(angle as f64, params)?;
        angles.push(angle);
        positions.push(joints.piston_x);
    }

    let arc = params.handle_length * range.step as f64 * PI / 180.0;
    let mut mechanical_advantages = Vec::with_capacity(positions.len().saturating_sub(1));
    for (i, pair) in positions.windows(2).enumerate() {
        let displacement = pair[1] - pair[0];
        if displacement == 0.0 {
            return Err(SweepError::DegenerateConfiguration { angle: angles[i] });
        }
        mechanical_advantages.push(arc / displacement);
    }

    tracing::debug!(
        start = range.start,
        end = range.end,
        step = range.step,
        samples = angles.len(),
        "swept linkage"
    );

    Ok(SweepResult {
        angles,
        positions,
        mechanical_advantages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_bar() -> LinkageParameters {
        LinkageParameters::new(20.0, 10.0, 12.0, 5.0)
    }

    #[test]
    fn default_sweep_has_90_angles_and_89_advantages() {
        let result = sweep_mechanical_advantage(&long_bar(), SweepRange::default()).unwrap();
        assert_eq!(result.angles.len(), 90);
        assert_eq!(result.positions.len(), 90);
        assert_eq!(result.mechanical_advantages.len(), 89);
        assert_eq!(result.angles.first(), Some(&0));
        assert_eq!(result.angles.last(), Some(&89));
        assert_eq!(result.samples().count(), 89);
    }

    #[test]
    fn advantage_is_arc_over_displacement() {
        let params = long_bar();
        let result = sweep_mechanical_advantage(&params, SweepRange::default()).unwrap();
        let arc = params.handle_length * PI / 180.0;
        for (i, ma) in result.mechanical_advantages.iter().enumerate() {
            let expected = arc / (result.positions[i + 1] - result.positions[i]);
            assert_eq!(*ma, expected);
        }
    }

    #[test]
    fn leverage_grows_towards_lock() {
        let params = LinkageParameters::default();
        let range = SweepRange::new(30, 90, 1);
        let result = sweep_mechanical_advantage(&params, range).unwrap();
        let first = result.mechanical_advantages[0];
        let last = *result.mechanical_advantages.last().unwrap();
        assert!(first > 0.0);
        assert!(last > first);
    }

    #[test]
    fn wider_step_scales_the_arc() {
        let params = long_bar();
        let result = sweep_mechanical_advantage(&params, SweepRange::new(0, 90, 5)).unwrap();
        assert_eq!(result.angles, (0..90).step_by(5).collect::<Vec<_>>());
        assert_eq!(result.mechanical_advantages.len(), 17);
        let arc = params.handle_length * 5.0 * PI / 180.0;
        assert_eq!(
            result.mechanical_advantages[0],
            arc / (result.positions[1] - result.positions[0])
        );
    }

    #[test]
    fn unreachable_angle_is_reported() {
        let err = sweep_mechanical_advantage(&LinkageParameters::default(), SweepRange::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SweepError::Geometry(GeometryError::InvalidGeometry { theta, .. }) if theta == 0.0
        ));
    }

    #[test]
    fn stationary_piston_is_degenerate() {
        // a zero length pivot never moves the piston off bar_length
        let params = LinkageParameters::new(20.0, 0.0, 12.0, 5.0);
        let err = sweep_mechanical_advantage(&params, SweepRange::new(10, 20, 1)).unwrap_err();
        assert_eq!(err, SweepError::DegenerateConfiguration { angle: 10 });
    }

    #[test]
    fn rejects_bad_ranges() {
        let params = long_bar();
        assert_eq!(
            sweep_mechanical_advantage(&params, SweepRange::new(0, 90, 0)),
            Err(SweepError::InvalidStep)
        );
        assert_eq!(
            sweep_mechanical_advantage(&params, SweepRange::new(10, 10, 1)),
            Err(SweepError::EmptyRange { start: 10, end: 10 })
        );
    }

    #[test]
    fn single_sample_has_no_advantage() {
        let result = sweep_mechanical_advantage(&long_bar(), SweepRange::new(10, 11, 1)).unwrap();
        assert_eq!(result.angles, vec![10]);
        assert!(result.mechanical_advantages.is_empty());
    }

    #[test]
    fn clamp_skips_unreachable_start() {
        let params = LinkageParameters::default();
        let clamped = SweepRange::default().clamp_to_reachable(&params).unwrap();
        assert_eq!(clamped, SweepRange::new(27, 90, 1));
        assert!(sweep_mechanical_advantage(&params, clamped).is_ok());

        let stepped = SweepRange::new(0, 90, 10)
            .clamp_to_reachable(&params)
            .unwrap();
        assert_eq!(stepped.start, 30);

        assert_eq!(SweepRange::new(0, 20, 1).clamp_to_reachable(&params), None);
    }
}
