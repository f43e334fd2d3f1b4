//! Closed-form joint positions for the handle, pivot, bar and plunger.
//!
//! The handle and the pivot rotate together about the origin. Theta is
//! measured in degrees from the vertical, so a zero angle puts both on the
//! positive y axis. The bar joins the pivot to a piston that slides along
//! the x axis.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error(
        "bar of length {bar_length} cannot reach the base line from pivot height {pivot_y} at {theta} degrees"
    )]
    InvalidGeometry {
        theta: f64,
        pivot_y: f64,
        bar_length: f64,
    },
    #[error("{name} must be a positive finite length, got {value}")]
    InvalidLength { name: &'static str, value: f64 },
}

pub type Result<T, E = GeometryError> = std::result::Result<T, E>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Link lengths of a toggle clamp.
///
/// The plunger length does not affect the solution. It only extends the
/// drawn plunger past the piston in [`JointPositions::outline`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkageParameters {
    pub handle_length: f64,
    pub pivot_length: f64,
    pub bar_length: f64,
    #[serde(default = "default_plunger_length")]
    pub plunger_length: f64,
}

fn default_plunger_length() -> f64 {
    10.0
}

impl Default for LinkageParameters {
    fn default() -> Self {
        Self {
            handle_length: 20.32,
            pivot_length: 15.0,
            bar_length: 13.43,
            plunger_length: default_plunger_length(),
        }
    }
}

impl LinkageParameters {
    pub fn new(
        handle_length: f64,
        pivot_length: f64,
        bar_length: f64,
        plunger_length: f64,
    ) -> Self {
        Self {
            handle_length,
            pivot_length,
            bar_length,
            plunger_length,
        }
    }

    /// Ensure every link has a positive, finite length.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("handle_length", self.handle_length),
            ("pivot_length", self.pivot_length),
            ("bar_length", self.bar_length),
            ("plunger_length", self.plunger_length),
        ];
        for (name, value) in lengths {
            if !(value.is_finite() && value > 0.0) {
                return Err(GeometryError::InvalidLength { name, value });
            }
        }
        Ok(())
    }

    /// Check that the bar reaches the base line for every angle in the
    /// closed interval between `start` and `end` degrees.
    ///
    /// `|cos|` peaks at multiples of 180 degrees, so the worst angle is
    /// either such a multiple inside the interval or one of the endpoints.
    pub fn check_range(&self, start: f64, end: f64) -> Result<()> {
        let (lo, hi) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        let peak = (lo / 180.0).ceil() * 180.0;
        let worst = if peak <= hi {
            peak
        } else if cos_deg(lo).abs() >= cos_deg(hi).abs() {
            lo
        } else {
            hi
        };
        compute_joint_positions(worst, self).map(|_| ())
    }
}

fn cos_deg(theta: f64) -> f64 {
    (theta * PI / 180.0).cos()
}

/// Joint coordinates for a single handle angle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointPositions {
    pub pivot: Point2D,
    pub handle_tip: Point2D,
    /// The piston always sits on the base line, so only x is stored.
    pub piston_x: f64,
}

impl JointPositions {
    pub fn piston(&self) -> Point2D {
        Point2D::new(self.piston_x, 0.0)
    }

    /// Polylines a renderer needs to draw this pose.
    pub fn outline(&self, params: &LinkageParameters) -> Outline {
        let piston = self.piston();
        Outline {
            handle: [Point2D::ORIGIN, self.pivot, self.handle_tip],
            bar: [self.pivot, piston],
            plunger: [
                piston,
                Point2D::new(piston.x + params.plunger_length, piston.y),
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub handle: [Point2D; 3],
    pub bar: [Point2D; 2],
    pub plunger: [Point2D; 2],
}

/// Solve the linkage for a handle angle given in degrees.
///
/// Any angle is accepted. The solution fails with
/// [`GeometryError::InvalidGeometry`] when the bar is shorter than the pivot
/// height, since the piston equation then has no real root.
pub fn compute_joint_positions(theta: f64, params: &LinkageParameters) -> Result<JointPositions> {
    let t = theta * PI / 180.0;
    let (sin_t, cos_t) = t.sin_cos();
    let handle_tip = Point2D::new(params.handle_length * sin_t, params.handle_length * cos_t);
    let pivot = Point2D::new(params.pivot_length * sin_t, params.pivot_length * cos_t);

    let reach = params.bar_length * params.bar_length - pivot.y * pivot.y;
    // written this way so a NaN reach is rejected too
    if !(reach >= 0.0) {
        return Err(GeometryError::InvalidGeometry {
            theta,
            pivot_y: pivot.y,
            bar_length: params.bar_length,
        });
    }

    Ok(JointPositions {
        pivot,
        handle_tip,
        piston_x: pivot.x + reach.sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_bar() -> LinkageParameters {
        LinkageParameters::new(20.0, 10.0, 12.0, 5.0)
    }

    #[test]
    fn zero_angle_is_vertical() {
        let params = long_bar();
        let joints = compute_joint_positions(0.0, &params).unwrap();
        assert_eq!(joints.handle_tip, Point2D::new(0.0, 20.0));
        assert_eq!(joints.pivot, Point2D::new(0.0, 10.0));
        assert_eq!(joints.piston_x, (12.0f64 * 12.0 - 10.0 * 10.0).sqrt());
    }

    #[test]
    fn golden_pose_at_69_degrees() {
        let params = LinkageParameters::default();
        let joints = compute_joint_positions(69.0, &params).unwrap();
        assert!((joints.pivot.y - 5.375519243179506).abs() < 1e-12);
        assert!((joints.pivot.x - 14.003706397458027).abs() < 1e-12);
        assert!((joints.piston_x - 26.310968191464312).abs() < 1e-12);

        let expected = joints.pivot.x + (13.43 * 13.43 - joints.pivot.y * joints.pivot.y).sqrt();
        assert_eq!(joints.piston_x, expected);
    }

    #[test]
    fn short_bar_is_invalid_near_vertical() {
        let params = LinkageParameters::default();
        let err = compute_joint_positions(0.0, &params).unwrap_err();
        match err {
            GeometryError::InvalidGeometry {
                theta, bar_length, ..
            } => {
                assert_eq!(theta, 0.0);
                assert_eq!(bar_length, 13.43);
            }
            other => panic!("unexpected error {other:?}"),
        }
        // acos(13.43 / 15) is about 26.45 degrees
        assert!(compute_joint_positions(26.0, &params).is_err());
        assert!(compute_joint_positions(27.0, &params).is_ok());
    }

    #[test]
    fn non_finite_angle_is_rejected() {
        let params = long_bar();
        assert!(compute_joint_positions(f64::NAN, &params).is_err());
        assert!(compute_joint_positions(f64::INFINITY, &params).is_err());
    }

    #[test]
    fn validate_rejects_bad_lengths() {
        assert!(LinkageParameters::default().validate().is_ok());

        let mut params = LinkageParameters::default();
        params.bar_length = 0.0;
        assert_eq!(
            params.validate(),
            Err(GeometryError::InvalidLength {
                name: "bar_length",
                value: 0.0
            })
        );

        params.bar_length = 1.0;
        params.handle_length = f64::NAN;
        assert!(matches!(
            params.validate(),
            Err(GeometryError::InvalidLength {
                name: "handle_length",
                ..
            })
        ));
    }

    #[test]
    fn check_range_finds_worst_angle() {
        let params = LinkageParameters::default();
        assert!(params.check_range(30.0, 90.0).is_ok());
        assert!(params.check_range(90.0, 30.0).is_ok());
        assert!(params.check_range(0.0, 90.0).is_err());
        // peak of |cos| at 180 lies inside the interval
        assert!(params.check_range(100.0, 200.0).is_err());
        assert!(params.check_range(30.0, 150.0).is_ok());
        assert!(long_bar().check_range(-720.0, 720.0).is_ok());
    }

    #[test]
    fn outline_chains_the_joints() {
        let params = long_bar();
        let joints = compute_joint_positions(45.0, &params).unwrap();
        let outline = joints.outline(&params);
        assert_eq!(outline.handle[0], Point2D::ORIGIN);
        assert_eq!(outline.handle[1], joints.pivot);
        assert_eq!(outline.handle[2], joints.handle_tip);
        assert_eq!(outline.bar, [joints.pivot, joints.piston()]);
        assert_eq!(outline.plunger[1].x, joints.piston_x + 5.0);
        assert_eq!(outline.plunger[1].y, 0.0);
    }

    #[test]
    fn parameters_default_plunger_when_missing() {
        let params: LinkageParameters = serde_json::from_str(
            r#"{"handle_length": 11.0, "pivot_length": 10.0, "bar_length": 8.85}"#,
        )
        .unwrap();
        assert_eq!(params.plunger_length, 10.0);
    }

    #[test]
    fn solution_is_deterministic() {
        let params = long_bar();
        bolero::check!()
            .with_type::<f64>()
            .for_each(|theta: &f64| {
                let a = compute_joint_positions(*theta, &params);
                let b = compute_joint_positions(*theta, &params);
                match (a, b) {
                    (Ok(a), Ok(b)) => {
                        assert_eq!(a.pivot.x.to_bits(), b.pivot.x.to_bits());
                        assert_eq!(a.pivot.y.to_bits(), b.pivot.y.to_bits());
                        assert_eq!(a.handle_tip.x.to_bits(), b.handle_tip.x.to_bits());
                        assert_eq!(a.handle_tip.y.to_bits(), b.handle_tip.y.to_bits());
                        assert_eq!(a.piston_x.to_bits(), b.piston_x.to_bits());
                    }
                    (Err(_), Err(_)) => {}
                    _ => panic!("solution changed between calls at {theta}"),
                }
            });
    }

    #[test]
    fn negated_angle_mirrors_x() {
        let params = long_bar();
        bolero::check!()
            .with_type::<f64>()
            .for_each(|theta: &f64| {
                if !theta.is_finite() || theta.abs() > 1.0e6 {
                    return;
                }
                let (Ok(pos), Ok(neg)) = (
                    compute_joint_positions(*theta, &params),
                    compute_joint_positions(-*theta, &params),
                ) else {
                    panic!("a bar longer than the pivot always reaches the base line");
                };
                assert_eq!(neg.pivot.x, -pos.pivot.x);
                assert_eq!(neg.pivot.y, pos.pivot.y);
                assert_eq!(neg.handle_tip.x, -pos.handle_tip.x);
                assert_eq!(neg.handle_tip.y, pos.handle_tip.y);
            });
    }
}
