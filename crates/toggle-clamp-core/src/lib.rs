//! Kinematics utilities for linear toggle clamps.
//!
//! This crate only computes geometry. Drawing, timing and export are left
//! to whatever consumes the [`sequencer::FrameSink`] output.

pub mod linkage;
pub mod sequencer;
pub mod sweep;

pub use linkage::{
    GeometryError, JointPositions, LinkageParameters, Outline, Point2D, compute_joint_positions,
};
pub use sequencer::{
    AnimationState, Direction, Frame, FrameSink, Phase, PlayError, RecordingSink, SequenceError,
    advance_frame, play,
};
pub use sweep::{SweepError, SweepRange, SweepResult, sweep_mechanical_advantage};
