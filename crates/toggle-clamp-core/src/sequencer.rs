//! Frame-by-frame playback of the clamp closing and opening again.
//!
//! The first half of the frames interpolates the handle from `angle_min`
//! to `angle_max`. Every angle used on the way in is pushed on a stack and
//! the second half pops them, so the opening stroke retraces the exact
//! angles of the closing stroke in reverse.

use crate::linkage::{GeometryError, JointPositions, LinkageParameters, compute_joint_positions};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use thiserror::Error;

const STACK_START_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SequenceError {
    #[error("no recorded angle left to replay at frame {frame_index}")]
    Underflow { frame_index: usize },
    #[error("all {total_frames} frames have been played")]
    Finished { total_frames: usize },
    #[error("frame {requested} requested while frame {expected} is next")]
    OutOfOrder { expected: usize, requested: usize },
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

pub type Result<T, E = SequenceError> = std::result::Result<T, E>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Handle moving from `angle_min` towards the locked position.
    Closing,
    /// Replaying the closing angles backwards.
    Opening,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Reverse,
}

impl Phase {
    pub fn direction(self) -> Direction {
        match self {
            Phase::Closing => Direction::Forward,
            // a finished animation rests at the end of the opening stroke
            Phase::Opening | Phase::Complete => Direction::Reverse,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    frame_index: usize,
    total_frames: usize,
    angle_min: f64,
    angle_max: f64,
    phase: Phase,
    visited: Vec<f64>,
}

impl AnimationState {
    pub fn new(total_frames: usize, angle_min: f64, angle_max: f64) -> Self {
        let mut state = Self {
            frame_index: 0,
            total_frames,
            angle_min,
            angle_max,
            phase: Phase::Closing,
            visited: Vec::with_capacity(STACK_START_SIZE.min(total_frames / 2)),
        };
        state.phase = state.phase_of(0);
        state
    }

    /// Index of the next frame to request.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn angle_min(&self) -> f64 {
        self.angle_min
    }

    pub fn angle_max(&self) -> f64 {
        self.angle_max
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn direction(&self) -> Direction {
        self.phase.direction()
    }

    /// Angles pushed by the closing stroke that are still waiting to be
    /// replayed.
    pub fn pending_angles(&self) -> &[f64] {
        &self.visited
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Start the sequence over from the first closing frame.
    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.visited.clear();
        self.phase = self.phase_of(0);
        tracing::debug!(total_frames = self.total_frames, "animation reset");
    }

    /// Advance to the next frame in order.
    pub fn advance(&mut self, params: &LinkageParameters) -> Result<Frame> {
        advance_frame(self.frame_index, self, params)
    }

    fn half(&self) -> usize {
        self.total_frames / 2
    }

    fn phase_of(&self, frame_index: usize) -> Phase {
        if frame_index >= self.total_frames {
            Phase::Complete
        } else if frame_index < self.half() {
            Phase::Closing
        } else {
            Phase::Opening
        }
    }

    fn closing_angle(&self, frame_index: usize) -> f64 {
        let half = self.half();
        if half <= 1 {
            return self.angle_min;
        }
        let increment = (self.angle_max - self.angle_min) / (half - 1) as f64;
        self.angle_min + frame_index as f64 * increment
    }
}

/// One evaluated animation frame, ready to be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub index: usize,
    pub theta: f64,
    pub phase: Phase,
    pub joints: JointPositions,
}

/// Resolve the handle angle of `frame_index` and solve the linkage there.
///
/// Frames must be requested in order. When an error is returned the state
/// is left untouched.
pub fn advance_frame(
    frame_index: usize,
    state: &mut AnimationState,
    params: &LinkageParameters,
) -> Result<Frame> {
    if frame_index >= state.total_frames {
        return Err(SequenceError::Finished {
            total_frames: state.total_frames,
        });
    }
    if frame_index != state.frame_index {
        return Err(SequenceError::OutOfOrder {
            expected: state.frame_index,
            requested: frame_index,
        });
    }

    let phase = state.phase_of(frame_index);
    let theta = match phase {
        Phase::Closing => state.closing_angle(frame_index),
        _ => *state
            .visited
            .last()
            .ok_or(SequenceError::Underflow { frame_index })?,
    };
    let joints = compute_joint_positions(theta, params)?;

    match phase {
        Phase::Closing => state.visited.push(theta),
        _ => {
            state.visited.pop();
        }
    }
    state.frame_index += 1;

    let next = state.phase_of(state.frame_index);
    if next != state.phase {
        tracing::trace!(
            from = ?state.phase,
            to = ?next,
            frame_index = state.frame_index,
            "phase change"
        );
        state.phase = next;
    }

    Ok(Frame {
        index: frame_index,
        theta,
        phase,
        joints,
    })
}

/// Consumer of evaluated frames, usually something that draws them.
pub trait FrameSink {
    type Error;

    fn render(&mut self, frame: &Frame, params: &LinkageParameters) -> Result<(), Self::Error>;
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<Frame>,
}

impl FrameSink for RecordingSink {
    type Error = Infallible;

    fn render(&mut self, frame: &Frame, _params: &LinkageParameters) -> Result<(), Infallible> {
        self.frames.push(*frame);
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum PlayError<E> {
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error("frame sink failed: {0}")]
    Sink(E),
}

/// Feed every remaining frame of `state` to `sink`, returning how many were
/// played.
pub fn play<S: FrameSink>(
    state: &mut AnimationState,
    params: &LinkageParameters,
    sink: &mut S,
) -> Result<usize, PlayError<S::Error>> {
    let mut played = 0;
    while !state.is_complete() {
        let frame = state.advance(params)?;
        sink.render(&frame, params).map_err(PlayError::Sink)?;
        played += 1;
    }
    Ok(played)
}
