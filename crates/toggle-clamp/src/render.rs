//! Text and JSON output handed to whatever draws or stores the results.

use serde::Serialize;
use std::io::Write;
use toggle_clamp_core::{
    Frame, FrameSink, JointPositions, LinkageParameters, Outline, Phase, SweepResult,
};

/// Console table of mechanical advantage, one row for every `every`-th
/// sample.
pub fn advantage_table(result: &SweepResult, every: usize) -> String {
    let mut out = String::new();
    out.push_str("  angle\t\tmechanical advantage\n");
    out.push_str(&"-".repeat(30));
    out.push('\n');
    for (angle, advantage) in result.samples().step_by(every.max(1)) {
        out.push_str(&format!("{angle:5}        {advantage:7.2}\n"));
    }
    out
}

pub fn pose_report(theta: f64, joints: &JointPositions, params: &LinkageParameters) -> String {
    let outline = joints.outline(params);
    let rows = [
        ("theta", format!("{theta:>10.3}")),
        ("pivot", pair(joints.pivot.x, joints.pivot.y)),
        ("handle tip", pair(joints.handle_tip.x, joints.handle_tip.y)),
        ("piston", pair(joints.piston_x, 0.0)),
        ("plunger tip", pair(outline.plunger[1].x, outline.plunger[1].y)),
    ];
    let mut out = String::new();
    for (label, values) in rows {
        out.push_str(&format!("{label:<11} {values}\n"));
    }
    out
}

fn pair(x: f64, y: f64) -> String {
    format!("{x:>10.3} {y:>10.3}")
}

/// A solved pose together with the polylines to draw it.
#[derive(Debug, Clone, Serialize)]
pub struct PoseRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub theta: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    pub joints: JointPositions,
    pub outline: Outline,
}

impl PoseRecord {
    pub fn new(theta: f64, joints: JointPositions, params: &LinkageParameters) -> Self {
        Self {
            index: None,
            theta,
            phase: None,
            outline: joints.outline(params),
            joints,
        }
    }

    pub fn from_frame(frame: &Frame, params: &LinkageParameters) -> Self {
        Self {
            index: Some(frame.index),
            phase: Some(frame.phase),
            ..Self::new(frame.theta, frame.joints, params)
        }
    }
}

/// Writes every frame as one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    type Error = serde_json::Error;

    fn render(&mut self, frame: &Frame, params: &LinkageParameters) -> Result<(), Self::Error> {
        serde_json::to_writer(&mut self.writer, &PoseRecord::from_frame(frame, params))?;
        self.writer.write_all(b"\n").map_err(serde_json::Error::io)
    }
}
