use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::{asymmetry, compute_stats, generate_observations};
use crate::geometry::angle_at;
use crate::joints::{JointDefinition, JointId};
use crate::landmarks::{LandmarkFrame, Side};
use crate::report::{assemble_report, AssessmentReport, ReportInputs};

use super::error::SessionError;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

pub const DEFAULT_DURATION_SECS: u32 = 15;
pub const DEFAULT_MIN_VISIBILITY: f32 = 0.5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Recording,
    Finalizing,
    Complete,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "Idle",
            SessionStatus::Recording => "Recording",
            SessionStatus::Finalizing => "Finalizing",
            SessionStatus::Complete => "Complete",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finite reported angle for one side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleSample {
    pub side: Side,
    pub degrees: f64,
}

impl AngleSample {
    /// `None` for non-finite values; those are never stored.
    pub fn new(side: Side, degrees: f64) -> Option<Self> {
        degrees.is_finite().then_some(Self { side, degrees })
    }
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session was not recording; nothing changed.
    Ignored,
    Counting { remaining_secs: u32 },
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub joint: JointId,
    pub patient_id: String,
    pub duration_secs: u32,
    pub remaining_secs: u32,
    pub left_count: usize,
    pub right_count: usize,
    pub live_left: Option<f64>,
    pub live_right: Option<f64>,
    pub dropped_frames: u64,
}

/// One timed data-collection run for a single joint.
///
/// Frames are pushed in with `feed_frame` and the countdown is driven from
/// outside through `advance_one_second`. Completion is time-driven: the
/// window ends after `duration_secs` ticks whether or not any sample was
/// recorded.
#[derive(Debug, Clone)]
pub struct SamplingSession {
    status: SessionStatus,
    joint: JointId,
    patient_id: String,
    duration_secs: u32,
    remaining_secs: u32,
    min_visibility: f32,
    left: Vec<AngleSample>,
    right: Vec<AngleSample>,
    live_left: Option<f64>,
    live_right: Option<f64>,
    /// Per-side frame evaluations that produced no angle.
    dropped_frames: u64,
    report: Option<AssessmentReport>,
}

impl Default for SamplingSession {
    fn default() -> Self {
        Self::new(JointId::default(), DEFAULT_DURATION_SECS)
    }
}

impl SamplingSession {
    pub fn new(joint: JointId, duration_secs: u32) -> Self {
        let duration_secs = duration_secs.max(1);
        Self {
            status: SessionStatus::Idle,
            joint,
            patient_id: String::new(),
            duration_secs,
            remaining_secs: duration_secs,
            min_visibility: DEFAULT_MIN_VISIBILITY,
            left: Vec::new(),
            right: Vec::new(),
            live_left: None,
            live_right: None,
            dropped_frames: 0,
            report: None,
        }
    }

    pub fn with_min_visibility(mut self, min_visibility: f32) -> Self {
        self.min_visibility = min_visibility;
        self
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn joint(&self) -> JointId {
        self.joint
    }

    pub fn definition(&self) -> &'static JointDefinition {
        self.joint.definition()
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn samples(&self, side: Side) -> &[AngleSample] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn report(&self) -> Option<&AssessmentReport> {
        self.report.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            joint: self.joint,
            patient_id: self.patient_id.clone(),
            duration_secs: self.duration_secs,
            remaining_secs: self.remaining_secs,
            left_count: self.left.len(),
            right_count: self.right.len(),
            live_left: self.live_left,
            live_right: self.live_right,
            dropped_frames: self.dropped_frames,
        }
    }

    /// Select the joint and patient for the next run.
    pub fn configure(&mut self, joint: JointId, patient_id: &str) -> Result<(), SessionError> {
        if self.status == SessionStatus::Recording {
            return Err(SessionError::ConfigureWhileRecording);
        }
        self.joint = joint;
        self.patient_id = patient_id.to_string();
        Ok(())
    }

    /// Begin a new recording window from `Idle` or `Complete`.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.status == SessionStatus::Recording {
            return Err(SessionError::AlreadyRecording);
        }

        self.clear_buffers();
        self.report = None;
        self.remaining_secs = self.duration_secs;
        self.status = SessionStatus::Recording;

        log_info!(
            "Recording {} for patient '{}' ({}s window)",
            self.joint,
            self.patient_id,
            self.duration_secs
        );
        Ok(())
    }

    /// Abort the current window. No report is produced.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Recording {
            return Err(SessionError::NotRecording {
                status: self.status,
            });
        }

        log_info!(
            "Recording of {} cancelled with {}s remaining",
            self.joint,
            self.remaining_secs
        );
        self.clear_buffers();
        self.remaining_secs = self.duration_secs;
        self.status = SessionStatus::Idle;
        Ok(())
    }

    /// Drop samples and any held report, returning to `Idle`.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.status == SessionStatus::Recording {
            return Err(SessionError::ResetWhileRecording);
        }

        self.clear_buffers();
        self.report = None;
        self.remaining_secs = self.duration_secs;
        self.status = SessionStatus::Idle;
        Ok(())
    }

    /// Derive left and right angles from one frame and record the finite
    /// ones. Frames outside `Recording` are ignored. Returns the number of
    /// samples appended.
    pub fn feed_frame(&mut self, frame: &LandmarkFrame) -> usize {
        if self.status != SessionStatus::Recording {
            return 0;
        }

        let definition = self.definition();
        let mut appended = 0;

        for side in Side::BOTH {
            let sample = side_angle(definition, frame, side, self.min_visibility)
                .and_then(|degrees| AngleSample::new(side, degrees));

            let Some(sample) = sample else {
                self.dropped_frames += 1;
                continue;
            };

            match side {
                Side::Left => {
                    self.live_left = Some(sample.degrees);
                    self.left.push(sample);
                }
                Side::Right => {
                    self.live_right = Some(sample.degrees);
                    self.right.push(sample);
                }
            }
            appended += 1;
        }

        appended
    }

    /// Count down one second, finalizing the window when it reaches zero.
    pub fn advance_one_second(&mut self) -> TickOutcome {
        if self.status != SessionStatus::Recording {
            return TickOutcome::Ignored;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return TickOutcome::Counting {
                remaining_secs: self.remaining_secs,
            };
        }

        self.status = SessionStatus::Finalizing;
        self.finalize();
        TickOutcome::Completed
    }

    fn finalize(&mut self) {
        let definition = self.definition();
        let left = compute_stats(self.left.iter().map(|s| s.degrees));
        let right = compute_stats(self.right.iter().map(|s| s.degrees));
        let observations = generate_observations(definition, &left, &right);

        let report = assemble_report(ReportInputs {
            patient_id: self.patient_id.clone(),
            joint: self.joint,
            duration_secs: self.duration_secs,
            left,
            right,
            asymmetry: asymmetry(&left, &right),
            observations,
        });

        log_info!(
            "Assessment {} complete: {} left / {} right samples, {} observation(s)",
            report.assessment_id,
            left.count,
            right.count,
            report.observations.len()
        );
        log_debug!("Dropped {} side-frames without a valid angle", self.dropped_frames);

        self.report = Some(report);
        self.status = SessionStatus::Complete;
    }

    fn clear_buffers(&mut self) {
        self.left.clear();
        self.right.clear();
        self.live_left = None;
        self.live_right = None;
        self.dropped_frames = 0;
    }
}

fn side_angle(
    definition: &JointDefinition,
    frame: &LandmarkFrame,
    side: Side,
    min_visibility: f32,
) -> Option<f64> {
    let triple = definition.triple(side);
    let raw = angle_at(
        frame.point(triple.first, min_visibility),
        frame.point(triple.vertex, min_visibility),
        frame.point(triple.third, min_visibility),
    )?;
    Some(definition.reported_angle(raw))
}
