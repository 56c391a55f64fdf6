//! Single-joint range-of-motion assessment.
//!
//! A landmark source pushes one frame at a time into a [`SessionController`]
//! (or a bare [`SamplingSession`]); a one-second countdown closes the window
//! and the session produces an immutable [`AssessmentReport`] with per-side
//! extrema, mean, asymmetry and clinical observations.

pub mod analysis;
pub mod geometry;
pub mod joints;
pub mod landmarks;
pub mod report;
pub mod session;
pub mod settings;
pub mod utils;

pub use analysis::{compute_stats, generate_observations, Finding, SideStats};
pub use geometry::{angle_at, Point};
pub use joints::{JointDefinition, JointId};
pub use landmarks::{Landmark, LandmarkFrame, LandmarkRole, Side};
pub use report::{assemble_report, AssessmentReport, ReportInputs};
pub use session::{
    SamplingSession, SessionController, SessionError, SessionSnapshot, SessionStatus,
};
pub use settings::{AssessmentSettings, SettingsStore};
pub use utils::logging::init_logging;
