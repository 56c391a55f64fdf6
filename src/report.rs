//! Assessment report record handed to downstream formatters.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::SideStats;
use crate::joints::JointId;

pub const UNKNOWN_PATIENT: &str = "Unknown";

/// Result of one completed assessment. Built once and never mutated; a new
/// assessment produces a new report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub assessment_id: String,
    pub patient_id: String,
    pub joint: JointId,
    pub duration_secs: u32,
    pub left: SideStats,
    pub right: SideStats,
    pub asymmetry: Option<f64>,
    pub observations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl AssessmentReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize assessment report")
    }
}

/// Inputs gathered at the end of a recording window.
#[derive(Debug, Clone)]
pub struct ReportInputs {
    pub patient_id: String,
    pub joint: JointId,
    pub duration_secs: u32,
    pub left: SideStats,
    pub right: SideStats,
    pub asymmetry: Option<f64>,
    pub observations: Vec<String>,
}

pub fn assemble_report(inputs: ReportInputs) -> AssessmentReport {
    assemble_report_at(inputs, Utc::now())
}

pub fn assemble_report_at(inputs: ReportInputs, created_at: DateTime<Utc>) -> AssessmentReport {
    let patient_id = if inputs.patient_id.trim().is_empty() {
        UNKNOWN_PATIENT.to_string()
    } else {
        inputs.patient_id
    };

    AssessmentReport {
        assessment_id: Uuid::new_v4().to_string(),
        patient_id,
        joint: inputs.joint,
        duration_secs: inputs.duration_secs,
        left: inputs.left,
        right: inputs.right,
        asymmetry: inputs.asymmetry,
        observations: inputs.observations,
        created_at,
    }
}
