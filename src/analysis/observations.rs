//! Rule-based clinical observations.
//!
//! Rules run in a fixed order and each appends at most one finding:
//! left limited, right limited, asymmetry, missing data per side, and
//! finally the "within expected limits" fallback. The order and the
//! asymmetry threshold are part of the report contract.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::joints::JointDefinition;
use crate::landmarks::Side;

use super::stats::SideStats;

/// Left/right max difference above which asymmetry is reported.
pub const ASYMMETRY_THRESHOLD_DEGREES: f64 = 15.0;

/// Findings print degrees to one decimal and the rules compare at that
/// same precision, so a message can never contradict its own threshold.
fn to_display_precision(degrees: f64) -> f64 {
    (degrees * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Finding {
    LimitedRange {
        side: Side,
        label: String,
        observed_max: f64,
        required_min: f64,
    },
    Asymmetry {
        left_max: f64,
        right_max: f64,
        difference: f64,
    },
    NoData {
        side: Side,
        label: String,
    },
    WithinLimits {
        label: String,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::LimitedRange {
                side,
                label,
                observed_max,
                required_min,
            } => write!(
                f,
                "{} {} limited: max {:.1}° is below the required {:.1}°",
                side.as_str(),
                label,
                observed_max,
                required_min
            ),
            Finding::Asymmetry {
                left_max,
                right_max,
                difference,
            } => write!(
                f,
                "Asymmetry detected: left max {:.1}° vs right max {:.1}° (difference {:.1}°)",
                left_max, right_max, difference
            ),
            Finding::NoData { side, label } => write!(
                f,
                "No valid {} {} samples were captured; range could not be assessed",
                side.as_str().to_lowercase(),
                label
            ),
            Finding::WithinLimits { label } => write!(f, "{label} ROM within expected limits"),
        }
    }
}

/// `|left_max - right_max|`, defined only when both sides have a max.
pub fn asymmetry(left: &SideStats, right: &SideStats) -> Option<f64> {
    match (left.max, right.max) {
        (Some(l), Some(r)) => Some((l - r).abs()),
        _ => None,
    }
}

fn limited_range(side: Side, stats: &SideStats, joint: &JointDefinition) -> Option<Finding> {
    let max = to_display_precision(stats.max?);
    (max < joint.min_acceptable_degrees).then(|| Finding::LimitedRange {
        side,
        label: joint.label.to_string(),
        observed_max: max,
        required_min: joint.min_acceptable_degrees,
    })
}

/// Evaluate the rule sequence for one completed window.
pub fn generate_findings(
    joint: &JointDefinition,
    left: &SideStats,
    right: &SideStats,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    findings.extend(limited_range(Side::Left, left, joint));
    findings.extend(limited_range(Side::Right, right, joint));

    if let (Some(left_max), Some(right_max), Some(difference)) =
        (left.max, right.max, asymmetry(left, right))
    {
        let difference = to_display_precision(difference);
        if difference > ASYMMETRY_THRESHOLD_DEGREES {
            findings.push(Finding::Asymmetry {
                left_max: to_display_precision(left_max),
                right_max: to_display_precision(right_max),
                difference,
            });
        }
    }

    for (side, stats) in [(Side::Left, left), (Side::Right, right)] {
        if !stats.has_data() {
            findings.push(Finding::NoData {
                side,
                label: joint.label.to_string(),
            });
        }
    }

    if findings.is_empty() {
        findings.push(Finding::WithinLimits {
            label: joint.label.to_string(),
        });
    }

    findings
}

/// Observation strings in rule order.
pub fn generate_observations(
    joint: &JointDefinition,
    left: &SideStats,
    right: &SideStats,
) -> Vec<String> {
    generate_findings(joint, left, right)
        .iter()
        .map(Finding::to_string)
        .collect()
}
