//! Joint catalog.
//!
//! Each supported joint names the landmark triple that defines its angle on
//! each side, whether the angle is reported as deviation from straight, and
//! the clinical thresholds used by the observation rules. Adding a joint
//! means adding an entry to `CATALOG`.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

use crate::landmarks::{LandmarkRole, LandmarkRole::*, Side};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum JointId {
    #[default]
    Shoulder,
    Elbow,
    Knee,
    Hip,
}

impl JointId {
    pub const ALL: [JointId; 4] = [JointId::Shoulder, JointId::Elbow, JointId::Knee, JointId::Hip];

    pub fn as_str(&self) -> &'static str {
        match self {
            JointId::Shoulder => "shoulder",
            JointId::Elbow => "elbow",
            JointId::Knee => "knee",
            JointId::Hip => "hip",
        }
    }

    pub fn definition(&self) -> &'static JointDefinition {
        definition(*self)
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JointId {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "shoulder" => Ok(JointId::Shoulder),
            "elbow" => Ok(JointId::Elbow),
            "knee" => Ok(JointId::Knee),
            "hip" => Ok(JointId::Hip),
            _ => Err(anyhow!("unknown joint '{value}'")),
        }
    }
}

/// Landmarks whose angle at `vertex` defines the joint on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideTriple {
    pub first: LandmarkRole,
    pub vertex: LandmarkRole,
    pub third: LandmarkRole,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JointDefinition {
    pub id: JointId,
    pub label: &'static str,
    pub left: SideTriple,
    pub right: SideTriple,
    /// Report `180 - raw` instead of the raw interior angle.
    pub is_extension_convention: bool,
    pub min_acceptable_degrees: f64,
    pub expected_degrees: f64,
}

impl JointDefinition {
    pub fn triple(&self, side: Side) -> SideTriple {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Convert a raw interior angle into the reported angle for this joint.
    pub fn reported_angle(&self, raw_degrees: f64) -> f64 {
        if self.is_extension_convention {
            180.0 - raw_degrees
        } else {
            raw_degrees
        }
    }
}

const fn triple(first: LandmarkRole, vertex: LandmarkRole, third: LandmarkRole) -> SideTriple {
    SideTriple {
        first,
        vertex,
        third,
    }
}

static CATALOG: [JointDefinition; 4] = [
    JointDefinition {
        id: JointId::Shoulder,
        label: "Shoulder Abduction",
        left: triple(LeftHip, LeftShoulder, LeftElbow),
        right: triple(RightHip, RightShoulder, RightElbow),
        is_extension_convention: false,
        min_acceptable_degrees: 90.0,
        expected_degrees: 180.0,
    },
    JointDefinition {
        id: JointId::Elbow,
        label: "Elbow Flexion",
        left: triple(LeftShoulder, LeftElbow, LeftWrist),
        right: triple(RightShoulder, RightElbow, RightWrist),
        is_extension_convention: false,
        min_acceptable_degrees: 100.0,
        expected_degrees: 145.0,
    },
    JointDefinition {
        id: JointId::Knee,
        label: "Knee Extension",
        left: triple(LeftHip, LeftKnee, LeftAnkle),
        right: triple(RightHip, RightKnee, RightAnkle),
        is_extension_convention: true,
        min_acceptable_degrees: 10.0,
        expected_degrees: 0.0,
    },
    JointDefinition {
        id: JointId::Hip,
        label: "Hip Flexion",
        left: triple(LeftShoulder, LeftHip, LeftKnee),
        right: triple(RightShoulder, RightHip, RightKnee),
        is_extension_convention: false,
        min_acceptable_degrees: 80.0,
        expected_degrees: 120.0,
    },
];

pub fn definition(id: JointId) -> &'static JointDefinition {
    match id {
        JointId::Shoulder => &CATALOG[0],
        JointId::Elbow => &CATALOG[1],
        JointId::Knee => &CATALOG[2],
        JointId::Hip => &CATALOG[3],
    }
}

pub fn catalog() -> &'static [JointDefinition] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_joint_resolves_to_its_own_definition() {
        for id in JointId::ALL {
            assert_eq!(definition(id).id, id);
        }
        assert_eq!(catalog().len(), JointId::ALL.len());
    }

    #[test]
    fn triples_stay_on_their_side() {
        for def in catalog() {
            assert_ne!(def.left, def.right);
            assert_eq!(def.triple(Side::Left), def.left);
            assert_eq!(def.triple(Side::Right), def.right);
        }
    }

    #[test]
    fn knee_uses_extension_convention() {
        let knee = JointId::Knee.definition();
        assert!(knee.is_extension_convention);
        assert_eq!(knee.reported_angle(170.0), 10.0);
        assert_eq!(JointId::Elbow.definition().reported_angle(120.0), 120.0);
    }

    #[test]
    fn parses_ids() {
        assert_eq!("Elbow".parse::<JointId>().unwrap(), JointId::Elbow);
        assert_eq!(" hip ".parse::<JointId>().unwrap(), JointId::Hip);
        assert!("wrist".parse::<JointId>().is_err());
    }
}
