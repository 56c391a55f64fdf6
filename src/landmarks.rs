//! Per-frame landmark input.
//!
//! A landmark source delivers one `LandmarkFrame` per video frame. The
//! session only reads the roles named by the active joint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

/// Anatomical landmarks referenced by the joint catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum LandmarkRole {
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl LandmarkRole {
    pub const ALL: [LandmarkRole; 12] = [
        LandmarkRole::LeftShoulder,
        LandmarkRole::RightShoulder,
        LandmarkRole::LeftElbow,
        LandmarkRole::RightElbow,
        LandmarkRole::LeftWrist,
        LandmarkRole::RightWrist,
        LandmarkRole::LeftHip,
        LandmarkRole::RightHip,
        LandmarkRole::LeftKnee,
        LandmarkRole::RightKnee,
        LandmarkRole::LeftAnkle,
        LandmarkRole::RightAnkle,
    ];

    /// Index of this role in the 33-point pose layout.
    pub fn pose_index(&self) -> usize {
        match self {
            LandmarkRole::LeftShoulder => 11,
            LandmarkRole::RightShoulder => 12,
            LandmarkRole::LeftElbow => 13,
            LandmarkRole::RightElbow => 14,
            LandmarkRole::LeftWrist => 15,
            LandmarkRole::RightWrist => 16,
            LandmarkRole::LeftHip => 23,
            LandmarkRole::RightHip => 24,
            LandmarkRole::LeftKnee => 25,
            LandmarkRole::RightKnee => 26,
            LandmarkRole::LeftAnkle => 27,
            LandmarkRole::RightAnkle => 28,
        }
    }
}

/// One detected landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Detector confidence that the landmark is visible (0-1), if reported.
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }

    pub fn with_visibility(x: f64, y: f64, visibility: f32) -> Self {
        Self {
            x,
            y,
            visibility: Some(visibility),
        }
    }

    /// Position if the landmark counts as present at `min_visibility`.
    pub fn point(&self, min_visibility: f32) -> Option<Point> {
        if let Some(visibility) = self.visibility {
            if visibility.is_nan() || visibility < min_visibility {
                return None;
            }
        }
        let point = Point::new(self.x, self.y);
        point.is_finite().then_some(point)
    }
}

/// Landmarks for a single frame, keyed by role. Missing keys and `None`
/// values both mean "not detected this frame".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    landmarks: HashMap<LandmarkRole, Option<Landmark>>,
}

impl LandmarkFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: LandmarkRole, landmark: Option<Landmark>) {
        self.landmarks.insert(role, landmark);
    }

    pub fn with(mut self, role: LandmarkRole, x: f64, y: f64) -> Self {
        self.insert(role, Some(Landmark::new(x, y)));
        self
    }

    pub fn get(&self, role: LandmarkRole) -> Option<&Landmark> {
        self.landmarks.get(&role).and_then(Option::as_ref)
    }

    pub fn point(&self, role: LandmarkRole, min_visibility: f32) -> Option<Point> {
        self.get(role)
            .and_then(|landmark| landmark.point(min_visibility))
    }

    /// Build a frame from a 33-point pose array of `[x, y, visibility]`.
    /// Roles beyond the end of a short array stay absent.
    pub fn from_pose_array(points: &[[f32; 3]]) -> Self {
        let mut frame = Self::new();
        for role in LandmarkRole::ALL {
            let landmark = points.get(role.pose_index()).map(|[x, y, visibility]| {
                Landmark::with_visibility(f64::from(*x), f64::from(*y), *visibility)
            });
            frame.insert(role, landmark);
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_visibility_counts_as_absent() {
        let landmark = Landmark::with_visibility(0.4, 0.6, 0.2);
        assert_eq!(landmark.point(0.5), None);
        assert_eq!(landmark.point(0.1), Some(Point::new(0.4, 0.6)));
    }

    #[test]
    fn unknown_visibility_counts_as_present() {
        assert!(Landmark::new(0.1, 0.1).point(0.9).is_some());
    }

    #[test]
    fn nan_visibility_counts_as_absent() {
        let landmark = Landmark::with_visibility(0.1, 0.1, f32::NAN);
        assert_eq!(landmark.point(0.0), None);
    }

    #[test]
    fn explicit_none_and_missing_role_are_absent() {
        let mut frame = LandmarkFrame::new();
        frame.insert(LandmarkRole::LeftElbow, None);
        assert_eq!(frame.point(LandmarkRole::LeftElbow, 0.0), None);
        assert_eq!(frame.point(LandmarkRole::RightElbow, 0.0), None);
    }

    #[test]
    fn pose_array_maps_indices() {
        let mut points = vec![[0.0_f32, 0.0, 1.0]; 33];
        points[13] = [0.25, 0.75, 0.9];
        points[28] = [0.5, 0.5, 0.1];
        let frame = LandmarkFrame::from_pose_array(&points);

        assert_eq!(
            frame.point(LandmarkRole::LeftElbow, 0.5),
            Some(Point::new(0.25, 0.75))
        );
        assert_eq!(frame.point(LandmarkRole::RightAnkle, 0.5), None);
    }

    #[test]
    fn short_pose_array_leaves_roles_absent() {
        let points = vec![[0.5_f32, 0.5, 1.0]; 20];
        let frame = LandmarkFrame::from_pose_array(&points);
        assert!(frame.point(LandmarkRole::LeftWrist, 0.5).is_some());
        assert!(frame.point(LandmarkRole::LeftHip, 0.5).is_none());
    }
}
