use romscan::analysis::asymmetry;
use romscan::landmarks::LandmarkRole::{self, *};
use romscan::{
    compute_stats, generate_observations, JointId, LandmarkFrame, SamplingSession, SessionStatus,
    Side,
};

/// Frame with an elbow angle of `left_deg` / `right_deg` degrees on each arm.
fn elbow_frame(left_deg: f64, right_deg: f64) -> LandmarkFrame {
    let mut frame = LandmarkFrame::new();
    place_arm(&mut frame, (LeftShoulder, LeftElbow, LeftWrist), 0.3, left_deg);
    place_arm(&mut frame, (RightShoulder, RightElbow, RightWrist), 0.7, right_deg);
    frame
}

fn place_arm(
    frame: &mut LandmarkFrame,
    (shoulder, elbow, wrist): (LandmarkRole, LandmarkRole, LandmarkRole),
    x: f64,
    degrees: f64,
) {
    let theta = degrees.to_radians();
    let (ex, ey) = (x, 0.5);
    frame.insert(shoulder, Some(romscan::Landmark::new(ex, ey - 0.2)));
    frame.insert(elbow, Some(romscan::Landmark::new(ex, ey)));
    frame.insert(
        wrist,
        Some(romscan::Landmark::new(
            ex + 0.2 * theta.sin(),
            ey - 0.2 * theta.cos(),
        )),
    );
}

/// Left elbow at the elbow-flexion threshold. The wrist is placed so the
/// computed angle is exactly 100.0, not the 99.99999999999999 that
/// `place_arm(.., 100.0)` yields.
fn left_elbow_at_threshold() -> LandmarkFrame {
    let mut frame = elbow_frame(100.0, f64::NAN);
    frame.insert(
        LeftWrist,
        Some(romscan::Landmark::new(0.4969615506024414, 0.534729635533386)),
    );
    frame
}

fn approx(value: Option<f64>, expected: f64) -> bool {
    value.map_or(false, |v| (v - expected).abs() < 1e-6)
}

#[test]
fn elbow_example_from_raw_samples() {
    let elbow = JointId::Elbow.definition();
    let left = compute_stats([90.0, 95.0, 100.0]);
    let right = compute_stats([70.0, 72.0]);

    assert_eq!((left.count, left.min, left.max, left.mean), (3, Some(90.0), Some(100.0), Some(95.0)));
    assert_eq!((right.count, right.min, right.max, right.mean), (2, Some(70.0), Some(72.0), Some(71.0)));
    assert_eq!(asymmetry(&left, &right), Some(28.0));

    let observations = generate_observations(elbow, &left, &right);
    assert_eq!(observations.len(), 2);
    assert!(observations[0].starts_with("Right Elbow Flexion limited"));
    assert!(observations[0].contains("72.0°"));
    assert!(observations[1].starts_with("Asymmetry detected"));
    assert!(observations[1].contains("28.0°"));
}

#[test]
fn elbow_example_through_a_session() {
    let mut session = SamplingSession::new(JointId::Elbow, 15);
    session.configure(JointId::Elbow, "P-100").unwrap();
    session.start().unwrap();

    session.feed_frame(&elbow_frame(90.0, 70.0));
    session.feed_frame(&elbow_frame(95.0, 72.0));
    session.feed_frame(&left_elbow_at_threshold());
    assert_eq!(session.samples(Side::Left).len(), 3);
    assert_eq!(session.samples(Side::Right).len(), 2);

    for _ in 0..15 {
        session.advance_one_second();
    }
    assert_eq!(session.status(), SessionStatus::Complete);

    let report = session.report().unwrap().clone();
    assert_eq!(report.patient_id, "P-100");
    assert_eq!(report.duration_secs, 15);
    assert_eq!(report.left.count, 3);
    assert!(approx(report.left.min, 90.0));
    assert_eq!(report.left.max, Some(100.0));
    assert!(approx(report.left.mean, 95.0));
    assert_eq!(report.right.count, 2);
    assert!(approx(report.right.mean, 71.0));
    assert!(approx(report.asymmetry, 28.0));
    assert_eq!(report.observations.len(), 2);
    assert!(report.observations[0].starts_with("Right"));
    assert!(report.observations[1].starts_with("Asymmetry"));

    // The report is a snapshot; resetting the session does not touch it.
    session.reset().unwrap();
    assert!(session.report().is_none());
    assert_eq!(report.left.count, 3);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["joint"], "elbow");
    assert_eq!(json["left"]["count"], 3);
    assert_eq!(json["observations"].as_array().map(Vec::len), Some(2));
    assert!(json["createdAt"].is_string());
}

#[test]
fn subject_out_of_frame_still_completes() {
    let mut session = SamplingSession::new(JointId::Knee, 15);
    session.start().unwrap();

    for _ in 0..15 {
        session.feed_frame(&LandmarkFrame::new());
        session.advance_one_second();
    }

    let report = session.report().unwrap();
    assert_eq!(report.left.count, 0);
    assert_eq!(report.right.count, 0);
    assert_eq!(report.left.max, None);
    assert_eq!(report.asymmetry, None);
    assert!(!report.observations.is_empty());
    assert!(report
        .observations
        .iter()
        .all(|o| !o.contains("within expected limits")));
}
