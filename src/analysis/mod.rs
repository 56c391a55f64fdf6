pub mod observations;
pub mod stats;

pub use observations::{
    asymmetry, generate_findings, generate_observations, Finding, ASYMMETRY_THRESHOLD_DEGREES,
};
pub use stats::{compute_stats, SideStats};
