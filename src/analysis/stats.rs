use serde::{Deserialize, Serialize};

/// Summary of one side's angle samples. With `count == 0` the extrema and
/// mean are `None`, never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideStats {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl SideStats {
    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}

/// Reduce angle samples (degrees) to count/min/max/mean.
///
/// Non-finite values are filtered out first. Values are summed in sorted
/// order so any permutation of the same samples gives identical stats.
pub fn compute_stats<I>(samples: I) -> SideStats
where
    I: IntoIterator<Item = f64>,
{
    let mut values: Vec<f64> = samples.into_iter().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return SideStats::default();
    }

    values.sort_by(f64::total_cmp);

    let count = values.len();
    let sum: f64 = values.iter().sum();

    SideStats {
        count,
        min: values.first().copied(),
        max: values.last().copied(),
        mean: Some(sum / count as f64),
    }
}
