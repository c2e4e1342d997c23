//! Reducing the samples of a `SamplingSet` to the series that are
//! plotted: mean time per degree, and acceleration (speedup) relative
//! to the baseline.

pub mod average;

use crate::{sampling::DegreeSamples, stats::average::Average};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StatsError {
    #[error("the baseline has no samples")]
    NoBaselineSamples,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Thread or process count
    pub degree: u32,
    pub value: f64,
}

/// Points in ascending order of degree, each degree at most once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series(Vec<SeriesPoint>);

impl Series {
    pub fn points(&self) -> &[SeriesPoint] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn degrees(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().map(|p| p.degree)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|p| p.value)
    }
}

impl FromIterator<SeriesPoint> for Series {
    fn from_iter<T: IntoIterator<Item = SeriesPoint>>(iter: T) -> Self {
        let mut points: Vec<SeriesPoint> = iter.into_iter().collect();
        points.sort_by_key(|p| p.degree);
        points.dedup_by_key(|p| p.degree);
        Series(points)
    }
}

pub fn baseline_mean(simple: &[f64]) -> Result<f64, StatsError> {
    simple.average().ok_or(StatsError::NoBaselineSamples)
}

/// Mean time per degree. Degrees with any missing sample (or no
/// samples at all) are left out.
pub fn mean_series(samples: &DegreeSamples) -> Series {
    samples
        .iter()
        .filter_map(|(degree, values)| {
            Some(SeriesPoint {
                degree: *degree,
                value: values.as_slice().average()?,
            })
        })
        .collect()
}

/// `baseline_mean / mean` for every point of `means`. Points with a
/// mean of zero would have infinite acceleration and are left out.
pub fn acceleration_series(baseline_mean: f64, means: &Series) -> Series {
    means
        .points()
        .iter()
        .filter(|p| p.value > 0.)
        .map(|p| SeriesPoint {
            degree: p.degree,
            value: baseline_mean / p.value,
        })
        .collect()
}
