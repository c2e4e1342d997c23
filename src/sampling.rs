//! The measurements of one full collection run, in the shape they
//! are persisted in.

use std::collections::BTreeMap;

use crate::task::Category;

/// Timing of one run in seconds, `None` if the run did not yield a
/// usable value.
pub type Sample = Option<f64>;

/// Samples per parallelism degree (thread or process count). The
/// map keeps degrees in ascending numeric order; in JSON the keys are
/// decimal strings.
pub type DegreeSamples = BTreeMap<u32, Vec<Sample>>;

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("'{0}' is the baseline, it has no per-degree samples")]
pub struct NotParallelError(pub Category);

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplingSet {
    /// The baseline never has missing values
    pub simple: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openmp: Option<DegreeSamples>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpi: Option<DegreeSamples>,
}

impl SamplingSet {
    /// The per-degree samples of a parallel category, `None` if that
    /// category was skipped when collecting (or for `Simple`).
    pub fn degree_samples(&self, category: Category) -> Option<&DegreeSamples> {
        match category {
            Category::Simple => None,
            Category::OpenMp => self.openmp.as_ref(),
            Category::Mpi => self.mpi.as_ref(),
        }
    }

    pub fn set_degree_samples(
        &mut self,
        category: Category,
        samples: DegreeSamples,
    ) -> Result<(), NotParallelError> {
        match category {
            Category::Simple => return Err(NotParallelError(category)),
            Category::OpenMp => self.openmp = Some(samples),
            Category::Mpi => self.mpi = Some(samples),
        }
        Ok(())
    }

    /// Describes every sequence whose length differs from `samples`;
    /// empty if the set is consistent with its sampling key.
    pub fn sample_count_mismatches(&self, samples: usize) -> Vec<String> {
        let mut problems = Vec::new();
        if self.simple.len() != samples {
            problems.push(format!(
                "{}: {} samples instead of {samples}",
                Category::Simple.store_field(),
                self.simple.len()
            ));
        }
        for category in Category::PARALLEL {
            if let Some(degree_samples) = self.degree_samples(category) {
                for (degree, values) in degree_samples {
                    if values.len() != samples {
                        problems.push(format!(
                            "{}[{degree}]: {} samples instead of {samples}",
                            category.store_field(),
                            values.len()
                        ));
                    }
                }
            }
        }
        problems
    }

    /// Number of missing samples over all categories.
    pub fn missing_count(&self) -> usize {
        Category::PARALLEL
            .iter()
            .filter_map(|category| self.degree_samples(*category))
            .flat_map(|degree_samples| degree_samples.values())
            .map(|values| values.iter().filter(|v| v.is_none()).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> SamplingSet {
        SamplingSet {
            simple: vec![2.0, 2.5],
            openmp: Some(BTreeMap::from([
                (1, vec![Some(2.0), Some(2.1)]),
                (2, vec![Some(1.0), None]),
            ])),
            mpi: None,
        }
    }

    #[test]
    fn t_json_shape() {
        let json = serde_json::to_value(set()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "simple": [2.0, 2.5],
                "openmp": { "1": [2.0, 2.1], "2": [1.0, null] }
            })
        );
    }

    #[test]
    fn t_reads_files_with_unordered_keys() {
        let s = r#"{
            "simple": [1.5],
            "mpi": { "10": [0.2], "2": [null], "4": [0.5] }
        }"#;
        let set: SamplingSet = serde_json::from_str(s).unwrap();
        assert!(set.openmp.is_none());
        let degrees: Vec<u32> = set.mpi.as_ref().unwrap().keys().copied().collect();
        assert_eq!(degrees, [2, 4, 10]);
    }

    #[test]
    fn t_sample_count_mismatches() {
        assert!(set().sample_count_mismatches(2).is_empty());
        let problems = set().sample_count_mismatches(3);
        assert_eq!(problems.len(), 3);
        assert_eq!(problems[1], "openmp[1]: 2 samples instead of 3");
    }

    #[test]
    fn t_set_degree_samples() {
        let mut set = set();
        let samples = BTreeMap::from([(3, vec![Some(0.7), Some(0.8)])]);
        set.set_degree_samples(Category::Mpi, samples.clone()).unwrap();
        assert_eq!(set.degree_samples(Category::Mpi), Some(&samples));
        assert_eq!(
            set.set_degree_samples(Category::Simple, samples),
            Err(NotParallelError(Category::Simple))
        );
        assert_eq!(set.simple, [2.0, 2.5]);
    }

    #[test]
    fn t_missing_count() {
        assert_eq!(set().missing_count(), 1);
    }
}
