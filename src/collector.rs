//! Collecting a `SamplingSet` by running the task's executables.

use std::{ffi::OsString, path::PathBuf};

use anyhow::Result;

use crate::{
    ctx, debug, info,
    runner::{Invocation, RunProgram},
    sampling::{DegreeSamples, Sample, SamplingSet},
    task::{Category, Executables, TaskIdentity},
    timing_output::OutputContract,
    warn,
};

/// Without the baseline no acceleration can be computed, hence its
/// absence aborts the collection.
#[derive(thiserror::Error, Debug)]
#[error("baseline executable {0:?} not found")]
pub struct MissingBaselineError(pub PathBuf);

pub struct Collector<'t, R: RunProgram> {
    runner: R,
    identity: &'t TaskIdentity,
    executables: &'t Executables,
    /// Program used to start the MPI variant, e.g. "mpirun"
    mpi_launcher: OsString,
}

impl<'t, R: RunProgram> Collector<'t, R> {
    pub fn new(
        runner: R,
        identity: &'t TaskIdentity,
        executables: &'t Executables,
        mpi_launcher: impl Into<OsString>,
    ) -> Self {
        Self {
            runner,
            identity,
            executables,
            mpi_launcher: mpi_launcher.into(),
        }
    }

    /// The command line for one run of `category`; `degree` is
    /// ignored for `Simple`.
    pub fn invocation(&self, category: Category, degree: u32) -> Invocation {
        let TaskIdentity { rows, cols, .. } = self.identity;
        let exe = self.executables.path(category);
        match category {
            Category::Simple => Invocation::new(exe)
                .arg(rows.to_string())
                .arg(cols.to_string()),
            Category::OpenMp => Invocation::new(exe)
                .arg(rows.to_string())
                .arg(cols.to_string())
                .arg(degree.to_string()),
            Category::Mpi => Invocation::new(&self.mpi_launcher)
                .arg("-np")
                .arg(degree.to_string())
                .arg(exe)
                .arg(rows.to_string())
                .arg(cols.to_string()),
        }
    }

    /// Collect the baseline and every category in `categories` (which
    /// must not contain `Simple`) for each of `degrees`.
    pub fn collect(&mut self, categories: &[Category], degrees: &[u32]) -> Result<SamplingSet> {
        let simple = self.collect_baseline()?;
        let mut set = SamplingSet {
            simple,
            openmp: None,
            mpi: None,
        };
        for &category in categories {
            let samples = self.collect_parallel(category, degrees);
            set.set_degree_samples(category, samples)?;
        }
        Ok(set)
    }

    /// Fails if the baseline executable is missing, or if any of its
    /// runs can't be started or gives unusable output. The exit status
    /// is only logged.
    pub fn collect_baseline(&mut self) -> Result<Vec<f64>> {
        let exe = self.executables.path(Category::Simple);
        info!("sampling 'simple' with executable {exe:?}");
        if !self.executables.exists(Category::Simple) {
            return Err(MissingBaselineError(exe).into());
        }

        let samples = self.identity.samples;
        let invocation = self.invocation(Category::Simple, 1);
        let contract = OutputContract::for_category(Category::Simple);
        let mut values = Vec::with_capacity(samples as usize);
        for i in 0..samples {
            debug!("sample {}/{samples}: {invocation}", i + 1);
            let output = self.runner.run(&invocation)?;
            if !output.success {
                warn!("baseline run {invocation} exited with {}", output.status);
            }
            let value = contract
                .parse(&output.stdout)
                .map_err(ctx!("baseline run {invocation} ({})", output.status))?;
            values.push(value);
        }
        Ok(values)
    }

    /// Never fails: runs that can't be started or whose output can't
    /// be parsed are recorded as missing samples, whatever their exit
    /// status.
    pub fn collect_parallel(&mut self, category: Category, degrees: &[u32]) -> DegreeSamples {
        let exe = self.executables.path(category);
        info!(
            "sampling '{}' with executable {exe:?}",
            category.store_field()
        );
        if !self.executables.exists(category) {
            warn!(
                "executable {exe:?} not found, all '{}' samples will be missing",
                category.store_field()
            );
        }

        let samples = self.identity.samples;
        let mut result = DegreeSamples::new();
        for &degree in degrees {
            info!("sampling with {degree} {}", category.degree_unit());
            let invocation = self.invocation(category, degree);
            let values: Vec<Sample> = (0..samples)
                .map(|i| {
                    debug!("sample {}/{samples}: {invocation}", i + 1);
                    self.sample_once(category, &invocation)
                })
                .collect();
            let missing = values.iter().filter(|v| v.is_none()).count();
            if missing > 0 {
                info!(
                    "{missing} of {samples} samples missing for {degree} {}",
                    category.degree_unit()
                );
            }
            result.insert(degree, values);
        }
        result
    }

    fn sample_once(&mut self, category: Category, invocation: &Invocation) -> Sample {
        let output = match self.runner.run(invocation) {
            Ok(output) => output,
            Err(e) => {
                debug!("missing sample: {e:#}");
                return None;
            }
        };
        if !output.success {
            debug!("{invocation} exited with {}", output.status);
        }
        match OutputContract::for_category(category).parse(&output.stdout) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(
                    "missing sample: output of {invocation} ({}): {e}",
                    output.status
                );
                None
            }
        }
    }

    pub fn into_runner(self) -> R {
        self.runner
    }
}
