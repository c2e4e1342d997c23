//! Sampler configuration: defaults, optional config file, command
//! line overrides, and validation into a `CheckedConfig`.

use std::path::PathBuf;

use kstring::KString;

use crate::{
    task::{Category, Executables, TaskIdentity, task_name_problem},
    utillib::logging::LogLevel,
};

/// The degrees sampled if none are given: 1 through 8.
pub fn default_degrees() -> Vec<u32> {
    (1..=8).collect()
}

/// All settings of a sampler run, as read from a config file. Every
/// field is optional in the file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SamplerConfig {
    /// Rows of the problem matrix
    pub isize: u32,
    /// Columns of the problem matrix
    pub jsize: u32,
    /// Thread counts (OpenMP) and process counts (MPI) to sample
    pub threads: Vec<u32>,
    /// Runs per configuration
    pub samples: u32,
    /// Directory holding the task executables
    pub build: PathBuf,
    pub task: KString,
    pub skip_openmp: bool,
    pub skip_mpi: bool,
    pub skip_plot: bool,
    /// Collect again even if a sampling store for the task exists
    pub overwrite: bool,
    pub log_level: LogLevel,
    /// Appended to the executable names, e.g. ".elf" or ".exe"
    pub exe_suffix: String,
    /// Launcher for the MPI executable, called as `<launcher> -np N`
    pub mpi_launcher: String,
    /// Where sampling stores are kept
    pub store_dir: PathBuf,
    /// Where charts are written
    pub output_dir: PathBuf,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            isize: 10000,
            jsize: 10000,
            threads: default_degrees(),
            samples: 10,
            build: "build/".into(),
            task: KString::from_static("TASK1"),
            skip_openmp: false,
            skip_mpi: false,
            skip_plot: false,
            overwrite: false,
            log_level: LogLevel::Warn,
            exe_suffix: ".elf".into(),
            mpi_launcher: "mpirun".into(),
            store_dir: ".".into(),
            output_dir: ".".into(),
        }
    }
}

/// Command line options, overriding the corresponding config file
/// values (or defaults) when given.
#[derive(Debug, Default, clap::Args)]
pub struct SamplerOpts {
    /// Amount of rows in matrix (default is 10000)
    #[clap(long)]
    pub isize: Option<u32>,

    /// Amount of columns in matrix (default is 10000)
    #[clap(long)]
    pub jsize: Option<u32>,

    /// List of thread amounts (and MPI process amounts) for sampling
    /// (default is 1 2 3 4 5 6 7 8)
    #[clap(long, num_args = 1..)]
    pub threads: Option<Vec<u32>>,

    /// Amount of samples for each observation (default is 10)
    #[clap(long)]
    pub samples: Option<u32>,

    /// Path to build directory (default is "build/")
    #[clap(long)]
    pub build: Option<PathBuf>,

    /// Task to sample (default is "TASK1")
    #[clap(long)]
    pub task: Option<String>,

    /// Skip sampling (and plotting) of MPI
    #[clap(long)]
    pub skip_mpi: bool,

    /// Skip sampling (and plotting) of OpenMP
    #[clap(long)]
    pub skip_openmp: bool,

    /// Skip creation of the charts
    #[clap(long)]
    pub skip_plot: bool,

    /// Overwrite existing sampling data instead of using it
    #[clap(long)]
    pub overwrite: bool,

    /// Suffix of the executable file names (default is ".elf")
    #[clap(long)]
    pub exe_suffix: Option<String>,

    /// Program used to start the MPI executable (default is "mpirun")
    #[clap(long)]
    pub mpi_launcher: Option<String>,

    /// Directory for the sampling data files (default is the
    /// current directory)
    #[clap(long)]
    pub store_dir: Option<PathBuf>,

    /// Directory for the chart files (default is the current
    /// directory)
    #[clap(long)]
    pub output_dir: Option<PathBuf>,
}

impl SamplerOpts {
    pub fn apply_to(self, config: &mut SamplerConfig) {
        let Self {
            isize,
            jsize,
            threads,
            samples,
            build,
            task,
            skip_mpi,
            skip_openmp,
            skip_plot,
            overwrite,
            exe_suffix,
            mpi_launcher,
            store_dir,
            output_dir,
        } = self;
        if let Some(isize) = isize {
            config.isize = isize;
        }
        if let Some(jsize) = jsize {
            config.jsize = jsize;
        }
        if let Some(threads) = threads {
            config.threads = threads;
        }
        if let Some(samples) = samples {
            config.samples = samples;
        }
        if let Some(build) = build {
            config.build = build;
        }
        if let Some(task) = task {
            config.task = KString::from(task);
        }
        config.skip_mpi |= skip_mpi;
        config.skip_openmp |= skip_openmp;
        config.skip_plot |= skip_plot;
        config.overwrite |= overwrite;
        if let Some(exe_suffix) = exe_suffix {
            config.exe_suffix = exe_suffix;
        }
        if let Some(mpi_launcher) = mpi_launcher {
            config.mpi_launcher = mpi_launcher;
        }
        if let Some(store_dir) = store_dir {
            config.store_dir = store_dir;
        }
        if let Some(output_dir) = output_dir {
            config.output_dir = output_dir;
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be at least 1")]
    Zero { name: &'static str },
    #[error("the list of thread/process counts is empty")]
    NoDegrees,
    #[error("thread/process count 0 is not possible")]
    ZeroDegree,
    #[error("task name {name:?} {problem}")]
    InvalidTaskName { name: String, problem: &'static str },
}

/// A validated `SamplerConfig`, in the shape the pipeline uses.
#[derive(Debug, Clone)]
pub struct CheckedConfig {
    pub identity: TaskIdentity,
    /// Non-empty, without duplicates, in the order given
    pub degrees: Vec<u32>,
    /// The parallel categories to sample and plot
    pub categories: Vec<Category>,
    pub executables: Executables,
    pub mpi_launcher: String,
    pub store_dir: PathBuf,
    pub output_dir: PathBuf,
    pub skip_plot: bool,
    pub overwrite: bool,
}

impl SamplerConfig {
    pub fn check(self) -> Result<CheckedConfig, ConfigError> {
        let Self {
            isize,
            jsize,
            threads,
            samples,
            build,
            task,
            skip_openmp,
            skip_mpi,
            skip_plot,
            overwrite,
            log_level: _,
            exe_suffix,
            mpi_launcher,
            store_dir,
            output_dir,
        } = self;

        for (name, value) in [("isize", isize), ("jsize", jsize), ("samples", samples)] {
            if value == 0 {
                return Err(ConfigError::Zero { name });
            }
        }
        if let Some(problem) = task_name_problem(&task) {
            return Err(ConfigError::InvalidTaskName {
                name: task.to_string(),
                problem,
            });
        }
        if threads.is_empty() {
            return Err(ConfigError::NoDegrees);
        }
        if threads.contains(&0) {
            return Err(ConfigError::ZeroDegree);
        }
        let mut degrees: Vec<u32> = Vec::with_capacity(threads.len());
        for degree in threads {
            if !degrees.contains(&degree) {
                degrees.push(degree);
            }
        }

        let categories = Category::PARALLEL
            .into_iter()
            .filter(|category| match category {
                Category::OpenMp => !skip_openmp,
                Category::Mpi => !skip_mpi,
                Category::Simple => false,
            })
            .collect();

        Ok(CheckedConfig {
            identity: TaskIdentity {
                name: task.clone(),
                rows: isize,
                cols: jsize,
                samples,
            },
            degrees,
            categories,
            executables: Executables {
                build_dir: build,
                task_name: task,
                suffix: exe_suffix,
            },
            mpi_launcher,
            store_dir,
            output_dir,
            skip_plot,
            overwrite,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::ConfigBackend;

    #[test]
    fn t_defaults() {
        let config = SamplerConfig::default().check().unwrap();
        assert_eq!(config.identity.sampling_key().as_str(), "TASK1_10000_10000_10");
        assert_eq!(config.degrees, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(config.categories, [Category::OpenMp, Category::Mpi]);
        assert!(!config.skip_plot);
        assert!(!config.overwrite);
    }

    #[test]
    fn t_default_degrees_are_fresh() {
        let mut a = SamplerConfig::default();
        a.threads.push(16);
        assert_eq!(SamplerConfig::default().threads, default_degrees());
    }

    #[test]
    fn t_degrees_deduplicated_in_given_order() {
        let config = SamplerConfig {
            threads: vec![4, 1, 4, 2, 1],
            ..Default::default()
        };
        assert_eq!(config.check().unwrap().degrees, [4, 1, 2]);
    }

    #[test]
    fn t_skip_flags() {
        let config = SamplerConfig {
            skip_mpi: true,
            ..Default::default()
        };
        assert_eq!(config.check().unwrap().categories, [Category::OpenMp]);
        let config = SamplerConfig {
            skip_mpi: true,
            skip_openmp: true,
            ..Default::default()
        };
        assert!(config.check().unwrap().categories.is_empty());
    }

    #[test]
    fn t_invalid() {
        let check = |config: SamplerConfig| config.check().err();
        assert_eq!(
            check(SamplerConfig {
                samples: 0,
                ..Default::default()
            }),
            Some(ConfigError::Zero { name: "samples" })
        );
        assert_eq!(
            check(SamplerConfig {
                threads: vec![],
                ..Default::default()
            }),
            Some(ConfigError::NoDegrees)
        );
        assert_eq!(
            check(SamplerConfig {
                threads: vec![2, 0],
                ..Default::default()
            }),
            Some(ConfigError::ZeroDegree)
        );
        assert!(matches!(
            check(SamplerConfig {
                task: KString::from_static("../x"),
                ..Default::default()
            }),
            Some(ConfigError::InvalidTaskName { .. })
        ));
    }

    #[test]
    fn t_opts_override() {
        let mut config = SamplerConfig {
            samples: 3,
            skip_mpi: true,
            ..Default::default()
        };
        SamplerOpts {
            isize: Some(100),
            threads: Some(vec![2, 4]),
            task: Some("TASK3".into()),
            overwrite: true,
            ..Default::default()
        }
        .apply_to(&mut config);
        assert_eq!(config.isize, 100);
        assert_eq!(config.jsize, 10000);
        assert_eq!(config.samples, 3);
        assert_eq!(config.threads, [2, 4]);
        assert_eq!(config.task.as_str(), "TASK3");
        assert!(config.skip_mpi);
        assert!(config.overwrite);
    }

    #[test]
    fn t_config_file_formats() {
        let json5: SamplerConfig = ConfigBackend::Json5
            .parse("{ task: 'TASK2', threads: [1, 2, 4], skip_plot: true, log_level: 'info' }")
            .unwrap();
        assert_eq!(json5.task.as_str(), "TASK2");
        assert_eq!(json5.threads, [1, 2, 4]);
        assert!(json5.skip_plot);
        assert_eq!(json5.log_level, LogLevel::Info);
        assert_eq!(json5.samples, 10);

        let yaml: SamplerConfig = ConfigBackend::Yaml
            .parse("isize: 500\njsize: 20\nmpi_launcher: mpiexec\n")
            .unwrap();
        assert_eq!(yaml.isize, 500);
        assert_eq!(yaml.jsize, 20);
        assert_eq!(yaml.mpi_launcher, "mpiexec");

        assert!(
            ConfigBackend::Json5
                .parse::<SamplerConfig>("{ sampels: 3 }")
                .is_err()
        );
    }
}
