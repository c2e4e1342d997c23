//! What is being benchmarked: the task identity (which also names
//! the sampling store) and the three executable variants of a task.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use kstring::KString;

/// The execution strategy of one executable variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum_macros::Display)]
pub enum Category {
    /// The serial baseline
    #[strum(to_string = "SIMPLE")]
    Simple,
    /// Shared-memory parallelism, degree = thread count
    #[strum(to_string = "OPENMP")]
    OpenMp,
    /// Distributed-memory parallelism, degree = process count
    #[strum(to_string = "MPI")]
    Mpi,
}

impl Category {
    /// The categories that are sampled per degree, in sampling order.
    pub const PARALLEL: [Category; 2] = [Category::OpenMp, Category::Mpi];

    /// The field name in the persisted sampling set.
    pub fn store_field(self) -> &'static str {
        match self {
            Category::Simple => "simple",
            Category::OpenMp => "openmp",
            Category::Mpi => "mpi",
        }
    }

    /// What the degree counts, for messages and chart axes.
    pub fn degree_unit(self) -> &'static str {
        match self {
            Category::Simple => "runs",
            Category::OpenMp => "threads",
            Category::Mpi => "processes",
        }
    }
}

/// The parameters that make a sampling run unique. The degree list
/// and the skip options are not part of it, a store collected with a
/// different degree list is reused as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskIdentity {
    pub name: KString,
    pub rows: u32,
    pub cols: u32,
    pub samples: u32,
}

impl TaskIdentity {
    pub fn sampling_key(&self) -> SamplingKey {
        let Self {
            name,
            rows,
            cols,
            samples,
        } = self;
        SamplingKey(format!("{name}_{rows}_{cols}_{samples}"))
    }

    /// The base name used for charts of `category`, e.g. `TASK1_MPI`.
    pub fn chart_base_name(&self, category: Category) -> String {
        format!("{}_{category}", self.name)
    }
}

/// Names the persisted sampling store of a `TaskIdentity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingKey(String);

impl SamplingKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl Display for SamplingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns an explanation if `name` can't be used as part of a file
/// name: it must be non-empty, must not start with a `.` (used for
/// temporary files), and must not contain `/` or `\0`.
pub fn task_name_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("is empty")
    } else if name.starts_with('.') {
        Some("starts with a '.'")
    } else if name.contains('/') || name.contains('\0') {
        Some("contains '/' or '\\0'")
    } else if name.len() > 200 {
        Some("is longer than 200 bytes")
    } else {
        None
    }
}

/// Locates the executables of a task in the build directory:
/// `<build_dir>/<task>_<CATEGORY><suffix>`.
#[derive(Debug, Clone)]
pub struct Executables {
    pub build_dir: PathBuf,
    pub task_name: KString,
    /// Platform specific extension, e.g. ".elf" or ".exe", may be empty
    pub suffix: String,
}

impl Executables {
    pub fn path(&self, category: Category) -> PathBuf {
        let Self {
            build_dir,
            task_name,
            suffix,
        } = self;
        build_dir.join(format!("{task_name}_{category}{suffix}"))
    }

    pub fn exists(&self, category: Category) -> bool {
        is_file(&self.path(category))
    }
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}
