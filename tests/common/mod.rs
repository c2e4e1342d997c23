#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::Result;
use par_sampler::runner::{Invocation, RunOutput, RunProgram};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A fresh directory below the system temp dir, removed with its
/// contents on drop.
pub struct TestDir {
    path: PathBuf,
}

impl TestDir {
    pub fn new(name: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "par-sampler-test-{}-{n}-{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).expect("creating test dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Sorted names of the files in the directory.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.path)
            .expect("reading test dir")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Pretends to be the task executables: the baseline takes 2 s, the
/// parallel variants scale perfectly (2 s / degree). Records every
/// invocation.
#[derive(Default)]
pub struct FakeTask {
    pub seen: Vec<Invocation>,
}

impl FakeTask {
    pub fn seen_strings(&self) -> Vec<String> {
        self.seen.iter().map(|inv| inv.to_string()).collect()
    }
}

fn arg(invocation: &Invocation, i: usize) -> u32 {
    invocation.args[i]
        .to_str()
        .expect("utf-8")
        .parse()
        .expect("numeric argument")
}

impl RunProgram for FakeTask {
    fn run(&mut self, invocation: &Invocation) -> Result<RunOutput> {
        self.seen.push(invocation.clone());
        let program = invocation.program.to_string_lossy().into_owned();
        let stdout = if program.ends_with("_SIMPLE.elf") {
            "2.0\n".to_string()
        } else if program.ends_with("_OPENMP.elf") {
            let threads = arg(invocation, 2);
            format!("running with {threads} threads\n{}\n\n", 2.0 / f64::from(threads))
        } else {
            // `mpirun -np N exe rows cols`
            let np = arg(invocation, 1);
            format!("{}\n\n", 2.0 / f64::from(np))
        };
        Ok(RunOutput {
            success: true,
            status: "exit status: 0".into(),
            stdout,
        })
    }
}
