//! Launching the benchmarked executables. The collector only depends
//! on the `RunProgram` trait, so that tests can count or fake the
//! invocations.

use std::{
    ffi::OsString,
    fmt::Display,
    process::{Command, Stdio},
};

use anyhow::Result;

use crate::{ctx, io_utils::bash::bash_string_from_program_and_args};

/// A program with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn to_bash_string(&self) -> String {
        bash_string_from_program_and_args(&self.program, &self.args)
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_bash_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// Whether the program exited with status 0
    pub success: bool,
    /// Human readable exit status, e.g. "exit status: 1"
    pub status: String,
    /// Standard output, decoded lossily as UTF-8
    pub stdout: String,
}

pub trait RunProgram {
    /// Run `invocation` to completion and capture its standard
    /// output. An `Err` means the program could not be started (or
    /// waited for), a failing program is reported via
    /// `RunOutput::success`.
    fn run(&mut self, invocation: &Invocation) -> Result<RunOutput>;
}

/// Runs programs as child processes, one at a time. Stdin is closed,
/// stderr is passed through to our own stderr.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl RunProgram for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<RunOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(ctx!("running {invocation}"))?;
        Ok(RunOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

impl<R: RunProgram + ?Sized> RunProgram for &mut R {
    fn run(&mut self, invocation: &Invocation) -> Result<RunOutput> {
        (**self).run(invocation)
    }
}
