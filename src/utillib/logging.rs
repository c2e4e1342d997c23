//! Leveled logging to stderr. Sampling runs can take hours, hence
//! every line carries a timestamp.

use std::{
    io::{StderrLock, Write, stderr},
    sync::atomic::{AtomicU8, Ordering},
    time::SystemTime,
};

use anyhow::{Result, bail};
use chrono::{DateTime, Local};

fn system_time_to_rfc3339(t: SystemTime) -> String {
    let t: DateTime<Local> = DateTime::from(t);
    t.to_rfc3339()
}

pub fn write_time(file: &str, line: u32, column: u32) -> StderrLock<'static> {
    let t_str = system_time_to_rfc3339(SystemTime::now());
    let mut lock = stderr().lock();
    write!(&mut lock, "{t_str}\t{file}:{line}:{column}\t").expect("stderr must not fail");
    lock
}

// Do *not* make the fields public here to force going through `TryFrom`.
#[derive(Debug, Default, clap::Args)]
pub struct LogLevelOpt {
    /// Show what is being done (sampling parameters, executables,
    /// progress per thread/process count)
    #[clap(short, long)]
    verbose: bool,

    /// Show information that helps debug this program, e.g. every
    /// command line executed (implies `--verbose`)
    #[clap(short, long)]
    debug: bool,

    /// Disable warnings. Conflicts with `--verbose` and `--debug`.
    #[clap(short, long)]
    quiet: bool,
}

impl LogLevelOpt {
    /// Whether any of the options was given, i.e. whether the log
    /// level from a config file should be overridden.
    pub fn is_given(&self) -> bool {
        let Self {
            verbose,
            debug,
            quiet,
        } = self;
        *verbose || *debug || *quiet
    }
}

impl TryFrom<LogLevelOpt> for LogLevel {
    type Error = anyhow::Error;

    fn try_from(value: LogLevelOpt) -> Result<Self> {
        match value {
            LogLevelOpt {
                verbose: false,
                debug: false,
                quiet: false,
            } => Ok(LogLevel::Warn),
            LogLevelOpt {
                verbose: true,
                debug: false,
                quiet: false,
            } => Ok(LogLevel::Info),
            LogLevelOpt {
                verbose: _,
                debug: true,
                quiet: false,
            } => Ok(LogLevel::Debug),
            LogLevelOpt {
                verbose: false,
                debug: false,
                quiet: true,
            } => Ok(LogLevel::Quiet),
            LogLevelOpt {
                verbose: _,
                debug: _,
                quiet: true,
            } => bail!("option `--quiet` conflicts with the options `--verbose` and `--debug`"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Do not log anything
    Quiet,
    /// The default, only `warn!` statements output anything
    #[default]
    Warn,
    /// Verbose execution, for the user to follow the sampling
    Info,
    /// Highest amount of log statements, for debugging this program
    Debug,
}

impl LogLevel {
    // Not public api, only for sorting or comparisons!
    fn level(self) -> u8 {
        self as u8
    }

    fn from_level(level: u8) -> Option<Self> {
        let slf = match level {
            0 => Some(LogLevel::Quiet),
            1 => Some(LogLevel::Warn),
            2 => Some(LogLevel::Info),
            3 => Some(LogLevel::Debug),
            _ => None,
        }?;
        assert_eq!(slf.level(), level);
        Some(slf)
    }
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.level().cmp(&other.level())
    }
}

pub static LOGLEVEL: AtomicU8 = AtomicU8::new(1);

pub fn set_log_level(val: LogLevel) {
    LOGLEVEL.store(val.level(), Ordering::Relaxed);
}

#[inline]
pub fn log_level() -> LogLevel {
    let level = LOGLEVEL.load(Ordering::Relaxed);
    LogLevel::from_level(level).expect("no possibility to store invalid u8")
}

#[macro_export]
macro_rules! warn {
    { $($arg:tt)* } => {
        if $crate::utillib::logging::log_level() >= $crate::utillib::logging::LogLevel::Warn {
            use std::io::Write;
            let mut lock = $crate::utillib::logging::write_time(file!(), line!(), column!());
            writeln!(&mut lock, $($arg)*).expect("stderr must not fail");
        }
    }
}

#[macro_export]
macro_rules! info {
    { $($arg:tt)* } => {
        if $crate::utillib::logging::log_level() >= $crate::utillib::logging::LogLevel::Info {
            use std::io::Write;
            let mut lock = $crate::utillib::logging::write_time(file!(), line!(), column!());
            writeln!(&mut lock, $($arg)*).expect("stderr must not fail");
        }
    }
}

#[macro_export]
macro_rules! debug {
    { $($arg:tt)* } => {
        if $crate::utillib::logging::log_level() >= $crate::utillib::logging::LogLevel::Debug {
            use std::io::Write;
            let mut lock = $crate::utillib::logging::write_time(file!(), line!(), column!());
            writeln!(&mut lock, $($arg)*).expect("stderr must not fail");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_levels() {
        for i in 0..=3 {
            assert!(LogLevel::from_level(i).is_some());
        }
        assert!(LogLevel::from_level(4).is_none());
        assert!(LogLevel::Debug > LogLevel::Info);
        assert!(LogLevel::Quiet < LogLevel::Warn);
        assert_eq!(LogLevel::default(), LogLevel::Warn);
    }

    #[test]
    fn t_log_level_opt() {
        let opt = |verbose, debug, quiet| LogLevelOpt {
            verbose,
            debug,
            quiet,
        };
        assert!(LogLevel::try_from(opt(false, false, false)).unwrap() == LogLevel::Warn);
        assert!(LogLevel::try_from(opt(true, false, false)).unwrap() == LogLevel::Info);
        assert!(LogLevel::try_from(opt(true, true, false)).unwrap() == LogLevel::Debug);
        assert!(LogLevel::try_from(opt(false, false, true)).unwrap() == LogLevel::Quiet);
        assert!(LogLevel::try_from(opt(true, false, true)).is_err());
        assert!(!opt(false, false, false).is_given());
        assert!(opt(false, true, false).is_given());
    }
}
