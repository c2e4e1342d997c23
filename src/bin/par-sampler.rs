use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use par_sampler::{
    config::{SamplerConfig, SamplerOpts},
    config_file::load_config_file,
    get_terminal_width::get_terminal_width,
    info,
    pipeline::run_pipeline,
    runner::SystemRunner,
    utillib::logging::{LogLevel, LogLevelOpt, set_log_level},
};

#[derive(clap::Parser, Debug)]
#[clap(next_line_help = true)]
#[clap(term_width = get_terminal_width(4))]
/// Sample the execution times of the SIMPLE, OPENMP and MPI variants
/// of a task for a range of thread/process counts, and plot the
/// times and the acceleration relative to SIMPLE.
///
/// Sampling data is kept in `<task>_<isize>_<jsize>_<samples>.json`
/// and reused on later runs unless `--overwrite` is given.
struct Opts {
    #[clap(flatten)]
    log_level: LogLevelOpt,

    /// Path to a config file (`.json5`, `.json`, `.yml` or `.yaml`)
    /// with defaults for the options below; options given on the
    /// command line take precedence
    #[clap(long)]
    config: Option<PathBuf>,

    #[clap(flatten)]
    sampler_opts: SamplerOpts,
}

fn main() -> Result<()> {
    let Opts {
        log_level,
        config,
        sampler_opts,
    } = Opts::parse();

    let log_level_given = log_level.is_given();
    let log_level = LogLevel::try_from(log_level)?;
    set_log_level(log_level);

    let mut sampler_config: SamplerConfig = if let Some(path) = &config {
        load_config_file(path)?
    } else {
        SamplerConfig::default()
    };
    if !log_level_given {
        set_log_level(sampler_config.log_level);
    }
    sampler_opts.apply_to(&mut sampler_config);

    let checked = sampler_config.check()?;
    let outcome = run_pipeline(&checked, SystemRunner)?;
    for chart in &outcome.charts {
        info!("chart: {chart:?}");
    }
    Ok(())
}
