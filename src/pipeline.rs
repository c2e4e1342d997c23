//! The sampler run: collect (or reuse) the sampling set of a task,
//! then render its charts.

use std::path::PathBuf;

use anyhow::Result;

use crate::{
    chart::ChartRenderer,
    collector::Collector,
    config::CheckedConfig,
    ctx, info,
    runner::RunProgram,
    sampling::SamplingSet,
    stats::baseline_mean,
    store::SamplingStore,
    warn,
};

#[derive(Debug)]
pub struct PipelineOutcome {
    /// Whether the sampling set was freshly collected (vs. loaded)
    pub collected: bool,
    pub store_path: PathBuf,
    /// Chart files written, empty if plotting was skipped
    pub charts: Vec<PathBuf>,
}

/// Runs the whole pipeline. `runner` is only used if the sampling set
/// has to be collected.
pub fn run_pipeline(config: &CheckedConfig, runner: impl RunProgram) -> Result<PipelineOutcome> {
    let CheckedConfig {
        identity,
        degrees,
        categories,
        executables,
        mpi_launcher,
        store_dir,
        output_dir,
        skip_plot,
        overwrite,
    } = config;

    let key = identity.sampling_key();
    let store = SamplingStore::new(store_dir);
    let store_path = store.path(&key);

    let collected = *overwrite || !store.exists(&key);
    let set: SamplingSet = if collected {
        info!("sampling data for {}", identity.name);
        info!("isize   = {}", identity.rows);
        info!("jsize   = {}", identity.cols);
        info!("threads = {degrees:?}");
        info!("samples = {}", identity.samples);
        let mut collector =
            Collector::new(runner, identity, executables, mpi_launcher.as_str());
        let set = collector.collect(categories, degrees)?;
        let missing = set.missing_count();
        if missing > 0 {
            warn!("{missing} samples could not be obtained, see `--debug` output for details");
        }
        store.save(&key, &set)?;
        set
    } else {
        info!("using existing sampling file {store_path:?}");
        let set = store.load(&key)?;
        for problem in set.sample_count_mismatches(identity.samples as usize) {
            warn!("sampling file {store_path:?}: {problem}");
        }
        set
    };

    let mut charts = Vec::new();
    if *skip_plot {
        info!("skipping charts");
        return Ok(PipelineOutcome {
            collected,
            store_path,
            charts,
        });
    }

    let baseline = baseline_mean(&set.simple).map_err(ctx!("sampling file {store_path:?}"))?;
    info!("baseline mean time: {baseline} s");
    let renderer = ChartRenderer::new(output_dir);
    for &category in categories {
        if let Some(samples) = set.degree_samples(category) {
            charts.extend(renderer.render_category(identity, category, baseline, samples)?);
        } else {
            warn!(
                "sampling file {store_path:?} has no '{}' data, it was collected with that \
                 category skipped; use `--overwrite` to sample it",
                category.store_field()
            );
        }
    }

    Ok(PipelineOutcome {
        collected,
        store_path,
        charts,
    })
}
