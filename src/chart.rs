//! Rendering time and acceleration charts as SVG files.

use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::{
    coord::combinators::BindKeyPoints, drawing::DrawingAreaErrorKind, prelude::*,
};

use crate::{
    ctx, info,
    stats::{Series, acceleration_series, mean_series},
    sampling::DegreeSamples,
    task::{Category, TaskIdentity},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Mean time in seconds per degree
    Time,
    /// Baseline mean divided by mean time per degree
    Acceleration,
}

impl ChartKind {
    pub fn file_suffix(self) -> &'static str {
        match self {
            ChartKind::Time => "time",
            ChartKind::Acceleration => "acceleration",
        }
    }

    fn title_prefix(self) -> &'static str {
        match self {
            ChartKind::Time => "Time",
            ChartKind::Acceleration => "Acceleration",
        }
    }

    fn y_desc(self) -> &'static str {
        match self {
            ChartKind::Time => "Time in seconds",
            ChartKind::Acceleration => "Acceleration (baseline time / time)",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartRenderer {
    pub output_dir: PathBuf,
    /// Image size in pixels
    pub size: (u32, u32),
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            size: (1600, 1000),
        }
    }

    /// `<output_dir>/<base_name>_<kind>.svg`
    pub fn chart_path(&self, base_name: &str, kind: ChartKind) -> PathBuf {
        self.output_dir
            .join(format!("{base_name}_{}.svg", kind.file_suffix()))
    }

    /// Writes the time and the acceleration chart for one category,
    /// returns their paths in that order.
    pub fn render_category(
        &self,
        identity: &TaskIdentity,
        category: Category,
        baseline_mean: f64,
        samples: &DegreeSamples,
    ) -> Result<[PathBuf; 2]> {
        let base_name = identity.chart_base_name(category);
        let means = mean_series(samples);
        let accelerations = acceleration_series(baseline_mean, &means);
        if means.points().len() < samples.len() {
            info!(
                "{base_name}: {} of {} configurations have missing samples and are not shown",
                samples.len() - means.points().len(),
                samples.len()
            );
        }
        Ok([
            self.render(&base_name, category, ChartKind::Time, &means)?,
            self.render(&base_name, category, ChartKind::Acceleration, &accelerations)?,
        ])
    }

    pub fn render(
        &self,
        base_name: &str,
        category: Category,
        kind: ChartKind,
        series: &Series,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(ctx!("creating chart directory {:?}", self.output_dir))?;
        let path = self.chart_path(base_name, kind);
        let title = format!("{} for {base_name}", kind.title_prefix());
        let x_desc = format!("Number of {}", category.degree_unit());
        self.draw(&path, &title, &x_desc, kind.y_desc(), series)
            .map_err(ctx!("drawing chart {path:?}"))?;
        info!("wrote chart {path:?}");
        Ok(path)
    }

    fn draw(
        &self,
        path: &Path,
        title: &str,
        x_desc: &str,
        y_desc: &str,
        series: &Series,
    ) -> Result<(), DrawingAreaErrorKind<std::io::Error>> {
        let root = SVGBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let degrees: Vec<u32> = series.degrees().collect();
        let x_range = match (degrees.first(), degrees.last()) {
            (Some(lo), Some(hi)) => lo.saturating_sub(1)..hi.saturating_add(1),
            _ => 0..1,
        };
        let y_max = series.values().fold(0., f64::max);
        let y_hi = if y_max > 0. { y_max * 1.1 } else { 1. };

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 32))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range.with_key_points(degrees.clone()), 0f64..y_hi)?;

        // Only the sampled degrees get a tick
        chart
            .configure_mesh()
            .x_labels(degrees.len().max(1))
            .x_label_formatter(&|x| x.to_string())
            .y_label_formatter(&|y| format!("{y:.2}"))
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()?;

        chart.draw_series(
            series
                .points()
                .iter()
                .map(|p| Circle::new((p.degree, p.value), 6, BLACK.filled())),
        )?;

        root.present()?;
        Ok(())
    }
}
