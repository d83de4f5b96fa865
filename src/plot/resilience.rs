//! Violin and performance-retention figures for one injection.

use std::error::Error;
use std::fs;
use std::iter;
use std::path::Path;

use plotters::prelude::*;
use tracing::{info, warn};

use super::{PlotError, PlottingMode, CB_COLOR_CYCLE};
use crate::evaluation::PolicyEvaluation;
use crate::stats::{kde, Density, PerformanceRetention, RewardSummary};

type DrawResult = Result<(), Box<dyn Error + Send + Sync>>;

const VIOLIN_HALF_WIDTH: f64 = 0.35;

/// Titles and size of a resilience figure.
#[derive(Debug, Clone)]
pub struct ResilienceFigure {
    /// Scenario title, drawn above the chart.
    pub figure_title: String,
    /// Injection title, drawn as the chart caption.
    pub inject_title: String,
    pub n_episodes: usize,
    pub size: (u32, u32),
}

impl ResilienceFigure {
    pub fn new(
        figure_title: impl Into<String>,
        inject_title: impl Into<String>,
        n_episodes: usize,
    ) -> Self {
        Self {
            figure_title: figure_title.into(),
            inject_title: inject_title.into(),
            n_episodes,
            size: (1600, 900),
        }
    }
}

/// Draws one category per policy and writes an SVG to `path`.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// [`PlotError::Empty`] if no policy has rewards, and
/// [`PlotError::MissingRuns`] in [`PlottingMode::PerformanceMaintained`] when
/// a policy lacks its baseline or injected run. A policy whose retention is
/// undefined (zero baseline) is drawn without markers.
pub fn draw_resilience(
    path: &Path,
    figure: &ResilienceFigure,
    evaluations: &[PolicyEvaluation],
    mode: PlottingMode,
) -> Result<(), PlotError> {
    if evaluations
        .iter()
        .all(|e| e.baseline.is_none() && e.injected.is_none())
    {
        return Err(PlotError::Empty);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PlotError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let drawn = match mode {
        PlottingMode::Violin => draw_violins(path, figure, evaluations),
        PlottingMode::PerformanceMaintained => {
            let retention = evaluations
                .iter()
                .map(retention_markers)
                .collect::<Result<Vec<_>, _>>()?;
            draw_retention(path, figure, evaluations, &retention)
        }
    };
    drawn.map_err(|source| PlotError::Drawing {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), mode = %mode, "Saved figure");
    Ok(())
}

/// Retention of one policy; `None` when its baseline mean or median is zero.
fn retention_markers(
    evaluation: &PolicyEvaluation,
) -> Result<Option<PerformanceRetention>, PlotError> {
    if evaluation.baseline.is_none() || evaluation.injected.is_none() {
        return Err(PlotError::MissingRuns(evaluation.name.model_title.clone()));
    }
    let retention = evaluation.retention();
    if retention.is_none() {
        warn!(
            model = %evaluation.name.model_title,
            "Retention undefined, skipping markers"
        );
    }
    Ok(retention)
}

pub(super) fn series_color(index: usize) -> RGBColor {
    let (r, g, b) = CB_COLOR_CYCLE[index % CB_COLOR_CYCLE.len()];
    RGBColor(r, g, b)
}

fn category_label(titles: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    titles.get(i as usize).cloned().unwrap_or_default()
}

fn violin_outline(x: f64, density: &Density) -> Vec<(f64, f64)> {
    let right = density
        .coords
        .iter()
        .zip(&density.values)
        .map(|(y, d)| (x + VIOLIN_HALF_WIDTH * d, *y));
    let left = density
        .coords
        .iter()
        .zip(&density.values)
        .rev()
        .map(|(y, d)| (x - VIOLIN_HALF_WIDTH * d, *y));
    right.chain(left).collect()
}

fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if hi > lo { 0.1 * (hi - lo) } else { 1.0 };
    (lo - pad, hi + pad)
}

fn draw_violins(
    path: &Path,
    figure: &ResilienceFigure,
    evaluations: &[PolicyEvaluation],
) -> DrawResult {
    let runs: Vec<(usize, bool, &[f64])> = evaluations
        .iter()
        .enumerate()
        .flat_map(|(i, e)| {
            [(false, e.baseline.as_deref()), (true, e.injected.as_deref())]
                .into_iter()
                .filter_map(move |(injected, rewards)| rewards.map(|r| (i, injected, r)))
        })
        .collect();
    let (lo, hi) = runs
        .iter()
        .flat_map(|(_, _, rewards)| rewards.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r), hi.max(r))
        });
    let (y_lo, y_hi) = padded_range(lo, hi);
    let titles: Vec<String> = evaluations
        .iter()
        .map(|e| e.name.model_title.clone())
        .collect();
    let n = evaluations.len() as f64;

    let root = SVGBackend::new(path, figure.size).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled(&figure.figure_title, ("sans-serif", 32))?;
    let mut chart = ChartBuilder::on(&area)
        .caption(&figure.inject_title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5..(n - 0.5), y_lo..y_hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(evaluations.len())
        .x_label_formatter(&|x| category_label(&titles, *x))
        .y_desc(format!(
            "Reward violin with median for {} episodes",
            figure.n_episodes
        ))
        .axis_desc_style(("sans-serif", 20))
        .draw()?;

    let mut labelled = [false; 2];
    for (i, injected, rewards) in runs {
        let Some(summary) = RewardSummary::from_rewards(rewards) else {
            continue;
        };
        let x = i as f64;
        let color = series_color(usize::from(injected));
        if let Some(density) = Density::estimate(rewards, kde::DEFAULT_POINTS) {
            let body = chart.draw_series(iter::once(Polygon::new(
                violin_outline(x, &density),
                color.mix(0.65).filled(),
            )))?;
            if !labelled[usize::from(injected)] {
                labelled[usize::from(injected)] = true;
                body.label(if injected { "Injected" } else { "Normal" })
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 6), (x + 18, y + 6)], color.mix(0.65).filled())
                    });
            }
        }
        chart.draw_series(iter::once(PathElement::new(
            vec![(x, summary.lower_adjacent), (x, summary.upper_adjacent)],
            BLACK.stroke_width(1),
        )))?;
        chart.draw_series(iter::once(PathElement::new(
            vec![(x, summary.q1), (x, summary.q3)],
            BLACK.stroke_width(5),
        )))?;
        chart.draw_series(iter::once(Circle::new(
            (x, summary.median),
            5,
            BLACK.filled(),
        )))?;
        chart.draw_series(iter::once(Circle::new(
            (x, summary.median),
            4,
            WHITE.filled(),
        )))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerMiddle)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_retention(
    path: &Path,
    figure: &ResilienceFigure,
    evaluations: &[PolicyEvaluation],
    retention: &[Option<PerformanceRetention>],
) -> DrawResult {
    let markers: Vec<(f64, PerformanceRetention)> = retention
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.map(|r| (i as f64, r)))
        .collect();
    let (lo, hi) = markers
        .iter()
        .map(|(_, r)| r)
        .fold((0.0_f64, 100.0_f64), |(lo, hi), r| {
            (lo.min(r.mean_pct).min(r.median_pct), hi.max(r.mean_pct).max(r.median_pct))
        });
    let (y_lo, y_hi) = padded_range(lo, hi);
    let titles: Vec<String> = evaluations
        .iter()
        .map(|e| e.name.model_title.clone())
        .collect();
    let n = evaluations.len() as f64;

    let root = SVGBackend::new(path, figure.size).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled(&figure.figure_title, ("sans-serif", 32))?;
    let mut chart = ChartBuilder::on(&area)
        .caption(&figure.inject_title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5..(n - 0.5), y_lo..y_hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(evaluations.len())
        .x_label_formatter(&|x| category_label(&titles, *x))
        .y_label_formatter(&|y| format!("{y:.0}%"))
        .y_desc(format!(
            "Performance maintained after injection for {} episodes",
            figure.n_episodes
        ))
        .axis_desc_style(("sans-serif", 20))
        .draw()?;

    let mean_color = series_color(0);
    let median_color = series_color(1);
    chart
        .draw_series(
            markers
                .iter()
                .map(|(x, r)| Circle::new((*x, r.mean_pct), 8, mean_color.filled())),
        )?
        .label("Mean")
        .legend(move |(x, y)| Circle::new((x + 9, y), 6, mean_color.filled()));
    chart
        .draw_series(markers.iter().map(|(x, r)| {
            Cross::new((*x, r.median_pct), 8, median_color.stroke_width(3))
        }))?
        .label("Median")
        .legend(move |(x, y)| Cross::new((x + 9, y), 6, median_color.stroke_width(3)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerMiddle)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
