//! Mean reward against noise magnitude, with a ±std band per policy.

use std::error::Error;
use std::fs;
use std::iter;
use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use super::resilience::series_color;
use super::PlotError;
use crate::injection::InjectMode;
use crate::stats::SweepStatistics;

/// Draws a sweep chart and writes an SVG to `path`.
///
/// # Errors
///
/// [`PlotError::Empty`] if there are no policies or magnitudes.
pub fn draw_sweep(
    path: &Path,
    figure_title: &str,
    stats: &SweepStatistics,
    mode: InjectMode,
) -> Result<(), PlotError> {
    if stats.models.is_empty() || stats.magnitudes.is_empty() {
        return Err(PlotError::Empty);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PlotError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    render(path, figure_title, stats, mode).map_err(|source| PlotError::Drawing {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Saved sweep figure");
    Ok(())
}

fn render(
    path: &Path,
    figure_title: &str,
    stats: &SweepStatistics,
    mode: InjectMode,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let x_lo = stats.magnitudes.iter().copied().fold(f64::INFINITY, f64::min);
    let mut x_hi = stats.magnitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if x_hi <= x_lo {
        x_hi = x_lo + 1.0;
    }
    let bands: Vec<(Vec<f64>, Vec<f64>)> =
        (0..stats.models.len()).map(|p| stats.band(p)).collect();
    let (mut y_lo, mut y_hi) = bands
        .iter()
        .flat_map(|(lower, upper)| lower.iter().chain(upper))
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    if !y_lo.is_finite() || !y_hi.is_finite() {
        (y_lo, y_hi) = (0.0, 1.0);
    } else if y_hi <= y_lo {
        (y_lo, y_hi) = (y_lo - 1.0, y_hi + 1.0);
    }

    let root = SVGBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(figure_title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(mode.axis_label())
        .y_desc("Reward")
        .axis_desc_style(("sans-serif", 18))
        .draw()?;

    for (p, (lower, upper)) in bands.iter().enumerate() {
        let color = series_color(p);
        let outline: Vec<(f64, f64)> = stats
            .magnitudes
            .iter()
            .copied()
            .zip(upper.iter().copied())
            .chain(
                stats
                    .magnitudes
                    .iter()
                    .copied()
                    .zip(lower.iter().copied())
                    .rev(),
            )
            .collect();
        chart.draw_series(iter::once(Polygon::new(outline, color.mix(0.3).filled())))?;
        chart
            .draw_series(LineSeries::new(
                stats
                    .magnitudes
                    .iter()
                    .copied()
                    .zip(stats.mean_curve(p)),
                color.stroke_width(2),
            ))?
            .label(stats.models[p].as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
