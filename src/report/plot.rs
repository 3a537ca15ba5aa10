//! Scatter plot of seasons by tier
//!
//! Win rate on the x axis, goal difference on the y axis, one coloured
//! series per tier present.

use crate::clustering::{Clustering, RankedSeason};
use crate::{Result, TiersError};
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

const MARKER_SIZE: i32 = 7;

fn plot_error<E: std::fmt::Display>(e: E) -> TiersError {
    TiersError::Plot(e.to_string())
}

/// Padded axis ranges covering every season
fn axis_ranges(seasons: &[RankedSeason]) -> (Range<f64>, Range<f64>) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

    for s in seasons {
        x_min = x_min.min(s.win_rate);
        x_max = x_max.max(s.win_rate);
        y_min = y_min.min(s.goal_difference as f64);
        y_max = y_max.max(s.goal_difference as f64);
    }

    if seasons.is_empty() {
        return (0.0..1.0, -1.0..1.0);
    }

    let x_pad = ((x_max - x_min) * 0.1).max(0.02);
    let y_pad = ((y_max - y_min) * 0.1).max(1.0);

    (
        (x_min - x_pad)..(x_max + x_pad),
        (y_min - y_pad)..(y_max + y_pad),
    )
}

/// Render the scatter plot as an SVG document
pub fn render_scatter_svg(
    clustering: &Clustering,
    title: &str,
    size: (u32, u32),
) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;

        let (x_range, y_range) = axis_ranges(&clustering.seasons);
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(x_range, y_range)
            .map_err(plot_error)?;

        chart
            .configure_mesh()
            .x_desc("Win rate")
            .y_desc("Goal difference")
            .draw()
            .map_err(plot_error)?;

        for rank in clustering.ranks_present() {
            let color = Palette99::pick(rank.saturating_sub(1)).mix(0.75);
            chart
                .draw_series(clustering.seasons_in(rank).map(|s| {
                    Circle::new(
                        (s.win_rate, s.goal_difference as f64),
                        MARKER_SIZE,
                        color.filled(),
                    )
                }))
                .map_err(plot_error)?
                .label(format!("Tier {}", rank))
                .legend(move |(x, y)| Circle::new((x, y), MARKER_SIZE, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(plot_error)?;

        root.present().map_err(plot_error)?;
    }
    Ok(svg)
}

/// Write the scatter plot to an SVG file
pub fn save_scatter<P: AsRef<Path>>(
    clustering: &Clustering,
    title: &str,
    path: P,
    size: (u32, u32),
) -> Result<()> {
    let path = path.as_ref();
    let svg = render_scatter_svg(clustering, title, size)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, svg)?;
    log::info!("Wrote scatter plot to {}", path.display());
    Ok(())
}
