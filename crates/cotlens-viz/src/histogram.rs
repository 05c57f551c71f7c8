//! CoT length histogram

use cotlens_core::{CotError, CotResult};
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::{series_color, ChartConfig};

/// Counts of several series over one shared set of equal-width bins
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending edges
    pub edges: Vec<f64>,
    /// Per-series counts, one per bin
    pub counts: BTreeMap<String, Vec<u64>>,
}

impl Histogram {
    pub fn bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    pub fn max_count(&self) -> u64 {
        self.counts
            .values()
            .flat_map(|c| c.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Outline of one series as a closed step path
    fn step_points(&self, counts: &[u64]) -> Vec<(f64, f64)> {
        let mut points = Vec::with_capacity(counts.len() * 2 + 2);
        points.push((self.edges[0], 0.0));
        for (i, count) in counts.iter().enumerate() {
            points.push((self.edges[i], *count as f64));
            points.push((self.edges[i + 1], *count as f64));
        }
        points.push((self.edges[self.edges.len() - 1], 0.0));
        points
    }
}

/// Bin every series over the global value range.
///
/// The last bin is closed on the right so the maximum lands inside it. A
/// degenerate range (all values equal, or no values) is widened by 0.5 on
/// each side.
pub fn histogram_bins(series: &BTreeMap<String, Vec<f64>>, bins: usize) -> Histogram {
    let bins = bins.max(1);
    let all = series.values().flat_map(|v| v.iter().copied());
    let (mut lo, mut hi) = all.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !lo.is_finite() || !hi.is_finite() {
        lo = 0.0;
        hi = 0.0;
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let counts = series
        .iter()
        .map(|(label, values)| {
            let mut counts = vec![0u64; bins];
            for v in values {
                let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
                counts[idx] += 1;
            }
            (label.clone(), counts)
        })
        .collect();

    Histogram { edges, counts }
}

/// Render a step histogram of CoT lengths, one outline per run
pub fn render_length_histogram(
    path: impl AsRef<Path>,
    series: &BTreeMap<String, Vec<f64>>,
    bins: usize,
    config: &ChartConfig,
) -> CotResult<()> {
    let path = path.as_ref();
    let hist = histogram_bins(series, bins);
    let x_range = hist.edges[0]..hist.edges[hist.bins()];
    let y_max = (hist.max_count() as f64 * 1.1).max(1.0);

    let root = SVGBackend::new(path, config.size).into_drawing_area();
    root.fill(&WHITE).map_err(CotError::chart)?;

    let labels: Vec<&str> = series.keys().map(String::as_str).collect();
    let caption = format!("Distribution of CoT Lengths: {}", labels.join(" vs "));

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, 0f64..y_max)
        .map_err(CotError::chart)?;

    chart
        .configure_mesh()
        .x_desc("CoT length (tokens)")
        .y_desc("Count")
        .draw()
        .map_err(CotError::chart)?;

    for (i, (label, counts)) in hist.counts.iter().enumerate() {
        let color = series_color(i);
        chart
            .draw_series(LineSeries::new(hist.step_points(counts), color.stroke_width(2)))
            .map_err(CotError::chart)?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(CotError::chart)?;

    root.present().map_err(CotError::chart)?;
    debug!(path = %path.display(), bins = hist.bins(), "Rendered CoT length histogram");
    Ok(())
}
