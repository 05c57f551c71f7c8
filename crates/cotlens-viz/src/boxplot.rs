//! CoT length vs. correctness boxplot

use cotlens_core::{CotError, CotResult};
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::{series_color, ChartConfig};

/// Five-number summary plus outliers (Tukey, 1.5 IQR whiskers)
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value at or above `q1 - 1.5 * IQR`
    pub lower_whisker: f64,
    /// Largest value at or below `q3 + 1.5 * IQR`
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    fn span(&self) -> (f64, f64) {
        self.outliers.iter().fold(
            (self.lower_whisker, self.upper_whisker),
            |(lo, hi), v| (lo.min(*v), hi.max(*v)),
        )
    }
}

/// Linear-interpolated percentile of sorted data, `p` in [0, 1]
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Box statistics of `values`; `None` when empty
pub fn quartiles(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = percentile(&sorted, 0.25);
    let median = percentile(&sorted, 0.5);
    let q3 = percentile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v >= lo_fence && *v <= hi_fence)
        .collect();
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();

    Some(BoxStats {
        q1,
        median,
        q3,
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers,
    })
}

const BOX_HALF_WIDTH: f64 = 0.17;
const HUE_OFFSET: f64 = 0.2;

/// Render one box per (run, correctness) group.
///
/// Runs sit at integer x positions; incorrect outputs are drawn left of the
/// run position and correct ones right of it.
pub fn render_length_boxplot(
    path: impl AsRef<Path>,
    groups: &BTreeMap<(String, bool), Vec<f64>>,
    config: &ChartConfig,
) -> CotResult<()> {
    let path = path.as_ref();

    let mut runs: Vec<&str> = groups.keys().map(|(run, _)| run.as_str()).collect();
    runs.dedup();

    let boxes: Vec<(f64, bool, BoxStats)> = groups
        .iter()
        .filter_map(|((run, correct), values)| {
            let idx = runs.iter().position(|r| *r == run.as_str())?;
            let offset = if *correct { HUE_OFFSET } else { -HUE_OFFSET };
            quartiles(values).map(|stats| (idx as f64 + offset, *correct, stats))
        })
        .collect();

    let (y_lo, y_hi) = boxes
        .iter()
        .map(|(_, _, stats)| stats.span())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
            (lo.min(a), hi.max(b))
        });
    let (y_lo, y_hi) = if y_lo.is_finite() && y_hi > y_lo {
        let pad = (y_hi - y_lo) * 0.1;
        (y_lo - pad, y_hi + pad)
    } else if y_lo.is_finite() {
        (y_lo - 1.0, y_lo + 1.0)
    } else {
        (0.0, 1.0)
    };

    let root = SVGBackend::new(path, config.size).into_drawing_area();
    root.fill(&WHITE).map_err(CotError::chart)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("CoT Length vs Correctness by Run", ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..(runs.len().max(1) as f64 - 0.5), y_lo..y_hi)
        .map_err(CotError::chart)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_| String::new())
        .x_desc("Run type")
        .y_desc("CoT length (tokens)")
        .draw()
        .map_err(CotError::chart)?;

    for correct in [false, true] {
        let color = series_color(usize::from(correct));
        let group: Vec<&(f64, bool, BoxStats)> =
            boxes.iter().filter(|(_, c, _)| *c == correct).collect();
        if group.is_empty() {
            continue;
        }

        chart
            .draw_series(group.iter().map(|(x, _, s)| {
                Rectangle::new(
                    [(x - BOX_HALF_WIDTH, s.q1), (x + BOX_HALF_WIDTH, s.q3)],
                    color.mix(0.6).filled(),
                )
            }))
            .map_err(CotError::chart)?
            .label(format!("correct={}", correct))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));

        for (x, _, s) in group {
            let (x, x0, x1) = (*x, x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
            let lines = vec![
                vec![(x0, s.median), (x1, s.median)],
                vec![(x, s.q1), (x, s.lower_whisker)],
                vec![(x, s.q3), (x, s.upper_whisker)],
                vec![(x - BOX_HALF_WIDTH / 2.0, s.lower_whisker), (x + BOX_HALF_WIDTH / 2.0, s.lower_whisker)],
                vec![(x - BOX_HALF_WIDTH / 2.0, s.upper_whisker), (x + BOX_HALF_WIDTH / 2.0, s.upper_whisker)],
            ];
            chart
                .draw_series(lines.into_iter().map(|pts| PathElement::new(pts, BLACK.stroke_width(1))))
                .map_err(CotError::chart)?;
            chart
                .draw_series(s.outliers.iter().map(|v| Circle::new((x, *v), 3, BLACK.filled())))
                .map_err(CotError::chart)?;
        }
    }

    let label_y = y_lo + (y_hi - y_lo) * 0.02;
    chart
        .draw_series(runs.iter().enumerate().map(|(i, run)| {
            Text::new(
                run.to_string(),
                (i as f64 - 0.1, label_y),
                ("sans-serif", 16).into_font(),
            )
        }))
        .map_err(CotError::chart)?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(CotError::chart)?;

    root.present().map_err(CotError::chart)?;
    debug!(path = %path.display(), groups = boxes.len(), "Rendered CoT length boxplot");
    Ok(())
}
