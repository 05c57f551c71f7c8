//! cotlens Visualization - charts and text layout for run comparisons
//!
//! This crate provides:
//! - A step histogram of CoT lengths per run
//! - A boxplot of CoT length per run and correctness
//! - Greedy word wrapping for side-by-side output dumps
//!
//! Charts are written as SVG so rendering needs no system fonts.

mod boxplot;
mod histogram;
mod text;

pub use boxplot::{quartiles, render_length_boxplot, BoxStats};
pub use histogram::{histogram_bins, render_length_histogram, Histogram};
pub use text::wrap_text;

use plotters::style::RGBColor;

/// Chart configuration
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Canvas size in pixels
    pub size: (u32, u32),
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            size: (1000, 600),
        }
    }
}

/// Series colours, cycled by series index
pub(crate) const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

pub(crate) fn series_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_config_defaults() {
        let config = ChartConfig::default();
        assert_eq!(config.size, (1000, 600));
    }

    #[test]
    fn test_series_color_cycles() {
        let rgb = |c: RGBColor| (c.0, c.1, c.2);
        assert_eq!(rgb(series_color(0)), rgb(series_color(PALETTE.len())));
        assert_ne!(rgb(series_color(0)), rgb(series_color(1)));
    }
}
