//! Per-label run-time histograms, one panel per label on a grid.
//!
//! Two variants exist, matching the two run-time analyses: filled
//! bars with black edges, per-bar count labels and a legend carrying
//! the literal mean; or a step outline with a Gaussian density curve
//! and no annotations. Both draw a dashed mean line and dotted
//! mean±sd lines; a NaN sd (single-sample group) suppresses the ±sd
//! markers.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use itertools::Itertools;
use svg::node::element::path::Data;
use svg::node::element::{Group, Line, Path as SvgPath, Polyline, Rectangle, Text};
use svg::Document;

use crate::render::axes::{tick_label, tick_step, ticks, Scale};
use crate::render::theme::Theme;
use crate::samples::{LabeledSamples, SampleSet};
use crate::stats::Summary;

const PANEL_WIDTH: f64 = 480.0;
const PANEL_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 55.0;

#[derive(Debug, Clone)]
pub struct HistogramChart {
    pub theme: Theme,
    pub bins: usize,
    /// Panels per row
    pub columns: usize,
    /// Count label on top of each non-empty bar
    pub annotate_counts: bool,
    /// Step outline plus density curve instead of filled bars
    pub step_density: bool,
    pub show_legend: bool,
}

impl HistogramChart {
    /// The two-service variant: annotated bars and a legend with the
    /// mean value.
    pub fn pair() -> Self {
        Self {
            theme: Theme::darkgrid(),
            bins: 30,
            columns: 2,
            annotate_counts: true,
            step_density: false,
            show_legend: true,
        }
    }

    /// The four-run variant: 2x2 grid of step histograms with a
    /// density overlay.
    pub fn grid() -> Self {
        Self {
            theme: Theme::darkgrid(),
            bins: 30,
            columns: 2,
            annotate_counts: false,
            step_density: true,
            show_legend: false,
        }
    }

    pub fn render(&self, samples: &SampleSet) -> Result<Document> {
        let num_panels = samples.groups().len();
        if num_panels == 0 {
            bail!("no sample groups to plot");
        }
        let columns = self.columns.max(1);
        let rows = (num_panels + columns - 1) / columns;
        let width = columns as f64 * PANEL_WIDTH;
        let height = rows as f64 * PANEL_HEIGHT;

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0.0, 0.0, width, height))
            .add(
                Rectangle::new()
                    .set("width", width)
                    .set("height", height)
                    .set("fill", "#ffffff"),
            );
        for (i, group) in samples.groups().iter().enumerate() {
            let x0 = (i % columns) as f64 * PANEL_WIDTH;
            let y0 = (i / columns) as f64 * PANEL_HEIGHT;
            let panel = self
                .panel(group, self.theme.color(i))?
                .set("transform", format!("translate({x0} {y0})"));
            document = document.add(panel);
        }
        Ok(document)
    }

    pub fn save(&self, samples: &SampleSet, path: &Path) -> Result<()> {
        let document = self.render(samples)?;
        svg::save(path, &document)
            .with_context(|| anyhow!("writing histogram SVG to {path:?}"))?;
        Ok(())
    }

    fn panel(&self, group: &LabeledSamples, color: &str) -> Result<Group> {
        let summary = Summary::from_values(&group.values)
            .with_context(|| anyhow!("plotting group {:?}", group.label))?;
        let bins = bin_values(&group.values, self.bins)?;
        let theme = &self.theme;

        let plot_left = MARGIN_LEFT;
        let plot_right = PANEL_WIDTH - MARGIN_RIGHT;
        let plot_top = MARGIN_TOP;
        let plot_bottom = PANEL_HEIGHT - MARGIN_BOTTOM;

        let x_domain = (bins.lo(), bins.hi());
        let max_count = bins.counts.iter().copied().max().unwrap_or(0) as f64;
        // headroom so bars (and their count labels) stay inside
        let y_max = (max_count * if self.annotate_counts { 1.25 } else { 1.08 }).max(1.0);

        let sx = Scale::new(x_domain, (plot_left, plot_right));
        let sy = Scale::new((0.0, y_max), (plot_bottom, plot_top));

        let mut g = Group::new()
            .set("font-family", theme.font_family)
            .set("font-size", theme.font_size);

        g = g.add(
            Rectangle::new()
                .set("x", plot_left)
                .set("y", plot_top)
                .set("width", plot_right - plot_left)
                .set("height", plot_bottom - plot_top)
                .set("fill", theme.background),
        );

        // grid and tick labels
        let x_step = tick_step(x_domain.0, x_domain.1, 6);
        for t in ticks(x_domain.0, x_domain.1, 6) {
            let x = sx.apply(t);
            g = g.add(
                Line::new()
                    .set("x1", x)
                    .set("y1", plot_top)
                    .set("x2", x)
                    .set("y2", plot_bottom)
                    .set("stroke", theme.grid)
                    .set("stroke-width", 1),
            );
            g = g.add(
                Text::new(tick_label(x_step, t))
                    .set("x", x)
                    .set("y", plot_bottom + 16.0)
                    .set("text-anchor", "middle")
                    .set("fill", theme.text),
            );
        }
        let y_step = tick_step(0.0, y_max, 5);
        for t in ticks(0.0, y_max, 5) {
            let y = sy.apply(t);
            g = g.add(
                Line::new()
                    .set("x1", plot_left)
                    .set("y1", y)
                    .set("x2", plot_right)
                    .set("y2", y)
                    .set("stroke", theme.grid)
                    .set("stroke-width", 1),
            );
            g = g.add(
                Text::new(tick_label(y_step, t))
                    .set("x", plot_left - 8.0)
                    .set("y", y + 4.0)
                    .set("text-anchor", "end")
                    .set("fill", theme.text),
            );
        }

        if self.step_density {
            g = self.add_step_outline(g, &bins, &sx, &sy, color);
            if let Some(points) = density_curve(&group.values, &summary, bins.width(), y_max) {
                let points_attr = points
                    .iter()
                    .map(|(x, y)| format!("{:.2},{:.2}", sx.apply(*x), sy.apply(*y)))
                    .join(" ");
                g = g.add(
                    Polyline::new()
                        .set("points", points_attr)
                        .set("fill", "none")
                        .set("stroke", color)
                        .set("stroke-width", 1.5),
                );
            }
        } else {
            g = self.add_bars(g, &bins, &sx, &sy, color, theme.text);
        }

        // mean (dashed) and mean±sd (dotted) reference lines; ±sd is
        // skipped for NaN (single sample) and when falling outside the
        // data range
        let Summary { mean, sd, .. } = summary;
        g = g.add(
            vline(sx.apply(mean), plot_top, plot_bottom, color)
                .set("stroke-dasharray", "6,4")
                .set("stroke-width", 1.5),
        );
        for v in [mean + sd, mean - sd] {
            if v.is_finite() && v >= x_domain.0 && v <= x_domain.1 {
                g = g.add(
                    vline(sx.apply(v), plot_top, plot_bottom, color)
                        .set("stroke-dasharray", "2,3")
                        .set("stroke-width", 1),
                );
            }
        }

        // title and axis labels
        let center_x = (plot_left + plot_right) / 2.0;
        g = g.add(
            Text::new(format!("Distribution for {}", group.label))
                .set("x", center_x)
                .set("y", plot_top - 14.0)
                .set("text-anchor", "middle")
                .set("font-size", theme.font_size + 3.0)
                .set("fill", theme.text),
        );
        g = g.add(
            Text::new("Run Time")
                .set("x", center_x)
                .set("y", PANEL_HEIGHT - 14.0)
                .set("text-anchor", "middle")
                .set("fill", theme.text),
        );
        let y_label_y = (plot_top + plot_bottom) / 2.0;
        g = g.add(
            Text::new("Frequency")
                .set("x", 16.0)
                .set("y", y_label_y)
                .set("text-anchor", "middle")
                .set("transform", format!("rotate(-90 16 {y_label_y})"))
                .set("fill", theme.text),
        );

        if self.show_legend {
            g = self.add_legend(g, group, &summary, color, plot_right, plot_top);
        }

        Ok(g)
    }

    fn add_bars(
        &self,
        mut g: Group,
        bins: &Bins,
        sx: &Scale,
        sy: &Scale,
        color: &str,
        text_color: &str,
    ) -> Group {
        let base_y = sy.apply(0.0);
        for (count, (e0, e1)) in bins.counts.iter().zip(bins.edges.iter().tuple_windows()) {
            if *count == 0 {
                continue;
            }
            let x = sx.apply(*e0);
            let y = sy.apply(*count as f64);
            g = g.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", sx.apply(*e1) - x)
                    .set("height", base_y - y)
                    .set("fill", color)
                    .set("fill-opacity", 0.7)
                    .set("stroke", "#000000")
                    .set("stroke-width", 1),
            );
            if self.annotate_counts {
                let ty = y - 3.0;
                g = g.add(
                    Text::new(count.to_string())
                        .set("x", x)
                        .set("y", ty)
                        .set("font-size", 8)
                        .set("fill", text_color)
                        .set("transform", format!("rotate(-90 {x} {ty})")),
                );
            }
        }
        g
    }

    fn add_step_outline(
        &self,
        g: Group,
        bins: &Bins,
        sx: &Scale,
        sy: &Scale,
        color: &str,
    ) -> Group {
        let base_y = sy.apply(0.0);
        let mut data = Data::new().move_to((sx.apply(bins.lo()), base_y));
        for (count, (e0, e1)) in bins.counts.iter().zip(bins.edges.iter().tuple_windows()) {
            let y = sy.apply(*count as f64);
            data = data
                .line_to((sx.apply(*e0), y))
                .line_to((sx.apply(*e1), y));
        }
        data = data.line_to((sx.apply(bins.hi()), base_y)).close();
        g.add(
            SvgPath::new()
                .set("d", data)
                .set("fill", color)
                .set("fill-opacity", 0.35)
                .set("stroke", color)
                .set("stroke-width", 1.5),
        )
    }

    fn add_legend(
        &self,
        mut g: Group,
        group: &LabeledSamples,
        summary: &Summary,
        color: &str,
        plot_right: f64,
        plot_top: f64,
    ) -> Group {
        let x = plot_right - 160.0;
        let mut y = plot_top + 12.0;
        g = g.add(
            Rectangle::new()
                .set("x", x - 8.0)
                .set("y", y - 10.0)
                .set("width", 160.0)
                .set("height", 58.0)
                .set("fill", "#ffffff")
                .set("fill-opacity", 0.75),
        );

        g = g.add(
            Rectangle::new()
                .set("x", x)
                .set("y", y - 4.0)
                .set("width", 12.0)
                .set("height", 8.0)
                .set("fill", color)
                .set("fill-opacity", 0.7)
                .set("stroke", "#000000")
                .set("stroke-width", 0.5),
        );
        g = g.add(legend_text(x + 20.0, y, &group.label, self.theme.text));
        y += 18.0;

        g = g.add(
            Line::new()
                .set("x1", x)
                .set("y1", y - 2.0)
                .set("x2", x + 14.0)
                .set("y2", y - 2.0)
                .set("stroke", color)
                .set("stroke-dasharray", "6,4")
                .set("stroke-width", 1.5),
        );
        g = g.add(legend_text(
            x + 20.0,
            y,
            &format!("Mean = {:.2}", summary.mean),
            self.theme.text,
        ));
        y += 18.0;

        g = g.add(
            Line::new()
                .set("x1", x)
                .set("y1", y - 2.0)
                .set("x2", x + 14.0)
                .set("y2", y - 2.0)
                .set("stroke", color)
                .set("stroke-dasharray", "2,3")
                .set("stroke-width", 1),
        );
        g = g.add(legend_text(x + 20.0, y, "Std Dev", self.theme.text));

        g
    }
}

fn vline(x: f64, y0: f64, y1: f64, color: &str) -> Line {
    Line::new()
        .set("x1", x)
        .set("y1", y0)
        .set("x2", x)
        .set("y2", y1)
        .set("stroke", color)
}

fn legend_text(x: f64, y: f64, text: &str, color: &str) -> Text {
    Text::new(text)
        .set("x", x)
        .set("y", y)
        .set("font-size", 10)
        .set("fill", color)
}

#[derive(Debug, PartialEq)]
pub struct Bins {
    /// `counts.len() + 1` edges, evenly spaced
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Bins {
    pub fn lo(&self) -> f64 {
        self.edges[0]
    }

    pub fn hi(&self) -> f64 {
        *self.edges.last().expect("edges never empty")
    }

    pub fn width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }
}

pub fn bin_values(values: &[f64], num_bins: usize) -> Result<Bins> {
    if num_bins == 0 {
        bail!("need at least 1 bin");
    }
    let (min, max) = values
        .iter()
        .copied()
        .minmax()
        .into_option()
        .ok_or_else(|| anyhow!("no values to bin"))?;
    // all-equal values still get a non-degenerate bin range
    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (hi - lo) / num_bins as f64;
    let mut counts = vec![0; num_bins];
    for v in values {
        let i = (((v - lo) / width) as usize).min(num_bins - 1);
        counts[i] += 1;
    }
    let edges = (0..=num_bins).map(|i| lo + i as f64 * width).collect();
    Ok(Bins { edges, counts })
}

/// Gaussian kernel density over the data range, scaled to counts (so
/// it overlays the frequency histogram). None when there are not at
/// least two distinct samples to estimate a bandwidth from.
fn density_curve(
    values: &[f64],
    summary: &Summary,
    bin_width: f64,
    y_max: f64,
) -> Option<Vec<(f64, f64)>> {
    let n = values.len();
    if n < 2 || !summary.sd.is_finite() || summary.sd <= 0.0 {
        return None;
    }
    // Scott's rule
    let bandwidth = summary.sd * (n as f64).powf(-0.2);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    const STEPS: usize = 120;
    let (lo, hi) = (summary.min, summary.max);
    let dx = (hi - lo) / STEPS as f64;
    Some(
        (0..=STEPS)
            .map(|i| {
                let x = lo + i as f64 * dx;
                let density: f64 = values
                    .iter()
                    .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                    .sum::<f64>()
                    * norm;
                // scale density to the count axis, clamped to the panel
                (x, (density * n as f64 * bin_width).min(y_max))
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::samples::SampleSet;

    fn sample_set(pairs: &[(&str, &[f64])]) -> SampleSet {
        let mut set = SampleSet::new();
        for (label, values) in pairs {
            for v in *values {
                set.push(label, *v);
            }
        }
        set
    }

    #[test]
    fn t_bin_counts_sum_to_n() {
        let values = [1.0, 1.1, 2.0, 2.5, 3.0, 9.9];
        let bins = bin_values(&values, 10).unwrap();
        assert_eq!(bins.counts.iter().sum::<usize>(), values.len());
        assert_eq!(bins.edges.len(), 11);
        assert_relative_eq!(bins.lo(), 1.0);
        assert_relative_eq!(bins.hi(), 9.9);
    }

    #[test]
    fn t_bin_all_equal_values() {
        let bins = bin_values(&[4.0, 4.0, 4.0], 5).unwrap();
        assert_eq!(bins.counts.iter().sum::<usize>(), 3);
        assert!(bins.width() > 0.0);
    }

    #[test]
    fn t_pair_render_contains_annotations_and_legend() {
        let set = sample_set(&[
            ("Camera Service", &[1.0, 2.0, 2.0, 3.0]),
            ("Red Laser Service", &[5.0, 6.0]),
        ]);
        let svg_text = HistogramChart::pair().render(&set).unwrap().to_string();
        assert!(svg_text.contains("Distribution for Camera Service"));
        assert!(svg_text.contains("Distribution for Red Laser Service"));
        assert!(svg_text.contains("Mean = 2.00"));
        assert!(svg_text.contains("Std Dev"));
        assert!(svg_text.contains("stroke-dasharray"));
        assert!(svg_text.contains("Run Time"));
        assert!(svg_text.contains("Frequency"));
    }

    #[test]
    fn t_grid_render_has_density_curve() {
        let set = sample_set(&[
            ("Run 1", &[1.0, 2.0, 2.5, 3.0, 4.0]),
            ("Run 2", &[1.5, 2.5]),
            ("Run 3", &[0.5, 0.6, 0.7]),
            ("Run 4", &[9.0, 9.1, 9.2]),
        ]);
        let svg_text = HistogramChart::grid().render(&set).unwrap().to_string();
        assert!(svg_text.contains("polyline"));
        assert!(svg_text.contains("Distribution for Run 4"));
    }

    #[test]
    fn t_single_sample_group_renders_without_sd_markers() {
        // NaN sd: mean line yes, ±sd suppressed, must not fail
        let set = sample_set(&[("Run 1", &[5.0])]);
        let svg_text = HistogramChart::grid().render(&set).unwrap().to_string();
        assert!(svg_text.contains(r#"stroke-dasharray="6,4""#)); // mean dashes
        assert!(!svg_text.contains(r#"stroke-dasharray="2,3""#)); // no sd dots
    }

    #[test]
    fn t_empty_set_fails() {
        assert!(HistogramChart::pair().render(&SampleSet::new()).is_err());
    }

    #[test]
    fn t_density_needs_spread() {
        let summary = Summary::from_values(&[3.0]).unwrap();
        assert_eq!(density_curve(&[3.0], &summary, 0.1, 10.0), None);
        let values = [1.0, 2.0, 3.0];
        let summary = Summary::from_values(&values).unwrap();
        let curve = density_curve(&values, &summary, 0.5, 10.0).unwrap();
        assert_eq!(curve.len(), 121);
        assert!(curve.iter().all(|(_, y)| *y >= 0.0 && *y <= 10.0));
    }
}
