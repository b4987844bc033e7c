//! The service release timing diagram: one horizontal lane per
//! service, a vertical tick at every release timestamp, lanes labeled
//! by service id, x axis in milliseconds. Saved as an SVG vector
//! image. A log without any release events renders a valid diagram
//! with zero lanes.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;

use crate::release_log::ServiceTimes;
use crate::render::axes::{tick_label, tick_step, ticks, Scale};
use crate::render::theme::Theme;

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 150.0;
const MARGIN_TOP: f64 = 45.0;
const MARGIN_BOTTOM: f64 = 55.0;

#[derive(Debug, Clone)]
pub struct TimelineChart {
    pub theme: Theme,
    pub width: f64,
    pub height: f64,
}

impl TimelineChart {
    pub fn new() -> Self {
        Self {
            theme: Theme::lanes(),
            width: 800.0,
            height: 480.0,
        }
    }

    pub fn render(&self, times: &ServiceTimes) -> Document {
        let theme = &self.theme;
        let plot_left = MARGIN_LEFT;
        let plot_right = self.width - MARGIN_RIGHT;
        let plot_top = MARGIN_TOP;
        let plot_bottom = self.height - MARGIN_BOTTOM;

        let num_lanes = times.num_lanes();
        // lane i occupies i + 0.6 .. i + 1.4, its label sits at i + 1
        let y_domain = if num_lanes == 0 {
            (0.0, 1.0)
        } else {
            (0.4, num_lanes as f64 + 0.6)
        };
        let max_ms = times.max_time_ms().unwrap_or(0.0);
        let x_domain = if max_ms > 0.0 {
            (0.0, max_ms * 1.02)
        } else {
            (0.0, 1.0)
        };
        let sx = Scale::new(x_domain, (plot_left, plot_right));
        let sy = Scale::new(y_domain, (plot_bottom, plot_top));

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

        let x_step = tick_step(x_domain.0, x_domain.1, 8);
        for t in ticks(x_domain.0, x_domain.1, 8) {
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

        for (idx, lane) in times.lanes().iter().enumerate() {
            let color = theme.color(idx);
            let lane_center = sy.apply(idx as f64 + 1.0);
            g = g.add(
                Line::new()
                    .set("x1", plot_left)
                    .set("y1", lane_center)
                    .set("x2", plot_right)
                    .set("y2", lane_center)
                    .set("stroke", theme.grid)
                    .set("stroke-width", 1),
            );
            g = g.add(
                Text::new(lane.service.to_string())
                    .set("x", plot_left - 8.0)
                    .set("y", lane_center + 4.0)
                    .set("text-anchor", "end")
                    .set("fill", theme.text),
            );

            let y1 = sy.apply(idx as f64 + 0.6);
            let y2 = sy.apply(idx as f64 + 1.4);
            for &t in &lane.times_ms {
                g = g.add(
                    Line::new()
                        .set("x1", sx.apply(t))
                        .set("y1", y1)
                        .set("x2", sx.apply(t))
                        .set("y2", y2)
                        .set("stroke", color)
                        .set("stroke-width", 1),
                );
            }
        }

        // legend, one entry per lane
        let legend_x = plot_right + 16.0;
        let mut legend_y = plot_top + 12.0;
        for (idx, lane) in times.lanes().iter().enumerate() {
            g = g.add(
                Line::new()
                    .set("x1", legend_x)
                    .set("y1", legend_y - 3.0)
                    .set("x2", legend_x + 14.0)
                    .set("y2", legend_y - 3.0)
                    .set("stroke", theme.color(idx))
                    .set("stroke-width", 2),
            );
            g = g.add(
                Text::new(lane.service.to_string())
                    .set("x", legend_x + 20.0)
                    .set("y", legend_y)
                    .set("font-size", 10)
                    .set("fill", theme.text),
            );
            legend_y += 16.0;
        }

        g = g.add(
            Text::new("Service Release Timing Diagram")
                .set("x", (plot_left + plot_right) / 2.0)
                .set("y", plot_top - 16.0)
                .set("text-anchor", "middle")
                .set("font-size", theme.font_size + 4.0)
                .set("fill", theme.text),
        );
        g = g.add(
            Text::new("Time (ms)")
                .set("x", (plot_left + plot_right) / 2.0)
                .set("y", self.height - 16.0)
                .set("text-anchor", "middle")
                .set("fill", theme.text),
        );

        Document::new()
            .set("width", self.width)
            .set("height", self.height)
            .set("viewBox", (0.0, 0.0, self.width, self.height))
            .add(
                Rectangle::new()
                    .set("width", self.width)
                    .set("height", self.height)
                    .set("fill", "#ffffff"),
            )
            .add(g)
    }

    pub fn save(&self, times: &ServiceTimes, path: &Path) -> Result<()> {
        let document = self.render(times);
        svg::save(path, &document)
            .with_context(|| anyhow!("writing timing diagram SVG to {path:?}"))?;
        Ok(())
    }
}

impl Default for TimelineChart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release_log::{ReleaseEvent, ServiceId};

    fn times(events: &[(u32, f64)]) -> ServiceTimes {
        let mut t = ServiceTimes::new();
        for &(id, ms) in events {
            t.push(ReleaseEvent {
                service: ServiceId(id),
                time_ms: ms,
            });
        }
        t
    }

    #[test]
    fn t_lanes_and_labels() {
        let svg_text = TimelineChart::new()
            .render(&times(&[(3, 10.0), (1, 20.0), (3, 30.0)]))
            .to_string();
        assert!(svg_text.contains("Service 3"));
        assert!(svg_text.contains("Service 1"));
        assert!(svg_text.contains("Service Release Timing Diagram"));
        assert!(svg_text.contains("Time (ms)"));
    }

    #[test]
    fn t_empty_log_renders_zero_lanes() {
        let svg_text = TimelineChart::new().render(&ServiceTimes::new()).to_string();
        assert!(svg_text.contains("Service Release Timing Diagram"));
        assert!(!svg_text.contains("Service 0"));
    }

    #[test]
    fn t_palette_wraps_after_five_lanes() {
        let events: Vec<(u32, f64)> = (0..6).map(|i| (i, (i + 1) as f64)).collect();
        let chart = TimelineChart::new();
        let svg_text = chart.render(&times(&events)).to_string();
        // lane 5 reuses the first palette color
        let first = chart.theme.color(0);
        assert_eq!(chart.theme.color(5), first);
        assert!(svg_text.matches(first).count() >= 2);
    }
}
