//! Plotters-powered chart widgets for Ratatui.
//!
//! Both widgets are render-only: the models (bar groups, slice angles) come
//! fully computed from `render`, so `render()` here only draws.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::render::{BarChartModel, PieChartModel, Rgb};

/// Fraction of each date slot taken by the two bars together.
const BAR_GROUP_FILL: f64 = 0.7;
/// Arc resolution for pie slices.
const ARC_STEP_DEG: f64 = 3.0;

pub fn plotters_color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

pub fn ratatui_color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// Upper y bound for the coverage chart (a little headroom over the max).
pub fn bar_y_max(chart: &BarChartModel) -> f64 {
    (chart.max_value.max(1) as f64) * 1.1
}

/// Paired vertical bars, one pair per date. Axes are drawn by the caller.
pub struct DoseBarChart<'a> {
    pub chart: &'a BarChartModel,
}

impl<'a> Widget for DoseBarChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height < 4 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let groups = &self.chart.groups;
        if groups.is_empty() {
            buf.set_string(area.x, area.y, "No daily data.", Style::default().fg(Color::Gray));
            return;
        }

        let x1 = groups.len() as f64;
        let y1 = bar_y_max(self.chart);
        let colors = [
            plotters_color(self.chart.series[0].color),
            plotters_color(self.chart.series[1].color),
        ];

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(0)
                .build_cartesian_2d(0.0..x1, 0.0..y1)?;

            let half = BAR_GROUP_FILL / 2.0;
            for (series, color) in colors.iter().enumerate() {
                chart.draw_series(groups.iter().enumerate().map(|(i, g)| {
                    let center = i as f64 + 0.5;
                    let left = center - half + series as f64 * half;
                    Rectangle::new(
                        [(left, 0.0), (left + half, g.values[series] as f64)],
                        color.filled(),
                    )
                }))?;
            }

            chart.draw_series(LineSeries::new(vec![(0.0, 0.0), (x1, 0.0)], &WHITE))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// A pie or half-pie, optionally with a hole (`inner_radius > 0`).
pub struct SlicePieChart<'a> {
    pub chart: &'a PieChartModel,
    /// Inner radius as a fraction of the outer radius.
    pub inner_radius: f64,
}

impl<'a> Widget for SlicePieChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 8 || area.height < 4 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        if self.chart.total == 0 {
            buf.set_string(area.x, area.y, "No data.", Style::default().fg(Color::Gray));
            return;
        }

        let (y0, y1) = if self.chart.sweep.span() <= 180.0 {
            (-0.1, 1.1)
        } else {
            (-1.1, 1.1)
        };
        let inner = self.inner_radius;
        let slices = &self.chart.slices;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(0)
                .build_cartesian_2d(-1.1..1.1, y0..y1)?;

            chart.draw_series(
                slices
                    .iter()
                    .filter(|s| s.end_deg > s.start_deg)
                    .map(|s| {
                        Polygon::new(
                            slice_polygon(s.start_deg, s.end_deg, inner, 1.0),
                            plotters_color(s.color).filled(),
                        )
                    }),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Outline of one slice as a polygon around the origin.
///
/// Angles are in degrees, counter-clockwise from the positive x axis. With
/// `inner > 0` the outline walks the outer arc forward and the inner arc back.
pub fn slice_polygon(start_deg: f64, end_deg: f64, inner: f64, outer: f64) -> Vec<(f64, f64)> {
    let span = (end_deg - start_deg).max(0.0);
    let steps = ((span / ARC_STEP_DEG).ceil() as usize).max(1);

    let arc = |radius: f64| {
        (0..=steps).map(move |i| {
            let deg = start_deg + span * (i as f64 / steps as f64);
            let rad = deg.to_radians();
            (radius * rad.cos(), radius * rad.sin())
        })
    };

    let mut points: Vec<(f64, f64)> = arc(outer).collect();
    if inner > 0.0 {
        let mut back: Vec<(f64, f64)> = arc(inner).collect();
        back.reverse();
        points.extend(back);
    } else {
        points.push((0.0, 0.0));
    }
    points
}

/// Compact count for axis ticks: `950`, `12.5k`, `3.4M`.
pub fn fmt_count(v: f64) -> String {
    let a = v.abs();
    if a >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if a >= 1_000.0 {
        format!("{:.1}k", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn wedge_starts_on_arc_and_closes_at_center() {
        let pts = slice_polygon(0.0, 90.0, 0.0, 1.0);
        assert!(close(pts[0], (1.0, 0.0)));
        assert!(close(pts[pts.len() - 2], (0.0, 1.0)));
        assert_eq!(*pts.last().unwrap(), (0.0, 0.0));
        // 90 degrees at 3 degrees per step, plus both ends, plus the center.
        assert_eq!(pts.len(), 30 + 1 + 1);
    }

    #[test]
    fn donut_walks_inner_arc_backwards() {
        let pts = slice_polygon(0.0, 180.0, 0.5, 1.0);
        assert!(close(pts[0], (1.0, 0.0)));
        let n = pts.len();
        assert!(close(pts[n / 2 - 1], (-1.0, 0.0)));
        assert!(close(pts[n / 2], (-0.5, 0.0)));
        assert!(close(pts[n - 1], (0.5, 0.0)));
    }

    #[test]
    fn half_circle_stays_in_upper_half() {
        for (x, y) in slice_polygon(0.0, 180.0, 0.0, 1.0) {
            assert!(y >= -1e-9, "point ({x}, {y}) below axis");
        }
    }

    #[test]
    fn compact_counts() {
        assert_eq!(fmt_count(950.0), "950");
        assert_eq!(fmt_count(12_500.0), "12.5k");
        assert_eq!(fmt_count(3_400_000.0), "3.4M");
    }
}
