use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, MarkerShape, Plot,
    PlotPoint, PlotPoints, Points,
};

use super::countries::resolve_country;
use crate::color::CategoryColors;
use crate::data::aggregate::CountryTotal;
use crate::views::{BarSpec, BoxSpec, GeoBubbleSpec, ScatterFrame, ScatterSpec};

const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);
const SCATTER_MAX_RADIUS: f32 = 10.0;
const BUBBLE_MIN_RADIUS: f32 = 3.0;
const BUBBLE_MAX_RADIUS: f32 = 28.0;
/// Distinct marker sizes in the animated scatter.
const SIZE_BUCKETS: f64 = 6.0;

/// Axis formatter that prints category names at integer positions.
fn category_axis(
    names: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        names.get(rounded as usize).cloned().unwrap_or_default()
    }
}

fn usd(value: f64) -> String {
    if value.abs() >= 1_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

// ---------------------------------------------------------------------------
// 1. Horizontal bar chart
// ---------------------------------------------------------------------------

pub fn bar_chart(ui: &mut Ui, spec: &BarSpec, height: f32) {
    let names: Vec<String> = spec.bars.iter().map(|b| b.category.clone()).collect();
    let bars: Vec<Bar> = spec
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(i as f64, b.mean_salary)
                .name(&b.category)
                .fill(BAR_COLOR)
                .width(0.7)
        })
        .collect();

    let chart = BarChart::new(bars)
        .horizontal()
        .color(BAR_COLOR)
        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
            format!("{}\n{:.0} USD", bar.name, bar.value)
        }));

    Plot::new("bar_by_category")
        .height(height)
        .x_axis_label(spec.value_label.as_str())
        .y_axis_label(spec.category_label.as_str())
        .y_axis_formatter(category_axis(names))
        .x_axis_formatter(|mark, _range| usd(mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .include_x(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

// ---------------------------------------------------------------------------
// 4. Geographic bubble map
// ---------------------------------------------------------------------------

/// Country, totals, then the salary split over every category present.
fn bubble_hover(total: &CountryTotal) -> String {
    let mut text = format!(
        "{}\n{:.0} USD total, {} jobs",
        total.country, total.total_salary, total.count
    );
    for (category, salary) in &total.categories {
        text.push_str(&format!("\n{category}: {salary:.0} USD"));
    }
    text
}

pub fn geo_bubble_chart(ui: &mut Ui, spec: &GeoBubbleSpec, colors: &CategoryColors, height: f32) {
    let max_total = spec.max_total();
    let mut located = Vec::with_capacity(spec.bubbles.len());
    let mut unresolved = Vec::new();
    for bubble in &spec.bubbles {
        match resolve_country(&bubble.country) {
            Some(point) => located.push((bubble, point)),
            None => {
                log::debug!("No location for country '{}'", bubble.country);
                unresolved.push(bubble.country.as_str());
            }
        }
    }

    let hover: Vec<(f64, f64, String)> = located
        .iter()
        .map(|(b, p)| (p.lon, p.lat, bubble_hover(b)))
        .collect();

    Plot::new("geo_bubbles")
        .height(height)
        .data_aspect(1.0)
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-60.0)
        .include_y(85.0)
        .show_grid(false)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .legend(Legend::default())
        .label_formatter(move |_name, value| {
            hover
                .iter()
                .find(|(lon, lat, _)| (lon - value.x).abs() < 0.5 && (lat - value.y).abs() < 0.5)
                .map(|(_, _, text)| text.clone())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for lat in [-60.0, -30.0, 0.0, 30.0, 60.0] {
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![[-180.0, lat], [180.0, lat]]))
                        .color(Color32::from_gray(90))
                        .width(0.5),
                );
            }
            for lon in (-180..=180).step_by(30) {
                let lon = f64::from(lon);
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![[lon, -60.0], [lon, 85.0]]))
                        .color(Color32::from_gray(90))
                        .width(0.5),
                );
            }

            for (bubble, point) in &located {
                let share = if max_total > 0.0 {
                    (bubble.total_salary / max_total).sqrt() as f32
                } else {
                    0.0
                };
                let radius = BUBBLE_MIN_RADIUS + (BUBBLE_MAX_RADIUS - BUBBLE_MIN_RADIUS) * share;
                let top = bubble.top_category();
                let color = colors.color_for(top);
                plot_ui.points(
                    Points::new(vec![[point.lon, point.lat]])
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(radius)
                        .color(color.gamma_multiply(0.75))
                        .name(top),
                );
            }
        });

    if !unresolved.is_empty() {
        ui.small(format!("Not placed on the map: {}", unresolved.join(", ")));
    }
}

// ---------------------------------------------------------------------------
// 5. Boxplot
// ---------------------------------------------------------------------------

pub fn box_chart(ui: &mut Ui, spec: &BoxSpec, colors: &CategoryColors, height: f32) {
    let names: Vec<String> = spec.boxes.iter().map(|b| b.group.clone()).collect();

    Plot::new("salary_boxplot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label(spec.x_label.as_str())
        .y_axis_label(spec.y_label.as_str())
        .x_axis_formatter(category_axis(names))
        .y_axis_formatter(|mark, _range| usd(mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, stats) in spec.boxes.iter().enumerate() {
                let x = i as f64;
                let color = colors.color_for(&stats.group);
                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(
                        stats.lower_whisker,
                        stats.q1,
                        stats.median,
                        stats.q3,
                        stats.upper_whisker,
                    ),
                )
                .name(&stats.group)
                .box_width(0.5)
                .whisker_width(0.3)
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&stats.group).color(color));

                if !stats.outliers.is_empty() {
                    let outliers: Vec<[f64; 2]> =
                        stats.outliers.iter().map(|&v| [x, v]).collect();
                    plot_ui.points(
                        Points::new(outliers)
                            .radius(2.5)
                            .color(color)
                            .name(&stats.group),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// 6. Animated scatter
// ---------------------------------------------------------------------------

fn size_bucket(size: f64) -> u8 {
    (size.clamp(0.0, 1.0) * SIZE_BUCKETS).ceil() as u8
}

/// Group a frame's points into one series per (category, size bucket).
fn frame_series(frame: &ScatterFrame) -> Vec<(&str, u8, Vec<[f64; 2]>)> {
    let mut series: Vec<(&str, u8, Vec<[f64; 2]>)> = Vec::new();
    for p in &frame.points {
        let bucket = size_bucket(p.size);
        let xy = [p.x as f64, p.salary];
        match series
            .iter_mut()
            .find(|(c, b, _)| *c == p.category.as_str() && *b == bucket)
        {
            Some(entry) => entry.2.push(xy),
            None => series.push((p.category.as_str(), bucket, vec![xy])),
        }
    }
    series
}

pub fn scatter_chart(
    ui: &mut Ui,
    spec: &ScatterSpec,
    frame: &ScatterFrame,
    colors: &CategoryColors,
    height: f32,
) {
    let hover: Vec<(f64, f64, String)> = frame
        .points
        .iter()
        .map(|p| {
            (
                p.x as f64,
                p.salary,
                format!("{}\n{}\n{:.0} USD", p.title, p.category, p.salary),
            )
        })
        .collect();
    let x_max = spec.x_categories.len().saturating_sub(1) as f64;

    Plot::new("salary_scatter")
        .height(height)
        .x_axis_label(spec.x.column())
        .y_axis_label(spec.y.column())
        .x_axis_formatter(category_axis(spec.x_categories.clone()))
        .y_axis_formatter(|mark, _range| usd(mark.value))
        .include_x(-0.5)
        .include_x(x_max + 0.5)
        .include_y(0.0)
        .include_y(spec.max_salary * 1.05)
        .label_formatter(move |_name, value: &PlotPoint| {
            hover
                .iter()
                .find(|(x, y, _)| (*x - value.x).abs() < 1e-9 && (*y - value.y).abs() < 1e-6)
                .map(|(_, _, text)| text.clone())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (category, bucket, points) in frame_series(frame) {
                let share = f32::from(bucket) / SIZE_BUCKETS as f32;
                let radius = SCATTER_MAX_RADIUS * share.max(0.2);
                plot_ui.points(
                    Points::new(points)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(radius)
                        .color(colors.color_for(category).gamma_multiply(0.7))
                        .name(category),
                );
            }
        });
    category_legend(ui, colors);
}

/// Every category with its colour, independent of which ones the
/// current frame contains.
fn category_legend(ui: &mut Ui, colors: &CategoryColors) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (name, color) in colors.legend_entries() {
            ui.label(RichText::new("●").color(color));
            ui.small(name);
            ui.add_space(6.0);
        }
    });
}
