use std::f32::consts::TAU;

use eframe::egui::{vec2, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui};

use super::hierarchy::{build_hierarchy, sunburst_sectors, Sector};
use super::treemap::{color_field, color_legend, hover_text, label_color, node_fill};
use crate::color::CategoryColors;
use crate::views::{ColorEncoding, HierarchySpec};

/// Largest angle covered by one polygon of a ring sector.
const MAX_STEP: f32 = TAU / 120.0;

/// Point at `radius` and `angle` (clockwise from 12 o'clock).
fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + vec2(angle.sin(), -angle.cos()) * radius
}

/// Angle of `pos` around `center` in `0..TAU`, clockwise from 12 o'clock.
pub fn angle_of(center: Pos2, pos: Pos2) -> f32 {
    let d = pos - center;
    let a = d.x.atan2(-d.y);
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

/// Inner and outer radius of a ring; a small hole stays in the middle.
fn ring_radii(ring: usize, ring_width: f32) -> (f32, f32) {
    let inner = ring_width * (ring as f32 - 0.5);
    (inner, inner + ring_width)
}

fn paint_sector(
    shapes: &mut Vec<Shape>,
    center: Pos2,
    sector: &Sector<'_>,
    ring_width: f32,
    fill: Color32,
) {
    let (inner, outer) = ring_radii(sector.ring, ring_width);
    let sweep = sector.end - sector.start;
    let steps = (sweep / MAX_STEP).ceil().max(1.0) as usize;
    let step = sweep / steps as f32;
    for i in 0..steps {
        let a0 = sector.start + step * i as f32;
        let a1 = a0 + step;
        shapes.push(Shape::convex_polygon(
            vec![
                polar(center, inner, a0),
                polar(center, outer, a0),
                polar(center, outer, a1),
                polar(center, inner, a1),
            ],
            fill,
            Stroke::NONE,
        ));
    }
    let edge = Stroke::new(1.0, Color32::WHITE);
    shapes.push(Shape::line_segment(
        [polar(center, inner, sector.start), polar(center, outer, sector.start)],
        edge,
    ));
}

pub fn sunburst(ui: &mut Ui, spec: &HierarchySpec, categories: &CategoryColors, height: f32) {
    let root = build_hierarchy(&spec.rows, &spec.path, spec.value, color_field(spec));
    let range = root.leaf_color_range();
    let sectors = sunburst_sectors(&root);

    let (response, painter) =
        ui.allocate_painter(vec2(ui.available_width(), height), Sense::hover());
    let center = response.rect.center();
    let radius = (response.rect.width().min(response.rect.height()) / 2.0 - 4.0).max(0.0);
    let ring_width = radius / (spec.path.len() as f32 + 0.5);

    let mut shapes = Vec::new();
    for sector in &sectors {
        let fill = node_fill(sector.node, spec.color, range, categories);
        paint_sector(&mut shapes, center, sector, ring_width, fill);
    }
    painter.extend(shapes);

    // labels on the innermost ring where the sector is wide enough
    for sector in sectors.iter().filter(|s| s.ring == 1) {
        let (inner, outer) = ring_radii(1, ring_width);
        let mid_r = (inner + outer) / 2.0;
        if (sector.end - sector.start) * mid_r < 60.0 {
            continue;
        }
        let fill = node_fill(sector.node, spec.color, range, categories);
        painter.text(
            polar(center, mid_r, (sector.start + sector.end) / 2.0),
            Align2::CENTER_CENTER,
            &sector.node.label,
            FontId::proportional(11.0),
            label_color(fill),
        );
    }

    let hovered = response.hover_pos().and_then(|pos| {
        let dist = pos.distance(center);
        let angle = angle_of(center, pos);
        sectors.iter().find(|s| {
            let (inner, outer) = ring_radii(s.ring, ring_width);
            (inner..outer).contains(&dist) && s.contains_angle(angle)
        })
    });
    if let Some(sector) = hovered {
        let text = hover_text(sector.node);
        response.on_hover_ui_at_pointer(|ui: &mut Ui| {
            ui.label(text);
        });
    }

    if let ColorEncoding::Continuous { field, scale } = spec.color {
        color_legend(ui, field.column(), scale, range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn angles_run_clockwise_from_top() {
        let c = pos2(100.0, 100.0);
        assert!(angle_of(c, pos2(100.0, 50.0)).abs() < 1e-6);
        assert!((angle_of(c, pos2(150.0, 100.0)) - TAU / 4.0).abs() < 1e-6);
        assert!((angle_of(c, pos2(100.0, 150.0)) - TAU / 2.0).abs() < 1e-6);
        assert!((angle_of(c, pos2(50.0, 100.0)) - 3.0 * TAU / 4.0).abs() < 1e-6);
    }

    #[test]
    fn polar_inverts_angle_of() {
        let c = pos2(0.0, 0.0);
        let p = polar(c, 10.0, 1.0);
        assert!((angle_of(c, p) - 1.0).abs() < 1e-5);
        assert!((p.distance(c) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn rings_do_not_overlap() {
        let (_, outer1) = ring_radii(1, 20.0);
        let (inner2, _) = ring_radii(2, 20.0);
        assert_eq!(outer1, inner2);
        assert_eq!(ring_radii(1, 20.0).0, 10.0);
    }
}
