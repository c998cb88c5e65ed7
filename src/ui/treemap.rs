use eframe::egui::{self, vec2, Align2, Color32, FontId, Sense, Stroke, StrokeKind, Ui};

use super::hierarchy::{build_hierarchy, treemap_tiles, Node, TILE_HEADER};
use crate::color::CategoryColors;
use crate::views::{ColorEncoding, HierarchySpec};

/// Black or white, whichever reads better on `fill`.
pub fn label_color(fill: Color32) -> Color32 {
    let luma = (u32::from(fill.r()) * 299 + u32::from(fill.g()) * 587 + u32::from(fill.b()) * 114)
        / 1000;
    if luma > 140 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

/// Fill colour of a hierarchy node under the descriptor's colour encoding.
pub fn node_fill(
    node: &Node,
    color: ColorEncoding,
    range: (f64, f64),
    categories: &CategoryColors,
) -> Color32 {
    match color {
        ColorEncoding::Continuous { scale, .. } => {
            scale.color_for(node.color_value, range.0, range.1)
        }
        ColorEncoding::Categorical { .. } => node
            .id
            .first()
            .map_or(Color32::GRAY, |top| categories.color_for(top)),
    }
}

pub fn color_field(spec: &HierarchySpec) -> crate::data::model::Field {
    match spec.color {
        ColorEncoding::Continuous { field, .. } | ColorEncoding::Categorical { field } => field,
    }
}

pub fn hover_text(node: &Node) -> String {
    format!(
        "{}\n{:.0} USD total\n{} jobs",
        node.id.join(" / "),
        node.value,
        node.count
    )
}

pub fn treemap(ui: &mut Ui, spec: &HierarchySpec, categories: &CategoryColors, height: f32) {
    let root = build_hierarchy(&spec.rows, &spec.path, spec.value, color_field(spec));
    let range = root.leaf_color_range();

    let (response, painter) =
        ui.allocate_painter(vec2(ui.available_width(), height), Sense::hover());
    let tiles = treemap_tiles(&root, response.rect);

    for tile in &tiles {
        let fill = node_fill(tile.node, spec.color, range, categories);
        painter.rect_filled(tile.rect, 0.0, fill);
        painter.rect_stroke(
            tile.rect,
            0.0,
            Stroke::new(1.0, Color32::WHITE),
            StrokeKind::Inside,
        );

        let fits = tile.rect.width() > 40.0 && tile.rect.height() > TILE_HEADER;
        if fits {
            painter.with_clip_rect(tile.rect.shrink(2.0)).text(
                tile.rect.min + vec2(4.0, 2.0),
                Align2::LEFT_TOP,
                &tile.node.label,
                FontId::proportional(11.0),
                label_color(fill),
            );
        }
    }

    // deepest tile under the pointer
    let hovered = response
        .hover_pos()
        .and_then(|pos| tiles.iter().rev().find(|t| t.rect.contains(pos)));
    if let Some(tile) = hovered {
        let text = hover_text(tile.node);
        response.on_hover_ui_at_pointer(|ui: &mut Ui| {
            ui.label(text);
        });
    }

    if let ColorEncoding::Continuous { field, scale } = spec.color {
        color_legend(ui, field.column(), scale, range);
    }
}

/// Small horizontal gradient with the range of the colour field.
pub fn color_legend(
    ui: &mut Ui,
    label: &str,
    scale: crate::color::ColorScale,
    (lo, hi): (f64, f64),
) {
    if !lo.is_finite() || !hi.is_finite() {
        return;
    }
    ui.horizontal(|ui: &mut Ui| {
        ui.small(format!("{label} ({})  {lo:.0}", scale.name()));
        let (rect, _) = ui.allocate_exact_size(vec2(160.0, 10.0), Sense::hover());
        let steps = 32;
        let w = rect.width() / steps as f32;
        for i in 0..steps {
            let t = f64::from(i) / f64::from(steps - 1);
            let cell = egui::Rect::from_min_size(
                rect.min + vec2(w * i as f32, 0.0),
                vec2(w + 0.5, rect.height()),
            );
            ui.painter().rect_filled(cell, 0.0, scale.sample(t));
        }
        ui.small(format!("{hi:.0}"));
    });
}
