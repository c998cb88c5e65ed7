//! Grouping and layout for the hierarchical charts.
//!
//! The view descriptors hand over flat rows plus a field path; this module
//! turns them into a value tree and lays that tree out as squarified
//! rectangles (treemap) or ring sectors (sunburst).

use std::f32::consts::TAU;

use eframe::egui::{pos2, vec2, Rect};

use crate::data::aggregate::group_rows;
use crate::data::model::{Field, JobRecord, Relation};

// ---------------------------------------------------------------------------
// Value tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: String,
    /// Labels from the first level down to this node.
    pub id: Vec<String>,
    pub value: f64,
    /// Value-weighted mean of the colour field over the node's rows.
    pub color_value: f64,
    pub count: usize,
    /// Largest value first.
    pub children: Vec<Node>,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Range of `color_value` over the leaves below this node.
    pub fn leaf_color_range(&self) -> (f64, f64) {
        if self.is_leaf() {
            return (self.color_value, self.color_value);
        }
        self.children
            .iter()
            .map(Node::leaf_color_range)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
                (lo.min(a), hi.max(b))
            })
    }
}

fn numeric(field: Field, record: &JobRecord) -> f64 {
    field.number(record).unwrap_or(0.0)
}

fn make_node(
    label: String,
    id: Vec<String>,
    rows: &[&JobRecord],
    rest: &[Field],
    value: Field,
    color: Field,
) -> Node {
    let total: f64 = rows.iter().map(|r| numeric(value, r)).sum();
    let color_value = if total > 0.0 {
        rows.iter()
            .map(|r| numeric(value, r) * numeric(color, r))
            .sum::<f64>()
            / total
    } else if rows.is_empty() {
        0.0
    } else {
        rows.iter().map(|r| numeric(color, r)).sum::<f64>() / rows.len() as f64
    };

    let children = match rest.split_first() {
        None => Vec::new(),
        Some((&field, deeper)) => {
            let mut children: Vec<Node> = group_rows(rows.iter().copied(), field)
                .into_iter()
                .map(|(key, members)| {
                    let mut child_id = id.clone();
                    child_id.push(key.clone());
                    make_node(key, child_id, &members, deeper, value, color)
                })
                .collect();
            children.sort_by(|a, b| b.value.total_cmp(&a.value));
            children
        }
    };

    Node {
        label,
        id,
        value: total,
        color_value,
        count: rows.len(),
        children,
    }
}

/// Group `rows` along `path`, summing `value`. The root is unlabelled.
pub fn build_hierarchy(rows: &Relation, path: &[Field], value: Field, color: Field) -> Node {
    let all: Vec<&JobRecord> = rows.iter().collect();
    make_node(String::new(), Vec::new(), &all, path, value, color)
}

// ---------------------------------------------------------------------------
// Squarified treemap
// ---------------------------------------------------------------------------

/// Worst aspect ratio of a row of areas laid along a side of length `side`.
fn worst_ratio(row: &[f32], side: f32) -> f32 {
    let sum: f32 = row.iter().sum();
    if sum <= 0.0 || side <= 0.0 {
        return f32::INFINITY;
    }
    let s2 = sum * sum;
    let w2 = side * side;
    row.iter()
        .map(|&a| {
            if a <= 0.0 {
                f32::INFINITY
            } else {
                (w2 * a / s2).max(s2 / (w2 * a))
            }
        })
        .fold(0.0, f32::max)
}

/// Split `bounds` into one rectangle per value, areas proportional to the
/// values, keeping aspect ratios close to 1 (Bruls, Huizing, van Wijk).
pub fn squarify(values: &[f64], bounds: Rect) -> Vec<Rect> {
    let total: f64 = values.iter().sum();
    if values.is_empty() {
        return Vec::new();
    }
    if total <= 0.0 || bounds.area() <= 0.0 {
        return vec![Rect::from_min_size(bounds.min, vec2(0.0, 0.0)); values.len()];
    }

    let scale = bounds.area() as f64 / total;
    let areas: Vec<f32> = values.iter().map(|v| (v * scale) as f32).collect();

    let mut out = Vec::with_capacity(values.len());
    let mut free = bounds;
    let mut start = 0;
    while start < areas.len() {
        let side = free.width().min(free.height());
        let mut end = start + 1;
        while end < areas.len()
            && worst_ratio(&areas[start..=end], side) <= worst_ratio(&areas[start..end], side)
        {
            end += 1;
        }

        let row = &areas[start..end];
        let row_sum: f32 = row.iter().sum();
        if free.width() >= free.height() {
            // vertical strip on the left
            let strip = if free.height() > 0.0 { row_sum / free.height() } else { 0.0 };
            let mut y = free.min.y;
            for &a in row {
                let h = if strip > 0.0 { a / strip } else { 0.0 };
                out.push(Rect::from_min_size(pos2(free.min.x, y), vec2(strip, h)));
                y += h;
            }
            free.min.x += strip;
        } else {
            // horizontal strip on top
            let strip = if free.width() > 0.0 { row_sum / free.width() } else { 0.0 };
            let mut x = free.min.x;
            for &a in row {
                let w = if strip > 0.0 { a / strip } else { 0.0 };
                out.push(Rect::from_min_size(pos2(x, free.min.y), vec2(w, strip)));
                x += w;
            }
            free.min.y += strip;
        }
        start = end;
    }
    out
}

/// A laid-out treemap node.
#[derive(Debug, Clone)]
pub struct Tile<'a> {
    pub node: &'a Node,
    pub rect: Rect,
}

/// Room reserved above a parent tile's children for its label.
pub const TILE_HEADER: f32 = 16.0;
const TILE_PAD: f32 = 2.0;

/// Nested squarified layout of every node below `root`, parents before
/// their children.
pub fn treemap_tiles(root: &Node, bounds: Rect) -> Vec<Tile<'_>> {
    let mut out = Vec::new();
    lay_out_children(root, bounds, &mut out);
    out
}

fn lay_out_children<'a>(node: &'a Node, bounds: Rect, out: &mut Vec<Tile<'a>>) {
    let values: Vec<f64> = node.children.iter().map(|c| c.value).collect();
    for (child, rect) in node.children.iter().zip(squarify(&values, bounds)) {
        out.push(Tile { node: child, rect });
        if !child.is_leaf() {
            let inner = Rect::from_min_max(
                pos2(rect.min.x + TILE_PAD, rect.min.y + TILE_HEADER),
                pos2(rect.max.x - TILE_PAD, rect.max.y - TILE_PAD),
            );
            if inner.width() > 0.0 && inner.height() > 0.0 {
                lay_out_children(child, inner, out);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Sunburst
// ---------------------------------------------------------------------------

/// A ring sector; angles in radians clockwise from 12 o'clock.
#[derive(Debug, Clone)]
pub struct Sector<'a> {
    pub node: &'a Node,
    /// 1 for the innermost ring.
    pub ring: usize,
    pub start: f32,
    pub end: f32,
}

impl Sector<'_> {
    pub fn contains_angle(&self, angle: f32) -> bool {
        (self.start..self.end).contains(&angle)
    }
}

/// Sectors for every node below `root`; each ring spans the full circle
/// in proportion to node values.
pub fn sunburst_sectors(root: &Node) -> Vec<Sector<'_>> {
    let mut out = Vec::new();
    if root.value > 0.0 {
        lay_out_ring(root, 0.0, TAU, 1, &mut out);
    }
    out
}

fn lay_out_ring<'a>(
    node: &'a Node,
    start: f32,
    span: f32,
    ring: usize,
    out: &mut Vec<Sector<'a>>,
) {
    if node.value <= 0.0 {
        return;
    }
    let mut cursor = start;
    for child in &node.children {
        let sweep = span * (child.value / node.value) as f32;
        out.push(Sector {
            node: child,
            ring,
            start: cursor,
            end: cursor + sweep,
        });
        lay_out_ring(child, cursor, sweep, ring + 1, out);
        cursor += sweep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;
    use pretty_assertions::assert_eq;

    fn rows() -> Relation {
        Relation::from_records(vec![
            record(2023, "Senior", "Remote", "Science", "DS", 100.0, "USA"),
            record(2023, "Mid", "Remote", "Science", "DS", 50.0, "USA"),
            record(2023, "Mid", "Remote", "Science", "ML", 30.0, "USA"),
            record(2023, "Senior", "Remote", "Engineering", "DE", 400.0, "USA"),
        ])
    }

    fn tree() -> Node {
        build_hierarchy(
            &rows(),
            &[Field::JobCategory, Field::JobTitle],
            Field::SalaryInUsd,
            Field::SalaryInUsd,
        )
    }

    #[test]
    fn groups_sum_values_and_sort_descending() {
        let root = tree();
        assert_eq!(root.value, 580.0);
        let labels: Vec<_> = root.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Engineering", "Science"]);

        let science = &root.children[1];
        assert_eq!(science.value, 180.0);
        assert_eq!(science.id, vec!["Science".to_string()]);
        let titles: Vec<_> = science
            .children
            .iter()
            .map(|c| (c.label.as_str(), c.value))
            .collect();
        assert_eq!(titles, vec![("DS", 150.0), ("ML", 30.0)]);
        assert_eq!(science.children[0].id, vec!["Science".to_string(), "DS".to_string()]);
        assert!(science.children[0].is_leaf());
    }

    #[test]
    fn colour_is_value_weighted_mean() {
        let root = tree();
        let ds = &root.children[1].children[0];
        // (100*100 + 50*50) / 150
        assert!((ds.color_value - 12_500.0 / 150.0).abs() < 1e-9);
        let (lo, hi) = root.leaf_color_range();
        assert_eq!(lo, 30.0);
        assert_eq!(hi, 400.0);
    }

    #[test]
    fn empty_rows_give_empty_tree() {
        let root = build_hierarchy(
            &Relation::default(),
            &[Field::JobCategory],
            Field::SalaryInUsd,
            Field::SalaryInUsd,
        );
        assert!(root.children.is_empty());
        assert!(sunburst_sectors(&root).is_empty());
        let bounds = Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0));
        assert!(treemap_tiles(&root, bounds).is_empty());
    }

    #[test]
    fn squarify_conserves_area_and_stays_inside() {
        let bounds = Rect::from_min_size(pos2(10.0, 20.0), vec2(600.0, 400.0));
        let values = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let rects = squarify(&values, bounds);
        assert_eq!(rects.len(), values.len());

        let total: f64 = values.iter().sum();
        for (rect, v) in rects.iter().zip(values) {
            let expected = bounds.area() as f64 * v / total;
            assert!((rect.area() as f64 - expected).abs() < 1.0, "{rect:?}");
            assert!(rect.min.x >= bounds.min.x - 1e-3 && rect.max.x <= bounds.max.x + 1e-3);
            assert!(rect.min.y >= bounds.min.y - 1e-3 && rect.max.y <= bounds.max.y + 1e-3);
        }
    }

    #[test]
    fn squarify_single_value_fills_bounds() {
        let bounds = Rect::from_min_size(pos2(0.0, 0.0), vec2(300.0, 100.0));
        let rects = squarify(&[42.0], bounds);
        assert_eq!(rects, vec![bounds]);
    }

    #[test]
    fn treemap_lists_parents_before_children() {
        let root = tree();
        let tiles = treemap_tiles(&root, Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 300.0)));
        assert_eq!(tiles.len(), 5);
        assert_eq!(tiles[0].node.label, "Engineering");
        assert_eq!(tiles[1].node.label, "DE");
        assert!(tiles[0].rect.contains_rect(tiles[1].rect));
    }

    #[test]
    fn sunburst_rings_cover_the_circle() {
        let root = build_hierarchy(
            &rows(),
            &[Field::JobCategory, Field::ExperienceLevel, Field::EmploymentType],
            Field::SalaryInUsd,
            Field::SalaryInUsd,
        );
        let sectors = sunburst_sectors(&root);
        for ring in 1..=3 {
            let sweep: f32 = sectors
                .iter()
                .filter(|s| s.ring == ring)
                .map(|s| s.end - s.start)
                .sum();
            assert!((sweep - TAU).abs() < 1e-4, "ring {ring}: {sweep}");
        }
        assert!(sectors[0].contains_angle(0.0));
    }
}
