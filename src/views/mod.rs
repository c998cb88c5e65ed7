//! View descriptors: pure functions from a relation to a declarative chart
//! description. The `ui` module renders them; nothing here touches egui.
//!
//! ```text
//!  Relation ──filter(selection)──▶ filtered ──┬─▶ bar / treemap / sunburst
//!     │                                        └─▶ geo bubble / boxplot
//!     └──────────────(unfiltered)─────────────────▶ animated scatter
//! ```

mod scatter;

use std::sync::Arc;

use crate::color::ColorScale;
use crate::data::aggregate::{
    mean_salary_by_category, salary_by_country, salary_distribution_by, BoxStats,
    CategoryMean, CountryTotal,
};
use crate::data::filter::{filter, FilterSelection};
use crate::data::model::{Field, Relation};

pub use scatter::{salary_evolution_scatter, ScatterFrame, ScatterPoint, ScatterSpec};

// ---------------------------------------------------------------------------
// Shared encoding types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Treemap,
    Sunburst,
    GeoBubble,
    Box,
    AnimatedScatter,
}

/// How marks are coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorEncoding {
    /// Numeric field mapped onto a continuous scale.
    Continuous { field: Field, scale: ColorScale },
    /// One palette colour per distinct value of a text field.
    Categorical { field: Field },
}

/// How a location field is resolved to coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationMode {
    CountryNames,
}

/// Common surface of every chart description.
pub trait ChartView {
    fn kind(&self) -> ChartKind;
    fn title(&self) -> &str;
    /// True when there is nothing to draw; the renderer shows "no data".
    fn is_empty(&self) -> bool;
}

// ---------------------------------------------------------------------------
// 1. Horizontal bar: category → mean salary
// ---------------------------------------------------------------------------

/// Drawn with categories on the vertical axis and bars running right.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    pub title: String,
    pub value_label: String,
    pub category_label: String,
    /// Ascending by mean salary.
    pub bars: Vec<CategoryMean>,
}

pub fn category_salary_bar(filtered: &Relation) -> BarSpec {
    BarSpec {
        title: "Average salary by job category".to_string(),
        value_label: "Average salary (USD)".to_string(),
        category_label: "Category".to_string(),
        bars: mean_salary_by_category(filtered),
    }
}

impl ChartView for BarSpec {
    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

// ---------------------------------------------------------------------------
// 2 & 3. Treemap and sunburst
// ---------------------------------------------------------------------------

/// A hierarchy over the flat rows. Grouping along `path` and summing
/// `value` is left to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchySpec {
    pub kind: ChartKind,
    pub title: String,
    pub path: Vec<Field>,
    pub value: Field,
    pub color: ColorEncoding,
    pub rows: Arc<Relation>,
}

pub fn category_title_treemap(filtered: Arc<Relation>) -> HierarchySpec {
    HierarchySpec {
        kind: ChartKind::Treemap,
        title: "Salary by category and job title".to_string(),
        path: vec![Field::JobCategory, Field::JobTitle],
        value: Field::SalaryInUsd,
        color: ColorEncoding::Continuous {
            field: Field::SalaryInUsd,
            scale: ColorScale::RdBu,
        },
        rows: filtered,
    }
}

pub fn category_experience_sunburst(filtered: Arc<Relation>) -> HierarchySpec {
    HierarchySpec {
        kind: ChartKind::Sunburst,
        title: "Hierarchical salary distribution".to_string(),
        path: vec![
            Field::JobCategory,
            Field::ExperienceLevel,
            Field::EmploymentType,
        ],
        value: Field::SalaryInUsd,
        color: ColorEncoding::Continuous {
            field: Field::SalaryInUsd,
            scale: ColorScale::Tealgrn,
        },
        rows: filtered,
    }
}

impl ChartView for HierarchySpec {
    fn kind(&self) -> ChartKind {
        self.kind
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// 4. Geographic bubble map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GeoBubbleSpec {
    pub title: String,
    pub location: Field,
    pub location_mode: LocationMode,
    pub size: Field,
    pub color: ColorEncoding,
    /// One bubble per country present in the rows.
    pub bubbles: Vec<CountryTotal>,
    /// Colour domain, in first-appearance order over the rows.
    pub categories: Vec<String>,
}

pub fn country_bubble_map(filtered: &Relation) -> GeoBubbleSpec {
    GeoBubbleSpec {
        title: "Salary by country and category".to_string(),
        location: Field::EmployeeResidence,
        location_mode: LocationMode::CountryNames,
        size: Field::SalaryInUsd,
        color: ColorEncoding::Categorical {
            field: Field::JobCategory,
        },
        bubbles: salary_by_country(filtered),
        categories: filtered.distinct(Field::JobCategory),
    }
}

impl GeoBubbleSpec {
    pub fn max_total(&self) -> f64 {
        self.bubbles
            .iter()
            .map(|b| b.total_salary)
            .fold(0.0, f64::max)
    }
}

impl ChartView for GeoBubbleSpec {
    fn kind(&self) -> ChartKind {
        ChartKind::GeoBubble
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }
}

// ---------------------------------------------------------------------------
// 5. Boxplot: salary distribution per experience level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpec {
    pub title: String,
    pub x: Field,
    pub y: Field,
    pub x_label: String,
    pub y_label: String,
    pub color: ColorEncoding,
    pub boxes: Vec<BoxStats>,
}

pub fn experience_salary_box(filtered: &Relation) -> BoxSpec {
    BoxSpec {
        title: "Salary distribution by experience level".to_string(),
        x: Field::ExperienceLevel,
        y: Field::SalaryInUsd,
        x_label: "Experience".to_string(),
        y_label: "Salary (USD)".to_string(),
        color: ColorEncoding::Categorical {
            field: Field::ExperienceLevel,
        },
        boxes: salary_distribution_by(filtered, Field::ExperienceLevel),
    }
}

impl ChartView for BoxSpec {
    fn kind(&self) -> ChartKind {
        ChartKind::Box
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dashboard: one request/response step
// ---------------------------------------------------------------------------

/// Everything the six panels need for one selection.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub selection: FilterSelection,
    pub total_rows: usize,
    pub filtered: Arc<Relation>,
    pub bar: BarSpec,
    pub treemap: HierarchySpec,
    pub sunburst: HierarchySpec,
    pub geo: GeoBubbleSpec,
    pub boxplot: BoxSpec,
    /// Built from the full relation; the selection does not apply here.
    pub scatter: ScatterSpec,
}

impl Dashboard {
    /// filter → aggregate → describe, recomputed from scratch.
    pub fn build(relation: &Relation, selection: &FilterSelection) -> Self {
        let filtered = Arc::new(filter(relation, selection));
        log::trace!(
            "Dashboard rebuilt: {} of {} rows for year {}",
            filtered.len(),
            relation.len(),
            selection.year
        );

        Self {
            selection: selection.clone(),
            total_rows: relation.len(),
            bar: category_salary_bar(&filtered),
            treemap: category_title_treemap(Arc::clone(&filtered)),
            sunburst: category_experience_sunburst(Arc::clone(&filtered)),
            geo: country_bubble_map(&filtered),
            boxplot: experience_salary_box(&filtered),
            scatter: salary_evolution_scatter(relation),
            filtered,
        }
    }

    /// The six panels in display order.
    pub fn views(&self) -> [&dyn ChartView; 6] {
        [
            &self.bar,
            &self.treemap,
            &self.sunburst,
            &self.geo,
            &self.boxplot,
            &self.scatter,
        ]
    }
}
