use crate::data::model::{Field, Relation};

use super::{ChartKind, ChartView, ColorEncoding};

/// One mark of the animated scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    /// Index into [`ScatterSpec::x_categories`].
    pub x: usize,
    pub salary: f64,
    /// Relative marker size in `0..=1`, area-proportional to salary.
    pub size: f64,
    pub category: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterFrame {
    pub year: i32,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSpec {
    pub title: String,
    pub x: Field,
    pub y: Field,
    pub animation_frame: Field,
    pub size: Field,
    pub color: ColorEncoding,
    pub hover: Field,
    /// Experience levels in first-appearance order over all years.
    pub x_categories: Vec<String>,
    /// Colour domain, first-appearance order over all years.
    pub categories: Vec<String>,
    pub max_salary: f64,
    /// One frame per year, ascending.
    pub frames: Vec<ScatterFrame>,
}

/// Salary against experience, one animation frame per year.
///
/// Takes the whole relation: this panel shows every year side by side
/// in time, so the sidebar selection does not apply to it.
pub fn salary_evolution_scatter(relation: &Relation) -> ScatterSpec {
    let x_categories = relation.experience_levels();
    let max_salary = relation
        .iter()
        .map(|r| r.salary_in_usd)
        .fold(0.0, f64::max);

    let frames = relation
        .years()
        .into_iter()
        .map(|year| ScatterFrame {
            year,
            points: relation
                .iter()
                .filter(|r| r.work_year == year)
                .map(|r| ScatterPoint {
                    x: x_categories
                        .iter()
                        .position(|c| *c == r.experience_level)
                        .unwrap_or_default(),
                    salary: r.salary_in_usd,
                    size: if max_salary > 0.0 {
                        (r.salary_in_usd / max_salary).sqrt()
                    } else {
                        0.0
                    },
                    category: r.job_category.clone(),
                    title: r.job_title.clone(),
                })
                .collect(),
        })
        .collect();

    ScatterSpec {
        title: "Salary evolution by year and category".to_string(),
        x: Field::ExperienceLevel,
        y: Field::SalaryInUsd,
        animation_frame: Field::WorkYear,
        size: Field::SalaryInUsd,
        color: ColorEncoding::Categorical {
            field: Field::JobCategory,
        },
        hover: Field::JobTitle,
        categories: relation.distinct(Field::JobCategory),
        x_categories,
        max_salary,
        frames,
    }
}

impl ChartView for ScatterSpec {
    fn kind(&self) -> ChartKind {
        ChartKind::AnimatedScatter
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::three_rows;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_frame_per_year_ascending() {
        let spec = salary_evolution_scatter(&three_rows());
        let years: Vec<_> = spec.frames.iter().map(|f| f.year).collect();
        assert_eq!(years, vec![2022, 2023]);
        assert_eq!(spec.frames[1].points.len(), 2);
    }

    #[test]
    fn points_index_experience_and_scale_by_area() {
        let spec = salary_evolution_scatter(&three_rows());
        assert_eq!(spec.x_categories, vec!["Senior", "Mid"]);
        assert_eq!(spec.max_salary, 120_000.0);

        let frame = &spec.frames[1];
        assert_eq!(frame.points[0].x, 0);
        assert_eq!(frame.points[1].x, 1);
        assert_eq!(frame.points[1].title, "DS");
        let top = &spec.frames[0].points[0];
        assert_eq!(top.size, 1.0);
        assert!((frame.points[0].size - (100.0f64 / 120.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_relation_has_no_frames() {
        let spec = salary_evolution_scatter(&Relation::default());
        assert!(spec.is_empty());
    }
}
