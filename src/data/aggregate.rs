use std::collections::HashMap;

use super::model::{Field, JobRecord, Relation};

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Rows of `relation` grouped by the text of `field`, groups in order of
/// first appearance. Groups are never empty.
pub fn group_by(relation: &Relation, field: Field) -> Vec<(String, Vec<&JobRecord>)> {
    group_rows(relation, field)
}

/// [`group_by`] over any sequence of rows, e.g. a group produced earlier.
pub fn group_rows<'a>(
    rows: impl IntoIterator<Item = &'a JobRecord>,
    field: Field,
) -> Vec<(String, Vec<&'a JobRecord>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&JobRecord>)> = Vec::new();
    for record in rows {
        let key = field.text(record);
        match index.get(key.as_ref()) {
            Some(&slot) => groups[slot].1.push(record),
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push((key.into_owned(), vec![record]));
            }
        }
    }
    groups
}

fn salary_sum(rows: &[&JobRecord]) -> f64 {
    rows.iter().map(|r| r.salary_in_usd).sum()
}

// ---------------------------------------------------------------------------
// Mean salary per category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMean {
    pub category: String,
    pub mean_salary: f64,
    pub count: usize,
}

/// Average `salary_in_usd` per `job_category`, ascending by mean.
///
/// Equal means keep their first-appearance order. Categories without rows
/// are not emitted.
pub fn mean_salary_by_category(relation: &Relation) -> Vec<CategoryMean> {
    let mut out: Vec<CategoryMean> = group_by(relation, Field::JobCategory)
        .into_iter()
        .map(|(category, rows)| CategoryMean {
            category,
            mean_salary: salary_sum(&rows) / rows.len() as f64,
            count: rows.len(),
        })
        .collect();
    // sort_by is stable
    out.sort_by(|a, b| a.mean_salary.total_cmp(&b.mean_salary));
    out
}

// ---------------------------------------------------------------------------
// Totals per country
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CountryTotal {
    pub country: String,
    pub total_salary: f64,
    pub count: usize,
    /// Summed salary per category, largest first; ties keep first
    /// appearance.
    pub categories: Vec<(String, f64)>,
}

impl CountryTotal {
    /// Category with the largest summed salary in this country.
    pub fn top_category(&self) -> &str {
        self.categories.first().map_or("", |(c, _)| c.as_str())
    }
}

/// Summed salary per `employee_residence`, in first-appearance order.
pub fn salary_by_country(relation: &Relation) -> Vec<CountryTotal> {
    group_by(relation, Field::EmployeeResidence)
        .into_iter()
        .map(|(country, rows)| {
            let mut categories: Vec<(String, f64)> =
                group_rows(rows.iter().copied(), Field::JobCategory)
                    .into_iter()
                    .map(|(category, members)| (category, salary_sum(&members)))
                    .collect();
            categories.sort_by(|a, b| b.1.total_cmp(&a.1));
            CountryTotal {
                country,
                total_salary: salary_sum(&rows),
                count: rows.len(),
                categories,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Salary distribution (box statistics)
// ---------------------------------------------------------------------------

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub group: String,
    pub count: usize,
    pub mean: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest observation within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest observation within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

const WHISKER_COEF: f64 = 1.5;

/// Linear-interpolated quantile of an ascending, non-empty slice.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

impl BoxStats {
    /// `None` when `values` is empty.
    pub fn from_values(group: String, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - WHISKER_COEF * iqr;
        let hi_fence = q3 + WHISKER_COEF * iqr;

        let inside = sorted.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(Self {
            group,
            count: sorted.len(),
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Salary box statistics for each value of `field`, first-appearance order.
pub fn salary_distribution_by(relation: &Relation, field: Field) -> Vec<BoxStats> {
    group_by(relation, field)
        .into_iter()
        .filter_map(|(group, rows)| {
            let values: Vec<f64> = rows.iter().map(|r| r.salary_in_usd).collect();
            BoxStats::from_values(group, &values)
        })
        .collect()
}
