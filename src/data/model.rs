use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Field – a column of the source table
// ---------------------------------------------------------------------------

/// The columns every source file must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    WorkYear,
    ExperienceLevel,
    EmploymentType,
    JobTitle,
    JobCategory,
    SalaryInUsd,
    EmployeeResidence,
    WorkSetting,
}

impl Field {
    /// All required columns, in the order they are reported when missing.
    pub const ALL: [Field; 8] = [
        Field::WorkYear,
        Field::ExperienceLevel,
        Field::EmploymentType,
        Field::JobTitle,
        Field::JobCategory,
        Field::SalaryInUsd,
        Field::EmployeeResidence,
        Field::WorkSetting,
    ];

    /// Header name of the column in the source file.
    pub fn column(self) -> &'static str {
        match self {
            Field::WorkYear => "work_year",
            Field::ExperienceLevel => "experience_level",
            Field::EmploymentType => "employment_type",
            Field::JobTitle => "job_title",
            Field::JobCategory => "job_category",
            Field::SalaryInUsd => "salary_in_usd",
            Field::EmployeeResidence => "employee_residence",
            Field::WorkSetting => "work_setting",
        }
    }

    /// The record's value for this column rendered as text.
    pub fn text(self, record: &JobRecord) -> Cow<'_, str> {
        match self {
            Field::WorkYear => Cow::Owned(record.work_year.to_string()),
            Field::ExperienceLevel => Cow::Borrowed(&record.experience_level),
            Field::EmploymentType => Cow::Borrowed(&record.employment_type),
            Field::JobTitle => Cow::Borrowed(&record.job_title),
            Field::JobCategory => Cow::Borrowed(&record.job_category),
            Field::SalaryInUsd => Cow::Owned(record.salary_in_usd.to_string()),
            Field::EmployeeResidence => Cow::Borrowed(&record.employee_residence),
            Field::WorkSetting => Cow::Borrowed(&record.work_setting),
        }
    }

    /// Numeric value of the column, if it is a numeric column.
    pub fn number(self, record: &JobRecord) -> Option<f64> {
        match self {
            Field::WorkYear => Some(f64::from(record.work_year)),
            Field::SalaryInUsd => Some(record.salary_in_usd),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// JobRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single job posting. Extra source columns are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobRecord {
    pub work_year: i32,
    pub experience_level: String,
    pub employment_type: String,
    pub job_title: String,
    pub job_category: String,
    pub salary_in_usd: f64,
    pub employee_residence: String,
    pub work_setting: String,
}

// ---------------------------------------------------------------------------
// Relation – an ordered, immutable table of records
// ---------------------------------------------------------------------------

/// The loaded table, or any order-preserving subset of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relation {
    records: Vec<JobRecord>,
}

impl Relation {
    pub fn from_records(records: Vec<JobRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JobRecord> {
        self.records.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the relation has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct `work_year` values, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.work_year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct values of a column in order of first appearance.
    pub fn distinct(&self, field: Field) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for record in &self.records {
            let value = field.text(record);
            if !seen.contains(value.as_ref()) {
                seen.insert(value.to_string());
                out.push(value.into_owned());
            }
        }
        out
    }

    pub fn experience_levels(&self) -> Vec<String> {
        self.distinct(Field::ExperienceLevel)
    }

    pub fn work_settings(&self) -> Vec<String> {
        self.distinct(Field::WorkSetting)
    }
}

impl<'a> IntoIterator for &'a Relation {
    type Item = &'a JobRecord;
    type IntoIter = std::slice::Iter<'a, JobRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<JobRecord> for Relation {
    fn from_iter<I: IntoIterator<Item = JobRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(
        year: i32,
        experience: &str,
        setting: &str,
        category: &str,
        title: &str,
        salary: f64,
        country: &str,
    ) -> JobRecord {
        JobRecord {
            work_year: year,
            experience_level: experience.to_string(),
            employment_type: "Full-time".to_string(),
            job_title: title.to_string(),
            job_category: category.to_string(),
            salary_in_usd: salary,
            employee_residence: country.to_string(),
            work_setting: setting.to_string(),
        }
    }

    /// The three-row relation used throughout the unit tests.
    pub fn three_rows() -> Relation {
        Relation::from_records(vec![
            record(2023, "Senior", "Remote", "Data Science", "DS", 100_000.0, "USA"),
            record(2023, "Mid", "Hybrid", "Data Science", "DS", 80_000.0, "USA"),
            record(2022, "Senior", "Remote", "Engineering", "DE", 120_000.0, "Germany"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::three_rows;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn years_are_distinct_and_ascending() {
        assert_eq!(three_rows().years(), vec![2022, 2023]);
    }

    #[test]
    fn distinct_keeps_first_appearance_order() {
        let rel = three_rows();
        assert_eq!(rel.experience_levels(), vec!["Senior", "Mid"]);
        assert_eq!(rel.work_settings(), vec!["Remote", "Hybrid"]);
        assert_eq!(
            rel.distinct(Field::EmployeeResidence),
            vec!["USA", "Germany"]
        );
    }

    #[test]
    fn numeric_fields() {
        let rel = three_rows();
        let first = &rel.records()[0];
        assert_eq!(Field::SalaryInUsd.number(first), Some(100_000.0));
        assert_eq!(Field::WorkYear.number(first), Some(2023.0));
        assert_eq!(Field::JobTitle.number(first), None);
        assert_eq!(Field::WorkYear.text(first), "2023");
    }
}
