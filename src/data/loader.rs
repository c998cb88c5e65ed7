use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use once_cell::sync::{Lazy, OnceCell};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{Field, JobRecord, Relation};
use crate::config::DATA_FILE;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Every way the source table can fail to become a [`Relation`].
///
/// All variants are fatal at startup: there is no partial dataset.
#[derive(Debug, Error)]
pub enum DataUnavailable {
    #[error("cannot read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),
    #[error("malformed Parquet")]
    Parquet(#[from] ParquetError),
    #[error("malformed Arrow batch")]
    Arrow(#[from] ArrowError),
    #[error("required column '{column}' is missing")]
    MissingColumn { column: &'static str },
    #[error("column '{column}' has type {data_type}, expected text")]
    InvalidColumnType {
        column: &'static str,
        data_type: String,
    },
    #[error("row {row}: salary_in_usd '{value}' is not a non-negative number")]
    InvalidSalary { row: usize, value: String },
    #[error("row {row}: work_year '{value}' is not an integer year")]
    InvalidYear { row: usize, value: String },
    #[error("unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },
    #[error("{path} contains no records")]
    Empty { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a job-record table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, columns addressed by name (primary format)
/// * `.json`    – `[{ "work_year": 2023, "salary_in_usd": 95000, ... }, ...]`
/// * `.parquet` – one column per field, written by Pandas or Polars
pub fn load_file(path: &Path) -> Result<Relation, DataUnavailable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let relation = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        _ => return Err(DataUnavailable::UnsupportedFormat { extension: ext }),
    };

    if relation.is_empty() {
        return Err(DataUnavailable::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(relation)
}

/// A source file parsed at most once per process.
///
/// The first successful [`DatasetCache::get`] parses the file; later calls
/// hand out the same `Arc` without touching the file again. Failures are
/// not cached.
pub struct DatasetCache {
    path: PathBuf,
    cell: OnceCell<Arc<Relation>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Result<Arc<Relation>, DataUnavailable> {
        self.cell
            .get_or_try_init(|| {
                let relation = load_file(&self.path)?;
                log::info!(
                    "Loaded {} job records from {}",
                    relation.len(),
                    self.path.display()
                );
                Ok(Arc::new(relation))
            })
            .cloned()
    }
}

static DATASET: Lazy<DatasetCache> = Lazy::new(|| DatasetCache::new(DATA_FILE));

/// The process-wide dataset, read from [`DATA_FILE`] on first use.
pub fn load() -> Result<Arc<Relation>, DataUnavailable> {
    DATASET.get()
}

// ---------------------------------------------------------------------------
// Shared cell validation
// ---------------------------------------------------------------------------

fn parse_year(row: usize, raw: &str) -> Result<i32, DataUnavailable> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| DataUnavailable::InvalidYear {
            row,
            value: raw.to_string(),
        })
}

fn parse_salary(row: usize, raw: &str) -> Result<f64, DataUnavailable> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(|v| check_salary(v).ok())
        .ok_or_else(|| DataUnavailable::InvalidSalary {
            row,
            value: raw.to_string(),
        })
}

fn check_salary(value: f64) -> Result<f64, f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(value)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Column positions of the required fields within a CSV header row.
struct ColumnIndex(Vec<(Field, usize)>);

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DataUnavailable> {
        Field::ALL
            .iter()
            .map(|&field| {
                headers
                    .iter()
                    .position(|h| h.trim() == field.column())
                    .map(|pos| (field, pos))
                    .ok_or(DataUnavailable::MissingColumn {
                        column: field.column(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    fn get<'r>(&self, record: &'r csv::StringRecord, field: Field) -> &'r str {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, pos)| record.get(*pos))
            .unwrap_or("")
    }
}

/// CSV layout: header row with (at least) the eight required column names,
/// in any order. Other columns such as `salary_currency` or `company_size`
/// are ignored.
fn load_csv(path: &Path) -> Result<Relation, DataUnavailable> {
    let file = File::open(path).map_err(|source| DataUnavailable::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);
    let columns = ColumnIndex::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let rec = result?;
        let text = |field: Field| columns.get(&rec, field).to_string();

        records.push(JobRecord {
            work_year: parse_year(row, columns.get(&rec, Field::WorkYear))?,
            experience_level: text(Field::ExperienceLevel),
            employment_type: text(Field::EmploymentType),
            job_title: text(Field::JobTitle),
            job_category: text(Field::JobCategory),
            salary_in_usd: parse_salary(row, columns.get(&rec, Field::SalaryInUsd))?,
            employee_residence: text(Field::EmployeeResidence),
            work_setting: text(Field::WorkSetting),
        });
    }

    Ok(Relation::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "work_year": 2023,
///     "job_title": "Data Scientist",
///     "salary_in_usd": 95000,
///     ...
///   }
/// ]
/// ```
fn load_json(path: &Path) -> Result<Relation, DataUnavailable> {
    let text = std::fs::read_to_string(path).map_err(|source| DataUnavailable::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows: Vec<Map<String, JsonValue>> = serde_json::from_str(&text)?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, obj) in rows.into_iter().enumerate() {
        let row = i + 1;
        for field in Field::ALL {
            if !obj.contains_key(field.column()) {
                return Err(DataUnavailable::MissingColumn {
                    column: field.column(),
                });
            }
        }

        let salary = &obj[Field::SalaryInUsd.column()];
        if salary.as_f64().and_then(|v| check_salary(v).ok()).is_none() {
            return Err(DataUnavailable::InvalidSalary {
                row,
                value: salary.to_string(),
            });
        }
        let year = &obj[Field::WorkYear.column()];
        if year.as_i64().and_then(|v| i32::try_from(v).ok()).is_none() {
            return Err(DataUnavailable::InvalidYear {
                row,
                value: year.to_string(),
            });
        }

        records.push(serde_json::from_value(JsonValue::Object(obj))?);
    }

    Ok(Relation::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Expected schema:
/// - text fields: Utf8 or LargeUtf8
/// - `work_year`: Int32 or Int64
/// - `salary_in_usd`: Float64, Float32, Int64 or Int32
fn load_parquet(path: &Path) -> Result<Relation, DataUnavailable> {
    let file = File::open(path).map_err(|source| DataUnavailable::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let text = TextColumns::resolve(&batch)?;
        let offset = records.len();
        for i in 0..batch.num_rows() {
            let row = offset + i + 1;
            records.push(read_parquet_row(&batch, &text, i, row)?);
        }
    }

    Ok(Relation::from_records(records))
}

fn column(batch: &RecordBatch, field: Field) -> Result<&ArrayRef, DataUnavailable> {
    let idx = batch
        .schema()
        .index_of(field.column())
        .map_err(|_| DataUnavailable::MissingColumn {
            column: field.column(),
        })?;
    Ok(batch.column(idx))
}

const TEXT_FIELDS: [Field; 6] = [
    Field::ExperienceLevel,
    Field::EmploymentType,
    Field::JobTitle,
    Field::JobCategory,
    Field::EmployeeResidence,
    Field::WorkSetting,
];

/// The text columns of one batch as plain `Utf8`/`LargeUtf8` arrays.
///
/// Dictionary-encoded (pandas categoricals) and view columns are cast to
/// `Utf8` once per batch; any other type is rejected.
struct TextColumns(Vec<(Field, ArrayRef)>);

impl TextColumns {
    fn resolve(batch: &RecordBatch) -> Result<Self, DataUnavailable> {
        TEXT_FIELDS
            .iter()
            .map(|&field| Ok((field, text_column(batch, field)?)))
            .collect::<Result<Vec<_>, DataUnavailable>>()
            .map(TextColumns)
    }

    fn value(&self, field: Field, row: usize) -> String {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, col)| extract_string(col, row))
            .unwrap_or_default()
    }
}

fn is_text(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
    )
}

fn text_column(batch: &RecordBatch, field: Field) -> Result<ArrayRef, DataUnavailable> {
    let col = column(batch, field)?;
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => Ok(Arc::clone(col)),
        DataType::Utf8View => Ok(cast(col, &DataType::Utf8)?),
        DataType::Dictionary(_, values) if is_text(values) => Ok(cast(col, &DataType::Utf8)?),
        other => Err(DataUnavailable::InvalidColumnType {
            column: field.column(),
            data_type: other.to_string(),
        }),
    }
}

fn read_parquet_row(
    batch: &RecordBatch,
    text_columns: &TextColumns,
    i: usize,
    row: usize,
) -> Result<JobRecord, DataUnavailable> {
    let text = |field: Field| text_columns.value(field, i);

    let year_col = column(batch, Field::WorkYear)?;
    let work_year = extract_i64(year_col, i)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| DataUnavailable::InvalidYear {
            row,
            value: cell_debug(year_col, i),
        })?;

    let salary_col = column(batch, Field::SalaryInUsd)?;
    let salary_in_usd = extract_f64(salary_col, i)
        .and_then(|v| check_salary(v).ok())
        .ok_or_else(|| DataUnavailable::InvalidSalary {
            row,
            value: cell_debug(salary_col, i),
        })?;

    Ok(JobRecord {
        work_year,
        experience_level: text(Field::ExperienceLevel),
        employment_type: text(Field::EmploymentType),
        job_title: text(Field::JobTitle),
        job_category: text(Field::JobCategory),
        salary_in_usd,
        employee_residence: text(Field::EmployeeResidence),
        work_setting: text(Field::WorkSetting),
    })
}

// -- Arrow helpers --

/// Text value of a cell of a resolved text column; nulls read as empty text.
fn extract_string(col: &ArrayRef, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        arr.value(row).to_string()
    } else if let Some(arr) = col.as_any().downcast_ref::<LargeStringArray>() {
        arr.value(row).to_string()
    } else {
        String::new()
    }
}

fn extract_i64(col: &ArrayRef, row: usize) -> Option<i64> {
    if col.is_null(row) {
        return None;
    }
    if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        Some(arr.value(row))
    } else {
        col.as_any()
            .downcast_ref::<Int32Array>()
            .map(|arr| i64::from(arr.value(row)))
    }
}

fn extract_f64(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        Some(arr.value(row))
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        Some(f64::from(arr.value(row)))
    } else {
        extract_i64(col, row).map(|v| v as f64)
    }
}

fn cell_debug(col: &ArrayRef, row: usize) -> String {
    if col.is_null(row) {
        "null".to_string()
    } else {
        format!("<{}>", col.data_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::DictionaryArray;
    use arrow::datatypes::Int32Type;
    use parquet::arrow::ArrowWriter;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str = "work_year,job_title,job_category,salary_currency,salary,salary_in_usd,employee_residence,experience_level,employment_type,work_setting,company_location,company_size";

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn sample_csv() -> String {
        format!(
            "{HEADER}\n\
             2023,Data DevOps Engineer,Data Engineering,EUR,88000,95012,Germany,Mid-level,Full-time,Hybrid,Germany,L\n\
             2023,Data Architect,Data Architecture and Modeling,USD,186000,186000,United States,Senior,Full-time,In-person,United States,M\n\
             2022,Data Analyst,Data Analysis,USD,65000,65000.5,United States,Entry-level,Contract,Remote,United States,S\n"
        )
    }

    #[test]
    fn csv_loads_required_columns_in_any_order() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "jobs.csv", &sample_csv());

        let rel = load_file(&path).unwrap();
        assert_eq!(rel.len(), 3);
        let first = &rel.records()[0];
        assert_eq!(first.work_year, 2023);
        assert_eq!(first.job_title, "Data DevOps Engineer");
        assert_eq!(first.salary_in_usd, 95012.0);
        assert_eq!(first.employee_residence, "Germany");
        assert_eq!(first.work_setting, "Hybrid");
        assert_eq!(rel.records()[2].salary_in_usd, 65000.5);
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "jobs.csv",
            "work_year,job_title,job_category,salary_in_usd,employee_residence,experience_level,employment_type\n\
             2023,DS,Data Science,1,USA,Senior,Full-time\n",
        );

        match load_file(&path) {
            Err(DataUnavailable::MissingColumn { column }) => assert_eq!(column, "work_setting"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn csv_non_numeric_salary_is_reported() {
        let dir = TempDir::new().unwrap();
        let contents = format!(
            "{HEADER}\n2023,DS,Data Science,USD,1,lots,USA,Senior,Full-time,Remote,USA,M\n"
        );
        let path = write_file(&dir, "jobs.csv", &contents);

        match load_file(&path) {
            Err(DataUnavailable::InvalidSalary { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "lots");
            }
            other => panic!("expected InvalidSalary, got {other:?}"),
        }
    }

    #[test]
    fn csv_negative_salary_is_rejected() {
        let dir = TempDir::new().unwrap();
        let contents = format!(
            "{HEADER}\n2023,DS,Data Science,USD,1,-5,USA,Senior,Full-time,Remote,USA,M\n"
        );
        let path = write_file(&dir, "jobs.csv", &contents);
        assert!(matches!(
            load_file(&path),
            Err(DataUnavailable::InvalidSalary { .. })
        ));
    }

    #[test]
    fn csv_bad_year_is_reported() {
        let dir = TempDir::new().unwrap();
        let contents = format!(
            "{HEADER}\ntwenty,DS,Data Science,USD,1,1,USA,Senior,Full-time,Remote,USA,M\n"
        );
        let path = write_file(&dir, "jobs.csv", &contents);
        assert!(matches!(
            load_file(&path),
            Err(DataUnavailable::InvalidYear { row: 1, .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, DataUnavailable::Io { .. }));
    }

    #[test]
    fn header_only_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "jobs.csv", &format!("{HEADER}\n"));
        assert!(matches!(
            load_file(&path),
            Err(DataUnavailable::Empty { .. })
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "jobs.xlsx", "");
        match load_file(&path) {
            Err(DataUnavailable::UnsupportedFormat { extension }) => {
                assert_eq!(extension, "xlsx")
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn json_records_load() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "jobs.json",
            r#"[{"work_year": 2021, "job_title": "ML Engineer", "job_category": "Machine Learning and AI",
                 "salary_in_usd": 150000, "employee_residence": "Canada", "experience_level": "Senior",
                 "employment_type": "Full-time", "work_setting": "Remote", "company_size": "M"}]"#,
        );

        let rel = load_file(&path).unwrap();
        assert_eq!(rel.len(), 1);
        assert_eq!(rel.records()[0].salary_in_usd, 150000.0);
        assert_eq!(rel.records()[0].job_category, "Machine Learning and AI");
    }

    #[test]
    fn json_string_salary_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "jobs.json",
            r#"[{"work_year": 2021, "job_title": "ML Engineer", "job_category": "ML",
                 "salary_in_usd": "high", "employee_residence": "Canada", "experience_level": "Senior",
                 "employment_type": "Full-time", "work_setting": "Remote"}]"#,
        );
        assert!(matches!(
            load_file(&path),
            Err(DataUnavailable::InvalidSalary { row: 1, .. })
        ));
    }

    fn text_array(value: &str) -> ArrayRef {
        Arc::new(StringArray::from(vec![value]))
    }

    /// One-row Parquet file with the given `job_title` and
    /// `experience_level` columns.
    fn write_parquet(dir: &TempDir, job_title: ArrayRef, experience: ArrayRef) -> PathBuf {
        let year: ArrayRef = Arc::new(Int64Array::from(vec![2023]));
        let salary: ArrayRef = Arc::new(Float64Array::from(vec![150_000.0]));
        let batch = RecordBatch::try_from_iter(vec![
            ("work_year", year),
            ("job_title", job_title),
            ("job_category", text_array("Data Science and Research")),
            ("salary_in_usd", salary),
            ("employee_residence", text_array("Canada")),
            ("experience_level", experience),
            ("employment_type", text_array("Full-time")),
            ("work_setting", text_array("Remote")),
        ])
        .unwrap();

        let path = dir.path().join("jobs.parquet");
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn parquet_reads_plain_and_dictionary_text() {
        let dir = TempDir::new().unwrap();
        let experience: DictionaryArray<Int32Type> = vec!["Senior"].into_iter().collect();
        let path = write_parquet(&dir, text_array("Data Scientist"), Arc::new(experience));

        let rel = load_file(&path).unwrap();
        assert_eq!(rel.len(), 1);
        let first = &rel.records()[0];
        assert_eq!(first.job_title, "Data Scientist");
        assert_eq!(first.experience_level, "Senior");
        assert_eq!(first.work_year, 2023);
        assert_eq!(first.salary_in_usd, 150_000.0);
    }

    #[test]
    fn parquet_numeric_text_column_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_parquet(
            &dir,
            Arc::new(Int64Array::from(vec![42])),
            text_array("Senior"),
        );

        match load_file(&path) {
            Err(DataUnavailable::InvalidColumnType { column, data_type }) => {
                assert_eq!(column, "job_title");
                assert_eq!(data_type, "Int64");
            }
            other => panic!("expected InvalidColumnType, got {other:?}"),
        }
    }

    #[test]
    fn cache_parses_once_and_shares_the_relation() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "jobs.csv", &sample_csv());
        let cache = DatasetCache::new(&path);

        let first = cache.get().unwrap();
        std::fs::remove_file(&path).unwrap();
        let second = cache.get().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn cache_does_not_remember_failures() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("late.csv");
        let cache = DatasetCache::new(&path);
        assert!(cache.get().is_err());

        write_file(&dir, "late.csv", &sample_csv());
        assert_eq!(cache.get().unwrap().len(), 3);
    }
}
