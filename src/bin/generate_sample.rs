use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use jobs_dashboard::config::DATA_FILE;

const PARQUET_FILE: &str = "jobs_in_data.parquet";
const ROWS: usize = 1_200;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Pick from `(item, weight)` pairs.
    fn weighted<'a, T>(&mut self, items: &'a [(T, f64)]) -> &'a T {
        let total: f64 = items.iter().map(|(_, w)| w).sum();
        let mut pick = self.next_f64() * total;
        for (item, w) in items {
            if pick < *w {
                return item;
            }
            pick -= w;
        }
        &items[items.len() - 1].0
    }
}

/// (category, titles, base salary in USD)
const CATEGORIES: &[(&str, &[&str], f64)] = &[
    (
        "Data Science and Research",
        &["Data Scientist", "Research Scientist", "Applied Scientist"],
        155_000.0,
    ),
    (
        "Data Engineering",
        &["Data Engineer", "ETL Developer", "Big Data Engineer"],
        145_000.0,
    ),
    (
        "Data Analysis",
        &["Data Analyst", "Business Data Analyst", "Product Data Analyst"],
        105_000.0,
    ),
    (
        "Machine Learning and AI",
        &["Machine Learning Engineer", "AI Engineer", "MLOps Engineer"],
        175_000.0,
    ),
    (
        "Leadership and Management",
        &["Data Science Manager", "Head of Data", "Director of Data Science"],
        165_000.0,
    ),
    (
        "BI and Visualization",
        &["BI Developer", "Power BI Developer", "Tableau Developer"],
        115_000.0,
    ),
    (
        "Data Architecture and Modeling",
        &["Data Architect", "Data Modeler"],
        160_000.0,
    ),
    (
        "Data Quality and Operations",
        &["Data Quality Analyst", "Data Operations Engineer"],
        100_000.0,
    ),
];

const EXPERIENCE: &[((&str, f64), f64)] = &[
    (("Entry-level", 0.6), 0.10),
    (("Mid-level", 0.8), 0.25),
    (("Senior", 1.1), 0.55),
    (("Executive", 1.4), 0.10),
];

const EMPLOYMENT: &[(&str, f64)] = &[
    ("Full-time", 0.95),
    ("Contract", 0.03),
    ("Part-time", 0.01),
    ("Freelance", 0.01),
];

const SETTINGS: &[(&str, f64)] = &[("In-person", 0.5), ("Remote", 0.35), ("Hybrid", 0.15)];

/// ((country, salary factor, currency, USD per unit), weight)
const COUNTRIES: &[((&str, f64, &str, f64), f64)] = &[
    (("United States", 1.0, "USD", 1.0), 0.70),
    (("United Kingdom", 0.6, "GBP", 1.25), 0.07),
    (("Canada", 0.8, "USD", 1.0), 0.05),
    (("Spain", 0.4, "EUR", 1.08), 0.03),
    (("Germany", 0.6, "EUR", 1.08), 0.03),
    (("France", 0.5, "EUR", 1.08), 0.02),
    (("Netherlands", 0.55, "EUR", 1.08), 0.02),
    (("Portugal", 0.35, "EUR", 1.08), 0.02),
    (("India", 0.2, "USD", 1.0), 0.02),
    (("Australia", 0.75, "USD", 1.0), 0.02),
    (("Brazil", 0.3, "USD", 1.0), 0.01),
    (("Nigeria", 0.2, "USD", 1.0), 0.01),
];

const YEARS: &[(i64, f64)] = &[(2020, 0.05), (2021, 0.1), (2022, 0.25), (2023, 0.6)];

const SIZES: &[(&str, f64)] = &[("S", 0.1), ("M", 0.8), ("L", 0.1)];

#[derive(Default)]
struct Columns {
    work_year: Vec<i64>,
    job_title: Vec<String>,
    job_category: Vec<String>,
    salary_currency: Vec<String>,
    salary: Vec<f64>,
    salary_in_usd: Vec<f64>,
    employee_residence: Vec<String>,
    experience_level: Vec<String>,
    employment_type: Vec<String>,
    work_setting: Vec<String>,
    company_location: Vec<String>,
    company_size: Vec<String>,
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let categories: Vec<(&(&str, &[&str], f64), f64)> =
        CATEGORIES.iter().map(|c| (c, 1.0)).collect();
    let mut cols = Columns::default();

    for _ in 0..ROWS {
        let &year = rng.weighted(YEARS);
        let &(category, titles, base) = *rng.weighted(&categories);
        let title = titles[(rng.next_u64() % titles.len() as u64) as usize];
        let &(experience, exp_factor) = rng.weighted(EXPERIENCE);
        let &(country, country_factor, currency, usd_rate) = rng.weighted(COUNTRIES);
        let &employment = rng.weighted(EMPLOYMENT);
        let &setting = rng.weighted(SETTINGS);
        let &size = rng.weighted(SIZES);

        // later years pay a bit more; noise is log-normal
        let drift = 1.0 + 0.04 * (year - 2020) as f64;
        let usd = (base * exp_factor * country_factor * drift * rng.gauss(0.0, 0.25).exp())
            .max(15_000.0)
            .round();

        cols.work_year.push(year);
        cols.job_title.push(title.to_string());
        cols.job_category.push(category.to_string());
        cols.salary_currency.push(currency.to_string());
        cols.salary.push((usd / usd_rate).round());
        cols.salary_in_usd.push(usd);
        cols.employee_residence.push(country.to_string());
        cols.experience_level.push(experience.to_string());
        cols.employment_type.push(employment.to_string());
        cols.work_setting.push(setting.to_string());
        cols.company_location.push(country.to_string());
        cols.company_size.push(size.to_string());
    }
    cols
}

const HEADER: [&str; 12] = [
    "work_year",
    "job_title",
    "job_category",
    "salary_currency",
    "salary",
    "salary_in_usd",
    "employee_residence",
    "experience_level",
    "employment_type",
    "work_setting",
    "company_location",
    "company_size",
];

fn write_csv(cols: &Columns, path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADER)?;
    for i in 0..cols.work_year.len() {
        writer.write_record([
            cols.work_year[i].to_string(),
            cols.job_title[i].clone(),
            cols.job_category[i].clone(),
            cols.salary_currency[i].clone(),
            cols.salary[i].to_string(),
            cols.salary_in_usd[i].to_string(),
            cols.employee_residence[i].clone(),
            cols.experience_level[i].clone(),
            cols.employment_type[i].clone(),
            cols.work_setting[i].clone(),
            cols.company_location[i].clone(),
            cols.company_size[i].clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn strings(values: &[String]) -> Arc<StringArray> {
    Arc::new(StringArray::from(
        values.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    ))
}

fn write_parquet(cols: Columns, path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(
        HEADER
            .iter()
            .map(|&name| {
                let dtype = match name {
                    "work_year" => DataType::Int64,
                    "salary" | "salary_in_usd" => DataType::Float64,
                    _ => DataType::Utf8,
                };
                Field::new(name, dtype, false)
            })
            .collect::<Vec<_>>(),
    ));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(cols.work_year)),
            strings(&cols.job_title),
            strings(&cols.job_category),
            strings(&cols.salary_currency),
            Arc::new(Float64Array::from(cols.salary)),
            Arc::new(Float64Array::from(cols.salary_in_usd)),
            strings(&cols.employee_residence),
            strings(&cols.experience_level),
            strings(&cols.employment_type),
            strings(&cols.work_setting),
            strings(&cols.company_location),
            strings(&cols.company_size),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let cols = generate(&mut rng);
    let rows = cols.work_year.len();

    write_csv(&cols, DATA_FILE)?;
    write_parquet(cols, PARQUET_FILE)?;

    println!("Wrote {rows} job records to {DATA_FILE} and {PARQUET_FILE}");
    Ok(())
}
