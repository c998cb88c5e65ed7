use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use jobs_dashboard::data::aggregate::mean_salary_by_category;
use jobs_dashboard::data::filter::{filter, FilterSelection};
use jobs_dashboard::data::loader::{self, load_file, DatasetCache};
use jobs_dashboard::data::model::Relation;
use jobs_dashboard::views::{ChartKind, Dashboard};
use jobs_dashboard::DataUnavailable;
use pretty_assertions::assert_eq;

const HEADER: &str = "work_year,job_title,job_category,salary_currency,salary,salary_in_usd,\
employee_residence,experience_level,employment_type,work_setting,company_location,company_size";

fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn three_row_file() -> tempfile::NamedTempFile {
    write_csv(&[
        "2023,DS,Data Science,USD,100000,100000,USA,Senior,Full-time,Remote,USA,M",
        "2023,DS,Data Science,USD,80000,80000,USA,Mid,Full-time,Hybrid,USA,M",
        "2022,DE,Engineering,EUR,110000,120000,Germany,Senior,Full-time,Remote,Germany,L",
    ])
}

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn selection(year: i32, experience: &[&str], settings: &[&str]) -> FilterSelection {
    FilterSelection {
        year,
        experience_levels: set(experience),
        work_settings: set(settings),
    }
}

fn bundled() -> Relation {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("jobs_in_data.csv");
    load_file(&path).unwrap()
}

#[test]
fn filtered_rows_keep_source_order() {
    let file = three_row_file();
    let relation = load_file(file.path()).unwrap();

    let filtered = filter(&relation, &selection(2023, &["Senior", "Mid"], &["Remote", "Hybrid"]));
    let salaries: Vec<f64> = filtered.iter().map(|r| r.salary_in_usd).collect();
    assert_eq!(salaries, vec![100_000.0, 80_000.0]);

    let means = mean_salary_by_category(&filtered);
    assert_eq!(means.len(), 1);
    assert_eq!(means[0].category, "Data Science");
    assert_eq!(means[0].mean_salary, 90_000.0);
}

#[test]
fn empty_multiselect_yields_empty_panels() {
    let relation = bundled();
    let sel = selection(2023, &[], &["Remote", "Hybrid", "In-person"]);
    assert!(filter(&relation, &sel).is_empty());

    let dashboard = Dashboard::build(&relation, &sel);
    assert!(dashboard.filtered.is_empty());
    let views = dashboard.views();
    assert!(views[..5].iter().all(|v| v.is_empty()));
    // the scatter never sees the selection
    assert!(!views[5].is_empty());
}

#[test]
fn filtering_is_idempotent_and_a_subset() {
    let relation = bundled();
    let sel = selection(2023, &["Senior", "Mid-level"], &["Remote", "In-person"]);
    let once = filter(&relation, &sel);
    let twice = filter(&once, &sel);
    assert_eq!(once, twice);
    assert!(once.len() < relation.len());
    assert!(once
        .iter()
        .all(|r| r.work_year == 2023 && relation.records().contains(r)));
}

#[test]
fn default_selection_covers_earliest_year() {
    let relation = bundled();
    let sel = FilterSelection::defaults(&relation);
    assert_eq!(sel.year, 2020);
    assert_eq!(relation.years(), vec![2020, 2021, 2022, 2023]);

    let filtered = filter(&relation, &sel);
    assert_eq!(filtered.len(), 4);
}

#[test]
fn dashboard_panels_in_display_order() {
    let relation = bundled();
    let dashboard = Dashboard::build(&relation, &FilterSelection::defaults(&relation));
    let kinds: Vec<ChartKind> = dashboard.views().iter().map(|v| v.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ChartKind::Bar,
            ChartKind::Treemap,
            ChartKind::Sunburst,
            ChartKind::GeoBubble,
            ChartKind::Box,
            ChartKind::AnimatedScatter,
        ]
    );
    assert_eq!(dashboard.total_rows, relation.len());
    assert_eq!(dashboard.scatter.frames.len(), 4);
}

#[test]
fn cache_parses_once() {
    let file = three_row_file();
    let cache = DatasetCache::new(file.path());

    let first = cache.get().unwrap();
    let path = file.path().to_path_buf();
    drop(file);
    assert!(!path.exists());

    let second = cache.get().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 3);
}

#[test]
fn missing_source_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DatasetCache::new(dir.path().join("jobs_in_data.csv"));
    match cache.get() {
        Err(DataUnavailable::Io { path, .. }) => assert_eq!(path, cache.path()),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

fn rows_for_sidebar() -> Arc<Relation> {
    loader::load().unwrap()
}

fn rows_for_charts() -> Arc<Relation> {
    loader::load().unwrap()
}

#[test]
fn process_dataset_is_parsed_once() {
    // cargo runs integration tests from the package root
    let first = rows_for_sidebar();
    let second = rows_for_charts();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 30);
    assert_eq!(*first, bundled());
}
