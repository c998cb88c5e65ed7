//! # Data Jobs Dashboard
//!
//! Loads a table of data-industry job records once, filters it by year,
//! experience level and work setting, and renders six linked charts:
//! average salary per category, a category/title treemap, a
//! category/experience/contract sunburst, a country bubble map, a salary
//! boxplot per experience level and a scatter animated over the years.
//!
//! The pipeline is pure and egui-free:
//!
//! ```no_run
//! use jobs_dashboard::data::{filter::FilterSelection, loader};
//! use jobs_dashboard::views::Dashboard;
//!
//! let relation = loader::load().expect("dataset");
//! let selection = FilterSelection::defaults(&relation);
//! let dashboard = Dashboard::build(&relation, &selection);
//! println!("{} bars", dashboard.bar.bars.len());
//! ```

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
pub mod views;

pub use app::DashboardApp;
pub use data::loader::DataUnavailable;
