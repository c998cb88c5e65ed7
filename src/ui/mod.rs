//! egui renderer for the dashboard views.

pub mod countries;
pub mod hierarchy;
pub mod panels;
pub mod plot;
pub mod sunburst;
pub mod text;
pub mod treemap;
