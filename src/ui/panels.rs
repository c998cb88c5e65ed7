use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Field;
use crate::state::AppState;
use crate::views::ChartView;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year (single select) ----
            ui.strong("Year");
            let current_year = state.selection().year;
            let years = state.years.clone();
            egui::ComboBox::from_id_salt("work_year")
                .selected_text(current_year.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for year in years {
                        if ui
                            .selectable_label(year == current_year, year.to_string())
                            .clicked()
                        {
                            state.set_year(year);
                        }
                    }
                });
            ui.separator();

            multi_select(ui, state, Field::ExperienceLevel, "Experience level");
            multi_select(ui, state, Field::WorkSetting, "Work setting");
        });
}

/// Checkbox list with All / None buttons for one multi-select column.
fn multi_select(ui: &mut Ui, state: &mut AppState, field: Field, title: &str) {
    let domain = state.domain(field).to_vec();
    let selected = match field {
        Field::WorkSetting => state.selection().work_settings.clone(),
        _ => state.selection().experience_levels.clone(),
    };

    let header_text = format!("{title}  ({}/{})", selected.len(), domain.len());
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(field.column())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(field);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(field);
                }
            });

            for value in &domain {
                let mut checked = selected.contains(value);
                let mut text = RichText::new(value);
                if field == Field::ExperienceLevel {
                    text = text.color(state.experience_colors.color_for(value));
                }
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_filter_value(field, value);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!(
            "{} job records loaded, {} visible for {}",
            state.dashboard.total_rows,
            state.dashboard.filtered.len(),
            state.selection().year
        ));

        if state.selection().is_empty_selection() {
            ui.separator();
            ui.label(
                RichText::new("Nothing selected in a filter: charts have no data")
                    .color(Color32::RED),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Chart panel frame
// ---------------------------------------------------------------------------

/// Subheading, description, then either the chart or a "no data" box.
pub fn chart_panel(
    ui: &mut Ui,
    view: &dyn ChartView,
    description: &str,
    height: f32,
    add_chart: impl FnOnce(&mut Ui),
) {
    ui.add_space(12.0);
    ui.heading(view.title());
    ui.label(description);
    ui.add_space(4.0);

    if view.is_empty() {
        no_data(ui, height);
    } else {
        add_chart(ui);
    }
}

fn no_data(ui: &mut Ui, height: f32) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_size(egui::vec2(ui.available_width(), height / 3.0));
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new("No data for the current filters").weak());
        });
    });
}
