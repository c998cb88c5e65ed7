use std::time::Duration;

use eframe::egui::{self, Ui};

use crate::state::{Animation, AppState};
use crate::ui::{panels, plot, sunburst, text, treemap};
use crate::views::ScatterSpec;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Scatter animation clock ----
        if self.state.animation.playing {
            let dt = Duration::from_secs_f32(ctx.input(|i| i.stable_dt).max(0.0));
            self.state.tick(dt);
            ctx.request_repaint_after(Duration::from_millis(30));
        }

        // ---- Top panel: status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(self.state.config.side_panel_width)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    charts(ui, &mut self.state);
                });
        });
    }
}

fn bullet_list(ui: &mut Ui, items: &[&str]) {
    for item in items {
        ui.label(format!("• {item}"));
    }
}

/// The six chart panels in fixed order, framed by the static copy.
fn charts(ui: &mut Ui, state: &mut AppState) {
    let height = state.config.chart_height;

    ui.heading(egui::RichText::new(text::TITLE).size(24.0));
    ui.label(text::INTRO);
    bullet_list(ui, text::QUESTIONS);

    let dash = &state.dashboard;
    panels::chart_panel(ui, &dash.bar, text::BAR, height, |ui: &mut Ui| {
        plot::bar_chart(ui, &dash.bar, height);
    });
    panels::chart_panel(ui, &dash.treemap, text::TREEMAP, height, |ui: &mut Ui| {
        treemap::treemap(ui, &dash.treemap, &state.category_colors, height);
    });
    panels::chart_panel(ui, &dash.sunburst, text::SUNBURST, height, |ui: &mut Ui| {
        sunburst::sunburst(ui, &dash.sunburst, &state.category_colors, height);
    });
    panels::chart_panel(ui, &dash.geo, text::GEO, height, |ui: &mut Ui| {
        plot::geo_bubble_chart(ui, &dash.geo, &state.category_colors, height);
    });
    panels::chart_panel(ui, &dash.boxplot, text::BOX, height, |ui: &mut Ui| {
        plot::box_chart(ui, &dash.boxplot, &state.experience_colors, height);
    });

    let animation = &mut state.animation;
    let colors = &state.category_colors;
    panels::chart_panel(ui, &dash.scatter, text::SCATTER, height, |ui: &mut Ui| {
        animation_controls(ui, animation, &dash.scatter);
        if let Some(frame) = dash.scatter.frames.get(animation.frame) {
            plot::scatter_chart(ui, &dash.scatter, frame, colors, height);
        }
    });

    ui.add_space(16.0);
    ui.heading("Conclusion");
    ui.label("With these views you can identify:");
    bullet_list(ui, text::CONCLUSION);
    ui.label("Explore, filter and draw your own conclusions.");
}

/// Play/pause button and a year slider for the animated scatter.
fn animation_controls(ui: &mut Ui, animation: &mut Animation, scatter: &ScatterSpec) {
    let n_frames = scatter.frames.len();
    ui.horizontal(|ui: &mut Ui| {
        let label = if animation.playing { "⏸ Pause" } else { "▶ Play" };
        if ui.button(label).clicked() {
            animation.toggle();
        }

        let mut frame = animation.frame;
        let slider =
            egui::Slider::new(&mut frame, 0..=n_frames.saturating_sub(1)).show_value(false);
        if ui.add(slider).changed() {
            animation.seek(frame);
        }
        if let Some(current) = scatter.frames.get(animation.frame) {
            ui.strong(format!("work_year = {}", current.year));
        }
    });
}
