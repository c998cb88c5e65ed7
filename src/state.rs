use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crate::color::CategoryColors;
use crate::config::DashboardConfig;
use crate::data::filter::FilterSelection;
use crate::data::model::{Field, Relation};
use crate::views::Dashboard;

// ---------------------------------------------------------------------------
// Scatter animation cursor
// ---------------------------------------------------------------------------

/// Which year of the animated scatter is on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    pub frame: usize,
    pub playing: bool,
    elapsed: Duration,
}

impl Animation {
    /// Advance by `dt` while playing, looping over `n_frames`.
    /// Returns whether the frame changed.
    pub fn advance(&mut self, dt: Duration, interval: Duration, n_frames: usize) -> bool {
        if !self.playing || n_frames == 0 || interval.is_zero() {
            return false;
        }
        self.elapsed += dt;
        let mut changed = false;
        while self.elapsed >= interval {
            self.elapsed -= interval;
            self.frame = (self.frame + 1) % n_frames;
            changed = true;
        }
        changed
    }

    pub fn toggle(&mut self) {
        self.playing = !self.playing;
        self.elapsed = Duration::ZERO;
    }

    pub fn seek(&mut self, frame: usize) {
        self.frame = frame;
        self.elapsed = Duration::ZERO;
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// The loaded dataset, shared with the process-wide cache.
    pub relation: Arc<Relation>,

    /// Filter domains: years ascending, the rest in first-appearance order.
    pub years: Vec<i32>,
    pub experience_levels: Vec<String>,
    pub work_settings: Vec<String>,

    /// Output of the last pipeline run; holds the current selection.
    pub dashboard: Dashboard,

    /// Colours for categorical encodings, stable across selections.
    pub category_colors: CategoryColors,
    pub experience_colors: CategoryColors,

    pub animation: Animation,
}

impl AppState {
    /// Initialise domains and the default selection for a dataset.
    pub fn new(relation: Arc<Relation>, config: DashboardConfig) -> Self {
        let selection = FilterSelection::defaults(&relation);
        let dashboard = Dashboard::build(&relation, &selection);
        let experience_levels = relation.experience_levels();

        Self {
            config,
            years: relation.years(),
            work_settings: relation.work_settings(),
            category_colors: CategoryColors::new(&relation.distinct(Field::JobCategory)),
            experience_colors: CategoryColors::new(&experience_levels),
            experience_levels,
            dashboard,
            relation,
            animation: Animation::default(),
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.dashboard.selection
    }

    /// Run the pipeline for a new selection. No-op when nothing changed.
    pub fn apply(&mut self, selection: FilterSelection) {
        if selection == self.dashboard.selection {
            return;
        }
        log::debug!(
            "Selection changed: year={} experience={:?} setting={:?}",
            selection.year,
            selection.experience_levels,
            selection.work_settings
        );
        if selection.is_empty_selection() {
            log::debug!("A multi-select is empty; panels will show no data");
        }
        self.dashboard = Dashboard::build(&self.relation, &selection);
    }

    pub fn set_year(&mut self, year: i32) {
        let mut next = self.selection().clone();
        next.year = year;
        self.apply(next);
    }

    /// Domain of a multi-select filter column.
    pub fn domain(&self, field: Field) -> &[String] {
        match field {
            Field::ExperienceLevel => &self.experience_levels,
            Field::WorkSetting => &self.work_settings,
            _ => &[],
        }
    }

    fn with_set(&mut self, field: Field, edit: impl FnOnce(&mut BTreeSet<String>, &[String])) {
        let mut next = self.selection().clone();
        let domain = self.domain(field).to_vec();
        let set = match field {
            Field::ExperienceLevel => &mut next.experience_levels,
            Field::WorkSetting => &mut next.work_settings,
            _ => return,
        };
        edit(set, &domain);
        self.apply(next);
    }

    /// Toggle a single value in a multi-select filter.
    pub fn toggle_filter_value(&mut self, field: Field, value: &str) {
        self.with_set(field, |set, _| {
            if !set.remove(value) {
                set.insert(value.to_string());
            }
        });
    }

    /// Select all values in a multi-select filter.
    pub fn select_all(&mut self, field: Field) {
        self.with_set(field, |set, domain| {
            set.extend(domain.iter().cloned());
        });
    }

    /// Deselect all values in a multi-select filter.
    pub fn select_none(&mut self, field: Field) {
        self.with_set(field, |set, _| set.clear());
    }

    /// Feed elapsed wall time to the animation.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let n_frames = self.dashboard.scatter.frames.len();
        self.animation
            .advance(dt, self.config.frame_interval, n_frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::three_rows;
    use pretty_assertions::assert_eq;

    fn state() -> AppState {
        AppState::new(Arc::new(three_rows()), DashboardConfig::default())
    }

    #[test]
    fn starts_on_default_selection() {
        let st = state();
        assert_eq!(st.years, vec![2022, 2023]);
        assert_eq!(st.selection().year, 2022);
        assert_eq!(st.dashboard.filtered.len(), 1);
    }

    #[test]
    fn year_change_reruns_pipeline() {
        let mut st = state();
        st.set_year(2023);
        assert_eq!(st.dashboard.filtered.len(), 2);
        assert_eq!(st.dashboard.bar.bars[0].mean_salary, 90_000.0);
    }

    #[test]
    fn toggling_and_bulk_selection() {
        let mut st = state();
        st.set_year(2023);
        st.toggle_filter_value(Field::ExperienceLevel, "Mid");
        assert_eq!(st.dashboard.filtered.len(), 1);
        st.toggle_filter_value(Field::ExperienceLevel, "Mid");
        assert_eq!(st.dashboard.filtered.len(), 2);

        st.select_none(Field::WorkSetting);
        assert!(st.selection().is_empty_selection());
        assert!(st.dashboard.filtered.is_empty());

        st.select_all(Field::WorkSetting);
        assert_eq!(st.dashboard.filtered.len(), 2);
    }

    #[test]
    fn non_multiselect_fields_are_ignored() {
        let mut st = state();
        let before = st.selection().clone();
        st.toggle_filter_value(Field::JobTitle, "DS");
        assert_eq!(*st.selection(), before);
    }

    #[test]
    fn animation_loops_over_frames() {
        let mut anim = Animation::default();
        let interval = Duration::from_millis(100);
        assert!(!anim.advance(Duration::from_millis(500), interval, 3));

        anim.toggle();
        assert!(!anim.advance(Duration::from_millis(50), interval, 3));
        assert!(anim.advance(Duration::from_millis(50), interval, 3));
        assert_eq!(anim.frame, 1);
        assert!(anim.advance(Duration::from_millis(200), interval, 3));
        assert_eq!(anim.frame, 0);
    }

    #[test]
    fn tick_uses_configured_interval_and_frame_count() {
        let mut st = state();
        st.animation.toggle();
        let interval = st.config.frame_interval;
        assert!(st.tick(interval));
        assert_eq!(st.animation.frame, 1);
        assert!(st.tick(interval));
        assert_eq!(st.animation.frame, 0);
    }
}
