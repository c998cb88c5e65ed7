use std::collections::BTreeSet;

use super::model::{JobRecord, Relation};

// ---------------------------------------------------------------------------
// Filter predicate: the three sidebar selections
// ---------------------------------------------------------------------------

/// The user's current choice of year, experience levels and work settings.
///
/// An empty set selects nothing: there is no "empty means all" fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub year: i32,
    pub experience_levels: BTreeSet<String>,
    pub work_settings: BTreeSet<String>,
}

impl FilterSelection {
    /// Lowest year, every experience level and every work setting.
    ///
    /// An empty relation has no years; the year then defaults to `0`, which
    /// matches nothing.
    pub fn defaults(relation: &Relation) -> Self {
        Self {
            year: relation.years().first().copied().unwrap_or_default(),
            experience_levels: relation.experience_levels().into_iter().collect(),
            work_settings: relation.work_settings().into_iter().collect(),
        }
    }

    /// Whether one of the multi-selects has nothing ticked.
    pub fn is_empty_selection(&self) -> bool {
        self.experience_levels.is_empty() || self.work_settings.is_empty()
    }

    /// The conjunctive row predicate.
    pub fn matches(&self, record: &JobRecord) -> bool {
        record.work_year == self.year
            && self.experience_levels.contains(&record.experience_level)
            && self.work_settings.contains(&record.work_setting)
    }
}

/// Rows of `relation` matching `selection`, in their original order.
pub fn filter(relation: &Relation, selection: &FilterSelection) -> Relation {
    if selection.is_empty_selection() {
        log::debug!("Empty selection, no rows pass");
        return Relation::default();
    }
    relation
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect()
}
