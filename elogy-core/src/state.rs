use tracing::warn;

use crate::error::{FetchError, PageError};
use crate::model::{AttributeFilters, EntriesPage, Entry, Logbook};
use crate::request::EntriesRequest;

/// Everything the logbook page shows, independent of how it is drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub logbook: Logbook,
    pub entries: Vec<Entry>,
    pub count: u64,
    pub attribute_filters: AttributeFilters,
    pub loading: bool,
    pub error: Option<String>,
    /// Whether a fresh load has landed since the view was created.
    pub loaded: bool,
}

impl ViewState {
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Offset zero replaces everything; any other offset appends entries and
    /// leaves the logbook metadata alone.
    ///
    /// Returns true when a fresh load dropped filters the logbook no longer
    /// offers. The entries just applied were fetched with those filters, so
    /// the caller has to load again.
    pub fn apply_page(&mut self, request: &EntriesRequest, page: EntriesPage) -> bool {
        self.loading = false;
        self.error = None;
        if request.is_fresh() {
            self.logbook = page.logbook;
            self.entries = page.entries;
            self.count = page.count;
            self.loaded = true;
            self.prune_filters()
        } else {
            self.entries.extend(page.entries);
            self.count = page.count;
            false
        }
    }

    pub fn apply_failure(&mut self, request: &EntriesRequest, error: &FetchError) {
        warn!(logbook = request.logbook_id, offset = request.offset, "fetch failed: {}", error);
        self.loading = false;
        self.error = Some(error.to_string());
    }

    pub fn clear_filters(&mut self) {
        self.attribute_filters.clear();
    }

    /// Returns whether the filters actually changed.
    pub fn set_attribute_filter(&mut self, name: &str, value: Option<String>) -> Result<bool, PageError> {
        let attr = self.logbook.filterable_attribute(name).ok_or_else(|| PageError::UnknownAttribute(name.to_string()))?;
        match value {
            None => Ok(self.attribute_filters.remove(name).is_some()),
            Some(v) => {
                if !attr.options.iter().any(|o| *o == v) {
                    return Err(PageError::UnknownOption { name: name.to_string(), value: v });
                }
                Ok(self.attribute_filters.insert(name.to_string(), v.clone()).as_ref() != Some(&v))
            }
        }
    }

    /// Index 0 is the placeholder entry of the selector and clears the filter.
    pub fn select_attribute(&mut self, name: &str, index: usize) -> Result<bool, PageError> {
        let attr = self.logbook.filterable_attribute(name).ok_or_else(|| PageError::UnknownAttribute(name.to_string()))?;
        let value = match index {
            0 => None,
            i => Some(attr.options.get(i - 1).cloned().ok_or_else(|| PageError::OptionIndex { name: name.to_string(), index })?),
        };
        self.set_attribute_filter(name, value)
    }

    pub fn has_more(&self) -> bool {
        (self.entries.len() as u64) < self.count
    }

    // filters must only name filterable attributes of the logbook on display
    fn prune_filters(&mut self) -> bool {
        let before = self.attribute_filters.len();
        let logbook = &self.logbook;
        self.attribute_filters.retain(|name, _| logbook.filterable_attribute(name).is_some());
        self.attribute_filters.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, AttributeKind};

    fn logbook(id: u64, name: &str) -> Logbook {
        Logbook {
            id,
            name: name.into(),
            description: None,
            attributes: vec![
                Attribute { name: "Shift".into(), kind: AttributeKind::Option, options: vec!["Day".into(), "Night".into()], required: false },
                Attribute { name: "Comment".into(), kind: AttributeKind::Other, options: vec![], required: false },
            ],
        }
    }

    fn entries(from: u64, n: u64) -> Vec<Entry> {
        (from..from + n).map(|id| Entry { id, ..Default::default() }).collect()
    }

    fn page(logbook: Logbook, entries: Vec<Entry>, count: u64) -> EntriesPage {
        EntriesPage { logbook, entries, count }
    }

    fn request(offset: u64) -> EntriesRequest {
        EntriesRequest::new(Some(5), "", &AttributeFilters::new(), Some(offset), None)
    }

    #[test]
    fn fresh_load_replaces_everything() {
        let mut state = ViewState::default();
        state.apply_page(&request(0), page(logbook(5, "Ops"), entries(1, 50), 70));
        state.begin_fetch();
        state.apply_page(&request(0), page(logbook(6, "Other"), entries(100, 3), 3));
        assert_eq!(state.logbook.name, "Other");
        assert_eq!(state.entries.len(), 3);
        assert_eq!(state.entries[0].id, 100);
        assert_eq!(state.count, 3);
        assert!(!state.loading);
    }

    #[test]
    fn paged_load_appends_and_keeps_metadata() {
        let mut state = ViewState::default();
        state.apply_page(&request(0), page(logbook(5, "Ops"), entries(1, 50), 70));
        state.begin_fetch();
        state.apply_page(&request(50), page(logbook(9, "ignored"), entries(51, 20), 70));
        assert_eq!(state.entries.len(), 70);
        assert_eq!(state.logbook.name, "Ops");
        assert_eq!(state.logbook.id, 5);
        assert!(!state.has_more());
    }

    #[test]
    fn failure_clears_loading_and_keeps_data() {
        let mut state = ViewState::default();
        state.apply_page(&request(0), page(logbook(5, "Ops"), entries(1, 5), 5));
        state.begin_fetch();
        let err = FetchError::Task("boom".into());
        state.apply_failure(&request(0), &err);
        assert!(!state.loading);
        assert!(state.error.as_deref().unwrap().contains("boom"));
        assert_eq!(state.entries.len(), 5);
        state.begin_fetch();
        assert_eq!(state.error, None);
    }

    #[test]
    fn placeholder_clears_and_option_sets() {
        let mut state = ViewState::default();
        state.apply_page(&request(0), page(logbook(5, "Ops"), vec![], 0));
        assert_eq!(state.select_attribute("Shift", 2), Ok(true));
        assert_eq!(state.attribute_filters.get("Shift").map(String::as_str), Some("Night"));
        assert_eq!(state.select_attribute("Shift", 2), Ok(false));
        assert_eq!(state.select_attribute("Shift", 0), Ok(true));
        assert!(state.attribute_filters.is_empty());
    }

    #[test]
    fn rejects_unknown_filters() {
        let mut state = ViewState::default();
        state.apply_page(&request(0), page(logbook(5, "Ops"), vec![], 0));
        assert_eq!(state.select_attribute("Comment", 1), Err(PageError::UnknownAttribute("Comment".into())));
        assert_eq!(state.select_attribute("Shift", 3), Err(PageError::OptionIndex { name: "Shift".into(), index: 3 }));
        assert_eq!(
            state.set_attribute_filter("Shift", Some("Evening".into())),
            Err(PageError::UnknownOption { name: "Shift".into(), value: "Evening".into() })
        );
    }

    #[test]
    fn fresh_load_drops_filters_the_logbook_lacks() {
        let mut state = ViewState::default();
        state.apply_page(&request(0), page(logbook(5, "Ops"), vec![], 0));
        state.set_attribute_filter("Shift", Some("Day".into())).unwrap();
        assert!(!state.apply_page(&request(0), page(logbook(5, "Ops"), vec![], 0)));
        let bare = Logbook { id: 5, name: "Ops".into(), ..Default::default() };
        assert!(state.apply_page(&request(0), page(bare, vec![], 0)));
        assert!(state.attribute_filters.is_empty());
        assert!(!state.apply_page(&request(50), page(logbook(5, "Ops"), vec![], 0)));
    }
}
