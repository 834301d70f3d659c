//! View model of the logbook page. `PageView::build` is a pure function of
//! the view state and the current navigation; the UI only draws it.

use crate::model::{Entry, Logbook};
use crate::page::Navigation;
use crate::query::SearchQuery;
use crate::state::ViewState;

pub const ALL_LOGBOOKS_TITLE: &str = "[All logbooks]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget {
    /// Navigate inside this application.
    Internal,
    /// Hand off to the Elogy web frontend.
    External,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLink {
    pub label: &'static str,
    pub href: String,
    pub target: ActionTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub key: &'static str,
    pub term: String,
}

impl FilterChip {
    pub fn label(&self) -> String {
        format!("{}: \"{}\"", self.key, self.term)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    /// Placeholder first, then the allowed values.
    pub choices: Vec<String>,
    pub selected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    Loading,
    Failed { message: String },
    LoadMore { loaded: usize, total: u64 },
}

impl Footer {
    pub fn label(&self) -> String {
        match self {
            Footer::Loading => "Loading...".to_string(),
            Footer::Failed { message } => format!("Could not load entries: {message}"),
            Footer::LoadMore { loaded, total } => format!("Load more (showing {loaded} of {total})"),
        }
    }
}

/// What the entry-preview list gets to work with.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryList<'a> {
    pub logbook: &'a Logbook,
    pub entries: &'a [Entry],
    pub search: &'a str,
    pub selected_entry_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub title: String,
    pub actions: Vec<ActionLink>,
    pub chips: Vec<FilterChip>,
    pub selectors: Vec<AttributeSelector>,
    pub list: EntryList<'a>,
    pub footer: Footer,
}

impl<'a> PageView<'a> {
    pub fn build(state: &'a ViewState, nav: &'a Navigation) -> Self {
        let logbook = &state.logbook;
        // nothing to name until the first page arrives
        let title = match (state.loaded, logbook.is_all_logbooks()) {
            (false, _) => String::new(),
            (true, true) => ALL_LOGBOOKS_TITLE.to_string(),
            (true, false) => logbook.name.clone(),
        };

        let actions = if state.loaded && !logbook.is_all_logbooks() { action_links(logbook.id) } else { Vec::new() };

        let query = SearchQuery::parse(&nav.location.search);
        let chips = query.text_filters().into_iter().map(|(key, term)| FilterChip { key, term: term.to_string() }).collect();

        let selectors = logbook
            .filterable_attributes()
            .map(|attr| {
                let selected = state
                    .attribute_filters
                    .get(&attr.name)
                    .and_then(|v| attr.options.iter().position(|o| o == v))
                    .map_or(0, |i| i + 1);
                let mut choices = Vec::with_capacity(attr.options.len() + 1);
                choices.push(format!("[{}]", attr.name));
                choices.extend(attr.options.iter().cloned());
                AttributeSelector { name: attr.name.clone(), choices, selected }
            })
            .collect();

        let footer = if state.loading {
            Footer::Loading
        } else if let Some(message) = &state.error {
            Footer::Failed { message: message.clone() }
        } else {
            Footer::LoadMore { loaded: state.entries.len(), total: state.count }
        };

        Self {
            title,
            actions,
            chips,
            selectors,
            list: EntryList {
                logbook,
                entries: &state.entries,
                search: &nav.location.search,
                selected_entry_id: nav.location.route.entry_id,
            },
            footer,
        }
    }
}

fn action_links(id: u64) -> Vec<ActionLink> {
    vec![
        ActionLink { label: "New entry", href: format!("/logbooks/{id}/entries/new"), target: ActionTarget::External },
        ActionLink { label: "Enter", href: format!("/logbooks/{id}?parent={id}"), target: ActionTarget::Internal },
        ActionLink { label: "Edit", href: format!("/logbooks/{id}/edit"), target: ActionTarget::External },
        ActionLink { label: "New", href: format!("/logbooks/{id}/new"), target: ActionTarget::External },
    ]
}
