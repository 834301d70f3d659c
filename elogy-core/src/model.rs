use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Logbook id used by the server for the virtual "all logbooks" view.
pub const ALL_LOGBOOKS: u64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Option,
    Multioption,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: AttributeKind,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

impl Attribute {
    /// Only option-typed attributes get a filter selector.
    pub fn is_filterable(&self) -> bool {
        matches!(self.kind, AttributeKind::Option | AttributeKind::Multioption)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Logbook {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Logbook {
    pub fn is_all_logbooks(&self) -> bool {
        self.id == ALL_LOGBOOKS
    }

    pub fn filterable_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name && a.is_filterable())
    }

    pub fn filterable_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.is_filterable())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub login: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LogbookRef {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// An entry as listed by the entries endpoint. Only the fields the preview
/// list shows are modelled; the rest of the payload is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Entry {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_changed_at: Option<String>,
    #[serde(default)]
    pub n_followups: u32,
    #[serde(default)]
    pub n_attachments: u32,
    #[serde(default)]
    pub logbook: Option<LogbookRef>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Entry {
    pub fn author_names(&self) -> String {
        self.authors.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EntriesPage {
    #[serde(default)]
    pub logbook: Logbook,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub count: u64,
}

/// Attribute name -> selected value. A missing key means the filter is unset.
pub type AttributeFilters = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_entries_response() {
        let body = r#"{
            "logbook": {
                "id": 5,
                "name": "Operations",
                "attributes": [
                    {"name": "Shift", "type": "option", "options": ["Day", "Night"]},
                    {"name": "Tags", "type": "multioption", "options": ["a", "b"]},
                    {"name": "Beam current", "type": "number"}
                ]
            },
            "entries": [
                {"id": 1, "title": "Startup", "authors": [{"name": "Ada", "login": "ada"}], "n_followups": 2},
                {"id": 2}
            ],
            "count": 120
        }"#;
        let page: EntriesPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.logbook.id, 5);
        assert_eq!(page.count, 120);
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[0].author_names(), "Ada");
        assert_eq!(page.logbook.attributes[2].kind, AttributeKind::Other);
        let names: Vec<_> = page.logbook.filterable_attributes().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Shift", "Tags"]);
    }

    #[test]
    fn filterable_lookup_ignores_plain_attributes() {
        let logbook = Logbook {
            id: 3,
            name: "x".into(),
            description: None,
            attributes: vec![Attribute { name: "Energy".into(), kind: AttributeKind::Other, options: vec![], required: false }],
        };
        assert!(logbook.filterable_attribute("Energy").is_none());
        assert!(!logbook.is_all_logbooks());
    }
}
