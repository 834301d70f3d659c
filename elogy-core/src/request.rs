use crate::model::{AttributeFilters, ALL_LOGBOOKS};
use crate::query::SearchQuery;

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// One GET against the entries endpoint, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntriesRequest {
    pub logbook_id: u64,
    pub query: SearchQuery,
    pub attribute_filters: AttributeFilters,
    pub offset: u64,
    pub n: u32,
}

impl EntriesRequest {
    /// Page size precedence: explicit `page_size`, then the URL's `n`, then 50.
    /// The URL's `offset` is ignored; only the explicit one counts.
    pub fn new(
        logbook_id: Option<u64>,
        raw_search: &str,
        attribute_filters: &AttributeFilters,
        offset: Option<u64>,
        page_size: Option<u32>,
    ) -> Self {
        let query = SearchQuery::parse(raw_search);
        let n = page_size.or(query.n).unwrap_or(DEFAULT_PAGE_SIZE);
        Self {
            logbook_id: logbook_id.unwrap_or(ALL_LOGBOOKS),
            query,
            attribute_filters: attribute_filters.clone(),
            offset: offset.unwrap_or(0),
            n,
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.offset == 0
    }

    pub fn query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        for (key, value) in self.query.text_filters() {
            params.push(format!("{}={}", key, urlencoding::encode(value)));
        }
        for (key, value) in &self.query.extra {
            params.push(format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)));
        }
        params.push(format!("n={}", self.n));
        params.push(format!("offset={}", self.offset));

        let attributes = self
            .query
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(self.attribute_filters.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!("attribute={}:{}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}&{}", params.join("&"), attributes)
    }

    pub fn path(&self) -> String {
        format!("/api/logbooks/{}/entries/?{}", self.logbook_id, self.query_string())
    }
}
