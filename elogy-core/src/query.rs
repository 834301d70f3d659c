//! Parsing of navigation locations: the route part (`/logbooks/5/entries/12`)
//! and the search part (`?title=foo&n=20`).
//!
//! Parsing is best effort and never fails. Anything that cannot be understood
//! is treated as absent.

/// Free-text keys the server searches on, in the order they are shown.
pub const TEXT_FILTER_KEYS: [&str; 3] = ["title", "content", "authors"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Route {
    pub logbook_id: Option<u64>,
    pub entry_id: Option<u64>,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let mut parts = path.split('/').filter(|p| !p.is_empty());
        let mut route = Route::default();
        if parts.next() != Some("logbooks") {
            return route;
        }
        route.logbook_id = parts.next().and_then(|p| p.parse().ok());
        if route.logbook_id.is_some() && parts.next() == Some("entries") {
            route.entry_id = parts.next().and_then(|p| p.parse().ok());
        }
        route
    }

    pub fn path(&self) -> String {
        match (self.logbook_id, self.entry_id) {
            (Some(l), Some(e)) => format!("/logbooks/{l}/entries/{e}"),
            (Some(l), None) => format!("/logbooks/{l}"),
            _ => "/".to_string(),
        }
    }
}

/// What the router hands to a page: where we are plus the raw query string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub route: Route,
    pub search: String,
}

impl Location {
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        let (path, search) = match location.split_once('?') {
            Some((p, s)) => (p, format!("?{s}")),
            None => (location, String::new()),
        };
        Self { route: Route::parse(path), search }
    }

    pub fn href(&self) -> String {
        let search = self.search.trim_start_matches('?');
        if search.is_empty() {
            self.route.path()
        } else {
            format!("{}?{}", self.route.path(), search)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub content: Option<String>,
    pub authors: Option<String>,
    pub n: Option<u32>,
    pub offset: Option<u64>,
    /// `attribute=name:value` terms found in the URL.
    pub attributes: Vec<(String, String)>,
    /// Keys we do not interpret; passed through to the server untouched.
    pub extra: Vec<(String, String)>,
}

impl SearchQuery {
    pub fn parse(search: &str) -> Self {
        let mut query = SearchQuery::default();
        for pair in search.trim_start_matches('?').split('&').filter(|p| !p.is_empty()) {
            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (decode(k), decode(v)),
                None => (decode(pair), String::new()),
            };
            match key.as_str() {
                "title" => query.title = non_empty(value),
                "content" => query.content = non_empty(value),
                "authors" => query.authors = non_empty(value),
                "n" => query.n = value.trim().parse().ok(),
                "offset" => query.offset = value.trim().parse().ok(),
                "attribute" => {
                    if let Some((name, v)) = value.split_once(':') {
                        if !name.is_empty() {
                            query.attributes.push((name.to_string(), v.to_string()));
                        }
                    }
                }
                "" => {}
                _ => query.extra.push((key, value)),
            }
        }
        query
    }

    pub fn text_filter(&self, key: &str) -> Option<&str> {
        match key {
            "title" => self.title.as_deref(),
            "content" => self.content.as_deref(),
            "authors" => self.authors.as_deref(),
            _ => None,
        }
    }

    /// Active free-text filters as `(key, term)` in display order.
    pub fn text_filters(&self) -> Vec<(&'static str, &str)> {
        TEXT_FILTER_KEYS
            .iter()
            .filter_map(|k| self.text_filter(k).map(|v| (*k, v)))
            .collect()
    }
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    match urlencoding::decode(&raw) {
        Ok(s) => s.into_owned(),
        Err(_) => raw,
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_routes() {
        assert_eq!(Route::parse("/logbooks/5"), Route { logbook_id: Some(5), entry_id: None });
        assert_eq!(Route::parse("/logbooks/5/entries/12/"), Route { logbook_id: Some(5), entry_id: Some(12) });
        assert_eq!(Route::parse("/"), Route::default());
        assert_eq!(Route::parse("/logbooks/abc/entries/3"), Route::default());
        assert_eq!(Route::parse("/logbooks/5/entries/new"), Route { logbook_id: Some(5), entry_id: None });
    }

    #[test]
    fn location_keeps_raw_search() {
        let loc = Location::parse("/logbooks/7/entries/3?title=beam%20dump&n=10");
        assert_eq!(loc.route.logbook_id, Some(7));
        assert_eq!(loc.route.entry_id, Some(3));
        assert_eq!(loc.search, "?title=beam%20dump&n=10");
        assert_eq!(loc.href(), "/logbooks/7/entries/3?title=beam%20dump&n=10");
    }

    #[test]
    fn parses_recognized_keys() {
        let q = SearchQuery::parse("?title=beam+dump&authors=ada&n=20&offset=40&parent=3");
        assert_eq!(q.title.as_deref(), Some("beam dump"));
        assert_eq!(q.authors.as_deref(), Some("ada"));
        assert_eq!(q.content, None);
        assert_eq!(q.n, Some(20));
        assert_eq!(q.offset, Some(40));
        assert_eq!(q.extra, vec![("parent".to_string(), "3".to_string())]);
        assert_eq!(q.text_filters(), vec![("title", "beam dump"), ("authors", "ada")]);
    }

    #[test]
    fn malformed_numbers_fail_soft() {
        let q = SearchQuery::parse("n=lots&offset=-3&title=x");
        assert_eq!(q.n, None);
        assert_eq!(q.offset, None);
        assert_eq!(q.title.as_deref(), Some("x"));
    }

    #[test]
    fn attribute_terms_are_collected_separately() {
        let q = SearchQuery::parse("attribute=Shift:Night&attribute=broken&title=t");
        assert_eq!(q.attributes, vec![("Shift".to_string(), "Night".to_string())]);
        assert!(q.extra.is_empty());
    }

    #[test]
    fn empty_search_is_empty_query() {
        assert_eq!(SearchQuery::parse(""), SearchQuery::default());
        assert_eq!(SearchQuery::parse("?"), SearchQuery::default());
    }
}
