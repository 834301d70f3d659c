use futures_util::future::{BoxFuture, FutureExt};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::model::EntriesPage;
use crate::request::EntriesRequest;
use crate::settings::AppSettings;

/// Anything that can answer an entries request. The page only talks to this,
/// so it can run against the real server or an in-memory stand-in.
pub trait EntriesSource: Send + Sync {
    fn fetch_entries(&self, request: EntriesRequest) -> BoxFuture<'_, Result<EntriesPage, FetchError>>;
}

#[derive(Debug, Clone)]
pub struct ElogyClient {
    client: reqwest::Client,
    base_url: String,
}

impl ElogyClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!("elogy-rs/", env!("CARGO_PKG_VERSION")));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self { client: builder.build()?, base_url: base_url.trim().trim_end_matches('/').to_string() })
    }

    pub fn from_settings(settings: &AppSettings) -> Result<Self, FetchError> {
        Self::new(&settings.server_url, settings.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn entries_url(&self, request: &EntriesRequest) -> String {
        format!("{}{}", self.base_url, request.path())
    }

    pub async fn get_entries(&self, request: &EntriesRequest) -> Result<EntriesPage, FetchError> {
        let url = self.entries_url(request);
        info!("Elogy fetch: {}", url);
        let resp = self.client.get(&url).header("Accept", "application/json").send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status { status, url });
        }
        let page: EntriesPage = serde_json::from_str(&text)?;
        debug!(entries = page.entries.len(), count = page.count, "decoded entries page");
        Ok(page)
    }
}

impl EntriesSource for ElogyClient {
    fn fetch_entries(&self, request: EntriesRequest) -> BoxFuture<'_, Result<EntriesPage, FetchError>> {
        async move { self.get_entries(&request).await }.boxed()
    }
}
