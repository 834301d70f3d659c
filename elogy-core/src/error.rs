use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status} for {url}")]
    Status { status: reqwest::StatusCode, url: String },
    #[error("could not decode entries: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("fetch task ended unexpectedly: {0}")]
    Task(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("logbook has no filterable attribute named {0:?}")]
    UnknownAttribute(String),
    #[error("attribute {name:?} has no option {value:?}")]
    UnknownOption { name: String, value: String },
    #[error("option index {index} out of range for attribute {name:?}")]
    OptionIndex { name: String, index: usize },
}
