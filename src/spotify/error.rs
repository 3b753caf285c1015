use std::fmt;

/// The single failure value every search operation reports.
///
/// Connectivity problems, timeouts, non-success statuses and undecodable
/// bodies all end up here; only the description tells them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchError {
    description: String,
}

impl SearchError {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl std::error::Error for SearchError {}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return SearchError::new(format!("Request timed out: {}", err));
        }
        if let Some(status) = err.status() {
            return SearchError::new(format!("Spotify API responded with {}", status));
        }
        if err.is_connect() {
            return SearchError::new(format!("Cannot reach Spotify API: {}", err));
        }
        SearchError::new(format!("Request failed: {}", err))
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::new(format!("Malformed response body: {}", err))
    }
}
