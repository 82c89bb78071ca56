use thiserror::Error;

/// Errors that can occur while querying the search backend.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The backend could not be reached at all.
    #[error("Search backend unavailable: {0}")]
    Unavailable(String),

    #[error("Search backend returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse search response: {0}")]
    Parse(String),
}

impl SearchError {
    /// Whether the run should stop instead of skipping the current table.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SearchError::Unavailable(_))
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            SearchError::Unavailable(err.to_string())
        } else if err.is_decode() {
            SearchError::Parse(err.to_string())
        } else {
            SearchError::Api {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                message: err.to_string(),
            }
        }
    }
}
