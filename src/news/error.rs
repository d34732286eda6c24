use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Missing or placeholder credential; nothing was attempted.
    #[error("no NewsAPI key configured ({0})")]
    Config(String),

    #[error("daily quota reached, using cache next time")]
    QuotaExhausted,

    #[error("API error: {status} {text}")]
    Api { status: u16, text: String },

    #[error("no articles found")]
    EmptyResult,

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Banner text shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Config(_) => format!("{self}. Add `api_key` to config.toml or set NEWSAPI_KEY."),
            _ => format!("Failed to load news: {self}. Check your API key or try later."),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Network("request timed out".into())
        } else if err.is_connect() {
            FetchError::Network(format!("connection failed: {err}"))
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
