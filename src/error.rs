/// Shared error type for the summary pipeline.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("repository not found (or private and the token cannot see it)")]
    RepoNotFound,

    #[error("repository tree is too large for the recursive listing API")]
    TreeTooLarge,

    #[error("GitHub rejected the token; check its value and scopes")]
    InvalidToken,

    #[error("GitHub API rate limit exceeded; set a token via GITHUB_TOKEN or [github].token (create one at https://github.com/settings/tokens)")]
    RateLimit,

    #[error("GitHub API error: HTTP {0}")]
    Gateway(u16),

    #[error("no files matched: {0}")]
    NoFilesMatched(String),

    #[error("unexpected tree data received from the GitHub API")]
    EmptyTree,

    #[error("content was requested but no file contents are available")]
    NoContent,

    #[error("not a GitHub repository locator: {0}")]
    Locator(String),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Timeout errors map to [`Error::Timeout`]; everything else maps to
/// [`Error::Http`].
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout(e.to_string())
        } else {
            Error::Http(e.to_string())
        }
    }
}
