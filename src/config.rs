use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

// ── GitHub connection ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Base URL of the GitHub REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL for raw file delivery, used when a blob has no inline payload.
    #[serde(default = "default_raw_base_url")]
    pub raw_base_url: String,

    /// Personal access token. Prefer `token_env` over a plaintext value here.
    #[serde(default)]
    pub token: Option<String>,

    /// Environment variable consulted when `token` is unset.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// ── Fetch limits ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum number of blob fetches in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Blobs whose declared size exceeds this many bytes are skipped outright.
    #[serde(default = "default_blob_size_cap_bytes")]
    pub blob_size_cap_bytes: u64,

    /// Candidates above this many bytes need an explicit include/exclude decision.
    #[serde(default = "default_large_file_threshold_bytes")]
    pub large_file_threshold_bytes: u64,

    /// Match extension tokens case-insensitively.
    #[serde(default)]
    pub case_insensitive_extensions: bool,
}

// ── Defaults ───────────────────────────────────────────────────────

fn default_api_base_url() -> String {
    "https://api.github.com".into()
}
fn default_raw_base_url() -> String {
    "https://raw.githubusercontent.com".into()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_concurrency() -> usize {
    32
}
fn default_blob_size_cap_bytes() -> u64 {
    500_000
}
fn default_large_file_threshold_bytes() -> u64 {
    100_000
}

// ── Default impls ──────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GithubConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            raw_base_url: default_raw_base_url(),
            token: None,
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            blob_size_cap_bytes: default_blob_size_cap_bytes(),
            large_file_threshold_bytes: default_large_file_threshold_bytes(),
            case_insensitive_extensions: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults for missing keys.
    pub fn load(path: &str) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the GitHub token, if any.
    ///
    /// Precedence:
    /// 1. `token` field (plaintext; warn)
    /// 2. The environment variable named by `token_env`
    /// 3. None: requests go out unauthenticated at the anonymous rate limit
    pub fn resolve_token(&self) -> Option<String> {
        if let Some(ref token) = self.github.token {
            tracing::warn!(
                "GitHub token loaded from plaintext config field 'token'; \
                 prefer the '{}' environment variable instead",
                self.github.token_env
            );
            return Some(token.clone());
        }

        std::env::var(&self.github.token_env).ok().filter(|t| !t.is_empty())
    }
}
