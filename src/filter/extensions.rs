//! Extension tokens and the matching rule that classifies paths.

use crate::error::{Error, Result};

/// Token matching files named `Dockerfile`.
pub const DOCKERFILE_TOKEN: &str = "Dockerfile";
/// Sentinel token matching paths without any `.` anywhere in them.
pub const NO_EXTENSION_TOKEN: &str = "No Extension";

/// A normalized, deduplicated set of extension match tokens.
///
/// Tokens are literal suffixes (`.py`), the `Dockerfile` literal, or the
/// `No Extension` sentinel. Matching is plain suffix comparison; tokens
/// are never parsed as patterns.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    tokens: Vec<String>,
    case_insensitive: bool,
}

impl ExtensionFilter {
    /// Build a filter from raw user tokens.
    ///
    /// Surrounding whitespace is trimmed, empty entries are dropped, and
    /// duplicates are removed keeping first-seen order. An empty result is
    /// rejected up front: a filter with no tokens can never match anything.
    pub fn new<I, S>(tokens: I, case_insensitive: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for raw in tokens {
            let token = raw.as_ref().trim();
            if token.is_empty() {
                continue;
            }
            if !normalized.iter().any(|t| t == token) {
                normalized.push(token.to_string());
            }
        }

        if normalized.is_empty() {
            return Err(Error::NoFilesMatched(
                "at least one extension token is required".into(),
            ));
        }
        Ok(Self { tokens: normalized, case_insensitive })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// True when `path` matches at least one token.
    pub fn matches(&self, path: &str) -> bool {
        self.tokens.iter().any(|token| self.matches_token(path, token))
    }

    fn matches_token(&self, path: &str, token: &str) -> bool {
        if token == DOCKERFILE_TOKEN {
            return path.ends_with(DOCKERFILE_TOKEN);
        }
        if token == NO_EXTENSION_TOKEN {
            return !path.contains('.');
        }
        if self.case_insensitive {
            path.to_lowercase().ends_with(&token.to_lowercase())
        } else {
            path.ends_with(token)
        }
    }
}

/// Classify a path for display: `.ext`, `Dockerfile`, or `No Extension`.
///
/// The extension is whatever follows the last `.` of the final path
/// segment. A segment without one (or with only a trailing `.`) classifies
/// as `Dockerfile` when it equals that literal, `No Extension` otherwise.
pub fn classify(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => format!(".{}", &name[idx + 1..]),
        _ if name == DOCKERFILE_TOKEN => DOCKERFILE_TOKEN.to_string(),
        _ => NO_EXTENSION_TOKEN.to_string(),
    }
}
