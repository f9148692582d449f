use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// Identifies the repository a run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocator {
    pub owner: String,
    pub repo: String,
}

impl RepoLocator {
    /// Parse `owner/repo` or a github.com URL.
    ///
    /// Accepts bare slugs, `https://github.com/owner/repo`, and deep links
    /// like `.../owner/repo/tree/main`; a trailing `.git` on the repo
    /// segment is dropped. URLs pointing anywhere but github.com are
    /// rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let without_scheme = trimmed
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.");

        let path = if let Some(rest) = without_scheme.strip_prefix("github.com/") {
            rest
        } else if trimmed.contains("://") || trimmed.contains("github.com") {
            return Err(Error::Locator(input.to_string()));
        } else {
            without_scheme
        };

        // Query strings and fragments never belong to the slug.
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/').filter(|s| !s.is_empty());

        match (segments.next(), segments.next()) {
            (Some(owner), Some(repo)) => Ok(Self {
                owner: owner.to_string(),
                repo: repo.trim_end_matches(".git").to_string(),
            }),
            _ => Err(Error::Locator(input.to_string())),
        }
    }
}

impl fmt::Display for RepoLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Response of `GET /repos/{owner}/{repo}`, reduced to the field we use.
#[derive(Debug, Deserialize)]
pub struct RepoResponse {
    pub default_branch: String,
}

/// Response from the Git Trees API with `?recursive=1`.
#[derive(Debug, Deserialize)]
pub struct TreeResponse {
    /// Set when the listing was cut off because the tree is too large.
    #[serde(default)]
    pub truncated: bool,
    /// Absent or null when the API returns an unexpected shape.
    pub tree: Option<Vec<TreeEntry>>,
}

/// One entry of the recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Declared blob size in bytes; directories carry none.
    #[serde(default)]
    pub size: Option<u64>,
    /// API URL for fetching this object.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Blob,
    Tree,
    /// Submodule pointers and anything else the API may add.
    Other,
}

impl<'de> Deserialize<'de> for EntryKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let kind = String::deserialize(deserializer)?;
        Ok(match kind.as_str() {
            "blob" => EntryKind::Blob,
            "tree" => EntryKind::Tree,
            _ => EntryKind::Other,
        })
    }
}

impl TreeEntry {
    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }

    pub fn is_tree(&self) -> bool {
        self.kind == EntryKind::Tree
    }
}

/// Response from the Git Blobs API.
#[derive(Debug, Deserialize)]
pub struct BlobResponse {
    /// Decoded size in bytes as declared by the API.
    #[serde(default)]
    pub size: u64,
    /// Base64 payload; some objects come back without one.
    #[serde(default)]
    pub content: Option<String>,
}
