//! GitHub access layer: locator parsing, wire types, and the HTTP client.

pub mod client;
pub mod types;

pub use client::GithubClient;
pub use types::{BlobResponse, EntryKind, RepoLocator, TreeEntry};

use crate::error::Result;

/// Read-only interface over a repository host.
///
/// The pipeline talks to the host exclusively through this trait. The
/// [`GithubClient`] implementation backs it with the GitHub REST API;
/// tests substitute an in-memory host.
#[async_trait::async_trait]
pub trait RepoHost: Send + Sync {
    /// Resolve the default branch of a repository.
    async fn default_branch(&self, owner: &str, repo: &str) -> Result<String>;

    /// Fetch the full recursive tree listing at `reference`.
    ///
    /// Fails with [`crate::error::Error::TreeTooLarge`] when the host cut
    /// the listing off, and [`crate::error::Error::EmptyTree`] when the
    /// response carries no listing at all.
    async fn tree(&self, owner: &str, repo: &str, reference: &str) -> Result<Vec<TreeEntry>>;

    /// Fetch one blob through the per-entry API URL from the tree listing.
    async fn blob(&self, url: &str) -> Result<BlobResponse>;

    /// Fetch raw file content, the fallback when a blob has no inline payload.
    async fn raw_file(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
        path: &str,
    ) -> Result<String>;
}
