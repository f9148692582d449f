//! Content fetching: size-gated, fault-isolated blob retrieval.

pub mod truncate;

pub use truncate::{truncate_middle, TRUNCATION_MARKER};

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures_util::stream::{self, StreamExt};
use serde::Serialize;

use crate::config::FetchConfig;
use crate::github::types::TreeEntry;
use crate::github::RepoHost;
use crate::trace::TraceEvent;

/// The repository coordinates a fetch batch runs against.
#[derive(Debug, Clone)]
pub struct FetchContext {
    pub owner: String,
    pub repo: String,
    pub reference: String,
}

/// Decoded, truncated text content of one fetched blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    pub path: String,
    pub content: String,
}

/// Why a file contributed nothing to the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The blob request itself failed (transport or status).
    FetchFailed { detail: String },
    /// Declared size exceeds the hard cap; never fetched past the metadata.
    TooLarge { size: u64, cap: u64 },
    /// No inline payload and the raw fallback failed too.
    ContentUnavailable { detail: String },
    /// The payload would not decode.
    DecodeFailed { detail: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FetchFailed { detail } => write!(f, "fetch failed: {detail}"),
            SkipReason::TooLarge { size, cap } => {
                write!(f, "declared size {size} exceeds the {cap} byte cap")
            }
            SkipReason::ContentUnavailable { detail } => {
                write!(f, "no inline content and raw fallback failed: {detail}")
            }
            SkipReason::DecodeFailed { detail } => write!(f, "payload decode failed: {detail}"),
        }
    }
}

/// One file dropped from a batch, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipRecord {
    pub path: String,
    pub reason: SkipReason,
}

impl SkipRecord {
    fn new(path: &str, reason: SkipReason) -> Self {
        Self { path: path.to_string(), reason }
    }
}

/// Everything a settled fetch batch produced.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Successfully fetched files, in batch order.
    pub files: Vec<FetchedFile>,
    /// Dropped files, in batch order.
    pub skipped: Vec<SkipRecord>,
}

/// Fetch the contents of `files` with at most `config.concurrency` requests
/// in flight.
///
/// Every file becomes one future resolving to `Ok(FetchedFile)` or
/// `Err(SkipRecord)`; `buffered` keeps execution concurrent while results
/// come back in input order, so the outcome is a stable partition of the
/// batch. One file failing never fails the batch.
pub async fn fetch_contents(
    host: Arc<dyn RepoHost>,
    files: &[TreeEntry],
    max_chars: usize,
    ctx: &FetchContext,
    config: &FetchConfig,
) -> FetchOutcome {
    let size_cap = config.blob_size_cap_bytes;
    let fetches = files.iter().map(|entry| {
        let host = Arc::clone(&host);
        let entry = entry.clone();
        let ctx = ctx.clone();
        async move { fetch_one(host.as_ref(), &entry, max_chars, &ctx, size_cap).await }
    });

    let results: Vec<Result<FetchedFile, SkipRecord>> = stream::iter(fetches)
        .buffered(config.concurrency.max(1))
        .collect()
        .await;

    let mut outcome = FetchOutcome::default();
    for result in results {
        match result {
            Ok(file) => outcome.files.push(file),
            Err(skip) => {
                tracing::warn!(path = %skip.path, reason = %skip.reason, "skipping file");
                outcome.skipped.push(skip);
            }
        }
    }

    TraceEvent::ContentFetched {
        requested: files.len(),
        fetched: outcome.files.len(),
        skipped: outcome.skipped.len(),
    }
    .emit();

    outcome
}

/// Fetch and decode a single blob, falling back to raw delivery when the
/// blob payload omits inline content.
async fn fetch_one(
    host: &dyn RepoHost,
    entry: &TreeEntry,
    max_chars: usize,
    ctx: &FetchContext,
    size_cap: u64,
) -> Result<FetchedFile, SkipRecord> {
    let url = match entry.url.as_deref() {
        Some(url) => url,
        None => {
            return Err(SkipRecord::new(
                &entry.path,
                SkipReason::FetchFailed { detail: "tree entry has no blob URL".into() },
            ))
        }
    };

    let blob = match host.blob(url).await {
        Ok(blob) => blob,
        Err(e) => {
            return Err(SkipRecord::new(
                &entry.path,
                SkipReason::FetchFailed { detail: e.to_string() },
            ))
        }
    };

    if blob.size > size_cap {
        return Err(SkipRecord::new(
            &entry.path,
            SkipReason::TooLarge { size: blob.size, cap: size_cap },
        ));
    }

    let content = match blob.content {
        Some(ref encoded) => match decode_blob_payload(encoded) {
            Ok(text) => text,
            Err(reason) => return Err(SkipRecord::new(&entry.path, reason)),
        },
        // Some objects come back without inline content; raw delivery is
        // the second chance before giving up on the file.
        None => {
            match host
                .raw_file(&ctx.owner, &ctx.repo, &ctx.reference, &entry.path)
                .await
            {
                Ok(text) => text,
                Err(e) => {
                    return Err(SkipRecord::new(
                        &entry.path,
                        SkipReason::ContentUnavailable { detail: e.to_string() },
                    ))
                }
            }
        }
    };

    let (content, _truncated) = truncate_middle(&content, max_chars);
    Ok(FetchedFile { path: entry.path.clone(), content })
}

/// Decode the base64 payload of a blob response.
///
/// The API wraps payloads across lines, so whitespace is stripped before
/// decoding. Decoded bytes that are not valid UTF-8 are replaced rather
/// than rejected.
fn decode_blob_payload(encoded: &str) -> Result<String, SkipReason> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| SkipReason::DecodeFailed { detail: e.to_string() })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::github::types::EntryKind;
    use std::collections::HashMap;

    /// In-memory host: blob URLs map to canned outcomes, raw paths to text.
    #[derive(Default)]
    struct FakeHost {
        blobs: HashMap<String, BlobOutcome>,
        raw: HashMap<String, String>,
    }

    enum BlobOutcome {
        Inline { size: u64, content: String },
        NoInline { size: u64 },
        Fail(String),
    }

    #[async_trait::async_trait]
    impl RepoHost for FakeHost {
        async fn default_branch(&self, _owner: &str, _repo: &str) -> Result<String> {
            Ok("main".into())
        }

        async fn tree(
            &self,
            _owner: &str,
            _repo: &str,
            _reference: &str,
        ) -> Result<Vec<TreeEntry>> {
            Ok(Vec::new())
        }

        async fn blob(&self, url: &str) -> Result<crate::github::types::BlobResponse> {
            match self.blobs.get(url) {
                Some(BlobOutcome::Inline { size, content }) => {
                    Ok(crate::github::types::BlobResponse {
                        size: *size,
                        content: Some(BASE64.encode(content)),
                    })
                }
                Some(BlobOutcome::NoInline { size }) => {
                    Ok(crate::github::types::BlobResponse { size: *size, content: None })
                }
                Some(BlobOutcome::Fail(message)) => Err(Error::Http(message.clone())),
                None => Err(Error::RepoNotFound),
            }
        }

        async fn raw_file(
            &self,
            _owner: &str,
            _repo: &str,
            _reference: &str,
            path: &str,
        ) -> Result<String> {
            self.raw
                .get(path)
                .cloned()
                .ok_or_else(|| Error::Http("raw fetch failed".into()))
        }
    }

    fn entry(path: &str) -> TreeEntry {
        TreeEntry {
            path: path.to_string(),
            kind: EntryKind::Blob,
            size: None,
            url: Some(format!("blob://{path}")),
        }
    }

    fn ctx() -> FetchContext {
        FetchContext { owner: "o".into(), repo: "r".into(), reference: "main".into() }
    }

    fn host_with(entries: Vec<(&str, BlobOutcome)>) -> Arc<dyn RepoHost> {
        let mut host = FakeHost::default();
        for (path, outcome) in entries {
            host.blobs.insert(format!("blob://{path}"), outcome);
        }
        Arc::new(host)
    }

    #[tokio::test]
    async fn one_failure_never_fails_the_batch() {
        let host = host_with(vec![
            ("a.py", BlobOutcome::Inline { size: 1, content: "a".into() }),
            ("b.py", BlobOutcome::Inline { size: 1, content: "b".into() }),
            ("c.py", BlobOutcome::Fail("boom".into())),
            ("d.py", BlobOutcome::Inline { size: 1, content: "d".into() }),
            ("e.py", BlobOutcome::Inline { size: 1, content: "e".into() }),
        ]);
        let files: Vec<TreeEntry> =
            ["a.py", "b.py", "c.py", "d.py", "e.py"].iter().map(|p| entry(p)).collect();

        let outcome = fetch_contents(host, &files, 0, &ctx(), &FetchConfig::default()).await;

        let fetched: Vec<&str> = outcome.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(fetched, vec!["a.py", "b.py", "d.py", "e.py"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].path, "c.py");
        assert!(matches!(outcome.skipped[0].reason, SkipReason::FetchFailed { .. }));
    }

    #[tokio::test]
    async fn declared_size_over_cap_is_skipped_without_decoding() {
        let config = FetchConfig { blob_size_cap_bytes: 10, ..FetchConfig::default() };
        let host = host_with(vec![(
            "big.py",
            BlobOutcome::Inline { size: 11, content: "irrelevant".into() },
        )]);

        let outcome = fetch_contents(host, &[entry("big.py")], 0, &ctx(), &config).await;
        assert!(outcome.files.is_empty());
        assert!(matches!(
            outcome.skipped[0].reason,
            SkipReason::TooLarge { size: 11, cap: 10 }
        ));
    }

    #[tokio::test]
    async fn missing_inline_content_falls_back_to_raw() {
        let mut host = FakeHost::default();
        host.blobs
            .insert("blob://gen.py".into(), BlobOutcome::NoInline { size: 5 });
        host.raw.insert("gen.py".into(), "raw text".into());

        let outcome = fetch_contents(
            Arc::new(host),
            &[entry("gen.py")],
            0,
            &ctx(),
            &FetchConfig::default(),
        )
        .await;

        assert_eq!(outcome.files[0].content, "raw text");
        assert!(outcome.skipped.is_empty());
    }

    #[tokio::test]
    async fn raw_fallback_failure_becomes_content_unavailable() {
        let mut host = FakeHost::default();
        host.blobs
            .insert("blob://gone.py".into(), BlobOutcome::NoInline { size: 5 });

        let outcome = fetch_contents(
            Arc::new(host),
            &[entry("gone.py")],
            0,
            &ctx(),
            &FetchConfig::default(),
        )
        .await;

        assert!(outcome.files.is_empty());
        assert!(matches!(
            outcome.skipped[0].reason,
            SkipReason::ContentUnavailable { .. }
        ));
    }

    #[tokio::test]
    async fn truncation_budget_applies_to_fetched_content() {
        let host = host_with(vec![(
            "long.py",
            BlobOutcome::Inline { size: 26, content: "abcdefghijklmnopqrstuvwxyz".into() },
        )]);

        let outcome =
            fetch_contents(host, &[entry("long.py")], 5, &ctx(), &FetchConfig::default()).await;
        assert_eq!(
            outcome.files[0].content,
            format!("abcde{TRUNCATION_MARKER}vwxyz")
        );
    }

    #[tokio::test]
    async fn entry_without_url_is_skipped() {
        let mut no_url = entry("odd.py");
        no_url.url = None;

        let outcome = fetch_contents(
            Arc::new(FakeHost::default()),
            &[no_url],
            0,
            &ctx(),
            &FetchConfig::default(),
        )
        .await;

        assert!(matches!(outcome.skipped[0].reason, SkipReason::FetchFailed { .. }));
    }

    #[test]
    fn blob_payload_decodes_across_line_wraps() {
        let encoded = BASE64.encode("hello world, hello world");
        let wrapped = format!("{}\n{}", &encoded[..10], &encoded[10..]);
        assert_eq!(decode_blob_payload(&wrapped).unwrap(), "hello world, hello world");
    }

    #[test]
    fn invalid_base64_reports_decode_failure() {
        let err = decode_blob_payload("!!!not base64!!!").unwrap_err();
        assert!(matches!(err, SkipReason::DecodeFailed { .. }));
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let encoded = BASE64.encode([0xffu8, 0xfe, b'o', b'k']);
        let decoded = decode_blob_payload(&encoded).unwrap();
        assert!(decoded.ends_with("ok"));
    }
}
