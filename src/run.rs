//! Run orchestration: ties the host, filter, fetcher, and assembler into
//! one two-phase pipeline.
//!
//! Phase one ([`scan`]) resolves the ref, pulls the recursive tree, and
//! filters candidates, surfacing oversized files so the caller can decide
//! about them. Phase two ([`RepoScan::finish`]) fetches contents and
//! assembles the artifact. The split between the phases is the only
//! caller-in-the-loop gate in the pipeline; everything else runs to
//! completion on its own.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::fetch::{self, FetchContext, SkipRecord};
use crate::filter::{self, DirectorySelection, ExtensionFilter};
use crate::github::types::TreeEntry;
use crate::github::RepoHost;
use crate::summary::{self, Artifact, ArtifactMetrics, DocumentOptions};
use crate::trace::TraceEvent;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / status
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Everything one run needs, captured up front. The pipeline holds no
/// state beyond this and what the phases derive from it.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub owner: String,
    pub repo: String,
    /// Branch or commit; `None` resolves the repository default branch.
    pub reference: Option<String>,
    /// Extension tokens to match, e.g. `.py` or `Dockerfile`.
    pub extensions: Vec<String>,
    /// Directory prefixes to admit; empty admits everything.
    pub directories: Vec<String>,
    /// Per-file character budget; zero disables truncation.
    pub max_chars: usize,
    pub include_content: bool,
    pub include_tree: bool,
}

/// Lifecycle of a single run.
///
/// `Scanning` covers ref resolution through filtering; the pipeline then
/// passes through `AwaitingLargeFileConfirmation` whenever oversized
/// candidates exist, and `Fetching`/`Assembling` once a decision is in.
/// Each transition surfaces as a [`TraceEvent::StatusChanged`] event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No run has started yet.
    #[default]
    Idle,
    Scanning,
    AwaitingLargeFileConfirmation,
    Fetching,
    Assembling,
    Ready,
    Failed,
}

impl RunStatus {
    /// Terminal states persist until a new run replaces them.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// What to do with candidates above the large-file threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LargeFileDecision {
    Include,
    Exclude,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Phase one: scan
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A completed scan, holding everything phase two needs.
pub struct RepoScan {
    host: Arc<dyn RepoHost>,
    fetch_config: FetchConfig,
    request: RunRequest,
    reference: String,
    run_id: Uuid,
    started_at: DateTime<Utc>,
    started: Instant,
    /// Full tree listing (blobs and directories), in API order.
    pub tree: Vec<TreeEntry>,
    /// Candidate files after extension and directory filtering.
    pub candidates: Vec<TreeEntry>,
    /// Candidates above the large-file threshold, awaiting a decision.
    pub oversized: Vec<TreeEntry>,
}

/// Resolve the ref, fetch the recursive tree, and filter candidates.
///
/// Fails fast on invalid input (no extension tokens, nothing matched when
/// content was requested) and on anything the host reports about the
/// repository or the listing.
pub async fn scan(
    host: Arc<dyn RepoHost>,
    fetch_config: FetchConfig,
    request: RunRequest,
) -> Result<RepoScan> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let started = Instant::now();
    TraceEvent::StatusChanged { status: RunStatus::Scanning }.emit();

    match scan_inner(&host, &fetch_config, &request).await {
        Ok((reference, tree, candidates, oversized)) => {
            if !oversized.is_empty() {
                TraceEvent::StatusChanged {
                    status: RunStatus::AwaitingLargeFileConfirmation,
                }
                .emit();
            }
            Ok(RepoScan {
                host,
                fetch_config,
                request,
                reference,
                run_id,
                started_at,
                started,
                tree,
                candidates,
                oversized,
            })
        }
        Err(e) => {
            TraceEvent::StatusChanged { status: RunStatus::Failed }.emit();
            TraceEvent::RunFailed { error: e.to_string() }.emit();
            Err(e)
        }
    }
}

type ScanParts = (String, Vec<TreeEntry>, Vec<TreeEntry>, Vec<TreeEntry>);

async fn scan_inner(
    host: &Arc<dyn RepoHost>,
    fetch_config: &FetchConfig,
    request: &RunRequest,
) -> Result<ScanParts> {
    let extensions =
        ExtensionFilter::new(&request.extensions, fetch_config.case_insensitive_extensions)?;
    let directories = DirectorySelection::new(&request.directories);

    let reference = match request.reference {
        Some(ref r) => r.clone(),
        None => host.default_branch(&request.owner, &request.repo).await?,
    };

    let tree = host.tree(&request.owner, &request.repo, &reference).await?;
    TraceEvent::TreeFetched {
        owner: request.owner.clone(),
        repo: request.repo.clone(),
        reference: reference.clone(),
        entries: tree.len(),
    }
    .emit();

    let candidates = filter::filter_files(&tree, &extensions, &directories);
    if candidates.is_empty() && request.include_content {
        return Err(Error::NoFilesMatched(format!(
            "no files matched extensions [{}]",
            extensions.tokens().join(", ")
        )));
    }

    let oversized = filter::identify_oversized(&candidates, fetch_config.large_file_threshold_bytes);
    TraceEvent::CandidatesFiltered {
        candidates: candidates.len(),
        oversized: oversized.len(),
    }
    .emit();

    Ok((reference, tree, candidates, oversized))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Phase two: finish
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

impl RepoScan {
    /// True when oversized candidates need a caller decision before fetch.
    pub fn needs_confirmation(&self) -> bool {
        !self.oversized.is_empty()
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Fetch contents and assemble the artifact.
    ///
    /// `decision` applies to the oversized candidates from phase one and is
    /// irrelevant when there are none. Consumes the scan; a run never
    /// finishes twice.
    pub async fn finish(self, decision: LargeFileDecision) -> Result<RunOutcome> {
        match self.finish_inner(decision).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                TraceEvent::StatusChanged { status: RunStatus::Failed }.emit();
                TraceEvent::RunFailed { error: e.to_string() }.emit();
                Err(e)
            }
        }
    }

    async fn finish_inner(self, decision: LargeFileDecision) -> Result<RunOutcome> {
        let RepoScan {
            host,
            fetch_config,
            request,
            reference,
            run_id,
            started_at,
            started,
            tree,
            candidates,
            oversized,
        } = self;
        let candidate_count = candidates.len();

        let selected: Vec<TreeEntry> = match decision {
            LargeFileDecision::Include => candidates,
            LargeFileDecision::Exclude => candidates
                .into_iter()
                .filter(|c| !oversized.iter().any(|o| o.path == c.path))
                .collect(),
        };

        let (files, skipped) = if request.include_content {
            TraceEvent::StatusChanged { status: RunStatus::Fetching }.emit();
            let ctx = FetchContext {
                owner: request.owner.clone(),
                repo: request.repo.clone(),
                reference: reference.clone(),
            };
            let outcome = fetch::fetch_contents(
                Arc::clone(&host),
                &selected,
                request.max_chars,
                &ctx,
                &fetch_config,
            )
            .await;
            (Some(outcome.files), outcome.skipped)
        } else {
            (None, Vec::new())
        };

        TraceEvent::StatusChanged { status: RunStatus::Assembling }.emit();
        let options = DocumentOptions {
            include_content: request.include_content,
            include_tree: request.include_tree,
        };
        let artifact = summary::build_artifact(files.as_deref(), &tree, options, &request.repo)?;

        TraceEvent::ArtifactAssembled {
            bytes: artifact.metrics.bytes,
            estimated_tokens: artifact.metrics.estimated_tokens,
            content_files: files.as_ref().map_or(0, |f| f.len()),
        }
        .emit();

        let report = RunReport {
            run_id,
            status: RunStatus::Ready,
            owner: request.owner,
            repo: request.repo,
            reference,
            started_at,
            duration_ms: started.elapsed().as_millis() as u64,
            tree_entries: tree.len(),
            candidates: candidate_count,
            oversized: oversized.len(),
            oversized_included: matches!(decision, LargeFileDecision::Include),
            fetched: files.as_ref().map_or(0, |f| f.len()),
            skipped,
            metrics: artifact.metrics.clone(),
        };
        TraceEvent::StatusChanged { status: RunStatus::Ready }.emit();

        Ok(RunOutcome { artifact, report })
    }
}

/// Run both phases with a fixed large-file decision, no interactive gate.
pub async fn run_to_completion(
    host: Arc<dyn RepoHost>,
    fetch_config: FetchConfig,
    request: RunRequest,
    decision: LargeFileDecision,
) -> Result<RunOutcome> {
    let scanned = scan(host, fetch_config, request).await?;
    scanned.finish(decision).await
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Outcome
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Machine-readable record of one completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub status: RunStatus,
    pub owner: String,
    pub repo: String,
    pub reference: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Entries in the full recursive listing.
    pub tree_entries: usize,
    /// Candidates after filtering, before the large-file decision.
    pub candidates: usize,
    pub oversized: usize,
    pub oversized_included: bool,
    pub fetched: usize,
    pub skipped: Vec<SkipRecord>,
    pub metrics: ArtifactMetrics,
}

/// A finished run: the artifact plus its report.
#[derive(Debug)]
pub struct RunOutcome {
    pub artifact: Artifact,
    pub report: RunReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ready_and_failed_are_terminal() {
        assert!(RunStatus::Ready.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(!RunStatus::Idle.is_terminal());
        assert!(!RunStatus::Scanning.is_terminal());
        assert!(!RunStatus::AwaitingLargeFileConfirmation.is_terminal());
        assert!(!RunStatus::Fetching.is_terminal());
        assert!(!RunStatus::Assembling.is_terminal());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&RunStatus::AwaitingLargeFileConfirmation).unwrap();
        assert_eq!(json, r#""awaiting_large_file_confirmation""#);
    }

    #[test]
    fn default_status_is_idle() {
        assert_eq!(RunStatus::default(), RunStatus::Idle);
        assert!(!RunStatus::default().is_terminal());
    }

    #[test]
    fn status_change_event_carries_the_state() {
        let event = TraceEvent::StatusChanged {
            status: RunStatus::AwaitingLargeFileConfirmation,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"event":"StatusChanged","status":"awaiting_large_file_confirmation"}"#
        );
    }
}
