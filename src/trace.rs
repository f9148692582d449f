use serde::Serialize;

use crate::run::RunStatus;

/// Structured trace events emitted during a summary run.
/// These integrate with the `tracing` crate and are machine-parseable.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    /// Emitted on GitHub API calls.
    GithubCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },

    /// Emitted after the recursive tree listing is fetched.
    TreeFetched {
        owner: String,
        repo: String,
        reference: String,
        entries: usize,
    },

    /// Emitted after the tree is filtered down to candidate files.
    CandidatesFiltered {
        candidates: usize,
        oversized: usize,
    },

    /// Emitted once a fetch batch has fully settled.
    ContentFetched {
        requested: usize,
        fetched: usize,
        skipped: usize,
    },

    /// Emitted after the artifact is assembled and measured.
    ArtifactAssembled {
        bytes: usize,
        estimated_tokens: usize,
        content_files: usize,
    },

    /// Emitted when the run moves to a new lifecycle state.
    StatusChanged { status: RunStatus },

    /// Emitted when a run ends in failure.
    RunFailed { error: String },
}

impl TraceEvent {
    /// Emit this event as a tracing span event.
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "reposummary_event");
    }
}
