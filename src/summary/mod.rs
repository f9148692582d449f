//! Document assembly: renders fetched contents and the tree outline into
//! the final artifact text.

pub mod outline;
pub mod report;

pub use outline::Outline;
pub use report::ArtifactMetrics;

use crate::error::{Error, Result};
use crate::fetch::FetchedFile;
use crate::github::types::TreeEntry;

/// Header introducing the tree section of the artifact.
pub const TREE_SECTION_HEADER: &str = "\n\n===== File Tree =====\n";
/// Artifact body when nothing at all was selected for inclusion.
pub const EMPTY_PLACEHOLDER: &str = "No content selected to include in the summary.";

/// Which sections the artifact carries.
#[derive(Debug, Clone, Copy)]
pub struct DocumentOptions {
    pub include_content: bool,
    pub include_tree: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self { include_content: true, include_tree: true }
    }
}

/// The assembled artifact with its derived metrics.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub text: String,
    /// Download-style file name, `{repo}-code-summary.txt`.
    pub file_name: String,
    pub metrics: ArtifactMetrics,
}

/// Conventional artifact file name for a repository.
pub fn artifact_file_name(repo: &str) -> String {
    format!("{repo}-code-summary.txt")
}

/// Assemble the artifact text from fetched contents and the full tree.
///
/// `files` is `None` when no fetch phase ran; that is only legal while
/// content is not requested. Asking for content without any contents in
/// hand is an input error, not an empty document. Empty inputs are fine:
/// they degrade to the fixed placeholder.
pub fn build_document(
    files: Option<&[FetchedFile]>,
    tree: &[TreeEntry],
    options: DocumentOptions,
) -> Result<String> {
    let mut document = String::new();

    if options.include_content {
        let files = files.ok_or(Error::NoContent)?;
        for file in files {
            document.push_str(&format!("\n===== {} =====\n{}\n", file.path, file.content));
        }
    }

    if options.include_tree {
        let outline = Outline::from_paths(tree.iter().map(|e| e.path.as_str()));
        document.push_str(TREE_SECTION_HEADER);
        document.push_str(&outline.render());
    }

    if document.is_empty() {
        document.push_str(EMPTY_PLACEHOLDER);
    }
    Ok(document)
}

/// Assemble the full artifact: document text, file name, and metrics.
pub fn build_artifact(
    files: Option<&[FetchedFile]>,
    tree: &[TreeEntry],
    options: DocumentOptions,
    repo: &str,
) -> Result<Artifact> {
    let text = build_document(files, tree, options)?;
    let metrics = ArtifactMetrics::measure(&text);
    Ok(Artifact { text, file_name: artifact_file_name(repo), metrics })
}
