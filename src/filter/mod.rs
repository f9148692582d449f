//! Tree filtering: selects candidate blobs from the recursive listing and
//! summarizes what a tree contains.

pub mod extensions;

pub use extensions::{classify, ExtensionFilter};

use std::collections::BTreeSet;

use serde::Serialize;

use crate::github::types::TreeEntry;

/// Prefix admitting only root-level paths (no `/` in them).
pub const ROOT_SENTINEL: &str = "/";

/// Selected directory prefixes. Empty admits every directory.
#[derive(Debug, Clone, Default)]
pub struct DirectorySelection {
    prefixes: Vec<String>,
}

impl DirectorySelection {
    /// Build a selection from raw prefixes.
    ///
    /// Trims whitespace and trailing slashes (the root sentinel excepted),
    /// drops empty entries, and dedupes keeping first-seen order.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for raw in prefixes {
            let prefix = raw.as_ref().trim();
            let prefix = if prefix == ROOT_SENTINEL {
                prefix
            } else {
                prefix.trim_end_matches('/')
            };
            if prefix.is_empty() {
                continue;
            }
            if !normalized.iter().any(|p| p == prefix) {
                normalized.push(prefix.to_string());
            }
        }
        Self { prefixes: normalized }
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// True when `path` falls under at least one selected prefix.
    ///
    /// The root sentinel admits exactly the paths with no `/` separator;
    /// every other prefix admits the path equal to it or nested under it.
    /// `src` never admits `src2/...`.
    pub fn admits(&self, path: &str) -> bool {
        if self.prefixes.is_empty() {
            return true;
        }
        self.prefixes.iter().any(|prefix| {
            if prefix == ROOT_SENTINEL {
                return !path.contains('/');
            }
            match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            }
        })
    }
}

/// Filter a tree listing down to candidate files.
///
/// Only blob entries are eligible; a blob qualifies when it matches the
/// extension filter and falls under the directory selection. Output keeps
/// input order, so downstream phases are deterministic.
pub fn filter_files(
    tree: &[TreeEntry],
    extensions: &ExtensionFilter,
    directories: &DirectorySelection,
) -> Vec<TreeEntry> {
    tree.iter()
        .filter(|entry| entry.is_blob())
        .filter(|entry| extensions.matches(&entry.path))
        .filter(|entry| directories.admits(&entry.path))
        .cloned()
        .collect()
}

/// Split out candidates whose declared size exceeds `threshold` bytes.
///
/// Entries without a declared size are never considered oversized. Pure
/// and synchronous; the caller decides what to do with the result before
/// any fetching starts.
pub fn identify_oversized(candidates: &[TreeEntry], threshold: u64) -> Vec<TreeEntry> {
    candidates
        .iter()
        .filter(|entry| entry.size.map_or(false, |s| s > threshold))
        .cloned()
        .collect()
}

/// Extension histogram entry produced by [`scan_stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionCount {
    pub token: String,
    pub files: usize,
}

/// Pre-run summary of a tree: which extension tokens occur, most common
/// first, and which directories exist.
#[derive(Debug, Clone, Serialize)]
pub struct ScanStats {
    pub extensions: Vec<ExtensionCount>,
    pub directories: Vec<String>,
}

/// Summarize a tree listing for display before a run.
///
/// Blobs are classified with [`classify`] and counted; counts sort
/// descending, equal counts keeping first-seen order. Directories are
/// every tree entry path plus each blob's parent, deduplicated and sorted.
pub fn scan_stats(tree: &[TreeEntry]) -> ScanStats {
    let mut counts: Vec<ExtensionCount> = Vec::new();
    let mut directories: BTreeSet<String> = BTreeSet::new();

    for entry in tree {
        if entry.is_blob() {
            let token = classify(&entry.path);
            match counts.iter_mut().find(|c| c.token == token) {
                Some(count) => count.files += 1,
                None => counts.push(ExtensionCount { token, files: 1 }),
            }
            if let Some((parent, _)) = entry.path.rsplit_once('/') {
                directories.insert(parent.to_string());
            }
        } else if entry.is_tree() {
            directories.insert(entry.path.clone());
        }
    }

    // sort_by is stable, so equal counts keep first-seen order.
    counts.sort_by(|a, b| b.files.cmp(&a.files));

    ScanStats {
        extensions: counts,
        directories: directories.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::EntryKind;

    fn blob(path: &str, size: u64) -> TreeEntry {
        TreeEntry {
            path: path.to_string(),
            kind: EntryKind::Blob,
            size: Some(size),
            url: Some(format!("https://api.github.com/blobs/{path}")),
        }
    }

    fn dir(path: &str) -> TreeEntry {
        TreeEntry {
            path: path.to_string(),
            kind: EntryKind::Tree,
            size: None,
            url: None,
        }
    }

    #[test]
    fn root_sentinel_admits_only_root_level_paths() {
        let selection = DirectorySelection::new([ROOT_SENTINEL]);
        assert!(selection.admits("readme.md"));
        assert!(!selection.admits("src/a.py"));
    }

    #[test]
    fn prefix_admits_nested_paths_but_not_siblings() {
        let selection = DirectorySelection::new(["src"]);
        assert!(selection.admits("src/a.py"));
        assert!(selection.admits("src/deep/b.py"));
        assert!(selection.admits("src"));
        assert!(!selection.admits("src2/a.py"));
        assert!(!selection.admits("a.py"));
    }

    #[test]
    fn empty_selection_admits_everything() {
        let selection = DirectorySelection::new(Vec::<String>::new());
        assert!(selection.is_empty());
        assert!(selection.admits("anything/at/all.txt"));
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let selection = DirectorySelection::new(["src/"]);
        assert!(selection.admits("src/a.py"));
        assert!(!selection.admits("src2/a.py"));
    }

    #[test]
    fn filter_keeps_matching_blobs_in_input_order() {
        let tree = vec![
            dir("src"),
            blob("src/b.py", 10),
            blob("src/a.py", 10),
            blob("src/ignore.txt", 10),
            blob("readme.md", 10),
        ];
        let extensions = ExtensionFilter::new([".py"], false).unwrap();
        let selection = DirectorySelection::default();

        let candidates = filter_files(&tree, &extensions, &selection);
        let paths: Vec<&str> = candidates.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["src/b.py", "src/a.py"]);
    }

    #[test]
    fn filter_ignores_directories_even_when_names_match() {
        let tree = vec![dir("weird.py"), blob("real.py", 1)];
        let extensions = ExtensionFilter::new([".py"], false).unwrap();
        let candidates = filter_files(&tree, &extensions, &DirectorySelection::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].path, "real.py");
    }

    #[test]
    fn oversized_split_uses_strict_greater_than() {
        let candidates = vec![blob("small.py", 99), blob("edge.py", 100), blob("big.py", 101)];
        let oversized = identify_oversized(&candidates, 100);
        assert_eq!(oversized.len(), 1);
        assert_eq!(oversized[0].path, "big.py");
    }

    #[test]
    fn oversized_split_skips_entries_without_size() {
        let mut entry = blob("nosize.py", 0);
        entry.size = None;
        assert!(identify_oversized(&[entry], 0).is_empty());
    }

    #[test]
    fn scan_stats_counts_and_orders_extensions() {
        let tree = vec![
            blob("a.py", 1),
            blob("b.md", 1),
            blob("c.py", 1),
            blob("Dockerfile", 1),
            blob("LICENSE", 1),
        ];
        let stats = scan_stats(&tree);
        assert_eq!(stats.extensions[0], ExtensionCount { token: ".py".into(), files: 2 });
        // Singletons keep first-seen order after the sort.
        let rest: Vec<&str> = stats.extensions[1..].iter().map(|c| c.token.as_str()).collect();
        assert_eq!(rest, vec![".md", "Dockerfile", "No Extension"]);
    }

    #[test]
    fn scan_stats_collects_directories_from_both_sources() {
        let tree = vec![dir("docs"), blob("src/lib/a.py", 1), blob("root.py", 1)];
        let stats = scan_stats(&tree);
        assert_eq!(stats.directories, vec!["docs".to_string(), "src/lib".to_string()]);
    }
}
