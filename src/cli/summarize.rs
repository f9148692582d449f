//! The `summarize` subcommand: run the full pipeline and deliver the
//! artifact.

use std::io::{IsTerminal, Write};
use std::sync::Arc;

use crate::config::Config;
use crate::github::{GithubClient, RepoHost, RepoLocator};
use crate::run::{self, LargeFileDecision, RepoScan, RunRequest};

use super::SummarizeArgs;

/// Execute `reposummary summarize`.
pub async fn run(config: Config, args: SummarizeArgs) -> anyhow::Result<()> {
    let locator = RepoLocator::parse(&args.repo)?;
    let token = config.resolve_token();
    let host: Arc<dyn RepoHost> = Arc::new(GithubClient::new(config.github.clone(), token)?);

    let request = RunRequest {
        owner: locator.owner.clone(),
        repo: locator.repo.clone(),
        reference: args.reference.clone(),
        extensions: args.extensions.clone(),
        directories: args.directories.clone(),
        max_chars: args.max_chars,
        include_content: !args.no_content,
        include_tree: !args.no_tree,
    };

    let scanned = run::scan(host, config.fetch.clone(), request).await?;

    let decision = if !scanned.needs_confirmation() || args.include_large {
        LargeFileDecision::Include
    } else if args.exclude_large {
        LargeFileDecision::Exclude
    } else {
        prompt_large_files(&scanned)?
    };

    let outcome = scanned.finish(decision).await?;

    // ── Deliver the artifact ───────────────────────────────────────
    if args.stdout {
        print!("{}", outcome.artifact.text);
        std::io::stdout().flush()?;
    } else {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| outcome.artifact.file_name.clone().into());
        std::fs::write(&path, &outcome.artifact.text)
            .map_err(|e| anyhow::anyhow!("writing {}: {e}", path.display()))?;
        eprintln!("Wrote {}", path.display());
    }

    // ── Metrics (stderr, so a piped artifact stays clean) ──────────
    let metrics = &outcome.report.metrics;
    eprintln!("File Size: {:.2} KB", metrics.kilobytes());
    eprintln!("Estimated Token Count: {}", metrics.estimated_tokens);
    if !outcome.report.skipped.is_empty() {
        eprintln!("Skipped {} file(s):", outcome.report.skipped.len());
        for skip in &outcome.report.skipped {
            eprintln!("  {} ({})", skip.path, skip.reason);
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    }

    Ok(())
}

/// Interactive large-file gate: list the files, ask include or exclude.
///
/// When stdin is not a terminal there is nobody to ask; the run proceeds
/// with the files included, with a warning, so piped invocations never
/// hang.
fn prompt_large_files(scanned: &RepoScan) -> anyhow::Result<LargeFileDecision> {
    eprintln!(
        "{} file(s) exceed the large-file threshold:",
        scanned.oversized.len()
    );
    for entry in &scanned.oversized {
        eprintln!("  {} ({} bytes)", entry.path, entry.size.unwrap_or(0));
    }

    if !std::io::stdin().is_terminal() {
        tracing::warn!("stdin is not a terminal; including large files");
        return Ok(LargeFileDecision::Include);
    }

    eprint!("Include them? [y/N] ");
    std::io::stderr().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    if answer.trim().eq_ignore_ascii_case("y") {
        Ok(LargeFileDecision::Include)
    } else {
        Ok(LargeFileDecision::Exclude)
    }
}
