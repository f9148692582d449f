//! The `scan` subcommand: inspect a tree before summarizing it.

use std::sync::Arc;

use crate::config::Config;
use crate::filter;
use crate::github::{GithubClient, RepoHost, RepoLocator};

use super::ScanArgs;

/// Execute `reposummary scan`.
pub async fn run(config: Config, args: ScanArgs) -> anyhow::Result<()> {
    let locator = RepoLocator::parse(&args.repo)?;
    let token = config.resolve_token();
    let host: Arc<dyn RepoHost> = Arc::new(GithubClient::new(config.github.clone(), token)?);

    let reference = match args.reference {
        Some(ref r) => r.clone(),
        None => host.default_branch(&locator.owner, &locator.repo).await?,
    };
    let tree = host.tree(&locator.owner, &locator.repo, &reference).await?;
    let stats = filter::scan_stats(&tree);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{locator} @ {reference}");
    println!("{} tree entries", tree.len());

    println!();
    println!("Extensions:");
    for ext in &stats.extensions {
        println!("  {} ({})", ext.token, ext.files);
    }

    println!();
    if stats.directories.is_empty() {
        println!("No directories found; all files live at the repository root.");
    } else {
        println!("Directories:");
        for dir in &stats.directories {
            println!("  {dir}");
        }
    }

    Ok(())
}
