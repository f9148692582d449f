pub mod scan;
pub mod summarize;

use clap::{Args, Parser, Subcommand};

/// Turn a GitHub repository into a single LLM-ready text file.
#[derive(Debug, Parser)]
#[command(name = "reposummary", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, filter, and concatenate repository files into one artifact.
    Summarize(SummarizeArgs),
    /// List the extensions and directories present in a repository tree.
    Scan(ScanArgs),
    /// Print version information.
    Version,
}

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    /// Repository, as `owner/repo` or a github.com URL.
    pub repo: String,

    /// Branch or commit to summarize (defaults to the repository default branch).
    #[arg(long = "ref")]
    pub reference: Option<String>,

    /// Comma-separated extension tokens (`.py`, `Dockerfile`, `No Extension`).
    #[arg(
        short = 'e',
        long = "ext",
        value_delimiter = ',',
        default_value = ".js,.py,.java,.cpp,.md"
    )]
    pub extensions: Vec<String>,

    /// Comma-separated directory prefixes to include (`/` means root-level files only).
    #[arg(short = 'd', long = "dir", value_delimiter = ',')]
    pub directories: Vec<String>,

    /// Per-file character budget; longer files keep head and tail only. 0 disables.
    #[arg(long, default_value_t = 0)]
    pub max_chars: usize,

    /// Leave file contents out of the artifact.
    #[arg(long)]
    pub no_content: bool,

    /// Leave the tree outline out of the artifact.
    #[arg(long)]
    pub no_tree: bool,

    /// Include files over the large-file threshold without prompting.
    #[arg(long, conflicts_with = "exclude_large")]
    pub include_large: bool,

    /// Exclude files over the large-file threshold without prompting.
    #[arg(long)]
    pub exclude_large: bool,

    /// Write the artifact here instead of `{repo}-code-summary.txt`.
    #[arg(short = 'o', long)]
    pub output: Option<std::path::PathBuf>,

    /// Print the artifact to stdout instead of writing a file.
    #[arg(long)]
    pub stdout: bool,

    /// Print the run report as JSON after the artifact is delivered.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Repository, as `owner/repo` or a github.com URL.
    pub repo: String,

    /// Branch or commit to scan (defaults to the repository default branch).
    #[arg(long = "ref")]
    pub reference: Option<String>,

    /// Output the scan as JSON.
    #[arg(long)]
    pub json: bool,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `REPOSUMMARY_CONFIG`
/// (or `config.toml` by default). Returns the parsed
/// [`crate::config::Config`] and the path that was used.
///
/// A missing file yields defaults; a file that exists but does not parse
/// is an error, never silently ignored.
pub fn load_config() -> anyhow::Result<(crate::config::Config, String)> {
    let config_path =
        std::env::var("REPOSUMMARY_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        crate::config::Config::load(&config_path)
            .map_err(|e| anyhow::anyhow!("loading {config_path}: {e}"))?
    } else {
        crate::config::Config::default()
    };

    Ok((config, config_path))
}
