use clap::Parser;
use tracing_subscriber::EnvFilter;

use reposummary::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing();

    match cli.command {
        Command::Summarize(args) => {
            let (config, config_path) = cli::load_config()?;
            tracing::debug!(config_path = %config_path, "configuration loaded");
            cli::summarize::run(config, args).await
        }
        Command::Scan(args) => {
            let (config, _) = cli::load_config()?;
            cli::scan::run(config, args).await
        }
        Command::Version => {
            println!("reposummary {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Initialize compact stderr-only tracing.
///
/// Defaults to `warn` level so diagnostic output never pollutes an
/// artifact printed to stdout. Raise with `RUST_LOG=reposummary=info` to
/// see the structured run events.
fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
