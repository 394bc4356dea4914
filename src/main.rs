use anyhow::Result;
use revstat::cli::Cli;

fn main() -> Result<()> {
    // RUST_LOG controls verbosity; logs go to stderr so stdout stays clean
    // for the export subcommand.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    cli.execute()
}
