use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "revstat")]
#[command(about = "Commit-history statistics and report generator for version-control logs")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to the XML commit log (svn log --verbose --xml)")]
    pub log: PathBuf,

    #[arg(long, help = "Path to the YAML report configuration")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Lower date bound, inclusive (YYYY-MM-DD)")]
    pub begin: Option<String>,

    #[arg(long, help = "Upper date bound, inclusive (YYYY-MM-DD)")]
    pub end: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    Report {
        #[arg(long, default_value = "revstat", help = "Output directory for the report")]
        out: PathBuf,
    },
    Export {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON, one table per line")]
        ndjson: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Report { out } => crate::report::exec(self.common, out),
            Commands::Export { json, ndjson } => crate::report::export(self.common, json, ndjson),
        }
    }
}
