use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "delink",
    version,
    about = "Replace symbolic links to Python files with the actual files"
)]
pub struct Cli {
    #[arg(help = "Directory to process (including subdirectories)")]
    pub directory: PathBuf,
    #[arg(short = 'n', long, help = "Show what would be done without making changes")]
    pub dry_run: bool,
    #[arg(short = 'y', long, help = "Skip confirmation prompt")]
    pub yes: bool,
    #[arg(long, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, value_name = "FILE", help = "Append structured JSONL facts to FILE")]
    pub facts: Option<PathBuf>,
    #[arg(short, long, help = "Print per-entry progress to stderr")]
    pub verbose: bool,
}
