mod convert;

pub use convert::ConvertOptions;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sql-erd")]
#[command(version)]
#[command(about = "Convert SQL CREATE TABLE schemas into Mermaid ER diagrams", long_about = None)]
pub struct Cli {
    /// Input SQL file containing CREATE TABLE statements
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[arg(value_name = "OUTPUT", conflicts_with = "output")]
    pub output_file: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// SQL dialect: mysql, postgres, mssql, sqlite, or generic
    #[arg(long, default_value = "mysql")]
    pub dialect: String,

    /// Output format: mermaid or json (detected from output extension if not specified)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Print diagnostics about skipped tables, clauses, and types to stderr
    #[arg(short, long)]
    pub debug: bool,

    /// Maximum number of diagnostic lines printed in debug mode
    #[arg(long, default_value_t = 100)]
    pub debug_lines: usize,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let options = ConvertOptions::try_from(cli)?;
    convert::run(options)
}
