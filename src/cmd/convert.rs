//! Convert command: SQL file in, ERD out.

use super::Cli;
use crate::diagnostics::{DiagnosticSink, NullSink, StderrSink};
use crate::dialect::SqlDialect;
use crate::erd::{render, OutputFormat};
use crate::normalizer::normalize;
use crate::schema::{extract_schema, Schema};
use anyhow::{anyhow, bail, Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

/// Resolved settings for one conversion
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub dialect: SqlDialect,
    pub format: OutputFormat,
    pub debug: bool,
    pub debug_lines: usize,
}

impl TryFrom<Cli> for ConvertOptions {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> Result<Self> {
        let output = cli.output.or(cli.output_file);
        let dialect: SqlDialect = cli.dialect.parse().map_err(|e: String| anyhow!(e))?;

        // Explicit format wins, then the output extension
        let format = if let Some(ref f) = cli.format {
            f.parse().map_err(|e: String| anyhow!(e))?
        } else {
            output
                .as_ref()
                .and_then(|p| p.extension())
                .and_then(|e| e.to_str())
                .and_then(OutputFormat::from_extension)
                .unwrap_or_default()
        };

        Ok(Self {
            input: cli.input,
            output,
            dialect,
            format,
            debug: cli.debug,
            debug_lines: cli.debug_lines,
        })
    }
}

/// Run the convert command
pub fn run(options: ConvertOptions) -> Result<()> {
    let ConvertOptions {
        input,
        output,
        dialect,
        format,
        debug,
        debug_lines,
    } = options;
    let chatty = format != OutputFormat::Json || output.is_some();

    if !input.exists() {
        bail!("input file does not exist: {}", input.display());
    }

    let sql = fs::read_to_string(&input)
        .with_context(|| format!("Cannot read input file: {}", input.display()))?;

    if chatty {
        eprintln!("Generating ERD: {} [dialect: {}]", input.display(), dialect);
    }

    let schema = if debug {
        let mut sink = StderrSink::new(debug_lines);
        let schema = extract_with(&sql, dialect, &mut sink);
        for table in &schema.tables {
            sink.line(format_args!(
                "table {}: {} column(s)",
                table.name,
                table.columns.len()
            ));
        }
        sink.finish();
        schema
    } else {
        extract_with(&sql, dialect, &mut NullSink)
    };

    if schema.is_empty() && chatty {
        eprintln!("No tables found in the file.");
    }

    let content = render(&schema, format);

    if let Some(ref out_path) = output {
        let mut file = File::create(out_path)
            .with_context(|| format!("Cannot create output file: {}", out_path.display()))?;
        file.write_all(content.as_bytes())?;
        eprintln!("ERD written to: {}", out_path.display());
    } else {
        print!("{}", content);
    }

    if chatty {
        eprintln!(
            "ERD: {} tables, {} columns, {} relationships",
            schema.drawable_tables().count(),
            schema.column_count(),
            schema.relationships.len()
        );
    }

    Ok(())
}

fn extract_with(sql: &str, dialect: SqlDialect, sink: &mut dyn DiagnosticSink) -> Schema {
    let normalized = normalize(sql, dialect);
    extract_schema(&normalized, dialect, sink)
}
