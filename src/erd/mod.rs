//! Output formats for extracted schemas.

mod json;
mod mermaid;

pub use json::{build_erd_json, to_json, ErdJson, ErdStats};
pub use mermaid::{fence, to_mermaid, FK_CARDINALITY};

use crate::schema::Schema;
use std::fmt;
use std::str::FromStr;

/// Output format for ERD export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Mermaid erDiagram in a fenced code block
    #[default]
    Mermaid,
    /// JSON format for programmatic use
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mermaid" | "mmd" | "md" => Ok(OutputFormat::Mermaid),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Valid options: mermaid, json",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Mermaid => write!(f, "mermaid"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl OutputFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mmd" | "mermaid" | "md" | "markdown" => Some(OutputFormat::Mermaid),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Render a schema in the requested format
pub fn render(schema: &Schema, format: OutputFormat) -> String {
    match format {
        OutputFormat::Mermaid => fence(&to_mermaid(schema)),
        OutputFormat::Json => {
            let mut json = to_json(schema);
            json.push('\n');
            json
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("MERMAID".parse::<OutputFormat>(), Ok(OutputFormat::Mermaid));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("dot".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(OutputFormat::from_extension("md"), Some(OutputFormat::Mermaid));
        assert_eq!(OutputFormat::from_extension("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_extension("png"), None);
    }

    #[test]
    fn test_render_empty_schema() {
        let out = render(&Schema::new(), OutputFormat::Mermaid);
        assert_eq!(out, "```mermaid\nerDiagram\n```\n");
    }
}
