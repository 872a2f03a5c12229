//! Convert SQL `CREATE TABLE` schemas into Mermaid ER diagrams.
//!
//! The pipeline runs in three stateless stages:
//! [`normalizer::normalize`] cleans vendor syntax, [`schema::extract_schema`]
//! pulls out tables and foreign keys, and [`erd::render`] writes the diagram.

pub mod diagnostics;
pub mod dialect;
pub mod erd;
pub mod normalizer;
pub mod schema;

use diagnostics::DiagnosticSink;
use dialect::SqlDialect;
use schema::Schema;

/// Normalize and extract in one call
pub fn convert(sql: &str, dialect: SqlDialect, sink: &mut dyn DiagnosticSink) -> Schema {
    let normalized = normalizer::normalize(sql, dialect);
    schema::extract_schema(&normalized, dialect, sink)
}

/// Full pipeline from SQL text to Mermaid erDiagram text (unfenced)
pub fn sql_to_mermaid(sql: &str, dialect: SqlDialect) -> String {
    let schema = convert(sql, dialect, &mut diagnostics::NullSink);
    erd::to_mermaid(&schema)
}
