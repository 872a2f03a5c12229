//! Diagnostic reporting for the normalize/extract pipeline.
//!
//! The pipeline never prints. Anything worth telling the user about (a table
//! skipped because its parentheses never close, a clause that was not
//! understood, a type that fell back to VARCHAR) is handed to a
//! [`DiagnosticSink`] supplied by the caller.

use std::fmt;

/// Something the extractor recovered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A CREATE TABLE whose opening parenthesis is never closed
    UnmatchedParen { table: String, offset: usize },
    /// A second CREATE TABLE for a name already extracted
    DuplicateTable { table: String },
    /// A column declared twice in the same table
    DuplicateColumn { table: String, column: String },
    /// A body clause that is neither a column nor a known constraint
    DiscardedClause { table: String, clause: String },
    /// A column type with no entry in the type map
    UnknownType {
        table: String,
        column: String,
        raw_type: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnmatchedParen { table, offset } => write!(
                f,
                "Skipped table '{}': unmatched '(' at byte {}",
                table, offset
            ),
            Diagnostic::DuplicateTable { table } => {
                write!(f, "Skipped duplicate definition of table '{}'", table)
            }
            Diagnostic::DuplicateColumn { table, column } => {
                write!(f, "Skipped duplicate column {}.{}", table, column)
            }
            Diagnostic::DiscardedClause { table, clause } => {
                write!(f, "Discarded clause in '{}': {}", table, preview(clause))
            }
            Diagnostic::UnknownType {
                table,
                column,
                raw_type,
            } => write!(
                f,
                "Unknown type '{}' for {}.{}, using VARCHAR",
                raw_type, table, column
            ),
        }
    }
}

/// Shorten a clause to one line for display
fn preview(clause: &str) -> String {
    let flat = clause.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > 60 {
        let cut: String = flat.chars().take(57).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

/// Receiver for pipeline diagnostics
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

/// Writes diagnostics to stderr, stopping after a fixed number of lines
#[derive(Debug)]
pub struct StderrSink {
    max_lines: usize,
    printed: usize,
    suppressed: usize,
}

impl StderrSink {
    pub fn new(max_lines: usize) -> Self {
        Self {
            max_lines,
            printed: 0,
            suppressed: 0,
        }
    }

    /// Print a free-form debug line, subject to the same line budget
    pub fn line(&mut self, text: impl fmt::Display) {
        if self.printed < self.max_lines {
            eprintln!("[debug] {}", text);
            self.printed += 1;
        } else {
            self.suppressed += 1;
        }
    }

    /// Number of lines that did not fit in the budget
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    /// Report how many lines were cut, if any
    pub fn finish(self) {
        if self.suppressed > 0 {
            eprintln!(
                "[debug] ... {} more line(s) suppressed (raise --debug-lines to see them)",
                self.suppressed
            );
        }
    }
}

impl DiagnosticSink for StderrSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.line(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink() {
        let mut count = 0;
        {
            let mut sink = |_d: Diagnostic| count += 1;
            sink.emit(Diagnostic::DuplicateTable {
                table: "users".to_string(),
            });
            sink.emit(Diagnostic::DuplicateTable {
                table: "orders".to_string(),
            });
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_stderr_sink_budget() {
        let mut sink = StderrSink::new(1);
        sink.line("first");
        sink.line("second");
        sink.line("third");
        assert_eq!(sink.suppressed(), 2);
    }

    #[test]
    fn test_display_truncates_long_clause() {
        let d = Diagnostic::DiscardedClause {
            table: "t".to_string(),
            clause: format!("CHECK ({})", "x > 0 AND ".repeat(20)),
        };
        let text = d.to_string();
        assert!(text.ends_with("..."));
        assert!(text.starts_with("Discarded clause in 't': CHECK"));
    }

    #[test]
    fn test_unknown_type_message() {
        let d = Diagnostic::UnknownType {
            table: "places".to_string(),
            column: "geom".to_string(),
            raw_type: "GEOMETRY".to_string(),
        };
        assert_eq!(
            d.to_string(),
            "Unknown type 'GEOMETRY' for places.geom, using VARCHAR"
        );
    }
}
