//! CREATE TABLE extraction.
//!
//! Finds every table definition in normalized SQL and pulls out:
//! - Column definitions with their mapped ERD types
//! - Primary key constraints (table-level and inline)
//! - Foreign key constraints (table-level and inline REFERENCES)
//!
//! Where a table body ends is decided by [`ParenIndex`], never by the first
//! `)` after the opening parenthesis.

use super::{Column, ErdType, ParenIndex, Relationship, Schema, Table};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::dialect::SqlDialect;
use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// CREATE TABLE header up to and including the body's opening parenthesis.
/// Group 1 is the last segment of a possibly schema-qualified name.
static CREATE_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\bCREATE\s+(?:(?:GLOBAL\s+|LOCAL\s+)?(?:TEMPORARY|TEMP)\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:[\[`"]?\w+[\]`"]?\s*\.\s*)*[\[`"]?(\w+)[\]`"]?\s*\("#,
    )
    .unwrap()
});

/// Table-level FOREIGN KEY with optional constraint name and referential actions
static FOREIGN_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:CONSTRAINT\s+[\[`"]?\w+[\]`"]?\s+)?FOREIGN\s+KEY\s*(?:[\[`"]?\w+[\]`"]?\s*)?\(([^)]+)\)\s*REFERENCES\s+(?:[\[`"]?\w+[\]`"]?\s*\.\s*)*[\[`"]?(\w+)[\]`"]?\s*\(([^)]+)\)(?:\s+ON\s+(?:DELETE|UPDATE)\s+(?:SET\s+NULL|SET\s+DEFAULT|NO\s+ACTION|CASCADE|RESTRICT))*(?:\s+(?:MATCH\s+\w+|NOT\s+DEFERRABLE|DEFERRABLE|INITIALLY\s+\w+))*"#,
    )
    .unwrap()
});

/// Table-level PRIMARY KEY, including MSSQL CLUSTERED/NONCLUSTERED
static PRIMARY_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:CONSTRAINT\s+[\[`"]?\w+[\]`"]?\s+)?PRIMARY\s+KEY\s*(?:CLUSTERED\s+|NONCLUSTERED\s+)?\(([^)]+)\)"#,
    )
    .unwrap()
});

/// PRIMARY KEY written on the column itself
static INLINE_PRIMARY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").unwrap());

/// `REFERENCES table(column)` written on the column itself
static INLINE_REFERENCES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\bREFERENCES\s+(?:[\[`"]?\w+[\]`"]?\s*\.\s*)*[\[`"]?(\w+)[\]`"]?\s*\(\s*[\[`"]?(\w+)[\]`"]?\s*\)"#,
    )
    .unwrap()
});

/// Leading words of index and named-constraint clauses, which carry no columns
pub static NOISE_CLAUSE_KEYWORDS: &[&str] = &[
    "KEY",
    "INDEX",
    "UNIQUE",
    "FULLTEXT",
    "SPATIAL",
    "CONSTRAINT",
    "CHECK",
    "EXCLUDE",
];

/// Words that can never be a column's type
pub static RESERVED_WORDS: &[&str] = &[
    "PRIMARY",
    "FOREIGN",
    "KEY",
    "INDEX",
    "UNIQUE",
    "CONSTRAINT",
    "CHECK",
    "REFERENCES",
    "FULLTEXT",
    "SPATIAL",
    "EXCLUDE",
    "LIKE",
    "PERIOD",
    "NOT",
    "NULL",
    "DEFAULT",
];

static NOISE_SET: Lazy<AHashSet<&'static str>> =
    Lazy::new(|| NOISE_CLAUSE_KEYWORDS.iter().copied().collect());

static RESERVED_SET: Lazy<AHashSet<&'static str>> =
    Lazy::new(|| RESERVED_WORDS.iter().copied().collect());

/// Builder for constructing a schema one table body at a time
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
    dialect: SqlDialect,
}

impl SchemaBuilder {
    pub fn new(dialect: SqlDialect) -> Self {
        Self {
            schema: Schema::new(),
            dialect,
        }
    }

    /// Parse the text between a table's parentheses and add the table.
    ///
    /// Returns `false` when a table of the same name was already added.
    pub fn add_table(&mut self, name: &str, body: &str, sink: &mut dyn DiagnosticSink) -> bool {
        if self.schema.get_table(name).is_some() {
            sink.emit(Diagnostic::DuplicateTable {
                table: name.to_string(),
            });
            return false;
        }

        let (table, relationships) = parse_table_body(name, body, self.dialect, sink);
        self.schema.tables.push(table);
        self.schema.relationships.extend(relationships);
        true
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

/// A located CREATE TABLE: name and the offsets of its body parentheses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpan {
    pub name: String,
    pub open: usize,
    /// `None` when the opening parenthesis is never closed
    pub close: Option<usize>,
}

/// Locate every CREATE TABLE header and pair its body parentheses
pub fn find_table_spans(text: &str, parens: &ParenIndex) -> Vec<TableSpan> {
    CREATE_TABLE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str().to_string();
            let open = whole.end() - 1;
            // Headers inside comments or literals have no structural paren
            if !parens.is_structural(open) {
                return None;
            }
            Some(TableSpan {
                name,
                open,
                close: parens.closing(open),
            })
        })
        .collect()
}

/// Extract every table and relationship from normalized SQL
///
/// `dialect` only decides how string literals are read; quoting and table
/// options are expected to be gone already.
pub fn extract_schema(text: &str, dialect: SqlDialect, sink: &mut dyn DiagnosticSink) -> Schema {
    let parens = ParenIndex::build(text, dialect);
    let mut builder = SchemaBuilder::new(dialect);

    for span in find_table_spans(text, &parens) {
        match span.close {
            Some(close) => {
                builder.add_table(&span.name, &text[span.open + 1..close], sink);
            }
            None => sink.emit(Diagnostic::UnmatchedParen {
                table: span.name,
                offset: span.open,
            }),
        }
    }

    builder.build()
}

/// Parse a table body into its columns and the relationships it declares
///
/// Clauses are visited in declaration order, so table-level and inline
/// foreign keys come out in the order they were written.
fn parse_table_body(
    table_name: &str,
    body: &str,
    dialect: SqlDialect,
    sink: &mut dyn DiagnosticSink,
) -> (Table, Vec<Relationship>) {
    let body = strip_comments(body, dialect);
    let mut table = Table::new(table_name);
    let mut relationships = Vec::new();
    let mut pk_columns: Vec<String> = Vec::new();

    for clause in split_table_body(&body, dialect) {
        if clause.is_empty() {
            continue;
        }

        if is_table_constraint(&clause) {
            if let Some(caps) = FOREIGN_KEY_RE.captures(&clause) {
                let from_cols = parse_column_list(&caps[1]);
                let to_table = caps[2].to_string();
                let to_cols = parse_column_list(&caps[3]);
                for (from_column, to_column) in from_cols.into_iter().zip(to_cols) {
                    relationships.push(Relationship {
                        from_table: table_name.to_string(),
                        from_column,
                        to_table: to_table.clone(),
                        to_column,
                    });
                }
                continue;
            }
            if let Some(caps) = PRIMARY_KEY_RE.captures(&clause) {
                pk_columns.extend(parse_column_list(&caps[1]));
                continue;
            }
        }

        if is_noise_clause(&clause) {
            continue;
        }

        let Some((name, raw_type)) = parse_column_def(&clause) else {
            sink.emit(Diagnostic::DiscardedClause {
                table: table_name.to_string(),
                clause,
            });
            continue;
        };

        if table.get_column(&name).is_some() {
            sink.emit(Diagnostic::DuplicateColumn {
                table: table_name.to_string(),
                column: name,
            });
            continue;
        }

        let col_type = match ErdType::lookup(&raw_type) {
            Some(t) => t,
            None => {
                sink.emit(Diagnostic::UnknownType {
                    table: table_name.to_string(),
                    column: name.clone(),
                    raw_type: raw_type.clone(),
                });
                ErdType::Varchar
            }
        };

        // DEFAULT 'primary key' or COMMENT 'references x(y)' must not count
        let code = blank_literals(&clause, dialect);
        if INLINE_PRIMARY_KEY_RE.is_match(&code) {
            pk_columns.push(name.clone());
        }
        if let Some(caps) = INLINE_REFERENCES_RE.captures(&code) {
            relationships.push(Relationship {
                from_table: table_name.to_string(),
                from_column: name.clone(),
                to_table: caps[1].to_string(),
                to_column: caps[2].to_string(),
            });
        }

        table.columns.push(Column::new(name, col_type));
    }

    for col in &mut table.columns {
        col.is_primary_key = pk_columns.iter().any(|c| c.eq_ignore_ascii_case(&col.name));
        col.is_foreign_key = relationships
            .iter()
            .any(|r| r.from_column.eq_ignore_ascii_case(&col.name));
    }

    (table, relationships)
}

/// Leading token of a clause, unquoted, cut at `(` and uppercased
fn leading_word(clause: &str) -> String {
    let first = clause.split_whitespace().next().unwrap_or("");
    strip_quotes(first.split('(').next().unwrap_or(first)).to_uppercase()
}

/// Clause that may hold a table-level PRIMARY KEY or FOREIGN KEY
fn is_table_constraint(clause: &str) -> bool {
    matches!(
        leading_word(clause).as_str(),
        "CONSTRAINT" | "PRIMARY" | "FOREIGN"
    )
}

/// Index/key/named-constraint clause, unless it is really a column whose
/// name happens to be one of those keywords (e.g. `key VARCHAR(32)`)
///
/// Only the whole leading token counts, so `unique_id` or `key_hash` are
/// ordinary column names.
fn is_noise_clause(clause: &str) -> bool {
    if !NOISE_SET.contains(leading_word(clause).as_str()) {
        return false;
    }
    let first = clause.split_whitespace().next().unwrap_or("");
    // `UNIQUE(d)` carries its column list in the first token
    if first.contains('(') {
        return true;
    }
    let second = clause.split_whitespace().nth(1).unwrap_or("");
    let second_base = second.split('(').next().unwrap_or(second);
    ErdType::lookup(second_base).is_none()
}

/// Replace the contents of every `'...'` literal with spaces
fn blank_literals(clause: &str, dialect: SqlDialect) -> String {
    let backslash = dialect.backslash_escapes();
    let mut out = String::with_capacity(clause.len());
    let mut chars = clause.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if !in_string {
            if c == '\'' {
                in_string = true;
            }
            out.push(c);
            continue;
        }
        match c {
            '\\' if backslash => {
                chars.next();
                out.push_str("  ");
            }
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push_str("  ");
            }
            '\'' => {
                in_string = false;
                out.push(c);
            }
            _ => out.push(' '),
        }
    }

    out
}

/// Parse a column definition into (name, raw base type)
pub fn parse_column_def(def: &str) -> Option<(String, String)> {
    let mut tokens = def.split_whitespace();
    let name = strip_quotes(tokens.next()?);
    let type_token = tokens.next()?;

    if name.is_empty()
        || !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        || matches!(
            name.to_uppercase().as_str(),
            "PRIMARY" | "FOREIGN" | "LIKE" | "PERIOD"
        )
    {
        return None;
    }

    let mut raw_type: String = type_token
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if raw_type.is_empty() || RESERVED_SET.contains(raw_type.to_uppercase().as_str()) {
        return None;
    }

    // CHARACTER VARYING / CHAR VARYING
    if matches!(raw_type.to_lowercase().as_str(), "character" | "char")
        && tokens
            .next()
            .is_some_and(|t| t.to_lowercase().starts_with("varying"))
    {
        raw_type = "VARCHAR".to_string();
    }

    Some((name, raw_type))
}

/// Split table body by commas, respecting nested parentheses
pub fn split_table_body(body: &str, dialect: SqlDialect) -> Vec<String> {
    let backslash = dialect.backslash_escapes();
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for ch in body.chars() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string && backslash {
            current.push(ch);
            escape_next = true;
            continue;
        }

        if ch == '\'' {
            in_string = !in_string;
            current.push(ch);
            continue;
        }

        if in_string {
            current.push(ch);
            continue;
        }

        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current = String::new();
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

/// Remove `--` and `/* */` comments that sit outside string literals
pub fn strip_comments(sql: &str, dialect: SqlDialect) -> String {
    let backslash = dialect.backslash_escapes();
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\\' && backslash {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else if c == '\'' {
                in_string = false;
            }
            continue;
        }

        match c {
            '\'' => {
                in_string = true;
                out.push(c);
            }
            '-' if chars.peek() == Some(&'-') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

/// Parse a comma-separated column list, stripping quotes and MySQL prefix lengths
pub fn parse_column_list(s: &str) -> Vec<String> {
    s.split(',')
        .filter_map(|c| c.split_whitespace().next())
        .map(|c| strip_quotes(c.split('(').next().unwrap_or(c)))
        .filter(|c| !c.is_empty())
        .collect()
}

fn strip_quotes(s: &str) -> String {
    s.trim_matches(|c| matches!(c, '`' | '"' | '[' | ']'))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;

    fn extract(sql: &str) -> Schema {
        extract_schema(sql, SqlDialect::MySql, &mut NullSink)
    }

    fn column_names(table: &Table) -> Vec<&str> {
        table.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_nested_parens_do_not_truncate_body() {
        let schema = extract(
            "CREATE TABLE items (id INT, price DECIMAL(10,2), order_id INT, \
             FOREIGN KEY (order_id) REFERENCES orders(id), note TEXT);",
        );
        let items = schema.get_table("items").unwrap();
        assert_eq!(column_names(items), ["id", "price", "order_id", "note"]);
        assert_eq!(items.columns[1].col_type, ErdType::Decimal);
    }

    #[test]
    fn test_index_clauses_dropped() {
        let schema = extract(
            "CREATE TABLE t (id INT, d DATE, KEY idx_d (d), INDEX date_idx (d), \
             UNIQUE KEY uk (id), UNIQUE (d), CONSTRAINT chk CHECK (id > 0));",
        );
        assert_eq!(schema.tables[0].columns.len(), 2);
    }

    #[test]
    fn test_column_named_key_is_kept() {
        let schema = extract("CREATE TABLE settings (key VARCHAR(64), value TEXT);");
        assert_eq!(column_names(&schema.tables[0]), ["key", "value"]);
    }

    #[test]
    fn test_keyword_prefixed_names_with_unknown_types_kept() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let schema = extract_schema(
            "CREATE TABLE t (id INT, unique_id UUID, key_hash BYTEA, index_geom GEOMETRY, \
             check_geom GEOMETRY, UNIQUE(unique_id));",
            SqlDialect::MySql,
            &mut diagnostics,
        );
        let t = &schema.tables[0];
        assert_eq!(
            column_names(t),
            ["id", "unique_id", "key_hash", "index_geom", "check_geom"]
        );
        assert!(t.columns[1..].iter().all(|c| c.col_type == ErdType::Varchar));
        assert_eq!(
            diagnostics
                .iter()
                .filter(|d| matches!(d, Diagnostic::UnknownType { .. }))
                .count(),
            4
        );
    }

    #[test]
    fn test_relationships_follow_clause_order() {
        let schema = extract(
            "CREATE TABLE t (a INT REFERENCES first(id), b INT, \
             FOREIGN KEY (b) REFERENCES second(id), c INT REFERENCES third(id));",
        );
        let targets: Vec<_> = schema
            .relationships
            .iter()
            .map(|r| r.to_table.as_str())
            .collect();
        assert_eq!(targets, ["first", "second", "third"]);
    }

    #[test]
    fn test_inline_keywords_inside_literals_ignored() {
        let schema = extract(
            "CREATE TABLE t (id INT, note VARCHAR(20) DEFAULT 'primary key', \
             memo TEXT COMMENT 'references users(id)');",
        );
        let t = &schema.tables[0];
        assert!(!t.columns[1].is_primary_key);
        assert!(!t.columns[2].is_foreign_key);
        assert!(schema.relationships.is_empty());
    }

    #[test]
    fn test_postgres_backslash_literal_does_not_swallow_tables() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let schema = extract_schema(
            "CREATE TABLE files (id INT, path TEXT DEFAULT 'C:\\', size INT);\n\
             CREATE TABLE users (id INT);",
            SqlDialect::Postgres,
            &mut diagnostics,
        );
        assert_eq!(column_names(&schema.tables[0]), ["id", "path", "size"]);
        assert_eq!(schema.tables[1].name, "users");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_parse_column_def() {
        assert_eq!(
            parse_column_def("name VARCHAR(50) NOT NULL"),
            Some(("name".to_string(), "VARCHAR".to_string()))
        );
        assert_eq!(
            parse_column_def("title character varying(80)"),
            Some(("title".to_string(), "VARCHAR".to_string()))
        );
        assert_eq!(parse_column_def("PRIMARY KEY"), None);
        assert_eq!(parse_column_def("lonely"), None);
        assert_eq!(parse_column_def("x (1)"), None);
    }

    #[test]
    fn test_split_respects_literals() {
        let parts = split_table_body(
            "a INT DEFAULT 1, b VARCHAR(5) DEFAULT 'x,y', c ENUM('p','q')",
            SqlDialect::MySql,
        );
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1], "b VARCHAR(5) DEFAULT 'x,y'");
    }

    #[test]
    fn test_blank_literals() {
        assert_eq!(
            blank_literals("a TEXT DEFAULT 'it''s' x", SqlDialect::Postgres),
            "a TEXT DEFAULT '     ' x"
        );
        assert_eq!(
            blank_literals(r"a TEXT DEFAULT 'C:\' x", SqlDialect::Postgres),
            "a TEXT DEFAULT '   ' x"
        );
    }

    #[test]
    fn test_strip_comments() {
        let out = strip_comments(
            "a INT, -- the a\nb TEXT /* b, c */, c CHAR(1) DEFAULT '--'",
            SqlDialect::MySql,
        );
        assert!(!out.contains("the a"));
        assert!(!out.contains("b, c"));
        assert!(out.contains("'--'"));
    }

    #[test]
    fn test_parse_column_list() {
        assert_eq!(
            parse_column_list("`a`, \"b\", [c], name(10) ASC"),
            vec!["a", "b", "c", "name"]
        );
    }

    #[test]
    fn test_table_spans_skip_commented_header() {
        let text = "-- CREATE TABLE ghost (\nCREATE TABLE real (id INT);";
        let parens = ParenIndex::build(text, SqlDialect::MySql);
        let spans = find_table_spans(text, &parens);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "real");
    }
}
