//! Vendor syntax cleanup run before extraction.
//!
//! Removes identifier quoting, drops table options that trail a table body
//! (`ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 ...`) and makes sure every table
//! definition ends with `;`. Dialects without rules pass through untouched.

use crate::dialect::SqlDialect;
use crate::schema::{find_table_spans, ParenIndex};
use once_cell::sync::Lazy;
use regex::Regex;

/// Table options following the closing parenthesis of a CREATE TABLE body
static TABLE_OPTIONS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:\s*,?\s*(?:ENGINE|TYPE|(?:DEFAULT\s+)?(?:CHARSET|CHARACTER\s+SET)|(?:DEFAULT\s+)?COLLATE|AUTO_INCREMENT|ROW_FORMAT|KEY_BLOCK_SIZE|STATS_PERSISTENT|COMMENT|TABLESPACE)\s*=?\s*(?:'(?:[^'\\]|\\.|'')*'|\w+))*",
    )
    .unwrap()
});

/// Clean `sql` for extraction under the given dialect
pub fn normalize(sql: &str, dialect: SqlDialect) -> String {
    if !dialect.is_normalized() {
        return sql.to_string();
    }

    let unquoted = strip_identifier_quotes(sql, dialect);
    terminate_tables(&unquoted, dialect)
}

/// Remove the dialect's identifier quote characters outside string literals
pub fn strip_identifier_quotes(sql: &str, dialect: SqlDialect) -> String {
    let quotes = dialect.quote_chars();
    if quotes.is_empty() {
        return sql.to_string();
    }

    let backslash = dialect.backslash_escapes();
    let mut out = String::with_capacity(sql.len());
    let mut in_string = false;
    let mut escape_next = false;

    for ch in sql.chars() {
        if escape_next {
            out.push(ch);
            escape_next = false;
            continue;
        }
        if in_string {
            if ch == '\\' && backslash {
                escape_next = true;
            } else if ch == '\'' {
                in_string = false;
            }
            out.push(ch);
            continue;
        }
        if ch == '\'' {
            in_string = true;
            out.push(ch);
        } else if !quotes.contains(&ch) {
            out.push(ch);
        }
    }

    out
}

/// Drop trailing table options and end each table definition with `;`
pub fn terminate_tables(sql: &str, dialect: SqlDialect) -> String {
    let parens = ParenIndex::build(sql, dialect);
    let mut out = String::with_capacity(sql.len() + 16);
    let mut cursor = 0;

    for span in find_table_spans(sql, &parens) {
        let Some(close) = span.close else {
            continue;
        };
        // A header nested inside an earlier table body was already copied
        if close < cursor {
            continue;
        }

        out.push_str(&sql[cursor..=close]);
        let rest = &sql[close + 1..];
        let options_len = TABLE_OPTIONS_RE.find(rest).map_or(0, |m| m.end());
        cursor = close + 1 + options_len;

        if !sql[cursor..].trim_start().starts_with(';') {
            out.push(';');
        }
    }

    out.push_str(&sql[cursor..]);
    out
}
