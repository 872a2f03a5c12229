//! Stack-based parenthesis pairing over SQL text.
//!
//! One pass over the input records, for every `(`, the byte offset of the
//! `)` that closes it. Parentheses inside single-quoted literals and SQL
//! comments are not structural and are skipped.

use crate::dialect::SqlDialect;
use ahash::AHashMap;

/// Pairing of every structural `(` in a text with its closing `)`
#[derive(Debug, Default)]
pub struct ParenIndex {
    /// open offset -> close offset (`None` when never closed)
    pairs: AHashMap<usize, Option<usize>>,
}

impl ParenIndex {
    /// Scan `text` once and pair its parentheses, reading literals the way
    /// `dialect` does
    pub fn build(text: &str, dialect: SqlDialect) -> Self {
        let bytes = text.as_bytes();
        let backslash = dialect.backslash_escapes();
        let mut pairs = AHashMap::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\'' => {
                    i = skip_string(bytes, i, backslash);
                    continue;
                }
                b'-' if bytes.get(i + 1) == Some(&b'-') => {
                    i = line_end(bytes, i);
                    continue;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    i = skip_block_comment(bytes, i);
                    continue;
                }
                b'(' => {
                    stack.push(i);
                    pairs.insert(i, None);
                }
                b')' => {
                    // A `)` with nothing open is not structural
                    if let Some(open) = stack.pop() {
                        pairs.insert(open, Some(i));
                    }
                }
                _ => {}
            }
            i += 1;
        }

        Self { pairs }
    }

    /// Offset of the `)` matching the `(` at `open`
    ///
    /// Returns `None` if `open` is not a structural `(` or is never closed.
    pub fn closing(&self, open: usize) -> Option<usize> {
        self.pairs.get(&open).copied().flatten()
    }

    /// Whether `offset` holds a `(` outside literals and comments
    pub fn is_structural(&self, offset: usize) -> bool {
        self.pairs.contains_key(&offset)
    }
}

/// Index just past the literal starting at `start` (a `'`)
fn skip_string(bytes: &[u8], start: usize, backslash: bool) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if backslash => i += 2,
            b'\'' if bytes.get(i + 1) == Some(&b'\'') => i += 2,
            b'\'' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index of the newline ending the line comment at `start`
fn line_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|p| start + p)
        .unwrap_or(bytes.len())
}

/// Index just past the `*/` closing the comment at `start`
fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}
