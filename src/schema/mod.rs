//! Schema model extracted from CREATE TABLE statements.
//!
//! This module provides:
//! - Data models for tables, columns, and foreign-key relationships
//! - Parenthesis pairing used to find where each table body ends
//! - DDL extraction of columns, primary keys, and foreign keys
//! - The fixed SQL type to ERD type mapping

mod ddl;
mod parens;
mod types;

pub use ddl::*;
pub use parens::ParenIndex;
pub use types::{ErdType, TYPE_MAP};

use serde::Serialize;

/// Column within a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub col_type: ErdType,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, col_type: ErdType) -> Self {
        Self {
            name: name.into(),
            col_type,
            is_primary_key: false,
            is_foreign_key: false,
        }
    }

    /// Role suffix shown in the diagram; a foreign key hides the PK marker
    pub fn key_marker(&self) -> Option<&'static str> {
        if self.is_foreign_key {
            Some("FK")
        } else if self.is_primary_key {
            Some("PK")
        } else {
            None
        }
    }
}

/// Table and its columns in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Look up a column by name (case-insensitive)
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// One foreign-key column pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

/// Everything extracted from one input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a table by name (case-insensitive)
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Tables that produce a diagram block
    pub fn drawable_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(|t| !t.columns.is_empty())
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
