//! Mapping from SQL column types to the fixed ERD type vocabulary.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;

/// Column type as shown in the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErdType {
    Varchar,
    Char,
    Int,
    Decimal,
    Float,
    Datetime,
    Date,
    Time,
    Boolean,
}

/// SQL base type (lowercase, no size specifier) to ERD type
pub static TYPE_MAP: &[(&str, ErdType)] = &[
    // Text
    ("varchar", ErdType::Varchar),
    ("nvarchar", ErdType::Varchar),
    ("text", ErdType::Varchar),
    ("ntext", ErdType::Varchar),
    ("tinytext", ErdType::Varchar),
    ("mediumtext", ErdType::Varchar),
    ("longtext", ErdType::Varchar),
    ("clob", ErdType::Varchar),
    ("json", ErdType::Varchar),
    ("enum", ErdType::Varchar),
    ("set", ErdType::Varchar),
    ("char", ErdType::Char),
    ("nchar", ErdType::Char),
    ("character", ErdType::Char),
    // Binary, shown as text
    ("blob", ErdType::Varchar),
    ("tinyblob", ErdType::Varchar),
    ("mediumblob", ErdType::Varchar),
    ("longblob", ErdType::Varchar),
    // Integers
    ("int", ErdType::Int),
    ("integer", ErdType::Int),
    ("tinyint", ErdType::Int),
    ("smallint", ErdType::Int),
    ("mediumint", ErdType::Int),
    ("bigint", ErdType::Int),
    ("serial", ErdType::Int),
    ("smallserial", ErdType::Int),
    ("bigserial", ErdType::Int),
    ("year", ErdType::Int),
    // Fixed and floating point
    ("decimal", ErdType::Decimal),
    ("numeric", ErdType::Decimal),
    ("money", ErdType::Decimal),
    ("float", ErdType::Float),
    ("double", ErdType::Float),
    ("real", ErdType::Float),
    // Date/time
    ("datetime", ErdType::Datetime),
    ("datetime2", ErdType::Datetime),
    ("smalldatetime", ErdType::Datetime),
    ("timestamp", ErdType::Datetime),
    ("timestamptz", ErdType::Datetime),
    ("date", ErdType::Date),
    ("time", ErdType::Time),
    ("timetz", ErdType::Time),
    // Boolean
    ("bit", ErdType::Boolean),
    ("bool", ErdType::Boolean),
    ("boolean", ErdType::Boolean),
];

static TYPE_LOOKUP: Lazy<AHashMap<&'static str, ErdType>> =
    Lazy::new(|| TYPE_MAP.iter().copied().collect());

impl ErdType {
    /// Every output type, in vocabulary order
    pub const ALL: [ErdType; 9] = [
        ErdType::Varchar,
        ErdType::Char,
        ErdType::Int,
        ErdType::Decimal,
        ErdType::Float,
        ErdType::Datetime,
        ErdType::Date,
        ErdType::Time,
        ErdType::Boolean,
    ];

    /// Map a raw SQL type to an ERD type, falling back to VARCHAR
    pub fn from_sql_type(type_str: &str) -> Self {
        Self::lookup(type_str).unwrap_or(ErdType::Varchar)
    }

    /// Map a raw SQL type, returning `None` when it is not in the table
    pub fn lookup(type_str: &str) -> Option<Self> {
        let type_lower = type_str.trim().to_lowercase();
        let base_type = type_lower.split('(').next().unwrap_or(&type_lower).trim();
        TYPE_LOOKUP.get(base_type).copied()
    }

    /// Name written into the diagram
    pub fn as_str(&self) -> &'static str {
        match self {
            ErdType::Varchar => "VARCHAR",
            ErdType::Char => "CHAR",
            ErdType::Int => "INT",
            ErdType::Decimal => "DECIMAL",
            ErdType::Float => "FLOAT",
            ErdType::Datetime => "DATETIME",
            ErdType::Date => "DATE",
            ErdType::Time => "TIME",
            ErdType::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for ErdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
