//! SQL vendor tag used by the normalizer.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// SQL dialect of the input schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// MySQL / MariaDB (backtick quoting, ENGINE/CHARSET table options)
    #[default]
    MySql,
    /// PostgreSQL (double-quote identifiers)
    Postgres,
    /// SQL Server (bracket identifiers)
    Mssql,
    /// SQLite, passed through unchanged
    Sqlite,
    /// Anything else, passed through unchanged
    Generic,
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(SqlDialect::MySql),
            "postgres" | "postgresql" | "pg" => Ok(SqlDialect::Postgres),
            "mssql" | "sqlserver" | "tsql" => Ok(SqlDialect::Mssql),
            "sqlite" | "sqlite3" => Ok(SqlDialect::Sqlite),
            "generic" => Ok(SqlDialect::Generic),
            _ => Err(format!(
                "Unknown dialect: {}. Valid options: mysql, postgres, mssql, sqlite, generic",
                s
            )),
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlDialect::MySql => write!(f, "mysql"),
            SqlDialect::Postgres => write!(f, "postgres"),
            SqlDialect::Mssql => write!(f, "mssql"),
            SqlDialect::Sqlite => write!(f, "sqlite"),
            SqlDialect::Generic => write!(f, "generic"),
        }
    }
}

impl SqlDialect {
    /// Identifier quote characters this dialect wraps names in
    pub fn quote_chars(&self) -> &'static [char] {
        match self {
            SqlDialect::MySql => &['`'],
            SqlDialect::Postgres => &['"'],
            SqlDialect::Mssql => &['[', ']'],
            SqlDialect::Sqlite | SqlDialect::Generic => &[],
        }
    }

    /// Whether the normalizer rewrites input for this dialect at all
    pub fn is_normalized(&self) -> bool {
        !self.quote_chars().is_empty()
    }

    /// Whether `\` escapes the next character inside a `'...'` literal
    ///
    /// Standard SQL strings (PostgreSQL, SQL Server, SQLite) only escape a
    /// quote by doubling it, so `'C:\'` is a complete literal there.
    pub fn backslash_escapes(&self) -> bool {
        matches!(self, SqlDialect::MySql)
    }
}
