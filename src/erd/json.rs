//! JSON format output for extracted schemas.

use crate::schema::{Relationship, Schema, Table};
use serde::Serialize;

/// JSON representation of the ERD
#[derive(Debug, Serialize)]
pub struct ErdJson<'a> {
    pub tables: &'a [Table],
    pub relationships: &'a [Relationship],
    pub stats: ErdStats,
}

/// ERD statistics
#[derive(Debug, Serialize)]
pub struct ErdStats {
    pub table_count: usize,
    pub column_count: usize,
    pub relationship_count: usize,
}

/// Generate JSON output from a schema
pub fn to_json(schema: &Schema) -> String {
    let erd = build_erd_json(schema);
    serde_json::to_string_pretty(&erd).unwrap_or_else(|_| "{}".to_string())
}

/// Build the JSON structure
pub fn build_erd_json(schema: &Schema) -> ErdJson<'_> {
    ErdJson {
        tables: &schema.tables,
        relationships: &schema.relationships,
        stats: ErdStats {
            table_count: schema.len(),
            column_count: schema.column_count(),
            relationship_count: schema.relationships.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ErdType};

    #[test]
    fn test_json_shape() {
        let mut table = Table::new("users");
        let mut id = Column::new("id", ErdType::Int);
        id.is_primary_key = true;
        table.columns.push(id);
        let schema = Schema {
            tables: vec![table],
            relationships: Vec::new(),
        };

        let value: serde_json::Value = serde_json::from_str(&to_json(&schema)).unwrap();
        assert_eq!(value["tables"][0]["name"], "users");
        assert_eq!(value["tables"][0]["columns"][0]["type"], "INT");
        assert_eq!(value["tables"][0]["columns"][0]["is_primary_key"], true);
        assert_eq!(value["stats"]["column_count"], 1);
        assert_eq!(value["stats"]["relationship_count"], 0);
    }
}
