//! Mermaid erDiagram output.

use crate::schema::Schema;

/// Relationship notation for a foreign key: one parent to zero-or-many
pub const FK_CARDINALITY: &str = "||--o{";

/// Generate Mermaid erDiagram text from a schema
pub fn to_mermaid(schema: &Schema) -> String {
    let mut output = String::new();

    output.push_str("erDiagram\n");

    for table in schema.drawable_tables() {
        output.push_str(&format!("    {} {{\n", table.name));

        for col in &table.columns {
            match col.key_marker() {
                Some(marker) => output.push_str(&format!(
                    "        {} {} {}\n",
                    col.name, col.col_type, marker
                )),
                None => output.push_str(&format!("        {} {}\n", col.name, col.col_type)),
            }
        }

        output.push_str("    }\n");
    }

    for rel in &schema.relationships {
        output.push_str(&format!(
            "    {} {} {} : \"FK to {}\"\n",
            rel.from_table, FK_CARDINALITY, rel.to_table, rel.to_column
        ));
    }

    output
}

/// Wrap diagram text in a fenced block Markdown renderers pick up
pub fn fence(diagram: &str) -> String {
    let mut output = String::with_capacity(diagram.len() + 16);
    output.push_str("```mermaid\n");
    output.push_str(diagram);
    if !diagram.ends_with('\n') {
        output.push('\n');
    }
    output.push_str("```\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ErdType, Relationship, Table};

    fn create_test_schema() -> Schema {
        let mut users = Table::new("users");
        let mut id = Column::new("id", ErdType::Int);
        id.is_primary_key = true;
        users.columns.push(id);
        users.columns.push(Column::new("email", ErdType::Varchar));

        let mut orders = Table::new("orders");
        let mut order_id = Column::new("id", ErdType::Int);
        order_id.is_primary_key = true;
        orders.columns.push(order_id);
        let mut user_id = Column::new("user_id", ErdType::Int);
        user_id.is_foreign_key = true;
        orders.columns.push(user_id);

        Schema {
            tables: vec![users, orders, Table::new("audit")],
            relationships: vec![Relationship {
                from_table: "orders".to_string(),
                from_column: "user_id".to_string(),
                to_table: "users".to_string(),
                to_column: "id".to_string(),
            }],
        }
    }

    #[test]
    fn test_mermaid_er_diagram() {
        let output = to_mermaid(&create_test_schema());

        assert!(output.starts_with("erDiagram\n"));
        assert!(output.contains("    users {\n"));
        assert!(output.contains("    orders {\n"));
        assert!(!output.contains("audit"));
    }

    #[test]
    fn test_mermaid_columns() {
        let output = to_mermaid(&create_test_schema());

        assert!(output.contains("        id INT PK\n"));
        assert!(output.contains("        email VARCHAR\n"));
        assert!(output.contains("        user_id INT FK\n"));
    }

    #[test]
    fn test_mermaid_relationships() {
        let output = to_mermaid(&create_test_schema());

        assert!(output.contains("    orders ||--o{ users : \"FK to id\"\n"));
    }

    #[test]
    fn test_table_order_preserved() {
        let output = to_mermaid(&create_test_schema());
        let users = output.find("users {").unwrap();
        let orders = output.find("orders {").unwrap();
        assert!(users < orders);
    }

    #[test]
    fn test_fence() {
        assert_eq!(fence("erDiagram\n"), "```mermaid\nerDiagram\n```\n");
        assert_eq!(fence("erDiagram"), "```mermaid\nerDiagram\n```\n");
    }
}
