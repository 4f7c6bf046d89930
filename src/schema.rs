//! Schema model consumed by the generator.
//!
//! A [`Set`] is produced externally (by an introspector or by hand) and is
//! only ever read. Column order inside a table is significant: it is the
//! order parameters are bound in.

use crate::error::{GenError, GenResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything a single generation run reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Set {
    #[serde(default)]
    pub schemas: Vec<Schema>,
    #[serde(default)]
    pub queries: Vec<Query>,
}

impl Set {
    /// Load a schema document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> GenResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let set: Set = serde_json::from_str(&content)
            .map_err(|e| GenError::Schema(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(
            "Loaded {} schemas and {} queries from {}",
            set.schemas.len(),
            set.queries.len(),
            path.display()
        );
        Ok(set)
    }
}

/// A database schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enums: Vec<Enum>,
    #[serde(default)]
    pub procs: Vec<Proc>,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub views: Vec<Table>,
}

impl Schema {
    /// Find a table or view by SQL name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .chain(self.views.iter())
            .find(|t| t.name == name)
    }

    /// Find an enum by SQL name.
    pub fn enum_named(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.name == name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    #[default]
    Table,
    View,
}

/// A table or view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, rename = "type")]
    pub kind: TableKind,
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    /// Primary key is supplied by the caller rather than generated.
    #[serde(default)]
    pub manual: bool,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Resolve column names against this table, keeping the given order.
    pub fn columns_named(&self, names: &[String]) -> GenResult<Vec<&Column>> {
        names
            .iter()
            .map(|n| {
                self.column(n)
                    .ok_or_else(|| GenError::unknown_column(&self.name, n))
            })
            .collect()
    }
}

/// A table column, procedure parameter or query result field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Native SQL type text, e.g. `varchar(255)` or `integer[]`.
    #[serde(rename = "type")]
    pub datatype: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_sequence: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datatype: datatype.into(),
            ..Self::default()
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn sequence(mut self) -> Self {
        self.is_sequence = true;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    /// Accessor name for the generated lookup, e.g. `user_by_email`.
    pub func: String,
    pub fields: Vec<String>,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub is_primary: bool,
}

/// Foreign key; `fields` and `ref_fields` pair up positionally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForeignKey {
    pub name: String,
    pub func: String,
    pub fields: Vec<String>,
    pub ref_table: String,
    pub ref_fields: Vec<String>,
    pub ref_func: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub const_value: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcKind {
    #[default]
    Procedure,
    Function,
}

/// Stored procedure or function.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Proc {
    #[serde(default, rename = "type")]
    pub kind: ProcKind,
    pub name: String,
    #[serde(default)]
    pub params: Vec<Column>,
    #[serde(default)]
    pub returns: Vec<Column>,
    #[serde(default)]
    pub void: bool,
}

/// Custom query parameter. `type` is already a target-language type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub interpolate: bool,
    #[serde(default)]
    pub join: bool,
}

/// Custom query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub name: String,
    /// Name of the result type.
    #[serde(rename = "type")]
    pub type_name: String,
    pub query: Vec<String>,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub params: Vec<QueryParam>,
    #[serde(default)]
    pub fields: Vec<Column>,
    /// Field types are target-language types supplied by the user.
    #[serde(default)]
    pub manual_fields: bool,
    #[serde(default)]
    pub exec: bool,
    #[serde(default)]
    pub flat: bool,
    #[serde(default)]
    pub one: bool,
    #[serde(default)]
    pub interpolate: bool,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub type_comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_table() {
        let json = r#"{
            "schemas": [{
                "name": "public",
                "tables": [{
                    "name": "users",
                    "columns": [
                        {"name": "id", "type": "serial", "is_primary": true, "is_sequence": true},
                        {"name": "email", "type": "varchar(255)", "nullable": true}
                    ],
                    "indexes": [{"name": "users_email_idx", "func": "user_by_email", "fields": ["email"], "is_unique": true}]
                }]
            }]
        }"#;
        let set: Set = serde_json::from_str(json).unwrap();
        let table = set.schemas[0].table("users").unwrap();
        assert_eq!(table.kind, TableKind::Table);
        assert_eq!(table.columns.len(), 2);
        assert!(table.columns[1].nullable);
        assert!(table.indexes[0].is_unique);
    }

    #[test]
    fn test_columns_named_unknown() {
        let table = Table {
            name: "users".into(),
            columns: vec![Column::new("id", "int")],
            ..Table::default()
        };
        let err = table.columns_named(&["nope".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown column 'nope' on table 'users'");
    }
}
