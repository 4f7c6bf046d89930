use crate::error::{GenError, GenResult};
use crate::model::{Field, Proc, Table};
use crate::synth::{Escape, GeneratedKey, Param, Statement};

/// Per-dialect statement capabilities.
pub trait SqlDialect {
    /// Dialect name used in messages.
    fn name(&self) -> &'static str;

    /// Placeholder for the zero-based parameter `index`.
    fn nth(&self, index: usize) -> String;

    /// Quote an identifier.
    fn quote_identifier(&self, id: &str) -> String {
        format!("\"{}\"", id.replace('"', "\"\""))
    }

    /// Whether table names may carry a `schema.` prefix.
    fn schema_prefix(&self) -> bool {
        true
    }

    /// How the value of the sequence column `seq` comes back from an
    /// insert that bound `next` input parameters.
    fn generated_key(&self, names: &Names<'_>, seq: &Field, next: usize) -> KeyRetrieval;

    /// Conflict handling for an upsert of `table`.
    fn upsert_clause(&self, names: &Names<'_>, table: &Table) -> UpsertClause;

    /// Stored procedure call.
    fn call_proc(&self, _names: &Names<'_>, _proc: &Proc) -> GenResult<Statement> {
        Err(GenError::unsupported("stored procedures", self.name()))
    }

    /// Stored function call.
    fn call_func(&self, _names: &Names<'_>, _proc: &Proc) -> GenResult<Statement> {
        Err(GenError::unsupported("stored functions", self.name()))
    }
}

/// Generated-key retrieval for an insert.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyRetrieval {
    pub key: GeneratedKey,
    /// Text appended to the last insert fragment.
    pub suffix: Option<String>,
    /// Output parameter receiving the key.
    pub out: Option<Param>,
}

impl KeyRetrieval {
    /// Key read back by the driver, no SQL involved.
    pub fn driver() -> Self {
        Self {
            key: GeneratedKey::LastInsertId,
            suffix: None,
            out: None,
        }
    }

    pub fn suffix(key: GeneratedKey, suffix: impl Into<String>) -> Self {
        Self {
            key,
            suffix: Some(suffix.into()),
            out: None,
        }
    }
}

/// Result of a dialect's upsert builder.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertClause {
    /// Fragments appended after a full-field insert.
    Append(Vec<String>),
    /// A complete statement replacing the insert.
    Replace(Vec<String>),
    /// The table shape cannot be upserted.
    Malformed(String),
}

/// Identifier and placeholder rendering for one dialect and escape policy.
pub struct Names<'a> {
    dialect: &'a dyn SqlDialect,
    schema: &'a str,
    escape: Escape,
}

impl<'a> Names<'a> {
    pub fn new(dialect: &'a dyn SqlDialect, schema: &'a str, escape: Escape) -> Self {
        Self {
            dialect,
            schema,
            escape,
        }
    }

    pub fn nth(&self, index: usize) -> String {
        self.dialect.nth(index)
    }

    /// Column name, escaped if columns are escaped.
    pub fn col(&self, field: &Field) -> String {
        if self.escape.column {
            self.dialect.quote_identifier(&field.sql_name)
        } else {
            field.sql_name.clone()
        }
    }

    /// Table (or routine) name joined with the schema.
    pub fn table(&self, name: &str) -> String {
        let name = if self.escape.table {
            self.dialect.quote_identifier(name)
        } else {
            name.to_string()
        };
        if self.schema.is_empty() || !self.dialect.schema_prefix() {
            return name;
        }
        let schema = if self.escape.schema {
            self.dialect.quote_identifier(self.schema)
        } else {
            self.schema.to_string()
        };
        format!("{schema}.{name}")
    }

    /// `col = <nth>` predicates joined by `sep`, numbered from `start`.
    pub fn assignments<'f>(
        &self,
        fields: impl IntoIterator<Item = &'f Field>,
        start: usize,
        sep: &str,
    ) -> String {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, f)| format!("{} = {}", self.col(f), self.nth(start + i)))
            .collect::<Vec<_>>()
            .join(sep)
    }
}
