//! SQL statement synthesis.
//!
//! Each operation is a pure function of a resolved unit and the dialect.
//! Statements are kept as ordered text fragments with the parameter list
//! needed to bind them; placeholder syntax always comes from the dialect's
//! [`SqlDialect::nth`].

pub mod dialect;
pub mod dml;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use std::fmt;

use serde::Serialize;

use crate::error::{GenError, GenResult};
use crate::model::{Field, Index, Proc, Table};
pub use dialect::{Dialect, OracleType};
pub use traits::{KeyRetrieval, Names, SqlDialect, UpsertClause};

/// Statement operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Insert, skipping the generated column unless the table is manual.
    Insert,
    /// Insert every column.
    InsertAll,
    Update,
    Upsert,
    Delete,
    SelectByIndex,
    CallProc,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Insert => "insert",
            Operation::InsertAll => "insert-all-fields",
            Operation::Update => "update",
            Operation::Upsert => "upsert",
            Operation::Delete => "delete",
            Operation::SelectByIndex => "select-by-index",
            Operation::CallProc => "call-procedure",
        };
        f.write_str(s)
    }
}

/// What an operation is applied to.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Table(&'a Table),
    Index(&'a Index),
    Proc(&'a Proc),
}

impl Target<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Target::Table(t) if t.is_view() => "view",
            Target::Table(_) => "table",
            Target::Index(_) => "index",
            Target::Proc(_) => "proc",
        }
    }
}

/// Where a parameter binds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Positional(usize),
    Named(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    In,
    Out,
}

/// A bound parameter and the field it comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    /// Resolved field identifier.
    pub name: String,
    pub ty: String,
    /// SQL name of the source field.
    pub field: String,
    pub slot: Slot,
    pub direction: Direction,
}

impl Param {
    pub fn positional(field: &Field, index: usize) -> Self {
        Self {
            name: field.name.clone(),
            ty: field.ty.clone(),
            field: field.sql_name.clone(),
            slot: Slot::Positional(index),
            direction: Direction::In,
        }
    }

    pub fn named(field: &Field, name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: field.name.clone(),
            ty: field.ty.clone(),
            field: field.sql_name.clone(),
            slot: Slot::Named(name.into()),
            direction,
        }
    }

    /// Bind every field positionally, numbered from `start`.
    pub fn all<'f>(fields: impl IntoIterator<Item = &'f Field>, start: usize) -> Vec<Self> {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, f)| Self::positional(f, start + i))
            .collect()
    }
}

/// How a database-generated key reaches the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratedKey {
    #[default]
    None,
    /// Returned as a result row (`RETURNING`).
    Returning,
    /// Selected by an appended statement (`SCOPE_IDENTITY()`).
    Selected,
    /// Written into an output parameter (`RETURNING ... INTO`).
    OutParam,
    /// Read from the driver after execution.
    LastInsertId,
}

/// A synthesized statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub fragments: Vec<String>,
    pub params: Vec<Param>,
    pub generated_key: GeneratedKey,
    /// Set when the input shape could not produce valid SQL; the single
    /// fragment is then an error placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub malformed: Option<String>,
}

impl Statement {
    pub fn new(fragments: Vec<String>, params: Vec<Param>) -> Self {
        Self {
            fragments,
            params,
            generated_key: GeneratedKey::None,
            malformed: None,
        }
    }

    /// Placeholder statement for an unsupported input shape.
    pub fn malformed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            fragments: vec![format!("[[ ERROR: {message} ]]")],
            params: Vec::new(),
            generated_key: GeneratedKey::None,
            malformed: Some(message),
        }
    }

    /// The statement text.
    pub fn sql(&self) -> String {
        self.fragments.concat()
    }

    pub fn is_malformed(&self) -> bool {
        self.malformed.is_some()
    }

    /// Input parameters, in binding order.
    pub fn inputs(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| p.direction == Direction::In)
    }
}

/// Which identifiers get quoted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Escape {
    pub schema: bool,
    pub table: bool,
    pub column: bool,
}

impl Escape {
    pub fn all() -> Self {
        Self {
            schema: true,
            table: true,
            column: true,
        }
    }

    /// Parse escape targets; `none` overrides everything else.
    pub fn parse<S: AsRef<str>>(targets: &[S]) -> GenResult<Self> {
        let mut esc = Self::default();
        let mut none = false;
        for target in targets {
            match target.as_ref() {
                "none" => none = true,
                "all" => esc = Self::all(),
                "schema" => esc.schema = true,
                "table" => esc.table = true,
                "column" => esc.column = true,
                other => return Err(GenError::UnknownEscape(other.to_string())),
            }
        }
        Ok(if none { Self::default() } else { esc })
    }
}

/// Statement synthesizer for one run.
pub struct Synthesizer {
    dialect: Dialect,
    generator: Box<dyn SqlDialect>,
    schema: String,
    escape: Escape,
}

impl Synthesizer {
    pub fn new(dialect: Dialect, schema: impl Into<String>, escape: Escape) -> Self {
        Self {
            dialect,
            generator: dialect.generator(),
            schema: schema.into(),
            escape,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn names(&self) -> Names<'_> {
        Names::new(self.generator.as_ref(), &self.schema, self.escape)
    }

    /// Synthesize `op` for `target`.
    pub fn synthesize(&self, op: Operation, target: Target<'_>) -> GenResult<Statement> {
        let names = self.names();
        let generator = self.generator.as_ref();
        let stmt = match (op, target) {
            (
                Operation::Insert
                | Operation::InsertAll
                | Operation::Update
                | Operation::Upsert
                | Operation::Delete,
                Target::Table(t),
            ) if t.is_view() => return Err(self.unsupported(op, target)),
            (Operation::Insert, Target::Table(t)) => dml::insert::build_insert(&names, generator, t),
            (Operation::InsertAll, Target::Table(t)) => dml::insert::build_insert_all(&names, t),
            (Operation::Update, Target::Table(t)) => dml::update::build_update(&names, t),
            (Operation::Upsert, Target::Table(t)) => dml::upsert::build_upsert(&names, generator, t),
            (Operation::Delete, Target::Table(t)) => dml::delete::build_delete(&names, t),
            (Operation::SelectByIndex, Target::Index(i)) => dml::select::build_select_by_index(&names, i),
            (Operation::CallProc, Target::Proc(p)) => dml::call::build_call(&names, generator, p)?,
            (op, target) => return Err(self.unsupported(op, target)),
        };
        if let Some(msg) = &stmt.malformed {
            tracing::warn!("{} ({}): {}", op, self.dialect, msg);
        }
        Ok(stmt)
    }

    fn unsupported(&self, op: Operation, target: Target<'_>) -> GenError {
        GenError::unsupported(format!("{} on {}", op, target.kind()), self.dialect.name())
    }
}
