//! DELETE SQL generation.

use crate::model::Table;
use crate::synth::{Names, Param, Statement};

/// DELETE keyed on the primary key.
pub fn build_delete(names: &Names<'_>, table: &Table) -> Statement {
    if table.primary_keys.is_empty() {
        return Statement::malformed(format!("table {} has no primary key", table.sql_name));
    }
    Statement::new(
        vec![
            format!("DELETE FROM {} ", names.table(&table.sql_name)),
            format!("WHERE {}", names.assignments(&table.primary_keys, 0, " AND ")),
        ],
        Param::all(&table.primary_keys, 0),
    )
}
