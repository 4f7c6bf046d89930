//! UPDATE SQL generation.

use crate::model::{Field, Table};
use crate::synth::{Names, Param, Statement};

/// UPDATE of every non-key field, keyed on the primary key.
///
/// WHERE placeholders continue after the SET placeholders.
pub fn build_update(names: &Names<'_>, table: &Table) -> Statement {
    if table.primary_keys.is_empty() {
        return Statement::malformed(format!("table {} has no primary key", table.sql_name));
    }
    let set: Vec<&Field> = table.non_primary().collect();
    if set.is_empty() {
        return Statement::malformed(format!(
            "table {} has no non-primary-key columns to update",
            table.sql_name
        ));
    }

    let mut params = Param::all(set.iter().copied(), 0);
    params.extend(Param::all(&table.primary_keys, set.len()));
    Statement::new(
        vec![
            format!("UPDATE {} SET ", names.table(&table.sql_name)),
            names.assignments(set.iter().copied(), 0, ", "),
            " WHERE ".to_string(),
            names.assignments(&table.primary_keys, set.len(), " AND "),
        ],
        params,
    )
}
