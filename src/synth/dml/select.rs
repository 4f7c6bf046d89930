//! SELECT SQL generation.

use crate::model::Index;
use crate::synth::dml::list;
use crate::synth::{Names, Param, Statement};

/// SELECT of every table column, filtered on the index fields.
pub fn build_select_by_index(names: &Names<'_>, index: &Index) -> Statement {
    if index.fields.is_empty() {
        return Statement::malformed(format!("index {} has no fields", index.sql_name));
    }
    Statement::new(
        vec![
            "SELECT ".to_string(),
            format!("{} ", list(index.table.fields.iter().map(|f| names.col(f)))),
            format!("FROM {} ", names.table(&index.table.sql_name)),
            format!("WHERE {}", names.assignments(&index.fields, 0, " AND ")),
        ],
        Param::all(&index.fields, 0),
    )
}
