//! INSERT SQL generation.

use crate::model::{Field, Table};
use crate::synth::dml::list;
use crate::synth::{Names, Param, SqlDialect, Statement};

/// Plain INSERT over every field, or every non-sequence field.
fn build_base(names: &Names<'_>, table: &Table, all: bool) -> Statement {
    let fields: Vec<&Field> = table
        .fields
        .iter()
        .filter(|f| all || !f.is_sequence)
        .collect();
    if fields.is_empty() {
        return Statement::malformed(format!(
            "table {} has no insertable columns",
            table.sql_name
        ));
    }

    let cols = list(fields.iter().map(|f| names.col(f)));
    let vals = list((0..fields.len()).map(|i| names.nth(i)));
    Statement::new(
        vec![
            format!("INSERT INTO {} (", names.table(&table.sql_name)),
            cols,
            ") VALUES (".to_string(),
            vals,
            ")".to_string(),
        ],
        Param::all(fields.iter().copied(), 0),
    )
}

/// INSERT of every field, sequence columns included.
pub fn build_insert_all(names: &Names<'_>, table: &Table) -> Statement {
    build_base(names, table, true)
}

/// INSERT skipping the sequence column, with the dialect's way of handing
/// the generated key back. Manual tables insert every field.
pub fn build_insert(names: &Names<'_>, dialect: &dyn SqlDialect, table: &Table) -> Statement {
    if table.manual {
        return build_base(names, table, true);
    }

    let mut stmt = build_base(names, table, false);
    if stmt.is_malformed() {
        return stmt;
    }
    let Some(seq) = table.sequence() else {
        return stmt;
    };

    let retrieval = dialect.generated_key(names, seq, stmt.params.len());
    if let (Some(suffix), Some(last)) = (&retrieval.suffix, stmt.fragments.last_mut()) {
        last.push_str(suffix);
    }
    if let Some(out) = retrieval.out {
        stmt.params.push(out);
    }
    stmt.generated_key = retrieval.key;
    stmt
}
