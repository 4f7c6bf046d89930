//! Upsert SQL generation.
//! Postgres/SQLite ON CONFLICT, MySQL ON DUPLICATE KEY, and Oracle/SQL Server MERGE.

use crate::model::Table;
use crate::synth::dml::{insert, list};
use crate::synth::{Names, SqlDialect, Statement, UpsertClause};

/// Full-field insert followed by the dialect's conflict handling.
pub fn build_upsert(names: &Names<'_>, dialect: &dyn SqlDialect, table: &Table) -> Statement {
    if table.primary_keys.is_empty() {
        return Statement::malformed(format!("table {} has no primary key", table.sql_name));
    }
    let mut stmt = insert::build_insert_all(names, table);
    if stmt.is_malformed() {
        return stmt;
    }
    match dialect.upsert_clause(names, table) {
        UpsertClause::Append(fragments) => {
            stmt.fragments.extend(fragments);
            stmt
        }
        UpsertClause::Replace(fragments) => Statement::new(fragments, stmt.params),
        UpsertClause::Malformed(msg) => Statement::malformed(msg),
    }
}

/// `ON CONFLICT (<pk>) DO UPDATE SET c = EXCLUDED.c, ...`
pub fn on_conflict(names: &Names<'_>, table: &Table) -> UpsertClause {
    let conflict = list(table.primary_keys.iter().map(|f| names.col(f)));
    let updates: Vec<String> = table
        .non_primary()
        .map(|f| {
            let c = names.col(f);
            format!("{c} = EXCLUDED.{c}")
        })
        .collect();
    if updates.is_empty() {
        return UpsertClause::Append(vec![format!(" ON CONFLICT ({conflict}) DO NOTHING")]);
    }
    UpsertClause::Append(vec![
        format!(" ON CONFLICT ({conflict}) DO "),
        "UPDATE SET ".to_string(),
        updates.join(", "),
    ])
}

/// `ON DUPLICATE KEY UPDATE c = VALUES(c), ...` over non-sequence columns.
pub fn on_duplicate_key(names: &Names<'_>, table: &Table) -> UpsertClause {
    let updates: Vec<String> = table
        .fields
        .iter()
        .filter(|f| !f.is_sequence)
        .map(|f| {
            let c = names.col(f);
            format!("{c} = VALUES({c})")
        })
        .collect();
    if updates.is_empty() {
        return UpsertClause::Malformed(format!(
            "table {} has no columns to update on duplicate key",
            table.sql_name
        ));
    }
    UpsertClause::Append(vec![" ON DUPLICATE KEY UPDATE ".to_string(), updates.join(", ")])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeFlavor {
    SqlServer,
    Oracle,
}

/// `MERGE` with every field as a source column, matched on the primary key.
///
/// Sequence columns are left to the database in both branches.
pub fn merge(names: &Names<'_>, table: &Table, flavor: MergeFlavor) -> UpsertClause {
    let target = names.table(&table.sql_name);
    let source = list(
        table
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{} {}", names.nth(i), names.col(f))),
    );
    let predicate = table
        .primary_keys
        .iter()
        .map(|f| {
            let c = names.col(f);
            format!("s.{c} = t.{c}")
        })
        .collect::<Vec<_>>()
        .join(" AND ");

    let mut updates = Vec::new();
    let mut inserts = Vec::new();
    let mut values = Vec::new();
    for field in table.fields.iter().filter(|f| !f.is_sequence) {
        let c = names.col(field);
        if !field.is_primary {
            updates.push(format!("t.{c} = s.{c}"));
        }
        values.push(format!("s.{c}"));
        inserts.push(c);
    }
    if inserts.is_empty() {
        return UpsertClause::Malformed(format!(
            "table {} has no columns to merge",
            table.sql_name
        ));
    }

    let mut fragments = match flavor {
        MergeFlavor::SqlServer => vec![
            format!("MERGE {target} AS t "),
            "USING (".to_string(),
            format!("SELECT {source}"),
            ") AS s ".to_string(),
            format!("ON {predicate} "),
        ],
        // oracle requires the ON condition in parentheses
        MergeFlavor::Oracle => vec![
            format!("MERGE INTO {target} t "),
            "USING (".to_string(),
            format!("SELECT {source}"),
            " FROM DUAL) s ".to_string(),
            format!("ON ({predicate}) "),
        ],
    };
    if !updates.is_empty() {
        fragments.push("WHEN MATCHED THEN ".to_string());
        fragments.push("UPDATE SET ".to_string());
        fragments.push(format!("{} ", updates.join(", ")));
    }
    fragments.push("WHEN NOT MATCHED THEN ".to_string());
    fragments.push("INSERT (".to_string());
    fragments.push(inserts.join(", "));
    fragments.push(") VALUES (".to_string());
    fragments.push(values.join(", "));
    fragments.push(match flavor {
        MergeFlavor::SqlServer => ");".to_string(),
        MergeFlavor::Oracle => ")".to_string(),
    });
    UpsertClause::Replace(fragments)
}
