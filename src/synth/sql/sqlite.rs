use crate::model::{Field, Table};
use crate::synth::dml::upsert;
use crate::synth::traits::{KeyRetrieval, Names, SqlDialect, UpsertClause};

/// SQLite has no schemas and no stored routines.
pub struct SqliteGenerator;

impl SqlDialect for SqliteGenerator {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn nth(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn schema_prefix(&self) -> bool {
        false
    }

    fn generated_key(&self, _names: &Names<'_>, _seq: &Field, _next: usize) -> KeyRetrieval {
        KeyRetrieval::driver()
    }

    fn upsert_clause(&self, names: &Names<'_>, table: &Table) -> UpsertClause {
        upsert::on_conflict(names, table)
    }
}
