use crate::error::GenResult;
use crate::model::{Field, Proc, Table};
use crate::synth::dml::{call, upsert};
use crate::synth::traits::{KeyRetrieval, Names, SqlDialect, UpsertClause};
use crate::synth::{GeneratedKey, Statement};

pub struct PostgresGenerator;

impl SqlDialect for PostgresGenerator {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn nth(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn generated_key(&self, names: &Names<'_>, seq: &Field, _next: usize) -> KeyRetrieval {
        KeyRetrieval::suffix(GeneratedKey::Returning, format!(" RETURNING {}", names.col(seq)))
    }

    fn upsert_clause(&self, names: &Names<'_>, table: &Table) -> UpsertClause {
        upsert::on_conflict(names, table)
    }

    fn call_proc(&self, names: &Names<'_>, proc: &Proc) -> GenResult<Statement> {
        Ok(call::positional_call(names, proc, |t, args| format!("CALL {t}({args})")))
    }

    fn call_func(&self, names: &Names<'_>, proc: &Proc) -> GenResult<Statement> {
        Ok(call::positional_call(names, proc, |t, args| {
            format!("SELECT * FROM {t}({args})")
        }))
    }
}
