use crate::error::GenResult;
use crate::model::{Field, Proc, Table};
use crate::synth::Statement;
use crate::synth::dml::{call, upsert};
use crate::synth::traits::{KeyRetrieval, Names, SqlDialect, UpsertClause};

pub struct MysqlGenerator;

impl SqlDialect for MysqlGenerator {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn nth(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn quote_identifier(&self, id: &str) -> String {
        format!("`{}`", id.replace('`', "``"))
    }

    fn generated_key(&self, _names: &Names<'_>, _seq: &Field, _next: usize) -> KeyRetrieval {
        KeyRetrieval::driver()
    }

    fn upsert_clause(&self, names: &Names<'_>, table: &Table) -> UpsertClause {
        upsert::on_duplicate_key(names, table)
    }

    fn call_proc(&self, names: &Names<'_>, proc: &Proc) -> GenResult<Statement> {
        Ok(call::positional_call(names, proc, |t, args| format!("CALL {t}({args})")))
    }

    fn call_func(&self, names: &Names<'_>, proc: &Proc) -> GenResult<Statement> {
        Ok(call::positional_call(names, proc, |t, args| format!("SELECT {t}({args})")))
    }
}
