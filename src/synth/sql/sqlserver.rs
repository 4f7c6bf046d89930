use crate::error::GenResult;
use crate::model::{Field, Proc, Table};
use crate::synth::dml::{call, upsert};
use crate::synth::traits::{KeyRetrieval, Names, SqlDialect, UpsertClause};
use crate::synth::{GeneratedKey, Statement};

pub struct SqlServerGenerator;

impl SqlDialect for SqlServerGenerator {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn nth(&self, index: usize) -> String {
        format!("@p{}", index + 1)
    }

    fn quote_identifier(&self, id: &str) -> String {
        format!("[{}]", id.replace(']', "]]"))
    }

    fn generated_key(&self, _names: &Names<'_>, _seq: &Field, _next: usize) -> KeyRetrieval {
        KeyRetrieval::suffix(
            GeneratedKey::Selected,
            "; SELECT ID = CONVERT(BIGINT, SCOPE_IDENTITY())",
        )
    }

    fn upsert_clause(&self, names: &Names<'_>, table: &Table) -> UpsertClause {
        upsert::merge(names, table, upsert::MergeFlavor::SqlServer)
    }

    // executed as a stored procedure command, parameters bound by position
    fn call_proc(&self, names: &Names<'_>, proc: &Proc) -> GenResult<Statement> {
        Ok(call::positional_call(names, proc, |t, _| t.to_string()))
    }

    fn call_func(&self, names: &Names<'_>, proc: &Proc) -> GenResult<Statement> {
        Ok(call::positional_call(names, proc, |t, args| {
            format!("SELECT {t}({args}) AS OUT")
        }))
    }
}
