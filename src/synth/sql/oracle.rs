use crate::error::GenResult;
use crate::model::{Field, Proc, Table};
use crate::synth::dml::{call, list, upsert};
use crate::synth::dialect::OracleType;
use crate::synth::traits::{KeyRetrieval, Names, SqlDialect, UpsertClause};
use crate::synth::{Direction, GeneratedKey, Param, Slot, Statement};

pub struct OracleGenerator {
    pub kind: OracleType,
}

impl SqlDialect for OracleGenerator {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn nth(&self, index: usize) -> String {
        format!(":{}", index + 1)
    }

    fn generated_key(&self, names: &Names<'_>, seq: &Field, next: usize) -> KeyRetrieval {
        let col = names.col(seq);
        match self.kind {
            OracleType::Ora => {
                let mut out = Param::positional(seq, next);
                out.direction = Direction::Out;
                KeyRetrieval {
                    key: GeneratedKey::OutParam,
                    suffix: Some(format!(" RETURNING {col} INTO {}", self.nth(next))),
                    out: Some(out),
                }
            }
            // the godror driver recognizes the marker and binds :pk itself
            OracleType::Godror => KeyRetrieval {
                key: GeneratedKey::OutParam,
                suffix: Some(format!(" RETURNING {col} /*LASTINSERTID*/ INTO :pk")),
                out: Some(Param::named(seq, "pk", Direction::Out)),
            },
        }
    }

    fn upsert_clause(&self, names: &Names<'_>, table: &Table) -> UpsertClause {
        upsert::merge(names, table, upsert::MergeFlavor::Oracle)
    }

    /// Anonymous block binding inputs and outputs by name. The routine is
    /// resolved through the session's schema.
    fn call_proc(&self, _names: &Names<'_>, proc: &Proc) -> GenResult<Statement> {
        let mut params: Vec<Param> = proc
            .params
            .iter()
            .map(|f| Param::named(f, f.sql_name.clone(), Direction::In))
            .collect();
        params.extend(
            proc.returns
                .iter()
                .map(|f| Param::named(f, f.sql_name.clone(), Direction::Out)),
        );
        let args = list(params.iter().map(|p| match &p.slot {
            Slot::Named(n) => format!(":{n}"),
            Slot::Positional(i) => self.nth(*i),
        }));
        Ok(Statement::new(
            vec![format!("BEGIN {}({args}); END;", proc.sql_name)],
            params,
        ))
    }

    fn call_func(&self, names: &Names<'_>, proc: &Proc) -> GenResult<Statement> {
        Ok(call::positional_call(names, proc, |t, args| {
            format!("SELECT {t}({args}) FROM dual")
        }))
    }
}
