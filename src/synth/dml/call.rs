//! Stored procedure and function calls.

use crate::error::GenResult;
use crate::model::Proc;
use crate::schema::ProcKind;
use crate::synth::dml::list;
use crate::synth::{Names, Param, SqlDialect, Statement};

/// Call a procedure, or select a function's result.
pub fn build_call(names: &Names<'_>, dialect: &dyn SqlDialect, proc: &Proc) -> GenResult<Statement> {
    match proc.kind {
        ProcKind::Procedure => dialect.call_proc(names, proc),
        ProcKind::Function => dialect.call_func(names, proc),
    }
}

/// Positional placeholders and params for the proc's inputs.
pub fn positional(names: &Names<'_>, proc: &Proc) -> (String, Vec<Param>) {
    let placeholders = list((0..proc.params.len()).map(|i| names.nth(i)));
    (placeholders, Param::all(&proc.params, 0))
}

/// `<format>` applied to the schema-qualified name and positional inputs.
pub fn positional_call(names: &Names<'_>, proc: &Proc, format: impl Fn(&str, &str) -> String) -> Statement {
    let (placeholders, params) = positional(names, proc);
    Statement::new(
        vec![format(&names.table(&proc.sql_name), &placeholders)],
        params,
    )
}
