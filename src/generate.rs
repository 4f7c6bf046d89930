//! Generation driver.
//!
//! Walks a schema set (or its custom queries), emits one binding per unit
//! and groups them by destination file. A failing unit is recorded and the
//! rest of the run continues.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::binding::{Binding, Emitter};
use crate::config::{GenerateOptions, Mode};
use crate::error::{GenError, GenResult};
use crate::model;
use crate::schema::{self, ProcKind, Schema, Set, TableKind};

/// Extension of generated files.
pub const EXT: &str = ".py";

/// A unit that could not be generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub unit: String,
    pub error: String,
}

/// Bindings grouped by destination file.
#[derive(Debug, Default, Serialize)]
pub struct Output {
    pub files: BTreeMap<String, Vec<Binding>>,
    pub failures: Vec<Failure>,
}

impl Output {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.files.values().flatten()
    }

    fn push(&mut self, file: &str, binding: Binding) {
        self.files.entry(file.to_string()).or_default().push(binding);
    }

    fn fail(&mut self, unit: String, err: GenError) {
        tracing::warn!("{}: {}", unit, err);
        self.failures.push(Failure {
            unit,
            error: err.to_string(),
        });
    }
}

pub struct Generator {
    opts: GenerateOptions,
    emitter: Emitter,
}

impl Generator {
    pub fn new(opts: GenerateOptions) -> GenResult<Self> {
        let emitter = opts.emitter()?;
        Ok(Self { opts, emitter })
    }

    /// Destination for a unit named `name`.
    fn dest(&self, name: &str) -> String {
        match &self.opts.single {
            Some(single) => single.clone(),
            None => format!("{}{EXT}", name.to_lowercase()),
        }
    }

    /// Files the run writes to.
    pub fn file_names(&self, set: &Set) -> GenResult<Vec<String>> {
        if let Some(single) = &self.opts.single {
            return Ok(vec![single.clone()]);
        }
        let resolver = self.emitter.resolver();
        let mut files = Vec::new();
        match self.opts.mode {
            Mode::Schema => {
                for s in &set.schemas {
                    files.extend(s.enums.iter().map(|e| self.dest(&resolver.func_name(&e.name))));
                    for p in &s.procs {
                        files.push(self.dest(&proc_file(p.kind, &resolver.func_name(&p.name))));
                    }
                    files.extend(
                        s.tables
                            .iter()
                            .chain(&s.views)
                            .map(|t| self.dest(&resolver.type_name(&t.name))),
                    );
                }
            }
            Mode::Query => {
                for q in &set.queries {
                    if q.exec {
                        return Err(GenError::NoSingle);
                    }
                    files.push(self.dest(&q.type_name));
                }
            }
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    pub fn run(mut self, set: &Set) -> GenResult<Output> {
        let planned = self.file_names(set)?;
        tracing::info!(
            "generating {} file(s) for {} in {:?} mode",
            planned.len(),
            self.opts.dialect(),
            self.opts.mode
        );

        let mut out = Output::default();
        match self.opts.mode {
            Mode::Schema => {
                for s in &set.schemas {
                    self.schema(s, &mut out);
                }
            }
            Mode::Query => {
                for q in &set.queries {
                    self.query(q, &mut out);
                }
            }
        }
        tracing::info!(
            "generated {} binding(s), {} failure(s)",
            out.bindings().count(),
            out.failures.len()
        );
        Ok(out)
    }

    fn schema(&mut self, s: &Schema, out: &mut Output) {
        tracing::debug!("schema {}", s.name);
        for e in &s.enums {
            self.emitter.register_enum(e);
        }
        for e in &s.enums {
            let b = self.emitter.enumeration(e);
            let dest = self.dest(&b.name);
            out.push(&dest, Binding::Enum(b));
        }

        self.procs(s, out);

        for t in &s.tables {
            if let Err(e) = self.table(s, t, TableKind::Table, out) {
                out.fail(format!("table {}", t.name), e);
            }
        }
        for v in &s.views {
            if let Err(e) = self.table(s, v, TableKind::View, out) {
                out.fail(format!("view {}", v.name), e);
            }
        }
    }

    /// Procs sharing a name are grouped in one file and marked overloaded.
    fn procs(&mut self, s: &Schema, out: &mut Output) {
        let mut groups: Vec<(String, Vec<model::Proc>)> = Vec::new();
        for p in &s.procs {
            let proc = match self.emitter.converter().proc(p) {
                Ok(proc) => proc,
                Err(e) => {
                    out.fail(format!("proc {}", p.name), e);
                    continue;
                }
            };
            match groups.iter_mut().find(|(name, _)| *name == proc.name) {
                Some((_, group)) => group.push(proc),
                None => groups.push((proc.name.clone(), vec![proc])),
            }
        }

        for (name, mut group) in groups {
            let overloaded = group.len() > 1;
            let kind = group.first().map_or(ProcKind::Procedure, |p| p.kind);
            let dest = self.dest(&proc_file(kind, &name));
            for proc in &mut group {
                proc.overloaded = overloaded;
                tracing::debug!("proc {}", proc.func_name());
                match self.emitter.proc(proc) {
                    Ok(b) => out.push(&dest, Binding::Proc(b)),
                    Err(e) => out.fail(format!("proc {}", proc.sql_name), e),
                }
            }
        }
    }

    /// A table (or view) and its indexes and foreign keys. Index and foreign
    /// key failures are recorded on their own.
    fn table(
        &mut self,
        s: &Schema,
        src: &schema::Table,
        kind: TableKind,
        out: &mut Output,
    ) -> GenResult<()> {
        tracing::debug!("{:?} {}", kind, src.name);
        let mut table = self.emitter.converter().table(src)?;
        table.kind = kind;
        let dest = self.dest(&table.name);
        let binding = self.emitter.table(&table)?;
        out.push(&dest, Binding::Table(binding));

        for i in &src.indexes {
            let index = self.emitter.converter().index(src, &table, i);
            match index.and_then(|index| self.emitter.index(&index)) {
                Ok(b) => out.push(&dest, Binding::Index(b)),
                Err(e) => out.fail(format!("index {}", i.name), e),
            }
        }

        for fk in &src.foreign_keys {
            let converted = self
                .emitter
                .converter()
                .foreign_key(src, &table, fk, s.table(&fk.ref_table));
            match converted {
                Ok(fk) => {
                    let b = self.emitter.foreign_key(&fk);
                    out.push(&dest, Binding::ForeignKey(b));
                }
                Err(e) => out.fail(format!("foreign key {}", fk.name), e),
            }
        }
        Ok(())
    }

    fn query(&mut self, q: &schema::Query, out: &mut Output) {
        match self.emitter.query(q) {
            Ok(b) => {
                tracing::debug!("query {}", b.name);
                let dest = self.dest(&q.type_name);
                out.push(&dest, Binding::Query(b));
            }
            Err(e) => out.fail(format!("query {}", self.emitter.query_name(q)), e),
        }
    }
}

fn proc_file(kind: ProcKind, name: &str) -> String {
    match kind {
        ProcKind::Function => format!("sf_{name}"),
        ProcKind::Procedure => format!("sp_{name}"),
    }
}

/// Generate every unit of `set`.
pub fn generate(set: &Set, opts: GenerateOptions) -> GenResult<Output> {
    Generator::new(opts)?.run(set)
}
