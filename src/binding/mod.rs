//! Binding emitter.
//!
//! Turns resolved units into serializable bindings: identifiers, Python
//! types and signatures, plus the synthesized statements a renderer needs.
//! Schema field order is preserved everywhere.

pub mod python;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::GenResult;
use crate::model::{self, Converter, Field};
use crate::naming::{Resolver, inflect};
use crate::schema::{self, ProcKind, TableKind};
use crate::synth::{Operation, Statement, Synthesizer, Target};
use crate::types::{self, TypeMapper};

/// One generated unit.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum Binding {
    Enum(EnumBinding),
    Proc(ProcBinding),
    Table(TableBinding),
    Index(IndexBinding),
    ForeignKey(ForeignKeyBinding),
    Query(QueryBinding),
}

impl Binding {
    pub fn name(&self) -> &str {
        match self {
            Binding::Enum(b) => &b.name,
            Binding::Proc(b) => &b.name,
            Binding::Table(b) => &b.name,
            Binding::Index(b) => &b.func,
            Binding::ForeignKey(b) => &b.name,
            Binding::Query(b) => &b.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldBinding {
    pub name: String,
    pub sql_name: String,
    /// Qualified Python type.
    pub ty: String,
    pub zero: String,
    /// `name: T  # sql_name`
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamBinding {
    pub name: String,
    pub ty: String,
    /// `name: T`
    pub decl: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableBinding {
    pub name: String,
    pub sql_name: String,
    pub kind: TableKind,
    /// Receiver name for methods on the type.
    pub short: String,
    pub manual: bool,
    pub fields: Vec<FieldBinding>,
    pub primary_keys: Vec<String>,
    pub sequence: Option<String>,
    /// Zero literals in field order.
    pub zeros: String,
    pub statements: BTreeMap<Operation, Statement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexBinding {
    pub func: String,
    pub sql_name: String,
    pub table: String,
    pub short: String,
    pub params: Vec<ParamBinding>,
    pub is_unique: bool,
    pub is_primary: bool,
    pub signature: String,
    pub statement: Statement,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForeignKeyBinding {
    pub name: String,
    pub sql_name: String,
    pub table: String,
    pub short: String,
    pub ref_table: String,
    pub ref_func: String,
    pub signature: String,
    /// Call loading the referenced row, e.g. `user_by_id(cursor, p.author_id)`.
    pub call: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcBinding {
    pub name: String,
    pub sql_name: String,
    pub kind: ProcKind,
    pub overloaded: bool,
    pub params: Vec<ParamBinding>,
    pub returns: Vec<FieldBinding>,
    pub void: bool,
    pub signature: String,
    pub statement: Statement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryParamBinding {
    pub name: String,
    pub ty: String,
    pub decl: String,
    pub interpolate: bool,
    pub join: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryBinding {
    pub name: String,
    pub type_name: String,
    pub type_comment: String,
    pub fields: Vec<FieldBinding>,
    pub params: Vec<QueryParamBinding>,
    pub exec: bool,
    pub flat: bool,
    pub one: bool,
    pub interpolate: bool,
    pub comment: String,
    pub signature: String,
    /// Plain statement text, one line per query line.
    pub sql: String,
    /// The statement as a Python expression, with its line comments.
    pub sqlstr: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumBinding {
    pub name: String,
    pub sql_name: String,
    pub values: Vec<EnumValueBinding>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValueBinding {
    pub name: String,
    pub sql_name: String,
    pub value: i64,
}

/// Operations generated for a table. Views only get their index lookups.
pub fn operations(table: &model::Table) -> Vec<Operation> {
    if table.is_view() {
        return Vec::new();
    }
    if table.primary_keys.is_empty() {
        return vec![Operation::Insert];
    }
    vec![
        Operation::Insert,
        Operation::Update,
        Operation::Upsert,
        Operation::Delete,
    ]
}

/// Builds bindings for one run.
pub struct Emitter {
    synth: Synthesizer,
    mapper: TypeMapper,
    resolver: Resolver,
}

impl Emitter {
    pub fn new(synth: Synthesizer, mapper: TypeMapper, resolver: Resolver) -> Self {
        Self {
            synth,
            mapper,
            resolver,
        }
    }

    pub fn converter(&self) -> Converter<'_> {
        Converter::new(&self.mapper, &self.resolver)
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synth
    }

    /// Make columns of the enum's SQL type map to its Python name.
    pub fn register_enum(&mut self, e: &schema::Enum) {
        let name = self.resolver.func_name(&e.name);
        self.mapper.add_enum(e.name.clone(), name);
    }

    fn field(&self, f: &Field) -> FieldBinding {
        let ty = self.mapper.qualify(&f.ty);
        FieldBinding {
            name: f.name.clone(),
            sql_name: f.sql_name.clone(),
            zero: types::zero_for(&f.ty, &f.zero),
            definition: python::field_def(&f.name, &ty, &f.sql_name),
            ty,
        }
    }

    fn params(&self, fields: &[Field]) -> Vec<ParamBinding> {
        fields
            .iter()
            .map(|f| {
                let name = self.resolver.param_name(&f.name);
                let ty = self.mapper.qualify(&f.ty);
                ParamBinding {
                    decl: python::param_decl(&name, &ty),
                    name,
                    ty,
                }
            })
            .collect()
    }

    pub fn enumeration(&self, e: &schema::Enum) -> EnumBinding {
        let name = self.resolver.func_name(&e.name);
        let values = e
            .values
            .iter()
            .map(|v| EnumValueBinding {
                name: self.resolver.enum_value_name(&name, &v.name),
                sql_name: v.name.clone(),
                value: v.const_value,
            })
            .collect();
        EnumBinding {
            name,
            sql_name: e.name.clone(),
            values,
        }
    }

    pub fn table(&mut self, table: &model::Table) -> GenResult<TableBinding> {
        let mut statements = BTreeMap::new();
        for op in operations(table) {
            statements.insert(op, self.synth.synthesize(op, Target::Table(table))?);
        }
        let short = self.resolver.short_name(&table.name);
        let fields: Vec<FieldBinding> = table.fields.iter().map(|f| self.field(f)).collect();
        let zeros = fields
            .iter()
            .map(|f| f.zero.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Ok(TableBinding {
            name: table.name.clone(),
            sql_name: table.sql_name.clone(),
            kind: table.kind,
            short,
            manual: table.manual,
            fields,
            primary_keys: table.primary_keys.iter().map(|f| f.name.clone()).collect(),
            sequence: table.sequence().map(|f| f.name.clone()),
            zeros,
            statements,
        })
    }

    /// Lookup by index. Non-unique indexes return a list.
    pub fn index(&mut self, index: &model::Index) -> GenResult<IndexBinding> {
        let statement = self
            .synth
            .synthesize(Operation::SelectByIndex, Target::Index(index))?;
        let short = self.resolver.short_name(&index.table.name);
        let params = self.params(&index.fields);
        let decls: Vec<String> = params.iter().map(|p| p.decl.clone()).collect();
        let returns = if index.is_unique {
            index.table.name.clone()
        } else {
            format!("list[{}]", index.table.name)
        };
        Ok(IndexBinding {
            signature: python::funcdef(&index.func, &decls, &[returns]),
            func: index.func.clone(),
            sql_name: index.sql_name.clone(),
            table: index.table.name.clone(),
            short,
            params,
            is_unique: index.is_unique,
            is_primary: index.is_primary,
            statement,
        })
    }

    pub fn foreign_key(&mut self, fk: &model::ForeignKey) -> ForeignKeyBinding {
        let short = self.resolver.short_name(&fk.table.name);
        let mut args = vec!["cursor".to_string()];
        args.extend(
            fk.fields
                .iter()
                .zip(&fk.ref_fields)
                .map(|(field, ref_field)| convert_arg(&short, field, ref_field)),
        );
        ForeignKeyBinding {
            signature: python::methoddef(&fk.name, &fk.ref_table),
            call: format!("{}({})", fk.ref_func, args.join(", ")),
            name: fk.name.clone(),
            sql_name: fk.sql_name.clone(),
            table: fk.table.name.clone(),
            short,
            ref_table: fk.ref_table.clone(),
            ref_func: fk.ref_func.clone(),
        }
    }

    pub fn proc(&self, proc: &model::Proc) -> GenResult<ProcBinding> {
        let statement = self.synth.synthesize(Operation::CallProc, Target::Proc(proc))?;
        let params = self.params(&proc.params);
        let returns: Vec<FieldBinding> = proc.returns.iter().map(|f| self.field(f)).collect();
        let decls: Vec<String> = params.iter().map(|p| p.decl.clone()).collect();
        let return_types: Vec<String> = if proc.void {
            Vec::new()
        } else {
            returns.iter().map(|r| r.ty.clone()).collect()
        };
        let name = proc.func_name().to_string();
        Ok(ProcBinding {
            signature: python::funcdef(&name, &decls, &return_types),
            name,
            sql_name: proc.sql_name.clone(),
            kind: proc.kind,
            overloaded: proc.overloaded,
            params,
            returns,
            void: proc.void,
            statement,
        })
    }

    pub fn query(&self, q: &schema::Query) -> GenResult<QueryBinding> {
        let fields = if q.exec {
            Vec::new()
        } else {
            self.query_fields(q)?
        };
        let params: Vec<QueryParamBinding> = q
            .params
            .iter()
            .map(|p| {
                let ty = self.mapper.qualify(&p.ty);
                let name = self.resolver.check_template(p.name.clone());
                QueryParamBinding {
                    decl: python::param_decl(&name, &ty),
                    name,
                    ty,
                    interpolate: p.interpolate,
                    join: p.join,
                }
            })
            .collect();
        let returns: Vec<String> = if q.exec {
            vec!["tuple".to_string()]
        } else if q.flat {
            fields.iter().map(|f| f.ty.clone()).collect()
        } else if q.one {
            vec![q.type_name.clone()]
        } else {
            vec![format!("list[{}]", q.type_name)]
        };
        let decls: Vec<String> = params.iter().map(|p| p.decl.clone()).collect();
        let name = self.query_name(q);
        Ok(QueryBinding {
            signature: python::funcdef(&name, &decls, &returns),
            name,
            type_name: q.type_name.clone(),
            type_comment: q.type_comment.clone(),
            fields,
            params,
            exec: q.exec,
            flat: q.flat,
            one: q.one,
            interpolate: q.interpolate,
            comment: q.comment.clone(),
            sql: q.query.join("\n"),
            sqlstr: python::query_str(&q.query, &q.comments),
        })
    }

    fn query_fields(&self, q: &schema::Query) -> GenResult<Vec<FieldBinding>> {
        if q.manual_fields {
            // types are already Python types
            return Ok(q
                .fields
                .iter()
                .map(|c| {
                    let ty = self.mapper.qualify(&c.datatype);
                    FieldBinding {
                        name: c.name.clone(),
                        sql_name: self.resolver.func_name(&c.name),
                        zero: "None".to_string(),
                        definition: python::field_def(&c.name, &ty, &c.name),
                        ty,
                    }
                })
                .collect());
        }
        let conv = self.converter();
        q.fields
            .iter()
            .map(|c| conv.field(c).map(|f| self.field(&f)))
            .collect()
    }

    /// Explicit name, or one derived from the result type and params:
    /// `author_books_by_author_id`, `get_author_books`.
    pub fn query_name(&self, q: &schema::Query) -> String {
        if !q.name.is_empty() {
            return q.name.clone();
        }
        let base = if q.one {
            q.type_name.clone()
        } else {
            inflect::pluralize(&q.type_name)
        };
        if q.params.is_empty() {
            return self.resolver.func_name(&format!("get_{base}"));
        }
        let mut parts = vec![base, "by".to_string()];
        parts.extend(q.params.iter().map(|p| p.name.clone()));
        self.resolver.func_name(&parts.join("_"))
    }
}

/// Argument passing `field` where `ref_field` is expected, converting when
/// the types differ. `Optional` wrappers are looked through on both sides.
fn convert_arg(short: &str, field: &Field, ref_field: &Field) -> String {
    let expr = format!("{short}.{}", field.name);
    if field.ty == ref_field.ty {
        return expr;
    }
    let ty = types::unwrap_optional(&field.ty);
    let ref_ty = types::unwrap_optional(&ref_field.ty);
    if ref_ty.to_lowercase() == ty {
        expr
    } else {
        format!("{ref_ty}({expr})")
    }
}
