//! Resolved model: schema units with Python identifiers and types attached.
//!
//! Built once per unit from the [`schema`](crate::schema) model, then shared
//! read-only by the synthesizer and the binding emitter.

use serde::Serialize;

use crate::error::{GenError, GenResult};
use crate::naming::Resolver;
use crate::schema::{self, ProcKind, TableKind};
use crate::types::TypeMapper;

/// A resolved column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Python identifier.
    pub name: String,
    pub sql_name: String,
    /// Python type.
    pub ty: String,
    pub zero: String,
    pub nullable: bool,
    pub is_primary: bool,
    pub is_sequence: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Table {
    /// Python class name.
    pub name: String,
    pub sql_name: String,
    pub kind: TableKind,
    pub fields: Vec<Field>,
    pub primary_keys: Vec<Field>,
    pub manual: bool,
}

impl Table {
    /// The database-generated column, preferring a primary key one.
    pub fn sequence(&self) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.is_sequence && f.is_primary)
            .or_else(|| self.fields.iter().find(|f| f.is_sequence))
    }

    pub fn non_primary(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_primary)
    }

    pub fn is_view(&self) -> bool {
        self.kind == TableKind::View
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Index {
    pub sql_name: String,
    /// Python accessor name.
    pub func: String,
    pub table: Table,
    pub fields: Vec<Field>,
    pub is_unique: bool,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForeignKey {
    /// Python method name.
    pub name: String,
    pub sql_name: String,
    pub table: Table,
    pub fields: Vec<Field>,
    /// Python class name of the referenced table.
    pub ref_table: String,
    pub ref_fields: Vec<Field>,
    /// Accessor on the referenced table used to load it.
    pub ref_func: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Proc {
    pub kind: ProcKind,
    pub name: String,
    pub overloaded_name: String,
    pub sql_name: String,
    pub params: Vec<Field>,
    pub returns: Vec<Field>,
    pub void: bool,
    pub overloaded: bool,
}

impl Proc {
    /// Name of the generated function, taking overloads into account.
    pub fn func_name(&self) -> &str {
        if self.overloaded {
            &self.overloaded_name
        } else {
            &self.name
        }
    }
}

/// Converts schema units into resolved ones.
pub struct Converter<'a> {
    mapper: &'a TypeMapper,
    resolver: &'a Resolver,
}

impl<'a> Converter<'a> {
    pub fn new(mapper: &'a TypeMapper, resolver: &'a Resolver) -> Self {
        Self { mapper, resolver }
    }

    pub fn field(&self, col: &schema::Column) -> GenResult<Field> {
        let mapped = self.mapper.map(&col.datatype, col.nullable)?;
        Ok(Field {
            name: self.resolver.field_name(&col.name),
            sql_name: col.name.clone(),
            ty: mapped.ty,
            zero: mapped.zero,
            nullable: col.nullable,
            is_primary: col.is_primary,
            is_sequence: col.is_sequence,
        })
    }

    /// Resolve the columns of one unit. Identifiers that collide after
    /// resolution (`class` and `cls`) get the conflict suffix.
    fn fields<'c>(&self, cols: impl IntoIterator<Item = &'c schema::Column>) -> GenResult<Vec<Field>> {
        let mut fields = cols
            .into_iter()
            .map(|c| self.field(c))
            .collect::<GenResult<Vec<_>>>()?;
        self.resolver.dedupe(fields.iter_mut().map(|f| &mut f.name));
        Ok(fields)
    }

    pub fn table(&self, t: &schema::Table) -> GenResult<Table> {
        let fields = self.fields(&t.columns)?;
        let primary_keys = fields.iter().filter(|f| f.is_primary).cloned().collect();
        Ok(Table {
            name: self.resolver.type_name(&t.name),
            sql_name: t.name.clone(),
            kind: t.kind,
            fields,
            primary_keys,
            manual: t.manual,
        })
    }

    pub fn index(&self, src: &schema::Table, table: &Table, i: &schema::Index) -> GenResult<Index> {
        let fields = pick(src, &table.fields, &i.fields)?;
        Ok(Index {
            sql_name: i.name.clone(),
            func: self.resolver.func_name(&i.func),
            table: table.clone(),
            fields,
            is_unique: i.is_unique,
            is_primary: i.is_primary,
        })
    }

    pub fn foreign_key(
        &self,
        src: &schema::Table,
        table: &Table,
        fk: &schema::ForeignKey,
        ref_src: Option<&schema::Table>,
    ) -> GenResult<ForeignKey> {
        if fk.fields.len() != fk.ref_fields.len() {
            return Err(GenError::ForeignKeyArity {
                name: fk.name.clone(),
                fields: fk.fields.len(),
                ref_fields: fk.ref_fields.len(),
            });
        }
        let ref_src = ref_src.ok_or_else(|| GenError::UnknownTable(fk.ref_table.clone()))?;
        Ok(ForeignKey {
            name: self.resolver.func_name(&fk.func),
            sql_name: fk.name.clone(),
            table: table.clone(),
            fields: pick(src, &table.fields, &fk.fields)?,
            ref_table: self.resolver.type_name(&fk.ref_table),
            ref_fields: pick(ref_src, &self.fields(&ref_src.columns)?, &fk.ref_fields)?,
            ref_func: self.resolver.func_name(&fk.ref_func),
        })
    }

    pub fn proc(&self, p: &schema::Proc) -> GenResult<Proc> {
        let name = self.resolver.func_name(&p.name);
        let params = self.fields(&p.params)?;
        let overload_key: Vec<(String, String)> = p
            .params
            .iter()
            .map(|c| (c.name.clone(), c.datatype.clone()))
            .collect();
        Ok(Proc {
            kind: p.kind,
            overloaded_name: self.resolver.overloaded_name(&name, &overload_key),
            name,
            sql_name: p.name.clone(),
            params,
            returns: self.fields(&p.returns)?,
            void: p.void,
            overloaded: false,
        })
    }
}

/// The resolved fields of `src` named by `names`, in that order.
fn pick(src: &schema::Table, fields: &[Field], names: &[String]) -> GenResult<Vec<Field>> {
    names
        .iter()
        .map(|n| {
            fields
                .iter()
                .find(|f| f.sql_name == *n)
                .cloned()
                .ok_or_else(|| GenError::unknown_column(&src.name, n))
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::schema::Column;

    #[test]
    fn test_convert_table() {
        let t = users();
        assert_eq!(t.name, "User");
        assert_eq!(t.fields.len(), 3);
        assert_eq!(t.primary_keys.len(), 1);
        assert_eq!(t.fields[2].ty, "Optional[str]");
        assert_eq!(t.sequence().map(|f| f.sql_name.as_str()), Some("id"));
        assert_eq!(t.non_primary().count(), 2);
    }

    #[test]
    fn test_primary_keys_keep_column_order() {
        let t = order_items();
        let pks: Vec<_> = t.primary_keys.iter().map(|f| f.sql_name.as_str()).collect();
        assert_eq!(pks, vec!["order_id", "line"]);
        assert!(t.sequence().is_none());
    }

    #[test]
    fn test_colliding_fields_are_suffixed() {
        let src = schema::Table {
            name: "lessons".into(),
            columns: vec![
                Column::new("class", "text"),
                Column::new("cls", "text"),
                Column::new("room", "text"),
            ],
            indexes: vec![schema::Index {
                name: "lessons_cls_idx".into(),
                func: "lesson_by_cls".into(),
                fields: vec!["cls".into()],
                ..schema::Index::default()
            }],
            ..schema::Table::default()
        };
        let mapper = TypeMapper::new();
        let resolver = Resolver::default();
        let conv = Converter::new(&mapper, &resolver);
        let table = conv.table(&src).unwrap();
        let names: Vec<_> = table.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["cls", "clsVal", "room"]);

        let index = conv.index(&src, &table, &src.indexes[0]).unwrap();
        assert_eq!(index.fields[0].name, "clsVal");
    }

    #[test]
    fn test_index_unknown_column() {
        let src = users_schema();
        let mapper = TypeMapper::new();
        let resolver = Resolver::default();
        let conv = Converter::new(&mapper, &resolver);
        let table = conv.table(&src).unwrap();
        let bad = schema::Index {
            name: "users_x_idx".into(),
            func: "user_by_x".into(),
            fields: vec!["x".into()],
            ..schema::Index::default()
        };
        assert!(conv.index(&src, &table, &bad).is_err());
    }

    #[test]
    fn test_foreign_key_arity() {
        let src = users_schema();
        let mapper = TypeMapper::new();
        let resolver = Resolver::default();
        let conv = Converter::new(&mapper, &resolver);
        let table = conv.table(&src).unwrap();
        let fk = schema::ForeignKey {
            name: "bad_fk".into(),
            func: "owner".into(),
            fields: vec!["id".into(), "name".into()],
            ref_table: "users".into(),
            ref_fields: vec!["id".into()],
            ref_func: "user_by_id".into(),
        };
        let err = conv.foreign_key(&src, &table, &fk, Some(&src)).unwrap_err();
        assert!(matches!(err, GenError::ForeignKeyArity { fields: 2, ref_fields: 1, .. }));
    }
}
