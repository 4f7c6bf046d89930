//! Native SQL type to Python type mapping.
//!
//! Every native type falls into one closed [`Category`]. Arrays map to
//! `list[T]` and nullable columns to `Optional[T]`.

pub mod native;

use std::collections::HashMap;

use crate::error::{GenError, GenResult};
pub use native::NativeType;

const OPTIONAL: &str = "Optional[";
const LIST: &str = "list[";

/// Python types that need neither an import nor a custom package prefix.
pub const KNOWN_TYPES: &[&str] = &[
    "bool",
    "str",
    "bytes",
    "int",
    "float",
    "list[bool]",
    "list[bytes]",
    "list[float]",
    "list[int]",
    "list[str]",
];

/// Native type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Bool,
    Text,
    Integer,
    Float,
    Binary,
    Date,
    Time,
    Timestamp,
    Interval,
}

impl Category {
    /// Classify a parsed native type.
    pub fn of(ty: &NativeType) -> Option<Self> {
        let words: Vec<&str> = ty.words.iter().map(String::as_str).collect();
        let category = match words.as_slice() {
            ["bool" | "boolean", ..] => Self::Bool,
            // a single bit is a flag, anything wider is a bit string
            ["bit"] if ty.args.is_empty() || ty.args == ["1"] => Self::Bool,
            ["bit", ..] => Self::Text,
            // mysql convention for booleans
            ["tinyint", ..] if ty.args.len() == 1 && ty.args[0] == "1" => Self::Bool,
            [
                "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "bigint" | "int2"
                | "int4" | "int8" | "serial" | "serial2" | "serial4" | "serial8" | "smallserial"
                | "bigserial",
                ..,
            ] => Self::Integer,
            ["unsigned", "big", "int"] => Self::Integer,
            ["number", ..] => match ty.args.get(1) {
                Some(scale) if scale != "0" => Self::Float,
                _ => Self::Integer,
            },
            [
                "real" | "float" | "float4" | "float8" | "double" | "decimal" | "dec" | "numeric"
                | "money" | "smallmoney" | "binary_float" | "binary_double",
                ..,
            ] => Self::Float,
            [
                "text" | "char" | "character" | "varchar" | "nchar" | "nvarchar" | "ntext"
                | "varchar2" | "nvarchar2" | "clob" | "nclob" | "tinytext" | "mediumtext"
                | "longtext" | "string" | "uuid" | "uniqueidentifier" | "json" | "jsonb" | "xml"
                | "citext" | "enum" | "set" | "national" | "native" | "varying",
                ..,
            ] => Self::Text,
            ["long", "raw"] => Self::Binary,
            ["long"] => Self::Text,
            [
                "blob" | "bytea" | "binary" | "varbinary" | "tinyblob" | "mediumblob" | "longblob"
                | "image" | "raw",
                ..,
            ] => Self::Binary,
            ["date"] => Self::Date,
            ["time" | "timetz", ..] => Self::Time,
            [
                "timestamp" | "timestamptz" | "datetime" | "datetime2" | "smalldatetime"
                | "datetimeoffset",
                ..,
            ] => Self::Timestamp,
            ["interval", ..] => Self::Interval,
            _ => return None,
        };
        Some(category)
    }

    pub const fn python(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Text => "str",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Binary => "bytes",
            Self::Date => "datetime.date",
            Self::Time => "datetime.time",
            Self::Timestamp => "datetime.datetime",
            Self::Interval => "datetime.timedelta",
        }
    }

    pub const fn zero(&self) -> &'static str {
        match self {
            Self::Bool => "False",
            Self::Text => "\"\"",
            Self::Integer => "0",
            Self::Float => "0.0",
            Self::Binary => "b\"\"",
            Self::Date | Self::Time | Self::Timestamp | Self::Interval => "None",
        }
    }
}

/// A mapped Python type and its zero literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub ty: String,
    pub zero: String,
}

impl MappedType {
    fn new(ty: impl Into<String>, zero: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            zero: zero.into(),
        }
    }
}

/// Maps native types for one run.
#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    /// SQL enum name to Python type name.
    enums: HashMap<String, String>,
    /// Package prefix for custom types.
    custom: Option<String>,
}

impl TypeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_custom(mut self, custom: Option<String>) -> Self {
        self.custom = custom.filter(|c| !c.is_empty());
        self
    }

    /// Register a schema enum so columns of that type map to it.
    pub fn add_enum(&mut self, sql_name: impl Into<String>, python_name: impl Into<String>) {
        self.enums.insert(sql_name.into(), python_name.into());
    }

    /// Map a native type and nullability to a Python type.
    pub fn map(&self, native: &str, nullable: bool) -> GenResult<MappedType> {
        let base = match self.enums.get(native.trim()) {
            Some(name) => MappedType::new(name.clone(), "None"),
            None => self.map_native(&native::parse(native)?, native)?,
        };
        Ok(if nullable {
            MappedType::new(optional(&base.ty), "None")
        } else {
            base
        })
    }

    fn map_native(&self, ty: &NativeType, raw: &str) -> GenResult<MappedType> {
        if ty.dims > 0 {
            let elem = self.map_native(&ty.element(), raw)?;
            return Ok(MappedType::new(format!("{LIST}{}]", elem.ty), "[]"));
        }
        if ty.words.len() == 1 {
            if let Some(name) = self.enums.get(ty.head()) {
                return Ok(MappedType::new(name.clone(), "None"));
            }
        }
        let category =
            Category::of(ty).ok_or_else(|| GenError::UnknownType(raw.trim().to_string()))?;
        Ok(MappedType::new(category.python(), category.zero()))
    }

    /// Prefix the custom package onto a type, looking through `list[` and
    /// `Optional[` wrappers. Dotted and builtin types are left alone.
    pub fn qualify(&self, ty: &str) -> String {
        if ty.contains('.') {
            return ty.to_string();
        }
        let mut inner = ty;
        let mut prefix = String::new();
        let mut suffix = String::new();
        while let Some(rest) = inner
            .strip_prefix(LIST)
            .or_else(|| inner.strip_prefix(OPTIONAL))
        {
            prefix.push_str(&inner[..inner.len() - rest.len()]);
            suffix.push(']');
            inner = rest.strip_suffix(']').unwrap_or(rest);
        }
        match &self.custom {
            Some(custom) if !is_known(inner) => format!("{prefix}{custom}.{inner}{suffix}"),
            _ => format!("{prefix}{inner}{suffix}"),
        }
    }
}

/// Wrap a type in `Optional[...]`.
pub fn optional(ty: &str) -> String {
    format!("{OPTIONAL}{ty}]")
}

/// Strip one `Optional[...]` wrapper, if present.
pub fn unwrap_optional(ty: &str) -> &str {
    ty.strip_prefix(OPTIONAL)
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(ty)
}

pub fn is_optional(ty: &str) -> bool {
    ty.starts_with(OPTIONAL) && ty.ends_with(']')
}

pub fn is_known(ty: &str) -> bool {
    KNOWN_TYPES.contains(&ty)
}

/// Zero literal used when constructing a value of `ty`. Only builtin types
/// keep their specific literal.
pub fn zero_for(ty: &str, zero: &str) -> String {
    if is_known(ty) || zero == "None" {
        zero.to_string()
    } else {
        "None".to_string()
    }
}
