//! Reserved word tables.

/// Python keywords and builtin type names with their substitutes.
///
/// Lookup is case-sensitive on the already-cased identifier.
pub const PYTHON_RESERVED: &[(&str, &str)] = &[
    ("False", "false"),
    ("None", "none"),
    ("True", "true"),
    ("and", "and_"),
    ("as", "as_"),
    ("assert", "assrt"),
    ("async", "async_"),
    ("await", "await_"),
    ("break", "brk"),
    ("class", "cls"),
    ("continue", "cnt"),
    ("def", "def_"),
    ("del", "del_"),
    ("elif", "elf"),
    ("else", "els"),
    ("except", "expt"),
    ("finally", "fnl"),
    ("for", "for_"),
    ("from", "frm"),
    ("global", "glb"),
    ("if", "if_"),
    ("import", "impt"),
    ("in", "in_"),
    ("is", "is_"),
    ("lambda", "lbd"),
    ("nonlocal", "nlcl"),
    ("not", "not_"),
    ("or", "or_"),
    ("pass", "pss"),
    ("raise", "rse"),
    ("return", "rtn"),
    ("try", "try_"),
    ("while", "whl"),
    ("with", "wth"),
    ("yield", "yld"),
    // builtin types
    ("int", "i"),
    ("float", "f"),
    ("complex", "c"),
    ("list", "l"),
    ("tuple", "tpl"),
    ("range", "r"),
    ("str", "s"),
    ("bytes", "b"),
    ("bytearray", "ba"),
    ("memoryview", "m"),
    ("set", "st"),
    ("frozenset", "fs"),
    ("dict", "d"),
    ("type", "typ"),
    ("bool", "bl"),
];

/// Names the generated code itself binds. A short name equal to one of
/// these gets the conflict suffix.
pub const TEMPLATE_RESERVED: &[&str] = &[
    // variables
    "ctx", "cursor", "db", "err", "log", "logf", "res", "rows", "sqlstr",
    // modules
    "context", "csv", "driver", "errors", "fmt", "hstore", "regexp", "sql", "strings", "time",
    "uuid",
];

/// Shorts for the builtin Python types, seeded into every registry.
pub const BUILTIN_SHORTS: &[(&str, &str)] = &[
    ("bool", "b"),
    ("str", "s"),
    ("bytes", "b"),
    ("int", "i"),
    ("float", "f"),
    ("list[bool]", "l"),
    ("list[bytes]", "l"),
    ("list[float]", "l"),
    ("list[int]", "l"),
    ("list[str]", "l"),
];
