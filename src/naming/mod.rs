//! Identifier resolution.
//!
//! Turns SQL names into Python identifiers and derives the short binding
//! names used for receivers (`ua` for `UserAccount`). Short names are
//! cached in a [`NameRegistry`] owned by the run's [`Resolver`]; the
//! registry only ever grows, so the first derivation for a type wins.

pub mod inflect;
pub mod reserved;

use std::collections::{BTreeMap, HashMap, HashSet};

use convert_case::{Boundary, Case, Casing};
use serde::{Deserialize, Serialize};

use reserved::{BUILTIN_SHORTS, PYTHON_RESERVED, TEMPLATE_RESERVED};

/// Word dropped when deriving short names.
const SHORT_STOP_WORD: &str = "id";

/// Digits stay attached to the word they follow or precede. A digit followed
/// by an upper-case letter still starts a new word (`Ipv4Address`).
const DIGIT_JOINS: [Boundary; 3] = [
    Boundary::LowerDigit,
    Boundary::UpperDigit,
    Boundary::DigitLower,
];

/// Identifier case styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentCase {
    /// `user_account`
    #[default]
    Snake,
    /// `userAccount`
    Camel,
    /// `UserAccount`
    Pascal,
}

/// Naming options, supplied once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingOptions {
    /// Appended to short names that collide with template-reserved words.
    pub conflict_suffix: String,
    /// Words rendered fully upper-case in camel and pascal identifiers.
    pub initialisms: Vec<String>,
    /// Additional template-reserved words.
    pub reserved: Vec<String>,
    /// Additional reserved-word substitutions.
    pub substitutions: BTreeMap<String, String>,
    /// Case style of generated field identifiers.
    pub field_case: IdentCase,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            conflict_suffix: "Val".to_string(),
            initialisms: Vec::new(),
            reserved: Vec::new(),
            substitutions: BTreeMap::new(),
            field_case: IdentCase::Snake,
        }
    }
}

/// Append-only map from type name to short name.
#[derive(Debug, Clone)]
pub struct NameRegistry {
    shorts: HashMap<String, String>,
}

impl Default for NameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NameRegistry {
    /// A registry seeded with the builtin Python type shorts.
    pub fn new() -> Self {
        let shorts = BUILTIN_SHORTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { shorts }
    }

    pub fn get(&self, type_name: &str) -> Option<&str> {
        self.shorts.get(type_name).map(String::as_str)
    }

    /// Register a short name unless one already exists; returns the stored one.
    pub fn register(&mut self, type_name: &str, short: String) -> &str {
        self.shorts.entry(type_name.to_string()).or_insert(short)
    }

    pub fn len(&self) -> usize {
        self.shorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shorts.is_empty()
    }
}

/// Run-scoped identifier resolver.
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: NameRegistry,
    substitutes: HashMap<String, String>,
    template_reserved: HashSet<String>,
    initialisms: HashSet<String>,
    conflict_suffix: String,
    field_case: IdentCase,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(&NamingOptions::default())
    }
}

impl Resolver {
    pub fn new(opts: &NamingOptions) -> Self {
        let mut substitutes: HashMap<String, String> = PYTHON_RESERVED
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        substitutes.extend(opts.substitutions.clone());

        let template_reserved = TEMPLATE_RESERVED
            .iter()
            .map(|s| s.to_string())
            .chain(opts.reserved.iter().filter(|s| !s.is_empty()).cloned())
            .collect();

        let initialisms = opts
            .initialisms
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_ascii_uppercase())
            .collect();

        Self {
            registry: NameRegistry::new(),
            substitutes,
            template_reserved,
            initialisms,
            conflict_suffix: opts.conflict_suffix.clone(),
            field_case: opts.field_case,
        }
    }

    pub fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    /// Split a name into lowercase words.
    pub fn words(name: &str) -> Vec<String> {
        name.remove_boundaries(&DIGIT_JOINS)
            .to_case(Case::Snake)
            .split('_')
            .map(|w| {
                w.chars()
                    .filter(|c| c.is_alphanumeric())
                    .collect::<String>()
            })
            .filter(|w| !w.is_empty())
            .collect()
    }

    /// Convert a SQL name into an identifier of the given case.
    pub fn resolve(&self, sql_name: &str, case: IdentCase) -> String {
        let words = Self::words(sql_name);
        let ident = match case {
            IdentCase::Snake => words.join("_"),
            IdentCase::Pascal => words.iter().map(|w| self.capitalize(w)).collect(),
            IdentCase::Camel => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.clone() } else { self.capitalize(w) })
                .collect(),
        };
        match ident.chars().next() {
            None => "_".to_string(),
            Some(c) if c.is_ascii_digit() => format!("_{ident}"),
            Some(_) => ident,
        }
    }

    fn capitalize(&self, word: &str) -> String {
        let upper = word.to_ascii_uppercase();
        if self.initialisms.contains(&upper) {
            return upper;
        }
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Substitute reserved Python words. Case-sensitive.
    pub fn check_reserved(&self, name: &str) -> String {
        self.substitutes
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Short binding name for a type, e.g. `ua` for `UserAccount`.
    ///
    /// The first derivation for a type name is cached and returned unchanged
    /// by every later call.
    pub fn short_name(&mut self, type_name: &str) -> String {
        if let Some(short) = self.registry.get(type_name) {
            return short.to_string();
        }

        let words = Self::words(type_name);
        let mut short: String = words
            .iter()
            .filter(|w| w.as_str() != SHORT_STOP_WORD)
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_lowercase)
            .collect();
        if short.is_empty() {
            // every word was a stop word
            short = words
                .first()
                .and_then(|w| w.chars().next())
                .map(|c| c.to_lowercase().collect())
                .unwrap_or_else(|| "v".to_string());
        }

        if short.starts_with(|c: char| c.is_ascii_digit()) {
            short.insert(0, '_');
        }
        let short = self.check_template(self.check_reserved(&short));

        tracing::debug!("short name {} -> {}", type_name, short);
        self.registry.register(type_name, short).to_string()
    }

    /// Parameter name for a field identifier: first word lowercased, then
    /// checked against the reserved words.
    pub fn param_name(&self, ident: &str) -> String {
        let first_len = Self::words(ident).first().map_or(0, String::len);
        let name = match ident.get(..first_len) {
            Some(head) if first_len > 0 && head.chars().all(char::is_alphanumeric) => {
                format!("{}{}", head.to_lowercase(), &ident[first_len..])
            }
            _ => ident.to_string(),
        };
        let name = match self.substitutes.get(&name.to_lowercase()) {
            Some(sub) => sub.clone(),
            None => name,
        };
        self.check_template(name)
    }

    /// Append the conflict suffix to a name the generated code binds itself,
    /// such as `cursor`.
    pub fn check_template(&self, name: String) -> String {
        if self.template_reserved.contains(&name) {
            format!("{name}{}", self.conflict_suffix)
        } else {
            name
        }
    }

    /// Make identifiers unique within one unit. A repeated identifier gets
    /// the conflict suffix until it is free.
    pub fn dedupe<'n>(&self, names: impl IntoIterator<Item = &'n mut String>) {
        let suffix = if self.conflict_suffix.is_empty() {
            "_"
        } else {
            self.conflict_suffix.as_str()
        };
        let mut seen = HashSet::new();
        for name in names {
            while !seen.insert(name.clone()) {
                name.push_str(suffix);
            }
        }
    }

    /// Python class name for a table, view or query type.
    pub fn type_name(&self, sql_name: &str) -> String {
        self.resolve(&inflect::singularize(sql_name), IdentCase::Pascal)
    }

    /// Field identifier in the configured case, reserved-word safe.
    pub fn field_name(&self, sql_name: &str) -> String {
        self.check_reserved(&self.resolve(sql_name, self.field_case))
    }

    /// Snake identifier for functions, methods, enums and procs.
    pub fn func_name(&self, name: &str) -> String {
        self.resolve(name, IdentCase::Snake)
    }

    /// Python name for an enum value, without a trailing copy of the enum name.
    pub fn enum_value_name(&self, enum_name: &str, value: &str) -> String {
        let name = self.resolve(&value.to_lowercase(), IdentCase::Snake);
        let trimmed = match name.strip_suffix(enum_name) {
            Some(rest) if name != enum_name => rest.trim_end_matches('_'),
            _ => name.as_str(),
        };
        if trimmed.is_empty() {
            name.clone()
        } else {
            self.check_reserved(trimmed)
        }
    }

    /// Distinct name for an overloaded procedure, derived from its params.
    ///
    /// Params named positionally (`p0`, `p1`, ...) use their SQL type instead.
    pub fn overloaded_name(&self, name: &str, params: &[(String, String)]) -> String {
        if params.is_empty() {
            return name.to_string();
        }
        let names: Vec<String> = params
            .iter()
            .enumerate()
            .map(|(i, (sql_name, sql_type))| {
                if *sql_name == format!("p{i}") {
                    self.func_name(&sql_type.split(' ').collect::<Vec<_>>().join("_"))
                } else {
                    self.func_name(sql_name)
                }
            })
            .collect();
        match names.as_slice() {
            [only] => format!("{name}_by_{only}"),
            [front @ .., last] => format!("{name}_by_{}_and_{last}", front.concat()),
            [] => name.to_string(),
        }
    }
}
