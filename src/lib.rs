//! # schemabind: dialect-aware data-access bindings for Python
//!
//! Reads relational schema metadata and produces, per table, index, foreign
//! key, procedure, enum and custom query, a binding document: Python
//! identifiers and types, function signatures, and the SQL statements for
//! postgres, mysql, sqlite, sqlserver or oracle.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use schemabind::prelude::*;
//!
//! let set = Set::load("schema.json")?;
//! let opts = GenerateOptions { dialect: Dialect::MySQL, ..Default::default() };
//! let out = generate(&set, opts)?;
//! for (file, bindings) in &out.files {
//!     println!("{file}: {} unit(s)", bindings.len());
//! }
//! ```
//!
//! ## Placeholders
//!
//! | Dialect   | Placeholder |
//! |-----------|-------------|
//! | postgres  | `$1`        |
//! | mysql     | `?`         |
//! | sqlite    | `?`         |
//! | sqlserver | `@p1`       |
//! | oracle    | `:1`        |

pub mod binding;
pub mod config;
pub mod error;
pub mod generate;
pub mod model;
pub mod naming;
pub mod schema;
pub mod synth;
pub mod types;

pub mod prelude {
    pub use crate::binding::{Binding, Emitter};
    pub use crate::config::{GenerateOptions, Mode};
    pub use crate::error::*;
    pub use crate::generate::{Failure, Generator, Output, generate};
    pub use crate::naming::{NamingOptions, Resolver};
    pub use crate::schema::Set;
    pub use crate::synth::{Dialect, Escape, Operation, OracleType, Statement, Synthesizer, Target};
    pub use crate::types::TypeMapper;
}

pub use generate::generate;
