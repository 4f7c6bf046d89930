//! Run configuration.
//!
//! Options come from `schemabind.toml`; the CLI overrides individual keys.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::binding::Emitter;
use crate::error::{GenError, GenResult};
use crate::naming::{NamingOptions, Resolver};
use crate::synth::{Dialect, Escape, OracleType, Synthesizer};
use crate::types::TypeMapper;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "schemabind.toml";

/// What the run generates from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Schema,
    Query,
}

impl FromStr for Mode {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "schema" => Ok(Mode::Schema),
            "query" => Ok(Mode::Query),
            other => Err(GenError::Config(format!(
                "unknown mode '{other}', expected schema or query"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    pub dialect: Dialect,
    /// Schema name prefixed onto tables and routines.
    pub schema: String,
    pub mode: Mode,
    /// Write every binding to this one file.
    pub single: Option<String>,
    /// Package qualifying custom (non-builtin) types.
    pub custom_package: Option<String>,
    /// Identifier kinds to quote: `schema`, `table`, `column`, `all` or `none`.
    pub escape: Vec<String>,
    /// Overrides the variant of an oracle dialect.
    pub oracle_type: Option<OracleType>,
    #[serde(flatten)]
    pub naming: NamingOptions,
}

impl GenerateOptions {
    pub fn from_toml(content: &str) -> GenResult<Self> {
        toml::from_str(content).map_err(|e| GenError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> GenResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| GenError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("loaded config from {}", path.display());
        Self::from_toml(&content)
    }

    /// Load from `explicit`, else `./schemabind.toml`, else the user config
    /// directory. Defaults when none exists.
    pub fn load(explicit: Option<&Path>) -> GenResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::candidates().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("schemabind").join("config.toml"));
        }
        paths
    }

    /// Dialect with the configured oracle variant applied.
    pub fn dialect(&self) -> Dialect {
        match self.oracle_type {
            Some(kind) => self.dialect.with_oracle_type(kind),
            None => self.dialect,
        }
    }

    pub fn escape(&self) -> GenResult<Escape> {
        Escape::parse(&self.escape)
    }

    /// Emitter wired with this run's dialect, types and naming.
    pub fn emitter(&self) -> GenResult<Emitter> {
        let synth = Synthesizer::new(self.dialect(), self.schema.clone(), self.escape()?);
        let mapper = TypeMapper::new().with_custom(self.custom_package.clone());
        Ok(Emitter::new(synth, mapper, Resolver::new(&self.naming)))
    }
}
