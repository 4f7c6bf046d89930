use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::synth::sql::mysql::MysqlGenerator;
use crate::synth::sql::oracle::OracleGenerator;
use crate::synth::sql::postgres::PostgresGenerator;
use crate::synth::sql::sqlite::SqliteGenerator;
use crate::synth::sql::sqlserver::SqlServerGenerator;
use crate::synth::traits::SqlDialect;

/// Oracle driver variants; they retrieve generated keys differently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleType {
    #[default]
    Ora,
    Godror,
}

impl FromStr for OracleType {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ora" => Ok(Self::Ora),
            "godror" => Ok(Self::Godror),
            _ => Err(GenError::UnknownOracleType(s.to_string())),
        }
    }
}

/// Supported SQL Dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    #[default]
    Postgres,
    MySQL,
    SQLite,
    SqlServer,
    Oracle(OracleType),
}

impl Dialect {
    pub fn generator(&self) -> Box<dyn SqlDialect> {
        match self {
            Dialect::Postgres => Box::new(PostgresGenerator),
            Dialect::MySQL => Box::new(MysqlGenerator),
            Dialect::SQLite => Box::new(SqliteGenerator),
            Dialect::SqlServer => Box::new(SqlServerGenerator),
            Dialect::Oracle(kind) => Box::new(OracleGenerator { kind: *kind }),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySQL => "mysql",
            Dialect::SQLite => "sqlite",
            Dialect::SqlServer => "sqlserver",
            Dialect::Oracle(_) => "oracle",
        }
    }

    /// Replace the oracle variant; other dialects are returned unchanged.
    pub fn with_oracle_type(self, kind: OracleType) -> Self {
        match self {
            Dialect::Oracle(_) => Dialect::Oracle(kind),
            other => other,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pgsql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySQL),
            "sqlite" | "sqlite3" => Ok(Dialect::SQLite),
            "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            "oracle" | "ora" => Ok(Dialect::Oracle(OracleType::Ora)),
            "godror" => Ok(Dialect::Oracle(OracleType::Godror)),
            _ => Err(GenError::UnknownDialect(s.to_string())),
        }
    }
}

impl Serialize for Dialect {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Dialect {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialect() {
        assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("sqlite3".parse::<Dialect>().unwrap(), Dialect::SQLite);
        assert_eq!(
            "oracle".parse::<Dialect>().unwrap(),
            Dialect::Oracle(OracleType::Ora)
        );
        let err = "db2".parse::<Dialect>().unwrap_err();
        assert!(err.to_string().contains("db2"));
    }

    #[test]
    fn test_oracle_type() {
        assert_eq!("godror".parse::<OracleType>().unwrap(), OracleType::Godror);
        let err = "oci8".parse::<OracleType>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported oracle type: 'oci8'. Expected: ora or godror");
        assert_eq!(
            Dialect::Oracle(OracleType::Ora).with_oracle_type(OracleType::Godror),
            Dialect::Oracle(OracleType::Godror)
        );
        assert_eq!(Dialect::MySQL.with_oracle_type(OracleType::Godror), Dialect::MySQL);
    }
}
