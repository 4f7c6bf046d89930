//! Error types for schemabind.

use thiserror::Error;

/// The main error type for generation.
#[derive(Debug, Error)]
pub enum GenError {
    /// Native SQL type outside the known categories.
    #[error("Unknown native type: '{0}'")]
    UnknownType(String),

    /// Operation or feature not available for the dialect or target.
    #[error("Unsupported {what} for {dialect}")]
    Unsupported { what: String, dialect: &'static str },

    /// Dialect name not recognized.
    #[error("Unknown dialect: '{0}'. Expected: postgres, mysql, sqlite, sqlserver, or oracle")]
    UnknownDialect(String),

    /// Oracle driver variant not recognized.
    #[error("Unsupported oracle type: '{0}'. Expected: ora or godror")]
    UnknownOracleType(String),

    /// Escape target not recognized.
    #[error("Unknown escape target: '{0}'. Expected: none, schema, table, column, or all")]
    UnknownEscape(String),

    /// Query mode with an exec query needs an explicit output file.
    #[error("in query exec mode, the --single or -S must be provided")]
    NoSingle,

    /// Index or foreign key names a column its table does not have.
    #[error("Unknown column '{column}' on table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// Foreign key references a table missing from the schema.
    #[error("Unknown referenced table '{0}'")]
    UnknownTable(String),

    /// Foreign key with mismatched field lists.
    #[error("Foreign key '{name}' has {fields} fields but {ref_fields} referenced fields")]
    ForeignKeyArity {
        name: String,
        fields: usize,
        ref_fields: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema document could not be decoded.
    #[error("Schema error: {0}")]
    Schema(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    /// Create an unsupported-combination error.
    pub fn unsupported(what: impl Into<String>, dialect: &'static str) -> Self {
        Self::Unsupported {
            what: what.into(),
            dialect,
        }
    }

    /// Create an unknown column error.
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Result type alias for generation.
pub type GenResult<T> = Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GenError::unsupported("stored procedures", "sqlite");
        assert_eq!(err.to_string(), "Unsupported stored procedures for sqlite");

        let err = GenError::UnknownType("geometry".into());
        assert_eq!(err.to_string(), "Unknown native type: 'geometry'");
    }
}
