use std::fmt;
use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ErrorClass – the closed set of failure classes surfaced to callers
// ---------------------------------------------------------------------------

/// Coarse failure class of a catalog load.
///
/// Callers use this to tell "bad input" apart from "out of resources", e.g.
/// to abort a whole run on [`ErrorClass::Memory`] but skip one catalog on
/// [`ErrorClass::File`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The container or group could not be opened.
    File,
    /// An allocation failed.
    Memory,
    /// Column read failure, length mismatch or any other fault.
    Generic,
}

impl ErrorClass {
    /// Stable numeric code, also used as the process exit status.
    pub fn code(self) -> u8 {
        match self {
            ErrorClass::Generic => 1,
            ErrorClass::File => 2,
            ErrorClass::Memory => 3,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorClass::File => write!(f, "FILE_ERROR"),
            ErrorClass::Memory => write!(f, "MEMORY_ERROR"),
            ErrorClass::Generic => write!(f, "GENERIC_ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnError – failures of a single column read
// ---------------------------------------------------------------------------

/// The step of a column read that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnErrorKind {
    NotFound,
    Shape,
    Dimension,
    OutOfMemory,
    Read,
}

#[derive(Debug, Error)]
pub enum ColumnError {
    #[error("column '{column}' not found at {}", .path.display())]
    NotFound { column: String, path: PathBuf },

    #[error("failed to get the shape descriptor of column '{column}'")]
    Shape {
        column: String,
        #[source]
        source: ParquetError,
    },

    #[error("column '{column}' has no one-dimensional extent: {detail}")]
    Dimension { column: String, detail: String },

    #[error("failed to allocate {len} values for column '{column}'")]
    OutOfMemory { column: String, len: usize },

    #[error("failed to read from column '{column}'")]
    Read {
        column: String,
        #[source]
        source: ArrowError,
    },

    #[error("failed to read from column '{column}': {detail}")]
    Malformed { column: String, detail: String },
}

impl ColumnError {
    pub fn kind(&self) -> ColumnErrorKind {
        match self {
            ColumnError::NotFound { .. } => ColumnErrorKind::NotFound,
            ColumnError::Shape { .. } => ColumnErrorKind::Shape,
            ColumnError::Dimension { .. } => ColumnErrorKind::Dimension,
            ColumnError::OutOfMemory { .. } => ColumnErrorKind::OutOfMemory,
            ColumnError::Read { .. } | ColumnError::Malformed { .. } => ColumnErrorKind::Read,
        }
    }

    /// Name of the column that failed.
    pub fn column(&self) -> &str {
        match self {
            ColumnError::NotFound { column, .. }
            | ColumnError::Shape { column, .. }
            | ColumnError::Dimension { column, .. }
            | ColumnError::OutOfMemory { column, .. }
            | ColumnError::Read { column, .. }
            | ColumnError::Malformed { column, .. } => column,
        }
    }
}

// ---------------------------------------------------------------------------
// LoadError – failures of a whole catalog load
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open the catalog container {}", .path.display())]
    ContainerOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open the group '{group}' of {}", .path.display())]
    GroupOpen {
        path: PathBuf,
        group: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read the column '{column}' of group '{group}' in {}", .path.display())]
    Column {
        path: PathBuf,
        group: String,
        column: String,
        #[source]
        source: ColumnError,
    },

    #[error(
        "the sizes of the columns are not compatible in {}: {} ({}), {} ({}), {} ({})",
        .path.display(),
        .columns[0], .lengths[0], .columns[1], .lengths[1], .columns[2], .lengths[2]
    )]
    LengthMismatch {
        path: PathBuf,
        columns: [String; 3],
        lengths: [usize; 3],
    },

    #[error("failed to allocate {records} records for {}", .path.display())]
    OutOfMemory { path: PathBuf, records: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LoadError {
    pub fn class(&self) -> ErrorClass {
        match self {
            LoadError::ContainerOpen { .. } | LoadError::GroupOpen { .. } => ErrorClass::File,
            LoadError::OutOfMemory { .. } => ErrorClass::Memory,
            LoadError::Column { .. } | LoadError::LengthMismatch { .. } | LoadError::Config(_) => {
                ErrorClass::Generic
            }
        }
    }

    /// Column-level failure kind, for errors raised by a column read.
    pub fn column_kind(&self) -> Option<ColumnErrorKind> {
        match self {
            LoadError::Column { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading configuration file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parsing configuration file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("empty {role} column name for catalog {}", .path.display())]
    EmptyColumnName { path: PathBuf, role: &'static str },

    #[error("no catalogs configured")]
    NoCatalogs,
}
