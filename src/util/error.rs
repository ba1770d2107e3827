// LasQC - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every error keeps its causal chain
// for diagnostic logging.
//
// The evaluation core (classification, rules, header, services) never
// returns these to its caller: check failures are downgraded to
// `RuleStatus::Error` values. These types cover loading and I/O only.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LasQC operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LasQcError {
    /// QC catalog loading or validation failed.
    Catalog(CatalogError),

    /// LAS file reading failed.
    Las(LasError),

    /// Report export failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Copying an approved file to the archive failed.
    Archive(ArchiveError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LasQcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(e) => write!(f, "Catalog error: {e}"),
            Self::Las(e) => write!(f, "LAS error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Archive(e) => write!(f, "Archive error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LasQcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog(e) => Some(e),
            Self::Las(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Archive(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

/// Errors related to QC catalog loading and validation.
#[derive(Debug)]
pub enum CatalogError {
    /// TOML file could not be parsed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Catalog file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A canonical curve type is declared twice in the alias table.
    DuplicateCurveType { curve_type: String },

    /// A service bundle name is declared twice.
    DuplicateService { name: String },

    /// A header requirement mnemonic is declared twice.
    DuplicateHeader { mnemonic: String },

    /// A rule set or service refers to a curve type missing from the alias table.
    UnknownCurveType {
        context: String,
        curve_type: String,
    },

    /// A rule refers to a check name that is not in the registry.
    UnknownCheck { curve_type: String, check: String },

    /// A check was configured with invalid parameters.
    InvalidCheckParams {
        curve_type: String,
        check: String,
        reason: String,
    },

    /// A required field is missing or empty.
    MissingField {
        context: String,
        field: &'static str,
    },

    /// Too many entries in a catalog table.
    TooManyEntries {
        table: &'static str,
        count: usize,
        max: usize,
    },

    /// I/O error reading a catalog file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse TOML '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Catalog '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::DuplicateCurveType { curve_type } => {
                write!(f, "Curve type '{curve_type}' is declared more than once")
            }
            Self::DuplicateService { name } => {
                write!(f, "Service '{name}' is declared more than once")
            }
            Self::DuplicateHeader { mnemonic } => {
                write!(f, "Header requirement '{mnemonic}' is declared more than once")
            }
            Self::UnknownCurveType {
                context,
                curve_type,
            } => write!(
                f,
                "{context}: curve type '{curve_type}' is not declared in the alias table"
            ),
            Self::UnknownCheck { curve_type, check } => {
                write!(f, "Rules for '{curve_type}': unknown check '{check}'")
            }
            Self::InvalidCheckParams {
                curve_type,
                check,
                reason,
            } => write!(
                f,
                "Rules for '{curve_type}': invalid parameters for '{check}': {reason}"
            ),
            Self::MissingField { context, field } => {
                write!(f, "{context}: missing required field '{field}'")
            }
            Self::TooManyEntries { table, count, max } => {
                write!(f, "Too many entries in '{table}' ({count}), maximum is {max}")
            }
            Self::Io { path, source } => {
                write!(
                    f,
                    "I/O error reading catalog '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<CatalogError> for LasQcError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

// ---------------------------------------------------------------------------
// LAS errors
// ---------------------------------------------------------------------------

/// Errors related to reading a LAS file.
#[derive(Debug)]
pub enum LasError {
    /// The file has no ~A (ASCII data) section.
    MissingDataSection,

    /// The ~C section declares no curves.
    NoCurves,

    /// Wrapped data (`WRAP YES`) is not supported.
    WrappedUnsupported,

    /// Too many curves declared.
    TooManyCurves { count: usize, max: usize },

    /// A value in the ~A section is not a number.
    InvalidValue {
        line_number: usize,
        raw: String,
    },

    /// A data row does not have one value per curve.
    ColumnMismatch {
        line_number: usize,
        expected: usize,
        found: usize,
    },

    /// A header line could not be parsed.
    MalformedLine {
        line_number: usize,
        section: char,
    },

    /// File exceeds the maximum accepted size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// I/O error while reading a LAS file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for LasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDataSection => write!(f, "no ~A data section found"),
            Self::NoCurves => write!(f, "~C section declares no curves"),
            Self::WrappedUnsupported => {
                write!(f, "wrapped data (WRAP YES) is not supported")
            }
            Self::TooManyCurves { count, max } => {
                write!(f, "file declares {count} curves, maximum is {max}")
            }
            Self::InvalidValue { line_number, raw } => {
                write!(f, "line {line_number}: '{raw}' is not a number")
            }
            Self::ColumnMismatch {
                line_number,
                expected,
                found,
            } => write!(
                f,
                "line {line_number}: expected {expected} values, found {found}"
            ),
            Self::MalformedLine {
                line_number,
                section,
            } => write!(f, "line {line_number}: malformed ~{section} header line"),
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "'{}': I/O error: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<LasError> for LasQcError {
    fn from(e: LasError) -> Self {
        Self::Las(e)
    }
}

// ---------------------------------------------------------------------------
// Check errors
// ---------------------------------------------------------------------------

/// A quality check could not reach a verdict.
///
/// Never propagated past the rule evaluator; surfaces as `RuleStatus::Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckError {
    /// Not enough valid (non-null) samples to evaluate the check.
    InsufficientData { needed: usize, found: usize },

    /// The check panicked; the payload message is kept when it is a string.
    Panicked { message: String },
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData { needed, found } => write!(
                f,
                "insufficient data: needs {needed} valid samples, found {found}"
            ),
            Self::Panicked { message } => write!(f, "check panicked: {message}"),
        }
    }
}

impl std::error::Error for CheckError {}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to report export.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for LasQcError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LasQcError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Archive errors
// ---------------------------------------------------------------------------

/// Errors related to copying an approved file into the archive.
#[derive(Debug)]
pub enum ArchiveError {
    /// The analysis did not approve the file.
    NotApproved,

    /// The source file does not exist.
    SourceNotFound { path: PathBuf },

    /// The destination directory could not be created.
    CreateDir { path: PathBuf, source: io::Error },

    /// Copying the file failed.
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApproved => {
                write!(f, "file was not approved; header or services do not comply")
            }
            Self::SourceNotFound { path } => {
                write!(f, "source file '{}' does not exist", path.display())
            }
            Self::CreateDir { path, source } => write!(
                f,
                "cannot create archive directory '{}': {source}",
                path.display()
            ),
            Self::Copy { from, to, source } => write!(
                f,
                "cannot copy '{}' to '{}': {source}",
                from.display(),
                to.display()
            ),
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Copy { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ArchiveError> for LasQcError {
    fn from(e: ArchiveError) -> Self {
        Self::Archive(e)
    }
}

/// Convenience type alias for LasQC results.
pub type Result<T> = std::result::Result<T, LasQcError>;
