// LasQC - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LasQC";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LasQC";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Classification
// =============================================================================

/// Canonical type assigned to curves whose mnemonic is in no alias set.
pub const UNKNOWN_CURVE_TYPE: &str = "unknown";

// =============================================================================
// Catalog limits
// =============================================================================

/// Maximum size of a QC catalog TOML file in bytes.
pub const MAX_CATALOG_FILE_SIZE: u64 = 256 * 1024; // 256 KB

/// Maximum number of canonical curve types in a catalog.
pub const MAX_CURVE_TYPES: usize = 500;

/// Maximum number of checks configured for a single rule set.
pub const MAX_CHECKS_PER_RULE_SET: usize = 32;

/// Default window (samples) for the flat-section check.
pub const DEFAULT_FLAT_WINDOW: usize = 5;

/// Default window (samples) for the monotonic-section check.
pub const DEFAULT_MONOTONIC_WINDOW: usize = 5;

/// Relative tolerance used when comparing consecutive steps in the
/// monotonic-section check.
pub const MONOTONIC_STEP_TOLERANCE: f64 = 1e-9;

// =============================================================================
// LAS reading
// =============================================================================

/// Null value assumed when the ~W section declares none.
pub const DEFAULT_LAS_NULL: f64 = -999.25;

/// Maximum size of a LAS file accepted for analysis.
pub const MAX_LAS_FILE_SIZE: u64 = 512 * 1024 * 1024; // 512 MB

/// Maximum number of curves read from a single LAS file.
pub const MAX_LAS_CURVES: usize = 2_000;

// =============================================================================
// Header identity fallbacks
// =============================================================================

/// Header mnemonic holding the well name.
pub const HEADER_WELL: &str = "WELL";

/// Header mnemonic holding the service company.
pub const HEADER_COMPANY: &str = "SRVC";

/// Header mnemonic holding the logging date.
pub const HEADER_DATE: &str = "DATE";

/// Header mnemonic holding the field name.
pub const HEADER_FIELD: &str = "FLD";

/// Header mnemonic declaring the null sample value.
pub const HEADER_NULL: &str = "NULL";

/// Header mnemonic declaring wrapped data lines.
pub const HEADER_WRAP: &str = "WRAP";

pub const FALLBACK_WELL: &str = "Desconocido";
pub const FALLBACK_COMPANY: &str = "Desconocida";
pub const FALLBACK_DATE: &str = "SinFecha";
pub const FALLBACK_FIELD: &str = "SinCampo";

/// Placeholder used when no service bundle is detected in a file.
pub const NO_SERVICES_LABEL: &str = "NoServices";

// =============================================================================
// Archive
// =============================================================================

/// Extension given to archived copies.
pub const ARCHIVE_EXTENSION: &str = "las";

/// Default archive root, relative to the platform data directory.
pub const ARCHIVE_DIR_NAME: &str = "verified";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Valid values for `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Catalog file name looked up in the config directory when no explicit
/// path is given.
pub const CATALOG_FILE_NAME: &str = "catalog.toml";
