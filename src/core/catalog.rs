// LasQC - core/catalog.rs
//
// QC catalog loading and validation: alias table, rule table, header
// requirements, service catalog, and unit expectations, all from one TOML
// document. Core layer: accepts TOML strings, never touches the filesystem.
// I/O is handled by app::catalog_mgr which feeds content here.
//
// A compiled catalog is immutable and shared read-only by every analysis.

use crate::core::checks::{self, CheckSpec, QualityCheck};
use crate::core::classify::{AliasEntry, AliasTable};
use crate::core::header::HeaderRequirement;
use crate::core::rules::{RuleSet, RuleTable};
use crate::core::services::{ServiceCatalog, ServiceDef};
use crate::util::constants;
use crate::util::error::CatalogError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// =============================================================================
// TOML deserialization structures (raw input)
// =============================================================================

/// Raw catalog as deserialized from TOML.
/// Validated and compiled into a `QcCatalog` for runtime use.
#[derive(Debug, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default)]
    pub catalog: CatalogMeta,
    #[serde(default)]
    pub alias: Vec<AliasDef>,
    #[serde(default)]
    pub rules: RulesDef,
    #[serde(default)]
    pub units: UnitsDef,
    #[serde(default)]
    pub header: Vec<HeaderRequirementDef>,
    #[serde(default)]
    pub service: Vec<ServiceDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogMeta {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for CatalogMeta {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
        }
    }
}

fn default_name() -> String {
    "Unnamed catalog".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Debug, Deserialize)]
pub struct AliasDef {
    #[serde(rename = "type")]
    pub curve_type: String,
    pub mnemonics: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RulesDef {
    /// Default list for unknown types and types without a rule set.
    #[serde(default)]
    pub each: Vec<CheckSpec>,
    #[serde(default)]
    pub curve: Vec<RuleSetDef>,
}

#[derive(Debug, Deserialize)]
pub struct RuleSetDef {
    #[serde(rename = "type")]
    pub curve_type: String,
    pub checks: Vec<CheckSpec>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UnitsDef {
    /// Units accepted by `unit_conformance` when a check gives none.
    #[serde(default)]
    pub accepted: Vec<String>,
    /// Expected unit per canonical type, for display.
    #[serde(default)]
    pub expected: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct HeaderRequirementDef {
    pub mnemonic: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ServiceDefinition {
    pub name: String,
    pub curves: Vec<String>,
}

// =============================================================================
// Compiled catalog
// =============================================================================

/// Runtime catalog: every static table the analysis consults.
#[derive(Debug)]
pub struct QcCatalog {
    pub name: String,
    pub version: String,
    pub aliases: AliasTable,
    pub rules: RuleTable,
    pub header: Vec<HeaderRequirement>,
    pub services: ServiceCatalog,
    /// Expected unit per canonical type.
    pub expected_units: HashMap<String, String>,
    /// Whether this is the catalog embedded in the binary.
    pub is_builtin: bool,
}

impl QcCatalog {
    pub fn expected_unit(&self, curve_type: &str) -> Option<&str> {
        self.expected_units.get(curve_type).map(String::as_str)
    }
}

/// Parse a TOML string into a `CatalogDefinition`.
///
/// `source_path` is used for error messages only (not for I/O).
pub fn parse_catalog_toml(
    toml_content: &str,
    source_path: &Path,
) -> Result<CatalogDefinition, CatalogError> {
    toml::from_str(toml_content).map_err(|e| CatalogError::TomlParse {
        path: source_path.to_path_buf(),
        source: e,
    })
}

/// Validate a `CatalogDefinition` and compile it into a runtime `QcCatalog`.
///
/// Validates:
/// - Curve types, service names, and header mnemonics are non-empty and unique
/// - Every rule set and service names a type declared in the alias table
/// - Every check name is registered and its parameters are valid
pub fn validate_and_compile(
    def: CatalogDefinition,
    is_builtin: bool,
) -> Result<QcCatalog, CatalogError> {
    if def.alias.len() > constants::MAX_CURVE_TYPES {
        return Err(CatalogError::TooManyEntries {
            table: "alias",
            count: def.alias.len(),
            max: constants::MAX_CURVE_TYPES,
        });
    }

    // -- Alias table --
    let mut alias_entries: Vec<AliasEntry> = Vec::with_capacity(def.alias.len());
    for a in def.alias {
        if a.curve_type.trim().is_empty() {
            return Err(CatalogError::MissingField {
                context: "alias".to_string(),
                field: "type",
            });
        }
        if alias_entries.iter().any(|e| e.curve_type == a.curve_type) {
            return Err(CatalogError::DuplicateCurveType {
                curve_type: a.curve_type,
            });
        }
        for m in &a.mnemonics {
            if let Some(first) = alias_entries.iter().find(|e| e.mnemonics.contains(m)) {
                tracing::debug!(
                    mnemonic = %m,
                    first = %first.curve_type,
                    shadowed = %a.curve_type,
                    "Mnemonic listed under two types; first declared wins"
                );
            }
        }
        alias_entries.push(AliasEntry {
            curve_type: a.curve_type,
            mnemonics: a.mnemonics,
        });
    }
    let aliases = AliasTable::new(alias_entries);

    // -- Rule table --
    let accepted = &def.units.accepted;
    let each = compile_checks("Each", &def.rules.each, accepted)?;
    let mut sets: Vec<RuleSet> = Vec::with_capacity(def.rules.curve.len());
    for set in &def.rules.curve {
        if !aliases.contains_type(&set.curve_type) {
            return Err(CatalogError::UnknownCurveType {
                context: "rules.curve".to_string(),
                curve_type: set.curve_type.clone(),
            });
        }
        if sets.iter().any(|s| s.curve_type == set.curve_type) {
            return Err(CatalogError::DuplicateCurveType {
                curve_type: set.curve_type.clone(),
            });
        }
        sets.push(RuleSet {
            curve_type: set.curve_type.clone(),
            checks: compile_checks(&set.curve_type, &set.checks, accepted)?,
        });
    }
    let rules = RuleTable::new(sets, each);

    // -- Header requirements --
    let mut header: Vec<HeaderRequirement> = Vec::with_capacity(def.header.len());
    for h in &def.header {
        if h.mnemonic.trim().is_empty() {
            return Err(CatalogError::MissingField {
                context: "header".to_string(),
                field: "mnemonic",
            });
        }
        if header.iter().any(|r| r.mnemonic == h.mnemonic) {
            return Err(CatalogError::DuplicateHeader {
                mnemonic: h.mnemonic.clone(),
            });
        }
        header.push(HeaderRequirement::new(&h.mnemonic, &h.description));
    }

    // -- Services --
    let mut services: Vec<ServiceDef> = Vec::with_capacity(def.service.len());
    for s in def.service {
        if s.name.trim().is_empty() {
            return Err(CatalogError::MissingField {
                context: "service".to_string(),
                field: "name",
            });
        }
        if s.curves.is_empty() {
            return Err(CatalogError::MissingField {
                context: format!("service '{}'", s.name),
                field: "curves",
            });
        }
        if services.iter().any(|d| d.name == s.name) {
            return Err(CatalogError::DuplicateService { name: s.name });
        }
        if let Some(undeclared) = s.curves.iter().find(|t| !aliases.contains_type(t)) {
            return Err(CatalogError::UnknownCurveType {
                context: format!("service '{}'", s.name),
                curve_type: undeclared.clone(),
            });
        }
        services.push(ServiceDef {
            name: s.name,
            curve_types: s.curves,
        });
    }

    for curve_type in def.units.expected.keys() {
        if !aliases.contains_type(curve_type) {
            tracing::warn!(
                curve_type = %curve_type,
                "Expected unit declared for a type missing from the alias table"
            );
        }
    }

    Ok(QcCatalog {
        name: def.catalog.name,
        version: def.catalog.version,
        aliases,
        rules,
        header,
        services: ServiceCatalog::new(services),
        expected_units: def.units.expected,
        is_builtin,
    })
}

fn compile_checks(
    curve_type: &str,
    specs: &[CheckSpec],
    accepted_units: &[String],
) -> Result<Vec<Box<dyn QualityCheck>>, CatalogError> {
    if specs.len() > constants::MAX_CHECKS_PER_RULE_SET {
        return Err(CatalogError::TooManyEntries {
            table: "rules",
            count: specs.len(),
            max: constants::MAX_CHECKS_PER_RULE_SET,
        });
    }

    let mut compiled: Vec<Box<dyn QualityCheck>> = Vec::with_capacity(specs.len());
    for spec in specs {
        // Outcomes are keyed by check id, so an id may appear once per list.
        if compiled.iter().any(|c| c.id() == spec.check) {
            return Err(CatalogError::InvalidCheckParams {
                curve_type: curve_type.to_string(),
                check: spec.check.clone(),
                reason: "listed more than once".to_string(),
            });
        }
        compiled.push(checks::build_check(spec, accepted_units, curve_type)?);
    }
    Ok(compiled)
}

// =============================================================================
// Built-in catalog (embedded at compile time)
// =============================================================================

/// Embedded TOML content of the built-in catalog.
pub const BUILTIN_CATALOG: &str = include_str!("../../catalog/default.toml");

/// Load and validate the built-in catalog.
pub fn load_builtin_catalog() -> Result<QcCatalog, CatalogError> {
    let path = PathBuf::from("<builtin>/default.toml");
    let catalog = parse_catalog_toml(BUILTIN_CATALOG, &path)
        .and_then(|def| validate_and_compile(def, true))?;
    tracing::debug!(
        name = %catalog.name,
        curve_types = catalog.aliases.entries().len(),
        services = catalog.services.services().len(),
        "Loaded built-in catalog"
    );
    Ok(catalog)
}

// =============================================================================
// Tests
// =============================================================================
