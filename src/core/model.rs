// LasQC - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers. Everything
// derived here is rebuilt from scratch on each analysis pass.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::util::constants;

// =============================================================================
// Parsed log representation (input)
// =============================================================================

/// A single `MNEM.UNIT VALUE : DESCRIPTION` header line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderField {
    pub mnemonic: String,
    pub unit: String,
    /// Raw value text; may be empty.
    pub value: String,
    pub description: String,
}

impl HeaderField {
    /// Convenience constructor used by tests and callers that build headers
    /// without a parser.
    pub fn new(mnemonic: &str, value: &str, description: &str) -> Self {
        Self {
            mnemonic: mnemonic.to_string(),
            unit: String::new(),
            value: value.to_string(),
            description: description.to_string(),
        }
    }

    /// True when the value is absent or blank. Empty fields still count as
    /// present for header compliance.
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// One recorded curve. The mnemonic is case-sensitive and unique within a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    pub mnemonic: String,

    /// Unit string as declared; empty when the file declares none.
    pub unit: String,

    pub description: String,

    /// Sample values in index order. `None` marks a null sample.
    pub values: Vec<Option<f64>>,

    /// Depth/index value for each sample; same length as `values`.
    pub basis: Vec<Option<f64>>,
}

impl Curve {
    /// Build a curve whose basis is the sample position (0, 1, 2, ...).
    pub fn new(mnemonic: &str, unit: &str, values: Vec<Option<f64>>) -> Self {
        let basis = (0..values.len()).map(|i| Some(i as f64)).collect();
        Self {
            mnemonic: mnemonic.to_string(),
            unit: unit.to_string(),
            description: String::new(),
            values,
            basis,
        }
    }

    /// Non-null samples in index order.
    pub fn valid_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v).filter(|v| v.is_finite())
    }

    /// Summary statistics over the valid samples.
    pub fn stats(&self) -> CurveStats {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in self.valid_values() {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        if count == 0 {
            return CurveStats {
                total_samples: self.values.len(),
                ..Default::default()
            };
        }
        CurveStats {
            mean: Some(sum / count as f64),
            min: Some(min),
            max: Some(max),
            valid_samples: count,
            total_samples: self.values.len(),
        }
    }
}

/// Summary statistics of a curve. `None` when the curve has no valid samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CurveStats {
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub valid_samples: usize,
    pub total_samples: usize,
}

/// A parsed log file: header sections and curves.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LasFile {
    /// ~V section.
    pub version: Vec<HeaderField>,
    /// ~W section; the one checked for header compliance.
    pub well: Vec<HeaderField>,
    /// ~P section.
    pub params: Vec<HeaderField>,
    /// ~C section, with samples from ~A. The first curve is the index.
    pub curves: Vec<Curve>,
}

impl LasFile {
    /// Value of a ~W field, if present.
    pub fn well_value(&self, mnemonic: &str) -> Option<&str> {
        self.well
            .iter()
            .find(|f| f.mnemonic == mnemonic)
            .map(|f| f.value.as_str())
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Result of resolving a mnemonic against the alias table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CurveClass {
    /// Matched the alias set of this canonical type.
    Known(String),
    /// Matched no alias set.
    Unknown,
}

impl CurveClass {
    /// Canonical type key, or "unknown".
    pub fn as_str(&self) -> &str {
        match self {
            CurveClass::Known(key) => key,
            CurveClass::Unknown => constants::UNKNOWN_CURVE_TYPE,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, CurveClass::Known(_))
    }

    /// Canonical type key when known.
    pub fn key(&self) -> Option<&str> {
        match self {
            CurveClass::Known(key) => Some(key),
            CurveClass::Unknown => None,
        }
    }
}

impl std::fmt::Display for CurveClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CurveClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A curve paired with its classification. Borrowed view built per pass.
#[derive(Debug, Clone)]
pub struct ClassifiedCurve<'a> {
    pub curve: &'a Curve,
    pub class: CurveClass,
}

// =============================================================================
// Rule outcomes
// =============================================================================

/// Four-way outcome of one rule on one curve, used identically by display
/// and service compliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    /// Every sample satisfied the rule.
    Pass,
    /// Some, but not all, samples failed.
    Partial,
    /// Total failure. The only status that blocks a service.
    Fail,
    /// The check could not produce a verdict.
    Error,
}

impl RuleStatus {
    /// Returns all variants in display order.
    pub fn all() -> &'static [RuleStatus] {
        &[
            RuleStatus::Pass,
            RuleStatus::Partial,
            RuleStatus::Fail,
            RuleStatus::Error,
        ]
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            RuleStatus::Pass => "All tests passed",
            RuleStatus::Partial => "Some tests failed",
            RuleStatus::Fail => "All tests failed",
            RuleStatus::Error => "No tests ran",
        }
    }

    /// Coloured marker used in text reports.
    pub fn symbol(&self) -> &'static str {
        match self {
            RuleStatus::Pass => "🟢",
            RuleStatus::Partial => "🟠",
            RuleStatus::Fail => "🔴",
            RuleStatus::Error => "⚪",
        }
    }

    /// Short label for compact display (e.g. CSV columns).
    pub fn short_label(&self) -> &'static str {
        match self {
            RuleStatus::Pass => "pass",
            RuleStatus::Partial => "partial",
            RuleStatus::Fail => "fail",
            RuleStatus::Error => "error",
        }
    }

    /// Whether this outcome prevents a service from being satisfied.
    /// Partial and error outcomes are advisory only.
    pub fn is_blocking(&self) -> bool {
        matches!(self, RuleStatus::Fail)
    }
}

impl std::fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_label())
    }
}

/// Outcome of one named rule on one curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    /// Check id, e.g. "all_between". Key in the outcome mapping.
    pub rule: String,
    /// Display name, e.g. "All between 10 and 100".
    pub label: String,
    pub status: RuleStatus,
    /// Error message when `status` is `Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// One row of the per-curve table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveReport {
    pub mnemonic: String,
    pub class: CurveClass,
    /// Declared unit; `None` when the file declares none.
    pub unit: Option<String>,
    /// Unit the catalog expects for this canonical type, if any.
    pub expected_unit: Option<String>,
    pub stats: CurveStats,
    /// Ordered by the rule list configured for the curve's type.
    pub outcomes: Vec<RuleOutcome>,
}

impl CurveReport {
    /// Outcome of a rule by check id.
    pub fn outcome(&self, rule: &str) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|o| o.rule == rule)
    }
}

// =============================================================================
// Header
// =============================================================================

/// A header row prepared for display, with the empty marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderRow {
    pub mnemonic: String,
    pub value: String,
    pub description: String,
    pub empty: bool,
}

/// Result of checking required header mnemonics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCompliance {
    pub compliant: bool,
    /// "DESCRIPTION (MNEM)" for each missing requirement, in requirement order.
    pub missing: Vec<String>,
}

/// Identity fields used to name the archived copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WellIdentity {
    pub well: String,
    pub company: String,
    pub date: String,
    pub field: String,
}

// =============================================================================
// Services
// =============================================================================

/// A (curve, rule) pair reported by the service evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFinding {
    pub curve: String,
    pub rule: String,
    pub status: RuleStatus,
}

/// Verdict for one requested service bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceVerdict {
    pub service: String,
    pub satisfied: bool,
    /// Required canonical types with no classified curve, in catalog order.
    pub missing: Vec<String>,
    /// Curve/rule pairs whose outcome was `Fail`.
    pub failing: Vec<RuleFinding>,
    /// Curve/rule pairs whose outcome was `Partial` or `Error`. Not blocking.
    pub advisories: Vec<RuleFinding>,
    /// The requested name is not in the service catalog.
    pub unknown_service: bool,
}

impl ServiceVerdict {
    /// Itemised reasons for an unsatisfied verdict.
    pub fn reasons(&self, aliases: impl Fn(&str) -> Vec<String>) -> Vec<String> {
        let mut reasons = Vec::new();
        if self.unknown_service {
            reasons.push(format!("service '{}' is not in the catalog", self.service));
        }
        for curve_type in &self.missing {
            reasons.push(format!(
                "{curve_type} (aliases: {}) not found",
                aliases(curve_type).join(", ")
            ));
        }
        for finding in &self.failing {
            reasons.push(format!(
                "{} - {}: {}",
                finding.curve,
                finding.rule,
                finding.status.label()
            ));
        }
        reasons
    }
}

/// Final pass/fail gate for archiving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComplianceSummary {
    pub header_compliant: bool,
    /// Every requested service satisfied (vacuously true when none requested).
    pub services_compliant: bool,
    /// Header and services both comply.
    pub approved: bool,
}

// =============================================================================
// Full report
// =============================================================================

/// Everything produced by one analysis pass.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Name of the analysed file, for display.
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub identity: WellIdentity,
    pub curves: Vec<CurveReport>,
    pub header_rows: Vec<HeaderRow>,
    pub header: HeaderCompliance,
    /// Services structurally present, ignoring rule outcomes and the request.
    pub detected_services: Vec<String>,
    pub requested_services: Vec<String>,
    pub verdicts: Vec<ServiceVerdict>,
    pub summary: ComplianceSummary,
}
