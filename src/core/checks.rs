// LasQC - core/checks.rs
//
// Named quality checks and the fixed registry that builds them from
// catalog entries. A check inspects one curve (plus read-only access to
// its siblings) and returns a three-way verdict, or an error when it
// cannot decide. New checks register by name in `REGISTRY`.

use crate::core::model::{Curve, RuleStatus};
use crate::util::constants;
use crate::util::error::{CatalogError, CheckError};
use serde::Deserialize;
use std::fmt;

/// Verdict of a check that managed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// All samples satisfy the check.
    Pass,
    /// Some samples fail.
    Partial,
    /// The curve fails outright.
    Fail,
}

impl From<Verdict> for RuleStatus {
    fn from(v: Verdict) -> Self {
        match v {
            Verdict::Pass => RuleStatus::Pass,
            Verdict::Partial => RuleStatus::Partial,
            Verdict::Fail => RuleStatus::Fail,
        }
    }
}

/// Read-only view of the whole file, for checks that compare curves.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub curves: &'a [Curve],
}

impl<'a> CheckContext<'a> {
    pub fn new(curves: &'a [Curve]) -> Self {
        Self { curves }
    }
}

/// A named, swappable quality predicate.
pub trait QualityCheck: fmt::Debug + Send + Sync {
    /// Registry id, e.g. "all_between". Used as the outcome key.
    fn id(&self) -> &'static str;

    /// Human-readable name including parameters.
    fn label(&self) -> String;

    fn check(&self, curve: &Curve, ctx: &CheckContext<'_>) -> Result<Verdict, CheckError>;
}

// =============================================================================
// Catalog-facing check configuration and registry
// =============================================================================

/// One check entry as written in the catalog, e.g.
/// `{ check = "all_between", min = 10, max = 100 }`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CheckSpec {
    pub check: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub window: Option<usize>,
    #[serde(default)]
    pub units: Option<Vec<String>>,
}

impl CheckSpec {
    /// Configuration for a parameterless check.
    pub fn named(check: &str) -> Self {
        Self {
            check: check.to_string(),
            min: None,
            max: None,
            window: None,
            units: None,
        }
    }
}

type Builder = fn(&CheckSpec, &[String]) -> Result<Box<dyn QualityCheck>, String>;

/// Every check the catalog may name.
const REGISTRY: &[(&str, Builder)] = &[
    ("all_positive", |_, _| Ok(Box::new(AllPositive))),
    ("all_between", build_all_between),
    ("no_gaps", |_, _| Ok(Box::new(NoGaps))),
    ("no_flat", |spec, _| {
        let window = window_param(spec, constants::DEFAULT_FLAT_WINDOW, 2)?;
        Ok(Box::new(NoFlat { window }))
    }),
    ("no_monotonic", |spec, _| {
        let window = window_param(spec, constants::DEFAULT_MONOTONIC_WINDOW, 3)?;
        Ok(Box::new(NoMonotonic { window }))
    }),
    ("no_similarities", |_, _| Ok(Box::new(NoSimilarities))),
    ("unit_conformance", build_unit_conformance),
];

/// Names of all registered checks, in registry order.
pub fn registered_checks() -> Vec<&'static str> {
    REGISTRY.iter().map(|(name, _)| *name).collect()
}

/// Build a check from its catalog spec.
///
/// `accepted_units` is the catalog-wide unit list used by
/// `unit_conformance` when the entry gives none. `curve_type` is for error
/// context only.
pub fn build_check(
    spec: &CheckSpec,
    accepted_units: &[String],
    curve_type: &str,
) -> Result<Box<dyn QualityCheck>, CatalogError> {
    let (_, builder) = REGISTRY
        .iter()
        .find(|(name, _)| *name == spec.check)
        .ok_or_else(|| CatalogError::UnknownCheck {
            curve_type: curve_type.to_string(),
            check: spec.check.clone(),
        })?;

    builder(spec, accepted_units).map_err(|reason| CatalogError::InvalidCheckParams {
        curve_type: curve_type.to_string(),
        check: spec.check.clone(),
        reason,
    })
}

fn build_all_between(
    spec: &CheckSpec,
    _accepted: &[String],
) -> Result<Box<dyn QualityCheck>, String> {
    let (min, max) = match (spec.min, spec.max) {
        (Some(min), Some(max)) => (min, max),
        _ => return Err("both 'min' and 'max' are required".to_string()),
    };
    if !min.is_finite() || !max.is_finite() {
        return Err("bounds must be finite".to_string());
    }
    if min > max {
        return Err(format!("min ({min}) is greater than max ({max})"));
    }
    Ok(Box::new(AllBetween { min, max }))
}

fn build_unit_conformance(
    spec: &CheckSpec,
    accepted: &[String],
) -> Result<Box<dyn QualityCheck>, String> {
    let units: Vec<String> = spec
        .units
        .clone()
        .unwrap_or_else(|| accepted.to_vec())
        .into_iter()
        .map(|u| u.trim().to_lowercase())
        .filter(|u| !u.is_empty())
        .collect();
    if units.is_empty() {
        return Err("no accepted units given and catalog [units] accepted is empty".to_string());
    }
    Ok(Box::new(UnitConformance { units }))
}

fn window_param(spec: &CheckSpec, default: usize, min: usize) -> Result<usize, String> {
    let window = spec.window.unwrap_or(default);
    if window < min {
        return Err(format!("window must be at least {min}, got {window}"));
    }
    Ok(window)
}

fn require_samples(values: &[f64], needed: usize) -> Result<(), CheckError> {
    if values.len() < needed {
        return Err(CheckError::InsufficientData {
            needed,
            found: values.len(),
        });
    }
    Ok(())
}

// =============================================================================
// Built-in checks
// =============================================================================

/// No sample is negative.
#[derive(Debug)]
pub struct AllPositive;

impl QualityCheck for AllPositive {
    fn id(&self) -> &'static str {
        "all_positive"
    }

    fn label(&self) -> String {
        "All positive".to_string()
    }

    fn check(&self, curve: &Curve, _ctx: &CheckContext<'_>) -> Result<Verdict, CheckError> {
        let values: Vec<f64> = curve.valid_values().collect();
        require_samples(&values, 1)?;
        if values.iter().any(|v| *v < 0.0) {
            Ok(Verdict::Fail)
        } else {
            Ok(Verdict::Pass)
        }
    }
}

/// Samples fall inside `[min, max]`.
#[derive(Debug)]
pub struct AllBetween {
    pub min: f64,
    pub max: f64,
}

impl QualityCheck for AllBetween {
    fn id(&self) -> &'static str {
        "all_between"
    }

    fn label(&self) -> String {
        format!("All between {} and {}", self.min, self.max)
    }

    fn check(&self, curve: &Curve, _ctx: &CheckContext<'_>) -> Result<Verdict, CheckError> {
        let values: Vec<f64> = curve.valid_values().collect();
        require_samples(&values, 1)?;
        let inside = values
            .iter()
            .filter(|v| (self.min..=self.max).contains(*v))
            .count();
        Ok(match inside {
            n if n == values.len() => Verdict::Pass,
            0 => Verdict::Fail,
            _ => Verdict::Partial,
        })
    }
}

/// No null samples between the first and last valid sample.
#[derive(Debug)]
pub struct NoGaps;

impl QualityCheck for NoGaps {
    fn id(&self) -> &'static str {
        "no_gaps"
    }

    fn label(&self) -> String {
        "No gaps".to_string()
    }

    fn check(&self, curve: &Curve, _ctx: &CheckContext<'_>) -> Result<Verdict, CheckError> {
        if curve.values.is_empty() {
            return Err(CheckError::InsufficientData {
                needed: 1,
                found: 0,
            });
        }
        let is_valid = |v: &Option<f64>| v.is_some_and(f64::is_finite);
        let (first, last) = match (
            curve.values.iter().position(is_valid),
            curve.values.iter().rposition(is_valid),
        ) {
            (Some(first), Some(last)) => (first, last),
            _ => return Ok(Verdict::Fail),
        };
        if curve.values[first..=last].iter().all(is_valid) {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::Partial)
        }
    }
}

/// No run of `window` identical consecutive samples.
#[derive(Debug)]
pub struct NoFlat {
    pub window: usize,
}

impl QualityCheck for NoFlat {
    fn id(&self) -> &'static str {
        "no_flat"
    }

    fn label(&self) -> String {
        "No flat".to_string()
    }

    fn check(&self, curve: &Curve, _ctx: &CheckContext<'_>) -> Result<Verdict, CheckError> {
        let values: Vec<f64> = curve.valid_values().collect();
        require_samples(&values, 2)?;
        if values.iter().all(|v| *v == values[0]) {
            return Ok(Verdict::Fail);
        }
        let mut run = 1;
        for pair in values.windows(2) {
            if pair[0] == pair[1] {
                run += 1;
                if run >= self.window {
                    return Ok(Verdict::Partial);
                }
            } else {
                run = 1;
            }
        }
        Ok(Verdict::Pass)
    }
}

/// No run of `window` samples changing by the same non-zero step, the
/// signature of interpolated or synthetic data.
#[derive(Debug)]
pub struct NoMonotonic {
    pub window: usize,
}

fn same_step(a: f64, b: f64) -> bool {
    if a == 0.0 || b == 0.0 {
        return false;
    }
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= constants::MONOTONIC_STEP_TOLERANCE * scale
}

impl QualityCheck for NoMonotonic {
    fn id(&self) -> &'static str {
        "no_monotonic"
    }

    fn label(&self) -> String {
        "No monotonic".to_string()
    }

    fn check(&self, curve: &Curve, _ctx: &CheckContext<'_>) -> Result<Verdict, CheckError> {
        let values: Vec<f64> = curve.valid_values().collect();
        require_samples(&values, 3)?;
        let steps: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

        if steps.windows(2).all(|s| same_step(s[0], s[1])) {
            return Ok(Verdict::Fail);
        }

        // A run of k equal steps spans k + 1 samples.
        let mut run = 1;
        for pair in steps.windows(2) {
            if same_step(pair[0], pair[1]) {
                run += 1;
                if run + 1 >= self.window {
                    return Ok(Verdict::Partial);
                }
            } else {
                run = 1;
            }
        }
        Ok(Verdict::Pass)
    }
}

/// No other curve in the file carries exactly the same samples.
#[derive(Debug)]
pub struct NoSimilarities;

impl QualityCheck for NoSimilarities {
    fn id(&self) -> &'static str {
        "no_similarities"
    }

    fn label(&self) -> String {
        "No similarities".to_string()
    }

    fn check(&self, curve: &Curve, ctx: &CheckContext<'_>) -> Result<Verdict, CheckError> {
        let valid = curve.valid_values().count();
        if valid == 0 {
            return Err(CheckError::InsufficientData {
                needed: 1,
                found: 0,
            });
        }
        let duplicated = ctx
            .curves
            .iter()
            .filter(|other| other.mnemonic != curve.mnemonic)
            .any(|other| other.values == curve.values);
        if duplicated {
            Ok(Verdict::Fail)
        } else {
            Ok(Verdict::Pass)
        }
    }
}

/// The declared unit is one of an accepted list (case-insensitive).
///
/// A missing or unlisted unit is Partial: the samples may still be usable.
#[derive(Debug)]
pub struct UnitConformance {
    /// Lower-cased accepted units.
    pub units: Vec<String>,
}

impl QualityCheck for UnitConformance {
    fn id(&self) -> &'static str {
        "unit_conformance"
    }

    fn label(&self) -> String {
        "Has accepted units".to_string()
    }

    fn check(&self, curve: &Curve, _ctx: &CheckContext<'_>) -> Result<Verdict, CheckError> {
        let unit = curve.unit.trim().to_lowercase();
        if !unit.is_empty() && self.units.contains(&unit) {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::Partial)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(values: &[f64]) -> Curve {
        Curve::new("X", "", values.iter().map(|v| Some(*v)).collect())
    }

    fn run(check: &dyn QualityCheck, c: &Curve) -> Result<Verdict, CheckError> {
        let curves = [c.clone()];
        check.check(c, &CheckContext::new(&curves))
    }

    #[test]
    fn test_all_positive_fails_on_any_negative() {
        assert_eq!(run(&AllPositive, &curve(&[-1.0, 2.0, 3.0])), Ok(Verdict::Fail));
        assert_eq!(run(&AllPositive, &curve(&[0.0, 2.0, 3.0])), Ok(Verdict::Pass));
    }

    #[test]
    fn test_all_positive_without_samples_is_error() {
        let c = Curve::new("X", "", vec![None, None]);
        assert!(matches!(
            run(&AllPositive, &c),
            Err(CheckError::InsufficientData { needed: 1, found: 0 })
        ));
    }

    #[test]
    fn test_all_between_three_way() {
        let check = AllBetween { min: 10.0, max: 100.0 };
        assert_eq!(run(&check, &curve(&[10.0, 50.0, 100.0])), Ok(Verdict::Pass));
        assert_eq!(run(&check, &curve(&[5.0, 50.0])), Ok(Verdict::Partial));
        assert_eq!(run(&check, &curve(&[5.0, 500.0])), Ok(Verdict::Fail));
        assert_eq!(check.label(), "All between 10 and 100");
    }

    #[test]
    fn test_no_gaps() {
        let leading_nulls = Curve::new("X", "", vec![None, Some(1.0), Some(2.0), None]);
        assert_eq!(run(&NoGaps, &leading_nulls), Ok(Verdict::Pass));

        let inner_gap = Curve::new("X", "", vec![Some(1.0), None, Some(2.0)]);
        assert_eq!(run(&NoGaps, &inner_gap), Ok(Verdict::Partial));

        let all_null = Curve::new("X", "", vec![None, None]);
        assert_eq!(run(&NoGaps, &all_null), Ok(Verdict::Fail));

        let empty = Curve::new("X", "", vec![]);
        assert!(run(&NoGaps, &empty).is_err());
    }

    #[test]
    fn test_no_flat() {
        let check = NoFlat { window: 3 };
        assert_eq!(run(&check, &curve(&[1.0, 1.0, 1.0])), Ok(Verdict::Fail));
        assert_eq!(run(&check, &curve(&[1.0, 2.0, 2.0, 2.0, 3.0])), Ok(Verdict::Partial));
        assert_eq!(run(&check, &curve(&[1.0, 2.0, 2.0, 3.0])), Ok(Verdict::Pass));
        assert!(run(&check, &curve(&[1.0])).is_err());
    }

    #[test]
    fn test_no_monotonic() {
        let check = NoMonotonic { window: 4 };
        assert_eq!(run(&check, &curve(&[1.0, 2.0, 3.0, 4.0])), Ok(Verdict::Fail));
        assert_eq!(
            run(&check, &curve(&[5.0, 1.0, 2.0, 3.0, 4.0, 0.0])),
            Ok(Verdict::Partial)
        );
        assert_eq!(run(&check, &curve(&[1.0, 3.0, 2.0, 5.0, 4.0])), Ok(Verdict::Pass));
        assert!(run(&check, &curve(&[1.0, 2.0])).is_err());
    }

    #[test]
    fn test_no_monotonic_constant_is_not_a_ramp() {
        let check = NoMonotonic { window: 3 };
        assert_eq!(run(&check, &curve(&[2.0, 2.0, 2.0, 2.0])), Ok(Verdict::Pass));
    }

    #[test]
    fn test_no_similarities_detects_duplicate() {
        let a = Curve::new("A", "", vec![Some(1.0), None, Some(3.0)]);
        let b = Curve::new("B", "", vec![Some(1.0), None, Some(3.0)]);
        let c = Curve::new("C", "", vec![Some(1.0), Some(2.0), Some(3.0)]);
        let curves = vec![a.clone(), b, c.clone()];
        let ctx = CheckContext::new(&curves);
        assert_eq!(NoSimilarities.check(&a, &ctx), Ok(Verdict::Fail));
        assert_eq!(NoSimilarities.check(&c, &ctx), Ok(Verdict::Pass));
    }

    #[test]
    fn test_unit_conformance_case_insensitive() {
        let check = UnitConformance {
            units: vec!["gapi".to_string()],
        };
        assert_eq!(run(&check, &Curve::new("GR", "GAPI", vec![])), Ok(Verdict::Pass));
        assert_eq!(run(&check, &Curve::new("GR", "API", vec![])), Ok(Verdict::Partial));
        assert_eq!(run(&check, &Curve::new("GR", "", vec![])), Ok(Verdict::Partial));
    }

    #[test]
    fn test_build_check_rejects_unknown_name() {
        let err = build_check(&CheckSpec::named("no_such_check"), &[], "GR").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCheck { .. }));
    }

    #[test]
    fn test_build_check_validates_bounds() {
        let spec = CheckSpec {
            min: Some(100.0),
            max: Some(10.0),
            ..CheckSpec::named("all_between")
        };
        let err = build_check(&spec, &[], "GR").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCheckParams { .. }));

        let missing_max = CheckSpec {
            min: Some(1.0),
            ..CheckSpec::named("all_between")
        };
        assert!(build_check(&missing_max, &[], "GR").is_err());
    }

    #[test]
    fn test_unit_conformance_uses_catalog_units() {
        let accepted = vec!["OhmM".to_string()];
        let check = build_check(&CheckSpec::named("unit_conformance"), &accepted, "Each").unwrap();
        let c = Curve::new("RT", "ohmm", vec![Some(1.0)]);
        assert_eq!(run(check.as_ref(), &c), Ok(Verdict::Pass));

        let err = build_check(&CheckSpec::named("unit_conformance"), &[], "Each").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCheckParams { .. }));
    }

    #[test]
    fn test_registry_ids_match_names() {
        for name in registered_checks() {
            let spec = CheckSpec {
                min: Some(0.0),
                max: Some(1.0),
                units: Some(vec!["m".to_string()]),
                ..CheckSpec::named(name)
            };
            let check = build_check(&spec, &[], "T").unwrap();
            assert_eq!(check.id(), name);
        }
    }
}
