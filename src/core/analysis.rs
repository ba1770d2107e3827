// LasQC - core/analysis.rs
//
// One full analysis pass over a parsed file: classify and evaluate every
// curve, validate the header, detect and evaluate services, and summarise.
// Every call builds fresh results; nothing is cached between passes.

use crate::core::catalog::QcCatalog;
use crate::core::checks::CheckContext;
use crate::core::classify::classify_curves;
use crate::core::header::{header_rows, validate_header, well_identity};
use crate::core::model::{AnalysisReport, Curve, CurveReport, LasFile};
use crate::core::rules;
use crate::core::services::{detect_services, evaluate_services, summarize};
use chrono::Utc;

/// Per-curve table: classification, statistics, and rule outcomes, in
/// input curve order.
pub fn classify_and_evaluate(curves: &[Curve], catalog: &QcCatalog) -> Vec<CurveReport> {
    let ctx = CheckContext::new(curves);
    classify_curves(curves, &catalog.aliases)
        .into_iter()
        .map(|classified| {
            let curve = classified.curve;
            let outcomes = rules::evaluate(curve, &classified.class, &catalog.rules, &ctx);
            let expected_unit = classified
                .class
                .key()
                .and_then(|key| catalog.expected_unit(key))
                .map(str::to_string);
            CurveReport {
                mnemonic: curve.mnemonic.clone(),
                unit: Some(curve.unit.trim().to_string()).filter(|u| !u.is_empty()),
                expected_unit,
                stats: curve.stats(),
                outcomes,
                class: classified.class,
            }
        })
        .collect()
}

/// Run a complete analysis of `las` against `catalog`.
///
/// `source` names the file for display. `requested` lists the service
/// bundles the user asked to validate; the summary is driven by these,
/// not by the detected set.
pub fn analyze(
    las: &LasFile,
    catalog: &QcCatalog,
    source: &str,
    requested: &[String],
) -> AnalysisReport {
    let curves = classify_and_evaluate(&las.curves, catalog);
    let header = validate_header(&las.well, &catalog.header);
    let detected_services = detect_services(&curves, &catalog.services);
    let verdicts = evaluate_services(&curves, &catalog.services, requested);
    let summary = summarize(&header, &verdicts);

    tracing::info!(
        source,
        curves = curves.len(),
        detected = detected_services.len(),
        requested = requested.len(),
        header_compliant = summary.header_compliant,
        services_compliant = summary.services_compliant,
        approved = summary.approved,
        "Analysis complete"
    );

    AnalysisReport {
        source: source.to_string(),
        generated_at: Utc::now(),
        identity: well_identity(&las.well),
        curves,
        header_rows: header_rows(&las.well),
        header,
        detected_services,
        requested_services: requested.to_vec(),
        verdicts,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{parse_catalog_toml, validate_and_compile};
    use crate::core::model::{CurveClass, HeaderField, RuleFinding, RuleStatus};
    use std::path::PathBuf;

    const CATALOG: &str = r#"
[[alias]]
type = "GR"
mnemonics = ["GR", "GRC"]

[rules]
each = [{ check = "no_gaps" }]

[[rules.curve]]
type = "GR"
checks = [{ check = "all_positive" }]

[units.expected]
GR = "gapi"

[[header]]
mnemonic = "WELL"
description = "NOMBRE POZO"

[[header]]
mnemonic = "FLD"
description = "NOMBRE CAMPO"

[[service]]
name = "COMBO"
curves = ["GR"]
"#;

    fn catalog() -> QcCatalog {
        let def = parse_catalog_toml(CATALOG, &PathBuf::from("t.toml")).unwrap();
        validate_and_compile(def, false).unwrap()
    }

    fn las(gr_values: &[f64]) -> LasFile {
        LasFile {
            well: vec![HeaderField::new("WELL", "X-1", "WELL")],
            curves: vec![
                Curve::new("DEPT", "m", vec![Some(1.0), Some(2.0), Some(3.0)]),
                Curve::new("GRC", "gapi", gr_values.iter().map(|v| Some(*v)).collect()),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_negative_gamma_fails_combo() {
        let report = analyze(&las(&[-1.0, 2.0, 3.0]), &catalog(), "t.las", &["COMBO".to_string()]);

        let gr = &report.curves[1];
        assert_eq!(gr.class, CurveClass::Known("GR".to_string()));
        assert_eq!(gr.outcome("all_positive").unwrap().status, RuleStatus::Fail);
        assert_eq!(gr.expected_unit.as_deref(), Some("gapi"));

        let verdict = &report.verdicts[0];
        assert!(!verdict.satisfied);
        assert!(verdict.missing.is_empty());
        assert_eq!(
            verdict.failing,
            vec![RuleFinding {
                curve: "GRC".to_string(),
                rule: "all_positive".to_string(),
                status: RuleStatus::Fail,
            }]
        );
        // Structurally present even though it fails.
        assert_eq!(report.detected_services, vec!["COMBO"]);
        assert!(!report.summary.approved);
    }

    #[test]
    fn test_header_missing_field() {
        let report = analyze(&las(&[1.0, 2.0, 3.0]), &catalog(), "t.las", &[]);
        assert!(!report.header.compliant);
        assert_eq!(report.header.missing, vec!["NOMBRE CAMPO (FLD)"]);
        assert!(report.summary.services_compliant);
        assert!(!report.summary.approved);
    }

    #[test]
    fn test_unknown_curve_gets_default_rules_and_stats() {
        let report = analyze(&las(&[1.0, 2.0, 3.0]), &catalog(), "t.las", &[]);
        let dept = &report.curves[0];
        assert_eq!(dept.class, CurveClass::Unknown);
        assert_eq!(dept.outcomes.len(), 1);
        assert_eq!(dept.outcomes[0].rule, "no_gaps");
        assert_eq!(dept.stats.mean, Some(2.0));
        assert_eq!(dept.unit.as_deref(), Some("m"));
        assert_eq!(dept.expected_unit, None);
    }

    #[test]
    fn test_approved_when_all_pass() {
        let mut file = las(&[1.0, 2.0, 3.0]);
        file.well.push(HeaderField::new("FLD", "", "FIELD"));
        let report = analyze(&file, &catalog(), "t.las", &["COMBO".to_string()]);
        assert!(report.header.compliant);
        assert!(report.verdicts[0].satisfied);
        assert!(report.summary.approved);
        assert_eq!(report.identity.field, "SinCampo");
    }
}
