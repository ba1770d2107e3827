// LasQC - core/rules.rs
//
// Rule evaluator: picks the check list for a curve's canonical type
// (falling back to the default "each" list) and runs every check,
// containing failures locally so one check can never abort the others.

use crate::core::checks::{CheckContext, QualityCheck};
use crate::core::model::{Curve, CurveClass, RuleOutcome, RuleStatus};
use crate::util::error::CheckError;
use crate::util::logging;
use std::panic::{self, AssertUnwindSafe};

/// Ordered checks for one canonical type.
#[derive(Debug)]
pub struct RuleSet {
    pub curve_type: String,
    pub checks: Vec<Box<dyn QualityCheck>>,
}

/// Checks per canonical type plus the default list.
#[derive(Debug, Default)]
pub struct RuleTable {
    sets: Vec<RuleSet>,
    each: Vec<Box<dyn QualityCheck>>,
}

impl RuleTable {
    pub fn new(sets: Vec<RuleSet>, each: Vec<Box<dyn QualityCheck>>) -> Self {
        Self { sets, each }
    }

    pub fn sets(&self) -> &[RuleSet] {
        &self.sets
    }

    /// The default list, applied to unknown curves and to known types
    /// without a rule set.
    pub fn each(&self) -> &[Box<dyn QualityCheck>] {
        &self.each
    }

    /// Checks that apply to a curve of this class.
    pub fn checks_for(&self, class: &CurveClass) -> &[Box<dyn QualityCheck>] {
        class
            .key()
            .and_then(|key| self.sets.iter().find(|s| s.curve_type == key))
            .map(|s| s.checks.as_slice())
            .unwrap_or(self.each.as_slice())
    }
}

/// Run every applicable check on one curve.
///
/// Returns one outcome per configured check, in configuration order.
/// A check that returns an error or panics yields `RuleStatus::Error`
/// for that check only.
pub fn evaluate(
    curve: &Curve,
    class: &CurveClass,
    table: &RuleTable,
    ctx: &CheckContext<'_>,
) -> Vec<RuleOutcome> {
    table
        .checks_for(class)
        .iter()
        .map(|check| run_check(check.as_ref(), curve, ctx))
        .collect()
}

fn run_check(check: &dyn QualityCheck, curve: &Curve, ctx: &CheckContext<'_>) -> RuleOutcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| check.check(curve, ctx)))
        .unwrap_or_else(|payload| {
            Err(CheckError::Panicked {
                message: logging::panic_message(payload.as_ref()),
            })
        });

    let (status, detail) = match result {
        Ok(verdict) => (RuleStatus::from(verdict), None),
        Err(e) => {
            tracing::warn!(
                curve = %curve.mnemonic,
                check = check.id(),
                error = %e,
                "Check could not run"
            );
            (RuleStatus::Error, Some(e.to_string()))
        }
    };

    RuleOutcome {
        rule: check.id().to_string(),
        label: check.label(),
        status,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::checks::{AllBetween, AllPositive, NoFlat, Verdict};

    #[derive(Debug)]
    struct Exploding;

    impl QualityCheck for Exploding {
        fn id(&self) -> &'static str {
            "exploding"
        }
        fn label(&self) -> String {
            "Exploding".to_string()
        }
        fn check(&self, _: &Curve, _: &CheckContext<'_>) -> Result<Verdict, CheckError> {
            panic!("boom");
        }
    }

    fn table() -> RuleTable {
        RuleTable::new(
            vec![RuleSet {
                curve_type: "GR".to_string(),
                checks: vec![
                    Box::new(AllPositive),
                    Box::new(AllBetween {
                        min: 10.0,
                        max: 100.0,
                    }),
                ],
            }],
            vec![Box::new(NoFlat { window: 5 })],
        )
    }

    fn run(curve: &Curve, class: &CurveClass, table: &RuleTable) -> Vec<RuleOutcome> {
        let curves = [curve.clone()];
        evaluate(curve, class, table, &CheckContext::new(&curves))
    }

    #[test]
    fn test_known_type_uses_its_rule_set_in_order() {
        let curve = Curve::new("GRC", "gapi", vec![Some(-1.0), Some(2.0), Some(3.0)]);
        let outcomes = run(&curve, &CurveClass::Known("GR".to_string()), &table());
        let rules: Vec<&str> = outcomes.iter().map(|o| o.rule.as_str()).collect();
        assert_eq!(rules, vec!["all_positive", "all_between"]);
        assert_eq!(outcomes[0].status, RuleStatus::Fail);
        assert_eq!(outcomes[1].status, RuleStatus::Fail);
    }

    #[test]
    fn test_unknown_uses_each() {
        let curve = Curve::new("XX", "", vec![Some(1.0), Some(2.0)]);
        let outcomes = run(&curve, &CurveClass::Unknown, &table());
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].rule, "no_flat");
        assert_eq!(outcomes[0].status, RuleStatus::Pass);
    }

    #[test]
    fn test_known_type_without_rule_set_uses_each() {
        let curve = Curve::new("CAL", "in", vec![Some(1.0), Some(2.0)]);
        let outcomes = run(&curve, &CurveClass::Known("CALI".to_string()), &table());
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].rule, "no_flat");
    }

    #[test]
    fn test_error_is_contained() {
        let curve = Curve::new("GR", "gapi", vec![None, None]);
        let outcomes = run(&curve, &CurveClass::Known("GR".to_string()), &table());
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.status == RuleStatus::Error));
        assert!(outcomes[0].detail.as_deref().unwrap().contains("insufficient data"));
    }

    #[test]
    fn test_panic_is_contained_and_others_still_run() {
        let table = RuleTable::new(
            vec![RuleSet {
                curve_type: "GR".to_string(),
                checks: vec![
                    Box::new(AllPositive),
                    Box::new(Exploding),
                    Box::new(AllBetween {
                        min: 0.0,
                        max: 10.0,
                    }),
                ],
            }],
            vec![],
        );
        let curve = Curve::new("GR", "gapi", vec![Some(1.0), Some(2.0)]);
        let outcomes = run(&curve, &CurveClass::Known("GR".to_string()), &table);
        let statuses: Vec<RuleStatus> = outcomes.iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            vec![RuleStatus::Pass, RuleStatus::Error, RuleStatus::Pass]
        );
        assert_eq!(outcomes[1].detail.as_deref(), Some("check panicked: boom"));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let curve = Curve::new("GRC", "gapi", vec![Some(5.0), Some(50.0)]);
        let class = CurveClass::Known("GR".to_string());
        let t = table();
        assert_eq!(run(&curve, &class, &t), run(&curve, &class, &t));
    }
}
