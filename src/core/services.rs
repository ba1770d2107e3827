// LasQC - core/services.rs
//
// Service evaluator. A service bundle is satisfied when every required
// canonical type has at least one classified curve and none of those
// curves has a `Fail` outcome. Partial and error outcomes are reported
// as advisories and never block.

use crate::core::model::{
    ComplianceSummary, CurveReport, HeaderCompliance, RuleFinding, RuleStatus, ServiceVerdict,
};

/// A named bundle of required canonical curve types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDef {
    pub name: String,
    /// Required canonical types, in declared order.
    pub curve_types: Vec<String>,
}

/// Ordered service catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCatalog {
    services: Vec<ServiceDef>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<ServiceDef>) -> Self {
        Self { services }
    }

    /// Build from `(name, [types])` pairs, keeping their order.
    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(name, types)| ServiceDef {
                    name: name.to_string(),
                    curve_types: types.iter().map(|t| t.to_string()).collect(),
                })
                .collect(),
        )
    }

    pub fn services(&self) -> &[ServiceDef] {
        &self.services
    }

    pub fn get(&self, name: &str) -> Option<&ServiceDef> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Service names in catalog order.
    pub fn names(&self) -> Vec<String> {
        self.services.iter().map(|s| s.name.clone()).collect()
    }
}

fn curves_of_type<'a>(
    reports: &'a [CurveReport],
    curve_type: &'a str,
) -> impl Iterator<Item = &'a CurveReport> + 'a {
    reports
        .iter()
        .filter(move |r| r.class.key() == Some(curve_type))
}

/// Services whose required types are all present, ignoring rule outcomes
/// and the user's selection. Catalog order.
pub fn detect_services(reports: &[CurveReport], catalog: &ServiceCatalog) -> Vec<String> {
    catalog
        .services()
        .iter()
        .filter(|s| {
            s.curve_types
                .iter()
                .all(|t| curves_of_type(reports, t).next().is_some())
        })
        .map(|s| s.name.clone())
        .collect()
}

/// Evaluate each requested service, in request order. Repeated names are
/// evaluated once.
pub fn evaluate_services(
    reports: &[CurveReport],
    catalog: &ServiceCatalog,
    requested: &[String],
) -> Vec<ServiceVerdict> {
    let mut seen: Vec<&str> = Vec::new();
    let mut verdicts = Vec::new();

    for name in requested {
        if seen.contains(&name.as_str()) {
            continue;
        }
        seen.push(name.as_str());

        let verdict = match catalog.get(name) {
            Some(service) => evaluate_service(reports, service),
            None => {
                tracing::warn!(service = %name, "Requested service is not in the catalog");
                ServiceVerdict {
                    service: name.clone(),
                    satisfied: false,
                    missing: Vec::new(),
                    failing: Vec::new(),
                    advisories: Vec::new(),
                    unknown_service: true,
                }
            }
        };

        tracing::debug!(
            service = %verdict.service,
            satisfied = verdict.satisfied,
            missing = verdict.missing.len(),
            failing = verdict.failing.len(),
            "Service evaluated"
        );
        verdicts.push(verdict);
    }

    verdicts
}

fn evaluate_service(reports: &[CurveReport], service: &ServiceDef) -> ServiceVerdict {
    let mut missing = Vec::new();
    let mut failing = Vec::new();
    let mut advisories = Vec::new();

    for curve_type in &service.curve_types {
        let mut found = false;
        for report in curves_of_type(reports, curve_type) {
            found = true;
            for outcome in &report.outcomes {
                let finding = || RuleFinding {
                    curve: report.mnemonic.clone(),
                    rule: outcome.rule.clone(),
                    status: outcome.status,
                };
                if outcome.status.is_blocking() {
                    failing.push(finding());
                } else if outcome.status != RuleStatus::Pass {
                    advisories.push(finding());
                }
            }
        }
        if !found {
            missing.push(curve_type.clone());
        }
    }

    ServiceVerdict {
        service: service.name.clone(),
        satisfied: missing.is_empty() && failing.is_empty(),
        missing,
        failing,
        advisories,
        unknown_service: false,
    }
}

/// Combine header compliance and service verdicts into the archive gate.
pub fn summarize(header: &HeaderCompliance, verdicts: &[ServiceVerdict]) -> ComplianceSummary {
    let services_compliant = verdicts.iter().all(|v| v.satisfied);
    ComplianceSummary {
        header_compliant: header.compliant,
        services_compliant,
        approved: header.compliant && services_compliant,
    }
}
