// LasQC - core/classify.rs
//
// Curve classifier: resolves raw mnemonics to canonical curve types via
// the alias table. First declared alias set containing the mnemonic wins.
// Core layer: pure lookup, no I/O.

use crate::core::model::{ClassifiedCurve, Curve, CurveClass};

/// One canonical type and the mnemonic spellings that identify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub curve_type: String,
    /// Case-sensitive spellings, in declared order.
    pub mnemonics: Vec<String>,
}

/// Ordered alias table. Iteration order is declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    pub fn new(entries: Vec<AliasEntry>) -> Self {
        Self { entries }
    }

    /// Build from `(type, [mnemonics])` pairs, keeping their order.
    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(curve_type, mnemonics)| AliasEntry {
                    curve_type: curve_type.to_string(),
                    mnemonics: mnemonics.iter().map(|m| m.to_string()).collect(),
                })
                .collect(),
        )
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn contains_type(&self, curve_type: &str) -> bool {
        self.entries.iter().any(|e| e.curve_type == curve_type)
    }

    /// Mnemonic spellings for a canonical type; empty when undeclared.
    pub fn aliases_of(&self, curve_type: &str) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.curve_type == curve_type)
            .map(|e| e.mnemonics.as_slice())
            .unwrap_or(&[])
    }

    /// Resolve a mnemonic. Never fails; unmatched mnemonics are `Unknown`.
    pub fn classify(&self, mnemonic: &str) -> CurveClass {
        self.entries
            .iter()
            .find(|e| e.mnemonics.iter().any(|m| m == mnemonic))
            .map(|e| CurveClass::Known(e.curve_type.clone()))
            .unwrap_or(CurveClass::Unknown)
    }
}

/// Classify every curve of a file, in input order.
pub fn classify_curves<'a>(curves: &'a [Curve], aliases: &AliasTable) -> Vec<ClassifiedCurve<'a>> {
    let classified: Vec<ClassifiedCurve<'a>> = curves
        .iter()
        .map(|curve| ClassifiedCurve {
            curve,
            class: aliases.classify(&curve.mnemonic),
        })
        .collect();

    tracing::debug!(
        curves = classified.len(),
        known = classified.iter().filter(|c| c.class.is_known()).count(),
        "Curves classified"
    );

    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AliasTable {
        AliasTable::from_pairs(&[
            ("GR", &["GR_NORM", "GRC", "GR"]),
            ("CALI", &["CALI", "CAL"]),
        ])
    }

    #[test]
    fn test_every_alias_resolves_to_its_type() {
        let t = table();
        for entry in t.entries() {
            for m in &entry.mnemonics {
                assert_eq!(t.classify(m), CurveClass::Known(entry.curve_type.clone()));
            }
        }
    }

    #[test]
    fn test_unmatched_is_unknown() {
        assert_eq!(table().classify("XYZ"), CurveClass::Unknown);
        assert_eq!(table().classify("XYZ").as_str(), "unknown");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(table().classify("grc"), CurveClass::Unknown);
    }

    #[test]
    fn test_overlap_first_declared_wins() {
        let t = AliasTable::from_pairs(&[("A", &["X", "Y"]), ("B", &["Y", "Z"])]);
        assert_eq!(t.classify("Y"), CurveClass::Known("A".to_string()));

        let reversed = AliasTable::from_pairs(&[("B", &["Y", "Z"]), ("A", &["X", "Y"])]);
        assert_eq!(reversed.classify("Y"), CurveClass::Known("B".to_string()));
    }

    #[test]
    fn test_classify_curves_keeps_order() {
        let curves = vec![
            Curve::new("DEPT", "m", vec![]),
            Curve::new("GRC", "gapi", vec![]),
            Curve::new("CAL", "in", vec![]),
        ];
        let classified = classify_curves(&curves, &table());
        let keys: Vec<&str> = classified.iter().map(|c| c.class.as_str()).collect();
        assert_eq!(keys, vec!["unknown", "GR", "CALI"]);
        assert_eq!(classified[1].curve.mnemonic, "GRC");
    }

    #[test]
    fn test_aliases_of() {
        assert_eq!(table().aliases_of("CALI"), &["CALI".to_string(), "CAL".to_string()]);
        assert!(table().aliases_of("NOPE").is_empty());
    }
}
