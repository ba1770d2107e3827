// LasQC - core/header.rs
//
// Header validator. Compliance is mnemonic presence only: a required
// field with an empty value still counts as present, and is flagged
// separately for display.

use crate::core::model::{HeaderCompliance, HeaderField, HeaderRow, WellIdentity};
use crate::util::constants;

/// A required header mnemonic and its human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRequirement {
    pub mnemonic: String,
    /// `None` when the catalog gives no description.
    pub description: Option<String>,
}

impl HeaderRequirement {
    pub fn new(mnemonic: &str, description: &str) -> Self {
        Self {
            mnemonic: mnemonic.to_string(),
            description: Some(description.to_string()).filter(|d| !d.trim().is_empty()),
        }
    }

    /// "DESCRIPTION (MNEM)", or a placeholder when no description exists.
    pub fn display(&self) -> String {
        match &self.description {
            Some(desc) => format!("{desc} ({})", self.mnemonic),
            None => format!("Description not found ({})", self.mnemonic),
        }
    }
}

/// Check that every required mnemonic appears among the header fields.
///
/// `missing` follows the requirement order, not the input order.
pub fn validate_header(fields: &[HeaderField], requirements: &[HeaderRequirement]) -> HeaderCompliance {
    let missing: Vec<String> = requirements
        .iter()
        .filter(|req| !fields.iter().any(|f| f.mnemonic == req.mnemonic))
        .map(HeaderRequirement::display)
        .collect();

    tracing::debug!(
        required = requirements.len(),
        missing = missing.len(),
        "Header validated"
    );

    HeaderCompliance {
        compliant: missing.is_empty(),
        missing,
    }
}

/// Header fields for display: empty values first, input order otherwise.
pub fn header_rows(fields: &[HeaderField]) -> Vec<HeaderRow> {
    let mut rows: Vec<HeaderRow> = fields
        .iter()
        .map(|f| HeaderRow {
            mnemonic: f.mnemonic.clone(),
            value: f.value.clone(),
            description: f.description.clone(),
            empty: f.is_empty(),
        })
        .collect();
    // sort_by_key is stable
    rows.sort_by_key(|r| !r.empty);
    rows
}

/// Well, company, date, and field names, with fallbacks for absent or
/// empty values.
pub fn well_identity(fields: &[HeaderField]) -> WellIdentity {
    let value_or = |mnemonic: &str, fallback: &str| {
        fields
            .iter()
            .find(|f| f.mnemonic == mnemonic && !f.is_empty())
            .map(|f| f.value.trim().to_string())
            .unwrap_or_else(|| fallback.to_string())
    };

    WellIdentity {
        well: value_or(constants::HEADER_WELL, constants::FALLBACK_WELL),
        company: value_or(constants::HEADER_COMPANY, constants::FALLBACK_COMPANY),
        date: value_or(constants::HEADER_DATE, constants::FALLBACK_DATE),
        field: value_or(constants::HEADER_FIELD, constants::FALLBACK_FIELD),
    }
}
