// LasQC - app/archive.rs
//
// Copies an approved LAS file into the verified archive under a name built
// from the well identity and the detected services:
//
//   <root>/<FIELD>/<WELL>/<WELL>_<DATE>_<SERVICES>-<COMPANY>.las

use crate::core::model::{AnalysisReport, WellIdentity};
use crate::util::constants;
use crate::util::error::ArchiveError;
use std::path::{Path, PathBuf};

fn sanitize(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            other => other,
        })
        .collect()
}

/// File name for the archived copy.
///
/// Services are the detected services joined by `-`, or `NoServices`.
pub fn archive_file_name(identity: &WellIdentity, detected_services: &[String]) -> String {
    let services = if detected_services.is_empty() {
        constants::NO_SERVICES_LABEL.to_string()
    } else {
        detected_services.join("-")
    };
    format!(
        "{}_{}_{}-{}.{}",
        sanitize(&identity.well),
        sanitize(&identity.date),
        sanitize(&services),
        sanitize(&identity.company),
        constants::ARCHIVE_EXTENSION
    )
}

/// Directory the archived copy goes into: `<root>/<FIELD>/<WELL>/`.
pub fn archive_destination(root: &Path, identity: &WellIdentity) -> PathBuf {
    root.join(sanitize(&identity.field))
        .join(sanitize(&identity.well))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy `source` into the archive when `report` is approved.
///
/// Returns the path of the archived copy. An existing copy with the same
/// name is overwritten, unless `source` is that copy.
pub fn archive(
    report: &AnalysisReport,
    source: &Path,
    root: &Path,
) -> Result<PathBuf, ArchiveError> {
    if !report.summary.approved {
        return Err(ArchiveError::NotApproved);
    }
    if !source.is_file() {
        return Err(ArchiveError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }

    let dir = archive_destination(root, &report.identity);
    std::fs::create_dir_all(&dir).map_err(|e| ArchiveError::CreateDir {
        path: dir.clone(),
        source: e,
    })?;

    let target = dir.join(archive_file_name(
        &report.identity,
        &report.detected_services,
    ));
    // Copying a file onto itself truncates it before reading.
    if is_same_file(source, &target) {
        tracing::info!(
            path = %target.display(),
            "File is already in the archive; nothing to copy"
        );
        return Ok(target);
    }

    std::fs::copy(source, &target).map_err(|e| ArchiveError::Copy {
        from: source.to_path_buf(),
        to: target.clone(),
        source: e,
    })?;

    tracing::info!(
        from = %source.display(),
        to = %target.display(),
        "Archived approved file"
    );
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ComplianceSummary, HeaderCompliance};
    use chrono::Utc;
    use std::fs;

    fn identity() -> WellIdentity {
        WellIdentity {
            well: "PAE 123".to_string(),
            company: "ACME Logging".to_string(),
            date: "2024-05-01".to_string(),
            field: "CERRO DRAGON".to_string(),
        }
    }

    fn report(approved: bool) -> AnalysisReport {
        AnalysisReport {
            source: "in.las".to_string(),
            generated_at: Utc::now(),
            identity: identity(),
            curves: vec![],
            header_rows: vec![],
            header: HeaderCompliance {
                compliant: approved,
                missing: vec![],
            },
            detected_services: vec!["COMBO BASICO".to_string(), "SONICO".to_string()],
            requested_services: vec![],
            verdicts: vec![],
            summary: ComplianceSummary {
                header_compliant: approved,
                services_compliant: true,
                approved,
            },
        }
    }

    #[test]
    fn test_file_name_replaces_spaces() {
        let name = archive_file_name(&identity(), &["COMBO BASICO".to_string()]);
        assert_eq!(name, "PAE_123_2024-05-01_COMBO_BASICO-ACME_Logging.las");
    }

    #[test]
    fn test_file_name_without_services() {
        let name = archive_file_name(&identity(), &[]);
        assert_eq!(name, "PAE_123_2024-05-01_NoServices-ACME_Logging.las");
    }

    #[test]
    fn test_destination_is_field_then_well() {
        let dest = archive_destination(Path::new("/archive"), &identity());
        assert_eq!(dest, PathBuf::from("/archive/CERRO_DRAGON/PAE_123"));
    }

    #[test]
    fn test_archive_copies_approved_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.las");
        fs::write(&source, "~A\n").unwrap();
        let root = dir.path().join("verified");

        let target = archive(&report(true), &source, &root).unwrap();
        assert_eq!(
            target,
            root.join("CERRO_DRAGON")
                .join("PAE_123")
                .join("PAE_123_2024-05-01_COMBO_BASICO-SONICO-ACME_Logging.las")
        );
        assert_eq!(fs::read_to_string(&target).unwrap(), "~A\n");
    }

    #[test]
    fn test_rearchiving_archived_copy_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.las");
        fs::write(&source, "~A\n1 2\n").unwrap();
        let root = dir.path().join("verified");

        let archived = archive(&report(true), &source, &root).unwrap();
        let again = archive(&report(true), &archived, &root).unwrap();

        assert_eq!(again, archived);
        assert_eq!(fs::read_to_string(&archived).unwrap(), "~A\n1 2\n");
    }

    #[test]
    fn test_archive_refuses_unapproved() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.las");
        fs::write(&source, "~A\n").unwrap();
        let root = dir.path().join("verified");

        assert!(matches!(
            archive(&report(false), &source, &root),
            Err(ArchiveError::NotApproved)
        ));
        assert!(!root.exists());
    }

    #[test]
    fn test_archive_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = archive(&report(true), &dir.path().join("gone.las"), dir.path());
        assert!(matches!(result, Err(ArchiveError::SourceNotFound { .. })));
    }
}
