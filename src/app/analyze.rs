// LasQC - app/analyze.rs
//
// Analysis orchestration: read a LAS file from disk, resolve which services
// to validate, and run the core analysis pass.

use crate::core::analysis;
use crate::core::catalog::QcCatalog;
use crate::core::las;
use crate::core::model::{AnalysisReport, LasFile};
use crate::util::constants;
use crate::util::error::{LasError, LasQcError};
use std::path::Path;

/// Read and parse a LAS file, enforcing the size limit.
pub fn read_las_file(path: &Path) -> Result<LasFile, LasError> {
    let io_err = |e| LasError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let metadata = std::fs::metadata(path).map_err(io_err)?;
    if metadata.len() > constants::MAX_LAS_FILE_SIZE {
        return Err(LasError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_LAS_FILE_SIZE,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read LAS file");
    las::parse_las(&las::decode_bytes(&bytes))
}

/// Services to validate: the explicit request, or every catalog service
/// when the request is empty.
pub fn resolve_requested(catalog: &QcCatalog, requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        catalog.services.names()
    } else {
        requested.to_vec()
    }
}

/// Read `path` and analyse it against `catalog`.
pub fn analyze_file(
    path: &Path,
    catalog: &QcCatalog,
    requested: &[String],
) -> Result<AnalysisReport, LasQcError> {
    let las_file = read_las_file(path)?;
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let services = resolve_requested(catalog, requested);
    Ok(analysis::analyze(&las_file, catalog, &source, &services))
}
