// LasQC - app/catalog_mgr.rs
//
// Chooses and loads the QC catalog: an explicitly named file, the user's
// catalog.toml in the config directory, or the built-in catalog embedded
// in the binary.

use crate::core::catalog::{self, QcCatalog};
use crate::util::constants;
use crate::util::error::CatalogError;
use std::path::Path;

/// Load the catalog to analyse with.
///
/// An `explicit` path (from `--catalog` or `[catalog] path`) must load; its
/// errors are returned. Otherwise `user_catalog` is tried when it exists;
/// an invalid user catalog is logged and the built-in catalog is used.
pub fn load_catalog(
    explicit: Option<&Path>,
    user_catalog: Option<&Path>,
) -> Result<QcCatalog, CatalogError> {
    if let Some(path) = explicit {
        return load_catalog_file(path);
    }

    if let Some(path) = user_catalog {
        if path.is_file() {
            match load_catalog_file(path) {
                Ok(c) => return Ok(c),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "User catalog is invalid; using built-in catalog"
                    );
                }
            }
        } else {
            tracing::debug!(
                path = %path.display(),
                "No user catalog found (skipping)"
            );
        }
    }

    catalog::load_builtin_catalog()
}

/// Read, parse, and validate a catalog file from disk.
pub fn load_catalog_file(path: &Path) -> Result<QcCatalog, CatalogError> {
    let io_err = |e| CatalogError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let metadata = std::fs::metadata(path).map_err(io_err)?;
    if metadata.len() > constants::MAX_CATALOG_FILE_SIZE {
        return Err(CatalogError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_CATALOG_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(io_err)?;
    let catalog = catalog::parse_catalog_toml(&content, path)
        .and_then(|def| catalog::validate_and_compile(def, false))?;

    tracing::info!(
        path = %path.display(),
        name = %catalog.name,
        curve_types = catalog.aliases.entries().len(),
        services = catalog.services.services().len(),
        "Loaded catalog file"
    );
    Ok(catalog)
}
