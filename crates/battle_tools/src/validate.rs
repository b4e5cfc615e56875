//! Data validation utilities.

use std::path::Path;

use crate::loader::{load_catalog, CatalogLoadError};

/// Outcome of validating one catalog file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// File that was checked.
    pub path: String,
    /// Templates in the catalog.
    pub templates: usize,
    /// Problems found, empty when the catalog is consistent.
    pub problems: Vec<String>,
}

impl ValidationReport {
    /// Whether the catalog passed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Load and check a single catalog file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed. Consistency
/// problems are reported in the returned [`ValidationReport`].
pub fn validate_catalog_file(path: &Path) -> Result<ValidationReport, CatalogLoadError> {
    let catalog = load_catalog(path)?;
    let problems: Vec<String> = catalog.validate().iter().map(ToString::to_string).collect();
    for problem in &problems {
        tracing::warn!(path = %path.display(), "{problem}");
    }
    Ok(ValidationReport {
        path: path.display().to_string(),
        templates: catalog.len(),
        problems,
    })
}

/// Validate every `.ron` catalog in a directory, in file name order.
///
/// # Errors
///
/// Returns an error if the directory or any catalog in it cannot be read or
/// parsed.
pub fn validate_data_directory(dir: &Path) -> Result<Vec<ValidationReport>, CatalogLoadError> {
    if !dir.is_dir() {
        return Err(CatalogLoadError::FileNotFound(dir.display().to_string()));
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "ron") {
            paths.push(path);
        }
    }
    paths.sort();

    paths.iter().map(|p| validate_catalog_file(p)).collect()
}

/// Validate a catalog file or a directory of them.
///
/// # Errors
///
/// See [`validate_catalog_file`] and [`validate_data_directory`].
pub fn validate_path(path: &Path) -> Result<Vec<ValidationReport>, CatalogLoadError> {
    if path.is_dir() {
        validate_data_directory(path)
    } else {
        Ok(vec![validate_catalog_file(path)?])
    }
}
