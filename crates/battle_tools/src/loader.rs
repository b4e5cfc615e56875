//! Reading catalogs and configuration from disk.

use std::path::Path;

use battle_core::config::BattleConfig;
use battle_core::data::UnitCatalog;
use battle_core::error::BattleError;
use thiserror::Error;

/// Error type for file loading.
#[derive(Error, Debug)]
pub enum CatalogLoadError {
    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),
    /// File read but its contents are invalid.
    #[error(transparent)]
    Invalid(#[from] BattleError),
}

fn read(path: &Path) -> Result<String, CatalogLoadError> {
    if !path.exists() {
        return Err(CatalogLoadError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Load a unit catalog from a RON file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<UnitCatalog, CatalogLoadError> {
    let path = path.as_ref();
    let contents = read(path)?;
    let catalog = UnitCatalog::from_ron_str(&contents, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), templates = catalog.len(), "Loaded catalog");
    Ok(catalog)
}

/// Load a battle configuration, or the defaults when `path` is `None`.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<BattleConfig, CatalogLoadError> {
    let Some(path) = path else {
        return Ok(BattleConfig::default());
    };
    let contents = read(path.as_ref())?;
    Ok(BattleConfig::from_ron_str(&contents)?)
}
