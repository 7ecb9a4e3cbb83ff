//! Catalog snapshots on disk.
//!
//! The snapshot is a JSON object mapping service name to its `ServiceConfig`.
//! Saving optionally copies the previous file to `<path>.<unix-nanos>` first.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::catalog::error::CatalogError;
use crate::catalog::registry::ServiceCatalog;
use crate::config::CatalogConfig;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot contains an invalid service: {0}")]
    Catalog(#[from] CatalogError),
}

/// Write an empty snapshot if `path` does not exist yet.
pub fn ensure_snapshot(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, "{}")?;
    tracing::info!(path = ?path, "Created empty service snapshot");
    Ok(true)
}

/// Read a snapshot file.
pub fn read_snapshot(path: &Path) -> Result<CatalogConfig, SnapshotError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Load a catalog from a snapshot file.
pub fn load_catalog(path: &Path) -> Result<ServiceCatalog, SnapshotError> {
    let config = read_snapshot(path)?;
    for (name, service) in &config {
        tracing::info!(
            service = %name,
            hosts = ?service.hosts,
            routes = ?service.routes,
            "Loading service"
        );
    }
    let catalog = ServiceCatalog::from_config(&config)?;
    tracing::info!(path = ?path, count = catalog.len(), "Loaded service snapshot");
    Ok(catalog)
}

/// Save the catalog to `path`. Returns the backup location if one was made.
pub fn save_catalog(
    catalog: &ServiceCatalog,
    path: &Path,
    backup: bool,
) -> Result<Option<PathBuf>, SnapshotError> {
    let backup_path = if backup && path.exists() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let mut name = path.as_os_str().to_os_string();
        name.push(format!(".{nanos}"));
        let backup_path = PathBuf::from(name);
        fs::copy(path, &backup_path)?;
        Some(backup_path)
    } else {
        None
    };

    let snapshot = catalog.snapshot();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &snapshot)?;
    writer.flush()?;

    tracing::info!(
        path = ?path,
        backup = ?backup_path,
        count = snapshot.len(),
        "Saved service snapshot"
    );
    Ok(backup_path)
}
