//! Service-region catalog: which regions a service exists in, per partition.
//!
//! A default catalog document is embedded into the binary at compile time; a
//! configuration-supplied path overrides it. Either way the catalog is loaded
//! once, is read-only for the lifetime of the process, and is safe for
//! unsynchronized concurrent reads.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::OnceCell;
use rust_embed::RustEmbed;
use serde::Deserialize;
use thiserror::Error;

use crate::context::AuditContext;
use crate::partition::Partition;

/// Embedded default catalog document.
#[derive(RustEmbed)]
#[folder = "resources"]
#[include = "*.json"]
struct CatalogResources;

const EMBEDDED_CATALOG_FILE: &str = "aws_services_regions.json";

/// The region/service metadata resource could not be loaded. Fatal at
/// startup, not per call.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read service-region catalog at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse service-region catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("embedded service-region catalog `{0}` is missing from the binary")]
    MissingEmbeddedResource(&'static str),

    #[error("embedded service-region catalog is not valid UTF-8")]
    InvalidEmbeddedResource,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    services: HashMap<String, ServiceEntry>,
}

#[derive(Debug, Deserialize)]
struct ServiceEntry {
    regions: HashMap<String, Vec<String>>,
}

/// Immutable mapping of `service → partition → ordered region list`.
#[derive(Debug)]
pub struct ServiceRegionCatalog {
    services: HashMap<String, HashMap<String, Vec<String>>>,
}

impl ServiceRegionCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let services = document
            .services
            .into_iter()
            .map(|(name, entry)| (name, entry.regions))
            .collect();
        Ok(Self { services })
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        log::debug!(
            "loaded service-region catalog from {} ({} services)",
            path.display(),
            catalog.services.len()
        );
        Ok(catalog)
    }

    /// Load the catalog document embedded at compile time.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        let file = CatalogResources::get(EMBEDDED_CATALOG_FILE)
            .ok_or(CatalogError::MissingEmbeddedResource(EMBEDDED_CATALOG_FILE))?;
        let json =
            std::str::from_utf8(&file.data).map_err(|_| CatalogError::InvalidEmbeddedResource)?;
        Self::from_json(json)
    }

    /// Raw catalog entry for `(service, partition)`. `None` when the service
    /// has no entry for the partition at all.
    pub fn regions_for(&self, service: &str, partition: Partition) -> Option<&[String]> {
        self.services
            .get(service)?
            .get(partition.as_str())
            .map(Vec::as_slice)
    }

    /// Catalog regions for `(service, context.partition)`, intersected with
    /// the audited scope when one is set.
    ///
    /// An empty result is the legitimate "service unsupported here" signal,
    /// never an error.
    pub fn available_regions(&self, service: &str, context: &AuditContext) -> Vec<String> {
        let Some(catalog_regions) = self.regions_for(service, context.partition()) else {
            return Vec::new();
        };

        let audited = context.audited_regions();
        if audited.is_empty() {
            catalog_regions.to_vec()
        } else {
            catalog_regions
                .iter()
                .filter(|region| audited.contains(region))
                .cloned()
                .collect()
        }
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

static SHARED: OnceCell<ServiceRegionCatalog> = OnceCell::new();

/// Process-wide catalog, lazily loaded from the embedded document on first
/// use unless [`init_shared_from_path`] ran first.
pub fn shared() -> Result<&'static ServiceRegionCatalog, CatalogError> {
    SHARED.get_or_try_init(ServiceRegionCatalog::load_embedded)
}

/// Initialize the process-wide catalog from a configuration-supplied path.
///
/// Must run before the first [`shared`] call to take effect; once the catalog
/// is loaded it stays as-is for the lifetime of the process.
pub fn init_shared_from_path(
    path: impl AsRef<Path>,
) -> Result<&'static ServiceRegionCatalog, CatalogError> {
    let path = path.as_ref();
    if let Some(existing) = SHARED.get() {
        log::warn!(
            "service-region catalog already initialized; ignoring {}",
            path.display()
        );
        return Ok(existing);
    }
    let catalog = ServiceRegionCatalog::load_from_path(path)?;
    Ok(SHARED.get_or_init(|| catalog))
}
