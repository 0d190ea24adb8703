//! Loads the bundled GeoJSON file into points of interest.
//!
//! Loading never fails from the caller's point of view: [`load_initial_data`]
//! turns every error into an empty list and a log line. The typed
//! [`load_points_of_interest`] is there for callers (and tests) that want the
//! reason.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::geojson::{decode_document, DocumentError};
use crate::poi::{FeatureDecodeError, PointOfInterest};

/// Resolves a logical resource name to a file on disk
pub trait ResourceLocator {
    fn locate(&self, name: &str, extension: &str) -> Option<PathBuf>;
}

/// Looks up `<root>/<name>.<extension>`
#[derive(Debug, Clone)]
pub struct BundleLocator {
    root: PathBuf,
}

impl BundleLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Bundled assets directory of the running build
impl Default for BundleLocator {
    fn default() -> Self {
        crate::paths::AppDirs::current().resource_locator()
    }
}

impl ResourceLocator for BundleLocator {
    fn locate(&self, name: &str, extension: &str) -> Option<PathBuf> {
        let path = self.root.join(format!("{}.{}", name, extension));
        path.is_file().then_some(path)
    }
}

/// A bundled file identified by name and extension, e.g. `CatsUA` + `geojson`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledResource {
    pub name: String,
    pub extension: String,
}

impl BundledResource {
    pub fn new(name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
        }
    }
}

impl std::fmt::Display for BundledResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.name, self.extension)
    }
}

#[derive(Debug)]
pub enum LoadError {
    NotFound(String),
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Decode(DocumentError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::NotFound(name) => write!(f, "resource {} not found", name),
            LoadError::Read { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            LoadError::Decode(e) => write!(f, "failed to decode GeoJSON: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::NotFound(_) => None,
            LoadError::Read { source, .. } => Some(source),
            LoadError::Decode(e) => Some(e),
        }
    }
}

impl From<DocumentError> for LoadError {
    fn from(err: DocumentError) -> Self {
        LoadError::Decode(err)
    }
}

/// A feature that was dropped, with its position among the document's features
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFeature {
    pub index: usize,
    pub reason: FeatureDecodeError,
}

/// Result of a successful decode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub points_of_interest: Vec<PointOfInterest>,
    pub skipped: Vec<SkippedFeature>,
}

/// Decode GeoJSON bytes, keeping features that convert to points of interest.
///
/// Non-feature objects are ignored; features that fail to convert are listed
/// in [`LoadReport::skipped`].
pub fn decode_points_of_interest(bytes: &[u8]) -> Result<LoadReport, DocumentError> {
    let features = decode_document(bytes)?
        .into_iter()
        .filter_map(|object| object.into_feature());

    let mut report = LoadReport::default();
    for (index, feature) in features.enumerate() {
        match PointOfInterest::from_feature(&feature) {
            Ok(poi) => report.points_of_interest.push(poi),
            Err(reason) => report.skipped.push(SkippedFeature { index, reason }),
        }
    }
    Ok(report)
}

pub fn load_points_of_interest(
    locator: &dyn ResourceLocator,
    resource: &BundledResource,
) -> Result<LoadReport, LoadError> {
    let path = locator
        .locate(&resource.name, &resource.extension)
        .ok_or_else(|| LoadError::NotFound(resource.to_string()))?;

    let bytes = std::fs::read(&path).map_err(|source| LoadError::Read {
        path: path.clone(),
        source,
    })?;

    let report = decode_points_of_interest(&bytes)?;
    Ok(report)
}

/// Best-effort load: any failure yields an empty list.
pub fn load_initial_data(
    locator: &dyn ResourceLocator,
    resource: &BundledResource,
) -> Vec<PointOfInterest> {
    match load_points_of_interest(locator, resource) {
        Ok(report) => {
            for skipped in &report.skipped {
                debug!("Skipping feature #{}: {}", skipped.index, skipped.reason);
            }
            info!(
                "Loaded {} points of interest from {} ({} skipped)",
                report.points_of_interest.len(),
                resource,
                report.skipped.len()
            );
            report.points_of_interest
        }
        // No bundled data is a valid configuration, not a failure
        Err(LoadError::NotFound(name)) => {
            debug!("No bundled resource {}, nothing to load", name);
            Vec::new()
        }
        Err(e) => {
            error!("Error loading initial data: {}", e);
            Vec::new()
        }
    }
}
