//! Handoff to an external navigation application.

use tracing::info;

use crate::poi::{DirectionsMode, MapItem};

#[derive(Debug)]
pub struct NavigationError(pub std::io::Error);

impl std::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to open navigation app: {}", self.0)
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Something that can show directions to a [`MapItem`]
pub trait Navigator: Send + Sync {
    fn open_in_maps(&self, item: &MapItem, mode: DirectionsMode) -> Result<(), NavigationError>;
}

/// Opens a maps URL with whatever the operating system has registered for it
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemNavigator;

impl Navigator for SystemNavigator {
    fn open_in_maps(&self, item: &MapItem, mode: DirectionsMode) -> Result<(), NavigationError> {
        let url = item.directions_url(mode);
        info!(
            "Opening directions to {} ({}): {}",
            item.name.as_deref().unwrap_or("unnamed location"),
            item.street,
            url
        );
        open::that(&url).map_err(NavigationError)
    }
}
