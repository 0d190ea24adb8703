//! Centralized constants used across the application.
//!
//! Fixed map positions, camera limits and sizes that are referenced from
//! more than one module.

use std::time::Duration;

use crate::geo::Coordinate;

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1280.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 800.0;

// ============================================================================
// Camera
// ============================================================================

/// Where the map opens: Universidad de Alicante, San Vicente del Raspeig
pub const INITIAL_CENTER: Coordinate = Coordinate::new_unchecked(38.389175, -0.5163323);

/// Visible distance around the initial center, edge to edge
pub const INITIAL_REGION_RADIUS_METERS: f64 = 1000.0;

/// Center of the area the camera may not pan out of
pub const BOUNDARY_CENTER: Coordinate = Coordinate::new_unchecked(38.3943634, -0.5345324);

pub const BOUNDARY_LATITUDINAL_METERS: f64 = 5000.0;
pub const BOUNDARY_LONGITUDINAL_METERS: f64 = 5000.0;

/// Zoom-out limit. There is no zoom-in limit.
pub const MAX_CENTER_DISTANCE_METERS: f64 = 10000.0;

/// Smallest orthographic scale the renderer accepts (meters per pixel)
pub const MIN_PROJECTION_SCALE: f32 = 0.001;

/// Zoom step per mouse wheel notch
pub const ZOOM_STEP: f32 = 1.1;

// ============================================================================
// Annotations
// ============================================================================

/// Bundled points of interest
pub const DEFAULT_RESOURCE_NAME: &str = "CatsUA";
pub const DEFAULT_RESOURCE_EXTENSION: &str = "geojson";

pub const MARKER_REUSE_IDENTIFIER: &str = "cat";
pub const PIN_REUSE_IDENTIFIER: &str = "pin";

/// Callout position relative to the marker, in screen points (x right, y down)
pub const CALLOUT_OFFSET: (f32, f32) = (-5.0, 5.0);

/// How long a dropped pin stays on the map
pub const PIN_REMOVAL_DELAY: Duration = Duration::from_secs(3);

/// Marker radius in screen pixels
pub const MARKER_RADIUS_PX: f32 = 9.0;

/// Pin head radius and stem length in screen pixels
pub const PIN_HEAD_RADIUS_PX: f32 = 7.0;
pub const PIN_STEM_PX: f32 = 16.0;

/// Clicks closer than this to a marker select it
pub const HIT_RADIUS_PX: f32 = 14.0;
