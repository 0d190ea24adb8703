//! Map orchestration: camera setup, the displayed points of interest and the
//! annotation delegate.
//!
//! The orchestrator never talks to the renderer directly. It drives a
//! [`MapWidget`] and answers the widget's questions through
//! [`AnnotationDelegate`]. The bevy side implements the widget; tests use a
//! recording fake.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::constants::{
    BOUNDARY_CENTER, BOUNDARY_LATITUDINAL_METERS, BOUNDARY_LONGITUDINAL_METERS, CALLOUT_OFFSET,
    INITIAL_CENTER, INITIAL_REGION_RADIUS_METERS, MARKER_REUSE_IDENTIFIER,
    MAX_CENTER_DISTANCE_METERS, PIN_REMOVAL_DELAY, PIN_REUSE_IDENTIFIER,
};
use crate::geo::{CameraZoomRange, Coordinate, CoordinateRegion};
use crate::loader::{load_initial_data, BundledResource, ResourceLocator};
use crate::navigation::Navigator;
use crate::pin::{PinGeneration, TapOutcome, TemporaryPinController};
use crate::poi::{DirectionsMode, PointOfInterest};

/// Identifies an annotation shown by the map widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationId {
    /// Index into the orchestrator's point-of-interest list
    PointOfInterest(usize),
    TemporaryPin(PinGeneration),
}

/// The operations the orchestrator needs from a map widget
pub trait MapWidget {
    fn set_region(&mut self, region: CoordinateRegion);
    fn set_camera_boundary(&mut self, boundary: CoordinateRegion);
    fn set_camera_zoom_range(&mut self, range: CameraZoomRange);
    /// Route rendering and interaction requests to the orchestrator from now on
    fn attach_delegate(&mut self);
    fn add_annotations(&mut self, annotations: &[(AnnotationId, Coordinate)]);
    fn remove_annotation(&mut self, id: AnnotationId);

    fn add_annotation(&mut self, id: AnnotationId, coordinate: Coordinate) {
        self.add_annotations(&[(id, coordinate)]);
    }
}

/// Callbacks the map widget makes into its delegate
pub trait AnnotationDelegate {
    /// Must be free of side effects; may be called any number of times
    fn render_annotation(&self, id: AnnotationId) -> Option<AnnotationView>;
    /// The detail-disclosure control of an annotation was activated
    fn handle_interaction(&self, id: AnnotationId);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerView {
    pub reuse_identifier: &'static str,
    pub can_show_callout: bool,
    pub callout_offset: (f32, f32),
    pub detail_disclosure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinDropView {
    pub reuse_identifier: &'static str,
}

/// How the widget should draw an annotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnnotationView {
    Marker(MarkerView),
    PinDrop(PinDropView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrchestratorState {
    #[default]
    Uninitialized,
    Active,
}

/// Fixed camera configuration applied on activation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub initial_center: Coordinate,
    pub initial_radius_meters: f64,
    pub boundary_center: Coordinate,
    pub boundary_latitudinal_meters: f64,
    pub boundary_longitudinal_meters: f64,
    pub max_center_distance_meters: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            initial_center: INITIAL_CENTER,
            initial_radius_meters: INITIAL_REGION_RADIUS_METERS,
            boundary_center: BOUNDARY_CENTER,
            boundary_latitudinal_meters: BOUNDARY_LATITUDINAL_METERS,
            boundary_longitudinal_meters: BOUNDARY_LONGITUDINAL_METERS,
            max_center_distance_meters: MAX_CENTER_DISTANCE_METERS,
        }
    }
}

impl CameraSettings {
    pub fn initial_region(&self) -> CoordinateRegion {
        CoordinateRegion::from_distance(
            self.initial_center,
            self.initial_radius_meters,
            self.initial_radius_meters,
        )
    }

    pub fn boundary(&self) -> CoordinateRegion {
        CoordinateRegion::from_distance(
            self.boundary_center,
            self.boundary_latitudinal_meters,
            self.boundary_longitudinal_meters,
        )
    }

    pub fn zoom_range(&self) -> CameraZoomRange {
        CameraZoomRange::with_max(self.max_center_distance_meters)
    }
}

pub struct MapOrchestrator {
    state: OrchestratorState,
    camera: CameraSettings,
    points_of_interest: Vec<PointOfInterest>,
    pins: TemporaryPinController,
    navigator: Box<dyn Navigator>,
    directions_mode: DirectionsMode,
    default_location_name: Option<String>,
}

impl MapOrchestrator {
    pub fn new(camera: CameraSettings, navigator: Box<dyn Navigator>) -> Self {
        Self {
            state: OrchestratorState::Uninitialized,
            camera,
            points_of_interest: Vec::new(),
            pins: TemporaryPinController::new(PIN_REMOVAL_DELAY),
            navigator,
            directions_mode: DirectionsMode::Driving,
            default_location_name: None,
        }
    }

    pub fn with_directions_mode(mut self, mode: DirectionsMode) -> Self {
        self.directions_mode = mode;
        self
    }

    pub fn with_pin_removal_delay(mut self, delay: Duration) -> Self {
        self.pins = TemporaryPinController::new(delay);
        self
    }

    /// Location name given to every loaded point of interest on activation
    pub fn with_default_location_name(mut self, name: Option<String>) -> Self {
        self.default_location_name = name;
        self
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn points_of_interest(&self) -> &[PointOfInterest] {
        &self.points_of_interest
    }

    pub fn point_of_interest(&self, id: AnnotationId) -> Option<&PointOfInterest> {
        match id {
            AnnotationId::PointOfInterest(index) => self.points_of_interest.get(index),
            AnnotationId::TemporaryPin(_) => None,
        }
    }

    pub fn pins(&self) -> &TemporaryPinController {
        &self.pins
    }

    /// Configure the widget and load the bundled points of interest.
    ///
    /// Happens once; later calls are ignored and return `false`.
    pub fn activate<W: MapWidget + ?Sized>(
        &mut self,
        widget: &mut W,
        locator: &dyn ResourceLocator,
        resource: &BundledResource,
    ) -> bool {
        if self.state == OrchestratorState::Active {
            warn!("Map orchestrator is already active");
            return false;
        }

        widget.set_region(self.camera.initial_region());
        widget.set_camera_boundary(self.camera.boundary());
        widget.set_camera_zoom_range(self.camera.zoom_range());
        widget.attach_delegate();

        let mut loaded = load_initial_data(locator, resource);
        if let Some(name) = &self.default_location_name {
            for poi in &mut loaded {
                poi.set_location_name(name.clone());
            }
        }
        self.points_of_interest.extend(loaded);

        let annotations: Vec<_> = self
            .points_of_interest
            .iter()
            .enumerate()
            .map(|(index, poi)| (AnnotationId::PointOfInterest(index), poi.coordinate()))
            .collect();
        widget.add_annotations(&annotations);

        self.state = OrchestratorState::Active;
        info!(
            "Map active with {} points of interest",
            self.points_of_interest.len()
        );
        true
    }

    pub fn handle_tap<W: MapWidget + ?Sized>(
        &mut self,
        coordinate: Coordinate,
        widget: &mut W,
    ) -> TapOutcome {
        self.pins.handle_tap(coordinate, widget)
    }

    pub fn expire_pin<W: MapWidget + ?Sized>(
        &mut self,
        generation: PinGeneration,
        widget: &mut W,
    ) -> bool {
        self.pins.expire(generation, widget)
    }
}

impl AnnotationDelegate for MapOrchestrator {
    fn render_annotation(&self, id: AnnotationId) -> Option<AnnotationView> {
        match id {
            AnnotationId::PointOfInterest(index) if index < self.points_of_interest.len() => {
                Some(AnnotationView::Marker(MarkerView {
                    reuse_identifier: MARKER_REUSE_IDENTIFIER,
                    can_show_callout: true,
                    callout_offset: CALLOUT_OFFSET,
                    detail_disclosure: true,
                }))
            }
            AnnotationId::TemporaryPin(generation) if self.pins.is_current(generation) => {
                Some(AnnotationView::PinDrop(PinDropView {
                    reuse_identifier: PIN_REUSE_IDENTIFIER,
                }))
            }
            _ => None,
        }
    }

    fn handle_interaction(&self, id: AnnotationId) {
        let Some(poi) = self.point_of_interest(id) else {
            return;
        };

        let Some(item) = poi.map_item() else {
            debug!(
                "{} has no location name, not opening directions",
                poi.title().unwrap_or("Point of interest")
            );
            return;
        };

        if let Err(e) = self.navigator.open_in_maps(&item, self.directions_mode) {
            warn!("{}", e);
        }
    }
}
