//! Fakes shared by unit tests across modules.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::geo::{CameraZoomRange, Coordinate, CoordinateRegion};
use crate::geocode::{GeocodeError, Geocoder, Placemark};
use crate::loader::BundleLocator;
use crate::navigation::{NavigationError, Navigator};
use crate::orchestrator::{AnnotationId, MapWidget};
use crate::poi::{DirectionsMode, MapItem};

/// Map widget that remembers every call
#[derive(Debug, Default)]
pub struct RecordingWidget {
    pub region: Option<CoordinateRegion>,
    pub boundary: Option<CoordinateRegion>,
    pub zoom_range: Option<CameraZoomRange>,
    pub delegate_attached: bool,
    annotations: Vec<(AnnotationId, Coordinate)>,
    log: Vec<String>,
}

impl RecordingWidget {
    pub fn displayed(&self) -> Vec<AnnotationId> {
        self.annotations.iter().map(|(id, _)| *id).collect()
    }

    pub fn coordinate_of(&self, id: AnnotationId) -> Option<Coordinate> {
        self.annotations
            .iter()
            .find(|(shown, _)| *shown == id)
            .map(|(_, coordinate)| *coordinate)
    }

    pub fn log(&self) -> Vec<String> {
        self.log.clone()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl MapWidget for RecordingWidget {
    fn set_region(&mut self, region: CoordinateRegion) {
        self.log.push("set_region".to_string());
        self.region = Some(region);
    }

    fn set_camera_boundary(&mut self, boundary: CoordinateRegion) {
        self.log.push("set_camera_boundary".to_string());
        self.boundary = Some(boundary);
    }

    fn set_camera_zoom_range(&mut self, range: CameraZoomRange) {
        self.log.push("set_camera_zoom_range".to_string());
        self.zoom_range = Some(range);
    }

    fn attach_delegate(&mut self) {
        self.log.push("attach_delegate".to_string());
        self.delegate_attached = true;
    }

    fn add_annotations(&mut self, annotations: &[(AnnotationId, Coordinate)]) {
        for (id, coordinate) in annotations {
            self.log.push(format!("add {:?}", id));
            self.annotations.push((*id, *coordinate));
        }
    }

    fn remove_annotation(&mut self, id: AnnotationId) {
        self.log.push(format!("remove {:?}", id));
        self.annotations.retain(|(shown, _)| *shown != id);
    }
}

/// Navigator that records handoffs instead of launching anything
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    pub opened: Arc<Mutex<Vec<(MapItem, DirectionsMode)>>>,
    pub fail: bool,
}

impl RecordingNavigator {
    pub fn opened(&self) -> Vec<(MapItem, DirectionsMode)> {
        self.opened.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn open_in_maps(&self, item: &MapItem, mode: DirectionsMode) -> Result<(), NavigationError> {
        self.opened.lock().unwrap().push((item.clone(), mode));
        if self.fail {
            return Err(NavigationError(std::io::Error::other("no maps app")));
        }
        Ok(())
    }
}

/// Geocoder that gives the same answer for every coordinate and records requests
#[derive(Debug, Clone)]
pub struct FixedGeocoder {
    answer: Result<Option<Placemark>, GeocodeError>,
    requests: Arc<Mutex<Vec<Coordinate>>>,
}

impl FixedGeocoder {
    pub fn answering(answer: Result<Option<Placemark>, GeocodeError>) -> Self {
        Self {
            answer,
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<Coordinate> {
        self.requests.lock().unwrap().clone()
    }
}

impl Geocoder for FixedGeocoder {
    fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<Placemark>, GeocodeError> {
        self.requests.lock().unwrap().push(coordinate);
        self.answer.clone()
    }
}

/// Scratch directory under the system temp dir, removed on drop
pub struct ScratchBundle {
    pub dir: PathBuf,
    pub locator: BundleLocator,
}

impl ScratchBundle {
    pub fn new(test_name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "maproutes_{}_{}",
            test_name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("Failed to create test directory");
        Self {
            locator: BundleLocator::new(&dir),
            dir,
        }
    }

    pub fn write(&self, file_name: &str, contents: &[u8]) {
        std::fs::write(self.dir.join(file_name), contents).expect("Failed to write fixture");
    }
}

impl Drop for ScratchBundle {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
