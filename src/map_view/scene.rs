//! The bevy-side map widget.
//!
//! `MapScene` is what the orchestrator drives. It keeps the displayed
//! annotations in insertion order and converts between geographic
//! coordinates and world space (1 world unit = 1 meter).

use bevy::prelude::*;

use crate::constants::INITIAL_CENTER;
use crate::geo::{CameraZoomRange, Coordinate, CoordinateRegion, LocalProjection};
use crate::orchestrator::{AnnotationId, MapWidget};

#[derive(Resource, Debug)]
pub struct MapScene {
    projection: LocalProjection,
    boundary: Option<CoordinateRegion>,
    zoom_range: CameraZoomRange,
    delegate_attached: bool,
    annotations: Vec<(AnnotationId, Coordinate)>,
    /// Region the camera should jump to on the next frame
    pending_region: Option<CoordinateRegion>,
}

impl Default for MapScene {
    fn default() -> Self {
        Self::new(INITIAL_CENTER)
    }
}

impl MapScene {
    pub fn new(origin: Coordinate) -> Self {
        Self {
            projection: LocalProjection::new(origin),
            boundary: None,
            zoom_range: CameraZoomRange::default(),
            delegate_attached: false,
            annotations: Vec::new(),
            pending_region: None,
        }
    }

    pub fn world_position(&self, coordinate: Coordinate) -> Vec2 {
        let (x, y) = self.projection.project(coordinate);
        Vec2::new(x as f32, y as f32)
    }

    /// Geographic coordinate under a world position, `None` off the globe
    pub fn coordinate_at(&self, world: Vec2) -> Option<Coordinate> {
        self.projection
            .unproject(world.x as f64, world.y as f64)
            .ok()
    }

    pub fn annotations(&self) -> &[(AnnotationId, Coordinate)] {
        &self.annotations
    }

    pub fn annotation_position(&self, id: AnnotationId) -> Option<Vec2> {
        self.annotations
            .iter()
            .find(|(shown, _)| *shown == id)
            .map(|(_, coordinate)| self.world_position(*coordinate))
    }

    pub fn zoom_range(&self) -> CameraZoomRange {
        self.zoom_range
    }

    pub fn delegate_attached(&self) -> bool {
        self.delegate_attached
    }

    /// Pan boundary as a world-space rectangle
    pub fn boundary_rect(&self) -> Option<Rect> {
        let boundary = self.boundary?;
        let south_west = self.world_position(Coordinate::new_unchecked(
            boundary.min_latitude(),
            boundary.min_longitude(),
        ));
        let north_east = self.world_position(Coordinate::new_unchecked(
            boundary.max_latitude(),
            boundary.max_longitude(),
        ));
        Some(Rect::from_corners(south_west, north_east))
    }

    /// Keep a camera center inside the pan boundary
    pub fn clamp_center(&self, center: Vec2) -> Vec2 {
        let Some(boundary) = self.boundary else {
            return center;
        };
        match self.coordinate_at(center) {
            Some(coordinate) if boundary.contains(coordinate) => center,
            Some(coordinate) => self.world_position(boundary.clamp(coordinate)),
            None => self.world_position(boundary.center),
        }
    }

    pub fn take_pending_region(&mut self) -> Option<CoordinateRegion> {
        self.pending_region.take()
    }

    /// Size of a region in meters, `(east-west, north-south)`
    pub fn region_size(&self, region: &CoordinateRegion) -> Vec2 {
        let south_west = self.world_position(Coordinate::new_unchecked(
            region.min_latitude(),
            region.min_longitude(),
        ));
        let north_east = self.world_position(Coordinate::new_unchecked(
            region.max_latitude(),
            region.max_longitude(),
        ));
        (north_east - south_west).abs()
    }

    /// Closest point-of-interest annotation within `radius` world units
    pub fn hit_test(&self, world: Vec2, radius: f32) -> Option<AnnotationId> {
        self.annotations
            .iter()
            .filter(|(id, _)| matches!(id, AnnotationId::PointOfInterest(_)))
            .map(|(id, coordinate)| (*id, self.world_position(*coordinate).distance(world)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

impl MapWidget for MapScene {
    fn set_region(&mut self, region: CoordinateRegion) {
        self.pending_region = Some(region);
    }

    fn set_camera_boundary(&mut self, boundary: CoordinateRegion) {
        self.boundary = Some(boundary);
    }

    fn set_camera_zoom_range(&mut self, range: CameraZoomRange) {
        self.zoom_range = range;
    }

    fn attach_delegate(&mut self) {
        self.delegate_attached = true;
    }

    fn add_annotations(&mut self, annotations: &[(AnnotationId, Coordinate)]) {
        self.annotations.extend_from_slice(annotations);
    }

    fn remove_annotation(&mut self, id: AnnotationId) {
        self.annotations.retain(|(shown, _)| *shown != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Coordinate {
        Coordinate::new(38.39, -0.52).unwrap()
    }

    #[test]
    fn test_origin_projects_to_zero() {
        let scene = MapScene::new(origin());
        assert_eq!(scene.world_position(origin()), Vec2::ZERO);
    }

    #[test]
    fn test_coordinate_round_trip_near_origin() {
        let scene = MapScene::new(origin());
        let coordinate = Coordinate::new(38.395, -0.51).unwrap();
        let back = scene
            .coordinate_at(scene.world_position(coordinate))
            .unwrap();
        assert!((back.latitude() - coordinate.latitude()).abs() < 1e-5);
        assert!((back.longitude() - coordinate.longitude()).abs() < 1e-5);
    }

    #[test]
    fn test_boundary_rect_is_five_km() {
        let mut scene = MapScene::new(origin());
        scene.set_camera_boundary(CoordinateRegion::from_distance(origin(), 5000.0, 5000.0));

        let rect = scene.boundary_rect().unwrap();
        assert!((rect.width() - 5000.0).abs() < 1.0);
        assert!((rect.height() - 5000.0).abs() < 1.0);
        assert!(rect.contains(Vec2::ZERO));
    }

    #[test]
    fn test_clamp_center_without_boundary() {
        let scene = MapScene::new(origin());
        let far = Vec2::new(1.0e6, -1.0e6);
        assert_eq!(scene.clamp_center(far), far);
    }

    #[test]
    fn test_clamp_center_to_boundary() {
        let mut scene = MapScene::new(origin());
        scene.set_camera_boundary(CoordinateRegion::from_distance(origin(), 2000.0, 2000.0));

        let clamped = scene.clamp_center(Vec2::new(5000.0, 0.0));
        assert!((clamped.x - 1000.0).abs() < 1.0);
        assert_eq!(clamped.y, 0.0);
    }

    #[test]
    fn test_set_region_is_taken_once() {
        let mut scene = MapScene::new(origin());
        scene.set_region(CoordinateRegion::from_distance(origin(), 1000.0, 1000.0));

        assert!(scene.take_pending_region().is_some());
        assert!(scene.take_pending_region().is_none());
    }

    #[test]
    fn test_hit_test_picks_nearest_point() {
        let mut scene = MapScene::new(origin());
        let near = Coordinate::new(38.39001, -0.52).unwrap();
        let farther = Coordinate::new(38.39005, -0.52).unwrap();
        scene.add_annotations(&[
            (AnnotationId::PointOfInterest(0), farther),
            (AnnotationId::PointOfInterest(1), near),
        ]);

        assert_eq!(
            scene.hit_test(Vec2::ZERO, 20.0),
            Some(AnnotationId::PointOfInterest(1))
        );
        assert_eq!(scene.hit_test(Vec2::new(500.0, 500.0), 20.0), None);
    }

    #[test]
    fn test_remove_annotation_keeps_order() {
        let mut scene = MapScene::new(origin());
        scene.add_annotations(&[
            (AnnotationId::PointOfInterest(0), origin()),
            (AnnotationId::PointOfInterest(1), origin()),
            (AnnotationId::PointOfInterest(2), origin()),
        ]);
        scene.remove_annotation(AnnotationId::PointOfInterest(1));

        let ids: Vec<_> = scene.annotations().iter().map(|(id, _)| *id).collect();
        assert_eq!(
            ids,
            vec![AnnotationId::PointOfInterest(0), AnnotationId::PointOfInterest(2)]
        );
    }
}
