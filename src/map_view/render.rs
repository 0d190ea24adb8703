use bevy::prelude::*;

use crate::constants::{MARKER_RADIUS_PX, PIN_HEAD_RADIUS_PX, PIN_STEM_PX};
use crate::orchestrator::{AnnotationDelegate, AnnotationView, OrchestratorState};
use crate::theme;

use super::camera::{CameraZoom, MapCamera};
use super::{MapScene, Orchestrator, SelectedAnnotation};

/// Grid spacing in meters
const GRID_SPACING: f32 = 250.0;

pub fn draw_grid(mut gizmos: Gizmos, scene: Res<MapScene>) {
    let Some(rect) = scene.boundary_rect() else {
        return;
    };

    let start_x = (rect.min.x / GRID_SPACING).ceil() as i32;
    let end_x = (rect.max.x / GRID_SPACING).floor() as i32;
    let start_y = (rect.min.y / GRID_SPACING).ceil() as i32;
    let end_y = (rect.max.y / GRID_SPACING).floor() as i32;

    for x in start_x..=end_x {
        let x_pos = x as f32 * GRID_SPACING;
        gizmos.line_2d(
            Vec2::new(x_pos, rect.min.y),
            Vec2::new(x_pos, rect.max.y),
            theme::GRID_COLOR,
        );
    }

    for y in start_y..=end_y {
        let y_pos = y as f32 * GRID_SPACING;
        gizmos.line_2d(
            Vec2::new(rect.min.x, y_pos),
            Vec2::new(rect.max.x, y_pos),
            theme::GRID_COLOR,
        );
    }
}

pub fn draw_boundary(mut gizmos: Gizmos, scene: Res<MapScene>) {
    if let Some(rect) = scene.boundary_rect() {
        gizmos.rect_2d(
            Isometry2d::from_translation(rect.center()),
            rect.size(),
            theme::BOUNDARY_OUTLINE,
        );
    }
}

/// Draw every displayed annotation the way the delegate asks for.
///
/// Sizes are in screen pixels, so they are multiplied by the zoom scale.
pub fn draw_annotations(
    mut gizmos: Gizmos,
    scene: Res<MapScene>,
    orchestrator: Option<Res<Orchestrator>>,
    selected: Res<SelectedAnnotation>,
    camera_query: Query<&CameraZoom, With<MapCamera>>,
) {
    let Some(orchestrator) = orchestrator else {
        return;
    };
    if orchestrator.state() != OrchestratorState::Active || !scene.delegate_attached() {
        return;
    }
    let scale = camera_query.single().map(|zoom| zoom.scale).unwrap_or(1.0);

    for (id, coordinate) in scene.annotations() {
        let position = scene.world_position(*coordinate);
        match orchestrator.render_annotation(*id) {
            Some(AnnotationView::Marker(marker)) => {
                let color = theme::annotation_color(marker.reuse_identifier);
                let radius = MARKER_RADIUS_PX * scale;
                gizmos.circle_2d(Isometry2d::from_translation(position), radius, color);
                gizmos.circle_2d(Isometry2d::from_translation(position), radius * 0.45, color);
                if selected.0 == Some(*id) {
                    gizmos.circle_2d(
                        Isometry2d::from_translation(position),
                        radius * 1.6,
                        theme::MARKER_SELECTED,
                    );
                }
            }
            Some(AnnotationView::PinDrop(pin)) => {
                let color = theme::annotation_color(pin.reuse_identifier);
                let head = position + Vec2::Y * PIN_STEM_PX * scale;
                gizmos.line_2d(position, head, color);
                gizmos.circle_2d(
                    Isometry2d::from_translation(head),
                    PIN_HEAD_RADIUS_PX * scale,
                    color,
                );
            }
            None => {}
        }
    }
}
