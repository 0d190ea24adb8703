use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::{MIN_PROJECTION_SCALE, ZOOM_STEP};
use crate::geo::CameraZoomRange;

use super::MapScene;

#[derive(Component)]
pub struct MapCamera;

/// Meters per logical pixel, mirrored into the orthographic projection
#[derive(Component)]
pub struct CameraZoom {
    pub scale: f32,
}

impl Default for CameraZoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Camera distance is the visible map height in meters
pub fn camera_distance(scale: f32, viewport_height: f32) -> f64 {
    scale as f64 * viewport_height as f64
}

/// Scale that shows `region_meters` entirely inside the viewport
pub fn scale_for_region(region_meters: Vec2, viewport: Vec2) -> f32 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return 1.0;
    }
    (region_meters.x / viewport.x)
        .max(region_meters.y / viewport.y)
        .max(MIN_PROJECTION_SCALE)
}

/// Apply the zoom range to a scale; zooming in only stops at the renderer floor
pub fn clamp_scale(scale: f32, viewport_height: f32, range: &CameraZoomRange) -> f32 {
    if viewport_height <= 0.0 {
        return scale.max(MIN_PROJECTION_SCALE);
    }
    let distance = range.clamp(camera_distance(scale, viewport_height));
    ((distance / viewport_height as f64) as f32).max(MIN_PROJECTION_SCALE)
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        MapCamera,
        CameraZoom::default(),
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// Move the camera to a region requested through the map widget
pub fn apply_region_request(
    mut scene: ResMut<MapScene>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut camera_query: Query<(&mut Transform, &mut CameraZoom), With<MapCamera>>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((mut transform, mut zoom)) = camera_query.single_mut() else {
        return;
    };
    let Some(region) = scene.take_pending_region() else {
        return;
    };

    let viewport = Vec2::new(window.width(), window.height());
    let center = scene.world_position(region.center);
    let scale = scale_for_region(scene.region_size(&region), viewport);

    transform.translation.x = center.x;
    transform.translation.y = center.y;
    zoom.scale = clamp_scale(scale, viewport.y, &scene.zoom_range());
    debug!(
        "Camera moved to {} showing {:.0} m",
        region.center,
        camera_distance(zoom.scale, viewport.y)
    );
}

pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut camera_query: Query<(&mut Transform, &CameraZoom), With<MapCamera>>,
) {
    if !mouse_button.any_pressed([MouseButton::Middle, MouseButton::Right]) {
        mouse_motion.clear();
        return;
    }

    let Ok((mut transform, zoom)) = camera_query.single_mut() else {
        return;
    };

    for event in mouse_motion.read() {
        let delta = event.delta * zoom.scale;
        transform.translation.x -= delta.x;
        transform.translation.y += delta.y;
    }
}

pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    scene: Res<MapScene>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut camera_query: Query<&mut CameraZoom, With<MapCamera>>,
) {
    let Ok(mut zoom) = camera_query.single_mut() else {
        return;
    };
    let viewport_height = window_query.single().map(|w| w.height()).unwrap_or(0.0);

    for event in scroll_events.read() {
        let notches = match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y * 0.01,
        };

        let scale = zoom.scale / ZOOM_STEP.powf(notches);
        zoom.scale = clamp_scale(scale, viewport_height, &scene.zoom_range());
    }
}

/// A taller window shows more map at the same scale, so the zoom range is
/// re-applied whenever the window changes
pub fn clamp_zoom_to_window(
    scene: Res<MapScene>,
    window_query: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut camera_query: Query<&mut CameraZoom, With<MapCamera>>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok(mut zoom) = camera_query.single_mut() else {
        return;
    };

    let clamped = clamp_scale(zoom.scale, window.height(), &scene.zoom_range());
    if clamped != zoom.scale {
        debug!(
            "Window is {:.0} px tall, zoom scale {} -> {}",
            window.height(),
            zoom.scale,
            clamped
        );
        zoom.scale = clamped;
    }
}

/// The camera center may not leave the pan boundary
pub fn clamp_camera_to_boundary(
    scene: Res<MapScene>,
    mut camera_query: Query<&mut Transform, (With<MapCamera>, Changed<Transform>)>,
) {
    for mut transform in camera_query.iter_mut() {
        let center = transform.translation.truncate();
        let clamped = scene.clamp_center(center);
        if clamped != center {
            transform.translation.x = clamped.x;
            transform.translation.y = clamped.y;
        }
    }
}

pub fn apply_camera_zoom(
    mut camera_query: Query<(&CameraZoom, &mut Projection), (With<MapCamera>, Changed<CameraZoom>)>,
) {
    for (zoom, mut projection) in camera_query.iter_mut() {
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = zoom.scale;
        }
    }
}
