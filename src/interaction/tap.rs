//! Clicks on the map: select a marker or drop a temporary pin.

use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;
use futures_lite::future;

use crate::constants::HIT_RADIUS_PX;
use crate::geo::Coordinate;
use crate::geocode::{GeocodeOutcome, Geocoder};
use crate::map_view::{CameraZoom, MapCamera, MapScene, Orchestrator, SelectedAnnotation};
use crate::pin::PinGeneration;

/// Shared geocoding backend, cloned into each lookup task
#[derive(Resource, Clone)]
pub struct GeocoderHandle(pub Arc<dyn Geocoder>);

/// Reverse-geocoding lookup running off the main thread
#[derive(Component)]
pub struct GeocodeTask {
    pub coordinate: Coordinate,
    pub task: Task<GeocodeOutcome>,
}

impl GeocodeTask {
    /// Start a lookup on the async compute pool. It is never cancelled.
    pub fn start(geocoder: &GeocoderHandle, coordinate: Coordinate) -> Self {
        let backend = Arc::clone(&geocoder.0);
        let task = AsyncComputeTaskPool::get().spawn(async move {
            GeocodeOutcome::from_result(backend.reverse_geocode(coordinate))
        });
        Self { coordinate, task }
    }
}

/// Removes the pin of `generation` once the timer finishes
#[derive(Component)]
pub struct PinExpiry {
    pub generation: PinGeneration,
    pub timer: Timer,
}

fn is_cursor_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}

/// Left click: select the marker under the cursor, otherwise drop a pin
#[allow(clippy::too_many_arguments)]
pub fn handle_map_click(
    mut commands: Commands,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform, &CameraZoom), With<MapCamera>>,
    mut scene: ResMut<MapScene>,
    orchestrator: Option<ResMut<Orchestrator>>,
    mut selected: ResMut<SelectedAnnotation>,
    geocoder: Option<Res<GeocoderHandle>>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) || is_cursor_over_ui(&mut contexts) {
        return;
    }
    let Some(mut orchestrator) = orchestrator else {
        return;
    };
    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((camera, camera_transform, zoom)) = camera_query.single() else {
        return;
    };
    let Some(world) = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world_2d(camera_transform, cursor).ok())
    else {
        return;
    };

    if let Some(id) = scene.hit_test(world, HIT_RADIUS_PX * zoom.scale) {
        selected.0 = Some(id);
        return;
    }
    selected.0 = None;

    let Some(coordinate) = scene.coordinate_at(world) else {
        debug!("Click at {:?} is off the globe, ignoring", world);
        return;
    };

    let outcome = orchestrator.handle_tap(coordinate, &mut *scene);
    if let Some(replaced) = outcome.replaced {
        debug!("Pin #{} replaced before its timer ran out", replaced.value());
    }

    if let Some(geocoder) = geocoder {
        commands.spawn(GeocodeTask::start(&geocoder, coordinate));
    }

    commands.spawn(PinExpiry {
        generation: outcome.placed.generation,
        timer: Timer::new(outcome.expires_after, TimerMode::Once),
    });
}

/// Log finished lookups. Results never touch map state.
pub fn poll_geocode_tasks(mut commands: Commands, mut tasks: Query<(Entity, &mut GeocodeTask)>) {
    for (entity, mut lookup) in tasks.iter_mut() {
        if let Some(outcome) = future::block_on(future::poll_once(&mut lookup.task)) {
            outcome.log(lookup.coordinate);
            commands.entity(entity).despawn();
        }
    }
}

pub fn expire_pins(
    mut commands: Commands,
    time: Res<Time>,
    mut scene: ResMut<MapScene>,
    orchestrator: Option<ResMut<Orchestrator>>,
    mut timers: Query<(Entity, &mut PinExpiry)>,
) {
    let Some(mut orchestrator) = orchestrator else {
        return;
    };

    for (entity, mut expiry) in timers.iter_mut() {
        if expiry.timer.tick(time.delta()).just_finished() {
            orchestrator.expire_pin(expiry.generation, &mut *scene);
            commands.entity(entity).despawn();
        }
    }
}
