//! Map rendering: the camera, the [`MapScene`] widget and gizmo drawing.
//!
//! There are no map tiles. Annotations are drawn over a plain background
//! with a metric grid and the pan boundary outline.

mod camera;
mod render;
mod scene;

pub use camera::{CameraZoom, MapCamera};
pub use scene::MapScene;

use bevy::prelude::*;

use crate::config::{AppConfig, ConfigLoaded};
use crate::loader::BundleLocator;
use crate::navigation::SystemNavigator;
use crate::orchestrator::{AnnotationId, CameraSettings, MapOrchestrator};
use crate::theme;

/// The active orchestrator, inserted once the map has been set up
#[derive(Resource, Deref, DerefMut)]
pub struct Orchestrator(pub MapOrchestrator);

/// Point of interest whose callout is open
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedAnnotation(pub Option<AnnotationId>);

/// Build the orchestrator from config and activate it against the scene
fn setup_map(mut commands: Commands, config: Res<AppConfig>, mut scene: ResMut<MapScene>) {
    let data = &config.data;
    let mut orchestrator =
        MapOrchestrator::new(CameraSettings::default(), Box::new(SystemNavigator))
            .with_directions_mode(data.directions_mode)
            .with_pin_removal_delay(data.pin_removal_delay())
            .with_default_location_name(data.default_location_name.clone());

    let locator = BundleLocator::default();
    debug!("Looking for {} in {:?}", data.resource(), locator.root());
    orchestrator.activate(&mut *scene, &locator, &data.resource());

    commands.insert_resource(Orchestrator(orchestrator));
}

pub struct MapViewPlugin;

impl Plugin for MapViewPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(theme::MAP_BACKGROUND))
            .init_resource::<MapScene>()
            .init_resource::<SelectedAnnotation>()
            .add_systems(
                Startup,
                (camera::spawn_camera, setup_map.after(ConfigLoaded)),
            )
            .add_systems(
                Update,
                (
                    camera::apply_region_request,
                    camera::camera_pan,
                    camera::camera_zoom,
                    camera::clamp_camera_to_boundary,
                    camera::clamp_zoom_to_window,
                    camera::apply_camera_zoom,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    render::draw_grid,
                    render::draw_boundary,
                    render::draw_annotations,
                )
                    .after(camera::apply_camera_zoom),
            );
    }
}
