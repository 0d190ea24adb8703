//! User input on the map and the egui windows layered over it.

mod callout;
mod dialogs;
mod tap;

use std::sync::Arc;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::{AppConfig, ConfigLoaded};
use crate::geocode::NominatimGeocoder;

pub use tap::GeocoderHandle;

fn setup_geocoder(mut commands: Commands, config: Res<AppConfig>) {
    info!("Reverse geocoding through {}", config.data.geocoder_url);
    commands.insert_resource(GeocoderHandle(Arc::new(NominatimGeocoder::new(
        config.data.geocoder_url.clone(),
    ))));
}

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<dialogs::SettingsDialogState>()
            .add_systems(Startup, setup_geocoder.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    tap::handle_map_click,
                    tap::poll_geocode_tasks,
                    tap::expire_pins,
                ),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    dialogs::toolbar_ui,
                    (
                        callout::callout_ui,
                        dialogs::settings_dialog_ui,
                        dialogs::config_reset_notification_ui,
                    )
                        .after(dialogs::toolbar_ui),
                ),
            );
    }
}
