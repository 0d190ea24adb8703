use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{DEFAULT_RESOURCE_EXTENSION, DEFAULT_RESOURCE_NAME, PIN_REMOVAL_DELAY};
use crate::geocode::DEFAULT_GEOCODER_URL;
use crate::loader::BundledResource;
use crate::poi::DirectionsMode;

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

fn default_resource_name() -> String {
    DEFAULT_RESOURCE_NAME.to_string()
}

fn default_resource_extension() -> String {
    DEFAULT_RESOURCE_EXTENSION.to_string()
}

fn default_geocoder_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}

fn default_pin_removal_secs() -> f64 {
    PIN_REMOVAL_DELAY.as_secs_f64()
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Bundled points-of-interest file, without extension
    #[serde(default = "default_resource_name")]
    pub resource_name: String,

    #[serde(default = "default_resource_extension")]
    pub resource_extension: String,

    /// Nominatim-compatible reverse geocoding endpoint
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,

    #[serde(default)]
    pub directions_mode: DirectionsMode,

    /// Seconds a dropped pin stays on the map
    #[serde(default = "default_pin_removal_secs")]
    pub pin_removal_secs: f64,

    /// Street address given to every point of interest, enabling directions
    #[serde(default)]
    pub default_location_name: Option<String>,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            resource_name: default_resource_name(),
            resource_extension: default_resource_extension(),
            geocoder_url: default_geocoder_url(),
            directions_mode: DirectionsMode::default(),
            pin_removal_secs: default_pin_removal_secs(),
            default_location_name: None,
        }
    }
}

impl AppConfigData {
    pub fn resource(&self) -> BundledResource {
        BundledResource::new(&self.resource_name, &self.resource_extension)
    }

    /// Falls back to the default delay for negative or non-finite values
    pub fn pin_removal_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.pin_removal_secs).unwrap_or_else(|_| {
            warn!(
                "Invalid pin_removal_secs {}, using {:?}",
                self.pin_removal_secs, PIN_REMOVAL_DELAY
            );
            PIN_REMOVAL_DELAY
        })
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::AppDirs::current().config_file(),
            dirty: false,
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Result of loading config from disk
struct LoadConfigResult {
    data: AppConfigData,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Load configuration from `config_path`, falling back to defaults
fn load_config(config_path: &Path) -> LoadConfigResult {
    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(data) => {
                    info!("Loaded config from {:?}", config_path);
                    (data, None)
                }
                Err(e) => {
                    warn!("Failed to parse config file: {}", e);
                    (
                        AppConfigData::default(),
                        Some(format!("Configuration file was corrupted: {}", e)),
                    )
                }
            },
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    AppConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (AppConfigData::default(), None)
    };

    LoadConfigResult { data, reset_reason }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_config(&config.config_path);
    config.data = result.data;
    config.dirty = false;

    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                save_config_system.run_if(on_message::<SaveConfigRequest>),
            );
    }
}
