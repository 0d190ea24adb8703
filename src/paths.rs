//! Where the map keeps its files: the settings file, the session log and the
//! bundled points-of-interest data.
//!
//! A `cargo run` or debug build keeps everything next to the working
//! directory so the bundled `assets/CatsUA.geojson` is found without
//! installing. Installed builds use the platform directories from `dirs`
//! and look for the data beside the executable.

use std::path::{Path, PathBuf};

use crate::loader::BundleLocator;

const APP_DIR_NAME: &str = "maproutes";
const CONFIG_FILE_NAME: &str = "config.json";

/// Running from a source checkout rather than an installed build
pub fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

/// The three places the application reads from or writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    /// Holds `config.json`
    pub config: PathBuf,
    /// Holds the session log
    pub logs: PathBuf,
    /// Holds the bundled GeoJSON resource
    pub bundled_assets: PathBuf,
}

impl AppDirs {
    /// Layout for a source checkout: `./config.json`, `./logs/`, `./assets/`
    pub fn local() -> Self {
        Self {
            config: PathBuf::from("."),
            logs: PathBuf::from("logs"),
            bundled_assets: PathBuf::from("assets"),
        }
    }

    /// Layout for an installed build given the platform roots.
    ///
    /// Config goes under `config_root/maproutes`, logs under
    /// `data_root/maproutes/logs` and the data ships in `exe_dir/assets`.
    pub fn installed(config_root: &Path, data_root: &Path, exe_dir: &Path) -> Self {
        Self {
            config: config_root.join(APP_DIR_NAME),
            logs: data_root.join(APP_DIR_NAME).join("logs"),
            bundled_assets: exe_dir.join("assets"),
        }
    }

    /// Layout for this process. Falls back to the local layout when the
    /// platform directories or the executable path are unknown.
    pub fn current() -> Self {
        if is_dev_mode() {
            return Self::local();
        }

        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        match (dirs::config_dir(), dirs::data_local_dir(), exe_dir) {
            (Some(config), Some(data), Some(exe)) => Self::installed(&config, &data, &exe),
            _ => Self::local(),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config.join(CONFIG_FILE_NAME)
    }

    pub fn resource_locator(&self) -> BundleLocator {
        BundleLocator::new(&self.bundled_assets)
    }

    /// Create the writable directories. The bundled assets are never created.
    pub fn ensure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.logs)?;
        Ok(())
    }
}
