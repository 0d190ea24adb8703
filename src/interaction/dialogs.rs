use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::{AppConfig, ConfigResetNotification, SaveConfigRequest};
use crate::map_view::Orchestrator;
use crate::poi::DirectionsMode;
use crate::theme;

/// State for the settings window
#[derive(Resource, Default)]
pub struct SettingsDialogState {
    pub is_open: bool,
    pub directions_mode: DirectionsMode,
    /// Edited default location name (empty means none)
    pub default_location_name: String,
    pub has_changes: bool,
}

impl SettingsDialogState {
    pub fn load_from_config(&mut self, config: &AppConfig) {
        self.directions_mode = config.data.directions_mode;
        self.default_location_name = config
            .data
            .default_location_name
            .clone()
            .unwrap_or_default();
        self.has_changes = false;
    }

    /// Copy the edited values into `config`, marking it dirty
    pub fn apply_to(&self, config: &mut AppConfig) {
        config.data.directions_mode = self.directions_mode;
        let name = self.default_location_name.trim();
        config.data.default_location_name = (!name.is_empty()).then(|| name.to_string());
        config.dirty = true;
    }
}

/// Tells the user their config file was unusable and defaults are active
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    let mut dismissed = false;

    egui::Window::new("Settings Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Your settings could not be loaded and were reset to defaults.");
            if let Some(reason) = &notification.reason {
                ui.add_space(4.0);
                ui.label(egui::RichText::new(reason).weak().small());
            }
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        notification.show = false;
        notification.reason = None;
    }

    Ok(())
}

/// Top bar: settings toggle, point count and the live pin, if any
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut dialog_state: ResMut<SettingsDialogState>,
    config: Res<AppConfig>,
    orchestrator: Option<Res<Orchestrator>>,
) -> Result {
    egui::TopBottomPanel::top("toolbar").show(contexts.ctx_mut()?, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Settings").clicked() {
                dialog_state.load_from_config(&config);
                dialog_state.is_open = true;
            }
            ui.separator();

            if let Some(orchestrator) = &orchestrator {
                ui.label(
                    egui::RichText::new(format!(
                        "{} cats",
                        orchestrator.points_of_interest().len()
                    ))
                    .color(theme::ui::LABEL_TEXT),
                );
                if let Some(pin) = orchestrator.pins().current() {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("Pin at {}", pin.coordinate))
                            .color(theme::ui::LABEL_TEXT),
                    );
                }
                ui.separator();
            }

            ui.label(
                egui::RichText::new("Click a cat for details, click elsewhere to drop a pin")
                    .color(theme::ui::HINT_TEXT),
            );
        });
    });
    Ok(())
}

pub fn settings_dialog_ui(
    mut contexts: EguiContexts,
    mut dialog_state: ResMut<SettingsDialogState>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    if !dialog_state.is_open {
        return Ok(());
    }

    let mut should_close = false;
    let mut should_save = false;

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(false)
        .min_width(320.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.group(|ui| {
                ui.label(egui::RichText::new("Directions").strong());
                ui.add_space(6.0);

                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Mode:").color(theme::ui::LABEL_TEXT));
                    for (mode, label) in [
                        (DirectionsMode::Driving, "Driving"),
                        (DirectionsMode::Walking, "Walking"),
                        (DirectionsMode::Transit, "Transit"),
                    ] {
                        if ui
                            .selectable_value(&mut dialog_state.directions_mode, mode, label)
                            .changed()
                        {
                            dialog_state.has_changes = true;
                        }
                    }
                });

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Street:").color(theme::ui::LABEL_TEXT));
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut dialog_state.default_location_name)
                            .desired_width(220.0)
                            .hint_text("No street address"),
                    );
                    if response.changed() {
                        dialog_state.has_changes = true;
                    }
                });
            });

            ui.add_space(4.0);
            ui.label(
                egui::RichText::new("Changes apply the next time the map opens.")
                    .weak()
                    .small(),
            );
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(dialog_state.has_changes, egui::Button::new("Save"))
                    .clicked()
                {
                    should_save = true;
                }
                if ui.button("Cancel").clicked() {
                    should_close = true;
                }
            });
        });

    if should_save {
        dialog_state.apply_to(&mut config);
        save_events.write(SaveConfigRequest);
        info!("Settings saved");
        should_close = true;
    }

    if should_close {
        dialog_state.is_open = false;
        dialog_state.has_changes = false;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfigData;
    use std::path::PathBuf;

    fn config() -> AppConfig {
        AppConfig {
            data: AppConfigData::default(),
            config_path: PathBuf::from("config.json"),
            dirty: false,
        }
    }

    #[test]
    fn test_load_from_config() {
        let mut config = config();
        config.data.default_location_name = Some("Calle Mayor".to_string());
        config.data.directions_mode = DirectionsMode::Transit;

        let mut state = SettingsDialogState::default();
        state.has_changes = true;
        state.load_from_config(&config);

        assert_eq!(state.default_location_name, "Calle Mayor");
        assert_eq!(state.directions_mode, DirectionsMode::Transit);
        assert!(!state.has_changes);
    }

    #[test]
    fn test_apply_marks_config_dirty() {
        let mut config = config();
        let state = SettingsDialogState {
            directions_mode: DirectionsMode::Walking,
            default_location_name: "  Avenida de la Universidad  ".to_string(),
            ..Default::default()
        };

        state.apply_to(&mut config);

        assert!(config.dirty);
        assert_eq!(config.data.directions_mode, DirectionsMode::Walking);
        assert_eq!(
            config.data.default_location_name.as_deref(),
            Some("Avenida de la Universidad")
        );
    }

    #[test]
    fn test_blank_location_name_clears_it() {
        let mut config = config();
        config.data.default_location_name = Some("Old".to_string());
        let state = SettingsDialogState {
            default_location_name: "   ".to_string(),
            ..Default::default()
        };

        state.apply_to(&mut config);
        assert!(config.data.default_location_name.is_none());
    }
}
