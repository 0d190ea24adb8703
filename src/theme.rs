//! Centralized color theme for the application.
//!
//! Modify values here to change the map's color scheme.

use bevy::prelude::Color;

use crate::constants::{MARKER_REUSE_IDENTIFIER, PIN_REUSE_IDENTIFIER};

// ============================================================================
// Map Colors
// ============================================================================

/// Plain background behind the annotations
pub const MAP_BACKGROUND: Color = Color::srgb(0.93, 0.92, 0.88);

/// Faint reference grid, one line every 250 m
pub const GRID_COLOR: Color = Color::srgba(0.5, 0.5, 0.5, 0.25);

/// Outline of the camera boundary
pub const BOUNDARY_OUTLINE: Color = Color::srgba(0.2, 0.4, 0.8, 0.8);

// ============================================================================
// Annotation Colors
// ============================================================================

/// Point of interest marker fill
pub const MARKER_FILL: Color = Color::srgb(0.95, 0.45, 0.1);

/// Ring drawn around the selected marker
pub const MARKER_SELECTED: Color = Color::srgb(0.2, 0.6, 1.0);

/// Temporary pin head and stem
pub const PIN_COLOR: Color = Color::srgb(0.85, 0.1, 0.15);

/// Fallback for annotation kinds without a dedicated color
pub const ANNOTATION_DEFAULT: Color = Color::srgb(0.4, 0.4, 0.4);

/// Stroke color for an annotation view's reuse identifier
pub fn annotation_color(reuse_identifier: &str) -> Color {
    match reuse_identifier {
        MARKER_REUSE_IDENTIFIER => MARKER_FILL,
        PIN_REUSE_IDENTIFIER => PIN_COLOR,
        _ => ANNOTATION_DEFAULT,
    }
}

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Grey for help/hint text
    pub const HINT_TEXT: egui::Color32 = egui::Color32::GRAY;

    /// Light grey for label text
    pub const LABEL_TEXT: egui::Color32 = egui::Color32::LIGHT_GRAY;
}
