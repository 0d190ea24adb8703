use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::map_view::{MapCamera, MapScene, Orchestrator, SelectedAnnotation};
use crate::orchestrator::{AnnotationDelegate, AnnotationView};
use crate::theme;

/// Callout for the selected marker, anchored next to it on screen
pub fn callout_ui(
    mut contexts: EguiContexts,
    scene: Res<MapScene>,
    orchestrator: Option<Res<Orchestrator>>,
    mut selected: ResMut<SelectedAnnotation>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MapCamera>>,
) -> Result {
    let Some(id) = selected.0 else {
        return Ok(());
    };
    let Some(orchestrator) = orchestrator else {
        return Ok(());
    };
    let Some(AnnotationView::Marker(marker)) = orchestrator.render_annotation(id) else {
        selected.0 = None;
        return Ok(());
    };
    if !marker.can_show_callout {
        return Ok(());
    }
    let Some(poi) = orchestrator.point_of_interest(id) else {
        selected.0 = None;
        return Ok(());
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return Ok(());
    };
    let Some(world) = scene.annotation_position(id) else {
        return Ok(());
    };
    let Ok(screen) = camera.world_to_viewport(camera_transform, world.extend(0.0)) else {
        return Ok(());
    };

    let (offset_x, offset_y) = marker.callout_offset;
    let anchor = egui::pos2(screen.x + offset_x, screen.y + offset_y);

    let mut open = true;
    let mut directions_clicked = false;

    egui::Window::new(poi.title().unwrap_or("Point of interest"))
        .id(egui::Id::new(("callout", id)))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .fixed_pos(anchor)
        .show(contexts.ctx_mut()?, |ui| {
            if let Some(subtitle) = poi.subtitle() {
                ui.label(subtitle);
            }
            ui.label(
                egui::RichText::new(poi.coordinate().to_string())
                    .small()
                    .color(theme::ui::HINT_TEXT),
            );

            if marker.detail_disclosure {
                ui.add_space(6.0);
                let has_address = poi.location_name().is_some();
                if ui
                    .add_enabled(has_address, egui::Button::new("Directions"))
                    .on_disabled_hover_text("No street address for this place")
                    .clicked()
                {
                    directions_clicked = true;
                }
            }
        });

    if directions_clicked {
        orchestrator.handle_interaction(id);
    }
    if !open {
        selected.0 = None;
    }

    Ok(())
}
