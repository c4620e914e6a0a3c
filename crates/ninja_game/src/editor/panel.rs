//! Property inspector for the level editor.

use ben_core::Rect;

use super::state::{LevelEditor, ObjectMode, PhysicsMode, SelectionMode};

const PANEL_WIDTH: f32 = 240.0;
const SWATCH_SIZE: f32 = 48.0;

/// Buttons pressed this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelActions {
    pub save: bool,
    pub load: bool,
    pub back: bool,
}

pub struct PanelOutput {
    /// Panel bounds in window pixels, y-down.
    pub rect: Rect,
    pub actions: PanelActions,
}

/// Draw the panel against `editor`. Widget edits are written straight into
/// the editor's params and modes; edits made while something is selected
/// are pushed onto it before returning.
pub fn show_panel(
    ctx: &egui::Context,
    editor: &mut LevelEditor,
    file_name: &mut String,
    status: Option<&str>,
    pixels_per_point: f32,
) -> PanelOutput {
    let mut actions = PanelActions::default();
    let mut changed = false;

    let response = egui::SidePanel::left("level_editor_panel")
        .resizable(false)
        .exact_width(PANEL_WIDTH)
        .show(ctx, |ui| {
            ui.heading("Level Editor");
            ui.separator();

            ui.label("Color");
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    for (value, label) in editor.params.color.iter_mut().zip(["R", "G", "B", "A"]) {
                        changed |= ui
                            .add(egui::Slider::new(value, 0.0..=255.0).step_by(1.0).text(label))
                            .changed();
                    }
                });
                let color = editor.params.color();
                let (swatch, _) = ui.allocate_exact_size(
                    egui::vec2(SWATCH_SIZE, SWATCH_SIZE),
                    egui::Sense::hover(),
                );
                ui.painter().rect_filled(
                    swatch,
                    4.0,
                    egui::Color32::from_rgb(color.r, color.g, color.b),
                );
            });
            ui.separator();

            ui.label("Physics");
            ui.horizontal(|ui| {
                changed |= ui
                    .radio_value(&mut editor.physics_mode, PhysicsMode::Rigid, "Rigid")
                    .changed();
                changed |= ui
                    .radio_value(&mut editor.physics_mode, PhysicsMode::Dynamic, "Dynamic")
                    .changed();
            });

            ui.label("Object");
            ui.horizontal_wrapped(|ui| {
                ui.radio_value(&mut editor.object_mode, ObjectMode::Player, "Player");
                ui.radio_value(&mut editor.object_mode, ObjectMode::Platform, "Platform");
                ui.radio_value(&mut editor.object_mode, ObjectMode::Light, "Light");
                ui.radio_value(&mut editor.object_mode, ObjectMode::Finish, "Finish");
            });

            ui.label("Mode");
            let mut selection_mode = editor.selection_mode;
            ui.horizontal(|ui| {
                ui.radio_value(&mut selection_mode, SelectionMode::Select, "Select");
                ui.radio_value(&mut selection_mode, SelectionMode::Place, "Place");
            });
            if selection_mode != editor.selection_mode {
                editor.set_selection_mode(selection_mode);
            }
            ui.separator();

            egui::Grid::new("level_editor_dims").num_columns(2).show(ui, |ui| {
                match editor.object_mode {
                    ObjectMode::Platform => {
                        ui.label("Rotation");
                        changed |= ui
                            .add(egui::DragValue::new(&mut editor.params.rotation).speed(0.01))
                            .changed();
                        ui.end_row();
                        ui.label("Width");
                        changed |= ui
                            .add(
                                egui::DragValue::new(&mut editor.params.width)
                                    .speed(0.1)
                                    .range(0.1..=100.0),
                            )
                            .changed();
                        ui.end_row();
                        ui.label("Height");
                        changed |= ui
                            .add(
                                egui::DragValue::new(&mut editor.params.height)
                                    .speed(0.1)
                                    .range(0.1..=100.0),
                            )
                            .changed();
                        ui.end_row();
                    }
                    ObjectMode::Light => {
                        ui.label("Size");
                        changed |= ui
                            .add(
                                egui::DragValue::new(&mut editor.params.light_size)
                                    .speed(0.1)
                                    .range(0.0..=100.0),
                            )
                            .changed();
                        ui.end_row();
                    }
                    ObjectMode::Player | ObjectMode::Finish => {}
                }
            });

            ui.checkbox(&mut editor.debug_render, "Debug");
            ui.separator();

            ui.label("File");
            ui.text_edit_singleline(file_name);
            ui.horizontal(|ui| {
                actions.save = ui.button("Save").clicked();
                actions.load = ui.button("Load").clicked();
            });
            if let Some(status) = status {
                ui.label(status);
            }
            ui.separator();
            actions.back = ui.button("Back").clicked();
        });

    if changed {
        editor.apply_params();
    }

    let rect = response.response.rect;
    PanelOutput {
        rect: Rect::new(
            rect.min.x * pixels_per_point,
            rect.min.y * pixels_per_point,
            rect.width() * pixels_per_point,
            rect.height() * pixels_per_point,
        ),
        actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsSettings;
    use crate::physics::PhysicsWorld;
    use glam::Vec2;

    #[test]
    fn panel_reports_its_bounds_in_pixels() {
        let ctx = egui::Context::default();
        let mut editor = LevelEditor::new(
            PhysicsWorld::from_settings(&PhysicsSettings::default()),
            "bricks.png",
            "ninja.png",
        );
        let mut file_name = "level.txt".to_string();
        let raw = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1280.0, 720.0),
            )),
            ..Default::default()
        };

        let mut output = None;
        let _ = ctx.run(raw, |ctx| {
            output = Some(show_panel(ctx, &mut editor, &mut file_name, None, 2.0));
        });
        let output = output.expect("panel ran");
        assert_eq!(output.actions, PanelActions::default());
        assert!(output.rect.contains(Vec2::new(20.0, 20.0)));
        assert!(!output.rect.contains(Vec2::new(2000.0, 20.0)));
    }
}
