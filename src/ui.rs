/*
 * UI Module
 *
 * This module contains functions for creating and updating the control panel
 * using nannou_egui. Sliders are bound directly to the settings; actions that
 * need the director (reset, mode switch) are returned to the caller.
 */

use nannou::prelude::*;
use nannou_egui::{egui, Egui};

use crate::canvas::{Canvas, Color, TextAlign};
use crate::debug::DebugInfo;
use crate::settings::{RenderMode, Settings};

/// Actions requested through the panel this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UiActions {
    pub reset: bool,
    pub mode: Option<RenderMode>,
}

// Update the UI and return the actions the app has to carry out
pub fn update_ui(egui: &mut Egui, settings: &mut Settings, debug_info: &DebugInfo) -> UiActions {
    let mut actions = UiActions::default();
    let current_mode = settings.mode;

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Mode", |ui| {
                for mode in RenderMode::ALL {
                    if ui.radio(current_mode == mode, mode.label()).clicked() && mode != current_mode {
                        actions.mode = Some(mode);
                    }
                }
            });

            ui.collapsing("Particles", |ui| {
                ui.add(egui::Slider::new(&mut settings.particle_count, Settings::particle_count_range()).text("Particle Count"));
                ui.add(egui::Slider::new(&mut settings.connection_distance, Settings::connection_distance_range()).text("Connection Distance"));
                ui.add(egui::Slider::new(&mut settings.speed, Settings::speed_range()).text("Speed"));
                ui.add(egui::Slider::new(&mut settings.node_size, Settings::node_size_range()).text("Node Size"));
                ui.add(egui::Slider::new(&mut settings.color_speed, Settings::color_speed_range()).text("Color Speed"));
                ui.add(egui::Slider::new(&mut settings.force_field, Settings::force_field_range()).text("Force Field"));
            });

            ui.collapsing("Reaction-Diffusion", |ui| {
                let reaction = &mut settings.reaction;
                ui.add(egui::Slider::new(&mut reaction.feed, Settings::rate_range()).text("Feed Rate"));
                ui.add(egui::Slider::new(&mut reaction.kill, Settings::rate_range()).text("Kill Rate"));
                ui.add(egui::Slider::new(&mut reaction.diffusion_a, Settings::diffusion_range()).text("Diffusion A"));
                ui.add(egui::Slider::new(&mut reaction.diffusion_b, Settings::diffusion_range()).text("Diffusion B"));
            });

            ui.collapsing("Performance", |ui| {
                for line in debug_info.lines() {
                    ui.label(line);
                }
            });

            if ui.button("Reset").clicked() {
                actions.reset = true;
            }
            ui.checkbox(&mut settings.show_debug, "Show Debug Info");
            ui.checkbox(&mut settings.paused, "Pause Simulation");
        });

    actions
}

// Draw debug information in the top-left corner of the canvas
pub fn draw_debug_info<C: Canvas + ?Sized>(canvas: &mut C, debug_info: &DebugInfo) {
    let margin = 20.0;
    let line_height = 20.0;
    let lines = debug_info.lines();
    let panel_height = line_height * lines.len() as f32 + margin;

    canvas.rect(Vec2::ZERO, vec2(200.0, panel_height), Color::black(0.7));

    for (i, line) in lines.iter().enumerate() {
        let y = margin + i as f32 * line_height;
        canvas.text(line, vec2(margin, y), TextAlign::Left, 14, Color::white(1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, RecordingCanvas};

    #[test]
    fn test_debug_panel_draws_background_then_lines() {
        let mut canvas = RecordingCanvas::new(400.0, 300.0);
        draw_debug_info(&mut canvas, &DebugInfo::default());

        assert!(matches!(canvas.ops[0], DrawOp::Rect { .. }));
        assert_eq!(canvas.texts().count(), 4);
        assert!(canvas.texts().any(|text| text == "Particles: 0"));
    }
}
