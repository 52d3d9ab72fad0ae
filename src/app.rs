/*
 * Application Module
 *
 * This module defines the main application model and the per-frame update.
 * The model wraps a SimulationDirector together with the egui panel and the
 * debug counters; each update runs the panel, applies what it asked for and
 * advances the simulation by exactly one tick.
 */

use log::{debug, info, warn};
use nannou::prelude::*;
use nannou_egui::Egui;

use crate::debug::DebugInfo;
use crate::director::SimulationDirector;
use crate::input;
use crate::renderer;
use crate::settings::Settings;
use crate::ui;

// Main model for the application
pub struct Model {
    pub director: SimulationDirector,
    pub egui: Egui,
    pub debug_info: DebugInfo,
}

// Settings from the JSON file named on the command line, or defaults
fn initial_settings() -> Settings {
    let Some(path) = std::env::args().nth(1) else {
        return Settings::default();
    };
    match Settings::load(&path) {
        Ok(settings) => {
            info!("loaded settings from {}", path);
            settings
        }
        Err(err) => {
            warn!("{}; using default settings", err);
            Settings::default()
        }
    }
}

// Initialize the model
pub fn model(app: &App) -> Model {
    // Get the primary monitor's dimensions
    let monitor = app.primary_monitor().expect("Failed to get primary monitor");
    let monitor_size = monitor.size();

    // Calculate window size based on monitor size (80% of monitor size)
    let window_width = monitor_size.width as f32 * 0.8;
    let window_height = monitor_size.height as f32 * 0.8;

    let window_id = app
        .new_window()
        .title("Node Weave")
        .size(window_width as u32, window_height as u32)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_exited(input::mouse_exited)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .key_pressed(input::key_pressed)
        .resized(input::resized)
        .raw_event(input::raw_window_event)
        .build()
        .expect("Failed to create window");

    let window = app.window(window_id).expect("Window closed during start-up");
    let egui = Egui::from_window(&window);

    // The window may not get the requested size, so start from what it has
    let rect = window.rect();
    let director = SimulationDirector::new(initial_settings(), rect.w(), rect.h());

    Model {
        director,
        egui,
        debug_info: DebugInfo::default(),
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.record(app.fps(), update.since_last, &model.director);
    model.egui.set_elapsed_time(update.since_start);

    let previous = model.director.settings().clone();
    let actions = ui::update_ui(&mut model.egui, model.director.settings_mut(), &model.debug_info);

    let changed = model.director.settings().changed_fields(&previous);
    if !changed.is_empty() {
        debug!("settings changed: {}", changed.join(", "));
    }

    if let Some(mode) = actions.mode {
        model.director.set_mode(mode);
    }
    if actions.reset {
        model.director.reset();
    }

    model.director.tick();
}
