/*
 * Input Module
 *
 * This module handles window events: pointer movement, clicks, the keyboard
 * bindings and resizes. Pointer positions arrive in nannou's centered frame
 * and are converted to canvas space before reaching the director. Clicks that
 * land on the control panel are left to egui.
 */

use log::debug;
use nannou::prelude::*;
use nannou::winit::event::WindowEvent;

use crate::app::Model;
use crate::canvas::window_to_canvas;
use crate::controls::Command;

// Mouse moved event handler
pub fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    let position = window_to_canvas(app.window_rect(), pos);
    model.director.pointer_moved(position);
}

// Mouse left the window
pub fn mouse_exited(_app: &App, model: &mut Model) {
    model.director.pointer_left();
}

// Mouse pressed event handler
pub fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }
    // Check if the click is on the UI before handling it
    if model.egui.ctx().is_pointer_over_area() {
        return;
    }
    let position = window_to_canvas(app.window_rect(), app.mouse.position());
    model.director.pointer_pressed(position);
}

// Mouse released event handler
pub fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.director.pointer_released();
    }
}

pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }
    if let Some(command) = key_to_char(key).and_then(Command::from_key) {
        debug!("key {:?} -> {:?}", key, command);
        model.director.apply(command);
    }
}

pub fn resized(_app: &App, model: &mut Model, size: Vec2) {
    model.director.resize(size.x, size.y);
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &WindowEvent) {
    model.egui.handle_raw_event(event);
}

// Only the keys that have a binding
fn key_to_char(key: Key) -> Option<char> {
    let c = match key {
        Key::Q => 'q',
        Key::W => 'w',
        Key::A => 'a',
        Key::S => 's',
        Key::Z => 'z',
        Key::X => 'x',
        Key::E => 'e',
        Key::R => 'r',
        Key::T => 't',
        Key::Y => 'y',
        Key::U => 'u',
        Key::I => 'i',
        Key::Space => ' ',
        Key::Return | Key::NumpadEnter => '\n',
        Key::Key1 | Key::Numpad1 => '1',
        Key::Key2 | Key::Numpad2 => '2',
        Key::Key3 | Key::Numpad3 => '3',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RenderMode;

    #[test]
    fn test_bound_keys_reach_commands() {
        let command = |key| key_to_char(key).and_then(Command::from_key);

        assert_eq!(command(Key::W), Some(Command::Population(10)));
        assert_eq!(command(Key::Space), Some(Command::TogglePause));
        assert_eq!(command(Key::Return), Some(Command::Reset));
        assert_eq!(command(Key::Numpad2), Some(Command::SelectMode(RenderMode::ReactionDiffusion)));
        assert_eq!(command(Key::F1), None);
    }
}
