/*
 * Renderer Module
 *
 * This module draws one frame: the director renders the scene onto a
 * NannouCanvas, the optional debug overlay goes on top and the egui panel is
 * drawn last.
 */

use log::error;
use nannou::prelude::*;

use crate::app::Model;
use crate::canvas::NannouCanvas;
use crate::ui;

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let mut canvas = NannouCanvas::new(&draw, app.window_rect());

    model.director.render(&mut canvas);

    if model.director.settings().show_debug {
        ui::draw_debug_info(&mut canvas, &model.debug_info);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        error!("failed to draw frame: {:?}", err);
    }

    // Draw the egui UI
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        error!("failed to draw control panel: {:?}", err);
    }
}
