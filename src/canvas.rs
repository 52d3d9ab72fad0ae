/*
 * Canvas Module
 *
 * The drawing surface the simulation renders into. Simulation code only sees
 * the `Canvas` trait and works in canvas coordinates: origin at the top-left
 * corner, x to the right, y down, units in points.
 *
 * `NannouCanvas` maps those calls onto a nannou `Draw` (centered, y up) and
 * `RecordingCanvas` keeps a list of the calls for headless use.
 */

use nannou::color::{hsla, Hsla};
use nannou::prelude::*;

// Number of concentric discs used to approximate a radial gradient
const GRADIENT_RINGS: usize = 4;

/// HSLA color with the hue in degrees and the other channels in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub alpha: f32,
}

impl Color {
    pub const fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
            alpha,
        }
    }

    pub const fn white(alpha: f32) -> Self {
        Self::hsla(0.0, 0.0, 1.0, alpha)
    }

    pub const fn black(alpha: f32) -> Self {
        Self::hsla(0.0, 0.0, 0.0, alpha)
    }

    pub fn lerp(self, other: Color, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            hue: mix(self.hue, other.hue),
            saturation: mix(self.saturation, other.saturation),
            lightness: mix(self.lightness, other.lightness),
            alpha: mix(self.alpha, other.alpha),
        }
    }

    fn to_nannou(self) -> Hsla {
        hsla(
            self.hue.rem_euclid(360.0) / 360.0,
            self.saturation.clamp(0.0, 1.0),
            self.lightness.clamp(0.0, 1.0),
            self.alpha.clamp(0.0, 1.0),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Drawing primitives consumed by the simulation.
pub trait Canvas {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Cover the whole surface with a (usually translucent) color.
    fn fade(&mut self, color: Color);
    fn vertical_gradient(&mut self, top: Color, bottom: Color);
    fn circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn ring(&mut self, center: Vec2, radius: f32, weight: f32, color: Color);
    fn radial_gradient_circle(&mut self, center: Vec2, radius: f32, inner: Color, outer: Color);
    fn line(&mut self, from: Vec2, to: Vec2, weight: f32, color: Color);
    fn gradient_line(&mut self, from: Vec2, to: Vec2, weight: f32, start: Color, end: Color);
    fn rect(&mut self, origin: Vec2, size: Vec2, color: Color);
    fn text(&mut self, text: &str, position: Vec2, align: TextAlign, size: u32, color: Color);
}

/// Canvas backed by a nannou `Draw` for the current frame.
pub struct NannouCanvas<'a> {
    draw: &'a Draw,
    window_rect: Rect,
}

impl<'a> NannouCanvas<'a> {
    pub fn new(draw: &'a Draw, window_rect: Rect) -> Self {
        Self { draw, window_rect }
    }

    // Canvas space (top-left, y down) to nannou space (centered, y up)
    fn to_screen(&self, point: Vec2) -> Point2 {
        pt2(
            self.window_rect.left() + point.x,
            self.window_rect.top() - point.y,
        )
    }
}

/// Map a nannou window position (centered, y up) into canvas space.
pub fn window_to_canvas(window_rect: Rect, point: Point2) -> Vec2 {
    vec2(point.x - window_rect.left(), window_rect.top() - point.y)
}

impl Canvas for NannouCanvas<'_> {
    fn width(&self) -> f32 {
        self.window_rect.w()
    }

    fn height(&self) -> f32 {
        self.window_rect.h()
    }

    fn fade(&mut self, color: Color) {
        self.draw
            .rect()
            .xy(self.window_rect.xy())
            .wh(self.window_rect.wh())
            .color(color.to_nannou());
    }

    fn vertical_gradient(&mut self, top: Color, bottom: Color) {
        let rect = self.window_rect;
        let (top, bottom) = (top.to_nannou(), bottom.to_nannou());
        self.draw.polygon().points_colored(vec![
            (rect.top_left(), top),
            (rect.top_right(), top),
            (rect.bottom_right(), bottom),
            (rect.bottom_left(), bottom),
        ]);
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.draw
            .ellipse()
            .xy(self.to_screen(center))
            .radius(radius)
            .color(color.to_nannou());
    }

    fn ring(&mut self, center: Vec2, radius: f32, weight: f32, color: Color) {
        self.draw
            .ellipse()
            .xy(self.to_screen(center))
            .radius(radius)
            .no_fill()
            .stroke(color.to_nannou())
            .stroke_weight(weight);
    }

    fn radial_gradient_circle(&mut self, center: Vec2, radius: f32, inner: Color, outer: Color) {
        let xy = self.to_screen(center);
        // Outermost disc first so the inner stops land on top
        for ring in 0..GRADIENT_RINGS {
            let t = ring as f32 / (GRADIENT_RINGS - 1) as f32;
            let ring_radius = radius * (1.0 - ring as f32 / GRADIENT_RINGS as f32);
            self.draw
                .ellipse()
                .xy(xy)
                .radius(ring_radius)
                .color(outer.lerp(inner, t).to_nannou());
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, weight: f32, color: Color) {
        self.draw
            .line()
            .start(self.to_screen(from))
            .end(self.to_screen(to))
            .weight(weight)
            .color(color.to_nannou());
    }

    fn gradient_line(&mut self, from: Vec2, to: Vec2, weight: f32, start: Color, end: Color) {
        self.draw.polyline().weight(weight).points_colored(vec![
            (self.to_screen(from), start.to_nannou()),
            (self.to_screen(to), end.to_nannou()),
        ]);
    }

    fn rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.draw
            .rect()
            .xy(self.to_screen(origin + size / 2.0))
            .wh(size)
            .color(color.to_nannou());
    }

    fn text(&mut self, text: &str, position: Vec2, align: TextAlign, size: u32, color: Color) {
        // nannou lays text out inside a box; anchor the box so its aligned edge sits on `position`
        let box_width = self.window_rect.w().max(1.0);
        let anchor = self.to_screen(position);
        let drawing = self
            .draw
            .text(text)
            .w(box_width)
            .font_size(size)
            .color(color.to_nannou());
        match align {
            TextAlign::Left => drawing.x_y(anchor.x + box_width / 2.0, anchor.y).left_justify(),
            TextAlign::Center => drawing.x_y(anchor.x, anchor.y).center_justify(),
            TextAlign::Right => drawing.x_y(anchor.x - box_width / 2.0, anchor.y).right_justify(),
        };
    }
}

/// One recorded canvas call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Fade { color: Color },
    VerticalGradient { top: Color, bottom: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Ring { center: Vec2, radius: f32, weight: f32, color: Color },
    RadialGradient { center: Vec2, radius: f32, inner: Color, outer: Color },
    Line { from: Vec2, to: Vec2, weight: f32, color: Color },
    GradientLine { from: Vec2, to: Vec2, weight: f32, start: Color, end: Color },
    Rect { origin: Vec2, size: Vec2, color: Color },
    Text { text: String, position: Vec2, align: TextAlign, size: u32, color: Color },
}

/// Canvas that records every call instead of drawing. Used for headless
/// rendering in benchmarks and for checking draw order.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    width: f32,
    height: f32,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn fade(&mut self, color: Color) {
        self.ops.push(DrawOp::Fade { color });
    }

    fn vertical_gradient(&mut self, top: Color, bottom: Color) {
        self.ops.push(DrawOp::VerticalGradient { top, bottom });
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ops.push(DrawOp::Circle { center, radius, color });
    }

    fn ring(&mut self, center: Vec2, radius: f32, weight: f32, color: Color) {
        self.ops.push(DrawOp::Ring { center, radius, weight, color });
    }

    fn radial_gradient_circle(&mut self, center: Vec2, radius: f32, inner: Color, outer: Color) {
        self.ops.push(DrawOp::RadialGradient { center, radius, inner, outer });
    }

    fn line(&mut self, from: Vec2, to: Vec2, weight: f32, color: Color) {
        self.ops.push(DrawOp::Line { from, to, weight, color });
    }

    fn gradient_line(&mut self, from: Vec2, to: Vec2, weight: f32, start: Color, end: Color) {
        self.ops.push(DrawOp::GradientLine { from, to, weight, start, end });
    }

    fn rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.ops.push(DrawOp::Rect { origin, size, color });
    }

    fn text(&mut self, text: &str, position: Vec2, align: TextAlign, size: u32, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.to_owned(),
            position,
            align,
            size,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lerp_endpoints() {
        let a = Color::hsla(0.0, 0.0, 0.0, 0.0);
        let b = Color::hsla(200.0, 1.0, 0.5, 1.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5).hue, 100.0);
    }

    #[test]
    fn test_window_to_canvas_flips_y() {
        let rect = Rect::from_w_h(800.0, 600.0);
        assert_eq!(window_to_canvas(rect, pt2(0.0, 0.0)), vec2(400.0, 300.0));
        assert_eq!(window_to_canvas(rect, pt2(-400.0, 300.0)), vec2(0.0, 0.0));
        assert_eq!(window_to_canvas(rect, pt2(400.0, -300.0)), vec2(800.0, 600.0));
    }

    #[test]
    fn test_recording_canvas_keeps_call_order() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        canvas.fade(Color::black(0.1));
        canvas.text("hello", vec2(1.0, 1.0), TextAlign::Left, 12, Color::white(1.0));
        assert_eq!(canvas.ops.len(), 2);
        assert!(matches!(canvas.ops[0], DrawOp::Fade { .. }));
        assert_eq!(canvas.texts().collect::<Vec<_>>(), vec!["hello"]);
    }
}
