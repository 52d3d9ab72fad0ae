/*
 * Geometry Module
 *
 * Surface bounds and the few vector helpers the motion code needs on top of
 * nannou's Vec2. Every helper here treats a zero-length vector as "no
 * direction" and returns zero instead of producing NaN.
 */

use nannou::prelude::*;
use rand::Rng;

// Smallest surface edge we ever simulate on
const MIN_EXTENT: f32 = 1.0;

/// Size of the drawing surface in canvas units (origin top-left, y down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() { v.max(MIN_EXTENT) } else { MIN_EXTENT };
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    // A resize is only honoured when both edges are real, positive numbers
    pub fn is_valid_size(width: f32, height: f32) -> bool {
        width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        vec2(point.x.clamp(0.0, self.width), point.y.clamp(0.0, self.height))
    }

    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        vec2(rng.gen_range(0.0..self.width), rng.gen_range(0.0..self.height))
    }
}

/// Cap the magnitude of `v` at `max`.
pub fn limit(v: Vec2, max: f32) -> Vec2 {
    let length_squared = v.length_squared();
    if length_squared > max * max && length_squared > 0.0 {
        v * (max / length_squared.sqrt())
    } else {
        v
    }
}

/// Rescale `v` to `magnitude`, or zero when `v` has no direction.
pub fn set_magnitude(v: Vec2, magnitude: f32) -> Vec2 {
    let length = v.length();
    if length > 0.0 && length.is_finite() {
        v * (magnitude / length)
    } else {
        Vec2::ZERO
    }
}
