/*
 * Particle Module
 *
 * This module defines the Particle struct and its behavior.
 * A particle integrates its own motion, drifts its hue, oscillates an energy
 * value and remembers a short trail of recent positions. In flocking mode it
 * also steers by the three boid rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 */

use nannou::prelude::*;
use rand::Rng;
use std::collections::VecDeque;
use std::f32::consts::TAU;

use crate::canvas::{Canvas, Color};
use crate::geometry::{limit, set_magnitude, Bounds};

pub const TRAIL_CAPACITY: usize = 20;
pub const ENERGY_MIN: f32 = 0.0;
pub const ENERGY_MAX: f32 = 100.0;
pub const AURA_THRESHOLD: f32 = 80.0;

const ENERGY_SWING: f32 = 2.0;
const MAX_SPEED: f32 = 3.0;
const MAX_FORCE: f32 = 0.1;

// Flocking radii and weights
const SEPARATION_RADIUS: f32 = 25.0;
const NEIGHBOR_RADIUS: f32 = 50.0;
const SEPARATION_WEIGHT: f32 = 1.5;
const ALIGNMENT_WEIGHT: f32 = 1.0;
const COHESION_WEIGHT: f32 = 1.0;
const POINTER_SEEK_WEIGHT: f32 = 0.3;

// Drift motion
const JITTER: f32 = 0.05;
const FRICTION: f32 = 0.99;
const BOUNCE: f32 = -0.5;

const PULSE_SWING: f32 = 2.0;
const MIN_PULSE_SIZE: f32 = 0.5;
// Trail segments longer than this are wrap-around jumps and are not drawn
const TRAIL_BREAK: f32 = 50.0;

/// How a particle moves at the surface edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// Steering forces, speed limit scaled by the global multiplier, toroidal wrap.
    Flock,
    /// Friction plus random jitter, reflection off the edges with energy loss.
    Drift,
}

/// Everything a particle needs from the outside world for one update.
#[derive(Clone, Copy, Debug)]
pub struct StepContext {
    pub bounds: Bounds,
    pub motion: Motion,
    pub speed: f32,
    pub color_speed: f32,
    pub frame: u64,
}

/// A connection to another particle in the same frame, by index into the
/// owning field's collection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub neighbor: usize,
    pub distance: f32,
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub max_speed: f32,
    pub max_force: f32,
    pub hue: f32,
    pub energy: f32,
    pub pulse_offset: f32,
    pub pulse_speed: f32,
    pub trail: VecDeque<Vec2>,
    pub links: Vec<Link>,
}

impl Particle {
    pub fn new<R: Rng + ?Sized>(x: f32, y: f32, rng: &mut R) -> Self {
        Self {
            position: vec2(x, y),
            velocity: vec2(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0)),
            acceleration: Vec2::ZERO,
            max_speed: MAX_SPEED,
            max_force: MAX_FORCE,
            hue: rng.gen_range(0.0..360.0),
            energy: rng.gen_range(50.0..ENERGY_MAX),
            pulse_offset: rng.gen_range(0.0..TAU),
            pulse_speed: rng.gen_range(0.02..0.05),
            trail: VecDeque::with_capacity(TRAIL_CAPACITY + 1),
            links: Vec::new(),
        }
    }

    pub fn random<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> Self {
        let position = bounds.random_point(rng);
        Self::new(position.x, position.y, rng)
    }

    // Apply a force to the particle
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Oscillation phase shared by the energy and the drawn pulse.
    pub fn phase(&self, frame: u64) -> f32 {
        frame as f32 * self.pulse_speed + self.pulse_offset
    }

    pub fn update<R: Rng + ?Sized>(&mut self, ctx: &StepContext, rng: &mut R) {
        let previous = self.position;

        self.velocity += self.acceleration;
        match ctx.motion {
            Motion::Flock => {
                self.velocity = limit(self.velocity, self.max_speed * ctx.speed);
                self.position += self.velocity;
                self.wrap_edges(ctx.bounds);
            }
            Motion::Drift => {
                self.velocity += vec2(rng.gen_range(-JITTER..JITTER), rng.gen_range(-JITTER..JITTER));
                self.velocity = limit(self.velocity * FRICTION, self.max_speed);
                self.position += self.velocity * ctx.speed;
                self.bounce_edges(ctx.bounds);
            }
        }
        self.acceleration = Vec2::ZERO;

        if !self.velocity.is_finite() || !self.position.is_finite() {
            self.velocity = Vec2::ZERO;
            self.position = ctx.bounds.clamp(previous);
        }

        self.hue = (self.hue + ctx.color_speed).rem_euclid(360.0);
        self.energy = (self.energy + self.phase(ctx.frame).sin() * ENERGY_SWING).clamp(ENERGY_MIN, ENERGY_MAX);

        self.trail.push_back(self.position);
        if self.trail.len() > TRAIL_CAPACITY {
            self.trail.pop_front();
        }

        self.links.clear();
    }

    // Wrap the particle around the surface edges
    fn wrap_edges(&mut self, bounds: Bounds) {
        if self.position.x < 0.0 {
            self.position.x = bounds.width;
        } else if self.position.x > bounds.width {
            self.position.x = 0.0;
        }

        if self.position.y < 0.0 {
            self.position.y = bounds.height;
        } else if self.position.y > bounds.height {
            self.position.y = 0.0;
        }
    }

    // Reflect off the surface edges, losing half the speed, then clamp inside
    fn bounce_edges(&mut self, bounds: Bounds) {
        if self.position.x < 0.0 || self.position.x > bounds.width {
            self.velocity.x *= BOUNCE;
        }
        if self.position.y < 0.0 || self.position.y > bounds.height {
            self.velocity.y *= BOUNCE;
        }
        self.position = bounds.clamp(self.position);
    }

    /// Sum of the weighted boid rules against `neighbors`, plus a pull toward
    /// the pointer while it is held down. `neighbors` may include `self`;
    /// coincident particles are skipped.
    pub fn flocking_force(&self, neighbors: &[Particle], pointer: Option<Vec2>, engaged: bool) -> Vec2 {
        let mut force = self.separation(neighbors) * SEPARATION_WEIGHT
            + self.alignment(neighbors) * ALIGNMENT_WEIGHT
            + self.cohesion(neighbors) * COHESION_WEIGHT;

        if engaged {
            if let Some(target) = pointer {
                force += self.seek(target) * POINTER_SEEK_WEIGHT;
            }
        }

        force
    }

    /// Reynolds steering toward `target`: desired velocity minus current
    /// velocity, capped at `max_force`.
    pub fn seek(&self, target: Vec2) -> Vec2 {
        let desired = target - self.position;
        if desired.length_squared() <= 0.0 {
            return Vec2::ZERO;
        }
        limit(set_magnitude(desired, self.max_speed) - self.velocity, self.max_force)
    }

    // Calculate separation force (avoid crowding neighbors)
    fn separation(&self, neighbors: &[Particle]) -> Vec2 {
        let mut steering = Vec2::ZERO;
        let mut count = 0;

        for other in neighbors {
            let d = self.position.distance(other.position);
            if d > f32::EPSILON && d < SEPARATION_RADIUS {
                // Pointing away from the neighbor, weighted by closeness
                steering += (self.position - other.position) / (d * d);
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        steering /= count as f32;
        if steering.length_squared() > 0.0 {
            limit(set_magnitude(steering, self.max_speed) - self.velocity, self.max_force)
        } else {
            Vec2::ZERO
        }
    }

    // Calculate alignment force (steer towards average heading of neighbors)
    fn alignment(&self, neighbors: &[Particle]) -> Vec2 {
        let mut sum = Vec2::ZERO;
        let mut count = 0;

        for other in neighbors {
            let d = self.position.distance(other.position);
            if d > f32::EPSILON && d < NEIGHBOR_RADIUS {
                sum += other.velocity;
                count += 1;
            }
        }

        if count == 0 || sum.length_squared() <= 0.0 {
            return Vec2::ZERO;
        }

        limit(set_magnitude(sum / count as f32, self.max_speed) - self.velocity, self.max_force)
    }

    // Calculate cohesion force (steer towards average position of neighbors)
    fn cohesion(&self, neighbors: &[Particle]) -> Vec2 {
        let mut centroid = Vec2::ZERO;
        let mut count = 0;

        for other in neighbors {
            let d = self.position.distance(other.position);
            if d > f32::EPSILON && d < NEIGHBOR_RADIUS {
                centroid += other.position;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        self.seek(centroid / count as f32)
    }

    /// Radius of the main dot this frame: the base size plus a bounded pulse.
    pub fn pulse_size(&self, node_size: f32, frame: u64) -> f32 {
        (node_size + self.phase(frame).sin() * PULSE_SWING).max(MIN_PULSE_SIZE)
    }

    // Draw trail, glow, body, energy aura and highlight, in that order
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, node_size: f32, frame: u64) {
        let trail_len = self.trail.len() as f32;
        for (i, (from, to)) in self.trail.iter().zip(self.trail.iter().skip(1)).enumerate() {
            if from.distance(*to) > TRAIL_BREAK {
                continue;
            }
            let t = i as f32 / trail_len;
            canvas.line(*from, *to, 1.0 + 2.0 * t, Color::hsla(self.hue, 0.8, 0.6, 0.4 * t));
        }

        let size = self.pulse_size(node_size, frame);
        let intensity = (self.energy / ENERGY_MAX).clamp(0.0, 1.0);

        canvas.circle(self.position, size * 1.5, Color::hsla(self.hue, 0.6, 0.7, 0.3));

        canvas.radial_gradient_circle(
            self.position,
            size,
            Color::hsla(self.hue, 0.8, 0.6, 0.8 + intensity * 0.2),
            Color::hsla(self.hue, 0.8, 0.3, 0.0),
        );

        if self.energy > AURA_THRESHOLD {
            canvas.circle(
                self.position,
                size * 3.0,
                Color::hsla(self.hue, 1.0, 0.7, (self.energy - AURA_THRESHOLD) / 100.0),
            );
        }

        canvas.circle(self.position, size * 0.3, Color::white(0.6));
    }
}
