/*
 * Particle Field Module
 *
 * Owns the particle collection and everything that acts on it as a whole:
 * gradual population changes toward the target count, the pointer's
 * attraction field, flocking forces, per-particle updates and the per-frame
 * connection graph.
 *
 * Population changes are throttled to a few particles per tick so the count
 * never jumps visibly.
 */

use log::debug;
use nannou::prelude::*;
use rand::Rng;

use crate::canvas::{Canvas, Color};
use crate::connections::ConnectionGraph;
use crate::geometry::Bounds;
use crate::particle::{Motion, Particle, StepContext};
use crate::settings::Settings;
use crate::{POPULATION_CEILING, POPULATION_FLOOR};

/// Most particles added or removed in a single tick.
pub const POPULATION_STEP: usize = 5;
const POINTER_PULL: f32 = 0.3;

/// Per-tick parameters that do not live in `Settings`.
#[derive(Clone, Copy, Debug)]
pub struct TickParams {
    pub bounds: Bounds,
    pub frame: u64,
    pub motion: Motion,
    /// Only the first `limit` particles move (overlay mode); `None` moves all.
    pub limit: Option<usize>,
}

pub struct ParticleField {
    particles: Vec<Particle>,
    target: usize,
    pointer: Option<Vec2>,
    pointer_active: bool,
    pointer_engaged: bool,
    connections: ConnectionGraph,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(count: usize, bounds: Bounds, rng: &mut R) -> Self {
        let mut field = Self {
            particles: Vec::new(),
            target: POPULATION_FLOOR,
            pointer: None,
            pointer_active: false,
            pointer_engaged: false,
            connections: ConnectionGraph::default(),
        };
        field.reset(count, bounds, rng);
        field
    }

    /// Replace the whole population with `count` fresh particles at random positions.
    pub fn reset<R: Rng + ?Sized>(&mut self, count: usize, bounds: Bounds, rng: &mut R) {
        let count = count.clamp(POPULATION_FLOOR, POPULATION_CEILING);
        self.particles = (0..count).map(|_| Particle::random(bounds, rng)).collect();
        self.target = count;
        self.connections = ConnectionGraph::default();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn target_population(&self) -> usize {
        self.target
    }

    pub fn connections(&self) -> &ConnectionGraph {
        &self.connections
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn pointer_active(&self) -> bool {
        self.pointer_active
    }

    pub fn pointer_engaged(&self) -> bool {
        self.pointer_engaged
    }

    pub fn set_pointer(&mut self, position: Vec2) {
        self.pointer = Some(position);
        self.pointer_active = true;
    }

    pub fn clear_pointer(&mut self) {
        self.pointer_active = false;
        self.pointer_engaged = false;
    }

    pub fn set_engaged(&mut self, engaged: bool) {
        self.pointer_engaged = engaged;
    }

    /// Set the count the population converges to; clamped to [floor, ceiling].
    pub fn set_target_population(&mut self, target: usize) {
        self.target = target.clamp(POPULATION_FLOOR, POPULATION_CEILING);
    }

    /// Append a particle at (`x`, `y`). Returns false at the ceiling.
    pub fn add_particle_at<R: Rng + ?Sized>(&mut self, x: f32, y: f32, rng: &mut R) -> bool {
        if self.particles.len() >= POPULATION_CEILING {
            return false;
        }
        self.particles.push(Particle::new(x, y, rng));
        true
    }

    // Move at most POPULATION_STEP particles toward the target
    pub fn adjust_population<R: Rng + ?Sized>(&mut self, bounds: Bounds, rng: &mut R) {
        let count = self.particles.len();
        if count < self.target {
            let to_add = (self.target - count).min(POPULATION_STEP);
            for _ in 0..to_add {
                let position = bounds.random_point(rng);
                self.add_particle_at(position.x, position.y, rng);
            }
            debug!("population {} -> {} (target {})", count, self.particles.len(), self.target);
        } else if count > self.target {
            let to_remove = (count - self.target).min(POPULATION_STEP);
            self.remove_random(to_remove, rng);
            debug!("population {} -> {} (target {})", count, self.particles.len(), self.target);
        }
    }

    fn remove_random<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        for _ in 0..count {
            if self.particles.len() <= POPULATION_FLOOR {
                break;
            }
            let index = rng.gen_range(0..self.particles.len());
            self.particles.swap_remove(index);
        }
    }

    // Nudge particles inside the influence radius toward the pointer
    fn apply_pointer_attraction(&mut self, radius: f32, active: usize) {
        let Some(pointer) = self.pointer else {
            return;
        };
        if radius <= 0.0 {
            return;
        }

        for particle in &mut self.particles[..active] {
            let offset = pointer - particle.position;
            let distance = offset.length();
            if distance > 0.0 && distance < radius {
                let strength = (radius - distance) / radius;
                particle.velocity += offset / distance * strength * POINTER_PULL;
            }
        }
    }

    /// One simulation step for the whole field.
    pub fn tick<R: Rng + ?Sized>(&mut self, settings: &Settings, params: TickParams, rng: &mut R) {
        self.adjust_population(params.bounds, rng);

        let active = params.limit.map_or(self.particles.len(), |limit| limit.min(self.particles.len()));

        if self.pointer_active {
            self.apply_pointer_attraction(settings.force_field, active);
        }

        if params.motion == Motion::Flock {
            // Forces read the population as it was at the start of the step
            let forces: Vec<Vec2> = self.particles[..active]
                .iter()
                .map(|p| p.flocking_force(&self.particles, self.pointer, self.pointer_engaged))
                .collect();
            for (particle, force) in self.particles.iter_mut().zip(forces) {
                particle.apply_force(force);
            }
        }

        let ctx = StepContext {
            bounds: params.bounds,
            motion: params.motion,
            speed: settings.speed,
            color_speed: settings.color_speed,
            frame: params.frame,
        };
        for particle in &mut self.particles[..active] {
            particle.update(&ctx, rng);
        }

        match params.motion {
            Motion::Flock => self.refresh_connections(settings.connection_distance),
            Motion::Drift => self.clear_connections(),
        }
    }

    /// Rebuild the connection graph from current positions.
    pub fn refresh_connections(&mut self, threshold: f32) {
        self.connections = ConnectionGraph::compute(&mut self.particles, threshold);
    }

    pub fn clear_connections(&mut self) {
        for particle in &mut self.particles {
            particle.links.clear();
        }
        self.connections = ConnectionGraph::default();
    }

    /// Pull every particle back inside `bounds` after a resize.
    pub fn clamp_into(&mut self, bounds: Bounds) {
        for particle in &mut self.particles {
            particle.position = bounds.clamp(particle.position);
            particle.trail.clear();
        }
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, settings: &Settings, frame: u64, limit: Option<usize>) {
        self.connections.draw(canvas, &self.particles);

        let visible = limit.map_or(self.particles.len(), |limit| limit.min(self.particles.len()));
        for particle in &self.particles[..visible] {
            particle.draw(canvas, settings.node_size, frame);
        }

        if self.pointer_active {
            if let Some(pointer) = self.pointer {
                canvas.ring(pointer, settings.force_field, 2.0, Color::white(0.1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bounds() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    fn flock_params(frame: u64) -> TickParams {
        TickParams {
            bounds: bounds(),
            frame,
            motion: Motion::Flock,
            limit: None,
        }
    }

    #[test]
    fn test_population_converges_in_expected_ticks() {
        let mut rng = StdRng::seed_from_u64(1);
        let settings = Settings::default();

        for (start, target) in [(10, 37), (200, 150), (50, 50), (12, 300)] {
            let mut field = ParticleField::new(start, bounds(), &mut rng);
            field.set_target_population(target);

            let diff = start.abs_diff(target);
            let ticks = (diff + POPULATION_STEP - 1) / POPULATION_STEP;
            for frame in 0..ticks {
                let before = field.len();
                field.tick(&settings, flock_params(frame as u64), &mut rng);
                assert!(field.len().abs_diff(before) <= POPULATION_STEP);
            }
            assert_eq!(field.len(), target, "from {start} toward {target}");
        }
    }

    #[test]
    fn test_floor_is_enforced() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = ParticleField::new(10, bounds(), &mut rng);

        field.set_target_population(5);
        field.tick(&Settings::default(), flock_params(0), &mut rng);

        assert_eq!(field.target_population(), POPULATION_FLOOR);
        assert_eq!(field.len(), 10);
    }

    #[test]
    fn test_removal_never_goes_below_floor() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = ParticleField::new(12, bounds(), &mut rng);
        field.target = 0;

        field.adjust_population(bounds(), &mut rng);
        assert_eq!(field.len(), POPULATION_FLOOR);
    }

    #[test]
    fn test_add_particle_at_respects_ceiling() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut field = ParticleField::new(POPULATION_CEILING - 1, bounds(), &mut rng);

        assert!(field.add_particle_at(10.0, 20.0, &mut rng));
        assert_eq!(field.particles().last().map(|p| p.position), Some(vec2(10.0, 20.0)));
        assert!(!field.add_particle_at(30.0, 40.0, &mut rng));
        assert_eq!(field.len(), POPULATION_CEILING);
    }

    #[test]
    fn test_pointer_attracts_only_inside_radius() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = ParticleField::new(10, bounds(), &mut rng);
        for particle in field.particles_mut() {
            particle.position = vec2(700.0, 500.0);
            particle.velocity = Vec2::ZERO;
        }
        field.particles_mut()[0].position = vec2(100.0, 100.0);
        field.set_pointer(vec2(150.0, 100.0));

        field.apply_pointer_attraction(150.0, 10);

        let near = field.particles()[0].velocity;
        assert!(near.x > 0.0);
        assert!((near.x - (100.0 / 150.0) * POINTER_PULL).abs() < 1e-5);
        assert_eq!(field.particles()[1].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_pointer_on_top_of_particle_is_skipped() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut field = ParticleField::new(10, bounds(), &mut rng);
        let spot = field.particles()[0].position;
        field.particles_mut()[0].velocity = Vec2::ZERO;
        field.set_pointer(spot);

        field.apply_pointer_attraction(150.0, 1);
        assert_eq!(field.particles()[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_clear_pointer_disengages() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = ParticleField::new(10, bounds(), &mut rng);
        field.set_pointer(vec2(1.0, 1.0));
        field.set_engaged(true);

        field.clear_pointer();
        assert!(!field.pointer_active());
        assert!(!field.pointer_engaged());
    }

    #[test]
    fn test_tick_keeps_positions_in_bounds_and_finite() {
        let mut rng = StdRng::seed_from_u64(8);
        let settings = Settings::default();
        let mut field = ParticleField::new(150, bounds(), &mut rng);
        field.set_pointer(vec2(400.0, 300.0));
        field.set_engaged(true);

        for frame in 0..300 {
            field.tick(&settings, flock_params(frame), &mut rng);
            for particle in field.particles() {
                assert!(particle.position.is_finite());
                assert!(bounds().contains(particle.position));
            }
        }
    }

    #[test]
    fn test_drift_limit_only_moves_overlay() {
        let mut rng = StdRng::seed_from_u64(9);
        let settings = Settings::default();
        let mut field = ParticleField::new(60, bounds(), &mut rng);
        let before: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();

        field.tick(
            &settings,
            TickParams {
                bounds: bounds(),
                frame: 0,
                motion: Motion::Drift,
                limit: Some(50),
            },
            &mut rng,
        );

        let after: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();
        assert_eq!(&after[50..], &before[50..]);
        assert!(field.connections().is_empty());
    }

    #[test]
    fn test_clamp_into_smaller_bounds() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut field = ParticleField::new(40, bounds(), &mut rng);
        let small = Bounds::new(100.0, 80.0);

        field.clamp_into(small);
        assert!(field.particles().iter().all(|p| small.contains(p.position)));
    }
}
