/*
 * Simulation Director Module
 *
 * Top-level state machine over the three render modes. The director owns the
 * settings, the particle field (kept across mode switches) and the state of
 * whichever grid mode is active. Each frame the app calls `tick` once, then
 * the view calls `render`, which only reads.
 *
 * While paused no tick advances anything and rendering shows the paused
 * overlay in place of the normal scene.
 */

use log::{info, warn};
use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::automaton::GridAutomaton;
use crate::canvas::{Canvas, Color, TextAlign};
use crate::controls::Command;
use crate::field::{ParticleField, TickParams};
use crate::geometry::Bounds;
use crate::grid::ToroidalGrid;
use crate::particle::Motion;
use crate::reaction_diffusion::ReactionDiffusionField;
use crate::settings::{RenderMode, Settings};
use crate::{CELL_SIZE, POPULATION_CEILING};

const AUTOMATON_DENSITY: f64 = 0.4;
const DROPLET_COUNT: usize = 10;
const DROPLET_RADIUS: usize = 5;
/// Particles that keep drifting on top of the reaction-diffusion field.
pub const OVERLAY_PARTICLES: usize = 50;

const BACKGROUND_TOP: Color = Color::hsla(250.0, 0.2, 0.05, 1.0);
const BACKGROUND_BOTTOM: Color = Color::hsla(280.0, 0.4, 0.13, 1.0);
const INFO_MARGIN: f32 = 20.0;

/// State of the active mode. Grid modes carry their grid; the particle field
/// lives outside so it survives mode switches.
pub enum ActiveMode {
    Flocking,
    ReactionDiffusion(ReactionDiffusionField),
    CellularAutomaton(GridAutomaton),
}

impl ActiveMode {
    pub fn mode(&self) -> RenderMode {
        match self {
            ActiveMode::Flocking => RenderMode::Flocking,
            ActiveMode::ReactionDiffusion(_) => RenderMode::ReactionDiffusion,
            ActiveMode::CellularAutomaton(_) => RenderMode::CellularAutomaton,
        }
    }
}

pub struct SimulationDirector {
    settings: Settings,
    field: ParticleField,
    active: ActiveMode,
    bounds: Bounds,
    frame: u64,
    rng: StdRng,
}

impl SimulationDirector {
    pub fn new(settings: Settings, width: f32, height: f32) -> Self {
        Self::with_rng(settings, width, height, StdRng::from_entropy())
    }

    /// Director driven by a caller-supplied generator, for reproducible runs.
    pub fn with_rng(mut settings: Settings, width: f32, height: f32, mut rng: StdRng) -> Self {
        settings.clamp();
        let bounds = Bounds::new(width, height);
        let field = ParticleField::new(settings.particle_count, bounds, &mut rng);
        let mut director = Self {
            settings,
            field,
            active: ActiveMode::Flocking,
            bounds,
            frame: 0,
            rng,
        };
        director.active = director.enter_mode(director.settings.mode);
        info!(
            "simulation started: {:.0}x{:.0}, {} particles, mode {:?}",
            bounds.width,
            bounds.height,
            director.field.len(),
            director.settings.mode
        );
        director
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Direct access for the control panel. Values are clamped on the next tick.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn mode(&self) -> RenderMode {
        self.active.mode()
    }

    pub fn active(&self) -> &ActiveMode {
        &self.active
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_paused(&self) -> bool {
        self.settings.paused
    }

    // Fresh state for a grid mode sized to the current surface
    fn enter_mode(&mut self, mode: RenderMode) -> ActiveMode {
        let grid = ToroidalGrid::for_surface(self.bounds, CELL_SIZE);
        match mode {
            RenderMode::Flocking => ActiveMode::Flocking,
            RenderMode::ReactionDiffusion => {
                let mut rd = ReactionDiffusionField::new(grid);
                rd.seed(&mut self.rng, DROPLET_COUNT, DROPLET_RADIUS);
                ActiveMode::ReactionDiffusion(rd)
            }
            RenderMode::CellularAutomaton => {
                let mut automaton = GridAutomaton::new(grid);
                automaton.randomize(&mut self.rng, AUTOMATON_DENSITY);
                ActiveMode::CellularAutomaton(automaton)
            }
        }
    }

    /// Switch modes. The entered grid mode always starts from a fresh seed;
    /// particles are kept as they are.
    pub fn set_mode(&mut self, mode: RenderMode) {
        self.settings.mode = mode;
        self.active = self.enter_mode(mode);
        info!("mode switched to {}", mode.label());
    }

    pub fn toggle_pause(&mut self) {
        self.settings.paused = !self.settings.paused;
        info!("simulation {}", if self.settings.paused { "paused" } else { "resumed" });
    }

    /// Reinitialize the particles at the target count and reseed the active grid.
    pub fn reset(&mut self) {
        self.settings.clamp();
        self.field.reset(self.settings.particle_count, self.bounds, &mut self.rng);
        self.active = self.enter_mode(self.settings.mode);
        self.frame = 0;
        info!("simulation reset with {} particles", self.field.len());
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::TogglePause => self.toggle_pause(),
            Command::Reset => self.reset(),
            Command::SelectMode(mode) => self.set_mode(mode),
            adjustment => {
                self.settings.adjust(adjustment);
                self.field.set_target_population(self.settings.particle_count);
            }
        }
    }

    /// Adopt a new surface size. Non-positive or non-finite sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !Bounds::is_valid_size(width, height) {
            warn!("ignoring resize to {}x{}", width, height);
            return;
        }
        self.bounds = Bounds::new(width, height);
        self.field.clamp_into(self.bounds);
        self.active = self.enter_mode(self.settings.mode);
        info!("resized to {:.0}x{:.0}", width, height);
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.field.set_pointer(position);
    }

    pub fn pointer_left(&mut self) {
        self.field.clear_pointer();
    }

    /// Press drops a new particle under the pointer and engages its pull.
    /// The target grows with it so the next tick does not take it back.
    pub fn pointer_pressed(&mut self, position: Vec2) {
        self.field.set_pointer(position);
        self.field.set_engaged(true);
        if self.field.add_particle_at(position.x, position.y, &mut self.rng) {
            self.settings.particle_count = (self.settings.particle_count + 1).min(POPULATION_CEILING);
            self.field.set_target_population(self.settings.particle_count);
        }
    }

    pub fn pointer_released(&mut self) {
        self.field.set_engaged(false);
    }

    /// Advance the simulation by one frame. Does nothing while paused.
    pub fn tick(&mut self) {
        if self.is_paused() {
            return;
        }

        self.settings.clamp();
        self.field.set_target_population(self.settings.particle_count);

        let mut params = TickParams {
            bounds: self.bounds,
            frame: self.frame,
            motion: Motion::Flock,
            limit: None,
        };

        match &mut self.active {
            ActiveMode::Flocking => {
                self.field.tick(&self.settings, params, &mut self.rng);
            }
            ActiveMode::ReactionDiffusion(rd) => {
                rd.step(&self.settings.reaction);
                params.motion = Motion::Drift;
                params.limit = Some(OVERLAY_PARTICLES);
                self.field.tick(&self.settings, params, &mut self.rng);
            }
            ActiveMode::CellularAutomaton(automaton) => {
                automaton.step();
            }
        }

        self.frame += 1;
    }

    /// Draw the current state. Reads only.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.vertical_gradient(BACKGROUND_TOP, BACKGROUND_BOTTOM);

        if self.is_paused() {
            self.draw_paused(canvas);
            return;
        }

        match &self.active {
            ActiveMode::Flocking => {
                self.field.draw(canvas, &self.settings, self.frame, None);
            }
            ActiveMode::ReactionDiffusion(rd) => {
                rd.draw(canvas, CELL_SIZE);
                self.field.draw(canvas, &self.settings, self.frame, Some(OVERLAY_PARTICLES));
            }
            ActiveMode::CellularAutomaton(automaton) => {
                automaton.draw(canvas, CELL_SIZE, self.frame);
            }
        }

        self.draw_mode_info(canvas);
    }

    fn draw_mode_info<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let color = Color::white(0.8);
        let x = canvas.width() - INFO_MARGIN;
        let y = canvas.height() - INFO_MARGIN;
        canvas.text(self.mode().label(), vec2(x, y), TextAlign::Right, 12, color);
        canvas.text(
            &format!("Particles: {}", self.field.len()),
            vec2(x, y - 20.0),
            TextAlign::Right,
            12,
            color,
        );
    }

    fn draw_paused<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let center = self.bounds.center();
        canvas.fade(Color::black(0.3));
        canvas.text("PAUSED", center, TextAlign::Center, 32, Color::white(0.9));
        canvas.text(
            "Press SPACE to resume",
            center + vec2(0.0, 40.0),
            TextAlign::Center,
            16,
            Color::white(0.9),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, RecordingCanvas};

    fn director(mode: RenderMode) -> SimulationDirector {
        let settings = Settings {
            mode,
            particle_count: 60,
            ..Settings::default()
        };
        SimulationDirector::with_rng(settings, 400.0, 300.0, StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_starts_in_configured_mode() {
        let director = director(RenderMode::CellularAutomaton);
        assert_eq!(director.mode(), RenderMode::CellularAutomaton);
        match director.active() {
            ActiveMode::CellularAutomaton(automaton) => {
                assert_eq!(automaton.grid().cols(), 100);
                assert_eq!(automaton.grid().rows(), 75);
            }
            _ => panic!("expected an automaton"),
        }
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut director = director(RenderMode::Flocking);
        director.tick();
        director.toggle_pause();
        let positions: Vec<Vec2> = director.field().particles().iter().map(|p| p.position).collect();
        let frame = director.frame();

        for _ in 0..10 {
            director.tick();
        }

        let after: Vec<Vec2> = director.field().particles().iter().map(|p| p.position).collect();
        assert_eq!(after, positions);
        assert_eq!(director.frame(), frame);
    }

    #[test]
    fn test_paused_render_replaces_scene() {
        let mut director = director(RenderMode::Flocking);
        director.apply(Command::TogglePause);

        let mut canvas = RecordingCanvas::new(400.0, 300.0);
        director.render(&mut canvas);

        assert!(matches!(canvas.ops[0], DrawOp::VerticalGradient { .. }));
        let texts: Vec<&str> = canvas.texts().collect();
        assert_eq!(texts, vec!["PAUSED", "Press SPACE to resume"]);
        assert!(!canvas.ops.iter().any(|op| matches!(op, DrawOp::RadialGradient { .. })));
    }

    #[test]
    fn test_mode_switch_keeps_particles() {
        let mut director = director(RenderMode::Flocking);
        for _ in 0..5 {
            director.tick();
        }
        let positions: Vec<Vec2> = director.field().particles().iter().map(|p| p.position).collect();

        director.apply(Command::SelectMode(RenderMode::CellularAutomaton));
        let kept: Vec<Vec2> = director.field().particles().iter().map(|p| p.position).collect();
        assert_eq!(kept, positions);

        director.tick();
        match director.active() {
            ActiveMode::CellularAutomaton(automaton) => assert_eq!(automaton.generation(), 1),
            _ => panic!("expected an automaton"),
        }
    }

    #[test]
    fn test_reentering_a_grid_mode_reseeds() {
        let mut director = director(RenderMode::ReactionDiffusion);
        for _ in 0..3 {
            director.tick();
        }
        director.set_mode(RenderMode::Flocking);
        director.set_mode(RenderMode::ReactionDiffusion);

        match director.active() {
            ActiveMode::ReactionDiffusion(rd) => assert_eq!(rd.steps(), 0),
            _ => panic!("expected reaction-diffusion"),
        }
    }

    #[test]
    fn test_reaction_diffusion_moves_only_overlay() {
        let settings = Settings {
            mode: RenderMode::ReactionDiffusion,
            particle_count: 80,
            ..Settings::default()
        };
        let mut director = SimulationDirector::with_rng(settings, 400.0, 300.0, StdRng::seed_from_u64(3));
        let before: Vec<Vec2> = director.field().particles().iter().map(|p| p.position).collect();

        director.tick();

        let after: Vec<Vec2> = director.field().particles().iter().map(|p| p.position).collect();
        assert_eq!(&after[OVERLAY_PARTICLES..], &before[OVERLAY_PARTICLES..]);
        assert!(director.field().connections().is_empty());
    }

    #[test]
    fn test_commands_adjust_settings_and_target() {
        let mut director = director(RenderMode::Flocking);
        director.apply(Command::Population(10));
        assert_eq!(director.settings().particle_count, 70);
        assert_eq!(director.field().target_population(), 70);

        for _ in 0..2 {
            director.tick();
        }
        assert_eq!(director.field().len(), 70);

        director.apply(Command::ForceField(1_000.0));
        assert_eq!(director.settings().force_field, 200.0);
    }

    #[test]
    fn test_settings_mut_is_clamped_on_tick() {
        let mut director = director(RenderMode::Flocking);
        director.settings_mut().particle_count = 3;
        director.settings_mut().speed = 50.0;

        director.tick();
        assert_eq!(director.settings().particle_count, crate::POPULATION_FLOOR);
        assert_eq!(director.settings().speed, 5.0);
    }

    #[test]
    fn test_reset_restores_target_population() {
        let mut director = director(RenderMode::CellularAutomaton);
        for _ in 0..4 {
            director.tick();
        }
        director.pointer_pressed(vec2(10.0, 10.0));
        assert_eq!(director.field().len(), 61);
        assert_eq!(director.settings().particle_count, 61);
        director.settings_mut().particle_count = 40;

        director.apply(Command::Reset);
        assert_eq!(director.field().len(), 40);
        assert_eq!(director.frame(), 0);
        match director.active() {
            ActiveMode::CellularAutomaton(automaton) => assert_eq!(automaton.generation(), 0),
            _ => panic!("expected an automaton"),
        }
    }

    #[test]
    fn test_invalid_resize_is_ignored() {
        let mut director = director(RenderMode::CellularAutomaton);
        director.resize(0.0, 300.0);
        director.resize(400.0, -5.0);
        director.resize(f32::NAN, 10.0);
        assert_eq!(director.bounds(), Bounds::new(400.0, 300.0));
    }

    #[test]
    fn test_resize_clamps_particles_and_regrids() {
        let mut director = director(RenderMode::ReactionDiffusion);
        director.resize(100.0, 80.0);

        let bounds = director.bounds();
        assert!(director.field().particles().iter().all(|p| bounds.contains(p.position)));
        match director.active() {
            ActiveMode::ReactionDiffusion(rd) => {
                assert_eq!(rd.grid().cols(), 25);
                assert_eq!(rd.grid().rows(), 20);
            }
            _ => panic!("expected reaction-diffusion"),
        }
    }

    #[test]
    fn test_pressed_particle_survives_ticks() {
        let mut director = director(RenderMode::Flocking);
        director.pointer_pressed(vec2(200.0, 150.0));
        for _ in 0..5 {
            director.tick();
        }
        assert_eq!(director.field().len(), 61);
    }

    #[test]
    fn test_pointer_lifecycle() {
        let mut director = director(RenderMode::Flocking);
        director.pointer_moved(vec2(50.0, 60.0));
        assert!(director.field().pointer_active());
        assert!(!director.field().pointer_engaged());

        director.pointer_pressed(vec2(50.0, 60.0));
        assert!(director.field().pointer_engaged());

        director.pointer_released();
        assert!(!director.field().pointer_engaged());
        assert!(director.field().pointer_active());

        director.pointer_left();
        assert!(!director.field().pointer_active());
    }

    #[test]
    fn test_mode_info_is_drawn_last() {
        let mut director = director(RenderMode::Flocking);
        director.tick();

        let mut canvas = RecordingCanvas::new(400.0, 300.0);
        director.render(&mut canvas);

        let texts: Vec<&str> = canvas.texts().collect();
        assert_eq!(texts, vec!["Boids Algorithm", "Particles: 60"]);
        assert!(matches!(canvas.ops.last(), Some(DrawOp::Text { .. })));
    }
}
