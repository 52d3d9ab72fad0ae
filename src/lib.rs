/*
 * Node Weave - Module Definitions
 *
 * This file defines the module structure for the generative visualization.
 * The simulation core (particles, grids, director) draws through the Canvas
 * trait and never touches nannou's window types directly; the app, ui, input
 * and renderer modules wire it into a nannou window.
 */

// Re-export key components for easier access
pub use canvas::{Canvas, Color, NannouCanvas, RecordingCanvas};
pub use controls::Command;
pub use debug::DebugInfo;
pub use director::{ActiveMode, SimulationDirector};
pub use error::ConfigError;
pub use field::ParticleField;
pub use particle::Particle;
pub use settings::{RenderMode, Settings};

// Define modules
pub mod app;
pub mod automaton;
pub mod canvas;
pub mod connections;
pub mod controls;
pub mod debug;
pub mod director;
pub mod error;
pub mod field;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod particle;
pub mod reaction_diffusion;
pub mod renderer;
pub mod settings;
pub mod ui;

// Constants
pub const POPULATION_FLOOR: usize = 10;
pub const POPULATION_CEILING: usize = 800;
/// Side length of one grid cell in pixels, shared by both grid modes.
pub const CELL_SIZE: f32 = 4.0;
