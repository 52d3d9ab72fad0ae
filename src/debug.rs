/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and simulation counters shown in the control panel and the debug overlay.
 */

use std::time::Duration;

use crate::director::{ActiveMode, SimulationDirector};

// Debug information to display
#[derive(Clone, Debug, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub particle_count: usize,
    pub connection_count: usize,
    /// Automaton generation or reaction-diffusion step, whichever mode is active.
    pub grid_steps: Option<u64>,
}

impl DebugInfo {
    pub fn record(&mut self, fps: f32, frame_time: Duration, director: &SimulationDirector) {
        self.fps = fps;
        self.frame_time = frame_time;
        self.particle_count = director.field().len();
        self.connection_count = director.field().connections().len();
        self.grid_steps = match director.active() {
            ActiveMode::Flocking => None,
            ActiveMode::ReactionDiffusion(rd) => Some(rd.steps()),
            ActiveMode::CellularAutomaton(automaton) => Some(automaton.generation()),
        };
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Particles: {}", self.particle_count),
            format!("Connections: {}", self.connection_count),
        ];
        if let Some(steps) = self.grid_steps {
            lines.push(format!("Generation: {}", steps));
        }
        lines
    }
}
