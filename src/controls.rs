/*
 * Controls Module
 *
 * Key bindings for the visualization:
 *
 *   Q / W      particle count      -10 / +10
 *   A / S      connection distance -10 / +10
 *   Z / X      speed               -0.2 / +0.2
 *   E / R      node size           -0.5 / +0.5
 *   T / Y      color speed         -0.1 / +0.1
 *   U / I      force field radius  -10 / +10
 *   SPACE      pause / resume
 *   ENTER      full reset
 *   1 / 2 / 3  flocking / reaction-diffusion / cellular automaton
 */

use crate::settings::RenderMode;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Population(i64),
    ConnectionDistance(f32),
    Speed(f32),
    NodeSize(f32),
    ColorSpeed(f32),
    ForceField(f32),
    TogglePause,
    Reset,
    SelectMode(RenderMode),
}

impl Command {
    /// Command bound to `key`, case-insensitive. Unbound keys give `None`.
    pub fn from_key(key: char) -> Option<Self> {
        let command = match key.to_ascii_lowercase() {
            'q' => Command::Population(-10),
            'w' => Command::Population(10),
            'a' => Command::ConnectionDistance(-10.0),
            's' => Command::ConnectionDistance(10.0),
            'z' => Command::Speed(-0.2),
            'x' => Command::Speed(0.2),
            'e' => Command::NodeSize(-0.5),
            'r' => Command::NodeSize(0.5),
            't' => Command::ColorSpeed(-0.1),
            'y' => Command::ColorSpeed(0.1),
            'u' => Command::ForceField(-10.0),
            'i' => Command::ForceField(10.0),
            ' ' => Command::TogglePause,
            '\n' | '\r' => Command::Reset,
            '1' => Command::SelectMode(RenderMode::Flocking),
            '2' => Command::SelectMode(RenderMode::ReactionDiffusion),
            '3' => Command::SelectMode(RenderMode::CellularAutomaton),
            _ => return None,
        };
        Some(command)
    }
}
