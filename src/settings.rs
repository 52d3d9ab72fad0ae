/*
 * Settings Module
 *
 * This module defines the Settings struct that contains every adjustable
 * parameter of the visualization. Settings are changed by the control panel
 * and by key commands, read by the update and render passes, and can be
 * loaded from a JSON file at start-up. Out-of-range values are clamped, never
 * rejected.
 */

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

use crate::controls::Command;
use crate::error::Result;
use crate::reaction_diffusion::ReactionParams;
use crate::{POPULATION_CEILING, POPULATION_FLOOR};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Flocking,
    ReactionDiffusion,
    CellularAutomaton,
}

impl RenderMode {
    pub const ALL: [RenderMode; 3] = [
        RenderMode::Flocking,
        RenderMode::ReactionDiffusion,
        RenderMode::CellularAutomaton,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Flocking => "Boids Algorithm",
            RenderMode::ReactionDiffusion => "Reaction-Diffusion",
            RenderMode::CellularAutomaton => "Cellular Automata",
        }
    }
}

// Parameters for the simulation that can be adjusted via UI, keys or a settings file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: RenderMode,
    pub paused: bool,
    pub particle_count: usize,
    pub connection_distance: f32,
    pub speed: f32,
    pub node_size: f32,
    pub color_speed: f32,
    /// Radius of the pointer's attraction field.
    pub force_field: f32,
    pub reaction: ReactionParams,
    pub show_debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: RenderMode::Flocking,
            paused: false,
            particle_count: 200,
            connection_distance: 120.0,
            speed: 1.5,
            node_size: 3.0,
            color_speed: 0.5,
            force_field: 150.0,
            reaction: ReactionParams::default(),
            show_debug: false,
        }
    }
}

// Clamp into `range`; NaN falls back to `fallback`
fn clamp_finite(value: f32, range: RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(text)?;
        settings.clamp();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // Get parameter ranges for UI sliders
    pub fn particle_count_range() -> RangeInclusive<usize> {
        POPULATION_FLOOR..=POPULATION_CEILING
    }

    pub fn connection_distance_range() -> RangeInclusive<f32> {
        20.0..=300.0
    }

    pub fn speed_range() -> RangeInclusive<f32> {
        0.1..=5.0
    }

    pub fn node_size_range() -> RangeInclusive<f32> {
        1.0..=10.0
    }

    pub fn color_speed_range() -> RangeInclusive<f32> {
        0.1..=3.0
    }

    pub fn force_field_range() -> RangeInclusive<f32> {
        10.0..=200.0
    }

    pub fn rate_range() -> RangeInclusive<f32> {
        0.0..=0.1
    }

    pub fn diffusion_range() -> RangeInclusive<f32> {
        0.0..=1.0
    }

    /// Pull every field back into its documented range.
    pub fn clamp(&mut self) {
        let defaults = Settings::default();
        let population = Self::particle_count_range();
        self.particle_count = self.particle_count.clamp(*population.start(), *population.end());
        self.connection_distance = clamp_finite(
            self.connection_distance,
            Self::connection_distance_range(),
            defaults.connection_distance,
        );
        self.speed = clamp_finite(self.speed, Self::speed_range(), defaults.speed);
        self.node_size = clamp_finite(self.node_size, Self::node_size_range(), defaults.node_size);
        self.color_speed = clamp_finite(self.color_speed, Self::color_speed_range(), defaults.color_speed);
        self.force_field = clamp_finite(self.force_field, Self::force_field_range(), defaults.force_field);

        let reaction = &mut self.reaction;
        reaction.feed = clamp_finite(reaction.feed, Self::rate_range(), defaults.reaction.feed);
        reaction.kill = clamp_finite(reaction.kill, Self::rate_range(), defaults.reaction.kill);
        reaction.diffusion_a = clamp_finite(reaction.diffusion_a, Self::diffusion_range(), defaults.reaction.diffusion_a);
        reaction.diffusion_b = clamp_finite(reaction.diffusion_b, Self::diffusion_range(), defaults.reaction.diffusion_b);
    }

    /// Apply a setting increment or decrement. Commands that are not
    /// adjustments (pause, reset, mode select) leave the settings untouched.
    pub fn adjust(&mut self, command: Command) {
        match command {
            Command::Population(delta) => {
                let count = self.particle_count as i64 + delta;
                self.particle_count = count.max(0) as usize;
            }
            Command::ConnectionDistance(delta) => self.connection_distance += delta,
            Command::Speed(delta) => self.speed += delta,
            Command::NodeSize(delta) => self.node_size += delta,
            Command::ColorSpeed(delta) => self.color_speed += delta,
            Command::ForceField(delta) => self.force_field += delta,
            Command::TogglePause | Command::Reset | Command::SelectMode(_) => return,
        }
        self.clamp();
    }

    // Names of the fields that differ from `previous`, for change logging
    pub fn changed_fields(&self, previous: &Settings) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.mode != previous.mode {
            changed.push("mode");
        }
        if self.paused != previous.paused {
            changed.push("paused");
        }
        if self.particle_count != previous.particle_count {
            changed.push("particle_count");
        }
        if self.connection_distance != previous.connection_distance {
            changed.push("connection_distance");
        }
        if self.speed != previous.speed {
            changed.push("speed");
        }
        if self.node_size != previous.node_size {
            changed.push("node_size");
        }
        if self.color_speed != previous.color_speed {
            changed.push("color_speed");
        }
        if self.force_field != previous.force_field {
            changed.push("force_field");
        }
        if self.reaction != previous.reaction {
            changed.push("reaction");
        }
        if self.show_debug != previous.show_debug {
            changed.push("show_debug");
        }
        changed
    }
}
