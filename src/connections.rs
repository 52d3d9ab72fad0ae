/*
 * Connection Graph Module
 *
 * Every frame the field rebuilds the set of particle pairs that are closer
 * than the connection distance. Pairs are stored as indices into the field's
 * particle collection and each particle gets a matching `Link` entry, so the
 * graph is symmetric. Nothing here survives to the next frame.
 *
 * The scan is a plain O(n²) pass over unordered pairs; populations stay in
 * the low hundreds.
 */

use crate::canvas::{Canvas, Color};
use crate::particle::{Link, Particle, ENERGY_MAX};

// Pairs closer than this fraction of the threshold get an extra glow stroke
const GLOW_FRACTION: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
}

#[derive(Clone, Debug, Default)]
pub struct ConnectionGraph {
    connections: Vec<Connection>,
    threshold: f32,
}

impl ConnectionGraph {
    /// Rebuild the graph for `particles`, replacing every particle's links.
    pub fn compute(particles: &mut [Particle], threshold: f32) -> Self {
        for particle in particles.iter_mut() {
            particle.links.clear();
        }

        let mut connections = Vec::new();
        if threshold > 0.0 {
            for i in 0..particles.len() {
                for j in (i + 1)..particles.len() {
                    let distance = particles[i].position.distance(particles[j].position);
                    if distance < threshold {
                        connections.push(Connection { a: i, b: j, distance });
                    }
                }
            }
        }

        for connection in &connections {
            particles[connection.a].links.push(Link {
                neighbor: connection.b,
                distance: connection.distance,
            });
            particles[connection.b].links.push(Link {
                neighbor: connection.a,
                distance: connection.distance,
            });
        }

        Self {
            connections,
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    pub fn distance(&self, a: usize, b: usize) -> Option<f32> {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        self.connections
            .iter()
            .find(|c| c.a == a && c.b == b)
            .map(|c| c.distance)
    }

    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.distance(a, b).is_some()
    }

    // Closer pairs draw brighter and thicker
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, particles: &[Particle]) {
        if self.threshold <= 0.0 {
            return;
        }

        for connection in &self.connections {
            let (Some(a), Some(b)) = (particles.get(connection.a), particles.get(connection.b)) else {
                continue;
            };

            let closeness = ((self.threshold - connection.distance) / self.threshold).clamp(0.0, 1.0);
            let intensity = ((a.energy + b.energy) / (2.0 * ENERGY_MAX)).clamp(0.0, 1.0);
            let alpha = closeness * intensity;
            let weight = (0.2 + 1.8 * closeness) * intensity.max(0.25);

            canvas.gradient_line(
                a.position,
                b.position,
                weight,
                Color::hsla(a.hue, 0.7, 0.5, alpha),
                Color::hsla(b.hue, 0.7, 0.5, alpha),
            );

            if connection.distance < self.threshold * GLOW_FRACTION {
                let mid_hue = (a.hue + b.hue) / 2.0;
                canvas.line(
                    a.position,
                    b.position,
                    weight * 2.0,
                    Color::hsla(mid_hue, 1.0, 0.7, alpha * 0.5),
                );
            }
        }
    }
}
