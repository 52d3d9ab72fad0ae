/*
 * Node Weave
 *
 * A generative visualization of drifting, connected particles. Three modes:
 * 1. Flocking: particles follow separation, alignment and cohesion and link
 *    up with nearby neighbors
 * 2. Reaction-Diffusion: a Gray-Scott pattern grows under a drifting overlay
 * 3. Cellular Automaton: Conway's Game of Life on a wrap-around grid
 *
 * An optional first argument names a JSON settings file.
 */

use nodeweave::app;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    nannou::app(app::model)
        .update(app::update)
        .run();
}
