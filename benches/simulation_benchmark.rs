/*
 * Simulation Benchmark
 *
 * Benchmarks for the per-frame work: the O(n^2) connection scan, a full
 * flocking tick, one grid step for each grid mode and a headless render.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use nodeweave::automaton::GridAutomaton;
use nodeweave::connections::ConnectionGraph;
use nodeweave::field::{ParticleField, TickParams};
use nodeweave::geometry::Bounds;
use nodeweave::grid::ToroidalGrid;
use nodeweave::particle::Motion;
use nodeweave::reaction_diffusion::{ReactionDiffusionField, ReactionParams};
use nodeweave::{RecordingCanvas, RenderMode, Settings, SimulationDirector, CELL_SIZE};

const WIDTH: f32 = 1280.0;
const HEIGHT: f32 = 720.0;

// Benchmark the pairwise connection scan
fn bench_connections(c: &mut Criterion) {
    let mut group = c.benchmark_group("connections");
    let bounds = Bounds::new(WIDTH, HEIGHT);

    for count in [100, 200, 400, 800].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &n| {
            let mut rng = StdRng::seed_from_u64(1);
            let mut field = ParticleField::new(n, bounds, &mut rng);

            b.iter(|| black_box(ConnectionGraph::compute(field.particles_mut(), 120.0).len()));
        });
    }

    group.finish();
}

// Benchmark a full flocking tick (forces, integration, connections)
fn bench_field_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_tick");
    let bounds = Bounds::new(WIDTH, HEIGHT);
    let settings = Settings::default();

    for count in [100, 200, 400, 800].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &n| {
            let mut rng = StdRng::seed_from_u64(2);
            let mut field = ParticleField::new(n, bounds, &mut rng);
            field.set_target_population(n);
            let mut frame = 0;

            b.iter(|| {
                let params = TickParams {
                    bounds,
                    frame,
                    motion: Motion::Flock,
                    limit: None,
                };
                field.tick(&settings, params, &mut rng);
                frame += 1;
            });
        });
    }

    group.finish();
}

// Benchmark one step of each grid mode at window resolution
fn bench_grid_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_step");
    let grid = ToroidalGrid::for_surface(Bounds::new(WIDTH, HEIGHT), CELL_SIZE);
    let mut rng = StdRng::seed_from_u64(3);

    let mut rd = ReactionDiffusionField::new(grid);
    rd.seed(&mut rng, 10, 5);
    let params = ReactionParams::default();
    group.bench_function("reaction_diffusion", |b| b.iter(|| rd.step(black_box(&params))));

    let mut automaton = GridAutomaton::new(grid);
    automaton.randomize(&mut rng, 0.4);
    group.bench_function("automaton", |b| b.iter(|| automaton.step()));

    group.finish();
}

// Benchmark rendering into a recording canvas, without a GPU
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for mode in RenderMode::ALL {
        let settings = Settings {
            mode,
            ..Settings::default()
        };
        let mut director = SimulationDirector::with_rng(settings, WIDTH, HEIGHT, StdRng::seed_from_u64(4));
        for _ in 0..10 {
            director.tick();
        }
        let mut canvas = RecordingCanvas::new(WIDTH, HEIGHT);

        group.bench_function(mode.label(), |b| {
            b.iter(|| {
                canvas.clear();
                director.render(&mut canvas);
                black_box(canvas.ops.len())
            })
        });
    }

    group.finish();
}

// Configure the benchmarks
criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_connections, bench_field_tick, bench_grid_steps, bench_render
}

criterion_main!(benches);
