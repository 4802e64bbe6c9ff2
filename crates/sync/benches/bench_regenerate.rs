use std::hint::black_box;
use std::time::{Duration, Instant};

use mazescape_kernel::{BacktrackerGenerator, MazeGenerator};
use mazescape_scene::SceneGraph;
use mazescape_sync::{BlockPose, MazeConfig, SceneSynchronizer};
use mazescape_tween::{AnimationDriver, TweenDriver};

const FRAME: Duration = Duration::from_millis(16);

fn bench_generate(side: usize, iterations: usize) {
    let mut generator = BacktrackerGenerator::with_seed(7);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(generator.generate(black_box(side)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  generate (side {side}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_regenerate(side: usize, iterations: usize) {
    let mut sync = SceneSynchronizer::new(BacktrackerGenerator::with_seed(7), MazeConfig::default());
    let mut driver = TweenDriver::<BlockPose>::new();
    let mut scene = SceneGraph::new();

    let start = Instant::now();
    for _ in 0..iterations {
        let report = sync.regenerate(black_box(side), &mut driver, &mut scene);
        let _ = black_box(report);
        // Settle so the scene does not grow without bound.
        while driver.active_count() > 0 {
            let events = driver.advance(Duration::from_secs(10));
            sync.apply_events(events, &mut scene);
        }
        scene.drain_events();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  regenerate+settle (side {side}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_frames(side: usize, frames: usize) {
    let mut sync = SceneSynchronizer::new(BacktrackerGenerator::with_seed(7), MazeConfig::default());
    let mut driver = TweenDriver::<BlockPose>::new();
    let mut scene = SceneGraph::new();
    let _ = sync.regenerate(side, &mut driver, &mut scene);
    let _ = sync.regenerate(side, &mut driver, &mut scene);
    let live = driver.active_count();

    let start = Instant::now();
    for _ in 0..frames {
        let events = driver.advance(black_box(FRAME));
        black_box(sync.apply_events(events, &mut scene));
    }
    let elapsed = start.elapsed();
    let per_frame = elapsed / frames as u32;
    println!(
        "  frame advance (side {side}, {live} tweens, {frames} frames): {per_frame:?}/frame, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Maze Regeneration Benchmarks ===\n");

    println!("Generation:");
    bench_generate(21, 1000);
    bench_generate(51, 100);
    bench_generate(101, 10);

    println!("\nRegenerate and settle:");
    bench_regenerate(21, 200);
    bench_regenerate(51, 20);
    bench_regenerate(101, 5);

    println!("\nFrame advance during transition:");
    bench_frames(21, 100);
    bench_frames(51, 100);

    println!("\n=== Done ===");
}
