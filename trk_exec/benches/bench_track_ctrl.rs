//! # Tracking Control Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use comms_if::eqpt::odom::OdomMsg;
use trk_lib::{
    path::Path,
    track_ctrl::{Params, TrackCtrl},
};

fn track_ctrl_benchmark(c: &mut Criterion) {
    // ---- Build a long winding path ----

    let points: Vec<(f64, f64)> = (0..2000)
        .map(|i| {
            let s = i as f64 * 0.05;
            (s, (s * 0.3).sin() * 2.0)
        })
        .collect();
    let path = Path::from_xy(&points);

    let mut track_ctrl = TrackCtrl::new(Params::default()).unwrap();

    // Robot halfway along the path so the scan has to skip the first half
    let (x, y) = points[1000];
    track_ctrl.on_odometry(&OdomMsg {
        world_frame_id: "world".into(),
        robot_frame_id: "base_link".into(),
        position_m: [x, y, 0.0],
        orientation_q: [0.0, 0.0, 0.0, 1.0],
        linear_vel_ms: [0.4, 0.1, 0.0],
    });

    c.bench_function("track_ctrl_cycle", |b| {
        b.iter(|| track_ctrl.on_path(black_box(&path)).unwrap())
    });
}

criterion_group!(benches, track_ctrl_benchmark);
criterion_main!(benches);
