//! # Drill Cycle Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use drill_lib::{
    act::sim::{SimRig, SimRigParams},
    action::MachineStatus,
    drill_ctrl::{LocalRuntime, Params, Program, UpdateSource},
};

/// Simulated time step between ticks.
const DT_S: f32 = 0.1;

fn drill_cycle_benchmark(c: &mut Criterion) {
    c.bench_function("extend_and_drill", |b| {
        b.iter(|| {
            // ---- Build a fresh rig and program ----

            let rig = SimRig::new(&SimRigParams::default());
            let mut program =
                Program::resolve(&rig, Params::default(), LocalRuntime::default()).unwrap();

            // ---- Run the action to completion ----

            program
                .main("extendAndDrill", UpdateSource::Terminal)
                .unwrap();

            while program.status() != MachineStatus::Idle {
                rig.step(DT_S);
                program.main("", UpdateSource::Update100).unwrap();
            }
        })
    });
}

criterion_group!(benches, drill_cycle_benchmark);
criterion_main!(benches);
