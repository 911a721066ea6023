use std::time::Instant;

use crate::simulation::driver::Simulation;
use crate::simulation::engine::{Engine, ForceModelKind};
use crate::simulation::forces::{Collision, Displacement, ForceSet};
use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec3, Node};

const KINDS: [ForceModelKind; 3] = [
    ForceModelKind::LatLong,
    ForceModelKind::Cartesian,
    ForceModelKind::Rotational,
];

/// Helper to build `n` nodes on the unit sphere
/// deterministic positions, no rand needed
fn make_nodes(n: usize) -> Vec<Node> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec3::new(
                (i_f * 0.37).sin(),
                (i_f * 0.13).cos(),
                (i_f * 0.07).sin() + 0.01,
            );
            Node::new(i, x.normalize())
        })
        .collect()
}

fn make_params(n: usize) -> Parameters {
    let mut params = Parameters::new(n, 1.0, std::f64::consts::PI);
    params.dampening = n as f64 * 10.0;
    params
}

/// Seconds for one warm force evaluation
/// A coincident pair ends the pass early, so it is reported instead of timed
fn time_compute(forces: &ForceSet, nodes: &[Node], out: &mut [Displacement]) -> Result<f64, Collision> {
    // Warm up
    forces.compute(nodes, out)?;

    let t0 = Instant::now();
    forces.compute(nodes, out)?;
    Ok(t0.elapsed().as_secs_f64())
}

/// Time one force evaluation per decomposition
pub fn bench_forces() {
    let ns = [100, 200, 400, 800, 1600];

    for n in ns {
        let nodes = make_nodes(n);
        let params = make_params(n);
        let mut out = vec![Displacement::None; n];

        let mut line = format!("N = {n:5}");
        for kind in KINDS {
            let forces = ForceSet::new(&Engine::new(kind), &params);

            match time_compute(&forces, &nodes, &mut out) {
                Ok(dt) => line.push_str(&format!(", {:?} = {:8.6} s", kind, dt)),
                Err(c) => line.push_str(&format!(", {:?} = node{} collided with node{}", kind, c.i, c.j)),
            }
        }
        println!("{line}");
    }
}

/// Time full driver steps per decomposition
pub fn bench_steps() {
    let ns = [50, 100, 200, 400];
    let steps = 5; // number of steps per model

    for n in ns {
        let mut line = format!("N = {n:5}");
        for kind in KINDS {
            let Ok(mut sim) = Simulation::new(Engine::new(kind), make_params(n), make_nodes(n)) else {
                continue;
            };

            let t0 = Instant::now();
            for _ in 0..steps {
                sim.step(&mut ());
            }
            let per_step = t0.elapsed().as_secs_f64() / steps as f64;

            line.push_str(&format!(", {:?} step = {:8.6} s", kind, per_step));
        }
        println!("{line}");
    }
}
