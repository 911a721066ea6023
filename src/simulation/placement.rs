//! Initial node placement
//!
//! - `Placement::Random`: rejection sampling with a uniform density on the
//!   sphere, exactly `node_count` nodes
//! - `Placement::Grid`: deterministic latitude/longitude scan, best effort,
//!   the accepted count depends on the grid and the separation

use std::f64::consts::{PI, TAU};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use super::coords::{angle_between, SphereCoords};
use super::error::{SimError, SimResult};
use super::params::Parameters;
use super::states::{NVec3, Node};

pub const DEFAULT_MAX_ATTEMPTS: usize = 100_000;

#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    Random {
        collision_epsilon: f64, // radians, candidates must be strictly further apart
        max_attempts: usize,    // per node
    },
    Grid {
        lat_step_degrees: f64,
        long_step_degrees: f64,
        min_separation_degrees: f64,
    },
}

impl Placement {
    pub fn validate(&self) -> SimResult<()> {
        match *self {
            Placement::Random { collision_epsilon, .. } => {
                if !(collision_epsilon.is_finite() && collision_epsilon >= 0.0) {
                    return Err(SimError::InvalidCollisionEpsilon(collision_epsilon));
                }
            }
            Placement::Grid {
                lat_step_degrees,
                long_step_degrees,
                min_separation_degrees,
            } => {
                for (name, value) in [
                    ("lat_step_degrees", lat_step_degrees),
                    ("long_step_degrees", long_step_degrees),
                ] {
                    if !(value.is_finite() && value > 0.0) {
                        return Err(SimError::InvalidGridStep { name, value });
                    }
                }
                if !(min_separation_degrees.is_finite() && min_separation_degrees >= 0.0) {
                    return Err(SimError::InvalidGridStep {
                        name: "min_separation_degrees",
                        value: min_separation_degrees,
                    });
                }
            }
        }
        Ok(())
    }

    /// Place nodes for `params`
    ///
    /// Random placement draws from `params.seed`, or from a fresh seed that
    /// gets logged so the run can be repeated.
    pub fn place(&self, params: &Parameters) -> SimResult<Vec<Node>> {
        params.validate()?;
        self.validate()?;

        match *self {
            Placement::Random {
                collision_epsilon,
                max_attempts,
            } => {
                let seed = params.seed.unwrap_or_else(|| rand::thread_rng().gen());
                debug!(seed, "seeding rejection sampler");
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let nodes = place_random(&mut rng, params.node_count, params.radius, collision_epsilon, max_attempts)?;
                info!(nodes = nodes.len(), "nodes have been randomly distributed on the sphere");
                Ok(nodes)
            }
            Placement::Grid {
                lat_step_degrees,
                long_step_degrees,
                min_separation_degrees,
            } => {
                let nodes = place_grid(params.radius, lat_step_degrees, long_step_degrees, min_separation_degrees)?;
                if nodes.len() != params.node_count {
                    warn!(
                        requested = params.node_count,
                        placed = nodes.len(),
                        "grid scan placed a different number of nodes than requested"
                    );
                } else {
                    info!(nodes = nodes.len(), "nodes have been placed on the grid");
                }
                Ok(nodes)
            }
        }
    }
}

/// Uniformly distributed point on the sphere
///
/// `acos` of a uniform value, not a uniform latitude, which would bunch
/// points at the poles.
pub fn random_point<R: Rng>(rng: &mut R, radius: f64) -> NVec3 {
    let latitude = rng.gen_range(-1.0_f64..1.0).acos();
    let longitude = rng.gen_range(0.0..TAU);
    SphereCoords::new(radius, latitude, longitude).to_cartesian()
}

/// Rejection sampling: resample until a candidate clears every placed node
pub fn place_random<R: Rng>(
    rng: &mut R,
    count: usize,
    radius: f64,
    collision_epsilon: f64,
    max_attempts: usize,
) -> SimResult<Vec<Node>> {
    let mut nodes: Vec<Node> = Vec::with_capacity(count);

    for id in 0..count {
        let mut attempts = 0;
        let x = loop {
            if attempts == max_attempts {
                return Err(SimError::PlacementExhausted {
                    placed: nodes.len(),
                    attempts,
                });
            }
            attempts += 1;

            let candidate = random_point(rng, radius);
            let clear = nodes
                .iter()
                .all(|n| angle_between(&candidate, &n.x, radius) > collision_epsilon);
            if clear {
                break candidate;
            }
        };
        nodes.push(Node::new(id, x));
    }

    Ok(nodes)
}

/// Grid scan over latitude `0..=180` and longitude `0..360` degrees
///
/// Fails when fewer than two nodes survive the separation filter.
pub fn place_grid(
    radius: f64,
    lat_step_degrees: f64,
    long_step_degrees: f64,
    min_separation_degrees: f64,
) -> SimResult<Vec<Node>> {
    let min_separation = min_separation_degrees.to_radians();
    let lat_step = lat_step_degrees.to_radians();
    let long_step = long_step_degrees.to_radians();

    // tolerate rounding in the step so 90 degrees gives exactly 2 latitude bands
    let lat_count = (PI / lat_step + 1e-9).floor() as usize;
    let long_count = (TAU / long_step - 1e-9).ceil() as usize;

    let mut nodes: Vec<Node> = Vec::new();
    for a in 0..=lat_count {
        let latitude = a as f64 * lat_step;
        for b in 0..long_count {
            let longitude = b as f64 * long_step;
            if longitude >= TAU {
                break;
            }
            let candidate = SphereCoords::new(radius, latitude, longitude).to_cartesian();
            let clear = nodes
                .iter()
                .all(|n| angle_between(&candidate, &n.x, radius) > min_separation);
            if clear {
                nodes.push(Node::new(nodes.len(), candidate));
            }
        }
    }

    if nodes.len() < 2 {
        return Err(SimError::GridTooSparse {
            accepted: nodes.len(),
            min_separation_degrees,
        });
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_points_lie_on_sphere() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let p = random_point(&mut rng, 2.5);
            assert!((p.norm() - 2.5).abs() < 1e-12);
        }
    }

    #[test]
    fn random_density_is_even_across_hemispheres() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let n = 20_000;
        let upper = (0..n).filter(|_| random_point(&mut rng, 1.0).y > 0.0).count();
        // a uniform latitude would still split evenly, so also check the polar caps
        assert!((upper as f64 / n as f64 - 0.5).abs() < 0.02);
        let cap = (0..n)
            .filter(|_| random_point(&mut rng, 1.0).y < -0.9)
            .count();
        // cap area fraction is (1 - 0.9) / 2 = 5%
        assert!((cap as f64 / n as f64 - 0.05).abs() < 0.01);
    }

    #[test]
    fn exhausted_sampler_is_an_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // no two points are more than half a turn apart
        let err = place_random(&mut rng, 3, 1.0, PI, 500).unwrap_err();
        assert_eq!(err, SimError::PlacementExhausted { placed: 1, attempts: 500 });
    }

    #[test]
    fn grid_first_node_is_the_pole() {
        let nodes = place_grid(1.0, 90.0, 90.0, 45.0).unwrap();
        assert!((nodes[0].x - NVec3::new(0.0, -1.0, 0.0)).norm() < 1e-12);
        // pole, four equator points, opposite pole
        assert_eq!(nodes.len(), 6);
    }
}
