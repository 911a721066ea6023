//! Repulsion contributors for the sphere simulation
//!
//! Every pair (i, j) yields a scalar push `f = step / (dampening * angle^p)`.
//! A [`ForceModel`] decides how that scalar turns into a planned move for
//! node i; [`ForceSet`] runs the shared O(n^2) pair loop, tracks the
//! smallest angle and stops at the first exact coincidence.

use std::f64::consts::PI;

use nalgebra::UnitQuaternion;

use super::coords::{angle_between, shorter_longitude, SphereCoords};
use super::engine::{Engine, ForceModelKind};
use super::params::Parameters;
use super::states::{Frame, NVec3, Node};

/// Planned move for one node, in the representation of the active model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Displacement {
    None,
    LatLong { lat: f64, long: f64 },
    Vector(NVec3),
    Rotation(Frame),
}

/// Two nodes found at the same position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub i: usize,
    pub j: usize,
}

/// One ordered pair as seen by a force model
pub struct Pair<'a> {
    pub node: &'a Node,  // node being pushed (i)
    pub other: &'a Node, // node doing the pushing (j)
    pub angle: f64,      // angular separation, > 0
    pub force: f64,      // scalar repulsion
    pub radius: f64,
}

/// Decomposition of a scalar repulsion into a per-node planned move
pub trait ForceModel {
    fn kind(&self) -> ForceModelKind;

    /// Neutral element the contributions are folded into
    fn zero(&self) -> Displacement;

    /// Add the push of `pair.other` on `pair.node` into `acc`
    fn accumulate(&self, pair: &Pair<'_>, acc: &mut Displacement);

    /// Final touch on a node's folded total
    fn finish(&self, acc: Displacement) -> Displacement {
        acc
    }
}

/// Force model selected once for the whole run
pub fn force_model(kind: ForceModelKind) -> Box<dyn ForceModel + Send + Sync> {
    match kind {
        ForceModelKind::LatLong => Box::new(LatLongRepulsion),
        ForceModelKind::Cartesian => Box::new(CartesianRepulsion),
        ForceModelKind::Rotational => Box::new(RotationalRepulsion),
    }
}

/// The active force model with the constants of the force law
pub struct ForceSet {
    model: Box<dyn ForceModel + Send + Sync>,
    dampening: f64,
    exponent: i32,
    step_size: f64,
    radius: f64,
}

impl ForceSet {
    pub fn new(engine: &Engine, params: &Parameters) -> Self {
        Self {
            model: force_model(engine.force_model),
            dampening: params.dampening,
            exponent: engine.force_exponent as i32,
            step_size: engine.step_size,
            radius: params.radius,
        }
    }

    pub fn kind(&self) -> ForceModelKind {
        self.model.kind()
    }

    /// Scalar repulsion at separation `angle`
    pub fn magnitude(&self, angle: f64) -> f64 {
        self.step_size / (self.dampening * angle.powi(self.exponent))
    }

    /// Plan a move for every node from a frozen snapshot of `nodes`
    /// - `out[i]` is overwritten with node i's planned move
    /// - returns the smallest pairwise angle, or the first coincident pair
    pub fn compute(&self, nodes: &[Node], out: &mut [Displacement]) -> Result<f64, Collision> {
        let mut min_angle = 2.0 * PI;

        for (i, node) in nodes.iter().enumerate() {
            let mut acc = self.model.zero();
            for (j, other) in nodes.iter().enumerate() {
                if i == j {
                    continue;
                }
                // theta_ij from the chord, exactly 0 only for coincident nodes
                let angle = angle_between(&node.x, &other.x, self.radius);
                if angle == 0.0 {
                    return Err(Collision { i, j });
                }
                min_angle = min_angle.min(angle);

                let pair = Pair {
                    node,
                    other,
                    angle,
                    force: self.magnitude(angle),
                    radius: self.radius,
                };
                // acc_i += push of j on i, in the model's representation
                self.model.accumulate(&pair, &mut acc);
            }
            // clamp or convert the folded total once per node
            out[i] = self.model.finish(acc);
        }

        Ok(min_angle)
    }
}

// =========================================================================================
// Latitude / longitude decomposition
// =========================================================================================

/// Splits the push between latitude and longitude in proportion to the
/// two nodes' coordinate differences
pub struct LatLongRepulsion;

/// Moving apart in latitude can bring two nodes closer when they sit on
/// opposite sides of a pole. Flip the latitude push when the longitudes are
/// more than a quarter turn apart and this node is nearer a pole.
pub fn hemisphere_adjustment(long_diff: f64, self_lat: f64, other_lat: f64) -> f64 {
    let equator = PI / 2.0;
    if long_diff > PI / 2.0 && (self_lat - equator).abs() > (other_lat - equator).abs() {
        -1.0
    } else {
        1.0
    }
}

impl ForceModel for LatLongRepulsion {
    fn kind(&self) -> ForceModelKind {
        ForceModelKind::LatLong
    }

    fn zero(&self) -> Displacement {
        Displacement::LatLong { lat: 0.0, long: 0.0 }
    }

    fn accumulate(&self, pair: &Pair<'_>, acc: &mut Displacement) {
        let Displacement::LatLong { lat, long } = acc else {
            return;
        };
        let si = SphereCoords::from_cartesian(&pair.node.x);
        let sj = SphereCoords::from_cartesian(&pair.other.x);

        let lat_diff = (sj.latitude - si.latitude).abs();
        let raw_long_diff = (sj.longitude - si.longitude).abs();

        // hemisphere check sees the unwrapped difference
        let lat_hemi = hemisphere_adjustment(raw_long_diff, si.latitude, sj.latitude);
        let long_hemi = if raw_long_diff > PI { -1.0 } else { 1.0 };
        let long_diff = shorter_longitude(raw_long_diff);

        let total = lat_diff + long_diff;
        if total == 0.0 {
            return;
        }

        // move away from j on each coordinate
        let lat_sign = if si.latitude > sj.latitude { 1.0 } else { -1.0 };
        let long_sign = if si.longitude > sj.longitude { 1.0 } else { -1.0 };

        // f split by each coordinate's share of |dlat| + |dlong|
        *lat += pair.force * lat_diff / total * lat_hemi * lat_sign;
        *long += pair.force * long_diff / total * long_hemi * long_sign;
    }

    // never plan a move past the far side of the sphere
    fn finish(&self, acc: Displacement) -> Displacement {
        match acc {
            Displacement::LatLong { lat, long } => Displacement::LatLong {
                lat: lat.clamp(-PI, PI),
                long: long.clamp(-PI, PI),
            },
            other => other,
        }
    }
}

// =========================================================================================
// Cartesian decomposition
// =========================================================================================

/// Splits the push across x, y, z in proportion to each axis's share of
/// the summed absolute differences
pub struct CartesianRepulsion;

impl ForceModel for CartesianRepulsion {
    fn kind(&self) -> ForceModelKind {
        ForceModelKind::Cartesian
    }

    fn zero(&self) -> Displacement {
        Displacement::Vector(NVec3::zeros())
    }

    fn accumulate(&self, pair: &Pair<'_>, acc: &mut Displacement) {
        let Displacement::Vector(v) = acc else {
            return;
        };
        // points away from the other node on every axis
        let d = pair.node.x - pair.other.x;
        let l1 = d.x.abs() + d.y.abs() + d.z.abs();
        if l1 == 0.0 {
            return;
        }
        // v += f * r * d / |d|_1, scaled by r so the angular step does not
        // depend on the sphere size
        *v += d * (pair.force * pair.radius / l1);
    }
}

// =========================================================================================
// Rotational decomposition
// =========================================================================================

/// Treats each node as a frame and turns it about the axis perpendicular
/// to both headings, away from every other node
///
/// Pushes are summed as rotation vectors (axis * angle) and only turned
/// into a quaternion once per node, so a large push can never wrap past a
/// half turn and flip into a pull.
pub struct RotationalRepulsion;

/// Largest planned turn; any step the integrator allows is smaller
pub const MAX_TURN: f64 = PI / 2.0;

impl ForceModel for RotationalRepulsion {
    fn kind(&self) -> ForceModelKind {
        ForceModelKind::Rotational
    }

    fn zero(&self) -> Displacement {
        Displacement::Vector(NVec3::zeros())
    }

    fn accumulate(&self, pair: &Pair<'_>, acc: &mut Displacement) {
        let Displacement::Vector(push) = acc else {
            return;
        };
        // j x i turns i along the great circle away from j;
        // antipodal headings have no such circle and contribute nothing
        let from = pair.other.heading();
        let to = pair.node.heading();
        let Some(axis) = from.cross(&to).try_normalize(1e-12) else {
            return;
        };
        // push += axis * f
        *push += axis * pair.force;
    }

    // one quaternion from the summed rotation vector, kept well short of a
    // half turn where the axis would become ambiguous
    fn finish(&self, acc: Displacement) -> Displacement {
        match acc {
            Displacement::Vector(push) => {
                let angle = push.norm();
                let push = if angle > MAX_TURN { push * (MAX_TURN / angle) } else { push };
                Displacement::Rotation(UnitQuaternion::from_scaled_axis(push))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(kind: ForceModelKind) -> ForceSet {
        let mut params = Parameters::new(2, 1.0, 1.0);
        params.dampening = 1.0;
        ForceSet::new(&Engine::new(kind), &params)
    }

    fn equator_pair() -> Vec<Node> {
        vec![
            Node::new(0, SphereCoords::new(1.0, PI / 2.0, 0.0).to_cartesian()),
            Node::new(1, SphereCoords::new(1.0, PI / 2.0, PI / 2.0).to_cartesian()),
        ]
    }

    #[test]
    fn magnitude_follows_inverse_power() {
        let f = set(ForceModelKind::LatLong);
        let ratio = f.magnitude(0.5) / f.magnitude(1.0);
        assert!((ratio - 8.0).abs() < 1e-12);
        let g = set(ForceModelKind::Cartesian);
        assert!((g.magnitude(0.5) / g.magnitude(1.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn lat_long_pushes_apart_in_longitude() {
        let nodes = equator_pair();
        let mut out = vec![Displacement::None; 2];
        let min = set(ForceModelKind::LatLong).compute(&nodes, &mut out).unwrap();
        assert!((min - PI / 2.0).abs() < 1e-12);
        match (out[0], out[1]) {
            (Displacement::LatLong { lat: a_lat, long: a_long }, Displacement::LatLong { lat: b_lat, long: b_long }) => {
                assert!(a_lat.abs() < 1e-12);
                assert!(b_lat.abs() < 1e-12);
                assert!(a_long < 0.0);
                assert!(b_long > 0.0);
            }
            other => panic!("unexpected displacements {other:?}"),
        }
    }

    #[test]
    fn lat_long_totals_are_clamped() {
        let nodes = vec![
            Node::new(0, SphereCoords::new(1.0, PI / 2.0, 0.0).to_cartesian()),
            Node::new(1, SphereCoords::new(1.0, PI / 2.0, 1e-3).to_cartesian()),
        ];
        let mut out = vec![Displacement::None; 2];
        set(ForceModelKind::LatLong).compute(&nodes, &mut out).unwrap();
        let Displacement::LatLong { long, .. } = out[0] else {
            panic!("wrong representation");
        };
        assert_eq!(long, -PI);
    }

    #[test]
    fn hemisphere_flip_condition() {
        // near the pole, across it
        assert_eq!(hemisphere_adjustment(2.0, 0.1, 0.5), -1.0);
        // other node nearer the pole
        assert_eq!(hemisphere_adjustment(2.0, 0.5, 0.1), 1.0);
        // same side
        assert_eq!(hemisphere_adjustment(1.0, 0.1, 0.5), 1.0);
    }

    #[test]
    fn cartesian_points_away() {
        let nodes = equator_pair();
        let mut out = vec![Displacement::None; 2];
        set(ForceModelKind::Cartesian).compute(&nodes, &mut out).unwrap();
        let Displacement::Vector(v) = out[0] else {
            panic!("wrong representation");
        };
        let away = nodes[0].x - nodes[1].x;
        assert!(v.dot(&away) > 0.0);
        // |d|_1 split: f * d / |d|_1 with f = 1 / (pi/2)^2
        let f = 1.0 / (PI / 2.0).powi(2);
        assert!((v.x - f * 0.5).abs() < 1e-12);
        assert!((v.z + f * 0.5).abs() < 1e-12);
    }

    #[test]
    fn rotation_turns_away_by_force() {
        let nodes = equator_pair();
        let mut out = vec![Displacement::None; 2];
        let forces = set(ForceModelKind::Rotational);
        forces.compute(&nodes, &mut out).unwrap();
        let Displacement::Rotation(q) = out[0] else {
            panic!("wrong representation");
        };
        let expected = forces.magnitude(PI / 2.0);
        assert!((q.angle() - expected).abs() < 1e-9);
        let moved = q * nodes[0].heading();
        let before = angle_between(&nodes[0].heading(), &nodes[1].heading(), 1.0);
        let after = angle_between(&moved, &nodes[1].heading(), 1.0);
        assert!(after > before);
    }

    #[test]
    fn close_pair_still_turns_away() {
        // f = 1 / 0.5^2 = 4 rad, more than a half turn
        let nodes = vec![
            Node::new(0, SphereCoords::new(1.0, PI / 2.0, 0.0).to_cartesian()),
            Node::new(1, SphereCoords::new(1.0, PI / 2.0, 0.5).to_cartesian()),
        ];
        let mut out = vec![Displacement::None; 2];
        let forces = set(ForceModelKind::Rotational);
        assert!(forces.magnitude(0.5) > PI);
        forces.compute(&nodes, &mut out).unwrap();

        for (i, j) in [(0, 1), (1, 0)] {
            let Displacement::Rotation(q) = out[i] else {
                panic!("wrong representation");
            };
            assert!((q.angle() - MAX_TURN).abs() < 1e-12);
            // a small fraction of the nudge must already open the gap
            let moved = q.powf(0.01) * nodes[i].heading();
            let after = angle_between(&moved, &nodes[j].heading(), 1.0);
            assert!(after > 0.5, "node{i} turned towards node{j}: {after}");
        }
    }

    #[test]
    fn coincident_nodes_report_pair() {
        let p = NVec3::new(0.0, 0.0, 1.0);
        let nodes = vec![
            Node::new(0, NVec3::new(1.0, 0.0, 0.0)),
            Node::new(1, p),
            Node::new(2, p),
        ];
        let mut out = vec![Displacement::None; 3];
        let err = set(ForceModelKind::Cartesian).compute(&nodes, &mut out).unwrap_err();
        assert_eq!(err, Collision { i: 1, j: 2 });
    }
}
