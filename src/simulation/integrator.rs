//! Applies planned displacements to the nodes
//!
//! No node may travel further than `minAngleDetected / divisor` in one
//! iteration, so two nodes heading straight at each other always keep part
//! of their gap. Every moved node lands back on the sphere.

use std::f64::consts::PI;

use nalgebra::UnitQuaternion;

use super::coords::angle_between;
use super::engine::Engine;
use super::forces::Displacement;
use super::params::Parameters;
use super::states::{forward, Frame, NVec3, Node, SimulationState};

/// Summary of one integrator pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveReport {
    pub max_step: f64,      // largest move any node was allowed
    pub largest_move: f64,  // largest realized move
    pub converged: bool,    // no node moved more than the still epsilon
}

/// Move every node by its pending displacement
/// - clamps each realized move to `state.min_angle_detected / engine.max_move_divisor`
/// - sets `state.converged` (always false when the still check is disabled)
pub fn move_nodes(state: &mut SimulationState, params: &Parameters, engine: &Engine) -> MoveReport {
    // max_step = theta_min / divisor, from the same snapshot the moves were planned on
    let max_step = state.min_angle_detected / engine.max_move_divisor;
    let radius = params.radius;

    let mut largest_move = 0.0_f64;
    let mut any_moving = false;

    for (node, planned) in state.nodes.iter_mut().zip(state.pending.iter()) {
        // x_n+1 = clamp(apply(planned, x_n), max_step), back on the sphere
        let realized = move_node(node, planned, max_step, radius);
        largest_move = largest_move.max(realized);

        // still when every realized move is at most eps
        match params.converge_angle_moved {
            Some(eps) if realized > eps => any_moving = true,
            Some(_) => {}
            None => any_moving = true,
        }
    }

    state.converged = !any_moving;

    MoveReport {
        max_step,
        largest_move,
        converged: state.converged,
    }
}

/// Move one node, returning the realized angular displacement
///
/// A move longer than `max_step` is first shortened in the model's own
/// representation, which fixes its direction, then placed exactly
/// `max_step` along the great circle through the shortened endpoint.
pub fn move_node(node: &mut Node, planned: &Displacement, max_step: f64, radius: f64) -> f64 {
    let current = node.x;

    // full move: x' = apply(planned, x)
    let (full_x, full_frame) = planned_pose(node, planned, 1.0, radius);
    let planned_angle = angle_between(&current, &full_x, radius);

    let (x, frame) = if planned_angle > max_step {
        // direction from a scaled move: x_s = apply(planned * max_step / theta, x)
        let (scaled_x, scaled_frame) = planned_pose(node, planned, max_step / planned_angle, radius);
        if angle_between(&current, &scaled_x, radius) == 0.0 {
            (current, node.frame)
        } else {
            // x_n+1 = max_step along the great circle x -> x_s
            let target = toward(&current, &scaled_x, max_step, radius);
            (target, carry_frame(&scaled_frame, &scaled_x, &target))
        }
    } else {
        (full_x, full_frame)
    };

    let realized = angle_between(&current, &x, radius);
    node.x = x;
    node.frame = frame;
    realized
}

/// Position and frame after applying `scale` of a planned displacement
fn planned_pose(node: &Node, planned: &Displacement, scale: f64, radius: f64) -> (NVec3, Frame) {
    match planned {
        Displacement::None => (node.x, node.frame),
        Displacement::LatLong { lat, long } => {
            let mut s = node.spherical();
            s.radius = radius;
            s.latitude += lat * scale;
            s.longitude += long * scale;
            let x = s.to_cartesian();
            (x, carry_frame(&node.frame, &node.x, &x))
        }
        Displacement::Vector(v) => {
            let moved = node.x + v * scale;
            let len = moved.norm();
            if len == 0.0 {
                return (node.x, node.frame);
            }
            let x = moved * (radius / len);
            (x, carry_frame(&node.frame, &node.x, &x))
        }
        Displacement::Rotation(q) => {
            let mut frame = q.powf(scale) * node.frame;
            frame.renormalize();
            (frame * forward() * radius, frame)
        }
    }
}

/// Point `angle` radians from `from` along the great circle towards `to`
///
/// `angle` may be longer than the arc between the two points.
fn toward(from: &NVec3, to: &NVec3, angle: f64, radius: f64) -> NVec3 {
    let a = from.normalize();
    let b = to.normalize();
    // rotate a about a x b; antipodal points pick any great circle
    let axis = nalgebra::Unit::try_new(a.cross(&b), 1e-15).unwrap_or_else(|| perpendicular(&a));
    let mut x = UnitQuaternion::from_axis_angle(&axis, angle) * a;
    x *= radius / x.norm();
    x
}

/// Keep a frame attached to a node that moved from `from` to `to`
fn carry_frame(frame: &Frame, from: &NVec3, to: &NVec3) -> Frame {
    let swing = UnitQuaternion::rotation_between(from, to)
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&perpendicular(from), PI));
    let mut carried = swing * *frame;
    carried.renormalize();
    carried
}

fn perpendicular(v: &NVec3) -> nalgebra::Unit<NVec3> {
    let helper = if v.x.abs() < 0.9 { NVec3::x() } else { NVec3::y() };
    nalgebra::Unit::new_normalize(v.cross(&helper))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::coords::SphereCoords;
    use crate::simulation::engine::ForceModelKind;

    fn node_at(lat: f64, long: f64) -> Node {
        Node::new(0, SphereCoords::new(1.0, lat, long).to_cartesian())
    }

    #[test]
    fn small_move_is_applied_in_full() {
        let mut node = node_at(PI / 2.0, 0.0);
        let realized = move_node(&mut node, &Displacement::LatLong { lat: 0.0, long: 0.01 }, 0.1, 1.0);
        assert!((realized - 0.01).abs() < 1e-9);
        assert!((node.x.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn large_move_lands_exactly_on_max_step() {
        for planned in [
            Displacement::LatLong { lat: 0.8, long: 2.5 },
            Displacement::Vector(NVec3::new(0.0, 3.0, 1.0)),
            Displacement::Rotation(UnitQuaternion::from_axis_angle(&NVec3::y_axis(), 1.5)),
        ] {
            let mut node = node_at(0.3, 1.0);
            let realized = move_node(&mut node, &planned, 0.05, 1.0);
            assert!((realized - 0.05).abs() < 1e-9, "{planned:?} moved {realized}");
            assert!((node.x.norm() - 1.0).abs() < 1e-12);
            assert!((node.heading() - node.x).norm() < 1e-9);
        }
    }

    #[test]
    fn clamped_move_keeps_its_direction() {
        // pure longitude push on the equator stays on the equator
        let mut node = node_at(PI / 2.0, 0.0);
        let realized = move_node(&mut node, &Displacement::LatLong { lat: 0.0, long: 2.0 }, 0.1, 1.0);
        assert!((realized - 0.1).abs() < 1e-9);
        let s = node.spherical();
        assert!((s.latitude - PI / 2.0).abs() < 1e-9);
        assert!((s.longitude - 0.1).abs() < 1e-9);
    }

    #[test]
    fn move_across_the_pole_respects_bound() {
        // half a turn of longitude near the pole curves far off a great circle
        let mut node = node_at(0.05, 0.0);
        let realized = move_node(&mut node, &Displacement::LatLong { lat: 0.0, long: PI }, 0.04, 1.0);
        assert!((realized - 0.04).abs() < 1e-9);
    }

    #[test]
    fn frame_tracks_position() {
        let mut node = node_at(1.2, -0.4);
        move_node(&mut node, &Displacement::Vector(NVec3::new(0.01, 0.02, -0.01)), 0.5, 1.0);
        assert!((node.heading() - node.x).norm() < 1e-9);
    }

    #[test]
    fn still_check_disabled_never_converges() {
        let mut state = SimulationState::new(vec![node_at(1.0, 0.0), node_at(2.0, 1.0)]);
        state.min_angle_detected = 1.0;
        let mut params = Parameters::new(2, 1.0, 3.0);
        let engine = Engine::new(ForceModelKind::LatLong);
        let report = move_nodes(&mut state, &params, &engine);
        assert!(!report.converged);

        params.converge_angle_moved = Some(1e-3);
        let report = move_nodes(&mut state, &params, &engine);
        assert!(report.converged);
        assert_eq!(report.largest_move, 0.0);
        assert!((report.max_step - 1.0 / 3.0).abs() < 1e-15);
    }
}
