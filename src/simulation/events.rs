//! Reporting interface between the driver and its host
//!
//! The driver emits a [`SimEvent`] on every state transition worth
//! reporting. Hosts plug in an [`Observer`]; `()` ignores everything and
//! [`TracingObserver`] turns events into log lines.

use tracing::{error, info, warn};

use super::states::{Node, RejectReason};

#[derive(Debug, Clone, Copy)]
pub enum SimEvent<'a> {
    /// The smallest pairwise angle improved on every earlier iteration
    NewRecord { iteration: u64, min_angle: f64, nodes: &'a [Node] },
    SolutionFound { iteration: u64, min_angle: f64, nodes: &'a [Node] },
    Rejected { iteration: u64, min_angle: f64, reason: RejectReason },
    Collided { iteration: u64, i: usize, j: usize },
}

pub trait Observer {
    fn on_event(&mut self, event: &SimEvent<'_>);
}

impl Observer for () {
    fn on_event(&mut self, _event: &SimEvent<'_>) {}
}

/// Logs every event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_event(&mut self, event: &SimEvent<'_>) {
        match *event {
            SimEvent::NewRecord { iteration, min_angle, nodes } => {
                info!(
                    iteration,
                    min_angle,
                    degrees = min_angle.to_degrees(),
                    nodes = nodes.len(),
                    "new minimum separation record"
                );
            }
            SimEvent::SolutionFound { iteration, min_angle, nodes } => {
                info!(
                    iteration,
                    min_angle,
                    degrees = min_angle.to_degrees(),
                    "solution found: {} nodes are at least {:.4} radians apart",
                    nodes.len(),
                    min_angle
                );
            }
            SimEvent::Rejected { iteration, min_angle, reason } => {
                warn!(
                    iteration,
                    min_angle,
                    ?reason,
                    "solution rejected: nodes only reached {:.4} radians apart",
                    min_angle
                );
            }
            SimEvent::Collided { iteration, i, j } => {
                error!(iteration, i, j, "node{} collided with node{}", i, j);
            }
        }
    }
}
