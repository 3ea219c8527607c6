use crate::{
    problem::{
        job::{DEPOT, NodeIdx},
        vehicle::VehicleIdx,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        arc_cost::ArcCost,
        dimensions::{RouteSummary, summarize_route},
    },
};

use super::route_id::RouteIdx;

/// Replaces `nodes[start..end]` of a route with `nodes`.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteChange {
    pub route_id: RouteIdx,
    pub start: usize,
    pub end: usize,
    pub nodes: Vec<NodeIdx>,
}

/// Jobs visited by one vehicle, in order. The depot at both ends is implicit.
#[derive(Debug, Clone)]
pub struct Route {
    vehicle_id: VehicleIdx,
    nodes: Vec<NodeIdx>,
    summary: RouteSummary,
    version: usize,
}

impl Route {
    pub(crate) fn empty(
        problem: &VehicleRoutingProblem,
        vehicle_id: VehicleIdx,
        version: usize,
    ) -> Self {
        let summary = summarize_route(
            problem,
            problem.vehicle(vehicle_id),
            std::iter::empty(),
            &ArcCost::new(problem),
        );

        Self {
            vehicle_id,
            nodes: Vec::new(),
            summary,
            version,
        }
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        self.vehicle_id
    }

    pub fn nodes(&self) -> &[NodeIdx] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, position: usize) -> NodeIdx {
        self.nodes[position]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dimension values under the true arc cost, refreshed on every change.
    pub fn summary(&self) -> &RouteSummary {
        &self.summary
    }

    pub fn transport_cost(&self) -> f64 {
        self.summary.arc_cost
    }

    /// Unique across all routes of a solution and bumped on every change.
    pub fn version(&self) -> usize {
        self.version
    }

    pub fn contains(&self, node: NodeIdx) -> bool {
        self.nodes.contains(&node)
    }

    /// Node visited before `position`, the depot for the first job.
    #[inline]
    pub fn previous_node(&self, position: usize) -> NodeIdx {
        if position == 0 {
            DEPOT
        } else {
            self.nodes[position - 1]
        }
    }

    /// Node visited after `position`, the depot after the last job.
    #[inline]
    pub fn next_node(&self, position: usize) -> NodeIdx {
        self.node_or_end(position + 1)
    }

    /// Node at `position`, the closing depot when `position == len()`.
    #[inline]
    pub fn node_or_end(&self, position: usize) -> NodeIdx {
        self.nodes.get(position).copied().unwrap_or(DEPOT)
    }

    pub fn nodes_with_change<'a>(
        &'a self,
        change: &'a RouteChange,
    ) -> impl Iterator<Item = NodeIdx> + Clone + 'a {
        self.nodes[..change.start]
            .iter()
            .chain(change.nodes.iter())
            .chain(self.nodes[change.end..].iter())
            .copied()
    }

    pub(crate) fn apply(
        &mut self,
        problem: &VehicleRoutingProblem,
        change: &RouteChange,
        version: usize,
    ) {
        self.nodes
            .splice(change.start..change.end, change.nodes.iter().copied());

        self.summary = summarize_route(
            problem,
            problem.vehicle(self.vehicle_id),
            self.nodes.iter().copied(),
            &ArcCost::new(problem),
        );
        self.version = version;
    }
}
