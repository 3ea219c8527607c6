use tracing::debug;

use crate::{
    problem::{job::DEPOT, job::NodeIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        arc_cost::{ArcCost, ArcCostEvaluator},
        solution::working_solution::WorkingSolution,
    },
};

/// Number of times each directed arc was penalized at a local optimum.
#[derive(Debug, Clone)]
pub struct ArcPenalties {
    penalties: Vec<u32>,
    num_nodes: usize,
    total: u64,
}

impl ArcPenalties {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            penalties: vec![0; num_nodes * num_nodes],
            num_nodes,
            total: 0,
        }
    }

    #[inline]
    pub fn get(&self, from: NodeIdx, to: NodeIdx) -> u32 {
        self.penalties[from.get() * self.num_nodes + to.get()]
    }

    fn increment(&mut self, from: NodeIdx, to: NodeIdx) {
        self.penalties[from.get() * self.num_nodes + to.get()] += 1;
        self.total += 1;
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Arc cost augmented with the guided local search penalties:
/// `cost + lambda * penalty`.
///
/// Penalties are directed, so the cost is asymmetric as soon as one arc is
/// penalized.
pub struct PenalizedArcCost<'a> {
    base: ArcCost<'a>,
    penalties: &'a ArcPenalties,
    lambda: f64,
    symmetric: bool,
}

impl ArcCostEvaluator for PenalizedArcCost<'_> {
    #[inline]
    fn arc_cost(&self, from: NodeIdx, to: NodeIdx) -> f64 {
        self.base.arc_cost(from, to) + self.lambda * f64::from(self.penalties.get(from, to))
    }

    fn is_symmetric(&self) -> bool {
        self.symmetric
    }
}

/// Escapes local optima by penalizing the arcs of the current solution that
/// have the highest utility, `cost / (1 + penalty)`.
pub struct GuidedLocalSearch {
    penalties: ArcPenalties,
    lambda_coefficient: f64,
    lambda: f64,
}

impl GuidedLocalSearch {
    pub fn new(problem: &VehicleRoutingProblem, lambda_coefficient: f64) -> Self {
        Self {
            penalties: ArcPenalties::new(problem.jobs().len()),
            lambda_coefficient,
            lambda: 0.0,
        }
    }

    pub fn penalties(&self) -> &ArcPenalties {
        &self.penalties
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn arc_cost<'a>(&'a self, problem: &'a VehicleRoutingProblem) -> PenalizedArcCost<'a> {
        let base = ArcCost::new(problem);
        let is_penalized = self.lambda > 0.0 && self.penalties.total() > 0;

        PenalizedArcCost {
            symmetric: base.is_symmetric() && !is_penalized,
            base,
            penalties: &self.penalties,
            lambda: self.lambda,
        }
    }

    /// Penalizes the maximum utility arcs of `solution`, which must be a local
    /// optimum under the current penalized costs. Returns `false` when there
    /// is nothing left to penalize and the search cannot be guided further.
    pub fn penalize(&mut self, solution: &WorkingSolution) -> bool {
        let problem = solution.problem();
        let base = ArcCost::new(problem);
        let arcs = solution_arcs(solution);

        if arcs.is_empty() {
            return false;
        }

        // Lambda is scaled on the first local optimum to the average arc cost.
        if self.lambda == 0.0 {
            let total_cost = arcs
                .iter()
                .map(|&(from, to)| base.arc_cost(from, to))
                .sum::<f64>();
            self.lambda = self.lambda_coefficient * total_cost / arcs.len() as f64;

            if self.lambda <= 0.0 {
                return false;
            }
        }

        let utility = |(from, to): (NodeIdx, NodeIdx)| {
            base.arc_cost(from, to) / (1.0 + f64::from(self.penalties.get(from, to)))
        };

        let max_utility = arcs
            .iter()
            .map(|&arc| utility(arc))
            .fold(0.0, f64::max);

        if max_utility <= 0.0 {
            return false;
        }

        let penalized = arcs
            .iter()
            .copied()
            .filter(|&arc| utility(arc) >= max_utility)
            .collect::<Vec<_>>();

        for &(from, to) in &penalized {
            self.penalties.increment(from, to);
        }

        debug!(
            lambda = self.lambda,
            max_utility,
            "GLS: penalized {} arcs",
            penalized.len()
        );

        true
    }
}

/// Every arc travelled by the non-empty routes, returns to the depot included.
fn solution_arcs(solution: &WorkingSolution) -> Vec<(NodeIdx, NodeIdx)> {
    let mut arcs = Vec::new();

    for route in solution.routes().iter().filter(|route| !route.is_empty()) {
        let mut previous = DEPOT;
        for &node in route.nodes() {
            arcs.push((previous, node));
            previous = node;
        }
        arcs.push((previous, DEPOT));
    }

    arcs
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::capacity::Capacity,
        solver::{
            ls::{
                r#move::LocalSearchOperator,
                two_opt::{TwoOptOperator, TwoOptParams},
            },
            solution::route_id::RouteIdx,
        },
        test_utils::{self, TestRoute},
    };

    use super::*;

    #[test]
    fn test_penalizes_longest_arc() {
        // depot -> (1,0) -> (5,0) -> depot: the return arc is the longest.
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (1.0, 0.0), (5.0, 0.0)]);
        let problem = Arc::new(test_utils::create_test_problem(
            &locations,
            1,
            Capacity::Unlimited,
        ));
        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                nodes: vec![1, 2],
            }],
        );

        let mut gls = GuidedLocalSearch::new(&problem, 0.1);
        assert!(gls.penalize(&solution));

        // 0.1 * (1 + 4 + 5) / 3 arcs
        assert!((gls.lambda() - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(gls.penalties().get(NodeIdx::new(2), DEPOT), 1);
        assert_eq!(gls.penalties().total(), 1);

        let arc_cost = gls.arc_cost(&problem);
        assert!((arc_cost.arc_cost(NodeIdx::new(2), DEPOT) - (5.0 + 1.0 / 3.0)).abs() < 1e-9);
        assert_eq!(arc_cost.arc_cost(DEPOT, NodeIdx::new(2)), 5.0);
    }

    #[test]
    fn test_utility_decreases_with_penalties() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (1.0, 0.0), (5.0, 0.0)]);
        let problem = Arc::new(test_utils::create_test_problem(
            &locations,
            1,
            Capacity::Unlimited,
        ));
        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                nodes: vec![1, 2],
            }],
        );

        let mut gls = GuidedLocalSearch::new(&problem, 0.1);
        gls.penalize(&solution);
        // (2 -> depot) now has utility 5 / 2, below (1 -> 2) with 4.
        gls.penalize(&solution);

        assert_eq!(gls.penalties().get(NodeIdx::new(2), DEPOT), 1);
        assert_eq!(gls.penalties().get(NodeIdx::new(1), NodeIdx::new(2)), 1);
    }

    #[test]
    fn test_empty_solution_cannot_be_guided() {
        let locations = test_utils::create_location_grid(2, 2);
        let problem = Arc::new(test_utils::create_test_problem(
            &locations,
            2,
            Capacity::Unlimited,
        ));
        let solution = WorkingSolution::new(Arc::clone(&problem));

        let mut gls = GuidedLocalSearch::new(&problem, 0.1);
        assert!(!gls.penalize(&solution));
    }

    #[test]
    fn test_open_path_return_arcs_are_not_penalized() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (1.0, 0.0), (5.0, 0.0)]);
        let mut builder = test_utils::create_test_problem_builder(&locations, 1);
        builder.set_open_path(true);
        let problem = Arc::new(builder.build().unwrap());
        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                nodes: vec![1, 2],
            }],
        );

        let mut gls = GuidedLocalSearch::new(&problem, 0.1);
        assert!(gls.penalize(&solution));

        assert_eq!(gls.penalties().get(NodeIdx::new(2), DEPOT), 0);
        assert_eq!(gls.penalties().get(NodeIdx::new(1), NodeIdx::new(2)), 1);
    }

    #[test]
    fn test_penalized_reversal_is_priced_exactly() {
        let locations = test_utils::create_location_grid(1, 5);
        let problem = Arc::new(test_utils::create_test_problem(
            &locations,
            1,
            Capacity::Unlimited,
        ));
        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                nodes: vec![1, 2, 3, 4],
            }],
        );

        let mut gls = GuidedLocalSearch::new(&problem, 0.1);
        assert!(gls.arc_cost(&problem).is_symmetric());

        gls.lambda = 10.0;
        gls.penalties.increment(NodeIdx::new(2), NodeIdx::new(3));
        let arc_cost = gls.arc_cost(&problem);
        assert!(!arc_cost.is_symmetric());

        // 0 -> 1 -> 3 -> 2 -> 4: two more meters, the penalized (2 -> 3) is
        // no longer travelled.
        let operator = TwoOptOperator::new(TwoOptParams {
            route_id: RouteIdx::new(0),
            from: 1,
            to: 2,
        });
        let changes = operator.route_changes(&solution);

        assert_eq!(operator.transport_cost_delta(&solution, &arc_cost), -8.0);
        assert_eq!(solution.evaluate_changes(&changes, &arc_cost), Some(-8.0));
    }
}
