use std::sync::Arc;

use smallvec::SmallVec;

use crate::{
    problem::{
        job::NodeIdx, time_window::Minutes, travel_matrices::Distance, vehicle::VehicleIdx,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        arc_cost::ArcCostEvaluator,
        dimensions::{
            distance::{distance_span, span_cost},
            summarize_route,
        },
        score::{self, Score, ScoreAnalysis},
    },
};

use super::{
    route::{Route, RouteChange},
    route_id::RouteIdx,
};

pub type RouteChanges = SmallVec<[RouteChange; 2]>;

/// One route per vehicle, mutated in place by construction and local search.
#[derive(Clone)]
pub struct WorkingSolution {
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<Route>,
    next_version: usize,
}

impl WorkingSolution {
    pub fn new(problem: Arc<VehicleRoutingProblem>) -> Self {
        let routes = VehicleIdx::range(problem.vehicles().len())
            .map(|vehicle_id| Route::empty(&problem, vehicle_id, vehicle_id.get()))
            .collect::<Vec<_>>();

        Self {
            next_version: routes.len(),
            problem,
            routes,
        }
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        &self.problem
    }

    pub fn shared_problem(&self) -> Arc<VehicleRoutingProblem> {
        Arc::clone(&self.problem)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[inline]
    pub fn route(&self, route_id: RouteIdx) -> &Route {
        &self.routes[route_id]
    }

    pub fn route_ids(&self) -> impl DoubleEndedIterator<Item = RouteIdx> + Clone + use<> {
        RouteIdx::range(self.routes.len())
    }

    pub fn non_empty_routes_count(&self) -> usize {
        self.routes.iter().filter(|route| !route.is_empty()).count()
    }

    /// Customers not visited by any route, in node order.
    pub fn unassigned_nodes(&self) -> Vec<NodeIdx> {
        let mut assigned = vec![false; self.problem.jobs().len()];
        for node in self.routes.iter().flat_map(|route| route.nodes()) {
            assigned[node.get()] = true;
        }

        self.problem
            .customers()
            .filter(|node| !assigned[node.get()])
            .collect()
    }

    pub fn insert(&mut self, route_id: RouteIdx, position: usize, node: NodeIdx) {
        self.apply_changes(&[RouteChange {
            route_id,
            start: position,
            end: position,
            nodes: vec![node],
        }]);
    }

    pub fn apply_changes(&mut self, changes: &[RouteChange]) {
        for change in changes {
            let version = self.next_version;
            self.next_version += 1;
            self.routes[change.route_id].apply(&self.problem, change, version);
        }
    }

    /// Objective delta of applying `changes` with arc costs taken from
    /// `arc_cost`, or `None` when a changed route would break a hard
    /// constraint. Each change must target a distinct route.
    pub fn evaluate_changes<E>(&self, changes: &[RouteChange], arc_cost: &E) -> Option<f64>
    where
        E: ArcCostEvaluator + ?Sized,
    {
        let problem = self.problem();
        let mut delta = 0.0;
        let mut distances: SmallVec<[(RouteIdx, Distance); 2]> = SmallVec::new();

        for change in changes {
            let route = self.route(change.route_id);
            let vehicle = problem.vehicle(route.vehicle_id());

            let after = summarize_route(problem, vehicle, route.nodes_with_change(change), arc_cost);
            if !after.is_feasible {
                return None;
            }

            let before = summarize_route(problem, vehicle, route.nodes().iter().copied(), arc_cost);

            delta += after.penalized_cost(problem) - before.penalized_cost(problem);
            distances.push((change.route_id, after.distance));
        }

        if problem.has_span_cost() {
            let span_after = distance_span(self.route_ids().map(|route_id| {
                distances
                    .iter()
                    .find(|(changed, _)| *changed == route_id)
                    .map_or(self.route(route_id).summary().distance, |&(_, distance)| {
                        distance
                    })
            }));

            delta += span_cost(problem, span_after) - span_cost(problem, self.span());
        }

        Some(delta)
    }

    pub fn transport_cost(&self) -> f64 {
        self.routes.iter().map(|route| route.transport_cost()).sum()
    }

    pub fn late_minutes(&self) -> Minutes {
        self.routes
            .iter()
            .map(|route| route.summary().late_minutes)
            .sum()
    }

    pub fn lateness_cost(&self) -> f64 {
        self.routes
            .iter()
            .map(|route| route.summary().lateness_cost(&self.problem))
            .sum()
    }

    pub fn span(&self) -> Distance {
        distance_span(self.routes.iter().map(|route| route.summary().distance))
    }

    pub fn span_cost(&self) -> f64 {
        span_cost(&self.problem, self.span())
    }

    /// Total cost minimized by the search: arc costs, lateness penalties and
    /// span cost.
    pub fn objective(&self) -> f64 {
        self.transport_cost() + self.lateness_cost() + self.span_cost()
    }

    /// Every job routed, no capacity or horizon violation.
    pub fn is_feasible(&self) -> bool {
        !self.score().is_failure()
    }

    pub fn score_analysis(&self) -> ScoreAnalysis {
        let mut analysis = ScoreAnalysis::default();

        analysis.add(score::TRANSPORT_COST, Score::soft(self.transport_cost()));
        analysis.add(score::LATENESS, Score::soft(self.lateness_cost()));
        analysis.add(score::SPAN_COST, Score::soft(self.span_cost()));

        for route in &self.routes {
            let summary = route.summary();
            if !self.problem.vehicle(route.vehicle_id()).capacity().is_satisfied(summary.load) {
                analysis.add(score::CAPACITY, Score::hard(1.0));
            }
            if summary.end_time > self.problem.params().time_horizon {
                analysis.add(score::TIME_HORIZON, Score::hard(1.0));
            }
        }

        let unassigned = self.unassigned_nodes().len();
        if unassigned > 0 {
            analysis.add(score::UNASSIGNED_JOBS, Score::hard(unassigned as f64));
        }

        analysis
    }

    pub fn score(&self) -> Score {
        self.score_analysis().total_score()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::capacity::Capacity,
        solver::arc_cost::ArcCost,
        test_utils::{self, TestRoute},
    };

    use super::*;

    #[test]
    fn test_insert_and_unassigned() {
        let locations = test_utils::create_location_grid(2, 3);
        let problem = Arc::new(test_utils::create_test_problem(
            &locations,
            2,
            Capacity::Unlimited,
        ));

        let mut solution = WorkingSolution::new(Arc::clone(&problem));
        assert_eq!(solution.unassigned_nodes().len(), 5);

        solution.insert(RouteIdx::new(0), 0, NodeIdx::new(2));
        solution.insert(RouteIdx::new(0), 0, NodeIdx::new(1));
        solution.insert(RouteIdx::new(1), 0, NodeIdx::new(4));

        assert_eq!(solution.route(RouteIdx::new(0)).nodes(), &[
            NodeIdx::new(1),
            NodeIdx::new(2)
        ]);
        assert_eq!(solution.unassigned_nodes(), vec![
            NodeIdx::new(3),
            NodeIdx::new(5)
        ]);
        assert_eq!(solution.non_empty_routes_count(), 2);
        assert!(!solution.is_feasible());
        assert_eq!(solution.score_analysis().score(score::UNASSIGNED_JOBS), Score::hard(2.0));
    }

    #[test]
    fn test_capacity_violation_is_a_hard_score() {
        let locations = test_utils::create_location_grid(1, 3);
        let problem = Arc::new(test_utils::create_test_problem_with_demands(
            &locations,
            1,
            Capacity::Limited(10),
            &[6, 6],
        ));

        let solution = test_utils::create_test_working_solution(problem, vec![TestRoute {
            vehicle_id: 0,
            nodes: vec![1, 2],
        }]);

        let analysis = solution.score_analysis();
        assert_eq!(analysis.score(score::CAPACITY), Score::hard(1.0));
        assert_eq!(analysis.score(score::UNASSIGNED_JOBS), Score::ZERO);
        assert_eq!(analysis.score(score::TRANSPORT_COST), Score::soft(4.0));
        assert!(solution.score().is_failure());
        assert!(!solution.is_feasible());
    }

    #[test]
    fn test_open_path_span_counts_return_leg() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (30.0, 40.0), (60.0, 80.0)]);
        let mut builder = test_utils::create_test_problem_builder(&locations, 2);
        let mut params = test_utils::create_test_model_params();
        params.span_cost_coefficient = 1.0;
        builder.set_params(params);
        builder.set_open_path(true);
        let problem = Arc::new(builder.build().unwrap());

        let solution = test_utils::create_test_working_solution(problem, vec![TestRoute {
            vehicle_id: 0,
            nodes: vec![1, 2],
        }]);

        let route = solution.route(RouteIdx::new(0));
        assert_eq!(route.summary().driven_distance(solution.problem()), 100);
        assert_eq!(solution.span(), 200);
        assert_eq!(solution.span_cost(), 200.0);
    }

    #[test]
    fn test_versions_are_unique() {
        let locations = test_utils::create_location_grid(2, 3);
        let problem = Arc::new(test_utils::create_test_problem(
            &locations,
            3,
            Capacity::Unlimited,
        ));

        let mut solution = WorkingSolution::new(problem);
        let before = solution.route(RouteIdx::new(1)).version();
        solution.insert(RouteIdx::new(1), 0, NodeIdx::new(1));
        let after = solution.route(RouteIdx::new(1)).version();

        assert_ne!(before, after);
        for route in solution.routes() {
            if route.vehicle_id() != VehicleIdx::new(1) {
                assert_ne!(route.version(), after);
            }
        }
    }

    #[test]
    fn test_evaluate_changes_matches_objective() {
        let locations = test_utils::create_location_grid(3, 3);
        let mut builder = test_utils::create_test_problem_builder(&locations, 2);
        let mut params = test_utils::create_test_model_params();
        params.span_cost_coefficient = 2.0;
        builder.set_params(params);
        let problem = Arc::new(builder.build().unwrap());

        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![
                TestRoute {
                    vehicle_id: 0,
                    nodes: vec![1, 2, 3, 4],
                },
                TestRoute {
                    vehicle_id: 1,
                    nodes: vec![5, 6, 7, 8],
                },
            ],
        );

        let changes = [
            RouteChange {
                route_id: RouteIdx::new(0),
                start: 1,
                end: 4,
                nodes: vec![],
            },
            RouteChange {
                route_id: RouteIdx::new(1),
                start: 0,
                end: 0,
                nodes: vec![NodeIdx::new(2), NodeIdx::new(3), NodeIdx::new(4)],
            },
        ];

        let before = solution.objective();
        let delta = solution
            .evaluate_changes(&changes, &ArcCost::new(&problem))
            .unwrap();
        solution.apply_changes(&changes);

        assert!((before + delta - solution.objective()).abs() < 1e-9);
        assert!(solution.span_cost() > 0.0);
    }

    #[test]
    fn test_evaluate_changes_rejects_capacity_violation() {
        let locations = test_utils::create_location_grid(1, 4);
        let problem = Arc::new(test_utils::create_test_problem_with_demands(
            &locations,
            2,
            Capacity::Limited(200),
            &[100, 100, 100],
        ));

        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![
                TestRoute {
                    vehicle_id: 0,
                    nodes: vec![1, 2],
                },
                TestRoute {
                    vehicle_id: 1,
                    nodes: vec![3],
                },
            ],
        );

        let changes = [
            RouteChange {
                route_id: RouteIdx::new(1),
                start: 0,
                end: 1,
                nodes: vec![],
            },
            RouteChange {
                route_id: RouteIdx::new(0),
                start: 2,
                end: 2,
                nodes: vec![NodeIdx::new(3)],
            },
        ];

        assert_eq!(
            solution.evaluate_changes(&changes, &ArcCost::new(&problem)),
            None
        );
    }
}
