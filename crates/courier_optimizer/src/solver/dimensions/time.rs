use crate::problem::{
    job::NodeIdx, time_window::Minutes, vehicle::Vehicle,
    vehicle_routing_problem::VehicleRoutingProblem,
};

/// Time consumed between two consecutive stops: the travel duration plus the
/// fixed service time. Staying on the same node is free, and so is the return
/// to the depot in open-path mode.
#[inline]
pub fn transit_time(problem: &VehicleRoutingProblem, from: NodeIdx, to: NodeIdx) -> Minutes {
    if from == to || (problem.is_open_path() && to.is_depot()) {
        0
    } else {
        problem.duration(from, to) + problem.params().service_time
    }
}

/// Clock time along a route. Starts at the vehicle's departure and only ever
/// increases.
///
/// A job with a window is never reached before the window start: the vehicle
/// waits instead. Reaching it after the window end is allowed and counted as
/// late minutes.
pub struct TimeDimension {
    cumul: Minutes,
    late_minutes: Minutes,
    horizon: Minutes,
}

impl TimeDimension {
    pub fn new(problem: &VehicleRoutingProblem, vehicle: &Vehicle) -> Self {
        Self {
            cumul: vehicle.departure(),
            late_minutes: 0,
            horizon: problem.params().time_horizon,
        }
    }

    /// Moves from `from` to `to` and returns the arrival time at `to`.
    pub fn travel(&mut self, problem: &VehicleRoutingProblem, from: NodeIdx, to: NodeIdx) -> Minutes {
        self.cumul += transit_time(problem, from, to);

        if !to.is_depot()
            && let Some(window) = problem.job(to).time_window()
        {
            self.cumul = window.earliest_service(self.cumul);
            self.late_minutes += window.lateness(self.cumul);
        }

        self.cumul
    }

    pub fn cumul(&self) -> Minutes {
        self.cumul
    }

    pub fn late_minutes(&self) -> Minutes {
        self.late_minutes
    }

    pub fn is_within_horizon(&self) -> bool {
        self.cumul <= self.horizon
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{job::DEPOT, time_window::TimeWindow},
        test_utils,
    };

    use super::*;

    #[test]
    fn test_transit_time() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (30.0, 40.0)]);
        let problem = test_utils::create_test_problem_builder(&locations, 1)
            .build()
            .unwrap();

        assert_eq!(transit_time(&problem, DEPOT, NodeIdx::new(1)), 60);
        assert_eq!(transit_time(&problem, NodeIdx::new(1), DEPOT), 60);
        assert_eq!(transit_time(&problem, NodeIdx::new(1), NodeIdx::new(1)), 0);
    }

    #[test]
    fn test_open_path_return_takes_no_time() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (30.0, 40.0)]);
        let mut builder = test_utils::create_test_problem_builder(&locations, 1);
        builder.set_open_path(true);
        let problem = builder.build().unwrap();

        assert_eq!(transit_time(&problem, NodeIdx::new(1), DEPOT), 0);
    }

    #[test]
    fn test_waits_for_window_start() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (20.0, 0.0)]);
        let problem = test_utils::create_test_problem_with_windows(&locations, 1, &[Some(
            TimeWindow::new(600, 620),
        )]);

        let mut dimension = TimeDimension::new(&problem, problem.vehicle(0.into()));
        assert_eq!(dimension.cumul(), 480);

        // 20 minutes of travel and 10 of service would reach the job at 510
        assert_eq!(dimension.travel(&problem, DEPOT, NodeIdx::new(1)), 600);
        assert_eq!(dimension.late_minutes(), 0);

        assert_eq!(dimension.travel(&problem, NodeIdx::new(1), DEPOT), 630);
        assert!(dimension.is_within_horizon());
    }

    #[test]
    fn test_counts_late_minutes() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (210.0, 0.0)]);
        let problem = test_utils::create_test_problem_with_windows(&locations, 1, &[Some(
            TimeWindow::new(600, 620),
        )]);

        let mut dimension = TimeDimension::new(&problem, problem.vehicle(0.into()));

        assert_eq!(dimension.travel(&problem, DEPOT, NodeIdx::new(1)), 700);
        assert_eq!(dimension.late_minutes(), 80);
    }
}
