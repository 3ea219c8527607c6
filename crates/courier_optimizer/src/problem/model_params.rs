use super::time_window::{Minutes, TimeWindow};

pub const DEFAULT_SERVICE_TIME: Minutes = 10;
pub const DEFAULT_LATENESS_PENALTY_PER_MINUTE: f64 = 100.0;
pub const DEFAULT_SPAN_COST_COEFFICIENT: f64 = 1.0;
pub const DEFAULT_DEPOT_DEPARTURE: Minutes = 480;
pub const DEFAULT_TIME_HORIZON: Minutes = 99_999;

/// Policy knobs of the routing model.
#[derive(Debug, Clone)]
pub struct ModelParams {
    /// Added to every travel leg between two distinct nodes.
    pub service_time: Minutes,

    /// Cost per minute of arrival after the end of a job's window.
    pub lateness_penalty_per_minute: f64,

    /// Weight of the difference between the longest and the shortest route
    /// distance. Zero favors minimal total distance, positive values favor
    /// balanced vehicles.
    pub span_cost_coefficient: f64,

    /// Clock time of every vehicle at its depot start (08:00).
    pub depot_departure: Minutes,

    /// Jobs with exactly this window get no time bound at all.
    pub default_time_window: TimeWindow,

    /// No cumulative time may exceed this value.
    pub time_horizon: Minutes,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            service_time: DEFAULT_SERVICE_TIME,
            lateness_penalty_per_minute: DEFAULT_LATENESS_PENALTY_PER_MINUTE,
            span_cost_coefficient: DEFAULT_SPAN_COST_COEFFICIENT,
            depot_departure: DEFAULT_DEPOT_DEPARTURE,
            default_time_window: TimeWindow::new(480, 1080),
            time_horizon: DEFAULT_TIME_HORIZON,
        }
    }
}
