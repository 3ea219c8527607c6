use crate::define_index_newtype;

use super::{location::Location, time_window::TimeWindow};

define_index_newtype!(NodeIdx, Job);

/// The depot always occupies the first node.
pub const DEPOT: NodeIdx = NodeIdx::new(0);

impl NodeIdx {
    pub fn is_depot(&self) -> bool {
        *self == DEPOT
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    external_id: i64,
    location: Location,
    demand: u32,
    /// `None` when the job keeps the default full-day window and is therefore
    /// unconstrained in time.
    time_window: Option<TimeWindow>,
}

impl Job {
    pub fn external_id(&self) -> i64 {
        self.external_id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn demand(&self) -> u32 {
        self.demand
    }

    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    pub fn has_time_window(&self) -> bool {
        self.time_window.is_some()
    }
}

pub struct JobBuilder {
    external_id: i64,
    location: Location,
    demand: u32,
    time_window: Option<TimeWindow>,
}

impl JobBuilder {
    pub fn new(external_id: i64, location: Location) -> Self {
        Self {
            external_id,
            location,
            demand: 0,
            time_window: None,
        }
    }

    pub fn set_demand(&mut self, demand: u32) -> &mut JobBuilder {
        self.demand = demand;
        self
    }

    pub fn set_time_window(&mut self, time_window: TimeWindow) -> &mut JobBuilder {
        self.time_window = Some(time_window);
        self
    }

    /// Keeps the window only when it differs from `default_window`.
    pub fn set_time_window_unless_default(
        &mut self,
        time_window: TimeWindow,
        default_window: TimeWindow,
    ) -> &mut JobBuilder {
        self.time_window = (time_window != default_window).then_some(time_window);
        self
    }

    pub fn build(&self) -> Job {
        Job {
            external_id: self.external_id,
            location: self.location,
            demand: self.demand,
            time_window: self.time_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_is_dropped() {
        let default_window = TimeWindow::new(480, 1080);

        let job = JobBuilder::new(7, Location::from_lat_lon(41.0, 29.0))
            .set_demand(100)
            .set_time_window_unless_default(TimeWindow::new(1080, 480), default_window)
            .build();

        assert_eq!(job.demand(), 100);
        assert!(!job.has_time_window());

        let job = JobBuilder::new(8, Location::from_lat_lon(41.0, 29.0))
            .set_time_window_unless_default(TimeWindow::new(600, 620), default_window)
            .build();

        assert_eq!(job.time_window(), Some(&TimeWindow::new(600, 620)));
    }
}
