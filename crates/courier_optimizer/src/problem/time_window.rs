use std::cmp;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minutes since midnight of the planning day. Values past 1440 belong to the
/// following day(s).
pub type Minutes = i64;

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: Minutes,
    end: Minutes,
}

impl TimeWindow {
    /// Bounds given in the wrong order are swapped.
    pub fn new(start: Minutes, end: Minutes) -> Self {
        TimeWindow {
            start: cmp::min(start, end),
            end: cmp::max(start, end),
        }
    }

    pub fn start(&self) -> Minutes {
        self.start
    }

    pub fn end(&self) -> Minutes {
        self.end
    }

    /// Earliest moment service can begin when reaching the job at `arrival`.
    pub fn earliest_service(&self, arrival: Minutes) -> Minutes {
        cmp::max(arrival, self.start)
    }

    pub fn lateness(&self, arrival: Minutes) -> Minutes {
        cmp::max(arrival - self.end, 0)
    }
}
