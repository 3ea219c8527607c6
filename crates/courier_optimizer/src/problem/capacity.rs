use serde::Serialize;

/// Load limit of a vehicle. `Unlimited` is used when capacity enforcement is
/// disabled; loads are still accumulated for reporting.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Limited(u64),
    Unlimited,
}

impl Capacity {
    pub fn is_satisfied(&self, load: u64) -> bool {
        match self {
            Capacity::Limited(limit) => load <= *limit,
            Capacity::Unlimited => true,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Capacity::Unlimited)
    }
}
