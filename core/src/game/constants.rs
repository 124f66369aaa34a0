pub(crate) const MINUTES_PER_HOUR: i32 = 60;
pub(crate) const MIN_DEMAND: i32 = 1;
pub(crate) const MAX_DEMAND: i32 = 20;
pub(crate) const MIN_DEMAND_SCORE: i32 = -5;
pub(crate) const MAX_DEMAND_SCORE: i32 = 5;
pub(crate) const MAX_SATISFACTION: f64 = 5.0;
pub(crate) const MAX_SERVICES: usize = 20;
pub(crate) const MAX_BAYS: usize = 20;
pub(crate) const ATTEMPTS_PER_BAY: f64 = 4.0;
