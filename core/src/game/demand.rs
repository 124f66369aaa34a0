use super::{MAX_DEMAND_SCORE, MIN_DEMAND_SCORE};

/// Hysteresis counter feeding the queue's demand level: a short streak of
/// served customers nudges demand up, a streak of lost ones nudges it down.
#[derive(Debug, Default)]
pub struct DemandController {
    score: i32,
}

impl DemandController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self) {
        self.score = (self.score + 1).min(MAX_DEMAND_SCORE);
    }

    pub fn fail(&mut self) {
        self.score = (self.score - 1).max(MIN_DEMAND_SCORE);
    }

    /// +1 when the recent streak warrants more demand, -1 for less, 0 inside
    /// the dead band. Callers must `reset()` after acting on a non-zero
    /// result to avoid re-amplifying the same streak.
    pub fn adjust(&self) -> i32 {
        if self.score >= 2 {
            1
        } else if self.score <= -2 {
            -1
        } else {
            0
        }
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_successes_raise_demand() {
        let mut controller = DemandController::new();
        controller.success();
        assert_eq!(controller.adjust(), 0);
        controller.success();
        assert_eq!(controller.adjust(), 1);
    }

    #[test]
    fn two_failures_lower_demand() {
        let mut controller = DemandController::new();
        controller.fail();
        controller.fail();
        assert_eq!(controller.adjust(), -1);
    }

    #[test]
    fn mixed_streaks_stay_in_the_dead_band() {
        let mut controller = DemandController::new();
        controller.success();
        controller.fail();
        controller.success();
        assert_eq!(controller.adjust(), 0);
    }

    #[test]
    fn reset_returns_to_neutral() {
        let mut controller = DemandController::new();
        controller.success();
        controller.success();
        controller.reset();
        assert_eq!(controller.adjust(), 0);
    }

    #[test]
    fn score_saturates_at_the_bounds() {
        let mut controller = DemandController::new();
        for _ in 0..40 {
            controller.fail();
        }
        // a long losing streak must not need 40 successes to recover
        for _ in 0..7 {
            controller.success();
        }
        assert_eq!(controller.adjust(), 1);
    }
}
