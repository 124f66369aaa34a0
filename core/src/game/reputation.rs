use super::MAX_SATISFACTION;

const SERVED_WEIGHT: f64 = 0.2;
const LOST_PENALTY: f64 = 0.10;

/// Exponentially weighted reputation in [0, 5], biased towards recent
/// outcomes. Starts at a neutral 3.0.
#[derive(Debug)]
pub struct ReputationTracker {
    score: f64,
    satisfaction_sum: f64,
    served_samples: u64,
}

impl Default for ReputationTracker {
    fn default() -> Self {
        Self {
            score: 3.0,
            satisfaction_sum: 0.0,
            served_samples: 0,
        }
    }
}

impl ReputationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_served(&mut self, satisfaction: f64) {
        let satisfaction = satisfaction.clamp(0.0, MAX_SATISFACTION);
        self.satisfaction_sum += satisfaction;
        self.served_samples += 1;
        self.score = ((1.0 - SERVED_WEIGHT) * self.score + SERVED_WEIGHT * satisfaction)
            .clamp(0.0, MAX_SATISFACTION);
    }

    pub fn on_lost(&mut self) {
        self.score = (self.score - LOST_PENALTY).clamp(0.0, MAX_SATISFACTION);
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn avg_satisfaction(&self) -> f64 {
        if self.served_samples == 0 {
            0.0
        } else {
            self.satisfaction_sum / self.served_samples as f64
        }
    }

    pub fn served_samples(&self) -> u64 {
        self.served_samples
    }
}
