use std::collections::VecDeque;
use std::fmt;

use rand::Rng;
use rand::rngs::StdRng;

use super::customer::{Customer, CustomerArchetype};
use super::{MAX_DEMAND, MIN_DEMAND};

const PREMIUM_BUDGET_FACTOR: f64 = 1.5;

/// FIFO of customers waiting this hour, plus the demand level that decides
/// how many arrive per hour and a running lost-customer count.
#[derive(Debug, Default)]
pub struct CarQueue {
    pending: VecDeque<Customer>,
    next_id: u64,
    demand_per_hour: i32,
    lost: u64,
}

impl CarQueue {
    pub fn new(initial_demand: i32) -> Self {
        Self {
            pending: VecDeque::new(),
            next_id: 1,
            demand_per_hour: initial_demand.clamp(MIN_DEMAND, MAX_DEMAND),
            lost: 0,
        }
    }

    /// Generates exactly `demand_per_hour` customers. Budgets fall uniformly
    /// in 10..30 EUR (Premium gets a 1.5x allowance), impatience in 0.5..2.0.
    pub fn generate_customers(&mut self, rng: &mut StdRng) {
        for _ in 0..self.demand_per_hour {
            let base_budget: f64 = rng.gen_range(10.0..30.0);
            let impatience: f64 = rng.gen_range(0.5..2.0);
            let (archetype, budget) = match rng.gen_range(0..4) {
                0 => (CustomerArchetype::Rushed, base_budget),
                1 => (CustomerArchetype::Budget, base_budget),
                2 => (
                    CustomerArchetype::Premium,
                    base_budget * PREMIUM_BUDGET_FACTOR,
                ),
                _ => (CustomerArchetype::Eco, base_budget),
            };
            let customer = Customer::new(self.next_id, archetype, budget, impatience);
            self.next_id += 1;
            self.pending.push_back(customer);
        }
    }

    pub fn pop(&mut self) -> Option<Customer> {
        self.pending.pop_front()
    }

    pub fn record_lost(&mut self) {
        self.lost += 1;
    }

    pub fn raise_demand(&mut self) {
        if self.demand_per_hour < MAX_DEMAND {
            self.demand_per_hour += 1;
        }
    }

    pub fn lower_demand(&mut self) {
        if self.demand_per_hour > MIN_DEMAND {
            self.demand_per_hour -= 1;
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn demand(&self) -> i32 {
        self.demand_per_hour
    }

    pub fn lost(&self) -> u64 {
        self.lost
    }
}

impl fmt::Display for CarQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pending={} lost={} demand/h={}",
            self.pending.len(),
            self.lost,
            self.demand_per_hour
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn generation_matches_the_demand_level() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut queue = CarQueue::new(5);
        queue.generate_customers(&mut rng);
        assert_eq!(queue.len(), 5);
        queue.generate_customers(&mut rng);
        assert_eq!(queue.len(), 10);
    }

    #[test]
    fn popping_preserves_arrival_order() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut queue = CarQueue::new(3);
        queue.generate_customers(&mut rng);
        let first = queue.pop().unwrap();
        let second = queue.pop().unwrap();
        assert!(first.id() < second.id());
    }

    #[test]
    fn demand_level_is_clamped() {
        let mut queue = CarQueue::new(1);
        queue.lower_demand();
        assert_eq!(queue.demand(), MIN_DEMAND);
        for _ in 0..50 {
            queue.raise_demand();
        }
        assert_eq!(queue.demand(), MAX_DEMAND);
    }

    #[test]
    fn generated_budgets_stay_in_the_policy_range() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut queue = CarQueue::new(20);
        queue.generate_customers(&mut rng);
        while let Some(customer) = queue.pop() {
            let limit = match customer.archetype() {
                CustomerArchetype::Premium => 45.0,
                _ => 30.0,
            };
            assert!(customer.budget() >= 10.0 && customer.budget() < limit);
        }
    }
}
