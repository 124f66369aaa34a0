use super::MAX_SATISFACTION;
use super::service::{ServiceCategory, ServiceDefinition};

/// Selection strategy for a generated customer, a closed set of pure
/// selection functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerArchetype {
    Rushed,
    Budget,
    Premium,
    Eco,
}

impl CustomerArchetype {
    pub fn label(&self) -> &'static str {
        match self {
            CustomerArchetype::Rushed => "Rushed",
            CustomerArchetype::Budget => "Budget",
            CustomerArchetype::Premium => "Premium",
            CustomerArchetype::Eco => "Eco",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Customer {
    id: u64,
    archetype: CustomerArchetype,
    budget: f64,
    impatience: f64,
}

impl Customer {
    pub fn new(id: u64, archetype: CustomerArchetype, budget: f64, impatience: f64) -> Self {
        Self {
            id,
            archetype,
            budget,
            impatience,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn archetype(&self) -> CustomerArchetype {
        self.archetype
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Picks a service within budget, or `None` when nothing is affordable.
    pub fn choose_service<'a>(
        &self,
        services: &'a [ServiceDefinition],
    ) -> Option<&'a ServiceDefinition> {
        let affordable = || services.iter().filter(|s| s.price() <= self.budget);
        match self.archetype {
            CustomerArchetype::Rushed => affordable().min_by_key(|s| s.duration_minutes()),
            CustomerArchetype::Budget => cheapest(affordable()),
            CustomerArchetype::Premium => {
                let best_of = |premium: bool| {
                    affordable()
                        .filter(|s| s.is_premium() == premium)
                        .max_by(|a, b| {
                            total_cmp(a.rating(), b.rating())
                                .then(total_cmp(a.price(), b.price()))
                        })
                };
                best_of(true).or_else(|| best_of(false))
            }
            CustomerArchetype::Eco => {
                cheapest(affordable().filter(|s| s.category() == ServiceCategory::Eco))
                    .or_else(|| cheapest(affordable()))
            }
        }
    }

    /// Satisfaction after being served: price-vs-budget, wait-vs-impatience
    /// and service quality, weighted 2:2:1 and clamped to [0, 5].
    pub fn rate_service(&self, service: &ServiceDefinition, price_paid: f64, wait_minutes: i32) -> f64 {
        let price_factor = if price_paid <= self.budget {
            1.0
        } else {
            (1.0 - (price_paid - self.budget) / self.budget).max(0.2)
        };
        let time_factor = (1.0 - f64::from(wait_minutes) / (60.0 * self.impatience)).max(0.0);
        let quality_factor = (service.rating() / 5.0).clamp(0.0, 1.0);
        (2.0 * price_factor + 2.0 * time_factor + quality_factor).clamp(0.0, MAX_SATISFACTION)
    }
}

fn total_cmp(a: f64, b: f64) -> std::cmp::Ordering {
    a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
}

fn cheapest<'a>(
    candidates: impl Iterator<Item = &'a ServiceDefinition>,
) -> Option<&'a ServiceDefinition> {
    candidates.min_by(|a, b| total_cmp(a.price(), b.price()))
}
