use anyhow::{Result, anyhow, bail, ensure};
#[cfg(test)]
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::bay::{BayPool, WashBay};
use super::bootstrap::{GameBuilder, WashConfig};
use super::demand::DemandController;
use super::events::{EventDispatcher, EventObserver, GameEvent};
use super::incident::roll_incidents;
use super::inventory::{Inventory, ResourceVector};
use super::pricing::PricingMode;
use super::queue::CarQueue;
use super::report::DailyReport;
use super::reputation::ReputationTracker;
use super::service::{ServiceCatalog, ServiceCategory, ServiceDefinition};
use super::upgrade::UpgradeKind;
use super::{ATTEMPTS_PER_BAY, MAX_SATISFACTION, MINUTES_PER_HOUR};

const WATER_PACK_QTY: i64 = 200;
const SHAMPOO_PACK_QTY: i64 = 50;
const WAX_PACK_QTY: i64 = 25;
const WATER_PACK_COST: f64 = 20.0;
const SHAMPOO_PACK_COST: f64 = 25.0;
const WAX_PACK_COST: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyItem {
    Water,
    Shampoo,
    Wax,
}

impl SupplyItem {
    pub fn parse(token: &str) -> Result<Self> {
        match token.to_ascii_lowercase().as_str() {
            "water" => Ok(SupplyItem::Water),
            "shampoo" => Ok(SupplyItem::Shampoo),
            "wax" => Ok(SupplyItem::Wax),
            other => bail!("unknown supply item: {other} (water, shampoo or wax)"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SupplyItem::Water => "water",
            SupplyItem::Shampoo => "shampoo",
            SupplyItem::Wax => "wax",
        }
    }

    pub fn pack_cost(&self) -> f64 {
        match self {
            SupplyItem::Water => WATER_PACK_COST,
            SupplyItem::Shampoo => SHAMPOO_PACK_COST,
            SupplyItem::Wax => WAX_PACK_COST,
        }
    }

    pub fn pack_amounts(&self) -> ResourceVector {
        match self {
            SupplyItem::Water => ResourceVector::new(WATER_PACK_QTY, 0, 0),
            SupplyItem::Shampoo => ResourceVector::new(0, SHAMPOO_PACK_QTY, 0),
            SupplyItem::Wax => ResourceVector::new(0, 0, WAX_PACK_QTY),
        }
    }
}

/// The whole business: shared inventory, bay pool, service catalog, customer
/// queue and the feedback loops between them. Single-threaded by design; the
/// hourly driver is the only flow of control that mutates it.
pub struct CarWash {
    name: String,
    inventory: Inventory,
    catalog: ServiceCatalog,
    bays: BayPool,
    queue: CarQueue,
    demand_controller: DemandController,
    dispatcher: EventDispatcher,
    reputation: ReputationTracker,
    rng: StdRng,
    pricing_mode: PricingMode,
    purchased_upgrades: Vec<UpgradeKind>,
    reports: Vec<DailyReport>,
    current_report: DailyReport,

    cash: f64,
    opening_minute: i32,
    closing_minute: i32,
    now_minute: i32,
    day: u32,

    total_cars_served: u64,
    daily_cars_served: u32,
    daily_lost: u32,
    daily_revenue: f64,
    daily_satisfaction_sum: f64,

    speed_factor: f64,
    comfort_bonus: f64,
    pending_demand_bonus: i32,
    nano_coating_enabled: bool,
}

impl CarWash {
    pub fn from_config(config: WashConfig) -> Result<Self> {
        GameBuilder::new(config).build()
    }

    pub fn from_config_with_rng(config: WashConfig, rng: StdRng) -> Result<Self> {
        GameBuilder::new(config).with_rng(rng).build()
    }

    #[cfg(test)]
    pub fn from_config_with_seed(config: WashConfig, seed: u64) -> Result<Self> {
        GameBuilder::new(config)
            .with_rng(StdRng::seed_from_u64(seed))
            .build()
    }

    pub(crate) fn assemble(
        config: WashConfig,
        catalog: ServiceCatalog,
        bays: BayPool,
        inventory: Inventory,
        rng: StdRng,
    ) -> Self {
        Self {
            name: config.name,
            inventory,
            catalog,
            bays,
            queue: CarQueue::new(config.initial_demand),
            demand_controller: DemandController::new(),
            dispatcher: EventDispatcher::new(),
            reputation: ReputationTracker::new(),
            rng,
            pricing_mode: PricingMode::default(),
            purchased_upgrades: Vec::new(),
            reports: Vec::new(),
            current_report: DailyReport::begin(1),
            cash: config.starting_cash,
            opening_minute: config.opening_minute,
            closing_minute: config.closing_minute,
            now_minute: config.opening_minute,
            day: 1,
            total_cars_served: 0,
            daily_cars_served: 0,
            daily_lost: 0,
            daily_revenue: 0.0,
            daily_satisfaction_sum: 0.0,
            speed_factor: 1.0,
            comfort_bonus: 0.0,
            pending_demand_bonus: 0,
            nano_coating_enabled: false,
        }
    }

    // ---- structure -------------------------------------------------------

    pub fn add_service(&mut self, definition: ServiceDefinition) -> Result<()> {
        let name = definition.name().to_string();
        self.catalog.add(definition)?;
        if self.nano_coating_enabled {
            self.catalog.enable_nano_coating();
        }
        self.dispatcher.dispatch(&GameEvent::StructuralChange {
            description: format!("added service {name}"),
        });
        Ok(())
    }

    pub fn add_bay(&mut self, bay: WashBay) -> Result<()> {
        let id = bay.id();
        self.bays.add(bay)?;
        self.dispatcher.dispatch(&GameEvent::StructuralChange {
            description: format!("added bay #{id}"),
        });
        Ok(())
    }

    pub fn add_observer(&mut self, observer: Box<dyn EventObserver>) {
        self.dispatcher.register(observer);
    }

    /// Grants a bay a new capability. Only the premium categories can be
    /// retrofitted; grants are idempotent and never removed.
    pub fn upgrade_bay(&mut self, bay_id: u32, category: ServiceCategory) -> Result<String> {
        ensure!(
            matches!(category, ServiceCategory::Deluxe | ServiceCategory::Wax),
            "bays can only be retrofitted for Deluxe or Wax"
        );
        let bay = self
            .bays
            .get_mut(bay_id)
            .ok_or_else(|| anyhow!("no bay with id {bay_id}"))?;
        bay.add_capability(category);
        let description = format!("bay #{bay_id} retrofitted for {}", category.label());
        self.dispatcher.dispatch(&GameEvent::StructuralChange {
            description: description.clone(),
        });
        Ok(description)
    }

    // ---- booking ---------------------------------------------------------

    /// Books up to `count` cars onto the earliest capable bays, consuming
    /// inventory per car. Partial results are not errors; a car whose wash
    /// would overrun closing time is rolled back and ends the batch.
    pub fn book_cars(&mut self, service_name: &str, count: i32) -> Result<i32> {
        let service = self
            .catalog
            .find(service_name)
            .ok_or_else(|| anyhow!("unknown service: {service_name}"))?
            .clone();
        ensure!(count > 0, "the number of cars must be positive");

        let mut booked = 0;
        for _ in 0..count {
            let Some(bay_idx) = self.bays.find_earliest_capable(service.category()) else {
                break;
            };
            // Tentative consume first so an overrun can be undone exactly.
            if !self.inventory.try_consume(service.needs(), 1) {
                break;
            }
            let start = self.now_minute.max(self.bays.bays()[bay_idx].available_at());
            if start + service.duration_minutes() > self.closing_minute {
                self.inventory.restock(service.needs());
                break;
            }
            self.bays
                .book(bay_idx, service.duration_minutes(), self.now_minute);
            self.cash += service.price();
            booked += 1;
        }
        Ok(booked)
    }

    // ---- hourly driver ---------------------------------------------------

    /// Simulates one operating hour and returns the report lines for it.
    pub fn simulate_hour(&mut self) -> Result<Vec<String>> {
        self.now_minute += MINUTES_PER_HOUR;

        // demand bonuses are one-shot: granted by upgrades/incidents,
        // consumed by the next hour
        for _ in 0..self.pending_demand_bonus.max(0) {
            self.queue.raise_demand();
        }
        self.pending_demand_bonus = 0;

        self.queue.generate_customers(&mut self.rng);

        let attempts =
            self.bays.len() as i32 * (ATTEMPTS_PER_BAY * self.speed_factor).round() as i32;
        let mut processed = 0;

        for _ in 0..attempts {
            let Some(customer) = self.queue.pop() else {
                break;
            };
            let chosen = customer.choose_service(self.catalog.services()).cloned();
            let Some(service) = chosen else {
                self.record_lost();
                continue;
            };
            // A failed or erroring booking must never abort the hour; the
            // customer is simply lost.
            match self.book_cars(service.name(), 1) {
                Ok(1) => {
                    let satisfaction = (customer.rate_service(&service, service.price(), 0)
                        + self.comfort_bonus)
                        .clamp(0.0, MAX_SATISFACTION);
                    self.total_cars_served += 1;
                    self.daily_cars_served += 1;
                    self.daily_satisfaction_sum += satisfaction;
                    self.daily_revenue += service.price();
                    self.current_report.add_sale(service.name(), service.price());
                    self.reputation.on_served(satisfaction);
                    self.dispatcher.dispatch(&GameEvent::Served {
                        day: self.day,
                        service: service.name().to_string(),
                        price: service.price(),
                        satisfaction,
                    });
                    self.demand_controller.success();
                    processed += 1;
                }
                Ok(_) | Err(_) => self.record_lost(),
            }
        }

        let adjustment = self.demand_controller.adjust();
        if adjustment > 0 {
            self.queue.raise_demand();
        } else if adjustment < 0 {
            self.queue.lower_demand();
        }
        if adjustment != 0 {
            self.demand_controller.reset();
        }

        let mut lines = vec![format!(
            "hour complete: served={} queue={} lost={} demand/h={}",
            processed,
            self.queue.len(),
            self.queue.lost(),
            self.queue.demand()
        )];

        if self.now_minute >= self.closing_minute {
            lines.extend(self.rollover());
        }
        Ok(lines)
    }

    fn record_lost(&mut self) {
        self.queue.record_lost();
        self.daily_lost += 1;
        self.reputation.on_lost();
        self.dispatcher.dispatch(&GameEvent::Lost { day: self.day });
        self.demand_controller.fail();
    }

    /// Ends the current day ahead of the clock.
    pub fn end_current_day(&mut self) -> Vec<String> {
        self.rollover()
    }

    fn rollover(&mut self) -> Vec<String> {
        let daily_avg = if self.daily_cars_served > 0 {
            self.daily_satisfaction_sum / f64::from(self.daily_cars_served)
        } else {
            0.0
        };
        let mut report = std::mem::take(&mut self.current_report);
        report.finalize(
            self.daily_cars_served,
            self.daily_lost,
            daily_avg,
            self.daily_revenue,
        );
        self.dispatcher.dispatch(&GameEvent::DayEnd {
            report: report.clone(),
        });

        let mut lines = vec![format!(
            "day {} closed: served={} lost={} revenue={:.2} EUR avg satisfaction={:.2}",
            self.day, self.daily_cars_served, self.daily_lost, self.daily_revenue, daily_avg
        )];
        self.reports.push(report);

        self.daily_cars_served = 0;
        self.daily_lost = 0;
        self.daily_revenue = 0.0;
        self.daily_satisfaction_sum = 0.0;

        self.bays.reset_all(self.opening_minute);
        self.now_minute = self.opening_minute;
        self.day += 1;
        self.current_report = DailyReport::begin(self.day);

        if let Some(factor) = self
            .pricing_mode
            .day_start_factor(self.queue.demand(), self.average_satisfaction())
        {
            self.catalog.apply_price_factor(factor);
            lines.push(format!(
                "{} pricing adjusted all prices by {:.0}%",
                self.pricing_mode.label(),
                (factor - 1.0) * 100.0
            ));
        }

        let avg_satisfaction = self.average_satisfaction();
        for incident in roll_incidents(&mut self.rng, self.reputation.score()) {
            let (demand_delta, comfort_delta, cash_delta) = incident.effects(avg_satisfaction);
            self.pending_demand_bonus += demand_delta;
            self.comfort_bonus += comfort_delta;
            self.cash = (self.cash + cash_delta).max(0.0);
            lines.push(incident.describe(avg_satisfaction));
        }

        lines
    }

    // ---- purchases -------------------------------------------------------

    /// Buys supply packs. Nothing is mutated when the purchase fails.
    pub fn buy_supplies(&mut self, item: SupplyItem, packs: i32) -> Result<String> {
        ensure!(packs > 0, "the number of packs must be positive");
        let cost = item.pack_cost() * f64::from(packs);
        ensure!(
            cost <= self.cash,
            "not enough cash for {} x {} ({:.2} EUR needed, {:.2} available)",
            packs,
            item.label(),
            cost,
            self.cash
        );
        self.cash -= cost;
        self.inventory.restock(&item.pack_amounts().scaled(i64::from(packs)));
        self.dispatcher.dispatch(&GameEvent::Purchase {
            item: item.label().to_string(),
            quantity: packs,
            cost,
        });
        Ok(format!(
            "bought {} pack(s) of {} for {:.2} EUR",
            packs,
            item.label(),
            cost
        ))
    }

    pub fn buy_upgrade(&mut self, kind: UpgradeKind) -> Result<String> {
        let cost = kind.cost();
        ensure!(
            cost <= self.cash,
            "not enough cash for the {} upgrade ({:.2} EUR needed, {:.2} available)",
            kind.name(),
            cost,
            self.cash
        );
        self.cash -= cost;
        match kind {
            UpgradeKind::BaySpeed => self.speed_factor += 0.15,
            UpgradeKind::Comfort => self.comfort_bonus += 0.15,
            UpgradeKind::Marketing => self.pending_demand_bonus += 1,
            UpgradeKind::NanoCoating => self.enable_nano_coating(),
        }
        self.purchased_upgrades.push(kind);
        self.dispatcher.dispatch(&GameEvent::Purchase {
            item: kind.name().to_string(),
            quantity: 1,
            cost,
        });
        Ok(format!("{} upgrade installed ({:.2} EUR)", kind.name(), cost))
    }

    fn enable_nano_coating(&mut self) {
        if self.nano_coating_enabled {
            return;
        }
        self.nano_coating_enabled = true;
        self.catalog.enable_nano_coating();
    }

    // ---- pricing ---------------------------------------------------------

    pub fn set_pricing_mode(&mut self, mode: PricingMode) {
        self.pricing_mode = mode;
    }

    pub fn adjust_service_prices(&mut self, factor: f64) -> Result<()> {
        ensure!(
            factor.is_finite() && factor > 0.0,
            "the price factor must be positive"
        );
        self.catalog.apply_price_factor(factor);
        Ok(())
    }

    // ---- accessors -------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn total_cars_served(&self) -> u64 {
        self.total_cars_served
    }

    pub fn average_satisfaction(&self) -> f64 {
        self.reputation.avg_satisfaction()
    }

    pub fn reputation_score(&self) -> f64 {
        self.reputation.score()
    }

    pub fn current_demand(&self) -> i32 {
        self.queue.demand()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn lost_customers(&self) -> u64 {
        self.queue.lost()
    }

    pub fn queue_status(&self) -> String {
        self.queue.to_string()
    }

    pub fn bay_count(&self) -> usize {
        self.bays.len()
    }

    pub fn bays(&self) -> &[WashBay] {
        self.bays.bays()
    }

    pub fn total_bays_created(&self) -> u32 {
        self.bays.total_created()
    }

    pub fn service_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn services(&self) -> &[ServiceDefinition] {
        self.catalog.services()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn now_minute(&self) -> i32 {
        self.now_minute
    }

    pub fn opening_minute(&self) -> i32 {
        self.opening_minute
    }

    pub fn closing_minute(&self) -> i32 {
        self.closing_minute
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    pub fn comfort_bonus(&self) -> f64 {
        self.comfort_bonus
    }

    pub fn pending_demand_bonus(&self) -> i32 {
        self.pending_demand_bonus
    }

    pub fn pricing_mode(&self) -> PricingMode {
        self.pricing_mode
    }

    pub fn purchased_upgrades(&self) -> &[UpgradeKind] {
        &self.purchased_upgrades
    }

    pub fn reports(&self) -> &[DailyReport] {
        &self.reports
    }
}
