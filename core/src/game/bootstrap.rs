use anyhow::{Result, ensure};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::bay::{BayPool, WashBay};
use super::inventory::{Inventory, ResourceVector};
use super::service::{ServiceCatalog, ServiceCategory};
use super::state::CarWash;
use super::{MAX_DEMAND, MIN_DEMAND};

fn default_capabilities() -> Vec<ServiceCategory> {
    vec![ServiceCategory::Basic, ServiceCategory::Eco]
}

fn default_demand() -> i32 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BayConfig {
    pub id: u32,
    pub label: String,
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<ServiceCategory>,
}

/// Operator-editable setup, deserialized from `config/carwash.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WashConfig {
    pub name: String,
    pub opening_minute: i32,
    pub closing_minute: i32,
    #[serde(default)]
    pub starting_cash: f64,
    pub inventory: ResourceVector,
    pub bays: Vec<BayConfig>,
    #[serde(default = "default_demand")]
    pub initial_demand: i32,
}

pub struct GameBuilder {
    config: WashConfig,
    catalog: Option<ServiceCatalog>,
    rng: StdRng,
}

impl GameBuilder {
    pub fn new(config: WashConfig) -> Self {
        Self {
            config,
            catalog: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_catalog(mut self, catalog: ServiceCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn build(self) -> Result<CarWash> {
        let GameBuilder {
            config,
            catalog,
            rng,
        } = self;
        validate(&config)?;

        let catalog = match catalog {
            Some(catalog) => catalog,
            None => ServiceCatalog::from_embedded()?,
        };

        let mut bays = BayPool::new();
        for bay in &config.bays {
            bays.add(WashBay::new(
                bay.id,
                bay.label.clone(),
                config.opening_minute,
                bay.capabilities.iter().copied(),
            ))?;
        }

        let inventory = Inventory::new(config.inventory);
        Ok(CarWash::assemble(config, catalog, bays, inventory, rng))
    }
}

fn validate(config: &WashConfig) -> Result<()> {
    ensure!(!config.name.trim().is_empty(), "the wash needs a name");
    ensure!(
        config.opening_minute >= 0,
        "opening minute must not be negative"
    );
    ensure!(
        config.opening_minute < config.closing_minute,
        "opening time must come before closing time"
    );
    ensure!(
        config.starting_cash.is_finite() && config.starting_cash >= 0.0,
        "starting cash must be non-negative"
    );
    ensure!(
        (MIN_DEMAND..=MAX_DEMAND).contains(&config.initial_demand),
        "initial demand must lie in {MIN_DEMAND}..={MAX_DEMAND}"
    );
    ensure!(!config.bays.is_empty(), "at least one bay is required");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> WashConfig {
        serde_json::from_str::<WashConfig>(
            r#"{
            "name": "Suds & Shine",
            "opening_minute": 480,
            "closing_minute": 1080,
            "starting_cash": 250.0,
            "inventory": { "water": 5000, "shampoo": 3000, "wax": 2000 },
            "bays": [
                { "id": 1, "label": "Bay1" },
                { "id": 2, "label": "Bay2", "capabilities": ["basic", "eco", "wax"] }
            ]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn config_defaults_fill_in() {
        let config = sample_config();
        assert_eq!(config.initial_demand, 2);
        assert_eq!(
            config.bays[0].capabilities,
            vec![ServiceCategory::Basic, ServiceCategory::Eco]
        );
    }

    #[test]
    fn builder_assembles_a_game_from_config() {
        let game = GameBuilder::new(sample_config())
            .with_rng(StdRng::seed_from_u64(1))
            .build()
            .unwrap();
        assert_eq!(game.bay_count(), 2);
        assert_eq!(game.service_count(), 4);
        assert!((game.cash() - 250.0).abs() < f64::EPSILON);
        assert_eq!(game.current_demand(), 2);
        assert_eq!(game.now_minute(), 480);
    }

    #[test]
    fn inverted_hours_are_rejected() {
        let mut config = sample_config();
        config.closing_minute = config.opening_minute;
        assert!(GameBuilder::new(config).build().is_err());
    }

    #[test]
    fn a_wash_without_bays_is_rejected() {
        let mut config = sample_config();
        config.bays.clear();
        assert!(GameBuilder::new(config).build().is_err());
    }
}
