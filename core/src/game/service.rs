use std::fmt;

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

use super::MAX_SERVICES;
use super::inventory::ResourceVector;

const EMBEDDED_SERVICES: &str = include_str!("../../../config/services.yaml");

const NANO_COATING_PRICE_FACTOR: f64 = 1.15;
const NANO_COATING_RATING_BONUS: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Basic,
    Deluxe,
    Wax,
    Eco,
}

impl ServiceCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::Basic => "Basic",
            ServiceCategory::Deluxe => "Deluxe",
            ServiceCategory::Wax => "Wax",
            ServiceCategory::Eco => "Eco",
        }
    }

    pub fn parse(token: &str) -> Result<Self> {
        match token.to_ascii_lowercase().as_str() {
            "basic" => Ok(ServiceCategory::Basic),
            "deluxe" => Ok(ServiceCategory::Deluxe),
            "wax" => Ok(ServiceCategory::Wax),
            "eco" => Ok(ServiceCategory::Eco),
            other => bail!("unknown service category: {other}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ServiceSpec {
    name: String,
    duration_minutes: i32,
    price: f64,
    #[serde(default)]
    needs: ResourceVector,
    rating: f64,
    category: ServiceCategory,
}

#[derive(Debug, Clone)]
pub struct ServiceDefinition {
    name: String,
    duration_minutes: i32,
    price: f64,
    needs: ResourceVector,
    rating: f64,
    category: ServiceCategory,
    base_price: f64,
    base_rating: f64,
    nano_coating: bool,
}

impl ServiceDefinition {
    pub fn new(
        name: impl Into<String>,
        duration_minutes: i32,
        price: f64,
        needs: ResourceVector,
        rating: f64,
        category: ServiceCategory,
    ) -> Result<Self> {
        let name = name.into();
        ensure!(!name.trim().is_empty(), "service name must not be empty");
        ensure!(
            duration_minutes > 0,
            "service {name}: duration must be positive"
        );
        ensure!(
            price.is_finite() && price >= 0.0,
            "service {name}: price must be non-negative"
        );
        ensure!(
            (0.0..=5.0).contains(&rating),
            "service {name}: rating must lie in 0..=5"
        );
        ensure!(
            needs.water >= 0 && needs.shampoo >= 0 && needs.wax >= 0,
            "service {name}: consumable needs must be non-negative"
        );
        Ok(Self {
            name,
            duration_minutes,
            price,
            needs,
            rating,
            category,
            base_price: price,
            base_rating: rating,
            nano_coating: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn needs(&self) -> &ResourceVector {
        &self.needs
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn category(&self) -> ServiceCategory {
        self.category
    }

    pub fn is_premium(&self) -> bool {
        matches!(
            self.category,
            ServiceCategory::Deluxe | ServiceCategory::Wax
        )
    }

    pub fn nano_coating(&self) -> bool {
        self.nano_coating
    }

    pub fn final_price_for_cars(&self, cars: i32) -> f64 {
        if cars <= 0 {
            return 0.0;
        }
        self.price * f64::from(cars)
    }

    /// Multiplicative price adjustment. Factors <= 0 are ignored; the base
    /// price moves with it so nano coating stays a relative markup.
    pub fn apply_price_factor(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.base_price = (self.base_price * factor).max(0.0);
        self.price = (self.price * factor).max(0.0);
    }

    /// Nano coating only exists on Wax services: +15% price, +0.2 rating
    /// capped at 5.0. Idempotent.
    pub(crate) fn set_nano_coating(&mut self, enabled: bool) {
        if self.category != ServiceCategory::Wax || enabled == self.nano_coating {
            return;
        }
        self.nano_coating = enabled;
        if enabled {
            self.price = self.base_price * NANO_COATING_PRICE_FACTOR;
            self.rating = (self.base_rating + NANO_COATING_RATING_BONUS).min(5.0);
        } else {
            self.price = self.base_price;
            self.rating = self.base_rating;
        }
    }
}

impl fmt::Display for ServiceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}min {:.2} EUR rating={:.1} (W={} S={} X={})",
            self.name,
            self.category.label(),
            self.duration_minutes,
            self.price,
            self.rating,
            self.needs.water,
            self.needs.shampoo,
            self.needs.wax,
        )?;
        if self.nano_coating {
            write!(f, " nano=ON")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    services: Vec<ServiceDefinition>,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_embedded() -> Result<Self> {
        let specs: Vec<ServiceSpec> = serde_yaml::from_str(EMBEDDED_SERVICES)
            .context("failed to parse the embedded service catalog")?;
        let mut catalog = Self::new();
        for spec in specs {
            let definition = ServiceDefinition::new(
                spec.name,
                spec.duration_minutes,
                spec.price,
                spec.needs,
                spec.rating,
                spec.category,
            )?;
            catalog.add(definition)?;
        }
        Ok(catalog)
    }

    pub fn add(&mut self, definition: ServiceDefinition) -> Result<()> {
        ensure!(
            self.services.len() < MAX_SERVICES,
            "the service catalog is full ({MAX_SERVICES} entries)"
        );
        ensure!(
            self.find(definition.name()).is_none(),
            "a service named {} already exists",
            definition.name()
        );
        self.services.push(definition);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&ServiceDefinition> {
        self.services
            .iter()
            .find(|service| service.name.eq_ignore_ascii_case(name))
    }

    pub(crate) fn find_mut(&mut self, name: &str) -> Option<&mut ServiceDefinition> {
        self.services
            .iter_mut()
            .find(|service| service.name.eq_ignore_ascii_case(name))
    }

    pub fn services(&self) -> &[ServiceDefinition] {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn apply_price_factor(&mut self, factor: f64) {
        for service in &mut self.services {
            service.apply_price_factor(factor);
        }
    }

    pub(crate) fn enable_nano_coating(&mut self) {
        for service in &mut self.services {
            service.set_nano_coating(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wax_service() -> ServiceDefinition {
        ServiceDefinition::new(
            "Wax",
            25,
            16.0,
            ResourceVector::new(60, 20, 50),
            4.6,
            ServiceCategory::Wax,
        )
        .unwrap()
    }

    #[test]
    fn embedded_catalog_parses_and_covers_all_categories() {
        let catalog = ServiceCatalog::from_embedded().unwrap();
        assert!(catalog.len() >= 4);
        for category in [
            ServiceCategory::Basic,
            ServiceCategory::Deluxe,
            ServiceCategory::Wax,
            ServiceCategory::Eco,
        ] {
            assert!(
                catalog
                    .services()
                    .iter()
                    .any(|service| service.category() == category),
                "missing embedded service for {}",
                category.label()
            );
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = ServiceCatalog::from_embedded().unwrap();
        assert!(catalog.find("basic").is_some());
        assert!(catalog.find("BASIC").is_some());
        assert!(catalog.find("no-such-service").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let mut catalog = ServiceCatalog::new();
        catalog.add(wax_service()).unwrap();
        let duplicate = ServiceDefinition::new(
            "WAX",
            20,
            10.0,
            ResourceVector::default(),
            4.0,
            ServiceCategory::Wax,
        )
        .unwrap();
        assert!(catalog.add(duplicate).is_err());
    }

    #[test]
    fn price_factor_ignores_non_positive_values() {
        let mut service = wax_service();
        service.apply_price_factor(0.0);
        service.apply_price_factor(-2.0);
        assert_eq!(service.price(), 16.0);
        service.apply_price_factor(1.10);
        assert!((service.price() - 17.6).abs() < 1e-9);
    }

    #[test]
    fn nano_coating_marks_up_wax_and_is_idempotent() {
        let mut service = wax_service();
        service.set_nano_coating(true);
        assert!((service.price() - 16.0 * 1.15).abs() < 1e-9);
        assert!((service.rating() - 4.8).abs() < 1e-9);
        service.set_nano_coating(true);
        assert!((service.price() - 16.0 * 1.15).abs() < 1e-9);
    }

    #[test]
    fn nano_coating_does_not_touch_other_categories() {
        let mut basic = ServiceDefinition::new(
            "Basic",
            20,
            8.5,
            ResourceVector::new(80, 40, 0),
            3.6,
            ServiceCategory::Basic,
        )
        .unwrap();
        basic.set_nano_coating(true);
        assert!(!basic.nano_coating());
        assert_eq!(basic.price(), 8.5);
    }

    #[test]
    fn rating_is_capped_at_five_with_nano_coating() {
        let mut service = ServiceDefinition::new(
            "Showroom Wax",
            30,
            20.0,
            ResourceVector::new(60, 20, 60),
            4.95,
            ServiceCategory::Wax,
        )
        .unwrap();
        service.set_nano_coating(true);
        assert!(service.rating() <= 5.0);
    }
}
