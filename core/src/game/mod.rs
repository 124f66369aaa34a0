mod bay;
mod bootstrap;
mod constants;
pub(crate) use constants::*;
mod customer;
mod demand;
mod events;
mod incident;
mod inventory;
mod pricing;
mod queue;
mod report;
mod reputation;
mod service;
mod state;
mod upgrade;

pub use bay::WashBay;
pub use bootstrap::{BayConfig, GameBuilder, WashConfig};
pub use customer::CustomerArchetype;
pub use events::{EventDispatcher, EventJournal, EventObserver, GameEvent};
pub use inventory::{Inventory, ResourceVector};
pub use pricing::PricingMode;
pub use report::{DailyReport, ServiceSales, Statistics};
pub use service::{ServiceCatalog, ServiceCategory, ServiceDefinition};
pub use state::{CarWash, SupplyItem};
pub use upgrade::UpgradeKind;
