mod game;

pub use game::{
    BayConfig, CarWash, CustomerArchetype, DailyReport, EventDispatcher, EventJournal,
    EventObserver, GameBuilder, GameEvent, Inventory, PricingMode, ResourceVector, ServiceCatalog,
    ServiceCategory, ServiceDefinition, ServiceSales, Statistics, SupplyItem, UpgradeKind,
    WashBay, WashConfig,
};
