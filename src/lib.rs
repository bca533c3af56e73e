pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{FileOrderStore, JsonCatalogStore, LocalStorage};
pub use crate::config::PricingConfig;
pub use crate::core::{
    audit::{audit_catalog, AuditReport},
    catalog::{AddonBindings, Catalog},
    catalog_service::CatalogService,
    checkout::CheckoutEngine,
    pricing::{price, PricingEngine},
};
pub use crate::domain::model::{
    CatalogRecord, Category, ColorMode, ComponentId, OrderReceipt, OrderSpecification,
    PricedOrder, PricedOrderLine, ServiceComponent, SizeMode,
};
pub use crate::utils::error::{PricingError, Result};
