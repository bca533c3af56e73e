pub mod audit;
pub mod catalog;
pub mod catalog_service;
pub mod checkout;
pub mod pricing;

pub use crate::domain::model::{OrderReceipt, OrderSpecification, PricedOrder};
pub use crate::domain::ports::{CatalogStore, ConfigProvider, OrderStore, Storage};
pub use crate::utils::error::Result;
