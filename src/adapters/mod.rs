// Adapters layer: concrete implementations of the domain ports.

pub mod catalog_store;
pub mod order_store;
pub mod storage;

pub use catalog_store::JsonCatalogStore;
pub use order_store::{FileOrderStore, OrderFormat};
pub use storage::LocalStorage;
