use crate::domain::model::{CatalogRecord, OrderReceipt};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Mode fragments used to bind size and color add-ons to catalog entries.
pub trait BindingProvider: Send + Sync {
    fn f4_fragment(&self) -> &str;
    fn a3_fragment(&self) -> &str;
    fn full_color_fragment(&self) -> &str;
}

pub trait ConfigProvider: BindingProvider {
    fn catalog_path(&self) -> &str;
    fn data_dir(&self) -> &str;
    fn seed_defaults(&self) -> bool;
    fn output_formats(&self) -> &[String];
}

/// Source of the raw catalog rows, owned by the catalog administrator.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn load_records(&self) -> Result<Vec<CatalogRecord>>;
    async fn save_records(&self, records: &[CatalogRecord]) -> Result<()>;
}

/// Durable home of priced orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn save_order(&self, receipt: &OrderReceipt) -> Result<String>;
}
