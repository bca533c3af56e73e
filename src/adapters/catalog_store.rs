use crate::domain::model::CatalogRecord;
use crate::domain::ports::{CatalogStore, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Catalog rows kept as a JSON array in a single file.
/// A file that does not exist yet reads as an empty catalog.
pub struct JsonCatalogStore<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> JsonCatalogStore<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl<S: Storage> CatalogStore for JsonCatalogStore<S> {
    async fn load_records(&self) -> Result<Vec<CatalogRecord>> {
        if !self.storage.exists(&self.path).await {
            tracing::debug!("Catalog file {} not found, treating as empty", self.path);
            return Ok(Vec::new());
        }

        let data = self.storage.read_file(&self.path).await?;
        let records: Vec<CatalogRecord> = serde_json::from_slice(&data)?;
        tracing::debug!("Read {} catalog records from {}", records.len(), self.path);
        Ok(records)
    }

    async fn save_records(&self, records: &[CatalogRecord]) -> Result<()> {
        let data = serde_json::to_vec_pretty(records)?;
        self.storage.write_file(&self.path, &data).await
    }
}
