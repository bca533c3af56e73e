use crate::core::catalog::{default_catalog_records, validate_price, Catalog};
use crate::domain::model::ComponentId;
use crate::domain::ports::CatalogStore;
use crate::utils::error::{PricingError, Result};

/// Administrative access to a [`CatalogStore`]. Every read hands out a fresh,
/// fully materialized snapshot.
pub struct CatalogService<C: CatalogStore> {
    store: C,
    seed_defaults: bool,
}

impl<C: CatalogStore> CatalogService<C> {
    pub fn new(store: C, seed_defaults: bool) -> Self {
        Self {
            store,
            seed_defaults,
        }
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    pub async fn snapshot(&self) -> Result<Catalog> {
        let mut records = self.store.load_records().await?;

        if records.is_empty() && self.seed_defaults {
            tracing::info!("Catalog store is empty, seeding the default price list");
            records = default_catalog_records();
            self.store.save_records(&records).await?;
        }

        let catalog = Catalog::from_records(records)?;
        tracing::debug!("Loaded catalog snapshot with {} components", catalog.len());
        Ok(catalog)
    }

    /// Seeds the default price list when the store is empty. Returns whether it did.
    pub async fn seed(&self) -> Result<bool> {
        if !self.store.load_records().await?.is_empty() {
            return Ok(false);
        }
        self.store.save_records(&default_catalog_records()).await?;
        Ok(true)
    }

    /// Changes one price and stores it. Inactive rows can be repriced too.
    pub async fn update_price(&self, id: ComponentId, price: i64) -> Result<Catalog> {
        // inactive rows are skipped by from_records, so the price is checked here
        validate_price(id, price)?;
        let mut records = self.store.load_records().await?;

        let record = records
            .iter_mut()
            .find(|r| r.id == id.0)
            .ok_or(PricingError::ComponentNotFound { id })?;
        let old_price = record.price;
        record.price = price;

        // validate the whole list before anything is written
        let catalog = Catalog::from_records(records.clone())?;
        self.store.save_records(&records).await?;

        tracing::info!("Price of component {} changed from {} to {}", id, old_price, price);
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CatalogRecord;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockCatalogStore {
        records: Arc<Mutex<Vec<CatalogRecord>>>,
    }

    #[async_trait]
    impl CatalogStore for MockCatalogStore {
        async fn load_records(&self) -> Result<Vec<CatalogRecord>> {
            Ok(self.records.lock().await.clone())
        }

        async fn save_records(&self, records: &[CatalogRecord]) -> Result<()> {
            *self.records.lock().await = records.to_vec();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_snapshot_seeds_empty_store() {
        let store = MockCatalogStore::default();
        let service = CatalogService::new(store.clone(), true);

        let catalog = service.snapshot().await.unwrap();
        assert_eq!(catalog.len(), 11);
        assert_eq!(store.records.lock().await.len(), 11);
    }

    #[tokio::test]
    async fn test_snapshot_without_seeding() {
        let service = CatalogService::new(MockCatalogStore::default(), false);
        assert!(service.snapshot().await.unwrap().is_empty());
        assert!(service.seed().await.unwrap());
        assert!(!service.seed().await.unwrap());
    }

    #[tokio::test]
    async fn test_update_price() {
        let store = MockCatalogStore::default();
        let service = CatalogService::new(store.clone(), true);
        service.seed().await.unwrap();

        let catalog = service.update_price(ComponentId(1), 650).await.unwrap();
        assert_eq!(catalog.find_by_id(ComponentId(1)).unwrap().unit_price, 650);
        assert_eq!(store.records.lock().await[0].price, 650);
    }

    #[tokio::test]
    async fn test_update_price_rejects_bad_input_without_writing() {
        let store = MockCatalogStore::default();
        let service = CatalogService::new(store.clone(), true);
        service.seed().await.unwrap();

        assert!(service.update_price(ComponentId(1), -10).await.is_err());
        assert_eq!(store.records.lock().await[0].price, 500);

        assert!(matches!(
            service.update_price(ComponentId(404), 10).await,
            Err(PricingError::ComponentNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_price_rejects_negative_price_on_inactive_row() {
        let store = MockCatalogStore::default();
        store.records.lock().await.extend([
            CatalogRecord::new(1, "HVS", 500, "kertas"),
            CatalogRecord::new(2, "Laminating", 3000, "finishing").inactive(),
        ]);
        let service = CatalogService::new(store.clone(), false);

        assert!(matches!(
            service.update_price(ComponentId(2), -1).await,
            Err(PricingError::InvalidCatalogEntry { .. })
        ));
        assert_eq!(store.records.lock().await[1].price, 3000);

        // a valid price still goes through for inactive rows
        service.update_price(ComponentId(2), 3500).await.unwrap();
        assert_eq!(store.records.lock().await[1].price, 3500);
    }

    #[tokio::test]
    async fn test_old_snapshot_survives_price_update() {
        let service = CatalogService::new(MockCatalogStore::default(), true);
        let before = service.snapshot().await.unwrap();

        service.update_price(ComponentId(1), 900).await.unwrap();

        assert_eq!(before.find_by_id(ComponentId(1)).unwrap().unit_price, 500);
        let after = service.snapshot().await.unwrap();
        assert_eq!(after.find_by_id(ComponentId(1)).unwrap().unit_price, 900);
    }
}
