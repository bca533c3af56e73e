use crate::core::audit::{audit_catalog, AuditReport, FindingLevel};
use crate::core::catalog_service::CatalogService;
use crate::core::pricing::PricingEngine;
use crate::domain::model::{OrderReceipt, OrderSpecification, PricedOrder};
use crate::domain::ports::{CatalogStore, OrderStore};
use crate::utils::error::Result;
use crate::utils::money::format_rupiah;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Snapshot the catalog, price the order, and hand the receipt to the order store.
/// Either the whole order is stored or nothing is.
pub struct CheckoutEngine<C: CatalogStore, O: OrderStore> {
    catalog: CatalogService<C>,
    orders: O,
    pricing: PricingEngine,
    audit_on_checkout: bool,
}

impl<C: CatalogStore, O: OrderStore> CheckoutEngine<C, O> {
    pub fn new(catalog: CatalogService<C>, orders: O, pricing: PricingEngine) -> Self {
        Self {
            catalog,
            orders,
            pricing,
            audit_on_checkout: false,
        }
    }

    /// Run the catalog audit before every checkout and log its findings.
    pub fn with_catalog_audit(mut self, enabled: bool) -> Self {
        self.audit_on_checkout = enabled;
        self
    }

    pub fn catalog(&self) -> &CatalogService<C> {
        &self.catalog
    }

    pub async fn audit(&self) -> Result<AuditReport> {
        let catalog = self.catalog.snapshot().await?;
        Ok(audit_catalog(&catalog, self.pricing.bindings()))
    }

    /// Prices without persisting anything.
    pub async fn quote(&self, spec: &OrderSpecification) -> Result<PricedOrder> {
        let catalog = self.catalog.snapshot().await?;
        let order = self.pricing.price(spec, &catalog)?;

        if order.is_degraded() {
            tracing::warn!(
                "Quote priced with {} missing add-on(s); check the catalog audit",
                order.soft_misses.len()
            );
        }
        Ok(order)
    }

    pub async fn checkout(&self, spec: OrderSpecification) -> Result<OrderReceipt> {
        tracing::info!(
            "Checkout: paper {}, {} pages x {} copies",
            spec.paper_component_id(),
            spec.page_count(),
            spec.copies()
        );

        if self.audit_on_checkout {
            let report = self.audit().await?;
            for finding in report.findings.iter().filter(|f| f.level != FindingLevel::Info) {
                tracing::warn!("Catalog audit: {}", finding.message);
            }
        }

        let order = self.quote(&spec).await?;
        let created_at = Utc::now();
        let receipt = OrderReceipt {
            order_id: next_order_id(created_at),
            created_at,
            specification: spec,
            order,
        };

        let location = self.orders.save_order(&receipt).await?;
        tracing::info!(
            "Order {} stored at {} (total {})",
            receipt.order_id,
            location,
            format_rupiah(receipt.order.grand_total)
        );

        Ok(receipt)
    }
}

// ORD-20260101093000-9f1c2a7b
// 隨機後綴，避免多個行程共用同一個 data_dir 時撞號
fn next_order_id(at: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD-{}-{}", at.format("%Y%m%d%H%M%S"), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::default_catalog_records;
    use crate::domain::model::{CatalogRecord, ColorMode, ComponentId, SizeMode};
    use crate::utils::error::PricingError;
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

    #[derive(Clone, Default)]
    struct MockOrderStore {
        orders: Arc<Mutex<Vec<OrderReceipt>>>,
    }

    #[async_trait]
    impl OrderStore for MockOrderStore {
        async fn save_order(&self, receipt: &OrderReceipt) -> Result<String> {
            self.orders.lock().await.push(receipt.clone());
            Ok(format!("memory://{}", receipt.order_id))
        }
    }

    fn engine(records: Vec<CatalogRecord>) -> (CheckoutEngine<MockCatalogStore, MockOrderStore>, MockOrderStore) {
        let store = MockCatalogStore {
            records: Arc::new(Mutex::new(records)),
        };
        let orders = MockOrderStore::default();
        let engine = CheckoutEngine::new(
            CatalogService::new(store, true),
            orders.clone(),
            PricingEngine::default(),
        );
        (engine, orders)
    }

    #[tokio::test]
    async fn test_checkout_stores_receipt() {
        let (engine, orders) = engine(default_catalog_records());
        let spec = OrderSpecification::new(ComponentId(2), 5, 2)
            .unwrap()
            .with_size(SizeMode::F4)
            .with_color(ColorMode::FullColor)
            .with_finishing(ComponentId(9));

        let receipt = engine.checkout(spec).await.unwrap();

        // (2000 + 200 + 1000) * 10 + 3000 * 2
        assert_eq!(receipt.order.grand_total, 38_000);
        assert!(receipt.order_id.starts_with("ORD-"));

        let stored = orders.orders.lock().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], receipt);
    }

    #[tokio::test]
    async fn test_failed_checkout_stores_nothing() {
        let (engine, orders) = engine(default_catalog_records());
        let spec = OrderSpecification::new(ComponentId(99), 1, 1).unwrap();

        let err = engine.checkout(spec).await.unwrap_err();
        assert!(matches!(err, PricingError::ComponentNotFound { .. }));
        assert!(orders.orders.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_quote_does_not_store() {
        let (engine, orders) = engine(vec![]);
        let spec = OrderSpecification::new(ComponentId(1), 10, 1).unwrap();

        let order = engine.quote(&spec).await.unwrap();
        assert_eq!(order.grand_total, 5_000);
        assert!(orders.orders.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_order_ids_are_unique() {
        let (engine, orders) = engine(default_catalog_records());
        for _ in 0..20 {
            engine
                .checkout(OrderSpecification::new(ComponentId(1), 1, 1).unwrap())
                .await
                .unwrap();
        }

        let stored = orders.orders.lock().await;
        let ids: std::collections::HashSet<&str> =
            stored.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test]
    async fn test_audit_on_checkout_reports_but_does_not_block() {
        let (engine, orders) = engine(vec![CatalogRecord::new(1, "HVS", 500, "kertas")]);
        let engine = engine.with_catalog_audit(true);

        let report = engine.audit().await.unwrap();
        assert_eq!(report.at_level(FindingLevel::Warning).count(), 3);

        let receipt = engine
            .checkout(OrderSpecification::new(ComponentId(1), 2, 1).unwrap().with_size(SizeMode::A3))
            .await
            .unwrap();
        assert_eq!(receipt.order.grand_total, 1_000);
        assert_eq!(receipt.order.soft_misses.len(), 1);
        assert_eq!(orders.orders.lock().await.len(), 1);
    }

    #[test]
    fn test_order_id_shape() {
        let at = DateTime::parse_from_rfc3339("2026-01-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let id = next_order_id(at);

        assert!(id.starts_with("ORD-20260101093000-"), "{}", id);
        let suffix = id.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, next_order_id(at));
    }
}
