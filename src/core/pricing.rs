use crate::core::catalog::{AddonBindings, Catalog};
use crate::domain::model::{
    AddonMiss, Category, OrderSpecification, PricedOrder, PricedOrderLine, PricingAxis,
    ServiceComponent,
};
use crate::utils::error::{PricingError, Result};

/// Stateless pricing over an immutable catalog snapshot.
///
/// Paper, size and color are charged per physical sheet (`page_count * copies`);
/// finishing is charged once per assembled copy.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    bindings: AddonBindings,
}

impl PricingEngine {
    pub fn new(bindings: AddonBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &AddonBindings {
        &self.bindings
    }

    pub fn price(&self, spec: &OrderSpecification, catalog: &Catalog) -> Result<PricedOrder> {
        // 必選項目：找不到就整筆失敗
        let paper = catalog.find_in_category(spec.paper_component_id(), Category::Paper)?;
        let finishing = spec
            .finishing_component_id()
            .map(|id| catalog.find_in_category(id, Category::Finishing))
            .transpose()?;

        let mut soft_misses = Vec::new();
        let size = self.resolve_addon(
            catalog,
            Category::SizeAddon,
            PricingAxis::Size,
            spec.size_mode().as_str(),
            self.bindings.size_fragment(spec.size_mode()),
            &mut soft_misses,
        );
        let color = self.resolve_addon(
            catalog,
            Category::ColorAddon,
            PricingAxis::Color,
            spec.color_mode().as_str(),
            self.bindings.color_fragment(spec.color_mode()),
            &mut soft_misses,
        );

        let total_sheets = spec.total_sheets();
        let copies = u64::from(spec.copies());

        let size_markup = size.map_or(0, |c| c.unit_price);
        let color_markup = color.map_or(0, |c| c.unit_price);
        let per_sheet_price = paper
            .unit_price
            .checked_add(size_markup)
            .and_then(|p| p.checked_add(color_markup))
            .ok_or_else(|| overflow("per-sheet price"))?;
        let print_cost = per_sheet_price
            .checked_mul(total_sheets)
            .ok_or_else(|| overflow("print cost"))?;
        let finishing_cost = finishing
            .map_or(0, |c| c.unit_price)
            .checked_mul(copies)
            .ok_or_else(|| overflow("finishing cost"))?;
        let grand_total = print_cost
            .checked_add(finishing_cost)
            .ok_or_else(|| overflow("grand total"))?;

        let mut lines = vec![PricedOrderLine::new(paper, PricingAxis::Paper, total_sheets)?];
        if let Some(size) = size.filter(|c| c.unit_price > 0) {
            lines.push(PricedOrderLine::new(size, PricingAxis::Size, total_sheets)?);
        }
        if let Some(color) = color.filter(|c| c.unit_price > 0) {
            lines.push(PricedOrderLine::new(color, PricingAxis::Color, total_sheets)?);
        }
        if let Some(finishing) = finishing {
            lines.push(PricedOrderLine::new(finishing, PricingAxis::Finishing, copies)?);
        }

        debug_assert_eq!(
            lines.iter().map(|l| l.line_total).sum::<u64>(),
            grand_total
        );

        tracing::debug!(
            "Priced {} sheets x {} per sheet + finishing {} = {}",
            total_sheets,
            per_sheet_price,
            finishing_cost,
            grand_total
        );

        Ok(PricedOrder {
            lines,
            grand_total,
            total_sheets,
            soft_misses,
        })
    }

    fn resolve_addon<'c>(
        &self,
        catalog: &'c Catalog,
        category: Category,
        axis: PricingAxis,
        mode: &str,
        fragment: Option<&str>,
        soft_misses: &mut Vec<AddonMiss>,
    ) -> Option<&'c ServiceComponent> {
        let fragment = fragment?;

        let found = catalog.bound_addons(category, fragment).into_iter().next();
        if found.is_none() {
            tracing::warn!(
                "No {} add-on matches '{}' for mode {}; pricing it at zero",
                category,
                fragment,
                mode
            );
            soft_misses.push(AddonMiss {
                axis,
                mode: mode.to_string(),
                fragment: fragment.to_string(),
            });
        }
        found
    }
}

/// Prices `spec` against `catalog` with the default add-on bindings.
pub fn price(spec: &OrderSpecification, catalog: &Catalog) -> Result<PricedOrder> {
    PricingEngine::default().price(spec, catalog)
}

fn overflow(context: &str) -> PricingError {
    PricingError::AmountOverflow {
        context: context.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CatalogRecord, ColorMode, ComponentId, SizeMode};
    use std::sync::Arc;

    fn shop_catalog() -> Catalog {
        Catalog::from_records(vec![
            CatalogRecord::new(1, "HVS", 500, "paper"),
            CatalogRecord::new(2, "Ukuran A3", 2000, "size_addon"),
            CatalogRecord::new(3, "Warna", 1000, "color_addon"),
            CatalogRecord::new(4, "Staples", 200, "finishing"),
        ])
        .unwrap()
    }

    fn full_spec(page_count: i64, copies: i64) -> OrderSpecification {
        OrderSpecification::new(ComponentId(1), page_count, copies)
            .unwrap()
            .with_size(SizeMode::A3)
            .with_color(ColorMode::FullColor)
            .with_finishing(ComponentId(4))
    }

    #[test]
    fn test_full_order() {
        let order = price(&full_spec(10, 3), &shop_catalog()).unwrap();

        assert_eq!(order.total_sheets, 30);
        assert_eq!(order.grand_total, 105_600);
        assert!(order.soft_misses.is_empty());

        let quantities: Vec<u64> = order.lines.iter().map(|l| l.quantity).collect();
        assert_eq!(quantities, vec![30, 30, 30, 3]);

        let axes: Vec<PricingAxis> = order.lines.iter().map(|l| l.axis).collect();
        assert_eq!(
            axes,
            vec![
                PricingAxis::Paper,
                PricingAxis::Size,
                PricingAxis::Color,
                PricingAxis::Finishing
            ]
        );
        assert_eq!(order.line_for(PricingAxis::Finishing).unwrap().line_total, 600);
    }

    #[test]
    fn test_missing_size_addon_degrades_to_zero() {
        let catalog = Catalog::from_records(vec![
            CatalogRecord::new(1, "HVS", 500, "paper"),
            CatalogRecord::new(3, "Warna", 1000, "color_addon"),
            CatalogRecord::new(4, "Staples", 200, "finishing"),
        ])
        .unwrap();

        let order = price(&full_spec(10, 3), &catalog).unwrap();

        assert_eq!(order.grand_total, 45_600);
        assert_eq!(order.lines.len(), 3);
        assert!(order.line_for(PricingAxis::Size).is_none());
        assert_eq!(order.soft_misses.len(), 1);
        assert_eq!(order.soft_misses[0].axis, PricingAxis::Size);
        assert_eq!(order.soft_misses[0].fragment, "a3");
    }

    #[test]
    fn test_soft_miss_equals_unselected_mode() {
        let catalog = Catalog::from_records(vec![CatalogRecord::new(1, "HVS", 500, "kertas")])
            .unwrap();
        let base = OrderSpecification::new(ComponentId(1), 4, 2).unwrap();

        let plain = price(&base, &catalog).unwrap();
        let asked = price(
            &base.clone().with_size(SizeMode::F4).with_color(ColorMode::FullColor),
            &catalog,
        )
        .unwrap();

        assert_eq!(plain.grand_total, asked.grand_total);
        assert_eq!(plain.lines, asked.lines);
        assert_eq!(asked.soft_misses.len(), 2);
    }

    #[test]
    fn test_unknown_paper_is_fatal() {
        let spec = OrderSpecification::new(ComponentId(99), 10, 3).unwrap();
        let err = price(&spec, &shop_catalog()).unwrap_err();
        assert!(matches!(err, PricingError::ComponentNotFound { id } if id == ComponentId(99)));
    }

    #[test]
    fn test_unknown_finishing_is_fatal() {
        let spec = OrderSpecification::new(ComponentId(1), 10, 3)
            .unwrap()
            .with_finishing(ComponentId(77));
        assert!(matches!(
            price(&spec, &shop_catalog()),
            Err(PricingError::ComponentNotFound { id }) if id == ComponentId(77)
        ));
    }

    #[test]
    fn test_paper_id_pointing_at_addon_is_not_found() {
        let spec = OrderSpecification::new(ComponentId(2), 1, 1).unwrap();
        assert!(matches!(
            price(&spec, &shop_catalog()),
            Err(PricingError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn test_paper_only_when_nothing_else_selected() {
        let spec = OrderSpecification::new(ComponentId(1), 10, 3).unwrap();
        let order = price(&spec, &shop_catalog()).unwrap();

        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].axis, PricingAxis::Paper);
        assert_eq!(order.grand_total, 15_000);
    }

    #[test]
    fn test_zero_priced_addon_is_omitted_without_miss() {
        let catalog = Catalog::from_records(vec![
            CatalogRecord::new(1, "HVS", 500, "paper"),
            CatalogRecord::new(2, "Ukuran F4", 0, "ukuran"),
        ])
        .unwrap();
        let spec = OrderSpecification::new(ComponentId(1), 2, 2)
            .unwrap()
            .with_size(SizeMode::F4);

        let order = price(&spec, &catalog).unwrap();
        assert_eq!(order.lines.len(), 1);
        assert!(order.soft_misses.is_empty());
    }

    #[test]
    fn test_monotonic_in_copies_and_pages() {
        let catalog = shop_catalog();
        let per_sheet = 3_500;

        for pages in 1..=5 {
            for copies in 1..=5 {
                let here = price(&full_spec(pages, copies), &catalog).unwrap();
                let more_copies = price(&full_spec(pages, copies + 1), &catalog).unwrap();
                let more_pages = price(&full_spec(pages + 1, copies), &catalog).unwrap();

                assert_eq!(
                    more_copies.grand_total - here.grand_total,
                    200 + per_sheet * pages as u64
                );
                assert_eq!(
                    more_pages.grand_total - here.grand_total,
                    per_sheet * copies as u64
                );
            }
        }
    }

    #[test]
    fn test_line_totals_sum_to_grand_total() {
        let order = price(&full_spec(7, 11), &shop_catalog()).unwrap();
        let sum: u64 = order.lines.iter().map(|l| l.line_total).sum();
        assert_eq!(sum, order.grand_total);
        for line in &order.lines {
            assert_eq!(line.line_total, line.quantity * line.unit_price);
        }
    }

    #[test]
    fn test_sole_color_addon_is_charged_under_default_bindings() {
        let catalog = Catalog::from_records(vec![
            CatalogRecord::new(1, "HVS", 500, "paper"),
            CatalogRecord::new(2, "Full colour print", 800, "color"),
        ])
        .unwrap();
        let spec = OrderSpecification::new(ComponentId(1), 1, 1)
            .unwrap()
            .with_color(ColorMode::FullColor);

        let order = price(&spec, &catalog).unwrap();
        assert_eq!(order.grand_total, 1_300);
        assert!(order.soft_misses.is_empty());
    }

    #[test]
    fn test_custom_bindings() {
        let catalog = Catalog::from_records(vec![
            CatalogRecord::new(1, "HVS", 500, "paper"),
            CatalogRecord::new(2, "Full colour print", 800, "color"),
            CatalogRecord::new(3, "Spot color", 300, "color"),
        ])
        .unwrap();
        let spec = OrderSpecification::new(ComponentId(1), 1, 1)
            .unwrap()
            .with_color(ColorMode::FullColor);

        let default_engine = PricingEngine::default();
        assert_eq!(default_engine.price(&spec, &catalog).unwrap().grand_total, 500);

        let engine = PricingEngine::new(AddonBindings {
            full_color: "colour".to_string(),
            ..AddonBindings::default()
        });
        assert_eq!(engine.price(&spec, &catalog).unwrap().grand_total, 1_300);
    }

    #[test]
    fn test_overflow_is_reported() {
        let catalog = Catalog::from_records(vec![CatalogRecord::new(1, "Gold", i64::MAX, "paper")])
            .unwrap();
        let spec = OrderSpecification::new(ComponentId(1), 4, 4).unwrap();
        assert!(matches!(
            price(&spec, &catalog),
            Err(PricingError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_deterministic_across_threads() {
        let catalog = Arc::new(shop_catalog());
        let spec = full_spec(10, 3);
        let expected = price(&spec, &catalog).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                let spec = spec.clone();
                std::thread::spawn(move || price(&spec, &catalog).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
