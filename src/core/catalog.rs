use crate::domain::model::{
    CatalogRecord, Category, ColorMode, ComponentId, ServiceComponent, SizeMode,
};
use crate::domain::ports::BindingProvider;
use crate::utils::error::{PricingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name fragments (or tags) that bind a size/color mode to its add-on component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddonBindings {
    pub f4: String,
    pub a3: String,
    pub full_color: String,
}

impl Default for AddonBindings {
    fn default() -> Self {
        Self {
            f4: "f4".to_string(),
            a3: "a3".to_string(),
            full_color: "warna".to_string(),
        }
    }
}

impl AddonBindings {
    pub fn from_provider<B: BindingProvider + ?Sized>(provider: &B) -> Self {
        Self {
            f4: provider.f4_fragment().to_string(),
            a3: provider.a3_fragment().to_string(),
            full_color: provider.full_color_fragment().to_string(),
        }
    }

    /// `None` for the standard size, which never looks anything up.
    pub fn size_fragment(&self, mode: SizeMode) -> Option<&str> {
        match mode {
            SizeMode::Standard => None,
            SizeMode::F4 => Some(&self.f4),
            SizeMode::A3 => Some(&self.a3),
        }
    }

    pub fn color_fragment(&self, mode: ColorMode) -> Option<&str> {
        match mode {
            ColorMode::Monochrome => None,
            ColorMode::FullColor => Some(&self.full_color),
        }
    }
}

impl BindingProvider for AddonBindings {
    fn f4_fragment(&self) -> &str {
        &self.f4
    }

    fn a3_fragment(&self) -> &str {
        &self.a3
    }

    fn full_color_fragment(&self) -> &str {
        &self.full_color
    }
}

/// An immutable snapshot of the priceable components, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    components: Vec<ServiceComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub count: usize,
    pub total: u64,
    pub average: u64,
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl Catalog {
    /// Validates raw rows and shapes them into a snapshot. Inactive rows are left out.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = CatalogRecord>,
    {
        let mut components = Vec::new();

        for record in records {
            if !record.is_active {
                tracing::debug!("Skipping inactive catalog entry {} ({})", record.id, record.name);
                continue;
            }
            components.push(shape_record(record)?);
        }

        Self::from_components(components)
    }

    pub fn from_components(components: Vec<ServiceComponent>) -> Result<Self> {
        let mut seen = HashSet::new();
        for component in &components {
            if !seen.insert(component.id) {
                return Err(PricingError::InvalidCatalogEntry {
                    id: component.id.to_string(),
                    reason: "duplicate component id".to_string(),
                });
            }
        }

        Ok(Self { components })
    }

    /// The shop's seeded price list.
    pub fn default_catalog() -> Result<Self> {
        Self::from_records(default_catalog_records())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[ServiceComponent] {
        &self.components
    }

    pub fn find_by_id(&self, id: ComponentId) -> Result<&ServiceComponent> {
        self.components
            .iter()
            .find(|c| c.id == id)
            .ok_or(PricingError::ComponentNotFound { id })
    }

    /// Like [`Catalog::find_by_id`], but an id that exists under another
    /// category is treated as not found.
    pub fn find_in_category(&self, id: ComponentId, category: Category) -> Result<&ServiceComponent> {
        match self.find_by_id(id)? {
            component if component.category == category => Ok(component),
            component => {
                tracing::debug!(
                    "Component {} is a {}, expected {}",
                    id,
                    component.category,
                    category
                );
                Err(PricingError::ComponentNotFound { id })
            }
        }
    }

    pub fn list_by_category(&self, category: Category) -> Vec<&ServiceComponent> {
        self.components
            .iter()
            .filter(|c| c.category == category)
            .collect()
    }

    /// All add-ons in `category` bound to `fragment`: explicit tag matches
    /// first, then case-insensitive name substring matches among untagged
    /// components. A tagged component only ever binds through its tag.
    pub fn addon_matches(&self, category: Category, fragment: &str) -> Vec<&ServiceComponent> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let candidates = self.list_by_category(category);
        let tagged: Vec<&ServiceComponent> = candidates
            .iter()
            .copied()
            .filter(|c| c.tag.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(&needle)))
            .collect();
        if !tagged.is_empty() {
            return tagged;
        }

        candidates
            .into_iter()
            .filter(|c| c.tag.is_none() && c.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Add-ons a mode resolves to at checkout. Same as [`Catalog::addon_matches`],
    /// except that a color mode with no match falls back to the only color
    /// add-on when the catalog has exactly one.
    pub fn bound_addons(&self, category: Category, fragment: &str) -> Vec<&ServiceComponent> {
        let matches = self.addon_matches(category, fragment);
        if !matches.is_empty() || category != Category::ColorAddon {
            return matches;
        }

        match self.list_by_category(category).as_slice() {
            [only] => vec![*only],
            _ => Vec::new(),
        }
    }

    /// Soft lookup. A miss is not an error; the caller prices the axis at zero.
    pub fn find_addon_by_name_fragment(
        &self,
        category: Category,
        fragment: &str,
    ) -> Option<&ServiceComponent> {
        self.addon_matches(category, fragment).into_iter().next()
    }

    /// Returns a new snapshot with one price changed; `self` is left untouched.
    pub fn with_price(&self, id: ComponentId, price: i64) -> Result<Catalog> {
        let unit_price = validate_price(id, price)?;
        self.find_by_id(id)?;

        let components = self
            .components
            .iter()
            .map(|c| {
                let mut c = c.clone();
                if c.id == id {
                    c.unit_price = unit_price;
                }
                c
            })
            .collect();

        Ok(Catalog { components })
    }

    pub fn summary(&self) -> Result<CatalogSummary> {
        let total = self
            .components
            .iter()
            .try_fold(0u64, |acc, c| acc.checked_add(c.unit_price))
            .ok_or_else(|| PricingError::AmountOverflow {
                context: "catalog price total".to_string(),
            })?;
        let count = self.components.len() as u64;
        // rounded half up, computed without overflowing near u64::MAX
        let average = if count == 0 {
            0
        } else {
            total / count + u64::from(total % count >= count - count / 2)
        };

        Ok(CatalogSummary {
            count: self.components.len(),
            total,
            average,
            min: self.components.iter().map(|c| c.unit_price).min(),
            max: self.components.iter().map(|c| c.unit_price).max(),
        })
    }

    pub fn to_records(&self) -> Result<Vec<CatalogRecord>> {
        self.components.iter().map(ServiceComponent::to_record).collect()
    }
}

fn shape_record(record: CatalogRecord) -> Result<ServiceComponent> {
    let id = record.id.to_string();

    if record.name.trim().is_empty() {
        return Err(PricingError::InvalidCatalogEntry {
            id,
            reason: "name cannot be empty".to_string(),
        });
    }

    let category =
        Category::from_raw(&record.category).ok_or_else(|| PricingError::InvalidCatalogEntry {
            id: id.clone(),
            reason: format!("unknown category '{}'", record.category),
        })?;

    Ok(ServiceComponent {
        id: ComponentId(record.id),
        category,
        display_category: capitalize(record.category.trim()),
        name: record.name,
        unit_price: checked_price(&id, record.price)?,
        tag: record.tag.filter(|t| !t.trim().is_empty()),
    })
}

/// A price as the catalog owner entered it, checked to be non-negative.
pub fn validate_price(id: ComponentId, price: i64) -> Result<u64> {
    checked_price(&id.to_string(), price)
}

fn checked_price(id: &str, price: i64) -> Result<u64> {
    u64::try_from(price).map_err(|_| PricingError::InvalidCatalogEntry {
        id: id.to_string(),
        reason: format!("price {} is negative", price),
    })
}

// 'kertas' -> 'Kertas'
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn default_catalog_records() -> Vec<CatalogRecord> {
    vec![
        CatalogRecord::new(1, "HVS 70-80gsm", 500, "kertas"),
        CatalogRecord::new(2, "Art Paper 150gsm", 2000, "kertas"),
        CatalogRecord::new(3, "Matte Paper", 2500, "kertas"),
        CatalogRecord::new(4, "Art Carton 260gsm", 3000, "kertas"),
        CatalogRecord::new(5, "Add-on: Ukuran F4", 200, "ukuran").with_tag("f4"),
        CatalogRecord::new(6, "Add-on: Ukuran A3", 2000, "ukuran").with_tag("a3"),
        CatalogRecord::new(7, "Add-on: Warna (Full Color)", 1000, "warna").with_tag("warna"),
        CatalogRecord::new(8, "Staples Pojok", 200, "finishing"),
        CatalogRecord::new(9, "Jilid Lakban", 3000, "finishing"),
        CatalogRecord::new(10, "Jilid Spiral Kawat", 7000, "finishing"),
        CatalogRecord::new(11, "Laminating (Panas)", 5000, "finishing"),
    ]
}
