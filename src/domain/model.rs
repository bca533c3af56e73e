use crate::utils::error::{PricingError, Result};
use crate::utils::validation::validate_quantity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ComponentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The closed set of categories the pricing engine dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Paper,
    SizeAddon,
    ColorAddon,
    Finishing,
}

impl Category {
    /// Maps a free-form category string from the catalog owner onto the closed set.
    /// Both the shop's Indonesian labels and English names are accepted.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "kertas" | "paper" => Some(Category::Paper),
            "ukuran" | "size" | "size_addon" => Some(Category::SizeAddon),
            "warna" | "color" | "colour" | "color_addon" => Some(Category::ColorAddon),
            "finishing" => Some(Category::Finishing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Paper => "paper",
            Category::SizeAddon => "size_addon",
            Category::ColorAddon => "color_addon",
            Category::Finishing => "finishing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_true() -> bool {
    true
}

/// A catalog row as handed over by the catalog owner, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: u64,
    pub name: String,
    /// Price in the smallest currency unit. Signed so that bad rows can be reported.
    pub price: i64,
    pub category: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Explicit add-on binding, e.g. `a3` or `full_color`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl CatalogRecord {
    pub fn new(id: u64, name: &str, price: i64, category: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            price,
            category: category.to_string(),
            is_active: true,
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// A validated, priceable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceComponent {
    pub id: ComponentId,
    pub category: Category,
    pub display_category: String,
    pub name: String,
    pub unit_price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ServiceComponent {
    pub fn to_record(&self) -> Result<CatalogRecord> {
        let price = i64::try_from(self.unit_price).map_err(|_| PricingError::InvalidCatalogEntry {
            id: self.id.to_string(),
            reason: format!("price {} does not fit a catalog record", self.unit_price),
        })?;

        Ok(CatalogRecord {
            id: self.id.0,
            name: self.name.clone(),
            price,
            category: self.display_category.to_lowercase(),
            is_active: true,
            tag: self.tag.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMode {
    /// A4, the base size. Never carries a markup.
    #[default]
    #[serde(alias = "a4")]
    Standard,
    F4,
    A3,
}

impl SizeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeMode::Standard => "a4",
            SizeMode::F4 => "f4",
            SizeMode::A3 => "a3",
        }
    }
}

impl FromStr for SizeMode {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "a4" | "standard" => Ok(SizeMode::Standard),
            "f4" => Ok(SizeMode::F4),
            "a3" => Ok(SizeMode::A3),
            other => Err(PricingError::InvalidSpecification {
                field: "size_mode".to_string(),
                value: other.to_string(),
                reason: "expected one of a4, f4, a3".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    #[default]
    Monochrome,
    FullColor,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Monochrome => "monochrome",
            ColorMode::FullColor => "full_color",
        }
    }
}

impl FromStr for ColorMode {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "monochrome" | "mono" | "bw" => Ok(ColorMode::Monochrome),
            "full_color" | "full-color" | "color" | "colour" => Ok(ColorMode::FullColor),
            other => Err(PricingError::InvalidSpecification {
                field: "color_mode".to_string(),
                value: other.to_string(),
                reason: "expected monochrome or full_color".to_string(),
            }),
        }
    }
}

/// Raw user input as it arrives over the wire.
#[derive(Debug, Clone, Deserialize)]
struct RawOrderSpecification {
    paper_component_id: ComponentId,
    #[serde(default)]
    finishing_component_id: Option<ComponentId>,
    #[serde(default)]
    size_mode: SizeMode,
    #[serde(default)]
    color_mode: ColorMode,
    page_count: i64,
    copies: i64,
}

/// What the customer asked for. Page count and copies are always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOrderSpecification")]
pub struct OrderSpecification {
    paper_component_id: ComponentId,
    finishing_component_id: Option<ComponentId>,
    size_mode: SizeMode,
    color_mode: ColorMode,
    page_count: u32,
    copies: u32,
}

impl OrderSpecification {
    /// Rejects `page_count < 1` or `copies < 1` instead of clamping, so the
    /// billed quantity is never changed behind the customer's back.
    pub fn new(paper_component_id: ComponentId, page_count: i64, copies: i64) -> Result<Self> {
        Ok(Self {
            paper_component_id,
            finishing_component_id: None,
            size_mode: SizeMode::Standard,
            color_mode: ColorMode::Monochrome,
            page_count: checked_quantity("page_count", page_count)?,
            copies: checked_quantity("copies", copies)?,
        })
    }

    pub fn with_size(mut self, size_mode: SizeMode) -> Self {
        self.size_mode = size_mode;
        self
    }

    pub fn with_color(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = color_mode;
        self
    }

    pub fn with_finishing(mut self, finishing_component_id: ComponentId) -> Self {
        self.finishing_component_id = Some(finishing_component_id);
        self
    }

    pub fn paper_component_id(&self) -> ComponentId {
        self.paper_component_id
    }

    pub fn finishing_component_id(&self) -> Option<ComponentId> {
        self.finishing_component_id
    }

    pub fn size_mode(&self) -> SizeMode {
        self.size_mode
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn copies(&self) -> u32 {
        self.copies
    }

    /// `page_count * copies`, one physical page of one physical copy each.
    pub fn total_sheets(&self) -> u64 {
        u64::from(self.page_count) * u64::from(self.copies)
    }
}

impl TryFrom<RawOrderSpecification> for OrderSpecification {
    type Error = PricingError;

    fn try_from(raw: RawOrderSpecification) -> Result<Self> {
        let mut spec = OrderSpecification::new(raw.paper_component_id, raw.page_count, raw.copies)?
            .with_size(raw.size_mode)
            .with_color(raw.color_mode);
        spec.finishing_component_id = raw.finishing_component_id;
        Ok(spec)
    }
}

fn checked_quantity(field: &str, value: i64) -> Result<u32> {
    validate_quantity(field, value, 1)?;
    u32::try_from(value).map_err(|_| PricingError::InvalidSpecification {
        field: field.to_string(),
        value: value.to_string(),
        reason: format!("must be at most {}", u32::MAX),
    })
}

/// Which part of the price a line item stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingAxis {
    Paper,
    Size,
    Color,
    Finishing,
}

impl PricingAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingAxis::Paper => "paper",
            PricingAxis::Size => "size",
            PricingAxis::Color => "color",
            PricingAxis::Finishing => "finishing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedOrderLine {
    pub component_id: ComponentId,
    pub axis: PricingAxis,
    pub name: String,
    pub quantity: u64,
    pub unit_price: u64,
    pub line_total: u64,
}

impl PricedOrderLine {
    pub fn new(component: &ServiceComponent, axis: PricingAxis, quantity: u64) -> Result<Self> {
        let line_total = component.unit_price.checked_mul(quantity).ok_or_else(|| {
            PricingError::AmountOverflow {
                context: format!("{} line for component {}", axis.as_str(), component.id),
            }
        })?;

        Ok(Self {
            component_id: component.id,
            axis,
            name: component.name.clone(),
            quantity,
            unit_price: component.unit_price,
            line_total,
        })
    }
}

/// An add-on that was asked for but had no catalog entry, so it was priced at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonMiss {
    pub axis: PricingAxis,
    pub mode: String,
    pub fragment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedOrder {
    pub lines: Vec<PricedOrderLine>,
    pub grand_total: u64,
    pub total_sheets: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub soft_misses: Vec<AddonMiss>,
}

impl PricedOrder {
    pub fn line_for(&self, axis: PricingAxis) -> Option<&PricedOrderLine> {
        self.lines.iter().find(|line| line.axis == axis)
    }

    pub fn is_degraded(&self) -> bool {
        !self.soft_misses.is_empty()
    }
}

/// A priced order ready to be handed to the order store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: String,
    pub created_at: DateTime<Utc>,
    pub specification: OrderSpecification,
    pub order: PricedOrder,
}
