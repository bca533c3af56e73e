//! Catalog health checks, run by the catalog administrator and, when monitoring
//! is enabled, before each checkout.
//!
//! Pricing treats a missing size/color add-on as zero markup. This module is
//! where that silent degradation becomes visible.

use crate::core::catalog::{AddonBindings, Catalog};
use crate::domain::model::{Category, ColorMode, SizeMode};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditFinding {
    pub level: FindingLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub findings: Vec<AuditFinding>,
}

impl AuditReport {
    /// No error-level findings. Warnings still allow checkout.
    pub fn is_healthy(&self) -> bool {
        !self.findings.iter().any(|f| f.level == FindingLevel::Error)
    }

    pub fn at_level(&self, level: FindingLevel) -> impl Iterator<Item = &AuditFinding> {
        self.findings.iter().filter(move |f| f.level == level)
    }

    fn push(&mut self, level: FindingLevel, message: String) {
        self.findings.push(AuditFinding { level, message });
    }
}

pub fn audit_catalog(catalog: &Catalog, bindings: &AddonBindings) -> AuditReport {
    let mut report = AuditReport::default();

    if catalog.list_by_category(Category::Paper).is_empty() {
        report.push(
            FindingLevel::Error,
            "catalog has no paper component; no order can be priced".to_string(),
        );
    }

    let modes = [
        (Category::SizeAddon, SizeMode::F4.as_str(), bindings.size_fragment(SizeMode::F4)),
        (Category::SizeAddon, SizeMode::A3.as_str(), bindings.size_fragment(SizeMode::A3)),
        (
            Category::ColorAddon,
            ColorMode::FullColor.as_str(),
            bindings.color_fragment(ColorMode::FullColor),
        ),
    ];

    for (category, mode, fragment) in modes {
        let Some(fragment) = fragment else { continue };
        let matches = catalog.bound_addons(category, fragment);

        match matches.as_slice() {
            [] => report.push(
                FindingLevel::Warning,
                format!(
                    "mode '{}' has no {} matching '{}'; it will be priced at zero",
                    mode, category, fragment
                ),
            ),
            [_] => {}
            [first, ..] => report.push(
                FindingLevel::Warning,
                format!(
                    "mode '{}' matches {} {} components; '{}' (id {}) will be used",
                    mode,
                    matches.len(),
                    category,
                    first.name,
                    first.id
                ),
            ),
        }
    }

    for component in catalog.components() {
        if component.unit_price == 0 {
            report.push(
                FindingLevel::Info,
                format!("'{}' (id {}) is priced at zero", component.name, component.id),
            );
        }
    }

    report
}
