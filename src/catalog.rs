//! Appliance catalog lookup
//!
//! A catalog maps an appliance name to its spec. The calculator never sees a
//! catalog; selections are resolved to a concrete [`ApplianceSpec`] first.

use thiserror::Error;

use crate::models::{ApplianceSelection, ApplianceSpec, CatalogEntry};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("appliance '{0}' not found in catalog")]
    UnknownAppliance(String),

    #[error("catalog lookup failed: {0}")]
    Backend(#[from] rusqlite::Error),
}

pub trait ApplianceCatalog {
    fn lookup(&self, name: &str) -> Result<Option<ApplianceSpec>, CatalogError>;
}

/// Appliances shipped with the calculator
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCatalog;

// (name, kW, kg/h, USD)
const BUILTIN: &[(&str, f64, f64, f64)] = &[
    ("Mill 2kW", 2.0, 100.0, 600.0),
    ("Mill 3kW", 3.0, 150.0, 800.0),
];

impl BuiltinCatalog {
    pub fn entries(&self) -> Vec<CatalogEntry> {
        BUILTIN
            .iter()
            .map(|&(name, power_kw, speed, price_usd)| CatalogEntry {
                spec: ApplianceSpec {
                    name: name.to_string(),
                    power_kw,
                    processing_speed_kg_per_hr: speed,
                    price_usd,
                },
                category: Some("Milling".to_string()),
                source: Some("builtin".to_string()),
            })
            .collect()
    }
}

impl ApplianceCatalog for BuiltinCatalog {
    fn lookup(&self, name: &str) -> Result<Option<ApplianceSpec>, CatalogError> {
        Ok(self
            .entries()
            .into_iter()
            .find(|e| e.spec.name.eq_ignore_ascii_case(name))
            .map(|e| e.spec))
    }
}

/// Looks in `primary` first and consults `fallback` only on a miss
#[derive(Clone, Copy)]
pub struct FallbackCatalog<'a> {
    pub primary: &'a dyn ApplianceCatalog,
    pub fallback: &'a dyn ApplianceCatalog,
}

impl ApplianceCatalog for FallbackCatalog<'_> {
    fn lookup(&self, name: &str) -> Result<Option<ApplianceSpec>, CatalogError> {
        match self.primary.lookup(name)? {
            Some(spec) => Ok(Some(spec)),
            None => self.fallback.lookup(name),
        }
    }
}

/// Turn a selection into the `ApplianceSpec` the calculator consumes
pub fn resolve(
    selection: &ApplianceSelection,
    catalog: &dyn ApplianceCatalog,
) -> Result<ApplianceSpec, CatalogError> {
    match selection {
        ApplianceSelection::Catalog(name) => catalog
            .lookup(name)?
            .ok_or_else(|| CatalogError::UnknownAppliance(name.clone())),
        ApplianceSelection::Custom(spec) => Ok(spec.clone()),
    }
}
