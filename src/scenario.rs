//! TOML scenario files
//!
//! A scenario holds one complete set of calculator inputs plus optional
//! display settings, so a run can be repeated or shared.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::{self, ApplianceCatalog};
use crate::models::{ApplianceSelection, FinancingTerms, Inputs, SolarResource, UsagePlan};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub appliance: ApplianceSelection,
    pub usage: UsagePlan,
    pub solar: SolarResource,
    pub financing: FinancingTerms,
    #[serde(default)]
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Overrides the bundled sample rate
    pub rate: Option<f64>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            rate: None,
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the appliance and validate, yielding inputs ready for the calculator
    pub fn to_inputs(&self, catalog: &dyn ApplianceCatalog) -> Result<Inputs> {
        let appliance = catalog::resolve(&self.appliance, catalog)?;
        let inputs = Inputs {
            appliance,
            usage: self.usage.clone(),
            solar: self.solar.clone(),
            financing: self.financing.clone(),
        };
        inputs.validate()?;
        Ok(inputs)
    }
}
