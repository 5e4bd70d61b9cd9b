//! Data models for appliances, usage, solar resource, financing and results

use std::fmt;

use serde::{Deserialize, Serialize};

/// A productive-use appliance as consumed by the calculation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplianceSpec {
    pub name: String,
    pub power_kw: f64,
    pub processing_speed_kg_per_hr: f64,
    pub price_usd: f64,
}

/// How the caller picked the appliance. Both variants resolve to an
/// [`ApplianceSpec`] before the engine runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplianceSelection {
    Catalog(String),
    Custom(ApplianceSpec),
}

/// A catalog row: the appliance plus bookkeeping the engine never looks at
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub spec: ApplianceSpec,
    pub category: Option<String>,
    pub source: Option<String>, // "builtin" or the imported sheet path
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsagePlan {
    pub runtime_hours_per_day: f64,
    pub operating_days_per_year: u32,
    pub income_per_kg: f64,
    /// Labour, rent and other running expenses
    pub daily_operating_cost: f64,
}

/// AC systems need an inverter, DC systems a charge controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum SystemType {
    #[serde(rename = "AC", alias = "ac")]
    #[value(name = "ac")]
    Ac,
    #[serde(rename = "DC", alias = "dc")]
    #[value(name = "dc")]
    Dc,
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemType::Ac => write!(f, "AC"),
            SystemType::Dc => write!(f, "DC"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarResource {
    /// Peak sun hours, not daylight hours
    pub sun_hours_per_day: f64,
    pub system_efficiency_pct: f64,
    pub battery_hours: f64,
    pub system_type: SystemType,
}

/// Fixed component pricing. Not user-editable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    pub panel_wattage_kw: f64,
    pub panel_unit_cost: f64,
    pub inverter_cost_per_kwp: f64,
    pub controller_cost_per_kwp: f64,
    pub battery_cost_per_kwh: f64,
}

impl CostModel {
    pub const STANDARD: CostModel = CostModel {
        panel_wattage_kw: 0.5,
        panel_unit_cost: 50.0,
        inverter_cost_per_kwp: 100.0,
        controller_cost_per_kwp: 50.0,
        battery_cost_per_kwh: 300.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingTerms {
    pub loan_term_years: u32,
    /// Fraction, e.g. 0.15 for 15% p.a.
    pub annual_interest_rate: f64,
    pub deposit_pct: f64,
    /// 1 + import/installation surcharge fraction
    pub install_multiplier: f64,
    pub subsidy_pct: f64,
}

/// Everything the engine needs for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inputs {
    pub appliance: ApplianceSpec,
    pub usage: UsagePlan,
    pub solar: SolarResource,
    pub financing: FinancingTerms,
}

/// Stage 1 output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalSizing {
    pub specific_efficiency_kg_per_kwh: f64,
    pub energy_required_kwh_per_day: f64,
    /// Demand grossed up for system losses
    pub energy_production_kwh_per_day: f64,
    pub production_kg_per_day: f64,
    pub panel_energy_kwh_per_day: f64,
    pub panels_required: u32,
    pub recommended_solar_size_kwp: f64,
    pub battery_capacity_kwh: f64,
}

/// Stage 2 output, all in USD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub appliance_cost: f64,
    pub solar_panel_cost: f64,
    pub inverter_cost: f64,
    pub controller_cost: f64,
    pub battery_cost: f64,
    pub fob_subtotal: f64,
    pub import_install_cost: f64,
    pub installed_cost: f64,
    pub subsidy_amount: f64,
    pub total_after_subsidy: f64,
    pub deposit_amount: f64,
    pub loan_principal: f64,
}

/// Stage 3 output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanSchedule {
    pub months: u32,
    pub monthly_rate: f64,
    pub monthly_repayment: f64,
    pub total_repayment: f64,
    pub total_interest_paid: f64,
    pub annual_repayment: f64,
    pub daily_repayment: f64,
}

/// Time to recover the net investment from annual net profit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Payback {
    Years(f64),
    /// Annual net profit is zero or negative
    Never,
}

/// Stage 4 output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viability {
    pub income_per_hour: f64,
    pub income_per_day: f64,
    pub gross_income_per_year: f64,
    pub net_income_per_day: f64,
    pub annual_net_profit: f64,
    pub repayment_pct_of_gross: f64,
    pub repayment_pct_of_net: f64,
    pub viable: bool,
    pub daily_surplus: Option<f64>,
    /// `Some` exactly when `viable`
    pub payback: Option<Payback>,
}

/// Result of a full calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Results {
    pub sizing: TechnicalSizing,
    pub costs: CostBreakdown,
    pub loan: LoanSchedule,
    pub viability: Viability,
}
