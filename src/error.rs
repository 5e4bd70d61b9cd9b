//! Input domain errors
//!
//! The engine itself never fails; these are raised by [`Inputs::validate`]
//! before it is invoked.

use thiserror::Error;

use crate::models::{ApplianceSpec, FinancingTerms, Inputs, SolarResource, UsagePlan};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("appliance power must be positive, got {0} kW")]
    NonPositivePower(f64),

    #[error("processing speed must be positive, got {0} kg/h")]
    NonPositiveThroughput(f64),

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("runtime must be in (0, 24] hours per day, got {0}")]
    RuntimeOutOfRange(f64),

    #[error("operating days must be in [1, 365], got {0}")]
    OperatingDaysOutOfRange(u32),

    #[error("sun hours must be in (0, 24] per day, got {0}")]
    SunHoursOutOfRange(f64),

    #[error("system efficiency must be in (0, 100] percent, got {0}")]
    EfficiencyOutOfRange(f64),

    #[error("loan term must be in [1, 10] years, got {0}")]
    LoanTermOutOfRange(u32),

    #[error("annual interest rate must be a fraction in [0, 0.30], got {0}")]
    InterestRateOutOfRange(f64),

    #[error("{field} must be in [0, 100] percent, got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },

    #[error("install multiplier must be at least 1, got {0}")]
    InstallMultiplierBelowOne(f64),
}

fn finite(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NotFinite { field })
    }
}

fn percent(field: &'static str, value: f64) -> Result<(), InputError> {
    if (0.0..=100.0).contains(&finite(field, value)?) {
        Ok(())
    } else {
        Err(InputError::PercentOutOfRange { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), InputError> {
    if finite(field, value)? < 0.0 {
        return Err(InputError::Negative { field, value });
    }
    Ok(())
}

impl ApplianceSpec {
    pub fn validate(&self) -> Result<(), InputError> {
        if finite("power_kw", self.power_kw)? <= 0.0 {
            return Err(InputError::NonPositivePower(self.power_kw));
        }
        if finite("processing_speed_kg_per_hr", self.processing_speed_kg_per_hr)? <= 0.0 {
            return Err(InputError::NonPositiveThroughput(self.processing_speed_kg_per_hr));
        }
        non_negative("price_usd", self.price_usd)
    }
}

impl UsagePlan {
    pub fn validate(&self) -> Result<(), InputError> {
        let runtime = finite("runtime_hours_per_day", self.runtime_hours_per_day)?;
        if runtime <= 0.0 || runtime > 24.0 {
            return Err(InputError::RuntimeOutOfRange(runtime));
        }
        if !(1..=365).contains(&self.operating_days_per_year) {
            return Err(InputError::OperatingDaysOutOfRange(self.operating_days_per_year));
        }
        non_negative("income_per_kg", self.income_per_kg)?;
        finite("daily_operating_cost", self.daily_operating_cost)?;
        Ok(())
    }
}

impl SolarResource {
    pub fn validate(&self) -> Result<(), InputError> {
        let sun = finite("sun_hours_per_day", self.sun_hours_per_day)?;
        if sun <= 0.0 || sun > 24.0 {
            return Err(InputError::SunHoursOutOfRange(sun));
        }
        let efficiency = finite("system_efficiency_pct", self.system_efficiency_pct)?;
        if efficiency <= 0.0 || efficiency > 100.0 {
            return Err(InputError::EfficiencyOutOfRange(efficiency));
        }
        non_negative("battery_hours", self.battery_hours)
    }
}

impl FinancingTerms {
    pub fn validate(&self) -> Result<(), InputError> {
        if !(1..=10).contains(&self.loan_term_years) {
            return Err(InputError::LoanTermOutOfRange(self.loan_term_years));
        }
        let rate = finite("annual_interest_rate", self.annual_interest_rate)?;
        if !(0.0..=0.30).contains(&rate) {
            return Err(InputError::InterestRateOutOfRange(rate));
        }
        percent("deposit_pct", self.deposit_pct)?;
        percent("subsidy_pct", self.subsidy_pct)?;
        if finite("install_multiplier", self.install_multiplier)? < 1.0 {
            return Err(InputError::InstallMultiplierBelowOne(self.install_multiplier));
        }
        Ok(())
    }
}

impl Inputs {
    /// Check every field against its documented range, returning the first violation
    pub fn validate(&self) -> Result<(), InputError> {
        self.appliance.validate()?;
        self.usage.validate()?;
        self.solar.validate()?;
        self.financing.validate()
    }
}
