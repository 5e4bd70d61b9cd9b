//! Solar Productive-Use Calculator
//!
//! Sizes a solar system for a productive-use appliance (e.g. a grain mill)
//! and checks whether the business can service the equipment loan.

pub mod calculator;
pub mod catalog;
pub mod currency;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod report;
pub mod scenario;

pub use calculator::{compute, compute_inputs};
pub use error::InputError;
pub use models::{ApplianceSpec, FinancingTerms, Inputs, Results, SolarResource, SystemType, UsagePlan};
