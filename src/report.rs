//! Report formatting
//!
//! Money is converted to the display currency here and nowhere else.

use std::fmt;

use serde::Serialize;

use crate::currency::DisplayCurrency;
use crate::models::{Inputs, Payback, Results, SystemType};

/// Printable summary of one calculation
#[derive(Debug)]
pub struct Report<'a> {
    pub inputs: &'a Inputs,
    pub results: &'a Results,
    pub currency: &'a DisplayCurrency,
}

impl<'a> Report<'a> {
    pub fn new(inputs: &'a Inputs, results: &'a Results, currency: &'a DisplayCurrency) -> Self {
        Self {
            inputs,
            results,
            currency,
        }
    }

    fn money(&self, usd: f64) -> String {
        format!("{:.1} {}", self.currency.display(usd), self.currency.code)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Results {
            sizing,
            costs,
            loan,
            viability,
        } = self.results;
        let appliance = &self.inputs.appliance;

        writeln!(f, "=== Overview ===")?;
        writeln!(
            f,
            "Appliance: {} ({} kW, {} system)",
            appliance.name, appliance.power_kw, self.inputs.solar.system_type
        )?;
        writeln!(f, "  Solar size:        {} kWp", sizing.recommended_solar_size_kwp)?;
        writeln!(f, "  Panels required:   {}", sizing.panels_required)?;
        writeln!(f, "  Daily production:  {:.1} kg/day", sizing.production_kg_per_day)?;
        writeln!(f, "  Daily net income:  {}", self.money(viability.net_income_per_day))?;
        writeln!(f)?;

        writeln!(f, "=== Financials ===")?;
        writeln!(f, "  Machine cost:          {}", self.money(costs.appliance_cost))?;
        writeln!(f, "  Solar panel cost:      {}", self.money(costs.solar_panel_cost))?;
        writeln!(f, "  Battery cost:          {}", self.money(costs.battery_cost))?;
        match self.inputs.solar.system_type {
            SystemType::Ac => writeln!(f, "  Inverter cost:         {}", self.money(costs.inverter_cost))?,
            SystemType::Dc => writeln!(f, "  Controller cost:       {}", self.money(costs.controller_cost))?,
        }
        writeln!(f, "  Import & installation: {}", self.money(costs.import_install_cost))?;
        writeln!(f, "  FOB subtotal:          {}", self.money(costs.fob_subtotal))?;
        writeln!(f, "  Installed cost:        {}", self.money(costs.installed_cost))?;
        writeln!(f, "  Subsidy amount:        {}", self.money(costs.subsidy_amount))?;
        writeln!(f, "  Total after subsidy:   {}", self.money(costs.total_after_subsidy))?;
        writeln!(f, "  Deposit amount:        {}", self.money(costs.deposit_amount))?;
        writeln!(f, "  Loan amount:           {}", self.money(costs.loan_principal))?;
        writeln!(f, "  Loan term:             {} months", loan.months)?;
        writeln!(f, "  Monthly repayment:     {}", self.money(loan.monthly_repayment))?;
        writeln!(f, "  Annual repayment:      {}", self.money(loan.annual_repayment))?;
        writeln!(f, "  Daily repayment:       {}", self.money(loan.daily_repayment))?;
        writeln!(f, "  Total interest:        {}", self.money(loan.total_interest_paid))?;
        writeln!(f)?;

        writeln!(f, "=== Technical ===")?;
        writeln!(f, "  Daily energy required:   {:.1} kWh/day", sizing.energy_required_kwh_per_day)?;
        writeln!(f, "  Daily energy production: {:.1} kWh/day", sizing.energy_production_kwh_per_day)?;
        writeln!(f, "  Specific efficiency:     {:.2} kg/kWh", sizing.specific_efficiency_kg_per_kwh)?;
        writeln!(f, "  Battery storage:         {} kWh", sizing.battery_capacity_kwh)?;
        writeln!(f)?;

        writeln!(f, "=== Viability ===")?;
        writeln!(f, "  Daily gross income:   {}", self.money(viability.income_per_day))?;
        writeln!(f, "  Daily operating cost: {}", self.money(self.inputs.usage.daily_operating_cost))?;
        writeln!(f, "  Daily net income:     {}", self.money(viability.net_income_per_day))?;
        writeln!(f, "  Repayment % of gross: {:.1}%", viability.repayment_pct_of_gross)?;
        writeln!(f, "  Repayment % of net:   {:.1}%", viability.repayment_pct_of_net)?;
        if let Some(surplus) = viability.daily_surplus {
            writeln!(f, "  Daily surplus:        {}", self.money(surplus))?;
        }
        writeln!(f, "  Annual net profit:    {}", self.money(viability.annual_net_profit))?;
        writeln!(f, "  Viable business:      {}", if viability.viable { "Yes" } else { "No" })?;
        match viability.payback {
            Some(Payback::Years(years)) => writeln!(f, "  Payback period:       {:.1} years", years)?,
            Some(Payback::Never) => writeln!(f, "  Payback period:       never (no annual net profit)")?,
            None => writeln!(f, "  Payback analysis not available - business is not viable")?,
        }

        if self.currency.sample_rate {
            writeln!(f)?;
            writeln!(
                f,
                "Note: using sample exchange rate (1 USD = {:.2} {}). Verify current rates.",
                self.currency.rate, self.currency.code
            )?;
        }

        Ok(())
    }
}

/// Parameter/value/unit table of the sizing chain
pub fn format_technical_details(inputs: &Inputs, results: &Results) -> String {
    let sizing = &results.sizing;
    let rows: Vec<(&str, String, &str)> = vec![
        ("Machine Power", format!("{}", inputs.appliance.power_kw), "kW"),
        ("Daily Runtime", format!("{}", inputs.usage.runtime_hours_per_day), "hours"),
        ("Energy Required", format!("{:.2}", sizing.energy_required_kwh_per_day), "kWh/day"),
        ("System Efficiency", format!("{}", inputs.solar.system_efficiency_pct), "%"),
        ("Energy Production Needed", format!("{:.2}", sizing.energy_production_kwh_per_day), "kWh/day"),
        ("Sun Hours Available", format!("{}", inputs.solar.sun_hours_per_day), "hours"),
        ("Solar System Size", format!("{}", sizing.recommended_solar_size_kwp), "kWp"),
        ("Panel Energy", format!("{:.2}", sizing.panel_energy_kwh_per_day), "kWh/day"),
        ("Panels Required", format!("{}", sizing.panels_required), "panels"),
        ("Production Rate", format!("{}", inputs.appliance.processing_speed_kg_per_hr), "kg/hour"),
        ("Daily Production", format!("{:.2}", sizing.production_kg_per_day), "kg/day"),
        ("Battery Storage", format!("{}", sizing.battery_capacity_kwh), "kWh"),
    ];

    let mut output = String::new();
    output.push_str(&format!("{:<28} {:>12} {:<8}\n", "Parameter", "Value", "Unit"));
    output.push_str(&format!("{}\n", "-".repeat(50)));
    for (parameter, value, unit) in rows {
        output.push_str(&format!("{:<28} {:>12} {:<8}\n", parameter, value, unit));
    }
    output
}

/// Machine-readable output: inputs, USD results and the display currency
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub inputs: &'a Inputs,
    pub results: &'a Results,
    pub currency: &'a str,
    pub exchange_rate: f64,
}

impl<'a> JsonReport<'a> {
    pub fn new(inputs: &'a Inputs, results: &'a Results, currency: &'a DisplayCurrency) -> Self {
        Self {
            inputs,
            results,
            currency: &currency.code,
            exchange_rate: currency.rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::compute_inputs;
    use crate::catalog::{ApplianceCatalog, BuiltinCatalog};
    use crate::models::{FinancingTerms, SolarResource, UsagePlan};

    fn inputs() -> Inputs {
        Inputs {
            appliance: BuiltinCatalog.lookup("Mill 2kW").unwrap().unwrap(),
            usage: UsagePlan {
                runtime_hours_per_day: 4.0,
                operating_days_per_year: 250,
                income_per_kg: 5.0 / 140.0,
                daily_operating_cost: 10.0,
            },
            solar: SolarResource {
                sun_hours_per_day: 4.0,
                system_efficiency_pct: 80.0,
                battery_hours: 1.0,
                system_type: SystemType::Dc,
            },
            financing: FinancingTerms {
                loan_term_years: 3,
                annual_interest_rate: 0.15,
                deposit_pct: 0.0,
                install_multiplier: 2.0,
                subsidy_pct: 0.0,
            },
        }
    }

    #[test]
    fn test_report_converts_without_touching_results() {
        let inputs = inputs();
        let results = compute_inputs(&inputs);
        let before = results.clone();
        let currency = DisplayCurrency {
            code: "EUR".to_string(),
            rate: 2.0,
            sample_rate: false,
        };

        let text = Report::new(&inputs, &results, &currency).to_string();
        // FOB 1725 USD shown as 3450 EUR
        assert!(text.contains("FOB subtotal:          3450.0 EUR"));
        assert!(text.contains("Controller cost:"));
        assert!(!text.contains("Inverter cost:"));
        assert!(!text.contains("sample exchange rate"));
        assert_eq!(results, before);
    }

    #[test]
    fn test_viability_values_share_one_column() {
        let mut inputs = inputs();
        inputs.financing.deposit_pct = 100.0;
        inputs.usage.income_per_kg = 0.0;
        inputs.usage.daily_operating_cost = 0.0;
        let results = compute_inputs(&inputs);
        let text = Report::new(&inputs, &results, &DisplayCurrency::usd()).to_string();

        let section: Vec<&str> = text
            .lines()
            .skip_while(|l| !l.starts_with("=== Viability"))
            .skip(1)
            .take_while(|l| !l.is_empty())
            .collect();
        assert!(section.iter().any(|l| l.starts_with("  Daily operating cost: 0.0 USD")));
        for line in &section {
            let colon = line.find(':').unwrap();
            let value_start = colon + 1 + line[colon + 1..].len() - line[colon + 1..].trim_start().len();
            assert_eq!(value_start, 24, "misaligned line: {:?}", line);
        }
        assert!(text.contains("Payback period:       never"));
        assert!(!text.contains(" inf ") && !text.contains("NaN"));
    }

    #[test]
    fn test_report_sample_rate_note() {
        let inputs = inputs();
        let results = compute_inputs(&inputs);
        let currency = DisplayCurrency {
            code: "GHS".to_string(),
            rate: 13.5,
            sample_rate: true,
        };
        let text = Report::new(&inputs, &results, &currency).to_string();
        assert!(text.contains("1 USD = 13.50 GHS"));
    }

    #[test]
    fn test_technical_details_table() {
        let inputs = inputs();
        let results = compute_inputs(&inputs);
        let table = format_technical_details(&inputs, &results);
        assert!(table.lines().any(|l| l.starts_with("Panels Required") && l.contains(" 5 ")));
        assert_eq!(table.lines().count(), 14);
    }

    #[test]
    fn test_json_report_keeps_usd() {
        let inputs = inputs();
        let results = compute_inputs(&inputs);
        let currency = DisplayCurrency {
            code: "KES".to_string(),
            rate: 133.0,
            sample_rate: true,
        };
        let json = serde_json::to_value(JsonReport::new(&inputs, &results, &currency)).unwrap();
        assert_eq!(json["currency"], "KES");
        assert_eq!(json["results"]["costs"]["fob_subtotal"], 1725.0);
        assert_eq!(json["results"]["sizing"]["panels_required"], 5);
        assert_eq!(json["inputs"]["solar"]["system_type"], "DC");
    }
}
