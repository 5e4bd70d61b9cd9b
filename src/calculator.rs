//! Solar sizing and financial viability calculator
//!
//! One deterministic pass over four stages, each feeding the next:
//! technical sizing, cost breakdown, loan amortization, viability.
//! All money is in USD; display conversion happens in `report`.

use tracing::debug;

use crate::models::{
    ApplianceSpec, CostBreakdown, CostModel, FinancingTerms, Inputs, LoanSchedule, Payback, Results,
    SolarResource, SystemType, TechnicalSizing, UsagePlan, Viability,
};

/// Days used to spread the annual repayment over a day
const DAYS_PER_YEAR: f64 = 365.0;

/// Run the full calculation for one set of inputs
///
/// Callers are expected to have validated the inputs (see
/// [`Inputs::validate`](crate::models::Inputs::validate)). Zero power or
/// zero sun hours are outside the domain and produce non-finite values.
pub fn compute(
    appliance: &ApplianceSpec,
    usage: &UsagePlan,
    solar: &SolarResource,
    financing: &FinancingTerms,
) -> Results {
    let cost_model = CostModel::STANDARD;

    let sizing = size_system(appliance, usage, solar, &cost_model);
    let costs = cost_breakdown(appliance, solar, financing, &sizing, &cost_model);
    let loan = amortize_loan(financing.loan_term_years, financing.annual_interest_rate, costs.loan_principal);
    let viability = assess_viability(appliance, usage, financing, &sizing, &costs, &loan);

    Results {
        sizing,
        costs,
        loan,
        viability,
    }
}

/// Same as [`compute`] for a bundled [`Inputs`] value
pub fn compute_inputs(inputs: &Inputs) -> Results {
    compute(&inputs.appliance, &inputs.usage, &inputs.solar, &inputs.financing)
}

/// Stage 1: energy demand, array and battery size
pub fn size_system(
    appliance: &ApplianceSpec,
    usage: &UsagePlan,
    solar: &SolarResource,
    cost_model: &CostModel,
) -> TechnicalSizing {
    let specific_efficiency = appliance.processing_speed_kg_per_hr / appliance.power_kw;
    let energy_required = usage.runtime_hours_per_day * appliance.power_kw;
    let energy_production = energy_required / (solar.system_efficiency_pct / 100.0);
    let production_per_day = specific_efficiency * energy_required;

    let panel_energy = cost_model.panel_wattage_kw * solar.sun_hours_per_day;
    // Whole panels, never under-provisioned
    let panels_required = (energy_production / panel_energy).ceil() as u32;
    // Array size in 0.5 kWp steps, rounded up. Sized independently of the panel count.
    let recommended_solar_size = ((energy_production / solar.sun_hours_per_day) * 2.0).ceil() / 2.0;
    let battery_capacity = recommended_solar_size * solar.battery_hours;

    debug!(
        energy_required,
        energy_production, panels_required, recommended_solar_size, battery_capacity, "sized system"
    );

    TechnicalSizing {
        specific_efficiency_kg_per_kwh: specific_efficiency,
        energy_required_kwh_per_day: energy_required,
        energy_production_kwh_per_day: energy_production,
        production_kg_per_day: production_per_day,
        panel_energy_kwh_per_day: panel_energy,
        panels_required,
        recommended_solar_size_kwp: recommended_solar_size,
        battery_capacity_kwh: battery_capacity,
    }
}

/// Stage 2: equipment, installation, subsidy, deposit and loan principal
pub fn cost_breakdown(
    appliance: &ApplianceSpec,
    solar: &SolarResource,
    financing: &FinancingTerms,
    sizing: &TechnicalSizing,
    cost_model: &CostModel,
) -> CostBreakdown {
    let solar_panel_cost = f64::from(sizing.panels_required) * cost_model.panel_unit_cost;

    let (inverter_cost, controller_cost) = match solar.system_type {
        SystemType::Ac => (sizing.recommended_solar_size_kwp * cost_model.inverter_cost_per_kwp, 0.0),
        SystemType::Dc => (0.0, sizing.recommended_solar_size_kwp * cost_model.controller_cost_per_kwp),
    };

    let battery_cost = sizing.battery_capacity_kwh * cost_model.battery_cost_per_kwh;

    let fob_subtotal =
        appliance.price_usd + solar_panel_cost + inverter_cost + controller_cost + battery_cost;
    let installed_cost = fob_subtotal * financing.install_multiplier;
    let import_install_cost = fob_subtotal * (financing.install_multiplier - 1.0);

    let subsidy_amount = installed_cost * (financing.subsidy_pct / 100.0);
    let total_after_subsidy = installed_cost - subsidy_amount;
    let deposit_amount = total_after_subsidy * (financing.deposit_pct / 100.0);
    let loan_principal = total_after_subsidy - deposit_amount;

    debug!(fob_subtotal, installed_cost, total_after_subsidy, loan_principal, "costed system");

    CostBreakdown {
        appliance_cost: appliance.price_usd,
        solar_panel_cost,
        inverter_cost,
        controller_cost,
        battery_cost,
        fob_subtotal,
        import_install_cost,
        installed_cost,
        subsidy_amount,
        total_after_subsidy,
        deposit_amount,
        loan_principal,
    }
}

/// Stage 3: fixed-rate amortizing loan with monthly compounding
///
/// A zero rate yields a zero repayment even when principal is outstanding.
/// No straight-line split is attempted; viability treats such a loan as
/// having no repayment.
pub fn amortize_loan(loan_term_years: u32, annual_interest_rate: f64, loan_principal: f64) -> LoanSchedule {
    let months = loan_term_years * 12;
    let monthly_rate = annual_interest_rate / 12.0;

    let monthly_repayment = if monthly_rate > 0.0 && loan_principal > 0.0 {
        let months_i = i32::try_from(months).unwrap_or(i32::MAX);
        (loan_principal * monthly_rate) / (1.0 - (1.0 + monthly_rate).powi(-months_i))
    } else {
        0.0
    };

    let total_repayment = f64::from(months) * monthly_repayment;
    let total_interest_paid = total_repayment - loan_principal;
    let annual_repayment = monthly_repayment * 12.0;
    let daily_repayment = annual_repayment / DAYS_PER_YEAR;

    debug!(months, monthly_repayment, daily_repayment, "amortized loan");

    LoanSchedule {
        months,
        monthly_rate,
        monthly_repayment,
        total_repayment,
        total_interest_paid,
        annual_repayment,
        daily_repayment,
    }
}

/// Stage 4: revenue, repayment burden, viability and payback
pub fn assess_viability(
    appliance: &ApplianceSpec,
    usage: &UsagePlan,
    financing: &FinancingTerms,
    sizing: &TechnicalSizing,
    costs: &CostBreakdown,
    loan: &LoanSchedule,
) -> Viability {
    let operating_days = f64::from(usage.operating_days_per_year);
    let daily_repayment = loan.daily_repayment;

    let income_per_hour = usage.income_per_kg * appliance.processing_speed_kg_per_hr;
    let income_per_day = usage.income_per_kg * sizing.production_kg_per_day;
    let gross_income_per_year = income_per_day * operating_days;
    let net_income_per_day = income_per_day - usage.daily_operating_cost;
    let annual_net_profit = net_income_per_day * operating_days;

    let repayment_pct_of_gross = if income_per_day > 0.0 {
        (daily_repayment / income_per_day) * 100.0
    } else {
        0.0
    };
    let repayment_pct_of_net = if net_income_per_day > 0.0 {
        (daily_repayment / net_income_per_day) * 100.0
    } else {
        0.0
    };

    // A fully self-financed purchase is viable outright. Otherwise a positive
    // repayment must be covered by positive net income; a zero repayment with
    // less than a 100% deposit is not viable.
    let viable = financing.deposit_pct == 100.0
        || (net_income_per_day > 0.0
            && daily_repayment > 0.0
            && net_income_per_day >= daily_repayment);

    let daily_surplus = (viable && net_income_per_day > daily_repayment)
        .then(|| net_income_per_day - daily_repayment);
    // A 100% deposit is viable even without profit; such an investment never pays back
    let payback = viable.then(|| {
        if annual_net_profit > 0.0 {
            Payback::Years(costs.total_after_subsidy / annual_net_profit)
        } else {
            Payback::Never
        }
    });

    debug!(income_per_day, net_income_per_day, viable, ?payback, "assessed viability");

    Viability {
        income_per_hour,
        income_per_day,
        gross_income_per_year,
        net_income_per_day,
        annual_net_profit,
        repayment_pct_of_gross,
        repayment_pct_of_net,
        viable,
        daily_surplus,
        payback,
    }
}
