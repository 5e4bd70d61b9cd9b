//! Solar Productive-Use Calculator
//!
//! Command-line front end: collects inputs, runs the calculator, prints a report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use solar_pue_calculator::calculator;
use solar_pue_calculator::catalog::{self, ApplianceCatalog, BuiltinCatalog, FallbackCatalog};
use solar_pue_calculator::currency::{DisplayCurrency, SampleRates};
use solar_pue_calculator::db;
use solar_pue_calculator::import;
use solar_pue_calculator::models::{
    ApplianceSelection, ApplianceSpec, FinancingTerms, Inputs, SolarResource, SystemType, UsagePlan,
};
use solar_pue_calculator::report::{self, JsonReport, Report};
use solar_pue_calculator::scenario::Scenario;

#[derive(Parser)]
#[command(name = "solar-pue-calculator")]
#[command(about = "Solar sizing and loan viability calculator for productive-use appliances")]
struct Cli {
    /// Path to the SQLite appliance catalog
    #[arg(short, long, default_value = "appliances.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import appliances from a directory of spec sheets
    Import {
        /// Directory containing *.txt / *.spec sheets
        sheet_dir: PathBuf,

        /// Clear existing appliances before import
        #[arg(long)]
        clear: bool,
    },

    /// Size the solar system and assess business viability
    Calc(CalcArgs),

    /// List all appliances in the catalog
    ListAppliances,

    /// Show details for a specific appliance
    Appliance {
        /// Appliance name
        name: String,
    },

    /// List the bundled sample exchange rates
    Currencies,

    /// Initialize empty catalog with schema
    Init,

    /// Load the built-in appliances into the catalog
    LoadSample,
}

#[derive(Args)]
struct CalcArgs {
    /// TOML scenario file; when given, the input flags below are ignored
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Catalog appliance name (e.g. "Mill 2kW"); built-in mills are always available
    #[arg(short, long, conflicts_with = "power")]
    appliance: Option<String>,

    /// Custom appliance name
    #[arg(long, default_value = "Custom Mill")]
    name: String,

    /// Custom appliance power draw in kW
    #[arg(long, requires_all = ["speed", "price"])]
    power: Option<f64>,

    /// Custom appliance processing speed in kg/hour
    #[arg(long)]
    speed: Option<f64>,

    /// Custom appliance price in USD
    #[arg(long)]
    price: Option<f64>,

    /// AC (inverter) or DC (charge controller) system
    #[arg(long, value_enum, ignore_case = true, default_value = "ac")]
    system: SystemType,

    /// Appliance runtime per day in hours
    #[arg(long, default_value = "4.0")]
    runtime: f64,

    /// Operating days per year
    #[arg(long, default_value = "250")]
    days: u32,

    /// Income per kg processed, USD
    #[arg(long, default_value = "0.036")]
    income_per_kg: f64,

    /// Daily operating cost (labour, rent), USD
    #[arg(long, default_value = "10.0", allow_negative_numbers = true)]
    operating_cost: f64,

    /// Peak sun hours per day
    #[arg(long, default_value = "4.0")]
    sun_hours: f64,

    /// Overall system efficiency in percent
    #[arg(long, default_value = "80")]
    efficiency: f64,

    /// Hours of battery backup
    #[arg(long, default_value = "1")]
    battery_hours: f64,

    /// Loan term in years
    #[arg(long, default_value = "3")]
    loan_years: u32,

    /// Annual interest rate in percent
    #[arg(long, default_value = "15.0")]
    interest_pct: f64,

    /// Deposit as a percentage of the total cost after subsidy
    #[arg(long, default_value = "0")]
    deposit_pct: f64,

    /// Import and installation surcharge in percent of the FOB subtotal
    #[arg(long, default_value = "100")]
    install_increase_pct: f64,

    /// Subsidy as a percentage of the installed cost
    #[arg(long, default_value = "0")]
    subsidy_pct: f64,

    /// Display currency code
    #[arg(long)]
    currency: Option<String>,

    /// Exchange rate (display units per USD), overrides the sample table
    #[arg(long)]
    rate: Option<f64>,

    /// Print results as JSON instead of a report
    #[arg(long)]
    json: bool,

    /// Show detailed technical table
    #[arg(short, long)]
    verbose: bool,
}

impl CalcArgs {
    fn selection(&self) -> Result<ApplianceSelection> {
        match (&self.appliance, self.power, self.speed, self.price) {
            (Some(name), _, _, _) => Ok(ApplianceSelection::Catalog(name.clone())),
            (None, Some(power_kw), Some(speed), Some(price_usd)) => {
                Ok(ApplianceSelection::Custom(ApplianceSpec {
                    name: self.name.clone(),
                    power_kw,
                    processing_speed_kg_per_hr: speed,
                    price_usd,
                }))
            }
            _ => anyhow::bail!("choose an appliance: --appliance <name> or --power, --speed and --price"),
        }
    }

    /// Build validated inputs from the flags (percentages converted to model units)
    fn collect_inputs(&self, catalog: &dyn ApplianceCatalog) -> Result<Inputs> {
        let appliance = catalog::resolve(&self.selection()?, catalog)?;
        let inputs = Inputs {
            appliance,
            usage: UsagePlan {
                runtime_hours_per_day: self.runtime,
                operating_days_per_year: self.days,
                income_per_kg: self.income_per_kg,
                daily_operating_cost: self.operating_cost,
            },
            solar: SolarResource {
                sun_hours_per_day: self.sun_hours,
                system_efficiency_pct: self.efficiency,
                battery_hours: self.battery_hours,
                system_type: self.system,
            },
            financing: FinancingTerms {
                loan_term_years: self.loan_years,
                annual_interest_rate: self.interest_pct / 100.0,
                deposit_pct: self.deposit_pct,
                install_multiplier: 1.0 + self.install_increase_pct / 100.0,
                subsidy_pct: self.subsidy_pct,
            },
        };
        inputs.validate()?;
        Ok(inputs)
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn run_calc(conn: &Connection, args: &CalcArgs) -> Result<()> {
    // Names missing from the database still resolve to the built-in mills
    let catalog = FallbackCatalog {
        primary: conn,
        fallback: &BuiltinCatalog,
    };
    let (inputs, currency_code, explicit_rate) = match &args.scenario {
        Some(path) => {
            let scenario = Scenario::load(path)?;
            let inputs = scenario.to_inputs(&catalog)?;
            let code = args.currency.clone().unwrap_or(scenario.display.currency);
            (inputs, code, args.rate.or(scenario.display.rate))
        }
        None => (
            args.collect_inputs(&catalog)?,
            args.currency.clone().unwrap_or_else(|| "USD".to_string()),
            args.rate,
        ),
    };
    let currency = DisplayCurrency::select(&currency_code, explicit_rate, &SampleRates)?;
    debug!(appliance = %inputs.appliance.name, currency = %currency.code, "collected inputs");

    let results = calculator::compute_inputs(&inputs);
    info!(
        viable = results.viability.viable,
        panels = results.sizing.panels_required,
        "calculation complete"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&JsonReport::new(&inputs, &results, &currency))?);
        return Ok(());
    }

    if args.verbose {
        println!("Detailed calculations:\n");
        println!("{}", report::format_technical_details(&inputs, &results));
    }
    println!("{}", Report::new(&inputs, &results, &currency));
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let conn = Connection::open(&cli.database)
        .with_context(|| format!("Failed to open catalog {}", cli.database.display()))?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Import { sheet_dir, clear } => {
            if clear {
                info!("clearing existing appliances");
                db::clear_appliances(&conn)?;
            }

            let stats = import::import_to_database(&conn, &sheet_dir)?;
            println!("{}", stats);
        }

        Commands::Calc(args) => run_calc(&conn, &args)?,

        Commands::ListAppliances => {
            let appliances = db::list_appliances(&conn)?;
            if appliances.is_empty() {
                println!("No appliances in catalog. Run 'import' or 'load-sample' first.");
            } else {
                println!(
                    "{:<30} {:>10} {:>12} {:>10}",
                    "Appliance", "Power (kW)", "Speed (kg/h)", "Price (USD)"
                );
                println!("{}", "-".repeat(65));
                for a in appliances {
                    println!(
                        "{:<30} {:>10.2} {:>12.0} {:>10.0}",
                        a.spec.name, a.spec.power_kw, a.spec.processing_speed_kg_per_hr, a.spec.price_usd
                    );
                }
            }
        }

        Commands::Appliance { name } => match db::get_appliance(&conn, &name)? {
            Some(a) => {
                println!("Appliance: {}", a.spec.name);
                println!("  Power: {} kW", a.spec.power_kw);
                println!("  Processing speed: {} kg/hour", a.spec.processing_speed_kg_per_hr);
                println!(
                    "  Specific efficiency: {:.2} kg/kWh",
                    a.spec.processing_speed_kg_per_hr / a.spec.power_kw
                );
                println!("  Price: {} USD", a.spec.price_usd);
                if let Some(category) = a.category {
                    println!("  Category: {}", category);
                }
                if let Some(source) = a.source {
                    println!("  Source: {}", source);
                }
            }
            None => println!("Appliance '{}' not found", name),
        },

        Commands::Currencies => {
            println!("{:<6} {:>10}", "Code", "Per USD");
            for (code, rate) in SampleRates.all() {
                println!("{:<6} {:>10.2}", code, rate);
            }
            println!("\nSample rates only. Pass --rate for current values.");
        }

        Commands::Init => {
            println!("Catalog initialized at: {}", cli.database.display());
        }

        Commands::LoadSample => {
            let count = db::seed_builtin(&conn)?;
            println!("Loaded {} sample appliances", count);
        }
    }

    Ok(())
}
