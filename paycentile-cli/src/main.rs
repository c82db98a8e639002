//! Paycentile CLI: compare a salary against the population distribution.
//!
//! Commands:
//! - `compare`: percentage of employees earning less than a given salary
//! - `distribution`: print the (filtered) centile table
//! - `filters`: list the filter catalog
//!
//! The data source is picked from the environment (`PAYCENTILE_SOURCE_URL`,
//! `PAYCENTILE_SOURCE_KEY`) and an optional TOML config file.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use paycentile_core::data::LoadedDistribution;
use paycentile_core::domain::{FilterCatalog, FilterCategory, FilterSelection, NEUTRAL};
use paycentile_core::{load_distribution, parse_salary, AppConfig, Comparison, SourceMode};

#[derive(Parser)]
#[command(
    name = "paycentile",
    about = "Paycentile CLI: how many employees earn more or less than you"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data source: auto, synthetic or remote. Overrides the config file.
    #[arg(long, global = true)]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a monthly net salary against the distribution.
    Compare {
        /// Monthly net salary, full-time equivalent (e.g. 2500 or "2 500,50").
        salary: String,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print the centile table for the selected population.
    Distribution {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List filter categories and their options.
    Filters,
}

#[derive(Args)]
struct FilterArgs {
    /// Sex: ensemble, homme, femme.
    #[arg(long, default_value = NEUTRAL)]
    sex: String,

    /// Occupation: ensemble, cadres, professions_intermediaires, employes, ouvriers.
    #[arg(long, default_value = NEUTRAL)]
    occupation: String,

    /// Age bracket: ensemble, moins_30, 30_39, 40_49, 50_plus.
    #[arg(long, default_value = NEUTRAL)]
    age: String,

    /// Economic sector: ensemble, industrie, construction, commerce, services, administration.
    #[arg(long, default_value = NEUTRAL)]
    sector: String,
}

impl FilterArgs {
    /// Build a selection, rejecting ids the catalog doesn't know.
    fn to_selection(&self, catalog: &FilterCatalog) -> Result<FilterSelection> {
        let pairs = [
            (FilterCategory::Sex, &self.sex),
            (FilterCategory::Occupation, &self.occupation),
            (FilterCategory::Age, &self.age),
            (FilterCategory::Sector, &self.sector),
        ];

        let mut selection = FilterSelection::default();
        for (category, value) in pairs {
            if !catalog.contains(category, value) {
                bail!(
                    "unknown {category} option '{value}' (expected one of: {})",
                    catalog.option_ids(category).join(", ")
                );
            }
            selection.set(category, value.as_str());
        }
        Ok(selection)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let catalog = FilterCatalog::standard();

    match cli.command {
        Commands::Filters => {
            run_filters(&catalog);
            Ok(())
        }
        Commands::Compare { salary, filters } => {
            let config = load_config(cli.config, cli.source)?;
            let selection = filters.to_selection(&catalog)?;
            run_compare(&config, &salary, selection)
        }
        Commands::Distribution { filters } => {
            let config = load_config(cli.config, cli.source)?;
            let selection = filters.to_selection(&catalog)?;
            run_distribution(&config, selection)
        }
    }
}

fn load_config(path: Option<PathBuf>, source: Option<String>) -> Result<AppConfig> {
    let mode = source.map(|m| m.parse::<SourceMode>()).transpose()?;
    let config = AppConfig::load_with_mode(path.as_deref(), mode)?;
    info!("data source: {:?} (mode {})", config.effective_source(), config.source);
    Ok(config)
}

fn load(config: &AppConfig) -> Result<LoadedDistribution> {
    let provider = config.build_provider()?;
    let loaded = load_distribution(provider.as_ref())?;
    if let Some(notice) = &loaded.notice {
        eprintln!("{notice}");
    }
    Ok(loaded)
}

fn run_compare(config: &AppConfig, raw_salary: &str, selection: FilterSelection) -> Result<()> {
    let salary = parse_salary(raw_salary)?;

    let loaded = load(config)?;
    let mut session = Comparison::new(loaded.distribution, config.weights.clone());
    session.set_selection(selection);
    session.set_salary(salary);

    let result = session.result();
    println!("Median salary: {:.0} EUR", result.median_salary);
    match result.percentage_below {
        Some(pct) => println!(
            "With {salary:.0} EUR, {pct:.1}% of employees earn less than you \
             and {:.1}% earn more.",
            100.0 - pct
        ),
        None => println!("No salary data to compare against."),
    }
    Ok(())
}

fn run_distribution(config: &AppConfig, selection: FilterSelection) -> Result<()> {
    let loaded = load(config)?;
    let mut session = Comparison::new(loaded.distribution, config.weights.clone());
    session.set_selection(selection);

    println!("{:>7}  {:>10}", "Centile", "Salary");
    for point in session.distribution() {
        println!("{:>7}  {:>10.0}", point.centile, point.salary);
    }
    Ok(())
}

fn run_filters(catalog: &FilterCatalog) {
    for group in catalog.groups() {
        println!("{} (--{})", group.label, flag_name(group.category));
        for option in group.options {
            println!("  {:<28} {}", option.id, option.label);
        }
    }
}

fn flag_name(category: FilterCategory) -> &'static str {
    match category {
        FilterCategory::Sex => "sex",
        FilterCategory::Occupation => "occupation",
        FilterCategory::Age => "age",
        FilterCategory::Sector => "sector",
    }
}
