//! Credit Pricing CLI
//!
//! Prices a single applicant or a CSV batch and prints the rate breakdown

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use credit_pricing::applicant::load_applicants;
use credit_pricing::{AggregateStats, ApplicantRecord, Country, PricingConfig, PricingEngine, RateDecision};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "credit-pricing", version, about = "Rule-based interest-rate pricing for credit applicants")]
struct Cli {
    /// JSON pricing configuration (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print decisions as JSON instead of a text report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Price one applicant
    Quote {
        /// USA or India
        #[arg(long)]
        country: Country,

        /// FICO (USA) or CIBIL (India) score
        #[arg(long)]
        credit_score: u32,

        /// Annual income in local currency
        #[arg(long)]
        income: f64,

        #[arg(long)]
        loan_amount: f64,

        #[arg(long, default_value_t = 0.0)]
        existing_debt: f64,

        #[arg(long, default_value_t = 0.0)]
        employment_years: f64,

        #[arg(long)]
        id: Option<String>,
    },
    /// Price every applicant in a CSV file
    Batch {
        /// CSV with columns id,country,credit_score,income,loan_amount,existing_debt,employment_years
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PricingConfig::from_json_path(path)?,
        None => PricingConfig::default(),
    };
    let engine = PricingEngine::new(config)?;

    match cli.command {
        Command::Quote {
            country,
            credit_score,
            income,
            loan_amount,
            existing_debt,
            employment_years,
            id,
        } => {
            let mut applicant =
                ApplicantRecord::new(country, credit_score, income, loan_amount, existing_debt, employment_years);
            applicant.id = id;

            let decision = engine.calculate_rate(&applicant).context("pricing applicant")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&decision)?);
            } else {
                print_decision(&decision);
                print_statistics(&engine.get_statistics(), country);
            }
        }
        Command::Batch { input } => {
            let applicants = load_applicants(&input)?;
            let results = engine.calculate_batch(&applicants);

            let mut rejected = 0;
            for (applicant, result) in applicants.iter().zip(&results) {
                match result {
                    Ok(decision) if cli.json => println!("{}", serde_json::to_string(decision)?),
                    Ok(decision) => print_decision(decision),
                    Err(e) => {
                        rejected += 1;
                        eprintln!("{}: {}", applicant.id.as_deref().unwrap_or("<no id>"), e);
                    }
                }
            }

            if !cli.json {
                for country in Country::ALL {
                    let stats = engine.statistics_for(country);
                    if stats.total_decisions > 0 {
                        print_statistics(&stats, country);
                    }
                }
                println!("\n{} priced, {} rejected", results.len() - rejected, rejected);
            }
        }
    }

    Ok(())
}

fn print_decision(decision: &RateDecision) {
    let currency = decision.country.currency_symbol();

    println!(
        "\nPricing Decision: {} ({}, {} {})",
        decision.applicant_id.as_deref().unwrap_or("-"),
        decision.country,
        decision.country.score_scale(),
        decision.credit_score
    );
    println!("{}", "=".repeat(50));
    println!("Base Rate:         {:.2}%", decision.base_rate * 100.0);
    println!("Risk Adjustment:   {:+.2}%", decision.risk_adjustment * 100.0);
    println!("Market Adjustment: {:+.2}%", decision.market_adjustment * 100.0);
    println!("Profit Adjustment: {:+.2}%", decision.profit_adjustment * 100.0);
    println!("{}", "-".repeat(50));
    println!("Final Rate:        {:.2}%", decision.final_rate * 100.0);
    if decision.was_clamped() {
        println!("  (clamped from {:.2}%)", (decision.base_rate + decision.total_adjustment) * 100.0);
    }
    println!();
    println!("Expected Profit:   {}{:.2}", currency, decision.expected_profit);
    println!("Default Risk:      {:.1}% ({})", decision.default_probability * 100.0, decision.estimator);
    println!("\nReasoning:");
    for reason in &decision.reasoning {
        println!("  - {}", reason);
    }
}

fn print_statistics(stats: &AggregateStats, country: Country) {
    println!("\nStatistics ({})", country);
    println!("{}", "=".repeat(50));
    println!("Total Decisions:       {}", stats.total_decisions);
    println!("Avg Risk Adjustment:   {:+.2}%", stats.avg_risk_adjustment * 100.0);
    println!("Avg Rate Adjustment:   {:+.2}%", stats.avg_total_adjustment * 100.0);
    println!("Avg Final Rate:        {:.2}%", stats.avg_final_rate * 100.0);
    println!("Total Expected Profit: {}{:.2}", country.currency_symbol(), stats.total_expected_profit);
    println!("Avg Default Risk:      {:.1}%", stats.avg_default_probability * 100.0);
}
