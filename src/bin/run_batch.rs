//! Run projections for every scenario in a CSV file
//!
//! Outputs one summary row per scenario

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use serde::Serialize;

use property_roi::inputs::load_scenarios;
use property_roi::{IrrStatus, ScenarioRunner};

/// Project every scenario in a CSV file and write a summary table
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenarios, one per row
    scenarios: PathBuf,

    /// Summary output file
    #[arg(short, long, default_value = "batch_summary.csv")]
    output: PathBuf,
}

/// One summary row per scenario
#[derive(Debug, Serialize)]
struct SummaryRow {
    scenario_id: String,
    monthly_mortgage: Option<f64>,
    net_monthly_cash_flow: Option<f64>,
    annual_noi: Option<f64>,
    cap_rate: Option<f64>,
    cash_on_cash_return: Option<f64>,
    dscr: Option<f64>,
    irr: Option<f64>,
    irr_status: Option<IrrStatus>,
    total_cash_invested: Option<f64>,
    sale_proceeds: Option<f64>,
    total_profit: Option<f64>,
    equity_multiple: Option<f64>,
    error: Option<String>,
}

impl SummaryRow {
    fn failed(scenario_id: String, error: String) -> Self {
        Self {
            scenario_id,
            monthly_mortgage: None,
            net_monthly_cash_flow: None,
            annual_noi: None,
            cap_rate: None,
            cash_on_cash_return: None,
            dscr: None,
            irr: None,
            irr_status: None,
            total_cash_invested: None,
            sale_proceeds: None,
            total_profit: None,
            equity_multiple: None,
            error: Some(error),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading scenarios from {}...", args.scenarios.display());

    let scenarios = load_scenarios(&args.scenarios)
        .with_context(|| format!("failed to load {}", args.scenarios.display()))?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    println!("Running projections...");
    let proj_start = Instant::now();
    let results = ScenarioRunner::new().run_batch(&scenarios);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut failures = 0;
    let rows: Vec<SummaryRow> = results
        .into_iter()
        .map(|result| match result.metrics {
            Ok(m) => SummaryRow {
                scenario_id: result.scenario_id,
                monthly_mortgage: Some(m.monthly_mortgage),
                net_monthly_cash_flow: Some(m.net_monthly_cash_flow),
                annual_noi: Some(m.annual_noi),
                cap_rate: Some(m.cap_rate),
                cash_on_cash_return: m.cash_on_cash_return,
                dscr: m.dscr,
                irr: m.irr,
                irr_status: Some(m.irr_status),
                total_cash_invested: Some(m.total_cash_invested),
                sale_proceeds: Some(m.sale_proceeds),
                total_profit: Some(m.total_profit),
                equity_multiple: m.equity_multiple,
                error: None,
            },
            Err(e) => {
                warn!("scenario {} failed: {}", result.scenario_id, e);
                failures += 1;
                SummaryRow::failed(result.scenario_id, e.to_string())
            }
        })
        .collect();

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());

    // Print summary stats
    let irrs: Vec<f64> = rows.iter().filter_map(|r| r.irr).collect();
    println!("\nBatch Summary:");
    println!("  Scenarios: {} ({} failed)", rows.len(), failures);
    if !irrs.is_empty() {
        let best = irrs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let worst = irrs.iter().cloned().fold(f64::INFINITY, f64::min);
        let mean = irrs.iter().sum::<f64>() / irrs.len() as f64;
        println!("  IRR: mean {:.2}%, min {:.2}%, max {:.2}%", mean, worst, best);
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
