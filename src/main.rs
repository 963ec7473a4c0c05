//! Property ROI CLI
//!
//! Runs a single rental property projection and prints the yearly table

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use property_roi::inputs::load_inputs_json;
use property_roi::{
    monthly_breakdown, CalculatedMetrics, ProjectionEngine, RoiInputs, ScenarioRunner,
};

/// Project cash flow, equity and returns for a rental property
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario inputs as JSON (built-in defaults when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write the yearly projection to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the full result to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Years to print to the console
    #[arg(long, default_value_t = 10)]
    rows: usize,

    /// Comma-separated appreciation rates (%) for a sensitivity sweep
    #[arg(long, value_delimiter = ',')]
    sensitivity: Vec<f64>,

    /// Also print the first-year monthly breakdown
    #[arg(long)]
    monthly: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Property ROI v{}", env!("CARGO_PKG_VERSION"));
    println!("===================\n");

    let inputs = match &args.input {
        Some(path) => load_inputs_json(path)
            .with_context(|| format!("failed to load inputs from {}", path.display()))?,
        None => {
            info!("no --input given, using default scenario");
            RoiInputs::default()
        }
    };

    print_inputs(&inputs);

    let engine = ProjectionEngine::new(inputs.clone()).context("invalid scenario inputs")?;
    let metrics = engine.calculate();

    print_projection(&metrics, args.rows);
    print_summary(&metrics);

    if args.monthly {
        print_monthly(&inputs)?;
    }

    if !args.sensitivity.is_empty() {
        let points = ScenarioRunner::new()
            .appreciation_sensitivity(&inputs, &args.sensitivity)
            .context("sensitivity sweep failed")?;

        println!("\nAppreciation sensitivity:");
        println!("{:>8} {:>14} {:>10} {:>12}", "Apprec%", "SaleProceeds", "IRR%", "Multiple");
        for point in &points {
            println!(
                "{:>8.2} {:>14.2} {:>10} {:>12}",
                point.appreciation,
                point.metrics.sale_proceeds,
                fmt_opt(point.metrics.irr, 2),
                fmt_opt(point.metrics.equity_multiple, 3),
            );
        }
    }

    if let Some(path) = &args.csv {
        write_projection_csv(path, &metrics)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nYearly projection written to: {}", path.display());
    }

    if let Some(path) = &args.json {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &metrics)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Full result written to: {}", path.display());
    }

    Ok(())
}

fn print_inputs(inputs: &RoiInputs) {
    let loan = &inputs.loan;
    println!("Property:");
    println!("  Purchase Price: ${:.2}", loan.purchase_price);
    println!("  Down Payment: ${:.2} ({:.1}%)", loan.down_payment, loan.down_payment_percent());
    println!(
        "  Loan: ${:.2} at {:.3}% for {} years",
        loan.loan_amount(),
        loan.interest_rate,
        loan.loan_term
    );
    println!("  Monthly Rent: ${:.2}", inputs.income.monthly_rent);
    println!(
        "  Horizon: {} years, appreciation {:.2}%",
        inputs.settings.analysis_years, inputs.settings.property_appreciation
    );
    println!();
}

fn print_projection(metrics: &CalculatedMetrics, rows: usize) {
    let projections = &metrics.yearly_projections;

    println!("Projection Results ({} years):", projections.len());
    println!(
        "{:>4} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14} {:>14} {:>14} {:>9}",
        "Year",
        "GrossRent",
        "OpEx",
        "NOI",
        "DebtSvc",
        "CashFlow",
        "LoanBal",
        "Value",
        "Equity",
        "ROI%"
    );
    println!("{}", "-".repeat(126));

    for row in projections.iter().take(rows) {
        println!(
            "{:>4} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2} {:>14.2} {:>14.2} {:>9}",
            row.year,
            row.gross_rent,
            row.operating_expenses,
            row.noi,
            row.debt_service,
            row.cash_flow,
            row.loan_balance,
            row.property_value,
            row.equity,
            fmt_opt(row.roi, 2),
        );
    }

    if projections.len() > rows {
        println!("... ({} more years)", projections.len() - rows);
    }
}

fn print_summary(metrics: &CalculatedMetrics) {
    println!("\nSummary:");
    println!("  Monthly Mortgage: ${:.2}", metrics.monthly_mortgage);
    println!("  Net Monthly Cash Flow: ${:.2}", metrics.net_monthly_cash_flow);
    println!("  Annual NOI: ${:.2}", metrics.annual_noi);
    println!("  Cap Rate: {:.2}%", metrics.cap_rate);
    println!("  Cash-on-Cash: {}%", fmt_opt(metrics.cash_on_cash_return, 2));
    println!("  DSCR: {}", fmt_opt(metrics.dscr, 2));
    println!("  IRR: {}% ({:?})", fmt_opt(metrics.irr, 2), metrics.irr_status);
    println!("  Total Cash Invested: ${:.2}", metrics.total_cash_invested);
    println!("  Sale Proceeds: ${:.2}", metrics.sale_proceeds);
    println!("  Total Profit: ${:.2}", metrics.total_profit);
    println!("  Equity Multiple: {}", fmt_opt(metrics.equity_multiple, 3));
}

fn print_monthly(inputs: &RoiInputs) -> Result<()> {
    let months = monthly_breakdown(inputs)?;

    println!("\nFirst-year monthly breakdown:");
    println!(
        "{:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Month", "Income", "Expenses", "Mortgage", "Interest", "Principal", "Net"
    );
    for m in &months {
        println!(
            "{:>10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            m.month, m.income, m.expenses, m.mortgage, m.interest, m.principal, m.net_cash_flow
        );
    }
    Ok(())
}

fn write_projection_csv(path: &Path, metrics: &CalculatedMetrics) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in &metrics.yearly_projections {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "n/a".to_string(),
    }
}
