//! Load calculator scenarios from JSON files or flat CSV tables

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::Reader;
use log::debug;
use serde::Deserialize;

use super::{Expenses, Income, LoanDetails, ProjectionSettings, RoiInputs};
use crate::error::RoiResult;

/// A scenario loaded from a batch file
#[derive(Debug, Clone)]
pub struct Scenario {
    pub scenario_id: String,
    pub inputs: RoiInputs,
}

/// Raw CSV row: one scenario per line, one column per input field.
///
/// Optional columns may be missing or left blank; blank amounts count as 0.
#[derive(Debug, Deserialize)]
struct CsvRow {
    scenario_id: String,
    purchase_price: f64,
    down_payment: Option<f64>,
    down_payment_percent: Option<f64>,
    interest_rate: f64,
    loan_term: u32,
    loan_points: Option<f64>,
    closing_costs: Option<f64>,
    monthly_rent: f64,
    annual_rent_increase: Option<f64>,
    other_income: Option<f64>,
    property_taxes: Option<f64>,
    property_tax_increase_rate: Option<f64>,
    home_insurance: Option<f64>,
    landlord_insurance: Option<f64>,
    hoa_fees: Option<f64>,
    property_management_fee: Option<f64>,
    maintenance_reserve: Option<f64>,
    vacancy_rate: Option<f64>,
    capex_reserve: Option<f64>,
    insurance_increase_rate: Option<f64>,
    hoa_increase_rate: Option<f64>,
    capex_increase_rate: Option<f64>,
    analysis_years: u32,
    property_appreciation: Option<f64>,
    selling_cost_rate: Option<f64>,
}

impl CsvRow {
    fn into_scenario(self) -> Scenario {
        let mut loan = LoanDetails::new(
            self.purchase_price,
            0.0,
            self.interest_rate,
            self.loan_term,
            self.loan_points.unwrap_or(0.0),
            self.closing_costs.unwrap_or(0.0),
        );
        loan.resolve_down_payment(self.down_payment, self.down_payment_percent);

        let income = Income {
            monthly_rent: self.monthly_rent,
            annual_rent_increase: self.annual_rent_increase.unwrap_or(0.0),
            other_income: self.other_income.unwrap_or(0.0),
        };

        let expenses = Expenses {
            property_taxes: self.property_taxes.unwrap_or(0.0),
            property_tax_increase_rate: self.property_tax_increase_rate.unwrap_or(0.0),
            home_insurance: self.home_insurance.unwrap_or(0.0),
            landlord_insurance: self.landlord_insurance.unwrap_or(0.0),
            hoa_fees: self.hoa_fees.unwrap_or(0.0),
            property_management_fee: self.property_management_fee.unwrap_or(0.0),
            maintenance_reserve: self.maintenance_reserve.unwrap_or(0.0),
            vacancy_rate: self.vacancy_rate.unwrap_or(0.0),
            capex_reserve: self.capex_reserve.unwrap_or(0.0),
            insurance_increase_rate: self.insurance_increase_rate,
            hoa_increase_rate: self.hoa_increase_rate,
            capex_increase_rate: self.capex_increase_rate,
        };

        let settings = ProjectionSettings {
            analysis_years: self.analysis_years,
            property_appreciation: self.property_appreciation.unwrap_or(0.0),
            selling_cost_rate: self.selling_cost_rate.unwrap_or(0.0),
        };

        Scenario {
            scenario_id: self.scenario_id,
            inputs: RoiInputs::new(loan, income, expenses, settings),
        }
    }
}

/// Load all scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> RoiResult<Vec<Scenario>> {
    let file = File::open(path.as_ref())?;
    debug!("loading scenarios from {}", path.as_ref().display());
    load_scenarios_from_reader(file)
}

/// Load scenarios from any reader (string buffer, request body, ...)
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> RoiResult<Vec<Scenario>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut scenarios = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        scenarios.push(row.into_scenario());
    }

    Ok(scenarios)
}

/// Load a single scenario from a JSON file
pub fn load_inputs_json<P: AsRef<Path>>(path: P) -> RoiResult<RoiInputs> {
    let file = File::open(path.as_ref())?;
    let inputs = serde_json::from_reader(BufReader::new(file))?;
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoiError;
    use approx::assert_relative_eq;

    const SAMPLE: &str = concat!(
        "scenario_id,purchase_price,down_payment,down_payment_percent,interest_rate,loan_term,",
        "monthly_rent,property_taxes,vacancy_rate,analysis_years,property_appreciation,",
        "hoa_increase_rate\n",
        "duplex-a,300000,60000,,6.5,30,2200,3600,5,5,3,\n",
        "condo-b,200000,,25,7.0,15,1800,2400,4,10,2.5,3\n",
    );

    #[test]
    fn test_load_scenarios_from_reader() {
        let scenarios = load_scenarios_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(scenarios.len(), 2);

        let a = &scenarios[0];
        assert_eq!(a.scenario_id, "duplex-a");
        assert_eq!(a.inputs.loan.down_payment, 60_000.0);
        assert_eq!(a.inputs.loan.loan_term, 30);
        assert_eq!(a.inputs.settings.analysis_years, 5);
        assert_eq!(a.inputs.expenses.hoa_increase_rate, None);
        assert_eq!(a.inputs.income.other_income, 0.0);

        let b = &scenarios[1];
        assert_relative_eq!(b.inputs.loan.down_payment, 50_000.0);
        assert_eq!(b.inputs.expenses.hoa_increase_rate, Some(3.0));
        assert!(b.inputs.validate().is_ok());
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let bad = concat!(
            "scenario_id,purchase_price,interest_rate,loan_term,monthly_rent,analysis_years\n",
            "x,abc,6,30,1000,5\n",
        );
        let result = load_scenarios_from_reader(bad.as_bytes());
        assert!(matches!(result, Err(RoiError::Csv(_))));
    }

    #[test]
    fn test_blank_cells_default_to_zero() {
        let csv = concat!(
            "scenario_id,purchase_price,down_payment,interest_rate,loan_term,loan_points,",
            "closing_costs,monthly_rent,vacancy_rate,analysis_years,selling_cost_rate\n",
            "blank,250000,50000,6.0,30,,,2000,,10,\n",
        );
        let scenarios = load_scenarios_from_reader(csv.as_bytes()).unwrap();
        let loan = &scenarios[0].inputs.loan;
        assert_eq!(loan.closing_costs, 0.0);
        assert_eq!(loan.loan_points, 0.0);
        assert_eq!(scenarios[0].inputs.expenses.vacancy_rate, 0.0);
        assert_eq!(scenarios[0].inputs.settings.selling_cost_rate, 0.0);
        assert!(scenarios[0].inputs.validate().is_ok());
    }
}
