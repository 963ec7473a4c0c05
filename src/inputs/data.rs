//! Calculator input structures: loan, income, expenses and projection settings
//!
//! Rates are percentages as typed into the calculator (6.5 means 6.5%).
//! Money amounts are plain currency units.

use serde::{Deserialize, Serialize};

use crate::error::{RoiError, RoiResult};

/// Longest loan term accepted, in years
pub const MAX_LOAN_TERM_YEARS: u32 = 100;

/// Longest projection horizon accepted, in years
pub const MAX_ANALYSIS_YEARS: u32 = 100;

/// Financing terms for the purchase.
///
/// Only the dollar down payment is stored. The percent form and the loan
/// amount are derived from it, so `loan_amount() + down_payment` always
/// equals `purchase_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LoanDetailsRecord", into = "LoanDetailsRecord")]
pub struct LoanDetails {
    pub purchase_price: f64,
    pub down_payment: f64,
    /// Annual interest rate (%)
    pub interest_rate: f64,
    /// Loan term in years
    pub loan_term: u32,
    /// One-time points (% of loan amount)
    pub loan_points: f64,
    pub closing_costs: f64,
}

impl LoanDetails {
    pub fn new(
        purchase_price: f64,
        down_payment: f64,
        interest_rate: f64,
        loan_term: u32,
        loan_points: f64,
        closing_costs: f64,
    ) -> Self {
        Self {
            purchase_price,
            down_payment,
            interest_rate,
            loan_term,
            loan_points,
            closing_costs,
        }
    }

    /// Amount financed
    pub fn loan_amount(&self) -> f64 {
        self.purchase_price - self.down_payment
    }

    /// Down payment as a percentage of the purchase price (0 when the price is 0)
    pub fn down_payment_percent(&self) -> f64 {
        if self.purchase_price > 0.0 {
            self.down_payment / self.purchase_price * 100.0
        } else {
            0.0
        }
    }

    /// Set the down payment from a percentage of the current purchase price
    pub fn set_down_payment_percent(&mut self, percent: f64) {
        self.down_payment = self.purchase_price * percent / 100.0;
    }

    /// Change the purchase price, keeping the dollar down payment
    pub fn set_purchase_price(&mut self, purchase_price: f64) {
        self.purchase_price = purchase_price;
    }

    /// Fill in the down payment from whichever form was supplied. The dollar
    /// amount wins when both are present.
    pub(crate) fn resolve_down_payment(&mut self, amount: Option<f64>, percent: Option<f64>) {
        match (amount, percent) {
            (Some(amount), _) => self.down_payment = amount,
            (None, Some(percent)) => self.set_down_payment_percent(percent),
            (None, None) => {}
        }
    }

    /// Points paid at closing
    pub fn points_cost(&self) -> f64 {
        self.loan_amount() * self.loan_points / 100.0
    }

    /// Cash needed at closing: down payment + closing costs + points
    pub fn total_cash_invested(&self) -> f64 {
        self.down_payment + self.closing_costs + self.points_cost()
    }
}

impl Default for LoanDetails {
    fn default() -> Self {
        Self::new(400_000.0, 80_000.0, 6.5, 30, 0.0, 10_000.0)
    }
}

/// Wire form of `LoanDetails`.
///
/// Accepts either `down_payment` or `down_payment_percent` on input (the
/// dollar amount wins if both are present) and writes both, plus the loan
/// amount, on output.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoanDetailsRecord {
    purchase_price: f64,
    #[serde(default)]
    down_payment: Option<f64>,
    #[serde(default)]
    down_payment_percent: Option<f64>,
    #[serde(default, skip_deserializing)]
    loan_amount: f64,
    interest_rate: f64,
    loan_term: u32,
    #[serde(default)]
    loan_points: f64,
    #[serde(default)]
    closing_costs: f64,
}

impl From<LoanDetailsRecord> for LoanDetails {
    fn from(record: LoanDetailsRecord) -> Self {
        let mut loan = LoanDetails::new(
            record.purchase_price,
            0.0,
            record.interest_rate,
            record.loan_term,
            record.loan_points,
            record.closing_costs,
        );
        loan.resolve_down_payment(record.down_payment, record.down_payment_percent);
        loan
    }
}

impl From<LoanDetails> for LoanDetailsRecord {
    fn from(loan: LoanDetails) -> Self {
        Self {
            purchase_price: loan.purchase_price,
            down_payment: Some(loan.down_payment),
            down_payment_percent: Some(loan.down_payment_percent()),
            loan_amount: loan.loan_amount(),
            interest_rate: loan.interest_rate,
            loan_term: loan.loan_term,
            loan_points: loan.loan_points,
            closing_costs: loan.closing_costs,
        }
    }
}

/// Rental income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub monthly_rent: f64,
    /// Annual rent growth (%)
    #[serde(default)]
    pub annual_rent_increase: f64,
    /// Monthly non-rent income (laundry, parking); flat, not vacancy-adjusted
    #[serde(default)]
    pub other_income: f64,
}

impl Default for Income {
    fn default() -> Self {
        Self {
            monthly_rent: 3_000.0,
            annual_rent_increase: 3.0,
            other_income: 0.0,
        }
    }
}

/// Operating expenses.
///
/// Insurance, HOA and capex stay flat unless an increase rate is given.
/// Management fee and maintenance reserve follow the rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expenses {
    /// Annual $
    #[serde(default)]
    pub property_taxes: f64,
    /// %/yr
    #[serde(default)]
    pub property_tax_increase_rate: f64,
    /// Annual $
    #[serde(default)]
    pub home_insurance: f64,
    /// Annual $
    #[serde(default)]
    pub landlord_insurance: f64,
    /// Monthly $
    #[serde(default)]
    pub hoa_fees: f64,
    /// % of monthly rent
    #[serde(default)]
    pub property_management_fee: f64,
    /// % of monthly rent
    #[serde(default)]
    pub maintenance_reserve: f64,
    /// %
    #[serde(default)]
    pub vacancy_rate: f64,
    /// Monthly $
    #[serde(default)]
    pub capex_reserve: f64,
    #[serde(default)]
    pub insurance_increase_rate: Option<f64>,
    #[serde(default)]
    pub hoa_increase_rate: Option<f64>,
    #[serde(default)]
    pub capex_increase_rate: Option<f64>,
}

impl Default for Expenses {
    fn default() -> Self {
        Self {
            property_taxes: 5_000.0,
            property_tax_increase_rate: 2.0,
            home_insurance: 1_200.0,
            landlord_insurance: 800.0,
            hoa_fees: 0.0,
            property_management_fee: 10.0,
            maintenance_reserve: 5.0,
            vacancy_rate: 5.0,
            capex_reserve: 200.0,
            insurance_increase_rate: None,
            hoa_increase_rate: None,
            capex_increase_rate: None,
        }
    }
}

fn default_analysis_years() -> u32 {
    30
}

/// Projection horizon and exit assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSettings {
    /// Years to project (the calculator offers 5, 10, 20 or 30)
    #[serde(default = "default_analysis_years")]
    pub analysis_years: u32,
    /// Annual appreciation (%)
    #[serde(default)]
    pub property_appreciation: f64,
    /// Cost of sale at the end of the horizon (% of final value)
    #[serde(default)]
    pub selling_cost_rate: f64,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            analysis_years: default_analysis_years(),
            property_appreciation: 3.0,
            selling_cost_rate: 0.0,
        }
    }
}

/// Everything the engine needs for one recalculation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoiInputs {
    pub loan: LoanDetails,
    pub income: Income,
    #[serde(default)]
    pub expenses: Expenses,
    #[serde(default)]
    pub settings: ProjectionSettings,
}

impl RoiInputs {
    pub fn new(
        loan: LoanDetails,
        income: Income,
        expenses: Expenses,
        settings: ProjectionSettings,
    ) -> Self {
        Self {
            loan,
            income,
            expenses,
            settings,
        }
    }

    /// Reject inputs the engine cannot project. Nothing is clamped.
    pub fn validate(&self) -> RoiResult<()> {
        let loan = &self.loan;
        let income = &self.income;
        let expenses = &self.expenses;
        let settings = &self.settings;

        non_negative("purchase_price", loan.purchase_price)?;
        if loan.purchase_price == 0.0 {
            return Err(RoiError::invalid("purchase_price", "must be greater than zero"));
        }
        non_negative("down_payment", loan.down_payment)?;
        if loan.down_payment > loan.purchase_price {
            return Err(RoiError::invalid(
                "down_payment",
                format!(
                    "({:.2}) exceeds purchase_price ({:.2})",
                    loan.down_payment, loan.purchase_price
                ),
            ));
        }
        years_in_range("loan_term", loan.loan_term, MAX_LOAN_TERM_YEARS)?;
        growth_rate("interest_rate", loan.interest_rate)?;
        share("loan_points", loan.loan_points)?;
        non_negative("closing_costs", loan.closing_costs)?;

        non_negative("monthly_rent", income.monthly_rent)?;
        growth_rate("annual_rent_increase", income.annual_rent_increase)?;
        non_negative("other_income", income.other_income)?;

        non_negative("property_taxes", expenses.property_taxes)?;
        growth_rate("property_tax_increase_rate", expenses.property_tax_increase_rate)?;
        non_negative("home_insurance", expenses.home_insurance)?;
        non_negative("landlord_insurance", expenses.landlord_insurance)?;
        non_negative("hoa_fees", expenses.hoa_fees)?;
        share("property_management_fee", expenses.property_management_fee)?;
        share("maintenance_reserve", expenses.maintenance_reserve)?;
        share("vacancy_rate", expenses.vacancy_rate)?;
        non_negative("capex_reserve", expenses.capex_reserve)?;
        if let Some(rate) = expenses.insurance_increase_rate {
            growth_rate("insurance_increase_rate", rate)?;
        }
        if let Some(rate) = expenses.hoa_increase_rate {
            growth_rate("hoa_increase_rate", rate)?;
        }
        if let Some(rate) = expenses.capex_increase_rate {
            growth_rate("capex_increase_rate", rate)?;
        }

        years_in_range("analysis_years", settings.analysis_years, MAX_ANALYSIS_YEARS)?;
        growth_rate("property_appreciation", settings.property_appreciation)?;
        share("selling_cost_rate", settings.selling_cost_rate)?;

        Ok(())
    }
}

fn years_in_range(field: &'static str, years: u32, max: u32) -> RoiResult<()> {
    if years == 0 {
        return Err(RoiError::invalid(field, "must be at least one year"));
    }
    if years > max {
        let reason = format!("must be at most {} years (got {})", max, years);
        return Err(RoiError::invalid(field, reason));
    }
    Ok(())
}

fn finite(field: &'static str, value: f64) -> RoiResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RoiError::invalid(field, "must be a finite number"))
    }
}

fn non_negative(field: &'static str, value: f64) -> RoiResult<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(RoiError::invalid(field, format!("must not be negative (got {})", value)));
    }
    Ok(())
}

/// Annual growth or interest rate: anything above -100%
fn growth_rate(field: &'static str, value: f64) -> RoiResult<()> {
    finite(field, value)?;
    if value < -100.0 {
        return Err(RoiError::invalid(field, format!("must not be below -100% (got {})", value)));
    }
    Ok(())
}

/// Percentage of a base amount: 0..=100
fn share(field: &'static str, value: f64) -> RoiResult<()> {
    finite(field, value)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(RoiError::invalid(field, format!("must be between 0 and 100 (got {})", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_loan_amount_tracks_down_payment() {
        let mut loan = LoanDetails::new(300_000.0, 60_000.0, 6.5, 30, 0.0, 0.0);
        assert_eq!(loan.loan_amount(), 240_000.0);
        assert_relative_eq!(loan.down_payment_percent(), 20.0, max_relative = 1e-12);

        loan.set_down_payment_percent(25.0);
        assert_eq!(loan.down_payment, 75_000.0);
        assert_eq!(loan.loan_amount() + loan.down_payment, loan.purchase_price);
    }

    #[test]
    fn test_purchase_price_change_keeps_dollar_down_payment() {
        let mut loan = LoanDetails::new(300_000.0, 60_000.0, 6.5, 30, 0.0, 0.0);
        loan.set_purchase_price(400_000.0);
        assert_eq!(loan.down_payment, 60_000.0);
        assert_eq!(loan.loan_amount(), 340_000.0);
        assert_relative_eq!(loan.down_payment_percent(), 15.0, max_relative = 1e-12);
    }

    #[test]
    fn test_total_cash_invested_includes_points() {
        let loan = LoanDetails::new(200_000.0, 40_000.0, 7.0, 30, 1.0, 5_000.0);
        // 40k down + 5k closing + 1% of 160k
        assert_relative_eq!(loan.total_cash_invested(), 46_600.0, max_relative = 1e-12);
    }

    #[test]
    fn test_deserialize_from_percent() {
        let json = r#"{
            "purchase_price": 250000,
            "down_payment_percent": 20,
            "interest_rate": 7.0,
            "loan_term": 30
        }"#;
        let loan: LoanDetails = serde_json::from_str(json).unwrap();
        assert_relative_eq!(loan.down_payment, 50_000.0, max_relative = 1e-12);
        assert_eq!(loan.loan_points, 0.0);
    }

    #[test]
    fn test_dollar_amount_wins_over_percent() {
        let json = r#"{
            "purchase_price": 250000,
            "down_payment": 30000,
            "down_payment_percent": 20,
            "interest_rate": 7.0,
            "loan_term": 30
        }"#;
        let loan: LoanDetails = serde_json::from_str(json).unwrap();
        assert_eq!(loan.down_payment, 30_000.0);
    }

    #[test]
    fn test_serialize_writes_derived_fields() {
        let loan = LoanDetails::new(300_000.0, 60_000.0, 6.5, 30, 0.0, 0.0);
        let value = serde_json::to_value(&loan).unwrap();
        assert_eq!(value["loan_amount"], 240_000.0);
        let percent = value["down_payment_percent"].as_f64().unwrap();
        assert_relative_eq!(percent, 20.0, max_relative = 1e-12);
    }

    #[test]
    fn test_default_inputs_are_valid() {
        assert!(RoiInputs::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_inputs() {
        let mut inputs = RoiInputs::default();
        inputs.loan.down_payment = inputs.loan.purchase_price + 1.0;
        assert!(matches!(
            inputs.validate(),
            Err(RoiError::InvalidInput { field: "down_payment", .. })
        ));

        let mut inputs = RoiInputs::default();
        inputs.income.monthly_rent = -1.0;
        assert!(matches!(
            inputs.validate(),
            Err(RoiError::InvalidInput { field: "monthly_rent", .. })
        ));

        let mut inputs = RoiInputs::default();
        inputs.loan.loan_term = 0;
        assert!(inputs.validate().is_err());

        let mut inputs = RoiInputs::default();
        inputs.settings.analysis_years = 0;
        assert!(inputs.validate().is_err());

        let mut inputs = RoiInputs::default();
        inputs.settings.property_appreciation = -150.0;
        assert!(matches!(
            inputs.validate(),
            Err(RoiError::InvalidInput { field: "property_appreciation", .. })
        ));

        let mut inputs = RoiInputs::default();
        inputs.expenses.property_taxes = f64::NAN;
        assert!(inputs.validate().is_err());
    }

    #[test]
    fn test_validation_bounds_horizons() {
        let mut inputs = RoiInputs::default();
        inputs.loan.loan_term = MAX_LOAN_TERM_YEARS;
        inputs.settings.analysis_years = MAX_ANALYSIS_YEARS;
        assert!(inputs.validate().is_ok());

        let mut inputs = RoiInputs::default();
        inputs.loan.loan_term = 400_000_000;
        assert!(matches!(
            inputs.validate(),
            Err(RoiError::InvalidInput { field: "loan_term", .. })
        ));

        let mut inputs = RoiInputs::default();
        inputs.settings.analysis_years = 4_000_000_000;
        assert!(matches!(
            inputs.validate(),
            Err(RoiError::InvalidInput { field: "analysis_years", .. })
        ));
    }

    #[test]
    fn test_negative_growth_above_floor_is_allowed() {
        let mut inputs = RoiInputs::default();
        inputs.settings.property_appreciation = -2.0;
        inputs.income.annual_rent_increase = -100.0;
        assert!(inputs.validate().is_ok());
    }
}
