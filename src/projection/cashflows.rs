//! Projection output rows: one per year, plus the first-year monthly view

use serde::{Deserialize, Serialize};

/// A single row of projection output for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjection {
    // Timing
    pub year: u32,

    // Income
    pub gross_rent: f64,
    pub vacancy_loss: f64,
    pub other_income: f64,
    pub effective_gross_income: f64,

    // Operating expenses
    pub property_taxes: f64,
    pub insurance: f64,
    pub hoa: f64,
    pub management_fee: f64,
    pub maintenance: f64,
    pub capex: f64,
    pub operating_expenses: f64,

    // Operations and financing
    pub noi: f64,
    pub debt_service: f64,
    pub interest_paid: f64,
    pub principal_paid: f64,
    pub cash_flow: f64,
    pub cumulative_cash_flow: f64,

    // Balance sheet at year end
    pub loan_balance: f64,
    pub property_value: f64,
    pub equity: f64,

    // Returns
    /// Cumulative cash flow + equity - cash invested
    pub total_return: f64,
    /// (cash flow + equity gain) / cash invested, in %. `None` when no cash
    /// was invested.
    pub roi: Option<f64>,
}

impl YearlyProjection {
    /// Create an empty row for `year`
    pub fn new(year: u32) -> Self {
        Self {
            year,
            gross_rent: 0.0,
            vacancy_loss: 0.0,
            other_income: 0.0,
            effective_gross_income: 0.0,
            property_taxes: 0.0,
            insurance: 0.0,
            hoa: 0.0,
            management_fee: 0.0,
            maintenance: 0.0,
            capex: 0.0,
            operating_expenses: 0.0,
            noi: 0.0,
            debt_service: 0.0,
            interest_paid: 0.0,
            principal_paid: 0.0,
            cash_flow: 0.0,
            cumulative_cash_flow: 0.0,
            loan_balance: 0.0,
            property_value: 0.0,
            equity: 0.0,
            total_return: 0.0,
            roi: None,
        }
    }
}

/// First-year cash flow for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    /// Month name ("January", ...)
    pub month: String,
    /// Effective income after vacancy, plus other income
    pub income: f64,
    pub expenses: f64,
    pub mortgage: f64,
    pub interest: f64,
    pub principal: f64,
    pub net_cash_flow: f64,
}
