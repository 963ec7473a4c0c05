//! Core projection engine for year-by-year investment property projections

use chrono::Month;
use log::{debug, warn};

use super::cashflows::{MonthlyBreakdown, YearlyProjection};
use super::escalation::EscalationModel;
use super::irr::{solve_irr, IrrOutcome};
use super::metrics::{
    irr_cash_flows, return_on_cash, sale_proceeds, AggregationBasis, CalculatedMetrics,
};
use super::state::ProjectionState;
use crate::error::RoiResult;
use crate::inputs::RoiInputs;
use crate::loan::Loan;

/// Main projection engine
///
/// Holds one validated set of inputs. Every call recomputes from scratch;
/// the engine never mutates after construction.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    inputs: RoiInputs,
    loan: Loan,
    escalation: EscalationModel,
    total_cash_invested: f64,
}

impl ProjectionEngine {
    /// Validate `inputs` and prepare a projection
    pub fn new(inputs: RoiInputs) -> RoiResult<Self> {
        inputs.validate()?;

        let loan = Loan::new(
            inputs.loan.loan_amount(),
            inputs.loan.interest_rate,
            inputs.loan.loan_term,
        );
        let escalation = EscalationModel::from_inputs(&inputs);
        let total_cash_invested = inputs.loan.total_cash_invested();

        Ok(Self {
            inputs,
            loan,
            escalation,
            total_cash_invested,
        })
    }

    pub fn inputs(&self) -> &RoiInputs {
        &self.inputs
    }

    pub fn loan(&self) -> &Loan {
        &self.loan
    }

    /// Down payment + closing costs + points
    pub fn total_cash_invested(&self) -> f64 {
        self.total_cash_invested
    }

    /// Run the full calculation: projection, metrics and IRR
    pub fn calculate(&self) -> CalculatedMetrics {
        let projections = self.project();

        let selling_cost_rate = self.inputs.settings.selling_cost_rate;
        let exit = projections
            .last()
            .map(|p| sale_proceeds(p.property_value, p.loan_balance, selling_cost_rate))
            .unwrap_or(0.0);
        let series = irr_cash_flows(self.total_cash_invested, &projections, exit);
        let irr = solve_irr(&series);

        match irr {
            IrrOutcome::Solved(rate) => debug!("IRR solved at {:.6}", rate),
            IrrOutcome::Undefined => debug!("IRR undefined for this cash-flow series"),
            IrrOutcome::NotConverged => {
                warn!("IRR solver hit its iteration cap without converging")
            }
        }

        let basis = AggregationBasis {
            purchase_price: self.inputs.loan.purchase_price,
            loan_amount: self.loan.principal,
            monthly_payment: self.loan.monthly_payment(),
            total_cash_invested: self.total_cash_invested,
            selling_cost_rate,
        };

        CalculatedMetrics::aggregate(basis, projections, irr)
    }

    /// Project every year of the analysis horizon
    pub fn project(&self) -> Vec<YearlyProjection> {
        let years = self.inputs.settings.analysis_years;
        let mut state =
            ProjectionState::at_closing(self.inputs.loan.purchase_price, self.loan.principal);
        let mut projections = Vec::with_capacity(years as usize);

        for _ in 1..=years {
            state.advance_year();
            let row = self.project_year(&mut state);
            projections.push(row);
        }

        debug!(
            "projected {} years, cumulative cash flow {:.2}",
            projections.len(),
            state.cumulative_cash_flow
        );

        projections
    }

    /// Calculate one year and roll the state forward
    fn project_year(&self, state: &mut ProjectionState) -> YearlyProjection {
        let mut row = YearlyProjection::new(state.year);

        self.calculate_income(&mut row);
        self.calculate_expenses(&mut row);
        row.noi = row.effective_gross_income - row.operating_expenses;

        self.calculate_debt_service(&mut row);
        row.cash_flow = row.noi - row.debt_service;

        self.calculate_balance_sheet(&mut row);

        // Year's cash plus the equity built since last year, over the cash invested at closing
        let equity_gain = row.equity - state.equity;
        row.roi = return_on_cash(row.cash_flow + equity_gain, self.total_cash_invested);

        state.close_year(row.cash_flow, row.equity);
        row.cumulative_cash_flow = state.cumulative_cash_flow;
        row.total_return = row.cumulative_cash_flow + row.equity - self.total_cash_invested;

        row
    }

    /// Gross rent, vacancy and other income
    fn calculate_income(&self, row: &mut YearlyProjection) {
        let year = row.year;
        row.gross_rent = self.escalation.monthly_rent(year) * 12.0;
        row.vacancy_loss = row.gross_rent * self.inputs.expenses.vacancy_rate / 100.0;
        row.other_income = self.escalation.monthly_other_income(year) * 12.0;
        row.effective_gross_income = row.gross_rent - row.vacancy_loss + row.other_income;
    }

    /// Operating expenses; management and maintenance follow this year's rent
    fn calculate_expenses(&self, row: &mut YearlyProjection) {
        let year = row.year;
        let expenses = &self.inputs.expenses;

        row.property_taxes = self.escalation.property_taxes(year);
        row.insurance = self.escalation.insurance(year);
        row.hoa = self.escalation.monthly_hoa(year) * 12.0;
        row.management_fee = row.gross_rent * expenses.property_management_fee / 100.0;
        row.maintenance = row.gross_rent * expenses.maintenance_reserve / 100.0;
        row.capex = self.escalation.monthly_capex(year) * 12.0;

        row.operating_expenses = row.property_taxes
            + row.insurance
            + row.hoa
            + row.management_fee
            + row.maintenance
            + row.capex;
    }

    /// Level payment for each month of the year still inside the loan term
    fn calculate_debt_service(&self, row: &mut YearlyProjection) {
        let payments = self.loan.payments_in_year(row.year);
        row.debt_service = self.loan.monthly_payment() * payments as f64;

        let (interest, principal) = self.loan.year_split(row.year);
        row.interest_paid = interest;
        row.principal_paid = principal;
    }

    /// Year-end property value, loan balance and equity
    fn calculate_balance_sheet(&self, row: &mut YearlyProjection) {
        row.property_value = self.escalation.property_value(row.year);
        row.loan_balance = self.loan.balance_after(row.year * 12);
        row.equity = row.property_value - row.loan_balance;
    }

    /// Month-by-month cash flow for the first year
    pub fn monthly_breakdown(&self) -> Vec<MonthlyBreakdown> {
        let mut first_year = YearlyProjection::new(1);
        self.calculate_income(&mut first_year);
        self.calculate_expenses(&mut first_year);

        let income = first_year.effective_gross_income / 12.0;
        let expenses = first_year.operating_expenses / 12.0;
        let payment = self.loan.monthly_payment();

        let mut month = Month::January;
        let mut rows = Vec::with_capacity(12);
        for number in 1..=12u32 {
            let mortgage = if number <= self.loan.num_payments() { payment } else { 0.0 };
            rows.push(MonthlyBreakdown {
                month: month.name().to_string(),
                income,
                expenses,
                mortgage,
                interest: self.loan.interest_for_month(number),
                principal: self.loan.principal_for_month(number),
                net_cash_flow: income - expenses - mortgage,
            });
            month = month.succ();
        }

        rows
    }
}

/// Validate `inputs` and run the full calculation
pub fn calculate_roi(inputs: &RoiInputs) -> RoiResult<CalculatedMetrics> {
    let engine = ProjectionEngine::new(inputs.clone())?;
    Ok(engine.calculate())
}

/// Validate `inputs` and build the first-year monthly table
pub fn monthly_breakdown(inputs: &RoiInputs) -> RoiResult<Vec<MonthlyBreakdown>> {
    let engine = ProjectionEngine::new(inputs.clone())?;
    Ok(engine.monthly_breakdown())
}
