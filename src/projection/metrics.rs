//! Return metrics derived from the yearly projection

use serde::{Deserialize, Serialize};

use super::cashflows::YearlyProjection;
use super::irr::{IrrOutcome, IrrStatus};

/// Complete calculator result
///
/// Ratios that would divide by zero (no cash invested, no debt service) and
/// an IRR that cannot be solved are `None`, serialized as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedMetrics {
    // Monthly metrics (year 1)
    pub monthly_mortgage: f64,
    pub gross_monthly_income: f64,
    pub total_monthly_expenses: f64,
    pub net_monthly_cash_flow: f64,

    // Annual metrics (year 1)
    pub annual_cash_flow: f64,
    pub annual_noi: f64,
    pub annual_debt_service: f64,

    // Key ratios (%, except DSCR)
    pub cash_on_cash_return: Option<f64>,
    pub cap_rate: f64,
    pub dscr: Option<f64>,
    pub irr: Option<f64>,
    pub irr_status: IrrStatus,

    // Investment summary
    pub total_cash_invested: f64,
    pub loan_amount: f64,

    // Whole-horizon totals
    pub cumulative_cash_flow: f64,
    /// Final value less payoff and selling costs
    pub sale_proceeds: f64,
    /// Cash flows + sale proceeds - cash invested
    pub total_profit: f64,
    /// (cash flows + sale proceeds) / cash invested
    pub equity_multiple: Option<f64>,

    // Projections
    pub yearly_projections: Vec<YearlyProjection>,
}

/// Figures the aggregator needs besides the projection rows
#[derive(Debug, Clone, Copy)]
pub struct AggregationBasis {
    pub purchase_price: f64,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_cash_invested: f64,
    /// Selling costs (% of final value)
    pub selling_cost_rate: f64,
}

impl CalculatedMetrics {
    /// Build the result from a finished projection. `projections` must hold at
    /// least one year.
    pub fn aggregate(
        basis: AggregationBasis,
        projections: Vec<YearlyProjection>,
        irr: IrrOutcome,
    ) -> Self {
        let first = projections.first();
        let annual_noi = first.map(|p| p.noi).unwrap_or(0.0);
        let annual_cash_flow = first.map(|p| p.cash_flow).unwrap_or(0.0);
        let annual_debt_service = basis.monthly_payment * 12.0;

        let cumulative_cash_flow = projections
            .last()
            .map(|p| p.cumulative_cash_flow)
            .unwrap_or(0.0);
        let sale_proceeds = projections
            .last()
            .map(|p| sale_proceeds(p.property_value, p.loan_balance, basis.selling_cost_rate))
            .unwrap_or(0.0);
        let total_returned = cumulative_cash_flow + sale_proceeds;

        Self {
            monthly_mortgage: basis.monthly_payment,
            gross_monthly_income: first.map(|p| p.effective_gross_income / 12.0).unwrap_or(0.0),
            total_monthly_expenses: first.map(|p| p.operating_expenses / 12.0).unwrap_or(0.0),
            net_monthly_cash_flow: annual_cash_flow / 12.0,
            annual_cash_flow,
            annual_noi,
            annual_debt_service,
            cash_on_cash_return: return_on_cash(annual_cash_flow, basis.total_cash_invested),
            cap_rate: cap_rate(annual_noi, basis.purchase_price),
            dscr: dscr(annual_noi, annual_debt_service),
            irr: irr.rate().map(|rate| rate * 100.0),
            irr_status: irr.status(),
            total_cash_invested: basis.total_cash_invested,
            loan_amount: basis.loan_amount,
            cumulative_cash_flow,
            sale_proceeds,
            total_profit: total_returned - basis.total_cash_invested,
            equity_multiple: if basis.total_cash_invested > 0.0 {
                Some(total_returned / basis.total_cash_invested)
            } else {
                None
            },
            yearly_projections: projections,
        }
    }

    /// Year-1 projection row
    pub fn first_year(&self) -> Option<&YearlyProjection> {
        self.yearly_projections.first()
    }
}

/// NOI over purchase price, in %
pub fn cap_rate(noi: f64, purchase_price: f64) -> f64 {
    if purchase_price <= 0.0 {
        return 0.0;
    }
    noi / purchase_price * 100.0
}

/// A gain over the cash invested, in %. `None` when nothing was invested.
pub fn return_on_cash(gain: f64, total_cash_invested: f64) -> Option<f64> {
    if total_cash_invested > 0.0 {
        Some(gain / total_cash_invested * 100.0)
    } else {
        None
    }
}

/// Debt service coverage ratio. `None` when there is no debt service.
pub fn dscr(noi: f64, annual_debt_service: f64) -> Option<f64> {
    if annual_debt_service > 0.0 {
        Some(noi / annual_debt_service)
    } else {
        None
    }
}

/// Net proceeds from selling at `property_value` and paying off `loan_balance`
pub fn sale_proceeds(property_value: f64, loan_balance: f64, selling_cost_rate: f64) -> f64 {
    property_value - loan_balance - property_value * selling_cost_rate / 100.0
}

/// IRR series: outlay at t=0, yearly cash flows, sale proceeds added to the last year
pub fn irr_cash_flows(
    total_cash_invested: f64,
    projections: &[YearlyProjection],
    sale_proceeds: f64,
) -> Vec<f64> {
    let mut cashflows = Vec::with_capacity(projections.len() + 1);
    cashflows.push(-total_cash_invested);
    cashflows.extend(projections.iter().map(|p| p.cash_flow));
    if let Some(last) = cashflows.last_mut() {
        if !projections.is_empty() {
            *last += sale_proceeds;
        }
    }
    cashflows
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ratios_guard_zero_denominators() {
        assert_eq!(return_on_cash(1_000.0, 0.0), None);
        assert_eq!(dscr(1_000.0, 0.0), None);
        assert_eq!(cap_rate(1_000.0, 0.0), 0.0);

        assert_relative_eq!(return_on_cash(5_000.0, 50_000.0).unwrap(), 10.0, max_relative = 1e-12);
        assert_relative_eq!(dscr(15_000.0, 12_000.0).unwrap(), 1.25, max_relative = 1e-12);
        assert_relative_eq!(cap_rate(18_000.0, 300_000.0), 6.0, max_relative = 1e-12);
    }

    #[test]
    fn test_sale_proceeds_deducts_selling_costs() {
        assert_eq!(sale_proceeds(400_000.0, 250_000.0, 0.0), 150_000.0);
        let net = sale_proceeds(400_000.0, 250_000.0, 6.0);
        assert_relative_eq!(net, 126_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_irr_series_layout() {
        let mut y1 = YearlyProjection::new(1);
        y1.cash_flow = 1_000.0;
        let mut y2 = YearlyProjection::new(2);
        y2.cash_flow = 1_200.0;

        let series = irr_cash_flows(20_000.0, &[y1, y2], 30_000.0);
        assert_eq!(series, vec![-20_000.0, 1_000.0, 31_200.0]);
        assert_eq!(irr_cash_flows(20_000.0, &[], 30_000.0), vec![-20_000.0]);
    }

    #[test]
    fn test_aggregate_year_one_and_totals() {
        let mut y1 = YearlyProjection::new(1);
        y1.noi = 12_000.0;
        y1.cash_flow = 2_400.0;
        y1.cumulative_cash_flow = 2_400.0;
        y1.effective_gross_income = 24_000.0;
        y1.operating_expenses = 12_000.0;
        y1.property_value = 210_000.0;
        y1.loan_balance = 150_000.0;

        let basis = AggregationBasis {
            purchase_price: 200_000.0,
            loan_amount: 152_000.0,
            monthly_payment: 800.0,
            total_cash_invested: 50_000.0,
            selling_cost_rate: 0.0,
        };
        let metrics = CalculatedMetrics::aggregate(basis, vec![y1], IrrOutcome::Solved(0.125));

        assert_eq!(metrics.annual_debt_service, 9_600.0);
        assert_eq!(metrics.net_monthly_cash_flow, 200.0);
        assert_eq!(metrics.gross_monthly_income, 2_000.0);
        assert_relative_eq!(metrics.cap_rate, 6.0, max_relative = 1e-12);
        assert_relative_eq!(metrics.cash_on_cash_return.unwrap(), 4.8, max_relative = 1e-12);
        assert_relative_eq!(metrics.dscr.unwrap(), 1.25, max_relative = 1e-12);
        assert_eq!(metrics.irr, Some(12.5));
        assert_eq!(metrics.irr_status, IrrStatus::Solved);
        assert_eq!(metrics.sale_proceeds, 60_000.0);
        assert_eq!(metrics.total_profit, 12_400.0);
        assert_relative_eq!(metrics.equity_multiple.unwrap(), 1.248, max_relative = 1e-12);
    }

    #[test]
    fn test_unsolved_irr_is_null() {
        let basis = AggregationBasis {
            purchase_price: 100_000.0,
            loan_amount: 0.0,
            monthly_payment: 0.0,
            total_cash_invested: 0.0,
            selling_cost_rate: 0.0,
        };
        let rows = vec![YearlyProjection::new(1)];
        let metrics = CalculatedMetrics::aggregate(basis, rows, IrrOutcome::NotConverged);
        assert_eq!(metrics.irr, None);
        assert_eq!(metrics.irr_status, IrrStatus::NotConverged);
        assert_eq!(metrics.dscr, None);
        assert_eq!(metrics.equity_multiple, None);

        let json = serde_json::to_value(&metrics).unwrap();
        assert!(json["irr"].is_null());
        assert!(json["cash_on_cash_return"].is_null());
        assert_eq!(json["irr_status"], "not_converged");
    }
}
