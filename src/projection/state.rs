//! Running state carried from one projection year to the next

/// State of the investment at the end of the most recent projected year
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Last completed year (0 = closing)
    pub year: u32,

    /// Equity at the end of the last completed year
    pub equity: f64,

    /// Sum of yearly cash flows so far
    pub cumulative_cash_flow: f64,
}

impl ProjectionState {
    /// State at closing: equity is the down payment (price less amount financed)
    pub fn at_closing(purchase_price: f64, loan_amount: f64) -> Self {
        Self {
            year: 0,
            equity: purchase_price - loan_amount,
            cumulative_cash_flow: 0.0,
        }
    }

    /// Advance to the next year
    pub fn advance_year(&mut self) -> u32 {
        self.year += 1;
        self.year
    }

    /// Record the close of a projected year
    pub fn close_year(&mut self, cash_flow: f64, equity: f64) {
        self.cumulative_cash_flow += cash_flow;
        self.equity = equity;
    }
}
