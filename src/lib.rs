//! Property ROI - cash-flow projection engine for rental property investments
//!
//! This library provides:
//! - Loan amortization (level payment, remaining balance, interest/principal split)
//! - Annual escalation of rent, expenses and property value
//! - Year-by-year projection of income, expenses, debt service and equity
//! - Return metrics (cash-on-cash, cap rate, DSCR, IRR)
//! - Batch and sensitivity runs over many scenarios

pub mod error;
pub mod inputs;
pub mod loan;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{RoiError, RoiResult};
pub use inputs::{Expenses, Income, LoanDetails, ProjectionSettings, RoiInputs, Scenario};
pub use loan::{AmortizationRow, Loan};
pub use projection::{
    calculate_roi, monthly_breakdown, CalculatedMetrics, IrrStatus, MonthlyBreakdown,
    ProjectionEngine, YearlyProjection,
};
pub use scenario::ScenarioRunner;
