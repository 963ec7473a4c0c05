//! Projection engine: year-by-year operations, financing and returns

mod state;
mod engine;
mod cashflows;
mod escalation;
mod metrics;
pub mod irr;

pub use state::ProjectionState;
pub use engine::{calculate_roi, monthly_breakdown, ProjectionEngine};
pub use cashflows::{MonthlyBreakdown, YearlyProjection};
pub use escalation::{compound, escalate, EscalationModel};
pub use metrics::{
    cap_rate, dscr, irr_cash_flows, return_on_cash, sale_proceeds, AggregationBasis,
    CalculatedMetrics,
};
pub use irr::{solve_irr, IrrOutcome, IrrStatus};
