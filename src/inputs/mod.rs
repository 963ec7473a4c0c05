//! Calculator inputs and scenario loading

mod data;
pub mod loader;

pub use data::{
    Expenses, Income, LoanDetails, ProjectionSettings, RoiInputs, MAX_ANALYSIS_YEARS,
    MAX_LOAN_TERM_YEARS,
};
pub use loader::{load_inputs_json, load_scenarios, load_scenarios_from_reader, Scenario};
