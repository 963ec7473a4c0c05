//! Fixed-rate loan math: payment, balance and amortization schedule

mod amortization;

pub use amortization::{AmortizationRow, Loan};
