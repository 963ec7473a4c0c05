//! Fixed-rate loan amortization
//!
//! Supports:
//! - Level monthly payment (annuity formula, interest-free loans included)
//! - Closed-form remaining balance after any number of payments
//! - Interest/principal split per month and per loan year

use serde::{Deserialize, Serialize};

/// A fixed-rate, fully amortizing loan with monthly payments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Amount financed
    pub principal: f64,

    /// Annual interest rate (%)
    pub annual_rate: f64,

    /// Term in years
    pub term_years: u32,
}

/// One row of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Payment number (1-indexed)
    pub month: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    /// Balance after this payment
    pub balance: f64,
}

impl Loan {
    pub fn new(principal: f64, annual_rate: f64, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate,
            term_years,
        }
    }

    /// Periodic (monthly) rate as a decimal
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0 / 100.0
    }

    /// Total number of monthly payments
    pub fn num_payments(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }

    /// Level monthly payment (principal and interest)
    ///
    /// `M = P·i·(1+i)^n / ((1+i)^n − 1)`, or `P / n` for an interest-free loan.
    pub fn monthly_payment(&self) -> f64 {
        let n = self.num_payments();
        if self.principal <= 0.0 || n == 0 {
            return 0.0;
        }

        let i = self.monthly_rate();
        if i == 0.0 {
            return self.principal / n as f64;
        }

        // Same as P·i·g/(g−1); stays finite when g overflows on very long terms
        let growth = (1.0 + i).powf(n as f64);
        self.principal * i / (1.0 - growth.recip())
    }

    /// Remaining balance after `months` payments
    ///
    /// `B(k) = P − P·((1+i)^k − 1) / ((1+i)^n − 1)`, or `P·(1 − k/n)` when
    /// interest-free. Zero once the loan is paid off.
    pub fn balance_after(&self, months: u32) -> f64 {
        let n = self.num_payments();
        if self.principal <= 0.0 || n == 0 || months >= n {
            return 0.0;
        }
        if months == 0 {
            return self.principal;
        }

        let i = self.monthly_rate();
        let balance = if i == 0.0 {
            self.principal * (1.0 - months as f64 / n as f64)
        } else {
            let growth_n = (1.0 + i).powf(n as f64);
            let growth_k = (1.0 + i).powf(months as f64);
            self.principal - self.principal * (growth_k - 1.0) / (growth_n - 1.0)
        };

        balance.max(0.0)
    }

    /// Interest portion of payment `month` (1-indexed)
    pub fn interest_for_month(&self, month: u32) -> f64 {
        if month == 0 || month > self.num_payments() {
            return 0.0;
        }
        self.balance_after(month - 1) * self.monthly_rate()
    }

    /// Principal portion of payment `month` (1-indexed)
    pub fn principal_for_month(&self, month: u32) -> f64 {
        if month == 0 || month > self.num_payments() {
            return 0.0;
        }
        self.balance_after(month - 1) - self.balance_after(month)
    }

    /// Number of payments falling in loan year `year` (1-indexed)
    pub fn payments_in_year(&self, year: u32) -> u32 {
        if year == 0 {
            return 0;
        }
        let start = (year - 1).saturating_mul(12);
        self.num_payments().saturating_sub(start).min(12)
    }

    /// (interest, principal) paid during loan year `year` (1-indexed)
    pub fn year_split(&self, year: u32) -> (f64, f64) {
        let payments = self.payments_in_year(year);
        if payments == 0 {
            return (0.0, 0.0);
        }

        let start = (year - 1).saturating_mul(12);
        let end = start + payments;
        let principal = self.balance_after(start) - self.balance_after(end);
        let interest = self.monthly_payment() * payments as f64 - principal;
        (interest, principal)
    }

    /// Full month-by-month schedule
    pub fn schedule(&self) -> Vec<AmortizationRow> {
        let payment = self.monthly_payment();
        (1..=self.num_payments())
            .map(|month| AmortizationRow {
                month,
                payment,
                interest: self.interest_for_month(month),
                principal: self.principal_for_month(month),
                balance: self.balance_after(month),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_standard_payment() {
        // $240k at 6.5% over 30 years ≈ $1,516.96
        let loan = Loan::new(240_000.0, 6.5, 30);
        assert_abs_diff_eq!(loan.monthly_payment(), 1516.96, epsilon = 0.01);
    }

    #[test]
    fn test_zero_rate_payment_is_exact() {
        let loan = Loan::new(120_000.0, 0.0, 10);
        assert_eq!(loan.monthly_payment(), 1000.0);
        assert_eq!(loan.balance_after(60), 60_000.0);
    }

    #[test]
    fn test_balance_endpoints() {
        let loan = Loan::new(240_000.0, 6.5, 30);
        assert_eq!(loan.balance_after(0), 240_000.0);
        let last_payment = loan.monthly_payment() / (1.0 + loan.monthly_rate());
        assert_abs_diff_eq!(loan.balance_after(359), last_payment, epsilon = 1e-6);
        assert_eq!(loan.balance_after(360), 0.0);
        assert_eq!(loan.balance_after(500), 0.0);
    }

    #[test]
    fn test_balance_strictly_decreasing() {
        let loan = Loan::new(180_000.0, 4.25, 15);
        let mut prior = loan.balance_after(0);
        for k in 1..=loan.num_payments() {
            let balance = loan.balance_after(k);
            assert!(balance < prior, "balance did not decrease at month {}", k);
            prior = balance;
        }
    }

    #[test]
    fn test_balance_matches_iterative_paydown() {
        let loan = Loan::new(100_000.0, 5.0, 30);
        let payment = loan.monthly_payment();
        let mut balance = loan.principal;
        for _ in 0..120 {
            balance = balance * (1.0 + loan.monthly_rate()) - payment;
        }
        assert_relative_eq!(loan.balance_after(120), balance, max_relative = 1e-9);
    }

    #[test]
    fn test_schedule_sums() {
        let loan = Loan::new(50_000.0, 7.0, 5);
        let schedule = loan.schedule();
        assert_eq!(schedule.len(), 60);

        let total_principal: f64 = schedule.iter().map(|r| r.principal).sum();
        assert_abs_diff_eq!(total_principal, 50_000.0, epsilon = 1e-6);

        for row in &schedule {
            assert_abs_diff_eq!(row.interest + row.principal, row.payment, epsilon = 1e-6);
        }
        assert!(schedule[0].interest > schedule[59].interest);
    }

    #[test]
    fn test_year_split_and_short_final_year() {
        let loan = Loan::new(60_000.0, 6.0, 2);
        let (interest_1, principal_1) = loan.year_split(1);
        assert_abs_diff_eq!(principal_1, 60_000.0 - loan.balance_after(12), epsilon = 1e-9);
        let paid = loan.monthly_payment() * 12.0;
        assert_abs_diff_eq!(interest_1 + principal_1, paid, epsilon = 1e-9);

        assert_eq!(loan.payments_in_year(2), 12);
        assert_eq!(loan.payments_in_year(3), 0);
        assert_eq!(loan.year_split(3), (0.0, 0.0));
    }

    #[test]
    fn test_no_loan() {
        let loan = Loan::new(0.0, 6.5, 30);
        assert_eq!(loan.monthly_payment(), 0.0);
        assert_eq!(loan.balance_after(0), 0.0);
        assert_eq!(loan.year_split(1), (0.0, 0.0));
    }

    #[test]
    fn test_extreme_term_stays_bounded() {
        // (1+i)^n overflows to infinity; payment tends to interest-only
        let loan = Loan::new(100_000.0, 6.5, 200_000_000);
        let payment = loan.monthly_payment();
        assert!(payment > 0.0 && payment.is_finite());
        assert_relative_eq!(payment, 100_000.0 * loan.monthly_rate(), max_relative = 1e-9);
        assert!(loan.balance_after(12) <= loan.principal);
        assert!(loan.balance_after(120) <= loan.balance_after(12));

        // Month count saturates instead of overflowing
        let loan = Loan::new(100_000.0, 6.5, 400_000_000);
        assert_eq!(loan.num_payments(), u32::MAX);
        assert!(loan.monthly_payment().is_finite());
        assert_eq!(loan.payments_in_year(300_000_000), 12);
    }
}
