//! Annual escalation of income, expense and property value line items

use crate::inputs::RoiInputs;

/// Value in year `year` (1-indexed) of a base amount growing `rate_pct` per year.
/// Year 1 is the base amount.
pub fn escalate(base: f64, rate_pct: f64, year: u32) -> f64 {
    if year <= 1 {
        return base;
    }
    base * (1.0 + rate_pct / 100.0).powi(year as i32 - 1)
}

/// Value after `years` full years of compounding at `rate_pct`
pub fn compound(base: f64, rate_pct: f64, years: u32) -> f64 {
    base * (1.0 + rate_pct / 100.0).powi(years as i32)
}

/// Growth rates applied to each line item of a scenario.
///
/// Insurance, HOA and capex carry no growth unless the inputs supply a rate.
/// Management fee and maintenance are not escalated here; they are charged
/// as a share of each year's rent.
#[derive(Debug, Clone)]
pub struct EscalationModel {
    monthly_rent: f64,
    rent_growth: f64,
    other_income: f64,
    property_taxes: f64,
    tax_growth: f64,
    annual_insurance: f64,
    insurance_growth: f64,
    monthly_hoa: f64,
    hoa_growth: f64,
    monthly_capex: f64,
    capex_growth: f64,
    purchase_price: f64,
    appreciation: f64,
}

impl EscalationModel {
    pub fn from_inputs(inputs: &RoiInputs) -> Self {
        let expenses = &inputs.expenses;
        Self {
            monthly_rent: inputs.income.monthly_rent,
            rent_growth: inputs.income.annual_rent_increase,
            other_income: inputs.income.other_income,
            property_taxes: expenses.property_taxes,
            tax_growth: expenses.property_tax_increase_rate,
            annual_insurance: expenses.home_insurance + expenses.landlord_insurance,
            insurance_growth: expenses.insurance_increase_rate.unwrap_or(0.0),
            monthly_hoa: expenses.hoa_fees,
            hoa_growth: expenses.hoa_increase_rate.unwrap_or(0.0),
            monthly_capex: expenses.capex_reserve,
            capex_growth: expenses.capex_increase_rate.unwrap_or(0.0),
            purchase_price: inputs.loan.purchase_price,
            appreciation: inputs.settings.property_appreciation,
        }
    }

    pub fn monthly_rent(&self, year: u32) -> f64 {
        escalate(self.monthly_rent, self.rent_growth, year)
    }

    /// Non-rent income is flat
    pub fn monthly_other_income(&self, _year: u32) -> f64 {
        self.other_income
    }

    pub fn property_taxes(&self, year: u32) -> f64 {
        escalate(self.property_taxes, self.tax_growth, year)
    }

    /// Home plus landlord insurance, annual
    pub fn insurance(&self, year: u32) -> f64 {
        escalate(self.annual_insurance, self.insurance_growth, year)
    }

    pub fn monthly_hoa(&self, year: u32) -> f64 {
        escalate(self.monthly_hoa, self.hoa_growth, year)
    }

    pub fn monthly_capex(&self, year: u32) -> f64 {
        escalate(self.monthly_capex, self.capex_growth, year)
    }

    /// Property value at the end of year `year`
    pub fn property_value(&self, year: u32) -> f64 {
        compound(self.purchase_price, self.appreciation, year)
    }
}
