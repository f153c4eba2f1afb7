use serde::{Deserialize, Serialize};

/// Longest horizon a projection or comparison may span (100 years).
pub const MAX_PROJECTION_MONTHS: u32 = 1200;

/// Inputs of a growth projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub initial: f64,
    pub monthly_contribution: f64,
    pub period_months: u32,
    /// Annual return, in percent
    pub annual_return_pct: f64,
    /// Compound on the running balance, or flat interest on `initial` only
    pub compound: bool,
    /// Annual inflation, in percent
    pub annual_inflation_pct: f64,
}

/// One month of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub month: u32,
    pub nominal_value: f64,
    /// Nominal value deflated by accumulated inflation
    pub real_value: f64,
}

/// Headline figures of a projection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub final_nominal: f64,
    pub final_real: f64,
    /// initial + monthly × period
    pub total_contributed: f64,
    /// final nominal − total contributed
    pub total_return: f64,
    /// `None` when nothing was contributed
    pub return_pct: Option<f64>,
}

/// Inputs of the cash-vs-installment comparator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub full_price: f64,
    /// Discount for paying cash, in percent
    pub cash_discount_pct: f64,
    pub installment_value: f64,
    pub installment_count: u32,
    /// Annual return of the alternative investment, in percent
    pub annual_return_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRecommendation {
    Cash,
    Installment,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashPayment {
    pub discount: f64,
    pub final_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPayment {
    pub total_paid: f64,
    /// total paid − full price
    pub total_interest: f64,
    pub monthly_payment: f64,
}

/// The "pay cash and invest the installments" simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentOutcome {
    pub total_invested: f64,
    pub total_return: f64,
    pub final_amount: f64,
    pub monthly_earnings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentComparison {
    pub cash: CashPayment,
    pub installment: InstallmentPayment,
    pub investment: InvestmentOutcome,
    pub recommendation: PaymentRecommendation,
    /// |installment total − invested final amount|
    pub savings: f64,
}

/// One month of the comparator timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub month: u32,
    pub investment_value: f64,
    pub installments_paid: f64,
}
