use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::goal::Goal;
use crate::models::projection::{
    CashPayment, ComparisonInput, ComparisonPoint, InstallmentPayment, InvestmentOutcome,
    PaymentComparison, PaymentRecommendation, ProjectionParams, ProjectionPoint,
    ProjectionSummary, MAX_PROJECTION_MONTHS,
};

/// Annual percentage → monthly rate, by plain division.
///
/// Not the geometric conversion: saved scenarios and goal payments were
/// computed this way and must keep producing the same numbers.
#[must_use]
pub fn monthly_rate(annual_pct: f64) -> f64 {
    annual_pct / 100.0 / 12.0
}

/// Growth projections, goal payment schedules and the cash-vs-installment
/// comparator. Deterministic, no I/O, no clock reads.
pub struct ProjectionService;

impl ProjectionService {
    pub fn new() -> Self {
        Self
    }

    /// Month-by-month value for months `0..=period_months`.
    ///
    /// Compound: `v[m] = (v[m-1] + monthly) × (1 + r)`.
    /// Simple: `v[m] = v[m-1] + monthly + initial × r` (interest only ever
    /// accrues on the original principal).
    /// Real value: `v[m] / (1 + i)^m` with `i` the monthly inflation rate.
    pub fn project_growth(
        &self,
        params: &ProjectionParams,
    ) -> Result<Vec<ProjectionPoint>, CoreError> {
        validate_params(params)?;

        let rate = monthly_rate(params.annual_return_pct);
        let inflation = monthly_rate(params.annual_inflation_pct);
        let mut points = Vec::with_capacity(params.period_months as usize + 1);
        let mut value = params.initial;

        for month in 0..=params.period_months {
            if month > 0 {
                value = if params.compound {
                    (value + params.monthly_contribution) * (1.0 + rate)
                } else {
                    value + params.monthly_contribution + params.initial * rate
                };
            }
            let real_value = value / (1.0 + inflation).powf(f64::from(month));
            points.push(ProjectionPoint {
                month,
                nominal_value: value,
                real_value,
            });
        }

        Ok(points)
    }

    pub fn summarize(&self, params: &ProjectionParams) -> Result<ProjectionSummary, CoreError> {
        let points = self.project_growth(params)?;
        // project_growth always yields month 0
        let last = points.last().copied().unwrap_or(ProjectionPoint {
            month: 0,
            nominal_value: params.initial,
            real_value: params.initial,
        });

        let total_contributed =
            params.initial + params.monthly_contribution * f64::from(params.period_months);
        let total_return = last.nominal_value - total_contributed;
        let return_pct = if total_contributed > 0.0 {
            Some(total_return / total_contributed * 100.0)
        } else {
            None
        };

        Ok(ProjectionSummary {
            final_nominal: last.nominal_value,
            final_real: last.real_value,
            total_contributed,
            total_return,
            return_pct,
        })
    }

    /// Months between `as_of` and `deadline`, counted as 30-day blocks,
    /// rounded, and never below one.
    #[must_use]
    pub fn months_until(&self, deadline: NaiveDate, as_of: NaiveDate) -> u32 {
        let days = (deadline - as_of).num_days();
        let months = (days as f64 / 30.0).round();
        if months < 1.0 {
            1
        } else {
            months.min(f64::from(u32::MAX)) as u32
        }
    }

    /// Monthly payment that grows `current` into `target` by `deadline`.
    ///
    /// Zero rate: `remaining / n`. Otherwise the ordinary-annuity payment
    /// `remaining / (((1 + r)^n − 1) / r)`. Never negative.
    #[must_use]
    pub fn required_monthly_contribution(
        &self,
        target: f64,
        current: f64,
        deadline: NaiveDate,
        annual_return_pct: f64,
        as_of: NaiveDate,
    ) -> f64 {
        let months_left = f64::from(self.months_until(deadline, as_of));
        let rate = monthly_rate(annual_return_pct);
        let remaining = target - current;

        let payment = if rate == 0.0 {
            remaining / months_left
        } else {
            let factor = ((1.0 + rate).powf(months_left) - 1.0) / rate;
            if factor == 0.0 || !factor.is_finite() {
                remaining / months_left
            } else {
                remaining / factor
            }
        };

        if payment.is_finite() {
            payment.max(0.0)
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn required_monthly_for_goal(&self, goal: &Goal, as_of: NaiveDate) -> f64 {
        self.required_monthly_contribution(
            goal.target_amount,
            goal.current_amount,
            goal.deadline,
            goal.expected_return,
            as_of,
        )
    }

    /// Compare paying cash (with discount) and investing what the
    /// installments would have cost, against paying the installments.
    pub fn compare_payment(&self, input: &ComparisonInput) -> Result<PaymentComparison, CoreError> {
        validate_comparison(input)?;

        let count = input.installment_count.max(1);
        let discount = input.full_price * input.cash_discount_pct / 100.0;
        let cash_final = input.full_price - discount;

        let installment_total = input.installment_value * f64::from(count);
        let installment_interest = installment_total - input.full_price;

        let timeline = self.comparison_timeline(input)?;
        let invested_final = timeline
            .last()
            .map(|p| p.investment_value)
            .unwrap_or(cash_final);

        let extra_contributions = input.installment_value * f64::from(count - 1);
        let investment_return = invested_final - cash_final - extra_contributions;

        let recommendation = if invested_final > installment_total {
            PaymentRecommendation::Cash
        } else {
            PaymentRecommendation::Installment
        };

        Ok(PaymentComparison {
            cash: CashPayment {
                discount,
                final_amount: cash_final,
            },
            installment: InstallmentPayment {
                total_paid: installment_total,
                total_interest: installment_interest,
                monthly_payment: input.installment_value,
            },
            investment: InvestmentOutcome {
                total_invested: cash_final + extra_contributions,
                total_return: investment_return,
                final_amount: invested_final,
                monthly_earnings: investment_return / f64::from(count),
            },
            recommendation,
            savings: (installment_total - invested_final).abs(),
        })
    }

    /// Month-by-month values for `0..=installment_count`: the invested cash
    /// amount grows first, then receives the installment value as a new
    /// contribution on every month except the last.
    pub fn comparison_timeline(
        &self,
        input: &ComparisonInput,
    ) -> Result<Vec<ComparisonPoint>, CoreError> {
        validate_comparison(input)?;

        let count = input.installment_count.max(1);
        let rate = monthly_rate(input.annual_return_pct);
        let mut investment = input.full_price - input.full_price * input.cash_discount_pct / 100.0;
        let mut paid = 0.0;
        let mut points = Vec::with_capacity(count as usize + 1);

        points.push(ComparisonPoint {
            month: 0,
            investment_value: investment,
            installments_paid: paid,
        });
        for month in 1..=count {
            investment *= 1.0 + rate;
            if month < count {
                investment += input.installment_value;
            }
            paid += input.installment_value;
            points.push(ComparisonPoint {
                month,
                investment_value: investment,
                installments_paid: paid,
            });
        }

        Ok(points)
    }
}

impl Default for ProjectionService {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_params(params: &ProjectionParams) -> Result<(), CoreError> {
    for (field, value) in [
        ("initial amount", params.initial),
        ("monthly contribution", params.monthly_contribution),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Projection {field} must be zero or positive, got {value}"
            )));
        }
    }
    if params.period_months > MAX_PROJECTION_MONTHS {
        return Err(CoreError::ValidationError(format!(
            "Projection period must be at most {MAX_PROJECTION_MONTHS} months, got {}",
            params.period_months
        )));
    }
    validate_rate("return", params.annual_return_pct)?;
    validate_rate("inflation", params.annual_inflation_pct)
}

fn validate_comparison(input: &ComparisonInput) -> Result<(), CoreError> {
    for (field, value) in [
        ("full price", input.full_price),
        ("installment value", input.installment_value),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Comparison {field} must be zero or positive, got {value}"
            )));
        }
    }
    if !input.cash_discount_pct.is_finite() || !(0.0..=100.0).contains(&input.cash_discount_pct) {
        return Err(CoreError::ValidationError(format!(
            "Cash discount must be between 0 and 100%, got {}",
            input.cash_discount_pct
        )));
    }
    if input.installment_count > MAX_PROJECTION_MONTHS {
        return Err(CoreError::ValidationError(format!(
            "Installment count must be at most {MAX_PROJECTION_MONTHS}, got {}",
            input.installment_count
        )));
    }
    validate_rate("return", input.annual_return_pct)
}

/// Annual rates at or below -1200% would make the monthly growth factor
/// non-positive.
fn validate_rate(name: &str, annual_pct: f64) -> Result<(), CoreError> {
    if !annual_pct.is_finite() || annual_pct <= -1200.0 {
        return Err(CoreError::ValidationError(format!(
            "Annual {name} rate must be finite and above -1200%, got {annual_pct}"
        )));
    }
    Ok(())
}
