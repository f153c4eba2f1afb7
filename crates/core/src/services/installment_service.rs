use chrono::{Months, NaiveDate};

use crate::errors::CoreError;
use crate::models::installment::{
    InstallmentFilter, InstallmentOverview, InstallmentProgress, InstallmentStatus,
    ScheduledInstallment,
};
use crate::models::projection::MAX_PROJECTION_MONTHS;
use crate::models::transaction::{InstallmentPlan, NewTransaction, Transaction};

/// Category used when an installment purchase is created without one.
pub const DEFAULT_INSTALLMENT_CATEGORY: &str = "Parcelamento";

/// Schedules, status and totals for purchases paid in installments.
pub struct InstallmentService;

impl InstallmentService {
    pub fn new() -> Self {
        Self
    }

    /// Build an expense for `total_amount` split into `count` equal payments,
    /// the first one due on `first_date`.
    pub fn build_purchase(
        &self,
        description: impl Into<String>,
        category: Option<String>,
        total_amount: f64,
        count: u32,
        first_date: NaiveDate,
    ) -> Result<NewTransaction, CoreError> {
        if count < 1 || count > MAX_PROJECTION_MONTHS {
            return Err(CoreError::ValidationError(format!(
                "Installment count must be between 1 and {MAX_PROJECTION_MONTHS}, got {count}"
            )));
        }
        if !total_amount.is_finite() || total_amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Installment purchase total must be positive, got {total_amount}"
            )));
        }

        let category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_INSTALLMENT_CATEGORY.to_string());
        let plan = InstallmentPlan::new(count, total_amount / f64::from(count));

        Ok(NewTransaction::expense(total_amount, description, category, first_date)
            .with_installments(plan))
    }

    #[must_use]
    pub fn status(&self, plan: &InstallmentPlan) -> InstallmentStatus {
        let paid = plan.paid_count();
        if paid >= plan.total {
            InstallmentStatus::Completed
        } else if paid > 0 {
            InstallmentStatus::Partial
        } else {
            InstallmentStatus::Pending
        }
    }

    /// `None` for transactions without an installment plan.
    #[must_use]
    pub fn progress(&self, tx: &Transaction) -> Option<InstallmentProgress> {
        let plan = tx.installments.as_ref()?;
        let paid_count = plan.paid_count();
        Some(InstallmentProgress {
            transaction_id: tx.id,
            status: self.status(plan),
            paid_count,
            total: plan.total,
            progress_pct: if plan.total > 0 {
                f64::from(paid_count) / f64::from(plan.total) * 100.0
            } else {
                0.0
            },
        })
    }

    /// Due dates fall on the transaction date plus `n − 1` months; days past
    /// the end of a shorter month are clamped to its last day.
    #[must_use]
    pub fn schedule(&self, tx: &Transaction, as_of: NaiveDate) -> Option<Vec<ScheduledInstallment>> {
        let plan = tx.installments.as_ref()?;
        let schedule = (1..=plan.total)
            .map(|number| {
                let due_date = tx
                    .date
                    .checked_add_months(Months::new(number - 1))
                    .unwrap_or(NaiveDate::MAX);
                let is_paid = plan.paid_installments.contains(&number);
                ScheduledInstallment {
                    number,
                    due_date,
                    value: plan.installment_value,
                    is_paid,
                    is_overdue: !is_paid && due_date < as_of,
                }
            })
            .collect();
        Some(schedule)
    }

    /// Installment purchases matching `filter`, in collection order.
    #[must_use]
    pub fn plans<'a>(
        &self,
        transactions: &'a [Transaction],
        filter: InstallmentFilter,
    ) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|t| match (&t.installments, filter) {
                (None, _) => false,
                (Some(_), InstallmentFilter::All) => true,
                (Some(plan), InstallmentFilter::Active) => !plan.is_fully_paid(),
                (Some(plan), InstallmentFilter::Completed) => plan.is_fully_paid(),
            })
            .collect()
    }

    #[must_use]
    pub fn overview(&self, transactions: &[Transaction]) -> InstallmentOverview {
        let plans = self.plans(transactions, InstallmentFilter::All);
        let total_value: f64 = plans.iter().map(|t| t.amount).sum();
        let total_paid: f64 = plans
            .iter()
            .filter_map(|t| t.installments.as_ref())
            .map(|p| f64::from(p.paid_count()) * p.installment_value)
            .sum();

        InstallmentOverview {
            plan_count: plans.len(),
            total_value,
            total_paid,
            total_remaining: total_value - total_paid,
        }
    }
}

impl Default for InstallmentService {
    fn default() -> Self {
        Self::new()
    }
}
