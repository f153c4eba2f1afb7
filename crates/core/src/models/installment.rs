use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment state of an installment plan as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    /// Nothing paid yet
    Pending,
    /// Some, not all, installments paid
    Partial,
    Completed,
}

impl InstallmentStatus {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            InstallmentStatus::Pending => "Pendente",
            InstallmentStatus::Partial => "Em andamento",
            InstallmentStatus::Completed => "Quitado",
        }
    }
}

/// One due payment of an installment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    /// 1-based
    pub number: u32,
    pub due_date: NaiveDate,
    pub value: f64,
    pub is_paid: bool,
    /// Unpaid and due before the reference date
    pub is_overdue: bool,
}

/// Which plans a listing should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallmentFilter {
    /// Not yet fully paid
    #[default]
    Active,
    Completed,
    All,
}

/// Totals over every installment purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentOverview {
    pub plan_count: usize,
    /// Σ full purchase amounts
    pub total_value: f64,
    /// Σ paid count × installment value
    pub total_paid: f64,
    pub total_remaining: f64,
}

/// Progress of a single plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentProgress {
    pub transaction_id: Uuid,
    pub status: InstallmentStatus,
    pub paid_count: u32,
    pub total: u32,
    pub progress_pct: f64,
}
