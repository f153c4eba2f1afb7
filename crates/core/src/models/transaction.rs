use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::projection::MAX_PROJECTION_MONTHS;

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

/// Installment schedule attached to a purchase paid in parts.
///
/// The owning transaction's `amount` is always the full purchase amount;
/// `installment_value` is the value of each scheduled payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlan {
    /// Number of scheduled payments (≥ 1)
    pub total: u32,

    /// Installment the purchase is currently on (1-based)
    pub current: u32,

    /// Value of each payment
    pub installment_value: f64,

    /// Installment numbers (1..=total) already marked as paid
    #[serde(default)]
    pub paid_installments: BTreeSet<u32>,
}

impl InstallmentPlan {
    pub fn new(total: u32, installment_value: f64) -> Self {
        Self {
            total,
            current: 1,
            installment_value,
            paid_installments: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn paid_count(&self) -> u32 {
        self.paid_installments.len() as u32
    }

    #[must_use]
    pub fn is_fully_paid(&self) -> bool {
        self.paid_count() >= self.total
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.total < 1 || self.total > MAX_PROJECTION_MONTHS {
            return Err(CoreError::ValidationError(format!(
                "Installment count must be between 1 and {MAX_PROJECTION_MONTHS}, got {}",
                self.total
            )));
        }
        if self.current < 1 || self.current > self.total {
            return Err(CoreError::ValidationError(format!(
                "Current installment {} outside 1..={}",
                self.current, self.total
            )));
        }
        if !self.installment_value.is_finite() || self.installment_value <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Installment value must be a positive number, got {}",
                self.installment_value
            )));
        }
        if let Some(n) = self
            .paid_installments
            .iter()
            .find(|n| **n < 1 || **n > self.total)
        {
            return Err(CoreError::ValidationError(format!(
                "Paid installment {n} outside 1..={}",
                self.total
            )));
        }
        Ok(())
    }
}

/// A single income or expense event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Always positive; the direction comes from `kind`
    pub amount: f64,

    pub description: String,

    pub category: String,

    pub date: NaiveDate,

    #[serde(default)]
    pub is_recurring: bool,

    #[serde(default)]
    pub installments: Option<InstallmentPlan>,
}

impl Transaction {
    /// Amount with sign applied: positive for income, negative for expenses.
    #[must_use]
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    /// Whether the transaction falls in the same calendar month as `as_of`.
    #[must_use]
    pub fn in_month_of(&self, as_of: NaiveDate) -> bool {
        use chrono::Datelike;
        self.date.year() == as_of.year() && self.date.month() == as_of.month()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Transaction amount must be a positive number, got {}",
                self.amount
            )));
        }
        if self.description.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Transaction description is required".into(),
            ));
        }
        if self.category.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Transaction category is required".into(),
            ));
        }
        if let Some(plan) = &self.installments {
            plan.validate()?;
        }
        Ok(())
    }
}

/// Input for creating a transaction. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub installments: Option<InstallmentPlan>,
}

impl NewTransaction {
    pub fn expense(
        amount: f64,
        description: impl Into<String>,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind: TransactionType::Expense,
            amount,
            description: description.into(),
            category: category.into(),
            date,
            is_recurring: false,
            installments: None,
        }
    }

    pub fn income(
        amount: f64,
        description: impl Into<String>,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind: TransactionType::Income,
            ..Self::expense(amount, description, category, date)
        }
    }

    pub fn recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    pub fn with_installments(mut self, plan: InstallmentPlan) -> Self {
        self.installments = Some(plan);
        self
    }

    pub(crate) fn into_transaction(self, id: Uuid) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            amount: self.amount,
            description: self.description,
            category: self.category,
            date: self.date,
            is_recurring: self.is_recurring,
            installments: self.installments,
        }
    }
}

/// Partial update for a transaction. `None` fields are left unchanged.
///
/// `installments: Some(None)` removes an existing plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub kind: Option<TransactionType>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_recurring: Option<bool>,
    pub installments: Option<Option<InstallmentPlan>>,
}

impl TransactionPatch {
    pub(crate) fn apply_to(self, tx: &mut Transaction) {
        if let Some(kind) = self.kind {
            tx.kind = kind;
        }
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        if let Some(description) = self.description {
            tx.description = description;
        }
        if let Some(category) = self.category {
            tx.category = category;
        }
        if let Some(date) = self.date {
            tx.date = date;
        }
        if let Some(is_recurring) = self.is_recurring {
            tx.is_recurring = is_recurring;
        }
        if let Some(installments) = self.installments {
            tx.installments = installments;
        }
    }
}
