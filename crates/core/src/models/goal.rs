use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// One deposit towards a goal. Contributions are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: Uuid,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

/// A savings target with a deadline and a contribution history.
///
/// `current_amount` and `contributions` are only written together through
/// the store, so `current_amount - initial == Σ contributions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,

    pub name: String,

    pub target_amount: f64,

    pub current_amount: f64,

    pub deadline: NaiveDate,

    pub monthly_contribution: f64,

    /// Expected annual return, in percent
    pub expected_return: f64,

    #[serde(default)]
    pub contributions: Vec<Contribution>,
}

impl Goal {
    /// Sum of all logged contributions.
    #[must_use]
    pub fn contributed(&self) -> f64 {
        self.contributions.iter().map(|c| c.amount).sum()
    }

    /// target − current (negative once the goal is exceeded)
    #[must_use]
    pub fn remaining(&self) -> f64 {
        self.target_amount - self.current_amount
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ValidationError("Goal name is required".into()));
        }
        if !self.target_amount.is_finite() || self.target_amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Goal target must be positive, got {}",
                self.target_amount
            )));
        }
        if !self.current_amount.is_finite() || self.current_amount < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Goal current amount must be zero or positive, got {}",
                self.current_amount
            )));
        }
        if !self.monthly_contribution.is_finite() || self.monthly_contribution < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Monthly contribution must be zero or positive, got {}",
                self.monthly_contribution
            )));
        }
        if !self.expected_return.is_finite() {
            return Err(CoreError::ValidationError(
                "Expected return must be a finite percentage".into(),
            ));
        }
        Ok(())
    }
}

/// Where a goal stands relative to its target and deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Completed,
    Overdue,
    /// Deadline within the next 30 days
    Urgent,
    Active,
}

impl GoalStatus {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            GoalStatus::Completed => "Concluída",
            GoalStatus::Overdue => "Vencida",
            GoalStatus::Urgent => "Urgente",
            GoalStatus::Active => "Em andamento",
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Input for creating a goal.
///
/// When `monthly_contribution` is `None` the store derives the payment
/// needed to reach the target by the deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub monthly_contribution: Option<f64>,
    pub expected_return: f64,
}

impl NewGoal {
    pub fn new(
        name: impl Into<String>,
        target_amount: f64,
        deadline: NaiveDate,
        expected_return: f64,
    ) -> Self {
        Self {
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            deadline,
            monthly_contribution: None,
            expected_return,
        }
    }

    pub fn with_current_amount(mut self, amount: f64) -> Self {
        self.current_amount = amount;
        self
    }

    pub fn with_monthly_contribution(mut self, amount: f64) -> Self {
        self.monthly_contribution = Some(amount);
        self
    }

    /// Resolve into a stored goal with the given monthly contribution.
    pub(crate) fn into_goal(self, id: Uuid, monthly_contribution: f64) -> Goal {
        Goal {
            id,
            name: self.name,
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            deadline: self.deadline,
            monthly_contribution,
            expected_return: self.expected_return,
            contributions: Vec::new(),
        }
    }
}

/// Partial update for a goal. Contributions are not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalPatch {
    pub name: Option<String>,
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    pub deadline: Option<NaiveDate>,
    pub monthly_contribution: Option<f64>,
    pub expected_return: Option<f64>,
}

impl GoalPatch {
    pub(crate) fn apply_to(self, goal: &mut Goal) {
        if let Some(name) = self.name {
            goal.name = name;
        }
        if let Some(target) = self.target_amount {
            goal.target_amount = target;
        }
        if let Some(current) = self.current_amount {
            goal.current_amount = current;
        }
        if let Some(deadline) = self.deadline {
            goal.deadline = deadline;
        }
        if let Some(monthly) = self.monthly_contribution {
            goal.monthly_contribution = monthly;
        }
        if let Some(rate) = self.expected_return {
            goal.expected_return = rate;
        }
    }
}
