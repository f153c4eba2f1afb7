use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::AssetType;
use super::goal::GoalStatus;

/// Return of a single asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReturn {
    pub asset_id: Uuid,

    /// quantity × purchase price
    pub invested: f64,

    /// quantity × current price
    pub current_value: f64,

    /// current value − invested
    pub absolute_return: f64,

    /// `None` when nothing was invested (the percentage is undefined)
    pub percentage_return: Option<f64>,
}

/// Aggregate return of all assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReturn {
    pub invested: f64,
    pub current_value: f64,
    pub absolute_return: f64,
    pub percentage_return: Option<f64>,
}

/// Current value held per asset class. Values are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAllocation {
    pub asset_type: AssetType,
    pub value: f64,
}

/// Expense total for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Income and expenses of the calendar month containing `as_of`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub as_of: NaiveDate,
    pub income: f64,
    pub expenses: f64,
    /// income − expenses
    pub net: f64,
}

/// Derived view of one goal at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: Uuid,
    pub progress_pct: f64,
    pub status: GoalStatus,
    /// Calendar days until the deadline (negative once passed)
    pub days_left: i64,
    /// `max(0, round(days_left / 30))`
    pub months_remaining: i64,
    pub remaining: f64,
    /// Months needed at the goal's monthly contribution, if it has one
    pub months_needed: Option<u64>,
}

/// Totals over every goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalsOverview {
    pub count: usize,
    pub completed: usize,
    pub total_target: f64,
    pub total_current: f64,
    pub overall_progress_pct: f64,
}

/// Snapshot used by the dashboard header and the assistant's summary reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialOverview {
    pub as_of: NaiveDate,
    pub transaction_count: usize,
    pub total_balance: f64,
    pub assets_value: f64,
    pub month: MonthlySummary,
    pub goals: GoalsOverview,
}

impl FinancialOverview {
    /// Positive when the month's income exceeds its expenses.
    #[must_use]
    pub fn trend_is_positive(&self) -> bool {
        self.month.income > self.month.expenses
    }
}
