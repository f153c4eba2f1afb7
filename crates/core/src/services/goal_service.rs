use chrono::NaiveDate;

use crate::models::analytics::{GoalProgress, GoalsOverview};
use crate::models::goal::{Goal, GoalStatus};

/// Days before the deadline from which a goal counts as urgent.
pub const URGENT_WINDOW_DAYS: i64 = 30;

/// Progress and status classification for savings goals.
pub struct GoalService;

impl GoalService {
    pub fn new() -> Self {
        Self
    }

    /// current / target × 100. A non-positive target reports 0.
    #[must_use]
    pub fn progress_pct(&self, goal: &Goal) -> f64 {
        if goal.target_amount > 0.0 {
            goal.current_amount / goal.target_amount * 100.0
        } else {
            0.0
        }
    }

    /// Calendar days from `as_of` to the deadline; negative once passed.
    #[must_use]
    pub fn days_left(&self, goal: &Goal, as_of: NaiveDate) -> i64 {
        (goal.deadline - as_of).num_days()
    }

    /// Completion wins over every date-based state.
    #[must_use]
    pub fn status(&self, goal: &Goal, as_of: NaiveDate) -> GoalStatus {
        if self.progress_pct(goal) >= 100.0 {
            return GoalStatus::Completed;
        }
        let days_left = self.days_left(goal, as_of);
        if days_left < 0 {
            GoalStatus::Overdue
        } else if days_left <= URGENT_WINDOW_DAYS {
            GoalStatus::Urgent
        } else {
            GoalStatus::Active
        }
    }

    #[must_use]
    pub fn progress(&self, goal: &Goal, as_of: NaiveDate) -> GoalProgress {
        let days_left = self.days_left(goal, as_of);
        let remaining = goal.remaining();
        let months_needed = if remaining > 0.0 && goal.monthly_contribution > 0.0 {
            Some((remaining / goal.monthly_contribution).ceil() as u64)
        } else {
            None
        };

        GoalProgress {
            goal_id: goal.id,
            progress_pct: self.progress_pct(goal),
            status: self.status(goal, as_of),
            days_left,
            months_remaining: ((days_left as f64 / 30.0).round() as i64).max(0),
            remaining,
            months_needed,
        }
    }

    #[must_use]
    pub fn overview(&self, goals: &[Goal]) -> GoalsOverview {
        let total_target: f64 = goals.iter().map(|g| g.target_amount).sum();
        let total_current: f64 = goals.iter().map(|g| g.current_amount).sum();
        let completed = goals
            .iter()
            .filter(|g| self.progress_pct(g) >= 100.0)
            .count();

        GoalsOverview {
            count: goals.len(),
            completed,
            total_target,
            total_current,
            overall_progress_pct: if total_target > 0.0 {
                total_current / total_target * 100.0
            } else {
                0.0
            },
        }
    }
}

impl Default for GoalService {
    fn default() -> Self {
        Self::new()
    }
}
