use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::analytics::{
    AssetReturn, CategoryTotal, FinancialOverview, MonthlySummary, PortfolioReturn,
    TypeAllocation,
};
use crate::models::asset::{Asset, AssetType};
use crate::models::finance::FinanceData;
use crate::models::transaction::{Transaction, TransactionType};
use crate::services::goal_service::GoalService;

/// Derives balances, monthly totals, asset returns and allocations.
///
/// Everything is recomputed on each call from the collections passed in.
/// Time-relative figures take an explicit `as_of` date instead of reading
/// the clock.
pub struct AnalyticsService {
    goal_service: GoalService,
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self {
            goal_service: GoalService::new(),
        }
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Σ income − Σ expenses, all-time.
    #[must_use]
    pub fn total_balance(&self, transactions: &[Transaction]) -> f64 {
        transactions.iter().map(Transaction::signed_amount).sum()
    }

    /// Sum of `kind` transactions dated in the month containing `as_of`.
    #[must_use]
    pub fn monthly_total(
        &self,
        transactions: &[Transaction],
        kind: TransactionType,
        as_of: NaiveDate,
    ) -> f64 {
        transactions
            .iter()
            .filter(|t| t.kind == kind && t.in_month_of(as_of))
            .map(|t| t.amount)
            .sum()
    }

    #[must_use]
    pub fn monthly_income(&self, transactions: &[Transaction], as_of: NaiveDate) -> f64 {
        self.monthly_total(transactions, TransactionType::Income, as_of)
    }

    #[must_use]
    pub fn monthly_expenses(&self, transactions: &[Transaction], as_of: NaiveDate) -> f64 {
        self.monthly_total(transactions, TransactionType::Expense, as_of)
    }

    #[must_use]
    pub fn monthly_summary(&self, transactions: &[Transaction], as_of: NaiveDate) -> MonthlySummary {
        let income = self.monthly_income(transactions, as_of);
        let expenses = self.monthly_expenses(transactions, as_of);
        MonthlySummary {
            as_of,
            income,
            expenses,
            net: income - expenses,
        }
    }

    /// Expense totals per category, largest first (ties by name).
    /// With `month = Some(d)` only expenses in the month of `d` count.
    #[must_use]
    pub fn expenses_by_category(
        &self,
        transactions: &[Transaction],
        month: Option<NaiveDate>,
    ) -> Vec<CategoryTotal> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for t in transactions {
            if t.kind != TransactionType::Expense {
                continue;
            }
            if let Some(as_of) = month {
                if !t.in_month_of(as_of) {
                    continue;
                }
            }
            *totals.entry(t.category.as_str()).or_insert(0.0) += t.amount;
        }

        let mut result: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                category: category.to_string(),
                amount,
            })
            .collect();
        result.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.category.cmp(&b.category))
        });
        result
    }

    /// The `limit` largest expense categories of the month containing `as_of`.
    #[must_use]
    pub fn top_expense_categories(
        &self,
        transactions: &[Transaction],
        as_of: NaiveDate,
        limit: usize,
    ) -> Vec<CategoryTotal> {
        let mut all = self.expenses_by_category(transactions, Some(as_of));
        all.truncate(limit);
        all
    }

    // ── Assets ──────────────────────────────────────────────────────

    /// Σ quantity × current price.
    #[must_use]
    pub fn assets_value(&self, assets: &[Asset]) -> f64 {
        assets.iter().map(Asset::current_value).sum()
    }

    #[must_use]
    pub fn asset_return(&self, asset: &Asset) -> AssetReturn {
        let invested = asset.invested();
        let current_value = asset.current_value();
        AssetReturn {
            asset_id: asset.id,
            invested,
            current_value,
            absolute_return: current_value - invested,
            percentage_return: percentage(current_value - invested, invested),
        }
    }

    /// Per-asset returns ranked by percentage return, best first. Assets
    /// with no percentage (nothing invested) come last, in collection order.
    #[must_use]
    pub fn asset_returns(&self, assets: &[Asset]) -> Vec<AssetReturn> {
        let mut returns: Vec<AssetReturn> = assets.iter().map(|a| self.asset_return(a)).collect();
        returns.sort_by(|a, b| match (a.percentage_return, b.percentage_return) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        returns
    }

    #[must_use]
    pub fn portfolio_return(&self, assets: &[Asset]) -> PortfolioReturn {
        let invested: f64 = assets.iter().map(Asset::invested).sum();
        let current_value = self.assets_value(assets);
        PortfolioReturn {
            invested,
            current_value,
            absolute_return: current_value - invested,
            percentage_return: percentage(current_value - invested, invested),
        }
    }

    /// Current value per asset class, in `AssetType::ALL` order.
    /// Classes without holdings are omitted. Values are not rounded.
    #[must_use]
    pub fn allocation_by_type(&self, assets: &[Asset]) -> Vec<TypeAllocation> {
        AssetType::ALL
            .iter()
            .filter_map(|ty| {
                let mut held = assets.iter().filter(|a| a.asset_type == *ty).peekable();
                held.peek()?;
                Some(TypeAllocation {
                    asset_type: *ty,
                    value: held.map(Asset::current_value).sum(),
                })
            })
            .collect()
    }

    // ── Overview ────────────────────────────────────────────────────

    #[must_use]
    pub fn financial_overview(&self, data: &FinanceData, as_of: NaiveDate) -> FinancialOverview {
        FinancialOverview {
            as_of,
            transaction_count: data.transactions.len(),
            total_balance: self.total_balance(&data.transactions),
            assets_value: self.assets_value(&data.assets),
            month: self.monthly_summary(&data.transactions, as_of),
            goals: self.goal_service.overview(&data.goals),
        }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

/// `part / whole × 100`, or `None` when `whole` is zero or the result is
/// not finite.
fn percentage(part: f64, whole: f64) -> Option<f64> {
    if whole == 0.0 {
        return None;
    }
    let pct = part / whole * 100.0;
    pct.is_finite().then_some(pct)
}
