use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::asset::{Asset, AssetPatch, NewAsset};
use crate::models::finance::FinanceData;
use crate::models::goal::{Contribution, Goal, GoalPatch};
use crate::models::investment::{Investment, InvestmentPatch, NewInvestment};
use crate::models::transaction::{NewTransaction, Transaction, TransactionPatch};

/// Create/update/delete for the four entity collections.
///
/// Pure business logic: every method validates first and only then touches
/// `data`, so a failed call leaves the collections as they were.
/// Unknown ids always produce `CoreError::NotFound`; the tracker decides
/// whether to surface or ignore it.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    // ── Transactions ────────────────────────────────────────────────

    pub fn add_transaction(
        &self,
        data: &mut FinanceData,
        new: NewTransaction,
    ) -> Result<Uuid, CoreError> {
        let tx = new.into_transaction(Uuid::new_v4());
        tx.validate()?;
        let id = tx.id;
        data.transactions.push(tx);
        Ok(id)
    }

    pub fn update_transaction(
        &self,
        data: &mut FinanceData,
        id: Uuid,
        patch: TransactionPatch,
    ) -> Result<(), CoreError> {
        let idx = position(&data.transactions, id, |t| t.id, "Transaction")?;
        let mut updated = data.transactions[idx].clone();
        patch.apply_to(&mut updated);
        updated.validate()?;
        data.transactions[idx] = updated;
        Ok(())
    }

    pub fn delete_transaction(
        &self,
        data: &mut FinanceData,
        id: Uuid,
    ) -> Result<Transaction, CoreError> {
        let idx = position(&data.transactions, id, |t| t.id, "Transaction")?;
        Ok(data.transactions.remove(idx))
    }

    /// Mark installment `number` as paid or unpaid.
    /// Returns `false` when the installment already had the requested state.
    pub fn set_installment_paid(
        &self,
        data: &mut FinanceData,
        id: Uuid,
        number: u32,
        paid: bool,
    ) -> Result<bool, CoreError> {
        let idx = position(&data.transactions, id, |t| t.id, "Transaction")?;
        let plan = data.transactions[idx].installments.as_mut().ok_or_else(|| {
            CoreError::ValidationError(format!("Transaction {id} has no installment plan"))
        })?;
        if number < 1 || number > plan.total {
            return Err(CoreError::ValidationError(format!(
                "Installment {number} outside 1..={}",
                plan.total
            )));
        }
        let changed = if paid {
            plan.paid_installments.insert(number)
        } else {
            plan.paid_installments.remove(&number)
        };
        Ok(changed)
    }

    /// Mark every installment of the plan as paid.
    pub fn pay_off_installments(&self, data: &mut FinanceData, id: Uuid) -> Result<(), CoreError> {
        let idx = position(&data.transactions, id, |t| t.id, "Transaction")?;
        let plan = data.transactions[idx].installments.as_mut().ok_or_else(|| {
            CoreError::ValidationError(format!("Transaction {id} has no installment plan"))
        })?;
        plan.paid_installments = (1..=plan.total).collect();
        Ok(())
    }

    // ── Assets ──────────────────────────────────────────────────────

    pub fn add_asset(&self, data: &mut FinanceData, new: NewAsset) -> Result<Uuid, CoreError> {
        let asset = new.into_asset(Uuid::new_v4());
        asset.validate()?;
        let id = asset.id;
        data.assets.push(asset);
        Ok(id)
    }

    pub fn update_asset(
        &self,
        data: &mut FinanceData,
        id: Uuid,
        patch: AssetPatch,
    ) -> Result<(), CoreError> {
        let idx = position(&data.assets, id, |a| a.id, "Asset")?;
        let mut updated = data.assets[idx].clone();
        patch.apply_to(&mut updated);
        updated.validate()?;
        data.assets[idx] = updated;
        Ok(())
    }

    pub fn delete_asset(&self, data: &mut FinanceData, id: Uuid) -> Result<Asset, CoreError> {
        let idx = position(&data.assets, id, |a| a.id, "Asset")?;
        Ok(data.assets.remove(idx))
    }

    // ── Goals ───────────────────────────────────────────────────────

    /// Append a fully resolved goal (monthly contribution already decided).
    pub fn add_goal(&self, data: &mut FinanceData, goal: Goal) -> Result<Uuid, CoreError> {
        goal.validate()?;
        let id = goal.id;
        data.goals.push(goal);
        Ok(id)
    }

    pub fn update_goal(
        &self,
        data: &mut FinanceData,
        id: Uuid,
        patch: GoalPatch,
    ) -> Result<(), CoreError> {
        let idx = position(&data.goals, id, |g| g.id, "Goal")?;
        let mut updated = data.goals[idx].clone();
        patch.apply_to(&mut updated);
        updated.validate()?;
        data.goals[idx] = updated;
        Ok(())
    }

    pub fn delete_goal(&self, data: &mut FinanceData, id: Uuid) -> Result<Goal, CoreError> {
        let idx = position(&data.goals, id, |g| g.id, "Goal")?;
        Ok(data.goals.remove(idx))
    }

    /// Log a contribution and raise the goal's current amount by the same
    /// value. Both writes happen here and nowhere else.
    pub fn add_contribution(
        &self,
        data: &mut FinanceData,
        goal_id: Uuid,
        amount: f64,
        at: DateTime<Utc>,
    ) -> Result<Contribution, CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Contribution amount must be a positive number, got {amount}"
            )));
        }
        let idx = position(&data.goals, goal_id, |g| g.id, "Goal")?;
        let contribution = Contribution {
            id: Uuid::new_v4(),
            amount,
            date: at,
        };
        let goal = &mut data.goals[idx];
        goal.current_amount += amount;
        goal.contributions.push(contribution.clone());
        Ok(contribution)
    }

    // ── Investments ─────────────────────────────────────────────────

    pub fn add_investment(
        &self,
        data: &mut FinanceData,
        new: NewInvestment,
    ) -> Result<Uuid, CoreError> {
        let inv = new.into_investment(Uuid::new_v4());
        inv.validate()?;
        let id = inv.id;
        data.investments.push(inv);
        Ok(id)
    }

    pub fn update_investment(
        &self,
        data: &mut FinanceData,
        id: Uuid,
        patch: InvestmentPatch,
    ) -> Result<(), CoreError> {
        let idx = position(&data.investments, id, |i| i.id, "Investment")?;
        let mut updated = data.investments[idx].clone();
        patch.apply_to(&mut updated);
        updated.validate()?;
        data.investments[idx] = updated;
        Ok(())
    }

    pub fn delete_investment(
        &self,
        data: &mut FinanceData,
        id: Uuid,
    ) -> Result<Investment, CoreError> {
        let idx = position(&data.investments, id, |i| i.id, "Investment")?;
        Ok(data.investments.remove(idx))
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

fn position<T>(
    items: &[T],
    id: Uuid,
    key: impl Fn(&T) -> Uuid,
    entity: &'static str,
) -> Result<usize, CoreError> {
    items
        .iter()
        .position(|item| key(item) == id)
        .ok_or_else(|| CoreError::not_found(entity, id))
}
