pub mod assistant;
pub mod errors;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use errors::CoreError;
use models::{
    analytics::{
        AssetReturn, CategoryTotal, FinancialOverview, GoalProgress, GoalsOverview,
        MonthlySummary, PortfolioReturn, TypeAllocation,
    },
    asset::{Asset, AssetPatch, NewAsset},
    finance::FinanceData,
    goal::{Contribution, Goal, GoalPatch, NewGoal},
    installment::{InstallmentFilter, InstallmentOverview, InstallmentProgress, ScheduledInstallment},
    investment::{Investment, InvestmentPatch, NewInvestment},
    projection::{
        ComparisonInput, ComparisonPoint, PaymentComparison, ProjectionParams, ProjectionPoint,
        ProjectionSummary,
    },
    settings::{MissingIdPolicy, Settings, SnapshotFormat},
    transaction::{NewTransaction, Transaction, TransactionPatch, TransactionType},
};
use services::{
    analytics_service::AnalyticsService, goal_service::GoalService,
    installment_service::InstallmentService, ledger_service::LedgerService,
    projection_service::ProjectionService,
};
use storage::backend::{KeyValueBackend, MemoryBackend};
use storage::{format, manager::StorageManager};

/// Main entry point of the finance-tracker core.
///
/// Owns the four entity collections and the storage backend they are
/// snapshotted into. Every successful mutation writes the whole store
/// under `settings.storage_key` before it becomes visible; if that write
/// fails the in-memory state is left as it was.
#[must_use]
pub struct FinanceTracker {
    data: FinanceData,
    settings: Settings,
    backend: Box<dyn KeyValueBackend + Send>,
    ledger: LedgerService,
    analytics: AnalyticsService,
    goal_service: GoalService,
    projection_service: ProjectionService,
    installment_service: InstallmentService,
}

impl std::fmt::Debug for FinanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("transactions", &self.data.transactions.len())
            .field("assets", &self.data.assets.len())
            .field("goals", &self.data.goals.len())
            .field("investments", &self.data.investments.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl FinanceTracker {
    // ── Lifecycle ───────────────────────────────────────────────────

    /// Load the snapshot stored under `settings.storage_key`, or start empty
    /// when nothing was stored yet.
    pub fn open(
        backend: impl KeyValueBackend + Send + 'static,
        settings: Settings,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let data = StorageManager::load(&backend, &settings.storage_key)?.unwrap_or_default();
        Ok(Self::build(Box::new(backend), settings, data))
    }

    /// Like [`open`](Self::open), but an empty backend is initialised with
    /// `seed`, which is written immediately.
    pub fn open_or_seed(
        backend: impl KeyValueBackend + Send + 'static,
        settings: Settings,
        seed: FinanceData,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        match StorageManager::load(&backend, &settings.storage_key)? {
            Some(data) => Ok(Self::build(Box::new(backend), settings, data)),
            None => {
                let mut tracker = Self::build(Box::new(backend), settings, FinanceData::default());
                tracker.persist(&seed)?;
                info!(entities = seed.entity_count(), "store seeded");
                tracker.data = seed;
                Ok(tracker)
            }
        }
    }

    /// Empty store on a [`MemoryBackend`] with default settings.
    pub fn in_memory() -> Self {
        Self::build(
            Box::new(MemoryBackend::new()),
            Settings::default(),
            FinanceData::default(),
        )
    }

    /// Write a final snapshot and release the backend.
    pub fn close(mut self) -> Result<(), CoreError> {
        let data = std::mem::take(&mut self.data);
        self.persist(&data)?;
        info!(entities = data.entity_count(), "store closed");
        Ok(())
    }

    fn build(backend: Box<dyn KeyValueBackend + Send>, settings: Settings, data: FinanceData) -> Self {
        Self {
            data,
            settings,
            backend,
            ledger: LedgerService::new(),
            analytics: AnalyticsService::new(),
            goal_service: GoalService::new(),
            projection_service: ProjectionService::new(),
            installment_service: InstallmentService::new(),
        }
    }

    fn persist(&mut self, data: &FinanceData) -> Result<(), CoreError> {
        StorageManager::save(
            self.backend.as_mut(),
            &self.settings.storage_key,
            data,
            self.settings.snapshot_format,
        )
    }

    /// Apply `op` to a copy of the data, persist the copy, then swap it in.
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&LedgerService, &mut FinanceData) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut staged = self.data.clone();
        let out = op(&self.ledger, &mut staged)?;
        self.persist(&staged)?;
        self.data = staged;
        Ok(out)
    }

    /// Turn `NotFound` into `Ok(None)` under [`MissingIdPolicy::Ignore`].
    fn tolerate_missing<T>(&self, result: Result<T, CoreError>) -> Result<Option<T>, CoreError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(CoreError::NotFound { entity, id })
                if self.settings.missing_id_policy == MissingIdPolicy::Ignore =>
            {
                warn!(entity, %id, "unknown id ignored");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    // ── Transactions ────────────────────────────────────────────────

    pub fn add_transaction(&mut self, new: NewTransaction) -> Result<Uuid, CoreError> {
        let id = self.commit(|ledger, data| ledger.add_transaction(data, new))?;
        debug!(%id, "transaction added");
        Ok(id)
    }

    /// `Ok(false)` when the id is unknown and ignored by policy.
    pub fn update_transaction(
        &mut self,
        id: Uuid,
        patch: TransactionPatch,
    ) -> Result<bool, CoreError> {
        let result = self.commit(|ledger, data| ledger.update_transaction(data, id, patch));
        let applied = self.tolerate_missing(result)?.is_some();
        debug!(%id, applied, "transaction updated");
        Ok(applied)
    }

    /// Returns the removed transaction, or `None` when ignored by policy.
    pub fn delete_transaction(&mut self, id: Uuid) -> Result<Option<Transaction>, CoreError> {
        let result = self.commit(|ledger, data| ledger.delete_transaction(data, id));
        let removed = self.tolerate_missing(result)?;
        debug!(%id, removed = removed.is_some(), "transaction deleted");
        Ok(removed)
    }

    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.data.transactions
    }

    #[must_use]
    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.data.transactions.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn transactions_of_type(&self, kind: TransactionType) -> Vec<&Transaction> {
        self.data
            .transactions
            .iter()
            .filter(|t| t.kind == kind)
            .collect()
    }

    // ── Installments ────────────────────────────────────────────────

    /// Record a purchase split into `count` equal installments. The stored
    /// amount is the full `total_amount`.
    pub fn create_installment_purchase(
        &mut self,
        description: impl Into<String>,
        category: Option<String>,
        total_amount: f64,
        count: u32,
        first_date: NaiveDate,
    ) -> Result<Uuid, CoreError> {
        let new = self.installment_service.build_purchase(
            description,
            category,
            total_amount,
            count,
            first_date,
        )?;
        self.add_transaction(new)
    }

    /// `Ok(false)` when the installment was already paid or the id is
    /// ignored by policy.
    pub fn mark_installment_paid(&mut self, id: Uuid, number: u32) -> Result<bool, CoreError> {
        self.set_installment_paid(id, number, true)
    }

    pub fn mark_installment_unpaid(&mut self, id: Uuid, number: u32) -> Result<bool, CoreError> {
        self.set_installment_paid(id, number, false)
    }

    fn set_installment_paid(&mut self, id: Uuid, number: u32, paid: bool) -> Result<bool, CoreError> {
        let result = self.commit(|ledger, data| ledger.set_installment_paid(data, id, number, paid));
        let changed = self.tolerate_missing(result)?.unwrap_or(false);
        debug!(%id, number, paid, changed, "installment toggled");
        Ok(changed)
    }

    /// Mark every installment of the plan as paid.
    pub fn pay_off_installments(&mut self, id: Uuid) -> Result<bool, CoreError> {
        let result = self.commit(|ledger, data| ledger.pay_off_installments(data, id));
        let applied = self.tolerate_missing(result)?.is_some();
        debug!(%id, applied, "installments paid off");
        Ok(applied)
    }

    #[must_use]
    pub fn installment_plans(&self, filter: InstallmentFilter) -> Vec<&Transaction> {
        self.installment_service.plans(&self.data.transactions, filter)
    }

    #[must_use]
    pub fn installment_progress(&self, id: Uuid) -> Option<InstallmentProgress> {
        self.transaction(id)
            .and_then(|tx| self.installment_service.progress(tx))
    }

    #[must_use]
    pub fn installment_schedule(
        &self,
        id: Uuid,
        as_of: NaiveDate,
    ) -> Option<Vec<ScheduledInstallment>> {
        self.transaction(id)
            .and_then(|tx| self.installment_service.schedule(tx, as_of))
    }

    #[must_use]
    pub fn installment_overview(&self) -> InstallmentOverview {
        self.installment_service.overview(&self.data.transactions)
    }

    // ── Assets ──────────────────────────────────────────────────────

    pub fn add_asset(&mut self, new: NewAsset) -> Result<Uuid, CoreError> {
        let id = self.commit(|ledger, data| ledger.add_asset(data, new))?;
        debug!(%id, "asset added");
        Ok(id)
    }

    pub fn update_asset(&mut self, id: Uuid, patch: AssetPatch) -> Result<bool, CoreError> {
        let result = self.commit(|ledger, data| ledger.update_asset(data, id, patch));
        let applied = self.tolerate_missing(result)?.is_some();
        debug!(%id, applied, "asset updated");
        Ok(applied)
    }

    pub fn delete_asset(&mut self, id: Uuid) -> Result<Option<Asset>, CoreError> {
        let result = self.commit(|ledger, data| ledger.delete_asset(data, id));
        let removed = self.tolerate_missing(result)?;
        debug!(%id, removed = removed.is_some(), "asset deleted");
        Ok(removed)
    }

    #[must_use]
    pub fn assets(&self) -> &[Asset] {
        &self.data.assets
    }

    #[must_use]
    pub fn asset(&self, id: Uuid) -> Option<&Asset> {
        self.data.assets.iter().find(|a| a.id == id)
    }

    // ── Goals ───────────────────────────────────────────────────────

    /// Add a goal. Without an explicit monthly contribution, the payment
    /// needed to reach the target by the deadline (seen from `as_of`) is
    /// stored.
    pub fn add_goal(&mut self, new: NewGoal, as_of: NaiveDate) -> Result<Uuid, CoreError> {
        let monthly = match new.monthly_contribution {
            Some(monthly) => monthly,
            None => self.projection_service.required_monthly_contribution(
                new.target_amount,
                new.current_amount,
                new.deadline,
                new.expected_return,
                as_of,
            ),
        };
        let goal = new.into_goal(Uuid::new_v4(), monthly);
        let id = self.commit(|ledger, data| ledger.add_goal(data, goal))?;
        debug!(%id, monthly, "goal added");
        Ok(id)
    }

    pub fn update_goal(&mut self, id: Uuid, patch: GoalPatch) -> Result<bool, CoreError> {
        let result = self.commit(|ledger, data| ledger.update_goal(data, id, patch));
        let applied = self.tolerate_missing(result)?.is_some();
        debug!(%id, applied, "goal updated");
        Ok(applied)
    }

    pub fn delete_goal(&mut self, id: Uuid) -> Result<Option<Goal>, CoreError> {
        let result = self.commit(|ledger, data| ledger.delete_goal(data, id));
        let removed = self.tolerate_missing(result)?;
        debug!(%id, removed = removed.is_some(), "goal deleted");
        Ok(removed)
    }

    /// Log a contribution timestamped now and raise the goal's current
    /// amount by the same value.
    pub fn add_contribution(
        &mut self,
        goal_id: Uuid,
        amount: f64,
    ) -> Result<Option<Contribution>, CoreError> {
        self.add_contribution_at(goal_id, amount, Utc::now())
    }

    pub fn add_contribution_at(
        &mut self,
        goal_id: Uuid,
        amount: f64,
        at: DateTime<Utc>,
    ) -> Result<Option<Contribution>, CoreError> {
        let result = self.commit(|ledger, data| ledger.add_contribution(data, goal_id, amount, at));
        let contribution = self.tolerate_missing(result)?;
        debug!(%goal_id, amount, recorded = contribution.is_some(), "contribution added");
        Ok(contribution)
    }

    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        &self.data.goals
    }

    #[must_use]
    pub fn goal(&self, id: Uuid) -> Option<&Goal> {
        self.data.goals.iter().find(|g| g.id == id)
    }

    #[must_use]
    pub fn goal_progress(&self, id: Uuid, as_of: NaiveDate) -> Option<GoalProgress> {
        self.goal(id).map(|g| self.goal_service.progress(g, as_of))
    }

    #[must_use]
    pub fn goals_progress(&self, as_of: NaiveDate) -> Vec<GoalProgress> {
        self.data
            .goals
            .iter()
            .map(|g| self.goal_service.progress(g, as_of))
            .collect()
    }

    #[must_use]
    pub fn goals_overview(&self) -> GoalsOverview {
        self.goal_service.overview(&self.data.goals)
    }

    /// Payment still needed each month to reach the goal by its deadline.
    #[must_use]
    pub fn required_monthly_for_goal(&self, id: Uuid, as_of: NaiveDate) -> Option<f64> {
        self.goal(id)
            .map(|g| self.projection_service.required_monthly_for_goal(g, as_of))
    }

    // ── Investments ─────────────────────────────────────────────────

    pub fn add_investment(&mut self, new: NewInvestment) -> Result<Uuid, CoreError> {
        let id = self.commit(|ledger, data| ledger.add_investment(data, new))?;
        debug!(%id, "investment added");
        Ok(id)
    }

    pub fn update_investment(
        &mut self,
        id: Uuid,
        patch: InvestmentPatch,
    ) -> Result<bool, CoreError> {
        let result = self.commit(|ledger, data| ledger.update_investment(data, id, patch));
        let applied = self.tolerate_missing(result)?.is_some();
        debug!(%id, applied, "investment updated");
        Ok(applied)
    }

    pub fn delete_investment(&mut self, id: Uuid) -> Result<Option<Investment>, CoreError> {
        let result = self.commit(|ledger, data| ledger.delete_investment(data, id));
        let removed = self.tolerate_missing(result)?;
        debug!(%id, removed = removed.is_some(), "investment deleted");
        Ok(removed)
    }

    #[must_use]
    pub fn investments(&self) -> &[Investment] {
        &self.data.investments
    }

    #[must_use]
    pub fn investment(&self, id: Uuid) -> Option<&Investment> {
        self.data.investments.iter().find(|i| i.id == id)
    }

    /// Growth projection of a saved scenario.
    pub fn project_investment(&self, id: Uuid) -> Result<Vec<ProjectionPoint>, CoreError> {
        let inv = self
            .investment(id)
            .ok_or_else(|| CoreError::not_found("Investment", id))?;
        self.projection_service.project_growth(&inv.projection_params())
    }

    pub fn summarize_investment(&self, id: Uuid) -> Result<ProjectionSummary, CoreError> {
        let inv = self
            .investment(id)
            .ok_or_else(|| CoreError::not_found("Investment", id))?;
        self.projection_service.summarize(&inv.projection_params())
    }

    // ── Projections ─────────────────────────────────────────────────

    pub fn project_growth(&self, params: &ProjectionParams) -> Result<Vec<ProjectionPoint>, CoreError> {
        self.projection_service.project_growth(params)
    }

    pub fn compare_payment(&self, input: &ComparisonInput) -> Result<PaymentComparison, CoreError> {
        self.projection_service.compare_payment(input)
    }

    pub fn comparison_timeline(
        &self,
        input: &ComparisonInput,
    ) -> Result<Vec<ComparisonPoint>, CoreError> {
        self.projection_service.comparison_timeline(input)
    }

    // ── Aggregates ──────────────────────────────────────────────────

    /// Σ income − Σ expenses over every transaction.
    #[must_use]
    pub fn total_balance(&self) -> f64 {
        self.analytics.total_balance(&self.data.transactions)
    }

    #[must_use]
    pub fn monthly_income(&self, as_of: NaiveDate) -> f64 {
        self.analytics.monthly_income(&self.data.transactions, as_of)
    }

    #[must_use]
    pub fn monthly_expenses(&self, as_of: NaiveDate) -> f64 {
        self.analytics.monthly_expenses(&self.data.transactions, as_of)
    }

    #[must_use]
    pub fn monthly_summary(&self, as_of: NaiveDate) -> MonthlySummary {
        self.analytics.monthly_summary(&self.data.transactions, as_of)
    }

    #[must_use]
    pub fn expenses_by_category(&self, month: Option<NaiveDate>) -> Vec<CategoryTotal> {
        self.analytics.expenses_by_category(&self.data.transactions, month)
    }

    #[must_use]
    pub fn top_expense_categories(&self, as_of: NaiveDate, limit: usize) -> Vec<CategoryTotal> {
        self.analytics
            .top_expense_categories(&self.data.transactions, as_of, limit)
    }

    #[must_use]
    pub fn assets_value(&self) -> f64 {
        self.analytics.assets_value(&self.data.assets)
    }

    #[must_use]
    pub fn asset_return(&self, id: Uuid) -> Option<AssetReturn> {
        self.asset(id).map(|a| self.analytics.asset_return(a))
    }

    /// Every asset's return, best percentage first.
    #[must_use]
    pub fn asset_returns(&self) -> Vec<AssetReturn> {
        self.analytics.asset_returns(&self.data.assets)
    }

    #[must_use]
    pub fn portfolio_return(&self) -> PortfolioReturn {
        self.analytics.portfolio_return(&self.data.assets)
    }

    #[must_use]
    pub fn allocation_by_type(&self) -> Vec<TypeAllocation> {
        self.analytics.allocation_by_type(&self.data.assets)
    }

    #[must_use]
    pub fn financial_overview(&self, as_of: NaiveDate) -> FinancialOverview {
        self.analytics.financial_overview(&self.data, as_of)
    }

    // ── Snapshot ────────────────────────────────────────────────────

    #[must_use]
    pub fn data(&self) -> &FinanceData {
        &self.data
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The whole store as a JSON snapshot envelope.
    pub fn export_json(&self) -> Result<String, CoreError> {
        let bytes = format::encode(&self.data, SnapshotFormat::Json)?;
        String::from_utf8(bytes)
            .map_err(|e| CoreError::Serialization(format!("Snapshot is not UTF-8: {e}")))
    }

    /// Replace the whole store with a snapshot produced by
    /// [`export_json`](Self::export_json) (or a binary one, as bytes).
    ///
    /// Fails without touching the store when any collection repeats an id.
    pub fn import_snapshot(&mut self, bytes: &[u8]) -> Result<(), CoreError> {
        let imported = format::decode(bytes)?;
        imported.ensure_unique_ids()?;
        let count = imported.entity_count();
        self.commit(|_, data| {
            *data = imported;
            Ok(())
        })?;
        info!(entities = count, "snapshot imported");
        Ok(())
    }

    pub fn import_json(&mut self, json: &str) -> Result<(), CoreError> {
        self.import_snapshot(json.as_bytes())
    }
}
