use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::errors::CoreError;

use super::asset::{Asset, AssetType};
use super::goal::Goal;
use super::investment::Investment;
use super::transaction::{InstallmentPlan, Transaction, TransactionType};

/// The main data container: the four entity collections.
/// This is exactly what gets written under the storage key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceData {
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub assets: Vec<Asset>,

    #[serde(default)]
    pub goals: Vec<Goal>,

    #[serde(default)]
    pub investments: Vec<Investment>,
}

impl FinanceData {
    /// Total number of entities across all collections.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.transactions.len() + self.assets.len() + self.goals.len() + self.investments.len()
    }

    /// Every id must appear once within its collection.
    pub fn ensure_unique_ids(&self) -> Result<(), CoreError> {
        check_unique("Transaction", self.transactions.iter().map(|t| t.id))?;
        check_unique("Asset", self.assets.iter().map(|a| a.id))?;
        check_unique("Goal", self.goals.iter().map(|g| g.id))?;
        check_unique("Investment", self.investments.iter().map(|i| i.id))
    }

    /// Sample dataset shown to first-time users of the dashboard.
    pub fn demo() -> Self {
        let transactions = vec![
            demo_transaction(TransactionType::Income, 5000.0, "Salário", "Trabalho", date(2024, 7, 1), true, None),
            demo_transaction(TransactionType::Expense, 1200.0, "Aluguel", "Moradia", date(2024, 7, 5), true, None),
            demo_transaction(TransactionType::Expense, 800.0, "Supermercado", "Alimentação", date(2024, 7, 10), false, None),
            demo_transaction(
                TransactionType::Expense,
                3600.0,
                "Celular iPhone",
                "Tecnologia",
                date(2024, 7, 15),
                false,
                Some(InstallmentPlan {
                    current: 3,
                    ..InstallmentPlan::new(12, 300.0)
                }),
            ),
        ];

        let assets = vec![
            demo_asset("Tesouro Selic 2029", AssetType::FixedIncome, 1000.0, 100.0, 108.5, date(2024, 1, 15)),
            demo_asset("PETR4", AssetType::VariableIncome, 100.0, 32.5, 38.2, date(2024, 3, 20)),
            demo_asset("Bitcoin", AssetType::Crypto, 0.5, 160_000.0, 180_000.0, date(2024, 2, 10)),
        ];

        let goals = vec![
            Goal {
                id: Uuid::new_v4(),
                name: "Casa Própria".into(),
                target_amount: 300_000.0,
                current_amount: 45_000.0,
                deadline: date(2026, 12, 31),
                monthly_contribution: 2000.0,
                expected_return: 0.8,
                contributions: Vec::new(),
            },
            Goal {
                id: Uuid::new_v4(),
                name: "Viagem Europa".into(),
                target_amount: 15_000.0,
                current_amount: 3000.0,
                deadline: date(2025, 6, 30),
                monthly_contribution: 500.0,
                expected_return: 0.6,
                contributions: Vec::new(),
            },
        ];

        let investments = vec![
            Investment {
                id: Uuid::new_v4(),
                name: "Reserva de Emergência".into(),
                initial_amount: 10_000.0,
                monthly_contribution: 1000.0,
                expected_return: 10.5,
                period: 24,
                compound_interest: true,
                inflation: 4.5,
            },
            Investment {
                id: Uuid::new_v4(),
                name: "Aposentadoria".into(),
                initial_amount: 50_000.0,
                monthly_contribution: 2000.0,
                expected_return: 12.0,
                period: 240,
                compound_interest: true,
                inflation: 4.0,
            },
        ];

        Self {
            transactions,
            assets,
            goals,
            investments,
        }
    }
}

fn check_unique(entity: &str, ids: impl Iterator<Item = Uuid>) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CoreError::ValidationError(format!(
                "Duplicate {entity} id {id}"
            )));
        }
    }
    Ok(())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn demo_transaction(
    kind: TransactionType,
    amount: f64,
    description: &str,
    category: &str,
    date: NaiveDate,
    is_recurring: bool,
    installments: Option<InstallmentPlan>,
) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        kind,
        amount,
        description: description.into(),
        category: category.into(),
        date,
        is_recurring,
        installments,
    }
}

fn demo_asset(
    name: &str,
    asset_type: AssetType,
    quantity: f64,
    purchase_price: f64,
    current_price: f64,
    purchase_date: NaiveDate,
) -> Asset {
    Asset {
        id: Uuid::new_v4(),
        name: name.into(),
        asset_type,
        quantity,
        purchase_price,
        current_price,
        purchase_date,
    }
}
