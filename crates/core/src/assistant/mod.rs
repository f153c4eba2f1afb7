//! Chat assistant: turns free-text Portuguese messages into store mutations
//! or read-only reports.
//!
//! Parsing ([`intent::interpret`]) is pure; [`ChatAssistant`] executes the
//! resulting [`intent::Command`] against a [`FinanceTracker`].

pub mod categorizer;
pub mod intent;
pub mod responses;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::settings::Settings;
use crate::models::transaction::NewTransaction;
use crate::FinanceTracker;

use intent::{interpret, Command, QueryKind};

/// Kind of answer, used by the UI to style the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyCategory {
    Transaction,
    Query,
    Analysis,
    Suggestion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub text: String,
    pub category: ReplyCategory,
    /// Id of the transaction recorded by this message, if any
    pub created: Option<Uuid>,
}

impl AssistantReply {
    fn new(text: impl Into<String>, category: ReplyCategory) -> Self {
        Self {
            text: text.into(),
            category,
            created: None,
        }
    }
}

/// Executes chat messages against the store.
///
/// Not idempotent: every recognised transaction message records a new
/// transaction.
pub struct ChatAssistant {
    rng: StdRng,
    response_delay_ms: u64,
    currency_symbol: String,
}

impl ChatAssistant {
    pub fn new(settings: &Settings) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            response_delay_ms: settings.response_delay_ms,
            currency_symbol: settings.currency_symbol.clone(),
        }
    }

    /// Deterministic tip/fallback selection and no response delay.
    pub fn with_seed(settings: &Settings, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            response_delay_ms: 0,
            currency_symbol: settings.currency_symbol.clone(),
        }
    }

    #[must_use]
    pub fn greeting(&self) -> AssistantReply {
        AssistantReply::new(responses::GREETING, ReplyCategory::Suggestion)
    }

    /// Interpret `text` and apply it. Recorded transactions are dated `today`.
    ///
    /// Only a failure to persist a recognised mutation is returned as an
    /// error; anything the assistant cannot act on yields a help reply.
    pub fn process(
        &mut self,
        tracker: &mut FinanceTracker,
        text: &str,
        today: NaiveDate,
    ) -> Result<AssistantReply, CoreError> {
        match interpret(text, today) {
            Command::Mutation(new) => self.record(tracker, new),
            Command::Query(kind) => Ok(self.answer(tracker, kind, today)),
            Command::Fallback => {
                debug!("assistant message not understood");
                Ok(self.fallback())
            }
        }
    }

    /// [`process`](Self::process) after the configured delay, dated with the
    /// local calendar day.
    pub async fn respond(
        &mut self,
        tracker: &mut FinanceTracker,
        text: &str,
    ) -> Result<AssistantReply, CoreError> {
        if self.response_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.response_delay_ms)).await;
        }
        let today = chrono::Local::now().date_naive();
        self.process(tracker, text, today)
    }

    fn record(
        &mut self,
        tracker: &mut FinanceTracker,
        new: NewTransaction,
    ) -> Result<AssistantReply, CoreError> {
        let id = match tracker.add_transaction(new) {
            Ok(id) => id,
            Err(e) if e.is_storage_error() => return Err(e),
            Err(e) => {
                warn!(error = %e, "assistant command rejected");
                return Ok(self.fallback());
            }
        };

        let balance = tracker.total_balance();
        let text = tracker
            .transaction(id)
            .map(|tx| responses::transaction_recorded(tx, balance, &self.currency_symbol))
            .unwrap_or_default();
        Ok(AssistantReply {
            text,
            category: ReplyCategory::Transaction,
            created: Some(id),
        })
    }

    fn answer(&mut self, tracker: &FinanceTracker, kind: QueryKind, today: NaiveDate) -> AssistantReply {
        let symbol = self.currency_symbol.as_str();
        match kind {
            QueryKind::Balance => AssistantReply::new(
                responses::balance(
                    tracker.total_balance(),
                    &tracker.monthly_summary(today),
                    symbol,
                ),
                ReplyCategory::Query,
            ),
            QueryKind::Summary => AssistantReply::new(
                responses::summary(&tracker.financial_overview(today), symbol),
                ReplyCategory::Analysis,
            ),
            QueryKind::Spending => AssistantReply::new(
                responses::spending(
                    tracker.monthly_expenses(today),
                    &tracker.top_expense_categories(today, responses::TOP_CATEGORY_LIMIT),
                    symbol,
                ),
                ReplyCategory::Analysis,
            ),
            QueryKind::Tip => {
                let tip = responses::TIPS.choose(&mut self.rng).copied().unwrap_or_default();
                AssistantReply::new(tip, ReplyCategory::Suggestion)
            }
            QueryKind::Goals => AssistantReply::new(
                responses::goals(&tracker.goals_overview(), symbol),
                ReplyCategory::Analysis,
            ),
        }
    }

    fn fallback(&mut self) -> AssistantReply {
        let text = responses::FALLBACKS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_default();
        AssistantReply::new(text, ReplyCategory::Suggestion)
    }
}
