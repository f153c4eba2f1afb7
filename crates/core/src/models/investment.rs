use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::projection::{ProjectionParams, MAX_PROJECTION_MONTHS};

/// A saved growth-projection scenario. Not a real holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: Uuid,
    pub name: String,
    pub initial_amount: f64,
    pub monthly_contribution: f64,
    /// Annual, in percent
    pub expected_return: f64,
    /// Length of the projection in months
    pub period: u32,
    pub compound_interest: bool,
    /// Annual, in percent
    #[serde(default)]
    pub inflation: f64,
}

impl Investment {
    /// Parameters to feed the projection engine with this scenario.
    #[must_use]
    pub fn projection_params(&self) -> ProjectionParams {
        ProjectionParams {
            initial: self.initial_amount,
            monthly_contribution: self.monthly_contribution,
            period_months: self.period,
            annual_return_pct: self.expected_return,
            compound: self.compound_interest,
            annual_inflation_pct: self.inflation,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Investment name is required".into(),
            ));
        }
        for (field, value) in [
            ("initial amount", self.initial_amount),
            ("monthly contribution", self.monthly_contribution),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Investment {field} must be zero or positive, got {value}"
                )));
            }
        }
        if !self.expected_return.is_finite() || !self.inflation.is_finite() {
            return Err(CoreError::ValidationError(
                "Investment rates must be finite percentages".into(),
            ));
        }
        if self.period == 0 || self.period > MAX_PROJECTION_MONTHS {
            return Err(CoreError::ValidationError(format!(
                "Investment period must be between 1 and {MAX_PROJECTION_MONTHS} months, got {}",
                self.period
            )));
        }
        Ok(())
    }
}

/// Input for saving a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    pub name: String,
    pub initial_amount: f64,
    pub monthly_contribution: f64,
    pub expected_return: f64,
    pub period: u32,
    pub compound_interest: bool,
    #[serde(default)]
    pub inflation: f64,
}

impl NewInvestment {
    /// Build a scenario from the parameters of a projection run.
    pub fn from_params(name: impl Into<String>, params: &ProjectionParams) -> Self {
        Self {
            name: name.into(),
            initial_amount: params.initial,
            monthly_contribution: params.monthly_contribution,
            expected_return: params.annual_return_pct,
            period: params.period_months,
            compound_interest: params.compound,
            inflation: params.annual_inflation_pct,
        }
    }

    pub(crate) fn into_investment(self, id: Uuid) -> Investment {
        Investment {
            id,
            name: self.name,
            initial_amount: self.initial_amount,
            monthly_contribution: self.monthly_contribution,
            expected_return: self.expected_return,
            period: self.period,
            compound_interest: self.compound_interest,
            inflation: self.inflation,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestmentPatch {
    pub name: Option<String>,
    pub initial_amount: Option<f64>,
    pub monthly_contribution: Option<f64>,
    pub expected_return: Option<f64>,
    pub period: Option<u32>,
    pub compound_interest: Option<bool>,
    pub inflation: Option<f64>,
}

impl InvestmentPatch {
    pub(crate) fn apply_to(self, inv: &mut Investment) {
        if let Some(name) = self.name {
            inv.name = name;
        }
        if let Some(v) = self.initial_amount {
            inv.initial_amount = v;
        }
        if let Some(v) = self.monthly_contribution {
            inv.monthly_contribution = v;
        }
        if let Some(v) = self.expected_return {
            inv.expected_return = v;
        }
        if let Some(v) = self.period {
            inv.period = v;
        }
        if let Some(v) = self.compound_interest {
            inv.compound_interest = v;
        }
        if let Some(v) = self.inflation {
            inv.inflation = v;
        }
    }
}
