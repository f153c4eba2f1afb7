use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// The class of a tracked investment holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetType {
    /// Bonds, treasury notes, CDs
    #[serde(rename = "renda-fixa")]
    FixedIncome,
    /// Stocks and other equities
    #[serde(rename = "renda-variavel")]
    VariableIncome,
    #[serde(rename = "criptomoeda")]
    Crypto,
    /// Investment funds
    #[serde(rename = "fundo")]
    Fund,
}

impl AssetType {
    pub const ALL: [AssetType; 4] = [
        AssetType::FixedIncome,
        AssetType::VariableIncome,
        AssetType::Crypto,
        AssetType::Fund,
    ];

    /// Display label used by the dashboard.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AssetType::FixedIncome => "Renda Fixa",
            AssetType::VariableIncome => "Renda Variável",
            AssetType::Crypto => "Criptomoedas",
            AssetType::Fund => "Fundos",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A tracked investment holding.
///
/// Only the latest `current_price` is kept; editing it overwrites the
/// previous value. Invested amount, current value and return are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,

    pub name: String,

    #[serde(rename = "type")]
    pub asset_type: AssetType,

    pub quantity: f64,

    pub purchase_price: f64,

    pub current_price: f64,

    pub purchase_date: NaiveDate,
}

impl Asset {
    /// quantity × purchase price
    #[must_use]
    pub fn invested(&self) -> f64 {
        self.quantity * self.purchase_price
    }

    /// quantity × current price
    #[must_use]
    pub fn current_value(&self) -> f64 {
        self.quantity * self.current_price
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ValidationError("Asset name is required".into()));
        }
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Asset quantity must be zero or positive, got {}",
                self.quantity
            )));
        }
        if !self.purchase_price.is_finite() || self.purchase_price <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Purchase price must be positive, got {}",
                self.purchase_price
            )));
        }
        if !self.current_price.is_finite() || self.current_price < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Current price must be zero or positive, got {}",
                self.current_price
            )));
        }
        Ok(())
    }
}

/// Input for creating an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub quantity: f64,
    pub purchase_price: f64,
    pub current_price: f64,
    pub purchase_date: NaiveDate,
}

impl NewAsset {
    pub fn new(
        name: impl Into<String>,
        asset_type: AssetType,
        quantity: f64,
        purchase_price: f64,
        current_price: f64,
        purchase_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            asset_type,
            quantity,
            purchase_price,
            current_price,
            purchase_date,
        }
    }

    pub(crate) fn into_asset(self, id: Uuid) -> Asset {
        Asset {
            id,
            name: self.name,
            asset_type: self.asset_type,
            quantity: self.quantity,
            purchase_price: self.purchase_price,
            current_price: self.current_price,
            purchase_date: self.purchase_date,
        }
    }
}

/// Partial update for an asset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetPatch {
    pub name: Option<String>,
    pub asset_type: Option<AssetType>,
    pub quantity: Option<f64>,
    pub purchase_price: Option<f64>,
    pub current_price: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
}

impl AssetPatch {
    /// Patch that only overwrites the current price.
    pub fn current_price(price: f64) -> Self {
        Self {
            current_price: Some(price),
            ..Self::default()
        }
    }

    pub(crate) fn apply_to(self, asset: &mut Asset) {
        if let Some(name) = self.name {
            asset.name = name;
        }
        if let Some(asset_type) = self.asset_type {
            asset.asset_type = asset_type;
        }
        if let Some(quantity) = self.quantity {
            asset.quantity = quantity;
        }
        if let Some(price) = self.purchase_price {
            asset.purchase_price = price;
        }
        if let Some(price) = self.current_price {
            asset.current_price = price;
        }
        if let Some(date) = self.purchase_date {
            asset.purchase_date = date;
        }
    }
}
