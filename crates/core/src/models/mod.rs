pub mod analytics;
pub mod asset;
pub mod finance;
pub mod goal;
pub mod installment;
pub mod investment;
pub mod projection;
pub mod settings;
pub mod transaction;
