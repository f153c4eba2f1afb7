pub mod analytics_service;
pub mod goal_service;
pub mod installment_service;
pub mod ledger_service;
pub mod projection_service;
