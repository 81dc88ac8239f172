//! # Stock Ledger
//!
//! 食材行存放區、行級鎖與帳本異動簿記

pub mod alert;
pub mod ledger;
pub mod lock;
pub mod movements;
pub mod store;

// Re-export 主要類型
pub use alert::{AlertSeverity, AlertSink, NullAlertSink, ThresholdAlert};
pub use ledger::Ledger;
pub use lock::LockSet;
pub use movements::MovementLog;
pub use store::IngredientStore;
