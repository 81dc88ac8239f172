//! # Stock Engine
//!
//! 配方備料引擎：可行性驗證、替代解析、交易式扣帳與回沖

pub mod costing;
pub mod engine;
pub mod resolver;
pub mod rollback;
pub mod validator;

// Re-export 主要類型
pub use costing::{CatalogSink, NullCatalogSink, RecipeCosting};
pub use engine::{EngineConfig, PreparationEngine};
pub use resolver::{SubstituteCandidate, SubstitutionResolver};
pub use rollback::RollbackCoordinator;
pub use validator::AvailabilityValidator;
