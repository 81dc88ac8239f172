//! # Stock
//!
//! 餐飲後台的食材消耗引擎：
//! 以配方為單位的原子扣帳、替代解析、可行性驗證與批次回沖
//!
//! ## 快速開始
//!
//! ```
//! use rust_decimal::Decimal;
//! use stock::{Ingredient, PreparationEngine, Recipe, RecipeLine, Unit};
//!
//! let engine = PreparationEngine::new();
//! engine.register_ingredient(Ingredient::new(
//!     "TOMATO-001".to_string(),
//!     "番茄".to_string(),
//!     Unit::MassKg,
//!     Decimal::from(10),
//! ));
//! engine
//!     .register_recipe(
//!         Recipe::new("SAUCE-01".to_string(), "ITEM-SAUCE".to_string(), 1)
//!             .with_line(RecipeLine::new("TOMATO-001".to_string(), Decimal::from(3))),
//!     )
//!     .unwrap();
//!
//! let batch = engine.prepare("SAUCE-01", 3, "chef-lin").unwrap();
//! assert_eq!(batch.portions_requested, 3);
//! ```

// Re-export 各層主要類型
pub use stock_core::{
    AvailabilityReport, BatchStatus, Ingredient, IngredientAvailability, LineAvailability,
    MovementDirection, MovementEntry, MovementReason, PreparationBatch, Recipe, RecipeLine, Result,
    StockError, SubstituteShortfall, Substitution, Unit, UnitFamily,
};

pub use stock_ledger::{
    AlertSeverity, AlertSink, IngredientStore, Ledger, LockSet, MovementLog, NullAlertSink,
    ThresholdAlert,
};

pub use stock_engine::{
    AvailabilityValidator, CatalogSink, EngineConfig, NullCatalogSink, PreparationEngine,
    RecipeCosting, RollbackCoordinator, SubstituteCandidate, SubstitutionResolver,
};
