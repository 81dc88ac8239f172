//! # Stock Core
//!
//! 核心資料模型與類型定義

pub mod availability;
pub mod batch;
pub mod ingredient;
pub mod movement;
pub mod recipe;
pub mod substitution;
pub mod unit;

// Re-export 主要類型
pub use availability::{
    AvailabilityReport, IngredientAvailability, LineAvailability, SubstituteShortfall,
};
pub use batch::{BatchStatus, PreparationBatch};
pub use ingredient::Ingredient;
pub use movement::{MovementDirection, MovementEntry, MovementReason};
pub use recipe::{Recipe, RecipeLine};
pub use substitution::Substitution;
pub use unit::{Unit, UnitFamily};

use rust_decimal::Decimal;
use uuid::Uuid;

/// 庫存引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    #[error("找不到食材: {0}")]
    IngredientNotFound(String),

    #[error("找不到配方: {0}")]
    RecipeNotFound(String),

    #[error("找不到製備批次: {0}")]
    BatchNotFound(Uuid),

    #[error("無效的數量: {0}")]
    InvalidQuantity(Decimal),

    #[error("庫存不足: {ingredient_id} 需要 {requested}, 現有 {available}")]
    InsufficientStock {
        ingredient_id: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("配方 {} 無法製備（缺料 {} 項）", report.recipe_id, report.missing_count)]
    RecipeNotPreparable { report: Box<AvailabilityReport> },

    #[error("庫存在鎖定重檢時已不足: {ingredient_id} 需要 {requested}, 現有 {available}")]
    ConcurrentStockExhausted {
        ingredient_id: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("取得行鎖逾時: {ingredient_id}")]
    LockTimeout { ingredient_id: String },

    #[error("批次 {batch_id} 狀態 {status} 不允許此操作")]
    InvalidBatchState {
        batch_id: Uuid,
        status: BatchStatus,
    },

    #[error("單位不相容: {original} 無法替代為 {substitute}")]
    IncompatibleUnit { original: Unit, substitute: Unit },

    #[error("食材不能替代自己: {0}")]
    SelfSubstitution(String),

    #[error("配方 {recipe_id} 的明細重複引用食材 {ingredient_id}")]
    DuplicateRecipeLine {
        recipe_id: String,
        ingredient_id: String,
    },

    #[error("銷售品項 {0} 已綁定其他配方")]
    DuplicateRecipe(String),

    #[error("食材已停用: {0}")]
    InactiveIngredient(String),

    #[error("內部錯誤: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, StockError>;
