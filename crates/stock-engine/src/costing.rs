//! 配方成本計算與品項成本回寫

use rust_decimal::Decimal;

use stock_core::{Recipe, Result, StockError};
use stock_ledger::IngredientStore;

/// 配方成本計算器
pub struct RecipeCosting;

impl RecipeCosting {
    /// 單份成本 = Σ(每批用量 × 食材單位成本) ÷ 每批份數
    pub fn unit_cost(recipe: &Recipe, store: &IngredientStore) -> Result<Decimal> {
        if recipe.portions_per_batch == 0 {
            return Err(StockError::InvalidQuantity(Decimal::ZERO));
        }
        let mut total = Decimal::ZERO;
        for line in &recipe.lines {
            let ingredient = store.snapshot(&line.ingredient_id)?;
            total += line.quantity_per_batch * ingredient.unit_cost;
        }
        Ok(total / Decimal::from(recipe.portions_per_batch))
    }
}

/// 銷售品項目錄回寫介面
///
/// 配方註冊/更新時把重算的單份成本推回品項目錄；
/// 僅盡力而為，失敗由呼叫方記錄後忽略
pub trait CatalogSink: Send + Sync {
    fn push_unit_cost(
        &self,
        catalog_item_id: &str,
        unit_cost: Decimal,
    ) -> std::result::Result<(), String>;
}

/// 不做任何事的目錄端（預設）
pub struct NullCatalogSink;

impl CatalogSink for NullCatalogSink {
    fn push_unit_cost(
        &self,
        _catalog_item_id: &str,
        _unit_cost: Decimal,
    ) -> std::result::Result<(), String> {
        Ok(())
    }
}
