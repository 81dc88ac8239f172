//! 食材行存放區

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use stock_core::{Ingredient, Result, StockError};

/// 單一食材行的內部狀態
pub(crate) struct RowState {
    /// 是否被某個製備/回沖流程持有排他鎖
    pub(crate) locked: bool,

    /// 食材當前值
    pub(crate) ingredient: Ingredient,
}

/// 受鎖保護的食材行
pub(crate) struct IngredientRow {
    pub(crate) state: Mutex<RowState>,
    pub(crate) cond: Condvar,
}

impl IngredientRow {
    /// 取得行狀態（短臨界區；poison 視同可續用）
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, RowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 食材行存放區
///
/// 具行級排他鎖的事務性列存；`quantity_on_hand` 的一切變動
/// 都經由帳本在持鎖狀態下完成
pub struct IngredientStore {
    rows: DashMap<String, Arc<IngredientRow>>,
}

impl IngredientStore {
    /// 創建空的存放區
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    /// 寫入（或覆蓋）一筆食材行
    pub fn insert(&self, ingredient: Ingredient) {
        let id = ingredient.id.clone();
        let row = Arc::new(IngredientRow {
            state: Mutex::new(RowState {
                locked: false,
                ingredient,
            }),
            cond: Condvar::new(),
        });
        self.rows.insert(id, row);
    }

    /// 檢查食材是否存在
    pub fn contains(&self, ingredient_id: &str) -> bool {
        self.rows.contains_key(ingredient_id)
    }

    pub(crate) fn row(&self, ingredient_id: &str) -> Result<Arc<IngredientRow>> {
        self.rows
            .get(ingredient_id)
            .map(|row| Arc::clone(row.value()))
            .ok_or_else(|| StockError::IngredientNotFound(ingredient_id.to_string()))
    }

    /// 讀取食材快照
    ///
    /// 不取行鎖，僅供唯讀檢視；結果可能在回傳後即過期
    pub fn snapshot(&self, ingredient_id: &str) -> Result<Ingredient> {
        let row = self.row(ingredient_id)?;
        let state = row.lock_state();
        Ok(state.ingredient.clone())
    }

    /// 全部食材快照（依ID遞增排序）
    pub fn snapshot_all(&self) -> Vec<Ingredient> {
        let mut all: Vec<Ingredient> = self
            .rows
            .iter()
            .map(|row| row.value().lock_state().ingredient.clone())
            .collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// 停用食材（被引用的食材以停用取代刪除）
    pub fn deactivate(&self, ingredient_id: &str) -> Result<()> {
        let row = self.row(ingredient_id)?;
        let mut state = row.lock_state();
        state.ingredient.is_active = false;
        Ok(())
    }

    /// 低於（或等於）警戒線的啟用中食材清單
    pub fn low_stock(&self) -> Vec<Ingredient> {
        self.snapshot_all()
            .into_iter()
            .filter(|i| i.is_active && i.is_below_threshold())
            .collect()
    }

    /// 食材行數
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 是否為空
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for IngredientStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use stock_core::Unit;

    fn tomato(quantity: i64) -> Ingredient {
        Ingredient::new(
            "TOMATO-001".to_string(),
            "番茄".to_string(),
            Unit::MassKg,
            Decimal::from(quantity),
        )
        .with_alert_threshold(Decimal::from(2))
    }

    #[test]
    fn test_insert_and_snapshot() {
        let store = IngredientStore::new();
        store.insert(tomato(10));

        let snapshot = store.snapshot("TOMATO-001").unwrap();
        assert_eq!(snapshot.quantity_on_hand, Decimal::from(10));
        assert!(store.contains("TOMATO-001"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_missing_ingredient() {
        let store = IngredientStore::new();
        let err = store.snapshot("GHOST-001").unwrap_err();
        assert!(matches!(err, StockError::IngredientNotFound(_)));
    }

    #[test]
    fn test_deactivate() {
        let store = IngredientStore::new();
        store.insert(tomato(10));
        store.deactivate("TOMATO-001").unwrap();

        assert!(!store.snapshot("TOMATO-001").unwrap().is_active);
    }

    #[test]
    fn test_low_stock_listing() {
        let store = IngredientStore::new();
        store.insert(tomato(1)); // 低於警戒線 2
        store.insert(
            Ingredient::new(
                "OIL-001".to_string(),
                "橄欖油".to_string(),
                Unit::VolumeL,
                Decimal::from(20),
            )
            .with_alert_threshold(Decimal::from(5)),
        );

        let low = store.low_stock();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id, "TOMATO-001");
    }

    #[test]
    fn test_snapshot_all_sorted() {
        let store = IngredientStore::new();
        store.insert(Ingredient::new(
            "B-001".to_string(),
            "乙".to_string(),
            Unit::CountPiece,
            Decimal::ONE,
        ));
        store.insert(Ingredient::new(
            "A-001".to_string(),
            "甲".to_string(),
            Unit::CountPiece,
            Decimal::ONE,
        ));

        let ids: Vec<String> = store.snapshot_all().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["A-001".to_string(), "B-001".to_string()]);
    }
}
