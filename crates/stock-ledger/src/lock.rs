//! 行鎖集合

use std::sync::{Arc, PoisonError};
use std::time::{Duration, Instant};

use stock_core::{Ingredient, Result, StockError};

use crate::store::{IngredientRow, IngredientStore};

/// 已取得的排他行鎖集合
///
/// 取鎖一律依食材ID遞增順序進行，讓共用食材的並發製備
/// 之間不可能互相死鎖；Drop 時保證全數釋放
pub struct LockSet {
    rows: Vec<(String, Arc<IngredientRow>)>,
}

impl LockSet {
    /// 依遞增ID順序取得所有行的排他鎖
    ///
    /// 任何一行在 `wait` 內取不到鎖，已持有的鎖全數回退並回傳
    /// `LockTimeout`；找不到的食材回傳 `IngredientNotFound`
    pub fn acquire(store: &IngredientStore, ids: &[String], wait: Duration) -> Result<LockSet> {
        let mut sorted: Vec<String> = ids.to_vec();
        sorted.sort();
        sorted.dedup();

        let deadline = Instant::now() + wait;
        let mut held = LockSet {
            rows: Vec::with_capacity(sorted.len()),
        };

        for id in sorted {
            // row() 失敗或逾時直接回傳：held 於 Drop 釋放已取得的鎖
            let row = store.row(&id)?;
            if !Self::lock_row(&row, deadline) {
                return Err(StockError::LockTimeout { ingredient_id: id });
            }
            held.rows.push((id, row));
        }

        Ok(held)
    }

    /// 在期限內等待單一行的邏輯鎖
    fn lock_row(row: &IngredientRow, deadline: Instant) -> bool {
        let mut state = row.lock_state();
        while state.locked {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                return false;
            };
            let (guard, timeout) = row
                .cond
                .wait_timeout(state, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
            if timeout.timed_out() && state.locked {
                return false;
            }
        }
        state.locked = true;
        true
    }

    /// 檢查某食材行是否在本鎖集合內
    pub fn contains(&self, ingredient_id: &str) -> bool {
        self.rows.iter().any(|(id, _)| id == ingredient_id)
    }

    /// 讀取鎖集合內某食材的當前值
    pub fn ingredient(&self, ingredient_id: &str) -> Option<Ingredient> {
        self.row(ingredient_id)
            .map(|row| row.lock_state().ingredient.clone())
    }

    /// 鎖定的食材ID（遞增順序）
    pub fn ids(&self) -> Vec<&str> {
        self.rows.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub(crate) fn row(&self, ingredient_id: &str) -> Option<&Arc<IngredientRow>> {
        self.rows
            .iter()
            .find(|(id, _)| id == ingredient_id)
            .map(|(_, row)| row)
    }

    /// 鎖定的行數
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 是否未鎖定任何行
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl std::fmt::Debug for LockSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockSet").field("ids", &self.ids()).finish()
    }
}

impl Drop for LockSet {
    fn drop(&mut self) {
        // 依取得順序的反向釋放
        for (_, row) in self.rows.drain(..).rev() {
            let mut state = row.lock_state();
            state.locked = false;
            row.cond.notify_one();
        }
    }
}
