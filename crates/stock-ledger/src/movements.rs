//! 庫存異動日誌（僅追加）

use std::sync::{Mutex, PoisonError};

use rust_decimal::Decimal;
use stock_core::{MovementEntry, MovementReason};

/// 異動日誌
///
/// 每一筆帳本變動的不可變記錄；稽核與回沖的唯一事實來源。
/// 食材的當前量恆可由「初始量 + 帶符號異動總和」重算得出
pub struct MovementLog {
    entries: Mutex<Vec<MovementEntry>>,
}

impl MovementLog {
    /// 創建空的日誌
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, Vec<MovementEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 追加一筆異動
    pub fn append(&self, entry: MovementEntry) {
        self.lock_entries().push(entry);
    }

    /// 某食材的全部異動
    pub fn entries_for_ingredient(&self, ingredient_id: &str) -> Vec<MovementEntry> {
        self.lock_entries()
            .iter()
            .filter(|e| e.ingredient_id == ingredient_id)
            .cloned()
            .collect()
    }

    /// 某關聯參考的全部異動
    pub fn entries_for_reference(&self, reference: &str) -> Vec<MovementEntry> {
        self.lock_entries()
            .iter()
            .filter(|e| e.reference == reference)
            .cloned()
            .collect()
    }

    /// 某關聯參考的消耗異動（回沖的輸入）
    pub fn consumption_for_reference(&self, reference: &str) -> Vec<MovementEntry> {
        self.lock_entries()
            .iter()
            .filter(|e| e.reference == reference && e.reason == MovementReason::Consumption)
            .cloned()
            .collect()
    }

    /// 依異動流水重算食材當前量（對帳用）
    pub fn reconcile(&self, ingredient_id: &str, initial: Decimal) -> Decimal {
        self.lock_entries()
            .iter()
            .filter(|e| e.ingredient_id == ingredient_id)
            .fold(initial, |acc, e| acc + e.signed_quantity())
    }

    /// 全部異動的快照
    pub fn all(&self) -> Vec<MovementEntry> {
        self.lock_entries().clone()
    }

    /// 異動筆數
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// 是否為空
    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }
}

impl Default for MovementLog {
    fn default() -> Self {
        Self::new()
    }
}
