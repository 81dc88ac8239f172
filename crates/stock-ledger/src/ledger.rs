//! 食材帳本：原子扣帳/入帳與異動簿記

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use uuid::Uuid;

use stock_core::{
    MovementDirection, MovementEntry, MovementReason, Result, StockError,
};

use crate::alert::{AlertSeverity, AlertSink, NullAlertSink, ThresholdAlert};
use crate::lock::LockSet;
use crate::movements::MovementLog;
use crate::store::IngredientStore;

/// 食材帳本
///
/// 唯一允許變動 `quantity_on_hand` 的元件；每次變動都在
/// 呼叫方持有的行鎖之下完成，並寫入一筆含前後快照的異動
pub struct Ledger {
    store: Arc<IngredientStore>,
    log: Arc<MovementLog>,
    alert_sink: Arc<dyn AlertSink>,
    lock_wait: Duration,
}

impl Ledger {
    /// 創建新的帳本
    pub fn new(store: Arc<IngredientStore>, log: Arc<MovementLog>) -> Self {
        Self {
            store,
            log,
            alert_sink: Arc::new(NullAlertSink),
            lock_wait: Duration::from_secs(2),
        }
    }

    /// 建構器模式：設置通知端
    pub fn with_alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alert_sink = sink;
        self
    }

    /// 建構器模式：設置單行操作的取鎖等待上限
    pub fn with_lock_wait(mut self, wait: Duration) -> Self {
        self.lock_wait = wait;
        self
    }

    /// 扣帳
    ///
    /// 要求 `quantity > 0` 且呼叫方已持有該食材的行鎖；
    /// 現有量不足時回傳 `InsufficientStock`，庫存永不為負。
    /// 扣帳使庫存穿越警戒線時向通知端發出事件（僅盡力而為）
    pub fn debit(
        &self,
        locks: &LockSet,
        ingredient_id: &str,
        quantity: Decimal,
        reason: MovementReason,
        actor: &str,
        reference: &str,
    ) -> Result<MovementEntry> {
        if quantity <= Decimal::ZERO {
            return Err(StockError::InvalidQuantity(quantity));
        }
        let row = locks.row(ingredient_id).ok_or_else(|| {
            StockError::Internal(format!("扣帳時未持有 {ingredient_id} 的行鎖"))
        })?;
        self.verify_row_identity(row, ingredient_id)?;

        let (before, after, threshold, crossed) = {
            let mut state = row.lock_state();
            let before = state.ingredient.quantity_on_hand;
            if before < quantity {
                return Err(StockError::InsufficientStock {
                    ingredient_id: ingredient_id.to_string(),
                    requested: quantity,
                    available: before,
                });
            }
            let after = before - quantity;
            state.ingredient.quantity_on_hand = after;
            let threshold = state.ingredient.alert_threshold;
            (before, after, threshold, before > threshold && after <= threshold)
        };

        let entry = MovementEntry::new(
            ingredient_id.to_string(),
            MovementDirection::Debit,
            reason,
            quantity,
            before,
            after,
            actor.to_string(),
            reference.to_string(),
        );
        self.log.append(entry.clone());

        tracing::debug!(
            "扣帳 {}: {} → {}（{:?}, ref={}）",
            ingredient_id,
            before,
            after,
            reason,
            reference
        );

        if crossed {
            self.emit_threshold_alert(ingredient_id, after, threshold);
        }

        Ok(entry)
    }

    /// 入帳
    ///
    /// 與扣帳對稱的加量操作；`quantity > 0` 即必然成功，
    /// 供回沖補償與進貨使用
    pub fn credit(
        &self,
        locks: &LockSet,
        ingredient_id: &str,
        quantity: Decimal,
        reason: MovementReason,
        actor: &str,
        reference: &str,
    ) -> Result<MovementEntry> {
        if quantity <= Decimal::ZERO {
            return Err(StockError::InvalidQuantity(quantity));
        }
        let row = locks.row(ingredient_id).ok_or_else(|| {
            StockError::Internal(format!("入帳時未持有 {ingredient_id} 的行鎖"))
        })?;
        self.verify_row_identity(row, ingredient_id)?;

        let (before, after) = {
            let mut state = row.lock_state();
            let before = state.ingredient.quantity_on_hand;
            let after = before + quantity;
            state.ingredient.quantity_on_hand = after;
            (before, after)
        };

        let entry = MovementEntry::new(
            ingredient_id.to_string(),
            MovementDirection::Credit,
            reason,
            quantity,
            before,
            after,
            actor.to_string(),
            reference.to_string(),
        );
        self.log.append(entry.clone());

        tracing::debug!(
            "入帳 {}: {} → {}（{:?}, ref={}）",
            ingredient_id,
            before,
            after,
            reason,
            reference
        );

        Ok(entry)
    }

    /// 進貨：單行入帳，原因固定為 `Purchase`
    pub fn restock(
        &self,
        ingredient_id: &str,
        quantity: Decimal,
        actor: &str,
        reference: &str,
    ) -> Result<MovementEntry> {
        let ids = vec![ingredient_id.to_string()];
        let locks = LockSet::acquire(&self.store, &ids, self.lock_wait)?;
        self.credit(&locks, ingredient_id, quantity, MovementReason::Purchase, actor, reference)
    }

    /// 行政覆寫庫存量
    ///
    /// 以差額寫成一筆更正/調整/損耗異動，稽核方式與一般
    /// 扣帳/入帳相同；與當前量相等時不寫任何異動
    pub fn adjust(
        &self,
        ingredient_id: &str,
        new_quantity: Decimal,
        reason: MovementReason,
        actor: &str,
    ) -> Result<Option<MovementEntry>> {
        if new_quantity < Decimal::ZERO {
            return Err(StockError::InvalidQuantity(new_quantity));
        }
        let ids = vec![ingredient_id.to_string()];
        let locks = LockSet::acquire(&self.store, &ids, self.lock_wait)?;

        let current = locks.ingredient(ingredient_id).ok_or_else(|| {
            StockError::IngredientNotFound(ingredient_id.to_string())
        })?;
        let reference = format!("adjust-{}", Uuid::new_v4());

        let delta = new_quantity - current.quantity_on_hand;
        if delta > Decimal::ZERO {
            Ok(Some(self.credit(
                &locks,
                ingredient_id,
                delta,
                reason,
                actor,
                &reference,
            )?))
        } else if delta < Decimal::ZERO {
            Ok(Some(self.debit(
                &locks,
                ingredient_id,
                -delta,
                reason,
                actor,
                &reference,
            )?))
        } else {
            Ok(None)
        }
    }

    /// 確認鎖集合裡的行就是本帳本存放區的那一行
    ///
    /// 同ID但來自別的存放區的鎖不得通過，否則會改到別人的行
    /// 卻把異動記在本帳本的日誌裡
    fn verify_row_identity(
        &self,
        locked_row: &Arc<crate::store::IngredientRow>,
        ingredient_id: &str,
    ) -> Result<()> {
        let own_row = self.store.row(ingredient_id)?;
        if !Arc::ptr_eq(locked_row, &own_row) {
            return Err(StockError::Internal(format!(
                "持有的 {ingredient_id} 行鎖不屬於本帳本的存放區"
            )));
        }
        Ok(())
    }

    fn emit_threshold_alert(&self, ingredient_id: &str, on_hand: Decimal, threshold: Decimal) {
        let severity = if on_hand <= Decimal::ZERO {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };
        let alert = ThresholdAlert {
            ingredient_id: ingredient_id.to_string(),
            quantity_on_hand: on_hand,
            alert_threshold: threshold,
            severity,
        };

        tracing::info!(
            "食材 {} 觸及警戒線: 現有 {}, 警戒 {}",
            ingredient_id,
            on_hand,
            threshold
        );
        if let Err(err) = self.alert_sink.notify(&alert) {
            // 通知失敗不影響扣帳
            tracing::warn!("庫存警示送出失敗: {}", err);
        }
    }
}
