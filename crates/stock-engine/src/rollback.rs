//! 批次回沖

use std::time::Duration;

use stock_core::{BatchStatus, MovementEntry, MovementReason, PreparationBatch, Result, StockError};
use stock_ledger::{IngredientStore, Ledger, LockSet, MovementLog};

/// 回沖協調器
///
/// 補償用量一律讀自異動日誌，而非由配方重新推導：
/// 日誌記錄的才是當時實際扣掉的（含替代品）
pub struct RollbackCoordinator;

impl RollbackCoordinator {
    /// 回沖一個製備批次：補回每筆消耗並將批次轉為已回沖
    pub fn perform(
        ledger: &Ledger,
        log: &MovementLog,
        store: &IngredientStore,
        batch: &mut PreparationBatch,
        actor: &str,
        lock_wait: Duration,
    ) -> Result<Vec<MovementEntry>> {
        if !matches!(
            batch.status,
            BatchStatus::Completed | BatchStatus::InProgress
        ) {
            return Err(StockError::InvalidBatchState {
                batch_id: batch.id,
                status: batch.status,
            });
        }

        let consumed = log.consumption_for_reference(&batch.reference);
        if consumed.is_empty() {
            // 無對應異動（歷史資料或已補償過）：僅轉換狀態，保持終態
            batch.mark_rolled_back()?;
            tracing::info!("批次 {} 無消耗異動，直接標記回沖", batch.id);
            return Ok(Vec::new());
        }

        // 與製備相同的取鎖順序規則，回沖不會與新製備互搶
        let ids: Vec<String> = consumed.iter().map(|m| m.ingredient_id.clone()).collect();
        let locks = LockSet::acquire(store, &ids, lock_wait)?;

        let reference = format!("rollback-{}", batch.id);
        let mut entries = Vec::with_capacity(consumed.len());
        for movement in &consumed {
            entries.push(ledger.credit(
                &locks,
                &movement.ingredient_id,
                movement.quantity,
                MovementReason::RollbackCompensation,
                actor,
                &reference,
            )?);
        }

        batch.mark_rolled_back()?;
        tracing::info!("批次 {} 回沖完成: 補回 {} 筆", batch.id, entries.len());
        Ok(entries)
    }
}
