//! 庫存異動模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 異動方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementDirection {
    /// 出庫（扣帳）
    Debit,
    /// 入庫（入帳）
    Credit,
}

/// 異動原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementReason {
    /// 製備消耗
    Consumption,
    /// 盤點更正
    Correction,
    /// 進貨
    Purchase,
    /// 行政調整
    Adjustment,
    /// 損耗
    Loss,
    /// 回沖補償
    RollbackCompensation,
}

/// 庫存異動記錄
///
/// 一經寫入即不可變更或刪除；食材的當前量恆等於
/// 初始量加上其所有異動的帶符號總和
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementEntry {
    /// 異動ID
    pub id: Uuid,

    /// 食材ID
    pub ingredient_id: String,

    /// 異動方向
    pub direction: MovementDirection,

    /// 異動原因
    pub reason: MovementReason,

    /// 異動數量（恆為正）
    pub quantity: Decimal,

    /// 異動前庫存快照
    pub quantity_before: Decimal,

    /// 異動後庫存快照
    pub quantity_after: Decimal,

    /// 操作者
    pub actor: String,

    /// 關聯參考（同一製備/回沖的異動共用）
    pub reference: String,

    /// 建立時間
    pub created_at: DateTime<Utc>,
}

impl MovementEntry {
    /// 創建新的異動記錄
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ingredient_id: String,
        direction: MovementDirection,
        reason: MovementReason,
        quantity: Decimal,
        quantity_before: Decimal,
        quantity_after: Decimal,
        actor: String,
        reference: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ingredient_id,
            direction,
            reason,
            quantity,
            quantity_before,
            quantity_after,
            actor,
            reference,
            created_at: Utc::now(),
        }
    }

    /// 帶符號數量（入庫為正、出庫為負），對帳用
    pub fn signed_quantity(&self) -> Decimal {
        match self.direction {
            MovementDirection::Credit => self.quantity,
            MovementDirection::Debit => -self.quantity,
        }
    }
}
