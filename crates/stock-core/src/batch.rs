//! 製備批次模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, StockError};

/// 批次狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    /// 進行中
    InProgress,
    /// 已完成
    Completed,
    /// 已取消
    Cancelled,
    /// 已回沖
    RolledBack,
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BatchStatus::InProgress => "in_progress",
            BatchStatus::Completed => "completed",
            BatchStatus::Cancelled => "cancelled",
            BatchStatus::RolledBack => "rolled_back",
        };
        f.write_str(label)
    }
}

/// 製備批次（一次「消耗 N 份食材」的工作單位）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparationBatch {
    /// 批次ID
    pub id: Uuid,

    /// 配方ID
    pub recipe_id: String,

    /// 請求份數
    pub portions_requested: u32,

    /// 操作者
    pub actor: String,

    /// 批次狀態
    pub status: BatchStatus,

    /// 異動關聯參考（本批次所有消耗異動共用）
    pub reference: String,

    /// 建立時間
    pub created_at: DateTime<Utc>,

    /// 完成時間
    pub completed_at: Option<DateTime<Utc>>,
}

impl PreparationBatch {
    /// 創建新的批次（進行中）
    pub fn new(recipe_id: String, portions_requested: u32, actor: String) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            recipe_id,
            portions_requested,
            actor,
            status: BatchStatus::InProgress,
            reference: format!("prep-{id}"),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// 標記完成
    pub fn complete(&mut self) {
        self.status = BatchStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// 標記取消
    pub fn cancel(&mut self) {
        self.status = BatchStatus::Cancelled;
    }

    /// 轉換為已回沖；僅允許從已完成或進行中轉換，且僅限一次
    pub fn mark_rolled_back(&mut self) -> Result<()> {
        match self.status {
            BatchStatus::Completed | BatchStatus::InProgress => {
                self.status = BatchStatus::RolledBack;
                Ok(())
            }
            status => Err(StockError::InvalidBatchState {
                batch_id: self.id,
                status,
            }),
        }
    }
}
