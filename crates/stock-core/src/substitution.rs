//! 替代食材模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 替代關係（原料 → 替代品的有向邊）
///
/// 同一原料的多筆替代關係依 `priority` 構成候選序列；
/// 自我替代與單位不相容的組合在註冊時即被拒絕
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substitution {
    /// 原料食材ID
    pub original_id: String,

    /// 替代食材ID
    pub substitute_id: String,

    /// 換算比（每 1 單位原料所需的替代品單位數）
    pub conversion_ratio: Decimal,

    /// 優先序（1 最先嘗試）
    pub priority: u32,

    /// 是否啟用
    pub is_active: bool,
}

impl Substitution {
    /// 創建新的替代關係
    pub fn new(
        original_id: String,
        substitute_id: String,
        conversion_ratio: Decimal,
        priority: u32,
    ) -> Self {
        Self {
            original_id,
            substitute_id,
            conversion_ratio,
            priority,
            is_active: true,
        }
    }

    /// 建構器模式：以停用狀態創建
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// 換算後所需的替代品數量
    pub fn converted_quantity(&self, required: Decimal) -> Decimal {
        required * self.conversion_ratio
    }
}
