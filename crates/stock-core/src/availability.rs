//! 可行性報告模型（驗證結果）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 數量不足的替代品診斷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstituteShortfall {
    /// 替代食材ID
    pub substitute_id: String,

    /// 優先序
    pub priority: u32,

    /// 換算後所需數量
    pub converted_quantity: Decimal,

    /// 替代品現有庫存
    pub on_hand: Decimal,

    /// 缺口
    pub shortfall: Decimal,
}

/// 單一明細的可行性分類
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LineAvailability {
    /// 原料庫存充足
    Available { needed: Decimal, on_hand: Decimal },

    /// 原料不足，但有替代品可滿足
    Substituted {
        substitute_id: String,
        converted_quantity: Decimal,
        priority: u32,
        needed: Decimal,
        on_hand: Decimal,
    },

    /// 可省略食材缺貨（不阻擋製備）
    OptionalMissing {
        needed: Decimal,
        on_hand: Decimal,
        shortfall: Decimal,
    },

    /// 必備食材缺貨且無可用替代品
    Missing {
        needed: Decimal,
        on_hand: Decimal,
        shortfall: Decimal,
        /// 既存但目前不足的替代品清單（診斷用）
        insufficient_substitutes: Vec<SubstituteShortfall>,
    },
}

/// 單一食材明細的驗證結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientAvailability {
    /// 食材ID
    pub ingredient_id: String,

    /// 是否為可省略明細
    pub is_optional: bool,

    /// 分類結果
    pub status: LineAvailability,
}

/// 配方可行性報告
///
/// 純唯讀的驗證快照，不持鎖產生，內容可能在製備執行前過期
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    /// 配方ID
    pub recipe_id: String,

    /// 請求份數
    pub portions: u32,

    /// 逐明細結果
    pub lines: Vec<IngredientAvailability>,

    /// 是否可製備（無任何 Missing 明細）
    pub can_prepare: bool,

    /// 明細總數
    pub total_count: usize,

    /// 庫存充足的明細數
    pub available_count: usize,

    /// 經替代滿足的明細數
    pub substituted_count: usize,

    /// 缺貨的可省略明細數
    pub optional_missing_count: usize,

    /// 缺貨的必備明細數
    pub missing_count: usize,
}

impl AvailabilityReport {
    /// 由逐明細結果彙總報告
    pub fn from_lines(
        recipe_id: String,
        portions: u32,
        lines: Vec<IngredientAvailability>,
    ) -> Self {
        let mut available_count = 0;
        let mut substituted_count = 0;
        let mut optional_missing_count = 0;
        let mut missing_count = 0;

        for line in &lines {
            match line.status {
                LineAvailability::Available { .. } => available_count += 1,
                LineAvailability::Substituted { .. } => substituted_count += 1,
                LineAvailability::OptionalMissing { .. } => optional_missing_count += 1,
                LineAvailability::Missing { .. } => missing_count += 1,
            }
        }

        Self {
            recipe_id,
            portions,
            can_prepare: missing_count == 0,
            total_count: lines.len(),
            available_count,
            substituted_count,
            optional_missing_count,
            missing_count,
            lines,
        }
    }

    /// 缺貨必備食材的ID清單
    pub fn missing_ingredients(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| matches!(l.status, LineAvailability::Missing { .. }))
            .map(|l| l.ingredient_id.as_str())
            .collect()
    }
}
