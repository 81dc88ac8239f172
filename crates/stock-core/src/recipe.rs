//! 配方模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 配方明細（配方 × 食材，每配方唯一）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeLine {
    /// 食材ID
    pub ingredient_id: String,

    /// 每批用量（單位與食材單位一致）
    pub quantity_per_batch: Decimal,

    /// 是否為可省略食材（缺貨時不阻擋製備）
    pub is_optional: bool,
}

impl RecipeLine {
    /// 創建新的配方明細
    pub fn new(ingredient_id: String, quantity_per_batch: Decimal) -> Self {
        Self {
            ingredient_id,
            quantity_per_batch,
            is_optional: false,
        }
    }

    /// 建構器模式：標記為可省略
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// N 份所需數量
    pub fn quantity_for(&self, portions: u32) -> Decimal {
        self.quantity_per_batch * Decimal::from(portions)
    }
}

/// 配方
///
/// 每個銷售品項至多綁定一份配方（1:1）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// 配方ID
    pub id: String,

    /// 對應的銷售品項ID
    pub catalog_item_id: String,

    /// 每批份數（明細用量的宣告基準）
    pub portions_per_batch: u32,

    /// 配方明細
    pub lines: Vec<RecipeLine>,
}

impl Recipe {
    /// 創建新的配方
    pub fn new(id: String, catalog_item_id: String, portions_per_batch: u32) -> Self {
        Self {
            id,
            catalog_item_id,
            portions_per_batch,
            lines: Vec::new(),
        }
    }

    /// 建構器模式：添加明細
    pub fn with_line(mut self, line: RecipeLine) -> Self {
        self.lines.push(line);
        self
    }

    /// 查找指定食材的明細
    pub fn line(&self, ingredient_id: &str) -> Option<&RecipeLine> {
        self.lines.iter().find(|l| l.ingredient_id == ingredient_id)
    }

    /// 必備明細數量
    pub fn mandatory_line_count(&self) -> usize {
        self.lines.iter().filter(|l| !l.is_optional).count()
    }
}
