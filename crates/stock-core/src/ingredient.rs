//! 食材庫存模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::unit::Unit;

/// 食材（庫存行）
///
/// `quantity_on_hand` 只能透過帳本的扣帳/入帳操作變動，
/// 且在任何時點都不得為負
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// 食材ID
    pub id: String,

    /// 名稱
    pub name: String,

    /// 計量單位
    pub unit: Unit,

    /// 現有庫存
    pub quantity_on_hand: Decimal,

    /// 警戒線（低於或等於時觸發通知）
    pub alert_threshold: Decimal,

    /// 單位成本
    pub unit_cost: Decimal,

    /// 是否啟用（被配方或異動引用的食材以停用取代刪除）
    pub is_active: bool,
}

impl Ingredient {
    /// 創建新的食材
    pub fn new(id: String, name: String, unit: Unit, quantity_on_hand: Decimal) -> Self {
        Self {
            id,
            name,
            unit,
            quantity_on_hand,
            alert_threshold: Decimal::ZERO,
            unit_cost: Decimal::ZERO,
            is_active: true,
        }
    }

    /// 建構器模式：設置警戒線
    pub fn with_alert_threshold(mut self, threshold: Decimal) -> Self {
        self.alert_threshold = threshold;
        self
    }

    /// 建構器模式：設置單位成本
    pub fn with_unit_cost(mut self, unit_cost: Decimal) -> Self {
        self.unit_cost = unit_cost;
        self
    }

    /// 建構器模式：以停用狀態創建
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// 檢查庫存是否低於（或等於）警戒線
    pub fn is_below_threshold(&self) -> bool {
        self.quantity_on_hand <= self.alert_threshold
    }

    /// 相對某需求量的缺口
    pub fn shortfall_for(&self, needed: Decimal) -> Decimal {
        if needed > self.quantity_on_hand {
            needed - self.quantity_on_hand
        } else {
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ingredient() {
        let ingredient = Ingredient::new(
            "TOMATO-001".to_string(),
            "番茄".to_string(),
            Unit::MassKg,
            Decimal::from(10),
        )
        .with_alert_threshold(Decimal::from(2))
        .with_unit_cost(Decimal::from(35));

        assert_eq!(ingredient.id, "TOMATO-001");
        assert_eq!(ingredient.quantity_on_hand, Decimal::from(10));
        assert_eq!(ingredient.alert_threshold, Decimal::from(2));
        assert_eq!(ingredient.unit_cost, Decimal::from(35));
        assert!(ingredient.is_active);
        assert!(!ingredient.is_below_threshold());
    }

    #[test]
    fn test_threshold_check() {
        let ingredient = Ingredient::new(
            "OIL-001".to_string(),
            "橄欖油".to_string(),
            Unit::VolumeL,
            Decimal::from(2),
        )
        .with_alert_threshold(Decimal::from(2));

        // 等於警戒線也算觸及
        assert!(ingredient.is_below_threshold());
    }

    #[test]
    fn test_shortfall() {
        let ingredient = Ingredient::new(
            "EGG-001".to_string(),
            "雞蛋".to_string(),
            Unit::CountPiece,
            Decimal::from(5),
        );

        assert_eq!(ingredient.shortfall_for(Decimal::from(8)), Decimal::from(3));
        assert_eq!(ingredient.shortfall_for(Decimal::from(5)), Decimal::ZERO);
        assert_eq!(ingredient.shortfall_for(Decimal::from(2)), Decimal::ZERO);
    }

    #[test]
    fn test_deactivated_builder() {
        let ingredient = Ingredient::new(
            "TRUFFLE-001".to_string(),
            "松露".to_string(),
            Unit::MassG,
            Decimal::from(100),
        )
        .deactivated();

        assert!(!ingredient.is_active);
    }
}
