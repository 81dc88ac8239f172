//! 替代食材解析

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stock_core::{SubstituteShortfall, Substitution};
use stock_ledger::IngredientStore;

/// 目前可滿足需求的替代候選
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstituteCandidate {
    /// 替代食材ID
    pub substitute_id: String,

    /// 優先序
    pub priority: u32,

    /// 換算比
    pub conversion_ratio: Decimal,

    /// 換算後所需數量
    pub converted_quantity: Decimal,

    /// 替代品現有庫存
    pub on_hand: Decimal,
}

/// 替代解析器
///
/// 純唯讀：不持鎖、不寫入；候選序列在相同庫存狀態下
/// 必然回傳相同結果
pub struct SubstitutionResolver;

impl SubstitutionResolver {
    /// 某原料的啟用替代邊，依優先序排列
    ///
    /// 優先序相同時以替代食材ID遞增決定，確保結果可重現
    pub fn ordered_edges<'a>(
        substitutions: &'a [Substitution],
        original_id: &str,
    ) -> Vec<&'a Substitution> {
        let mut edges: Vec<&Substitution> = substitutions
            .iter()
            .filter(|s| s.is_active && s.original_id == original_id)
            .collect();
        edges.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.substitute_id.cmp(&b.substitute_id))
        });
        edges
    }

    /// 依優先序回傳目前庫存足以支應需求的替代候選
    pub fn resolve(
        substitutions: &[Substitution],
        store: &IngredientStore,
        original_id: &str,
        required_quantity: Decimal,
    ) -> Vec<SubstituteCandidate> {
        Self::ordered_edges(substitutions, original_id)
            .into_iter()
            .filter_map(|edge| {
                let ingredient = store.snapshot(&edge.substitute_id).ok()?;
                if !ingredient.is_active {
                    return None;
                }
                let converted = edge.converted_quantity(required_quantity);
                (ingredient.quantity_on_hand >= converted).then(|| SubstituteCandidate {
                    substitute_id: edge.substitute_id.clone(),
                    priority: edge.priority,
                    conversion_ratio: edge.conversion_ratio,
                    converted_quantity: converted,
                    on_hand: ingredient.quantity_on_hand,
                })
            })
            .collect()
    }

    /// 既存但目前數量不足的替代品清單（診斷用）
    pub fn shortfalls(
        substitutions: &[Substitution],
        store: &IngredientStore,
        original_id: &str,
        required_quantity: Decimal,
    ) -> Vec<SubstituteShortfall> {
        Self::ordered_edges(substitutions, original_id)
            .into_iter()
            .filter_map(|edge| {
                let ingredient = store.snapshot(&edge.substitute_id).ok()?;
                if !ingredient.is_active {
                    return None;
                }
                let converted = edge.converted_quantity(required_quantity);
                (ingredient.quantity_on_hand < converted).then(|| SubstituteShortfall {
                    substitute_id: edge.substitute_id.clone(),
                    priority: edge.priority,
                    converted_quantity: converted,
                    on_hand: ingredient.quantity_on_hand,
                    shortfall: converted - ingredient.quantity_on_hand,
                })
            })
            .collect()
    }
}
