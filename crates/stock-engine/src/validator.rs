//! 備料可行性驗證

use rust_decimal::Decimal;

use stock_core::{
    AvailabilityReport, IngredientAvailability, LineAvailability, Recipe, Result, StockError,
    Substitution,
};
use stock_ledger::IngredientStore;

use crate::resolver::SubstitutionResolver;

/// 可行性驗證器
///
/// 唯讀、不持鎖：報告是建議性的快照，可能在製備執行前過期，
/// 因此製備引擎在持鎖後必定重檢
pub struct AvailabilityValidator;

impl AvailabilityValidator {
    /// 驗證配方 N 份是否可製備
    pub fn validate(
        recipe: &Recipe,
        portions: u32,
        substitutions: &[Substitution],
        store: &IngredientStore,
    ) -> Result<AvailabilityReport> {
        if portions == 0 {
            return Err(StockError::InvalidQuantity(Decimal::ZERO));
        }

        let mut lines = Vec::with_capacity(recipe.lines.len());
        for line in &recipe.lines {
            let needed = line.quantity_for(portions);
            let ingredient = store.snapshot(&line.ingredient_id)?;
            let on_hand = ingredient.quantity_on_hand;
            // 停用的食材視同無庫存可用
            let usable = if ingredient.is_active {
                on_hand
            } else {
                Decimal::ZERO
            };

            let status = if usable >= needed {
                LineAvailability::Available { needed, on_hand }
            } else if line.is_optional {
                LineAvailability::OptionalMissing {
                    needed,
                    on_hand,
                    shortfall: needed - usable,
                }
            } else {
                let candidates = SubstitutionResolver::resolve(
                    substitutions,
                    store,
                    &line.ingredient_id,
                    needed,
                );
                match candidates.first() {
                    Some(first) => LineAvailability::Substituted {
                        substitute_id: first.substitute_id.clone(),
                        converted_quantity: first.converted_quantity,
                        priority: first.priority,
                        needed,
                        on_hand,
                    },
                    None => LineAvailability::Missing {
                        needed,
                        on_hand,
                        shortfall: needed - usable,
                        insufficient_substitutes: SubstitutionResolver::shortfalls(
                            substitutions,
                            store,
                            &line.ingredient_id,
                            needed,
                        ),
                    },
                }
            };

            lines.push(IngredientAvailability {
                ingredient_id: line.ingredient_id.clone(),
                is_optional: line.is_optional,
                status,
            });
        }

        Ok(AvailabilityReport::from_lines(
            recipe.id.clone(),
            portions,
            lines,
        ))
    }
}
