//! # 廚房出餐服務完整範例
//!
//! 這個範例展示完整的備料消耗流程：
//! - 食材：番茄、麵粉、起司、羅勒
//! - 配方：瑪格麗特披薩（每批 4 份）
//! - 流程：註冊 → 驗證 → 製備 → 低庫存警戒 → 回沖

use rust_decimal::Decimal;
use std::sync::Arc;
use stock::{
    AlertSink, Ingredient, PreparationEngine, Recipe, RecipeLine, Result, ThresholdAlert, Unit,
};

/// 把警戒通知印到主控台的通知端
struct ConsoleAlertSink;

impl AlertSink for ConsoleAlertSink {
    fn notify(&self, alert: &ThresholdAlert) -> std::result::Result<(), String> {
        println!(
            "   🔔 警戒 [{:?}] {}: 現量 {} ≤ 警戒線 {}",
            alert.severity, alert.ingredient_id, alert.quantity_on_hand, alert.alert_threshold
        );
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("🍕 ===== 廚房出餐服務範例 =====");
    println!();

    // ========== 1. 建立引擎與食材 ==========
    println!("📦 步驟 1: 註冊食材");
    let engine = PreparationEngine::new().with_alert_sink(Arc::new(ConsoleAlertSink));

    engine.register_ingredient(
        Ingredient::new(
            "TOMATO-001".to_string(),
            "番茄".to_string(),
            Unit::MassKg,
            Decimal::from(10),
        )
        .with_unit_cost(Decimal::from(35))
        .with_alert_threshold(Decimal::from(5)),
    );
    engine.register_ingredient(
        Ingredient::new(
            "FLOUR-001".to_string(),
            "麵粉".to_string(),
            Unit::MassKg,
            Decimal::from(50),
        )
        .with_unit_cost(Decimal::from(20)),
    );
    engine.register_ingredient(
        Ingredient::new(
            "CHEESE-001".to_string(),
            "起司".to_string(),
            Unit::MassKg,
            Decimal::from(8),
        )
        .with_unit_cost(Decimal::from(300)),
    );
    engine.register_ingredient(
        Ingredient::new(
            "BASIL-001".to_string(),
            "羅勒".to_string(),
            Unit::MassG,
            Decimal::from(40),
        )
        .with_unit_cost(Decimal::new(5, 1)),
    );
    println!("   ✓ 已註冊 4 項食材");
    println!();

    // ========== 2. 註冊配方 ==========
    println!("📖 步驟 2: 註冊配方（瑪格麗特披薩，每批 4 份）");
    engine.register_recipe(
        Recipe::new("PIZZA-MARG".to_string(), "ITEM-PIZZA-MARG".to_string(), 4)
            .with_line(RecipeLine::new("FLOUR-001".to_string(), Decimal::from(2)))
            .with_line(RecipeLine::new("CHEESE-001".to_string(), Decimal::ONE))
            .with_line(RecipeLine::new(
                "TOMATO-001".to_string(),
                Decimal::new(15, 1),
            ))
            .with_line(RecipeLine::new("BASIL-001".to_string(), Decimal::from(20)).optional()),
    )?;
    let unit_cost = engine.recipe_unit_cost("PIZZA-MARG")?;
    println!("   ✓ 單份成本: {unit_cost} 元");
    println!();

    // ========== 3. 可行性驗證 ==========
    println!("🔍 步驟 3: 驗證 4 份是否可製備");
    let report = engine.validate("PIZZA-MARG", 4)?;
    println!(
        "   可製備: {}（可用 {} / 替代 {} / 缺料 {}）",
        report.can_prepare, report.available_count, report.substituted_count, report.missing_count
    );
    println!();

    // ========== 4. 製備 ==========
    println!("🔥 步驟 4: 製備 4 份");
    let batch = engine.prepare("PIZZA-MARG", 4, "chef-lin")?;
    println!("   ✓ 批次 {} 狀態: {}", batch.id, batch.status);
    for movement in engine.movements_for_batch(batch.id)? {
        println!(
            "   - 扣帳 {} {}：{} → {}",
            movement.ingredient_id,
            movement.quantity,
            movement.quantity_before,
            movement.quantity_after
        );
    }
    println!();

    // ========== 5. 低庫存報表 ==========
    println!("📉 步驟 5: 低庫存報表");
    let low = engine.low_stock_report();
    if low.is_empty() {
        println!("   無食材觸及警戒線");
    }
    for ingredient in &low {
        println!(
            "   - {} 現量 {} / 警戒線 {}",
            ingredient.id, ingredient.quantity_on_hand, ingredient.alert_threshold
        );
    }
    println!();

    // ========== 6. 回沖 ==========
    println!("↩️  步驟 6: 整批回沖（出餐取消）");
    let compensations = engine.rollback(batch.id, "manager-wu")?;
    println!("   ✓ 補回 {} 筆異動", compensations.len());
    let tomato = engine.store().snapshot("TOMATO-001")?;
    println!("   番茄庫存恢復為 {} kg", tomato.quantity_on_hand);
    println!();

    println!("✅ 範例結束");
    Ok(())
}
