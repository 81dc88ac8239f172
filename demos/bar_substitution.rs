//! # 吧台替代食材範例
//!
//! 展示替代鏈的解析順序：
//! - 鮮榨柳橙汁不足時改用瓶裝柳橙汁（優先序 1）
//! - 瓶裝也不足時改用濃縮還原汁（優先序 2，換算比 0.25）

use rust_decimal::Decimal;
use stock::{Ingredient, LineAvailability, PreparationEngine, Recipe, RecipeLine, Substitution, Unit};

fn main() -> stock::Result<()> {
    println!("🍹 ===== 吧台替代食材範例 =====");
    println!();

    // ========== 1. 食材與替代鏈 ==========
    println!("📦 步驟 1: 註冊食材與替代關係");
    let engine = PreparationEngine::new();

    engine.register_ingredient(Ingredient::new(
        "OJ-FRESH".to_string(),
        "鮮榨柳橙汁".to_string(),
        Unit::VolumeL,
        Decimal::ONE,
    ));
    engine.register_ingredient(Ingredient::new(
        "OJ-BOTTLE".to_string(),
        "瓶裝柳橙汁".to_string(),
        Unit::VolumeL,
        Decimal::from(2),
    ));
    engine.register_ingredient(Ingredient::new(
        "OJ-CONC".to_string(),
        "濃縮還原汁".to_string(),
        Unit::VolumeL,
        Decimal::from(20),
    ));

    engine.register_substitution(Substitution::new(
        "OJ-FRESH".to_string(),
        "OJ-BOTTLE".to_string(),
        Decimal::ONE,
        1,
    ))?;
    // 濃縮汁 1:4 稀釋，換算比 0.25
    engine.register_substitution(Substitution::new(
        "OJ-FRESH".to_string(),
        "OJ-CONC".to_string(),
        Decimal::new(25, 2),
        2,
    ))?;
    println!("   ✓ OJ-FRESH → OJ-BOTTLE (優先序 1, 換算比 1)");
    println!("   ✓ OJ-FRESH → OJ-CONC   (優先序 2, 換算比 0.25)");
    println!();

    // ========== 2. 配方 ==========
    println!("📖 步驟 2: 註冊配方（柳橙特調，每份 0.3 L）");
    engine.register_recipe(
        Recipe::new("MIMOSA-01".to_string(), "ITEM-MIMOSA".to_string(), 1)
            .with_line(RecipeLine::new("OJ-FRESH".to_string(), Decimal::new(3, 1))),
    )?;
    println!();

    // ========== 3. 驗證 6 份 ==========
    println!("🔍 步驟 3: 驗證 6 份（需 1.8 L，鮮榨只有 1 L）");
    let report = engine.validate("MIMOSA-01", 6)?;
    for line in &report.lines {
        match &line.status {
            LineAvailability::Substituted {
                substitute_id,
                converted_quantity,
                priority,
                ..
            } => println!(
                "   → 改用 {substitute_id}（優先序 {priority}），換算後需 {converted_quantity} L"
            ),
            other => println!("   分類: {other:?}"),
        }
    }
    println!();

    // ========== 4. 製備：瓶裝 2 L 也不夠，落到濃縮汁 ==========
    println!("🔥 步驟 4: 製備 8 份（需 2.4 L，瓶裝只有 2 L）");
    let batch = engine.prepare("MIMOSA-01", 8, "bartender-ho")?;
    for movement in engine.movements_for_batch(batch.id)? {
        println!(
            "   - 扣帳 {} {} L（{} → {}）",
            movement.ingredient_id,
            movement.quantity,
            movement.quantity_before,
            movement.quantity_after
        );
    }
    println!();

    println!("✅ 範例結束");
    Ok(())
}
