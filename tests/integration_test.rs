//! 集成測試

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rust_decimal::Decimal;
use stock::{
    BatchStatus, Ingredient, LineAvailability, LockSet, MovementReason, PreparationEngine, Recipe,
    RecipeLine, StockError, Substitution, Unit,
};

fn sauce_engine(tomato_kg: i64) -> PreparationEngine {
    let engine = PreparationEngine::new();
    engine.register_ingredient(
        Ingredient::new(
            "TOMATO-001".to_string(),
            "番茄".to_string(),
            Unit::MassKg,
            Decimal::from(tomato_kg),
        )
        .with_unit_cost(Decimal::from(35))
        .with_alert_threshold(Decimal::from(2)),
    );
    engine
        .register_recipe(
            Recipe::new("SAUCE-01".to_string(), "ITEM-SAUCE".to_string(), 1)
                .with_line(RecipeLine::new("TOMATO-001".to_string(), Decimal::from(3))),
        )
        .unwrap();
    engine
}

#[test]
fn test_prepare_consume_and_rollback_cycle() {
    // 場景：番茄 10 kg，醬汁每份 3 kg

    let engine = sauce_engine(10);

    // 1. 驗證 3 份可行
    let report = engine.validate("SAUCE-01", 3).unwrap();
    assert!(report.can_prepare);

    // 2. 製備 3 份 → 扣 9 kg，剩 1 kg
    let batch = engine.prepare("SAUCE-01", 3, "chef-lin").unwrap();
    assert_eq!(batch.status, BatchStatus::Completed);
    assert_eq!(
        engine
            .store()
            .snapshot("TOMATO-001")
            .unwrap()
            .quantity_on_hand,
        Decimal::ONE
    );

    // 3. 剩 1 kg，再備 1 份（需 3 kg）被拒
    let err = engine.prepare("SAUCE-01", 1, "chef-chen").unwrap_err();
    assert!(matches!(err, StockError::RecipeNotPreparable { .. }));

    // 4. 警戒線 2 kg：消耗後進入低庫存報表
    let low = engine.low_stock_report();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].id, "TOMATO-001");

    // 5. 回沖批次 → 庫存回到 10 kg
    let compensations = engine.rollback(batch.id, "manager-wu").unwrap();
    assert_eq!(compensations.len(), 1);
    assert_eq!(compensations[0].reason, MovementReason::RollbackCompensation);
    assert_eq!(
        engine
            .store()
            .snapshot("TOMATO-001")
            .unwrap()
            .quantity_on_hand,
        Decimal::from(10)
    );
    assert_eq!(
        engine.batch(batch.id).unwrap().status,
        BatchStatus::RolledBack
    );

    // 6. 日誌對帳：期初 10 + 所有異動 = 現量
    assert_eq!(
        engine.movement_log().reconcile("TOMATO-001", Decimal::from(10)),
        Decimal::from(10)
    );
}

#[test]
fn test_concurrent_prepares_never_oversell() {
    // 10 kg 只夠 3 次各 1 份（3 kg/份）；8 個執行緒同時搶

    let engine = Arc::new(sauce_engine(10));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.prepare("SAUCE-01", 1, &format!("chef-{i}")))
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(batch) => {
                assert_eq!(batch.status, BatchStatus::Completed);
                succeeded += 1;
            }
            Err(err) => assert!(
                matches!(
                    err,
                    StockError::RecipeNotPreparable { .. }
                        | StockError::ConcurrentStockExhausted { .. }
                ),
                "意外的錯誤: {err:?}"
            ),
        }
    }

    assert_eq!(succeeded, 3);
    assert_eq!(
        engine
            .store()
            .snapshot("TOMATO-001")
            .unwrap()
            .quantity_on_hand,
        Decimal::ONE
    );

    // 失敗的嘗試不留任何異動：只有 3 筆消耗
    let movements = engine.movement_log().entries_for_ingredient("TOMATO-001");
    assert_eq!(movements.len(), 3);
    assert!(movements
        .iter()
        .all(|m| m.reason == MovementReason::Consumption));
    assert_eq!(
        engine.movement_log().reconcile("TOMATO-001", Decimal::from(10)),
        Decimal::ONE
    );
}

#[test]
fn test_recheck_under_lock_detects_exhaustion() {
    // 驗證通過後、取鎖之前庫存被抽走 → 鎖下重檢擋下扣帳

    let engine = Arc::new(sauce_engine(10));

    // 主執行緒先佔住番茄的行鎖
    let locks = LockSet::acquire(
        engine.store(),
        &["TOMATO-001".to_string()],
        Duration::from_millis(500),
    )
    .unwrap();

    let worker = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.prepare("SAUCE-01", 3, "chef-lin"))
    };

    // 等 worker 完成驗證並卡在取鎖上，再抽走庫存
    thread::sleep(Duration::from_millis(150));
    engine
        .ledger()
        .debit(
            &locks,
            "TOMATO-001",
            Decimal::from(9),
            MovementReason::Loss,
            "auditor",
            "loss-spoilage",
        )
        .unwrap();
    drop(locks);

    let err = worker.join().unwrap().unwrap_err();
    match err {
        StockError::ConcurrentStockExhausted {
            ingredient_id,
            requested,
            available,
        } => {
            assert_eq!(ingredient_id, "TOMATO-001");
            assert_eq!(requested, Decimal::from(9));
            assert_eq!(available, Decimal::ONE);
        }
        other => panic!("意外的錯誤: {other:?}"),
    }

    // 失敗的製備沒有留下消耗異動
    assert!(engine
        .movement_log()
        .entries_for_ingredient("TOMATO-001")
        .iter()
        .all(|m| m.reason == MovementReason::Loss));
}

#[test]
fn test_partial_failure_debits_nothing() {
    // 兩條必備明細：第一條充足、第二條不足 → 整批放棄，第一條也不動

    let engine = PreparationEngine::new();
    engine.register_ingredient(Ingredient::new(
        "FLOUR-001".to_string(),
        "麵粉".to_string(),
        Unit::MassKg,
        Decimal::from(100),
    ));
    engine.register_ingredient(Ingredient::new(
        "CHEESE-001".to_string(),
        "起司".to_string(),
        Unit::MassKg,
        Decimal::ONE,
    ));
    engine
        .register_recipe(
            Recipe::new("PIZZA-01".to_string(), "ITEM-PIZZA".to_string(), 1)
                .with_line(RecipeLine::new("FLOUR-001".to_string(), Decimal::from(2)))
                .with_line(RecipeLine::new("CHEESE-001".to_string(), Decimal::from(3))),
        )
        .unwrap();

    let err = engine.prepare("PIZZA-01", 1, "chef-lin").unwrap_err();
    assert!(matches!(err, StockError::RecipeNotPreparable { .. }));

    assert_eq!(
        engine
            .store()
            .snapshot("FLOUR-001")
            .unwrap()
            .quantity_on_hand,
        Decimal::from(100)
    );
    assert!(engine.movement_log().is_empty());
}

#[test]
fn test_substitution_with_conversion_end_to_end() {
    // 鮮番茄不足 → 走罐頭番茄，換算比 1.5

    let engine = sauce_engine(2);
    engine.register_ingredient(Ingredient::new(
        "CANNED-001".to_string(),
        "罐頭番茄".to_string(),
        Unit::MassKg,
        Decimal::from(30),
    ));
    engine
        .register_substitution(Substitution::new(
            "TOMATO-001".to_string(),
            "CANNED-001".to_string(),
            Decimal::new(15, 1),
            1,
        ))
        .unwrap();

    // 驗證報告標示替代
    let report = engine.validate("SAUCE-01", 2).unwrap();
    assert!(report.can_prepare);
    assert!(matches!(
        &report.lines[0].status,
        LineAvailability::Substituted { substitute_id, converted_quantity, .. }
            if substitute_id == "CANNED-001" && *converted_quantity == Decimal::from(9)
    ));

    // 製備 2 份：6 kg × 1.5 = 9 kg 罐頭，鮮番茄不動
    let batch = engine.prepare("SAUCE-01", 2, "chef-lin").unwrap();
    assert_eq!(
        engine
            .store()
            .snapshot("TOMATO-001")
            .unwrap()
            .quantity_on_hand,
        Decimal::from(2)
    );
    assert_eq!(
        engine
            .store()
            .snapshot("CANNED-001")
            .unwrap()
            .quantity_on_hand,
        Decimal::from(21)
    );

    // 回沖補回的是實際扣掉的替代品
    engine.rollback(batch.id, "manager-wu").unwrap();
    assert_eq!(
        engine
            .store()
            .snapshot("CANNED-001")
            .unwrap()
            .quantity_on_hand,
        Decimal::from(30)
    );
}

#[test]
fn test_restock_and_adjust_flow() {
    let engine = sauce_engine(10);

    // 進貨 +5
    engine
        .ledger()
        .restock("TOMATO-001", Decimal::from(5), "supplier-999", "po-1001")
        .unwrap();
    assert_eq!(
        engine
            .store()
            .snapshot("TOMATO-001")
            .unwrap()
            .quantity_on_hand,
        Decimal::from(15)
    );

    // 盤點調整至 12（差異 -3）
    let entry = engine
        .ledger()
        .adjust(
            "TOMATO-001",
            Decimal::from(12),
            MovementReason::Correction,
            "auditor",
        )
        .unwrap()
        .unwrap();
    assert_eq!(entry.quantity, Decimal::from(3));
    assert_eq!(
        engine.movement_log().reconcile("TOMATO-001", Decimal::from(10)),
        Decimal::from(12)
    );
}

#[test]
fn test_recipe_costing_through_engine() {
    let engine = PreparationEngine::new();
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
            Decimal::from(10),
        )
        .with_unit_cost(Decimal::from(300)),
    );
    engine
        .register_recipe(
            Recipe::new("PIZZA-01".to_string(), "ITEM-PIZZA".to_string(), 4)
                .with_line(RecipeLine::new("FLOUR-001".to_string(), Decimal::from(2)))
                .with_line(RecipeLine::new("CHEESE-001".to_string(), Decimal::ONE)),
        )
        .unwrap();

    // (2×20 + 1×300) ÷ 4 = 85/份
    assert_eq!(
        engine.recipe_unit_cost("PIZZA-01").unwrap(),
        Decimal::from(85)
    );
}

#[test]
fn test_availability_report_serializes() {
    let engine = sauce_engine(10);
    let report = engine.validate("SAUCE-01", 2).unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["recipe_id"], "SAUCE-01");
    assert_eq!(value["can_prepare"], true);
    assert_eq!(value["lines"][0]["ingredient_id"], "TOMATO-001");
    assert_eq!(value["lines"][0]["status"]["status"], "available");
}
