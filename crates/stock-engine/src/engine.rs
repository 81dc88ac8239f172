//! 製備引擎：備料扣帳的交易協調

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard};
use std::time::Duration;

use dashmap::DashMap;
use rust_decimal::Decimal;
use uuid::Uuid;

use stock_core::{
    AvailabilityReport, Ingredient, MovementEntry, MovementReason, PreparationBatch, Recipe,
    Result, StockError, Substitution,
};
use stock_ledger::{AlertSink, IngredientStore, Ledger, LockSet, MovementLog, NullAlertSink};

use crate::costing::{CatalogSink, NullCatalogSink, RecipeCosting};
use crate::resolver::SubstitutionResolver;
use crate::rollback::RollbackCoordinator;
use crate::validator::AvailabilityValidator;

/// 引擎配置
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// 取得行鎖的等待上限
    pub lock_wait: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_wait: Duration::from_secs(2),
        }
    }
}

/// 單一扣帳目標（原料本身或其替代品）
struct DebitTarget {
    ingredient_id: String,
    quantity: Decimal,
}

/// 製備引擎
///
/// 備料消耗的唯一入口：驗證 → 鎖定 → 重檢 → 扣帳 → 完成，
/// 整段為全有或全無——任何失敗都不留下任何扣帳
pub struct PreparationEngine {
    store: Arc<IngredientStore>,
    log: Arc<MovementLog>,
    ledger: Ledger,
    recipes: DashMap<String, Recipe>,
    // 序列化配方註冊：品項唯一性檢查與寫入必須是同一臨界區
    recipe_registration: Mutex<()>,
    substitutions: RwLock<Vec<Substitution>>,
    batches: DashMap<Uuid, PreparationBatch>,
    alert_sink: Arc<dyn AlertSink>,
    catalog: Arc<dyn CatalogSink>,
    config: EngineConfig,
}

impl PreparationEngine {
    /// 創建新的引擎
    pub fn new() -> Self {
        let store = Arc::new(IngredientStore::new());
        let log = Arc::new(MovementLog::new());
        let ledger = Ledger::new(Arc::clone(&store), Arc::clone(&log));
        Self {
            store,
            log,
            ledger,
            recipes: DashMap::new(),
            recipe_registration: Mutex::new(()),
            substitutions: RwLock::new(Vec::new()),
            batches: DashMap::new(),
            alert_sink: Arc::new(NullAlertSink),
            catalog: Arc::new(NullCatalogSink),
            config: EngineConfig::default(),
        }
    }

    /// 建構器模式：設置引擎配置
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self.rebuild_ledger();
        self
    }

    /// 建構器模式：設置警戒通知端
    pub fn with_alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alert_sink = sink;
        self.rebuild_ledger();
        self
    }

    /// 建構器模式：設置品項目錄回寫端
    pub fn with_catalog_sink(mut self, sink: Arc<dyn CatalogSink>) -> Self {
        self.catalog = sink;
        self
    }

    fn rebuild_ledger(&mut self) {
        self.ledger = Ledger::new(Arc::clone(&self.store), Arc::clone(&self.log))
            .with_alert_sink(Arc::clone(&self.alert_sink))
            .with_lock_wait(self.config.lock_wait);
    }

    /// 食材行存放區
    pub fn store(&self) -> &Arc<IngredientStore> {
        &self.store
    }

    /// 異動日誌
    pub fn movement_log(&self) -> &Arc<MovementLog> {
        &self.log
    }

    /// 帳本
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    fn substitutions_snapshot(&self) -> Vec<Substitution> {
        self.read_substitutions().clone()
    }

    fn read_substitutions(&self) -> RwLockReadGuard<'_, Vec<Substitution>> {
        self.substitutions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // 註冊
    // ------------------------------------------------------------------

    /// 註冊食材
    pub fn register_ingredient(&self, ingredient: Ingredient) {
        self.store.insert(ingredient);
    }

    /// 註冊配方
    ///
    /// 檢查明細不重複、食材存在且啟用、份數與用量為正，
    /// 並把重算的單份成本推回品項目錄（僅盡力而為）
    pub fn register_recipe(&self, recipe: Recipe) -> Result<()> {
        if recipe.portions_per_batch == 0 {
            return Err(StockError::InvalidQuantity(Decimal::ZERO));
        }
        let _registration = self
            .recipe_registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // 每個銷售品項至多綁定一份配方
        let duplicate = self
            .recipes
            .iter()
            .any(|r| r.catalog_item_id == recipe.catalog_item_id && r.id != recipe.id);
        if duplicate {
            return Err(StockError::DuplicateRecipe(recipe.catalog_item_id));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for line in &recipe.lines {
            if !seen.insert(line.ingredient_id.as_str()) {
                return Err(StockError::DuplicateRecipeLine {
                    recipe_id: recipe.id.clone(),
                    ingredient_id: line.ingredient_id.clone(),
                });
            }
            if line.quantity_per_batch <= Decimal::ZERO {
                return Err(StockError::InvalidQuantity(line.quantity_per_batch));
            }
            let ingredient = self.store.snapshot(&line.ingredient_id)?;
            if !ingredient.is_active {
                return Err(StockError::InactiveIngredient(line.ingredient_id.clone()));
            }
        }

        let cost = RecipeCosting::unit_cost(&recipe, &self.store)?;
        if let Err(err) = self.catalog.push_unit_cost(&recipe.catalog_item_id, cost) {
            // 回寫失敗不阻擋配方註冊
            tracing::warn!("品項 {} 成本回寫失敗: {}", recipe.catalog_item_id, err);
        }

        tracing::debug!("配方 {} 註冊完成，單份成本 {}", recipe.id, cost);
        self.recipes.insert(recipe.id.clone(), recipe);
        Ok(())
    }

    /// 註冊替代關係
    ///
    /// 自我替代、單位不相容與非正換算比都是設定錯誤，
    /// 在此一次性拒絕，不留到消耗時才發現
    pub fn register_substitution(&self, substitution: Substitution) -> Result<()> {
        if substitution.original_id == substitution.substitute_id {
            return Err(StockError::SelfSubstitution(substitution.original_id));
        }
        if substitution.conversion_ratio <= Decimal::ZERO {
            return Err(StockError::InvalidQuantity(substitution.conversion_ratio));
        }
        if substitution.priority == 0 {
            return Err(StockError::InvalidQuantity(Decimal::ZERO));
        }

        let original = self.store.snapshot(&substitution.original_id)?;
        let substitute = self.store.snapshot(&substitution.substitute_id)?;
        if !substitute.is_active {
            return Err(StockError::InactiveIngredient(substitution.substitute_id));
        }
        if !original.unit.is_substitutable_with(substitute.unit) {
            return Err(StockError::IncompatibleUnit {
                original: original.unit,
                substitute: substitute.unit,
            });
        }

        self.substitutions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(substitution);
        Ok(())
    }

    // ------------------------------------------------------------------
    // 查詢
    // ------------------------------------------------------------------

    /// 取得配方
    pub fn recipe(&self, recipe_id: &str) -> Result<Recipe> {
        self.recipes
            .get(recipe_id)
            .map(|r| r.clone())
            .ok_or_else(|| StockError::RecipeNotFound(recipe_id.to_string()))
    }

    /// 取得批次
    pub fn batch(&self, batch_id: Uuid) -> Option<PreparationBatch> {
        self.batches.get(&batch_id).map(|b| b.clone())
    }

    /// 某批次的全部異動（含消耗與回沖補償前的消耗記錄）
    pub fn movements_for_batch(&self, batch_id: Uuid) -> Result<Vec<MovementEntry>> {
        let batch = self
            .batch(batch_id)
            .ok_or(StockError::BatchNotFound(batch_id))?;
        Ok(self.log.entries_for_reference(&batch.reference))
    }

    /// 低庫存報表（觸及警戒線的啟用中食材）
    pub fn low_stock_report(&self) -> Vec<Ingredient> {
        self.store.low_stock()
    }

    /// 配方單份成本
    pub fn recipe_unit_cost(&self, recipe_id: &str) -> Result<Decimal> {
        let recipe = self.recipe(recipe_id)?;
        RecipeCosting::unit_cost(&recipe, &self.store)
    }

    /// 可行性驗證（唯讀）
    pub fn validate(&self, recipe_id: &str, portions: u32) -> Result<AvailabilityReport> {
        let recipe = self.recipe(recipe_id)?;
        let substitutions = self.read_substitutions();
        AvailabilityValidator::validate(&recipe, portions, &substitutions, &self.store)
    }

    // ------------------------------------------------------------------
    // 製備與回沖
    // ------------------------------------------------------------------

    /// 製備 N 份：驗證 → 鎖定 → 重檢 → 扣帳 → 完成
    ///
    /// 失敗路徑（驗證不過、取鎖逾時、鎖下重檢不過）一律不留
    /// 任何扣帳與批次；成功時回傳已完成的批次
    pub fn prepare(&self, recipe_id: &str, portions: u32, actor: &str) -> Result<PreparationBatch> {
        let recipe = self.recipe(recipe_id)?;
        let substitutions = self.substitutions_snapshot();

        tracing::info!(
            "開始製備: 配方 {}, {} 份, 操作者 {}",
            recipe_id,
            portions,
            actor
        );

        // Step 1: 可行性驗證（唯讀、未持鎖，結果可能過期）
        let report =
            AvailabilityValidator::validate(&recipe, portions, &substitutions, &self.store)?;
        if !report.can_prepare {
            tracing::debug!(
                "配方 {} 無法製備: 缺料 {} 項",
                recipe_id,
                report.missing_count
            );
            return Err(StockError::RecipeNotPreparable {
                report: Box::new(report),
            });
        }

        // Step 2: 建立批次（進行中）
        let mut batch = PreparationBatch::new(recipe_id.to_string(), portions, actor.to_string());

        // Step 3: 彙整需要鎖定的行：每條明細的原料，
        //         加上必備明細的所有啟用替代品（鎖下可能換用次順位）
        let mut lock_ids: Vec<String> = Vec::new();
        for line in &recipe.lines {
            lock_ids.push(line.ingredient_id.clone());
            if !line.is_optional {
                for edge in SubstitutionResolver::ordered_edges(&substitutions, &line.ingredient_id)
                {
                    lock_ids.push(edge.substitute_id.clone());
                }
            }
        }

        // Step 4: 依遞增ID順序取得排他行鎖
        let locks = LockSet::acquire(&self.store, &lock_ids, self.config.lock_wait)?;

        // Step 5: 持鎖重檢並規劃扣帳目標；任何必備明細不再可滿足
        //         即整批放棄，此時尚未寫入任何異動
        let planned = Self::plan_debits(&recipe, portions, &substitutions, &locks)?;

        // Step 6: 逐目標扣帳，全部掛在批次參考之下
        for target in &planned {
            self.ledger.debit(
                &locks,
                &target.ingredient_id,
                target.quantity,
                MovementReason::Consumption,
                actor,
                &batch.reference,
            )?;
        }

        // Step 7: 先釋放行鎖，再完成並登記批次
        drop(locks);
        batch.complete();
        self.batches.insert(batch.id, batch.clone());

        tracing::info!("批次 {} 完成: 扣帳 {} 筆", batch.id, planned.len());
        Ok(batch)
    }

    /// 持鎖重檢：以鎖下快照規劃每條明細的扣帳目標
    ///
    /// 同一食材可能被多條明細（或替代）扣用，因此以預計餘量
    /// 累計檢查；驗證時選中的替代品若已被並發扣走，改用
    /// 次順位仍可滿足的候選
    fn plan_debits(
        recipe: &Recipe,
        portions: u32,
        substitutions: &[Substitution],
        locks: &LockSet,
    ) -> Result<Vec<DebitTarget>> {
        let mut projected: HashMap<String, Decimal> = HashMap::new();
        let mut active: HashMap<String, bool> = HashMap::new();
        for id in locks.ids() {
            let ingredient = locks
                .ingredient(id)
                .ok_or_else(|| StockError::Internal(format!("鎖集合缺少 {id} 的行")))?;
            projected.insert(id.to_string(), ingredient.quantity_on_hand);
            active.insert(id.to_string(), ingredient.is_active);
        }

        let mut planned = Vec::with_capacity(recipe.lines.len());
        for line in &recipe.lines {
            let needed = line.quantity_for(portions);
            let original = &line.ingredient_id;

            let original_active = active.get(original.as_str()).copied().unwrap_or(false);
            if let Some(balance) = projected.get_mut(original.as_str()) {
                if original_active && *balance >= needed {
                    *balance -= needed;
                    planned.push(DebitTarget {
                        ingredient_id: original.clone(),
                        quantity: needed,
                    });
                    continue;
                }
            }

            // 可省略明細缺貨：跳過，不阻擋整批
            if line.is_optional {
                continue;
            }

            // 必備明細：依優先序找仍可滿足的替代品
            let mut chosen: Option<DebitTarget> = None;
            for edge in SubstitutionResolver::ordered_edges(substitutions, original) {
                let converted = edge.converted_quantity(needed);
                let substitute_active = active
                    .get(edge.substitute_id.as_str())
                    .copied()
                    .unwrap_or(false);
                if let Some(balance) = projected.get_mut(edge.substitute_id.as_str()) {
                    if substitute_active && *balance >= converted {
                        *balance -= converted;
                        chosen = Some(DebitTarget {
                            ingredient_id: edge.substitute_id.clone(),
                            quantity: converted,
                        });
                        break;
                    }
                }
            }

            match chosen {
                Some(target) => planned.push(target),
                None => {
                    let available = projected.get(original.as_str()).copied().unwrap_or_default();
                    return Err(StockError::ConcurrentStockExhausted {
                        ingredient_id: original.clone(),
                        requested: needed,
                        available,
                    });
                }
            }
        }

        Ok(planned)
    }

    /// 回沖一個已完成（或進行中）的批次
    pub fn rollback(&self, batch_id: Uuid, actor: &str) -> Result<Vec<MovementEntry>> {
        // get_mut 讓同一批次的並發回沖互斥，狀態檢查不會被跳過
        let mut batch = self
            .batches
            .get_mut(&batch_id)
            .ok_or(StockError::BatchNotFound(batch_id))?;
        RollbackCoordinator::perform(
            &self.ledger,
            &self.log,
            &self.store,
            batch.value_mut(),
            actor,
            self.config.lock_wait,
        )
    }
}

impl Default for PreparationEngine {
    fn default() -> Self {
        Self::new()
    }
}
