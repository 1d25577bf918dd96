// ==========================================
// 建筑碳排放核算系统 - 核算汇总引擎
// ==========================================
// 职责: 三类明细行 → 排放小计/总计/范围拆分/分项明细
// 红线: 纯函数, 无 I/O（仅日志）
// 红线: total = material + transport + energy, 不单独计算
// ==========================================
// 因子解析顺序:
// 1. 明细行显式 carbon_footprint
// 2. 因子表按 type 精确匹配（区分大小写）
// 3. 均未命中 → 贡献为 0, 记入 unresolved
// ==========================================

use crate::domain::calculation::{CalculationResult, ScopeBreakdown, ScopeSplit, UnresolvedFactor};
use crate::domain::line_item::{EnergyLineItem, MaterialLineItem, ProjectInput, TransportLineItem};
use crate::domain::types::{EmissionCategory, EmissionScope};
use crate::engine::error::CalculationError;
use crate::factors::EmissionFactorTable;
use std::collections::BTreeMap;
use std::sync::Arc;

// ==========================================
// AggregatorSettings - 汇总参数
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorSettings {
    /// 建材无显式范围时的拆分比例
    pub material_split: ScopeSplit,
    /// 运输无显式范围时的拆分比例
    pub transport_split: ScopeSplit,
    /// 严格模式: 未知因子键直接报错
    pub strict_factor_resolution: bool,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            material_split: ScopeSplit::MATERIALS,
            transport_split: ScopeSplit::TRANSPORT,
            strict_factor_resolution: false,
        }
    }
}

/// 单行解析结果
struct Resolved {
    factor: f64,
    scope: Option<EmissionScope>,
}

// ==========================================
// CalculationAggregator - 核算汇总引擎
// ==========================================
pub struct CalculationAggregator {
    factors: Arc<EmissionFactorTable>,
    settings: AggregatorSettings,
}

impl CalculationAggregator {
    pub fn new(factors: Arc<EmissionFactorTable>, settings: AggregatorSettings) -> Self {
        Self { factors, settings }
    }

    /// 使用内置因子表与默认参数
    pub fn with_standard_factors() -> Self {
        Self::new(
            Arc::new(EmissionFactorTable::standard()),
            AggregatorSettings::default(),
        )
    }

    pub fn factors(&self) -> &EmissionFactorTable {
        &self.factors
    }

    pub fn settings(&self) -> &AggregatorSettings {
        &self.settings
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算总排放
    ///
    /// # 说明
    /// - 数量不做校验, 负数/零按原值参与计算
    /// - 未知类型贡献为 0 且不报错（记录于 unresolved 并告警日志）
    /// - 结果不做舍入
    pub fn calculate_total_emissions(
        &self,
        materials: &[MaterialLineItem],
        transport: &[TransportLineItem],
        energy: &[EnergyLineItem],
    ) -> CalculationResult {
        let mut scopes = ScopeBreakdown::default();
        let mut unresolved: Vec<UnresolvedFactor> = Vec::new();

        // 1. 建材
        let mut breakdown_by_material = BTreeMap::new();
        let mut material_emissions = 0.0;
        for item in materials {
            let Some(resolved) = self.resolve(
                EmissionCategory::Material,
                &item.item_type,
                item.carbon_footprint,
                &mut unresolved,
            ) else {
                continue;
            };
            let value = resolved.factor * item.quantity;
            material_emissions += value;
            *breakdown_by_material.entry(item.item_type.clone()).or_insert(0.0) += value;
            match item.scope {
                Some(scope) => scopes.add(scope, value),
                None => scopes.add_split(&self.settings.material_split, value),
            }
        }

        // 2. 运输: factor × distance × weight
        let mut breakdown_by_transport = BTreeMap::new();
        let mut transport_emissions = 0.0;
        for item in transport {
            let Some(resolved) = self.resolve(
                EmissionCategory::Transport,
                &item.item_type,
                item.carbon_footprint,
                &mut unresolved,
            ) else {
                continue;
            };
            let value = resolved.factor * item.activity();
            transport_emissions += value;
            *breakdown_by_transport.entry(item.item_type.clone()).or_insert(0.0) += value;
            match item.scope {
                Some(scope) => scopes.add(scope, value),
                None => scopes.add_split(&self.settings.transport_split, value),
            }
        }

        // 3. 能耗: 范围优先取明细行, 其次取因子表
        let mut breakdown_by_energy = BTreeMap::new();
        let mut energy_emissions = 0.0;
        for item in energy {
            let Some(resolved) = self.resolve(
                EmissionCategory::Energy,
                &item.item_type,
                item.carbon_footprint,
                &mut unresolved,
            ) else {
                continue;
            };
            let value = resolved.factor * item.amount;
            energy_emissions += value;
            *breakdown_by_energy.entry(item.item_type.clone()).or_insert(0.0) += value;
            match item.scope.or(resolved.scope) {
                Some(scope) => scopes.add(scope, value),
                None => {
                    // 无范围信息的能耗按外购电力估算
                    scopes.add(EmissionScope::Scope2, value);
                    if value != 0.0 {
                        scopes.estimated = true;
                    }
                }
            }
        }

        let mut result =
            CalculationResult::from_subtotals(material_emissions, transport_emissions, energy_emissions);
        result.scopes = scopes;
        result.breakdown_by_material = breakdown_by_material;
        result.breakdown_by_transport = breakdown_by_transport;
        result.breakdown_by_energy = breakdown_by_energy;
        result.unresolved = unresolved;

        tracing::debug!(
            materials = materials.len(),
            transport = transport.len(),
            energy = energy.len(),
            total = result.total_emissions,
            unresolved = result.unresolved.len(),
            "排放汇总完成"
        );

        result
    }

    /// 严格模式计算: 存在未知因子键时返回首个错误
    pub fn calculate_total_emissions_strict(
        &self,
        materials: &[MaterialLineItem],
        transport: &[TransportLineItem],
        energy: &[EnergyLineItem],
    ) -> Result<CalculationResult, CalculationError> {
        let result = self.calculate_total_emissions(materials, transport, energy);
        if let Some(first) = result.unresolved.first() {
            return Err(CalculationError::UnknownFactor {
                category: first.category,
                item_type: first.item_type.clone(),
            });
        }
        Ok(result)
    }

    /// 按配置的解析模式计算项目输入
    pub fn calculate(&self, input: &ProjectInput) -> Result<CalculationResult, CalculationError> {
        if self.settings.strict_factor_resolution {
            self.calculate_total_emissions_strict(&input.materials, &input.transport, &input.energy)
        } else {
            Ok(self.calculate_total_emissions(&input.materials, &input.transport, &input.energy))
        }
    }

    /// 解析单行因子（kg CO2e / 单位）
    ///
    /// 未命中时记录 unresolved（同一 category+type 只记一次）
    pub fn resolve_factor(
        &self,
        category: EmissionCategory,
        item_type: &str,
        explicit: Option<f64>,
    ) -> Option<f64> {
        let mut sink = Vec::new();
        self.resolve(category, item_type, explicit, &mut sink)
            .map(|r| r.factor)
    }

    fn resolve(
        &self,
        category: EmissionCategory,
        item_type: &str,
        explicit: Option<f64>,
        unresolved: &mut Vec<UnresolvedFactor>,
    ) -> Option<Resolved> {
        let table_entry = self.factors.lookup(category, item_type);

        if let Some(factor) = explicit {
            return Some(Resolved {
                factor,
                scope: table_entry.and_then(|f| f.scope),
            });
        }

        if let Some(entry) = table_entry {
            return Some(Resolved {
                factor: entry.factor,
                scope: entry.scope,
            });
        }

        let already_recorded = unresolved
            .iter()
            .any(|u| u.category == category && u.item_type == item_type);
        if !already_recorded {
            tracing::warn!(
                category = %category,
                item_type,
                "未知排放因子类型, 按 0 计入"
            );
            unresolved.push(UnresolvedFactor {
                category,
                item_type: item_type.to_string(),
            });
        }
        None
    }
}
