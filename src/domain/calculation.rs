// ==========================================
// 建筑碳排放核算系统 - 核算结果
// ==========================================
// 红线: total_emissions 恒等于三类小计之和（构造保证, 不单独计算）
// 说明: 结果为只读值对象, 输入变化时整体替换
// ==========================================

use crate::domain::types::{EmissionCategory, EmissionScope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ScopeBreakdown - 排放范围拆分
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeBreakdown {
    pub scope1: f64,
    pub scope2: f64,
    pub scope3: f64,
    /// 是否含启发式比例拆分（非实测值）
    pub estimated: bool,
}

impl ScopeBreakdown {
    pub fn add(&mut self, scope: EmissionScope, value: f64) {
        match scope {
            EmissionScope::Scope1 => self.scope1 += value,
            EmissionScope::Scope2 => self.scope2 += value,
            EmissionScope::Scope3 => self.scope3 += value,
        }
    }

    /// 按比例拆分并标记为估算
    pub fn add_split(&mut self, split: &ScopeSplit, value: f64) {
        self.scope1 += value * split.scope1;
        self.scope2 += value * split.scope2;
        self.scope3 += value * split.scope3;
        if value != 0.0 {
            self.estimated = true;
        }
    }

    pub fn total(&self) -> f64 {
        self.scope1 + self.scope2 + self.scope3
    }
}

// ==========================================
// ScopeSplit - 启发式范围比例
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScopeSplit {
    pub scope1: f64,
    pub scope2: f64,
    pub scope3: f64,
}

impl ScopeSplit {
    pub const fn new(scope1: f64, scope2: f64, scope3: f64) -> Self {
        Self { scope1, scope2, scope3 }
    }

    /// 建材默认: 10% / 20% / 70%
    pub const MATERIALS: ScopeSplit = ScopeSplit::new(0.1, 0.2, 0.7);

    /// 运输默认: 30% / 0% / 70%
    pub const TRANSPORT: ScopeSplit = ScopeSplit::new(0.3, 0.0, 0.7);

    /// 解析 "0.1,0.2,0.7" 形式的配置值
    ///
    /// 三项必须均为非负数且和为 1（容差 1e-6）, 否则返回 None
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<f64> = raw
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        if parts.len() != 3 || parts.iter().any(|v| *v < 0.0) {
            return None;
        }
        if ((parts[0] + parts[1] + parts[2]) - 1.0).abs() > 1e-6 {
            return None;
        }
        Some(Self::new(parts[0], parts[1], parts[2]))
    }
}

// ==========================================
// UnresolvedFactor - 未解析的因子键
// ==========================================
// 类型键不在因子表且无显式碳足迹时, 贡献为 0 并记录于此
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedFactor {
    pub category: EmissionCategory,
    pub item_type: String,
}

// ==========================================
// CalculationResult - 核算结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub material_emissions: f64,
    pub transport_emissions: f64,
    pub energy_emissions: f64,
    pub total_emissions: f64,
    pub scopes: ScopeBreakdown,
    pub breakdown_by_material: BTreeMap<String, f64>,
    pub breakdown_by_transport: BTreeMap<String, f64>,
    pub breakdown_by_energy: BTreeMap<String, f64>,
    #[serde(default)]
    pub unresolved: Vec<UnresolvedFactor>,
}

impl CalculationResult {
    /// 由三类小计构造结果（total 由加和得出）
    pub fn from_subtotals(material: f64, transport: f64, energy: f64) -> Self {
        Self {
            material_emissions: material,
            transport_emissions: transport,
            energy_emissions: energy,
            total_emissions: material + transport + energy,
            ..Default::default()
        }
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}
