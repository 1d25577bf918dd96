// ==========================================
// 建筑碳排放核算系统 - 排放因子层
// ==========================================
// 职责: 建材/运输/能源三类静态因子表 + 可扩展查询表
// 红线: 纯数据, 不做计算
// ==========================================
// 新增类型 = 新增一条表项, 无需迁移
// ==========================================

pub mod energy;
pub mod materials;
pub mod transport;

use crate::domain::epd::Epd;
use crate::domain::types::{EmissionCategory, EmissionScope};
use crate::engine::error::CalculationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use energy::{is_renewable, ENERGY_FACTORS};
pub use materials::MATERIAL_FACTORS;
pub use transport::TRANSPORT_FACTORS;

// ==========================================
// FactorEntry - 静态表项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub factor: f64,
    pub unit: &'static str,
    pub scope: Option<EmissionScope>,
}

impl FactorEntry {
    pub const fn new(key: &'static str, name: &'static str, factor: f64, unit: &'static str) -> Self {
        Self {
            key,
            name,
            factor,
            unit,
            scope: None,
        }
    }

    pub const fn scoped(
        key: &'static str,
        name: &'static str,
        factor: f64,
        unit: &'static str,
        scope: EmissionScope,
    ) -> Self {
        Self {
            key,
            name,
            factor,
            unit,
            scope: Some(scope),
        }
    }
}

// ==========================================
// EmissionFactor - 排放因子
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionFactor {
    pub name: String,
    /// kg CO2e / 单位
    pub factor: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<EmissionScope>,
}

impl From<&FactorEntry> for EmissionFactor {
    fn from(entry: &FactorEntry) -> Self {
        Self {
            name: entry.name.to_string(),
            factor: entry.factor,
            unit: entry.unit.to_string(),
            scope: entry.scope,
        }
    }
}

// ==========================================
// EmissionFactorTable - 因子查询表
// ==========================================
// 键匹配区分大小写
#[derive(Debug, Clone, Default)]
pub struct EmissionFactorTable {
    materials: BTreeMap<String, EmissionFactor>,
    transport: BTreeMap<String, EmissionFactor>,
    energy: BTreeMap<String, EmissionFactor>,
}

impl EmissionFactorTable {
    /// 空表（测试或完全自定义场景）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 内置标准因子表
    pub fn standard() -> Self {
        let collect = |entries: &[FactorEntry]| {
            entries
                .iter()
                .map(|e| (e.key.to_string(), EmissionFactor::from(e)))
                .collect::<BTreeMap<_, _>>()
        };

        Self {
            materials: collect(MATERIAL_FACTORS),
            transport: collect(TRANSPORT_FACTORS),
            energy: collect(ENERGY_FACTORS),
        }
    }

    fn table(&self, category: EmissionCategory) -> &BTreeMap<String, EmissionFactor> {
        match category {
            EmissionCategory::Material => &self.materials,
            EmissionCategory::Transport => &self.transport,
            EmissionCategory::Energy => &self.energy,
        }
    }

    fn table_mut(&mut self, category: EmissionCategory) -> &mut BTreeMap<String, EmissionFactor> {
        match category {
            EmissionCategory::Material => &mut self.materials,
            EmissionCategory::Transport => &mut self.transport,
            EmissionCategory::Energy => &mut self.energy,
        }
    }

    pub fn lookup(&self, category: EmissionCategory, key: &str) -> Option<&EmissionFactor> {
        self.table(category).get(key)
    }

    pub fn lookup_material(&self, key: &str) -> Option<&EmissionFactor> {
        self.materials.get(key)
    }

    pub fn lookup_transport(&self, key: &str) -> Option<&EmissionFactor> {
        self.transport.get(key)
    }

    pub fn lookup_energy(&self, key: &str) -> Option<&EmissionFactor> {
        self.energy.get(key)
    }

    /// 新增或覆盖表项, 返回被覆盖的旧值
    pub fn insert(
        &mut self,
        category: EmissionCategory,
        key: &str,
        factor: EmissionFactor,
    ) -> Option<EmissionFactor> {
        self.table_mut(category).insert(key.to_string(), factor)
    }

    /// 按 EPD 注册建材因子（A1-A3 GWP / 声明单位）
    ///
    /// # 错误
    /// - EPD 在 today 不在有效期内 → ExpiredEpd
    /// - GWP 为负或非有限值 → InvalidFactor
    pub fn register_epd(
        &mut self,
        material_key: &str,
        epd: &Epd,
        today: NaiveDate,
    ) -> Result<(), CalculationError> {
        if !epd.is_valid_on(today) {
            return Err(CalculationError::ExpiredEpd {
                epd_id: epd.epd_id.clone(),
                valid_until: epd.valid_until,
            });
        }
        if !epd.gwp_a1_a3.is_finite() || epd.gwp_a1_a3 < 0.0 {
            return Err(CalculationError::InvalidFactor {
                item_type: material_key.to_string(),
                value: epd.gwp_a1_a3,
            });
        }

        let previous = self.insert(
            EmissionCategory::Material,
            material_key,
            EmissionFactor {
                name: format!("{} ({})", epd.product_name, epd.manufacturer),
                factor: epd.gwp_a1_a3,
                unit: epd.declared_unit.clone(),
                scope: None,
            },
        );

        tracing::info!(
            material_key,
            epd_id = %epd.epd_id,
            factor = epd.gwp_a1_a3,
            replaced = previous.is_some(),
            "EPD 因子已注册"
        );
        Ok(())
    }

    /// 某类别下全部键（有序）
    pub fn keys(&self, category: EmissionCategory) -> Vec<&str> {
        self.table(category).keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self, category: EmissionCategory) -> usize {
        self.table(category).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_epd(valid_until: NaiveDate) -> Epd {
        Epd {
            epd_id: "EPD-AU-0001".to_string(),
            product_name: "Envirocrete 32".to_string(),
            manufacturer: "Acme".to_string(),
            declared_unit: "kg".to_string(),
            gwp_a1_a3: 0.065,
            program_operator: "EPD Australasia".to_string(),
            valid_from: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            valid_until,
        }
    }

    #[test]
    fn test_standard_table_contains_reference_keys() {
        let table = EmissionFactorTable::standard();
        assert_eq!(table.lookup_material("concrete").unwrap().factor, 0.107);
        assert!(table.lookup_transport("ausTruck").is_some());
        assert_eq!(
            table.lookup_energy("naturalGas").unwrap().scope,
            Some(EmissionScope::Scope1)
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = EmissionFactorTable::standard();
        assert!(table.lookup_material("Concrete").is_none());
    }

    #[test]
    fn test_static_keys_are_unique() {
        for entries in [MATERIAL_FACTORS, TRANSPORT_FACTORS, ENERGY_FACTORS] {
            let mut keys: Vec<&str> = entries.iter().map(|e| e.key).collect();
            let before = keys.len();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), before);
        }
    }

    #[test]
    fn test_register_epd_overrides_material() {
        let mut table = EmissionFactorTable::standard();
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        table
            .register_epd("concrete", &sample_epd(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()), today)
            .unwrap();
        assert_eq!(table.lookup_material("concrete").unwrap().factor, 0.065);
    }

    #[test]
    fn test_register_expired_epd_rejected() {
        let mut table = EmissionFactorTable::standard();
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let err = table
            .register_epd("concrete", &sample_epd(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()), today)
            .unwrap_err();
        assert!(matches!(err, CalculationError::ExpiredEpd { .. }));
        assert_eq!(table.lookup_material("concrete").unwrap().factor, 0.107);
    }
}
