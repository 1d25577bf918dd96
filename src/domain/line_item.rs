// ==========================================
// 建筑碳排放核算系统 - 核算明细行
// ==========================================
// 职责: 定义建材/运输/能耗三类输入明细
// 说明: 明细行由一次核算会话创建, 创建后不可变
//       数值字段缺失时按 0 处理（serde default）
// ==========================================

use crate::domain::epd::Epd;
use crate::domain::types::EmissionScope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// MaterialLineItem - 建材明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLineItem {
    /// 建材类型键（对应排放因子表, 区分大小写）
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    /// 显式碳足迹 (kg CO2e / 单位), 存在时覆盖因子表
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_footprint: Option<f64>,
    /// 显式排放范围
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<EmissionScope>,
}

impl MaterialLineItem {
    pub fn new(item_type: &str, quantity: f64, unit: &str) -> Self {
        Self {
            item_type: item_type.to_string(),
            quantity,
            unit: unit.to_string(),
            carbon_footprint: None,
            scope: None,
        }
    }

    pub fn with_carbon_footprint(mut self, footprint: f64) -> Self {
        self.carbon_footprint = Some(footprint);
        self
    }

    pub fn with_scope(mut self, scope: EmissionScope) -> Self {
        self.scope = Some(scope);
        self
    }
}

// ==========================================
// TransportLineItem - 运输明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportLineItem {
    #[serde(rename = "type")]
    pub item_type: String,
    /// 运距 (km)
    #[serde(default)]
    pub distance: f64,
    /// 载重 (t), 缺失时按单位重量 1 处理
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_footprint: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<EmissionScope>,
}

impl TransportLineItem {
    pub fn new(item_type: &str, distance: f64) -> Self {
        Self {
            item_type: item_type.to_string(),
            distance,
            weight: None,
            carbon_footprint: None,
            scope: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_carbon_footprint(mut self, footprint: f64) -> Self {
        self.carbon_footprint = Some(footprint);
        self
    }

    /// 运输活动量 = distance × weight（weight 缺失按 1）
    pub fn activity(&self) -> f64 {
        self.distance * self.weight.unwrap_or(1.0)
    }
}

// ==========================================
// EnergyLineItem - 能耗明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyLineItem {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_footprint: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<EmissionScope>,
}

impl EnergyLineItem {
    pub fn new(item_type: &str, amount: f64, unit: &str) -> Self {
        Self {
            item_type: item_type.to_string(),
            amount,
            unit: unit.to_string(),
            carbon_footprint: None,
            scope: None,
        }
    }

    pub fn with_carbon_footprint(mut self, footprint: f64) -> Self {
        self.carbon_footprint = Some(footprint);
        self
    }

    pub fn with_scope(mut self, scope: EmissionScope) -> Self {
        self.scope = Some(scope);
        self
    }
}

// ==========================================
// ProjectInput - 一次核算的完整输入
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub project_id: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub materials: Vec<MaterialLineItem>,
    #[serde(default)]
    pub transport: Vec<TransportLineItem>,
    #[serde(default)]
    pub energy: Vec<EnergyLineItem>,
    /// 项目 EPD（建材类型键 → 声明）, 有效期内覆盖标准因子
    #[serde(default)]
    pub epds: BTreeMap<String, Epd>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_numeric_fields_default_to_zero() {
        let item: MaterialLineItem = serde_json::from_str(r#"{"type":"concrete"}"#).unwrap();
        assert_eq!(item.quantity, 0.0);
        assert!(item.carbon_footprint.is_none());

        let energy: EnergyLineItem = serde_json::from_str(r#"{"type":"naturalGas","unit":"MJ"}"#).unwrap();
        assert_eq!(energy.amount, 0.0);
    }

    #[test]
    fn test_camel_case_footprint_field() {
        let item: MaterialLineItem = serde_json::from_str(
            r#"{"type":"steel","quantity":2,"unit":"kg","carbonFootprint":1.5}"#,
        )
        .unwrap();
        assert_eq!(item.carbon_footprint, Some(1.5));
    }

    #[test]
    fn test_transport_activity_unit_weight() {
        assert_eq!(TransportLineItem::new("ausTruck", 100.0).activity(), 100.0);
        assert_eq!(
            TransportLineItem::new("ausTruck", 100.0).with_weight(2.5).activity(),
            250.0
        );
    }
}
