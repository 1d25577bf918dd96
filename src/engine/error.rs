// ==========================================
// 建筑碳排放核算系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::EmissionCategory;
use chrono::NaiveDate;
use thiserror::Error;

/// 核算错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    #[error("未知排放因子: category={category}, type={item_type}")]
    UnknownFactor {
        category: EmissionCategory,
        item_type: String,
    },

    #[error("无效排放因子: type={item_type}, value={value}")]
    InvalidFactor { item_type: String, value: f64 },

    #[error("EPD 已过期: epd_id={epd_id}, valid_until={valid_until}")]
    ExpiredEpd {
        epd_id: String,
        valid_until: NaiveDate,
    },
}

/// 规则评估错误
///
/// 规则条件返回该错误时, 该规则不计入得分分子与分母
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("数据不足: {0}")]
    InsufficientData(String),

    #[error("输入值无效: {0}")]
    InvalidInput(String),

    #[error("规则内部错误: {0}")]
    Internal(String),
}
