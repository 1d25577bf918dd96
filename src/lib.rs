// ==========================================
// 建筑碳排放核算系统 - 核心库
// ==========================================
// 范围: 建材/运输/能耗排放核算, NCC 2025 与 NABERS 合规评估
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 排放因子表
pub mod factors;

// 引擎层 - 核算与合规规则
pub mod engine;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 工程量清单
pub mod importer;

// 导出层 - CSV / JSON 报告
pub mod export;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ComplianceStandard, EmissionCategory, EmissionScope, Severity};

// 领域实体
pub use domain::{
    CalculationResult, DetailedComplianceReport, EnergyLineItem, Epd, MaterialLineItem,
    ProjectInput, TransportLineItem,
};

// 引擎
pub use engine::{
    CalculationAggregator, ComplianceEngine, EnhancedComplianceService, ProgressCalculator,
};

// API
pub use api::CarbonApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "建筑碳排放核算系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
