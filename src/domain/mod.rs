// ==========================================
// 建筑碳排放核算系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、值对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod calculation;
pub mod compliance;
pub mod epd;
pub mod history;
pub mod line_item;
pub mod types;

// 重导出核心类型
pub use calculation::{CalculationResult, ScopeBreakdown, ScopeSplit, UnresolvedFactor};
pub use compliance::{
    ComplianceResult, DetailedComplianceReport, NabersResult, OverallCompliance, Violation,
    ALL_REQUIREMENTS_MET,
};
pub use epd::Epd;
pub use history::{
    CalculationRecord, ComplianceAlert, GoalProgress, HistorySummary, MaterialFavorite,
    StoredComplianceReport, UserGoal,
};
pub use line_item::{EnergyLineItem, MaterialLineItem, ProjectInput, TransportLineItem};
pub use types::{ComplianceStandard, EmissionCategory, EmissionScope, Severity};
