// ==========================================
// 建筑碳排放核算系统 - 引擎层
// ==========================================
// 职责: 核算汇总、合规规则评估、远程合规合并、减排进度
// 红线: Engine 不拼 SQL, 持久化通过 Trait 注入
// ==========================================

pub mod aggregator;
pub mod compliance;
pub mod enhanced;
pub mod error;
pub mod progress;
pub mod remote;

// 重导出核心引擎
pub use aggregator::{AggregatorSettings, CalculationAggregator};
pub use compliance::{
    star_rating_for, ComplianceEngine, CompliancePolicy, ComplianceRule, ComplianceSettings,
    RuleSet,
};
pub use enhanced::{ComplianceReportStore, EnhancedComplianceService, RemoteSettings, ReportContext};
pub use error::{CalculationError, RuleError};
pub use progress::ProgressCalculator;
pub use remote::{
    NabersRemoteCheck, NccRemoteCheck, OfflineComplianceChecker, RemoteCheckError,
    RemoteCheckOptions, RemoteComplianceChecker,
};
