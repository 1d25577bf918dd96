// ==========================================
// 建筑碳排放核算系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::CarbonApi;
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::compliance::ComplianceEngine;
use crate::engine::enhanced::EnhancedComplianceService;
use crate::engine::remote::{OfflineComplianceChecker, RemoteComplianceChecker};
use crate::factors::EmissionFactorTable;
use crate::repository::{
    CalculationHistoryRepository, ComplianceReportRepository, UserPreferenceRepository,
};

/// 应用状态
///
/// 包含 API 实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 核算与合规 API
    pub carbon_api: Arc<CarbonApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例（远程校验离线）
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表
    /// 2. 从 config_kv 加载阈值与参数
    /// 3. 初始化 Repository / Engine / API
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::with_remote_checker(db_path, Arc::new(OfflineComplianceChecker))
    }

    /// 使用指定远程校验器创建AppState
    pub fn with_remote_checker(
        db_path: String,
        checker: Arc<dyn RemoteComplianceChecker>,
    ) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let compliance_settings = config_manager
            .load_compliance_settings()
            .map_err(|e| format!("加载合规配置失败: {}", e))?;
        let aggregator_settings = config_manager
            .load_aggregator_settings()
            .map_err(|e| format!("加载核算配置失败: {}", e))?;
        let remote_settings = config_manager
            .load_remote_settings()
            .map_err(|e| format!("加载远程校验配置失败: {}", e))?;

        // ==========================================
        // Repository
        // ==========================================
        let history_repo = Arc::new(CalculationHistoryRepository::from_connection(conn.clone()));
        let compliance_repo = Arc::new(ComplianceReportRepository::from_connection(conn.clone()));
        let preference_repo = Arc::new(UserPreferenceRepository::from_connection(conn));

        // ==========================================
        // Engine
        // ==========================================
        let factors = Arc::new(EmissionFactorTable::standard());
        let engine = Arc::new(ComplianceEngine::standard(
            Arc::clone(&factors),
            &compliance_settings,
        ));
        let compliance = Arc::new(
            EnhancedComplianceService::new(engine, checker, remote_settings)
                .with_store(compliance_repo.clone()),
        );

        let carbon_api = Arc::new(CarbonApi::new(
            factors,
            aggregator_settings,
            compliance,
            history_repo,
            compliance_repo,
            preference_repo,
            config_manager.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            carbon_api,
            config_manager,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 CARBON_COMPLIANCE_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("CARBON_COMPLIANCE_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./carbon_compliance.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("carbon-compliance");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("carbon_compliance.db");
        }
    }

    path.to_string_lossy().to_string()
}
