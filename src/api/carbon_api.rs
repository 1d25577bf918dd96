// ==========================================
// 建筑碳排放核算系统 - 核算与合规 API
// ==========================================
// 职责: 编排引擎、仓储与导入导出, 对外提供业务接口
// 红线: API 不拼 SQL, 不含规则逻辑
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::domain::calculation::CalculationResult;
use crate::domain::compliance::DetailedComplianceReport;
use crate::domain::history::{
    CalculationRecord, ComplianceAlert, GoalProgress, HistorySummary, MaterialFavorite,
    StoredComplianceReport, UserGoal,
};
use crate::domain::line_item::{MaterialLineItem, ProjectInput};
use crate::domain::types::EmissionCategory;
use crate::engine::aggregator::{AggregatorSettings, CalculationAggregator};
use crate::engine::enhanced::{EnhancedComplianceService, ReportContext};
use crate::engine::progress::ProgressCalculator;
use crate::export::{render, ExportFormat, ReportBundle};
use crate::factors::EmissionFactorTable;
use crate::importer::BoqImporter;
use crate::repository::{
    CalculationHistoryRepository, ComplianceReportRepository, UserPreferenceRepository,
};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;

// ==========================================
// CarbonApi
// ==========================================
pub struct CarbonApi {
    factors: Arc<EmissionFactorTable>,
    aggregator_settings: AggregatorSettings,
    compliance: Arc<EnhancedComplianceService>,
    history_repo: Arc<CalculationHistoryRepository>,
    compliance_repo: Arc<ComplianceReportRepository>,
    preference_repo: Arc<UserPreferenceRepository>,
    config_manager: Arc<ConfigManager>,
}

impl CarbonApi {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        factors: Arc<EmissionFactorTable>,
        aggregator_settings: AggregatorSettings,
        compliance: Arc<EnhancedComplianceService>,
        history_repo: Arc<CalculationHistoryRepository>,
        compliance_repo: Arc<ComplianceReportRepository>,
        preference_repo: Arc<UserPreferenceRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            factors,
            aggregator_settings,
            compliance,
            history_repo,
            compliance_repo,
            preference_repo,
            config_manager,
        }
    }

    // ==========================================
    // 核算
    // ==========================================

    /// 项目核算
    ///
    /// # 说明
    /// - 项目携带 EPD 时, 在标准因子表副本上注册后计算
    /// - 过期或无效 EPD 记告警日志并跳过, 回落标准因子
    pub fn calculate(&self, input: &ProjectInput) -> ApiResult<CalculationResult> {
        let aggregator = self.aggregator_for(input);
        let result = aggregator.calculate(input)?;

        tracing::info!(
            project_id = %input.project_id,
            total = result.total_emissions,
            unresolved = result.unresolved.len(),
            "项目核算完成"
        );
        Ok(result)
    }

    /// 核算并写入历史
    pub fn calculate_and_save(&self, user_id: &str, input: &ProjectInput) -> ApiResult<CalculationRecord> {
        require_non_empty("project_id", &input.project_id)?;
        require_non_empty("user_id", user_id)?;

        let result = self.calculate(input)?;
        let record = self.history_repo.insert(&input.project_id, user_id, &result)?;
        Ok(record)
    }

    fn aggregator_for(&self, input: &ProjectInput) -> CalculationAggregator {
        if input.epds.is_empty() {
            return CalculationAggregator::new(Arc::clone(&self.factors), self.aggregator_settings.clone());
        }

        let today = Utc::now().date_naive();
        let mut table = (*self.factors).clone();
        for (material_key, epd) in &input.epds {
            if let Err(e) = table.register_epd(material_key, epd, today) {
                tracing::warn!(
                    project_id = %input.project_id,
                    material_key = %material_key,
                    error = %e,
                    "EPD 未采用, 使用标准因子"
                );
            }
        }
        CalculationAggregator::new(Arc::new(table), self.aggregator_settings.clone())
    }

    // ==========================================
    // 合规
    // ==========================================

    /// 合规评估（本地 + 远程合并）
    ///
    /// # 参数
    /// - persist: true 时存档报告与配置快照（要求 project_id 非空）
    pub async fn check_compliance(
        &self,
        input: &ProjectInput,
        persist: bool,
    ) -> ApiResult<DetailedComplianceReport> {
        let context = if persist {
            require_non_empty("project_id", &input.project_id)?;
            let snapshot = match self.config_manager.get_config_snapshot() {
                Ok(s) => Some(s),
                Err(e) => {
                    tracing::warn!(error = %e, "配置快照获取失败");
                    None
                }
            };
            Some(ReportContext {
                project_id: input.project_id.clone(),
                region: None,
                config_snapshot: snapshot,
            })
        } else {
            None
        };

        let report = self
            .compliance
            .check(&input.materials, &input.energy, context.as_ref())
            .await;
        Ok(report)
    }

    pub fn list_open_alerts(&self, project_id: &str) -> ApiResult<Vec<ComplianceAlert>> {
        Ok(self.compliance_repo.list_open_alerts(project_id)?)
    }

    pub fn resolve_alert(&self, alert_id: &str) -> ApiResult<bool> {
        Ok(self.compliance_repo.resolve_alert(alert_id)?)
    }

    pub fn latest_report(&self, project_id: &str) -> ApiResult<Option<StoredComplianceReport>> {
        Ok(self.compliance_repo.latest_report(project_id)?)
    }

    // ==========================================
    // 目标与历史
    // ==========================================

    pub fn set_goal(&self, goal: &UserGoal) -> ApiResult<()> {
        require_non_empty("user_id", &goal.user_id)?;
        require_non_empty("project_id", &goal.project_id)?;
        Ok(self.preference_repo.upsert_goal(goal)?)
    }

    /// 目标进度（以项目最近一次核算为当前排放）
    pub fn goal_progress(&self, user_id: &str, project_id: &str) -> ApiResult<GoalProgress> {
        let goal = self
            .preference_repo
            .get_goal(user_id, project_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("减排目标(user={}, project={})不存在", user_id, project_id))
            })?;
        let latest = self
            .history_repo
            .latest_for_project(project_id)?
            .ok_or_else(|| ApiError::NotFound(format!("项目{}无核算历史", project_id)))?;

        Ok(ProgressCalculator::goal_progress(&goal, latest.total_emissions()))
    }

    pub fn history_summary(&self, project_id: &str) -> ApiResult<HistorySummary> {
        // 仓储按最新在前返回; 汇总要求同一时刻的记录保持写入顺序
        let mut records = self.history_repo.list_by_project(project_id)?;
        records.reverse();
        Ok(ProgressCalculator::summarize_history(&records))
    }

    pub fn add_favorite(&self, user_id: &str, category: EmissionCategory, item_type: &str) -> ApiResult<bool> {
        require_non_empty("item_type", item_type)?;
        Ok(self.preference_repo.add_favorite(user_id, category, item_type)?)
    }

    pub fn list_favorites(&self, user_id: &str) -> ApiResult<Vec<MaterialFavorite>> {
        Ok(self.preference_repo.list_favorites(user_id)?)
    }

    // ==========================================
    // 导入导出
    // ==========================================

    /// 导出核算 + 合规报告（不存档）
    pub async fn export_report(&self, input: &ProjectInput, format: ExportFormat) -> ApiResult<String> {
        let calculation = self.calculate(input)?;
        let compliance = self.check_compliance(input, false).await?;
        Ok(render(&bundle_for(input, calculation, compliance), format)?)
    }

    /// 核算、合规评估各执行一次, 写入历史与合规存档后导出
    ///
    /// # 说明
    /// - 导出内容与存档内容为同一次评估结果（含 generated_at）
    pub async fn archive_and_export(
        &self,
        user_id: &str,
        input: &ProjectInput,
        format: ExportFormat,
    ) -> ApiResult<String> {
        let record = self.calculate_and_save(user_id, input)?;
        tracing::info!(record_id = %record.record_id, "核算历史已写入");
        let compliance = self.check_compliance(input, true).await?;
        Ok(render(&bundle_for(input, record.result, compliance), format)?)
    }

    pub fn import_materials(&self, path: &Path) -> ApiResult<Vec<MaterialLineItem>> {
        Ok(BoqImporter.import_file(path)?)
    }
}

fn bundle_for(
    input: &ProjectInput,
    calculation: CalculationResult,
    compliance: DetailedComplianceReport,
) -> ReportBundle {
    ReportBundle {
        project_id: input.project_id.clone(),
        project_name: input.project_name.clone(),
        generated_at: compliance.generated_at,
        calculation,
        compliance: Some(compliance),
        epds: input.epds.values().cloned().collect(),
    }
}

fn require_non_empty(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{} 不能为空", field)));
    }
    Ok(())
}
