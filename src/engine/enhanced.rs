// ==========================================
// 建筑碳排放核算系统 - 增强合规服务
// ==========================================
// 职责: 本地规则引擎结果 + 托管远程校验结果合并, 可选存档
// 合并: score 取较大值, compliant 取逻辑与
// 降级: 远程失败 → 告警日志, 原样使用本地结果（本层不重试）
// 存档: 失败仅记日志, 不影响返回
// ==========================================

use crate::domain::compliance::{ComplianceResult, DetailedComplianceReport, NabersResult};
use crate::domain::line_item::{EnergyLineItem, MaterialLineItem};
use crate::domain::types::ComplianceStandard;
use crate::engine::compliance::ComplianceEngine;
use crate::engine::remote::{
    CachedCheck, NabersRemoteCheck, NccRemoteCheck, RateLimiter, RemoteCheckCache,
    RemoteCheckError, RemoteCheckOptions, RemoteComplianceChecker,
};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

// ==========================================
// 报告存档 Trait（Engine 定义, Repository 实现）
// ==========================================
pub trait ComplianceReportStore: Send + Sync {
    /// 存档合规报告, 返回报告 ID
    fn save_report(
        &self,
        project_id: &str,
        report: &DetailedComplianceReport,
        config_snapshot: Option<&str>,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// 存档上下文
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    pub project_id: String,
    pub region: Option<String>,
    pub config_snapshot: Option<String>,
}

/// 远程调用参数
#[derive(Debug, Clone, Copy)]
pub struct RemoteSettings {
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    pub rate_limit_per_minute: u32,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            cache_max_entries: 256,
            rate_limit_per_minute: 30,
        }
    }
}

// ==========================================
// EnhancedComplianceService
// ==========================================
pub struct EnhancedComplianceService {
    engine: Arc<ComplianceEngine>,
    checker: Arc<dyn RemoteComplianceChecker>,
    store: Option<Arc<dyn ComplianceReportStore>>,
    cache: RemoteCheckCache,
    limiter: RateLimiter,
}

impl EnhancedComplianceService {
    pub fn new(
        engine: Arc<ComplianceEngine>,
        checker: Arc<dyn RemoteComplianceChecker>,
        settings: RemoteSettings,
    ) -> Self {
        Self {
            engine,
            checker,
            store: None,
            cache: RemoteCheckCache::new(settings.cache_ttl, settings.cache_max_entries),
            limiter: RateLimiter::per_minute(settings.rate_limit_per_minute),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ComplianceReportStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn engine(&self) -> &ComplianceEngine {
        &self.engine
    }

    /// 综合合规评估（本地 + 远程合并）
    ///
    /// # 参数
    /// - context: 存在时按 project_id 存档; 同时作为远程调用选项
    ///
    /// # 说明
    /// - 远程校验按标准各调用一次, 顺序 await, 不并发
    /// - 本函数不返回错误: 远程与存档失败均降级处理
    pub async fn check(
        &self,
        materials: &[MaterialLineItem],
        energy: &[EnergyLineItem],
        context: Option<&ReportContext>,
    ) -> DetailedComplianceReport {
        let local = self.engine.check_compliance(materials, energy);
        let opts = RemoteCheckOptions {
            project_id: context.map(|c| c.project_id.clone()),
            region: context.and_then(|c| c.region.clone()),
        };

        let mut ncc = local.ncc;
        match self.remote_ncc(materials, &opts).await {
            Ok(remote) => merge_ncc(&mut ncc, &remote),
            Err(e) => {
                tracing::warn!(standard = %ComplianceStandard::Ncc2025, error = %e, "远程合规校验失败, 使用本地结果");
            }
        }

        let mut nabers = local.nabers;
        match self.remote_nabers(energy, &opts).await {
            Ok(remote) => merge_nabers(&mut nabers, &remote),
            Err(e) => {
                tracing::warn!(standard = %ComplianceStandard::Nabers, error = %e, "远程合规校验失败, 使用本地结果");
            }
        }

        let report = DetailedComplianceReport::new(ncc, nabers, local.generated_at);

        if let (Some(store), Some(ctx)) = (&self.store, context) {
            match store.save_report(&ctx.project_id, &report, ctx.config_snapshot.as_deref()) {
                Ok(report_id) => {
                    tracing::info!(project_id = %ctx.project_id, report_id = %report_id, "合规报告已存档");
                }
                Err(e) => {
                    tracing::warn!(project_id = %ctx.project_id, error = %e, "合规报告存档失败");
                }
            }
        }

        report
    }

    async fn remote_ncc(
        &self,
        materials: &[MaterialLineItem],
        opts: &RemoteCheckOptions,
    ) -> Result<NccRemoteCheck, RemoteCheckError> {
        let standard = ComplianceStandard::Ncc2025;
        let key = RemoteCheckCache::key_for(standard, materials, opts);
        if let Some(k) = &key {
            if let Some(CachedCheck::Ncc(hit)) = self.cache.get(k).await {
                tracing::debug!(standard = %standard, "远程校验命中缓存");
                return Ok(hit);
            }
        }

        if !self.limiter.allow(standard.as_str()).await {
            return Err(RemoteCheckError::RateLimited(standard));
        }

        let response = self
            .checker
            .fetch_ncc_compliance_check(materials, opts)
            .await?
            .into_result()?;

        if let Some(k) = key {
            self.cache.insert(k, CachedCheck::Ncc(response.clone())).await;
        }
        Ok(response)
    }

    async fn remote_nabers(
        &self,
        energy: &[EnergyLineItem],
        opts: &RemoteCheckOptions,
    ) -> Result<NabersRemoteCheck, RemoteCheckError> {
        let standard = ComplianceStandard::Nabers;
        let key = RemoteCheckCache::key_for(standard, energy, opts);
        if let Some(k) = &key {
            if let Some(CachedCheck::Nabers(hit)) = self.cache.get(k).await {
                tracing::debug!(standard = %standard, "远程校验命中缓存");
                return Ok(hit);
            }
        }

        if !self.limiter.allow(standard.as_str()).await {
            return Err(RemoteCheckError::RateLimited(standard));
        }

        let response = self
            .checker
            .fetch_nabers_compliance_check(energy, opts)
            .await?
            .into_result()?;

        if let Some(k) = key {
            self.cache.insert(k, CachedCheck::Nabers(response.clone())).await;
        }
        Ok(response)
    }
}

// ==========================================
// 合并规则
// ==========================================

/// NCC: score = max(local, remote); compliant = local && remote
pub fn merge_ncc(local: &mut ComplianceResult, remote: &NccRemoteCheck) {
    local.score = local.score.max(remote.score.min(100));
    local.compliant = local.compliant && remote.compliant;
}

/// NABERS: star = max(local, remote); score = max(local, remote × 20); compliant = local && remote
pub fn merge_nabers(local: &mut NabersResult, remote: &NabersRemoteCheck) {
    let remote_rating = remote.rating.min(5);
    local.star_rating = local.star_rating.max(remote_rating);
    local.result.score = local.result.score.max(remote_rating as u32 * 20);
    local.result.compliant = local.result.compliant && remote.compliant;
}
