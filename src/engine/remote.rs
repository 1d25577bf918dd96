// ==========================================
// 建筑碳排放核算系统 - 远程合规校验接口
// ==========================================
// 职责: 定义托管合规校验函数的调用接口（不包含 HTTP 实现）
// 说明: 远程结果缓存与限流为服务实例持有的显式状态
// ==========================================

use crate::domain::line_item::{EnergyLineItem, MaterialLineItem};
use crate::domain::types::ComplianceStandard;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

// ==========================================
// 错误类型
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteCheckError {
    #[error("远程校验服务返回错误: {0}")]
    Service(String),

    #[error("远程校验调用失败: {0}")]
    Transport(String),

    #[error("远程校验被限流: standard={0}")]
    RateLimited(ComplianceStandard),

    #[error("远程校验响应无效: {0}")]
    InvalidResponse(String),
}

// ==========================================
// 请求/响应
// ==========================================

/// 远程校验选项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCheckOptions {
    pub project_id: Option<String>,
    /// 气候区/州（如 "NSW"）
    pub region: Option<String>,
}

/// NCC 远程校验响应: 得分 + 合规结论, 或 error 字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NccRemoteCheck {
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub compliant: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NccRemoteCheck {
    /// error 字段非空 → Service 错误; 得分越界 → InvalidResponse
    pub fn into_result(self) -> Result<Self, RemoteCheckError> {
        if let Some(error) = self.error {
            return Err(RemoteCheckError::Service(error));
        }
        if self.score > 100 {
            return Err(RemoteCheckError::InvalidResponse(format!(
                "NCC score out of range: {}",
                self.score
            )));
        }
        Ok(self)
    }
}

/// NABERS 远程校验响应: 星级 + 合规结论, 或 error 字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NabersRemoteCheck {
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub compliant: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NabersRemoteCheck {
    pub fn into_result(self) -> Result<Self, RemoteCheckError> {
        if let Some(error) = self.error {
            return Err(RemoteCheckError::Service(error));
        }
        if self.rating > 5 {
            return Err(RemoteCheckError::InvalidResponse(format!(
                "NABERS rating out of range: {}",
                self.rating
            )));
        }
        Ok(self)
    }
}

// ==========================================
// RemoteComplianceChecker Trait
// ==========================================
// 实现者: 托管函数 HTTP 客户端（外部协作方）
// 约定: 每个标准调用一次, 不重试（重试属于底层客户端）
#[async_trait]
pub trait RemoteComplianceChecker: Send + Sync {
    async fn fetch_ncc_compliance_check(
        &self,
        materials: &[MaterialLineItem],
        opts: &RemoteCheckOptions,
    ) -> Result<NccRemoteCheck, RemoteCheckError>;

    async fn fetch_nabers_compliance_check(
        &self,
        energy: &[EnergyLineItem],
        opts: &RemoteCheckOptions,
    ) -> Result<NabersRemoteCheck, RemoteCheckError>;
}

/// 离线校验器: 未配置远程服务时使用, 始终返回 Transport 错误（本地结果兜底）
pub struct OfflineComplianceChecker;

#[async_trait]
impl RemoteComplianceChecker for OfflineComplianceChecker {
    async fn fetch_ncc_compliance_check(
        &self,
        _materials: &[MaterialLineItem],
        _opts: &RemoteCheckOptions,
    ) -> Result<NccRemoteCheck, RemoteCheckError> {
        Err(RemoteCheckError::Transport("remote compliance checks disabled".to_string()))
    }

    async fn fetch_nabers_compliance_check(
        &self,
        _energy: &[EnergyLineItem],
        _opts: &RemoteCheckOptions,
    ) -> Result<NabersRemoteCheck, RemoteCheckError> {
        Err(RemoteCheckError::Transport("remote compliance checks disabled".to_string()))
    }
}

// ==========================================
// RemoteCheckCache - 远程结果缓存（TTL）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CachedCheck {
    Ncc(NccRemoteCheck),
    Nabers(NabersRemoteCheck),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedCheck,
    created_at: Instant,
}

pub struct RemoteCheckCache {
    ttl: Duration,
    max_entries: usize,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl RemoteCheckCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// 缓存键: 标准 + 输入明细 JSON（序列化失败则不缓存）
    pub fn key_for<T: Serialize>(standard: ComplianceStandard, items: &[T], opts: &RemoteCheckOptions) -> Option<String> {
        let items_json = serde_json::to_string(items).ok()?;
        let opts_json = serde_json::to_string(opts).ok()?;
        Some(format!("{}|{}|{}", standard.as_str(), opts_json, items_json))
    }

    pub async fn get(&self, key: &str) -> Option<CachedCheck> {
        if self.ttl.is_zero() {
            return None;
        }
        let mut entries = self.entries.lock().await;
        entries.retain(|_, v| v.created_at.elapsed() <= self.ttl);
        entries.get(key).map(|e| e.value.clone())
    }

    pub async fn insert(&self, key: String, value: CachedCheck) {
        if self.ttl.is_zero() || self.max_entries == 0 {
            return;
        }
        let mut entries = self.entries.lock().await;
        entries.retain(|_, v| v.created_at.elapsed() <= self.ttl);
        if entries.len() >= self.max_entries {
            if let Some(victim) = entries
                .iter()
                .min_by_key(|(_, v)| v.created_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&victim);
            }
        }
        entries.insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

// ==========================================
// RateLimiter - 令牌桶限流（按键）
// ==========================================
#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

pub struct RateLimiter {
    capacity: f64,
    refill_per_sec: f64,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    /// 每分钟 per_minute 次; 0 表示不限流
    pub fn per_minute(per_minute: u32) -> Self {
        Self {
            capacity: per_minute as f64,
            refill_per_sec: per_minute as f64 / 60.0,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub async fn allow(&self, key: &str) -> bool {
        if self.capacity <= 0.0 {
            return true;
        }
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;
        let bucket = buckets.entry(key.to_string()).or_insert_with(|| Bucket {
            tokens: self.capacity,
            last_refill: now,
        });
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.last_refill = now;
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}
