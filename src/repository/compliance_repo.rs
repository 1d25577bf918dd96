// ==========================================
// 建筑碳排放核算系统 - 合规报告与告警数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 告警: 报告中每条 critical 违规在同一事务内生成一条未关闭告警
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::compliance::DetailedComplianceReport;
use crate::domain::history::{ComplianceAlert, StoredComplianceReport};
use crate::domain::types::{ComplianceStandard, Severity};
use crate::engine::enhanced::ComplianceReportStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{format_datetime, now_naive, parse_datetime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct ComplianceReportRepository {
    conn: Arc<Mutex<Connection>>,
}

type RawReport = (String, String, String, Option<String>, String);

fn map_report(row: &Row<'_>) -> rusqlite::Result<RawReport> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn into_report(raw: RawReport) -> RepositoryResult<StoredComplianceReport> {
    let (report_id, project_id, report_json, config_snapshot, created_at) = raw;
    Ok(StoredComplianceReport {
        report_id,
        project_id,
        report: serde_json::from_str(&report_json)?,
        config_snapshot,
        created_at: parse_datetime(&created_at),
    })
}

/// 枚举列无法识别时按列转换失败处理
fn invalid_enum_column(idx: usize, column: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        format!("{} 列取值无法识别: {}", column, value).into(),
    )
}

fn map_alert(row: &Row<'_>) -> rusqlite::Result<ComplianceAlert> {
    let standard_raw: String = row.get(2)?;
    let severity_raw: String = row.get(4)?;
    let created_at: String = row.get(7)?;
    let resolved_at: Option<String> = row.get(8)?;
    let standard = ComplianceStandard::parse(&standard_raw)
        .ok_or_else(|| invalid_enum_column(2, "standard", &standard_raw))?;
    let severity = Severity::parse(&severity_raw)
        .ok_or_else(|| invalid_enum_column(4, "severity", &severity_raw))?;
    Ok(ComplianceAlert {
        alert_id: row.get(0)?,
        project_id: row.get(1)?,
        standard,
        rule_id: row.get(3)?,
        severity,
        message: row.get(5)?,
        resolved: row.get::<_, i64>(6)? != 0,
        created_at: parse_datetime(&created_at),
        resolved_at: resolved_at.as_deref().map(parse_datetime),
    })
}

const ALERT_COLUMNS: &str =
    "alert_id, project_id, standard, rule_id, severity, message, resolved, created_at, resolved_at";

impl ComplianceReportRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 报告
    // ==========================================

    /// 存档报告并生成 critical 告警（单事务）
    ///
    /// # 返回
    /// - Ok(String): report_id
    pub fn insert_report(
        &self,
        project_id: &str,
        report: &DetailedComplianceReport,
        config_snapshot: Option<&str>,
    ) -> RepositoryResult<String> {
        if project_id.trim().is_empty() {
            return Err(RepositoryError::ValidationError(
                "project_id 不能为空".to_string(),
            ));
        }

        let report_id = Uuid::new_v4().to_string();
        let report_json = serde_json::to_string(report)?;
        let now = format_datetime(&now_naive());

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO compliance_report (
                report_id, project_id, overall_score, overall_compliant,
                report_json, config_snapshot, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                report_id,
                project_id,
                report.overall.score,
                report.overall.compliant as i64,
                report_json,
                config_snapshot,
                now,
            ],
        )?;

        let mut alerts = 0;
        for (standard, violation) in report.all_violations() {
            if violation.severity != Severity::Critical {
                continue;
            }
            tx.execute(
                r#"
                INSERT INTO compliance_alert (
                    alert_id, project_id, report_id, standard, rule_id,
                    severity, message, resolved, created_at, resolved_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, NULL)
                "#,
                params![
                    Uuid::new_v4().to_string(),
                    project_id,
                    report_id,
                    standard.as_str(),
                    violation.rule_id,
                    violation.severity.to_string(),
                    violation.message,
                    now,
                ],
            )?;
            alerts += 1;
        }

        tx.commit()?;
        tracing::debug!(report_id = %report_id, project_id, alerts, "合规报告已写入");
        Ok(report_id)
    }

    pub fn find_report(&self, report_id: &str) -> RepositoryResult<Option<StoredComplianceReport>> {
        let conn = self.get_conn()?;
        let raw = conn
            .query_row(
                r#"
                SELECT report_id, project_id, report_json, config_snapshot, created_at
                FROM compliance_report WHERE report_id = ?1
                "#,
                params![report_id],
                map_report,
            )
            .optional()?;
        raw.map(into_report).transpose()
    }

    /// 按项目查询（最新在前）
    pub fn list_reports_by_project(&self, project_id: &str) -> RepositoryResult<Vec<StoredComplianceReport>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT report_id, project_id, report_json, config_snapshot, created_at
            FROM compliance_report
            WHERE project_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;
        let raws = stmt
            .query_map(params![project_id], map_report)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(into_report).collect()
    }

    pub fn latest_report(&self, project_id: &str) -> RepositoryResult<Option<StoredComplianceReport>> {
        Ok(self.list_reports_by_project(project_id)?.into_iter().next())
    }

    // ==========================================
    // 告警
    // ==========================================

    /// 未关闭告警（最新报告在前）
    pub fn list_open_alerts(&self, project_id: &str) -> RepositoryResult<Vec<ComplianceAlert>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM compliance_alert WHERE project_id = ?1 AND resolved = 0 \
             ORDER BY created_at DESC, rowid ASC",
            ALERT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let alerts = stmt
            .query_map(params![project_id], map_alert)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(alerts)
    }

    /// 关闭告警
    ///
    /// # 返回
    /// - Ok(true): 本次关闭
    /// - Ok(false): 已关闭
    /// - Err(NotFound): 告警不存在
    pub fn resolve_alert(&self, alert_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let resolved: Option<i64> = conn
            .query_row(
                "SELECT resolved FROM compliance_alert WHERE alert_id = ?1",
                params![alert_id],
                |row| row.get(0),
            )
            .optional()?;

        match resolved {
            None => Err(RepositoryError::NotFound {
                entity: "ComplianceAlert".to_string(),
                id: alert_id.to_string(),
            }),
            Some(1) => Ok(false),
            Some(_) => {
                conn.execute(
                    "UPDATE compliance_alert SET resolved = 1, resolved_at = ?2 WHERE alert_id = ?1",
                    params![alert_id, format_datetime(&now_naive())],
                )?;
                Ok(true)
            }
        }
    }
}

// ==========================================
// ComplianceReportStore 实现（供增强合规服务存档）
// ==========================================
impl ComplianceReportStore for ComplianceReportRepository {
    fn save_report(
        &self,
        project_id: &str,
        report: &DetailedComplianceReport,
        config_snapshot: Option<&str>,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        Ok(self.insert_report(project_id, report, config_snapshot)?)
    }
}
