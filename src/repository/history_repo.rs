// ==========================================
// 建筑碳排放核算系统 - 核算历史数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 并发: 后写覆盖, 不做版本校验
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::calculation::CalculationResult;
use crate::domain::history::CalculationRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{format_datetime, now_naive, parse_datetime};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// CalculationHistoryRepository - 核算历史仓储
// ==========================================
/// 职责: 管理 calculation_history 表
/// 存储: 核算结果整体以 JSON 保存, total_emissions 冗余一列便于排序与汇总
pub struct CalculationHistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

const SELECT_COLUMNS: &str = "record_id, project_id, user_id, result_json, created_at";

fn map_record(row: &Row<'_>) -> rusqlite::Result<(String, String, String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn into_record(raw: (String, String, String, String, String)) -> RepositoryResult<CalculationRecord> {
    let (record_id, project_id, user_id, result_json, created_at) = raw;
    let result: CalculationResult = serde_json::from_str(&result_json)?;
    Ok(CalculationRecord {
        record_id,
        project_id,
        user_id,
        result,
        created_at: parse_datetime(&created_at),
    })
}

impl CalculationHistoryRepository {
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

    /// 保存一次核算结果
    ///
    /// # 返回
    /// - Ok(CalculationRecord): 含新生成的 record_id 与 created_at
    pub fn insert(
        &self,
        project_id: &str,
        user_id: &str,
        result: &CalculationResult,
    ) -> RepositoryResult<CalculationRecord> {
        let record = CalculationRecord {
            record_id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            user_id: user_id.to_string(),
            result: result.clone(),
            created_at: now_naive(),
        };
        let result_json = serde_json::to_string(&record.result)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO calculation_history (
                record_id, project_id, user_id, total_emissions, result_json, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.record_id,
                record.project_id,
                record.user_id,
                record.result.total_emissions,
                result_json,
                format_datetime(&record.created_at),
            ],
        )?;

        tracing::debug!(record_id = %record.record_id, project_id, "核算历史已保存");
        Ok(record)
    }

    pub fn find_by_id(&self, record_id: &str) -> RepositoryResult<Option<CalculationRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM calculation_history WHERE record_id = ?1",
            SELECT_COLUMNS
        );
        let raw = match conn.query_row(&sql, params![record_id], map_record) {
            Ok(raw) => raw,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        into_record(raw).map(Some)
    }

    /// 按项目查询（最新在前）
    pub fn list_by_project(&self, project_id: &str) -> RepositoryResult<Vec<CalculationRecord>> {
        self.query_list(
            &format!(
                "SELECT {} FROM calculation_history WHERE project_id = ?1 \
                 ORDER BY created_at DESC, rowid DESC",
                SELECT_COLUMNS
            ),
            project_id,
        )
    }

    /// 按用户查询（最新在前）
    pub fn list_by_user(&self, user_id: &str) -> RepositoryResult<Vec<CalculationRecord>> {
        self.query_list(
            &format!(
                "SELECT {} FROM calculation_history WHERE user_id = ?1 \
                 ORDER BY created_at DESC, rowid DESC",
                SELECT_COLUMNS
            ),
            user_id,
        )
    }

    pub fn latest_for_project(&self, project_id: &str) -> RepositoryResult<Option<CalculationRecord>> {
        Ok(self.list_by_project(project_id)?.into_iter().next())
    }

    /// 删除记录, 返回是否存在
    pub fn delete(&self, record_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM calculation_history WHERE record_id = ?1",
            params![record_id],
        )?;
        Ok(affected > 0)
    }

    fn query_list(&self, sql: &str, key: &str) -> RepositoryResult<Vec<CalculationRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let raws = stmt
            .query_map(params![key], map_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(into_record).collect()
    }
}
