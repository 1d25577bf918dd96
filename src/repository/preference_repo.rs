// ==========================================
// 建筑碳排放核算系统 - 用户目标/偏好/收藏数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 表: user_goal / user_preference / material_favorite
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::history::{MaterialFavorite, UserGoal};
use crate::domain::types::EmissionCategory;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{format_datetime, now_naive, parse_datetime};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct UserPreferenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserPreferenceRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 减排目标
    // ==========================================

    /// 保存目标（按 user_id + project_id 覆盖）
    pub fn upsert_goal(&self, goal: &UserGoal) -> RepositoryResult<()> {
        if goal.baseline_emissions < 0.0 || !goal.baseline_emissions.is_finite() {
            return Err(RepositoryError::ValidationError(format!(
                "baseline_emissions 非法: {}",
                goal.baseline_emissions
            )));
        }
        if !(0.0..=100.0).contains(&goal.target_reduction_pct) {
            return Err(RepositoryError::ValidationError(format!(
                "target_reduction_pct 须在 [0, 100]: {}",
                goal.target_reduction_pct
            )));
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO user_goal (
                user_id, project_id, baseline_emissions, target_reduction_pct,
                target_date, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                goal.user_id,
                goal.project_id,
                goal.baseline_emissions,
                goal.target_reduction_pct,
                goal.target_date.map(|d| d.to_string()),
                format_datetime(&now_naive()),
            ],
        )?;
        Ok(())
    }

    pub fn get_goal(&self, user_id: &str, project_id: &str) -> RepositoryResult<Option<UserGoal>> {
        let conn = self.get_conn()?;
        let goal = conn
            .query_row(
                r#"
                SELECT user_id, project_id, baseline_emissions, target_reduction_pct, target_date
                FROM user_goal
                WHERE user_id = ?1 AND project_id = ?2
                "#,
                params![user_id, project_id],
                |row| {
                    let target_date: Option<String> = row.get(4)?;
                    Ok(UserGoal {
                        user_id: row.get(0)?,
                        project_id: row.get(1)?,
                        baseline_emissions: row.get(2)?,
                        target_reduction_pct: row.get(3)?,
                        target_date: target_date
                            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
                    })
                },
            )
            .optional()?;
        Ok(goal)
    }

    // ==========================================
    // 偏好（键值）
    // ==========================================

    pub fn set_preference(&self, user_id: &str, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO user_preference (user_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, key) DO UPDATE SET value = ?3, updated_at = ?4
            "#,
            params![user_id, key, value, format_datetime(&now_naive())],
        )?;
        Ok(())
    }

    pub fn get_preference(&self, user_id: &str, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM user_preference WHERE user_id = ?1 AND key = ?2",
                params![user_id, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    // ==========================================
    // 常用建材收藏
    // ==========================================

    /// 添加收藏（重复添加无副作用）
    ///
    /// # 返回
    /// - Ok(true): 新增
    /// - Ok(false): 已存在
    pub fn add_favorite(
        &self,
        user_id: &str,
        category: EmissionCategory,
        item_type: &str,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            INSERT OR IGNORE INTO material_favorite (user_id, category, item_type, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                user_id,
                category.as_str(),
                item_type,
                format_datetime(&now_naive())
            ],
        )?;
        Ok(affected > 0)
    }

    pub fn remove_favorite(
        &self,
        user_id: &str,
        category: EmissionCategory,
        item_type: &str,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM material_favorite WHERE user_id = ?1 AND category = ?2 AND item_type = ?3",
            params![user_id, category.as_str(), item_type],
        )?;
        Ok(affected > 0)
    }

    pub fn list_favorites(&self, user_id: &str) -> RepositoryResult<Vec<MaterialFavorite>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT user_id, category, item_type, created_at
            FROM material_favorite
            WHERE user_id = ?1
            ORDER BY category ASC, item_type ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut favorites = Vec::with_capacity(rows.len());
        for (user_id, category, item_type, created_at) in rows {
            let category = EmissionCategory::parse(&category).ok_or_else(|| {
                RepositoryError::ValidationError(format!("未知类别: {}", category))
            })?;
            favorites.push(MaterialFavorite {
                user_id,
                category,
                item_type,
                created_at: parse_datetime(&created_at),
            });
        }
        Ok(favorites)
    }
}
