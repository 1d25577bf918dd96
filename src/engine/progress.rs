// ==========================================
// 建筑碳排放核算系统 - 减排进度计算
// ==========================================
// 职责: 目标进度、历史汇总（纯计算, 不访问数据库）
// ==========================================

use crate::domain::history::{CalculationRecord, GoalProgress, HistorySummary, UserGoal};

pub struct ProgressCalculator;

impl ProgressCalculator {
    /// 计算减排目标进度
    ///
    /// - target = baseline × (1 - target_reduction_pct / 100)
    /// - reduction_achieved_pct = (baseline - current) / baseline × 100, 基线为 0 时为 0
    /// - progress_pct = reduction_achieved_pct / target_reduction_pct × 100, 限定 [0, 100]
    /// - on_track: 当前排放不高于目标排放
    pub fn goal_progress(goal: &UserGoal, current_total: f64) -> GoalProgress {
        let baseline = goal.baseline_emissions;
        let target_pct = goal.target_reduction_pct.clamp(0.0, 100.0);
        let target_emissions = baseline * (1.0 - target_pct / 100.0);

        let reduction_achieved_pct = if baseline > 0.0 {
            (baseline - current_total) / baseline * 100.0
        } else {
            0.0
        };

        let progress_pct = if target_pct > 0.0 {
            (reduction_achieved_pct / target_pct * 100.0).clamp(0.0, 100.0)
        } else {
            100.0
        };

        GoalProgress {
            current_emissions: current_total,
            target_emissions,
            reduction_achieved_pct,
            progress_pct,
            on_track: current_total <= target_emissions,
        }
    }

    /// 汇总历史核算记录（按 created_at 稳定排序, 同一时刻保持输入顺序）
    pub fn summarize_history(records: &[CalculationRecord]) -> HistorySummary {
        if records.is_empty() {
            return HistorySummary::default();
        }

        let mut ordered: Vec<&CalculationRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.created_at);

        let totals: Vec<f64> = ordered.iter().map(|r| r.total_emissions()).collect();
        let count = totals.len();
        let sum: f64 = totals.iter().sum();
        let min_total = totals.iter().copied().fold(f64::INFINITY, f64::min);
        let max_total = totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let first = totals[0];
        let latest = totals[count - 1];
        let trend_pct = if count >= 2 && first != 0.0 {
            Some((latest - first) / first * 100.0)
        } else {
            None
        };

        HistorySummary {
            count,
            average_total: sum / count as f64,
            min_total,
            max_total,
            latest_total: Some(latest),
            trend_pct,
        }
    }
}
