// ==========================================
// 建筑碳排放核算系统 - 领域类型定义
// ==========================================
// 依据: GHG Protocol 排放范围划分
// 依据: NCC 2025 / NABERS 评估口径
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 排放类别 (Emission Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmissionCategory {
    Material,  // 建材隐含碳
    Transport, // 运输
    Energy,    // 运行能耗
}

impl EmissionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmissionCategory::Material => "material",
            EmissionCategory::Transport => "transport",
            EmissionCategory::Energy => "energy",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "material" | "materials" => Some(EmissionCategory::Material),
            "transport" => Some(EmissionCategory::Transport),
            "energy" => Some(EmissionCategory::Energy),
            _ => None,
        }
    }
}

impl fmt::Display for EmissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 排放范围 (GHG Scope)
// ==========================================
// Scope1: 直接排放; Scope2: 外购能源; Scope3: 价值链
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EmissionScope {
    #[serde(rename = "scope1")]
    Scope1,
    #[serde(rename = "scope2")]
    Scope2,
    #[serde(rename = "scope3")]
    Scope3,
}

impl fmt::Display for EmissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmissionScope::Scope1 => write!(f, "scope1"),
            EmissionScope::Scope2 => write!(f, "scope2"),
            EmissionScope::Scope3 => write!(f, "scope3"),
        }
    }
}

// ==========================================
// 合规标准 (Compliance Standard)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStandard {
    Ncc2025, // 国家建筑规范 (NCC 2025)
    Nabers,  // 建筑环境评级 (NABERS)
}

impl ComplianceStandard {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStandard::Ncc2025 => "NCC2025",
            ComplianceStandard::Nabers => "NABERS",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "NCC2025" | "NCC" => Some(ComplianceStandard::Ncc2025),
            "NABERS" => Some(ComplianceStandard::Nabers),
            _ => None,
        }
    }
}

impl fmt::Display for ComplianceStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 规则严重度 (Rule Severity)
// ==========================================
// 红线: Critical 失败一票否决 (NCC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl Severity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "warning" => Some(Severity::Warning),
            "info" => Some(Severity::Info),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn test_severity_parse_fallback() {
        assert_eq!(Severity::parse("CRITICAL"), Some(Severity::Critical));
        assert_eq!(Severity::parse(" warning "), Some(Severity::Warning));
        assert_eq!(Severity::parse("unknown"), None);
    }

    #[test]
    fn test_scope_serde_names() {
        let json = serde_json::to_string(&EmissionScope::Scope2).unwrap();
        assert_eq!(json, "\"scope2\"");
    }

    #[test]
    fn test_standard_parse() {
        assert_eq!(ComplianceStandard::parse("ncc2025"), Some(ComplianceStandard::Ncc2025));
        assert_eq!(ComplianceStandard::parse("NABERS"), Some(ComplianceStandard::Nabers));
        assert_eq!(ComplianceStandard::parse("green star"), None);
    }
}
