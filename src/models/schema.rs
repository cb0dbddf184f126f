//! 表结构类型与列角色

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 表结构类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaFamily {
    /// 巡检项表：技术指标 / 说明 / 检查结果
    FamilyA,
    /// 设备清单表：数据中心 / 设备类型 / 设备型号
    FamilyB,
}

impl fmt::Display for SchemaFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaFamily::FamilyA => write!(f, "巡检项表"),
            SchemaFamily::FamilyB => write!(f, "设备统计表"),
        }
    }
}

/// 表位置（从 1 开始）→ 表结构类型 的约定
///
/// 默认约定：第 1、2、3、5 个表为巡检项表，第 6、7 个表为设备统计表。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConvention {
    positions: BTreeMap<usize, SchemaFamily>,
}

impl SchemaConvention {
    /// 由两组位置构建约定，同一位置不能同时属于两种类型
    pub fn new(family_a: &[usize], family_b: &[usize]) -> Result<Self, ConfigError> {
        let mut positions = BTreeMap::new();
        for &p in family_a {
            positions.insert(p, SchemaFamily::FamilyA);
        }
        for &p in family_b {
            if positions.insert(p, SchemaFamily::FamilyB) == Some(SchemaFamily::FamilyA) {
                return Err(ConfigError::ConflictingPosition { position: p });
            }
        }
        Ok(Self { positions })
    }

    /// 查询某个位置的表结构类型
    pub fn family_for(&self, position: usize) -> Option<SchemaFamily> {
        self.positions.get(&position).copied()
    }
}

impl Default for SchemaConvention {
    fn default() -> Self {
        let mut positions = BTreeMap::new();
        for p in [1, 2, 3, 5] {
            positions.insert(p, SchemaFamily::FamilyA);
        }
        for p in [6, 7] {
            positions.insert(p, SchemaFamily::FamilyB);
        }
        Self { positions }
    }
}

/// 列角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// 技术指标
    Item,
    /// 说明
    Description,
    /// 检查结果
    Result,
    /// 数据中心
    Center,
    /// 设备类型
    DeviceType,
    /// 设备型号
    DeviceModel,
}

impl ColumnRole {
    /// 角色的标准名称，设备统计表缺列时也作为默认列名
    pub fn label(self) -> &'static str {
        match self {
            ColumnRole::Item => "技术指标",
            ColumnRole::Description => "说明",
            ColumnRole::Result => "检查结果",
            ColumnRole::Center => "数据中心",
            ColumnRole::DeviceType => "设备类型",
            ColumnRole::DeviceModel => "设备型号",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 列角色映射：角色 → 表中实际的表头
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoleMap {
    columns: BTreeMap<ColumnRole, String>,
}

impl ColumnRoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self, role: ColumnRole) -> bool {
        self.columns.contains_key(&role)
    }

    /// 绑定角色，已绑定的角色不会被覆盖
    pub fn bind(&mut self, role: ColumnRole, header: impl Into<String>) -> bool {
        if self.is_bound(role) {
            return false;
        }
        self.columns.insert(role, header.into());
        true
    }

    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        self.columns.get(&role).map(String::as_str)
    }

    /// 取角色对应的列名，未绑定时退回角色的标准名称
    pub fn column_or_default(&self, role: ColumnRole) -> &str {
        self.get(role).unwrap_or_else(|| role.label())
    }
}

impl fmt::Display for ColumnRoleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .columns
            .iter()
            .map(|(role, header)| format!("{}→{}", role, header))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_convention() {
        let convention = SchemaConvention::default();
        assert_eq!(convention.family_for(1), Some(SchemaFamily::FamilyA));
        assert_eq!(convention.family_for(5), Some(SchemaFamily::FamilyA));
        assert_eq!(convention.family_for(4), None);
        assert_eq!(convention.family_for(7), Some(SchemaFamily::FamilyB));
    }

    #[test]
    fn test_conflicting_convention_is_rejected() {
        assert!(SchemaConvention::new(&[1, 2], &[2, 3]).is_err());
    }

    #[test]
    fn test_role_map_never_rebinds() {
        let mut map = ColumnRoleMap::new();
        assert!(map.bind(ColumnRole::Item, "技术指标"));
        assert!(!map.bind(ColumnRole::Item, "项目"));
        assert_eq!(map.get(ColumnRole::Item), Some("技术指标"));
        assert_eq!(map.column_or_default(ColumnRole::Center), "数据中心");
    }
}
