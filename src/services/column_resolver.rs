//! 列识别服务 - 业务能力层
//!
//! 根据表头关键字识别列角色，适配不同表头写法，例如“技术指标”“设备序列号”“主机名”
//! 都会被识别为技术指标列。

use crate::error::SheetError;
use crate::models::schema::{ColumnRole, ColumnRoleMap, SchemaFamily};
use tracing::debug;

/// 巡检项表的角色关键字表（顺序即优先级）
pub const INSPECTION_KEYWORDS: &[(ColumnRole, &[&str])] = &[
    (
        ColumnRole::Item,
        &["指标", "项目", "检查项", "设备序列号", "序列号", "主机名", "机器序号"],
    ),
    (
        ColumnRole::Description,
        &["说明", "内容", "要求", "描述", "类型", "状态"],
    ),
    (
        ColumnRole::Result,
        &["检查", "检测", "结果", "结论", "运行状态"],
    ),
];

/// 设备统计表的角色关键字表
pub const INVENTORY_KEYWORDS: &[(ColumnRole, &[&str])] = &[
    (ColumnRole::Center, &["数据中心"]),
    (ColumnRole::DeviceType, &["设备类型"]),
    (ColumnRole::DeviceModel, &["设备型号"]),
];

/// 巡检项表中必须识别出的角色
const REQUIRED_INSPECTION_ROLES: &[ColumnRole] = &[ColumnRole::Item, ColumnRole::Result];

/// 列识别服务
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnResolver;

impl ColumnResolver {
    pub fn new() -> Self {
        Self
    }

    /// 识别一张表的列角色
    ///
    /// # 参数
    /// - `sheet`: 表名（仅用于错误信息）
    /// - `headers`: 已清洗的表头
    /// - `family`: 表结构类型
    ///
    /// # 返回
    /// 巡检项表缺少技术指标或检查结果列时返回 `SheetError::MissingColumn`
    pub fn resolve(
        &self,
        sheet: &str,
        headers: &[String],
        family: SchemaFamily,
    ) -> Result<ColumnRoleMap, SheetError> {
        match family {
            SchemaFamily::FamilyA => {
                let map = bind_by_keywords(headers, INSPECTION_KEYWORDS);
                if REQUIRED_INSPECTION_ROLES.iter().any(|r| !map.is_bound(*r)) {
                    return Err(SheetError::missing_column(sheet, headers));
                }
                debug!("[{}] 列映射: {}", sheet, map);
                Ok(map)
            }
            SchemaFamily::FamilyB => {
                let map = bind_by_keywords(headers, INVENTORY_KEYWORDS);
                debug!("[{}] 列映射: {}", sheet, map);
                Ok(map)
            }
        }
    }
}

/// 按列顺序遍历一次表头，每个表头最多绑定一个角色，已绑定的角色不再改变。
///
/// 同一表头命中多个未绑定角色时，取命中关键字最长的角色；长度相同时按关键字表顺序。
fn bind_by_keywords(headers: &[String], table: &[(ColumnRole, &[&str])]) -> ColumnRoleMap {
    let mut map = ColumnRoleMap::new();

    for header in headers {
        let mut best: Option<(ColumnRole, usize)> = None;

        for (role, keywords) in table {
            if map.is_bound(*role) {
                continue;
            }
            let longest = keywords
                .iter()
                .filter(|k| header.contains(*k))
                .map(|k| k.chars().count())
                .max();
            if let Some(len) = longest {
                if best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((*role, len));
                }
            }
        }

        if let Some((role, _)) = best {
            map.bind(role, header.clone());
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_standard_inspection_headers() {
        let map = ColumnResolver::new()
            .resolve(
                "表1",
                &headers(&["序号", "技术指标", "说明", "检查结果"]),
                SchemaFamily::FamilyA,
            )
            .unwrap();
        assert_eq!(map.get(ColumnRole::Item), Some("技术指标"));
        assert_eq!(map.get(ColumnRole::Description), Some("说明"));
        assert_eq!(map.get(ColumnRole::Result), Some("检查结果"));
    }

    #[test]
    fn test_description_is_optional() {
        let map = ColumnResolver::new()
            .resolve(
                "表5",
                &headers(&["设备序列号", "运行状态"]),
                SchemaFamily::FamilyA,
            )
            .unwrap();
        assert_eq!(map.get(ColumnRole::Item), Some("设备序列号"));
        assert_eq!(map.get(ColumnRole::Result), Some("运行状态"));
        assert_eq!(map.get(ColumnRole::Description), None);
    }

    #[test]
    fn test_first_match_wins() {
        let map = ColumnResolver::new()
            .resolve(
                "表2",
                &headers(&["检查项", "检查内容", "检查结果", "复核结论"]),
                SchemaFamily::FamilyA,
            )
            .unwrap();
        assert_eq!(map.get(ColumnRole::Item), Some("检查项"));
        assert_eq!(map.get(ColumnRole::Description), Some("检查内容"));
        assert_eq!(map.get(ColumnRole::Result), Some("检查结果"));
    }

    #[test]
    fn test_missing_result_column() {
        let err = ColumnResolver::new()
            .resolve("表3", &headers(&["主机名", "备注"]), SchemaFamily::FamilyA)
            .unwrap_err();
        match err {
            SheetError::MissingColumn { sheet, headers } => {
                assert_eq!(sheet, "表3");
                assert_eq!(headers, vec!["主机名", "备注"]);
            }
            other => panic!("意外的错误: {}", other),
        }
    }

    #[test]
    fn test_inventory_roles_fall_back_to_defaults() {
        let map = ColumnResolver::new()
            .resolve(
                "表6",
                &headers(&["所属数据中心", "设备型号"]),
                SchemaFamily::FamilyB,
            )
            .unwrap();
        assert_eq!(map.column_or_default(ColumnRole::Center), "所属数据中心");
        assert_eq!(map.column_or_default(ColumnRole::DeviceModel), "设备型号");
        assert_eq!(map.get(ColumnRole::DeviceType), None);
        assert_eq!(map.column_or_default(ColumnRole::DeviceType), "设备类型");
    }
}
