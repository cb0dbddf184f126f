//! 统计服务 - 业务能力层
//!
//! - 巡检项表：总数、正常数、异常数、正常率、异常率、异常明细
//! - 设备统计表：按数据中心、设备类型、设备型号三个维度汇总

use crate::error::SheetError;
use crate::models::metrics::{
    AbnormalRecord, CenterStat, ClassifiedRow, DetailColumns, ModelStat, RollupTables, RowStatus, SheetMetrics,
    TypeStat,
};
use crate::models::schema::{ColumnRole, ColumnRoleMap};
use crate::models::sheet::{cell, Sheet};
use crate::services::classifier::Classifier;
use std::collections::BTreeMap;

/// 百分比，保留两位小数；总数为 0 时为 0
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = part as f64 / total as f64 * 100.0;
    // 按十进制精确值舍入，恰好落在中点时取偶数（3.125 → 3.12）
    format!("{:.2}", rate).parse().unwrap_or(rate)
}

/// 统计服务
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// 按检查结果列判定每一行
    pub fn classify_rows<'a>(
        &self,
        sheet: &'a Sheet,
        columns: &ColumnRoleMap,
        classifier: &Classifier,
    ) -> Vec<ClassifiedRow<'a>> {
        let result_column = columns.column_or_default(ColumnRole::Result);
        sheet
            .rows()
            .iter()
            .map(|row| ClassifiedRow {
                row,
                status: classifier.classify(cell(row, result_column)),
            })
            .collect()
    }

    /// 巡检项表统计
    pub fn inspection(&self, rows: &[ClassifiedRow<'_>], columns: &ColumnRoleMap) -> SheetMetrics {
        let item_column = columns.column_or_default(ColumnRole::Item);
        let result_column = columns.column_or_default(ColumnRole::Result);
        let description_column = columns.get(ColumnRole::Description);

        let total = rows.len();
        let count = |status: RowStatus| rows.iter().filter(|r| r.status == status).count();
        let normal_count = count(RowStatus::Normal);
        let abnormal_count = count(RowStatus::Abnormal);
        let unclassified_count = count(RowStatus::Unclassified);

        let check_items = rows
            .iter()
            .map(|r| cell(r.row, item_column))
            .collect::<Vec<_>>()
            .join("、");

        let abnormal_records = rows
            .iter()
            .filter(|r| r.status == RowStatus::Abnormal)
            .enumerate()
            .map(|(i, r)| AbnormalRecord {
                seq: i + 1,
                item: cell(r.row, item_column).trim().to_string(),
                description: description_column.map(|c| cell(r.row, c).trim().to_string()),
                result: cell(r.row, result_column).trim().to_string(),
            })
            .collect();

        SheetMetrics {
            total,
            detail_columns: DetailColumns {
                item: item_column.to_string(),
                description: description_column.map(str::to_string),
                result: result_column.to_string(),
            },
            check_items,
            normal_count,
            abnormal_count,
            unclassified_count,
            normal_rate: percentage(normal_count, total),
            abnormal_rate: percentage(abnormal_count, total),
            abnormal_records,
        }
    }

    /// 设备统计表汇总
    ///
    /// 分组按单元格文本精确匹配，分组列为空的行不参与该维度统计。
    /// 分组列在表中不存在时返回 `SheetError::MissingGroupColumn`。
    pub fn inventory(
        &self,
        sheet: &Sheet,
        columns: &ColumnRoleMap,
    ) -> Result<RollupTables, SheetError> {
        let center_column = group_column(sheet, columns, ColumnRole::Center)?;
        let type_column = group_column(sheet, columns, ColumnRole::DeviceType)?;
        let model_column = group_column(sheet, columns, ColumnRole::DeviceModel)?;

        let mut centers: BTreeMap<&str, usize> = BTreeMap::new();
        let mut types: BTreeMap<&str, usize> = BTreeMap::new();
        let mut models: BTreeMap<(&str, &str), usize> = BTreeMap::new();

        for row in sheet.rows() {
            let center = cell(row, center_column);
            let device_type = cell(row, type_column);
            let device_model = cell(row, model_column);

            if !center.trim().is_empty() {
                *centers.entry(center).or_default() += 1;
            }
            if !device_type.trim().is_empty() {
                *types.entry(device_type).or_default() += 1;
            }
            if !device_model.trim().is_empty() && !device_type.trim().is_empty() {
                *models.entry((device_model, device_type)).or_default() += 1;
            }
        }

        // BTreeMap 已按键升序，稳定排序后同数量的键保持升序
        let mut centers: Vec<CenterStat> = centers
            .into_iter()
            .map(|(k, v)| CenterStat {
                center: k.to_string(),
                device_count: v,
            })
            .collect();
        centers.sort_by(|a, b| b.device_count.cmp(&a.device_count));

        let mut types: Vec<TypeStat> = types
            .into_iter()
            .map(|(k, v)| TypeStat {
                device_type: k.to_string(),
                device_count: v,
            })
            .collect();
        types.sort_by(|a, b| b.device_count.cmp(&a.device_count));

        let mut models: Vec<ModelStat> = models
            .into_iter()
            .map(|((model, device_type), v)| ModelStat {
                device_model: model.to_string(),
                device_type: device_type.to_string(),
                count: v,
            })
            .collect();
        models.sort_by(|a, b| {
            a.device_type
                .cmp(&b.device_type)
                .then_with(|| b.count.cmp(&a.count))
        });

        Ok(RollupTables {
            centers,
            types,
            models,
        })
    }
}

fn group_column<'a>(
    sheet: &Sheet,
    columns: &'a ColumnRoleMap,
    role: ColumnRole,
) -> Result<&'a str, SheetError> {
    let column = columns.column_or_default(role);
    if sheet.has_column(column) {
        Ok(column)
    } else {
        Err(SheetError::MissingGroupColumn {
            sheet: sheet.name().to_string(),
            column: column.to_string(),
            headers: sheet.headers().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::SchemaFamily;
    use crate::services::column_resolver::ColumnResolver;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn inspection_sheet(results: &[&str]) -> Sheet {
        let rows = results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let item = format!("指标{}", i + 1);
                strings(&[item.as_str(), "说明", *r])
            })
            .collect();
        Sheet::new("表1", 0, &strings(&["技术指标", "说明", "检查结果"]), rows)
    }

    fn metrics_for(sheet: &Sheet) -> SheetMetrics {
        let columns = ColumnResolver::new()
            .resolve(sheet.name(), sheet.headers(), SchemaFamily::FamilyA)
            .unwrap();
        let classifier = Classifier::standard().unwrap();
        let aggregator = Aggregator::new();
        let rows = aggregator.classify_rows(sheet, &columns, &classifier);
        aggregator.inspection(&rows, &columns)
    }

    #[test]
    fn test_rates_with_unclassified_row() {
        let mut results = vec!["正常"; 7];
        results.extend(["异常", "失败", "待观察"]);
        let metrics = metrics_for(&inspection_sheet(&results));

        assert_eq!(metrics.total, 10);
        assert_eq!(metrics.normal_count, 7);
        assert_eq!(metrics.abnormal_count, 2);
        assert_eq!(metrics.unclassified_count, 1);
        assert_eq!(metrics.normal_rate, 70.0);
        assert_eq!(metrics.abnormal_rate, 20.0);
    }

    #[test]
    fn test_abnormal_detail_keeps_row_order_and_starts_at_one() {
        let metrics = metrics_for(&inspection_sheet(&["正常", "正常", "正常", "错误", "正常", "告警"]));
        assert_eq!(metrics.abnormal_records[0].seq, 1);
        assert_eq!(metrics.abnormal_records[0].item, "指标4");
        assert_eq!(
            metrics.abnormal_detail(),
            "1. 指标4（错误）；2. 指标6（告警）"
        );
    }

    #[test]
    fn test_rates_are_rounded() {
        let metrics = metrics_for(&inspection_sheet(&["正常", "正常", "异常"]));
        assert_eq!(metrics.normal_rate, 66.67);
        assert_eq!(metrics.abnormal_rate, 33.33);
        assert_eq!(metrics.check_items, "指标1、指标2、指标3");
    }

    #[test]
    fn test_half_way_rates_round_to_even() {
        assert_eq!(percentage(1, 32), 3.12);
        assert_eq!(percentage(1, 160), 0.62);
        assert_eq!(percentage(1, 800), 0.12);
        assert_eq!(percentage(2, 3), 66.67);
    }

    #[test]
    fn test_empty_sheet_has_zero_rates() {
        let metrics = metrics_for(&inspection_sheet(&[]));
        assert_eq!(metrics.total, 0);
        assert_eq!(metrics.normal_rate, 0.0);
        assert!(metrics.abnormal_records.is_empty());
    }

    fn inventory_sheet(rows: &[[&str; 3]]) -> Sheet {
        Sheet::new(
            "表6",
            5,
            &strings(&["数据中心", "设备类型", "设备型号"]),
            rows.iter().map(|r| strings(r)).collect(),
        )
    }

    #[test]
    fn test_inventory_rollups() {
        let sheet = inventory_sheet(&[
            ["centerA", "typeX", "M1"],
            ["centerA", "typeY", "M2"],
            ["centerB", "typeX", "M1"],
        ]);
        let tables = Aggregator::new()
            .inventory(&sheet, &ColumnRoleMap::new())
            .unwrap();

        assert_eq!(
            tables.centers,
            vec![
                CenterStat { center: "centerA".into(), device_count: 2 },
                CenterStat { center: "centerB".into(), device_count: 1 },
            ]
        );
        assert_eq!(
            tables.types,
            vec![
                TypeStat { device_type: "typeX".into(), device_count: 2 },
                TypeStat { device_type: "typeY".into(), device_count: 1 },
            ]
        );
        assert_eq!(
            tables.models,
            vec![
                ModelStat { device_model: "M1".into(), device_type: "typeX".into(), count: 2 },
                ModelStat { device_model: "M2".into(), device_type: "typeY".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_model_rollup_sorted_by_type_then_count() {
        let sheet = inventory_sheet(&[
            ["A", "服务器", "R730"],
            ["A", "交换机", "S5700"],
            ["B", "服务器", "R740"],
            ["B", "服务器", "R740"],
            ["B", "交换机", "S6800"],
            ["C", "交换机", "S6800"],
        ]);
        let tables = Aggregator::new()
            .inventory(&sheet, &ColumnRoleMap::new())
            .unwrap();
        let order: Vec<(&str, usize)> = tables
            .models
            .iter()
            .map(|m| (m.device_model.as_str(), m.count))
            .collect();
        // 交换机 < 服务器（按字符串升序）
        assert_eq!(
            order,
            vec![("S6800", 2), ("S5700", 1), ("R740", 2), ("R730", 1)]
        );
    }

    #[test]
    fn test_missing_group_column() {
        let sheet = Sheet::new(
            "表7",
            6,
            &strings(&["机房", "设备类型", "设备型号"]),
            vec![strings(&["A", "服务器", "R730"])],
        );
        let err = Aggregator::new()
            .inventory(&sheet, &ColumnRoleMap::new())
            .unwrap_err();
        assert!(matches!(err, SheetError::MissingGroupColumn { ref column, .. } if column == "数据中心"));
    }
}
