//! 统计文本生成服务 - 业务能力层
//!
//! 把单表统计结果渲染为固定格式的文本块，再按表顺序拼接为汇总结果。

use crate::models::metrics::{RollupTables, SheetMetrics, SheetStatistics};

const CLOSING_RULE: &str = "=============================";

/// 比率文本：至少保留一位小数（70.0、66.67）
pub fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{:.1}", rate)
    } else {
        format!("{}", rate)
    }
}

/// 按列对齐的简单表格，列之间用两个空格分隔
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, value) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(value.chars().count());
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_line(&widths, headers));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(render_line(&widths, &cells));
    }
    lines
}

fn render_line(widths: &[usize], cells: &[&str]) -> String {
    let line = cells
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let width = widths.get(i).copied().unwrap_or(0);
            let pad = width.saturating_sub(c.chars().count());
            format!("{}{}", c, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

/// 统计文本生成服务
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportComposer;

impl ReportComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn compose(&self, sheet_name: &str, statistics: &SheetStatistics) -> String {
        match statistics {
            SheetStatistics::Inspection(metrics) => self.compose_inspection(sheet_name, metrics),
            SheetStatistics::Inventory(tables) => self.compose_inventory(sheet_name, tables),
        }
    }

    /// 巡检项表文本块
    pub fn compose_inspection(&self, sheet_name: &str, metrics: &SheetMetrics) -> String {
        let mut lines = vec![
            format!("====== {} 巡检统计结果 ======", sheet_name),
            format!("总项目数：{}", metrics.total),
            format!("检查项：{}", metrics.check_items),
            format!("正常数：{}", metrics.normal_count),
            format!("异常数：{}", metrics.abnormal_count),
            format!("正常率：{}%", format_rate(metrics.normal_rate)),
            format!("异常率：{}%", format_rate(metrics.abnormal_rate)),
        ];

        if metrics.abnormal_count > 0 {
            lines.push(String::new());
            lines.push("--- 异常项目详细 ---".to_string());

            let columns = &metrics.detail_columns;
            let with_description = columns.description.is_some();
            let mut headers = vec![columns.item.as_str()];
            if let Some(description) = &columns.description {
                headers.push(description.as_str());
            }
            headers.push(columns.result.as_str());
            let rows: Vec<Vec<String>> = metrics
                .abnormal_records
                .iter()
                .map(|r| {
                    let mut row = vec![r.item.clone()];
                    if with_description {
                        row.push(r.description.clone().unwrap_or_default());
                    }
                    row.push(r.result.clone());
                    row
                })
                .collect();
            lines.extend(render_table(&headers, &rows));

            lines.push(String::new());
            lines.push(format!("异常描述汇总：{}", metrics.abnormal_detail()));
        }

        lines.push(CLOSING_RULE.to_string());
        lines.join("\n")
    }

    /// 设备统计表文本块
    pub fn compose_inventory(&self, sheet_name: &str, tables: &RollupTables) -> String {
        let mut lines = vec![format!("====== {} 巡检统计结果 ======", sheet_name)];

        lines.push(String::new());
        lines.push("[Ⅰ] 按数据中心统计：".to_string());
        let center_rows: Vec<Vec<String>> = tables
            .centers
            .iter()
            .map(|c| vec![c.center.clone(), c.device_count.to_string()])
            .collect();
        lines.extend(render_table(&["数据中心", "设备总数"], &center_rows));

        lines.push(String::new());
        lines.push("[Ⅱ] 按设备类型统计（跨数据中心）：".to_string());
        let type_rows: Vec<Vec<String>> = tables
            .types
            .iter()
            .map(|t| vec![t.device_type.clone(), t.device_count.to_string()])
            .collect();
        lines.extend(render_table(&["设备类型", "设备数量"], &type_rows));

        lines.push(String::new());
        lines.push("[Ⅲ] 按设备型号统计（跨数据中心）：".to_string());
        let model_rows: Vec<Vec<String>> = tables
            .models
            .iter()
            .map(|m| {
                vec![
                    m.device_model.clone(),
                    m.device_type.clone(),
                    m.count.to_string(),
                ]
            })
            .collect();
        lines.extend(render_table(&["设备型号", "设备类型", "数量"], &model_rows));

        lines.push(String::new());
        lines.push("📍 各数据中心设备类型分布：".to_string());
        for c in &tables.centers {
            lines.push(format!("  {}：共 {} 台设备", c.center, c.device_count));
        }

        lines.push(String::new());
        lines.push("📍 各设备类型在数据中心的分布：".to_string());
        for t in &tables.types {
            lines.push(format!("  {}：共 {} 台", t.device_type, t.device_count));
        }

        lines.push(String::new());
        lines.push("📍 各型号在不同中心的分布：".to_string());
        for m in &tables.models {
            lines.push(format!(
                "  {}（{}） - 数量：{}",
                m.device_model, m.device_type, m.count
            ));
        }

        lines.push(CLOSING_RULE.to_string());
        lines.join("\n")
    }

    /// 按表顺序拼接所有文本块，块之间空一行
    pub fn join_blocks(&self, blocks: &[String]) -> String {
        blocks
            .iter()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
