//! 单表统计流程 - 流程层
//!
//! 核心职责：定义"一张表"的完整统计流程
//!
//! 流程顺序：
//! 1. 识别列角色
//! 2. 巡检项表：逐行判定 → 统计；设备统计表：三维度汇总
//! 3. 生成文本块

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, SheetError};
use crate::models::metrics::SheetStatistics;
use crate::models::schema::{ColumnRoleMap, SchemaFamily};
use crate::models::sheet::Sheet;
use crate::services::{Aggregator, Classifier, ColumnResolver, ReportComposer};
use crate::workflow::sheet_ctx::SheetCtx;

/// 单表统计结果
#[derive(Debug, Clone, Serialize)]
pub struct SheetReport {
    pub sheet_name: String,
    pub position: usize,
    pub family: SchemaFamily,
    pub columns: ColumnRoleMap,
    pub statistics: SheetStatistics,
    /// 该表的文本块
    #[serde(skip)]
    pub text: String,
}

/// 单表统计流程
///
/// - 编排列识别、判定、统计、生成文本
/// - 不读写文件，不持有任何外部资源
/// - 只依赖业务能力（services）
pub struct SheetFlow {
    resolver: ColumnResolver,
    classifier: Classifier,
    aggregator: Aggregator,
    composer: ReportComposer,
}

impl SheetFlow {
    /// 使用默认判定规则创建
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self::with_classifier(Classifier::standard()?))
    }

    pub fn with_classifier(classifier: Classifier) -> Self {
        Self {
            resolver: ColumnResolver::new(),
            classifier,
            aggregator: Aggregator::new(),
            composer: ReportComposer::new(),
        }
    }

    pub fn composer(&self) -> &ReportComposer {
        &self.composer
    }

    pub fn run(&self, sheet: &Sheet, ctx: &SheetCtx) -> Result<SheetReport, SheetError> {
        info!("{} 开始统计，共 {} 行", ctx, sheet.rows().len());

        let columns = self
            .resolver
            .resolve(sheet.name(), sheet.headers(), ctx.family)?;
        info!("{} 列映射: {}", ctx, columns);

        let statistics = match ctx.family {
            SchemaFamily::FamilyA => {
                let rows = self
                    .aggregator
                    .classify_rows(sheet, &columns, &self.classifier);
                let metrics = self.aggregator.inspection(&rows, &columns);

                info!(
                    "{} 正常记录数：{} | ⚠️  异常记录数：{}",
                    ctx, metrics.normal_count, metrics.abnormal_count
                );
                if metrics.unclassified_count > 0 {
                    warn!(
                        "{} {} 条记录既不属于正常也不属于异常，未计入正常数和异常数",
                        ctx, metrics.unclassified_count
                    );
                }
                for record in metrics.abnormal_records.iter().take(5) {
                    debug!("{} 🚨 异常样本: {}", ctx, record.summary());
                }

                SheetStatistics::Inspection(metrics)
            }
            SchemaFamily::FamilyB => {
                let tables = self.aggregator.inventory(sheet, &columns)?;
                info!(
                    "{} 数据中心 {} 个，设备类型 {} 种，设备型号 {} 种",
                    ctx,
                    tables.centers.len(),
                    tables.types.len(),
                    tables.models.len()
                );
                SheetStatistics::Inventory(tables)
            }
        };

        let text = self.composer.compose(sheet.name(), &statistics);
        info!("{} ✓ 统计分析完毕", ctx);

        Ok(SheetReport {
            sheet_name: sheet.name().to_string(),
            position: ctx.position,
            family: ctx.family,
            columns,
            statistics,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_inspection_flow() {
        let sheet = Sheet::new(
            "表1",
            0,
            &strings(&["序号", "技术指标", "说明", "检查结果"]),
            vec![
                strings(&["1", "CPU使用率", "低于80%", "正常"]),
                strings(&["2", "磁盘空间", "低于90%", "空间不足告警"]),
            ],
        );
        let ctx = SheetCtx::new("表1", 1, SchemaFamily::FamilyA);
        let report = SheetFlow::new().unwrap().run(&sheet, &ctx).unwrap();

        assert!(report.text.starts_with("====== 表1 巡检统计结果 ======"));
        assert!(report.text.contains("异常描述汇总：1. 磁盘空间（空间不足告警）"));
        match report.statistics {
            SheetStatistics::Inspection(m) => assert_eq!(m.abnormal_count, 1),
            other => panic!("意外的统计类型: {:?}", other),
        }
    }

    #[test]
    fn test_custom_rules() {
        use crate::services::ClassificationRules;

        let rules = ClassificationRules::new(&["离线"], &[], "在线", '未').unwrap();
        let flow = SheetFlow::with_classifier(Classifier::new(rules));
        let sheet = Sheet::new(
            "表2",
            1,
            &strings(&["主机名", "检测结果"]),
            vec![
                strings(&["host-1", "在线"]),
                strings(&["host-2", "离线"]),
                strings(&["host-3", "未在线"]),
            ],
        );
        let ctx = SheetCtx::new("表2", 2, SchemaFamily::FamilyA);
        match flow.run(&sheet, &ctx).unwrap().statistics {
            SheetStatistics::Inspection(m) => {
                assert_eq!(m.normal_count, 1);
                assert_eq!(m.abnormal_count, 1);
                assert_eq!(m.unclassified_count, 1);
            }
            other => panic!("意外的统计类型: {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_is_reported() {
        let sheet = Sheet::new("表3", 2, &strings(&["备注"]), vec![strings(&["x"])]);
        let ctx = SheetCtx::new("表3", 3, SchemaFamily::FamilyA);
        let err = SheetFlow::new().unwrap().run(&sheet, &ctx).unwrap_err();
        assert!(matches!(err, SheetError::MissingColumn { .. }));
    }
}
