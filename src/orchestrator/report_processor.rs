//! 工作簿统计处理器 - 编排层
//!
//! ## 职责
//!
//! 按工作簿顺序逐个处理表，汇总为一段统计文本。
//!
//! ## 核心功能
//!
//! 1. **遍历表**：按目录顺序处理 `SheetCatalog` 中的每个表
//! 2. **结构约定**：根据表的位置查出表结构类型
//! 3. **流程调度**：委托 `SheetFlow` 处理单个表
//! 4. **部分失败**：单个表出错只跳过该表，其余表照常处理
//! 5. **统计输出**：记录成功/跳过数量

use crate::error::SheetError;
use crate::models::metrics::SheetStatistics;
use crate::models::schema::SchemaConvention;
use crate::models::sheet::{CatalogEntry, SheetCatalog};
use crate::workflow::{SheetCtx, SheetFlow, SheetReport};
use serde::Serialize;
use tracing::{error, info};

/// 单个表的处理结果
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetOutcome {
    Processed {
        sheet_name: String,
        position: usize,
        report: SheetReport,
    },
    Skipped {
        sheet_name: String,
        position: usize,
        reason: String,
    },
}

impl SheetOutcome {
    pub fn sheet_name(&self) -> &str {
        match self {
            SheetOutcome::Processed { sheet_name, .. } | SheetOutcome::Skipped { sheet_name, .. } => {
                sheet_name
            }
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self, SheetOutcome::Processed { .. })
    }

    pub fn statistics(&self) -> Option<&SheetStatistics> {
        match self {
            SheetOutcome::Processed { report, .. } => Some(&report.statistics),
            SheetOutcome::Skipped { .. } => None,
        }
    }
}

/// 整个工作簿的统计结果
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    /// 汇总文本
    pub text: String,
    pub sheets: Vec<SheetOutcome>,
}

/// 表处理统计
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SheetStats {
    pub processed: usize,
    pub skipped: usize,
}

impl SummaryReport {
    pub fn stats(&self) -> SheetStats {
        let processed = self.sheets.iter().filter(|s| s.is_processed()).count();
        SheetStats {
            processed,
            skipped: self.sheets.len() - processed,
        }
    }

    pub fn outcome(&self, sheet_name: &str) -> Option<&SheetOutcome> {
        self.sheets.iter().find(|s| s.sheet_name() == sheet_name)
    }
}

/// 处理单个目录项，出错时返回该表的错误
fn process_entry(
    flow: &SheetFlow,
    entry: &CatalogEntry,
    convention: &SchemaConvention,
) -> Result<SheetReport, SheetError> {
    let sheet = match entry {
        CatalogEntry::Loaded(sheet) => sheet,
        CatalogEntry::Failed { name, message, .. } => {
            return Err(SheetError::DataFile {
                sheet: name.clone(),
                message: message.clone(),
            })
        }
    };

    let position = sheet.position();
    let family = convention
        .family_for(position)
        .ok_or_else(|| SheetError::NoSchemaFamily {
            sheet: sheet.name().to_string(),
            position,
        })?;

    let ctx = SheetCtx::new(sheet.name(), position, family);
    flow.run(sheet, &ctx)
}

/// 统计整个工作簿
///
/// # 参数
/// - `flow`: 单表统计流程
/// - `catalog`: 工作簿目录
/// - `convention`: 表位置 → 表结构类型 的约定
///
/// # 返回
/// 汇总文本只包含处理成功的表，按工作簿顺序排列，表之间空一行
pub fn process_catalog(
    flow: &SheetFlow,
    catalog: &SheetCatalog,
    convention: &SchemaConvention,
) -> SummaryReport {
    let mut outcomes = Vec::with_capacity(catalog.len());
    let mut blocks = Vec::new();

    for entry in catalog.entries() {
        let position = entry.ordinal() + 1;
        log_sheet_start(position, entry.name(), catalog.len());

        match process_entry(flow, entry, convention) {
            Ok(report) => {
                blocks.push(report.text.clone());
                outcomes.push(SheetOutcome::Processed {
                    sheet_name: entry.name().to_string(),
                    position,
                    report,
                });
            }
            Err(e) => {
                error!("[表 {}] ❌ 处理 {} 时出错：{}", position, e.sheet(), e);
                outcomes.push(SheetOutcome::Skipped {
                    sheet_name: entry.name().to_string(),
                    position,
                    reason: e.to_string(),
                });
            }
        }
    }

    let summary = SummaryReport {
        text: flow.composer().join_blocks(&blocks),
        sheets: outcomes,
    };
    log_catalog_complete(&summary.stats(), catalog.len(), summary.text.chars().count());

    summary
}

// ========== 日志辅助函数 ==========

fn log_sheet_start(position: usize, name: &str, total: usize) {
    info!("\n{}", "─".repeat(30));
    info!("[表 {}] ({}/{}) 开始统计：{}", position, position, total, name);
}

fn log_catalog_complete(stats: &SheetStats, total: usize, text_len: usize) {
    info!(
        "表统计: 成功 {}, 跳过 {}, 总计 {}",
        stats.processed, stats.skipped, total
    );
    info!("✅ 汇总结果提取完成（{} 字）", text_len);
}
