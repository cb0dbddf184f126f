//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 管理一次完整运行：加载工作簿、统计、渲染页面、对齐、写出结果。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：日志文件、表结构约定、判定规则
//! 2. **加载工作簿**：按扩展名选择 xlsx 或 TOML 加载器
//! 3. **统计链**：委托 `report_processor` 处理所有表
//! 4. **对齐链**：等待渲染器完成后按位置对齐页面与表
//! 5. **输出**：汇总文本、页面映射、统计结果写入输出目录

use crate::config::{Config, RenderMode};
use crate::error::{AppResult, LoadError};
use crate::infrastructure::{DirectoryPages, PageRenderer, SofficeRenderer};
use crate::models::artifact::ArtifactMapping;
use crate::models::schema::SchemaConvention;
use crate::models::sheet::SheetCatalog;
use crate::models::{load_toml_workbook, load_xlsx_workbook};
use crate::orchestrator::report_processor::{self, SummaryReport};
use crate::services::PageAligner;
use crate::utils::logging::{
    init_log_file, log_catalog_loaded, log_startup, print_final_stats, truncate_text,
};
use crate::workflow::SheetFlow;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 汇总文本文件名
pub const SUMMARY_FILE: &str = "汇总结果.txt";
/// 页面映射文件名
pub const MAPPING_FILE: &str = "artifact_mapping.json";
/// 统计结果文件名
pub const STATISTICS_FILE: &str = "statistics.json";

/// 一次运行的全部产出
#[derive(Debug)]
pub struct RunOutput {
    pub summary: SummaryReport,
    pub mapping: ArtifactMapping<PathBuf>,
}

/// 应用主结构
pub struct App {
    config: Config,
    convention: SchemaConvention,
    flow: SheetFlow,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法写入日志文件: {}", config.output_log_file))?;

        log_startup(&config);

        let convention = config.schema_convention().context("表结构约定无效")?;
        let flow = SheetFlow::new().context("判定规则无效")?;

        Ok(Self {
            config,
            convention,
            flow,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunOutput> {
        let catalog = load_catalog(&self.config.path.input_path).await?;

        if catalog.is_empty() {
            warn!("⚠️ 工作簿中没有工作表");
        }
        log_catalog_loaded(&catalog.names());

        // 统计链
        let summary = report_processor::process_catalog(&self.flow, &catalog, &self.convention);
        info!("📝 汇总预览: {}", truncate_text(&summary.text, 80));

        // 对齐链
        // 渲染失败不影响统计结果，只记录错误并按零页对齐
        let pages = self.render_pages().await.unwrap_or_else(|e| {
            error!("❌ 页面渲染失败: {}", e);
            Vec::new()
        });
        let mapping = PageAligner::new().align(pages, &catalog.names());

        self.write_outputs(&summary, &mapping).await?;

        let stats = summary.stats();
        print_final_stats(
            stats.processed,
            stats.skipped,
            mapping.len(),
            &self.config.output_log_file,
        );

        Ok(RunOutput { summary, mapping })
    }

    /// 渲染页面图片
    async fn render_pages(&self) -> AppResult<Vec<PathBuf>> {
        let workbook = &self.config.path.input_path;
        let pages = match self.config.render.mode {
            RenderMode::Off => {
                info!("⏭️  页面渲染已关闭");
                Vec::new()
            }
            RenderMode::Soffice => {
                SofficeRenderer::from_config(&self.config)
                    .render(workbook)
                    .await?
            }
            RenderMode::Directory => {
                DirectoryPages::new(&self.config.path.images_dir)
                    .render(workbook)
                    .await?
            }
        };
        Ok(pages)
    }

    /// 写出汇总文本、页面映射和统计结果
    async fn write_outputs(
        &self,
        summary: &SummaryReport,
        mapping: &ArtifactMapping<PathBuf>,
    ) -> Result<()> {
        let output_dir = &self.config.path.output_dir;
        tokio::fs::create_dir_all(output_dir)
            .await
            .with_context(|| format!("无法创建输出目录: {}", output_dir.display()))?;

        write_file(&output_dir.join(SUMMARY_FILE), summary.text.as_bytes()).await?;
        write_file(
            &output_dir.join(MAPPING_FILE),
            &serde_json::to_vec_pretty(mapping)?,
        )
        .await?;
        write_file(
            &output_dir.join(STATISTICS_FILE),
            &serde_json::to_vec_pretty(summary)?,
        )
        .await?;

        info!("💾 结果已写入: {}", output_dir.display());
        Ok(())
    }
}

/// 加载工作簿：`.toml` 走 TOML 加载器，其余按 Excel 读取
pub async fn load_catalog(path: &Path) -> AppResult<SheetCatalog> {
    info!("\n📁 正在读取工作簿: {}", path.display());

    if is_toml(path) {
        return Ok(load_toml_workbook(path).await?);
    }

    let owned = path.to_path_buf();
    let catalog = tokio::task::spawn_blocking(move || load_xlsx_workbook(&owned))
        .await
        .map_err(|e| LoadError::WorkbookOpenFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })??;
    Ok(catalog)
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

async fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("写入文件失败: {}", path.display()))
}
