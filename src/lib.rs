//! # Inspection Report
//!
//! 巡检报告统计核心：读取巡检工作簿，逐表统计并生成汇总文本，
//! 同时把渲染好的页面图片按位置对应到各个工作表
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部进程资源，只暴露能力
//! - `PageRenderer` - 渲染页面图片（soffice + pdftoppm / 已有图片目录）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个表
//! - `ColumnResolver` - 列角色识别
//! - `Classifier` - 检查结果判定（正常 / 异常 / 未分类）
//! - `Aggregator` - 统计与分组汇总
//! - `ReportComposer` - 生成统计文本
//! - `PageAligner` - 页面与表的位置对齐
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张表"的完整统计流程
//! - `SheetCtx` - 上下文封装（表名 + 位置 + 表结构类型）
//! - `SheetFlow` - 流程编排（列识别 → 判定 → 统计 → 文本）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，管理加载、渲染和输出
//! - `orchestrator/report_processor` - 工作簿统计处理器，遍历所有表
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{DirectoryPages, PageRenderer, SofficeRenderer};
pub use models::{ArtifactMapping, SchemaConvention, SchemaFamily, Sheet, SheetCatalog};
pub use orchestrator::{process_catalog, App, SummaryReport};
pub use workflow::{SheetCtx, SheetFlow, SheetReport};
