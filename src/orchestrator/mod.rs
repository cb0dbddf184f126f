//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整个工作簿的处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 加载工作簿（SheetCatalog）
//! - 调用渲染器并对齐页面
//! - 写出汇总文本、页面映射、统计结果
//! - 输出全局统计信息
//!
//! ### `report_processor` - 工作簿统计处理器
//! - 按工作簿顺序遍历所有表
//! - 按表位置查出表结构类型
//! - 委托 SheetFlow 处理单个表
//! - 单表出错只跳过该表
//! - 拼接汇总文本
//!
//! ## 层次关系
//!
//! ```text
//! app (处理整个工作簿 + 页面图片)
//!     ↓
//! report_processor (处理 Vec<Sheet>)
//!     ↓
//! workflow::SheetFlow (处理单个 Sheet)
//!     ↓
//! services (能力层：列识别 / 判定 / 统计 / 文本 / 对齐)
//!     ↓
//! infrastructure (基础设施：PageRenderer)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：app 管资源和输出，report_processor 管表的遍历
//! 2. **资源隔离**：只有编排层调用渲染器和写文件
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod app;
pub mod report_processor;

// 重新导出主要类型
pub use app::{App, RunOutput};
pub use report_processor::{process_catalog, SheetOutcome, SheetStats, SummaryReport};
