//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；未设置时 verbose 为 debug，否则为 info。
/// 重复初始化会被忽略。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n巡检统计日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 巡检报告统计");
    info!("📂 数据文件: {}", config.path.input_path.display());
    info!("📁 输出目录: {}", config.path.output_dir.display());
    info!(
        "🖼️  渲染模式: {:?} (dpi={}, 单页={})",
        config.render.mode, config.page.dpi, config.page.single_page
    );
    // soffice 没有纸张参数，纸张和方向以工作簿自身的页面设置为准
    info!(
        "📐 纸张: {} ({:?})，仅作记录",
        config.page.page_size, config.page.orientation
    );
    info!("{}", "=".repeat(60));
}

/// 记录工作簿加载信息
///
/// # 参数
/// - `names`: 按工作簿顺序排列的表名
pub fn log_catalog_loaded(names: &[String]) {
    info!("✓ 找到 {} 个工作表", names.len());
    for (i, name) in names.iter().enumerate() {
        info!("  {}. {}", i + 1, name);
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `processed`: 统计成功的表数量
/// - `skipped`: 跳过的表数量
/// - `pages`: 已对齐的页面数量
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(processed: usize, skipped: usize, pages: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 统计成功: {}/{}", processed, processed + skipped);
    info!("⏭️  跳过: {}", skipped);
    info!("🖼️  页面图片: {}", pages);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
