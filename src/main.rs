use anyhow::Result;
use inspection_report::config::ConfigSource;
use inspection_report::utils::logging;
use inspection_report::{App, Config};
use std::path::PathBuf;
use tracing::{info, warn};

/// 默认配置文件
const DEFAULT_CONFIG: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // 用法: inspection-report [config.toml]
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    // 加载配置
    let (config, source) = Config::load(Some(&config_path))?;

    // 初始化日志
    logging::init(config.verbose_logging);
    match source {
        ConfigSource::File(path) => info!("⚙️  配置文件: {}", path.display()),
        ConfigSource::Missing(path) => {
            warn!("配置文件未找到：{}，使用默认配置", path.display())
        }
        ConfigSource::Defaults => info!("⚙️  使用默认配置"),
    }

    // 初始化并运行应用
    let _output = App::initialize(config).await?.run().await?;

    Ok(())
}
