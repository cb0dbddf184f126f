use crate::error::ConfigError;
use crate::models::schema::SchemaConvention;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 程序配置文件
///
/// 所有组件在调用时接收同一个不可变的 `Config`，运行期间不存在全局可变配置。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub path: PathConfig,
    pub page: PageConfig,
    pub render: RenderConfig,
    pub schema: SchemaConfig,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

/// 路径配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// 巡检数据工作簿（.xlsx / .toml）
    pub input_path: PathBuf,
    /// PDF 临时目录
    pub pdfs_dir: PathBuf,
    /// 页面图片目录
    pub images_dir: PathBuf,
    /// 输出目录
    pub output_dir: PathBuf,
}

/// 纸张方向
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => Err(format!("未知的纸张方向: {}", other)),
        }
    }
}

/// 页面配置（只影响渲染器）
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// 纸张类型编号（8 = A3，9 = A4）
    pub page_size: u32,
    pub orientation: Orientation,
    /// 图片分辨率
    pub dpi: u32,
    /// 每个工作表渲染为单独一页
    pub single_page: bool,
}

/// 页面图片来源
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// 调用 soffice + pdftoppm 渲染
    Soffice,
    /// 读取 images_dir 中已经渲染好的图片
    Directory,
    /// 不处理页面图片
    Off,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "soffice" => Ok(RenderMode::Soffice),
            "directory" => Ok(RenderMode::Directory),
            "off" => Ok(RenderMode::Off),
            other => Err(format!("未知的渲染模式: {}", other)),
        }
    }
}

/// 渲染配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mode: RenderMode,
    pub soffice_bin: String,
    pub pdftoppm_bin: String,
}

/// 表结构约定：第几个表（从 1 开始）属于哪种表结构
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub family_a: Vec<usize>,
    pub family_b: Vec<usize>,
}

/// 配置来源
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// 从配置文件读取
    File(PathBuf),
    /// 指定的配置文件不存在，使用默认值
    Missing(PathBuf),
    /// 未指定配置文件，使用默认值
    Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathConfig::default(),
            page: PageConfig::default(),
            render: RenderConfig::default(),
            schema: SchemaConfig::default(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/巡检报告数据集.xlsx"),
            pdfs_dir: PathBuf::from("tmp/pdfs"),
            images_dir: PathBuf::from("tmp/images"),
            output_dir: PathBuf::from("out"),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            page_size: 8,
            orientation: Orientation::Portrait,
            dpi: 300,
            single_page: true,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Soffice,
            soffice_bin: "soffice".to_string(),
            pdftoppm_bin: "pdftoppm".to_string(),
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            family_a: vec![1, 2, 3, 5],
            family_b: vec![6, 7],
        }
    }
}

/// 读取并解析环境变量，不存在时返回 `None`
fn env_parse<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str, source: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed {
            path: source.to_string(),
            source: e,
        })
    }

    /// 加载配置：文件不存在时使用默认值，然后用环境变量覆盖
    ///
    /// 这里不写日志（调用时日志尚未初始化），由调用方根据 `ConfigSource` 记录。
    pub fn load(path: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        let (config, source) = match path {
            Some(p) if p.exists() => {
                let display = p.display().to_string();
                let content =
                    std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFailed {
                        path: display.clone(),
                        source: e,
                    })?;
                (
                    Self::from_toml_str(&content, &display)?,
                    ConfigSource::File(p.to_path_buf()),
                )
            }
            Some(p) => (Self::default(), ConfigSource::Missing(p.to_path_buf())),
            None => (Self::default(), ConfigSource::Defaults),
        };

        Ok((config.apply_env()?, source))
    }

    /// 用环境变量覆盖配置项
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Some(v) = env_parse::<PathBuf>("INSPECTION_INPUT_PATH", "路径")? {
            self.path.input_path = v;
        }
        if let Some(v) = env_parse::<PathBuf>("INSPECTION_PDFS_DIR", "路径")? {
            self.path.pdfs_dir = v;
        }
        if let Some(v) = env_parse::<PathBuf>("INSPECTION_IMAGES_DIR", "路径")? {
            self.path.images_dir = v;
        }
        if let Some(v) = env_parse::<PathBuf>("INSPECTION_OUTPUT_DIR", "路径")? {
            self.path.output_dir = v;
        }
        if let Some(v) = env_parse::<u32>("INSPECTION_PAGE_SIZE", "u32")? {
            self.page.page_size = v;
        }
        if let Some(v) = env_parse::<Orientation>("INSPECTION_ORIENTATION", "portrait/landscape")? {
            self.page.orientation = v;
        }
        if let Some(v) = env_parse::<u32>("INSPECTION_DPI", "u32")? {
            self.page.dpi = v;
        }
        if let Some(v) = env_parse::<bool>("INSPECTION_SINGLE_PAGE", "bool")? {
            self.page.single_page = v;
        }
        if let Some(v) = env_parse::<RenderMode>("INSPECTION_RENDER_MODE", "soffice/directory/off")? {
            self.render.mode = v;
        }
        if let Some(v) = env_parse::<bool>("VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        if let Ok(v) = std::env::var("OUTPUT_LOG_FILE") {
            self.output_log_file = v;
        }
        Ok(self)
    }

    /// 表结构约定
    pub fn schema_convention(&self) -> Result<SchemaConvention, ConfigError> {
        SchemaConvention::new(&self.schema.family_a, &self.schema.family_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::SchemaFamily;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.page.page_size, 8);
        assert_eq!(config.page.dpi, 300);
        assert!(config.page.single_page);
        assert_eq!(config.render.mode, RenderMode::Soffice);
        assert_eq!(config.schema_convention().unwrap(), SchemaConvention::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
verbose_logging = true

[path]
input_path = "data/样例.toml"

[page]
orientation = "landscape"

[schema]
family_a = [1, 2]
family_b = [3]
"#,
            "inline",
        )
        .unwrap();

        assert!(config.verbose_logging);
        assert_eq!(config.path.input_path, PathBuf::from("data/样例.toml"));
        assert_eq!(config.path.output_dir, PathBuf::from("out"));
        assert_eq!(config.page.orientation, Orientation::Landscape);
        assert_eq!(config.page.dpi, 300);

        let convention = config.schema_convention().unwrap();
        assert_eq!(convention.family_for(3), Some(SchemaFamily::FamilyB));
        assert_eq!(convention.family_for(5), None);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[page]\ndpi = \"高\"", "bad.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed { .. }));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let (config, source) = Config::load(Some(Path::new("不存在的配置.toml"))).unwrap();
        assert_eq!(config.output_log_file, Config::default().output_log_file);
        assert_eq!(source, ConfigSource::Missing(PathBuf::from("不存在的配置.toml")));
    }

    #[test]
    fn test_load_existing_file() {
        let path = std::env::temp_dir().join(format!("inspection_config_{}.toml", std::process::id()));
        std::fs::write(&path, "[page]\ndpi = 150\n").unwrap();

        let (config, source) = Config::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.page.dpi, 150);
        assert_eq!(source, ConfigSource::File(path));
    }
}
