use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 单表统计错误
    #[error("表处理错误: {0}")]
    Sheet(#[from] SheetError),
    /// 数据加载错误
    #[error("数据加载错误: {0}")]
    Load(#[from] LoadError),
    /// 页面渲染错误
    #[error("渲染错误: {0}")]
    Render(#[from] RenderError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 单个表的统计错误
///
/// 只影响出错的那一张表，流程会跳过它继续处理后续的表。
#[derive(Debug, Error)]
pub enum SheetError {
    /// 表头中找不到必需的列（技术指标 / 检查结果）
    #[error("无法识别必要列 (表: {sheet})，请检查表头：{headers:?}")]
    MissingColumn { sheet: String, headers: Vec<String> },

    /// 分组统计所需的列不存在
    #[error("分组列 '{column}' 不存在 (表: {sheet})，表头：{headers:?}")]
    MissingGroupColumn {
        sheet: String,
        column: String,
        headers: Vec<String>,
    },

    /// 表的位置没有对应的表结构类型
    #[error("第 {position} 个表 ({sheet}) 未配置表结构类型")]
    NoSchemaFamily { sheet: String, position: usize },

    /// 工作簿不可读或表不存在
    #[error("数据文件错误 (表: {sheet}): {message}")]
    DataFile { sheet: String, message: String },
}

/// 数据加载错误
#[derive(Debug, Error)]
pub enum LoadError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },

    /// 无法打开工作簿
    #[error("无法打开工作簿 ({path}): {message}")]
    WorkbookOpenFailed { path: String, message: String },

    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 页面渲染错误
#[derive(Debug, Error)]
pub enum RenderError {
    /// 外部命令启动失败
    #[error("无法启动命令 {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// 外部命令返回非零状态
    #[error("{program} 转换失败: {stderr}")]
    CommandFailed { program: String, stderr: String },

    /// 渲染输出缺失
    #[error("渲染输出不存在: {path}")]
    OutputMissing { path: String },

    /// 创建输出目录失败
    #[error("创建目录失败 ({path}): {source}")]
    DirectoryCreateFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 读取输出目录失败
    #[error("读取目录失败 ({path}): {source}")]
    DirectoryReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// 同一位置被配置为两种表结构
    #[error("第 {position} 个表同时被配置为两种表结构")]
    ConflictingPosition { position: usize },

    /// 判定规则无效
    #[error("判定规则无效: {0}")]
    InvalidRule(#[from] regex::Error),
}

// ========== 便捷构造函数 ==========

impl SheetError {
    /// 创建缺少必要列错误
    pub fn missing_column(sheet: impl Into<String>, headers: &[String]) -> Self {
        SheetError::MissingColumn {
            sheet: sheet.into(),
            headers: headers.to_vec(),
        }
    }

    /// 出错的表名
    pub fn sheet(&self) -> &str {
        match self {
            SheetError::MissingColumn { sheet, .. }
            | SheetError::MissingGroupColumn { sheet, .. }
            | SheetError::NoSchemaFamily { sheet, .. }
            | SheetError::DataFile { sheet, .. } => sheet,
        }
    }
}

impl LoadError {
    /// 创建文件读取错误
    pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        LoadError::ReadFailed {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_error_into_app_error() {
        let headers = vec!["备注".to_string()];
        let err: AppError = SheetError::missing_column("表3", &headers).into();
        assert!(matches!(&err, AppError::Sheet(e) if e.sheet() == "表3"));
        assert!(err.to_string().contains("无法识别必要列 (表: 表3)"));
    }

    #[test]
    fn test_load_error_message() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppResult<()> = Err(LoadError::read_failed("data/巡检.toml", io).into());
        let message = err.unwrap_err().to_string();
        assert!(message.starts_with("数据加载错误: 读取文件失败 (data/巡检.toml)"));
    }
}
