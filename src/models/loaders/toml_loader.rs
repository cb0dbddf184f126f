use crate::error::LoadError;
use crate::models::sheet::SheetCatalog;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// TOML 描述的工作簿
///
/// ```toml
/// [[sheets]]
/// name = "表1"
/// headers = ["序号", "技术指标", "说明", "检查结果"]
/// rows = [
///     [1, "CPU使用率", "低于80%", "正常"],
/// ]
/// ```
#[derive(Debug, Deserialize)]
struct TomlWorkbook {
    #[serde(default)]
    sheets: Vec<TomlSheet>,
}

#[derive(Debug, Deserialize)]
struct TomlSheet {
    name: String,
    #[serde(default)]
    headers: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<toml::Value>>,
}

fn value_to_cell(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// 从 TOML 字符串解析工作簿
pub fn parse_toml_workbook(content: &str, source: &str) -> Result<SheetCatalog, LoadError> {
    let workbook: TomlWorkbook =
        toml::from_str(content).map_err(|source_err| LoadError::TomlParseFailed {
            path: source.to_string(),
            source: source_err,
        })?;

    let mut catalog = SheetCatalog::new();
    for sheet in workbook.sheets {
        let rows = sheet
            .rows
            .iter()
            .map(|row| row.iter().map(value_to_cell).collect())
            .collect();
        catalog.push_sheet(sheet.name, &sheet.headers, rows);
    }

    Ok(catalog)
}

/// 从 TOML 文件加载工作簿
pub async fn load_toml_workbook(path: &Path) -> Result<SheetCatalog, LoadError> {
    let source_name = path.display().to_string();
    if !path.exists() {
        return Err(LoadError::NotFound { path: source_name });
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| LoadError::read_failed(&source_name, e))?;

    let catalog = parse_toml_workbook(&content, &source_name)?;
    tracing::info!("成功加载 {}，共 {} 个表", path.display(), catalog.len());

    Ok(catalog)
}
