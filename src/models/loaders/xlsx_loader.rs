//! Excel 工作簿读取（calamine）
//!
//! 每个工作表的第一行作为表头，其余行作为数据。单个工作表读取失败不会影响其他表，
//! 失败的表仍然保留在目录中，供下游按顺序对齐。

use crate::error::LoadError;
use crate::models::sheet::SheetCatalog;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{info, warn};

/// 单元格转文本；整数值的浮点数去掉小数部分
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// 加载 Excel 工作簿，按工作簿顺序生成表目录
pub fn load_xlsx_workbook(path: &Path) -> Result<SheetCatalog, LoadError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(LoadError::NotFound { path: display });
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::WorkbookOpenFailed {
        path: display.clone(),
        message: e.to_string(),
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    info!(
        "📘 文件中共检测到 {} 个表：{:?}",
        sheet_names.len(),
        sheet_names
    );

    let mut catalog = SheetCatalog::new();
    for name in sheet_names {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let mut rows = range
                    .rows()
                    .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());
                let headers = rows.next().unwrap_or_default();
                let data: Vec<Vec<String>> = rows.collect();
                catalog.push_sheet(name, &headers, data);
            }
            Err(e) => {
                warn!("⚠️ 无法读取表 {}: {}", name, e);
                catalog.push_failed(name, e.to_string());
            }
        }
    }

    Ok(catalog)
}
