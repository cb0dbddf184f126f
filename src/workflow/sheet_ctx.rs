//! 表处理上下文
//!
//! 封装"我正在处理工作簿中的第几个表"这一信息

use crate::models::schema::SchemaFamily;
use std::fmt::Display;

/// 表处理上下文
#[derive(Debug, Clone)]
pub struct SheetCtx {
    /// 表名
    pub sheet_name: String,

    /// 表在工作簿中的位置（从1开始）
    pub position: usize,

    /// 表结构类型
    pub family: SchemaFamily,
}

impl SheetCtx {
    /// 创建新的表处理上下文
    pub fn new(sheet_name: impl Into<String>, position: usize, family: SchemaFamily) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            position,
            family,
        }
    }
}

impl Display for SheetCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[表 #{} {} ({})]",
            self.position, self.sheet_name, self.family
        )
    }
}
