//! 表数据模型
//!
//! `Sheet` 是一张已加载的表：表名、在工作簿中的序号、清洗后的表头和数据行。
//! `SheetCatalog` 按工作簿顺序保存所有表，是下游统计和图片对齐共用的顺序来源。

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// 一行数据：表头 → 单元格文本
pub type Row = BTreeMap<String, String>;

/// 清洗表头：去掉所有空白和换行
pub fn normalize_header(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 单张表（加载后不可变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    name: String,
    /// 在工作簿中的序号（从 0 开始）
    ordinal: usize,
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Sheet {
    /// 由表头和按列排列的单元格构建表
    ///
    /// - 表头会被清洗；空表头命名为 `Unnamed: {列号}`，重复表头追加 `.1`、`.2` 后缀
    /// - 缺失的单元格按空字符串处理
    /// - 所有单元格均为空的行会被丢弃
    pub fn new(
        name: impl Into<String>,
        ordinal: usize,
        raw_headers: &[String],
        raw_rows: Vec<Vec<String>>,
    ) -> Self {
        let headers = dedup_headers(raw_headers);

        let rows = raw_rows
            .into_iter()
            .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
            .map(|cells| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, h)| (h.clone(), cells.get(i).cloned().unwrap_or_default()))
                    .collect::<Row>()
            })
            .collect();

        Self {
            name: name.into(),
            ordinal,
            headers,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// 从 1 开始的位置，用于表结构约定和日志
    pub fn position(&self) -> usize {
        self.ordinal + 1
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn has_column(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }
}

/// 读取某行某列的值，列不存在时返回空字符串
pub fn cell<'a>(row: &'a Row, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}

fn dedup_headers(raw_headers: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(raw_headers.len());

    for (i, raw) in raw_headers.iter().enumerate() {
        let mut base = normalize_header(raw);
        if base.is_empty() {
            base = format!("Unnamed: {}", i);
        }

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}

/// 目录项：成功加载的表，或加载失败的表
#[derive(Debug, Clone)]
pub enum CatalogEntry {
    Loaded(Sheet),
    Failed {
        name: String,
        ordinal: usize,
        message: String,
    },
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        match self {
            CatalogEntry::Loaded(sheet) => sheet.name(),
            CatalogEntry::Failed { name, .. } => name,
        }
    }

    pub fn ordinal(&self) -> usize {
        match self {
            CatalogEntry::Loaded(sheet) => sheet.ordinal(),
            CatalogEntry::Failed { ordinal, .. } => *ordinal,
        }
    }
}

/// 工作簿目录（按工作簿顺序）
#[derive(Debug, Clone, Default)]
pub struct SheetCatalog {
    entries: Vec<CatalogEntry>,
}

impl SheetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一张表，返回分配到的序号
    pub fn push_sheet(
        &mut self,
        name: impl Into<String>,
        headers: &[String],
        rows: Vec<Vec<String>>,
    ) -> usize {
        let ordinal = self.entries.len();
        self.entries
            .push(CatalogEntry::Loaded(Sheet::new(name, ordinal, headers, rows)));
        ordinal
    }

    /// 追加一张加载失败的表（仍占用一个序号）
    pub fn push_failed(&mut self, name: impl Into<String>, message: impl Into<String>) {
        let ordinal = self.entries.len();
        self.entries.push(CatalogEntry::Failed {
            name: name.into(),
            ordinal,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// 按工作簿顺序返回所有表名（包括加载失败的表）
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Sheet> {
        self.entries.iter().find_map(|e| match e {
            CatalogEntry::Loaded(sheet) if sheet.name() == name => Some(sheet),
            _ => None,
        })
    }
}
