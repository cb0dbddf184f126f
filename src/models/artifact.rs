//! 页面图片与表的对应关系

use serde::{Deserialize, Serialize};

/// 一条对应关系：表名（或 `Page{n}`）→ 外部渲染产物
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry<A> {
    pub name: String,
    /// 该页面在渲染结果中的位置（从 0 开始）
    pub page_index: usize,
    /// 是否是多出来的页面（没有对应的表）
    pub synthetic: bool,
    pub artifact: A,
}

/// 对齐警告，不会中断流程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlignmentWarning {
    /// 页数少于表数，末尾的表没有对应页面
    Shortfall { unmapped: Vec<String> },
    /// 页数多于表数，多出的页面使用 `Page{n}` 命名
    Overflow { extra_pages: Vec<String> },
}

/// 表名 → 渲染产物 的映射，保持页面顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMapping<A> {
    pub entries: Vec<ArtifactEntry<A>>,
    pub warnings: Vec<AlignmentWarning>,
}

impl<A> ArtifactMapping<A> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&A> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.artifact)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// 未对应到页面的表
    pub fn unmapped(&self) -> &[String] {
        self.warnings
            .iter()
            .find_map(|w| match w {
                AlignmentWarning::Shortfall { unmapped } => Some(unmapped.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }
}
