//! 页面对齐服务 - 业务能力层
//!
//! 外部渲染器按页输出图片（每页一张），本服务按位置把第 i 页对应到第 i 个表。
//! 不做任何基于内容的匹配。

use crate::models::artifact::{AlignmentWarning, ArtifactEntry, ArtifactMapping};
use tracing::{info, warn};

/// 多出页面的命名：`Page{页码}`（页码从 1 开始）
pub fn synthetic_page_name(page_index: usize) -> String {
    format!("Page{}", page_index + 1)
}

/// 页面对齐服务
#[derive(Debug, Clone, Copy, Default)]
pub struct PageAligner;

impl PageAligner {
    pub fn new() -> Self {
        Self
    }

    /// 按位置对齐
    ///
    /// # 参数
    /// - `artifacts`: 按页顺序排列的渲染产物
    /// - `sheet_names`: 按工作簿顺序排列的表名
    ///
    /// # 返回
    /// 页数多于表数时，多出的页面命名为 `Page{n}`；
    /// 页数少于表数时，末尾的表不出现在映射中，并记录一条警告。
    pub fn align<A>(&self, artifacts: Vec<A>, sheet_names: &[String]) -> ArtifactMapping<A> {
        let num_pages = artifacts.len();
        let num_sheets = sheet_names.len();
        info!("页面数：{}，工作表数：{}", num_pages, num_sheets);

        let mut entries = Vec::with_capacity(num_pages);
        let mut extra_pages = Vec::new();

        for (i, artifact) in artifacts.into_iter().enumerate() {
            let (name, synthetic) = match sheet_names.get(i) {
                Some(name) => (name.clone(), false),
                None => {
                    let name = synthetic_page_name(i);
                    extra_pages.push(name.clone());
                    (name, true)
                }
            };
            entries.push(ArtifactEntry {
                name,
                page_index: i,
                synthetic,
                artifact,
            });
        }

        let mut warnings = Vec::new();
        if num_pages < num_sheets {
            let unmapped = sheet_names[num_pages..].to_vec();
            warn!("⚠️ 以下 sheet 未匹配到页面：{:?}", unmapped);
            warnings.push(AlignmentWarning::Shortfall { unmapped });
        }
        if !extra_pages.is_empty() {
            warn!("⚠️ 页面数多于工作表数，多出的页面：{:?}", extra_pages);
            warnings.push(AlignmentWarning::Overflow { extra_pages });
        }

        ArtifactMapping { entries, warnings }
    }
}
