//! 统计结果模型

use crate::models::sheet::Row;
use serde::{Deserialize, Serialize};

/// 巡检记录的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowStatus {
    Normal,
    Abnormal,
    /// 两种规则都不满足，不计入正常数也不计入异常数
    Unclassified,
}

/// 带判定结果的数据行
#[derive(Debug, Clone)]
pub struct ClassifiedRow<'a> {
    pub row: &'a Row,
    pub status: RowStatus,
}

/// 单条异常记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbnormalRecord {
    /// 从 1 开始的序号
    pub seq: usize,
    pub item: String,
    pub description: Option<String>,
    pub result: String,
}

impl AbnormalRecord {
    /// `{序号}. {技术指标}（{检查结果}）`
    pub fn summary(&self) -> String {
        format!("{}. {}（{}）", self.seq, self.item, self.result)
    }
}

/// 异常明细使用的表头（表中实际的列名）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailColumns {
    pub item: String,
    pub description: Option<String>,
    pub result: String,
}

/// 巡检项表的统计结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetMetrics {
    pub total: usize,
    pub detail_columns: DetailColumns,
    /// 所有技术指标，以“、”连接
    pub check_items: String,
    pub normal_count: usize,
    pub abnormal_count: usize,
    pub unclassified_count: usize,
    /// 正常率(%)，保留两位小数
    pub normal_rate: f64,
    /// 异常率(%)，保留两位小数
    pub abnormal_rate: f64,
    pub abnormal_records: Vec<AbnormalRecord>,
}

impl SheetMetrics {
    /// 异常描述汇总，以“；”连接
    pub fn abnormal_detail(&self) -> String {
        self.abnormal_records
            .iter()
            .map(AbnormalRecord::summary)
            .collect::<Vec<_>>()
            .join("；")
    }
}

/// 按数据中心统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenterStat {
    pub center: String,
    pub device_count: usize,
}

/// 按设备类型统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeStat {
    pub device_type: String,
    pub device_count: usize,
}

/// 按设备型号统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStat {
    pub device_model: String,
    pub device_type: String,
    pub count: usize,
}

/// 设备统计表的三维度汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupTables {
    pub centers: Vec<CenterStat>,
    pub types: Vec<TypeStat>,
    pub models: Vec<ModelStat>,
}

/// 单表统计结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SheetStatistics {
    Inspection(SheetMetrics),
    Inventory(RollupTables),
}
