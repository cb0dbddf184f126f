//! 巡检结果判定服务 - 业务能力层
//!
//! 只负责"一条检查结果文本是正常还是异常"，不关心表结构和统计。

use crate::error::ConfigError;
use crate::models::metrics::RowStatus;
use regex::Regex;

/// 异常关键字
pub const ABNORMAL_TOKENS: &[&str] = &["不正常", "异常", "错误", "失败", "需检查", "告警"];

/// 排除关键字：包含这些词时不判为异常
pub const EXCLUSION_TOKENS: &[&str] = &["无告警"];

/// 正常关键字
pub const NORMAL_MARKER: &str = "正常";

/// 否定前缀：紧挨在正常关键字前面时不算正常
pub const NEGATION_PREFIX: char = '不';

/// 判定规则
#[derive(Debug, Clone)]
pub struct ClassificationRules {
    abnormal_tokens: Vec<String>,
    exclusion_tokens: Vec<String>,
    /// 未被否定的“正常”
    normal_pattern: Regex,
}

impl ClassificationRules {
    /// 构建判定规则
    pub fn new(
        abnormal_tokens: &[&str],
        exclusion_tokens: &[&str],
        normal_marker: &str,
        negation_prefix: char,
    ) -> Result<Self, ConfigError> {
        let pattern = format!(
            "(?:^|[^{}]){}",
            regex::escape(&negation_prefix.to_string()),
            regex::escape(normal_marker)
        );

        Ok(Self {
            abnormal_tokens: abnormal_tokens.iter().map(|s| s.to_string()).collect(),
            exclusion_tokens: exclusion_tokens.iter().map(|s| s.to_string()).collect(),
            normal_pattern: Regex::new(&pattern)?,
        })
    }

    /// 默认规则
    pub fn standard() -> Result<Self, ConfigError> {
        Self::new(ABNORMAL_TOKENS, EXCLUSION_TOKENS, NORMAL_MARKER, NEGATION_PREFIX)
    }

    fn matches_normal(&self, text: &str) -> bool {
        self.normal_pattern.is_match(text)
    }

    fn is_abnormal(&self, text: &str) -> bool {
        !self.matches_normal(text)
            && self.abnormal_tokens.iter().any(|t| text.contains(t.as_str()))
            && !self.exclusion_tokens.iter().any(|t| text.contains(t.as_str()))
    }
}

/// 去掉所有空白字符
pub fn normalize_result(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 巡检结果判定服务
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: ClassificationRules,
}

impl Classifier {
    pub fn new(rules: ClassificationRules) -> Self {
        Self { rules }
    }

    /// 使用默认规则创建
    pub fn standard() -> Result<Self, ConfigError> {
        Ok(Self::new(ClassificationRules::standard()?))
    }

    /// 判定一条检查结果
    ///
    /// 先判异常，再判正常，两者不会同时成立。
    pub fn classify(&self, result_text: &str) -> RowStatus {
        let text = normalize_result(result_text);

        if self.rules.is_abnormal(&text) {
            RowStatus::Abnormal
        } else if self.rules.matches_normal(&text) {
            RowStatus::Normal
        } else {
            RowStatus::Unclassified
        }
    }
}
