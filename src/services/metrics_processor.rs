//! 指标处理服务 - 业务能力层
//!
//! 持有一次提交的快照，提供按形态读取单个指标、表单字段视图、附件列表和 JSON 输出

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{AppResult, MetricError, ParseError};
use crate::models::{
    Attachment, Category, DuplicatePolicy, FormField, MetricShape, MetricValue, MetricsSnapshot,
    SubmissionPart,
};
use crate::services::json_renderer;
use crate::services::submission_parser::SubmissionParser;

/// 指标处理器
#[derive(Debug, Clone)]
pub struct MetricsProcessor {
    snapshot: MetricsSnapshot,
}

impl MetricsProcessor {
    /// 从已解码的提交部件创建（重复 codeName 直接失败）
    pub fn from_parts<I>(parts: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = SubmissionPart>,
    {
        Self::from_parts_with_policy(parts, DuplicatePolicy::Fail)
    }

    /// 从已解码的提交部件创建，使用指定的重复处理策略
    pub fn from_parts_with_policy<I>(parts: I, policy: DuplicatePolicy) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = SubmissionPart>,
    {
        let snapshot = SubmissionParser::new(policy).parse(parts)?;
        Ok(Self::new(snapshot))
    }

    pub fn new(snapshot: MetricsSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &MetricsSnapshot {
        &self.snapshot
    }

    /// 按调用方指定的形态读取单个指标
    ///
    /// 指标不存在时返回该形态的空值；附件分类返回 `UnsupportedCategory`。
    pub fn get_metric(
        &self,
        category: Category,
        code_name: &str,
        shape: MetricShape,
    ) -> Result<MetricValue, MetricError> {
        let bucket = self
            .snapshot
            .bucket(category)
            .ok_or(MetricError::UnsupportedCategory(category))?;

        match bucket.get(code_name) {
            Some(record) => Ok(MetricValue::project(record, shape)),
            None => {
                debug!("指标 {}/{} 未提交", category, code_name);
                Ok(MetricValue::empty(shape))
            }
        }
    }

    /// 读取单个值
    pub fn single_value(
        &self,
        category: Category,
        code_name: &str,
    ) -> Result<Option<String>, MetricError> {
        match self.get_metric(category, code_name, MetricShape::SingleValue)? {
            MetricValue::Single(value) => Ok(value),
            _ => Ok(None),
        }
    }

    /// 读取值列表
    pub fn value_list(
        &self,
        category: Category,
        code_name: &str,
    ) -> Result<Vec<String>, MetricError> {
        match self.get_metric(category, code_name, MetricShape::ValueList)? {
            MetricValue::List(values) => Ok(values),
            _ => Ok(Vec::new()),
        }
    }

    /// 读取键值映射
    pub fn key_value_map(
        &self,
        category: Category,
        code_name: &str,
    ) -> Result<IndexMap<String, String>, MetricError> {
        match self.get_metric(category, code_name, MetricShape::KeyValueMap)? {
            MetricValue::Map(map) => Ok(map),
            _ => Ok(IndexMap::new()),
        }
    }

    /// 表单字段视图：codeName → (标签, 第一个值)
    pub fn form_fields(&self) -> IndexMap<String, FormField> {
        self.snapshot
            .bucket(Category::Form)
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|(code_name, record)| {
                        let field = FormField {
                            label: record.label.clone(),
                            value: record.first_value().map(str::to_string),
                        };
                        (code_name.clone(), field)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn attachments(&self) -> &[Attachment] {
        self.snapshot.attachments()
    }

    pub fn into_attachments(self) -> Vec<Attachment> {
        self.snapshot.into_attachments()
    }

    /// 渲染为 JSON 值
    pub fn to_json_value(&self) -> Result<serde_json::Value, MetricError> {
        json_renderer::render_sections(&self.snapshot)
    }

    /// 渲染为带缩进的 JSON 文本
    pub fn to_json(&self) -> AppResult<String> {
        let value = self.to_json_value()?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}
