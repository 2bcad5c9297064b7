//! 支持消息组装 - 业务能力层
//!
//! 把表单字段、指标 JSON 和附件组装成一条发往支持系统的消息，不负责发送

use serde::Serialize;

use crate::error::AppResult;
use crate::models::Attachment;
use crate::services::metrics_processor::MetricsProcessor;

/// 指标 JSON 附件的文件名
pub const METRICS_FILE_NAME: &str = "metrics.json";
/// 表单中没有主题字段时使用的主题
pub const DEFAULT_SUBJECT: &str = "Support request";

/// 发往支持系统的消息
#[derive(Debug, Clone, Serialize)]
pub struct SupportMessage {
    pub subject: String,
    pub body: String,
    #[serde(skip)]
    pub attachments: Vec<Attachment>,
}

impl SupportMessage {
    /// 从指标处理器组装
    ///
    /// # 参数
    /// - `processor`: 已解析的提交
    /// - `subject_field`: 作为主题的表单字段 codeName
    ///
    /// # 返回
    /// 附件顺序：`metrics.json` 在前，提交的附件按原顺序在后
    pub fn from_processor(processor: &MetricsProcessor, subject_field: &str) -> AppResult<Self> {
        let fields = processor.form_fields();

        let subject = fields
            .get(subject_field)
            .and_then(|field| field.value.as_deref())
            .map(str::trim)
            .filter(|subject| !subject.is_empty())
            .unwrap_or(DEFAULT_SUBJECT)
            .to_string();

        let body = fields
            .values()
            .map(|field| format!("{}: {}", field.label, field.value.as_deref().unwrap_or_default()))
            .collect::<Vec<_>>()
            .join("\n");

        let json = processor.to_json()?;
        let mut attachments = Vec::with_capacity(processor.attachments().len() + 1);
        attachments.push(Attachment::new(METRICS_FILE_NAME, json.into_bytes()));
        attachments.extend(processor.attachments().iter().cloned());

        Ok(Self {
            subject,
            body,
            attachments,
        })
    }

    /// 附件总字节数
    pub fn attachment_bytes(&self) -> usize {
        self.attachments.iter().map(|a| a.content.len()).sum()
    }
}
