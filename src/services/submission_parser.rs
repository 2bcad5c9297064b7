//! 提交解析服务 - 业务能力层
//!
//! 把 multipart 部件按分类和 codeName 归档成 `MetricsSnapshot`

use std::collections::HashSet;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::error::ParseError;
use crate::models::{
    Attachment, Category, Disposition, DuplicatePolicy, MetricEntry, MetricRecord,
    MetricsSnapshot, SnapshotBuilder, SubmissionPart,
};

/// 分类路由头部
pub const CATEGORY_HEADER: &str = "category";
/// codeName 路由头部
pub const CODE_NAME_HEADER: &str = "codeName";

/// 提交解析器
///
/// 策略：
/// - 未知分类标识的字段静默丢弃（兼容新版本客户端的新分类）
/// - 同一分类中 codeName 重复按 `DuplicatePolicy` 处理，默认整次失败
pub struct SubmissionParser {
    policy: DuplicatePolicy,
}

impl SubmissionParser {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }

    /// 解析全部部件
    pub fn parse<I>(&self, parts: I) -> Result<MetricsSnapshot, ParseError>
    where
        I: IntoIterator<Item = SubmissionPart>,
    {
        let mut builder = SnapshotBuilder::new(self.policy);

        for part in parts {
            match part.disposition {
                Disposition::FormField => Self::add_form_field(&mut builder, part)?,
                Disposition::Attachment => Self::add_attachment(&mut builder, part)?,
                Disposition::Other(ref kind) => {
                    debug!("忽略未知类型的部件: '{}'", kind);
                }
            }
        }

        Ok(builder.build())
    }

    fn add_form_field(
        builder: &mut SnapshotBuilder,
        part: SubmissionPart,
    ) -> Result<(), ParseError> {
        let category = part
            .header(CATEGORY_HEADER)
            .ok_or_else(|| ParseError::missing_header(CATEGORY_HEADER))?;
        let code_name = part
            .header(CODE_NAME_HEADER)
            .ok_or_else(|| ParseError::missing_header(CODE_NAME_HEADER))?;
        let label = part
            .name
            .as_deref()
            .map(|name| name.trim_matches('"'))
            .ok_or_else(|| ParseError::missing_header("name"))?;

        let Some(category) = Category::from_token(category) else {
            debug!("丢弃未知分类 '{}' 下的指标 '{}'", category, code_name);
            return Ok(());
        };

        let record = MetricRecord::new(label, decode_form(&part.body));
        debug!(
            "指标 {}/{} ('{}') 共 {} 个键值对",
            category,
            code_name,
            label,
            record.len()
        );

        builder.insert_record(category, code_name, record)
    }

    fn add_attachment(
        builder: &mut SnapshotBuilder,
        part: SubmissionPart,
    ) -> Result<(), ParseError> {
        let file_name = part
            .file_name
            .as_deref()
            .map(|name| name.trim_matches('"'))
            .filter(|name| !name.is_empty())
            .ok_or(ParseError::MissingFileName)?
            .to_string();

        if part.body.is_empty() {
            warn!("附件 '{}' 内容为空", file_name);
        }

        builder.add_attachment(Attachment::new(file_name, part.body));
        Ok(())
    }
}

impl Default for SubmissionParser {
    fn default() -> Self {
        Self::new(DuplicatePolicy::default())
    }
}

/// 解码 form-urlencoded 正文
///
/// 重复的键只保留第一个值，位置也按第一次出现的位置。
pub fn decode_form(body: &[u8]) -> Vec<MetricEntry> {
    let mut seen = HashSet::new();
    form_urlencoded::parse(body)
        .filter(|(key, _)| seen.insert(key.clone()))
        .map(|(key, value)| MetricEntry::new(key, value))
        .collect()
}
