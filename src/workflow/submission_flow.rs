//! 提交处理流程 - 流程层
//!
//! 核心职责：定义"一次提交"的完整处理流程
//!
//! 流程顺序：
//! 1. multipart 解码
//! 2. 按分类归档（SubmissionParser）
//! 3. 渲染 JSON
//! 4. 组装支持消息

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::infrastructure::{sniff_boundary, MultipartDecoder};
use crate::models::DuplicatePolicy;
use crate::services::{MetricsProcessor, SupportMessage};

/// 一次提交的处理结果
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub processor: MetricsProcessor,
    /// 带缩进的指标 JSON
    pub json: String,
    pub message: SupportMessage,
}

/// 提交处理流程
///
/// - 不持有任何文件或网络资源
/// - 只依赖 infrastructure 和 services
pub struct SubmissionFlow {
    policy: DuplicatePolicy,
    subject_field: String,
}

impl SubmissionFlow {
    /// 创建新的提交处理流程
    pub fn new(config: &Config) -> Self {
        Self {
            policy: config.duplicate_policy,
            subject_field: config.subject_field.clone(),
        }
    }

    pub fn with_policy(policy: DuplicatePolicy, subject_field: impl Into<String>) -> Self {
        Self {
            policy,
            subject_field: subject_field.into(),
        }
    }

    /// 处理一个原始 multipart 报文
    ///
    /// `boundary` 为空时从报文首行嗅探。
    pub fn run(&self, body: &[u8], boundary: Option<&str>) -> Result<SubmissionOutcome> {
        let boundary = match boundary {
            Some(boundary) => boundary.to_string(),
            None => sniff_boundary(body).context("无法从报文中识别 multipart 分隔符")?,
        };
        debug!("使用分隔符: {}", boundary);

        let parts = MultipartDecoder::new(&boundary)
            .decode(body)
            .context("multipart 报文解码失败")?;
        info!("📦 解码得到 {} 个部件", parts.len());

        let processor = MetricsProcessor::from_parts_with_policy(parts, self.policy)
            .context("提交内容解析失败")?;

        let json = processor.to_json().context("指标 JSON 渲染失败")?;
        let message = SupportMessage::from_processor(&processor, &self.subject_field)
            .context("支持消息组装失败")?;

        info!(
            "✓ 提交处理完成: {} 条指标, {} 个附件",
            processor.snapshot().record_count(),
            processor.attachments().len()
        );

        Ok(SubmissionOutcome {
            processor,
            json,
            message,
        })
    }
}
