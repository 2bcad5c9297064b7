use crate::config::Config;
use crate::models::{load_custom_metrics, Attachment, Category, MetricsSnapshot};
use crate::services::{InMemoryCatalog, SupportMessage};
use crate::utils::logging::{log_snapshot_summary, log_startup, print_final_stats, truncate_text};
use crate::workflow::SubmissionFlow;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// 附件输出子目录
pub const ATTACHMENTS_DIR: &str = "attachments";

/// 应用主结构
pub struct App {
    config: Config,
    catalog: InMemoryCatalog,
    flow: SubmissionFlow,
}

/// 一次运行的结果
#[derive(Debug, Default)]
pub struct RunReport {
    pub records: usize,
    pub attachments: usize,
    pub output_dir: PathBuf,
    /// 已启用但本次未提交的自定义指标
    pub missing_custom_metrics: Vec<String>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config.submission_file, &config.output_dir);

        let catalog = match &config.catalog_file {
            Some(path) => {
                let definitions = load_custom_metrics(Path::new(path)).await?;
                InMemoryCatalog::from_definitions(definitions)
                    .with_context(|| format!("自定义指标目录无效: {}", path))?
            }
            None => InMemoryCatalog::new(),
        };

        let flow = SubmissionFlow::new(&config);

        Ok(Self {
            config,
            catalog,
            flow,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunReport> {
        let body = fs::read(&self.config.submission_file)
            .await
            .with_context(|| format!("无法读取报文文件: {}", self.config.submission_file))?;
        info!("📥 已读取报文 {} 字节", body.len());

        let outcome = self
            .flow
            .run(&body, self.config.multipart_boundary.as_deref())?;

        let snapshot = outcome.processor.snapshot();
        log_snapshot_summary(snapshot);

        let missing_custom_metrics = missing_selected_metrics(&self.catalog, snapshot);
        for code_name in &missing_custom_metrics {
            warn!("⚠️ 已启用的自定义指标未提交: {}", code_name);
        }

        let output_dir = PathBuf::from(&self.config.output_dir);
        write_outputs(&output_dir, &outcome.json, &outcome.message).await?;

        let report = RunReport {
            records: snapshot.record_count(),
            attachments: outcome.processor.attachments().len(),
            output_dir,
            missing_custom_metrics,
        };

        print_final_stats(
            report.records,
            report.attachments,
            outcome.json.len(),
            &self.config.output_dir,
        );

        Ok(report)
    }
}

/// 找出已启用、但没有出现在任何上报分类中的自定义指标
fn missing_selected_metrics(catalog: &InMemoryCatalog, snapshot: &MetricsSnapshot) -> Vec<String> {
    catalog
        .selected()
        .filter(|definition| {
            !Category::REPORTABLE.iter().any(|category| {
                snapshot
                    .bucket(*category)
                    .is_some_and(|bucket| bucket.contains_key(&definition.code_name))
            })
        })
        .map(|definition| definition.code_name.clone())
        .collect()
}

/// 写出 metrics.json、message.txt 和附件
async fn write_outputs(output_dir: &Path, json: &str, message: &SupportMessage) -> Result<()> {
    let attachments_dir = output_dir.join(ATTACHMENTS_DIR);
    fs::create_dir_all(&attachments_dir)
        .await
        .with_context(|| format!("无法创建输出目录: {}", attachments_dir.display()))?;

    let json_path = output_dir.join("metrics.json");
    fs::write(&json_path, json)
        .await
        .with_context(|| format!("无法写入: {}", json_path.display()))?;

    let message_path = output_dir.join("message.txt");
    let message_text = format!("{}\n\n{}\n", message.subject, message.body);
    fs::write(&message_path, message_text)
        .await
        .with_context(|| format!("无法写入: {}", message_path.display()))?;
    info!("✉️ 消息主题: {}", truncate_text(&message.subject, 60));

    let names = unique_file_names(&message.attachments);
    for (attachment, name) in message.attachments.iter().zip(&names) {
        let path = attachments_dir.join(name);
        fs::write(&path, &attachment.content)
            .await
            .with_context(|| format!("无法写入附件: {}", path.display()))?;
    }

    info!(
        "✓ 已写出 {} 个附件 ({} 字节)",
        message.attachments.len(),
        message.attachment_bytes()
    );
    Ok(())
}

/// 为每个附件分配互不重复的输出文件名
///
/// 重名时追加 `-1`、`-2`…，直到不与任何已分配的名字冲突。
fn unique_file_names(attachments: &[Attachment]) -> Vec<String> {
    let mut used = HashSet::new();
    attachments
        .iter()
        .enumerate()
        .map(|(index, attachment)| {
            let base = safe_file_name(&attachment.file_name, index);
            let mut name = base.clone();
            let mut counter = 1;
            while !used.insert(name.clone()) {
                name = format!("{}-{}", base, counter);
                counter += 1;
            }
            name
        })
        .collect()
}

/// 只保留文件名的最后一段，防止写出输出目录
fn safe_file_name(file_name: &str, index: usize) -> String {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
        .unwrap_or_else(|| format!("attachment-{}", index))
}
