use crate::models::custom_metric::CustomMetricDefinition;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 目录文件结构：`[[metric]]` 数组
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "metric")]
    metrics: Vec<CustomMetricDefinition>,
}

/// 从 TOML 文本解析自定义指标定义
pub fn parse_custom_metrics(content: &str) -> Result<Vec<CustomMetricDefinition>> {
    let file: CatalogFile = toml::from_str(content).context("无法解析自定义指标目录")?;
    Ok(file.metrics)
}

/// 从 TOML 文件加载自定义指标定义
pub async fn load_custom_metrics(path: &Path) -> Result<Vec<CustomMetricDefinition>> {
    if !path.exists() {
        anyhow::bail!("目录文件不存在: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取目录文件: {}", path.display()))?;

    let metrics = parse_custom_metrics(&content)
        .with_context(|| format!("无法解析目录文件: {}", path.display()))?;

    tracing::info!(
        "已加载 {} 个自定义指标定义: {}",
        metrics.len(),
        path.file_name().unwrap_or_default().to_string_lossy()
    );

    Ok(metrics)
}
