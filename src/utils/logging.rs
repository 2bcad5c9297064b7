/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::models::{Category, MetricsSnapshot};

/// 记录程序启动信息
///
/// # 参数
/// - `submission_file`: 待处理的报文文件
/// - `output_dir`: 输出目录
pub fn log_startup(submission_file: &str, output_dir: &str) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - 指标提交处理 ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📄 报文文件: {}", submission_file);
    info!("📁 输出目录: {}", output_dir);
    info!("{}", "=".repeat(60));
}

/// 记录快照中各分类的记录数
///
/// # 参数
/// - `snapshot`: 解析后的快照
pub fn log_snapshot_summary(snapshot: &MetricsSnapshot) {
    info!("\n{}", "─".repeat(60));
    for category in [Category::Form].into_iter().chain(Category::REPORTABLE) {
        let count = snapshot.bucket(category).map_or(0, |bucket| bucket.len());
        info!("  {:<12} {} 条", category.to_string(), count);
    }
    info!("  {:<12} {} 个", Category::Attachments.to_string(), snapshot.attachments().len());
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `records`: 指标记录数
/// - `attachments`: 附件数量
/// - `json_bytes`: JSON 字节数
/// - `output_dir`: 输出目录
pub fn print_final_stats(records: usize, attachments: usize, json_bytes: usize, output_dir: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 指标: {}", records);
    info!("📎 附件: {}", attachments);
    info!("🧾 JSON: {} 字节", json_bytes);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_dir);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("一二三四五", 3), "一二三...");
    }
}
