//! # Support Metrics
//!
//! 处理支持请求中随附的诊断指标：解析 multipart 提交，按分类归档，输出 JSON
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只认识字节和头部
//! - `MultipartDecoder` - 把原始报文拆成 `SubmissionPart`
//!
//! ### ② 业务能力层（Services）
//! - `SubmissionParser` - 按分类和 codeName 归档，产出不可变快照
//! - `MetricsProcessor` - 按形态读取指标、表单字段视图、附件、JSON
//! - `json_renderer` - 形态推断（字符串 / 数组 / 对象）
//! - `SupportMessage` - 组装发往支持系统的消息
//! - `InMemoryCatalog` - 自定义指标定义目录
//!
//! ### ③ 流程层（Workflow）
//! - `SubmissionFlow` - 解码 → 解析 → 渲染 → 组装
//!
//! ### ④ 应用层
//! - `App` - 读写文件、加载目录、输出统计
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{App, RunReport};
pub use config::Config;
pub use error::{AppError, AppResult, CatalogError, MetricError, ParseError};
pub use infrastructure::MultipartDecoder;
pub use models::{
    Attachment, Category, CustomMetricDefinition, DuplicatePolicy, MetricShape, MetricValue,
    MetricsSnapshot, SubmissionPart,
};
pub use services::{
    CustomMetricProvider, InMemoryCatalog, MetricsProcessor, SubmissionParser, SupportMessage,
};
pub use workflow::{SubmissionFlow, SubmissionOutcome};
