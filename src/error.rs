use thiserror::Error;

use crate::models::Category;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 提交内容解析错误
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 指标读取或渲染错误
    #[error("指标错误: {0}")]
    Metric(#[from] MetricError),
    /// JSON 序列化失败
    #[error("JSON序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// 提交内容解析错误
///
/// 任何一个都会让整次提交失败，不会留下部分结果。
#[derive(Debug, Error)]
pub enum ParseError {
    /// 同一分类下出现重复的 codeName
    #[error("分类 {category} 中的指标 '{code_name}' 重复")]
    DuplicateCodeName { category: Category, code_name: String },
    /// 表单字段缺少必需的头部
    #[error("表单字段缺少头部 '{header}'")]
    MissingHeader { header: String },
    /// 附件缺少文件名
    #[error("附件缺少文件名")]
    MissingFileName,
    /// multipart 报文格式错误
    #[error("multipart 报文格式错误: {reason}")]
    MalformedBody { reason: String },
}

/// 指标读取或渲染错误
#[derive(Debug, Error)]
pub enum MetricError {
    /// 该分类不能通过指标访问器读取（例如附件）
    #[error("分类 {0} 不支持按指标读取，附件请使用 attachments()")]
    UnsupportedCategory(Category),
    /// 同一分区里两个指标使用了相同的标签
    #[error("分区 '{section}' 中的标签 '{label}' 重复")]
    DuplicateLabel { section: String, label: String },
}

/// 自定义指标目录错误
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 指标定义不存在
    #[error("自定义指标 #{id} 不存在")]
    NotFound { id: i32 },
    /// codeName 已被其他定义占用
    #[error("codeName '{code_name}' 已被自定义指标 #{owner} 使用")]
    DuplicateCodeName { code_name: String, owner: i32 },
    /// codeName 为空
    #[error("codeName 不能为空")]
    EmptyCodeName,
    /// id 为负数
    #[error("自定义指标 id {id} 无效，id 必须为正数（0 表示新建）")]
    InvalidId { id: i32 },
    /// 已没有可分配的 id
    #[error("自定义指标 id 已用尽")]
    IdExhausted,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置值无法识别
    #[error("配置项 {name} 的值 '{value}' 无效，期望: {expected}")]
    InvalidValue {
        name: String,
        value: String,
        expected: String,
    },
}

// ========== 便捷构造函数 ==========

impl ParseError {
    /// 创建缺少头部错误
    pub fn missing_header(header: impl Into<String>) -> Self {
        ParseError::MissingHeader {
            header: header.into(),
        }
    }

    /// 创建报文格式错误
    pub fn malformed(reason: impl Into<String>) -> Self {
        ParseError::MalformedBody {
            reason: reason.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
