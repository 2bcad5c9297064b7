use crate::models::DuplicatePolicy;
use tracing::warn;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 原始 multipart 报文文件
    pub submission_file: String,
    /// multipart 分隔符，为空时从报文嗅探
    pub multipart_boundary: Option<String>,
    /// 输出目录（metrics.json / message.txt / attachments）
    pub output_dir: String,
    /// codeName 重复时的处理策略
    pub duplicate_policy: DuplicatePolicy,
    /// 自定义指标目录（TOML）
    pub catalog_file: Option<String>,
    /// 作为消息主题的表单字段 codeName
    pub subject_field: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            submission_file: "submission.bin".to_string(),
            multipart_boundary: None,
            output_dir: "output".to_string(),
            duplicate_policy: DuplicatePolicy::Fail,
            catalog_file: None,
            subject_field: "subject".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取配置，缺失或无效的值使用默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let duplicate_policy = match non_empty("DUPLICATE_POLICY") {
            Some(value) => value.parse().unwrap_or_else(|e| {
                warn!("{}，使用默认值", e);
                default.duplicate_policy
            }),
            None => default.duplicate_policy,
        };

        Self {
            submission_file: non_empty("SUBMISSION_FILE").unwrap_or(default.submission_file),
            multipart_boundary: non_empty("MULTIPART_BOUNDARY").or(default.multipart_boundary),
            output_dir: non_empty("OUTPUT_DIR").unwrap_or(default.output_dir),
            duplicate_policy,
            catalog_file: non_empty("CATALOG_FILE").or(default.catalog_file),
            subject_field: non_empty("SUBJECT_FIELD").unwrap_or(default.subject_field),
            verbose_logging: non_empty("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
        }
    }
}
