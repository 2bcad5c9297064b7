use indexmap::IndexMap;
use std::str::FromStr;

use crate::error::{ConfigError, ParseError};
use crate::models::category::Category;
use crate::models::metric::{Attachment, MetricRecord};

/// 同一分类中 codeName 重复时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// 整次解析失败
    #[default]
    Fail,
    /// 后出现的记录覆盖先出现的（保留原位置）
    Overwrite,
}

impl FromStr for DuplicatePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(DuplicatePolicy::Fail),
            "overwrite" => Ok(DuplicatePolicy::Overwrite),
            _ => Err(ConfigError::InvalidValue {
                name: "DUPLICATE_POLICY".to_string(),
                value: s.to_string(),
                expected: "fail | overwrite".to_string(),
            }),
        }
    }
}

/// codeName → 记录，保持插入顺序
pub type MetricBucket = IndexMap<String, MetricRecord>;

/// 一次提交的完整解析结果，构建后不可变
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    form: MetricBucket,
    system: MetricBucket,
    environment: MetricBucket,
    counters: MetricBucket,
    tasks: MetricBucket,
    event_log: MetricBucket,
    attachments: Vec<Attachment>,
}

impl MetricsSnapshot {
    /// 获取某个分类的全部记录，附件分类返回 None
    pub fn bucket(&self, category: Category) -> Option<&MetricBucket> {
        match category {
            Category::Attachments => None,
            Category::Form => Some(&self.form),
            Category::System => Some(&self.system),
            Category::Environment => Some(&self.environment),
            Category::Counters => Some(&self.counters),
            Category::Tasks => Some(&self.tasks),
            Category::EventLog => Some(&self.event_log),
        }
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn into_attachments(self) -> Vec<Attachment> {
        self.attachments
    }

    /// 所有键值分类的记录总数
    pub fn record_count(&self) -> usize {
        [Category::Form]
            .into_iter()
            .chain(Category::REPORTABLE)
            .filter_map(|category| self.bucket(category))
            .map(IndexMap::len)
            .sum()
    }
}

/// 快照构建器
///
/// 只在解析期间可变，`build()` 之后交出不可变的 `MetricsSnapshot`。
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    policy: DuplicatePolicy,
    snapshot: MetricsSnapshot,
}

impl SnapshotBuilder {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            snapshot: MetricsSnapshot::default(),
        }
    }

    /// 插入一条记录
    ///
    /// 附件分类不接受记录，直接忽略。
    pub fn insert_record(
        &mut self,
        category: Category,
        code_name: impl Into<String>,
        record: MetricRecord,
    ) -> Result<(), ParseError> {
        let code_name = code_name.into();
        let policy = self.policy;
        let Some(bucket) = self.bucket_mut(category) else {
            return Ok(());
        };

        if bucket.contains_key(&code_name) && policy == DuplicatePolicy::Fail {
            return Err(ParseError::DuplicateCodeName {
                category,
                code_name,
            });
        }

        // IndexMap::insert 对已有键保留原位置
        bucket.insert(code_name, record);
        Ok(())
    }

    pub fn add_attachment(&mut self, attachment: Attachment) {
        self.snapshot.attachments.push(attachment);
    }

    pub fn build(self) -> MetricsSnapshot {
        self.snapshot
    }

    fn bucket_mut(&mut self, category: Category) -> Option<&mut MetricBucket> {
        let snapshot = &mut self.snapshot;
        match category {
            Category::Attachments => None,
            Category::Form => Some(&mut snapshot.form),
            Category::System => Some(&mut snapshot.system),
            Category::Environment => Some(&mut snapshot.environment),
            Category::Counters => Some(&mut snapshot.counters),
            Category::Tasks => Some(&mut snapshot.tasks),
            Category::EventLog => Some(&mut snapshot.event_log),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metric::MetricEntry;

    fn record(label: &str, value: &str) -> MetricRecord {
        MetricRecord::new(label, vec![MetricEntry::new("0", value)])
    }

    #[test]
    fn test_duplicate_fails_by_default() {
        let mut builder = SnapshotBuilder::default();
        builder
            .insert_record(Category::System, "os", record("OS", "Linux"))
            .unwrap();
        let err = builder
            .insert_record(Category::System, "os", record("OS", "Windows"))
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::DuplicateCodeName {
                category: Category::System,
                ref code_name,
            } if code_name == "os"
        ));
    }

    #[test]
    fn test_same_code_name_in_different_categories() {
        let mut builder = SnapshotBuilder::default();
        builder
            .insert_record(Category::System, "name", record("Name", "a"))
            .unwrap();
        builder
            .insert_record(Category::Tasks, "name", record("Name", "b"))
            .unwrap();
        assert_eq!(builder.build().record_count(), 2);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut builder = SnapshotBuilder::new(DuplicatePolicy::Overwrite);
        builder
            .insert_record(Category::Counters, "cpu", record("CPU", "10"))
            .unwrap();
        builder
            .insert_record(Category::Counters, "mem", record("Memory", "20"))
            .unwrap();
        builder
            .insert_record(Category::Counters, "cpu", record("CPU", "30"))
            .unwrap();

        let snapshot = builder.build();
        let bucket = snapshot.bucket(Category::Counters).unwrap();
        let keys: Vec<_> = bucket.keys().map(String::as_str).collect();
        assert_eq!(keys, ["cpu", "mem"]);
        assert_eq!(bucket["cpu"].first_value(), Some("30"));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Overwrite".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Overwrite);
        assert_eq!(" fail ".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Fail);
        assert!("skip".parse::<DuplicatePolicy>().is_err());
    }
}
