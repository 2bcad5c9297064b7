use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 指标中的单个键值对
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub key: String,
    pub value: String,
}

impl MetricEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 一个指标的记录：显示标签 + 按提交顺序排列的键值对
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricRecord {
    pub label: String,
    pub entries: Vec<MetricEntry>,
}

impl MetricRecord {
    pub fn new(label: impl Into<String>, entries: Vec<MetricEntry>) -> Self {
        Self {
            label: label.into(),
            entries,
        }
    }

    /// 第一个键值对的值
    pub fn first_value(&self) -> Option<&str> {
        self.entries.first().map(|e| e.value.as_str())
    }

    /// 所有值（丢弃键）
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 随指标一起提交的附件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }
}

/// 读取指标时由调用方选择的形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricShape {
    /// 单个值（只取第一个键值对的值）
    SingleValue,
    /// 值列表（丢弃键）
    ValueList,
    /// 键值映射（重复键后者覆盖前者）
    KeyValueMap,
}

/// 指标读取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricValue {
    Single(Option<String>),
    List(Vec<String>),
    Map(IndexMap<String, String>),
}

impl MetricValue {
    /// 指定形态下的空值，用于指标不存在的情况
    pub fn empty(shape: MetricShape) -> Self {
        match shape {
            MetricShape::SingleValue => MetricValue::Single(None),
            MetricShape::ValueList => MetricValue::List(Vec::new()),
            MetricShape::KeyValueMap => MetricValue::Map(IndexMap::new()),
        }
    }

    /// 按形态投影一条记录
    pub fn project(record: &MetricRecord, shape: MetricShape) -> Self {
        match shape {
            MetricShape::SingleValue => {
                MetricValue::Single(record.first_value().map(str::to_string))
            }
            MetricShape::ValueList => {
                MetricValue::List(record.values().map(str::to_string).collect())
            }
            MetricShape::KeyValueMap => MetricValue::Map(
                record
                    .entries
                    .iter()
                    .map(|e| (e.key.clone(), e.value.clone()))
                    .collect(),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            MetricValue::Single(value) => value.is_none(),
            MetricValue::List(values) => values.is_empty(),
            MetricValue::Map(map) => map.is_empty(),
        }
    }
}

/// 提交表单中的字段：标签 + 第一个值
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub label: String,
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MetricRecord {
        MetricRecord::new(
            "Modules",
            vec![
                MetricEntry::new("a", "1"),
                MetricEntry::new("b", "2"),
                MetricEntry::new("a", "3"),
            ],
        )
    }

    #[test]
    fn test_project_single_takes_first_value() {
        assert_eq!(
            MetricValue::project(&record(), MetricShape::SingleValue),
            MetricValue::Single(Some("1".to_string()))
        );
    }

    #[test]
    fn test_project_list_keeps_order() {
        assert_eq!(
            MetricValue::project(&record(), MetricShape::ValueList),
            MetricValue::List(vec!["1".into(), "2".into(), "3".into()])
        );
    }

    #[test]
    fn test_project_map_last_write_wins() {
        let MetricValue::Map(map) = MetricValue::project(&record(), MetricShape::KeyValueMap)
        else {
            panic!("应为 Map");
        };
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], "3");
        assert_eq!(map["b"], "2");
    }

    #[test]
    fn test_empty_defaults() {
        assert!(MetricValue::empty(MetricShape::SingleValue).is_empty());
        assert!(MetricValue::empty(MetricShape::ValueList).is_empty());
        assert!(MetricValue::empty(MetricShape::KeyValueMap).is_empty());
        assert_eq!(
            MetricValue::project(&MetricRecord::default(), MetricShape::SingleValue),
            MetricValue::Single(None)
        );
    }
}
