//! JSON 渲染服务 - 业务能力层
//!
//! 按记录的键推断形态（字符串 / 数组 / 对象），把可上报的分类渲染成 JSON

use serde_json::{Map, Value as JsonValue};

use crate::error::MetricError;
use crate::models::{Category, MetricRecord, MetricsSnapshot};

/// 推断出的 JSON 形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferredShape {
    /// 单个字符串
    Scalar,
    /// 字符串数组
    List,
    /// 字符串对象
    Map,
}

/// 推断记录的形态
///
/// 规则按优先级：
/// 1. 只有一个键值对，且键为 `0` 或不是整数 → 字符串
/// 2. 所有键都是非负整数 → 数组
/// 3. 其余 → 对象
pub fn infer_shape(record: &MetricRecord) -> InferredShape {
    if let [only] = record.entries.as_slice() {
        if matches!(parse_index(&only.key), None | Some(0)) {
            return InferredShape::Scalar;
        }
    }

    if record
        .entries
        .iter()
        .all(|entry| parse_index(&entry.key).is_some_and(|index| index >= 0))
    {
        return InferredShape::List;
    }

    InferredShape::Map
}

/// 渲染单条记录
pub fn render_record(record: &MetricRecord) -> JsonValue {
    match infer_shape(record) {
        InferredShape::Scalar => JsonValue::String(record.entries[0].value.clone()),
        InferredShape::List => JsonValue::Array(
            record
                .values()
                .map(|value| JsonValue::String(value.to_string()))
                .collect(),
        ),
        InferredShape::Map => JsonValue::Object(
            record
                .entries
                .iter()
                .map(|entry| (entry.key.clone(), JsonValue::String(entry.value.clone())))
                .collect(),
        ),
    }
}

/// 渲染全部可上报分类，分区内以标签为键
pub fn render_sections(snapshot: &MetricsSnapshot) -> Result<JsonValue, MetricError> {
    let mut document = Map::new();

    for category in Category::REPORTABLE {
        let (Some(section), Some(bucket)) = (category.section(), snapshot.bucket(category)) else {
            continue;
        };

        let mut rendered = Map::new();
        for record in bucket.values() {
            if rendered.contains_key(&record.label) {
                return Err(MetricError::DuplicateLabel {
                    section: section.to_string(),
                    label: record.label.clone(),
                });
            }
            rendered.insert(record.label.clone(), render_record(record));
        }

        document.insert(section.to_string(), JsonValue::Object(rendered));
    }

    Ok(JsonValue::Object(document))
}

/// 键按 32 位有符号整数解析，超出范围的数字视为非整数
fn parse_index(key: &str) -> Option<i32> {
    key.trim().parse::<i32>().ok()
}
