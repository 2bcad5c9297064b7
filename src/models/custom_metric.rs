use serde::{Deserialize, Serialize};

/// 自定义指标定义
///
/// 描述一个可被客户端采集的自定义指标，由 `CustomMetricProvider` 持久化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomMetricDefinition {
    /// 主键，0 表示尚未保存
    #[serde(default)]
    pub id: i32,
    pub code_name: String,
    pub display_name: String,
    /// 实现该指标的程序集
    pub assembly_name: String,
    /// 实现该指标的类
    pub class_name: String,
    /// 父级指标的 codeName
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// 是否启用
    #[serde(default)]
    pub selected: bool,
}

impl CustomMetricDefinition {
    /// 创建一个尚未保存的定义
    pub fn new(
        code_name: impl Into<String>,
        display_name: impl Into<String>,
        assembly_name: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            code_name: code_name.into(),
            display_name: display_name.into(),
            assembly_name: assembly_name.into(),
            class_name: class_name.into(),
            parent: None,
            selected: false,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}
