use phf::phf_map;
use std::fmt;

/// 指标分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Category {
    /// 附件（二进制文件，不参与键值处理）
    Attachments,
    /// 提交表单本身的字段
    Form,
    /// 系统信息
    System,
    /// 环境变量
    Environment,
    /// 性能计数器
    Counters,
    /// 后台任务状态
    Tasks,
    /// 事件日志
    EventLog,
}

/// 路由标识 → 分类
static CATEGORY_TOKENS: phf::Map<&'static str, Category> = phf_map! {
    "form" => Category::Form,
    "support.metrics.system" => Category::System,
    "support.metrics.environment" => Category::Environment,
    "support.metrics.counters" => Category::Counters,
    "support.metrics.tasks" => Category::Tasks,
    "support.metrics.eventlog" => Category::EventLog,
};

impl Category {
    /// 会被渲染到 JSON 中的分类，按输出顺序排列
    pub const REPORTABLE: [Category; 5] = [
        Category::System,
        Category::Environment,
        Category::Counters,
        Category::Tasks,
        Category::EventLog,
    ];

    /// 从路由标识解析分类（精确匹配），未知标识返回 None
    pub fn from_token(token: &str) -> Option<Self> {
        CATEGORY_TOKENS.get(token).copied()
    }

    /// 获取路由标识，附件没有路由标识
    pub fn token(self) -> Option<&'static str> {
        match self {
            Category::Attachments => None,
            Category::Form => Some("form"),
            Category::System => Some("support.metrics.system"),
            Category::Environment => Some("support.metrics.environment"),
            Category::Counters => Some("support.metrics.counters"),
            Category::Tasks => Some("support.metrics.tasks"),
            Category::EventLog => Some("support.metrics.eventlog"),
        }
    }

    /// 获取 JSON 输出中的分区名，只有可渲染的分类才有
    pub fn section(self) -> Option<&'static str> {
        match self {
            Category::System => Some("system"),
            Category::Environment => Some("environment"),
            Category::Counters => Some("counters"),
            Category::Tasks => Some("tasks"),
            Category::EventLog => Some("eventLog"),
            Category::Attachments | Category::Form => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Attachments => "Attachments",
            Category::Form => "Form",
            Category::System => "System",
            Category::Environment => "Environment",
            Category::Counters => "Counters",
            Category::Tasks => "Tasks",
            Category::EventLog => "EventLog",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_table_is_bidirectional() {
        for category in [Category::Form]
            .into_iter()
            .chain(Category::REPORTABLE.into_iter())
        {
            let token = category.token().unwrap();
            assert_eq!(Category::from_token(token), Some(category));
        }
        assert_eq!(Category::Attachments.token(), None);
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(Category::from_token("support.metrics.unknown"), None);
        // 必须精确匹配
        assert_eq!(Category::from_token("Support.Metrics.System"), None);
        assert_eq!(Category::from_token(" form"), None);
    }

    #[test]
    fn test_sections() {
        assert_eq!(Category::EventLog.section(), Some("eventLog"));
        assert_eq!(Category::Form.section(), None);
        assert_eq!(Category::Attachments.section(), None);
    }
}
