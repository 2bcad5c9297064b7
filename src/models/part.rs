/// 提交部件的 Content-Disposition 类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// 表单编码的指标字段
    FormField,
    /// 二进制附件
    Attachment,
    /// 不认识的类型，解析时忽略
    Other(String),
}

impl Disposition {
    /// 从 Content-Disposition 的类型部分解析（不区分大小写）
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match token.to_ascii_lowercase().as_str() {
            "form-urlencoded" | "form-field" | "form-data" => Disposition::FormField,
            "attachment" => Disposition::Attachment,
            _ => Disposition::Other(token.to_string()),
        }
    }
}

/// multipart 提交中的一个部件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPart {
    pub disposition: Disposition,
    /// Content-Disposition 的 name 参数（表单字段的显示标签）
    pub name: Option<String>,
    /// Content-Disposition 的 filename 参数
    pub file_name: Option<String>,
    /// 除 Content-Disposition 以外的头部，保持原始顺序
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl SubmissionPart {
    /// 创建一个表单字段部件，`body` 为 form-urlencoded 文本
    pub fn form_field(
        label: impl Into<String>,
        category: impl Into<String>,
        code_name: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            disposition: Disposition::FormField,
            name: Some(label.into()),
            file_name: None,
            headers: vec![
                ("category".to_string(), category.into()),
                ("codeName".to_string(), code_name.into()),
            ],
            body: body.into(),
        }
    }

    /// 创建一个附件部件
    pub fn attachment(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            disposition: Disposition::Attachment,
            name: None,
            file_name: Some(file_name.into()),
            headers: Vec::new(),
            body: content.into(),
        }
    }

    /// 按名称查找头部（不区分大小写），多个同名头部取第一个
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_parse() {
        assert_eq!(Disposition::parse("form-urlencoded"), Disposition::FormField);
        assert_eq!(Disposition::parse(" Form-Data "), Disposition::FormField);
        assert_eq!(Disposition::parse("ATTACHMENT"), Disposition::Attachment);
        assert_eq!(
            Disposition::parse("inline"),
            Disposition::Other("inline".to_string())
        );
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let part = SubmissionPart::form_field("OS", "support.metrics.system", "os", "0=Linux");
        assert_eq!(part.header("CATEGORY"), Some("support.metrics.system"));
        assert_eq!(part.header("codename"), Some("os"));
        assert_eq!(part.header("missing"), None);
    }
}
