//! multipart 解码器 - 基础设施层
//!
//! 把原始的 multipart 报文拆成 `SubmissionPart`，只认识头部和字节，
//! 不认识指标分类。

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::ParseError;
use crate::models::{Disposition, SubmissionPart};

/// Content-Disposition 参数：`name="value"` 或 `name=value`
static DISPOSITION_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z][A-Za-z0-9_*-]*)\s*=\s*(?:"((?:[^"\\]|\\.)*)"|([^;]*))"#)
        .expect("Content-Disposition 参数正则无效")
});

/// multipart 报文解码器
pub struct MultipartDecoder {
    delimiter: Vec<u8>,
}

impl MultipartDecoder {
    /// 使用指定的分隔符创建解码器（不带前导 `--`）
    pub fn new(boundary: impl AsRef<str>) -> Self {
        let boundary = boundary.as_ref().trim().trim_matches('"');
        let mut delimiter = b"--".to_vec();
        delimiter.extend_from_slice(boundary.as_bytes());
        Self { delimiter }
    }

    /// 解码整个报文
    ///
    /// 第一个分隔符之前的前导内容会被忽略，结束分隔符 `--boundary--` 之后的内容同样忽略。
    pub fn decode(&self, body: &[u8]) -> Result<Vec<SubmissionPart>, ParseError> {
        if self.delimiter.len() <= 2 {
            return Err(ParseError::malformed("分隔符为空"));
        }

        let mut cursor = self
            .find_delimiter(body, 0)
            .ok_or_else(|| ParseError::malformed("找不到起始分隔符"))?
            + self.delimiter.len();

        let mut parts = Vec::new();

        loop {
            // 结束分隔符
            if body[cursor..].starts_with(b"--") {
                break;
            }

            // 跳过分隔符所在行的剩余部分
            let content_start = match find(body, b"\n", cursor) {
                Some(pos) => pos + 1,
                None => return Err(ParseError::malformed("分隔符后缺少换行")),
            };

            let next = self
                .find_delimiter(body, content_start)
                .ok_or_else(|| ParseError::malformed("找不到结束分隔符"))?;

            let content = trim_line_break(&body[content_start..next]);
            parts.push(parse_part(content)?);

            cursor = next + self.delimiter.len();
        }

        debug!("multipart 报文解码完成，共 {} 个部件", parts.len());
        Ok(parts)
    }

    /// 查找位于行首的分隔符
    fn find_delimiter(&self, body: &[u8], from: usize) -> Option<usize> {
        let mut from = from;
        while let Some(pos) = find(body, &self.delimiter, from) {
            if pos == 0 || body[pos - 1] == b'\n' {
                return Some(pos);
            }
            from = pos + 1;
        }
        None
    }
}

/// 从报文首行嗅探分隔符
pub fn sniff_boundary(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(&body[..body.len().min(1024)]);
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.strip_prefix("--"))
        .map(|boundary| boundary.trim_end_matches("--").to_string())
        .filter(|boundary| !boundary.is_empty())
}

fn parse_part(content: &[u8]) -> Result<SubmissionPart, ParseError> {
    let (header_block, body) = split_headers(content);
    let header_text = String::from_utf8_lossy(header_block);

    let mut disposition = Disposition::Other(String::new());
    let mut name = None;
    let mut file_name = None;
    let mut headers = Vec::new();

    for line in header_text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(ParseError::malformed(format!("无效的头部行: {}", line)));
        };
        let (key, value) = (key.trim(), value.trim());

        if key.eq_ignore_ascii_case("content-disposition") {
            let (kind, params) = value.split_once(';').unwrap_or((value, ""));
            disposition = Disposition::parse(kind);
            for captures in DISPOSITION_PARAM.captures_iter(params) {
                let param_value = captures
                    .get(2)
                    .or_else(|| captures.get(3))
                    .map(|m| m.as_str().trim().replace("\\\"", "\""))
                    .unwrap_or_default();
                match captures[1].to_ascii_lowercase().as_str() {
                    "name" => name = Some(param_value),
                    "filename" => file_name = Some(param_value),
                    _ => {}
                }
            }
        } else {
            headers.push((key.to_string(), value.to_string()));
        }
    }

    Ok(SubmissionPart {
        disposition,
        name,
        file_name,
        headers,
        body: body.to_vec(),
    })
}

/// 在第一个空行处分割头部和正文
fn split_headers(content: &[u8]) -> (&[u8], &[u8]) {
    // 没有头部的部件以空行开头
    if content.starts_with(b"\r\n") {
        return (&[], &content[2..]);
    }
    if content.starts_with(b"\n") {
        return (&[], &content[1..]);
    }

    let crlf = find(content, b"\r\n\r\n", 0).map(|pos| (pos, 4));
    let lf = find(content, b"\n\n", 0).map(|pos| (pos, 2));
    let split = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };

    match split {
        Some((pos, len)) => (&content[..pos], &content[pos + len..]),
        None => (content, &[]),
    }
}

fn trim_line_break(content: &[u8]) -> &[u8] {
    let content = content.strip_suffix(b"\n").unwrap_or(content);
    content.strip_suffix(b"\r").unwrap_or(content)
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}
