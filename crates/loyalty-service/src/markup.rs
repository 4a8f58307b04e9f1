//! 文本清洗与 HTML 转义

use std::sync::LazyLock;

use regex::Regex;

/// script/style 连同内容一起移除
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>")
        .expect("script/style pattern is valid")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

/// 清洗单行文本输入
///
/// 去除 HTML 标签和控制字符，连续空白折叠为一个空格，首尾去空白
pub fn sanitize_text_field(raw: &str) -> String {
    let without_scripts = SCRIPT_STYLE_RE.replace_all(raw, "");
    let without_tags = TAG_RE.replace_all(&without_scripts, "");

    without_tags
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 按字符数截断，截断后再去除尾部空白
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].trim_end().to_string(),
        None => text.to_string(),
    }
}

/// HTML 转义，用于把用户文本嵌入页面
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
