//! 摘要清理 - 去掉换行并解码 HTML 字符引用

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `&name;`、`&#123;`、`&#x7B;` 三种字符引用
static CHAR_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]+)|#[xX]([0-9a-fA-F]+)|([a-zA-Z][a-zA-Z0-9]*));")
        .expect("invalid char reference pattern")
});

/// 清理摘要文本：`\n` 换成空格，`\r` 删除，再解码字符引用
pub fn clean_comment(text: &str) -> String {
    let text = text.replace('\n', " ").replace('\r', "");
    decode_char_references(&text)
}

/// 解码 HTML 字符引用
///
/// 数字引用指向无效码点时替换为 U+FFFD；无法识别的命名实体保持原样。
pub fn decode_char_references(text: &str) -> String {
    CHAR_REFERENCE
        .replace_all(text, |caps: &Captures| {
            if let Some(dec) = caps.get(1) {
                numeric_reference(dec.as_str().parse::<u32>().ok()).to_string()
            } else if let Some(hex) = caps.get(2) {
                numeric_reference(u32::from_str_radix(hex.as_str(), 16).ok()).to_string()
            } else {
                // 完整的 HTML 命名实体表
                html_escape::decode_html_entities(&caps[0]).into_owned()
            }
        })
        .into_owned()
}

/// 数字引用对应的字符，超出范围或落在控制字符、代理区时为 U+FFFD
fn numeric_reference(cp: Option<u32>) -> char {
    cp.and_then(valid_code_point)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn valid_code_point(cp: u32) -> Option<char> {
    match cp {
        0x09 | 0x0a | 0x0d => char::from_u32(cp),
        0x20..=0xd7ff | 0xe000..=0xfffd | 0x10000..=0x10ffff => char::from_u32(cp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_comment_line_breaks() {
        assert_eq!(clean_comment("line one\nline two"), "line one line two");
        assert_eq!(clean_comment("windows\r\nstyle"), "windows style");
    }

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(clean_comment("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(clean_comment("&quot;quoted&quot;"), "\"quoted\"");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_char_references("&#39;x&#39;"), "'x'");
        assert_eq!(decode_char_references("&#x263A;"), "☺");
    }

    #[test]
    fn test_decode_full_entity_table() {
        assert_eq!(clean_comment("caf&eacute; &uuml;ber &hearts;"), "café über ♥");
        assert_eq!(decode_char_references("&frac12; &Omega; &rarr;"), "½ Ω →");
    }

    #[test]
    fn test_invalid_numeric_references_become_replacement_char() {
        assert_eq!(clean_comment("a&#0;b"), "a\u{FFFD}b");
        assert_eq!(decode_char_references("&#xD800;"), "\u{FFFD}");
        assert_eq!(decode_char_references("&#99999999999;"), "\u{FFFD}");
    }

    #[test]
    fn test_unknown_named_references_kept() {
        assert_eq!(decode_char_references("&bogus;"), "&bogus;");
        assert_eq!(decode_char_references("AT&T"), "AT&T");
    }

    #[test]
    fn test_decode_is_single_pass() {
        assert_eq!(decode_char_references("&amp;lt;"), "&lt;");
    }
}
