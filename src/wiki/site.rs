//! 站点解析器 - 基于配置的标题规范化与 URL 生成

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use url::form_urlencoded;

use super::{ns, EntityResolver, Title, User};
use crate::config::SiteConfig;

/// 标题中不允许出现的字符
static INVALID_TITLE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[<>\[\]{}|\x00-\x1f\x7f]").expect("invalid title char pattern")
});

/// 标题 URL 形式的最大字节数
const MAX_TITLE_BYTES: usize = 255;

/// URL 编码后需要还原的字符，与 wiki 自身生成的链接保持一致
const URL_KEEP: [(&str, &str); 10] = [
    ("%3B", ";"),
    ("%40", "@"),
    ("%24", "$"),
    ("%21", "!"),
    ("%2A", "*"),
    ("%28", "("),
    ("%29", ")"),
    ("%2C", ","),
    ("%2F", "/"),
    ("%3A", ":"),
];

/// 基于配置的 `EntityResolver` 实现
#[derive(Debug, Clone)]
pub struct SiteResolver {
    server: String,
    article_path: String,
    script_path: String,
    namespaces: BTreeMap<i32, String>,
    aliases: Vec<(String, i32)>,
}

impl SiteResolver {
    pub fn new(config: &SiteConfig) -> Self {
        let mut namespaces: BTreeMap<i32, String> = [
            (ns::SPECIAL, "Special"),
            (ns::MAIN, ""),
            (ns::TALK, "Talk"),
            (ns::USER, "User"),
            (ns::USER_TALK, "User talk"),
            (ns::FILE, "File"),
            (7, "File talk"),
            (ns::MEDIAWIKI, "MediaWiki"),
            (9, "MediaWiki talk"),
            (ns::TEMPLATE, "Template"),
            (11, "Template talk"),
            (ns::HELP, "Help"),
            (13, "Help talk"),
            (ns::CATEGORY, "Category"),
            (15, "Category talk"),
        ]
        .into_iter()
        .map(|(id, name)| (id, name.to_string()))
        .collect();

        namespaces.insert(ns::PROJECT, config.sitename.replace('_', " "));
        namespaces.insert(ns::PROJECT + 1, format!("{} talk", config.sitename.replace('_', " ")));

        for (id, name) in &config.extra_namespaces {
            namespaces.insert(*id, name.replace('_', " "));
        }

        let aliases = vec![
            ("Image".to_string(), ns::FILE),
            ("Image talk".to_string(), 7),
            ("Project".to_string(), ns::PROJECT),
            ("Project talk".to_string(), ns::PROJECT + 1),
        ];

        Self {
            server: config.server.trim_end_matches('/').to_string(),
            article_path: config.article_path.clone(),
            script_path: config.script_path.clone(),
            namespaces,
            aliases,
        }
    }

    /// 命名空间名称
    pub fn namespace_name(&self, namespace: i32) -> Option<&str> {
        self.namespaces.get(&namespace).map(|s| s.as_str())
    }

    /// 按名称（不区分大小写）查找命名空间 ID
    pub fn namespace_id(&self, name: &str) -> Option<i32> {
        let name = name.replace('_', " ");
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.namespaces
            .iter()
            .map(|(id, n)| (n.as_str(), *id))
            .chain(self.aliases.iter().map(|(n, id)| (n.as_str(), *id)))
            .find(|(n, _)| !n.is_empty() && n.eq_ignore_ascii_case(name))
            .map(|(_, id)| id)
    }

    /// 规范化标题文本：下划线转空格、合并空白、去掉片段、首字母大写
    fn normalize_text(text: &str) -> Option<String> {
        let text = text.replace('_', " ");
        let text = match text.find('#') {
            Some(idx) => &text[..idx],
            None => text.as_str(),
        };
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

        if text.is_empty() || INVALID_TITLE_CHARS.is_match(&text) {
            return None;
        }

        let mut chars = text.chars();
        let first = chars.next()?;
        Some(first.to_uppercase().chain(chars).collect())
    }

    fn make_title(&self, namespace: i32, text: String) -> Option<Title> {
        let full_text = match self.namespace_name(namespace) {
            Some(name) if !name.is_empty() => format!("{}:{}", name, text),
            _ => text.clone(),
        };
        if full_text.len() > MAX_TITLE_BYTES {
            return None;
        }
        Some(Title {
            namespace,
            text,
            full_text,
        })
    }
}

impl EntityResolver for SiteResolver {
    fn title(&self, text: &str) -> Option<Title> {
        let text = text.trim().trim_start_matches(':');

        if let Some((prefix, rest)) = text.split_once(':') {
            if let Some(namespace) = self.namespace_id(prefix) {
                let rest = Self::normalize_text(rest)?;
                return self.make_title(namespace, rest);
            }
        }

        let text = Self::normalize_text(text)?;
        self.make_title(ns::MAIN, text)
    }

    fn title_in(&self, namespace: i32, text: &str) -> Option<Title> {
        let text = Self::normalize_text(text)?;
        self.make_title(namespace, text)
    }

    fn user(&self, name: &str) -> Option<User> {
        // 用户名不能带命名空间前缀或子页面
        let main = self.title(name)?;
        if main.namespace != ns::MAIN || main.text.contains('/') {
            return None;
        }
        let user_page = self.make_title(ns::USER, main.text.clone())?;
        let talk_page = self.make_title(ns::USER_TALK, main.text.clone())?;
        Some(User {
            name: main.text,
            user_page,
            talk_page,
        })
    }

    fn special_page(&self, name: &str, subpage: &str) -> Option<Title> {
        let text = if subpage.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", name, subpage)
        };
        self.title_in(ns::SPECIAL, &text)
    }

    fn full_url(&self, title: &Title, query: &str) -> String {
        let key = encode_title(&title.db_key());
        if query.is_empty() {
            format!("{}{}", self.server, self.article_path.replace("$1", &key))
        } else {
            format!("{}{}?title={}&{}", self.server, self.script_path, key, query)
        }
    }
}

/// 标题 URL 编码，保留 wiki 链接中常见的可读字符
fn encode_title(key: &str) -> String {
    let mut encoded: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
    for (from, to) in URL_KEEP {
        encoded = encoded.replace(from, to);
    }
    encoded
}
