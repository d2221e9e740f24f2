//! 本地化消息目录 - 内置英文消息 + 配置覆盖
//!
//! 支持 `$1`..`$n` 参数替换，以及 `{{PLURAL:...}}` 和 `{{GENDER:...}}` 两种常见语法。
//! 不存在的键返回空字符串，不报错。

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, warn};

use super::MessageSource;

/// 内置英文消息
const BUNDLED_EN: &str = include_str!("../../i18n/en.json");

static PARAM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("invalid param pattern"));

static PLURAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{PLURAL:\s*([^|}]*)\|([^}]*)\}\}").expect("invalid plural pattern")
});

static GENDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{GENDER:\s*[^|}]*\|([^}]*)\}\}").expect("invalid gender pattern")
});

/// 基于键值表的 `MessageSource` 实现
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    /// 空目录（所有键都不存在）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 内置英文目录
    pub fn bundled() -> Self {
        let messages = match serde_json::from_str::<HashMap<String, String>>(BUNDLED_EN) {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, "Failed to parse bundled messages");
                HashMap::new()
            }
        };
        Self { messages }
    }

    /// 覆盖或新增消息
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        for (key, value) in overrides {
            self.messages.insert(key.clone(), value.clone());
        }
        self
    }

    /// 设置单条消息
    pub fn with_message(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.messages.insert(key.into(), value.into());
        self
    }

    /// 先解析 PLURAL/GENDER，再一次性替换 `$N`，参数内容不会被当作模板语法
    fn expand(template: &str, params: &[String]) -> String {
        let text = PLURAL_PATTERN.replace_all(template, |caps: &Captures| {
            let forms: Vec<&str> = caps[2].split('|').collect();
            let count = substitute(&caps[1], params)
                .replace(',', "")
                .trim()
                .parse::<i64>()
                .ok();
            match (count, forms.as_slice()) {
                (Some(1), [one, ..]) => one.to_string(),
                (_, [.., other]) => other.to_string(),
                _ => String::new(),
            }
        });

        // 没有性别信息时使用中性形式（第三个），否则取第一个
        let text = GENDER_PATTERN.replace_all(&text, |caps: &Captures| {
            let forms: Vec<&str> = caps[1].split('|').collect();
            forms
                .get(2)
                .or_else(|| forms.first())
                .map(|s| s.to_string())
                .unwrap_or_default()
        });

        substitute(&text, params)
    }
}

/// 单次替换 `$N`，没有对应参数时保留原样
fn substitute(text: &str, params: &[String]) -> String {
    PARAM_PATTERN
        .replace_all(text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| params.get(i))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

impl MessageSource for MessageCatalog {
    fn exists(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    fn text(&self, key: &str, params: &[String]) -> String {
        match self.messages.get(key) {
            Some(template) => Self::expand(template, params),
            None => {
                debug!(key, "Message key not found");
                String::new()
            }
        }
    }

    fn format_num(&self, n: i64) -> String {
        let digits = n.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        if n < 0 {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }
}
