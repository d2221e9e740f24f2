//! 颜色、消息键等常量，以及按优先级查找的工具

use super::event::EventKind;
use crate::wiki::MessageSource;

/// 未映射事件类型的颜色
pub const COLOR_DEFAULT: u32 = 0x000000;

/// 按事件类型的颜色
pub const COLOR_MAP_ACTION: &[(EventKind, u32)] = &[
    (EventKind::Edit, 0xfffa00),
    (EventKind::New, 0x36a64f),
    (EventKind::Log, 0xa0a0a0),
];

/// 按日志类型的颜色
pub const COLOR_MAP_LOG: &[(&str, u32)] = &[
    ("block", 0xff2d2d),
    ("delete", 0xd3302c),
    ("import", 0x8a8a8a),
    ("merge", 0x9b59b6),
    ("move", 0x2e86de),
    ("newusers", 0x2ecc71),
    ("patrol", 0x7bc96f),
    ("protect", 0xf39c12),
    ("rights", 0x8e44ad),
    ("upload", 0x1abc9c),
];

/// 消息键
pub mod keys {
    pub const SUMMARY: &str = "rcfeed-summary";
    pub const LINE_PREFIX: &str = "rcfeed-line";
    pub const EMOJI_LOG_PREFIX: &str = "rcfeed-emoji-log";
    pub const HISTORY_SIZE: &str = "historysize";
    pub const PIPE_SEPARATOR: &str = "pipe-separator";
    pub const PARENTHESES: &str = "parentheses";
    pub const DIFF: &str = "diff";
}

/// 事件类型对应的颜色
pub fn action_color(kind: EventKind) -> Option<u32> {
    COLOR_MAP_ACTION
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, color)| *color)
}

/// 日志颜色：先按日志类型，再退回通用日志颜色
pub fn log_color(log_type: &str) -> u32 {
    COLOR_MAP_LOG
        .iter()
        .find(|(t, _)| *t == log_type)
        .map(|(_, color)| *color)
        .or_else(|| action_color(EventKind::Log))
        .unwrap_or(COLOR_DEFAULT)
}

/// 按顺序尝试多个消息键，返回第一个存在的消息
#[derive(Debug, Clone, Default)]
pub struct PriorityLookup {
    keys: Vec<String>,
}

impl PriorityLookup {
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// 日志 emoji：`<type>-<action>` 优先，其次 `<type>`
    pub fn log_emoji(log_type: &str, log_action: &str) -> Self {
        Self::new([
            format!("{}-{}-{}", keys::EMOJI_LOG_PREFIX, log_type, log_action),
            format!("{}-{}", keys::EMOJI_LOG_PREFIX, log_type),
        ])
    }

    /// 第一个存在的键对应的文本，全部不存在时返回 None
    pub fn resolve(&self, messages: &dyn MessageSource) -> Option<String> {
        self.keys
            .iter()
            .find(|key| messages.exists(key))
            .map(|key| messages.msg(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::MessageCatalog;

    #[test]
    fn test_action_color() {
        assert_eq!(action_color(EventKind::New), Some(0x36a64f));
        assert_eq!(action_color(EventKind::External), None);
    }

    #[test]
    fn test_log_color_fallback() {
        assert_eq!(log_color("block"), 0xff2d2d);
        assert_eq!(log_color("abusefilter"), 0xa0a0a0);
    }

    #[test]
    fn test_priority_lookup_order() {
        let messages = MessageCatalog::empty()
            .with_message("a", "first")
            .with_message("b", "second");

        let lookup = PriorityLookup::new(["missing".to_string(), "b".to_string(), "a".to_string()]);
        assert_eq!(lookup.resolve(&messages).as_deref(), Some("second"));

        let lookup = PriorityLookup::new(["missing".to_string()]);
        assert_eq!(lookup.resolve(&messages), None);
    }

    #[test]
    fn test_log_emoji_prefers_action_key() {
        let messages = MessageCatalog::bundled();
        let specific = PriorityLookup::log_emoji("protect", "unprotect").resolve(&messages);
        assert_eq!(specific.as_deref(), Some("🔓"));

        let general = PriorityLookup::log_emoji("protect", "modify").resolve(&messages);
        assert_eq!(general.as_deref(), Some("🔒"));

        assert_eq!(PriorityLookup::log_emoji("abusefilter", "hit").resolve(&messages), None);
    }
}
