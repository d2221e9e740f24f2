//! 变更事件 - 一次 wiki 变更（编辑、新建页面、日志操作）的只读记录

use serde::{Deserialize, Serialize};

/// 事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// 页面编辑
    Edit,
    /// 新建页面
    New,
    /// 日志操作（删除、封禁、移动等）
    Log,
    /// 外部来源的变更
    External,
    /// 分类成员变更
    Categorize,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Edit => "edit",
            EventKind::New => "new",
            EventKind::Log => "log",
            EventKind::External => "external",
            EventKind::Categorize => "categorize",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 变更事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: EventKind,
    /// 目标页面的命名空间
    #[serde(default)]
    pub namespace: i32,
    /// 目标页面标题（不含命名空间前缀）
    pub title: String,
    /// 操作者用户名
    pub performer: String,
    /// 编辑摘要
    #[serde(default)]
    pub comment: String,
    /// 日志操作生成的描述文本
    #[serde(default)]
    pub action_comment: String,
    #[serde(default)]
    pub old_len: Option<i64>,
    #[serde(default)]
    pub new_len: Option<i64>,
    #[serde(default)]
    pub log_type: Option<String>,
    #[serde(default)]
    pub log_action: Option<String>,
    /// 本次修订 ID
    #[serde(default)]
    pub this_oldid: Option<u64>,
    /// 上一修订 ID，新页面为 0 或缺省
    #[serde(default)]
    pub last_oldid: Option<u64>,
    #[serde(default)]
    pub minor: bool,
    #[serde(default)]
    pub bot: bool,
}

impl ChangeEvent {
    /// 日志类型，缺省为空字符串
    pub fn log_type(&self) -> &str {
        self.log_type.as_deref().unwrap_or("")
    }

    /// 日志动作，缺省为空字符串
    pub fn log_action(&self) -> &str {
        self.log_action.as_deref().unwrap_or("")
    }

    /// 两个修订 ID 都存在且非 0 时返回 (this, last)
    pub fn revision_pair(&self) -> Option<(u64, u64)> {
        match (self.this_oldid, self.last_oldid) {
            (Some(this), Some(last)) if this != 0 && last != 0 => Some((this, last)),
            _ => None,
        }
    }

    /// 大小变化（新长度减旧长度），任一长度未知或溢出时返回 None
    pub fn size_delta(&self) -> Option<i64> {
        self.new_len?.checked_sub(self.old_len?)
    }
}

/// 事件构建器
#[derive(Debug, Default)]
pub struct ChangeEventBuilder {
    kind: Option<EventKind>,
    namespace: i32,
    title: Option<String>,
    performer: Option<String>,
    comment: String,
    action_comment: String,
    old_len: Option<i64>,
    new_len: Option<i64>,
    log_type: Option<String>,
    log_action: Option<String>,
    this_oldid: Option<u64>,
    last_oldid: Option<u64>,
    minor: bool,
    bot: bool,
}

impl ChangeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 编辑事件
    pub fn edit(title: impl Into<String>, performer: impl Into<String>) -> Self {
        Self::new().kind(EventKind::Edit).title(title).performer(performer)
    }

    /// 新建页面事件
    pub fn new_page(title: impl Into<String>, performer: impl Into<String>) -> Self {
        Self::new().kind(EventKind::New).title(title).performer(performer)
    }

    /// 日志事件
    pub fn log(
        log_type: impl Into<String>,
        log_action: impl Into<String>,
        title: impl Into<String>,
        performer: impl Into<String>,
    ) -> Self {
        let mut builder = Self::new().kind(EventKind::Log).title(title).performer(performer);
        builder.log_type = Some(log_type.into());
        builder.log_action = Some(log_action.into());
        builder
    }

    pub fn kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn namespace(mut self, namespace: i32) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn performer(mut self, performer: impl Into<String>) -> Self {
        self.performer = Some(performer.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn action_comment(mut self, comment: impl Into<String>) -> Self {
        self.action_comment = comment.into();
        self
    }

    /// 设置修改前后长度
    pub fn lengths(mut self, old_len: i64, new_len: i64) -> Self {
        self.old_len = Some(old_len);
        self.new_len = Some(new_len);
        self
    }

    /// 设置修订 ID
    pub fn revisions(mut self, this_oldid: u64, last_oldid: u64) -> Self {
        self.this_oldid = Some(this_oldid);
        self.last_oldid = Some(last_oldid);
        self
    }

    pub fn minor(mut self, minor: bool) -> Self {
        self.minor = minor;
        self
    }

    pub fn bot(mut self, bot: bool) -> Self {
        self.bot = bot;
        self
    }

    /// 构建事件
    pub fn build(self) -> Result<ChangeEvent, &'static str> {
        let kind = self.kind.ok_or("kind is required")?;
        let title = self.title.ok_or("title is required")?;
        let performer = self.performer.ok_or("performer is required")?;

        Ok(ChangeEvent {
            kind,
            namespace: self.namespace,
            title,
            performer,
            comment: self.comment,
            action_comment: self.action_comment,
            old_len: self.old_len,
            new_len: self.new_len,
            log_type: self.log_type,
            log_action: self.log_action,
            this_oldid: self.this_oldid,
            last_oldid: self.last_oldid,
            minor: self.minor,
            bot: self.bot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_fields() {
        assert!(ChangeEventBuilder::new().build().is_err());
        assert!(ChangeEventBuilder::new().kind(EventKind::Edit).build().is_err());
        assert!(ChangeEventBuilder::edit("Foo", "Alice").build().is_ok());
    }

    #[test]
    fn test_revision_pair() {
        let event = ChangeEventBuilder::edit("Foo", "Alice").revisions(11, 10).build().unwrap();
        assert_eq!(event.revision_pair(), Some((11, 10)));

        // 新页面没有上一修订
        let event = ChangeEventBuilder::new_page("Foo", "Alice").revisions(11, 0).build().unwrap();
        assert_eq!(event.revision_pair(), None);
    }

    #[test]
    fn test_size_delta() {
        let event = ChangeEventBuilder::edit("Foo", "Alice").lengths(100, 80).build().unwrap();
        assert_eq!(event.size_delta(), Some(-20));

        let event = ChangeEventBuilder::edit("Foo", "Alice").build().unwrap();
        assert_eq!(event.size_delta(), None);
    }

    #[test]
    fn test_size_delta_overflow_is_none() {
        let event = ChangeEventBuilder::edit("Foo", "Alice").lengths(i64::MIN, 1).build().unwrap();
        assert_eq!(event.size_delta(), None);

        let event = ChangeEventBuilder::edit("Foo", "Alice").lengths(-1, i64::MAX).build().unwrap();
        assert_eq!(event.size_delta(), None);
    }

    #[test]
    fn test_deserialize_from_json() {
        let event: ChangeEvent = serde_json::from_str(
            r#"{"kind": "log", "title": "Bob", "namespace": 2, "performer": "Alice",
                "log_type": "block", "log_action": "block", "action_comment": "blocked Bob"}"#,
        )
        .unwrap();
        assert_eq!(event.kind, EventKind::Log);
        assert_eq!(event.log_type(), "block");
        assert!(!event.minor);
    }
}
