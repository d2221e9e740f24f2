//! Wiki 协作方接口 - 标题/用户解析、本地化消息、编辑摘要
//!
//! 格式化核心只通过这里的 trait 读取 wiki 数据，测试中可以替换为假实现。

pub mod messages;
pub mod site;

pub use messages::MessageCatalog;
pub use site::SiteResolver;

use crate::notification::event::ChangeEvent;

/// 常用命名空间 ID
pub mod ns {
    pub const SPECIAL: i32 = -1;
    pub const MAIN: i32 = 0;
    pub const TALK: i32 = 1;
    pub const USER: i32 = 2;
    pub const USER_TALK: i32 = 3;
    pub const PROJECT: i32 = 4;
    pub const FILE: i32 = 6;
    pub const MEDIAWIKI: i32 = 8;
    pub const TEMPLATE: i32 = 10;
    pub const HELP: i32 = 12;
    pub const CATEGORY: i32 = 14;
}

/// 已解析的页面标题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    /// 命名空间 ID
    pub namespace: i32,
    /// 不含命名空间前缀的标题（空格形式）
    pub text: String,
    /// 含命名空间前缀的完整标题，如 `User talk:Alice`
    pub full_text: String,
}

impl Title {
    /// URL 中使用的形式（空格替换为下划线）
    pub fn db_key(&self) -> String {
        self.full_text.replace(' ', "_")
    }
}

/// 已解析的用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub user_page: Title,
    pub talk_page: Title,
}

/// 实体解析：标题、用户、特殊页面及其 URL
pub trait EntityResolver: Send + Sync {
    /// 从带前缀的文本解析标题，无效时返回 None
    fn title(&self, text: &str) -> Option<Title>;

    /// 在指定命名空间内解析标题
    fn title_in(&self, namespace: i32, text: &str) -> Option<Title>;

    /// 按用户名解析用户，用户名无效时返回 None
    fn user(&self, name: &str) -> Option<User>;

    /// 特殊页面，如 `Special:Contributions/Alice`
    fn special_page(&self, name: &str, subpage: &str) -> Option<Title>;

    /// 标题的完整 URL，`query` 非空时附加到查询串
    fn full_url(&self, title: &Title, query: &str) -> String;
}

/// 本地化消息查询
pub trait MessageSource: Send + Sync {
    /// 消息键是否存在
    fn exists(&self, key: &str) -> bool;

    /// 解析消息文本，`$1`..`$n` 替换为参数；不存在的键返回空字符串
    fn text(&self, key: &str, params: &[String]) -> String;

    /// 本地化数字格式
    fn format_num(&self, n: i64) -> String;

    /// 无参数的消息
    fn msg(&self, key: &str) -> String {
        self.text(key, &[])
    }
}

/// 编辑摘要存储
pub trait CommentStore: Send + Sync {
    fn comment(&self, event: &ChangeEvent) -> String;
}

/// 直接读取事件记录中的摘要
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineComments;

impl CommentStore for InlineComments {
    fn comment(&self, event: &ChangeEvent) -> String {
        event.comment.clone()
    }
}
