//! Wiki RC Notify - 把 wiki 最近更改事件格式化为聊天 webhook 消息

pub mod config;
pub mod feed;
pub mod notification;
pub mod wiki;

pub use config::{DestinationConfig, FeedConfig, PageTool, SiteConfig, UserTool, UserToolTarget};
pub use feed::Feed;
pub use notification::{
    ChangeEvent, ChangeEventBuilder, EventFormatter, EventKind, LinkRenderer, NotificationChannel,
    NotificationPayload, SendResult, WebhookChannel, WebhookConfig,
};
pub use wiki::{CommentStore, EntityResolver, MessageCatalog, MessageSource, SiteResolver};
