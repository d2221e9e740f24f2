//! 通知格式化 - 把 wiki 变更事件转换为 webhook embed 消息
//!
//! # 组成
//! 1. `LinkRenderer`：用户/页面链接渲染、摘要中 wiki 链接改写
//! 2. `EventFormatter`：过滤、分类、组装 payload
//! 3. `NotificationChannel`：投递已序列化的 payload（不重试）
//!
//! # 使用示例
//! ```ignore
//! use wiki_rc_notify::{Feed, FeedConfig};
//! use wiki_rc_notify::notification::ChangeEventBuilder;
//!
//! let feed = Feed::new(FeedConfig::default());
//! let event = ChangeEventBuilder::edit("Main Page", "Alice").build()?;
//! if let Some(payload) = feed.format(&event) {
//!     println!("{}", payload);
//! }
//! ```

pub mod channel;
pub mod constants;
pub mod event;
pub mod formatter;
pub mod link_renderer;
pub mod payload;
pub mod sanitize;
pub mod webhook;

pub use channel::{NotificationChannel, SendResult};
pub use constants::PriorityLookup;
pub use event::{ChangeEvent, ChangeEventBuilder, EventKind};
pub use formatter::EventFormatter;
pub use link_renderer::{escape_url, make_link, LinkRenderer, RenderedLink};
pub use payload::{merge_override, Embed, EmbedField, NotificationPayload};
pub use sanitize::clean_comment;
pub use webhook::{WebhookChannel, WebhookConfig};
