//! Feed - 持有配置和默认协作方，按需创建格式化器

use crate::config::FeedConfig;
use crate::notification::{ChangeEvent, EventFormatter, NotificationPayload};
use crate::wiki::{MessageCatalog, SiteResolver};

/// 一个通知目标的完整格式化上下文
#[derive(Debug, Clone)]
pub struct Feed {
    config: FeedConfig,
    resolver: SiteResolver,
    messages: MessageCatalog,
}

impl Feed {
    pub fn new(config: FeedConfig) -> Self {
        let resolver = SiteResolver::new(&config.site);
        let messages = MessageCatalog::bundled().with_overrides(&config.site.messages);
        Self {
            config,
            resolver,
            messages,
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn resolver(&self) -> &SiteResolver {
        &self.resolver
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    /// 创建格式化器
    pub fn formatter(&self) -> EventFormatter<'_> {
        let destination = &self.config.destination;
        EventFormatter::new(
            destination,
            destination.display_name(&self.config.site),
            &self.resolver,
            &self.messages,
        )
    }

    /// 构建 payload；事件被过滤时返回 None
    pub fn build_payload(&self, event: &ChangeEvent) -> Option<NotificationPayload> {
        self.formatter().build_payload(event)
    }

    /// 格式化为 JSON 字符串；事件被过滤时返回 None
    pub fn format(&self, event: &ChangeEvent) -> Option<String> {
        self.formatter().format(event)
    }
}
