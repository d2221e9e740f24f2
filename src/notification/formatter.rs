//! 事件格式化模块 - 将变更事件转换为 webhook 消息
//!
//! 流程：
//! 1. 按目标配置过滤（事件类型、日志类型/动作、命名空间）
//! 2. 选择颜色和 emoji
//! 3. 通过 `LinkRenderer` 生成带链接的描述
//! 4. 组装 payload 并合并 `request_override`
//!
//! 被过滤的事件返回 `None`，不是错误。格式化过程本身不会失败。

use tracing::{debug, warn};

use super::constants::{self, keys, PriorityLookup, COLOR_DEFAULT};
use super::event::{ChangeEvent, EventKind};
use super::link_renderer::LinkRenderer;
use super::payload::NotificationPayload;
use super::sanitize::clean_comment;
use crate::config::DestinationConfig;
use crate::wiki::{ns, CommentStore, EntityResolver, InlineComments, MessageSource};

/// 事件格式化器，只借用配置和协作方，可在多个线程间共享
pub struct EventFormatter<'a> {
    destination: &'a DestinationConfig,
    username: &'a str,
    resolver: &'a dyn EntityResolver,
    messages: &'a dyn MessageSource,
    comments: &'a dyn CommentStore,
}

impl<'a> EventFormatter<'a> {
    pub fn new(
        destination: &'a DestinationConfig,
        username: &'a str,
        resolver: &'a dyn EntityResolver,
        messages: &'a dyn MessageSource,
    ) -> Self {
        Self {
            destination,
            username,
            resolver,
            messages,
            comments: &InlineComments,
        }
    }

    /// 替换编辑摘要来源
    pub fn with_comment_store(mut self, comments: &'a dyn CommentStore) -> Self {
        self.comments = comments;
        self
    }

    /// 格式化为最终发送的 JSON 字符串；事件被过滤时返回 None
    pub fn format(&self, event: &ChangeEvent) -> Option<String> {
        let payload = self.build_payload(event)?;
        match payload.to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                warn!(error = %e, kind = %event.kind, title = %event.title, "Failed to serialize payload");
                None
            }
        }
    }

    /// 构建 payload；事件被过滤时返回 None
    pub fn build_payload(&self, event: &ChangeEvent) -> Option<NotificationPayload> {
        if let Some(reason) = self.omission_reason(event) {
            debug!(kind = %event.kind, title = %event.title, reason, "Event omitted");
            return None;
        }

        let renderer = LinkRenderer::new(self.resolver, self.messages)
            .with_tools(&self.destination.user_tools, &self.destination.page_tools);

        let payload = match event.kind {
            EventKind::Log => self.build_log(event, &renderer),
            EventKind::Edit | EventKind::New => self.build_content(event, &renderer),
            EventKind::External | EventKind::Categorize => {
                debug!(kind = %event.kind, "Event kind is never notified");
                return None;
            }
        };

        Some(payload.with_overrides(self.destination.request_override.clone()))
    }

    /// 事件被过滤的原因，不过滤时返回 None
    pub fn omission_reason(&self, event: &ChangeEvent) -> Option<&'static str> {
        let dest = self.destination;

        if dest.omit_types.contains(&event.kind) {
            return Some("omitted event kind");
        }

        if event.kind == EventKind::Log {
            let log_type = event.log_type();
            if dest.omit_log_types.iter().any(|t| t == log_type) {
                return Some("omitted log type");
            }
            let pair = format!("{}/{}", log_type, event.log_action());
            if dest.omit_log_actions.iter().any(|a| *a == pair) {
                return Some("omitted log action");
            }
        }

        if dest.omit_namespaces.contains(&event.namespace) {
            return Some("omitted namespace");
        }

        None
    }

    /// 日志事件：`emoji 用户 描述`
    fn build_log(&self, event: &ChangeEvent, renderer: &LinkRenderer<'_>) -> NotificationPayload {
        let comment = renderer.linkify(&clean_comment(&event.action_comment), None);
        let color = constants::log_color(event.log_type());
        let emoji = PriorityLookup::log_emoji(event.log_type(), event.log_action())
            .resolve(self.messages)
            .unwrap_or_default();
        let performer = self.render_performer(event, renderer);

        let description = [emoji, performer, comment].join(" ");
        NotificationPayload::new(description, color, self.username)
    }

    /// 编辑/新建事件：本地化模板 + 大小变化，摘要单独放在字段里
    fn build_content(&self, event: &ChangeEvent, renderer: &LinkRenderer<'_>) -> NotificationPayload {
        let comment = clean_comment(&self.comments.comment(event));

        let mut flags = vec![event.kind.as_str()];
        if event.minor {
            flags.push("minor");
        }
        if event.bot {
            flags.push("bot");
        }
        let key = format!("{}-{}", keys::LINE_PREFIX, flags.join("-"));

        let performer_name = self
            .resolver
            .user(&event.performer)
            .map(|u| u.name)
            .unwrap_or_else(|| event.performer.clone());
        let mut params = vec![self.render_performer(event, renderer), performer_name];
        params.extend(self.target_params(event, renderer));

        let message = self.messages.text(&key, &params);
        let size = event
            .size_delta()
            .map(|delta| {
                self.messages
                    .text(keys::HISTORY_SIZE, &[self.messages.format_num(delta)])
            })
            .unwrap_or_default();

        let description = [message, size].join(" ");
        let color = constants::action_color(event.kind).unwrap_or(COLOR_DEFAULT);

        let payload = NotificationPayload::new(description, color, self.username);
        if comment.is_empty() {
            payload
        } else {
            payload.with_field(self.messages.msg(keys::SUMMARY), comment)
        }
    }

    /// 模板的 `$3`（及 `$4`）参数
    ///
    /// 用户页的编辑对象就是用户本身，渲染为用户链接和用户名；
    /// 其他页面渲染为带工具和 diff 的页面链接。
    fn target_params(&self, event: &ChangeEvent, renderer: &LinkRenderer<'_>) -> Vec<String> {
        if event.namespace == ns::USER {
            if let Some(target) = self.resolver.user(&event.title) {
                return vec![renderer.render_user(&target), target.name];
            }
        }

        let page = match self.resolver.title_in(event.namespace, &event.title) {
            Some(title) => renderer.render_page(&title, event.revision_pair()),
            None => event.title.clone(),
        };
        vec![page]
    }

    /// 操作者链接，无法解析时退回原始用户名
    fn render_performer(&self, event: &ChangeEvent, renderer: &LinkRenderer<'_>) -> String {
        match self.resolver.user(&event.performer) {
            Some(user) => renderer.render_user(&user),
            None => event.performer.clone(),
        }
    }
}
