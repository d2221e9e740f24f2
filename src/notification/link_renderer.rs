//! 链接渲染 - 把用户、页面渲染成 `[文本](URL)` 形式，并改写摘要中的 `[[wiki 链接]]`
//!
//! webhook 不会自动解码百分号编码，URL 中的空格和括号必须预先转义，
//! 否则 `[text](url)` 语法会被截断。

use std::sync::LazyLock;

use regex::Regex;

use super::constants::keys;
use crate::config::{PageTool, UserTool, UserToolTarget};
use crate::wiki::{EntityResolver, MessageSource, Title, User};

/// `[[Target]]`
static PLAIN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^|\]]+)\]\]").expect("invalid plain link pattern"));

/// `[[Target|Label]]`
static PIPED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^|]+)\|([^\]]+)\]\]").expect("invalid piped link pattern")
});

/// URL 中需要预先转义的字符
const URL_ESCAPES: [(char, &str); 3] = [(' ', "%20"), ('(', "%28"), (')', "%29")];

/// 一个链接：目标 URL + 显示文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLink {
    pub target: String,
    pub text: String,
}

impl RenderedLink {
    pub fn new(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            text: text.into(),
        }
    }

    /// 渲染为 markup；目标为空时只返回文本
    pub fn render(&self) -> String {
        make_link(&self.target, &self.text)
    }
}

/// 生成 `[text](target)`；`target` 为空时返回原文本
pub fn make_link(target: &str, text: &str) -> String {
    if target.is_empty() {
        return text.to_string();
    }
    format!("[{}]({})", text, escape_url(target))
}

/// 转义空格和括号
pub fn escape_url(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for c in url.chars() {
        match URL_ESCAPES.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => escaped.push_str(to),
            None => escaped.push(c),
        }
    }
    escaped
}

/// 链接渲染器
pub struct LinkRenderer<'a> {
    resolver: &'a dyn EntityResolver,
    messages: &'a dyn MessageSource,
    user_tools: &'a [UserTool],
    page_tools: &'a [PageTool],
}

impl<'a> LinkRenderer<'a> {
    pub fn new(resolver: &'a dyn EntityResolver, messages: &'a dyn MessageSource) -> Self {
        Self {
            resolver,
            messages,
            user_tools: &[],
            page_tools: &[],
        }
    }

    /// 设置工具链接
    pub fn with_tools(mut self, user_tools: &'a [UserTool], page_tools: &'a [PageTool]) -> Self {
        self.user_tools = user_tools;
        self.page_tools = page_tools;
        self
    }

    /// 用户链接，配置了工具时附加 `(talk | contribs)` 之类的链接
    pub fn render_user(&self, user: &User) -> String {
        let mut rendered = make_link(&self.resolver.full_url(&user.user_page, ""), &user.name);

        if !self.user_tools.is_empty() {
            let tools: Vec<String> = self
                .user_tools
                .iter()
                .map(|tool| self.user_tool_link(user, tool).render())
                .collect();
            rendered.push(' ');
            rendered.push_str(&self.nice_tools(&tools));
        }

        rendered
    }

    fn user_tool_link(&self, user: &User, tool: &UserTool) -> RenderedLink {
        let target = match tool.target {
            UserToolTarget::Talk => Some(user.talk_page.clone()),
            UserToolTarget::Special => tool
                .special
                .as_deref()
                .and_then(|special| self.resolver.special_page(special, &user.name)),
        };
        let url = target
            .map(|title| self.resolver.full_url(&title, ""))
            .unwrap_or_default();

        let text = match (&tool.msg, &tool.text) {
            (Some(key), _) => self.messages.msg(key),
            (None, Some(text)) => text.clone(),
            (None, None) => String::new(),
        };

        RenderedLink::new(url, text)
    }

    /// 页面链接，配置了工具时附加 `(edit | hist | diff)` 之类的链接；
    /// diff 只在两个修订 ID 都存在时出现
    pub fn render_page(&self, title: &Title, revisions: Option<(u64, u64)>) -> String {
        let mut rendered = make_link(&self.resolver.full_url(title, ""), &title.full_text);

        if !self.page_tools.is_empty() {
            let mut tools: Vec<String> = self
                .page_tools
                .iter()
                .map(|tool| {
                    make_link(
                        &self.resolver.full_url(title, &tool.query),
                        &self.messages.msg(&tool.msg),
                    )
                })
                .collect();

            if let Some((this_oldid, last_oldid)) = revisions {
                let query = format!("diff={}&oldid={}", this_oldid, last_oldid);
                tools.push(make_link(
                    &self.resolver.full_url(title, &query),
                    &self.messages.msg(keys::DIFF),
                ));
            }

            rendered.push(' ');
            rendered.push_str(&self.nice_tools(&tools));
        }

        rendered
    }

    /// 改写自由文本中的链接
    ///
    /// 1. 文本以 `actor` 的用户名开头时，把这段前缀换成用户链接
    /// 2. `[[Target]]` 换成带工具的页面链接，`[[Target|Label]]` 换成以 Label 为文本的链接
    ///
    /// 替换按子串进行：同一片段出现多次时全部替换。无法解析的目标保持原样。
    pub fn linkify(&self, text: &str, actor: Option<&User>) -> String {
        let mut text = text.to_string();

        if let Some(user) = actor {
            if text.starts_with(&user.name) {
                text = format!("{}{}", self.render_user(user), &text[user.name.len()..]);
            }
        }

        let plain: Vec<(String, String)> = PLAIN_LINK
            .captures_iter(&text)
            .map(|caps| (caps[0].to_string(), caps[1].to_string()))
            .collect();
        for (fragment, target) in plain {
            let Some(title) = self.resolver.title(&target) else {
                continue;
            };
            let replacement = self.render_page(&title, None);
            text = text.replace(&fragment, &replacement);
        }

        let piped: Vec<(String, String, String)> = PIPED_LINK
            .captures_iter(&text)
            .map(|caps| (caps[0].to_string(), caps[1].to_string(), caps[2].to_string()))
            .collect();
        for (fragment, target, label) in piped {
            let Some(title) = self.resolver.title(&target) else {
                continue;
            };
            let replacement = make_link(&self.resolver.full_url(&title, ""), &label);
            text = text.replace(&fragment, &replacement);
        }

        text
    }

    /// `(a | b | c)`
    fn nice_tools(&self, tools: &[String]) -> String {
        let joined = tools.join(&self.messages.msg(keys::PIPE_SEPARATOR));
        self.messages.text(keys::PARENTHESES, &[joined])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::wiki::{MessageCatalog, SiteResolver};

    fn fixtures() -> (SiteResolver, MessageCatalog) {
        (
            SiteResolver::new(&SiteConfig::default()),
            MessageCatalog::bundled(),
        )
    }

    #[test]
    fn test_make_link_empty_target() {
        assert_eq!(make_link("", "text"), "text");
    }

    #[test]
    fn test_make_link_escapes_url() {
        assert_eq!(make_link("http://x/y (1)", "y"), "[y](http://x/y%20%281%29)");
        assert_eq!(escape_url("http://x/y (1)"), "http://x/y%20%281%29");
    }

    #[test]
    fn test_render_user_without_tools() {
        let (resolver, messages) = fixtures();
        let renderer = LinkRenderer::new(&resolver, &messages);
        let user = resolver.user("Alice").unwrap();

        assert_eq!(renderer.render_user(&user), "[Alice](http://localhost/wiki/User:Alice)");
    }

    #[test]
    fn test_render_user_with_tools() {
        let (resolver, messages) = fixtures();
        let user_tools = vec![
            UserTool::talk("talkpagelinktext"),
            UserTool::special("Contributions", "contribslink"),
            UserTool {
                target: UserToolTarget::Special,
                special: Some("Block".to_string()),
                msg: None,
                text: Some("IP Block".to_string()),
            },
        ];
        let renderer = LinkRenderer::new(&resolver, &messages).with_tools(&user_tools, &[]);
        let user = resolver.user("Alice").unwrap();

        assert_eq!(
            renderer.render_user(&user),
            "[Alice](http://localhost/wiki/User:Alice) \
             ([talk](http://localhost/wiki/User_talk:Alice) | \
             [contribs](http://localhost/wiki/Special:Contributions/Alice) | \
             [IP Block](http://localhost/wiki/Special:Block/Alice))"
        );
    }

    #[test]
    fn test_render_page_with_tools_and_diff() {
        let (resolver, messages) = fixtures();
        let page_tools = vec![PageTool::new("action=history", "hist")];
        let renderer = LinkRenderer::new(&resolver, &messages).with_tools(&[], &page_tools);
        let title = resolver.title("Foo (bar)").unwrap();

        assert_eq!(
            renderer.render_page(&title, Some((11, 10))),
            "[Foo (bar)](http://localhost/wiki/Foo_%28bar%29) \
             ([hist](http://localhost/w/index.php?title=Foo_%28bar%29&action=history) | \
             [diff](http://localhost/w/index.php?title=Foo_%28bar%29&diff=11&oldid=10))"
        );
    }

    #[test]
    fn test_render_page_without_tools_ignores_diff() {
        let (resolver, messages) = fixtures();
        let renderer = LinkRenderer::new(&resolver, &messages);
        let title = resolver.title("Foo").unwrap();

        assert_eq!(
            renderer.render_page(&title, Some((11, 10))),
            "[Foo](http://localhost/wiki/Foo)"
        );
    }

    #[test]
    fn test_linkify_actor_prefix() {
        let (resolver, messages) = fixtures();
        let renderer = LinkRenderer::new(&resolver, &messages);
        let alice = resolver.user("Alice").unwrap();

        assert_eq!(
            renderer.linkify("Alice made an edit", Some(&alice)),
            "[Alice](http://localhost/wiki/User:Alice) made an edit"
        );
        // 前缀匹配区分大小写，且只在开头生效
        assert_eq!(renderer.linkify("alice made an edit", Some(&alice)), "alice made an edit");
        assert_eq!(renderer.linkify("Bob thanked Alice", Some(&alice)), "Bob thanked Alice");
    }

    #[test]
    fn test_linkify_wiki_links() {
        let (resolver, messages) = fixtures();
        let renderer = LinkRenderer::new(&resolver, &messages);

        assert_eq!(
            renderer.linkify("moved [[Foo]] to [[Bar baz|the bar]]", None),
            "moved [Foo](http://localhost/wiki/Foo) to [the bar](http://localhost/wiki/Bar_baz)"
        );
    }

    #[test]
    fn test_linkify_repeated_fragment_replaced_everywhere() {
        let (resolver, messages) = fixtures();
        let renderer = LinkRenderer::new(&resolver, &messages);

        assert_eq!(
            renderer.linkify("[[Foo]] and again [[Foo]]", None),
            "[Foo](http://localhost/wiki/Foo) and again [Foo](http://localhost/wiki/Foo)"
        );
    }

    #[test]
    fn test_linkify_leaves_invalid_targets() {
        let (resolver, messages) = fixtures();
        let renderer = LinkRenderer::new(&resolver, &messages);

        assert_eq!(renderer.linkify("see [[<bad>]]", None), "see [[<bad>]]");
        assert_eq!(renderer.linkify("see [[{x}|label]]", None), "see [[{x}|label]]");
    }

    #[test]
    fn test_linkify_plain_link_uses_page_tools() {
        let (resolver, messages) = fixtures();
        let page_tools = vec![PageTool::new("action=edit", "edit")];
        let renderer = LinkRenderer::new(&resolver, &messages).with_tools(&[], &page_tools);

        assert_eq!(
            renderer.linkify("[[Foo]]", None),
            "[Foo](http://localhost/wiki/Foo) \
             ([edit](http://localhost/w/index.php?title=Foo&action=edit))"
        );
        // 带标签的链接不附加工具
        assert_eq!(
            renderer.linkify("[[Foo|f]]", None),
            "[f](http://localhost/wiki/Foo)"
        );
    }
}
