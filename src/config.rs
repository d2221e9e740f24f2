//! 配置 - 站点信息与通知目标
//!
//! 配置文件为 JSON，默认位于 `~/.config/wiki-rc-notify/config.json`：
//! ```json
//! {
//!   "site": { "sitename": "MyWiki", "server": "https://wiki.example.org" },
//!   "destination": {
//!     "url": "https://discord.com/api/webhooks/...",
//!     "omit_types": ["log"],
//!     "omit_namespaces": [2, 3],
//!     "request_override": { "username": "Bot2" }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::notification::event::EventKind;

/// 完整配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub site: SiteConfig,
    pub destination: DestinationConfig,
}

impl FeedConfig {
    /// 默认配置文件路径
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("wiki-rc-notify")
            .join("config.json")
    }

    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// 加载配置；文件不存在时使用默认值
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.destination.validate()?;
        Ok(config)
    }
}

/// 站点信息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// 站点名称，默认作为 webhook 显示名
    pub sitename: String,
    /// 服务器地址，如 `https://wiki.example.org`
    pub server: String,
    /// 文章路径，`$1` 为标题
    pub article_path: String,
    /// 脚本路径，带查询参数的链接使用
    pub script_path: String,
    /// 额外命名空间
    pub extra_namespaces: BTreeMap<i32, String>,
    /// 消息覆盖
    pub messages: HashMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            sitename: "Wiki".to_string(),
            server: "http://localhost".to_string(),
            article_path: "/wiki/$1".to_string(),
            script_path: "/w/index.php".to_string(),
            extra_namespaces: BTreeMap::new(),
            messages: HashMap::new(),
        }
    }
}

/// 用户工具链接的目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserToolTarget {
    /// 用户讨论页
    Talk,
    /// 以用户名为子页面的特殊页面
    Special,
}

/// 用户工具链接（如 talk、contribs）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTool {
    pub target: UserToolTarget,
    /// 特殊页面名，`target` 为 `special` 时使用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
    /// 标签消息键，优先于 `text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// 字面标签
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl UserTool {
    pub fn talk(msg: impl Into<String>) -> Self {
        Self {
            target: UserToolTarget::Talk,
            special: None,
            msg: Some(msg.into()),
            text: None,
        }
    }

    pub fn special(special: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            target: UserToolTarget::Special,
            special: Some(special.into()),
            msg: Some(msg.into()),
            text: None,
        }
    }
}

/// 页面工具链接（如 edit、history）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTool {
    /// 附加到页面 URL 的查询串
    pub query: String,
    /// 标签消息键
    pub msg: String,
}

impl PageTool {
    pub fn new(query: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            msg: msg.into(),
        }
    }
}

/// 通知目标配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationConfig {
    /// webhook 地址
    pub url: String,
    /// 显示名，缺省为站点名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub omit_types: Vec<EventKind>,
    pub omit_namespaces: Vec<i32>,
    pub omit_log_types: Vec<String>,
    /// `type/action` 形式
    pub omit_log_actions: Vec<String>,
    pub user_tools: Vec<UserTool>,
    pub page_tools: Vec<PageTool>,
    /// 原样合并进最终 payload，同名键以此为准
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_override: Option<Value>,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: None,
            omit_types: vec![EventKind::External, EventKind::Categorize],
            omit_namespaces: Vec::new(),
            omit_log_types: Vec::new(),
            omit_log_actions: Vec::new(),
            user_tools: vec![
                UserTool::special("Block", "blocklink"),
                UserTool::talk("talkpagelinktext"),
                UserTool::special("Contributions", "contribslink"),
            ],
            page_tools: vec![
                PageTool::new("action=edit", "edit"),
                PageTool::new("action=history", "hist"),
            ],
            request_override: None,
        }
    }
}

impl DestinationConfig {
    /// 不带任何工具链接和过滤的配置
    pub fn bare() -> Self {
        Self {
            omit_types: Vec::new(),
            user_tools: Vec::new(),
            page_tools: Vec::new(),
            ..Self::default()
        }
    }

    /// 检查配置是否自洽
    pub fn validate(&self) -> Result<()> {
        for tool in &self.user_tools {
            if tool.target == UserToolTarget::Special && tool.special.is_none() {
                anyhow::bail!("user tool with target 'special' requires a 'special' page name");
            }
            if tool.msg.is_none() && tool.text.is_none() {
                anyhow::bail!("user tool requires either 'msg' or 'text'");
            }
        }
        if let Some(over) = &self.request_override {
            if !over.is_object() {
                anyhow::bail!("request_override must be a JSON object");
            }
        }
        Ok(())
    }

    /// 显示名，缺省为站点名
    pub fn display_name<'a>(&'a self, site: &'a SiteConfig) -> &'a str {
        self.username.as_deref().unwrap_or(&site.sitename)
    }
}
