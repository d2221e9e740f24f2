//! Webhook 渠道 - 把 payload POST 到聊天 webhook

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use tracing::{info, warn};
use url::Url;

use super::channel::{NotificationChannel, SendResult};

/// Webhook 客户端配置
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// webhook 地址
    pub url: String,
    /// 超时时间 (秒)
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Webhook 渠道
#[derive(Debug)]
pub struct WebhookChannel {
    client: Client,
    url: Url,
}

impl WebhookChannel {
    /// 创建新的 Webhook 渠道
    pub fn new(config: WebhookConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(anyhow!("webhook url is required"));
        }
        let url = Url::parse(&config.url)
            .with_context(|| format!("Invalid webhook url: {}", config.url))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, url })
    }
}

impl NotificationChannel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    fn send(&self, payload: &str) -> Result<SendResult> {
        let response = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "application/json")
            .body(payload.to_string())
            .send()
            .context("HTTP request failed")?;

        let status = response.status();
        if status.is_success() {
            info!(channel = "webhook", status = %status, "Notification delivered");
            Ok(SendResult::Sent)
        } else {
            let body = response.text().unwrap_or_default();
            warn!(channel = "webhook", status = %status, body = %body, "Webhook rejected payload");
            Ok(SendResult::Failed(format!("HTTP {}: {}", status, body)))
        }
    }
}
