//! 通知渠道 trait 定义

use anyhow::Result;

/// 发送结果
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// 发送成功
    Sent,
    /// 跳过（如 dry-run）
    Skipped(String),
    /// 发送失败
    Failed(String),
}

/// 通知渠道 trait：接收已序列化的 payload 并投递
pub trait NotificationChannel: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 同步发送 payload，不重试
    fn send(&self, payload: &str) -> Result<SendResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// 测试用的 mock 渠道
    struct MockChannel {
        sent: Mutex<Vec<String>>,
    }

    impl NotificationChannel for MockChannel {
        fn name(&self) -> &str {
            "mock"
        }

        fn send(&self, payload: &str) -> Result<SendResult> {
            self.sent.lock().unwrap().push(payload.to_string());
            Ok(SendResult::Sent)
        }
    }

    #[test]
    fn test_channel_receives_payload_unchanged() {
        let channel = MockChannel {
            sent: Mutex::new(Vec::new()),
        };
        let payload = r#"{"embeds":[{"color":1,"description":"x"}],"username":"Wiki"}"#;

        let result = channel.send(payload).unwrap();
        assert_eq!(result, SendResult::Sent);
        assert_eq!(channel.sent.lock().unwrap().as_slice(), [payload.to_string()]);
    }
}
