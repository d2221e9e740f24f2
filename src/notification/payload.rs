//! Payload 构建模块 - webhook embed 消息
//!
//! Payload 格式：
//! ```json
//! {
//!   "embeds": [
//!     {
//!       "color": 16775680,
//!       "description": "[Alice](...) edited [Foo](...) (+20 bytes)",
//!       "fields": [{ "name": "Summary", "value": "typo" }]
//!     }
//!   ],
//!   "username": "MyWiki"
//! }
//! ```
//!
//! 目标配置中的 `request_override` 最后递归合并进来，同名键以覆盖值为准。

use serde::Serialize;
use serde_json::Value;

/// embed 中的附加字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

/// 单个 embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub color: u32,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

/// 通知 payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub embeds: Vec<Embed>,
    pub username: String,
    #[serde(skip)]
    overrides: Option<Value>,
}

impl NotificationPayload {
    pub fn new(description: impl Into<String>, color: u32, username: impl Into<String>) -> Self {
        Self {
            embeds: vec![Embed {
                color,
                description: description.into(),
                fields: Vec::new(),
            }],
            username: username.into(),
            overrides: None,
        }
    }

    /// 给第一个 embed 添加字段
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Some(embed) = self.embeds.first_mut() {
            embed.fields.push(EmbedField {
                name: name.into(),
                value: value.into(),
            });
        }
        self
    }

    /// 设置覆盖值
    pub fn with_overrides(mut self, overrides: Option<Value>) -> Self {
        self.overrides = overrides;
        self
    }

    /// 第一个 embed 的描述
    pub fn description(&self) -> &str {
        self.embeds.first().map(|e| e.description.as_str()).unwrap_or("")
    }

    /// 合并覆盖值后的 JSON
    pub fn to_value(&self) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if let Some(overrides) = &self.overrides {
            merge_override(&mut value, overrides);
        }
        Ok(value)
    }

    /// 序列化为最终发送的字符串
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_value()?)
    }
}

/// 递归合并：对象按键合并，数组按下标合并，其余情况由覆盖值替换
pub fn merge_override(base: &mut Value, overrides: &Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(key) {
                    Some(existing) => merge_override(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Array(base), Value::Array(overrides)) => {
            for (i, value) in overrides.iter().enumerate() {
                match base.get_mut(i) {
                    Some(existing) => merge_override(existing, value),
                    None => base.push(value.clone()),
                }
            }
        }
        (base, overrides) => *base = overrides.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let payload = NotificationPayload::new("hello", 0xff0000, "MyWiki");
        let value = payload.to_value().unwrap();

        assert_eq!(
            value,
            json!({
                "embeds": [{"color": 0xff0000, "description": "hello"}],
                "username": "MyWiki"
            })
        );
    }

    #[test]
    fn test_payload_with_field() {
        let payload = NotificationPayload::new("hello", 1, "MyWiki").with_field("Summary", "typo");
        let value = payload.to_value().unwrap();

        assert_eq!(value["embeds"][0]["fields"][0]["name"], "Summary");
        assert_eq!(value["embeds"][0]["fields"][0]["value"], "typo");
    }

    #[test]
    fn test_override_username_keeps_embeds() {
        let payload = NotificationPayload::new("hello", 1, "MyWiki")
            .with_overrides(Some(json!({"username": "Bot2"})));
        let value = payload.to_value().unwrap();

        assert_eq!(value["username"], "Bot2");
        assert_eq!(value["embeds"], json!([{"color": 1, "description": "hello"}]));
    }

    #[test]
    fn test_override_merges_arrays_by_index() {
        let payload = NotificationPayload::new("hello", 1, "MyWiki").with_overrides(Some(json!({
            "embeds": [{"color": 2, "footer": {"text": "via feed"}}],
            "avatar_url": "http://x/a.png"
        })));
        let value = payload.to_value().unwrap();

        assert_eq!(value["embeds"][0]["color"], 2);
        assert_eq!(value["embeds"][0]["description"], "hello");
        assert_eq!(value["embeds"][0]["footer"]["text"], "via feed");
        assert_eq!(value["avatar_url"], "http://x/a.png");
    }

    #[test]
    fn test_merge_scalar_replaces_structure() {
        let mut base = json!({"a": {"b": 1}, "c": [1, 2, 3]});
        merge_override(&mut base, &json!({"a": "flat", "c": [9]}));
        assert_eq!(base, json!({"a": "flat", "c": [9, 2, 3]}));
    }

    #[test]
    fn test_to_json_roundtrips() {
        let payload = NotificationPayload::new("a \"quoted\" (text)", 7, "Wiki");
        let text = payload.to_json().unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["embeds"][0]["description"], "a \"quoted\" (text)");
    }
}
