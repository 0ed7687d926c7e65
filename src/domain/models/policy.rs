use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied upload policy options.
///
/// `scope` and `deadline` are filled in by the signer. Fields the provider
/// does not know go in `extra` and are dropped when signing strictly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_only: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_body_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent_ops: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent_notify_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent_pipeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fsize_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_after_days: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Unix time `expires` seconds from now
pub fn deadline_after(expires: u64) -> u64 {
    (chrono::Utc::now().timestamp().max(0) as u64).saturating_add(expires)
}

impl PutPolicy {
    /// Assemble the JSON document that gets signed into an upload token.
    ///
    /// `scope` is `bucket` or `bucket:key`.
    pub fn to_document(&self, scope: &str, deadline: u64, strict: bool) -> Value {
        let mut policy = self.clone();
        if strict {
            policy.extra.clear();
        }
        let mut document = match serde_json::to_value(&policy) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        document.insert("scope".to_string(), Value::from(scope));
        document.insert("deadline".to_string(), Value::from(deadline));
        Value::Object(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strict_policy_drops_unknown_fields() {
        let mut policy = PutPolicy {
            return_body: Some("{\"key\":$(key)}".to_string()),
            ..Default::default()
        };
        policy.extra.insert("notAField".to_string(), json!(1));

        let strict = policy.to_document("media", 100, true);
        assert_eq!(
            strict,
            json!({"returnBody": "{\"key\":$(key)}", "scope": "media", "deadline": 100})
        );

        let loose = policy.to_document("media:a.txt", 100, false);
        assert_eq!(loose["notAField"], json!(1));
        assert_eq!(loose["scope"], json!("media:a.txt"));
    }
}
