//! Reply payloads handed back to the caller.

use serde::{Deserialize, Serialize};

use crate::intent::Intent;
use crate::ml::intent_classifier::IntentPrediction;
use crate::recommend::RankedResult;

/// How the calling surface should render the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyType {
    Text,
    Recommendation,
}

/// A phone shown in a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneSummary {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub score: Option<f64>,
}

impl From<&RankedResult> for PhoneSummary {
    fn from(result: &RankedResult) -> Self {
        PhoneSummary {
            id: result.catalog_entry_id,
            name: result.entry.display_name(),
            price: result.entry.price,
            score: Some(result.score),
        }
    }
}

/// Structured data sent along with the reply text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyMetadata {
    pub session_id: String,
    #[serde(rename = "type")]
    pub reply_type: ReplyType,
    pub phones: Vec<PhoneSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistical_intent: Option<IntentPrediction>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub quick_replies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// Text and rendering hints produced by the composer.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedReply {
    pub text: String,
    pub reply_type: ReplyType,
    pub quick_replies: Vec<String>,
    pub action: Option<String>,
}

impl ComposedReply {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ComposedReply {
            text: text.into(),
            reply_type: ReplyType::Text,
            quick_replies: Vec::new(),
            action: None,
        }
    }

    pub fn recommendation<S: Into<String>>(text: S) -> Self {
        ComposedReply {
            reply_type: ReplyType::Recommendation,
            ..Self::text(text)
        }
    }

    pub fn with_quick_replies(mut self, quick_replies: Vec<String>) -> Self {
        self.quick_replies = quick_replies;
        self
    }

    pub fn with_action<S: Into<String>>(mut self, action: S) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// The full answer to one chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub reply_text: String,
    pub intent: Intent,
    pub ranked_results: Vec<RankedResult>,
    pub metadata: ReplyMetadata,
}

impl ChatReply {
    pub fn phone_ids(&self) -> Vec<u64> {
        self.metadata.phones.iter().map(|p| p.id).collect()
    }

    /// Metadata as a JSON object.
    pub fn metadata_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.metadata).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_serialization() {
        let metadata = ReplyMetadata {
            session_id: "s1".to_string(),
            reply_type: ReplyType::Recommendation,
            phones: vec![PhoneSummary {
                id: 7,
                name: "Xiaomi 14 Pro".to_string(),
                price: 3499.0,
                score: Some(80.0),
            }],
            statistical_intent: None,
            quick_replies: Vec::new(),
            action: None,
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["type"], "recommendation");
        assert_eq!(json["phones"][0]["id"], 7);
        assert!(json.get("quick_replies").is_none());
        assert!(json.get("action").is_none());
    }
}
