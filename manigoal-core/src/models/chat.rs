// manigoal-core/src/models/chat.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message in the conversation sent to the completion endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(name)
    }
}

/// A role-tagged message in the chat sequence sent to the AI.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The companion's reply: the processed message plus optional quick-reply prompts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AIResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub suggested_actions: Option<Vec<String>>,
}

/// The message inside one completion choice.
#[derive(Deserialize, Debug, Clone)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Represents one of the choices returned by the completion API.
#[derive(Deserialize, Debug, Clone)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Represents the overall structure of the completion API response.
#[derive(Deserialize, Debug, Clone)]
pub struct ApiResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ApiResponse {
    /// Text of the first choice, if the endpoint produced any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_message_serializes_lowercase_role() {
        let msg = ChatMessage::assistant("Hi there!");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"role": "assistant", "content": "Hi there!"})
        );
    }

    #[test]
    fn test_first_content() {
        let resp: ApiResponse = serde_json::from_value(json!({
            "id": "gen-1",
            "choices": [{"message": {"role": "assistant", "content": "Pong"}}]
        }))
        .unwrap();
        assert_eq!(resp.first_content(), Some("Pong"));

        let empty: ApiResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": ""}}]
        }))
        .unwrap();
        assert_eq!(empty.first_content(), None);

        let none: ApiResponse = serde_json::from_value(json!({"error": {"message": "nope"}})).unwrap();
        assert!(none.first_content().is_none());
    }
}
