use serde::{Deserialize, Serialize};

/// A message in an OpenAI-compatible chat completion exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

/// Assistant reply; `content` may be null.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if it has any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_completion() {
        let body = json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Twitter leads."}, "finish_reason": "stop"}
            ]
        });
        let resp: ChatCompletionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.first_content(), Some("Twitter leads."));
    }

    #[test]
    fn null_or_missing_content() {
        let resp: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert_eq!(resp.first_content(), None);

        let resp: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(resp.first_content(), None);
    }

    #[test]
    fn request_serializes() {
        let messages = vec![ChatMessage::system("s"), ChatMessage::user("q")];
        let req = ChatCompletionRequest {
            model: "gpt-4",
            messages: &messages,
            temperature: 0.3,
            max_tokens: 1000,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 1000);
    }
}
