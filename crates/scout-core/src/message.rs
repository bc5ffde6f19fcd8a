use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Assistant,
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A requested action invocation, as selected by the reasoning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// One entry of the run transcript.
///
/// A system instruction, an action invocation (assistant message carrying
/// tool calls), or an action result (tool message correlated by
/// `tool_call_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls,
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Whether this message carries at least one action invocation.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Flatten a transcript into plain text for prompt interpolation.
///
/// Action invocations render as `name(arguments)` lines so the reasoning
/// service sees what was attempted even when the assistant content is empty.
pub fn render_transcript(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        out.push_str(&message.role.to_string());
        out.push_str(": ");
        if !message.content.is_empty() {
            out.push_str(&message.content);
        }
        for call in &message.tool_calls {
            if !out.ends_with(": ") {
                out.push(' ');
            }
            out.push_str(&format!("[{}({})]", call.name, call.arguments));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = Message::system("do research");
        assert_eq!(msg.role, Role::System);
        assert!(msg.tool_calls.is_empty());

        let call = ToolCall::new("call_1", "search", serde_json::json!({"query": "rust"}));
        let msg = Message::assistant_with_tool_calls("", vec![call]);
        assert!(msg.has_tool_calls());

        let msg = Message::tool_result("call_1", "found it");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn test_render_transcript() {
        let call = ToolCall::new("call_1", "search", serde_json::json!({"query": "rust"}));
        let messages = vec![
            Message::system("instruction"),
            Message::assistant_with_tool_calls("", vec![call]),
            Message::tool_result("call_1", "result text"),
        ];
        let rendered = render_transcript(&messages);
        assert!(rendered.contains("system: instruction"));
        assert!(rendered.contains("search"));
        assert!(rendered.contains("tool: result text"));
    }

    #[test]
    fn test_message_serde_skips_empty_fields() {
        let json = serde_json::to_string(&Message::system("hi")).unwrap();
        assert!(!json.contains("tool_calls"));
        assert!(!json.contains("tool_call_id"));
    }
}
