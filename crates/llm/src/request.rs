use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
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

/// One chat-completion request: the semantic content of a model call.
///
/// Deliberately carries no origin information. The answer to a prompt does
/// not depend on who asked, which is also why [`cache_key`](Self::cache_key)
/// is derived from these fields alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: None,
            history: Vec::new(),
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }

    /// Full message list in wire order: system, history, then the prompt.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage {
                role: Role::System,
                content: system.clone(),
            });
        }
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage::user(self.prompt.clone()));
        messages
    }

    /// Cache key over the semantic request content.
    ///
    /// Keyed on model, prompts, history, and sampling parameters only.
    /// Call origin is excluded on purpose: identical questions share one
    /// cache entry no matter who asked.
    pub fn cache_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.model.as_bytes());
        hasher.update([0]);
        if let Some(system) = &self.system_prompt {
            hasher.update(system.as_bytes());
        }
        hasher.update([0]);
        for message in &self.history {
            hasher.update(serde_json::to_vec(message).unwrap_or_default());
            hasher.update([0]);
        }
        hasher.update(self.prompt.as_bytes());
        hasher.update([0]);
        if let Some(temperature) = self.temperature {
            hasher.update(temperature.to_le_bytes());
        }
        hasher.update([0]);
        if let Some(max_tokens) = self.max_tokens {
            hasher.update(max_tokens.to_le_bytes());
        }
        to_lower_hex(&hasher.finalize())
    }
}

fn to_lower_hex(bytes: &[u8]) -> String {
    const LUT: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(LUT[(byte >> 4) as usize] as char);
        out.push(LUT[(byte & 0x0f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages_keep_wire_order() {
        let request = ChatRequest::new("gpt-4o-mini", "and deep learning?")
            .with_system_prompt("You are concise.")
            .with_history(vec![
                ChatMessage::user("what is ml?"),
                ChatMessage::assistant("learning from data"),
            ]);
        let messages = request.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[3].content, "and deep learning?");
    }

    #[test]
    fn cache_key_is_stable_for_identical_content() {
        let a = ChatRequest::new("gpt-4o-mini", "what is ai?");
        let b = ChatRequest::new("gpt-4o-mini", "what is ai?");
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn cache_key_distinguishes_semantic_fields() {
        let base = ChatRequest::new("gpt-4o-mini", "what is ai?");
        let other_prompt = ChatRequest::new("gpt-4o-mini", "what is ml?");
        let other_model = ChatRequest::new("qwen-local", "what is ai?");
        assert_ne!(base.cache_key(), other_prompt.cache_key());
        assert_ne!(base.cache_key(), other_model.cache_key());
    }

    #[test]
    fn empty_fields_do_not_collide() {
        // system "x" + prompt "" must differ from system "" + prompt "x"
        let a = ChatRequest::new("m", "").with_system_prompt("x");
        let b = ChatRequest::new("m", "x").with_system_prompt("");
        assert_ne!(a.cache_key(), b.cache_key());
    }
}
