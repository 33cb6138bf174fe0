//! Chat-completions wire types and prompt construction

use serde::{Deserialize, Serialize};

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model
    System,
    /// The request itself
    User,
    /// A model reply
    Assistant,
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System message
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Chat-completions request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model name
    pub model: String,
    /// Conversation
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Always false; the client reads one complete response
    pub stream: bool,
}

/// Chat-completions response body
///
/// Only the fields the client reads are modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Completion choices
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// Generated message
    pub message: ResponseMessage,
}

/// Message inside a completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Generated text
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Trimmed text of the first choice, if any
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Build the system and user messages for one generation
///
/// `recent` lists lines already produced for the category; they are quoted
/// in the user message as examples not to repeat.
pub fn build_messages(category: &str, tone: &str, recent: &[String]) -> Vec<ChatMessage> {
    let system = format!(
        "You are an expert at creating {category} pickup lines. Create a single, original \
         {tone} pickup line. Keep it concise, creative, and appropriate. Only respond with the \
         pickup line text, nothing else."
    );

    let mut user = format!("Create a {category} pickup line with a {tone} tone.");
    if !recent.is_empty() {
        user.push_str(" Do not repeat or closely imitate any of these recent lines:");
        for line in recent {
            user.push_str("\n- ");
            user.push_str(line);
        }
    }

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}
