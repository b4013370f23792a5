pub mod adjust_semantic_ratio;
pub mod hybrid_search_help;

use crate::protocol::TextContent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP prompt definition for prompts/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<PromptArgument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: TextContent,
}

impl PromptMessage {
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: TextContent::new(text),
        }
    }
}

/// `prompts/get` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPromptResult {
    pub description: String,
    pub messages: Vec<PromptMessage>,
}

pub fn list_prompts() -> Vec<PromptDefinition> {
    vec![
        adjust_semantic_ratio::definition(),
        hybrid_search_help::definition(),
    ]
}

/// Render a prompt by name; `None` when the name is unknown.
pub fn get_prompt(name: &str, arguments: &Value) -> Option<GetPromptResult> {
    match name {
        n if n == adjust_semantic_ratio::NAME => Some(adjust_semantic_ratio::render(arguments)),
        n if n == hybrid_search_help::NAME => Some(hybrid_search_help::render()),
        _ => None,
    }
}
