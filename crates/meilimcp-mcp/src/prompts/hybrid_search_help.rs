use super::{GetPromptResult, PromptDefinition, PromptMessage, Role};
use meilimcp_core::constants::HYBRID_SEARCH_HELP_PROMPT;
use meilimcp_core::guidance::{HELP_DESCRIPTION, HELP_TEXT};

pub const NAME: &str = HYBRID_SEARCH_HELP_PROMPT;

pub fn definition() -> PromptDefinition {
    PromptDefinition {
        name: NAME.into(),
        description: "Guide on how to use the hybrid_search tool.".into(),
        arguments: Vec::new(),
    }
}

pub fn render() -> GetPromptResult {
    GetPromptResult {
        description: HELP_DESCRIPTION.into(),
        messages: vec![PromptMessage::text(Role::User, HELP_TEXT)],
    }
}
