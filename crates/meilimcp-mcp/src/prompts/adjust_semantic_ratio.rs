use super::{GetPromptResult, PromptArgument, PromptDefinition, PromptMessage, Role};
use meilimcp_core::constants::ADJUST_SEMANTIC_RATIO_PROMPT;
use meilimcp_core::guidance::{self, ADJUST_RATIO_ACKNOWLEDGEMENT, ADJUST_RATIO_DESCRIPTION};
use serde_json::Value;

pub const NAME: &str = ADJUST_SEMANTIC_RATIO_PROMPT;

pub fn definition() -> PromptDefinition {
    PromptDefinition {
        name: NAME.into(),
        description: "Guide for adjusting the semantic_ratio in Meilisearch hybrid search.".into(),
        arguments: vec![PromptArgument {
            name: "search_type".into(),
            description:
                "The type of search focus ('semantic' or 'keyword'). Defaults to 'balanced'."
                    .into(),
            required: false,
        }],
    }
}

/// A non-string `search_type` is ignored and yields balanced guidance.
pub fn render(arguments: &Value) -> GetPromptResult {
    let search_type = arguments.get("search_type").and_then(Value::as_str);
    let guide = guidance::select_guidance(search_type);

    GetPromptResult {
        description: ADJUST_RATIO_DESCRIPTION.into(),
        messages: vec![
            PromptMessage::text(Role::User, guide.render_prompt_text()),
            PromptMessage::text(Role::Assistant, ADJUST_RATIO_ACKNOWLEDGEMENT),
        ],
    }
}
