//! Prompt guidance for tuning hybrid search parameters.

/// Search focus requested by the caller of `adjust_semantic_ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchIntent {
    Semantic,
    Keyword,
    Balanced,
}

impl SearchIntent {
    /// Total lookup: anything other than `semantic` or `keyword` is balanced.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("semantic") => Self::Semantic,
            Some("keyword") => Self::Keyword,
            _ => Self::Balanced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guidance {
    pub intent: SearchIntent,
    pub ratio_guide: &'static str,
    pub example: &'static str,
}

impl Guidance {
    pub fn recommended_ratio(&self) -> f64 {
        match self.intent {
            SearchIntent::Semantic => 0.7,
            SearchIntent::Keyword => 0.3,
            SearchIntent::Balanced => 0.5,
        }
    }

    pub fn render_prompt_text(&self) -> String {
        format!(
            "Guide for adjusting the semantic_ratio parameter when using the hybrid_search tool:\n\n{}\n\n{}\n\nValue range: 0.0 (pure keyword) to 1.0 (pure semantic).",
            self.ratio_guide, self.example
        )
    }
}

pub fn select_guidance(search_type: Option<&str>) -> Guidance {
    let intent = SearchIntent::from_tag(search_type);
    let (ratio_guide, example) = match intent {
        SearchIntent::Semantic => (
            "To prioritize semantic search, set semantic_ratio to 0.7 or higher.",
            "Example: For the keyword 'database design', documents related to 'data structures' or 'schema design' can also be found.",
        ),
        SearchIntent::Keyword => (
            "To prioritize keyword search, set semantic_ratio to 0.3 or lower.",
            "Example: For the keyword 'Python', only documents containing the exact word 'Python' will be prioritized.",
        ),
        SearchIntent::Balanced => (
            "For balanced results, set semantic_ratio around 0.5.",
            "Example: For the keyword 'machine learning', you'll get a mix of documents containing 'machine learning' and related topics like 'AI' or 'deep learning'.",
        ),
    };
    Guidance {
        intent,
        ratio_guide,
        example,
    }
}

pub fn describe_filterable_attribute(attrs: &[String]) -> String {
    if attrs.is_empty() {
        return "Attribute to filter on. Requires filter_word.".to_string();
    }
    format!(
        "Attribute to filter on (Available: {}). Requires filter_word.",
        attrs.join(", ")
    )
}

pub const ADJUST_RATIO_DESCRIPTION: &str = "Meilisearch Hybrid Search Parameter Guide";

pub const ADJUST_RATIO_ACKNOWLEDGEMENT: &str = "Understood. I will adjust the semantic_ratio based on the search goal to optimize hybrid search results.";

pub const HELP_DESCRIPTION: &str = "Basic usage guide for the hybrid_search tool";

pub const HELP_TEXT: &str = r#"Basic usage of the hybrid_search tool:

1. Basic Search (balanced keyword and semantic):
    hybrid_search(keywords="your search terms")

2. Prioritize Semantic Search:
    hybrid_search(keywords="your search terms", semantic_ratio=0.8)

3. Prioritize Keyword Search:
    hybrid_search(keywords="your search terms", semantic_ratio=0.2)

4. Filtering Results (Optional):
    To filter results based on a specific attribute value, you **must provide both** 'filterable_attribute' and 'filter_word'.
    - 'filterable_attribute': The name of the attribute in your Meilisearch index that is configured as filterable (e.g., "genre", "author", "product_category").
    - 'filter_word': The specific value you want to filter by for the given attribute (e.g., "Drama", "Tolkien", "electronics").

    Syntax:
    hybrid_search(keywords="your search terms", filterable_attribute="attribute_name", filter_word="value_to_filter")

    Examples:
    - Find sci-fi movies:
        hybrid_search(keywords="movie about space", filterable_attribute="genre", filter_word="Science Fiction")
    - Find books by a specific author:
        hybrid_search(keywords="fantasy books", filterable_attribute="author", filter_word="Tolkien")
    - Find documents related to a specific product category:
        hybrid_search(keywords="latest gadgets", filterable_attribute="category", filter_word="Electronics")

5. For detailed guidance on semantic_ratio:
    Use: prompts/get(name="adjust_semantic_ratio", arguments={"search_type": "semantic"})
    (Replace "semantic" with "keyword" or omit for balanced guidance)"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_recommends_high_ratio() {
        let guidance = select_guidance(Some("semantic"));
        assert_eq!(guidance.intent, SearchIntent::Semantic);
        assert!(guidance.recommended_ratio() >= 0.7);
        assert!(guidance.ratio_guide.contains("0.7 or higher"));
    }

    #[test]
    fn keyword_recommends_low_ratio() {
        let guidance = select_guidance(Some("keyword"));
        assert!(guidance.recommended_ratio() <= 0.3);
        assert!(guidance.example.contains("'Python'"));
    }

    #[test]
    fn unknown_and_absent_fall_back_to_balanced() {
        let absent = select_guidance(None);
        assert_eq!(absent.intent, SearchIntent::Balanced);
        assert_eq!(select_guidance(Some("unknown-value")), absent);
        assert_eq!(select_guidance(Some("Semantic")), absent);
        assert_eq!(select_guidance(Some("balanced")), absent);
        assert_eq!(absent.recommended_ratio(), 0.5);
    }

    #[test]
    fn prompt_text_includes_guide_example_and_range() {
        let text = select_guidance(Some("keyword")).render_prompt_text();
        assert!(text.starts_with("Guide for adjusting the semantic_ratio parameter"));
        assert!(text.contains("0.3 or lower"));
        assert!(text.contains("exact word 'Python'"));
        assert!(text.ends_with("Value range: 0.0 (pure keyword) to 1.0 (pure semantic)."));
    }

    #[test]
    fn empty_attribute_list_gives_generic_description() {
        assert_eq!(
            describe_filterable_attribute(&[]),
            "Attribute to filter on. Requires filter_word."
        );
    }

    #[test]
    fn attribute_list_is_joined_in_order() {
        let attrs = vec!["genre".to_string(), "author".to_string()];
        let description = describe_filterable_attribute(&attrs);
        assert_eq!(
            description,
            "Attribute to filter on (Available: genre, author). Requires filter_word."
        );
        assert!(description.find("genre") < description.find("author"));
    }

    #[test]
    fn help_text_points_to_ratio_prompt() {
        assert!(HELP_TEXT.contains("adjust_semantic_ratio"));
        assert!(HELP_TEXT.contains("filter_word=\"Science Fiction\""));
    }
}
