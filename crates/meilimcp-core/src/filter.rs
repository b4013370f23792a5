use crate::error::QueryError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Equality predicate `attribute = 'value'` in Meilisearch filter syntax.
///
/// Construction validates the attribute name and the value, so a rendered
/// expression can always be sent upstream verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression {
    attribute: String,
    value: String,
}

impl FilterExpression {
    pub fn equals(attribute: &str, value: &str) -> Result<Self, QueryError> {
        validate_attribute(attribute)?;
        validate_value(value)?;
        Ok(Self {
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn render(&self) -> String {
        format!("{} = '{}'", self.attribute, escape_quoted(&self.value))
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for FilterExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

/// Words the Meilisearch filter grammar treats as operators. A bare attribute
/// spelled like one of these does not parse.
const RESERVED_KEYWORDS: &[&str] = &[
    "AND", "OR", "NOT", "TO", "IN", "EXISTS", "IS", "NULL", "EMPTY", "CONTAINS",
];

/// Attribute names are bare ASCII identifiers; `.` addresses nested fields.
fn validate_attribute(attribute: &str) -> Result<(), QueryError> {
    if attribute.is_empty() {
        return Err(QueryError::invalid_filter("attribute name is empty"));
    }
    if let Some(bad) = attribute
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(QueryError::invalid_filter(format!(
            "attribute '{}' contains unsupported character {:?}",
            attribute.escape_debug(),
            bad
        )));
    }
    if attribute.starts_with('.') || attribute.ends_with('.') || attribute.contains("..") {
        return Err(QueryError::invalid_filter(format!(
            "attribute '{attribute}' is not a valid field path"
        )));
    }
    if RESERVED_KEYWORDS
        .iter()
        .any(|kw| attribute.eq_ignore_ascii_case(kw))
    {
        return Err(QueryError::invalid_filter(format!(
            "attribute '{attribute}' is a reserved filter keyword"
        )));
    }
    Ok(())
}

fn validate_value(value: &str) -> Result<(), QueryError> {
    if value.chars().any(char::is_control) {
        return Err(QueryError::invalid_filter(
            "filter_word must not contain control characters",
        ));
    }
    // Meilisearch only unescapes `\'`; a backslash before a quote or at the
    // end of the literal cannot be expressed.
    if value.contains("\\'") || value.ends_with('\\') {
        return Err(QueryError::invalid_filter(
            "filter_word must not contain a backslash before a quote or at the end",
        ));
    }
    Ok(())
}

/// Only `'` is escaped; any other backslash reaches Meilisearch as a literal.
fn escape_quoted(value: &str) -> String {
    value.replace('\'', "\\'")
}
