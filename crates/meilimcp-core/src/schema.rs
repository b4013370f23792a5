//! Declarative argument schema for tool calls.
//!
//! Each tool describes its arguments as an ordered slice of [`FieldSpec`].
//! [`decode_arguments`] walks the slice in order, so the first failing field
//! always determines the error.

use crate::constants;
use crate::error::{QueryError, ValueKind};
use serde_json::Value;

/// How a field reacts to being absent or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and non-empty.
    Required,
    /// May be absent; when present it must have the declared type.
    Optional,
    /// Absent, mistyped and empty values all decode to "not supplied".
    Lenient,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ValueKind,
    pub presence: Presence,
    pub default: Option<f64>,
    pub bounds: Option<(f64, f64)>,
    pub description: &'static str,
}

impl FieldSpec {
    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

pub const KEYWORDS: &str = "keywords";
pub const SEMANTIC_RATIO: &str = "semantic_ratio";
pub const RANKING_SCORE_THRESHOLD: &str = "ranking_score_threshold";
pub const FILTERABLE_ATTRIBUTE: &str = "filterable_attribute";
pub const FILTER_WORD: &str = "filter_word";

/// Arguments of the `hybrid_search` tool, in validation order.
pub const HYBRID_SEARCH_ARGUMENTS: &[FieldSpec] = &[
    FieldSpec {
        name: KEYWORDS,
        kind: ValueKind::Text,
        presence: Presence::Required,
        default: None,
        bounds: None,
        description: "Placing the most contextually important keywords at the beginning leads to more relevant results. (Good example: 'v1.13 new features meilisearch', Bad example: 'new features of meilisearch v1.13')",
    },
    FieldSpec {
        name: SEMANTIC_RATIO,
        kind: ValueKind::Number,
        presence: Presence::Optional,
        default: Some(constants::DEFAULT_SEMANTIC_RATIO),
        bounds: Some(constants::SEMANTIC_RATIO_BOUNDS),
        description: "A value closer to 0 emphasizes keyword search, while closer to 1 emphasizes vector search. Default is 0.5. If the `_rankingScore` in results is low, try adjusting to 0.8 or 0.2 to find more relevant documents",
    },
    FieldSpec {
        name: RANKING_SCORE_THRESHOLD,
        kind: ValueKind::Number,
        presence: Presence::Optional,
        default: Some(constants::DEFAULT_RANKING_SCORE_THRESHOLD),
        bounds: Some(constants::RANKING_SCORE_THRESHOLD_BOUNDS),
        description: "Returns results with a ranking score bigger than this value. Default is 0.9.",
    },
    FieldSpec {
        name: FILTERABLE_ATTRIBUTE,
        kind: ValueKind::Text,
        presence: Presence::Lenient,
        default: None,
        bounds: None,
        description: "Attribute to filter on. Requires filter_word.",
    },
    FieldSpec {
        name: FILTER_WORD,
        kind: ValueKind::Text,
        presence: Presence::Lenient,
        default: None,
        bounds: None,
        description: "Word or value to filter the attribute by (e.g., 'Drama', 'Tolkien'). Requires filterable_attribute.",
    },
];

#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Text(String),
    Number(f64),
}

/// Typed view over a raw argument map after schema validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedArguments {
    values: Vec<(&'static str, DecodedValue)>,
}

impl DecodedArguments {
    fn get(&self, name: &str) -> Option<&DecodedValue> {
        self.values
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(DecodedValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(DecodedValue::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

/// Validate `raw` against `schema`. A non-object `raw` is treated as an empty map.
/// JSON `null` counts as absent.
pub fn decode_arguments(raw: &Value, schema: &[FieldSpec]) -> Result<DecodedArguments, QueryError> {
    let mut decoded = DecodedArguments::default();
    for spec in schema {
        let value = raw.get(spec.name).filter(|v| !v.is_null());
        if let Some(v) = decode_field(spec, value)? {
            decoded.values.push((spec.name, v));
        }
    }
    Ok(decoded)
}

fn decode_field(spec: &FieldSpec, value: Option<&Value>) -> Result<Option<DecodedValue>, QueryError> {
    match spec.kind {
        ValueKind::Text => decode_text(spec, value),
        ValueKind::Number => decode_number(spec, value),
    }
}

fn decode_text(spec: &FieldSpec, value: Option<&Value>) -> Result<Option<DecodedValue>, QueryError> {
    let missing = || match spec.presence {
        Presence::Required => Err(QueryError::MissingArgument { field: spec.name }),
        Presence::Optional | Presence::Lenient => Ok(None),
    };

    match value {
        None => missing(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                missing()
            } else {
                Ok(Some(DecodedValue::Text(trimmed.to_string())))
            }
        }
        Some(_) if spec.presence == Presence::Lenient => Ok(None),
        Some(_) => Err(QueryError::TypeMismatch {
            field: spec.name,
            expected: ValueKind::Text,
        }),
    }
}

fn decode_number(
    spec: &FieldSpec,
    value: Option<&Value>,
) -> Result<Option<DecodedValue>, QueryError> {
    let number = match value {
        None => {
            return match (spec.presence, spec.default) {
                (_, Some(default)) => Ok(Some(DecodedValue::Number(default))),
                (Presence::Required, None) => {
                    Err(QueryError::MissingArgument { field: spec.name })
                }
                _ => Ok(None),
            };
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(_) if spec.presence == Presence::Lenient => return Ok(None),
        Some(_) => None,
    };

    let Some(number) = number else {
        return Err(QueryError::TypeMismatch {
            field: spec.name,
            expected: ValueKind::Number,
        });
    };

    if let Some((min, max)) = spec.bounds
        && (!number.is_finite() || number < min || number > max)
    {
        return Err(QueryError::OutOfRange {
            field: spec.name,
            value: number,
            min,
            max,
        });
    }

    Ok(Some(DecodedValue::Number(number)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(raw: Value) -> Result<DecodedArguments, QueryError> {
        decode_arguments(&raw, HYBRID_SEARCH_ARGUMENTS)
    }

    #[test]
    fn schema_order_matches_validation_order() {
        let names: Vec<&str> = HYBRID_SEARCH_ARGUMENTS.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec![
                KEYWORDS,
                SEMANTIC_RATIO,
                RANKING_SCORE_THRESHOLD,
                FILTERABLE_ATTRIBUTE,
                FILTER_WORD
            ]
        );
        let required: Vec<&str> = HYBRID_SEARCH_ARGUMENTS
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.name)
            .collect();
        assert_eq!(required, vec![KEYWORDS]);
    }

    #[test]
    fn defaults_fill_absent_numbers() {
        let decoded = decode(json!({"keywords": "space opera"})).unwrap();
        assert_eq!(decoded.text(KEYWORDS), Some("space opera"));
        assert_eq!(decoded.number(SEMANTIC_RATIO), Some(0.5));
        assert_eq!(decoded.number(RANKING_SCORE_THRESHOLD), Some(0.9));
        assert_eq!(decoded.text(FILTERABLE_ATTRIBUTE), None);
    }

    #[test]
    fn null_is_treated_as_absent() {
        let decoded = decode(json!({"keywords": "x", "semantic_ratio": null})).unwrap();
        assert_eq!(decoded.number(SEMANTIC_RATIO), Some(0.5));
    }

    #[test]
    fn first_failing_field_wins() {
        let err = decode(json!({"keywords": 1, "semantic_ratio": "high"})).unwrap_err();
        assert_eq!(
            err,
            QueryError::TypeMismatch {
                field: KEYWORDS,
                expected: ValueKind::Text
            }
        );

        let err = decode(json!({"semantic_ratio": "high"})).unwrap_err();
        assert_eq!(err, QueryError::MissingArgument { field: KEYWORDS });
    }

    #[test]
    fn numeric_strings_are_type_mismatches() {
        let err = decode(json!({"keywords": "x", "semantic_ratio": "0.7"})).unwrap_err();
        assert_eq!(
            err,
            QueryError::TypeMismatch {
                field: SEMANTIC_RATIO,
                expected: ValueKind::Number
            }
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let decoded = decode(json!({
            "keywords": "x",
            "semantic_ratio": 1.0,
            "ranking_score_threshold": 0.0
        }))
        .unwrap();
        assert_eq!(decoded.number(SEMANTIC_RATIO), Some(1.0));
        assert_eq!(decoded.number(RANKING_SCORE_THRESHOLD), Some(0.0));

        let err = decode(json!({"keywords": "x", "ranking_score_threshold": 1.0})).unwrap_err();
        assert!(matches!(
            err,
            QueryError::OutOfRange {
                field: RANKING_SCORE_THRESHOLD,
                ..
            }
        ));
    }

    #[test]
    fn integers_are_accepted_as_numbers() {
        let decoded = decode(json!({"keywords": "x", "semantic_ratio": 1})).unwrap();
        assert_eq!(decoded.number(SEMANTIC_RATIO), Some(1.0));
    }

    #[test]
    fn lenient_fields_swallow_bad_values() {
        let decoded = decode(json!({
            "keywords": "x",
            "filterable_attribute": 42,
            "filter_word": "   "
        }))
        .unwrap();
        assert_eq!(decoded.text(FILTERABLE_ATTRIBUTE), None);
        assert_eq!(decoded.text(FILTER_WORD), None);
    }

    #[test]
    fn non_object_arguments_behave_like_empty_map() {
        let err = decode(json!(["keywords"])).unwrap_err();
        assert_eq!(err, QueryError::MissingArgument { field: KEYWORDS });
    }
}
