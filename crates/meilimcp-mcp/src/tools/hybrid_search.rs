use super::ToolDefinition;
use meilimcp_core::constants;
use meilimcp_core::guidance::describe_filterable_attribute;
use meilimcp_core::metadata::IndexMetadata;
use meilimcp_core::schema::{FILTERABLE_ATTRIBUTE, FieldSpec, HYBRID_SEARCH_ARGUMENTS};
use serde_json::{Map, Value, json};

pub fn definition(metadata: &IndexMetadata) -> ToolDefinition {
    let filterable_description = describe_filterable_attribute(metadata.filterable_attributes());

    let mut properties = Map::new();
    for spec in HYBRID_SEARCH_ARGUMENTS {
        let description = if spec.name == FILTERABLE_ATTRIBUTE {
            filterable_description.as_str()
        } else {
            spec.description
        };
        properties.insert(spec.name.to_string(), property_schema(spec, description));
    }
    let required: Vec<&str> = HYBRID_SEARCH_ARGUMENTS
        .iter()
        .filter(|spec| spec.is_required())
        .map(|spec| spec.name)
        .collect();

    ToolDefinition {
        name: constants::HYBRID_SEARCH_TOOL.into(),
        description: "Hybrid search your documents in Meilisearch index".into(),
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": required
        }),
    }
}

fn property_schema(spec: &FieldSpec, description: &str) -> Value {
    let mut property = Map::new();
    property.insert("type".into(), json!(spec.kind.as_str()));
    property.insert("description".into(), json!(description));
    if let Some(default) = spec.default {
        property.insert("default".into(), json!(default));
    }
    if let Some((min, max)) = spec.bounds {
        property.insert("minimum".into(), json!(min));
        property.insert("maximum".into(), json!(max));
    }
    Value::Object(property)
}
