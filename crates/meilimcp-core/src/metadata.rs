use serde_json::Value;

/// Filterable attributes declared by the backing index, in index order.
///
/// Read once at startup and shared read-only for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMetadata {
    filterable_attributes: Vec<String>,
}

impl IndexMetadata {
    pub fn new(filterable_attributes: Vec<String>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let filterable_attributes = filterable_attributes
            .into_iter()
            .filter(|a| !a.is_empty() && seen.insert(a.clone()))
            .collect();
        Self {
            filterable_attributes,
        }
    }

    /// Parse the `filterableAttributes` setting.
    ///
    /// Accepts both the plain list form (`["genre", "author"]`) and the
    /// pattern form (`[{"attributePatterns": ["genre"], ...}]`); pattern lists
    /// are flattened in order.
    pub fn from_settings_value(value: &Value) -> Self {
        let mut attributes = Vec::new();
        if let Some(items) = value.as_array() {
            for item in items {
                match item {
                    Value::String(name) => attributes.push(name.clone()),
                    Value::Object(obj) => {
                        if let Some(patterns) =
                            obj.get("attributePatterns").and_then(Value::as_array)
                        {
                            attributes.extend(
                                patterns
                                    .iter()
                                    .filter_map(Value::as_str)
                                    .map(str::to_string),
                            );
                        }
                    }
                    _ => {}
                }
            }
        }
        Self::new(attributes)
    }

    pub fn filterable_attributes(&self) -> &[String] {
        &self.filterable_attributes
    }

    pub fn is_empty(&self) -> bool {
        self.filterable_attributes.is_empty()
    }

    /// Exact-name match; a trailing `*` pattern matches by prefix.
    pub fn allows(&self, attribute: &str) -> bool {
        self.filterable_attributes.iter().any(|declared| {
            match declared.strip_suffix('*') {
                Some(prefix) => attribute.starts_with(prefix),
                None => declared == attribute,
            }
        })
    }
}
