//! Validate tool call arguments against JSON Schema before execution.

/// Validate tool arguments against a JSON Schema.
///
/// Performs top-level validation: schema type check, required field
/// presence, and property type verification. Returns `Ok(())` when valid,
/// `Err(message)` describing the first violation found.
pub fn validate_arguments(
    args: &serde_json::Value,
    schema: &serde_json::Value,
) -> Result<(), String> {
    if let Some(schema_type) = schema.get("type").and_then(|v| v.as_str()) {
        if schema_type == "object" && !args.is_object() {
            return Err(format!(
                "expected object arguments, got {}",
                json_type_name(args)
            ));
        }
    }

    if let Some(required) = schema.get("required").and_then(|v| v.as_array()) {
        let obj = match args.as_object() {
            Some(obj) => obj,
            None => return Ok(()),
        };
        for field in required {
            if let Some(name) = field.as_str() {
                if !obj.contains_key(name) {
                    return Err(format!("missing required field '{name}'"));
                }
            }
        }
    }

    if let (Some(properties), Some(obj)) = (
        schema.get("properties").and_then(|v| v.as_object()),
        args.as_object(),
    ) {
        for (key, value) in obj {
            if let Some(prop_schema) = properties.get(key) {
                if let Some(expected_type) = prop_schema.get("type").and_then(|v| v.as_str()) {
                    if !value_matches_type(value, expected_type) {
                        return Err(format!(
                            "field '{}' expected type '{}', got {}",
                            key,
                            expected_type,
                            json_type_name(value)
                        ));
                    }
                }
            }
        }
    }

    Ok(())
}

fn value_matches_type(value: &serde_json::Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_object_args_when_schema_expects_object() {
        let schema = json!({ "type": "object", "properties": {}, "required": [] });
        let args = json!("not an object");

        let result = validate_arguments(&args, &schema);

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("expected object"));
    }

    #[test]
    fn rejects_missing_required_field() {
        let schema = json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"],
        });
        let args = json!({});

        let result = validate_arguments(&args, &schema);

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .contains("missing required field 'query'"));
    }

    #[test]
    fn accepts_valid_args_with_all_required_fields() {
        let schema = json!({
            "type": "object",
            "properties": { "url": { "type": "string" } },
            "required": ["url"],
        });
        let args = json!({ "url": "https://example.com" });

        assert!(validate_arguments(&args, &schema).is_ok());
    }

    #[test]
    fn rejects_field_with_wrong_type() {
        let schema = json!({
            "type": "object",
            "properties": { "max_results": { "type": "integer" } },
            "required": ["max_results"],
        });
        let args = json!({ "max_results": "five" });

        let err = validate_arguments(&args, &schema).unwrap_err();
        assert!(err.contains("field 'max_results'"));
        assert!(err.contains("expected type 'integer'"));
    }

    #[test]
    fn accepts_extra_fields_not_in_schema_properties() {
        let schema = json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"],
        });
        let args = json!({ "query": "rust", "extra": true });

        assert!(validate_arguments(&args, &schema).is_ok());
    }

    #[test]
    fn accepts_optional_field_when_absent() {
        let schema = json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" },
                "max_results": { "type": "integer" },
            },
            "required": ["query"],
        });
        let args = json!({ "query": "rust" });

        assert!(validate_arguments(&args, &schema).is_ok());
    }

    #[test]
    fn accepts_any_args_when_schema_is_empty_object() {
        let schema = json!({});
        let args = json!({ "anything": 42 });

        assert!(validate_arguments(&args, &schema).is_ok());
    }
}
