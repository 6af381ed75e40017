//! Schema validation helpers for docroute JSON5 configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer (or the merged result) against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(
        map,
        &[
            "$schema",
            "detector",
            "classifier",
            "handlers",
            "memory",
            "server",
        ],
        layer,
        "",
    )?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("detector") {
        validate_detector(value, layer, "detector")?;
    }
    if let Some(value) = map.get("classifier") {
        validate_classifier(value, layer, "classifier")?;
    }
    if let Some(value) = map.get("handlers") {
        validate_handlers(value, layer, "handlers")?;
    }
    if let Some(value) = map.get("memory") {
        validate_memory(value, layer, "memory")?;
    }
    if let Some(value) = map.get("server") {
        validate_server(value, layer, "server")?;
    }
    Ok(())
}

/// Validate the "detector" block.
fn validate_detector(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["email_header_window"], layer, path)?;
    if let Some(value) = map.get("email_header_window") {
        expect_u64(value, layer, &join_path(path, "email_header_window"))?;
    }
    Ok(())
}

/// Validate the "classifier" block.
fn validate_classifier(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["triggers", "min_score"], layer, path)?;
    if let Some(value) = map.get("min_score") {
        expect_f64(value, layer, &join_path(path, "min_score"))?;
    }
    if let Some(value) = map.get("triggers") {
        let triggers_path = join_path(path, "triggers");
        let triggers = expect_object(value, layer, &triggers_path)?;
        ensure_allowed_keys(
            triggers,
            &["invoice", "rfq", "complaint", "regulation"],
            layer,
            &triggers_path,
        )?;
        for (intent, list) in triggers {
            validate_string_array(list, layer, &join_path(&triggers_path, intent))?;
        }
    }
    Ok(())
}

/// Validate the "handlers" block.
fn validate_handlers(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["body_excerpt_chars", "text_excerpt_chars", "urgency"],
        layer,
        path,
    )?;
    for key in ["body_excerpt_chars", "text_excerpt_chars"] {
        if let Some(value) = map.get(key) {
            expect_u64(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("urgency") {
        let urgency_path = join_path(path, "urgency");
        let urgency = expect_object(value, layer, &urgency_path)?;
        ensure_allowed_keys(urgency, &["high", "medium"], layer, &urgency_path)?;
        for (level, list) in urgency {
            validate_string_array(list, layer, &join_path(&urgency_path, level))?;
        }
    }
    Ok(())
}

/// Validate the "memory" block.
fn validate_memory(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["max_records", "excerpt_chars"], layer, path)?;
    if let Some(value) = map.get("max_records") {
        if !value.is_null() {
            expect_u64(value, layer, &join_path(path, "max_records"))?;
        }
    }
    if let Some(value) = map.get("excerpt_chars") {
        expect_u64(value, layer, &join_path(path, "excerpt_chars"))?;
    }
    Ok(())
}

/// Validate the "server" block.
fn validate_server(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["bind", "max_upload_bytes", "permissive_cors"],
        layer,
        path,
    )?;
    if let Some(value) = map.get("bind") {
        expect_string(value, layer, &join_path(path, "bind"))?;
    }
    if let Some(value) = map.get("max_upload_bytes") {
        expect_u64(value, layer, &join_path(path, "max_upload_bytes"))?;
    }
    if let Some(value) = map.get("permissive_cors") {
        expect_bool(value, layer, &join_path(path, "permissive_cors"))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    value
        .as_object()
        .ok_or_else(|| invalid_field(layer, path, "expected object"))
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    match value {
        Value::String(_) => Ok(()),
        _ => Err(invalid_field(layer, path, "expected string")),
    }
}

/// Expect a JSON boolean or return a typed error.
fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    match value {
        Value::Bool(_) => Ok(()),
        _ => Err(invalid_field(layer, path, "expected bool")),
    }
}

/// Expect a non-negative JSON integer or return a typed error.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

/// Expect a JSON number or return a typed error.
fn expect_f64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_number() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected number"))
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Value::Array(entries) = value else {
        return Err(invalid_field(layer, path, "expected array"));
    };
    match entries.iter().position(|entry| !entry.is_string()) {
        Some(idx) => Err(invalid_field(
            layer,
            &format!("{path}[{idx}]"),
            "expected string",
        )),
        None => Ok(()),
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    match map.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(invalid_field(layer, &join_path(path, key), "unknown key")),
        None => Ok(()),
    }
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
