//! JSON merge helpers for layered configuration.

use serde_json::{Map, Value};

/// Merge `overlay` into `base`, recursing through objects.
///
/// Keys that hold a non-object value in `locked` are left untouched; objects
/// in `locked` constrain the matching subtree. Arrays and scalars replace.
pub(super) fn merge_layer(base: &mut Value, overlay: &Value, locked: Option<&Value>) {
    if !(base.is_object() && overlay.is_object()) {
        if locked.is_none() {
            *base = overlay.clone();
        }
        return;
    }
    let (Some(base_map), Some(overlay_map)) = (base.as_object_mut(), overlay.as_object()) else {
        return;
    };
    let locked_map = match locked {
        Some(Value::Object(map)) => Some(map),
        Some(_) => return,
        None => None,
    };

    for (key, value) in overlay_map {
        let constraint = locked_map.and_then(|map| map.get(key));
        if matches!(constraint, Some(c) if !c.is_object()) {
            continue;
        }
        match base_map.get_mut(key) {
            Some(existing) => merge_layer(existing, value, constraint),
            None if constraint.is_some() => {
                let mut fresh = Value::Object(Map::new());
                merge_layer(&mut fresh, value, constraint);
                base_map.insert(key.clone(), fresh);
            }
            None => {
                base_map.insert(key.clone(), value.clone());
            }
        }
    }
}
