//! The single traversal shared by discovery and rewriting.
//!
//! Both passes run exactly this code; they differ only in the callback. As
//! long as the callback answers `Remove` for the same URLs in both passes,
//! the set of URLs each pass sees is identical.

use serde_json::{Map, Value};

use crate::reference::is_reference;

/// Top-level lists whose elements carry an `href`; a blocked href is removed
/// from the element.
pub const LINK_LISTS: &[&str] = &["links", "images", "readingOrder"];

/// Top-level list whose elements are dropped entirely when their href is blocked.
pub const RESOURCES: &str = "resources";

/// What to do with one reference found during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlAction {
    Keep,
    Replace(String),
    /// Remove the string from its container (key or sequence element).
    Remove,
}

/// Callback invoked once per reference occurrence.
pub type Visitor<'a> = dyn FnMut(&str) -> UrlAction + 'a;

/// Runs the structural pass over the recognized top-level fields, then the
/// deep pass over everything. Strings replaced in the structural pass no
/// longer look like references, so the deep pass does not see them twice.
pub fn walk(manifest: &mut Value, visit: &mut Visitor<'_>) {
    structural(manifest, visit);
    deep(manifest, visit);
}

fn structural(manifest: &mut Value, visit: &mut Visitor<'_>) {
    let Some(root) = manifest.as_object_mut() else {
        return;
    };

    for key in LINK_LISTS {
        if let Some(Value::Array(items)) = root.get_mut(*key) {
            for item in items.iter_mut() {
                if let Value::Object(obj) = item {
                    if apply_field(obj, "href", visit) {
                        remove_key(obj, "href");
                    }
                }
            }
        }
    }

    if let Some(Value::Array(items)) = root.get_mut(RESOURCES) {
        items.retain_mut(|item| match item {
            Value::Object(obj) => !apply_field(obj, "href", visit),
            _ => true,
        });
    }

    if let Some(Value::Object(meta)) = root.get_mut("metadata") {
        if apply_field(meta, "identifier", visit) {
            remove_key(meta, "identifier");
        }
    }
}

/// Applies `visit` to `obj[key]` when it is a reference string. Returns true
/// when the caller must remove it.
fn apply_field(obj: &mut Map<String, Value>, key: &str, visit: &mut Visitor<'_>) -> bool {
    match obj.get_mut(key) {
        Some(value) => !apply_in_place(value, visit),
        None => false,
    }
}

fn deep(value: &mut Value, visit: &mut Visitor<'_>) {
    match value {
        Value::Object(map) => {
            let mut dropped = Vec::new();
            for (key, child) in map.iter_mut() {
                if !apply_in_place(child, visit) {
                    dropped.push(key.clone());
                }
            }
            if !dropped.is_empty() {
                map.retain(|k, _| !dropped.contains(k));
            }
        }
        Value::Array(items) => items.retain_mut(|child| apply_in_place(child, visit)),
        _ => {}
    }
}

/// Rewrites a reference string in place or recurses into containers.
/// Returns false when the value must be removed from its parent.
fn apply_in_place(value: &mut Value, visit: &mut Visitor<'_>) -> bool {
    if let Value::String(s) = value {
        if !is_reference(s.as_str()) {
            return true;
        }
        return match visit(s.as_str()) {
            UrlAction::Keep => true,
            UrlAction::Replace(new) => {
                *s = new;
                true
            }
            UrlAction::Remove => false,
        };
    }
    if value.is_object() || value.is_array() {
        deep(value, visit);
    }
    true
}

/// Order-preserving key removal.
fn remove_key(obj: &mut Map<String, Value>, key: &str) {
    obj.retain(|k, _| k != key);
}
