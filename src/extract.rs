//! Hashtag extraction from a single post.
//!
//! Posts are handled as plain [`serde_json::Value`]s: archives from different
//! Mastodon versions disagree on layout, so every field is optional and a
//! malformed entry is skipped instead of failing the post.

use serde_json::Value;

/// `type` marker ActivityPub uses for hashtag tags.
pub const HASHTAG_TYPE: &str = "Hashtag";

/// Returns the hashtags of one post in document order.
///
/// Looks at the post's own `tag` array, the `tag` array of a wrapped
/// `object` (the usual shape of an outbox `Create` activity) and the legacy
/// `tags` array. Duplicates are kept, so the caller counts occurrences.
///
/// # Example
/// ```
/// use mastodon_hashtags::extract_hashtags;
/// let post = serde_json::json!({"tag": [{"type": "Hashtag", "name": "#rust"}]});
/// assert_eq!(extract_hashtags(&post), vec!["rust".to_string()]);
/// ```
pub fn extract_hashtags(post: &Value) -> Vec<String> {
    let mut hashtags = Vec::new();
    collect_activity_tags(post.get("tag"), &mut hashtags);
    if let Some(object) = post.get("object") {
        collect_activity_tags(object.get("tag"), &mut hashtags);
    }
    collect_legacy_tags(post.get("tags"), &mut hashtags);
    hashtags
}

fn collect_activity_tags(tags: Option<&Value>, out: &mut Vec<String>) {
    let Some(tags) = tags.and_then(Value::as_array) else {
        return;
    };
    for tag in tags {
        if tag.get("type").and_then(Value::as_str) != Some(HASHTAG_TYPE) {
            continue;
        }
        if let Some(name) = tag.get("name").and_then(Value::as_str) {
            push_name(name, out);
        }
    }
}

// Older exports: [{"name": "foo"}] or ["#foo"], without a type marker.
fn collect_legacy_tags(tags: Option<&Value>, out: &mut Vec<String>) {
    let Some(tags) = tags.and_then(Value::as_array) else {
        return;
    };
    for tag in tags {
        match tag {
            Value::String(name) => push_name(name, out),
            Value::Object(map) => {
                if let Some(name) = map.get("name").and_then(Value::as_str) {
                    push_name(name, out);
                }
            }
            _ => {}
        }
    }
}

fn push_name(name: &str, out: &mut Vec<String>) {
    let name = name.trim_start_matches('#');
    if !name.is_empty() {
        out.push(name.to_string());
    }
}
