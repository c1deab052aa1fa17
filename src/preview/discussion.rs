use serde_json::Value;

/// Most comment bodies stitched into one preview.
pub const MAX_COMMENT_BODIES: usize = 3;

/// Pull comment bodies out of a discussion-thread response.
///
/// The thread API answers with `[post_listing, comment_listing]`; bodies live
/// at `[1].data.children[*].data.body`. Returns `None` when that shape is not
/// there, and otherwise the first non-blank string bodies, trimmed.
pub fn extract_comment_bodies(thread: &Value) -> Option<Vec<String>> {
    let children = thread
        .as_array()?
        .get(1)?
        .get("data")?
        .get("children")?
        .as_array()?;

    let bodies = children
        .iter()
        .filter_map(|child| child.get("data")?.get("body")?.as_str())
        .map(str::trim)
        .filter(|body| !body.is_empty())
        .take(MAX_COMMENT_BODIES)
        .map(str::to_string)
        .collect();

    Some(bodies)
}
