//! Tolerant extraction of an image reference from the upstream response.
//!
//! The generation endpoint's response shape is not strictly typed; the image
//! reference has been observed in several places. Extraction is an ordered
//! chain of shape-specific lookups, and the precedence is a compatibility
//! contract:
//!
//! 1. `data[0].url`
//! 2. `data[0].image_url`
//! 3. top-level `imageUrl`
//! 4. top-level `url`
//!
//! Empty strings count as absent.

use serde_json::Value;

type Extractor = fn(&Value) -> Option<String>;

const EXTRACTORS: &[Extractor] = &[
    first_item_url,
    first_item_image_url,
    top_level_image_url,
    top_level_url,
];

/// Try each known response shape in precedence order.
pub fn extract_image_url(body: &Value) -> Option<String> {
    EXTRACTORS.iter().find_map(|extract| extract(body))
}

fn non_empty(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn first_item(body: &Value) -> Option<&Value> {
    body.get("data")?.as_array()?.first()
}

fn first_item_url(body: &Value) -> Option<String> {
    non_empty(first_item(body)?.get("url")?)
}

fn first_item_image_url(body: &Value) -> Option<String> {
    non_empty(first_item(body)?.get("image_url")?)
}

fn top_level_image_url(body: &Value) -> Option<String> {
    non_empty(body.get("imageUrl")?)
}

fn top_level_url(body: &Value) -> Option<String> {
    non_empty(body.get("url")?)
}
