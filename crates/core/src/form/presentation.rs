//! Display helpers composed from well-known form properties.

use super::record::Form;
use super::FormValueStore;
use crate::error::CoreError;

/// Name parts in display order.
pub const NAME_PROPERTIES: [&str; 3] = ["last_name", "first_name", "middle_name"];

/// Property holding the uploaded photo file name or URL.
pub const AVATAR_PROPERTY: &str = "self_photo_file";

/// Join the non-empty name parts with `glue` (a space when `None`).
///
/// Parts missing from the form's template are skipped.
pub async fn full_name(
    form: &mut Form,
    store: &dyn FormValueStore,
    glue: Option<&str>,
) -> Result<String, CoreError> {
    let mut parts = Vec::with_capacity(NAME_PROPERTIES.len());
    for slug in NAME_PROPERTIES {
        if !form.has_property(slug) {
            continue;
        }
        if let Some(part) = form.property(store, slug).await? {
            let part = part.trim();
            if !part.is_empty() {
                parts.push(part.to_string());
            }
        }
    }
    Ok(parts.join(glue.unwrap_or(" ")))
}

/// Public URL of the form's photo. Absolute URLs are returned unchanged,
/// file names are resolved against `base_url`.
pub async fn avatar_url(
    form: &mut Form,
    store: &dyn FormValueStore,
    base_url: &str,
) -> Result<Option<String>, CoreError> {
    if !form.has_property(AVATAR_PROPERTY) {
        return Ok(None);
    }
    let Some(file) = form.property(store, AVATAR_PROPERTY).await? else {
        return Ok(None);
    };
    let file = file.trim();
    if file.is_empty() {
        return Ok(None);
    }
    if file.starts_with("http://") || file.starts_with("https://") {
        return Ok(Some(file.to_string()));
    }
    Ok(Some(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        file.trim_start_matches('/')
    )))
}
