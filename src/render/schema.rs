//! Structured-data (JSON-LD) emission.

use serde_json::{json, Value};

use crate::config::SiteConfig;
use crate::dom::{Document, DomNode};

/// Merge the declared partial schema record with derived fields and append
/// it to `<head>` as one `application/ld+json` script block.
///
/// Derived fields: `image` from the profile image (fallback preferred, it is
/// the stable remote copy), `description` from the meta description or bio,
/// and `sameAs` as the order-preserving de-duplicated union of all social
/// and link-button URLs.
pub fn emit_schema(doc: &mut Document, config: &SiteConfig) {
    let Some(declared) = &config.schema else {
        return;
    };

    let mut schema = match declared {
        Value::Object(map) => map.clone(),
        _ => {
            log::warn!("schema config is not a JSON object, skipping");
            return;
        }
    };

    let image = config
        .profile_image
        .as_ref()
        .and_then(|p| p.fallback.clone().or_else(|| p.relative.clone()))
        .unwrap_or_default();
    schema.insert("image".to_string(), json!(image));

    let description = config
        .meta
        .as_ref()
        .and_then(|m| m.description.clone())
        .or_else(|| config.bio.clone())
        .unwrap_or_default();
    schema.insert("description".to_string(), json!(description));

    schema.insert("sameAs".to_string(), Value::Array(same_as(config)));

    let body = match serde_json::to_string_pretty(&Value::Object(schema)) {
        Ok(body) => body,
        Err(err) => {
            log::error!("failed to serialize schema: {err}");
            return;
        }
    };

    doc.append_to_head(
        DomNode::element("script")
            .with_attr("type", "application/ld+json")
            .with_text(body),
    );
}

/// All social URLs, primary socials first, then link buttons, first
/// occurrence wins, empty URLs excluded.
fn same_as(config: &SiteConfig) -> Vec<Value> {
    let mut seen = Vec::new();
    let urls = config
        .primary_socials
        .iter()
        .filter_map(|s| s.url.as_deref())
        .chain(config.link_buttons.iter().filter_map(|b| b.url.as_deref()));
    for url in urls {
        if !url.is_empty() && !seen.iter().any(|u| u == url) {
            seen.push(url.to_string());
        }
    }
    seen.into_iter().map(Value::String).collect()
}
