//! Document metadata: title, meta/Open-Graph/Twitter tags, favicon, font.

use crate::config::{FaviconConfig, FontConfig, SiteConfig};
use crate::dom::{Document, DomNode};
use crate::net::probe::{resolve_with_fallback, ImageProbe};

/// Set the document title and upsert every declared meta tag.
///
/// Undeclared fields are skipped; declared ones are upserted so a second
/// invocation updates rather than duplicates.
pub fn apply_metadata(doc: &mut Document, config: &SiteConfig) {
    if let Some(title) = &config.title {
        doc.set_title(title);
    }

    if let Some(meta) = &config.meta {
        upsert_name(doc, "description", meta.description.as_deref());
        upsert_name(doc, "keywords", meta.keywords.as_deref());
        upsert_name(doc, "author", meta.author.as_deref());
        upsert_name(doc, "robots", meta.robots.as_deref());
    }

    if let Some(og) = &config.open_graph {
        upsert_property(doc, "og:title", og.title.as_deref());
        upsert_property(doc, "og:description", og.description.as_deref());
        upsert_property(doc, "og:image", og.image.as_deref());
        upsert_property(doc, "og:url", og.url.as_deref());
        upsert_property(doc, "og:type", og.og_type.as_deref());
    }

    if let Some(tw) = &config.twitter {
        upsert_name(doc, "twitter:card", tw.card.as_deref());
        upsert_name(doc, "twitter:site", tw.site.as_deref());
        upsert_name(doc, "twitter:title", tw.title.as_deref());
        upsert_name(doc, "twitter:description", tw.description.as_deref());
        upsert_name(doc, "twitter:image", tw.image.as_deref());
    }
}

fn upsert_name(doc: &mut Document, key: &str, content: Option<&str>) {
    if let Some(content) = content {
        doc.upsert_meta(key, content, false);
    }
}

fn upsert_property(doc: &mut Document, key: &str, content: Option<&str>) {
    if let Some(content) = content {
        doc.upsert_meta(key, content, true);
    }
}

/// Upsert the `link[rel=icon]` tag from the favicon config.
///
/// Returns true when the fallback URL had to stand in for the primary.
pub fn apply_favicon(
    doc: &mut Document,
    favicon: &FaviconConfig,
    probe: &dyn ImageProbe,
    do_probe: bool,
) -> bool {
    let resolved = resolve_with_fallback(
        probe,
        favicon.relative.as_deref(),
        favicon.fallback.as_deref(),
        do_probe,
    );
    let Some(href) = resolved.url else {
        return false;
    };

    let mime = favicon.mime_type.clone().unwrap_or_else(|| "image/png".to_string());
    if let Some(link) = doc.link_by_rel_mut("icon") {
        link.set_attr("type", mime);
        link.set_attr("href", href);
    } else {
        doc.append_to_head(
            DomNode::element("link")
                .with_attr("rel", "icon")
                .with_attr("type", mime)
                .with_attr("href", href),
        );
    }
    resolved.used_fallback
}

/// Make sure the declared font stylesheet is present, exactly once.
///
/// A `cssPath` becomes a stylesheet link; a `url` + `name` pair becomes an
/// inline `@import` style declaring the `--main-font` variable.
pub fn ensure_font(doc: &mut Document, font: &FontConfig) {
    if let Some(css_path) = &font.css_path {
        if !doc.has_link_with_href(css_path) {
            doc.append_to_head(
                DomNode::element("link")
                    .with_attr("rel", "stylesheet")
                    .with_attr("href", css_path),
            );
        }
        return;
    }

    if let (Some(url), Some(name)) = (&font.url, &font.name) {
        let already_imported = doc
            .root
            .find(&|n: &DomNode| n.tag == "style" && n.collect_text().contains(url.as_str()))
            .is_some();
        if !already_imported {
            let css = format!(
                "@import url('{url}');\n:root {{ --main-font: '{name}', sans-serif; }}"
            );
            doc.append_to_head(DomNode::element("style").with_text(css));
        }
    }
}
