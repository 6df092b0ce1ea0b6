//! Remote-image rewriting to optimized delivery URLs.
//!
//! After all content is in the tree, every `<img>` whose originally-authored
//! source looks like a Cloudinary asset (a version-prefixed remainder like
//! `v1712345678/...`, or a full URL on a Cloudinary host) is pointed at the
//! configured delivery base with transformation parameters. Ordinary
//! relative paths are left untouched.

use crate::config::ImageOptimizations;
use crate::dom::Document;

/// Attribute recording the authored source before the first rewrite, so a
/// repeated pass rewrites from the original rather than the rewritten URL.
pub const ORIGINAL_SRC_ATTR: &str = "data-src-original";

const CDN_HOSTS: &[&str] = &["cloudinary.com"];
const UPLOAD_MARKER: &str = "/upload/";
const DEFAULT_LOADING: &str = "lazy";
const DEFAULT_SIZES: &str = "(max-width: 600px) 100vw, 50vw";

/// Rewrite every recognized remote image in the document. Returns the
/// number of rewritten images.
pub fn optimize_images(doc: &mut Document, opts: &ImageOptimizations) -> usize {
    let (Some(base), Some(params)) = (&opts.cloudinary_base, &opts.params) else {
        log::warn!("imageOptimizations missing cloudinaryBase/params, skipping");
        return 0;
    };

    let loading = opts.loading.as_deref().unwrap_or(DEFAULT_LOADING);
    let sizes = opts.sizes.as_deref().unwrap_or(DEFAULT_SIZES);
    let mut rewritten = 0;

    doc.for_each_image_mut(|img| {
        let original = img
            .attr(ORIGINAL_SRC_ATTR)
            .or_else(|| img.attr("src"))
            .map(str::to_string);
        let Some(original) = original else {
            return;
        };
        if !is_remote_asset(&original) {
            return;
        }

        let src = delivery_url(base, params, &original);
        log::debug!("rewriting image {original} -> {src}");
        img.set_attr(ORIGINAL_SRC_ATTR, original);
        img.set_attr("src", src);
        img.set_attr("loading", loading);
        img.set_attr("sizes", sizes);
        rewritten += 1;
    });

    rewritten
}

/// Version-prefixed remainder (`v` + 8–12 digits + `/`) or a known CDN host.
fn is_remote_asset(src: &str) -> bool {
    if has_version_prefix(src) {
        return true;
    }
    CDN_HOSTS.iter().any(|host| src.contains(host))
}

fn has_version_prefix(src: &str) -> bool {
    let Some(rest) = src.strip_prefix('v') else {
        return false;
    };
    let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    (8..=12).contains(&digits) && rest.as_bytes().get(digits) == Some(&b'/')
}

/// `base + params + '/' + remainder`, where the remainder is everything
/// after the upload marker, or the whole value when no marker exists.
fn delivery_url(base: &str, params: &str, original: &str) -> String {
    let remainder = match original.find(UPLOAD_MARKER) {
        Some(pos) => &original[pos + UPLOAD_MARKER.len()..],
        None => original,
    };
    format!("{base}{params}/{remainder}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_document;

    fn opts() -> ImageOptimizations {
        ImageOptimizations {
            cloudinary_base: Some("https://res.cloudinary.com/demo/image/upload/".into()),
            params: Some("f_auto,q_auto".into()),
            loading: None,
            sizes: None,
        }
    }

    fn page(srcs: &[&str]) -> Document {
        let imgs: String = srcs.iter().map(|s| format!(r#"<img src="{s}">"#)).collect();
        parse_document(&format!("<html><head></head><body>{imgs}</body></html>"))
    }

    #[test]
    fn version_prefixed_path_is_rewritten() {
        let mut doc = page(&["v17123456789/portrait.png"]);
        assert_eq!(optimize_images(&mut doc, &opts()), 1);
        let html = doc.to_html();
        assert!(html.contains(
            "https://res.cloudinary.com/demo/image/upload/f_auto,q_auto/v17123456789/portrait.png"
        ));
        assert!(html.contains(r#"loading="lazy""#));
        assert!(html.contains(r#"sizes="(max-width: 600px) 100vw, 50vw""#));
    }

    #[test]
    fn full_cdn_url_uses_upload_remainder() {
        let mut doc = page(&["https://res.cloudinary.com/demo/image/upload/v12345678/pic.jpg"]);
        optimize_images(&mut doc, &opts());
        assert!(doc.to_html().contains(
            "https://res.cloudinary.com/demo/image/upload/f_auto,q_auto/v12345678/pic.jpg"
        ));
    }

    #[test]
    fn ordinary_relative_path_untouched() {
        let mut doc = page(&["/img/logo.png", "img/icon.png"]);
        assert_eq!(optimize_images(&mut doc, &opts()), 0);
        let html = doc.to_html();
        assert!(html.contains(r#"src="/img/logo.png""#));
        assert!(!html.contains("f_auto"));
    }

    #[test]
    fn version_prefix_bounds() {
        assert!(has_version_prefix("v12345678/x.png")); // 8 digits
        assert!(has_version_prefix("v123456789012/x.png")); // 12 digits
        assert!(!has_version_prefix("v1234567/x.png")); // 7 digits
        assert!(!has_version_prefix("v1234567890123/x.png")); // 13 digits
        assert!(!has_version_prefix("v12345678x.png")); // no slash
        assert!(!has_version_prefix("version2/x.png"));
    }

    #[test]
    fn second_pass_rewrites_from_the_original() {
        let mut doc = page(&["v12345678/pic.jpg"]);
        optimize_images(&mut doc, &opts());
        let first = doc.to_html();

        // A repeated pass reads the recorded original, not the rewritten URL.
        optimize_images(&mut doc, &opts());
        assert_eq!(doc.to_html(), first);
        assert!(first.contains(r#"data-src-original="v12345678/pic.jpg""#));
        assert!(!first.contains("f_auto,q_auto/f_auto"));
    }

    #[test]
    fn custom_loading_and_sizes_respected() {
        let mut doc = page(&["v12345678/pic.jpg"]);
        let opts = ImageOptimizations {
            loading: Some("eager".into()),
            sizes: Some("100vw".into()),
            ..opts()
        };
        optimize_images(&mut doc, &opts);
        let html = doc.to_html();
        assert!(html.contains(r#"loading="eager""#));
        assert!(html.contains(r#"sizes="100vw""#));
    }
}
