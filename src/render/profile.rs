//! Identity block and primary social links.

use crate::config::{SiteConfig, SocialEntry};
use crate::dom::{Document, DomNode};
use crate::net::probe::{resolve_with_fallback, ImageProbe};

/// Mount point for the identity block and primary content region.
pub const HOME_ID: &str = "home";

/// Populate the identity block: profile image, name heading, highlighted
/// first bio line, then any remaining bio lines as one secondary paragraph.
///
/// Skipped silently unless the `#home` container and the profile image,
/// name and bio are all present. Also fills `.site-credit` when configured.
pub fn render_identity(
    doc: &mut Document,
    config: &SiteConfig,
    probe: &dyn ImageProbe,
    do_probe: bool,
) -> bool {
    if let Some(credit) = &config.site_credit {
        if let Some(el) = doc.first_by_class_mut("site-credit") {
            el.set_text_content(credit.clone());
        }
    }

    let (Some(image), Some(name), Some(_bio)) =
        (&config.profile_image, &config.name, &config.bio)
    else {
        return false;
    };
    if doc.element_by_id(HOME_ID).is_none() {
        return false;
    }

    let resolved = resolve_with_fallback(
        probe,
        image.relative.as_deref(),
        image.fallback.as_deref(),
        do_probe,
    );
    if resolved.used_fallback {
        log::warn!(
            "profile image {:?} unavailable, using fallback",
            image.relative
        );
    }

    let lines = config.bio_lines();
    let mut children = Vec::new();

    children.push(
        DomNode::element("img")
            .with_attr_opt("src", resolved.url.as_deref())
            .with_attr("alt", image.alt.clone().unwrap_or_default())
            .with_attr("class", "profile-img"),
    );
    children.push(DomNode::element("h1").with_text(name.clone()));
    if let Some(first) = lines.first() {
        children.push(
            DomNode::element("p")
                .with_attr("class", "bio-highlight")
                .with_text(*first),
        );
    }
    if lines.len() > 1 {
        let mut extra = DomNode::element("p");
        for (i, line) in lines[1..].iter().enumerate() {
            if i > 0 {
                extra.append_child(DomNode::element("br"));
            }
            extra.append_child(DomNode::text(*line));
        }
        children.push(extra);
    }

    if let Some(home) = doc.element_by_id_mut(HOME_ID) {
        home.set_children(children);
    }
    true
}

/// Append the primary social links to the identity block, in input order.
///
/// Icons are probed one at a time so DOM insertion order stays deterministic.
/// Returns how many entries fell back to their remote icon.
pub fn render_socials(
    doc: &mut Document,
    socials: &[SocialEntry],
    probe: &dyn ImageProbe,
    do_probe: bool,
) -> usize {
    if socials.is_empty() || doc.element_by_id(HOME_ID).is_none() {
        return 0;
    }

    let mut container = DomNode::element("div").with_attr("class", "primary-socials");
    let mut fallbacks = 0;

    for social in socials {
        let resolved = resolve_with_fallback(
            probe,
            social.icon.relative.as_deref(),
            social.icon.fallback.as_deref(),
            do_probe,
        );
        if resolved.used_fallback {
            log::warn!(
                "local icon {:?} missing, falling back to {:?}",
                social.icon.relative,
                resolved.url
            );
            fallbacks += 1;
        }

        let mut anchor = DomNode::element("a")
            .with_attr_opt("href", social.url.as_deref())
            .with_attr("target", "_blank")
            .with_attr("rel", "noopener noreferrer");
        anchor.append_child(
            DomNode::element("img")
                .with_attr_opt("src", resolved.url.as_deref())
                .with_attr("alt", social.alt.clone().unwrap_or_default())
                .with_attr("class", social.class.clone().unwrap_or_default()),
        );
        if let Some(badge) = &social.badge {
            anchor.append_child(
                DomNode::element("span")
                    .with_attr("class", "new-badge")
                    .with_text(badge.clone()),
            );
        }
        container.append_child(anchor);
    }

    if let Some(home) = doc.element_by_id_mut(HOME_ID) {
        home.append_child(container);
    }
    fallbacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IconRef, ProfileImageConfig};
    use crate::dom::parser::parse_document;

    struct LocalMissing;
    impl ImageProbe for LocalMissing {
        fn loads(&self, url: &str) -> bool {
            url.starts_with("https://")
        }
    }

    fn host() -> Document {
        parse_document(
            r#"<html><head></head><body>
                <div id="home"></div>
                <p class="site-credit"></p>
            </body></html>"#,
        )
    }

    fn full_config() -> SiteConfig {
        SiteConfig {
            name: Some("Ina".into()),
            bio: Some("stargazer\nsecond line\nthird line".into()),
            site_credit: Some("made at night".into()),
            profile_image: Some(ProfileImageConfig {
                relative: Some("img/me.png".into()),
                fallback: Some("https://cdn.example/me.png".into()),
                alt: Some("portrait".into()),
            }),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn identity_renders_image_name_and_bio() {
        let mut doc = host();
        assert!(render_identity(&mut doc, &full_config(), &LocalMissing, false));
        let html = doc.to_html();
        assert!(html.contains(r#"class="profile-img""#));
        assert!(html.contains("img/me.png"));
        assert!(html.contains("<h1>Ina</h1>"));
        assert!(html.contains(r#"class="bio-highlight""#));
        assert!(html.contains("stargazer"));
        // Remaining lines joined with <br> in one paragraph.
        assert!(html.contains("second line<br>third line"));
        assert!(html.contains("made at night"));
    }

    #[test]
    fn identity_skipped_without_required_fields() {
        let mut doc = host();
        let config = SiteConfig {
            name: Some("Ina".into()),
            ..SiteConfig::default()
        };
        assert!(!render_identity(&mut doc, &config, &LocalMissing, false));
        assert!(!doc.to_html().contains("<h1>"));
    }

    #[test]
    fn identity_skipped_without_home_container() {
        let mut doc = parse_document("<html><head></head><body></body></html>");
        assert!(!render_identity(&mut doc, &full_config(), &LocalMissing, false));
    }

    #[test]
    fn probed_profile_image_falls_back() {
        let mut doc = host();
        render_identity(&mut doc, &full_config(), &LocalMissing, true);
        let html = doc.to_html();
        assert!(html.contains("https://cdn.example/me.png"));
        assert!(!html.contains(r#"src="img/me.png""#));
    }

    fn social(url: &str, relative: &str, badge: Option<&str>) -> SocialEntry {
        SocialEntry {
            url: Some(url.into()),
            icon: IconRef {
                relative: Some(relative.into()),
                fallback: Some(format!("https://cdn.example/{relative}")),
            },
            alt: Some("icon".into()),
            class: Some("social-icon".into()),
            badge: badge.map(str::to_string),
        }
    }

    #[test]
    fn socials_render_in_input_order_with_fallbacks() {
        let mut doc = host();
        let socials = vec![
            social("https://a.example", "a.png", None),
            social("https://b.example", "b.png", Some("New")),
        ];
        let fallbacks = render_socials(&mut doc, &socials, &LocalMissing, true);
        assert_eq!(fallbacks, 2);

        let html = doc.to_html();
        assert!(html.contains(r#"class="primary-socials""#));
        assert!(html.contains("https://cdn.example/a.png"));
        assert!(html.contains("https://cdn.example/b.png"));
        let a = html.find("https://a.example").unwrap();
        let b = html.find("https://b.example").unwrap();
        assert!(a < b);
        assert!(html.contains(r#"<span class="new-badge">New</span>"#));
    }

    #[test]
    fn empty_socials_add_no_container() {
        let mut doc = host();
        assert_eq!(render_socials(&mut doc, &[], &LocalMissing, true), 0);
        assert!(!doc.to_html().contains("primary-socials"));
    }
}
