//! Partial-driven sections and the link list.

use crate::config::{LinkButton, SectionConfig};
use crate::dom::{parser::parse_fragment, Document, DomNode};
use crate::net::fetch::TextFetcher;
use crate::net::probe::{resolve_with_fallback, ImageProbe};

/// Mount point for the link list rows.
pub const LINKS_CONTAINER_ID: &str = "all-links-container";

/// Shown inside a section whose partial could not be fetched.
pub const SECTION_ERROR_TEXT: &str = "Content could not be loaded 😔";

/// Shown when the link list is configured but empty.
pub const NO_LINKS_TEXT: &str = "No links available… 🌙";

/// Fill every declared section from its partial fragment.
///
/// The home section appends, all others replace their content. A failed
/// fetch is contained: that section gets a visible error paragraph and the
/// remaining sections still render. Returns the ids of failed sections.
pub fn render_sections(
    doc: &mut Document,
    sections: &[SectionConfig],
    fetcher: &dyn TextFetcher,
    partials_base: &str,
) -> Vec<String> {
    let mut failed = Vec::new();

    for section in sections {
        let (Some(id), Some(partial)) = (&section.id, &section.partial) else {
            continue;
        };
        if doc.element_by_id(id).is_none() {
            continue;
        }

        let url = format!("{}/{}", partials_base.trim_end_matches('/'), partial);
        match fetcher.fetch_text(&url) {
            Ok(html) => {
                let nodes = parse_fragment(&html);
                if let Some(el) = doc.element_by_id_mut(id) {
                    if id == super::profile::HOME_ID {
                        for node in nodes {
                            el.append_child(node);
                        }
                    } else {
                        el.set_children(nodes);
                    }
                }
            }
            Err(err) => {
                log::error!("failed to load partial {partial} for #{id}: {err}");
                failed.push(id.clone());
                if let Some(el) = doc.element_by_id_mut(id) {
                    el.set_children(vec![DomNode::element("p")
                        .with_attr("class", "section-error")
                        .with_text(SECTION_ERROR_TEXT)]);
                }
                continue;
            }
        }

        if let Some(badge) = &section.badge {
            if let Some(el) = doc.element_by_id_mut(id) {
                el.append_child(
                    DomNode::element("span")
                        .with_attr("class", "new-badge section-badge")
                        .with_text(badge.clone()),
                );
            }
        }
    }

    failed
}

/// Build the link list: one row per button in input order, or the
/// placeholder message when no buttons are configured.
///
/// Returns how many icons fell back to their remote URL.
pub fn render_links(
    doc: &mut Document,
    buttons: &[LinkButton],
    probe: &dyn ImageProbe,
    do_probe: bool,
) -> usize {
    if doc.element_by_id(LINKS_CONTAINER_ID).is_none() {
        return 0;
    }

    if buttons.is_empty() {
        if let Some(container) = doc.element_by_id_mut(LINKS_CONTAINER_ID) {
            container.set_children(vec![DomNode::element("p").with_text(NO_LINKS_TEXT)]);
        }
        return 0;
    }

    let mut rows = Vec::new();
    let mut fallbacks = 0;

    for button in buttons {
        let resolved = resolve_with_fallback(
            probe,
            button.icon.relative.as_deref(),
            button.icon.fallback.as_deref(),
            do_probe,
        );
        if resolved.used_fallback {
            log::warn!(
                "local icon {:?} missing, falling back to {:?}",
                button.icon.relative,
                resolved.url
            );
            fallbacks += 1;
        }

        let class = match &button.extra_class {
            Some(extra) => format!("social-link {extra}"),
            None => "social-link".to_string(),
        };
        let mut anchor = DomNode::element("a")
            .with_attr_opt("href", button.url.as_deref())
            .with_attr("class", class)
            .with_attr("target", "_blank")
            .with_attr("rel", "noopener noreferrer");
        anchor.append_child(
            DomNode::element("img")
                .with_attr_opt("src", resolved.url.as_deref())
                .with_attr("alt", button.alt.clone().unwrap_or_default())
                .with_attr("class", button.class.clone().unwrap_or_else(|| "social-icon".into())),
        );
        anchor.append_child(
            DomNode::element("span").with_text(button.label.clone().unwrap_or_default()),
        );
        if let Some(badge) = &button.badge {
            anchor.append_child(
                DomNode::element("span")
                    .with_attr("class", "new-badge")
                    .with_text(badge.clone()),
            );
        }
        rows.push(anchor);
    }

    if let Some(container) = doc.element_by_id_mut(LINKS_CONTAINER_ID) {
        container.set_children(rows);
    }
    fallbacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IconRef;
    use crate::dom::parser::parse_document;
    use crate::net::fetch::FetchError;
    use std::collections::HashMap;

    struct MapFetcher(HashMap<String, String>);
    impl TextFetcher for MapFetcher {
        fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
            self.0.get(url).cloned().ok_or(FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
        }
    }

    struct NoProbe;
    impl ImageProbe for NoProbe {
        fn loads(&self, _url: &str) -> bool {
            false
        }
    }

    fn host() -> Document {
        parse_document(
            r#"<html><head></head><body>
                <div id="home"><h1>kept</h1></div>
                <div id="about"><p>old</p></div>
                <div id="links"><div id="all-links-container"></div></div>
            </body></html>"#,
        )
    }

    fn section(id: &str, partial: &str, badge: Option<&str>) -> SectionConfig {
        SectionConfig {
            id: Some(id.into()),
            partial: Some(partial.into()),
            badge: badge.map(str::to_string),
        }
    }

    #[test]
    fn sections_replace_except_home_which_appends() {
        let mut doc = host();
        let fetcher = MapFetcher(HashMap::from([
            ("/partials/about.html".to_string(), "<p>new about</p>".to_string()),
            ("/partials/home.html".to_string(), "<p>welcome</p>".to_string()),
        ]));
        let sections = vec![
            section("home", "home.html", None),
            section("about", "about.html", Some("New")),
        ];
        let failed = render_sections(&mut doc, &sections, &fetcher, "/partials");
        assert!(failed.is_empty());

        let html = doc.to_html();
        assert!(html.contains("<h1>kept</h1>"));
        assert!(html.contains("welcome"));
        assert!(html.contains("new about"));
        assert!(!html.contains("<p>old</p>"));
        assert!(html.contains(r#"class="new-badge section-badge""#));
    }

    #[test]
    fn failed_section_is_contained() {
        let mut doc = host();
        let fetcher = MapFetcher(HashMap::from([(
            "/partials/about.html".to_string(),
            "<p>about me</p>".to_string(),
        )]));
        let sections = vec![
            section("home", "missing.html", None),
            section("about", "about.html", None),
        ];
        let failed = render_sections(&mut doc, &sections, &fetcher, "/partials");
        assert_eq!(failed, vec!["home".to_string()]);

        let html = doc.to_html();
        assert!(html.contains(SECTION_ERROR_TEXT));
        // Sibling section still rendered its partial.
        assert!(html.contains("about me"));
    }

    #[test]
    fn unknown_container_is_skipped() {
        let mut doc = host();
        let fetcher = MapFetcher(HashMap::new());
        let failed = render_sections(
            &mut doc,
            &[section("gallery", "gallery.html", None)],
            &fetcher,
            "/partials",
        );
        assert!(failed.is_empty());
        assert!(!doc.to_html().contains(SECTION_ERROR_TEXT));
    }

    fn button(url: &str, label: &str) -> LinkButton {
        LinkButton {
            url: Some(url.into()),
            icon: IconRef {
                relative: None,
                fallback: Some("https://cdn.example/icon.png".into()),
            },
            alt: Some("icon".into()),
            class: None,
            extra_class: Some("wide".into()),
            label: Some(label.into()),
            badge: None,
        }
    }

    #[test]
    fn empty_list_renders_placeholder_only() {
        let mut doc = host();
        render_links(&mut doc, &[], &NoProbe, true);
        let html = doc.to_html();
        assert!(html.contains(NO_LINKS_TEXT));
        assert!(!html.contains("social-link"));
    }

    #[test]
    fn rows_render_in_order_with_label_and_classes() {
        let mut doc = host();
        let buttons = vec![button("https://one.example", "One"), button("https://two.example", "Two")];
        let fallbacks = render_links(&mut doc, &buttons, &NoProbe, true);
        assert_eq!(fallbacks, 2); // relative missing, fallback substituted

        let html = doc.to_html();
        assert!(html.contains(r#"class="social-link wide""#));
        assert!(html.contains(r#"class="social-icon""#));
        assert!(html.contains("<span>One</span>"));
        let one = html.find("https://one.example").unwrap();
        let two = html.find("https://two.example").unwrap();
        assert!(one < two);
        assert!(!html.contains(NO_LINKS_TEXT));
    }
}
