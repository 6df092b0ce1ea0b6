use thiserror::Error;

use crate::config::SiteConfig;
use crate::dom::{Document, DomNode};
use crate::net::fetch::{FetchError, TextFetcher};
use crate::net::probe::{ImageProbe, ProbePolicy};
use crate::render::{content, images, meta, profile, schema};

/// Where the configuration document lives: a primary same-origin path and
/// an optional remote mirror tried when the primary is unreachable.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    pub primary: String,
    pub fallback: Option<String>,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            primary: "/config.json".to_string(),
            fallback: None,
        }
    }
}

/// Error that aborts the whole pipeline.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("configuration unreachable: {0}")]
    Config(#[from] FetchError),
    #[error("configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What a render pass did, for logging and the viewer's status line.
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Section ids whose partial failed to load (contained failures).
    pub failed_sections: Vec<String>,
    /// How many icon/image references fell back to their remote URL.
    pub icon_fallbacks: usize,
    /// How many image sources were rewritten to delivery URLs.
    pub images_rewritten: usize,
    /// Whether the identity block rendered.
    pub identity_rendered: bool,
}

/// Headline shown in the identity block when the config is unreachable.
pub const APOLOGY_HEADING: &str = "Oops… something went wrong 🌟";
const APOLOGY_BODY: &str =
    "The page is not loading properly right now. Try again later, or find me on my socials!";

/// The page-rendering pipeline:
/// resolve config → metadata → favicon → font → identity → socials →
/// sections → links → structured data → image optimization.
///
/// Steps after config resolution are individually contained: one failing
/// region never stops the later steps. All per-entry probes run one at a
/// time in input order, which keeps DOM insertion order deterministic and
/// lets idempotency checks see completed prior state.
pub struct SiteEngine<F, P> {
    fetcher: F,
    probe: P,
    policy: ProbePolicy,
    sources: ConfigSources,
    partials_base: String,
}

impl<F: TextFetcher, P: ImageProbe> SiteEngine<F, P> {
    pub fn new(fetcher: F, probe: P) -> Self {
        Self {
            fetcher,
            probe,
            policy: ProbePolicy::default(),
            sources: ConfigSources::default(),
            partials_base: "/partials".to_string(),
        }
    }

    pub fn with_sources(mut self, sources: ConfigSources) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_partials_base(mut self, base: impl Into<String>) -> Self {
        self.partials_base = base.into();
        self
    }

    pub fn with_probe_policy(mut self, policy: ProbePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch and parse the configuration: primary location first, then the
    /// mirror. Each location is attempted exactly once.
    pub fn resolve_config(&self) -> Result<SiteConfig, PageError> {
        match self.fetch_config(&self.sources.primary) {
            Ok(config) => Ok(config),
            Err(primary_err) => {
                let Some(fallback) = &self.sources.fallback else {
                    return Err(primary_err);
                };
                log::warn!(
                    "primary config {} failed ({primary_err}), trying mirror",
                    self.sources.primary
                );
                self.fetch_config(fallback)
            }
        }
    }

    fn fetch_config(&self, url: &str) -> Result<SiteConfig, PageError> {
        let text = self.fetcher.fetch_text(url)?;
        Ok(SiteConfig::from_json(&text)?)
    }

    /// Run the whole pipeline against a document. On fatal config failure
    /// the identity block gets a friendly apology and the error is returned.
    pub fn render(&self, doc: &mut Document) -> Result<(SiteConfig, RenderReport), PageError> {
        let config = match self.resolve_config() {
            Ok(config) => config,
            Err(err) => {
                log::error!("config resolution failed: {err}");
                render_apology(doc);
                return Err(err);
            }
        };
        let report = self.render_with_config(doc, &config);
        Ok((config, report))
    }

    /// Steps 2–10, each contained; absence of a config field or a container
    /// silently skips that step only.
    pub fn render_with_config(&self, doc: &mut Document, config: &SiteConfig) -> RenderReport {
        let mut report = RenderReport::default();

        meta::apply_metadata(doc, config);

        if let Some(favicon) = &config.favicon {
            if meta::apply_favicon(doc, favicon, &self.probe, self.policy.favicon) {
                report.icon_fallbacks += 1;
            }
        }

        if let Some(font) = &config.font {
            meta::ensure_font(doc, font);
        }

        report.identity_rendered =
            profile::render_identity(doc, config, &self.probe, self.policy.profile_image);

        report.icon_fallbacks += profile::render_socials(
            doc,
            &config.primary_socials,
            &self.probe,
            self.policy.icons,
        );

        report.failed_sections =
            content::render_sections(doc, &config.sections, &self.fetcher, &self.partials_base);

        report.icon_fallbacks +=
            content::render_links(doc, &config.link_buttons, &self.probe, self.policy.icons);

        schema::emit_schema(doc, config);

        if let Some(opts) = &config.image_optimizations {
            report.images_rewritten = images::optimize_images(doc, opts);
        }

        log::info!(
            "page rendered: identity={}, failed_sections={}, icon_fallbacks={}, images_rewritten={}",
            report.identity_rendered,
            report.failed_sections.len(),
            report.icon_fallbacks,
            report.images_rewritten
        );
        report
    }
}

fn render_apology(doc: &mut Document) {
    if let Some(home) = doc.element_by_id_mut(profile::HOME_ID) {
        home.set_children(vec![
            DomNode::element("h1").with_text(APOLOGY_HEADING),
            DomNode::element("p").with_text(APOLOGY_BODY),
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_document;
    use crate::engine::host::DEFAULT_HOST_PAGE;
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

    struct RemoteOnly;
    impl ImageProbe for RemoteOnly {
        fn loads(&self, url: &str) -> bool {
            url.starts_with("https://")
        }
    }

    const CONFIG_JSON: &str = r#"{
        "title": "Ina",
        "name": "Ina",
        "bio": "stargazer\nwelcome to my corner of the sky",
        "meta": {"description": "a night-sky profile"},
        "favicon": {"relative": "img/favicon.png", "fallback": "https://cdn.example/favicon.png"},
        "font": {"cssPath": "styles/font.css"},
        "profileImage": {"relative": "img/me.png", "fallback": "https://cdn.example/me.png", "alt": "me"},
        "primarySocials": [
            {"url": "https://a.example", "icon": {"relative": "img/a.png", "fallback": "https://cdn.example/a.png"}, "alt": "a"}
        ],
        "linkButtons": [
            {"url": "https://c.example", "icon": {"fallback": "https://cdn.example/c.png"}, "label": "C"}
        ],
        "sections": [
            {"id": "about", "partial": "about.html", "badge": "New"},
            {"id": "gallery", "partial": "gallery.html"}
        ],
        "schema": {"@type": "Person", "name": "Ina"},
        "imageOptimizations": {"cloudinaryBase": "https://res.cloudinary.com/demo/image/upload/", "params": "f_auto"}
    }"#;

    fn engine(map: HashMap<String, String>) -> SiteEngine<MapFetcher, RemoteOnly> {
        SiteEngine::new(MapFetcher(map), RemoteOnly)
    }

    #[test]
    fn full_pipeline_renders_every_region() {
        let map = HashMap::from([
            ("/config.json".to_string(), CONFIG_JSON.to_string()),
            (
                "/partials/about.html".to_string(),
                r#"<p>about text</p><img src="v12345678/shot.png">"#.to_string(),
            ),
        ]);
        let mut doc = parse_document(DEFAULT_HOST_PAGE);
        let (config, report) = engine(map).render(&mut doc).unwrap();

        assert!(report.identity_rendered);
        assert_eq!(config.title.as_deref(), Some("Ina"));
        // gallery has no container in the host page: silently skipped.
        assert!(report.failed_sections.is_empty());
        // socials icon probed false locally.
        assert!(report.icon_fallbacks >= 1);
        // The partial's image got rewritten after injection.
        assert_eq!(report.images_rewritten, 1);

        let html = doc.to_html();
        assert_eq!(doc.title().as_deref(), Some("Ina"));
        assert!(html.contains("a night-sky profile"));
        assert!(html.contains("styles/font.css"));
        assert!(html.contains("<h1>Ina</h1>"));
        assert!(html.contains("about text"));
        assert!(html.contains("application/ld+json"));
        assert!(html.contains("https://res.cloudinary.com/demo/image/upload/f_auto/v12345678/shot.png"));
    }

    #[test]
    fn section_failure_does_not_stop_later_steps() {
        let map = HashMap::from([("/config.json".to_string(), CONFIG_JSON.to_string())]);
        let mut doc = parse_document(DEFAULT_HOST_PAGE);
        let (_, report) = engine(map).render(&mut doc).unwrap();

        assert_eq!(report.failed_sections, vec!["about".to_string()]);
        let html = doc.to_html();
        assert!(html.contains(content::SECTION_ERROR_TEXT));
        // Links and schema still rendered after the failure.
        assert!(html.contains("social-link"));
        assert!(html.contains("application/ld+json"));
    }

    #[test]
    fn mirror_is_tried_when_primary_fails() {
        let map = HashMap::from([(
            "https://mirror.example/config.json".to_string(),
            "{}".to_string(),
        )]);
        let engine = engine(map).with_sources(ConfigSources {
            primary: "/config.json".to_string(),
            fallback: Some("https://mirror.example/config.json".to_string()),
        });
        assert!(engine.resolve_config().is_ok());
    }

    #[test]
    fn both_sources_failing_is_fatal_with_apology() {
        let engine = engine(HashMap::new()).with_sources(ConfigSources {
            primary: "/config.json".to_string(),
            fallback: Some("https://mirror.example/config.json".to_string()),
        });
        let mut doc = parse_document(DEFAULT_HOST_PAGE);
        let err = engine.render(&mut doc).unwrap_err();
        assert!(matches!(err, PageError::Config(_)));
        assert!(doc.to_html().contains(APOLOGY_HEADING));
    }

    #[test]
    fn invalid_json_is_fatal() {
        let map = HashMap::from([("/config.json".to_string(), "not json".to_string())]);
        let mut doc = parse_document(DEFAULT_HOST_PAGE);
        assert!(matches!(
            engine(map).render(&mut doc),
            Err(PageError::Parse(_))
        ));
    }

    #[test]
    fn empty_config_renders_placeholder_links_only() {
        let map = HashMap::from([("/config.json".to_string(), "{}".to_string())]);
        let mut doc = parse_document(DEFAULT_HOST_PAGE);
        let (_, report) = engine(map).render(&mut doc).unwrap();
        assert!(!report.identity_rendered);
        assert!(doc.to_html().contains(content::NO_LINKS_TEXT));
    }
}
