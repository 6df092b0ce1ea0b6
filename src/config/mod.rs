//! The externally supplied configuration document.
//!
//! Every sub-record is optional: a missing field skips the dependent
//! rendering step but never halts the pipeline. Field names follow the
//! JSON document (camelCase).

use serde::Deserialize;

/// Root configuration document, fetched as JSON at page load.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub title: Option<String>,
    pub name: Option<String>,
    /// Bio text; lines are separated by `\n`. The first line is rendered
    /// highlighted, the rest as secondary paragraph content.
    pub bio: Option<String>,
    pub site_credit: Option<String>,
    pub meta: Option<MetaConfig>,
    pub open_graph: Option<OpenGraphConfig>,
    pub twitter: Option<TwitterConfig>,
    pub favicon: Option<FaviconConfig>,
    pub font: Option<FontConfig>,
    pub profile_image: Option<ProfileImageConfig>,
    pub primary_socials: Vec<SocialEntry>,
    pub link_buttons: Vec<LinkButton>,
    pub sections: Vec<SectionConfig>,
    /// Partial JSON-LD record; completed with derived fields on emission.
    pub schema: Option<serde_json::Value>,
    pub image_optimizations: Option<ImageOptimizations>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaConfig {
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub author: Option<String>,
    pub robots: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenGraphConfig {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub og_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TwitterConfig {
    pub card: Option<String>,
    pub site: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaviconConfig {
    pub relative: Option<String>,
    pub fallback: Option<String>,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
}

/// Font declaration. Two observed shapes: a stylesheet path to link, or a
/// remote URL + family name imported via an inline style.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontConfig {
    pub css_path: Option<String>,
    pub url: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileImageConfig {
    pub relative: Option<String>,
    pub fallback: Option<String>,
    pub alt: Option<String>,
}

/// A primary/fallback pair for one icon asset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IconRef {
    pub relative: Option<String>,
    pub fallback: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialEntry {
    pub url: Option<String>,
    pub icon: IconRef,
    pub alt: Option<String>,
    pub class: Option<String>,
    pub badge: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkButton {
    pub url: Option<String>,
    pub icon: IconRef,
    pub alt: Option<String>,
    pub class: Option<String>,
    pub extra_class: Option<String>,
    pub label: Option<String>,
    pub badge: Option<String>,
}

/// One content section, filled from a partial markup fragment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionConfig {
    pub id: Option<String>,
    pub partial: Option<String>,
    pub badge: Option<String>,
}

/// Rewrite rule for detected remote-image sources.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageOptimizations {
    pub cloudinary_base: Option<String>,
    pub params: Option<String>,
    pub loading: Option<String>,
    pub sizes: Option<String>,
}

impl SiteConfig {
    /// Parse a configuration document from raw JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Bio split into lines, empty when no bio is configured.
    pub fn bio_lines(&self) -> Vec<&str> {
        self.bio.as_deref().map(|b| b.split('\n').collect()).unwrap_or_default()
    }
}
