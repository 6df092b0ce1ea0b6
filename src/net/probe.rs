//! Image-availability probing.
//!
//! The "prefer the local asset, fall back to the remote one" pattern recurs
//! for the favicon, the profile image and every icon. It is implemented once
//! here: a probe that never errors, and a resolver parameterized by the
//! (primary, fallback) pair.

use std::time::Duration;

/// Asynchronous-in-spirit availability check: does this URL load as an image?
///
/// Implementations must resolve for any input — an empty or missing URL is
/// simply unavailable, never an error.
pub trait ImageProbe {
    fn loads(&self, url: &str) -> bool;
}

/// Probes by fetching the bytes and verifying they decode as an image.
pub struct HttpImageProbe {
    client: Option<reqwest::blocking::Client>,
}

impl HttpImageProbe {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .ok();
        Self { client }
    }
}

impl Default for HttpImageProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageProbe for HttpImageProbe {
    fn loads(&self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }
        let Some(client) = &self.client else {
            return false;
        };
        let Ok(resp) = client.get(url).send() else {
            return false;
        };
        if !resp.status().is_success() {
            return false;
        }
        let Ok(bytes) = resp.bytes() else {
            return false;
        };
        image::load_from_memory(&bytes).is_ok()
    }
}

/// Which asset classes get probed before use. Unprobed classes trust the
/// primary reference directly (fallback only fills a missing primary).
#[derive(Debug, Clone, Copy)]
pub struct ProbePolicy {
    pub favicon: bool,
    pub profile_image: bool,
    pub icons: bool,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        // The icons are the assets most often missing locally.
        Self {
            favicon: false,
            profile_image: false,
            icons: true,
        }
    }
}

impl ProbePolicy {
    /// Probe everything (favicon and profile image included).
    pub fn probe_all() -> Self {
        Self {
            favicon: true,
            profile_image: true,
            icons: true,
        }
    }

    /// Probe nothing; always use the primary reference when present.
    pub fn trust_primary() -> Self {
        Self {
            favicon: false,
            profile_image: false,
            icons: false,
        }
    }
}

/// Outcome of resolving a (primary, fallback) asset pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub url: Option<String>,
    pub used_fallback: bool,
}

/// Choose between a primary and a fallback asset URL.
///
/// With `probe` set, the primary is availability-checked and the fallback
/// substituted on failure. Without probing, the primary wins whenever it is
/// present and non-empty.
pub fn resolve_with_fallback(
    probe: &dyn ImageProbe,
    primary: Option<&str>,
    fallback: Option<&str>,
    do_probe: bool,
) -> Resolved {
    let primary = primary.filter(|u| !u.is_empty());
    let fallback = fallback.filter(|u| !u.is_empty());

    match primary {
        Some(url) if !do_probe || probe.loads(url) => Resolved {
            url: Some(url.to_string()),
            used_fallback: false,
        },
        _ => Resolved {
            url: fallback.map(str::to_string),
            used_fallback: fallback.is_some(),
        },
    }
}
