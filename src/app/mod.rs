//! `ProfileApp` — the top-level egui application state.
//!
//! The starfield starts immediately and keeps running regardless of how the
//! page load goes; the configuration is fetched and rendered once on a
//! background thread and polled over an mpsc channel.

use std::sync::mpsc;
use std::time::Instant;

use eframe::egui;

use starlit::config::SiteConfig;
use starlit::dom::parser::parse_document;
use starlit::engine::host::DEFAULT_HOST_PAGE;
use starlit::engine::pipeline::{ConfigSources, RenderReport, SiteEngine, APOLOGY_HEADING};
use starlit::net::fetch::HttpFetcher;
use starlit::net::probe::HttpImageProbe;
use starlit::starfield::{paint, Starfield};

/// Well-known configuration locations: same-origin path first, then the
/// public mirror of the same document.
const PRIMARY_CONFIG: &str = "https://inasilja.me/config.json";
const MIRROR_CONFIG: &str =
    "https://raw.githubusercontent.com/InaSilja/inasilja.me/main/config.json";
const PARTIALS_BASE: &str = "https://inasilja.me/partials";

const NIGHT_SKY: egui::Color32 = egui::Color32::from_rgb(6, 6, 24);

/// A fully rendered page, ready for display.
pub struct LoadedPage {
    pub config: SiteConfig,
    pub report: RenderReport,
    pub html: String,
}

pub struct ProfileApp {
    starfield: Starfield,
    page: Option<LoadedPage>,
    error: Option<String>,
    loading: bool,
    load_rx: Option<mpsc::Receiver<Result<LoadedPage, String>>>,
    show_source: bool,
    app_start: Instant,
}

impl Default for ProfileApp {
    fn default() -> Self {
        Self {
            starfield: Starfield::new(1280.0, 800.0),
            page: None,
            error: None,
            loading: false,
            load_rx: None,
            show_source: false,
            app_start: Instant::now(),
        }
    }
}

impl ProfileApp {
    /// Kick off the one-shot page load on a background thread.
    pub fn start_load(&mut self, ctx: &egui::Context) {
        if self.loading {
            return;
        }
        self.loading = true;
        self.error = None;

        let (tx, rx) = mpsc::channel();
        self.load_rx = Some(rx);
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let result = load_page();
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }

    /// Poll the load channel and update state when the result arrives.
    fn check_load(&mut self) {
        if let Some(rx) = &self.load_rx {
            if let Ok(result) = rx.try_recv() {
                match result {
                    Ok(page) => self.page = Some(page),
                    Err(err) => self.error = Some(err),
                }
                self.loading = false;
                self.load_rx = None;
            }
        }
    }

    fn show_page(&mut self, ui: &mut egui::Ui) {
        let Some(page) = &self.page else {
            return;
        };
        let config = &page.config;

        ui.add_space(60.0);
        ui.vertical_centered(|ui| {
            if let Some(name) = &config.name {
                ui.heading(egui::RichText::new(name.as_str()).size(34.0).strong());
            }
            for (i, line) in config.bio_lines().iter().enumerate() {
                let text = egui::RichText::new(*line);
                ui.label(if i == 0 { text.size(18.0).italics() } else { text });
            }

            ui.add_space(16.0);
            ui.horizontal_wrapped(|ui| {
                for social in &config.primary_socials {
                    if let (Some(url), Some(alt)) = (&social.url, &social.alt) {
                        ui.hyperlink_to(alt.clone(), url.clone());
                    }
                }
            });

            ui.add_space(12.0);
            for button in &config.link_buttons {
                if let (Some(url), Some(label)) = (&button.url, &button.label) {
                    ui.hyperlink_to(label.clone(), url.clone());
                }
            }

            if let Some(credit) = &config.site_credit {
                ui.add_space(24.0);
                ui.weak(credit);
            }

            if !page.report.failed_sections.is_empty() {
                ui.add_space(8.0);
                ui.weak(format!(
                    "{} section(s) could not be loaded",
                    page.report.failed_sections.len()
                ));
            }
        });

        ui.add_space(20.0);
        ui.checkbox(&mut self.show_source, "page source");
        if self.show_source {
            let mut html = self.page.as_ref().map(|p| p.html.clone()).unwrap_or_default();
            egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut html)
                        .font(egui::TextStyle::Monospace)
                        .desired_width(f32::INFINITY),
                );
            });
        }
    }
}

fn load_page() -> Result<LoadedPage, String> {
    let fetcher = HttpFetcher::new().map_err(|e| e.to_string())?;
    let engine = SiteEngine::new(fetcher, HttpImageProbe::new())
        .with_sources(ConfigSources {
            primary: PRIMARY_CONFIG.to_string(),
            fallback: Some(MIRROR_CONFIG.to_string()),
        })
        .with_partials_base(PARTIALS_BASE);

    let mut doc = parse_document(DEFAULT_HOST_PAGE);
    match engine.render(&mut doc) {
        Ok((config, report)) => Ok(LoadedPage {
            config,
            report,
            html: doc.to_html(),
        }),
        Err(err) => Err(err.to_string()),
    }
}

impl eframe::App for ProfileApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.page.is_none() && self.error.is_none() && !self.loading {
            self.start_load(ctx);
        }
        self.check_load();

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(NIGHT_SKY))
            .show(ctx, |ui| {
                let rect = ui.max_rect();

                // Keep the field matched to the viewport; positions are not
                // renormalized, stars wrap back in on their own.
                let (w, h) = self.starfield.size();
                if (w - rect.width()).abs() > 0.5 || (h - rect.height()).abs() > 0.5 {
                    self.starfield.resize(rect.width(), rect.height());
                }

                self.starfield.tick();
                let now = self.app_start.elapsed().as_secs_f64();
                paint::paint(&self.starfield, ui.painter(), rect, now);

                if self.loading {
                    ui.centered_and_justified(|ui| {
                        ui.spinner();
                    });
                } else if let Some(err) = &self.error {
                    let err = err.clone();
                    ui.vertical_centered(|ui| {
                        ui.add_space(80.0);
                        ui.heading(APOLOGY_HEADING);
                        ui.label(
                            "The page is not loading properly right now. \
                             Try again later, or find me on my socials!",
                        );
                        ui.add_space(8.0);
                        ui.weak(err);
                    });
                } else {
                    self.show_page(ui);
                }
            });

        // The animation runs until the window closes.
        ctx.request_repaint();
    }
}
