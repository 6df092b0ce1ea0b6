use eframe::egui;

mod app;

use app::ProfileApp;

fn main() {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Starlit",
        options,
        Box::new(|_cc| Ok(Box::new(ProfileApp::default()))),
    )
    .expect("Failed to start Starlit");
}
