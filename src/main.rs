use anyhow::anyhow;
use eframe::egui;
use paintpad::gui::PaintApp;
use paintpad::settings::Settings;

const SETTINGS_FILE: &str = "settings.json";

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE);
    paintpad::logging::init(settings.debug_logging);
    tracing::info!("starting paintpad");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 680.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "PaintPad",
        native_options,
        Box::new(move |cc| Box::new(PaintApp::new(cc, settings, SETTINGS_FILE.to_string()))),
    )
    .map_err(|e| anyhow!("eframe exited with error: {e}"))?;
    Ok(())
}
