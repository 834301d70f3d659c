#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

mod app;
mod ui;

fn main() -> anyhow::Result<()> {
    elogy_core::init_logging();
    let store = elogy_core::SettingsStore::new()?;
    let settings = store.load().unwrap_or_else(|e| {
        tracing::warn!("falling back to default settings: {e:#}");
        elogy_core::AppSettings::default()
    });
    tracing::info!(server = %settings.server_url, config = %store.path().display(), "starting");
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Elogy",
        native_options,
        Box::new(move |cc| {
            let app = app::ElogyApp::new(&cc.egui_ctx, store, settings)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("run native window: {e}"))?;
    Ok(())
}
