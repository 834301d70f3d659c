use eframe::egui;

pub fn render_about_tab(app: &mut crate::app::ElogyApp, ui: &mut egui::Ui) {
	ui.heading("About");
	ui.separator();
	ui.label("A desktop browser for Elogy logbooks: filter, page through and follow entries on an Elogy server.");
	ui.separator();
	let git = option_env!("GIT_COMMIT_HASH").unwrap_or("unknown");
	ui.label(format!("Client version: {} ({})", env!("CARGO_PKG_VERSION"), git));
	ui.horizontal(|ui| {
		ui.label("Server:");
		ui.hyperlink(app.settings.server_url.clone());
	});
	let state = app.page.state();
	if state.loaded {
		ui.label(format!("Showing {} of {} entries", state.entries.len(), state.count));
	}
}
