use eframe::egui;

pub fn render_logs_tab(app: &mut crate::app::ElogyApp, ui: &mut egui::Ui) {
	ui.heading("Activity");
	ui.separator();

	ui.horizontal(|ui| {
		if ui.small_button("Copy").clicked() {
			ui.output_mut(|o| o.copied_text = app.log.clone());
		}
		if ui.small_button("Clear").clicked() {
			app.log.clear();
		}
		ui.weak(format!("Full log: {}", elogy_core::logging::log_dir().display()));
	});

	ui.separator();

	if app.log.is_empty() {
		ui.label("Nothing fetched yet.");
		return;
	}
	egui::ScrollArea::vertical()
		.stick_to_bottom(true)
		.auto_shrink([false, false])
		.show(ui, |ui| {
			ui.monospace(&app.log);
		});
}
