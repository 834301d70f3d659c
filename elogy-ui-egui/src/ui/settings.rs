use eframe::egui;
use elogy_core::AppSettings;

/// Text buffers for the settings tab; parsed only on save.
pub struct SettingsForm {
	pub server_url: String,
	pub page_size: String,
	pub timeout_secs: String,
	pub start_location: String,
}

impl SettingsForm {
	pub fn from_settings(s: &AppSettings) -> Self {
		Self {
			server_url: s.server_url.clone(),
			page_size: s.page_size.map(|n| n.to_string()).unwrap_or_default(),
			timeout_secs: s.request_timeout_secs.map(|n| n.to_string()).unwrap_or_default(),
			start_location: s.start_location.clone(),
		}
	}

	pub fn to_settings(&self) -> Result<AppSettings, String> {
		let server_url = self.server_url.trim().to_string();
		if !(server_url.starts_with("http://") || server_url.starts_with("https://")) {
			return Err("Server URL must start with http:// or https://".to_string());
		}
		let page_size = parse_optional::<u32>(&self.page_size, "Page size")?.filter(|n| *n > 0);
		let request_timeout_secs = parse_optional::<u64>(&self.timeout_secs, "Timeout")?;
		let start_location = if self.start_location.trim().is_empty() { AppSettings::default().start_location } else { self.start_location.trim().to_string() };
		Ok(AppSettings { server_url, page_size, request_timeout_secs, start_location })
	}
}

fn parse_optional<T: std::str::FromStr>(text: &str, what: &str) -> Result<Option<T>, String> {
	let text = text.trim();
	if text.is_empty() { return Ok(None); }
	text.parse().map(Some).map_err(|_| format!("{what} must be a whole number"))
}

pub fn render_settings_tab(app: &mut crate::app::ElogyApp, ui: &mut egui::Ui) {
	ui.heading("Settings");
	ui.separator();
	egui::Grid::new("settings-grid").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
		let form = &mut app.settings_form;
		ui.label("Server URL:");
		ui.add(egui::TextEdit::singleline(&mut form.server_url).desired_width(280.0));
		ui.end_row();
		ui.label("Page size:");
		ui.add(egui::TextEdit::singleline(&mut form.page_size).hint_text("from location, else 50").desired_width(140.0));
		ui.end_row();
		ui.label("Request timeout (s):");
		ui.add(egui::TextEdit::singleline(&mut form.timeout_secs).hint_text("none").desired_width(140.0));
		ui.end_row();
		ui.label("Start location:");
		ui.add(egui::TextEdit::singleline(&mut form.start_location).desired_width(280.0));
		ui.end_row();
	});
	ui.add_space(6.0);
	let check = app.settings_form.to_settings();
	if let Err(msg) = &check { ui.colored_label(egui::Color32::from_rgb(200, 0, 0), msg); }
	ui.horizontal(|ui| {
		if ui.add_enabled(check.is_ok(), egui::Button::new("Save & apply")).clicked() {
			if let Ok(settings) = check.clone() { app.apply_settings(settings); }
		}
		if ui.button("Revert").clicked() { app.settings_form = SettingsForm::from_settings(&app.settings); }
	});
	ui.separator();
	ui.weak(format!("Settings file: {}", app.settings_store.path().display()));
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn form_parses_optional_numbers() {
		let mut form = SettingsForm::from_settings(&AppSettings::default());
		form.page_size = " 20 ".into();
		let s = form.to_settings().unwrap();
		assert_eq!(s.page_size, Some(20));
		assert_eq!(s.request_timeout_secs, None);
		form.timeout_secs = "soon".into();
		assert!(form.to_settings().is_err());
	}

	#[test]
	fn form_rejects_bad_url() {
		let mut form = SettingsForm::from_settings(&AppSettings::default());
		form.server_url = "elogy.local".into();
		assert!(form.to_settings().is_err());
	}
}
