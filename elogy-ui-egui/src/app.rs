use std::sync::Arc;

use eframe::{egui, App};
use elogy_core::{AppSettings, ElogyClient, Event, EventBus, Location, LogbookPage, Navigation, PageEvent, SettingsStore};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Tab { Logbook, Settings, Logs, About }

pub struct Toast { pub msg: String, pub color: egui::Color32, pub until: std::time::Instant }

pub struct ElogyApp {
	pub log: String,
	pub settings_store: SettingsStore,
	pub settings: AppSettings,
	pub selected: Tab,
	pub bus: EventBus,
	pub page: LogbookPage,
	pub location_input: String,
	pub toasts: Vec<Toast>,
	pub settings_form: crate::ui::settings::SettingsForm,
	window_title: String,
	ctx: egui::Context,
}

fn build_page(ctx: &egui::Context, settings: &AppSettings, bus: &EventBus) -> anyhow::Result<LogbookPage> {
	let client = ElogyClient::from_settings(settings)?;
	let mut page = LogbookPage::new(Arc::new(client), bus.clone(), settings.page_size)?;
	let repaint = ctx.clone();
	page.set_waker(Some(Arc::new(move || repaint.request_repaint())));
	Ok(page)
}

impl ElogyApp {
	pub fn new(ctx: &egui::Context, settings_store: SettingsStore, settings: AppSettings) -> anyhow::Result<Self> {
		let bus = EventBus::new();
		let mut page = build_page(ctx, &settings, &bus)?;
		let start = Location::parse(&settings.start_location);
		page.mount(Navigation::new(start.clone()));
		Ok(Self {
			log: String::new(),
			settings_form: crate::ui::settings::SettingsForm::from_settings(&settings),
			settings_store,
			settings,
			selected: Tab::Logbook,
			bus,
			page,
			location_input: start.href(),
			toasts: Vec::new(),
			window_title: String::new(),
			ctx: ctx.clone(),
		})
	}

	pub fn append_log(&mut self, msg: &str) {
		let stamp = chrono::Local::now().format("%H:%M:%S");
		if !self.log.is_empty() { self.log.push('\n'); }
		self.log.push_str(&format!("[{stamp}] {msg}"));
	}

	pub fn add_toast(&mut self, msg: &str, color: egui::Color32) { self.toasts.push(Toast { msg: msg.to_string(), color, until: std::time::Instant::now() + std::time::Duration::from_secs(4) }); }

	/// In-app navigation, as a router would do it.
	pub fn navigate_to(&mut self, href: &str) {
		let location = Location::parse(href);
		self.location_input = location.href();
		self.page.navigate(Navigation::new(location));
	}

	/// Announce that the logbook on display changed, as an entry editor would.
	pub fn announce_reload(&mut self) {
		let logbook_id = self.page.state().logbook.id;
		let notified = self.bus.publish(&Event::LogbookReloaded { logbook_id });
		tracing::debug!(logbook_id, notified, "reload announced");
	}

	/// Link into the Elogy web frontend for things this client does not edit.
	pub fn web_url(&self, href: &str) -> String {
		format!("{}{}", self.settings.server_url.trim_end_matches('/'), href)
	}

	pub fn apply_settings(&mut self, settings: AppSettings) {
		if let Err(e) = self.settings_store.save(&settings) {
			self.add_toast(&format!("Could not save settings: {e:#}"), egui::Color32::RED);
			return;
		}
		match build_page(&self.ctx, &settings, &self.bus) {
			Ok(mut page) => {
				self.page.unmount();
				page.mount(Navigation::new(self.page.navigation().location.clone()));
				self.page = page;
				self.append_log(&format!("Settings applied, server {}", settings.server_url));
				self.settings = settings;
				self.add_toast("Settings saved", egui::Color32::LIGHT_GREEN);
			}
			Err(e) => self.add_toast(&format!("Invalid settings: {e:#}"), egui::Color32::RED),
		}
	}

	fn poll_page(&mut self) {
		for event in self.page.poll() {
			match event {
				PageEvent::Loaded { logbook_id, entries, count } => self.append_log(&format!("Loaded {entries} of {count} entries from logbook {logbook_id}")),
				PageEvent::Appended { logbook_id, added, entries, count } => self.append_log(&format!("Loaded {added} more entries from logbook {logbook_id} ({entries} of {count})")),
				PageEvent::ReloadRequested { logbook_id } => self.append_log(&format!("Reloading logbook {logbook_id}")),
				PageEvent::Failed { logbook_id, message } => {
					self.append_log(&format!("Fetching logbook {logbook_id} failed: {message}"));
					self.add_toast("Could not load entries", egui::Color32::RED);
				}
			}
		}
	}

	fn sync_window_title(&mut self, ctx: &egui::Context) {
		let title = self.page.view().title;
		if title != self.window_title {
			ctx.send_viewport_cmd(egui::ViewportCommand::Title(if title.is_empty() { "Elogy".to_string() } else { title.clone() }));
			self.window_title = title;
		}
	}

	fn draw_toasts(&mut self, ctx: &egui::Context) {
		let now = std::time::Instant::now();
		self.toasts.retain(|t| t.until > now);
		let mut y = 12.0;
		for (i, t) in self.toasts.iter().enumerate() {
			egui::Area::new(egui::Id::new(format!("toast-{i}"))).fixed_pos(egui::pos2(180.0, y)).show(ctx, |ui| { ui.colored_label(t.color, &t.msg); });
			y += 22.0;
		}
		if !self.toasts.is_empty() { ctx.request_repaint_after(std::time::Duration::from_millis(250)); }
	}
}

impl App for ElogyApp {
	fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
		self.poll_page();
		self.sync_window_title(ctx);

		egui::SidePanel::left("nav").resizable(true).min_width(140.0).show(ctx, |ui| {
			ui.heading("Elogy");
			ui.separator();
			ui.selectable_value(&mut self.selected, Tab::Logbook, "Logbook");
			ui.selectable_value(&mut self.selected, Tab::Settings, "Settings");
			ui.selectable_value(&mut self.selected, Tab::Logs, "Logs");
			ui.selectable_value(&mut self.selected, Tab::About, "About");
			ui.add_space(8.0);
			ui.separator();
			if ui.button("All logbooks").clicked() {
				self.selected = Tab::Logbook;
				self.navigate_to("/logbooks/0");
			}
		});

		egui::CentralPanel::default().show(ctx, |ui| {
			match self.selected {
				Tab::Logbook => { crate::ui::logbook::render_logbook_tab(self, ui); }
				Tab::Settings => { crate::ui::settings::render_settings_tab(self, ui); }
				Tab::Logs => { crate::ui::logs::render_logs_tab(self, ui); }
				Tab::About => { crate::ui::about::render_about_tab(self, ui); }
			}
		});
		self.draw_toasts(ctx);
	}
}
