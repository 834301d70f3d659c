use eframe::egui;
use elogy_core::{ActionTarget, Footer};

enum Action {
	Navigate(String),
	Select(String, usize),
	LoadMore,
	Retry,
	Reload,
}

pub fn render_logbook_tab(app: &mut crate::app::ElogyApp, ui: &mut egui::Ui) {
	let mut action: Option<Action> = None;

	ui.horizontal(|ui| {
		ui.label("Location:");
		let resp = ui.add(egui::TextEdit::singleline(&mut app.location_input).desired_width(360.0));
		let submitted = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
		if ui.button("Go").clicked() || submitted {
			action = Some(Action::Navigate(app.location_input.clone()));
		}
		if ui.add_enabled(app.page.state().loaded, egui::Button::new("Reload")).clicked() {
			action = Some(Action::Reload);
		}
	});
	ui.separator();

	let view = app.page.view();
	let logbook_id = view.list.logbook.id;

	ui.horizontal(|ui| {
		ui.heading(format!("📖 {}", view.title));
		if !view.actions.is_empty() {
			ui.add_space(16.0);
			for (i, link) in view.actions.iter().enumerate() {
				if i > 0 { ui.label("|"); }
				match link.target {
					ActionTarget::Internal => { if ui.link(link.label).clicked() { action = Some(Action::Navigate(link.href.clone())); } }
					ActionTarget::External => { ui.hyperlink_to(link.label, app.web_url(&link.href)); }
				}
			}
		}
	});

	if !view.chips.is_empty() {
		ui.horizontal_wrapped(|ui| {
			for chip in &view.chips {
				ui.label(egui::RichText::new(chip.label()).monospace().background_color(ui.visuals().faint_bg_color));
			}
		});
	}

	if !view.selectors.is_empty() {
		ui.horizontal_wrapped(|ui| {
			for sel in &view.selectors {
				let current = sel.choices.get(sel.selected).cloned().unwrap_or_default();
				egui::ComboBox::from_id_salt(("attr-filter", logbook_id, &sel.name)).selected_text(current).show_ui(ui, |ui| {
					for (i, choice) in sel.choices.iter().enumerate() {
						if ui.selectable_label(sel.selected == i, choice.as_str()).clicked() && sel.selected != i {
							action = Some(Action::Select(sel.name.clone(), i));
						}
					}
				});
			}
		});
	}
	ui.separator();

	// keyed by logbook so switching logbooks starts at the top again
	egui::ScrollArea::vertical().id_salt(("entries", logbook_id)).auto_shrink([false, false]).show(ui, |ui| {
		if let Some(href) = crate::ui::entry_previews::render_entry_previews(ui, &view.list) {
			action = Some(Action::Navigate(href));
		}
		ui.add_space(6.0);
		match &view.footer {
			Footer::Loading => { ui.add(egui::Spinner::new()); }
			Footer::Failed { .. } => {
				ui.horizontal(|ui| {
					ui.colored_label(egui::Color32::RED, view.footer.label());
					if ui.button("Retry").clicked() { action = Some(Action::Retry); }
				});
			}
			Footer::LoadMore { .. } => {
				if ui.add_enabled(app.page.state().has_more(), egui::Button::new(view.footer.label()).frame(false)).clicked() {
					action = Some(Action::LoadMore);
				}
			}
		}
	});

	match action {
		Some(Action::Navigate(href)) => app.navigate_to(&href),
		Some(Action::Select(name, index)) => {
			if let Err(e) = app.page.select_attribute(&name, index) {
				app.add_toast(&e.to_string(), egui::Color32::RED);
			}
		}
		Some(Action::LoadMore) => app.page.load_more(),
		Some(Action::Retry) => app.page.retry(),
		Some(Action::Reload) => app.announce_reload(),
		None => {}
	}
}
