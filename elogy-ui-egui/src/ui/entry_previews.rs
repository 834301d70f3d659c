use chrono::{DateTime, Local, NaiveDateTime};
use eframe::egui;
use elogy_core::{Entry, EntryList};

/// Server timestamps come either as RFC 3339 or as naive ISO without an offset.
pub fn format_timestamp(raw: &str) -> String {
	if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
		return dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string();
	}
	if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
		return dt.format("%Y-%m-%d %H:%M").to_string();
	}
	raw.to_string()
}

// stays on the list's logbook, so "[All logbooks]" only changes the selection
fn entry_href(list: &EntryList<'_>, entry: &Entry) -> String {
	let logbook_id = list.logbook.id;
	let search = list.search.trim_start_matches('?');
	if search.is_empty() { format!("/logbooks/{}/entries/{}", logbook_id, entry.id) } else { format!("/logbooks/{}/entries/{}?{}", logbook_id, entry.id, search) }
}

/// Draws the entry list; returns where to go if an entry was clicked.
pub fn render_entry_previews(ui: &mut egui::Ui, list: &EntryList<'_>) -> Option<String> {
	let mut clicked = None;
	if list.entries.is_empty() {
		ui.label(egui::RichText::new("No entries").italics());
	}
	for entry in list.entries {
		let selected = list.selected_entry_id == Some(entry.id);
		let fill = if selected { ui.visuals().selection.bg_fill } else { ui.visuals().faint_bg_color };
		let resp = egui::Frame::group(ui.style()).fill(fill).show(ui, |ui| {
			ui.set_width(ui.available_width());
			ui.horizontal(|ui| {
				let title = entry.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("(no title)");
				ui.strong(title);
				if entry.n_followups > 0 { ui.label(format!("+{}", entry.n_followups)); }
				if entry.n_attachments > 0 { ui.label(format!("📎{}", entry.n_attachments)); }
			});
			ui.horizontal(|ui| {
				if let Some(ts) = entry.last_changed_at.as_deref().or(entry.created_at.as_deref()) {
					ui.weak(format_timestamp(ts));
				}
				let authors = entry.author_names();
				if !authors.is_empty() { ui.label(authors); }
				if list.logbook.is_all_logbooks() {
					if let Some(lb) = &entry.logbook { ui.weak(format!("in {}", lb.name)); }
				}
			});
			if let Some(content) = entry.content.as_deref().filter(|c| !c.is_empty()) {
				ui.label(egui::RichText::new(content).small());
			}
		});
		if resp.response.interact(egui::Sense::click()).clicked() {
			clicked = Some(entry_href(list, entry));
		}
	}
	clicked
}

#[cfg(test)]
mod tests {
	use super::*;
	use elogy_core::{Logbook, LogbookRef};

	#[test]
	fn formats_naive_server_timestamps() {
		assert_eq!(format_timestamp("2017-05-09T10:39:47.390283"), "2017-05-09 10:39");
		assert_eq!(format_timestamp("yesterday"), "yesterday");
	}

	#[test]
	fn entry_links_keep_search_and_listed_logbook() {
		let all = Logbook::default();
		let entries = vec![Entry { id: 7, logbook: Some(LogbookRef { id: 3, name: "RF".into() }), ..Default::default() }];
		let list = EntryList { logbook: &all, entries: &entries, search: "?title=x", selected_entry_id: None };
		assert_eq!(entry_href(&list, &entries[0]), "/logbooks/0/entries/7?title=x");
		let ops = Logbook { id: 5, ..Default::default() };
		let list = EntryList { logbook: &ops, search: "", ..list };
		assert_eq!(entry_href(&list, &Entry { id: 8, ..Default::default() }), "/logbooks/5/entries/8");
	}
}
