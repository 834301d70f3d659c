pub mod logbook;
pub mod entry_previews;
pub mod settings;
pub mod logs;
pub mod about;
