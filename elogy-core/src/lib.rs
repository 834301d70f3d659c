pub mod model;
pub mod query;
pub mod request;
pub mod error;
pub mod api;
pub mod jobs;
pub mod state;
pub mod events;
pub mod page;
pub mod view;
pub mod settings;
pub mod logging;

pub use model::{Attribute, AttributeFilters, AttributeKind, Author, EntriesPage, Entry, Logbook, LogbookRef, ALL_LOGBOOKS};
pub use query::{Location, Route, SearchQuery};
pub use request::{EntriesRequest, DEFAULT_PAGE_SIZE};
pub use error::{FetchError, PageError};
pub use api::{ElogyClient, EntriesSource};
pub use jobs::{FetchOutcome, FetchRunner, WakeFn};
pub use state::ViewState;
pub use events::{Event, EventBus, Subscription, SubscriptionId, Topic};
pub use page::{LogbookPage, Navigation, PageEvent};
pub use view::{ActionLink, ActionTarget, AttributeSelector, EntryList, FilterChip, Footer, PageView, ALL_LOGBOOKS_TITLE};
pub use settings::{AppSettings, SettingsStore};
pub use logging::init_logging;
